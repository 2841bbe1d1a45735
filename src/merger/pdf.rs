//! PDF merging backed by `lopdf`

use super::DocumentMerger;
use crate::error::{Error, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Bound on page tree depth, guards against reference cycles
const MAX_TREE_DEPTH: usize = 64;

/// Appends the pages of every input PDF, in input order, into one document
///
/// Objects of each input are renumbered past the previous input so that
/// references never collide. The first catalog and the first page tree root
/// are kept and rewired to the combined page list; outlines are dropped
/// because their destinations point into the original documents. Inherited
/// page attributes are copied onto each page before it is re-parented.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfMerger;

impl PdfMerger {
    /// Create a merger
    pub fn new() -> Self {
        Self
    }
}

impl DocumentMerger for PdfMerger {
    fn merge(&self, documents: Vec<Vec<u8>>) -> Result<Vec<u8>> {
        if documents.is_empty() {
            return Err(Error::MergeEngine("no documents to merge".into()));
        }

        let mut max_id = 1;
        let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
        let mut objects: Vec<(ObjectId, Object)> = Vec::new();

        for (position, bytes) in documents.iter().enumerate() {
            let mut doc = Document::load_mem(bytes).map_err(|e| {
                Error::MergeEngine(format!("document {} could not be parsed: {}", position, e))
            })?;
            doc.renumber_objects_with(max_id);
            max_id = doc.max_id + 1;

            for page_id in doc.get_pages().into_values() {
                let mut page = doc
                    .get_dictionary(page_id)
                    .map_err(|e| {
                        Error::MergeEngine(format!(
                            "document {} has a dangling page reference: {}",
                            position, e
                        ))
                    })?
                    .clone();
                inherit_attributes(&doc, &mut page);
                pages.push((page_id, page));
            }
            objects.extend(doc.objects);
        }

        if pages.is_empty() {
            return Err(Error::MergeEngine("documents contain no pages".into()));
        }

        let mut merged = Document::with_version("1.5");
        let mut catalog: Option<(ObjectId, Object)> = None;
        let mut page_tree: Option<(ObjectId, Dictionary)> = None;

        for (object_id, object) in objects {
            match type_name(&object) {
                Some(b"Catalog") => {
                    if catalog.is_none() {
                        catalog = Some((object_id, object));
                    }
                }
                Some(b"Pages") => {
                    // Keep the first root id; later trees only contribute inheritable keys.
                    if let Ok(dict) = object.as_dict() {
                        match page_tree.as_mut() {
                            Some((_, existing)) => {
                                for (key, value) in dict.iter() {
                                    if !existing.has(key) {
                                        existing.set(key.clone(), value.clone());
                                    }
                                }
                            }
                            None => page_tree = Some((object_id, dict.clone())),
                        }
                    }
                }
                Some(b"Page") | Some(b"Outlines") | Some(b"Outline") => {}
                _ => {
                    merged.objects.insert(object_id, object);
                }
            }
        }

        let (catalog_id, catalog_object) =
            catalog.ok_or_else(|| Error::MergeEngine("no document catalog found".into()))?;
        let (pages_id, mut pages_dict) =
            page_tree.ok_or_else(|| Error::MergeEngine("no page tree found".into()))?;

        let mut kids = Vec::with_capacity(pages.len());
        let page_count = pages.len();
        for (page_id, mut page) in pages {
            page.set("Parent", pages_id);
            merged.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }

        pages_dict.set("Count", kids.len() as i64);
        pages_dict.set("Kids", kids);
        pages_dict.remove(b"Parent");
        merged
            .objects
            .insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog_dict = catalog_object
            .as_dict()
            .map_err(|e| Error::MergeEngine(format!("malformed catalog: {}", e)))?
            .clone();
        catalog_dict.set("Pages", pages_id);
        catalog_dict.remove(b"Outlines");
        merged
            .objects
            .insert(catalog_id, Object::Dictionary(catalog_dict));

        merged.trailer.set("Root", catalog_id);
        merged.max_id = merged.objects.keys().map(|(id, _)| *id).max().unwrap_or(0);
        merged.renumber_objects();

        let mut out = Vec::new();
        merged
            .save_to(&mut out)
            .map_err(|e| Error::MergeEngine(format!("could not write merged document: {}", e)))?;

        tracing::debug!(
            documents = documents.len(),
            pages = page_count,
            bytes = out.len(),
            "PDF documents merged"
        );
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "lopdf"
    }
}

/// Copy attributes the page inherits from its ancestors onto the page itself
fn inherit_attributes(doc: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key.to_vec(), value.clone());
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
}

/// Value of the `/Type` entry of a dictionary object
fn type_name(object: &Object) -> Option<&[u8]> {
    object
        .as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|t| t.as_name().ok())
}

//! Shared fixtures for unit tests

use lopdf::{Document, Object, Stream, dictionary};
use wiremock::{Match, Request, ResponseTemplate};

/// Smallest body that passes the default signature check
pub(crate) const PDF_STUB: &[u8] = b"%PDF-1.4\n%stub\n%%EOF\n";

/// Matches a request whose raw (still encoded) query string is exactly the given string
pub(crate) struct RawQuery(pub(crate) &'static str);

impl Match for RawQuery {
    fn matches(&self, request: &Request) -> bool {
        request.url.query() == Some(self.0)
    }
}

/// 200 response carrying `body` as `application/pdf`
pub(crate) fn pdf_response(body: impl Into<Vec<u8>>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Content-Type", "application/pdf")
        .set_body_bytes(body.into())
}

/// A one-page PDF whose content stream contains `marker`
pub(crate) fn build_pdf(marker: &str) -> Vec<u8> {
    build_pdf_pages(&[marker])
}

/// A PDF with one page per marker, in order
pub(crate) fn build_pdf_pages(markers: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for marker in markers {
        let content = format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", marker);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("fixture PDF serializes");
    buf
}

/// Page content streams of `pdf`, in page order
pub(crate) fn page_contents(pdf: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(pdf).expect("merged PDF parses");
    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = doc.get_page_content(*page_id).expect("page has content");
            String::from_utf8_lossy(&content).into_owned()
        })
        .collect()
}

//! PDF fixtures, mock responses and an event-recording observer

use docmerge::{MergeEvent, MergeObserver};
use lopdf::{Document, Object, Stream, dictionary};
use std::sync::Mutex;
use wiremock::{Match, Request, ResponseTemplate};

/// A PDF with one page per marker; each page's content stream shows its marker
pub fn pdf_with_pages(markers: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for marker in markers {
        let content = format!("BT /F1 18 Tf 50 700 Td ({}) Tj ET", marker);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        // Resources on the page itself, MediaBox inherited from the tree
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
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
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
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

/// A single-page PDF showing `marker`
pub fn pdf(marker: &str) -> Vec<u8> {
    pdf_with_pages(&[marker])
}

/// The marker shown on each page of `merged`, in page order
pub fn page_markers(merged: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(merged).expect("merged PDF parses");
    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = doc.get_page_content(*page_id).expect("page has content");
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').expect("marker start") + 1;
            let end = text.rfind(')').expect("marker end");
            text[start..end].to_string()
        })
        .collect()
}

/// 200 `application/pdf` response with `body`
pub fn pdf_response(body: Vec<u8>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Content-Type", "application/pdf")
        .set_body_bytes(body)
}

/// Matches the raw (still percent-encoded) query string exactly
pub struct RawQuery(pub &'static str);

impl Match for RawQuery {
    fn matches(&self, request: &Request) -> bool {
        request.url.query() == Some(self.0)
    }
}

/// Observer that keeps every event it receives
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<MergeEvent>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<MergeEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl MergeObserver for EventLog {
    fn on_event(&self, event: &MergeEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

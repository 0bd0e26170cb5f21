//! Loading and validating the original document

use crate::error::OverlayError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::{Deserialize, Serialize};

/// Page tree nesting deeper than this is treated as a cycle
const MAX_TREE_DEPTH: usize = 32;

/// Page box in points: lower-left origin plus dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub x0: f64,
    #[serde(default)]
    pub y0: f64,
}

impl PageSize {
    /// US Letter, used when a page declares no MediaBox
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
        x0: 0.0,
        y0: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            x0: 0.0,
            y0: 0.0,
        }
    }

    pub fn with_origin(mut self, x0: f64, y0: f64) -> Self {
        self.x0 = x0;
        self.y0 = y0;
        self
    }

    /// Top edge in user space; extractor `top` values are measured down from here
    pub fn top(&self) -> f64 {
        self.y0 + self.height
    }

    /// `[x0 y0 x1 y1]` as written to a MediaBox
    pub fn rect(&self) -> [f64; 4] {
        [self.x0, self.y0, self.x0 + self.width, self.y0 + self.height]
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::LETTER
    }
}

/// A parsed original document, held for the duration of one edit session
#[derive(Debug, Clone)]
pub struct SourceDocument {
    bytes: Vec<u8>,
    document: Document,
    page_ids: Vec<ObjectId>,
    page_sizes: Vec<PageSize>,
}

impl SourceDocument {
    /// Parse `bytes`; anything that is not a PDF with at least one page is
    /// rejected as malformed.
    pub fn load(bytes: &[u8]) -> Result<Self, OverlayError> {
        let document =
            Document::load_mem(bytes).map_err(|e| OverlayError::MalformedSource(e.to_string()))?;

        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(OverlayError::MalformedSource(
                "Document has no pages".into(),
            ));
        }

        let page_sizes = page_ids
            .iter()
            .map(|&id| media_box_size(&document, id).unwrap_or_default())
            .collect();

        tracing::debug!(pages = page_ids.len(), bytes = bytes.len(), "source document loaded");

        Ok(Self {
            bytes: bytes.to_vec(),
            document,
            page_ids,
            page_sizes,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    /// Page object ids in page order
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    pub fn page_size(&self, index: u32) -> Option<PageSize> {
        self.page_sizes.get(index as usize).copied()
    }

    pub fn page_sizes(&self) -> &[PageSize] {
        &self.page_sizes
    }
}

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32, OverlayError> {
    Ok(SourceDocument::load(bytes)?.page_count())
}

/// Resolve a possibly indirect object
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(v) => Some(*v as f64),
        Object::Real(v) => Some(*v as f64),
        _ => None,
    }
}

/// Look up an inheritable page attribute (MediaBox, Resources, ...),
/// walking /Parent links up the page tree.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node: &Dictionary = doc.get_object(page_id).ok()?.as_dict().ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return resolve(doc, value);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_object(parent).ok()?.as_dict().ok()?;
    }
    None
}

pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> Option<[f64; 4]> {
    let array = inherited_attribute(doc, page_id, b"MediaBox")?.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut rect = [0.0; 4];
    for (slot, item) in rect.iter_mut().zip(array) {
        *slot = number(resolve(doc, item)?)?;
    }
    Some(rect)
}

fn media_box_size(doc: &Document, page_id: ObjectId) -> Option<PageSize> {
    let [x0, y0, x1, y1] = media_box(doc, page_id)?;
    let size = PageSize::new((x1 - x0).abs(), (y1 - y0).abs()).with_origin(x0.min(x1), y0.min(y1));
    (size.width > 0.0 && size.height > 0.0).then_some(size)
}

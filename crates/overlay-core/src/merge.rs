//! Page Merger
//!
//! Composites overlay pages onto the original document, page-index aligned.
//!
//! The algorithm, per original page `i`:
//! 1. If the overlay has no page `i`, or that page draws nothing, leave the
//!    original page untouched
//! 2. Import the objects reachable from overlay page `i` with remapped IDs
//! 3. Wrap the overlay content as a Form XObject
//! 4. Give the original page a page-local copy of its resources and register
//!    the form under a fresh name
//! 5. Bracket the original content with `q`/`Q` and draw the form after it
//!
//! Page order and count always follow the original; overlay pages past its
//! end are dropped.

use crate::error::OverlayError;
use crate::overlay::OverlayDocument;
use crate::source::{inherited_attribute, media_box, resolve, PageSize, SourceDocument};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeSet;

/// Prefix for the form XObject name registered on each stamped page
const OVERLAY_XOBJECT_PREFIX: &str = "Ovl";

/// Merge a composed overlay onto the original document.
///
/// When no overlay page draws anything, the original bytes are returned
/// unchanged.
pub fn merge(original: &SourceDocument, overlay: &OverlayDocument) -> Result<Vec<u8>, OverlayError> {
    if !overlay.has_content() {
        tracing::debug!("overlay is empty, returning original document");
        return Ok(original.bytes().to_vec());
    }
    let overlay_doc = overlay.to_document()?;
    stamp_pages(original, &overlay_doc)
}

/// Merge an arbitrary overlay PDF onto `original`, page by page
pub fn merge_pdf(original: &[u8], overlay: &[u8]) -> Result<Vec<u8>, OverlayError> {
    let source = SourceDocument::load(original)?;
    let overlay_doc = Document::load_mem(overlay).map_err(|e| {
        OverlayError::MalformedSource(format!("Failed to load overlay: {}", e))
    })?;
    stamp_pages(&source, &overlay_doc)
}

fn stamp_pages(original: &SourceDocument, overlay: &Document) -> Result<Vec<u8>, OverlayError> {
    let overlay_pages = get_page_references(overlay);
    if overlay_pages.len() > original.page_ids().len() {
        tracing::debug!(
            dropped = overlay_pages.len() - original.page_ids().len(),
            "discarding overlay pages past the end of the original"
        );
    }

    let mut dest = original.document().clone();

    // Reserve an ID range for imported overlay objects
    let id_offset = dest.max_id;
    dest.max_id += overlay.max_id;

    let mut imported: BTreeSet<ObjectId> = BTreeSet::new();
    let mut stamped = 0usize;

    for (index, (&page_id, &overlay_page_id)) in
        original.page_ids().iter().zip(&overlay_pages).enumerate()
    {
        let content = overlay
            .get_page_content(overlay_page_id)
            .map_err(|e| OverlayError::OperationError(format!("Failed to read overlay page {}: {}", index, e)))?;
        if content.iter().all(u8::is_ascii_whitespace) {
            tracing::debug!(page = index, "overlay page is empty, keeping original page");
            continue;
        }

        let resources = inherited_attribute(overlay, overlay_page_id, b"Resources")
            .and_then(|r| r.as_dict().ok())
            .cloned()
            .unwrap_or_default();
        import_referenced(&mut dest, overlay, &Object::Dictionary(resources.clone()), id_offset, &mut imported)?;

        let bbox = media_box(overlay, overlay_page_id)
            .or_else(|| original.page_size(index as u32).map(|s| s.rect()))
            .unwrap_or_else(|| PageSize::LETTER.rect());

        let form = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => bbox.iter().map(|&v| Object::Real(v as f32)).collect::<Vec<_>>(),
                "Resources" => remap_object_refs(Object::Dictionary(resources), id_offset),
            },
            content,
        );
        let form_id = dest.add_object(form);

        install_overlay(&mut dest, page_id, form_id)?;
        stamped += 1;
    }

    tracing::info!(
        pages = original.page_count(),
        stamped,
        "overlay merged"
    );

    if stamped == 0 {
        return Ok(original.bytes().to_vec());
    }

    let mut buffer = Vec::new();
    dest.save_to(&mut buffer)
        .map_err(|e| OverlayError::OperationError(format!("Failed to save merged PDF: {}", e)))?;

    Ok(buffer)
}

/// Get all page object references from a document, in page order
fn get_page_references(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Copy every object reachable from `root` into `dest`, shifting IDs by `offset`
fn import_referenced(
    dest: &mut Document,
    source: &Document,
    root: &Object,
    offset: u32,
    imported: &mut BTreeSet<ObjectId>,
) -> Result<(), OverlayError> {
    let mut pending = Vec::new();
    collect_refs(root, &mut pending);

    while let Some(id) = pending.pop() {
        if !imported.insert(id) {
            continue;
        }
        let object = source.get_object(id).map_err(|e| {
            OverlayError::OperationError(format!("Overlay object {:?} missing: {}", id, e))
        })?;
        collect_refs(object, &mut pending);
        dest.objects
            .insert((id.0 + offset, id.1), remap_object_refs(object.clone(), offset));
    }
    Ok(())
}

fn collect_refs(obj: &Object, out: &mut Vec<ObjectId>) {
    match obj {
        Object::Reference(id) => out.push(*id),
        Object::Array(arr) => arr.iter().for_each(|o| collect_refs(o, out)),
        Object::Dictionary(dict) => dict.iter().for_each(|(_, v)| collect_refs(v, out)),
        Object::Stream(stream) => stream.dict.iter().for_each(|(_, v)| collect_refs(v, out)),
        _ => {}
    }
}

/// Recursively remap object references in an object
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Register `form_id` on the page and draw it after the original content
fn install_overlay(doc: &mut Document, page_id: ObjectId, form_id: ObjectId) -> Result<(), OverlayError> {
    let mut resources = inherited_attribute(doc, page_id, b"Resources")
        .and_then(|r| r.as_dict().ok())
        .cloned()
        .unwrap_or_default();
    let mut xobjects = resources
        .get(b"XObject")
        .ok()
        .and_then(|x| resolve(doc, x))
        .and_then(|x| x.as_dict().ok())
        .cloned()
        .unwrap_or_default();

    let name = unique_name(&xobjects, OVERLAY_XOBJECT_PREFIX);
    xobjects.set(name.clone(), form_id);
    resources.set("XObject", xobjects);

    let mut contents = existing_contents(doc, page_id);
    let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let close = doc.add_object(Stream::new(Dictionary::new(), draw_form_content(&name)?));
    contents.insert(0, Object::Reference(open));
    contents.push(Object::Reference(close));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| OverlayError::OperationError(e.to_string()))?;
    page.set("Resources", resources);
    page.set("Contents", contents);
    Ok(())
}

/// Content stream entries of a page as a flat list of references
fn existing_contents(doc: &Document, page_id: ObjectId) -> Vec<Object> {
    let Some(contents) = doc
        .get_object(page_id)
        .ok()
        .and_then(|p| p.as_dict().ok())
        .and_then(|d| d.get(b"Contents").ok())
    else {
        return Vec::new();
    };

    match contents {
        Object::Array(items) => items.clone(),
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        _ => Vec::new(),
    }
}

/// Leading newline keeps the first `Q` from fusing with the last operator
/// of the preceding stream.
fn draw_form_content(name: &str) -> Result<Vec<u8>, OverlayError> {
    let body = Content {
        operations: vec![
            Operation::new("Q", vec![]),
            Operation::new("q", vec![]),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
    .encode()
    .map_err(|e| OverlayError::OperationError(format!("Failed to encode content: {}", e)))?;

    let mut content = Vec::with_capacity(body.len() + 1);
    content.push(b'\n');
    content.extend(body);
    Ok(content)
}

/// First `{prefix}{n}` not already used in `dict`
fn unique_name(dict: &Dictionary, prefix: &str) -> String {
    let taken: BTreeSet<&[u8]> = dict.iter().map(|(k, _)| k.as_slice()).collect();
    (0u32..)
        .map(|n| format!("{}{}", prefix, n))
        .find(|candidate| !taken.contains(candidate.as_bytes()))
        .unwrap_or_else(|| prefix.to_string())
}

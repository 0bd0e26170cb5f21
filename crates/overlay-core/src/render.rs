//! Rendering overlay drawing programs as PDF content

use crate::error::OverlayError;
use crate::fonts::StandardFont;
use crate::overlay::{DrawOp, OverlayDocument, OverlayPage, Rgb};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::{BTreeMap, BTreeSet};

/// Content stream of one overlay page plus the resources it names
#[derive(Debug, Default)]
pub(crate) struct PageProgram {
    pub content: Vec<u8>,
    pub fonts: BTreeSet<StandardFont>,
    pub images: BTreeSet<usize>,
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn color_operands(color: Rgb) -> Vec<Object> {
    vec![
        Object::Real(color.r),
        Object::Real(color.g),
        Object::Real(color.b),
    ]
}

pub(crate) fn image_resource_name(index: usize) -> String {
    format!("Im{}", index)
}

/// Encode text for a standard font. Non-symbolic faces use WinAnsiEncoding;
/// characters it cannot represent become '?'.
pub(crate) fn encode_text(font: StandardFont, text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            if !font.uses_win_ansi() {
                return u8::try_from(c as u32).unwrap_or(b'?');
            }
            match c {
                '\u{20AC}' => 0x80,
                '\u{201A}' => 0x82,
                '\u{2026}' => 0x85,
                '\u{2018}' => 0x91,
                '\u{2019}' => 0x92,
                '\u{201C}' => 0x93,
                '\u{201D}' => 0x94,
                '\u{2022}' => 0x95,
                '\u{2013}' => 0x96,
                '\u{2014}' => 0x97,
                '\u{2122}' => 0x99,
                c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
                _ => b'?',
            }
        })
        .collect()
}

/// Translate a page's draw operations into content stream bytes.
/// Every operation is wrapped in its own q/Q pair.
pub(crate) fn page_program(page: &OverlayPage) -> Result<PageProgram, OverlayError> {
    let mut program = PageProgram::default();
    let mut operations = Vec::with_capacity(page.ops.len() * 7);

    for op in &page.ops {
        operations.push(Operation::new("q", vec![]));
        match op {
            DrawOp::MaskRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                operations.push(Operation::new("rg", color_operands(*color)));
                operations.push(Operation::new(
                    "re",
                    vec![real(*x), real(*y), real(*width), real(*height)],
                ));
                operations.push(Operation::new("f", vec![]));
            }
            DrawOp::DrawText {
                x,
                y,
                font,
                size,
                text,
                color,
            } => {
                program.fonts.insert(*font);
                operations.push(Operation::new("rg", color_operands(*color)));
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![Object::Name(font.resource_name().into_bytes()), real(*size)],
                ));
                operations.push(Operation::new("Td", vec![real(*x), real(*y)]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(
                        encode_text(*font, text),
                        StringFormat::Literal,
                    )],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            DrawOp::DrawImage {
                x,
                y,
                width,
                height,
                image,
            } => {
                program.images.insert(*image);
                operations.push(Operation::new(
                    "cm",
                    vec![
                        real(*width),
                        0.into(),
                        0.into(),
                        real(*height),
                        real(*x),
                        real(*y),
                    ],
                ));
                operations.push(Operation::new(
                    "Do",
                    vec![Object::Name(image_resource_name(*image).into_bytes())],
                ));
            }
        }
        operations.push(Operation::new("Q", vec![]));
    }

    program.content = Content { operations }
        .encode()
        .map_err(|e| OverlayError::OperationError(format!("Failed to encode content: {}", e)))?;
    Ok(program)
}

fn font_dictionary(font: StandardFont) -> Dictionary {
    let mut dict = dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_name(),
    };
    if font.uses_win_ansi() {
        dict.set("Encoding", "WinAnsiEncoding");
    }
    dict
}

impl OverlayDocument {
    /// Render the overlay as a standalone document, one page per overlay page.
    ///
    /// Fonts and images are written once and shared between pages.
    pub fn to_document(&self) -> Result<Document, OverlayError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font_ids: BTreeMap<StandardFont, ObjectId> = BTreeMap::new();
        let mut image_ids: BTreeMap<usize, ObjectId> = BTreeMap::new();
        let mut kids = Vec::with_capacity(self.pages().len());

        for page in self.pages() {
            let program = page_program(page)?;

            let mut resources = Dictionary::new();
            if !program.fonts.is_empty() {
                let mut fonts = Dictionary::new();
                for font in &program.fonts {
                    let id = *font_ids
                        .entry(*font)
                        .or_insert_with(|| doc.add_object(font_dictionary(*font)));
                    fonts.set(font.resource_name(), id);
                }
                resources.set("Font", fonts);
            }
            if !program.images.is_empty() {
                let mut xobjects = Dictionary::new();
                for &index in &program.images {
                    let id = match image_ids.get(&index) {
                        Some(id) => *id,
                        None => {
                            let asset = self.images().get(index).ok_or_else(|| {
                                OverlayError::OperationError(format!(
                                    "Overlay references missing image {}",
                                    index
                                ))
                            })?;
                            let id = doc.add_object(asset.to_xobject());
                            image_ids.insert(index, id);
                            id
                        }
                    };
                    xobjects.set(image_resource_name(index), id);
                }
                resources.set("XObject", xobjects);
            }

            let content_id = doc.add_object(Stream::new(Dictionary::new(), program.content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => page.size.rect().iter().map(|&v| real(v)).collect::<Vec<_>>(),
                "Resources" => resources,
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
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }

    /// Serialize the standalone overlay, e.g. for previewing it on its own
    pub fn to_pdf(&self) -> Result<Vec<u8>, OverlayError> {
        let mut doc = self.to_document()?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| OverlayError::OperationError(format!("Failed to save overlay: {}", e)))?;
        Ok(buffer)
    }
}

//! Render backends for cover layouts
//!
//! The lopdf backend writes one page using the standard Helvetica faces
//! (no embedding) and Flate-compressed image XObjects.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use super::assets::{CoverAssets, RasterImage};
use super::layout::{CoverLayout, DrawOp, Rect};
use super::metrics::{encode_win_ansi, Font};
use super::theme::Rgb;
use crate::error::PdfError;

/// Turns a [`CoverLayout`] into document bytes.
pub trait RenderBackend {
    fn render(&self, layout: &CoverLayout, assets: &CoverAssets) -> Result<Vec<u8>, PdfError>;
}

/// Single-page PDF writer built on lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfBackend;

impl RenderBackend for PdfBackend {
    fn render(&self, layout: &CoverLayout, assets: &CoverAssets) -> Result<Vec<u8>, PdfError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in [Font::Helvetica, Font::HelveticaBold] {
            let mut font_dict = Dictionary::new();
            font_dict.set("Type", Object::Name(b"Font".to_vec()));
            font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
            font_dict.set("BaseFont", Object::Name(font.base_font().as_bytes().to_vec()));
            font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
            let font_id = doc.add_object(Object::Dictionary(font_dict));
            fonts.set(font.resource_name(), Object::Reference(font_id));
        }

        let mut xobjects = Dictionary::new();
        let mut operations = Vec::new();

        for op in &layout.ops {
            match op {
                DrawOp::FillRect { rect, color } => {
                    operations.push(Operation::new("q", vec![]));
                    operations.push(fill_color(*color));
                    operations.push(Operation::new(
                        "re",
                        vec![
                            rect.x.into(),
                            rect.y.into(),
                            rect.width.into(),
                            rect.height.into(),
                        ],
                    ));
                    operations.push(Operation::new("f", vec![]));
                    operations.push(Operation::new("Q", vec![]));
                }
                DrawOp::FillPolygon { points, color } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    operations.push(Operation::new("q", vec![]));
                    operations.push(fill_color(*color));
                    operations.push(Operation::new("m", vec![first.x.into(), first.y.into()]));
                    for point in rest {
                        operations.push(Operation::new("l", vec![point.x.into(), point.y.into()]));
                    }
                    operations.push(Operation::new("h", vec![]));
                    operations.push(Operation::new("f", vec![]));
                    operations.push(Operation::new("Q", vec![]));
                }
                DrawOp::Image { slot, rect } => {
                    let image = assets.get(*slot).ok_or_else(|| {
                        PdfError::RenderError(format!("No image loaded for {:?}", slot))
                    })?;
                    let name = slot.resource_name();
                    if !xobjects.has(name.as_bytes()) {
                        let image_id = add_image(&mut doc, image)?;
                        xobjects.set(name, Object::Reference(image_id));
                    }
                    operations.extend(draw_image(name, rect));
                }
                DrawOp::Text {
                    text,
                    font,
                    size,
                    color,
                    x,
                    y,
                } => {
                    operations.push(Operation::new("q", vec![]));
                    operations.push(fill_color(*color));
                    operations.push(Operation::new("BT", vec![]));
                    operations.push(Operation::new(
                        "Tf",
                        vec![
                            Object::Name(font.resource_name().as_bytes().to_vec()),
                            (*size).into(),
                        ],
                    ));
                    operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                    operations.push(Operation::new(
                        "Tj",
                        vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                    ));
                    operations.push(Operation::new("ET", vec![]));
                    operations.push(Operation::new("Q", vec![]));
                }
            }
        }

        let content = Content { operations }
            .encode()
            .map_err(|e| PdfError::RenderError(format!("Failed to encode content: {}", e)))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        if !xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                layout.width.into(),
                layout.height.into(),
            ]),
        );
        page.set("Contents", Object::Reference(content_id));
        page.set("Resources", Object::Dictionary(resources));
        let page_id = doc.add_object(Object::Dictionary(page));

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages.set("Count", Object::Integer(1));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::RenderError(format!("Failed to save cover: {}", e)))?;

        debug!("Rendered cover: {} ops, {} bytes", layout.ops.len(), buffer.len());
        Ok(buffer)
    }
}

fn fill_color(color: Rgb) -> Operation {
    Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()])
}

fn draw_image(name: &str, rect: &Rect) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                rect.width.into(),
                Object::Integer(0),
                Object::Integer(0),
                rect.height.into(),
                rect.x.into(),
                rect.y.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

fn add_image(doc: &mut Document, image: &RasterImage) -> Result<ObjectId, PdfError> {
    let smask = match image.alpha.as_deref() {
        Some(alpha) => {
            let stream = image_stream(image.width, image.height, "DeviceGray", alpha)?;
            Some(doc.add_object(stream))
        }
        None => None,
    };

    let mut stream = image_stream(
        image.width,
        image.height,
        image.color_space.pdf_name(),
        &image.pixels,
    )?;
    if let Some(smask_id) = smask {
        stream.dict.set("SMask", Object::Reference(smask_id));
    }
    Ok(doc.add_object(stream))
}

fn image_stream(width: u32, height: u32, color_space: &str, data: &[u8]) -> Result<Stream, PdfError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| PdfError::ImageError(format!("Failed to compress image: {}", e)))?;
    let compressed = encoder
        .finish()
        .map_err(|e| PdfError::ImageError(format!("Failed to compress image: {}", e)))?;

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(i64::from(width)));
    dict.set("Height", Object::Integer(i64::from(height)));
    dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    Ok(Stream::new(dict, compressed))
}

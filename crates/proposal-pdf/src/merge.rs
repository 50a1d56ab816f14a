//! PDF Merge algorithm
//!
//! Concatenates the pages of several PDFs into a fresh document.

use std::collections::BTreeSet;

use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::PdfError;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&str; 4] = ["Resources", "MediaBox", "CropBox", "Rotate"];

/// Object types that belong to a source's document structure, not its pages.
const STRUCTURAL_TYPES: [&[u8]; 4] = [b"Catalog", b"Pages", b"Outlines", b"Outline"];

const MAX_TREE_DEPTH: usize = 32;

/// One named input to [`merge_documents`].
#[derive(Debug, Clone)]
pub struct MergeSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl MergeSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A source left out of the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSource {
    pub name: String,
    pub reason: String,
}

/// Output of a merge.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub skipped: Vec<SkippedSource>,
}

/// Merge sources into one document, pages in source order.
///
/// The algorithm:
/// 1. Create an empty destination with its own catalog and page tree
/// 2. For each source that parses:
///    a. Resolve attributes each page inherits from the source page tree
///    b. Import all non-structural objects with ids offset past the current maximum
///    c. Re-parent the pages onto the destination tree, in page-number order
/// 3. Compress and serialize
///
/// A source that fails to parse is recorded in [`MergeReport::skipped`].
/// With no usable sources the result is a valid zero-page document.
pub fn merge_documents(sources: Vec<MergeSource>) -> Result<MergeReport, PdfError> {
    let mut dest = Document::with_version("1.5");
    let pages_id = dest.new_object_id();

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = dest.add_object(Object::Dictionary(catalog));
    dest.trailer.set("Root", Object::Reference(catalog_id));

    let mut kids = Vec::new();
    let mut skipped = Vec::new();

    for source in sources {
        let doc = match Document::load_mem(&source.bytes) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Skipping unreadable PDF {}: {}", source.name, e);
                skipped.push(SkippedSource {
                    name: source.name,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let id_offset = dest.max_id;
        let source_max_id = doc.max_id;

        // Page ids in page-number order, with what each inherits
        let pages: Vec<(ObjectId, Vec<(&'static str, Object)>)> = doc
            .get_pages()
            .into_values()
            .map(|page_id| (page_id, inherited_attributes(&doc, page_id)))
            .collect();

        let structural: BTreeSet<ObjectId> = doc
            .objects
            .iter()
            .filter(|(_, object)| is_structural(object))
            .map(|(id, _)| *id)
            .collect();

        for (old_id, object) in doc.objects.into_iter() {
            if structural.contains(&old_id) {
                continue;
            }
            let new_id = (old_id.0 + id_offset, old_id.1);
            dest.objects.insert(new_id, remap_object_refs(object, id_offset));
        }

        let mut added = 0;
        for (old_page_id, inherited) in pages {
            let new_page_id = (old_page_id.0 + id_offset, old_page_id.1);
            let Some(Object::Dictionary(page)) = dest.objects.get_mut(&new_page_id) else {
                warn!("Page object {:?} missing from {}", old_page_id, source.name);
                continue;
            };
            for (key, value) in inherited {
                page.set(key, remap_object_refs(value, id_offset));
            }
            page.set("Parent", Object::Reference(pages_id));
            kids.push(new_page_id);
            added += 1;
        }

        debug!("Merged {} page(s) from {}", added, source.name);
        dest.max_id = dest.max_id.max(source_max_id + id_offset);
    }

    let page_count = kids.len();
    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set(
        "Kids",
        Object::Array(kids.into_iter().map(Object::Reference).collect()),
    );
    pages.set("Count", Object::Integer(page_count as i64));
    dest.objects.insert(pages_id, Object::Dictionary(pages));

    dest.compress();

    let mut buffer = Vec::new();
    dest.save_to(&mut buffer)
        .map_err(|e| PdfError::OperationError(format!("Failed to save merged PDF: {}", e)))?;

    Ok(MergeReport {
        bytes: buffer,
        page_count,
        skipped,
    })
}

fn is_structural(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    match dict.get(b"Type").and_then(Object::as_name) {
        Ok(name) => STRUCTURAL_TYPES.contains(&name),
        Err(_) => false,
    }
}

/// Inheritable attributes a page does not set itself, taken from the nearest
/// ancestor that does.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(&'static str, Object)> {
    let mut found = Vec::new();
    let Ok(page) = doc.get_dictionary(page_id) else {
        return found;
    };

    let mut missing: Vec<&'static str> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key.as_bytes()))
        .collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };
        missing.retain(|key| match node.get(key.as_bytes()) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    found
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
            remap_dict(&mut dict, offset);
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            remap_dict(&mut stream.dict, offset);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn remap_dict(dict: &mut Dictionary, offset: u32) {
    for (_, value) in dict.iter_mut() {
        let taken = std::mem::replace(value, Object::Null);
        *value = remap_object_refs(taken, offset);
    }
}

//! XObject creation and cross-document copying
//!
//! Source pages become Form XObjects in the output document so they can be
//! drawn at any position; PNG images become Image XObjects.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::types::{BookletError, PageSize, Result};
use image::GenericImageView;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Page attributes a page may inherit from its ancestors in the page tree
pub(crate) const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

// =============================================================================
// XObject Creation
// =============================================================================

/// Create a Form XObject from a source page.
///
/// # Arguments
/// * `output` - The output document to add the XObject to
/// * `source` - The source document containing the page
/// * `page_id` - The object ID of the source page
/// * `cache` - Source-to-output object mapping so shared resources copy once
///
/// Returns the new object ID and the XObject's bounding box size.
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<(ObjectId, PageSize)> {
    let page_dict = source.get_dictionary(page_id)?;

    let media_box = inherited_attribute(source, page_id, b"MediaBox")?
        .and_then(|obj| resolve(source, &obj).as_array().ok().cloned())
        .unwrap_or_else(default_media_box);
    let size = media_box_size(&media_box);

    let content_data = get_page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    let (x0, y0) = media_box_origin(&media_box);
    xobject_dict.set("BBox", Object::Array(media_box));
    xobject_dict.set("FormType", Object::Integer(1));
    // Map the lower-left corner of the page to the form's origin
    if x0 != 0.0 || y0 != 0.0 {
        xobject_dict.set(
            "Matrix",
            Object::Array(vec![
                Object::Integer(1),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(1),
                Object::Real(-x0),
                Object::Real(-y0),
            ]),
        );
    }

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources")? {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, &resources, cache)?,
        );
    }

    let id = output.add_object(Stream::new(xobject_dict, content_data));
    Ok((id, size))
}

/// Create an Image XObject from encoded PNG (or any decodable) bytes.
///
/// Colour is written as 8-bit DeviceRGB; an alpha channel becomes a soft mask.
/// Streams are left unfiltered and get compressed when the document is saved.
pub fn create_image_xobject(output: &mut Document, bytes: &[u8]) -> Result<(ObjectId, PageSize)> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(BookletError::Codec("cannot embed an empty image".to_string()));
    }

    let mut dict = image_dictionary(width, height, b"DeviceRGB");

    if image.color().has_alpha() {
        let alpha: Vec<u8> = image.to_rgba8().pixels().map(|p| p[3]).collect();
        let mask_id = output.add_object(Stream::new(
            image_dictionary(width, height, b"DeviceGray"),
            alpha,
        ));
        dict.set("SMask", Object::Reference(mask_id));
    }

    let id = output.add_object(Stream::new(dict, image.to_rgb8().into_raw()));
    Ok((id, PageSize::new(width as f32, height as f32)))
}

fn image_dictionary(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict
}

/// Get default MediaBox
fn default_media_box() -> Vec<Object> {
    vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(DEFAULT_PAGE_DIMENSIONS.0),
        Object::Real(DEFAULT_PAGE_DIMENSIONS.1),
    ]
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(arr) => get_concatenated_content_streams(doc, arr),
            _ => get_single_content_stream(doc, *id),
        },
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Get content from a single content stream reference
fn get_single_content_stream(doc: &Document, id: ObjectId) -> Result<Vec<u8>> {
    if let Ok(stream) = doc.get_object(id)?.as_stream() {
        Ok(stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone()))
    } else {
        Ok(Vec::new())
    }
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            result.extend_from_slice(&get_single_content_stream(doc, *id)?);
            result.push(b'\n');
        }
    }

    Ok(result)
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// Uses a cache to avoid copying the same object multiple times. Callers can
/// pre-seed the cache to redirect references (e.g. a page's `Parent`).
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            // Reserve the id before descending so cycles terminate
            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let referenced = source.get_object(*id)?;
            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

pub(crate) fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

// =============================================================================
// Page Attributes
// =============================================================================

/// Look up a page attribute, walking up the `Parent` chain when the page
/// itself does not carry it.
pub(crate) fn inherited_attribute(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<Object>> {
    let mut current = doc.get_dictionary(page_id)?;
    // Bounded walk; page trees are shallow and malformed loops must not hang
    for _ in 0..64 {
        if let Ok(value) = current.get(key) {
            return Ok(Some(value.clone()));
        }
        match current.get(b"Parent").and_then(|p| p.as_reference()) {
            Ok(parent) => current = doc.get_dictionary(parent)?,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

/// Follow a single reference, returning the object itself otherwise
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Get page dimensions (width, height) in points
pub fn get_page_dimensions(doc: &Document, page_id: ObjectId) -> Result<PageSize> {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox")?
        .and_then(|obj| resolve(doc, &obj).as_array().ok().cloned());

    Ok(match media_box {
        Some(mb) => media_box_size(&mb),
        None => PageSize::new(DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1),
    })
}

fn media_box_size(mb: &[Object]) -> PageSize {
    let coord = |i: usize| mb.get(i).and_then(extract_number);
    match (coord(0), coord(1), coord(2), coord(3)) {
        (Some(x0), Some(y0), Some(x1), Some(y1)) => PageSize::new((x1 - x0).abs(), (y1 - y0).abs()),
        _ => PageSize::new(DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1),
    }
}

/// Lower-left corner of a MediaBox, `(0, 0)` when it cannot be read
fn media_box_origin(mb: &[Object]) -> (f32, f32) {
    let coord = |i: usize| mb.get(i).and_then(extract_number);
    match (coord(0), coord(1), coord(2), coord(3)) {
        (Some(x0), Some(y0), Some(x1), Some(y1)) => (x0.min(x1), y0.min(y1)),
        _ => (0.0, 0.0),
    }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

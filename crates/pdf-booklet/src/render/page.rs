//! Page tree and page content helpers
//!
//! Newly created documents keep every page as a direct kid of the root
//! `Pages` node. Loaded documents may have nested trees; those are flattened
//! before a page is inserted at an arbitrary position.

use super::xobject::{INHERITABLE_KEYS, inherited_attribute, resolve};
use crate::constants::{BLANK_GSTATE_NAME, PDF_VERSION};
use crate::types::{BookletError, PageSize, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

// =============================================================================
// Document Structure
// =============================================================================

/// Create a document with an empty page tree and a catalog
pub fn create_empty_document() -> Document {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(Vec::new())),
        ("Count", Object::Integer(0)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Object ID of the root `Pages` node
pub fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    let catalog = doc.get_dictionary(catalog_id)?;
    Ok(catalog.get(b"Pages")?.as_reference()?)
}

/// Page object IDs in document order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Object ID of the page at `index`
pub fn page_id_at(doc: &Document, index: usize) -> Result<ObjectId> {
    let ids = page_ids(doc);
    ids.get(index)
        .copied()
        .ok_or(BookletError::PageOutOfRange {
            index,
            count: ids.len(),
        })
}

/// Create a blank page with the given size and append it to the root `Pages` node
pub fn create_blank_page(doc: &mut Document, size: PageSize) -> Result<ObjectId> {
    let pages_id = root_pages_id(doc)?;

    let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(size.width),
            Object::Real(size.height),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(Dictionary::new()));

    let page_id = doc.add_object(page_dict);

    let mut kids = root_kids(doc, pages_id)?;
    kids.push(Object::Reference(page_id));
    set_root_kids(doc, pages_id, kids)?;

    Ok(page_id)
}

/// Insert an existing page object at `index` of the page order
pub fn insert_page_at(doc: &mut Document, index: usize, page_id: ObjectId) -> Result<()> {
    let pages_id = root_pages_id(doc)?;
    flatten_page_tree(doc, pages_id)?;

    let mut kids = root_kids(doc, pages_id)?;
    if index > kids.len() {
        return Err(BookletError::PageOutOfRange {
            index,
            count: kids.len(),
        });
    }
    kids.insert(index, Object::Reference(page_id));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Parent", Object::Reference(pages_id));

    set_root_kids(doc, pages_id, kids)
}

fn root_kids(doc: &Document, pages_id: ObjectId) -> Result<Vec<Object>> {
    match doc.get_dictionary(pages_id)?.get(b"Kids") {
        Ok(Object::Array(arr)) => Ok(arr.clone()),
        Ok(obj @ Object::Reference(_)) => Ok(resolve(doc, obj).as_array()?.clone()),
        _ => Ok(Vec::new()),
    }
}

fn set_root_kids(doc: &mut Document, pages_id: ObjectId, kids: Vec<Object>) -> Result<()> {
    let pages_dict = doc.get_object_mut(pages_id)?.as_dict_mut()?;
    pages_dict.set("Count", Object::Integer(kids.len() as i64));
    pages_dict.set("Kids", Object::Array(kids));
    Ok(())
}

/// Make every page a direct kid of the root `Pages` node.
///
/// Attributes inherited from intermediate nodes are copied onto each page
/// first so re-parenting does not change how the page renders.
fn flatten_page_tree(doc: &mut Document, pages_id: ObjectId) -> Result<()> {
    let ids = page_ids(doc);
    let kids = root_kids(doc, pages_id)?;
    let already_flat = kids.len() == ids.len()
        && kids
            .iter()
            .zip(&ids)
            .all(|(kid, id)| kid.as_reference().ok() == Some(*id));
    if already_flat {
        return Ok(());
    }

    for &page_id in &ids {
        let mut inherited = Vec::new();
        for key in INHERITABLE_KEYS {
            if let Some(value) = inherited_attribute(doc, page_id, key)? {
                inherited.push((key, value));
            }
        }

        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        for (key, value) in inherited {
            if !page.has(key) {
                page.set(key.to_vec(), value);
            }
        }
        page.set("Parent", Object::Reference(pages_id));
    }

    let kids = ids.into_iter().map(Object::Reference).collect();
    set_root_kids(doc, pages_id, kids)
}

// =============================================================================
// Page Content
// =============================================================================

/// Register an XObject in the page's resources and return its resource name
pub fn add_xobject_resource(
    doc: &mut Document,
    page_id: ObjectId,
    xobject_id: ObjectId,
) -> Result<String> {
    let mut resources = page_resources(doc, page_id)?;
    let mut xobjects = sub_dictionary(doc, &resources, b"XObject");

    let mut n = xobjects.len();
    let name = loop {
        let candidate = format!("X{}", n);
        if !xobjects.has(candidate.as_bytes()) {
            break candidate;
        }
        n += 1;
    };

    xobjects.set(name.as_bytes(), Object::Reference(xobject_id));
    resources.set("XObject", Object::Dictionary(xobjects));
    set_page_resources(doc, page_id, resources)?;

    Ok(name)
}

/// Register the fully transparent graphics state used by blank marker pages
pub fn add_transparent_gstate(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut resources = page_resources(doc, page_id)?;
    let mut states = sub_dictionary(doc, &resources, b"ExtGState");

    let gstate = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"ExtGState".to_vec())),
        ("CA", Object::Integer(0)),
        ("ca", Object::Integer(0)),
    ]);
    states.set(BLANK_GSTATE_NAME, Object::Dictionary(gstate));
    resources.set("ExtGState", Object::Dictionary(states));

    set_page_resources(doc, page_id, resources)
}

/// Append operators to the page as an additional content stream
pub fn append_content(doc: &mut Document, page_id: ObjectId, ops: String) -> Result<()> {
    let content_id = doc.add_object(Stream::new(Dictionary::new(), ops.into_bytes()));

    let mut contents = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(Object::Array(arr)) => arr.clone(),
        Ok(obj @ Object::Reference(_)) => match resolve(doc, obj) {
            Object::Array(arr) => arr.clone(),
            _ => vec![obj.clone()],
        },
        _ => Vec::new(),
    };
    contents.push(Object::Reference(content_id));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", Object::Array(contents));
    Ok(())
}

/// Content stream operators placing an XObject with the given transform
pub fn placement_command(name: &str, scale_x: f32, scale_y: f32, x: f32, y: f32) -> String {
    format!("q {} 0 0 {} {} {} cm /{} Do Q\n", scale_x, scale_y, x, y, name)
}

/// A direct copy of the page's (possibly inherited or referenced) resources
fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    Ok(match inherited_attribute(doc, page_id, b"Resources")? {
        Some(obj) => resolve(doc, &obj).as_dict().cloned().unwrap_or_default(),
        None => Dictionary::new(),
    })
}

fn set_page_resources(doc: &mut Document, page_id: ObjectId, resources: Dictionary) -> Result<()> {
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", Object::Dictionary(resources));
    Ok(())
}

fn sub_dictionary(doc: &Document, resources: &Dictionary, key: &[u8]) -> Dictionary {
    resources
        .get(key)
        .ok()
        .and_then(|obj| resolve(doc, obj).as_dict().ok().cloned())
        .unwrap_or_default()
}

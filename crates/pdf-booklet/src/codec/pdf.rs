//! [`DocumentCodec`] over `lopdf`

use super::{DocumentCodec, Placeable};
use crate::constants::BLANK_GSTATE_NAME;
use crate::render::{
    INHERITABLE_KEYS, add_transparent_gstate, add_xobject_resource, append_content,
    copy_dictionary, create_blank_page, create_empty_document, create_image_xobject,
    create_page_xobject, get_page_dimensions, inherited_attribute, insert_page_at, page_id_at,
    page_ids, placement_command, root_pages_id,
};
use crate::types::{BookletError, DrawOptions, PageSize, Result};
use lopdf::{Document, Object, ObjectId};
use std::collections::HashMap;

/// Kind of embedded XObject; decides how the placement matrix is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XObjectKind {
    /// Embedded page, drawn in its own coordinate space
    Form,
    /// Raster image, drawn into the unit square
    Image,
}

/// An XObject embedded in a `lopdf` document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfXObject {
    pub id: ObjectId,
    pub kind: XObjectKind,
    pub size: PageSize,
}

impl Placeable for PdfXObject {
    fn size(&self) -> PageSize {
        self.size
    }
}

/// Document codec backed by `lopdf`
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfCodec;

impl DocumentCodec for LopdfCodec {
    type Document = Document;
    type Page = ObjectId;
    type XObject = PdfXObject;

    fn create(&self) -> Document {
        create_empty_document()
    }

    fn load(&self, bytes: &[u8]) -> Result<Document> {
        Ok(Document::load_mem(bytes)?)
    }

    fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }

    fn page_size(&self, doc: &Document, index: usize) -> Result<PageSize> {
        get_page_dimensions(doc, page_id_at(doc, index)?)
    }

    fn add_page(&self, doc: &mut Document, size: PageSize) -> Result<usize> {
        create_blank_page(doc, size)?;
        Ok(self.page_count(doc) - 1)
    }

    fn embed_page(&self, doc: &mut Document, source: &Document, index: usize) -> Result<PdfXObject> {
        let page_id = page_id_at(source, index)?;
        let mut cache = HashMap::new();
        let (id, size) = create_page_xobject(doc, source, page_id, &mut cache)?;
        Ok(PdfXObject {
            id,
            kind: XObjectKind::Form,
            size,
        })
    }

    fn embed_png(&self, doc: &mut Document, bytes: &[u8]) -> Result<PdfXObject> {
        let (id, size) = create_image_xobject(doc, bytes)?;
        Ok(PdfXObject {
            id,
            kind: XObjectKind::Image,
            size,
        })
    }

    fn draw(
        &self,
        doc: &mut Document,
        page: usize,
        xobject: &PdfXObject,
        options: DrawOptions,
    ) -> Result<()> {
        let page_id = page_id_at(doc, page)?;

        let (scale_x, scale_y) = match xobject.kind {
            XObjectKind::Form => (
                options.width / xobject.size.width,
                options.height / xobject.size.height,
            ),
            XObjectKind::Image => (options.width, options.height),
        };
        if !(scale_x.is_finite() && scale_y.is_finite()) {
            return Err(BookletError::Codec(format!(
                "cannot draw a {} x {} object at {} x {}",
                xobject.size.width, xobject.size.height, options.width, options.height
            )));
        }

        let name = add_xobject_resource(doc, page_id, xobject.id)?;
        let ops = placement_command(&name, scale_x, scale_y, options.x, options.y);
        append_content(doc, page_id, ops)
    }

    fn draw_invisible_line(&self, doc: &mut Document, page: usize) -> Result<()> {
        let page_id = page_id_at(doc, page)?;
        add_transparent_gstate(doc, page_id)?;
        let ops = format!("q /{} gs 0 G 0 w 0 0 m 0 0 l S Q\n", BLANK_GSTATE_NAME);
        append_content(doc, page_id, ops)
    }

    fn copy_pages(
        &self,
        from: &Document,
        to: &mut Document,
        indices: &[usize],
    ) -> Result<Vec<ObjectId>> {
        let source_ids = page_ids(from);
        let target_root = root_pages_id(to)?;

        // References back into the source page tree resolve to the target root
        let mut cache = HashMap::new();
        cache.insert(root_pages_id(from)?, target_root);

        let mut copied = Vec::with_capacity(indices.len());
        for &index in indices {
            let page_id = *source_ids
                .get(index)
                .ok_or(BookletError::PageOutOfRange {
                    index,
                    count: source_ids.len(),
                })?;

            let mut page = from.get_dictionary(page_id)?.clone();
            for key in INHERITABLE_KEYS {
                if !page.has(key) {
                    if let Some(value) = inherited_attribute(from, page_id, key)? {
                        page.set(key.to_vec(), value);
                    }
                }
            }
            page.remove(b"Parent");

            let new_id = to.new_object_id();
            cache.insert(page_id, new_id);
            let mut new_page = copy_dictionary(to, from, &page, &mut cache)?;
            new_page.set("Parent", Object::Reference(target_root));
            to.objects.insert(new_id, Object::Dictionary(new_page));

            copied.push(new_id);
        }
        Ok(copied)
    }

    fn insert_page(&self, doc: &mut Document, index: usize, page: ObjectId) -> Result<()> {
        insert_page_at(doc, index, page)
    }

    fn save(&self, doc: &mut Document) -> Result<Vec<u8>> {
        doc.compress();
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok(writer)
    }
}

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdf_booklet::codec::{DocumentCodec, Placeable, RasterCodec, Region, TileContent};
use pdf_booklet::{BookletError, DrawOptions, PageSize, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

// =============================================================================
// In-memory document codec
// =============================================================================

/// Something drawn onto a fake page
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Draw { label: String, options: DrawOptions },
    InvisibleLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakePage {
    pub label: String,
    pub size: PageSize,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeDocument {
    pub pages: Vec<FakePage>,
}

impl FakeDocument {
    /// Document whose pages are labelled `P1..=Pn`
    pub fn labelled(count: usize, size: PageSize) -> Self {
        Self {
            pages: (1..=count)
                .map(|i| FakePage {
                    label: format!("P{}", i),
                    size,
                    marks: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.label.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakeXObject {
    pub label: String,
    pub size: PageSize,
}

impl Placeable for FakeXObject {
    fn size(&self) -> PageSize {
        self.size
    }
}

/// Labels added pages `+`; PNGs are the ASCII text `WxH`
#[derive(Debug, Default)]
pub struct FakeCodec;

impl DocumentCodec for FakeCodec {
    type Document = FakeDocument;
    type Page = FakePage;
    type XObject = FakeXObject;

    fn create(&self) -> FakeDocument {
        FakeDocument::default()
    }

    fn load(&self, _bytes: &[u8]) -> Result<FakeDocument> {
        Err(BookletError::Codec("fake documents cannot be parsed".to_string()))
    }

    fn page_count(&self, doc: &FakeDocument) -> usize {
        doc.pages.len()
    }

    fn page_size(&self, doc: &FakeDocument, index: usize) -> Result<PageSize> {
        page(doc, index).map(|p| p.size)
    }

    fn add_page(&self, doc: &mut FakeDocument, size: PageSize) -> Result<usize> {
        doc.pages.push(FakePage {
            label: "+".to_string(),
            size,
            marks: Vec::new(),
        });
        Ok(doc.pages.len() - 1)
    }

    fn embed_page(
        &self,
        _doc: &mut FakeDocument,
        source: &FakeDocument,
        index: usize,
    ) -> Result<FakeXObject> {
        let page = page(source, index)?;
        Ok(FakeXObject {
            label: page.label.clone(),
            size: page.size,
        })
    }

    fn embed_png(&self, _doc: &mut FakeDocument, bytes: &[u8]) -> Result<FakeXObject> {
        let text = String::from_utf8_lossy(bytes);
        let (w, h) = text
            .split_once('x')
            .and_then(|(w, h)| Some((w.parse::<f32>().ok()?, h.parse::<f32>().ok()?)))
            .ok_or_else(|| BookletError::Codec(format!("not a fake png: {}", text)))?;
        Ok(FakeXObject {
            label: text.into_owned(),
            size: PageSize::new(w, h),
        })
    }

    fn draw(
        &self,
        doc: &mut FakeDocument,
        page: usize,
        xobject: &FakeXObject,
        options: DrawOptions,
    ) -> Result<()> {
        page_mut(doc, page)?.marks.push(Mark::Draw {
            label: xobject.label.clone(),
            options,
        });
        Ok(())
    }

    fn draw_invisible_line(&self, doc: &mut FakeDocument, page: usize) -> Result<()> {
        page_mut(doc, page)?.marks.push(Mark::InvisibleLine);
        Ok(())
    }

    fn copy_pages(
        &self,
        from: &FakeDocument,
        _to: &mut FakeDocument,
        indices: &[usize],
    ) -> Result<Vec<FakePage>> {
        indices.iter().map(|&i| page(from, i).cloned()).collect()
    }

    fn insert_page(&self, doc: &mut FakeDocument, index: usize, page: FakePage) -> Result<()> {
        if index > doc.pages.len() {
            return Err(BookletError::PageOutOfRange {
                index,
                count: doc.pages.len(),
            });
        }
        doc.pages.insert(index, page);
        Ok(())
    }

    fn save(&self, doc: &mut FakeDocument) -> Result<Vec<u8>> {
        Ok(doc.labels().join(",").into_bytes())
    }
}

fn page(doc: &FakeDocument, index: usize) -> Result<&FakePage> {
    doc.pages.get(index).ok_or(BookletError::PageOutOfRange {
        index,
        count: doc.pages.len(),
    })
}

fn page_mut(doc: &mut FakeDocument, index: usize) -> Result<&mut FakePage> {
    let count = doc.pages.len();
    doc.pages
        .get_mut(index)
        .ok_or(BookletError::PageOutOfRange { index, count })
}

// =============================================================================
// In-memory raster codec
// =============================================================================

/// Images are registered by path with their dimensions. Regions come back as
/// the fake PNG text `WxH`.
#[derive(Debug, Default)]
pub struct FakeRaster {
    images: HashMap<PathBuf, (u32, u32)>,
    failing: HashSet<(PathBuf, u32)>,
    pub extracted: RefCell<Vec<(PathBuf, Region)>>,
}

impl FakeRaster {
    pub fn with_image(mut self, path: &str, width: u32, height: u32) -> Self {
        self.images.insert(PathBuf::from(path), (width, height));
        self
    }

    /// Make extraction of the band starting at `top` fail
    pub fn failing_at(mut self, path: &str, top: u32) -> Self {
        self.failing.insert((PathBuf::from(path), top));
        self
    }
}

impl RasterCodec for FakeRaster {
    fn probe_dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        self.images
            .get(path)
            .copied()
            .ok_or_else(|| BookletError::Codec(format!("no such image: {}", path.display())))
    }

    fn extract_region(
        &self,
        path: &Path,
        region: Region,
        output: Option<&Path>,
    ) -> Result<TileContent> {
        if self.failing.contains(&(path.to_path_buf(), region.top)) {
            return Err(BookletError::Codec("decoder gave up".to_string()));
        }
        self.extracted
            .borrow_mut()
            .push((path.to_path_buf(), region));
        Ok(match output {
            Some(out) => TileContent::File(out.to_path_buf()),
            None => TileContent::Bytes(format!("{}x{}", region.width, region.height).into_bytes()),
        })
    }
}

// =============================================================================
// lopdf fixtures
// =============================================================================

/// Letter-sized pages whose content shows the marker `(P{i})`
pub fn create_test_pdf(num_pages: usize) -> Document {
    create_sized_pdf(num_pages, 612, 792)
}

pub fn create_sized_pdf(num_pages: usize, width: i64, height: i64) -> Document {
    create_boxed_pdf(num_pages, [0, 0, width, height])
}

/// Pages whose MediaBox is `[x0 y0 x1 y1]`
pub fn create_boxed_pdf(num_pages: usize, media_box: [i64; 4]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 1..=num_pages {
        let content = format!("BT /F1 12 Tf 72 720 Td (P{}) Tj ET", i);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(media_box.iter().map(|&v| Object::Integer(v)).collect()),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

fn marker_content(doc: &mut Document, i: usize) -> ObjectId {
    let content = format!("BT /F1 12 Tf 72 300 Td (P{}) Tj ET", i);
    doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()))
}

/// Three 300x400 pages in a nested tree. `P1` and `P2` sit under an
/// intermediate `Pages` node that carries their MediaBox and a font
/// resource; `P3` is a direct kid of the root with its own MediaBox.
pub fn create_nested_pdf() -> Document {
    let mut doc = Document::with_version("1.7");
    let root_id = doc.new_object_id();
    let middle_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources = Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]);
    let media_box = || {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(300),
            Object::Integer(400),
        ])
    };

    let mut middle_kids = Vec::new();
    for i in 1..=2 {
        let content_id = marker_content(&mut doc, i);
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(middle_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        middle_kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        middle_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Parent", Object::Reference(root_id)),
            ("Kids", Object::Array(middle_kids)),
            ("Count", Object::Integer(2)),
            ("MediaBox", media_box()),
            ("Resources", Object::Dictionary(resources.clone())),
        ])),
    );

    let content_id = marker_content(&mut doc, 3);
    let last_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(root_id)),
        ("MediaBox", media_box()),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]));

    doc.objects.insert(
        root_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            (
                "Kids",
                Object::Array(vec![Object::Reference(middle_id), Object::Reference(last_id)]),
            ),
            ("Count", Object::Integer(3)),
        ])),
    );

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(root_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn to_bytes(doc: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn page_id(doc: &Document, index: usize) -> ObjectId {
    *doc.get_pages().values().nth(index).unwrap()
}

/// Decoded content of page `index`
pub fn page_text(doc: &Document, index: usize) -> String {
    let content = doc.get_page_content(page_id(doc, index)).unwrap();
    String::from_utf8_lossy(&content).into_owned()
}

/// The `(P{i})` marker shown directly by page `index`, if any
pub fn page_marker(doc: &Document, index: usize) -> Option<String> {
    marker_in(&page_text(doc, index))
}

/// Markers of the XObjects page `index` draws, in drawing order
pub fn drawn_markers(doc: &Document, index: usize) -> Vec<String> {
    let id = page_id(doc, index);
    let text = page_text(doc, index);
    let resources = doc
        .get_dictionary(id)
        .unwrap()
        .get(b"Resources")
        .unwrap()
        .as_dict()
        .unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();

    let tokens: Vec<&str> = text.split_whitespace().collect();
    tokens
        .windows(2)
        .filter(|pair| pair[1] == "Do")
        .filter_map(|pair| {
            let name = pair[0].trim_start_matches('/');
            let xobject_id = xobjects.get(name.as_bytes()).ok()?.as_reference().ok()?;
            let stream = doc.get_object(xobject_id).ok()?.as_stream().ok()?;
            let content = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            marker_in(&String::from_utf8_lossy(&content))
        })
        .collect()
}

fn marker_in(text: &str) -> Option<String> {
    let start = text.find("(P")?;
    let end = text[start..].find(')')?;
    Some(text[start + 1..start + end].to_string())
}

pub fn media_box(doc: &Document, index: usize) -> (f32, f32) {
    let dict = doc.get_dictionary(page_id(doc, index)).unwrap();
    let values = numbers(dict.get(b"MediaBox").unwrap());
    (values[2] - values[0], values[3] - values[1])
}

/// Numeric entries of an array object
pub fn numbers(obj: &Object) -> Vec<f32> {
    obj.as_array()
        .unwrap()
        .iter()
        .map(|obj| match obj {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            _ => panic!("unexpected array entry {:?}", obj),
        })
        .collect()
}

/// Dictionary of the XObject registered as `name` on page `index`
pub fn xobject_dict<'a>(doc: &'a Document, index: usize, name: &str) -> &'a Dictionary {
    let resources = doc
        .get_dictionary(page_id(doc, index))
        .unwrap()
        .get(b"Resources")
        .unwrap()
        .as_dict()
        .unwrap();
    let id = resources
        .get(b"XObject")
        .unwrap()
        .as_dict()
        .unwrap()
        .get(name.as_bytes())
        .unwrap()
        .as_reference()
        .unwrap();
    &doc.get_object(id).unwrap().as_stream().unwrap().dict
}

/// Whether page `index` carries a `Font` resource named `F1`
pub fn has_font_resource(doc: &Document, index: usize) -> bool {
    let dict = doc.get_dictionary(page_id(doc, index)).unwrap();
    let Ok(resources) = dict.get(b"Resources") else {
        return false;
    };
    let resources = match resources {
        Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
        other => other.as_dict().unwrap(),
    };
    resources
        .get(b"Font")
        .and_then(|fonts| fonts.as_dict())
        .is_ok_and(|fonts| fonts.has(b"F1"))
}

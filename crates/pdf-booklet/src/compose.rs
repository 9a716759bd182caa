//! Page compositor - one image tile per output page

use crate::codec::{DocumentCodec, Placeable};
use crate::types::{DrawOptions, PageSize, Result};

/// Build a document with one page of `page_size` per PNG tile.
///
/// Each tile is scaled to fit the page with its aspect ratio preserved and
/// anchored to the top-left corner.
pub fn compose_tiles<C, I, B>(codec: &C, tiles: I, page_size: PageSize) -> Result<C::Document>
where
    C: DocumentCodec,
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let mut doc = codec.create();

    for tile in tiles {
        let page = codec.add_page(&mut doc, page_size)?;
        let image = codec.embed_png(&mut doc, tile.as_ref())?;
        let fitted = image.size().scale_to_fit(page_size);

        codec.draw(
            &mut doc,
            page,
            &image,
            DrawOptions::at(0.0, page_size.height - fitted.height, fitted),
        )?;
    }

    Ok(doc)
}

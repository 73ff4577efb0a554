use crate::{
    backend::{Bitmap, PageSink},
    image::Image,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
    units::Pt,
    LabelError,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;
use tracing::debug;

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub images: Arena<Image>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// Add an image to the document structure. Images are stored "globally" within the
    /// document and referred to from pages by their id.
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// The page most recently added, which images are placed on
    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        let id = *self.page_order.last()?;
        self.pages.get_mut(id)
    }

    /// Write the entire document to the writer. The document is rendered in memory
    /// first, so every image is held twice while this runs.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), LabelError> {
        let Document {
            info,
            pages,
            page_order,
            images,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = page_order
            .iter()
            .enumerate()
            .map(|(i, _id)| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (i, image) in images.iter() {
            image.write(&mut refs, i.index(), &mut writer);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(LabelError::PageMissing)?;
            page.write(&mut refs, page_index, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}

impl PageSink for Document {
    fn add_page(&mut self, width: Pt, height: Pt) -> Result<(), LabelError> {
        let id = Document::add_page(self, Page::new((width, height)));
        debug!(page = id.index(), %width, %height, "added page");
        Ok(())
    }

    fn place_image(
        &mut self,
        bitmap: Bitmap,
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    ) -> Result<(), LabelError> {
        if self.page_order.is_empty() {
            return Err(LabelError::NoCurrentPage);
        }
        let image = self.add_image(Image::new(bitmap));
        let page = self.current_page_mut().ok_or(LabelError::PageMissing)?;
        page.add_image(image, x, y, width, height);
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, LabelError> {
        let mut bytes: Vec<u8> = Vec::new();
        self.write(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_pdf_with_placed_images() {
        let mut doc = Document::new();
        doc.set_info(Info::new().title("Labels").clone());
        PageSink::add_page(&mut doc, Pt(200.0), Pt(100.0)).unwrap();
        doc.place_image(Bitmap::new_rgb8(8, 4), Pt(0.0), Pt(0.0), Pt(200.0), Pt(100.0))
            .unwrap();
        PageSink::add_page(&mut doc, Pt(100.0), Pt(200.0)).unwrap();
        assert_eq!(doc.page_count(), 2);

        let bytes = PageSink::finish(doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/Subtype /Image"));
        assert!(text.contains("/I0 Do"));
        assert!(text.contains("/MediaBox [0 0 200 100]"));
    }

    #[test]
    fn images_need_a_page() {
        let mut doc = Document::new();
        let err = doc
            .place_image(Bitmap::new_rgb8(1, 1), Pt(0.0), Pt(0.0), Pt(1.0), Pt(1.0))
            .unwrap_err();
        assert!(matches!(err, LabelError::NoCurrentPage));
    }
}

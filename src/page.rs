use crate::image::Image;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::LabelError;
use id_arena::Id;
use pdf_writer::{Finish, Name, Pdf};
use std::io::Write;

/// An image drawn somewhere on a page
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image: Id<Image>,
    /// Where the image is stretched to, in PDF space
    pub position: Rect,
}

/// A single page of the output, holding only placed images
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    pub images: Vec<ImageLayout>,
}

impl Page {
    pub fn new(size: PageSize) -> Page {
        Page {
            media_box: Rect::sized(size.0, size.1),
            images: Vec::default(),
        }
    }

    pub fn width(&self) -> Pt {
        self.media_box.width()
    }

    pub fn height(&self) -> Pt {
        self.media_box.height()
    }

    /// Place an image by its top-left corner, measured from the top-left of the page
    pub fn add_image(&mut self, image: Id<Image>, x: Pt, y: Pt, width: Pt, height: Pt) {
        let position = Rect::from_top_left(self.height(), x, y, width, height);
        self.images.push(ImageLayout { image, position });
    }

    #[allow(clippy::write_with_newline)]
    fn render(&self) -> Result<Vec<u8>, std::io::Error> {
        let mut content: Vec<u8> = Vec::default();

        for layout in self.images.iter() {
            let p = &layout.position;
            write!(&mut content, "q\n")?;
            write!(
                &mut content,
                "{} 0 0 {} {} {} cm\n",
                p.width(),
                p.height(),
                p.x1,
                p.y1
            )?;
            write!(&mut content, "/I{} Do\n", layout.image.index())?;
            write!(&mut content, "Q\n")?;
        }

        Ok(content)
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        writer: &mut Pdf,
    ) -> Result<(), LabelError> {
        let id = refs
            .get(RefType::Page(page_index))
            .ok_or(LabelError::PageMissing)?;
        let parent = refs.get(RefType::PageTree).ok_or(LabelError::PageMissing)?;
        let image_refs = self
            .images
            .iter()
            .map(|layout| {
                let index = layout.image.index();
                refs.get(RefType::Image(index))
                    .map(|r| (format!("I{index}"), r))
                    .ok_or(LabelError::PageMissing)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));
        let rendered = self.render()?;

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_xobjects = resources.x_objects();
        for (name, image_ref) in image_refs.iter() {
            resource_xobjects.pair(Name(name.as_bytes()), *image_ref);
        }
        resource_xobjects.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}

use crate::backend::Bitmap;
use crate::refs::{ObjectReferences, RefType};
use image::GenericImageView;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};

/// A rasterized label stored in the document. Images are kept as decoded pixels
/// until the document is written, at which point they are Flate compressed.
pub struct Image {
    pub bitmap: Bitmap,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

struct EncodeOutput {
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    pub fn new(bitmap: Bitmap) -> Image {
        let (width, height) = bitmap.dimensions();
        Image {
            bitmap,
            width,
            height,
        }
    }

    /// RGB samples, plus a separate alpha channel when the bitmap has one
    fn encode(&self) -> EncodeOutput {
        let level = CompressionLevel::DefaultLevel as u8;

        let mask = self.bitmap.color().has_alpha().then(|| {
            let alphas: Vec<u8> = self.bitmap.pixels().map(|(_, _, p)| p.0[3]).collect();
            compress_to_vec_zlib(&alphas, level)
        });

        let bytes = compress_to_vec_zlib(self.bitmap.to_rgb8().as_raw(), level);

        EncodeOutput { bytes, mask }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|mask| (refs.gen(RefType::ImageMask(image_index)), mask));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(Filter::FlateDecode);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some((mask_id, _)) = &mask_id {
            image.s_mask(*mask_id);
        }
        image.finish();

        if let Some((mask_id, mask)) = mask_id {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}

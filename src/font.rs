use crate::layout::GlyphMetrics;
use crate::units::Px;
use crate::LabelError;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};

/// A parsed TTF or OTF font, used to measure text with real glyph advances.
///
/// Labels are rasterized before they reach the PDF, so fonts are never embedded;
/// only their horizontal metrics are read.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, LabelError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    /// The glyph drawn for `ch`, falling back to the replacement character and then
    /// to `?` when the font does not cover it
    fn glyph_or_fallback(&self, ch: char) -> Option<GlyphId> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
    }
}

impl GlyphMetrics for Font {
    fn advance(&self, ch: char, size: Px) -> Px {
        let face = self.face.as_face_ref();
        let scaling = size / face.units_per_em() as f32;
        let advance = self
            .glyph_or_fallback(ch)
            .and_then(|gid| face.glyph_hor_advance(gid))
            .unwrap_or_default();
        scaling * advance as f32
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("units_per_em", &self.face.as_face_ref().units_per_em())
            .field("glyphs", &self.face.as_face_ref().number_of_glyphs())
            .finish()
    }
}

//! The label data model: a template describing the physical label, the four named
//! element placements drawn on it, and the generated instances that are exported.
//!
//! Field names serialize in camelCase so the editing front-end can hand its state
//! over as JSON unchanged.

use crate::colour::{colours, Colour};
use crate::units::*;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Replace negative, NaN and infinite inputs with zero
pub(crate) fn non_negative(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// A top-left anchored position, in template units
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Position {
        Position { x, y }
    }

    /// NaN or infinite coordinates collapse to zero
    pub(crate) fn sanitized(self) -> Position {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Position {
            x: finite(self.x),
            y: finite(self.y),
        }
    }
}

/// Horizontal alignment of a text element
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub align: TextAlign,
    pub multiline: bool,
    /// Wrapping / clipping width, in template units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f32>,
}

/// Where and how large one element is drawn on a label.
///
/// `size` is the font size for text elements and the edge length of the QR glyph,
/// both in rendering pixels. `width` overrides the horizontal extent of the element's
/// box when it is not square.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPlacement {
    pub position: Position,
    pub size: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

impl ElementPlacement {
    pub fn new(x: f32, y: f32, size: f32) -> ElementPlacement {
        ElementPlacement {
            position: Position::new(x, y),
            size,
            width: None,
            text_style: None,
        }
    }

    pub fn with_width(mut self, width: f32) -> ElementPlacement {
        self.width = Some(width);
        self
    }

    pub fn with_text_style(mut self, style: TextStyle) -> ElementPlacement {
        self.text_style = Some(style);
        self
    }

    /// Horizontal extent of the element's box, in rendering pixels
    pub fn box_width(&self) -> f32 {
        non_negative(self.width.unwrap_or(self.size))
    }

    /// Vertical extent of the element's box, in rendering pixels
    pub fn box_height(&self) -> f32 {
        non_negative(self.size)
    }
}

/// The four element slots present on every label
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementSlot {
    QrCode,
    Uuid,
    CompanyName,
    ProductName,
}

impl ElementSlot {
    pub const ALL: [ElementSlot; 4] = [
        ElementSlot::QrCode,
        ElementSlot::Uuid,
        ElementSlot::CompanyName,
        ElementSlot::ProductName,
    ];

    pub fn is_text(self) -> bool {
        !matches!(self, ElementSlot::QrCode)
    }
}

/// Placements for all four slots of a label
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Elements {
    pub qr_code: ElementPlacement,
    pub uuid: ElementPlacement,
    pub company_name: ElementPlacement,
    pub product_name: ElementPlacement,
}

impl Default for Elements {
    fn default() -> Self {
        let text = TextStyle {
            align: TextAlign::Left,
            multiline: false,
            max_width: Some(80.0),
        };
        Elements {
            qr_code: ElementPlacement::new(10.0, 10.0, 50.0),
            uuid: ElementPlacement::new(10.0, 35.0, 12.0),
            company_name: ElementPlacement::new(10.0, 45.0, 14.0).with_text_style(text),
            product_name: ElementPlacement::new(70.0, 45.0, 14.0).with_text_style(text),
        }
    }
}

impl Elements {
    pub fn get(&self, slot: ElementSlot) -> &ElementPlacement {
        match slot {
            ElementSlot::QrCode => &self.qr_code,
            ElementSlot::Uuid => &self.uuid,
            ElementSlot::CompanyName => &self.company_name,
            ElementSlot::ProductName => &self.product_name,
        }
    }

    pub fn get_mut(&mut self, slot: ElementSlot) -> &mut ElementPlacement {
        match slot {
            ElementSlot::QrCode => &mut self.qr_code,
            ElementSlot::Uuid => &mut self.uuid,
            ElementSlot::CompanyName => &mut self.company_name,
            ElementSlot::ProductName => &mut self.product_name,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementSlot, &ElementPlacement)> {
        ElementSlot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }

    /// The placements of every slot except `slot`, in slot order
    pub fn siblings(&self, slot: ElementSlot) -> Vec<&ElementPlacement> {
        self.iter()
            .filter(|(s, _)| *s != slot)
            .map(|(_, placement)| placement)
            .collect()
    }
}

impl Index<ElementSlot> for Elements {
    type Output = ElementPlacement;

    fn index(&self, slot: ElementSlot) -> &ElementPlacement {
        self.get(slot)
    }
}

impl IndexMut<ElementSlot> for Elements {
    fn index_mut(&mut self, slot: ElementSlot) -> &mut ElementPlacement {
        self.get_mut(slot)
    }
}

/// An optional stroke drawn around the edge of the label
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub enabled: bool,
    /// Stroke width, in template units
    pub width: f32,
    #[serde(rename = "color")]
    pub colour: Colour,
}

impl Default for Border {
    fn default() -> Self {
        Border {
            enabled: false,
            width: 0.3,
            colour: colours::BLACK,
        }
    }
}

/// The physical geometry of a label
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelTemplate {
    pub width: f32,
    pub height: f32,
    pub unit: Unit,
    /// Uniform inset from every edge that elements must stay inside
    #[serde(default)]
    pub padding: f32,
    /// Minimum gap kept between element boxes
    #[serde(default)]
    pub element_spacing: f32,
    #[serde(default)]
    pub border: Border,
}

impl Default for LabelTemplate {
    fn default() -> Self {
        LabelTemplate {
            width: 100.0,
            height: 50.0,
            unit: Unit::Millimeter,
            padding: 5.0,
            element_spacing: 1.0,
            border: Border::default(),
        }
    }
}

impl LabelTemplate {
    pub fn new(width: f32, height: f32, unit: Unit) -> LabelTemplate {
        LabelTemplate {
            width,
            height,
            unit,
            padding: 0.0,
            element_spacing: 0.0,
            border: Border::default(),
        }
    }

    /// Multiplier from template units into rendering pixels
    pub fn scale_factor(&self) -> f32 {
        self.unit.pixels_per_unit()
    }

    /// Label dimensions in PDF points
    pub fn size_in_points(&self) -> (Pt, Pt) {
        (
            to_points(non_negative(self.width), self.unit),
            to_points(non_negative(self.height), self.unit),
        )
    }

    /// Label dimensions in rendering pixels
    pub fn size_in_pixels(&self) -> (Px, Px) {
        (
            to_pixels(non_negative(self.width), self.unit),
            to_pixels(non_negative(self.height), self.unit),
        )
    }

    /// A copy with every negative or non-finite measurement replaced by zero
    pub(crate) fn sanitized(&self) -> LabelTemplate {
        LabelTemplate {
            width: non_negative(self.width),
            height: non_negative(self.height),
            padding: non_negative(self.padding),
            element_spacing: non_negative(self.element_spacing),
            ..*self
        }
    }
}

/// One generated label. Instances are snapshots: an export only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelInstance {
    /// Stable identity key used for selection and bulk updates
    pub id: String,
    #[serde(rename = "size")]
    pub template: LabelTemplate,
    pub elements: Elements,
    /// The full generated identifier
    #[serde(rename = "uuid")]
    pub identifier: String,
    /// The leading part of `identifier` shown on the label
    #[serde(rename = "shortUuid")]
    pub short_identifier: String,
    pub company_name: String,
    pub prefix: String,
    #[serde(default)]
    pub product_name: String,
}

impl LabelInstance {
    /// The string encoded in the label's QR code
    pub fn qr_payload(&self) -> String {
        format!("{}{}", self.prefix, self.identifier)
    }

    /// The text drawn in a text slot; [None] for the QR slot
    pub fn text_for(&self, slot: ElementSlot) -> Option<&str> {
        match slot {
            ElementSlot::QrCode => None,
            ElementSlot::Uuid => Some(&self.short_identifier),
            ElementSlot::CompanyName => Some(&self.company_name),
            ElementSlot::ProductName => Some(&self.product_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_index_the_matching_placement() {
        let mut elements = Elements::default();
        elements[ElementSlot::ProductName].size = 20.0;
        assert_eq!(elements.product_name.size, 20.0);
        assert_eq!(elements[ElementSlot::QrCode].size, 50.0);
        assert_eq!(elements.siblings(ElementSlot::Uuid).len(), 3);
        assert!(!ElementSlot::QrCode.is_text());
    }

    #[test]
    fn box_size_ignores_invalid_values() {
        let e = ElementPlacement::new(0.0, 0.0, -4.0);
        assert_eq!(e.box_height(), 0.0);
        let e = ElementPlacement::new(0.0, 0.0, 12.0).with_width(f32::NAN);
        assert_eq!(e.box_width(), 0.0);
        assert_eq!(e.box_height(), 12.0);
    }

    #[test]
    fn template_reads_front_end_json() {
        let json = r##"{
            "width": 60, "height": 40, "unit": "mm", "padding": 2, "elementSpacing": 1,
            "border": { "enabled": true, "width": 0.5, "color": "#ff0000" }
        }"##;
        let t: LabelTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(t.width, 60.0);
        assert_eq!(t.element_spacing, 1.0);
        assert!(t.border.enabled);
        assert_eq!(t.border.colour.to_string(), "#ff0000");
    }

    #[test]
    fn qr_payload_joins_prefix_and_identifier() {
        let label = LabelInstance {
            id: "a".into(),
            template: LabelTemplate::default(),
            elements: Elements::default(),
            identifier: "0f7c-11".into(),
            short_identifier: "0f7c".into(),
            company_name: "ACME".into(),
            prefix: "https://acme.test/".into(),
            product_name: "Widget".into(),
        };
        assert_eq!(label.qr_payload(), "https://acme.test/0f7c-11");
        assert_eq!(label.text_for(ElementSlot::Uuid), Some("0f7c"));
        assert_eq!(label.text_for(ElementSlot::QrCode), None);
    }
}

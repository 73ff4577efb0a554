use crate::backend::Bitmap;
use crate::colour::{colours, Colour};
use crate::layout::{layout_text, GlyphMetrics};
use crate::template::*;
use crate::units::*;
use tracing::warn;

/// A stroke drawn just inside the edge of the label canvas
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BorderStroke {
    pub width: Px,
    pub colour: Colour,
}

/// One line of a [TextRun], positioned on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Left edge of the line, after alignment
    pub x: Px,
    /// Top of the line box
    pub y: Px,
    pub width: Px,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub slot: ElementSlot,
    pub font_size: Px,
    pub line_height: Px,
    pub colour: Colour,
    pub align: TextAlign,
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone)]
pub struct BitmapNode {
    pub slot: ElementSlot,
    pub x: Px,
    pub y: Px,
    /// Edge length of the square the bitmap is drawn into
    pub size: Px,
    pub bitmap: Bitmap,
}

#[derive(Debug, Clone)]
pub enum RenderNode {
    Bitmap(BitmapNode),
    Text(TextRun),
}

/// A fully resolved, declarative description of one label, in rendering pixels
/// with the origin at the top-left corner of the label
#[derive(Debug, Clone)]
pub struct RenderTree {
    pub width: Px,
    pub height: Px,
    pub background: Colour,
    pub border: Option<BorderStroke>,
    /// Drawn in order
    pub nodes: Vec<RenderNode>,
    /// Slots too large to fit inside the padded label; they are still drawn
    pub overflowing: Vec<ElementSlot>,
}

impl RenderTree {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.nodes.iter().filter_map(|node| match node {
            RenderNode::Text(run) => Some(run),
            RenderNode::Bitmap(_) => None,
        })
    }

    pub fn bitmaps(&self) -> impl Iterator<Item = &BitmapNode> {
        self.nodes.iter().filter_map(|node| match node {
            RenderNode::Bitmap(bitmap) => Some(bitmap),
            RenderNode::Text(_) => None,
        })
    }
}

fn text_run<M: GlyphMetrics + ?Sized>(
    metrics: &M,
    slot: ElementSlot,
    text: &str,
    element: &ElementPlacement,
    scale: f32,
) -> TextRun {
    let style = element.text_style.unwrap_or_default();
    let size = Px(element.box_height());
    let max_width = style.max_width.map(|w| Px(non_negative(w) * scale));
    let block = layout_text(metrics, text, size, max_width, style.multiline);

    let position = element.position.sanitized();
    let x = Px(position.x * scale);
    let y = Px(position.y * scale);

    let lines = block
        .lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let left = match (max_width.filter(|_| style.multiline), style.align) {
                // aligned inside the wrapping box
                (Some(_), TextAlign::Left) => x,
                (Some(box_width), TextAlign::Center) => x + (box_width - line.width) * 0.5,
                (Some(box_width), TextAlign::Right) => x + box_width - line.width,
                // anchored at x
                (None, TextAlign::Left) => x,
                (None, TextAlign::Center) => x - line.width * 0.5,
                (None, TextAlign::Right) => x - line.width,
            };
            PlacedLine {
                text: line.text,
                x: left,
                y: y + block.line_height * i as f32,
                width: line.width,
            }
        })
        .collect();

    TextRun {
        slot,
        font_size: size,
        line_height: block.line_height,
        colour: colours::BLACK,
        align: style.align,
        lines,
    }
}

/// Assemble everything needed to draw `instance`: a white canvas the size of the
/// label, the optional border, the QR bitmap and the three text runs. Text is laid
/// out with `metrics` through the same routine used to measure it while editing.
pub fn build_render_tree<M: GlyphMetrics + ?Sized>(
    instance: &LabelInstance,
    metrics: &M,
    qr_bitmap: Bitmap,
) -> RenderTree {
    let template = instance.template.sanitized();
    let scale = template.scale_factor();
    let (width, height) = template.size_in_pixels();
    let elements = &instance.elements;

    let border = template.border.enabled.then(|| BorderStroke {
        width: Px(non_negative(template.border.width) * scale),
        colour: template.border.colour,
    });

    let qr = elements.qr_code.position.sanitized();
    let mut nodes = vec![RenderNode::Bitmap(BitmapNode {
        slot: ElementSlot::QrCode,
        x: Px(qr.x * scale),
        y: Px(qr.y * scale),
        size: Px(elements.qr_code.box_height()),
        bitmap: qr_bitmap,
    })];

    for slot in ElementSlot::ALL.into_iter().filter(|s| s.is_text()) {
        let text = instance.text_for(slot).unwrap_or_default();
        nodes.push(RenderNode::Text(text_run(
            metrics,
            slot,
            text,
            &elements[slot],
            scale,
        )));
    }

    let overflowing = elements.overflowing(&template);
    if !overflowing.is_empty() {
        warn!(label = %instance.id, ?overflowing, "label elements overflow the padded area");
    }

    RenderTree {
        width,
        height,
        background: colours::WHITE,
        border,
        nodes,
        overflowing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FixedPitch;

    // 10px per glyph at size 10
    const MONO: FixedPitch = FixedPitch { em_advance: 1.0 };

    fn label(elements: Elements) -> LabelInstance {
        LabelInstance {
            id: "label-1".to_string(),
            template: LabelTemplate::new(1.0, 1.0, Unit::Inch),
            elements,
            identifier: "abcdef-123456".to_string(),
            short_identifier: "abcdef".to_string(),
            company_name: "ACME".to_string(),
            prefix: String::new(),
            product_name: "Widget Mk II".to_string(),
        }
    }

    fn text(
        x: f32,
        y: f32,
        align: TextAlign,
        multiline: bool,
        max_width: Option<f32>,
    ) -> ElementPlacement {
        ElementPlacement::new(x, y, 10.0).with_text_style(TextStyle {
            align,
            multiline,
            max_width,
        })
    }

    fn run(tree: &RenderTree, slot: ElementSlot) -> &TextRun {
        tree.text_runs().find(|r| r.slot == slot).unwrap()
    }

    #[test]
    fn canvas_matches_the_label_in_pixels() {
        let mut instance = label(Elements::default());
        instance.template.border.enabled = true;
        instance.template.border.width = 0.5;
        let tree = build_render_tree(&instance, &MONO, Bitmap::new_rgb8(4, 4));

        assert_eq!((tree.width, tree.height), (Px(96.0), Px(96.0)));
        assert_eq!(tree.background, colours::WHITE);
        assert_eq!(tree.border.map(|b| b.width), Some(Px(48.0)));
        assert_eq!(tree.text_runs().count(), 3);
        assert_eq!(run(&tree, ElementSlot::Uuid).lines[0].text, "abcdef");
    }

    #[test]
    fn qr_bitmap_is_placed_at_scaled_position() {
        let mut elements = Elements::default();
        elements.qr_code = ElementPlacement::new(0.25, 0.5, 40.0);
        let tree = build_render_tree(&label(elements), &MONO, Bitmap::new_rgb8(4, 4));

        let qr = tree.bitmaps().next().unwrap();
        assert_eq!((qr.x, qr.y, qr.size), (Px(24.0), Px(48.0), Px(40.0)));
    }

    #[test]
    fn single_line_text_anchors_at_x() {
        let mut elements = Elements::default();
        elements.uuid = text(0.5, 0.0, TextAlign::Center, false, None);
        elements.company_name = text(0.5, 0.0, TextAlign::Right, false, None);
        let tree = build_render_tree(&label(elements), &MONO, Bitmap::new_rgb8(1, 1));

        // "abcdef" is 60px wide and centred on x = 48px
        assert_eq!(run(&tree, ElementSlot::Uuid).lines[0].x, Px(18.0));
        // "ACME" is 40px wide and ends at x
        assert_eq!(run(&tree, ElementSlot::CompanyName).lines[0].x, Px(8.0));
    }

    #[test]
    fn multiline_text_aligns_inside_its_box() {
        let mut elements = Elements::default();
        // a box from 0 to 96px
        elements.product_name = text(0.0, 0.25, TextAlign::Right, true, Some(1.0));
        let tree = build_render_tree(&label(elements), &MONO, Bitmap::new_rgb8(1, 1));

        let product = run(&tree, ElementSlot::ProductName);
        let lines: Vec<(&str, Px)> = product
            .lines
            .iter()
            .map(|l| (l.text.as_str(), l.x))
            .collect();
        assert_eq!(lines, [("Widget Mk", Px(6.0)), ("II", Px(76.0))]);
        assert_eq!(product.lines[0].y, Px(24.0));
        assert!((*product.lines[1].y - 36.0).abs() < 1e-4);
    }

    #[test]
    fn oversized_elements_are_reported() {
        let mut elements = Elements::default();
        elements.qr_code = ElementPlacement::new(0.0, 0.0, 500.0);
        let tree = build_render_tree(&label(elements), &MONO, Bitmap::new_rgb8(1, 1));
        assert_eq!(tree.overflowing, [ElementSlot::QrCode]);
    }
}

//! Generates a sheet of labels and writes them to `labels.pdf` (or wherever the
//! JSON config given as the first argument says).
//!
//! The QR encoder here only draws a deterministic pattern derived from the payload;
//! plug in a real encoder to get scannable codes. Set `RUST_LOG=label_sheet=debug`
//! to watch the layout decisions.

use image::{imageops, Rgb, RgbImage};
use label_sheet::layout::FixedPitch;
use label_sheet::*;

const MODULES: u32 = 21;

struct PatternQr;

impl PatternQr {
    /// The three 7x7 position markers; [None] outside of them
    fn finder(x: u32, y: u32) -> Option<bool> {
        let local = |v: u32| if v < 7 { Some(v) } else { v.checked_sub(MODULES - 7) };
        let (lx, ly) = (local(x)?, local(y)?);
        if x >= 7 && y >= 7 {
            return None;
        }
        let ring = lx.min(ly).min(6 - lx).min(6 - ly);
        Some(ring != 1)
    }
}

impl QrEncoder for PatternQr {
    fn encode(
        &self,
        payload: &str,
        edge: u32,
        _level: ErrorCorrection,
    ) -> Result<Bitmap, RasterError> {
        if edge == 0 {
            return Err(RasterError::QrEncode("zero sized QR code".to_string()));
        }

        // FNV-1a, stretched over the grid by re-hashing per module
        let seed = payload
            .bytes()
            .fold(0xcbf29ce484222325u64, |h, b| (h ^ b as u64).wrapping_mul(0x100000001b3));
        let modules = RgbImage::from_fn(MODULES, MODULES, |x, y| {
            let dark = Self::finder(x, y).unwrap_or_else(|| {
                let h = (seed ^ ((y * MODULES + x) as u64)).wrapping_mul(0x100000001b3);
                (h >> 29) & 1 == 1
            });
            if dark {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });

        Ok(Bitmap::ImageRgb8(imageops::resize(
            &modules,
            edge,
            edge,
            imageops::FilterType::Nearest,
        )))
    }
}

/// Draws boxes where text would go. Good enough to check a layout by eye.
struct BlockRasterizer;

fn fill(surface: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, colour: Rgb<u8>) {
    let x0 = x.max(0.0) as u32;
    let y0 = y.max(0.0) as u32;
    let x1 = ((x + w).max(0.0) as u32).min(surface.width());
    let y1 = ((y + h).max(0.0) as u32).min(surface.height());
    for py in y0..y1 {
        for px in x0..x1 {
            surface.put_pixel(px, py, colour);
        }
    }
}

impl Rasterizer for BlockRasterizer {
    type Surface = RgbImage;

    fn acquire_surface(&mut self, width: u32, height: u32) -> Result<RgbImage, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::Surface(format!("{width}x{height} surface")));
        }
        Ok(RgbImage::new(width, height))
    }

    fn rasterize(
        &mut self,
        surface: &mut RgbImage,
        tree: &RenderTree,
        supersample: f32,
    ) -> Result<Bitmap, RasterError> {
        let rgb = |c: Colour| Rgb(c.to_rgb_bytes());
        let (w, h) = (surface.width() as f32, surface.height() as f32);
        fill(surface, 0.0, 0.0, w, h, rgb(tree.background));

        if let Some(border) = tree.border {
            let t = *border.width * supersample;
            let colour = rgb(border.colour);
            fill(surface, 0.0, 0.0, w, t, colour);
            fill(surface, 0.0, h - t, w, t, colour);
            fill(surface, 0.0, 0.0, t, h, colour);
            fill(surface, w - t, 0.0, t, h, colour);
        }

        for node in tree.nodes.iter() {
            match node {
                RenderNode::Bitmap(node) => {
                    let edge = (*node.size * supersample).round() as u32;
                    if edge == 0 {
                        continue;
                    }
                    let scaled = imageops::resize(
                        &node.bitmap.to_rgb8(),
                        edge,
                        edge,
                        imageops::FilterType::Nearest,
                    );
                    imageops::replace(
                        surface,
                        &scaled,
                        (*node.x * supersample) as i64,
                        (*node.y * supersample) as i64,
                    );
                }
                RenderNode::Text(run) => {
                    let bar = *run.font_size * 0.7 * supersample;
                    let pad = (*run.line_height * supersample - bar) / 2.0;
                    for line in run.lines.iter() {
                        fill(
                            surface,
                            *line.x * supersample,
                            *line.y * supersample + pad,
                            *line.width * supersample,
                            bar,
                            rgb(run.colour),
                        );
                    }
                }
            }
        }

        Ok(Bitmap::ImageRgb8(surface.clone()))
    }

    fn release_surface(&mut self, _surface: RgbImage) {}
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "label_sheet=info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ExportConfig::load(path).unwrap(),
        None => ExportConfig {
            mode: ExportMode::GridPerPage(PageGeometry::default()),
            title: Some("Shelf labels".to_string()),
            ..Default::default()
        },
    };

    let template = LabelTemplate {
        border: Border {
            enabled: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut elements = Elements::default();
    let moved = elements.drag_element(ElementSlot::Uuid, 0.0, -30.0, &template);
    println!("uuid moved to {:?} ({:?})", moved.position, moved.placement);

    let mut batch = LabelBatch::generate(
        12,
        &template,
        &elements,
        "ACME Hardware",
        "https://acme.test/item/",
        8,
        &mut UuidV4,
    );
    batch.update_all(|label| label.product_name = format!("Bin {}", label.short_identifier));

    let mut exporter = Exporter::new(FixedPitch::default(), PatternQr, BlockRasterizer);
    let report = exporter.export_to_path(batch.as_slice(), &config).unwrap();
    println!(
        "wrote {} label(s) on {} page(s) to {}",
        report.labels,
        report.pages,
        config.output.display()
    );
}

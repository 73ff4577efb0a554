//! Turns label instances into a finished PDF.
//!
//! Labels are processed strictly one after another in plan order: the QR code is
//! encoded, the label's [RenderTree] is built, a render surface is acquired and
//! rasterized into, the surface is released, and the bitmap is stretched into its
//! cell on the current page. Any collaborator failure aborts the whole export.

use crate::backend::*;
use crate::config::ExportConfig;
use crate::document::Document;
use crate::info::Info;
use crate::layout::GlyphMetrics;
use crate::paginate::{plan, ExportMode};
use crate::render::{build_render_tree, RenderTree};
use crate::template::{non_negative, ElementSlot, LabelInstance};
use crate::LabelError;
use image::GenericImageView;
use tracing::{debug, info, warn};

/// Labels are rasterized at this multiple of their on-screen pixel size
pub const SUPERSAMPLE: f32 = 4.0;

/// File name used when no output path is configured
pub const DEFAULT_FILE_NAME: &str = "labels.pdf";

/// What an export produced
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExportReport {
    pub pages: usize,
    pub labels: usize,
    /// (label identity key, slot) for every element drawn outside its label's
    /// padded area
    pub overflowing: Vec<(String, ElementSlot)>,
}

/// Drives pagination, QR encoding and rasterization to produce pages
pub struct Exporter<M, Q, R> {
    metrics: M,
    qr: Q,
    rasterizer: R,
}

fn device_pixels(length: f32) -> u32 {
    (non_negative(length) * SUPERSAMPLE).ceil() as u32
}

impl<M: GlyphMetrics, Q: QrEncoder, R: Rasterizer> Exporter<M, Q, R> {
    pub fn new(metrics: M, qr: Q, rasterizer: R) -> Exporter<M, Q, R> {
        Exporter {
            metrics,
            qr,
            rasterizer,
        }
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn into_parts(self) -> (M, Q, R) {
        (self.metrics, self.qr, self.rasterizer)
    }

    /// Encode the QR code for `instance` and build its render tree
    pub fn render_tree(&self, instance: &LabelInstance) -> Result<RenderTree, LabelError> {
        let edge = device_pixels(instance.elements.qr_code.size);
        let qr = self
            .qr
            .encode(&instance.qr_payload(), edge, ErrorCorrection::High)
            .inspect_err(|e| warn!(label = %instance.id, error = %e, "QR encoding failed"))?;
        Ok(build_render_tree(instance, &self.metrics, qr))
    }

    /// Rasterize one label at [SUPERSAMPLE] times its pixel size. The render surface
    /// is released before this returns, whether or not rasterization succeeded.
    pub fn rasterize_label(
        &mut self,
        instance: &LabelInstance,
    ) -> Result<(Bitmap, Vec<ElementSlot>), LabelError> {
        let tree = self.render_tree(instance)?;
        let width = device_pixels(*tree.width);
        let height = device_pixels(*tree.height);

        let mut surface = self
            .rasterizer
            .acquire_surface(width, height)
            .inspect_err(|e| warn!(label = %instance.id, error = %e, "no render surface"))?;
        let result = self.rasterizer.rasterize(&mut surface, &tree, SUPERSAMPLE);
        self.rasterizer.release_surface(surface);

        let bitmap =
            result.inspect_err(|e| warn!(label = %instance.id, error = %e, "rasterizing failed"))?;
        if bitmap.dimensions() != (width, height) {
            warn!(
                label = %instance.id,
                expected = ?(width, height),
                actual = ?bitmap.dimensions(),
                "rasterized bitmap has an unexpected size; stretching it into its cell"
            );
        }

        Ok((bitmap, tree.overflowing))
    }

    /// Lay `instances` out according to `mode` and feed the pages into `sink`.
    /// The sink is handed back so the caller can finish it.
    pub fn export_into<S: PageSink>(
        &mut self,
        instances: &[LabelInstance],
        mode: &ExportMode,
        mut sink: S,
    ) -> Result<(S, ExportReport), LabelError> {
        let pages = plan(instances, mode)?;
        info!(
            labels = instances.len(),
            pages = pages.len(),
            "exporting labels"
        );

        let mut report = ExportReport::default();
        for (index, page) in pages.iter().enumerate() {
            debug!(
                page = index,
                cells = page.cells.len(),
                orientation = ?page.orientation,
                "rendering page"
            );
            sink.add_page(page.width, page.height)?;

            for cell in page.cells.iter() {
                let (bitmap, overflowing) = self.rasterize_label(cell.instance)?;
                sink.place_image(bitmap, cell.x, cell.y, cell.width, cell.height)?;
                report.overflowing.extend(
                    overflowing
                        .into_iter()
                        .map(|slot| (cell.instance.id.clone(), slot)),
                );
                report.labels += 1;
            }
            report.pages += 1;
        }

        info!(
            pages = report.pages,
            labels = report.labels,
            overflowing = report.overflowing.len(),
            "export finished"
        );
        Ok((sink, report))
    }

    fn export_document(
        &mut self,
        instances: &[LabelInstance],
        mode: &ExportMode,
        info: Info,
    ) -> Result<(Vec<u8>, ExportReport), LabelError> {
        let mut document = Document::new();
        document.set_info(info);
        let (document, report) = self.export_into(instances, mode, document)?;
        Ok((document.finish()?, report))
    }

    /// Export into the built-in PDF writer and return the PDF's bytes
    pub fn export(
        &mut self,
        instances: &[LabelInstance],
        mode: &ExportMode,
    ) -> Result<Vec<u8>, LabelError> {
        self.export_document(instances, mode, Info::new())
            .map(|(bytes, _)| bytes)
    }

    /// Export and write the PDF to `config.output`. Nothing is written unless the
    /// whole export succeeded.
    pub fn export_to_path(
        &mut self,
        instances: &[LabelInstance],
        config: &ExportConfig,
    ) -> Result<ExportReport, LabelError> {
        let mut info = Info::new();
        if let Some(title) = &config.title {
            info.title(title);
        }
        let (bytes, report) = self.export_document(instances, &config.mode, info)?;
        std::fs::write(&config.output, bytes)?;
        info!(path = %config.output.display(), "wrote labels");
        Ok(report)
    }
}

//! Tiling of label instances onto output pages.
//!
//! In single mode every label gets a page of its own, sized exactly to the label.
//! In grid mode labels are packed row-major into a grid that fits inside the page
//! margins, starting a new page whenever the grid is full. Instances are always
//! consumed in input order and never split across pages.

use crate::layout::Margins;
use crate::pagesize::{Orientation, PageSize};
use crate::template::{non_negative, LabelInstance};
use crate::units::*;
use crate::LayoutError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The sheet that labels are tiled onto in grid mode
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub unit: Unit,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    /// Gap between neighbouring labels, both horizontally and vertically
    pub spacing: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry {
            width: 210.0,
            height: 297.0,
            unit: Unit::Millimeter,
            margin_top: 10.0,
            margin_right: 10.0,
            margin_bottom: 10.0,
            margin_left: 10.0,
            spacing: 2.0,
        }
    }
}

impl PageGeometry {
    /// A geometry measured in points, such as one of the [pagesize](crate::pagesize)
    /// presets, with uniform margins
    pub fn from_page_size(size: PageSize, margin: Pt, spacing: Pt) -> PageGeometry {
        PageGeometry {
            width: *size.0,
            height: *size.1,
            unit: Unit::Point,
            margin_top: *margin,
            margin_right: *margin,
            margin_bottom: *margin,
            margin_left: *margin,
            spacing: *spacing,
        }
    }

    fn points(&self, value: f32) -> Pt {
        to_points(non_negative(value), self.unit)
    }

    pub fn page_size(&self) -> PageSize {
        (self.points(self.width), self.points(self.height))
    }

    pub fn margins(&self) -> Margins {
        Margins::trbl(
            self.points(self.margin_top),
            self.points(self.margin_right),
            self.points(self.margin_bottom),
            self.points(self.margin_left),
        )
    }

    pub fn spacing(&self) -> Pt {
        self.points(self.spacing)
    }
}

/// How labels are distributed over pages
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "pageSettings")]
pub enum ExportMode {
    /// One page per label, sized to the label
    #[default]
    #[serde(rename = "single")]
    SinglePerPage,
    /// As many labels per page as the geometry allows
    #[serde(rename = "multiple")]
    GridPerPage(PageGeometry),
}

/// A computed grid of equally sized label cells on a page, in points
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub page: PageSize,
    pub margins: Margins,
    pub spacing: Pt,
    pub label_width: Pt,
    pub label_height: Pt,
}

/// Upper bound on the number of cells a single page may hold
pub const MAX_CELLS_PER_PAGE: usize = u32::MAX as usize;

/// How many cells of `label` fit along `usable`, with `spacing` between them
fn fit(usable: Pt, label: Pt, spacing: Pt) -> f32 {
    let pitch = label + spacing;
    if *pitch <= 0.0 {
        return 0.0;
    }
    let n = ((usable + spacing) / pitch).floor();
    if n.is_finite() && n >= 1.0 {
        n
    } else {
        0.0
    }
}

impl GridLayout {
    /// Fit labels of the given size onto the page. Fails when not even a single
    /// row or column fits, or when the labels are so small that the page would
    /// hold more than [MAX_CELLS_PER_PAGE] of them.
    pub fn compute(
        geometry: &PageGeometry,
        label_width: Pt,
        label_height: Pt,
    ) -> Result<GridLayout, LayoutError> {
        let page = geometry.page_size();
        let margins = geometry.margins();
        let spacing = geometry.spacing();

        let usable_width = page.0 - margins.horizontal();
        let usable_height = page.1 - margins.vertical();
        let columns = fit(usable_width, label_width, spacing);
        let rows = fit(usable_height, label_height, spacing);

        if columns == 0.0 || rows == 0.0 {
            return Err(LayoutError::Unsatisfiable {
                columns: columns as usize,
                rows: rows as usize,
            });
        }
        if columns * rows > MAX_CELLS_PER_PAGE as f32 {
            return Err(LayoutError::TooManyCells { columns, rows });
        }

        let (columns, rows) = (columns as usize, rows as usize);
        if columns.checked_mul(rows).map_or(true, |cells| cells > MAX_CELLS_PER_PAGE) {
            return Err(LayoutError::TooManyCells {
                columns: columns as f32,
                rows: rows as f32,
            });
        }

        Ok(GridLayout {
            columns,
            rows,
            page,
            margins,
            spacing,
            label_width,
            label_height,
        })
    }

    pub fn labels_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Top-left offset of the cell holding the `index`th label of a page, filled
    /// left to right then top to bottom. Indexes past the end of a page wrap onto
    /// the same cells of the next page.
    pub fn cell_offset(&self, index: usize) -> (Pt, Pt) {
        let index = index % self.labels_per_page();
        let row = index / self.columns;
        let col = index % self.columns;
        (
            self.margins.left + (self.label_width + self.spacing) * col as f32,
            self.margins.top + (self.label_height + self.spacing) * row as f32,
        )
    }
}

/// One label placed on a page, in points from the page's top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<'a> {
    pub instance: &'a LabelInstance,
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
}

/// Everything needed to emit one output page
#[derive(Debug, Clone, PartialEq)]
pub struct PageDescriptor<'a> {
    pub cells: Vec<Cell<'a>>,
    pub width: Pt,
    pub height: Pt,
    pub orientation: Orientation,
}

impl<'a> PageDescriptor<'a> {
    pub fn size(&self) -> PageSize {
        (self.width, self.height)
    }
}

/// Distribute `instances` over pages.
///
/// In grid mode the cell size is taken from the first instance's template and
/// every label is stretched into a cell of that size. An empty slice plans no
/// pages in either mode.
pub fn plan<'a>(
    instances: &'a [LabelInstance],
    mode: &ExportMode,
) -> Result<Vec<PageDescriptor<'a>>, LayoutError> {
    match mode {
        ExportMode::SinglePerPage => Ok(instances
            .iter()
            .map(|instance| {
                let (width, height) = instance.template.size_in_points();
                PageDescriptor {
                    cells: vec![Cell {
                        instance,
                        x: Pt(0.0),
                        y: Pt(0.0),
                        width,
                        height,
                    }],
                    width,
                    height,
                    orientation: Orientation::of((width, height)),
                }
            })
            .collect()),
        ExportMode::GridPerPage(geometry) => {
            let Some(first) = instances.first() else {
                return Ok(Vec::new());
            };
            let (label_width, label_height) = first.template.size_in_points();
            let grid = GridLayout::compute(geometry, label_width, label_height)?;

            let pages: Vec<PageDescriptor<'a>> = instances
                .chunks(grid.labels_per_page())
                .map(|chunk| PageDescriptor {
                    cells: chunk
                        .iter()
                        .enumerate()
                        .map(|(i, instance)| {
                            let (x, y) = grid.cell_offset(i);
                            Cell {
                                instance,
                                x,
                                y,
                                width: label_width,
                                height: label_height,
                            }
                        })
                        .collect(),
                    width: grid.page.0,
                    height: grid.page.1,
                    orientation: Orientation::of(grid.page),
                })
                .collect();

            debug!(
                columns = grid.columns,
                rows = grid.rows,
                pages = pages.len(),
                "planned label grid"
            );
            Ok(pages)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::*;

    fn instance(id: &str, width: f32, height: f32, unit: Unit) -> LabelInstance {
        LabelInstance {
            id: id.to_string(),
            template: LabelTemplate::new(width, height, unit),
            elements: Elements::default(),
            identifier: format!("{id}-identifier"),
            short_identifier: id.to_string(),
            company_name: "ACME".to_string(),
            prefix: String::new(),
            product_name: String::new(),
        }
    }

    fn bare_page() -> PageGeometry {
        PageGeometry::from_page_size((Pt(595.0), Pt(842.0)), Pt(0.0), Pt(0.0))
    }

    #[test]
    fn grid_fits_sixteen_labels_on_a_bare_page() {
        let grid = GridLayout::compute(&bare_page(), Pt(200.0), Pt(100.0)).unwrap();
        assert_eq!(grid.columns, 2);
        assert_eq!(grid.rows, 8);
        assert_eq!(grid.labels_per_page(), 16);
        assert_eq!(grid.margins, Margins::empty());
        assert_eq!(grid.cell_offset(3), (Pt(200.0), Pt(100.0)));
        assert_eq!(grid.cell_offset(16), (Pt(0.0), Pt(0.0)));
    }

    #[test]
    fn seventeen_labels_spill_onto_a_second_page() {
        let labels: Vec<LabelInstance> = (0..17)
            .map(|i| instance(&i.to_string(), 200.0, 100.0, Unit::Point))
            .collect();
        let pages = plan(&labels, &ExportMode::GridPerPage(bare_page())).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].cells.len(), 16);
        assert_eq!(pages[1].cells.len(), 1);
        let last = &pages[1].cells[0];
        assert_eq!((last.x, last.y), (Pt(0.0), Pt(0.0)));
        assert_eq!(last.instance.id, "16");
        assert_eq!(pages[1].size(), (Pt(595.0), Pt(842.0)));
        assert_eq!(pages[1].orientation, Orientation::Portrait);
    }

    #[test]
    fn cells_follow_input_order_and_respect_margins() {
        let geometry = PageGeometry::from_page_size((Pt(300.0), Pt(300.0)), Pt(10.0), Pt(5.0));
        let labels: Vec<LabelInstance> = (0..4)
            .map(|i| instance(&i.to_string(), 100.0, 100.0, Unit::Point))
            .collect();
        let pages = plan(&labels, &ExportMode::GridPerPage(geometry)).unwrap();

        // (280 + 5) / 105 = 2.7 so two columns and two rows
        assert_eq!(pages.len(), 1);
        let offsets: Vec<(Pt, Pt)> = pages[0].cells.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(
            offsets,
            [
                (Pt(10.0), Pt(10.0)),
                (Pt(115.0), Pt(10.0)),
                (Pt(10.0), Pt(115.0)),
                (Pt(115.0), Pt(115.0)),
            ]
        );
        let ids: Vec<&str> = pages[0].cells.iter().map(|c| c.instance.id.as_str()).collect();
        assert_eq!(ids, ["0", "1", "2", "3"]);
    }

    #[test]
    fn labels_larger_than_the_page_are_unsatisfiable() {
        let labels = vec![instance("big", 700.0, 100.0, Unit::Point)];
        let err = plan(&labels, &ExportMode::GridPerPage(bare_page())).unwrap_err();
        assert_eq!(err, LayoutError::Unsatisfiable { columns: 0, rows: 8 });
    }

    #[test]
    fn vanishingly_small_labels_are_rejected() {
        let labels = vec![instance("speck", 1e-12, 1e-12, Unit::Point)];
        let err = plan(&labels, &ExportMode::GridPerPage(bare_page())).unwrap_err();
        assert!(matches!(err, LayoutError::TooManyCells { .. }));

        // one point labels still tile normally
        let grid = GridLayout::compute(&bare_page(), Pt(1.0), Pt(1.0)).unwrap();
        assert_eq!(grid.labels_per_page(), 595 * 842);
    }

    #[test]
    fn single_mode_sizes_each_page_to_its_label() {
        let labels = vec![
            instance("wide", 100.0, 50.0, Unit::Millimeter),
            instance("tall", 2.0, 3.0, Unit::Inch),
        ];
        let pages = plan(&labels, &ExportMode::SinglePerPage).unwrap();

        assert_eq!(pages.len(), 2);
        assert!((*pages[0].width - 283.5).abs() < 1e-3);
        assert!((*pages[0].height - 141.75).abs() < 1e-3);
        assert_eq!(pages[0].orientation, Orientation::Landscape);
        assert_eq!(pages[1].size(), (Pt(144.0), Pt(216.0)));
        assert_eq!(pages[1].orientation, Orientation::Portrait);
        assert_eq!(pages[1].cells[0].x, Pt(0.0));
    }

    #[test]
    fn nothing_to_plan() {
        let pages = plan(&[], &ExportMode::GridPerPage(PageGeometry::default())).unwrap();
        assert!(pages.is_empty());
        assert!(plan(&[], &ExportMode::SinglePerPage).unwrap().is_empty());
    }

    #[test]
    fn export_mode_reads_front_end_json() {
        let mode: ExportMode = serde_json::from_str(r#"{"type":"single"}"#).unwrap();
        assert_eq!(mode, ExportMode::SinglePerPage);

        let json = r#"{"type":"multiple","pageSettings":{
            "width":210,"height":297,"unit":"mm",
            "marginTop":10,"marginRight":10,"marginBottom":10,"marginLeft":10,
            "spacing":2}}"#;
        let mode: ExportMode = serde_json::from_str(json).unwrap();
        assert_eq!(mode, ExportMode::GridPerPage(PageGeometry::default()));
    }
}

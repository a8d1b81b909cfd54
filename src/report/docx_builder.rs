// Writing of the report as a docx document.

use std::io::Cursor;

use docx_rs::*;
use log::debug;
use survey_report::{DocumentBuilder, ImageGrid, ReportTemplate, TextRun, TextTable};

use crate::report::{ReportError, ReportResult};

/// Builds the report in memory. Nothing is written before `into_bytes`.
pub struct DocxBuilder {
    docx: Docx,
    font_size_pt: usize,
    num_images: usize,
}

// Sizes are in half-points.
const HEADING_SIZES: [usize; 3] = [32, 26, 24];

impl DocxBuilder {
    pub fn new(template: &ReportTemplate) -> DocxBuilder {
        let mut docx = Docx::new().default_size(template.font_size_pt * 2);
        for (idx, size) in HEADING_SIZES.iter().enumerate() {
            let level = idx + 1;
            docx = docx.add_style(
                Style::new(&format!("Heading{}", level), StyleType::Paragraph)
                    .name(&format!("Heading {}", level))
                    .size(*size)
                    .bold(),
            );
        }
        DocxBuilder {
            docx,
            font_size_pt: template.font_size_pt,
            num_images: 0,
        }
    }

    fn push(&mut self, f: impl FnOnce(Docx) -> Docx) {
        let docx = std::mem::replace(&mut self.docx, Docx::new());
        self.docx = f(docx);
    }

    fn run(&self, text: &str, size_pt: Option<usize>, bold: bool) -> Run {
        let run = Run::new()
            .add_text(text)
            .size(size_pt.unwrap_or(self.font_size_pt) * 2);
        if bold {
            run.bold()
        } else {
            run
        }
    }

    /// The packed document, as the bytes of a docx file.
    pub fn into_bytes(self) -> ReportResult<Vec<u8>> {
        debug!("into_bytes: packing {} images", self.num_images);
        let mut cursor = Cursor::new(Vec::new());
        self.docx
            .build()
            .pack(&mut cursor)
            .map_err(|e| ReportError::PackingDocument {
                message: e.to_string(),
            })?;
        Ok(cursor.into_inner())
    }
}

impl DocumentBuilder for DocxBuilder {
    fn heading(&mut self, text: &str, level: usize) {
        let level = level.clamp(1, HEADING_SIZES.len());
        let p = Paragraph::new()
            .style(&format!("Heading{}", level))
            .add_run(Run::new().add_text(text));
        self.push(|d| d.add_paragraph(p));
    }

    fn paragraph(&mut self, runs: &[TextRun]) {
        let p = runs.iter().fold(Paragraph::new(), |p, r| {
            p.add_run(self.run(&r.text, r.size_pt, r.bold))
        });
        self.push(|d| d.add_paragraph(p));
    }

    fn table(&mut self, table: &TextTable) {
        let widths: Vec<usize> = table.column_widths.iter().map(|w| w.to_twips()).collect();
        let rows: Vec<TableRow> = table
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<TableCell> = row
                    .iter()
                    .zip(widths.iter())
                    .map(|(c, w)| {
                        TableCell::new()
                            .add_paragraph(
                                Paragraph::new().add_run(self.run(&c.text, Some(c.size_pt), c.bold)),
                            )
                            .width(*w, WidthType::Dxa)
                    })
                    .collect();
                TableRow::new(cells)
            })
            .collect();
        let t = Table::new(rows).set_grid(widths);
        self.push(|d| d.add_table(t));
    }

    fn image_grid(&mut self, grid: ImageGrid) {
        let (w_emu, h_emu) = (grid.image_width.to_emu(), grid.image_height.to_emu());
        let col_width = grid.image_width.to_twips();
        self.num_images += grid.num_images();
        let mut cells = grid.cells.into_iter();
        let mut rows: Vec<TableRow> = Vec::with_capacity(grid.rows);
        for _ in 0..grid.rows {
            let row: Vec<TableCell> = (0..grid.cols)
                .map(|_| {
                    let p = match cells.next().flatten() {
                        Some(img) => Paragraph::new()
                            .align(AlignmentType::Center)
                            .add_run(Run::new().add_image(Pic::new(&img.png).size(w_emu, h_emu))),
                        None => Paragraph::new(),
                    };
                    TableCell::new()
                        .add_paragraph(p)
                        .width(col_width, WidthType::Dxa)
                })
                .collect();
            rows.push(TableRow::new(row));
        }
        let t = Table::new(rows).set_grid(vec![col_width; grid.cols]);
        self.push(|d| d.add_table(t));
    }

    fn page_break(&mut self) {
        let p = Paragraph::new().add_run(Run::new().add_break(BreakType::Page));
        self.push(|d| d.add_paragraph(p));
    }
}

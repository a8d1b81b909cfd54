use log::{debug, info};

use crate::chart::*;
use crate::config::*;
use crate::score::score_course;

// ********* Document primitives ***********

/// A piece of text with its own formatting. `size_pt` uses the default size
/// of the document when absent.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TextRun {
    pub text: String,
    pub size_pt: Option<usize>,
    pub bold: bool,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TableCellText {
    pub text: String,
    pub size_pt: usize,
    pub bold: bool,
}

/// A table of text. All the rows have one cell per column.
#[derive(PartialEq, Debug, Clone)]
pub struct TextTable {
    pub column_widths: Vec<Inches>,
    pub rows: Vec<Vec<TableCellText>>,
}

/// A table of images, filled row by row. Empty cells are `None`.
#[derive(PartialEq, Debug, Clone)]
pub struct ImageGrid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Option<ChartImage>>,
    pub image_width: Inches,
    pub image_height: Inches,
}

impl ImageGrid {
    pub fn num_images(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// The operations needed from a word processor document to write the report.
///
/// Images are handed over by value: the builder owns them once they are
/// placed in the document.
pub trait DocumentBuilder {
    fn heading(&mut self, text: &str, level: usize);
    fn paragraph(&mut self, runs: &[TextRun]);
    fn table(&mut self, table: &TextTable);
    fn image_grid(&mut self, grid: ImageGrid);
    fn page_break(&mut self);
}

// ********* Layout ***********

/// What was written for one course.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CourseLayout {
    pub course: String,
    pub questions: usize,
    pub charts: usize,
    pub skipped_charts: usize,
    pub chart_pages: usize,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportLayout {
    pub lecturer: String,
    pub courses: Vec<CourseLayout>,
}

/// Number of pages needed to place `num_charts` charts.
pub fn chart_pages(num_charts: usize, charts_per_page: usize) -> usize {
    num_charts.div_ceil(charts_per_page.max(1))
}

/// Writes the whole report: one section per course, in the order of the survey.
///
/// Every section starts on a new page. A section is made of the name of the
/// course, the lecturer line, the score table and then the pages of charts.
pub fn layout_report<B: DocumentBuilder, R: ChartRenderer>(
    builder: &mut B,
    survey: &NormalizedSurvey,
    lecturer: &str,
    renderer: &R,
    template: &ReportTemplate,
) -> ReportLayout {
    let mut courses: Vec<CourseLayout> = Vec::new();
    for (idx, table) in survey.courses.iter().enumerate() {
        if idx > 0 {
            builder.page_break();
        }
        let cl = layout_course(builder, table, lecturer, renderer, template);
        info!(
            "Course {:?}: {} questions, {} charts on {} pages ({} skipped)",
            cl.course, cl.questions, cl.charts, cl.chart_pages, cl.skipped_charts
        );
        courses.push(cl);
    }
    ReportLayout {
        lecturer: lecturer.to_string(),
        courses,
    }
}

fn layout_course<B: DocumentBuilder, R: ChartRenderer>(
    builder: &mut B,
    table: &CourseTable,
    lecturer: &str,
    renderer: &R,
    template: &ReportTemplate,
) -> CourseLayout {
    builder.heading(&table.course, 1);
    builder.paragraph(&metadata_runs(lecturer, template));
    builder.table(&score_table(table, template));

    // The charts always start on their own page.
    builder.page_break();
    let mut charts = CourseCharts::new(table, renderer, template);
    let mut pager = ChartPager::new(template);
    for img in charts.by_ref() {
        pager.push(builder, img);
    }
    let (num_charts, pages) = pager.finish(builder);

    CourseLayout {
        course: table.course.clone(),
        questions: table.questions.len(),
        charts: num_charts,
        skipped_charts: charts.failures().len(),
        chart_pages: pages,
    }
}

/// The line under the course name: the lecturer, and room for the number of
/// respondents.
pub fn metadata_runs(lecturer: &str, template: &ReportTemplate) -> Vec<TextRun> {
    vec![
        TextRun {
            text: format!("{}: {}", template.lecturer_label, lecturer),
            size_pt: Some(template.font_size_pt),
            bold: false,
        },
        TextRun {
            text: " ".repeat(template.metadata_gap),
            size_pt: None,
            bold: false,
        },
        TextRun {
            text: format!("{}: ", template.respondents_label),
            size_pt: Some(template.font_size_pt),
            bold: false,
        },
    ]
}

/// The table of percentages and scores of a course: one header row, then one
/// row per question.
pub fn score_table(table: &CourseTable, template: &ReportTemplate) -> TextTable {
    let cell = |text: String, bold: bool| TableCellText {
        text,
        size_pt: template.font_size_pt,
        bold,
    };

    let mut header = vec![cell(template.question_label.to_string(), true)];
    header.extend(Category::ALL.iter().map(|c| cell(c.label().to_string(), true)));
    header.push(cell(template.score_label.to_string(), true));

    let mut rows = vec![header];
    for (idx, scored) in score_course(table).iter().enumerate() {
        let mut row = vec![cell(
            format!("{}. {}", idx + 1, scored.record.question),
            false,
        )];
        row.extend(
            scored
                .record
                .values
                .iter()
                .map(|(_, v)| cell(format!("{:.2}%", v), false)),
        );
        row.push(cell(template.score_display.format(scored.nilai), false));
        rows.push(row);
    }

    let mut column_widths = vec![template.question_column_width];
    column_widths.extend(std::iter::repeat(template.value_column_width).take(Category::ALL.len() + 1));
    TextTable {
        column_widths,
        rows,
    }
}

/// Places charts on pages of `charts_per_page`, handing each page to the
/// builder as soon as it is full.
struct ChartPager<'a> {
    template: &'a ReportTemplate,
    current: Vec<ChartImage>,
    pages: usize,
    placed: usize,
}

impl<'a> ChartPager<'a> {
    fn new(template: &'a ReportTemplate) -> Self {
        ChartPager {
            template,
            current: Vec::new(),
            pages: 0,
            placed: 0,
        }
    }

    fn push<B: DocumentBuilder>(&mut self, builder: &mut B, img: ChartImage) {
        self.current.push(img);
        self.placed += 1;
        if self.current.len() >= self.template.charts_per_page() {
            self.flush(builder);
        }
    }

    fn flush<B: DocumentBuilder>(&mut self, builder: &mut B) {
        if self.current.is_empty() {
            return;
        }
        if self.pages > 0 {
            builder.page_break();
        }
        let t = self.template;
        let mut cells: Vec<Option<ChartImage>> =
            std::mem::take(&mut self.current).into_iter().map(Some).collect();
        cells.resize(t.charts_per_page(), None);
        debug!(
            "ChartPager::flush: page {} with {} charts",
            self.pages + 1,
            cells.iter().filter(|c| c.is_some()).count()
        );
        builder.image_grid(ImageGrid {
            rows: t.chart_rows_per_page,
            cols: t.charts_per_row,
            cells,
            image_width: t.chart_width,
            image_height: t.chart_height,
        });
        self.pages += 1;
    }

    /// Returns the number of charts and pages written.
    fn finish<B: DocumentBuilder>(mut self, builder: &mut B) -> (usize, usize) {
        self.flush(builder);
        (self.placed, self.pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(PartialEq, Debug, Clone)]
    enum Event {
        Heading(String),
        Paragraph(String),
        Table(usize, usize),
        Grid(Vec<Option<u8>>),
        PageBreak,
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        tables: Vec<TextTable>,
    }

    impl DocumentBuilder for Recorder {
        fn heading(&mut self, text: &str, _level: usize) {
            self.events.push(Event::Heading(text.to_string()));
        }
        fn paragraph(&mut self, runs: &[TextRun]) {
            let text: String = runs.iter().map(|r| r.text.as_str()).collect();
            self.events.push(Event::Paragraph(text));
        }
        fn table(&mut self, table: &TextTable) {
            self.events
                .push(Event::Table(table.rows.len(), table.column_widths.len()));
            self.tables.push(table.clone());
        }
        fn image_grid(&mut self, grid: ImageGrid) {
            assert_eq!(grid.cells.len(), grid.rows * grid.cols);
            let ids = grid
                .cells
                .iter()
                .map(|c| c.as_ref().map(|img| img.png[0]))
                .collect();
            self.events.push(Event::Grid(ids));
        }
        fn page_break(&mut self) {
            self.events.push(Event::PageBreak);
        }
    }

    /// Encodes the question index in the single byte of the image.
    struct IndexRenderer;

    impl ChartRenderer for IndexRenderer {
        type Error = String;

        fn render(&self, spec: &ChartSpec) -> Result<ChartImage, String> {
            if spec.question.contains("broken") {
                return Err("cannot draw".to_string());
            }
            Ok(ChartImage {
                png: vec![spec.index as u8],
                width_px: 800,
                height_px: 600,
            })
        }
    }

    fn course(name: &str, questions: &[&str]) -> CourseTable {
        CourseTable {
            course: name.to_string(),
            questions: questions
                .iter()
                .map(|q| QuestionRecord {
                    question: q.to_string(),
                    values: CategoryValues([40.0, 30.0, 20.0, 10.0]),
                })
                .collect(),
        }
    }

    fn numbered(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Q{}", i)).collect()
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(chart_pages(0, 6), 0);
        assert_eq!(chart_pages(1, 6), 1);
        assert_eq!(chart_pages(6, 6), 1);
        assert_eq!(chart_pages(7, 6), 2);
        assert_eq!(chart_pages(13, 6), 3);
    }

    #[test]
    fn score_table_cells() {
        let table = course("Basis Data", &["Materi jelas?"]);
        let t = score_table(&table, &ReportTemplate::DEFAULT);
        let header: Vec<&str> = t.rows[0].iter().map(|c| c.text.as_str()).collect();
        assert_eq!(
            header,
            vec![
                "Pertanyaan",
                "Sangat Setuju",
                "Setuju",
                "Tidak Setuju",
                "Sangat Tidak Setuju",
                "Nilai"
            ]
        );
        assert!(t.rows[0].iter().all(|c| c.bold && c.size_pt == 12));
        let row: Vec<&str> = t.rows[1].iter().map(|c| c.text.as_str()).collect();
        assert_eq!(
            row,
            vec!["1. Materi jelas?", "40.00%", "30.00%", "20.00%", "10.00%", "3.00%"]
        );
        assert_eq!(t.column_widths.len(), 6);
    }

    #[test]
    fn score_display_is_configurable() {
        let table = course("Basis Data", &["Materi jelas?"]);
        let template = ReportTemplate {
            score_display: ScoreDisplay::Rescaled,
            ..ReportTemplate::DEFAULT
        };
        let t = score_table(&table, &template);
        assert_eq!(t.rows[1][5].text, "0.03%");
    }

    #[test]
    fn single_course_layout() {
        let table = course("Basis Data", &["Q1", "Q2", "Q3"]);
        let survey = NormalizedSurvey {
            courses: vec![table],
        };
        let mut rec = Recorder::default();
        let res = layout_report(
            &mut rec,
            &survey,
            "John Doe",
            &IndexRenderer,
            &ReportTemplate::DEFAULT,
        );
        assert_eq!(
            rec.events,
            vec![
                Event::Heading("Basis Data".to_string()),
                Event::Paragraph("Dosen: John Doe          Jumlah Responden: ".to_string()),
                Event::Table(4, 6),
                Event::PageBreak,
                Event::Grid(vec![Some(1), Some(2), Some(3), None, None, None]),
            ]
        );
        assert_eq!(res.courses[0].chart_pages, 1);
        assert_eq!(res.courses[0].charts, 3);
    }

    #[test]
    fn charts_are_paginated_by_six() {
        for n in [1, 5, 6, 7, 12, 13] {
            let names = numbered(n);
            let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
            let survey = NormalizedSurvey {
                courses: vec![course("C", &refs)],
            };
            let mut rec = Recorder::default();
            let res = layout_report(&mut rec, &survey, "X", &IndexRenderer, &ReportTemplate::DEFAULT);
            let grids: Vec<&Vec<Option<u8>>> = rec
                .events
                .iter()
                .filter_map(|e| match e {
                    Event::Grid(g) => Some(g),
                    _ => None,
                })
                .collect();
            assert_eq!(grids.len(), chart_pages(n, 6), "n = {}", n);
            assert_eq!(res.courses[0].chart_pages, grids.len());
            assert!(grids.iter().all(|g| g.iter().flatten().count() <= 6));
            let order: Vec<u8> = grids.iter().flat_map(|g| g.iter().flatten().cloned()).collect();
            assert_eq!(order, (1..=n as u8).collect::<Vec<u8>>());
            // One break before the charts, then one between chart pages.
            let breaks = rec.events.iter().filter(|e| **e == Event::PageBreak).count();
            assert_eq!(breaks, 1 + grids.len() - 1);
        }
    }

    #[test]
    fn page_breaks_between_courses() {
        let survey = NormalizedSurvey {
            courses: vec![course("A", &["Q1"]), course("B", &["Q1", "Q2"])],
        };
        let mut rec = Recorder::default();
        layout_report(&mut rec, &survey, "X", &IndexRenderer, &ReportTemplate::DEFAULT);
        assert_eq!(rec.events[0], Event::Heading("A".to_string()));
        let b_pos = rec
            .events
            .iter()
            .position(|e| *e == Event::Heading("B".to_string()))
            .unwrap();
        assert_eq!(rec.events[b_pos - 1], Event::PageBreak);
        assert!(matches!(rec.events[b_pos - 2], Event::Grid(_)));
    }

    #[test]
    fn skipped_charts_do_not_leave_holes() {
        let survey = NormalizedSurvey {
            courses: vec![course("C", &["Q1", "broken", "Q3"])],
        };
        let mut rec = Recorder::default();
        let res = layout_report(&mut rec, &survey, "X", &IndexRenderer, &ReportTemplate::DEFAULT);
        assert_eq!(
            rec.events.last(),
            Some(&Event::Grid(vec![Some(1), Some(3), None, None, None, None]))
        );
        assert_eq!(res.courses[0].skipped_charts, 1);
        assert_eq!(res.courses[0].charts, 2);
        // The table still lists every question.
        assert_eq!(rec.tables[0].rows.len(), 4);
    }

    #[test]
    fn course_without_charts() {
        let survey = NormalizedSurvey {
            courses: vec![course("C", &["broken"])],
        };
        let mut rec = Recorder::default();
        let res = layout_report(&mut rec, &survey, "X", &IndexRenderer, &ReportTemplate::DEFAULT);
        assert_eq!(res.courses[0].chart_pages, 0);
        assert_eq!(rec.events.last(), Some(&Event::PageBreak));
    }
}

use log::{debug, warn};
use std::fmt::Display;
use std::iter::Enumerate;
use std::slice::Iter;

use crate::config::*;

/// A color, as red, green and blue components.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The color of each category, in the order of `Category::ALL`. It is the same
/// for every chart so that the charts can be compared at a glance.
pub const PALETTE: [Rgb; 4] = [
    Rgb(255, 215, 0),   // gold
    Rgb(154, 205, 50),  // yellowgreen
    Rgb(240, 128, 128), // lightcoral
    Rgb(135, 206, 250), // lightskyblue
];

/// How far the first slice is pulled out of the pie, as a fraction of the radius.
pub const EXPLODE_FIRST: f64 = 0.1;

/// Angle of the start of the first slice, in degrees, counter-clockwise from
/// the horizontal axis.
pub const START_ANGLE: f64 = 140.0;

/// One slice of a pie chart.
#[derive(PartialEq, Debug, Clone)]
pub struct Slice {
    pub category: Category,
    /// The weight actually drawn. Equal to the percentage, except when the
    /// question has no responses at all.
    pub weight: f64,
    /// The text written on the slice: count and percentage.
    pub value_label: String,
    pub color: Rgb,
    /// Offset of the slice from the center, as a fraction of the radius.
    pub explode: f64,
    /// Start and end angles in degrees, counter-clockwise. `end > start`.
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Slice {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Everything needed to draw the chart of one question.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartSpec {
    /// 1-based position of the question in its course.
    pub index: usize,
    pub question: String,
    pub title_lines: Vec<String>,
    pub slices: Vec<Slice>,
    /// All the percentages were zero. Placeholder weights are drawn.
    pub no_responses: bool,
}

/// A chart, encoded as a PNG image.
#[derive(PartialEq, Eq, Clone)]
pub struct ChartImage {
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl std::fmt::Debug for ChartImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ChartImage({}x{}, {} bytes)",
            self.width_px,
            self.height_px,
            self.png.len()
        )
    }
}

/// Draws a chart described by a `ChartSpec` into an image.
pub trait ChartRenderer {
    type Error: Display;

    fn render(&self, spec: &ChartSpec) -> Result<ChartImage, Self::Error>;
}

/// Builds the description of the chart of a question.
///
/// Fails if some of the values cannot be drawn (negative or not finite).
pub fn chart_spec(
    index: usize,
    record: &QuestionRecord,
    template: &ReportTemplate,
) -> Result<ChartSpec, SurveyError> {
    let values = record.values;
    if let Some((c, v)) = values.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        return Err(SurveyError::ChartRender {
            index,
            question: record.question.clone(),
            message: format!("invalid value {} for {:?}", v, c.label()),
        });
    }

    let no_responses = values.all_zero();
    let weights: [f64; 4] = if no_responses {
        [1.0; 4]
    } else {
        values.0
    };
    let total: f64 = weights.iter().sum();

    let mut title_lines = wrap_text(
        &format!("{}. {}", index, record.question),
        template.title_wrap_width,
    );
    if no_responses {
        title_lines.push(template.no_response_label.to_string());
    }

    let mut slices: Vec<Slice> = Vec::new();
    let mut angle = START_ANGLE;
    for category in Category::ALL {
        let weight = weights[category.index()];
        let fraction = weight / total;
        let value_label = format!("{:.0} ({:.1}%)", fraction * total, fraction * 100.0);
        let sweep = 360.0 * fraction;
        slices.push(Slice {
            category,
            weight,
            value_label,
            color: PALETTE[category.index()],
            explode: if category == Category::SangatSetuju {
                EXPLODE_FIRST
            } else {
                0.0
            },
            start_angle: angle,
            end_angle: angle + sweep,
        });
        angle += sweep;
    }

    Ok(ChartSpec {
        index,
        question: record.question.clone(),
        title_lines,
        slices,
        no_responses,
    })
}

/// Greedy word wrapping. Words longer than the width are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        let word_len = chars.len();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }
    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// The charts of a course, rendered one at a time.
///
/// Charts that fail are logged and skipped. The failures are kept for the
/// summary of the run.
pub struct CourseCharts<'a, R: ChartRenderer> {
    questions: Enumerate<Iter<'a, QuestionRecord>>,
    renderer: &'a R,
    template: &'a ReportTemplate,
    failures: Vec<SurveyError>,
}

impl<'a, R: ChartRenderer> CourseCharts<'a, R> {
    pub fn new(table: &'a CourseTable, renderer: &'a R, template: &'a ReportTemplate) -> Self {
        CourseCharts {
            questions: table.questions.iter().enumerate(),
            renderer,
            template,
            failures: Vec::new(),
        }
    }

    pub fn failures(&self) -> &[SurveyError] {
        &self.failures
    }

    fn render_one(&self, index: usize, record: &QuestionRecord) -> Result<ChartImage, SurveyError> {
        let spec = chart_spec(index, record, self.template)?;
        debug!("render_one: spec: {:?}", spec);
        self.renderer
            .render(&spec)
            .map_err(|e| SurveyError::ChartRender {
                index,
                question: record.question.clone(),
                message: e.to_string(),
            })
    }
}

impl<'a, R: ChartRenderer> Iterator for CourseCharts<'a, R> {
    type Item = ChartImage;

    fn next(&mut self) -> Option<ChartImage> {
        loop {
            let (idx, record) = self.questions.next()?;
            match self.render_one(idx + 1, record) {
                Ok(img) => return Some(img),
                Err(e) => {
                    warn!("Skipping chart: {}", e);
                    self.failures.push(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, values: [f64; 4]) -> QuestionRecord {
        QuestionRecord {
            question: question.to_string(),
            values: CategoryValues(values),
        }
    }

    #[test]
    fn slices_follow_the_values() {
        let spec = chart_spec(
            3,
            &record("Materi jelas?", [40.0, 30.0, 20.0, 10.0]),
            &ReportTemplate::DEFAULT,
        )
        .unwrap();
        assert_eq!(spec.title_lines, vec!["3. Materi jelas?".to_string()]);
        assert!(!spec.no_responses);
        let labels: Vec<&str> = spec.slices.iter().map(|s| s.value_label.as_str()).collect();
        assert_eq!(labels, vec!["40 (40.0%)", "30 (30.0%)", "20 (20.0%)", "10 (10.0%)"]);
        assert_eq!(spec.slices[0].start_angle, START_ANGLE);
        assert!((spec.slices[0].end_angle - (START_ANGLE + 144.0)).abs() < 1e-9);
        assert!((spec.slices[3].end_angle - (START_ANGLE + 360.0)).abs() < 1e-9);
        assert_eq!(spec.slices[0].explode, EXPLODE_FIRST);
        assert!(spec.slices[1..].iter().all(|s| s.explode == 0.0));
        let colors: Vec<Rgb> = spec.slices.iter().map(|s| s.color).collect();
        assert_eq!(colors, PALETTE.to_vec());
    }

    #[test]
    fn all_zero_values_get_placeholder_weights() {
        let spec = chart_spec(1, &record("Q", [0.0; 4]), &ReportTemplate::DEFAULT).unwrap();
        assert!(spec.no_responses);
        assert!(spec.slices.iter().all(|s| s.weight == 1.0));
        // Labels follow the placeholder weights.
        let labels: Vec<&str> = spec.slices.iter().map(|s| s.value_label.as_str()).collect();
        assert_eq!(labels, vec!["1 (25.0%)"; 4]);
        assert!(spec
            .slices
            .iter()
            .all(|s| (s.end_angle - s.start_angle - 90.0).abs() < 1e-9));
        assert_eq!(
            spec.title_lines.last().map(|s| s.as_str()),
            Some(ReportTemplate::DEFAULT.no_response_label)
        );
    }

    #[test]
    fn negative_values_cannot_be_drawn() {
        let err = chart_spec(2, &record("Q", [-1.0, 50.0, 50.0, 1.0]), &ReportTemplate::DEFAULT)
            .unwrap_err();
        assert!(matches!(err, SurveyError::ChartRender { index: 2, .. }));
    }

    #[test]
    fn wraps_long_titles() {
        let text = "1. Dosen menyampaikan materi perkuliahan dengan jelas dan mudah dipahami oleh mahasiswa";
        let lines = wrap_text(text, 55);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 55));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_splits_long_words() {
        let lines = wrap_text("ab abcdefgh c", 3);
        assert_eq!(lines, vec!["ab", "abc", "def", "gh", "c"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    struct FailingOn(usize);

    impl ChartRenderer for FailingOn {
        type Error = String;

        fn render(&self, spec: &ChartSpec) -> Result<ChartImage, String> {
            if spec.index == self.0 {
                Err("no font".to_string())
            } else {
                Ok(ChartImage {
                    png: vec![spec.index as u8],
                    width_px: 1,
                    height_px: 1,
                })
            }
        }
    }

    #[test]
    fn failed_charts_are_skipped() {
        let table = CourseTable {
            course: "C".to_string(),
            questions: vec![
                record("Q1", [25.0; 4]),
                record("Q2", [25.0; 4]),
                record("Q3", [-5.0, 35.0, 35.0, 35.0]),
                record("Q4", [25.0; 4]),
            ],
        };
        let renderer = FailingOn(2);
        let mut charts = CourseCharts::new(&table, &renderer, &ReportTemplate::DEFAULT);
        let rendered: Vec<u8> = charts.by_ref().map(|img| img.png[0]).collect();
        assert_eq!(rendered, vec![1, 4]);
        assert_eq!(charts.failures().len(), 2);
    }
}

// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The four answers of the Likert questionnaire, from the strongest agreement
/// to the strongest disagreement.
///
/// The order of the variants is the order of the columns in the report and of
/// the slices in the charts.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Category {
    SangatSetuju,
    Setuju,
    TidakSetuju,
    SangatTidakSetuju,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::SangatSetuju,
        Category::Setuju,
        Category::TidakSetuju,
        Category::SangatTidakSetuju,
    ];

    /// The name of the column in the source spreadsheet. It is also the label
    /// used in the report.
    pub fn label(&self) -> &'static str {
        match self {
            Category::SangatSetuju => "Sangat Setuju",
            Category::Setuju => "Setuju",
            Category::TidakSetuju => "Tidak Setuju",
            Category::SangatTidakSetuju => "Sangat Tidak Setuju",
        }
    }

    /// Weight of the category in the Likert score.
    pub fn weight(&self) -> f64 {
        match self {
            Category::SangatSetuju => 4.0,
            Category::Setuju => 3.0,
            Category::TidakSetuju => 2.0,
            Category::SangatTidakSetuju => 1.0,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One line of the questionnaire export, before any interpretation of the
/// percentages.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawRow {
    pub course: String,
    pub question: String,
    /// The percentages as written in the source, in the order of `Category::ALL`.
    pub percentages: [String; 4],
    /// 1-based line number in the source, for diagnostics only.
    pub lineno: Option<u64>,
}

/// The percentages of one question, in the order of `Category::ALL`.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CategoryValues(pub [f64; 4]);

impl CategoryValues {
    pub fn get(&self, category: Category) -> f64 {
        self.0[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    pub fn all_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

// ******** Normalized data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct QuestionRecord {
    pub question: String,
    pub values: CategoryValues,
}

/// All the questions of one course, in the order in which they first appear.
#[derive(PartialEq, Debug, Clone)]
pub struct CourseTable {
    pub course: String,
    pub questions: Vec<QuestionRecord>,
}

/// The course tables, in the order in which the courses first appear.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct NormalizedSurvey {
    pub courses: Vec<CourseTable>,
}

impl NormalizedSurvey {
    pub fn get(&self, course: &str) -> Option<&CourseTable> {
        self.courses.iter().find(|ct| ct.course == course)
    }

    pub fn course_names(&self) -> Vec<&str> {
        self.courses.iter().map(|ct| ct.course.as_str()).collect()
    }

    pub fn num_questions(&self) -> usize {
        self.courses.iter().map(|ct| ct.questions.len()).sum()
    }
}

// ******** Errors *********

/// Errors raised by the core of the report generation.
#[derive(PartialEq, Debug, Clone)]
pub enum SurveyError {
    /// A percentage field could not be read as a number. This is fatal.
    MalformedPercentage {
        course: String,
        question: String,
        column: Category,
        value: String,
    },
    /// A chart could not be produced. The chart is skipped.
    ChartRender {
        index: usize,
        question: String,
        message: String,
    },
}

impl Error for SurveyError {}

impl Display for SurveyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyError::MalformedPercentage {
                course,
                question,
                column,
                value,
            } => write!(
                f,
                "malformed percentage {:?} in column {:?} (course {:?}, question {:?})",
                value,
                column.label(),
                course,
                question
            ),
            SurveyError::ChartRender {
                index,
                question,
                message,
            } => write!(
                f,
                "could not render chart {} ({:?}): {}",
                index, question, message
            ),
        }
    }
}

// ********* Template **********

/// How the `Nilai` cell of the score table is written.
///
/// The score is on a 1-4 scale. The questionnaire reports have historically
/// been printed with a percent sign after it.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ScoreDisplay {
    /// `3.00%`
    Percent,
    /// `3.00`
    Plain,
    /// The score divided by 100 once more: `0.03%`
    Rescaled,
}

impl ScoreDisplay {
    pub fn format(&self, nilai: f64) -> String {
        match self {
            ScoreDisplay::Percent => format!("{:.2}%", nilai),
            ScoreDisplay::Plain => format!("{:.2}", nilai),
            ScoreDisplay::Rescaled => format!("{:.2}%", nilai / 100.0),
        }
    }
}

/// A physical length in the document.
#[derive(PartialEq, Debug, Clone, Copy, PartialOrd)]
pub struct Inches(pub f64);

impl Inches {
    pub fn to_emu(self) -> u32 {
        (self.0 * 914_400.0).round() as u32
    }

    /// Twentieths of a point, the unit of table widths in word processors.
    pub fn to_twips(self) -> usize {
        (self.0 * 1440.0).round() as usize
    }
}

/// The fixed layout of the questionnaire report.
#[derive(PartialEq, Debug, Clone)]
pub struct ReportTemplate {
    pub question_label: &'static str,
    pub score_label: &'static str,
    pub lecturer_label: &'static str,
    pub respondents_label: &'static str,
    pub no_response_label: &'static str,
    pub font_size_pt: usize,
    pub metadata_gap: usize,
    pub question_column_width: Inches,
    pub value_column_width: Inches,
    pub charts_per_row: usize,
    pub chart_rows_per_page: usize,
    pub chart_width: Inches,
    pub chart_height: Inches,
    pub title_wrap_width: usize,
    pub score_display: ScoreDisplay,
}

impl ReportTemplate {
    pub const DEFAULT: ReportTemplate = ReportTemplate {
        question_label: "Pertanyaan",
        score_label: "Nilai",
        lecturer_label: "Dosen",
        respondents_label: "Jumlah Responden",
        no_response_label: "(belum ada respons)",
        font_size_pt: 12,
        metadata_gap: 10,
        question_column_width: Inches(3.5),
        value_column_width: Inches(0.6),
        charts_per_row: 2,
        chart_rows_per_page: 3,
        chart_width: Inches(3.0),
        chart_height: Inches(2.5),
        title_wrap_width: 55,
        score_display: ScoreDisplay::Percent,
    };

    pub fn charts_per_page(&self) -> usize {
        self.charts_per_row * self.chart_rows_per_page
    }
}

impl Default for ReportTemplate {
    fn default() -> Self {
        ReportTemplate::DEFAULT
    }
}

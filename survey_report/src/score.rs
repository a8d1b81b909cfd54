use crate::config::*;

/// The Likert score (`Nilai`) of one question.
///
/// Each percentage is weighted by its category (4 for `Sangat Setuju` down to
/// 1 for `Sangat Tidak Setuju`) and the sum is divided by 100. When the
/// percentages add up to 100, the score is between 1 and 4.
///
/// ```
/// use survey_report::{nilai, CategoryValues};
///
/// let score = nilai(&CategoryValues([40.0, 30.0, 20.0, 10.0]));
/// assert_eq!(format!("{:.2}", score), "3.00");
/// ```
pub fn nilai(values: &CategoryValues) -> f64 {
    values.iter().map(|(c, v)| v * c.weight()).sum::<f64>() / 100.0
}

/// A question with its score.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoredRow<'a> {
    pub record: &'a QuestionRecord,
    pub nilai: f64,
}

pub fn score_course(table: &CourseTable) -> Vec<ScoredRow<'_>> {
    table
        .questions
        .iter()
        .map(|record| ScoredRow {
            record,
            nilai: nilai(&record.values),
        })
        .collect()
}

use log::{debug, info, warn};
use std::collections::HashSet;

use crate::config::*;

/// Groups the raw rows by course and turns the percentages into numbers.
///
/// Rows that repeat a (course, question) pair are dropped: only the first
/// one is kept. Courses and questions keep the order in which they first
/// appear in the input.
///
/// Any percentage that cannot be read is an error and nothing is returned.
pub fn normalize(rows: &[RawRow]) -> Result<NormalizedSurvey, SurveyError> {
    info!("normalize: processing {} raw rows", rows.len());
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut survey = NormalizedSurvey::default();

    for row in rows.iter() {
        if !seen.insert((row.course.as_str(), row.question.as_str())) {
            debug!(
                "normalize: line {:?}: dropping duplicate question {:?} for course {:?}",
                row.lineno, row.question, row.course
            );
            continue;
        }
        let values = parse_values(row)?;
        let record = QuestionRecord {
            question: row.question.clone(),
            values,
        };
        match survey.courses.iter_mut().find(|ct| ct.course == row.course) {
            Some(ct) => ct.questions.push(record),
            None => survey.courses.push(CourseTable {
                course: row.course.clone(),
                questions: vec![record],
            }),
        }
    }

    info!(
        "normalize: {} courses, {} questions",
        survey.courses.len(),
        survey.num_questions()
    );
    Ok(survey)
}

/// Writes a normalized survey back as raw rows. Normalizing the result gives
/// back the same survey.
pub fn to_raw_rows(survey: &NormalizedSurvey) -> Vec<RawRow> {
    let mut res: Vec<RawRow> = Vec::new();
    for ct in survey.courses.iter() {
        for q in ct.questions.iter() {
            res.push(RawRow {
                course: ct.course.clone(),
                question: q.question.clone(),
                percentages: q.values.0.map(|v| format!("{}%", v)),
                lineno: None,
            });
        }
    }
    res
}

fn parse_values(row: &RawRow) -> Result<CategoryValues, SurveyError> {
    let mut values = [0.0; 4];
    for category in Category::ALL {
        let text = &row.percentages[category.index()];
        let v = parse_percentage(text).ok_or_else(|| SurveyError::MalformedPercentage {
            course: row.course.clone(),
            question: row.question.clone(),
            column: category,
            value: text.clone(),
        })?;
        if !(0.0..=100.0).contains(&v) {
            warn!(
                "normalize: line {:?}: value {} for {:?} is outside [0, 100] (course {:?}, question {:?})",
                row.lineno,
                v,
                category.label(),
                row.course,
                row.question
            );
        }
        values[category.index()] = round2(v);
    }
    Ok(CategoryValues(values))
}

/// Reads a percentage such as `"42.5%"`, `"42.5 %"` or `"42.5"`.
pub fn parse_percentage(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    match number.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Rounds to two decimals. Halves go to the even neighbour.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

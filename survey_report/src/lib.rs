/*!
Questionnaire reports for lecturers.

This crate turns the export of a course evaluation questionnaire (one row
per course and per question, with the percentage of each Likert answer) into
a report: for every course, a table of percentages with a score, followed by
one pie chart per question.

The crate only contains the logic of the report. Drawing the charts and
writing the document are delegated to implementations of [`ChartRenderer`]
and [`DocumentBuilder`].

```
use survey_report::*;

let rows = vec![RawRow {
    course: "Basis Data".to_string(),
    question: "Materi jelas?".to_string(),
    percentages: ["40%", "30%", "20%", "10%"].map(|s| s.to_string()),
    lineno: Some(2),
}];
let survey = normalize(&rows)?;
let table = survey.get("Basis Data").unwrap();
assert_eq!(ScoreDisplay::Percent.format(nilai(&table.questions[0].values)), "3.00%");

# Ok::<(), SurveyError>(())
```

See the [`manual`] for the expected input.
*/

mod chart;
mod config;
mod layout;
mod lecturer;
pub mod manual;
mod normalize;
mod score;

pub use crate::chart::*;
pub use crate::config::*;
pub use crate::layout::*;
pub use crate::lecturer::*;
pub use crate::normalize::*;
pub use crate::score::*;

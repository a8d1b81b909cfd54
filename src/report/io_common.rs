use std::collections::HashMap;
use std::path::Path;

use log::debug;
use snafu::prelude::*;
use survey_report::{Category, RawRow};

use crate::report::*;

pub const COURSE_COLUMN: &str = "Mata Kuliah";
pub const QUESTION_COLUMN: &str = "Pertanyaan";

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Name of the report written for a lecturer identifier.
pub fn output_file_name(lecturer_id: &str) -> String {
    format!("KL_Kuesioner_202312_{}_STMT (1).docx", lecturer_id)
}

/// Positions of the questionnaire columns in a row.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnIndexes {
    course: usize,
    question: usize,
    categories: [usize; 4],
}

impl ColumnIndexes {
    /// Given the header of a file (names of each of the columns), finds the
    /// position of each of the questionnaire columns.
    pub fn from_header(header: &[Option<String>], path: &str) -> ReportResult<ColumnIndexes> {
        let col_names: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(idx, x)| x.as_deref().map(|s| (s.trim(), idx)))
            .collect();
        debug!("from_header: col_names: {:?}", col_names);

        let find = |cname: &str| -> ReportResult<usize> {
            col_names
                .get(cname)
                .cloned()
                .context(MissingColumnSnafu {
                    column: cname,
                    path,
                })
        };

        let mut categories = [0; 4];
        for c in Category::ALL {
            categories[c.index()] = find(c.label())?;
        }
        Ok(ColumnIndexes {
            course: find(COURSE_COLUMN)?,
            question: find(QUESTION_COLUMN)?,
            categories,
        })
    }

    /// Builds a raw row out of the cells of a line, `cell` returning the
    /// content of a column.
    pub fn raw_row<F>(&self, cell: F, lineno: u64) -> ReportResult<RawRow>
    where
        F: Fn(usize) -> Option<String>,
    {
        let get = |idx: usize, column: &str| -> ReportResult<String> {
            cell(idx).context(LineTooShortSnafu { lineno, column })
        };
        let mut percentages: [String; 4] = Default::default();
        for c in Category::ALL {
            percentages[c.index()] = get(self.categories[c.index()], c.label())?;
        }
        Ok(RawRow {
            course: get(self.course, COURSE_COLUMN)?,
            question: get(self.question, QUESTION_COLUMN)?,
            percentages,
            lineno: Some(lineno),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<Option<String>> {
        names.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn file_names() {
        assert_eq!(
            simplify_file_name("/data/KL_Kuesioner_202312_JohnDoeSTMT (1).csv"),
            "KL_Kuesioner_202312_JohnDoeSTMT (1).csv"
        );
        assert_eq!(
            output_file_name("JohnDoe"),
            "KL_Kuesioner_202312_JohnDoe_STMT (1).docx"
        );
    }

    #[test]
    fn columns_in_any_order() {
        let h = header(&[
            "No",
            "Sangat Tidak Setuju",
            "Pertanyaan",
            "Tidak Setuju",
            "Setuju",
            "Mata Kuliah",
            "Sangat Setuju",
        ]);
        let cols = ColumnIndexes::from_header(&h, "x.csv").unwrap();
        let cells = ["1", "10%", "Q", "20%", "30%", "Basis Data", "40%"];
        let row = cols
            .raw_row(|i| cells.get(i).map(|s| s.to_string()), 2)
            .unwrap();
        assert_eq!(row.course, "Basis Data");
        assert_eq!(row.question, "Q");
        assert_eq!(row.percentages, ["40%", "30%", "20%", "10%"].map(|s| s.to_string()));
        assert_eq!(row.lineno, Some(2));
    }

    #[test]
    fn missing_column() {
        let h = header(&["Mata Kuliah", "Pertanyaan", "Sangat Setuju", "Setuju", "Tidak Setuju"]);
        let err = ColumnIndexes::from_header(&h, "x.csv").unwrap_err();
        assert!(matches!(
            err,
            ReportError::MissingColumn { ref column, .. } if column == "Sangat Tidak Setuju"
        ));
    }

    #[test]
    fn short_line() {
        let h = header(&[
            "Mata Kuliah",
            "Pertanyaan",
            "Sangat Setuju",
            "Setuju",
            "Tidak Setuju",
            "Sangat Tidak Setuju",
        ]);
        let cols = ColumnIndexes::from_header(&h, "x.csv").unwrap();
        let cells = ["A", "Q", "1%"];
        let err = cols
            .raw_row(|i| cells.get(i).map(|s| s.to_string()), 5)
            .unwrap_err();
        assert!(matches!(err, ReportError::LineTooShort { lineno: 5, .. }));
    }
}

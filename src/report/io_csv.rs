// Primitives for reading CSV files.

use std::io::Read;

use log::debug;
use snafu::prelude::*;
use survey_report::RawRow;

use crate::report::{io_common::ColumnIndexes, *};

pub fn read_csv_rows(path: &str) -> ReportResult<Vec<RawRow>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_csv_records(rdr, path)
}

/// Reads the questionnaire lines of a CSV source. The first line is the
/// header.
pub fn read_csv_records<R: Read>(
    mut rdr: csv::Reader<R>,
    source_name: &str,
) -> ReportResult<Vec<RawRow>> {
    let header: Vec<Option<String>> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1u64 })?
        .iter()
        .map(|s| Some(s.to_string()))
        .collect();
    debug!("read_csv_records: header: {:?}", header);
    let cols = ColumnIndexes::from_header(&header, source_name)?;

    let mut res: Vec<RawRow> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx as u64 + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_records: lineno: {:?} line: {:?}", lineno, line);
        if line.iter().all(|s| s.trim().is_empty()) {
            continue;
        }
        let row = cols.raw_row(|i| line.get(i).map(|s| s.to_string()), lineno)?;
        res.push(row);
    }
    Ok(res)
}

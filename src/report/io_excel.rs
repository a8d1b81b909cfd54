use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;
use survey_report::RawRow;

use crate::report::{io_common::ColumnIndexes, *};

pub fn read_excel_rows(path: &str, worksheet_name: Option<&str>) -> ReportResult<Vec<RawRow>> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header_row = iter.next().context(EmptyExcelSnafu { path })?;
    let header: Vec<Option<String>> = header_row.iter().map(header_name).collect();
    debug!("read_excel_rows: header: {:?}", header);
    let cols = ColumnIndexes::from_header(&header, path)?;

    let mut res: Vec<RawRow> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx as u64 + 2;
        debug!("read_excel_rows: lineno: {:?} row: {:?}", lineno, row);
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            continue;
        }
        let cells: Vec<String> = row
            .iter()
            .map(|c| cell_text(c, lineno))
            .collect::<ReportResult<Vec<String>>>()?;
        res.push(cols.raw_row(|i| cells.get(i).cloned(), lineno)?);
    }
    Ok(res)
}

fn header_name(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// The text of a cell. Numbers are written without a percent sign: a cell
/// containing `40` stands for 40%.
fn cell_text(cell: &DataType, lineno: u64) -> ReportResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Empty => Ok(String::new()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> ReportResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet) = worksheet_name {
        workbook
            .worksheet_range(worksheet)
            .context(MissingWorksheetSnafu { worksheet, path })?
            .context(OpeningExcelSnafu { path })
    } else {
        let names = workbook.sheet_names().to_vec();
        if names.len() > 1 {
            debug!(
                "get_range: {} worksheets, using the first one {:?}",
                names.len(),
                names.first()
            );
        }
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })
    }
}

use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_report::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use text_diff::print_diff;

use crate::args::Args;

mod chart_plotters;
mod docx_builder;
mod io_common;
mod io_csv;
mod io_excel;

use crate::report::chart_plotters::PieChartRenderer;
use crate::report::docx_builder::DocxBuilder;
use crate::report::io_common::*;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: u64 },
    #[snafu(display("Line {lineno} has no cell for column {column:?}"))]
    LineTooShort { lineno: u64, column: String },
    #[snafu(display("Cannot find column {column:?} in the header of {path}"))]
    MissingColumn { column: String, path: String },

    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet or no header found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {worksheet:?} not found in {path}"))]
    MissingWorksheet { worksheet: String, path: String },
    #[snafu(display("Unexpected cell at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },

    #[snafu(display("Unknown input type {input_type:?} (expected csv or xlsx)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Invalid questionnaire data: {source}"))]
    Normalizing { source: SurveyError },

    #[snafu(display("Could not assemble the report document: {message}"))]
    PackingDocument { message: String },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error processing the JSON summary"))]
    ParsingJson { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    fn parse(s: &str) -> ReportResult<InputType> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(InputType::Csv),
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            _ => UnknownInputTypeSnafu { input_type: s }.fail(),
        }
    }

    fn from_extension(path: &str) -> InputType {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => InputType::Xlsx,
            _ => InputType::Csv,
        }
    }
}

/// Everything the report run needs, resolved from the command line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input: String,
    pub input_type: InputType,
    pub excel_worksheet_name: Option<String>,
    pub out_dir: Option<String>,
    pub summary: Option<String>,
    pub reference: Option<String>,
}

impl RunSettings {
    pub fn from_args(args: &Args) -> ReportResult<RunSettings> {
        let input_type = match args.input_type.as_deref() {
            Some(s) => InputType::parse(s)?,
            None => InputType::from_extension(&args.input),
        };
        Ok(RunSettings {
            input: args.input.clone(),
            input_type,
            excel_worksheet_name: args.excel_worksheet_name.clone(),
            out_dir: args.out_dir.clone(),
            summary: args.summary.clone(),
            reference: args.reference.clone(),
        })
    }
}

// ********* JSON summary ***********

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub question: String,
    #[serde(rename = "sangatSetuju")]
    pub sangat_setuju: String,
    pub setuju: String,
    #[serde(rename = "tidakSetuju")]
    pub tidak_setuju: String,
    #[serde(rename = "sangatTidakSetuju")]
    pub sangat_tidak_setuju: String,
    pub nilai: String,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub course: String,
    pub questions: Vec<QuestionSummary>,
    pub charts: usize,
    #[serde(rename = "skippedCharts")]
    pub skipped_charts: usize,
    #[serde(rename = "chartPages")]
    pub chart_pages: usize,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub lecturer: String,
    #[serde(rename = "lecturerId")]
    pub lecturer_id: String,
    pub courses: Vec<CourseSummary>,
}

fn build_summary(
    survey: &NormalizedSurvey,
    layout: &ReportLayout,
    lecturer_id: &str,
) -> ReportSummary {
    let courses = survey
        .courses
        .iter()
        .zip(layout.courses.iter())
        .map(|(ct, cl)| CourseSummary {
            course: ct.course.clone(),
            questions: score_course(ct)
                .iter()
                .map(|s| {
                    let v = s.record.values;
                    QuestionSummary {
                        question: s.record.question.clone(),
                        sangat_setuju: format!("{:.2}", v.get(Category::SangatSetuju)),
                        setuju: format!("{:.2}", v.get(Category::Setuju)),
                        tidak_setuju: format!("{:.2}", v.get(Category::TidakSetuju)),
                        sangat_tidak_setuju: format!("{:.2}", v.get(Category::SangatTidakSetuju)),
                        nilai: format!("{:.2}", s.nilai),
                    }
                })
                .collect(),
            charts: cl.charts,
            skipped_charts: cl.skipped_charts,
            chart_pages: cl.chart_pages,
        })
        .collect();
    ReportSummary {
        lecturer: layout.lecturer.clone(),
        lecturer_id: lecturer_id.to_string(),
        courses,
    }
}

fn write_summary(summary: &ReportSummary, target: &str) -> ReportResult<()> {
    let pretty = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    if target == "stdout" {
        println!("{}", pretty);
    } else if !target.is_empty() {
        fs::write(target, &pretty).context(WritingOutputSnafu { path: target })?;
        info!("Summary written to {:?}", target);
    }
    Ok(())
}

pub fn read_summary(path: &str) -> ReportResult<ReportSummary> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu {})
}

fn check_reference(summary: &ReportSummary, reference_path: &str) -> ReportResult<()> {
    let reference = read_summary(reference_path)?;
    if reference != *summary {
        let pretty_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
        let pretty = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty.as_str(), "\n");
        whatever!("Difference detected between computed summary and reference summary")
    }
    info!("Summary matches the reference {:?}", reference_path);
    Ok(())
}

// ********* Run ***********

fn read_rows(settings: &RunSettings) -> ReportResult<Vec<RawRow>> {
    info!(
        "Attempting to read questionnaire file {:?} ({:?})",
        settings.input, settings.input_type
    );
    match settings.input_type {
        InputType::Csv => io_csv::read_csv_rows(&settings.input),
        InputType::Xlsx => {
            io_excel::read_excel_rows(&settings.input, settings.excel_worksheet_name.as_deref())
        }
    }
}

fn output_path(settings: &RunSettings, lecturer_id: &str) -> PathBuf {
    let dir: PathBuf = match &settings.out_dir {
        Some(d) => PathBuf::from(d),
        None => Path::new(&settings.input)
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default(),
    };
    dir.join(output_file_name(lecturer_id))
}

pub fn run_report(settings: &RunSettings) -> ReportResult<()> {
    let rows = read_rows(settings)?;
    info!("Read {} rows", rows.len());

    let survey = normalize(&rows).context(NormalizingSnafu {})?;
    drop(rows);

    let file_name = simplify_file_name(&settings.input);
    let (lecturer_id, lecturer_name) = lecturer_from_file_name(&file_name);
    if lecturer_id == UNKNOWN_LECTURER {
        warn!(
            "No lecturer found in file name {:?} (expected ..._<Name>{}...)",
            file_name, LECTURER_SUFFIX
        );
    }
    info!("Lecturer: {:?} ({})", lecturer_name, lecturer_id);

    let template = ReportTemplate::DEFAULT;
    let renderer = PieChartRenderer::default();
    let mut builder = DocxBuilder::new(&template);
    let layout = layout_report(&mut builder, &survey, &lecturer_name, &renderer, &template);
    debug!("layout: {:?}", layout);

    let summary = build_summary(&survey, &layout, &lecturer_id);
    if let Some(target) = &settings.summary {
        write_summary(&summary, target)?;
    }
    if let Some(reference_path) = &settings.reference {
        check_reference(&summary, reference_path)?;
    }

    let bytes = builder.into_bytes()?;
    let out = output_path(settings, &lecturer_id);
    let out_s = out.display().to_string();
    fs::write(&out, bytes).context(WritingOutputSnafu { path: out_s.clone() })?;
    info!("Report written to {:?}", out_s);
    Ok(())
}

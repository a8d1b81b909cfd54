use clap::Parser;

/// Name of the questionnaire export read when no input is given.
pub const DEFAULT_INPUT: &str = "KL_Kuesioner_202312_MochammadFathurridhoHermantoSTMT (1).csv";

/// This program writes the questionnaire report of a lecturer: one table of
/// answers and one page of pie charts per course.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The questionnaire export, in CSV or Excel format. The name of the lecturer
    /// is read from the name of this file.
    #[clap(value_parser, default_value = DEFAULT_INPUT)]
    pub input: String,

    /// (csv or xlsx) The type of the input. By default, it is guessed from the extension of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. The first worksheet is
    /// used otherwise.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (directory, optional) Where to write the report. By default, next to the input.
    #[clap(long, value_parser)]
    pub out_dir: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of the scores will be written in JSON format
    /// to the given location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, the program will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

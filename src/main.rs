mod args;
mod report;

use clap::Parser;
use log::{error, info, LevelFilter};

use crate::args::Args;
use crate::report::RunSettings;

fn main() {
    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    info!("args: {:?}", args);

    let res = RunSettings::from_args(&args).and_then(|settings| report::run_report(&settings));
    if let Err(e) = res {
        error!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(s) = source {
            eprintln!("  caused by: {}", s);
            source = s.source();
        }
        std::process::exit(1);
    }
}

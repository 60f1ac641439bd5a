mod cli;
mod config;
mod dataset;
mod error;
mod excel;
mod fetch;
mod logging;
mod normalize;
mod numeric;
mod path_policy;
mod pipeline;
mod summary;
use clap::Parser as _;
use cli::Args;
use config::Settings;
use normalize::{Normalizer, TargetSchema};
use pipeline::Pipeline;
use std::process::ExitCode;
use summary::print_summary;
use tracing::error;
pub type Result<T> = std::result::Result<T, error::Error>;
fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
fn run(args: &Args) -> Result<()> {
    let settings = Settings::load()?;
    let level = args.log_level.as_deref().unwrap_or(&settings.log_level);
    let _log_guard = logging::init(level, &settings.log_file);
    let normalizer = Normalizer::new(TargetSchema::default(), args.column_mapping());
    let outcome = Pipeline::new(&settings, normalizer)
        .run(&args.run_request())
        .inspect_err(|e| error!("run failed: {e}"))?;
    print_summary(&outcome);
    Ok(())
}

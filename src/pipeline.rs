use crate::{
    Result,
    config::Settings,
    dataset::Dataset,
    error::Error,
    excel::{
        reader::{ReadOptions, read_sheet},
        writer::{DEFAULT_SHEET_NAME, write_sheet},
    },
    fetch::{ExternalSource, Fetcher},
    normalize::{NormalizeReport, Normalizer},
    path_policy::{resolve_input, resolve_output},
};
use std::path::PathBuf;
use tracing::info;
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub api_path: Option<String>,
    pub scraping_url: Option<String>,
    pub read: ReadOptions,
    pub table_index: usize,
}
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub local_rows: usize,
    pub external_rows: usize,
    pub report: NormalizeReport,
}
pub struct Pipeline<'a> {
    settings: &'a Settings,
    normalizer: Normalizer,
}
impl<'a> Pipeline<'a> {
    pub const fn new(settings: &'a Settings, normalizer: Normalizer) -> Self {
        Self {
            settings,
            normalizer,
        }
    }
    pub fn run(&self, req: &RunRequest) -> Result<RunOutcome> {
        let fetcher = Fetcher::new(self.settings, req.table_index);
        self.run_with_source(req, &fetcher)
    }
    pub fn run_with_source<S: ExternalSource>(&self, req: &RunRequest, source: &S) -> Result<RunOutcome> {
        let input = resolve_input(req.input.as_deref(), &self.settings.input_dir)?;
        let output = resolve_output(
            req.output.as_deref(),
            &self.settings.output_dir,
            input.as_deref(),
        );
        let mut parts: Vec<Dataset> = Vec::with_capacity(2);
        let mut local_rows = 0usize;
        if let Some(ref path) = input {
            let local = read_sheet(path, &req.read)?;
            local_rows = local.len();
            parts.push(local);
        }
        let mut external_rows = 0usize;
        if let Some(api_path) = req.api_path.as_deref().filter(|p| !p.trim().is_empty())
            && let Some(external) = source.fetch(api_path, req.scraping_url.as_deref())
            && !external.is_empty()
        {
            external_rows = external.len();
            parts.push(external);
        }
        if parts.is_empty() {
            return Err(Error::not_found(format!(
                "no input data: no spreadsheet in {} and no external data",
                self.settings.input_dir.display()
            )));
        }
        let combined = Dataset::concat(parts);
        info!(
            local_rows,
            external_rows,
            total = combined.len(),
            "datasets combined"
        );
        let (normalized, report) = self.normalizer.normalize(&combined);
        let output = write_sheet(&normalized, &output, DEFAULT_SHEET_NAME)?;
        Ok(RunOutcome {
            input,
            output,
            local_rows,
            external_rows,
            report,
        })
    }
}

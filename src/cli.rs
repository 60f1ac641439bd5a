use crate::{
    excel::reader::{ReadOptions, SheetSelector},
    normalize::ColumnMapping,
    pipeline::RunRequest,
};
use clap::Parser;
use std::path::PathBuf;
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sheetflow",
    version,
    about = "Standardize a spreadsheet, merging REST or scraped HTML table data into a styled .xlsx"
)]
pub struct Args {
    /// Input spreadsheet (default: first .xlsx in INPUT_DIR)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Output .xlsx path (default: OUTPUT_DIR/<stem>_padronizado.xlsx)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// API endpoint path, relative to API_BASE_URL
    #[arg(long)]
    pub api_path: Option<String>,
    /// Page whose HTML table is used when the API request fails
    #[arg(long)]
    pub scraping_url: Option<String>,
    /// Log level override (TRACE, DEBUG, INFO, WARNING, ERROR, CRITICAL)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Sheet to read, by name or zero-based index
    #[arg(long, value_name = "NAME|INDEX", default_value = "0")]
    pub sheet: SheetSelector,
    /// Zero-based header row, counted after skipped rows
    #[arg(long, default_value_t = 0)]
    pub header_row: usize,
    /// Rows to drop from the top of the sheet before the header
    #[arg(long, default_value_t = 0)]
    pub skip_rows: usize,
    /// Zero-based index of the HTML table to scrape
    #[arg(long, default_value_t = 0)]
    pub table_index: usize,
    /// Column rename applied before normalization (repeatable)
    #[arg(long = "map", value_name = "SOURCE=TARGET", value_parser = parse_mapping)]
    pub mappings: Vec<(String, String)>,
}
impl Args {
    pub fn run_request(&self) -> RunRequest {
        RunRequest {
            input: self.input.clone(),
            output: self.output.clone(),
            api_path: self.api_path.clone(),
            scraping_url: self.scraping_url.clone(),
            read: ReadOptions {
                sheet: self.sheet.clone(),
                header_row: self.header_row,
                skip_rows: self.skip_rows,
            },
            table_index: self.table_index,
        }
    }
    pub fn column_mapping(&self) -> ColumnMapping {
        self.mappings.iter().cloned().collect()
    }
}
fn parse_mapping(raw: &str) -> Result<(String, String), String> {
    let (source, target) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SOURCE=TARGET, got '{raw}'"))?;
    let (source, target) = (source.trim(), target.trim());
    if source.is_empty() || target.is_empty() {
        return Err(format!("empty column name in '{raw}'"));
    }
    Ok((source.to_string(), target.to_string()))
}

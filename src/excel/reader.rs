use crate::{
    Result,
    dataset::{Dataset, Value},
    error::Error,
    numeric::i64_to_f64,
};
use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::Timelike as _;
use std::{collections::HashMap, path::Path};
use tracing::{error, info};
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}
impl Default for SheetSelector {
    fn default() -> Self {
        Self::Index(0)
    }
}
impl std::str::FromStr for SheetSelector {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<usize>()
            .map_or_else(|_| Self::Name(s.to_string()), Self::Index))
    }
}
impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Name(ref name) => f.write_str(name),
        }
    }
}
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub sheet: SheetSelector,
    pub header_row: usize,
    pub skip_rows: usize,
}
pub fn read_sheet(path: &Path, options: &ReadOptions) -> Result<Dataset> {
    if !path.exists() {
        return Err(Error::not_found(format!(
            "input file does not exist: {}",
            path.display()
        )));
    }
    info!(path = %path.display(), sheet = %options.sheet, "reading spreadsheet");
    let range = load_range(path, &options.sheet).inspect_err(|e| {
        error!(path = %path.display(), "failed to read spreadsheet: {e}");
    })?;
    let ds = range_to_dataset(&range, options.header_row, options.skip_rows).map_err(|e| {
        Error::format(format!("{}: {e}", path.display()))
    })?;
    info!(
        rows = ds.len(),
        columns = ds.columns().len(),
        "spreadsheet loaded"
    );
    Ok(ds)
}
fn load_range(path: &Path, sheet: &SheetSelector) -> Result<Range<Data>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        Error::format(format!(
            "cannot open {} as a spreadsheet ({e})",
            path.display()
        ))
    })?;
    let sheet_names = workbook.sheet_names();
    let name = match *sheet {
        SheetSelector::Index(i) => sheet_names.get(i).cloned().ok_or_else(|| {
            Error::format(format!(
                "sheet index {i} out of range ({} sheets): {}",
                sheet_names.len(),
                path.display()
            ))
        })?,
        SheetSelector::Name(ref wanted) => {
            if !sheet_names.iter().any(|n| n == wanted) {
                return Err(Error::format(format!(
                    "sheet '{wanted}' not found in {}",
                    path.display()
                )));
            }
            wanted.clone()
        }
    };
    workbook.worksheet_range(&name).map_err(|e| {
        Error::format(format!(
            "cannot read sheet '{name}' of {} ({e})",
            path.display()
        ))
    })
}
fn range_to_dataset(
    range: &Range<Data>,
    header_row: usize,
    skip_rows: usize,
) -> std::result::Result<Dataset, String> {
    // calamine ranges begin at the first used row; positions count from the top of the sheet.
    let lead = range
        .start()
        .map_or(0, |(r, _)| usize::try_from(r).unwrap_or(usize::MAX));
    let header_pos = skip_rows.saturating_add(header_row);
    let mut rows = range.rows();
    let columns = if header_pos < lead {
        header_names(&vec![Data::Empty; range.width()])
    } else {
        let Some(header) = rows.nth(header_pos - lead) else {
            if range.is_empty() && header_row == 0 {
                return Ok(Dataset::default());
            }
            return Err(format!(
                "header row {header_row} (after skipping {skip_rows}) is beyond the sheet"
            ));
        };
        header_names(header)
    };
    let mut ds = Dataset::new(columns);
    for row in rows {
        let values: Vec<Value> = row.iter().map(cell_value).collect();
        if values.iter().all(Value::is_null) {
            continue;
        }
        ds.push_row(values);
    }
    Ok(ds)
}
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let raw = cell_value(cell).display().trim().to_string();
            let base = if raw.is_empty() {
                format!("Unnamed: {i}")
            } else {
                raw
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}
fn cell_value(cell: &Data) -> Value {
    match *cell {
        Data::Int(v) => Value::Number(i64_to_f64(v)),
        Data::Float(v) => Value::Number(v),
        Data::String(ref s) if s.is_empty() => Value::Null,
        Data::String(ref s) => Value::Text(s.clone()),
        Data::Bool(b) => Value::Bool(b),
        Data::DateTime(ref dt) => dt.as_datetime().map_or(Value::Null, |d| {
            if d.hour() == 0 && d.minute() == 0 && d.second() == 0 {
                Value::Text(d.format("%Y-%m-%d").to_string())
            } else {
                Value::Text(d.format("%Y-%m-%d %H:%M:%S").to_string())
            }
        }),
        Data::DateTimeIso(ref s) | Data::DurationIso(ref s) => Value::Text(s.clone()),
        Data::Error(_) | Data::Empty => Value::Null,
    }
}

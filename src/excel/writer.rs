use crate::{
    Result,
    dataset::{Dataset, Value},
    error::Error,
};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, Worksheet, XlsxError};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;
pub const DEFAULT_SHEET_NAME: &str = "Dados";
const HEADER_FILL: u32 = 0x001F_3864;
const HEADER_FONT: u32 = 0x00FF_FFFF;
const ALT_ROW_FILL: u32 = 0x00E8_EAED;
const WIDTH_PADDING: usize = 4;
const MAX_COLUMN_WIDTH: usize = 50;
struct SheetStyles {
    header: Format,
    shaded: Format,
    plain: Format,
}
impl SheetStyles {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(HEADER_FONT))
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            shaded: Format::new()
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(ALT_ROW_FILL)),
            plain: Format::new(),
        }
    }
    const fn body(&self, data_index: usize) -> &Format {
        if data_index % 2 == 0 {
            &self.shaded
        } else {
            &self.plain
        }
    }
}
pub fn write_sheet(ds: &Dataset, path: &Path, sheet_name: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let mut book = Workbook::new();
    let ws = book.add_worksheet();
    fill_worksheet(ws, ds, sheet_name).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    book.save(path).map_err(|source| match source {
        XlsxError::IoError(io) => Error::io(path, io),
        other => Error::Write {
            path: path.to_path_buf(),
            source: other,
        },
    })?;
    info!(path = %path.display(), rows = ds.len(), "spreadsheet saved");
    Ok(path.to_path_buf())
}
fn fill_worksheet(
    ws: &mut Worksheet,
    ds: &Dataset,
    sheet_name: &str,
) -> std::result::Result<(), XlsxError> {
    let styles = SheetStyles::new();
    ws.set_name(sheet_name)?;
    for (col, name) in ds.columns().iter().enumerate() {
        ws.write_string_with_format(0, col_num(col)?, name, &styles.header)?;
    }
    for (i, row) in ds.rows().iter().enumerate() {
        let r = row_num(i + 1)?;
        let format = styles.body(i);
        for (col, value) in row.iter().enumerate() {
            let c = col_num(col)?;
            match *value {
                Value::Null => ws.write_blank(r, c, format)?,
                Value::Number(v) => ws.write_number_with_format(r, c, v, format)?,
                Value::Text(ref s) => ws.write_string_with_format(r, c, s, format)?,
                Value::Bool(b) => ws.write_boolean_with_format(r, c, b, format)?,
            };
        }
    }
    for (col, width) in column_widths(ds).into_iter().enumerate() {
        ws.set_column_width(col_num(col)?, u8::try_from(width).unwrap_or(u8::MAX))?;
    }
    if let Some(last_col) = ds.columns().len().checked_sub(1) {
        ws.autofilter(0, 0, row_num(ds.len())?, col_num(last_col)?)?;
        info!(range = ?filter_ref(ds), "auto-filter applied");
    }
    Ok(())
}
fn filter_ref(ds: &Dataset) -> Option<String> {
    let last_col = ds.columns().len().checked_sub(1)?;
    Some(format!("A1:{}{}", col_to_name(last_col + 1), ds.len() + 1))
}
pub fn column_widths(ds: &Dataset) -> Vec<usize> {
    ds.columns()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let longest_value = ds
                .column_values(i)
                .map(|v| v.display().chars().count())
                .max()
                .unwrap_or(0);
            let longest = longest_value.max(name.chars().count());
            (longest + WIDTH_PADDING).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}
pub fn col_to_name(mut col: usize) -> String {
    if col == 0 {
        return "A".to_string();
    }
    let mut rev = Vec::new();
    while col > 0 {
        let rem = u8::try_from((col - 1) % 26).unwrap_or(0);
        rev.push(char::from(b'A' + rem));
        col = (col - 1) / 26;
    }
    rev.into_iter().rev().collect()
}
fn row_num(i: usize) -> std::result::Result<u32, XlsxError> {
    u32::try_from(i).map_err(|_| XlsxError::RowColumnLimitError)
}
fn col_num(i: usize) -> std::result::Result<u16, XlsxError> {
    u16::try_from(i).map_err(|_| XlsxError::RowColumnLimitError)
}
#[cfg(test)]
mod tests {
    use super::{DEFAULT_SHEET_NAME, col_to_name, column_widths, filter_ref, write_sheet};
    use crate::{
        dataset::{Dataset, Value},
        error::Error,
        excel::reader::{ReadOptions, read_sheet},
    };
    use pretty_assertions::assert_eq;
    use std::{fs::File, io::Read as _, path::Path};
    fn zip_entry(path: &Path, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }
    fn cell_style(sheet_xml: &str, cell: &str) -> String {
        let open = format!("<c r=\"{cell}\"");
        let start = sheet_xml.find(&open).unwrap();
        let tag = &sheet_xml[start..start + sheet_xml[start..].find('>').unwrap()];
        tag.split_once(" s=\"")
            .and_then(|(_, rest)| rest.split_once('"'))
            .map(|(s, _)| s.to_string())
            .unwrap_or_default()
    }
    fn standard() -> Dataset {
        Dataset::from_parts(
            ["id", "nome", "valor", "data", "status"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            vec![
                vec![
                    Value::Number(1.0),
                    Value::text("Alpha"),
                    Value::Number(100.0),
                    Value::text("2024-01-01"),
                    Value::text("ativo"),
                ],
                vec![
                    Value::Number(2.0),
                    Value::text("Beta"),
                    Value::Number(200.5),
                    Value::text("2024-01-02"),
                    Value::text("inativo"),
                ],
            ],
        )
    }
    #[test]
    fn creates_nested_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("dir").join("output.xlsx");
        let written = write_sheet(&standard(), &out, DEFAULT_SHEET_NAME).unwrap();
        assert_eq!(written, out);
        assert!(out.exists());
    }
    #[test]
    fn written_sheet_reads_back_with_same_shape() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("round_trip.xlsx");
        let ds = standard();
        write_sheet(&ds, &out, DEFAULT_SHEET_NAME).unwrap();
        let back = read_sheet(&out, &ReadOptions::default()).unwrap();
        assert_eq!(back.columns(), ds.columns());
        assert_eq!(back.len(), ds.len());
        assert_eq!(back.value(1, "valor"), Some(&Value::Number(200.5)));
    }
    #[test]
    fn empty_dataset_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.xlsx");
        let ds = Dataset::new(vec!["id".to_string(), "nome".to_string()]);
        write_sheet(&ds, &out, DEFAULT_SHEET_NAME).unwrap();
        let back = read_sheet(&out, &ReadOptions::default()).unwrap();
        assert_eq!(back.columns(), ["id", "nome"]);
        assert!(back.is_empty());
    }
    #[test]
    fn unwritable_destination_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let res = write_sheet(&standard(), &blocker.join("out.xlsx"), DEFAULT_SHEET_NAME);
        assert!(matches!(res, Err(Error::Io { .. })));
    }
    #[test]
    fn widths_follow_longest_value_with_padding_and_cap() {
        let ds = Dataset::from_parts(
            vec!["id".to_string(), "nome".to_string()],
            vec![vec![Value::Number(12345.0), Value::text("x".repeat(80))]],
        );
        assert_eq!(column_widths(&ds), vec![9, 50]);
    }
    #[test]
    fn header_and_alternate_rows_are_styled() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("styled.xlsx");
        let mut ds = standard();
        ds.push_row(vec![Value::Number(3.0), Value::text("Gamma")]);
        write_sheet(&ds, &out, DEFAULT_SHEET_NAME).unwrap();
        let sheet = zip_entry(&out, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<autoFilter ref="A1:E4"/>"#), "{sheet}");
        let header = cell_style(&sheet, "A1");
        let first = cell_style(&sheet, "A2");
        let second = cell_style(&sheet, "A3");
        assert_eq!(cell_style(&sheet, "A4"), first, "every second row shares the shading");
        assert_ne!(first, second);
        assert_ne!(header, first);
        assert_eq!(cell_style(&sheet, "E4"), first, "blank cells keep the row style");
        let styles = zip_entry(&out, "xl/styles.xml");
        for needle in [
            "FF1F3864",
            "FFE8EAED",
            "FFFFFFFF",
            "<b/>",
            r#"horizontal="center""#,
            r#"vertical="center""#,
        ] {
            assert!(styles.contains(needle), "missing {needle} in {styles}");
        }
    }
    #[test]
    fn filter_covers_header_and_every_row() {
        assert_eq!(filter_ref(&standard()).as_deref(), Some("A1:E3"));
        assert_eq!(filter_ref(&Dataset::default()), None);
    }
    #[test]
    fn column_letters() {
        assert_eq!(col_to_name(1), "A");
        assert_eq!(col_to_name(5), "E");
        assert_eq!(col_to_name(27), "AA");
    }
}

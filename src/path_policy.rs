use crate::{Result, error::Error};
use std::{
    cmp::Ordering,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
const OUTPUT_SUFFIX: &str = "_padronizado";
const DEFAULT_STEM: &str = "output";
pub fn resolve_input(explicit: Option<&Path>, input_dir: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        return Ok(Some(path.to_path_buf()));
    }
    if !input_dir.is_dir() {
        debug!(dir = %input_dir.display(), "input directory missing, no local input");
        return Ok(None);
    }
    let entries = fs::read_dir(input_dir).map_err(|e| Error::io(input_dir, e))?;
    let mut candidates: Vec<InputCandidate> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(input_dir, e))?;
        let path = entry.path();
        if !path.is_file() || !is_workbook_name(&path) {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        candidates.push(InputCandidate {
            natural_key: split_natural_parts(&name),
            path,
        });
    }
    candidates.sort_by(|a, b| {
        compare_natural_parts(&a.natural_key, &b.natural_key).then_with(|| a.path.cmp(&b.path))
    });
    let first = candidates.into_iter().next().map(|c| c.path);
    if let Some(ref path) = first {
        info!(path = %path.display(), "input discovered in input directory");
    }
    Ok(first)
}
pub fn resolve_output(explicit: Option<&Path>, output_dir: &Path, input: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let stem = input
        .and_then(Path::file_stem)
        .map_or_else(|| DEFAULT_STEM.to_string(), |s| s.to_string_lossy().into_owned());
    output_dir.join(format!("{stem}{OUTPUT_SUFFIX}.xlsx"))
}
fn is_workbook_name(path: &Path) -> bool {
    let lock_file = path
        .file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with("~$"));
    !lock_file
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}
struct InputCandidate {
    path: PathBuf,
    natural_key: Vec<NaturalPart>,
}
#[derive(Debug, Clone, PartialEq, Eq)]
enum NaturalPart {
    Number { normalized: String, raw_len: usize },
    Text(String),
}
fn split_natural_parts(s: &str) -> Vec<NaturalPart> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut digit_mode: Option<bool> = None;
    for ch in s.chars() {
        let is_digit = ch.is_ascii_digit();
        match digit_mode {
            Some(mode) if mode != is_digit => {
                push_natural_part(&mut out, &buf, mode);
                buf.clear();
            }
            _ => {}
        }
        digit_mode = Some(is_digit);
        buf.push(ch);
    }
    if let Some(mode) = digit_mode {
        push_natural_part(&mut out, &buf, mode);
    }
    out
}
fn push_natural_part(out: &mut Vec<NaturalPart>, raw: &str, digit_mode: bool) {
    if digit_mode {
        let trimmed = raw.trim_start_matches('0');
        out.push(NaturalPart::Number {
            normalized: if trimmed.is_empty() { "0" } else { trimmed }.to_string(),
            raw_len: raw.len(),
        });
    } else {
        out.push(NaturalPart::Text(raw.to_lowercase()));
    }
}
fn compare_natural_parts(a_parts: &[NaturalPart], b_parts: &[NaturalPart]) -> Ordering {
    a_parts
        .iter()
        .zip(b_parts)
        .map(|(a, b)| compare_natural_part(a, b))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a_parts.len().cmp(&b_parts.len()))
}
fn compare_natural_part(a: &NaturalPart, b: &NaturalPart) -> Ordering {
    match (a, b) {
        (
            &NaturalPart::Number {
                normalized: ref a_num,
                raw_len: a_raw,
            },
            &NaturalPart::Number {
                normalized: ref b_num,
                raw_len: b_raw,
            },
        ) => a_num
            .len()
            .cmp(&b_num.len())
            .then_with(|| a_num.cmp(b_num))
            .then_with(|| a_raw.cmp(&b_raw)),
        (&NaturalPart::Text(ref a_text), &NaturalPart::Text(ref b_text)) => a_text.cmp(b_text),
        (&NaturalPart::Number { .. }, &NaturalPart::Text(_)) => Ordering::Less,
        (&NaturalPart::Text(_), &NaturalPart::Number { .. }) => Ordering::Greater,
    }
}

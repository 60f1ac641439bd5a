use crate::{
    Result,
    dataset::{Record, Value},
    error::Error,
};
use tracing::info;
#[derive(Debug, Clone, Copy)]
struct Span {
    body_start: usize,
    body_end: usize,
}
pub fn extract_table(html: &str, table_index: usize) -> Result<Vec<Record>> {
    let tables = find_elements(html, "table", 0, html.len());
    let Some(table) = tables.get(table_index).copied() else {
        return Err(Error::format(format!(
            "table index {table_index} not found (document has {} tables)",
            tables.len()
        )));
    };
    let headers: Vec<String> = find_elements(html, "th", table.body_start, table.body_end)
        .into_iter()
        .map(|span| inner_text(slice(html, span)))
        .collect();
    if headers.is_empty() {
        return Err(Error::format("table has no header cells (<th>)"));
    }
    let mut rows = Vec::new();
    for tr in find_elements(html, "tr", table.body_start, table.body_end) {
        let cells = find_elements(html, "td", tr.body_start, tr.body_end);
        if cells.is_empty() {
            continue;
        }
        let record: Record = headers
            .iter()
            .zip(cells)
            .map(|(header, cell)| (header.clone(), Value::Text(inner_text(slice(html, cell)))))
            .collect();
        rows.push(record);
    }
    info!(rows = rows.len(), table_index, "extracted HTML table");
    Ok(rows)
}
fn slice(html: &str, span: Span) -> &str {
    html.get(span.body_start..span.body_end).unwrap_or_default()
}
fn find_elements(html: &str, tag_name: &str, from: usize, to: usize) -> Vec<Span> {
    let mut out = Vec::new();
    let mut cursor = from;
    while let Some(start) = find_start_tag(html, tag_name, cursor, to) {
        let Some(open_end) = find_tag_end(html, start) else {
            break;
        };
        let body_start = open_end + 1;
        let body_end = find_element_end(html, tag_name, body_start, to);
        out.push(Span {
            body_start,
            body_end,
        });
        cursor = body_start;
    }
    out
}
fn find_element_end(html: &str, tag_name: &str, from: usize, to: usize) -> usize {
    if tag_name.eq_ignore_ascii_case("td") || tag_name.eq_ignore_ascii_case("th") {
        return ["td", "th", "tr"]
            .iter()
            .filter_map(|t| find_start_tag(html, t, from, to))
            .chain(
                [tag_name, "tr", "table"]
                    .iter()
                    .filter_map(|t| find_end_tag(html, t, from, to)),
            )
            .min()
            .unwrap_or(to);
    }
    if tag_name.eq_ignore_ascii_case("tr") {
        return [
            find_start_tag(html, "tr", from, to),
            find_end_tag(html, "tr", from, to),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(to);
    }
    let mut depth = 0usize;
    let mut cursor = from;
    while let Some((pos, closing)) = next_tag_named(html, tag_name, cursor, to) {
        if !closing {
            depth += 1;
        } else if depth == 0 {
            return pos;
        } else {
            depth -= 1;
        }
        cursor = pos + 1;
    }
    to
}
fn next_tag_named(html: &str, tag_name: &str, from: usize, to: usize) -> Option<(usize, bool)> {
    let open = find_start_tag(html, tag_name, from, to);
    let close = find_end_tag(html, tag_name, from, to);
    match (open, close) {
        (Some(o), Some(c)) if o < c => Some((o, false)),
        (_, Some(c)) => Some((c, true)),
        (Some(o), None) => Some((o, false)),
        (None, None) => None,
    }
}
fn find_start_tag(html: &str, tag_name: &str, from: usize, to: usize) -> Option<usize> {
    let mut cursor = from.min(to);
    while let Some(rel) = html.get(cursor..to)?.find('<') {
        let start = cursor + rel;
        let rest = html.get(start + 1..to)?;
        if rest.starts_with("!--") {
            cursor = rest
                .find("-->")
                .map_or(to, |end| start + 1 + end + "-->".len());
            continue;
        }
        if rest.starts_with('/') || rest.starts_with('!') || rest.starts_with('?') {
            cursor = start + 1;
            continue;
        }
        if tag_name_matches(rest, tag_name) {
            return Some(start);
        }
        cursor = start + 1;
    }
    None
}
fn find_end_tag(html: &str, tag_name: &str, from: usize, to: usize) -> Option<usize> {
    let mut cursor = from.min(to);
    while let Some(rel) = html.get(cursor..to)?.find("</") {
        let start = cursor + rel;
        let rest = html.get(start + 2..to)?;
        if tag_name_matches(rest, tag_name) {
            return Some(start);
        }
        cursor = start + 2;
    }
    None
}
fn tag_name_matches(rest: &str, tag_name: &str) -> bool {
    let name_end = rest
        .find(|ch: char| ch.is_ascii_whitespace() || ch == '/' || ch == '>')
        .unwrap_or(rest.len());
    rest.get(..name_end)
        .is_some_and(|raw| raw.eq_ignore_ascii_case(tag_name))
}
fn find_tag_end(html: &str, tag_start: usize) -> Option<usize> {
    let bytes = html.as_bytes();
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(tag_start) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}
fn inner_text(fragment: &str) -> String {
    let mut out = String::new();
    let mut cursor = 0usize;
    while cursor < fragment.len() {
        let rest = fragment.get(cursor..).unwrap_or_default();
        let Some(lt) = rest.find('<') else {
            push_text(&mut out, rest);
            break;
        };
        push_text(&mut out, rest.get(..lt).unwrap_or_default());
        let tag_start = cursor + lt;
        if rest.get(lt..).is_some_and(|t| t.starts_with("<!--")) {
            cursor = fragment
                .get(tag_start..)
                .and_then(|t| t.find("-->"))
                .map_or(fragment.len(), |end| tag_start + end + "-->".len());
            continue;
        }
        cursor = find_tag_end(fragment, tag_start).map_or(fragment.len(), |end| end + 1);
    }
    out
}
fn push_text(out: &mut String, raw: &str) {
    let decoded = decode_entities(raw);
    out.push_str(decoded.trim());
}
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut i = 0usize;
    while i < s.len() {
        let rest = s.get(i..).unwrap_or_default();
        if rest.starts_with('&')
            && let Some(end_rel) = rest.find(';')
            && end_rel > 1
            && let Some(decoded) = rest.get(1..end_rel).and_then(decode_single_entity)
        {
            out.push(decoded);
            i += end_rel + 1;
            continue;
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
            i += ch.len_utf8();
        } else {
            break;
        }
    }
    out
}
fn decode_single_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        "nbsp" => Some('\u{a0}'),
        _ => decode_numeric_entity(entity),
    }
}
fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    None
}

use crate::dataset::{Dataset, Value, ValueKey};
use std::collections::HashSet;
use tracing::{debug, info, warn};
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}
impl ColumnKind {
    fn fill_value(self) -> Value {
        match self {
            Self::Numeric => Value::Number(0.0),
            Self::Text => Value::text(""),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    pub name: String,
    pub kind: ColumnKind,
}
impl SchemaColumn {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSchema {
    columns: Vec<SchemaColumn>,
}
impl Default for TargetSchema {
    fn default() -> Self {
        Self::new(vec![
            SchemaColumn::new("id", ColumnKind::Numeric),
            SchemaColumn::new("nome", ColumnKind::Text),
            SchemaColumn::new("valor", ColumnKind::Numeric),
            SchemaColumn::new("data", ColumnKind::Text),
            SchemaColumn::new("status", ColumnKind::Text),
        ])
    }
}
impl TargetSchema {
    pub const fn new(columns: Vec<SchemaColumn>) -> Self {
        Self { columns }
    }
    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
    fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }
}
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pairs: Vec<(String, String)>,
}
impl ColumnMapping {
    pub fn target_for<'a>(&'a self, source: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|&&(ref from, _)| from == source)
            .map_or(source, |&(_, ref to)| to.as_str())
    }
}
impl FromIterator<(String, String)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for (from, to) in iter {
            if let Some(existing) = pairs.iter_mut().find(|pair| pair.0 == from) {
                existing.1 = to;
            } else {
                pairs.push((from, to));
            }
        }
        Self { pairs }
    }
}
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub cells_filled: usize,
    pub columns_added: Vec<String>,
    pub output_rows: usize,
}
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    schema: TargetSchema,
    mapping: ColumnMapping,
}
impl Normalizer {
    pub const fn new(schema: TargetSchema, mapping: ColumnMapping) -> Self {
        Self { schema, mapping }
    }
    pub fn normalize(&self, ds: &Dataset) -> (Dataset, NormalizeReport) {
        let mut report = NormalizeReport {
            input_rows: ds.len(),
            ..NormalizeReport::default()
        };
        let (names, sources) = self.renamed_columns(ds);
        let mut seen: HashSet<Vec<ValueKey>> = HashSet::with_capacity(ds.len());
        let mut rows: Vec<Vec<Value>> = Vec::with_capacity(ds.len());
        for row in ds.rows() {
            let projected: Vec<Value> = sources
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
                .collect();
            if seen.insert(projected.iter().map(Value::key).collect()) {
                rows.push(projected);
            }
        }
        report.duplicates_removed = ds.len() - rows.len();
        if report.duplicates_removed > 0 {
            warn!(
                removed = report.duplicates_removed,
                "duplicate rows removed"
            );
        }
        for (col, name) in names.iter().enumerate() {
            let fill = self.column_kind(name, &rows, col).fill_value();
            for cell in rows.iter_mut().filter_map(|r| r.get_mut(col)) {
                if cell.is_null() {
                    *cell = fill.clone();
                    report.cells_filled += 1;
                }
            }
        }
        let mut layout: Vec<Result<usize, Value>> = Vec::with_capacity(self.schema.columns().len());
        for column in self.schema.columns() {
            if let Some(i) = names.iter().position(|n| *n == column.name) {
                layout.push(Ok(i));
            } else {
                warn!(column = %column.name, "schema column missing, filling with defaults");
                report.columns_added.push(column.name.clone());
                layout.push(Err(column.kind.fill_value()));
            }
        }
        let dropped: Vec<&String> = names
            .iter()
            .filter(|n| self.schema.kind_of(n).is_none())
            .collect();
        if !dropped.is_empty() {
            debug!(?dropped, "columns outside the schema dropped");
        }
        let out_rows: Vec<Vec<Value>> = rows
            .iter()
            .map(|row| {
                layout
                    .iter()
                    .map(|slot| match *slot {
                        Ok(i) => row.get(i).cloned().unwrap_or(Value::Null),
                        Err(ref fill) => fill.clone(),
                    })
                    .collect()
            })
            .collect();
        report.output_rows = out_rows.len();
        info!(
            input_rows = report.input_rows,
            output_rows = report.output_rows,
            "dataset normalized"
        );
        (Dataset::from_parts(self.schema.names(), out_rows), report)
    }
    fn renamed_columns(&self, ds: &Dataset) -> (Vec<String>, Vec<usize>) {
        let mut names: Vec<String> = Vec::with_capacity(ds.columns().len());
        let mut sources: Vec<usize> = Vec::with_capacity(ds.columns().len());
        for (i, original) in ds.columns().iter().enumerate() {
            let name = self.mapping.target_for(original);
            if name != original.as_str() {
                debug!(from = %original, to = %name, "column renamed");
            }
            if names.iter().any(|n| n == name) {
                warn!(column = %name, source = %original, "duplicate column after rename, keeping the first");
                continue;
            }
            names.push(name.to_string());
            sources.push(i);
        }
        (names, sources)
    }
    fn column_kind(&self, name: &str, rows: &[Vec<Value>], col: usize) -> ColumnKind {
        let mut present = rows
            .iter()
            .filter_map(|r| r.get(col))
            .filter(|v| !v.is_null())
            .peekable();
        if present.peek().is_none() {
            return self.schema.kind_of(name).unwrap_or(ColumnKind::Text);
        }
        if present.all(Value::is_number) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }
}
#[cfg(test)]
mod tests {
    use super::{ColumnKind, ColumnMapping, Normalizer, SchemaColumn, TargetSchema};
    use crate::dataset::{Dataset, Value};
    use pretty_assertions::assert_eq;
    fn rec(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
        pairs
            .iter()
            .map(|&(k, ref v)| (k.to_string(), v.clone()))
            .collect()
    }
    fn alice() -> Vec<(String, Value)> {
        rec(&[
            ("id", Value::Number(1.0)),
            ("nome", Value::text("Alice")),
            ("valor", Value::Number(10.0)),
            ("data", Value::text("2024-01-01")),
            ("status", Value::text("ativo")),
        ])
    }
    fn normalizer() -> Normalizer {
        Normalizer::default()
    }
    #[test]
    fn output_columns_follow_schema_order() {
        let ds = Dataset::from_records(vec![rec(&[
            ("status", Value::text("ativo")),
            ("extra", Value::text("x")),
            ("nome", Value::text("Alice")),
            ("id", Value::Number(3.0)),
        ])]);
        let (out, _) = normalizer().normalize(&ds);
        assert_eq!(out.columns(), ["id", "nome", "valor", "data", "status"]);
        assert_eq!(
            out.rows(),
            [vec![
                Value::Number(3.0),
                Value::text("Alice"),
                Value::Number(0.0),
                Value::text(""),
                Value::text("ativo"),
            ]]
        );
    }
    #[test]
    fn exact_duplicates_collapse_to_first_occurrence() {
        let ds = Dataset::from_records(vec![alice(), alice()]);
        let (out, report) = normalizer().normalize(&ds);
        assert_eq!(out.len(), 1);
        assert_eq!(report.duplicates_removed, 1);
        let (again, second) = normalizer().normalize(&out);
        assert_eq!(again, out);
        assert_eq!(second.duplicates_removed, 0);
    }
    #[test]
    fn missing_schema_columns_use_declared_kind() {
        let ds = Dataset::from_records(vec![rec(&[
            ("id", Value::Number(1.0)),
            ("nome", Value::text("Alice")),
        ])]);
        let (out, report) = normalizer().normalize(&ds);
        assert_eq!(out.value(0, "valor"), Some(&Value::Number(0.0)));
        assert_eq!(out.value(0, "data"), Some(&Value::text("")));
        assert_eq!(out.value(0, "status"), Some(&Value::text("")));
        assert_eq!(report.columns_added, ["valor", "data", "status"]);
    }
    #[test]
    fn nulls_fill_by_observed_column_type() {
        let ds = Dataset::from_records(vec![
            rec(&[("id", Value::Number(1.0)), ("valor", Value::text("n/a"))]),
            rec(&[("id", Value::Null), ("valor", Value::Null)]),
        ]);
        let (out, report) = normalizer().normalize(&ds);
        assert_eq!(out.value(1, "id"), Some(&Value::Number(0.0)));
        assert_eq!(out.value(1, "valor"), Some(&Value::text("")));
        assert_eq!(report.cells_filled, 2);
        assert!(out.rows().iter().flatten().all(|v| !v.is_null()));
    }
    #[test]
    fn all_null_columns_take_the_schema_kind() {
        let ds = Dataset::from_parts(
            vec!["valor".to_string(), "nome".to_string()],
            vec![vec![Value::Null, Value::Null]],
        );
        let (out, _) = normalizer().normalize(&ds);
        assert_eq!(out.value(0, "valor"), Some(&Value::Number(0.0)));
        assert_eq!(out.value(0, "nome"), Some(&Value::text("")));
    }
    #[test]
    fn mapping_renames_before_reconciliation() {
        let ds = Dataset::from_records(vec![rec(&[
            ("codigo", Value::Number(42.0)),
            ("nome", Value::text("Alice")),
        ])]);
        let mapping: ColumnMapping = [("codigo".to_string(), "id".to_string())]
            .into_iter()
            .collect();
        let (out, _) = Normalizer::new(TargetSchema::default(), mapping).normalize(&ds);
        assert_eq!(out.value(0, "id"), Some(&Value::Number(42.0)));
    }
    #[test]
    fn rename_collision_keeps_leftmost_column() {
        let ds = Dataset::from_records(vec![rec(&[
            ("id", Value::Number(1.0)),
            ("codigo", Value::Number(2.0)),
        ])]);
        let mapping: ColumnMapping = [("codigo".to_string(), "id".to_string())]
            .into_iter()
            .collect();
        let (out, _) = Normalizer::new(TargetSchema::default(), mapping).normalize(&ds);
        assert_eq!(out.value(0, "id"), Some(&Value::Number(1.0)));
    }
    #[test]
    fn empty_input_yields_schema_columns_only() {
        let (out, report) = normalizer().normalize(&Dataset::default());
        assert_eq!(out.columns(), ["id", "nome", "valor", "data", "status"]);
        assert!(out.is_empty());
        assert_eq!(report.output_rows, 0);
    }
    #[test]
    fn custom_schema_is_honored() {
        let schema = TargetSchema::new(vec![
            SchemaColumn::new("sku", ColumnKind::Text),
            SchemaColumn::new("qty", ColumnKind::Numeric),
        ]);
        let ds = Dataset::from_records(vec![rec(&[("sku", Value::text("A-1"))])]);
        let (out, _) = Normalizer::new(schema, ColumnMapping::default()).normalize(&ds);
        assert_eq!(out.columns(), ["sku", "qty"]);
        assert_eq!(out.rows(), [vec![Value::text("A-1"), Value::Number(0.0)]]);
    }
    #[test]
    fn later_mapping_for_same_source_wins() {
        let mapping: ColumnMapping = [
            ("a".to_string(), "x".to_string()),
            ("a".to_string(), "y".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(mapping.target_for("a"), "y");
        assert_eq!(mapping.target_for("b"), "b");
    }
}

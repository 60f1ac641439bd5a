use crate::numeric::format_number;
use std::collections::HashMap;
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
    Bool(bool),
}
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Number(u64),
    Text(String),
    Bool(bool),
}
impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
    pub const fn is_null(&self) -> bool {
        matches!(*self, Self::Null)
    }
    pub const fn is_number(&self) -> bool {
        matches!(*self, Self::Number(_))
    }
    pub fn display(&self) -> String {
        match *self {
            Self::Null => String::new(),
            Self::Number(v) => format_number(v),
            Self::Text(ref s) => s.clone(),
            Self::Bool(b) => if b { "True" } else { "False" }.to_string(),
        }
    }
    pub fn key(&self) -> ValueKey {
        match *self {
            Self::Null => ValueKey::Null,
            Self::Number(v) => {
                let canonical = if v == 0.0 { 0.0_f64 } else { v };
                ValueKey::Number(canonical.to_bits())
            }
            Self::Text(ref s) => ValueKey::Text(s.clone()),
            Self::Bool(b) => ValueKey::Bool(b),
        }
    }
    pub fn from_json(v: &serde_json::Value) -> Self {
        match *v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(ref n) => n.as_f64().map_or_else(|| Self::Text(n.to_string()), Self::Number),
            serde_json::Value::String(ref s) => Self::Text(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Self::Text(v.to_string()),
        }
    }
}
pub type Record = Vec<(String, Value)>;
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}
impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for record in &records {
            for (name, _) in record {
                if !positions.contains_key(name) {
                    positions.insert(name.clone(), columns.len());
                    columns.push(name.clone());
                }
            }
        }
        let width = columns.len();
        let rows = records
            .into_iter()
            .map(|record| {
                let mut row = vec![Value::Null; width];
                for (name, value) in record {
                    if let Some(cell) = positions.get(&name).and_then(|&i| row.get_mut(i)) {
                        *cell = value;
                    }
                }
                row
            })
            .collect();
        Self { columns, rows }
    }
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }
    pub const fn len(&self) -> usize {
        self.rows.len()
    }
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut out = Self::new(columns);
        for row in rows {
            out.push_row(row);
        }
        out
    }
    pub fn concat(datasets: Vec<Self>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for ds in &datasets {
            for name in &ds.columns {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }
        let mut out = Self::new(columns);
        for ds in datasets {
            let mapping: Vec<Option<usize>> = out
                .columns
                .iter()
                .map(|name| ds.column_index(name))
                .collect();
            for row in ds.rows {
                let aligned = mapping
                    .iter()
                    .map(|src| src.and_then(|i| row.get(i)).cloned().unwrap_or(Value::Null))
                    .collect();
                out.rows.push(aligned);
            }
        }
        out
    }
}

//! Tabular view of a result set.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tabled::builder::Builder;

use crate::pagination::Item;

/// Rows of items laid out against the union of their field names.
///
/// Columns appear in the order they were first seen while scanning the
/// items; a row holds `None` for every column its item lacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<Value>>>,
}

impl Table {
    /// Lay out items as rows.
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
        I::IntoIter: Clone,
    {
        let items = items.into_iter();
        let mut columns = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for item in items.clone() {
            for key in item.keys() {
                if !index.contains_key(key.as_str()) {
                    index.insert(key.as_str(), columns.len());
                    columns.push(key.clone());
                }
            }
        }

        let rows = items
            .map(|item| {
                let mut row = vec![None; columns.len()];
                for (key, value) in item {
                    row[index[key.as_str()]] = Some(value.clone());
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<Value>>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, `None` where a row lacks it.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&Value>>> {
        let position = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[position].as_ref()).collect())
    }

    /// A single cell.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let position = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(position)?.as_ref()
    }

    /// Render with `tabled`: scalars bare, nested values as compact JSON,
    /// missing cells empty.
    pub fn render(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().map(cell_text));
        }
        builder.build().to_string()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn cell_text(cell: &Option<Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

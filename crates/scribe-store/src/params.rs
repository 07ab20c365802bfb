//! Named list-parameter expansion
//!
//! SQLite has no array binding, so a `:name[]` placeholder is expanded into
//! one numbered named parameter per value (`:name_0, :name_1, ...`) before
//! the statement is prepared.

use crate::StoreError;
use rusqlite::ToSql;

/// A SQL template with its bound parameters
#[derive(Debug, Clone)]
pub struct BoundQuery {
    sql: String,
    params: Vec<(String, i64)>,
}

impl BoundQuery {
    /// Start from a SQL template
    pub fn new(template: &str) -> Self {
        Self {
            sql: template.to_string(),
            params: Vec::new(),
        }
    }

    /// Expand `:name[]` into one parameter per value
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmptyList` when `values` is empty (an empty `IN ()`
    /// is invalid SQL) and `StoreError::InvalidQuery` when the template has
    /// no such placeholder.
    pub fn list(mut self, name: &str, values: &[i64]) -> Result<Self, StoreError> {
        let placeholder = format!(":{}[]", name);
        if !self.sql.contains(&placeholder) {
            return Err(StoreError::InvalidQuery(format!(
                "No placeholder {} in query",
                placeholder
            )));
        }
        if values.is_empty() {
            return Err(StoreError::EmptyList(name.to_string()));
        }

        let names: Vec<String> = (0..values.len())
            .map(|i| format!(":{}_{}", name, i))
            .collect();
        self.sql = self.sql.replace(&placeholder, &names.join(", "));
        self.params.extend(names.into_iter().zip(values.iter().copied()));

        Ok(self)
    }

    /// Bind a single named value
    pub fn scalar(mut self, name: &str, value: i64) -> Self {
        self.params.push((format!(":{}", name), value));
        self
    }

    /// The expanded SQL text
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters in the shape rusqlite accepts for named binding
    pub fn named_params(&self) -> Vec<(&str, &dyn ToSql)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect()
    }
}

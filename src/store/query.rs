use super::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Builder for the PostgREST query string: equality filters become
/// `column=eq.value` pairs and ordering becomes `order=column.direction`.
/// Column names are validated up front so a bad caller can never smuggle
/// reserved characters into the query string.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select all columns of the matching rows.
    pub fn select_all(mut self) -> Self {
        self.pairs.push(("select".to_string(), "*".to_string()));
        self
    }

    /// Equality filter on `column`.
    pub fn eq(mut self, column: &str, value: impl ToString) -> Result<Self, StoreError> {
        validate_column(column)?;
        self.pairs
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        Ok(self)
    }

    /// Sort the result by `column`.
    pub fn order(mut self, column: &str, direction: SortDirection) -> Result<Self, StoreError> {
        validate_column(column)?;
        self.pairs.push((
            "order".to_string(),
            format!("{}.{}", column, direction.as_param()),
        ));
        Ok(self)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

pub(crate) fn validate_column(column: &str) -> Result<(), StoreError> {
    if column.is_empty() {
        return Err(StoreError::InvalidColumn(
            "column name cannot be empty".to_string(),
        ));
    }
    let mut chars = column.chars();
    let first = chars.next().unwrap_or('_');
    if !first.is_alphabetic() && first != '_' {
        return Err(StoreError::InvalidColumn(format!(
            "invalid column name format: {}",
            column
        )));
    }
    if !column.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidColumn(format!(
            "invalid column name format: {}",
            column
        )));
    }
    Ok(())
}

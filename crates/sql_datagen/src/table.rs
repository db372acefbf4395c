//! Table and column model.
//!
//! A [`Table`] is a named, ordered schema plus a row count. Data generation
//! reads the schema and returns fresh column-major data on every call; the
//! table itself is never mutated by it.

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::random::{random_element, random_identifier};
use crate::value::{ColumnData, SqlValue, ValueGenerator};
use rand::Rng;

/// Length of synthesized table and column names.
pub const IDENTIFIER_LENGTH: usize = 10;

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Table definition
///
/// Columns are only added through [`Table::add_column`], which keeps names unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Empty table with no columns and a row count of 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Table with `column_count` randomly named and typed columns.
    pub fn random<R: Rng + ?Sized>(
        name: impl Into<String>,
        column_count: usize,
        row_count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if column_count == 0 {
            return Err(Error::InvalidArgument(
                "a table needs at least one column".to_string(),
            ));
        }

        let mut table = Self::new(name).with_row_count(row_count);
        while table.columns.len() < column_count {
            let column_name = random_identifier(IDENTIFIER_LENGTH, rng)?;
            if table.has_column(&column_name) {
                continue;
            }
            let data_type = *random_element(&DataType::ALL, rng)?;
            table.add_column(column_name, data_type)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn set_row_count(&mut self, row_count: usize) {
        self.row_count = row_count;
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = row_count;
        self
    }

    /// Append a column. Names must be unique within the table.
    pub fn add_column(&mut self, name: impl Into<String>, data_type: DataType) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(Error::InvalidArgument(format!(
                "duplicate column `{}` in table `{}`",
                name, self.name
            )));
        }
        self.columns.push(Column::new(name, data_type));
        Ok(())
    }

    /// Builder form of [`Table::add_column`].
    pub fn column(mut self, name: impl Into<String>, data_type: DataType) -> Result<Self> {
        self.add_column(name, data_type)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Name of a uniformly chosen column, optionally restricted to one type.
    pub fn random_column<R: Rng + ?Sized>(
        &self,
        data_type: Option<DataType>,
        rng: &mut R,
    ) -> Result<&str> {
        let requirement = match data_type {
            Some(dt) => format!("type {dt}"),
            None => "any type".to_string(),
        };
        let index = self.random_column_where(
            |c| data_type.is_none_or(|dt| c.data_type == dt),
            &requirement,
            rng,
        )?;
        Ok(&self.columns[index].name)
    }

    /// Index of a uniformly chosen column satisfying `predicate`.
    pub fn random_column_where<R, F>(
        &self,
        predicate: F,
        requirement: &str,
        rng: &mut R,
    ) -> Result<usize>
    where
        R: Rng + ?Sized,
        F: Fn(&Column) -> bool,
    {
        let eligible = self.eligible_columns(predicate);
        random_element(&eligible, rng)
            .copied()
            .map_err(|_| Error::NoEligibleColumn {
                table: self.name.clone(),
                requirement: requirement.to_string(),
            })
    }

    /// Indices of all columns satisfying `predicate`, in schema order.
    pub fn eligible_columns<F>(&self, predicate: F) -> Vec<usize>
    where
        F: Fn(&Column) -> bool,
    {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| predicate(c))
            .map(|(i, _)| i)
            .collect()
    }

    /// Column-major sample data with the table's own row count.
    pub fn generate_data<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<ColumnData>> {
        self.generate_rows(self.row_count, rng)
    }

    /// Column-major sample data with `row_count` rows.
    pub fn generate_rows<R: Rng + ?Sized>(
        &self,
        row_count: usize,
        rng: &mut R,
    ) -> Result<Vec<ColumnData>> {
        self.generate_with(&ValueGenerator::default(), row_count, rng)
    }

    /// Column-major sample data using a custom value generator.
    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        generator: &ValueGenerator,
        row_count: usize,
        rng: &mut R,
    ) -> Result<Vec<ColumnData>> {
        self.columns
            .iter()
            .map(|c| generator.column(row_count, c.data_type, rng))
            .collect()
    }

    /// A single row of values in column order.
    pub fn generate_row<R: Rng + ?Sized>(
        &self,
        generator: &ValueGenerator,
        rng: &mut R,
    ) -> Result<Vec<SqlValue>> {
        self.columns
            .iter()
            .map(|c| generator.value(c.data_type, rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn orders() -> Table {
        Table::new("orders")
            .column("id", DataType::Serial)
            .unwrap()
            .column("total", DataType::Numeric)
            .unwrap()
            .column("active", DataType::Bool)
            .unwrap()
            .with_row_count(3)
    }

    #[test]
    fn test_table_builder() {
        let table = orders();
        assert_eq!(table.name(), "orders");
        assert_eq!(table.len(), 3);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_index("total"), Some(1));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut table = orders();
        assert!(matches!(
            table.add_column("id", DataType::Integer),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_new_table_defaults() {
        let table = Table::new("empty");
        assert_eq!(table.row_count(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_random_table_unique_names() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let table = Table::random("t", 12, 5, &mut rng).unwrap();
        assert_eq!(table.len(), 12);
        let mut names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 12);
        assert!(Table::random("t", 0, 5, &mut rng).is_err());
    }
}

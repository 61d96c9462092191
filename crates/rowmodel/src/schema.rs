//! Column schemas: ordered (header, accessor) pairs for a row type.
//!
//! A [`ColumnSchema`] is built once, either by `#[derive(TableRow)]` or by
//! hand through [`SchemaBuilder`], and is immutable afterwards. Columns are
//! sorted ascending by their `order` key; the sort is **stable**, so columns
//! sharing a key keep their registration order (for the derive: fields in
//! declaration order, then methods).

use std::sync::Arc;

use crate::error::AccessError;
use crate::value::CellValue;

/// Sort key assigned to columns registered without an explicit order.
///
/// Unordered columns sort after every explicitly ordered column.
pub const DEFAULT_ORDER: i32 = i32::MAX;

/// Type alias for a column accessor function.
pub type Accessor<T> = Arc<dyn Fn(&T) -> Result<CellValue, AccessError> + Send + Sync>;

/// A row type with a derivable column schema.
///
/// Implement by hand, or use `#[derive(TableRow)]` with `#[column]` markers:
///
/// ```
/// use rowmodel::TableRow;
///
/// #[derive(TableRow)]
/// struct Employee {
///     #[column(order = 1)]
///     name: String,
///     #[column(order = 2)]
///     age: u32,
/// }
///
/// let schema = Employee::schema();
/// assert_eq!(schema.headers().collect::<Vec<_>>(), ["name", "age"]);
/// ```
pub trait TableRow {
    /// Builds the column schema for this row type.
    ///
    /// Called once per model at construction; the result never changes for
    /// the model's lifetime.
    fn schema() -> ColumnSchema<Self>
    where
        Self: Sized;
}

/// One column: display name, sort key, and value accessor.
pub struct Column<T> {
    header: String,
    order: i32,
    accessor: Accessor<T>,
}

impl<T> Column<T> {
    /// The column's display name.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The column's sort key.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Reads this column's value from a row.
    pub fn value(&self, row: &T) -> Result<CellValue, AccessError> {
        (self.accessor)(row)
    }
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// An ordered, immutable sequence of columns for a row type.
///
/// A schema with zero columns is legal (a table over a type with no marked
/// members); it simply renders no columns.
pub struct ColumnSchema<T> {
    columns: Vec<Column<T>>,
}

impl<T> ColumnSchema<T> {
    /// Starts building a schema by explicit registration.
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder {
            columns: Vec::new(),
        }
    }

    /// The number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The column at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn column(&self, index: usize) -> &Column<T> {
        &self.columns[index]
    }

    /// All columns, in display order.
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// The display name of the column at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn header(&self, index: usize) -> &str {
        self.columns[index].header()
    }

    /// Iterates the display names in column order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.header())
    }
}

impl<T> std::fmt::Debug for ColumnSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

/// Builder for [`ColumnSchema`]: register columns, then [`build`](Self::build).
///
/// ```
/// use rowmodel::{CellValue, ColumnSchema};
///
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// let schema: ColumnSchema<Point> = ColumnSchema::builder()
///     .column_at("X", 1, |p: &Point| CellValue::from(p.x))
///     .column_at("Y", 2, |p: &Point| CellValue::from(p.y))
///     .build();
///
/// assert_eq!(schema.len(), 2);
/// ```
pub struct SchemaBuilder<T> {
    columns: Vec<Column<T>>,
}

impl<T> SchemaBuilder<T> {
    /// Registers an infallible column with the default (last) sort key.
    pub fn column<F>(self, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        self.column_at(header, DEFAULT_ORDER, accessor)
    }

    /// Registers an infallible column with an explicit sort key.
    pub fn column_at<F>(self, header: impl Into<String>, order: i32, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        self.try_column_at(header, order, move |row| Ok(accessor(row)))
    }

    /// Registers a fallible column with the default (last) sort key.
    ///
    /// Use for accessors that can legitimately fail (derived values backed
    /// by parsing, lookups, etc.). How a failure is rendered is the model's
    /// [`DispatchPolicy`](crate::DispatchPolicy) decision.
    pub fn try_column<F>(self, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> Result<CellValue, AccessError> + Send + Sync + 'static,
    {
        self.try_column_at(header, DEFAULT_ORDER, accessor)
    }

    /// Registers a fallible column with an explicit sort key.
    pub fn try_column_at<F>(mut self, header: impl Into<String>, order: i32, accessor: F) -> Self
    where
        F: Fn(&T) -> Result<CellValue, AccessError> + Send + Sync + 'static,
    {
        self.columns.push(Column {
            header: header.into(),
            order,
            accessor: Arc::new(accessor),
        });
        self
    }

    /// Finalizes the schema, sorting columns ascending by order key.
    ///
    /// The sort is stable: columns with equal keys keep registration order.
    pub fn build(mut self) -> ColumnSchema<T> {
        self.columns.sort_by_key(|c| c.order);
        ColumnSchema {
            columns: self.columns,
        }
    }
}

//! The two table-model variants and the data-source contract they serve.
//!
//! - [`SchemaTableModel`] derives its columns from the row type's
//!   [`TableRow`] schema (the `#[derive(TableRow)]` markers, or a hand-built
//!   [`ColumnSchema`](crate::ColumnSchema)).
//! - [`ExtractorTableModel`] takes a fixed header list at construction and
//!   defers cell extraction to a caller-supplied closure.
//!
//! Both deref to [`Rows`], so the full mutation/notification vocabulary of
//! that type is available on either model.

use std::sync::Arc;

use crate::error::AccessError;
use crate::rows::{Rows, TableSignals};
use crate::schema::{ColumnSchema, TableRow};
use crate::value::CellValue;

/// Type alias for a per-cell editability predicate.
pub type EditablePredicate<T> = Arc<dyn Fn(&T, usize) -> bool + Send + Sync>;

/// Type alias for a cell extractor function: (row, column) -> value.
pub type CellExtractor<T> = Arc<dyn Fn(&T, usize) -> CellValue + Send + Sync>;

/// The table-data-source contract a table widget consumes.
///
/// A widget queries dimensions, headers, and cell values through this trait
/// and subscribes to [`TableSignals`] to redraw only the affected rows.
///
/// Row and column positions are **not** validated here; out-of-range
/// positions panic as the underlying storage would. The widget is expected
/// to stay within the bounds it was notified about.
pub trait TableSource {
    /// The number of rows.
    fn row_count(&self) -> usize;

    /// The number of columns. Fixed for the model's lifetime.
    fn column_count(&self) -> usize;

    /// The header of the column at `column`.
    ///
    /// # Panics
    ///
    /// Panics if `column >= column_count()`.
    fn column_name(&self, column: usize) -> &str;

    /// The displayable value of the cell at (`row`, `column`).
    ///
    /// # Panics
    ///
    /// Panics if `row` or `column` is out of range.
    fn value_at(&self, row: usize, column: usize) -> CellValue;

    /// Whether the cell at (`row`, `column`) may be edited.
    ///
    /// Cells are never editable by default.
    fn is_cell_editable(&self, _row: usize, _column: usize) -> bool {
        false
    }

    /// The change notifications this source emits.
    fn signals(&self) -> &TableSignals;
}

/// How a model presents an accessor-dispatch failure to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPolicy {
    /// Log the failure at `warn` and render the cell blank
    /// ([`CellValue::None`]). Favors UI stability: the table keeps painting.
    #[default]
    Mask,
    /// Render the failure text into the cell, making it visible in the UI
    /// and assertable in tests.
    Surface,
}

/// A table model whose columns come from the row type's schema.
///
/// The schema is resolved once, at construction, and never changes; the row
/// collection is freely mutable through the [`Rows`] operations this model
/// derefs to.
///
/// # Example
///
/// ```
/// use rowmodel::{SchemaTableModel, TableRow, TableSource};
///
/// #[derive(TableRow)]
/// struct Employee {
///     #[column(order = 1)]
///     name: String,
///     #[column(order = 2)]
///     age: u32,
/// }
///
/// let model = SchemaTableModel::<Employee>::new();
/// model.push(Employee { name: "Ann".into(), age: 30 });
///
/// assert_eq!(model.column_count(), 2);
/// assert_eq!(model.column_name(0), "name");
/// assert_eq!(model.value_at(0, 0).as_str(), Some("Ann"));
/// assert_eq!(model.value_at(0, 1).as_int(), Some(30));
/// ```
pub struct SchemaTableModel<T: TableRow> {
    rows: Rows<T>,
    schema: ColumnSchema<T>,
    policy: DispatchPolicy,
    editable: Option<EditablePredicate<T>>,
}

impl<T: TableRow> Default for SchemaTableModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TableRow> SchemaTableModel<T> {
    /// Creates an empty model over `T`'s schema.
    pub fn new() -> Self {
        Self::from_rows(Vec::new())
    }

    /// Creates a model pre-populated with rows.
    pub fn from_rows(rows: Vec<T>) -> Self {
        Self {
            rows: Rows::from_vec(rows),
            schema: T::schema(),
            policy: DispatchPolicy::default(),
            editable: None,
        }
    }

    /// Sets the dispatch-failure policy.
    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Installs a per-cell editability predicate: (row, column) -> bool.
    pub fn with_editable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T, usize) -> bool + Send + Sync + 'static,
    {
        self.editable = Some(Arc::new(predicate));
        self
    }

    /// The resolved column schema.
    pub fn schema(&self) -> &ColumnSchema<T> {
        &self.schema
    }

    /// The cell value at (`row`, `column`) with dispatch failures surfaced
    /// as errors instead of going through the [`DispatchPolicy`].
    ///
    /// # Panics
    ///
    /// Panics if `row` or `column` is out of range.
    pub fn try_value_at(&self, row: usize, column: usize) -> Result<CellValue, AccessError> {
        let rows = self.rows.rows();
        self.schema.column(column).value(&rows[row])
    }
}

impl<T: TableRow> std::ops::Deref for SchemaTableModel<T> {
    type Target = Rows<T>;

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

impl<T: TableRow> TableSource for SchemaTableModel<T> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.schema.len()
    }

    fn column_name(&self, column: usize) -> &str {
        self.schema.header(column)
    }

    fn value_at(&self, row: usize, column: usize) -> CellValue {
        match self.try_value_at(row, column) {
            Ok(value) => value,
            Err(err) => match self.policy {
                DispatchPolicy::Mask => {
                    tracing::warn!(
                        target: "rowmodel::table",
                        row,
                        column = %err.column,
                        reason = %err.reason,
                        "cell accessor failed, rendering blank cell"
                    );
                    CellValue::None
                }
                DispatchPolicy::Surface => CellValue::String(err.to_string()),
            },
        }
    }

    fn is_cell_editable(&self, row: usize, column: usize) -> bool {
        match &self.editable {
            Some(predicate) => predicate(&self.rows.rows()[row], column),
            None => false,
        }
    }

    fn signals(&self) -> &TableSignals {
        self.rows.signals()
    }
}

/// A table model with a fixed header list and caller-supplied cell lookup.
///
/// Where [`SchemaTableModel`] derives everything from the row type, this
/// variant is handed its headers at construction and an extractor closure
/// that maps (row, column) to a value — the column dispatch lives with the
/// caller.
///
/// # Example
///
/// ```
/// use rowmodel::{CellValue, ExtractorTableModel, TableSource};
///
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// let model = ExtractorTableModel::new(["X", "Y"], |p: &Point, column| match column {
///     0 => CellValue::from(p.x),
///     1 => CellValue::from(p.y),
///     _ => CellValue::None,
/// });
///
/// model.push(Point { x: 1.0, y: 2.0 });
/// assert_eq!(model.column_name(1), "Y");
/// assert_eq!(model.value_at(0, 1).as_float(), Some(2.0));
/// ```
pub struct ExtractorTableModel<T> {
    rows: Rows<T>,
    headers: Vec<String>,
    extractor: CellExtractor<T>,
    editable: Option<EditablePredicate<T>>,
}

impl<T> ExtractorTableModel<T> {
    /// Creates an empty model with the given column headers and extractor.
    pub fn new<H, F>(headers: impl IntoIterator<Item = H>, extractor: F) -> Self
    where
        H: Into<String>,
        F: Fn(&T, usize) -> CellValue + Send + Sync + 'static,
    {
        Self::from_rows(headers, Vec::new(), extractor)
    }

    /// Creates a model pre-populated with rows.
    pub fn from_rows<H, F>(
        headers: impl IntoIterator<Item = H>,
        rows: Vec<T>,
        extractor: F,
    ) -> Self
    where
        H: Into<String>,
        F: Fn(&T, usize) -> CellValue + Send + Sync + 'static,
    {
        Self {
            rows: Rows::from_vec(rows),
            headers: headers.into_iter().map(Into::into).collect(),
            extractor: Arc::new(extractor),
            editable: None,
        }
    }

    /// Installs a per-cell editability predicate: (row, column) -> bool.
    pub fn with_editable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T, usize) -> bool + Send + Sync + 'static,
    {
        self.editable = Some(Arc::new(predicate));
        self
    }

    /// The column headers, in display order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<T> std::ops::Deref for ExtractorTableModel<T> {
    type Target = Rows<T>;

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

impl<T> TableSource for ExtractorTableModel<T> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.headers.len()
    }

    fn column_name(&self, column: usize) -> &str {
        &self.headers[column]
    }

    fn value_at(&self, row: usize, column: usize) -> CellValue {
        (self.extractor)(&self.rows.rows()[row], column)
    }

    fn is_cell_editable(&self, row: usize, column: usize) -> bool {
        match &self.editable {
            Some(predicate) => predicate(&self.rows.rows()[row], column),
            None => false,
        }
    }

    fn signals(&self) -> &TableSignals {
        self.rows.signals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessError;
    use crate::schema::ColumnSchema;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Employee {
        name: String,
        age: u32,
    }

    impl Employee {
        fn initials(&self) -> String {
            self.name.chars().take(1).collect()
        }
    }

    // Hand-written schema; the derive macro produces the same shape
    // (exercised in tests/derive_table_row.rs).
    impl TableRow for Employee {
        fn schema() -> ColumnSchema<Self> {
            ColumnSchema::builder()
                .column_at("name", 1, |e: &Employee| CellValue::from(e.name.clone()))
                .column_at("age", 2, |e: &Employee| CellValue::from(e.age))
                .column("initials", |e: &Employee| CellValue::from(e.initials()))
                .build()
        }
    }

    fn ann() -> Employee {
        Employee {
            name: "Ann".into(),
            age: 30,
        }
    }

    #[test]
    fn test_schema_model_headers_and_values() {
        let model = SchemaTableModel::<Employee>::new();
        model.push(ann());

        assert_eq!(model.row_count(), 1);
        assert_eq!(model.column_count(), 3);
        assert_eq!(model.column_name(0), "name");
        assert_eq!(model.column_name(1), "age");
        assert_eq!(model.column_name(2), "initials");

        assert_eq!(model.value_at(0, 0).as_str(), Some("Ann"));
        assert_eq!(model.value_at(0, 1).as_int(), Some(30));
        assert_eq!(model.value_at(0, 2).as_str(), Some("A"));
    }

    #[test]
    fn test_append_then_read_last_row() {
        let model = SchemaTableModel::from_rows(vec![ann()]);
        model.push(Employee {
            name: "Bo".into(),
            age: 41,
        });

        let last = model.row_count() - 1;
        assert_eq!(model.value_at(last, 0).as_str(), Some("Bo"));
        assert_eq!(model.value_at(last, 1).as_int(), Some(41));
    }

    struct NoColumns;

    impl TableRow for NoColumns {
        fn schema() -> ColumnSchema<Self> {
            ColumnSchema::builder().build()
        }
    }

    #[test]
    fn test_zero_column_schema_still_counts_rows() {
        let model = SchemaTableModel::from_rows(vec![NoColumns, NoColumns]);
        assert_eq!(model.column_count(), 0);
        assert_eq!(model.row_count(), 2);
    }

    struct Flaky;

    impl TableRow for Flaky {
        fn schema() -> ColumnSchema<Self> {
            ColumnSchema::builder()
                .try_column("broken", |_: &Flaky| {
                    Err(AccessError::new("broken", "no backing value"))
                })
                .build()
        }
    }

    #[test]
    fn test_mask_policy_renders_blank() {
        let model = SchemaTableModel::from_rows(vec![Flaky]);
        assert!(model.value_at(0, 0).is_none());
        assert_eq!(model.value_at(0, 0).to_string(), "");
    }

    /// Collects formatted log output so tests can assert on it.
    #[derive(Clone)]
    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_mask_policy_logs_warning() {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::fmt()
            .with_writer(CaptureWriter(captured.clone()))
            .with_ansi(false)
            .finish();

        let model = SchemaTableModel::from_rows(vec![Flaky]);
        tracing::subscriber::with_default(subscriber, || {
            assert!(model.value_at(0, 0).is_none());
        });

        let output = String::from_utf8(captured.lock().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("rowmodel::table"));
        assert!(output.contains("cell accessor failed"));
        assert!(output.contains("no backing value"));
    }

    #[test]
    fn test_surface_policy_renders_error() {
        let model = SchemaTableModel::from_rows(vec![Flaky]).with_policy(DispatchPolicy::Surface);
        let cell = model.value_at(0, 0);
        assert_eq!(cell.as_str(), Some("column `broken`: no backing value"));
    }

    #[test]
    fn test_try_value_at_bypasses_policy() {
        let model = SchemaTableModel::from_rows(vec![Flaky]);
        let err = model.try_value_at(0, 0).unwrap_err();
        assert_eq!(err.column, "broken");
    }

    #[test]
    fn test_cells_not_editable_by_default() {
        let model = SchemaTableModel::from_rows(vec![ann()]);
        assert!(!model.is_cell_editable(0, 0));
        assert!(!model.is_cell_editable(0, 1));
    }

    #[test]
    fn test_editable_predicate() {
        let model = SchemaTableModel::from_rows(vec![ann()])
            .with_editable(|_, column| column == 1);
        assert!(!model.is_cell_editable(0, 0));
        assert!(model.is_cell_editable(0, 1));
    }

    #[test]
    fn test_extractor_model() {
        let model = ExtractorTableModel::new(["name", "age"], |e: &Employee, column| {
            match column {
                0 => CellValue::from(e.name.clone()),
                1 => CellValue::from(e.age),
                _ => CellValue::None,
            }
        });
        model.push(ann());

        assert_eq!(model.column_count(), 2);
        assert_eq!(model.column_name(0), "name");
        assert_eq!(model.value_at(0, 0).as_str(), Some("Ann"));
        assert_eq!(model.value_at(0, 1).as_int(), Some(30));
        assert!(!model.is_cell_editable(0, 0));
    }

    #[test]
    fn test_model_mutations_emit_through_source_signals() {
        let model = SchemaTableModel::<Employee>::new();
        let inserted = std::sync::Arc::new(Mutex::new(Vec::new()));

        let recv = inserted.clone();
        TableSource::signals(&model)
            .rows_inserted
            .connect(move |&(first, last)| {
                recv.lock().push((first, last));
            });

        model.push(ann());
        model.insert(0, ann());

        assert_eq!(*inserted.lock(), vec![(0, 0), (0, 0)]);
    }

    #[test]
    fn test_schema_model_is_object_safe_source() {
        let model = SchemaTableModel::from_rows(vec![ann()]);
        let source: &dyn TableSource = &model;
        assert_eq!(source.row_count(), 1);
        assert_eq!(source.column_name(0), "name");
    }
}

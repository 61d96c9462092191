//! Observable table models for GUI widgets.
//!
//! This crate adapts an in-memory ordered collection of domain objects into
//! the row/column table a widget consumes, separating data representation
//! from display logic. This enables:
//!
//! - Multiple views of the same data
//! - Column schemas derived from the row type itself
//! - Efficient repaints via per-operation change notifications
//!
//! # Core Types
//!
//! - [`Signal`]: Observer primitive for change notifications
//! - [`CellValue`]: Type-erased container for one cell
//! - [`ColumnSchema`] / [`TableRow`]: Ordered (header, accessor) pairs for a
//!   row type, built by `#[derive(TableRow)]` or by explicit registration
//! - [`Rows`]: The mutable row collection with notification bookkeeping
//! - [`TableSource`]: The contract a table widget queries
//!
//! # Model Implementations
//!
//! - [`SchemaTableModel`]: Columns resolved from the row type's schema
//! - [`ExtractorTableModel`]: Fixed headers plus a caller-supplied cell
//!   extractor closure
//!
//! # Example
//!
//! ```
//! use rowmodel::{SchemaTableModel, TableRow, TableSource};
//!
//! #[derive(TableRow)]
//! struct Employee {
//!     #[column(header = "Name", order = 1)]
//!     name: String,
//!     #[column(order = 2)]
//!     age: u32,
//! }
//!
//! let model = SchemaTableModel::<Employee>::new();
//!
//! // Repaint only what changed.
//! model.signals().rows_inserted.connect(|&(first, last)| {
//!     println!("redraw rows {first}..={last}");
//! });
//!
//! model.push(Employee { name: "Ann".into(), age: 30 });
//!
//! assert_eq!(model.column_name(0), "Name");
//! assert_eq!(model.value_at(0, 1).as_int(), Some(30));
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │    Model     │────>│ TableSignals │────>│    View     │
//! │ (TableSource)│     │              │     │             │
//! └──────────────┘     └──────────────┘     └─────────────┘
//!        │
//!        │        ┌──────────────┐
//!        └───────>│ ColumnSchema │
//!                 │  CellValue   │
//!                 └──────────────┘
//! ```
//!
//! Views query models through [`TableSource`] and redraw in response to
//! [`TableSignals`]. All notification is synchronous on the mutating
//! thread; the design assumes a single UI event-dispatch thread.

mod error;
mod rows;
mod schema;
mod signal;
mod table;
mod value;

pub use error::AccessError;
pub use rows::{Rows, TableSignals};
pub use schema::{Accessor, Column, ColumnSchema, SchemaBuilder, TableRow, DEFAULT_ORDER};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use table::{
    CellExtractor, DispatchPolicy, EditablePredicate, ExtractorTableModel, SchemaTableModel,
    TableSource,
};
pub use value::CellValue;

// Derive macro for the TableRow trait.
pub use rowmodel_macros::TableRow;

// Models are handed across widget boundaries; keep them shareable.
static_assertions::assert_impl_all!(Signal<(usize, usize)>: Send, Sync);
static_assertions::assert_impl_all!(TableSignals: Send, Sync);
static_assertions::assert_impl_all!(Rows<String>: Send, Sync);

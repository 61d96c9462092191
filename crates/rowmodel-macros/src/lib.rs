//! Procedural macros for the rowmodel column-schema system.
//!
//! This crate provides the `#[derive(TableRow)]` macro, which builds a
//! `ColumnSchema` for a struct from `#[column]` markers on its fields and
//! methods.
//!
//! # Attributes
//!
//! ## `#[column]` (field)
//!
//! Marks a field as a table column:
//!
//! ```ignore
//! #[derive(TableRow)]
//! struct Employee {
//!     #[column(header = "Name", order = 1)]
//!     name: String,
//!
//!     #[column(order = 2)]
//!     age: u32,
//!
//!     // Not a column: no marker.
//!     internal_id: u64,
//! }
//! ```
//!
//! Column attributes:
//! - `header = "..."`: Display name for the column. Defaults to the field name.
//! - `order = N`: Ascending sort key for column position. Unordered columns
//!   sort last.
//!
//! ## `#[column(method = "...")]` (struct)
//!
//! Registers a zero-argument method as a computed column:
//!
//! ```ignore
//! #[derive(TableRow)]
//! #[column(method = "full_name", header = "Full name", order = 3)]
//! struct Employee {
//!     #[column(order = 1)]
//!     first: String,
//!     #[column(order = 2)]
//!     last: String,
//! }
//!
//! impl Employee {
//!     fn full_name(&self) -> String {
//!         format!("{} {}", self.first, self.last)
//!     }
//! }
//! ```
//!
//! The method's return value must convert into a `CellValue` via `Into`.
//! Field columns are registered before method columns, so ties on `order`
//! keep that discovery order (the schema builder's sort is stable).

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, ExprUnary, Field, Fields, Lit,
    UnOp,
};

/// Derive the `TableRow` trait by collecting `#[column]` markers.
///
/// Generates an implementation of `rowmodel::TableRow` whose `schema()`
/// registers one column per marked field and per `method = "..."` entry,
/// in declaration order, and lets the schema builder sort them by `order`.
///
/// A struct with no marked members is legal and yields a zero-column schema.
#[proc_macro_derive(TableRow, attributes(column))]
pub fn derive_table_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_derive_table_row(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Parsed column information for one field or method.
struct ColumnInfo {
    /// Registration expression target: a field identifier or method name.
    member: proc_macro2::Ident,
    /// `true` if the accessor is a method call rather than a field read.
    is_method: bool,
    header: Option<String>,
    order: Option<i32>,
}

fn impl_derive_table_row(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "TableRow derive only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "TableRow derive only supports structs",
            ))
        }
    };

    // Fields first, then methods: ties on `order` keep this discovery order.
    let mut columns = Vec::new();
    for field in fields.iter() {
        if let Some(info) = parse_column_field(field)? {
            columns.push(info);
        }
    }
    columns.extend(parse_column_methods(&input.attrs)?);

    let registrations: Vec<TokenStream2> = columns
        .iter()
        .map(|col| {
            let member = &col.member;
            let header = match &col.header {
                Some(header) => header.clone(),
                None => member.to_string(),
            };
            let accessor = if col.is_method {
                quote! { |row: &Self| rowmodel::CellValue::from(row.#member()) }
            } else {
                quote! { |row: &Self| rowmodel::CellValue::from(row.#member.clone()) }
            };
            match col.order {
                Some(order) => quote! { .column_at(#header, #order, #accessor) },
                None => quote! { .column(#header, #accessor) },
            }
        })
        .collect();

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics rowmodel::TableRow for #struct_name #ty_generics #where_clause {
            fn schema() -> rowmodel::ColumnSchema<Self> {
                rowmodel::ColumnSchema::builder()
                    #(#registrations)*
                    .build()
            }
        }
    })
}

/// Parse a field with a `#[column]` attribute. Unmarked fields are skipped.
fn parse_column_field(field: &Field) -> syn::Result<Option<ColumnInfo>> {
    let field_name = match &field.ident {
        Some(name) => name.clone(),
        None => return Ok(None),
    };

    let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("column")) else {
        return Ok(None);
    };

    let (header, order, method) = parse_column_attr(attr)?;
    if method.is_some() {
        return Err(syn::Error::new_spanned(
            attr,
            "`method` is only valid in a struct-level #[column] attribute",
        ));
    }

    Ok(Some(ColumnInfo {
        member: field_name,
        is_method: false,
        header,
        order,
    }))
}

/// Parse struct-level `#[column(method = "...")]` attributes.
fn parse_column_methods(attrs: &[Attribute]) -> syn::Result<Vec<ColumnInfo>> {
    let mut columns = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("column") {
            continue;
        }

        let (header, order, method) = parse_column_attr(attr)?;
        let Some(method) = method else {
            return Err(syn::Error::new_spanned(
                attr,
                "struct-level #[column] requires `method = \"name\"`",
            ));
        };

        columns.push(ColumnInfo {
            member: format_ident!("{}", method),
            is_method: true,
            header,
            order,
        });
    }

    Ok(columns)
}

/// Parse the `header`, `order`, and `method` keys of a `#[column(...)]`
/// attribute. A bare `#[column]` yields all defaults.
fn parse_column_attr(
    attr: &Attribute,
) -> syn::Result<(Option<String>, Option<i32>, Option<String>)> {
    let mut header = None;
    let mut order = None;
    let mut method = None;

    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok((header, order, method));
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("header") {
            header = Some(parse_str_value(meta.value()?.parse()?, "header")?);
        } else if meta.path.is_ident("order") {
            order = Some(parse_int_value(meta.value()?.parse()?, "order")?);
        } else if meta.path.is_ident("method") {
            method = Some(parse_str_value(meta.value()?.parse()?, "method")?);
        } else {
            return Err(meta.error("expected `header`, `order`, or `method`"));
        }
        Ok(())
    })?;

    Ok((header, order, method))
}

fn parse_str_value(expr: Expr, key: &str) -> syn::Result<String> {
    if let Expr::Lit(ExprLit {
        lit: Lit::Str(lit_str),
        ..
    }) = &expr
    {
        Ok(lit_str.value())
    } else {
        Err(syn::Error::new_spanned(
            &expr,
            format!("`{key}` expects a string literal"),
        ))
    }
}

fn parse_int_value(expr: Expr, key: &str) -> syn::Result<i32> {
    match &expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(lit_int),
            ..
        }) => lit_int.base10_parse(),
        // Negative keys arrive as a unary-negation expression, not a literal.
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => {
            if let Expr::Lit(ExprLit {
                lit: Lit::Int(lit_int),
                ..
            }) = inner.as_ref()
            {
                lit_int.base10_parse::<i32>().map(|n| -n)
            } else {
                Err(syn::Error::new_spanned(
                    &expr,
                    format!("`{key}` expects an integer literal"),
                ))
            }
        }
        _ => Err(syn::Error::new_spanned(
            &expr,
            format!("`{key}` expects an integer literal"),
        )),
    }
}

//! Rendering of listing queries into executable statements
//!
//! Queries are written against `{table}` placeholders and `:name`
//! parameters. Rendering expands the placeholders with the configured
//! table prefix and rewrites named parameters into the positional form of
//! the connected backend.

use crate::contract::QuerySpec;
use crate::domain::query::ENGINE_ROW_CAP;
use crate::domain::ResolvedView;
use anyhow::{bail, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sea_orm::{DbBackend, Statement, Value};

#[allow(clippy::expect_used)]
static TABLE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z][a-z0-9_]*)\}").expect("valid table placeholder regex"));

#[allow(clippy::expect_used)]
static NAMED_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([a-z][a-z0-9_]*)").expect("valid named parameter regex"));

#[allow(clippy::expect_used)]
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid identifier regex"));

/// Replace every `{name}` with `{prefix}name`
pub fn expand_tables(sql: &str, prefix: &str) -> String {
    TABLE_PLACEHOLDER
        .replace_all(sql, |caps: &Captures| format!("{}{}", prefix, &caps[1]))
        .into_owned()
}

/// Rewrite `:name` parameters into positional ones.
///
/// A parameter used twice is bound twice. Names missing from `params`
/// are an error.
pub fn bind_params(
    sql: &str,
    params: &IndexMap<String, i64>,
    backend: DbBackend,
) -> Result<(String, Vec<Value>)> {
    let mut values = Vec::new();
    let mut missing = None;

    let rendered = NAMED_PARAM.replace_all(sql, |caps: &Captures| {
        let name = &caps[1];
        match params.get(name) {
            Some(value) => {
                values.push(Value::from(*value));
                match backend {
                    DbBackend::Postgres => format!("${}", values.len()),
                    _ => "?".to_string(),
                }
            }
            None => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    if let Some(name) = missing {
        bail!("query parameter '{}' has no value", name);
    }
    Ok((rendered.into_owned(), values))
}

/// Statement returning the rows of `query` sorted and windowed by `view`
pub fn listing_statement(
    query: &QuerySpec,
    view: &ResolvedView,
    table_prefix: &str,
    backend: DbBackend,
) -> Result<Statement> {
    let mut sql = format!(
        "SELECT {} FROM {} WHERE {}",
        query.fields, query.source, query.predicate
    );

    if let Some((column, order)) = &view.order_by {
        if !IDENTIFIER.is_match(column) {
            bail!("invalid sort column '{}'", column);
        }
        sql.push_str(&format!(" ORDER BY {} {}", column, order.as_sql()));
        // Stable order across pages
        if column != "id" {
            sql.push_str(", id ASC");
        }
    }

    match (view.limit, view.offset) {
        (Some(limit), offset) => sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset)),
        (None, 0) => {}
        (None, offset) => {
            sql.push_str(&format!(" LIMIT {} OFFSET {}", ENGINE_ROW_CAP, offset))
        }
    }

    render(&sql, &query.params, table_prefix, backend)
}

/// Statement returning the number of rows of `query` as `total`
pub fn count_statement(
    query: &QuerySpec,
    table_prefix: &str,
    backend: DbBackend,
) -> Result<Statement> {
    let sql = format!(
        "SELECT COUNT(*) AS total FROM {} WHERE {}",
        query.source, query.predicate
    );
    render(&sql, &query.params, table_prefix, backend)
}

fn render(
    sql: &str,
    params: &IndexMap<String, i64>,
    table_prefix: &str,
    backend: DbBackend,
) -> Result<Statement> {
    let expanded = expand_tables(sql, table_prefix);
    let (sql, values) = bind_params(&expanded, params, backend)?;
    tracing::trace!(sql = %sql, params = values.len(), "rendered statement");
    Ok(Statement::from_sql_and_values(backend, sql, values))
}

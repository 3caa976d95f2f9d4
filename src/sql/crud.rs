//! Parametrized CRUD statements. Parameters are `@camelName`.

use crate::ast::{Column, Table};
use crate::error::Result;

/// Statement text plus the parameter names it binds, in binding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub parameters: Vec<String>,
}

fn column_list<'a>(columns: impl IntoIterator<Item = &'a Column>) -> String {
    columns
        .into_iter()
        .map(Column::name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn binding(column: &Column) -> String {
    format!("{} = @{}", column.name(), column.camel_name())
}

fn select_columns(table: &Table) -> String {
    format!(
        "SELECT {} FROM {}",
        column_list(table.columns()),
        table.qualified_name()
    )
}

pub fn select_all(table: &Table) -> String {
    format!("{};", select_columns(table))
}

pub fn select_by_key(table: &Table) -> Result<Statement> {
    let key = table.require_primary_key()?;
    Ok(Statement {
        sql: format!("{} WHERE {};", select_columns(table), binding(key)),
        parameters: vec![key.camel_name().to_string()],
    })
}

pub fn delete_by_key(table: &Table) -> Result<Statement> {
    let key = table.require_primary_key()?;
    Ok(Statement {
        sql: format!(
            "DELETE FROM {} WHERE {};",
            table.qualified_name(),
            binding(key)
        ),
        parameters: vec![key.camel_name().to_string()],
    })
}

/// Server-assigned key columns are left out of the column and VALUES lists
/// but still returned.
pub fn insert(table: &Table) -> Result<Statement> {
    table.primary_key()?;

    let supplied: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| !c.is_auto_generated())
        .collect();
    let returning = column_list(table.columns());

    let sql = if supplied.is_empty() {
        format!(
            "INSERT INTO {} DEFAULT VALUES\nRETURNING {};",
            table.qualified_name(),
            returning
        )
    } else {
        let values = supplied
            .iter()
            .map(|c| format!("@{}", c.camel_name()))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({})\nVALUES ({})\nRETURNING {};",
            table.qualified_name(),
            column_list(supplied.iter().copied()),
            values,
            returning
        )
    };

    Ok(Statement {
        sql,
        parameters: supplied.iter().map(|c| c.camel_name().to_string()).collect(),
    })
}

/// The key parameter is bound first, then every other column in order.
pub fn update(table: &Table) -> Result<Statement> {
    let key = table.require_primary_key()?;

    let rest: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| !c.is_primary_key())
        .collect();

    let assignments = if rest.is_empty() {
        // Nothing to change, but SET needs at least one assignment.
        format!("{} = {}", key.name(), key.name())
    } else {
        rest.iter()
            .map(|c| binding(c))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut parameters = vec![key.camel_name().to_string()];
    parameters.extend(rest.iter().map(|c| c.camel_name().to_string()));

    Ok(Statement {
        sql: format!(
            "UPDATE {}\nSET {}\nWHERE {}\nRETURNING {};",
            table.qualified_name(),
            assignments,
            binding(key),
            column_list(table.columns())
        ),
        parameters,
    })
}

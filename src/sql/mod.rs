//! PostgreSQL text for one table: DDL plus the five CRUD statements.

mod crud;
mod ddl;

pub use crud::Statement;
pub use ddl::create_table;

use tracing::debug;

use crate::ast::Table;
use crate::config::GeneratorOptions;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSql {
    pub table: Table,
    pub ddl: String,
    pub select_all: String,
    pub select_by_key: Statement,
    pub delete_by_key: Statement,
    pub insert: Statement,
    pub update: Statement,
    /// Tables named by foreign keys, `schema.table`, first mention order.
    pub dependencies: Vec<String>,
}

impl GeneratedSql {
    pub fn new(table: &Table, options: &GeneratorOptions) -> Result<Self> {
        let ddl = create_table(table, options)?;
        let generated = Self {
            table: table.clone(),
            ddl,
            select_all: crud::select_all(table),
            select_by_key: crud::select_by_key(table)?,
            delete_by_key: crud::delete_by_key(table)?,
            insert: crud::insert(table)?,
            update: crud::update(table)?,
            dependencies: dependencies(table),
        };
        debug!(table = %table.qualified_name(), "generated sql");
        Ok(generated)
    }
}

fn dependencies(table: &Table) -> Vec<String> {
    let own = table.qualified_name();
    let mut deps: Vec<String> = Vec::new();
    for fk in table.columns().iter().filter_map(|c| c.foreign_key()) {
        let target = format!("{}.{}", fk.schema, fk.table);
        if target != own && !deps.contains(&target) {
            deps.push(target);
        }
    }
    deps
}

//! `CREATE TABLE` rendering.

use crate::ast::{Column, Table};
use crate::config::GeneratorOptions;
use crate::error::{Result, UnsupportedError};
use crate::types::DataType;

fn column_definition(column: &Column) -> Result<String> {
    let data_type = column.data_type();
    let mut def = String::new();
    def.push_str(column.name());
    def.push(' ');

    if column.is_auto_generated() && data_type == DataType::Int {
        def.push_str("SERIAL");
    } else {
        def.push_str(data_type.sql_type());
    }

    if column.is_primary_key() {
        def.push_str(" PRIMARY KEY");
    }

    if column.is_auto_generated() {
        match data_type {
            DataType::Guid => def.push_str(" DEFAULT uuid_generate_v4()"),
            DataType::Int => {}
            other => {
                return Err(UnsupportedError::AutoGenerateType {
                    column: column.name().to_string(),
                    data_type: other,
                }
                .into());
            }
        }
    }

    // primary key implies not null
    if !column.is_nullable() && !column.is_primary_key() {
        def.push_str(" NOT NULL");
    }

    if let Some(fk) = column.foreign_key() {
        def.push_str(" REFERENCES ");
        def.push_str(&fk.to_string());
    }

    if column.default_value().is_some() {
        def.push_str(" DEFAULT ");
        def.push_str(&column.default_value_expression()?);
    }

    if column.is_unique() && !column.is_primary_key() {
        def.push_str(" UNIQUE");
    }

    Ok(def)
}

pub fn create_table(table: &Table, options: &GeneratorOptions) -> Result<String> {
    let indent = options.indent_unit();
    let mut sql = format!("CREATE TABLE {} (\n", table.qualified_name());

    let count = table.columns().len();
    for (i, column) in table.columns().iter().enumerate() {
        sql.push_str(&indent);
        sql.push_str(&column_definition(column)?);
        if i + 1 < count {
            sql.push(',');
        }
        sql.push('\n');
    }

    sql.push_str(");");
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnSpec, ForeignKeyRef};
    use crate::error::{Error, SemanticError};

    fn definition(spec: ColumnSpec) -> Result<String> {
        column_definition(&Column::new(spec).unwrap())
    }

    #[test]
    fn test_create_table() {
        let table = Table::new(
            "public",
            "user",
            vec![
                Column::new(ColumnSpec::new("id", DataType::Guid).primary().auto_generated()).unwrap(),
                Column::new(ColumnSpec::new("name", DataType::String)).unwrap(),
            ],
        );
        let sql = create_table(&table, &GeneratorOptions::default()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE public.user (\n    id uuid PRIMARY KEY DEFAULT uuid_generate_v4(),\n    name text NOT NULL\n);"
        );
    }

    #[test]
    fn test_serial_key() {
        let def = definition(ColumnSpec::new("id", DataType::Int).primary().auto_generated()).unwrap();
        assert_eq!(def, "id SERIAL PRIMARY KEY");
        let def = definition(ColumnSpec::new("id", DataType::Long).primary()).unwrap();
        assert_eq!(def, "id int8 PRIMARY KEY");
    }

    #[test]
    fn test_auto_generate_unsupported_type() {
        let err = definition(ColumnSpec::new("id", DataType::Long).primary().auto_generated()).unwrap_err();
        assert!(matches!(
            err,
            Error::Unsupported(UnsupportedError::AutoGenerateType { data_type: DataType::Long, .. })
        ));
    }

    #[test]
    fn test_clause_order() {
        let spec = ColumnSpec::new("OwnerId", DataType::Guid)
            .references(ForeignKeyRef::new("public", "Account", "id"))
            .unique();
        assert_eq!(
            definition(spec).unwrap(),
            "owner_id uuid NOT NULL REFERENCES public.account(id) UNIQUE"
        );

        let spec = ColumnSpec::new("rank", DataType::Short).nullable().with_default("3");
        assert_eq!(definition(spec).unwrap(), "rank int2 DEFAULT 3");
    }

    #[test]
    fn test_unique_suppressed_on_key() {
        let def = definition(ColumnSpec::new("code", DataType::String).primary().unique()).unwrap();
        assert_eq!(def, "code text PRIMARY KEY");
    }

    #[test]
    fn test_invalid_default_propagates() {
        let err = definition(ColumnSpec::new("n", DataType::Int).with_default("many")).unwrap_err();
        assert!(matches!(
            err,
            Error::Semantic(SemanticError::InvalidDefault { .. })
        ));
    }

    #[test]
    fn test_tab_indent() {
        let options = GeneratorOptions {
            use_tabs: true,
            ..GeneratorOptions::default()
        };
        let table = Table::new(
            "app",
            "flag",
            vec![Column::new(ColumnSpec::new("on", DataType::Bool).primary()).unwrap()],
        );
        assert_eq!(
            create_table(&table, &options).unwrap(),
            "CREATE TABLE app.flag (\n\ton bool PRIMARY KEY\n);"
        );
    }
}

use tracing::debug;

use super::{GeneratedRecord, argument_name, property_name, qualified_class_name};
use crate::ast::Column;
use crate::config::{FieldNaming, GeneratorOptions};
use crate::emit::CodeWriter;
use crate::error::{Result, SemanticError};
use crate::naming::camel_name;
use crate::sql::{GeneratedSql, Statement};

const REQUIRED_NAMESPACES: &[&str] = &[
    "System",
    "System.Collections.Generic",
    "System.Data.Common",
    "System.Threading.Tasks",
    "Npgsql",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRepository {
    pub class_name: String,
    pub namespace: String,
    pub source: String,
}

/// Names shared by every method of one repository.
struct Context<'a> {
    sql: &'a GeneratedSql,
    /// Record type as written in signatures.
    record: String,
    /// Unqualified record class, the owner of every property.
    class_name: String,
    /// Local name of a record argument, e.g. `order` or `@event`.
    argument: String,
    connection: String,
}

impl Context<'_> {
    fn key(&self) -> Result<&Column> {
        Ok(self.sql.table.require_primary_key()?)
    }

    fn key_argument(&self) -> Result<String> {
        let key = self.key()?;
        Ok(format!(
            "{} {}",
            key.data_type().host_type(),
            argument_name(key.camel_name())
        ))
    }

    fn column_for(&self, parameter: &str) -> Result<&Column> {
        self.sql
            .table
            .columns()
            .iter()
            .find(|c| c.camel_name() == parameter)
            .ok_or_else(|| {
                SemanticError::UnknownParameter {
                    table: self.sql.table.qualified_name(),
                    parameter: parameter.to_string(),
                }
                .into()
            })
    }
}

fn verbatim(sql: &str) -> String {
    sql.replace('"', "\"\"")
}

fn write_command(w: &mut CodeWriter, sql: &str) {
    w.aligned(
        "var command = new NpgsqlCommand(@\"",
        &verbatim(sql),
        "\", connection);",
    );
}

/// `using (var connection ...)` with the connection already open.
fn with_connection(
    w: &mut CodeWriter,
    ctx: &Context<'_>,
    body: impl FnOnce(&mut CodeWriter) -> Result<()>,
) -> Result<()> {
    w.block(
        &format!("using (var connection = new NpgsqlConnection({}))", ctx.connection),
        |w| {
            w.line("await connection.OpenAsync();");
            w.blank();
            body(w)
        },
    )
}

/// Reads at most one row and returns it, `null` otherwise.
fn read_single(w: &mut CodeWriter) -> Result<()> {
    w.block("using (var reader = await command.ExecuteReaderAsync())", |w| {
        w.block("if (await reader.ReadAsync())", |w| {
            w.line("return GetCurrent(reader);");
            Ok(())
        })
    })?;
    w.blank();
    w.line("return null;");
    Ok(())
}

fn bind_key(w: &mut CodeWriter, ctx: &Context<'_>) -> Result<()> {
    let key = ctx.key()?;
    w.line(&format!(
        "command.Parameters.AddWithValue(\"{}\", {});",
        key.camel_name(),
        argument_name(key.camel_name())
    ));
    Ok(())
}

/// Binds every statement parameter from the matching record property.
fn bind_record(w: &mut CodeWriter, ctx: &Context<'_>, statement: &Statement) -> Result<()> {
    for parameter in &statement.parameters {
        let column = ctx.column_for(parameter)?;
        let value = format!(
            "{}.{}",
            ctx.argument,
            property_name(column, &ctx.class_name)
        );
        let value = if column.is_nullable() {
            format!("(object){} ?? DBNull.Value", value)
        } else {
            value
        };
        w.line(&format!(
            "command.Parameters.AddWithValue(\"{}\", {});",
            parameter, value
        ));
    }
    Ok(())
}

fn write_get_all(w: &mut CodeWriter, ctx: &Context<'_>) -> Result<()> {
    let header = format!("public async Task<IEnumerable<{}>> GetAll()", ctx.record);
    w.block(&header, |w| {
        with_connection(w, ctx, |w| {
            write_command(w, &ctx.sql.select_all);
            w.blank();
            w.block("using (var reader = await command.ExecuteReaderAsync())", |w| {
                w.line(&format!("var result = new List<{}>();", ctx.record));
                w.block("while (await reader.ReadAsync())", |w| {
                    w.line("result.Add(GetCurrent(reader));");
                    Ok(())
                })?;
                w.blank();
                w.line("return result;");
                Ok(())
            })
        })
    })
}

fn write_get(w: &mut CodeWriter, ctx: &Context<'_>) -> Result<()> {
    let header = format!(
        "public async Task<{}> Get({})",
        ctx.record,
        ctx.key_argument()?
    );
    w.block(&header, |w| {
        with_connection(w, ctx, |w| {
            write_command(w, &ctx.sql.select_by_key.sql);
            w.blank();
            bind_key(w, ctx)?;
            w.blank();
            read_single(w)
        })
    })
}

fn write_delete(w: &mut CodeWriter, ctx: &Context<'_>) -> Result<()> {
    let header = format!("public async Task<bool> Delete({})", ctx.key_argument()?);
    w.block(&header, |w| {
        with_connection(w, ctx, |w| {
            write_command(w, &ctx.sql.delete_by_key.sql);
            w.blank();
            bind_key(w, ctx)?;
            w.blank();
            w.line("var affected = await command.ExecuteNonQueryAsync();");
            w.blank();
            w.line("return affected > 0;");
            Ok(())
        })
    })
}

fn write_persist(
    w: &mut CodeWriter,
    ctx: &Context<'_>,
    method: &str,
    statement: &Statement,
) -> Result<()> {
    let header = format!(
        "public async Task<{}> {}({} {})",
        ctx.record, method, ctx.record, ctx.argument
    );
    w.block(&header, |w| {
        with_connection(w, ctx, |w| {
            write_command(w, &statement.sql);
            if !statement.parameters.is_empty() {
                w.blank();
                bind_record(w, ctx, statement)?;
            }
            w.blank();
            read_single(w)
        })
    })
}

/// Positional reads in declaration order, matching every RETURNING and
/// SELECT column list.
fn write_get_current(w: &mut CodeWriter, ctx: &Context<'_>) -> Result<()> {
    let header = format!(
        "private static {} GetCurrent(DbDataReader reader)",
        ctx.record
    );
    w.block(&header, |w| {
        w.initializer(&format!("return new {}", ctx.record), |w| {
            let columns = ctx.sql.table.columns();
            for (i, column) in columns.iter().enumerate() {
                let data_type = column.data_type();
                let read = format!("reader.{}({})", data_type.reader_method(), i);
                let read = if column.is_nullable() {
                    format!(
                        "reader.IsDBNull({}) ? default({}) : {}",
                        i,
                        data_type.host_type_nullable(true),
                        read
                    )
                } else {
                    read
                };
                let separator = if i + 1 < columns.len() { "," } else { "" };
                w.line(&format!(
                    "{} = {}{}",
                    property_name(column, &ctx.class_name),
                    read,
                    separator
                ));
            }
            Ok(())
        })
    })
}

impl GeneratedRepository {
    pub fn new(
        sql: &GeneratedSql,
        record: &GeneratedRecord,
        options: &GeneratorOptions,
    ) -> Result<Self> {
        let class_name = format!("{}{}", record.class_name, options.repository_suffix);
        let namespace = options.repository_namespace().to_string();
        let field = options.field_naming.field_name("connectionString");

        let ctx = Context {
            sql,
            record: qualified_class_name(&record.class_name, &record.namespace),
            class_name: record.class_name.clone(),
            argument: argument_name(&camel_name(&record.class_name)),
            connection: field.clone(),
        };

        let mut w = CodeWriter::new(options);
        for ns in REQUIRED_NAMESPACES {
            w.line(&format!("using {};", ns));
        }
        if record.namespace != namespace {
            w.line(&format!("using {};", record.namespace));
        }
        w.blank();

        w.block(&format!("namespace {}", namespace), |w| {
            w.block(&format!("public class {}", class_name), |w| {
                w.line(&format!("private readonly string {};", field));
                w.blank();
                w.block(&format!("public {}(string connectionString)", class_name), |w| {
                    let target = match options.field_naming {
                        FieldNaming::CamelCase => format!("this.{}", field),
                        FieldNaming::Underscore => field.clone(),
                    };
                    w.line(&format!("{} = connectionString;", target));
                    Ok(())
                })?;
                w.blank();
                write_get_all(w, &ctx)?;
                w.blank();
                write_get(w, &ctx)?;
                w.blank();
                write_delete(w, &ctx)?;
                w.blank();
                write_persist(w, &ctx, "Create", &sql.insert)?;
                w.blank();
                write_persist(w, &ctx, "Update", &sql.update)?;
                w.blank();
                write_get_current(w, &ctx)
            })
        })?;

        debug!(class = %class_name, "generated repository");
        Ok(Self {
            class_name,
            namespace,
            source: w.finish(),
        })
    }
}

use tracing::debug;

use super::property_name;
use crate::config::GeneratorOptions;
use crate::emit::CodeWriter;
use crate::error::Result;
use crate::sql::GeneratedSql;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRecord {
    pub class_name: String,
    pub namespace: String,
    pub source: String,
}

impl GeneratedRecord {
    /// One auto-property per column, in declaration order.
    pub fn new(sql: &GeneratedSql, options: &GeneratorOptions) -> Result<Self> {
        let table = &sql.table;
        let class_name = table.class_name().to_string();
        let namespace = options.class_namespace.clone();

        let mut w = CodeWriter::new(options);
        if table
            .columns()
            .iter()
            .any(|c| c.data_type().needs_system_namespace())
        {
            w.line("using System;");
            w.blank();
        }

        w.block(&format!("namespace {}", namespace), |w| {
            w.block(&format!("public class {}", class_name), |w| {
                for (i, column) in table.columns().iter().enumerate() {
                    if i > 0 {
                        w.blank();
                    }
                    w.line(&format!(
                        "public {} {} {{ get; set; }}",
                        column.data_type().host_type_nullable(column.is_nullable()),
                        property_name(column, &class_name)
                    ));
                }
                Ok(())
            })
        })?;

        debug!(class = %class_name, "generated record");
        Ok(Self {
            class_name,
            namespace,
            source: w.finish(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn record(input: &str, options: &GeneratorOptions) -> GeneratedRecord {
        let tables = parse(input, &options.default_schema).unwrap();
        let sql = GeneratedSql::new(&tables[0], options).unwrap();
        GeneratedRecord::new(&sql, options).unwrap()
    }

    #[test]
    fn test_record_source() {
        let options = GeneratorOptions::default();
        let rec = record(
            "order_line { id guid pk ag, quantity int, note string null, shipped datetime null }",
            &options,
        );
        assert_eq!(rec.class_name, "OrderLine");
        assert_eq!(
            rec.source,
            "using System;

namespace Generated
{
    public class OrderLine
    {
        public Guid Id { get; set; }

        public int Quantity { get; set; }

        public string Note { get; set; }

        public DateTime? Shipped { get; set; }
    }
}
"
        );
    }

    #[test]
    fn test_no_system_using_when_unneeded() {
        let options = GeneratorOptions {
            class_namespace: "Shop".into(),
            ..GeneratorOptions::default()
        };
        let rec = record("tag { id int pk ag, label string, data bytes null }", &options);
        assert!(rec.source.starts_with("namespace Shop\n"));
        assert!(rec.source.contains("public byte[] Data { get; set; }"));
    }

    #[test]
    fn test_property_named_like_class() {
        let rec = record("note { id int pk, note string }", &GeneratorOptions::default());
        assert_eq!(rec.class_name, "Note");
        assert!(rec.source.contains("public int Id { get; set; }"));
        assert!(rec.source.contains("public string NoteValue { get; set; }"));
        assert!(!rec.source.contains("public string Note {"));
    }
}

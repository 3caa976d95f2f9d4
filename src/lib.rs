pub mod ast;
pub mod config;
pub mod csharp;
pub mod emit;
pub mod error;
pub mod lexer;
pub mod naming;
pub mod parser;
pub mod sql;
pub mod types;

use js_sys::{Array, Object, Reflect};
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

pub use config::GeneratorOptions;
pub use error::{Error, Result};

use csharp::{GeneratedRecord, GeneratedRepository};
use sql::GeneratedSql;

/// Everything generated for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    /// Host-style table name, e.g. `OrderLine`.
    pub object_name: String,
    pub sql: GeneratedSql,
    pub record: GeneratedRecord,
    pub repository: GeneratedRepository,
}

impl ArtifactBundle {
    pub fn repository_name(&self) -> &str {
        &self.repository.class_name
    }
}

/// Compiles the definition texts, in order, into one bundle per table.
/// The first error aborts the whole batch.
pub fn generate<S: AsRef<str>>(
    inputs: &[S],
    options: &GeneratorOptions,
) -> Result<Vec<ArtifactBundle>> {
    let mut tables = Vec::new();
    for (i, input) in inputs.iter().enumerate() {
        let parsed = parser::parse(input.as_ref(), &options.default_schema)?;
        debug!(input = i, tables = parsed.len(), "parsed input");
        tables.extend(parsed);
    }

    let mut bundles = Vec::with_capacity(tables.len());
    for table in &tables {
        let sql = GeneratedSql::new(table, options)?;
        let record = GeneratedRecord::new(&sql, options)?;
        let repository = GeneratedRepository::new(&sql, &record, options)?;
        bundles.push(ArtifactBundle {
            object_name: table.class_name().to_string(),
            sql,
            record,
            repository,
        });
    }

    info!(tables = bundles.len(), "generated artifacts");
    Ok(bundles)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Compile one definition text to `[{ name, sql, record, repository }]`.
#[wasm_bindgen(js_name = "generateArtifacts")]
pub fn generate_artifacts(source: &str, config: Option<String>) -> std::result::Result<Array, String> {
    let options = match config.as_deref() {
        Some(text) => GeneratorOptions::from_toml_str(text).map_err(|e| e.to_string())?,
        None => GeneratorOptions::default(),
    };
    let bundles = generate(&[source], &options).map_err(|e| e.to_string())?;

    let result = Array::new();
    for bundle in &bundles {
        let entry = Object::new();
        let fields = [
            ("name", bundle.object_name.as_str()),
            ("sql", bundle.sql.ddl.as_str()),
            ("record", bundle.record.source.as_str()),
            ("repository", bundle.repository.source.as_str()),
        ];
        for (key, value) in fields {
            Reflect::set(&entry, &JsValue::from_str(key), &JsValue::from_str(value))
                .map_err(|_| format!("failed to set '{}' on result", key))?;
        }
        result.push(&entry);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_across_inputs() {
        let inputs = ["customer { id guid pk ag }", "order { id int pk ag\n customer_id guid fk customer.id }"];
        let bundles = generate(&inputs, &GeneratorOptions::default()).unwrap();
        let names: Vec<_> = bundles.iter().map(|b| b.object_name.as_str()).collect();
        assert_eq!(names, vec!["Customer", "Order"]);
        assert_eq!(bundles[1].repository_name(), "OrderRepository");
        assert_eq!(bundles[1].sql.dependencies, vec!["public.customer"]);
    }

    #[test]
    fn test_error_in_later_input_aborts_batch() {
        let inputs = ["a { id int pk }", "b { id int pk null }"];
        assert!(generate(&inputs, &GeneratorOptions::default()).is_err());
    }

    #[test]
    fn test_empty_batch() {
        let inputs: [&str; 0] = [];
        assert!(generate(&inputs, &GeneratorOptions::default()).unwrap().is_empty());
    }
}

use std::fmt;

use crate::error::{Result, SemanticError, UnsupportedError};
use crate::naming::{camel_name, pascal_name, storage_name};
use crate::types::DataType;

/// Target of a foreign key, as written in the definition. Never checked
/// against the other parsed tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKeyRef {
    pub schema: String,
    pub table: String,
    pub column: String,
}

impl ForeignKeyRef {
    pub fn new(schema: &str, table: &str, column: &str) -> Self {
        Self {
            schema: storage_name(schema),
            table: storage_name(table),
            column: storage_name(column),
        }
    }
}

impl fmt::Display for ForeignKeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({})", self.schema, self.table, self.column)
    }
}

/// Column under construction while its declaration is being parsed.
#[derive(Debug, Clone, Default)]
pub struct ColumnDraft {
    pub name: String,
    pub data_type: Option<DataType>,
    pub default_value: Option<String>,
    pub primary_key: bool,
    pub auto_generate: bool,
    pub nullable: bool,
    pub foreign_key: Option<ForeignKeyRef>,
    pub max_length: Option<u32>,
    pub unique: bool,
}

impl ColumnDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Validate and freeze. `table` is only used for error context.
    pub fn finish(self, table: &str) -> std::result::Result<Column, SemanticError> {
        let data_type = match self.data_type {
            Some(t) if !self.name.is_empty() => t,
            _ => {
                return Err(SemanticError::IncompleteColumn {
                    table: table.to_string(),
                    column: self.name,
                });
            }
        };

        Column::new(ColumnSpec {
            name: self.name,
            data_type,
            default_value: self.default_value,
            primary_key: self.primary_key,
            auto_generate: self.auto_generate,
            nullable: self.nullable,
            foreign_key: self.foreign_key,
            max_length: self.max_length,
            unique: self.unique,
        })
    }
}

/// Everything needed to build a [`Column`].
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: DataType,
    pub default_value: Option<String>,
    pub primary_key: bool,
    pub auto_generate: bool,
    pub nullable: bool,
    pub foreign_key: Option<ForeignKeyRef>,
    pub max_length: Option<u32>,
    pub unique: bool,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            default_value: None,
            primary_key: false,
            auto_generate: false,
            nullable: false,
            foreign_key: None,
            max_length: None,
            unique: false,
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto_generated(mut self) -> Self {
        self.auto_generate = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn references(mut self, target: ForeignKeyRef) -> Self {
        self.foreign_key = Some(target);
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    pascal_name: String,
    camel_name: String,
    data_type: DataType,
    default_value: Option<String>,
    primary_key: bool,
    auto_generate: bool,
    nullable: bool,
    foreign_key: Option<ForeignKeyRef>,
    max_length: Option<u32>,
    unique: bool,
}

impl Column {
    pub fn new(spec: ColumnSpec) -> std::result::Result<Self, SemanticError> {
        let column = || spec.name.clone();
        if spec.primary_key && spec.foreign_key.is_some() {
            return Err(SemanticError::PrimaryAndForeignKey { column: column() });
        }
        if spec.primary_key && spec.nullable {
            return Err(SemanticError::NullablePrimaryKey { column: column() });
        }
        if spec.auto_generate && !spec.primary_key {
            return Err(SemanticError::AutoGenerateWithoutPrimaryKey { column: column() });
        }
        if spec.auto_generate && spec.default_value.is_some() {
            return Err(SemanticError::DefaultOnAutoGenerate { column: column() });
        }

        Ok(Self {
            name: storage_name(&spec.name),
            pascal_name: pascal_name(&spec.name),
            camel_name: camel_name(&spec.name),
            data_type: spec.data_type,
            default_value: spec.default_value,
            primary_key: spec.primary_key,
            auto_generate: spec.auto_generate,
            nullable: spec.nullable,
            foreign_key: spec.foreign_key,
            max_length: spec.max_length,
            unique: spec.unique,
        })
    }

    /// Storage-style (SQL) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record field name, e.g. `UserId`.
    pub fn pascal_name(&self) -> &str {
        &self.pascal_name
    }

    /// Parameter name, e.g. `userId`.
    pub fn camel_name(&self) -> &str {
        &self.camel_name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_auto_generated(&self) -> bool {
        self.auto_generate
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn foreign_key(&self) -> Option<&ForeignKeyRef> {
        self.foreign_key.as_ref()
    }

    /// Parsed but not used by the DDL generator.
    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// SQL expression for the declared default, checked against the column type.
    pub fn default_value_expression(&self) -> Result<String> {
        let value = match &self.default_value {
            Some(v) => v.as_str(),
            None => {
                return Err(SemanticError::NoDefaultValue {
                    column: self.name.clone(),
                }
                .into());
            }
        };

        let invalid = || SemanticError::InvalidDefault {
            column: self.name.clone(),
            data_type: self.data_type,
            value: value.to_string(),
        };

        let expr = match self.data_type {
            DataType::DateTime => {
                if value.eq_ignore_ascii_case("now") {
                    "NOW()".to_string()
                } else if value.eq_ignore_ascii_case("utcnow") {
                    "(NOW() at time zone 'utc')".to_string()
                } else {
                    return Err(invalid().into());
                }
            }
            DataType::Short => value.parse::<i16>().map_err(|_| invalid())?.to_string(),
            DataType::Int => value.parse::<i32>().map_err(|_| invalid())?.to_string(),
            DataType::Long => value.parse::<i64>().map_err(|_| invalid())?.to_string(),
            DataType::Float => match value.parse::<f32>() {
                Ok(v) if v.is_finite() => value.to_string(),
                _ => return Err(invalid().into()),
            },
            DataType::Double => match value.parse::<f64>() {
                Ok(v) if v.is_finite() => value.to_string(),
                _ => return Err(invalid().into()),
            },
            DataType::Decimal => format_decimal(value).ok_or_else(invalid)?,
            other => {
                return Err(UnsupportedError::DefaultValueType {
                    column: self.name.clone(),
                    data_type: other,
                    value: value.to_string(),
                }
                .into());
            }
        };

        Ok(expr)
    }
}

/// Normalizes a plain decimal literal (`+007.50` -> `7.50`, `.5` -> `0.5`).
/// Scale is kept as written. Exponents and separators are rejected.
fn format_decimal(value: &str) -> Option<String> {
    let (negative, unsigned) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    let int_part = int_part.trim_start_matches('0');
    let mut out = String::new();
    let is_zero = int_part.is_empty() && frac_part.bytes().all(|b| b == b'0');
    if negative && !is_zero {
        out.push('-');
    }
    out.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Some(out)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: String,
    name: String,
    class_name: String,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(schema: &str, name: &str, columns: Vec<Column>) -> Self {
        Self {
            schema: storage_name(schema),
            name: storage_name(name),
            class_name: pascal_name(name),
            columns,
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `schema.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// C# class name, e.g. `OrderLine`.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The single primary-key column, if any. More than one is an error.
    pub fn primary_key(&self) -> std::result::Result<Option<&Column>, SemanticError> {
        let mut found: Option<&Column> = None;
        for column in self.columns.iter().filter(|c| c.is_primary_key()) {
            if let Some(first) = found {
                return Err(SemanticError::MultiplePrimaryKeys {
                    table: self.qualified_name(),
                    first: first.name().to_string(),
                    second: column.name().to_string(),
                });
            }
            found = Some(column);
        }
        Ok(found)
    }

    /// Like [`Table::primary_key`], but a missing key is an error too.
    pub fn require_primary_key(&self) -> std::result::Result<&Column, SemanticError> {
        self.primary_key()?.ok_or_else(|| SemanticError::MissingPrimaryKey {
            table: self.qualified_name(),
        })
    }
}

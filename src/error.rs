//! Error kinds raised while compiling table definitions.
//!
//! Every error is fatal for the whole run: nothing is generated once one is
//! raised.

use crate::lexer::{LexError, Token};
use crate::types::DataType;

fn in_table(table: &Option<String>) -> String {
    match table {
        Some(t) => format!(" in table '{}'", t),
        None => String::new(),
    }
}

/// A token appeared outside the context that allows it.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("Expected '{{' after table name '{table}', found {found}")]
    ExpectedOpenTable { table: String, found: Token },

    #[error("{found} used outside a column{}", in_table(.table))]
    OutsideColumn { found: Token, table: Option<String> },

    #[error("Expected a 'table.column' reference after 'fk' on column '{column}', found {found}")]
    ExpectedReference { column: String, found: Token },

    #[error("Expected a '[value]' after 'df' on column '{column}', found {found}")]
    ExpectedDefaultValue { column: String, found: Token },

    #[error("Reference '{reference}' found outside a foreign key{}", in_table(.table))]
    ReferenceOutsideForeignKey { reference: String, table: Option<String> },

    #[error("Unexpected {found}{}", in_table(.table))]
    UnexpectedToken { found: Token, table: Option<String> },

    #[error("Found end of table marker '}}' outside of a table")]
    CloseOutsideTable,

    #[error("Input ended before table '{table}' was closed")]
    UnterminatedTable { table: String },
}

/// The definition is well-formed but contradicts itself.
#[derive(Debug, thiserror::Error)]
pub enum SemanticError {
    #[error("Column '{column}' cannot be both a primary and a foreign key")]
    PrimaryAndForeignKey { column: String },

    #[error("Column '{column}' is a primary key, it cannot be nullable")]
    NullablePrimaryKey { column: String },

    #[error("Column '{column}' is not a primary key, it cannot be auto generated")]
    AutoGenerateWithoutPrimaryKey { column: String },

    #[error("Column '{column}' is auto generated, it cannot have a default value")]
    DefaultOnAutoGenerate { column: String },

    #[error("Column '{column}' in table '{table}' needs at least a name and a data type")]
    IncompleteColumn { table: String, column: String },

    #[error("Both '{first}' and '{second}' are primary keys in table '{table}'")]
    MultiplePrimaryKeys {
        table: String,
        first: String,
        second: String,
    },

    #[error("Table '{table}' has no primary key")]
    MissingPrimaryKey { table: String },

    #[error("Column '{column}' has no default value")]
    NoDefaultValue { column: String },

    #[error("Invalid default value '{value}' for {data_type} column '{column}'")]
    InvalidDefault {
        column: String,
        data_type: DataType,
        value: String,
    },

    #[error("Value '{value}' on column '{column}' is not a max length of a string column")]
    InvalidMaxLength { column: String, value: String },

    #[error("Parameter '@{parameter}' matches no column of table '{table}'")]
    UnknownParameter { table: String, parameter: String },
}

/// A combination the generators do not implement.
#[derive(Debug, thiserror::Error)]
pub enum UnsupportedError {
    #[error("Auto generated primary keys are unsupported for {data_type} column '{column}'")]
    AutoGenerateType { column: String, data_type: DataType },

    #[error("Default values are not implemented for {data_type} column '{column}' (value '{value}')")]
    DefaultValueType {
        column: String,
        data_type: DataType,
        value: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),
    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),
    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),
    #[error("Unsupported configuration: {0}")]
    Unsupported(#[from] UnsupportedError),
}

pub type Result<T> = std::result::Result<T, Error>;

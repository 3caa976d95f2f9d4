use tracing::{debug, trace};

use crate::ast::{Column, ColumnDraft, ForeignKeyRef, Table};
use crate::error::{GrammarError, Result, SemanticError};
use crate::lexer::{Lexer, Token};
use crate::naming::storage_name;
use crate::types::DataType;

/// A table whose header has been read but whose `}` has not.
struct TablePlaceholder {
    schema: String,
    name: String,
    columns: Vec<Column>,
}

impl TablePlaceholder {
    fn label(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// Single pass over the token stream. Any violated rule aborts the parse.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    default_schema: String,

    expects_table: bool,
    next_must_open_table: bool,
    care_about_splitter: bool,
    preceding: Option<Token>,

    table: Option<TablePlaceholder>,
    column: Option<ColumnDraft>,
    tables: Vec<Table>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, default_schema: &str) -> Self {
        Self {
            lexer: Lexer::new(input),
            default_schema: default_schema.to_string(),
            expects_table: true,
            next_must_open_table: false,
            care_about_splitter: false,
            preceding: None,
            table: None,
            column: None,
            tables: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<Vec<Table>> {
        while let Some(tok) = self.lexer.next() {
            let tok = tok?;
            trace!(token = %tok, "token");
            self.step(tok)?;
        }

        if let Some(table) = &self.table {
            return Err(GrammarError::UnterminatedTable {
                table: table.label(),
            }
            .into());
        }
        Ok(self.tables)
    }

    fn table_label(&self) -> Option<String> {
        self.table.as_ref().map(TablePlaceholder::label)
    }

    fn step(&mut self, tok: Token) -> Result<()> {
        if self.next_must_open_table {
            match tok {
                Token::OpenTable => self.next_must_open_table = false,
                Token::NewLine => {}
                found => {
                    return Err(GrammarError::ExpectedOpenTable {
                        table: self.table_label().unwrap_or_default(),
                        found,
                    }
                    .into());
                }
            }
            return Ok(());
        }

        if matches!(self.preceding, Some(Token::ForeignKey)) {
            return self.attach_foreign_key(tok);
        }
        if matches!(self.preceding, Some(Token::Default)) {
            return self.attach_default(tok);
        }

        self.dispatch(&tok)?;
        self.preceding = Some(tok);
        Ok(())
    }

    fn attach_foreign_key(&mut self, tok: Token) -> Result<()> {
        let schema = self.default_schema.clone();
        let column = self.open_column(&Token::ForeignKey)?;
        match tok {
            Token::ColumnTableReference { table, column: target } => {
                column.foreign_key = Some(ForeignKeyRef::new(&schema, &table, &target));
                self.preceding = Some(Token::ColumnTableReference {
                    table,
                    column: target,
                });
                Ok(())
            }
            found => Err(GrammarError::ExpectedReference {
                column: column.name.clone(),
                found,
            }
            .into()),
        }
    }

    fn attach_default(&mut self, tok: Token) -> Result<()> {
        let column = self.open_column(&Token::Default)?;
        match tok {
            Token::Value(v) => {
                column.default_value = Some(v.clone());
                self.preceding = Some(Token::Value(v));
                Ok(())
            }
            found => Err(GrammarError::ExpectedDefaultValue {
                column: column.name.clone(),
                found,
            }
            .into()),
        }
    }

    /// The open column, or a grammar error naming `tok`.
    fn open_column(&mut self, tok: &Token) -> Result<&mut ColumnDraft> {
        let table = self.table_label();
        self.column.as_mut().ok_or_else(|| {
            GrammarError::OutsideColumn {
                found: tok.clone(),
                table,
            }
            .into()
        })
    }

    fn dispatch(&mut self, tok: &Token) -> Result<()> {
        match tok {
            Token::NewLine | Token::Comma => {
                if self.care_about_splitter && self.table.is_some() {
                    self.finish_column()?;
                }
            }
            Token::Name(name) => {
                if self.expects_table {
                    let schema = self.default_schema.clone();
                    self.open_table(&schema, name);
                } else if self.column.is_none() {
                    if self.table.is_none() {
                        return Err(self.unexpected(tok));
                    }
                    self.column = Some(ColumnDraft::new(name.clone()));
                    self.care_about_splitter = true;
                } else if name.bytes().all(|b| b.is_ascii_digit()) {
                    self.set_max_length(name)?;
                } else {
                    return Err(self.unexpected(tok));
                }
            }
            Token::ColumnTableReference { table, column } => {
                if self.expects_table {
                    self.open_table(table, column);
                } else {
                    return Err(GrammarError::ReferenceOutsideForeignKey {
                        reference: format!("{}.{}", table, column),
                        table: self.table_label(),
                    }
                    .into());
                }
            }
            Token::DataType(typ) => {
                self.open_column(tok)?.data_type = Some(*typ);
            }
            Token::PrimaryKey => {
                let column = self.open_column(tok)?;
                if column.foreign_key.is_some() {
                    return Err(SemanticError::PrimaryAndForeignKey {
                        column: column.name.clone(),
                    }
                    .into());
                }
                if column.nullable {
                    return Err(SemanticError::NullablePrimaryKey {
                        column: column.name.clone(),
                    }
                    .into());
                }
                column.primary_key = true;
            }
            Token::ForeignKey => {
                let column = self.open_column(tok)?;
                if column.primary_key {
                    return Err(SemanticError::PrimaryAndForeignKey {
                        column: column.name.clone(),
                    }
                    .into());
                }
            }
            Token::Null => {
                let column = self.open_column(tok)?;
                if column.primary_key {
                    return Err(SemanticError::NullablePrimaryKey {
                        column: column.name.clone(),
                    }
                    .into());
                }
                column.nullable = true;
            }
            Token::Unique => {
                self.open_column(tok)?.unique = true;
            }
            Token::AutoGenerate => {
                let column = self.open_column(tok)?;
                if !column.primary_key {
                    return Err(SemanticError::AutoGenerateWithoutPrimaryKey {
                        column: column.name.clone(),
                    }
                    .into());
                }
                column.auto_generate = true;
            }
            Token::Default => {
                self.open_column(tok)?;
            }
            Token::Value(v) => {
                self.open_column(tok)?;
                self.set_max_length(v)?;
            }
            Token::CloseTable => self.close_table()?,
            Token::OpenTable => return Err(self.unexpected(tok)),
        }
        Ok(())
    }

    fn unexpected(&self, tok: &Token) -> crate::error::Error {
        GrammarError::UnexpectedToken {
            found: tok.clone(),
            table: self.table_label(),
        }
        .into()
    }

    fn set_max_length(&mut self, value: &str) -> Result<()> {
        let column = self.open_column(&Token::Value(value.to_string()))?;
        let length = match column.data_type {
            Some(DataType::String) => value.parse::<u32>().ok(),
            _ => None,
        };
        match length {
            Some(n) => {
                column.max_length = Some(n);
                Ok(())
            }
            None => Err(SemanticError::InvalidMaxLength {
                column: column.name.clone(),
                value: value.to_string(),
            }
            .into()),
        }
    }

    fn open_table(&mut self, schema: &str, name: &str) {
        let placeholder = TablePlaceholder {
            schema: storage_name(schema),
            name: storage_name(name),
            columns: Vec::new(),
        };
        debug!(table = %placeholder.label(), "opening table");
        self.table = Some(placeholder);
        self.expects_table = false;
        self.next_must_open_table = true;
    }

    fn finish_column(&mut self) -> Result<()> {
        let label = self.table_label().unwrap_or_default();
        if let Some(draft) = self.column.take() {
            let column = draft.finish(&label)?;
            if let Some(table) = self.table.as_mut() {
                table.columns.push(column);
            }
        }
        self.care_about_splitter = false;
        Ok(())
    }

    fn close_table(&mut self) -> Result<()> {
        if self.table.is_none() || self.expects_table {
            return Err(GrammarError::CloseOutsideTable.into());
        }
        self.finish_column()?;

        if let Some(placeholder) = self.table.take() {
            debug!(
                table = %placeholder.label(),
                columns = placeholder.columns.len(),
                "closing table"
            );
            self.tables.push(Table::new(
                &placeholder.schema,
                &placeholder.name,
                placeholder.columns,
            ));
        }

        self.expects_table = true;
        self.next_must_open_table = false;
        self.care_about_splitter = false;
        self.preceding = None;
        Ok(())
    }
}

/// Parse one definition text.
pub fn parse(input: &str, default_schema: &str) -> Result<Vec<Table>> {
    Parser::new(input, default_schema).parse()
}

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::types::DataType;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Name(String),
    DataType(DataType),
    Value(String),
    /// `table.column`, also used as `schema.table` in a table header.
    ColumnTableReference { table: String, column: String },

    PrimaryKey,   // pk
    ForeignKey,   // fk
    Null,         // null
    Unique,       // uq
    AutoGenerate, // ag
    Default,      // df

    Comma,      // ,
    NewLine,    // \n (runs collapse)
    OpenTable,  // {
    CloseTable, // }
}

const KEYWORDS: &[(&str, Token)] = &[
    ("pk", Token::PrimaryKey),
    ("null", Token::Null),
    ("fk", Token::ForeignKey),
    ("df", Token::Default),
    ("uq", Token::Unique),
    ("ag", Token::AutoGenerate),
];

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(s) => write!(f, "name '{}'", s),
            Token::DataType(t) => write!(f, "data type '{}'", t),
            Token::Value(v) => write!(f, "value '[{}]'", v),
            Token::ColumnTableReference { table, column } => {
                write!(f, "reference '{}.{}'", table, column)
            }
            Token::PrimaryKey => f.write_str("'pk'"),
            Token::ForeignKey => f.write_str("'fk'"),
            Token::Null => f.write_str("'null'"),
            Token::Unique => f.write_str("'uq'"),
            Token::AutoGenerate => f.write_str("'ag'"),
            Token::Default => f.write_str("'df'"),
            Token::Comma => f.write_str("','"),
            Token::NewLine => f.write_str("newline"),
            Token::OpenTable => f.write_str("'{'"),
            Token::CloseTable => f.write_str("'}'"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at line {line}, column {col}")]
    UnexpectedChar { ch: char, line: usize, col: usize },
    #[error("Unterminated value starting at line {line}, column {col}")]
    UnterminatedValue { line: usize, col: usize },
    #[error("Newline inside value starting at line {line}, column {col}")]
    NewlineInValue { line: usize, col: usize },
    #[error("Empty value at line {line}, column {col}")]
    EmptyValue { line: usize, col: usize },
    #[error("Multiple periods in '{word}' at line {line}, column {col}")]
    MultipleDots { word: String, line: usize, col: usize },
    #[error("Reference '{word}' needs a name on both sides of the period at line {line}, column {col}")]
    EmptyReferencePart { word: String, line: usize, col: usize },
}

/// Lazily produces tokens; after the first error it yields nothing more.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
    failed: bool,
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '[' | ']' | '{' | '}' | ',')
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            col: 1,
            failed: false,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    /// Skips blanks. Returns true if at least one newline was crossed.
    fn skip_whitespace(&mut self) -> bool {
        let mut saw_newline = false;
        while let Some(&c) = self.chars.peek() {
            if is_newline(c) {
                saw_newline = true;
            } else if !c.is_whitespace() {
                break;
            }
            self.bump();
        }
        saw_newline
    }

    fn read_value(&mut self, line: usize, col: usize) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some(']') => break,
                Some(c) if is_newline(c) => return Err(LexError::NewlineInValue { line, col }),
                Some(c) if c.is_whitespace() => {}
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedValue { line, col }),
            }
        }
        if s.is_empty() {
            return Err(LexError::EmptyValue { line, col });
        }
        Ok(s)
    }

    fn read_word(&mut self, first: char, line: usize, col: usize) -> Result<Token, LexError> {
        let mut word = String::new();
        let mut dot: Option<usize> = None;
        let mut next = Some(first);

        while let Some(c) = next {
            if c == '.' {
                if dot.is_some() {
                    word.push(c);
                    return Err(LexError::MultipleDots { word, line, col });
                }
                dot = Some(word.len());
            } else if !(c.is_alphanumeric() || c == '_' || c == '-') {
                return Err(LexError::UnexpectedChar {
                    ch: c,
                    line: self.line,
                    col: self.col - 1,
                });
            }
            word.push(c);

            next = match self.chars.peek() {
                Some(&c) if !c.is_whitespace() && !is_delimiter(c) => self.bump(),
                _ => None,
            };
        }

        if let Some((_, tok)) = KEYWORDS.iter().find(|(kw, _)| kw.eq_ignore_ascii_case(&word)) {
            return Ok(tok.clone());
        }
        if let Some(i) = dot {
            if i == 0 || i + 1 == word.len() {
                return Err(LexError::EmptyReferencePart { word, line, col });
            }
            return Ok(Token::ColumnTableReference {
                table: word[..i].to_string(),
                column: word[i + 1..].to_string(),
            });
        }
        if let Some(typ) = DataType::from_keyword(&word) {
            return Ok(Token::DataType(typ));
        }
        Ok(Token::Name(word))
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if self.skip_whitespace() {
            return Ok(Some(Token::NewLine));
        }

        let (line, col) = (self.line, self.col);
        let c = match self.bump() {
            Some(c) => c,
            None => return Ok(None),
        };

        let tok = match c {
            ',' => Token::Comma,
            '{' => Token::OpenTable,
            '}' => Token::CloseTable,
            '[' => Token::Value(self.read_value(line, col)?),
            ']' => return Err(LexError::UnexpectedChar { ch: c, line, col }),
            c => self.read_word(c, line, col)?,
        };

        Ok(Some(tok))
    }

    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(tok) => tok.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn name(s: &str) -> Token {
        Token::Name(s.into())
    }

    #[test]
    fn test_basic_tokens() {
        let tokens = Lexer::new("user { id guid pk ag, name string }").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                name("user"),
                Token::OpenTable,
                name("id"),
                Token::DataType(DataType::Guid),
                Token::PrimaryKey,
                Token::AutoGenerate,
                Token::Comma,
                name("name"),
                Token::DataType(DataType::String),
                Token::CloseTable,
            ]
        );
    }

    #[test]
    fn test_blank_lines_collapse() {
        let tokens = Lexer::new("a\n\n   \r\n\tb\n").tokenize().unwrap();
        assert_eq!(tokens, vec![name("a"), Token::NewLine, name("b"), Token::NewLine]);
    }

    #[test]
    fn test_value_strips_whitespace() {
        let tokens = Lexer::new("df [ utc now ]").tokenize().unwrap();
        assert_eq!(tokens, vec![Token::Default, Token::Value("utcnow".into())]);
    }

    #[test]
    fn test_dotted_reference() {
        let tokens = Lexer::new("fk customer.id").tokenize().unwrap();
        assert_eq!(
            tokens[1],
            Token::ColumnTableReference {
                table: "customer".into(),
                column: "id".into()
            }
        );
    }

    #[test]
    fn test_word_stops_at_delimiters() {
        let tokens = Lexer::new("orders{id int,x long}").tokenize().unwrap();
        assert_eq!(tokens[0], name("orders"));
        assert_eq!(tokens[1], Token::OpenTable);
        assert_eq!(tokens[3], Token::DataType(DataType::Int));
        assert_eq!(tokens[4], Token::Comma);
        assert_eq!(tokens[7], Token::CloseTable);
    }

    #[test]
    fn test_keyword_beats_data_type_and_name() {
        let tokens = Lexer::new("NULL Null int my-name").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Null,
                Token::Null,
                Token::DataType(DataType::Int),
                name("my-name")
            ]
        );
    }

    #[test]
    fn test_unterminated_value() {
        let err = Lexer::new("df [now").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedValue { line: 1, col: 4 }));
    }

    #[test]
    fn test_newline_in_value() {
        let err = Lexer::new("df [no\nw]").tokenize().unwrap_err();
        assert!(matches!(err, LexError::NewlineInValue { .. }));
    }

    #[test]
    fn test_empty_value() {
        let err = Lexer::new("df [  ]").tokenize().unwrap_err();
        assert!(matches!(err, LexError::EmptyValue { .. }));
    }

    #[test]
    fn test_multiple_dots() {
        let err = Lexer::new("a.b.c").tokenize().unwrap_err();
        match err {
            LexError::MultipleDots { word, .. } => assert_eq!(word, "a.b."),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reference_needs_both_parts() {
        for input in ["fk customer.", "fk .id", ".user {"] {
            let err = Lexer::new(input).tokenize().unwrap_err();
            assert!(
                matches!(err, LexError::EmptyReferencePart { .. }),
                "{input}: {err}"
            );
        }
        let err = Lexer::new("x\n  .user").tokenize().unwrap_err();
        assert!(matches!(
            err,
            LexError::EmptyReferencePart { line: 2, col: 3, .. }
        ));
    }

    #[test]
    fn test_punctuation_rejected() {
        let err = Lexer::new("user {\n  na$me string\n}").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnexpectedChar { ch: '$', line: 2, col: 5 }));
        assert!(Lexer::new("@user").tokenize().is_err());
        assert!(Lexer::new("x ]").tokenize().is_err());
    }

    #[test]
    fn test_lexer_stops_after_error() {
        let mut lexer = Lexer::new("a $ b");
        assert_eq!(lexer.next().unwrap().unwrap(), name("a"));
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
    }

    proptest! {
        #[test]
        fn keywords_ignore_case(idx in 0usize..KEYWORDS.len(), mask in any::<u8>()) {
            let (kw, expected) = &KEYWORDS[idx];
            let mixed: String = kw
                .chars()
                .enumerate()
                .map(|(i, c)| if mask & (1 << i) != 0 { c.to_ascii_uppercase() } else { c })
                .collect();
            let tokens = Lexer::new(&mixed).tokenize().unwrap();
            prop_assert_eq!(tokens, vec![expected.clone()]);
        }
    }
}

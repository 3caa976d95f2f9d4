//! Indented text writer shared by the SQL and C# generators.

use crate::config::GeneratorOptions;
use crate::error::Result;

pub struct CodeWriter {
    output: String,
    unit: String,
    /// Closing lines for the blocks currently open, innermost last.
    closers: Vec<&'static str>,
}

impl CodeWriter {
    pub fn new(options: &GeneratorOptions) -> Self {
        Self {
            output: String::new(),
            unit: options.indent_unit(),
            closers: Vec::new(),
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.closers.len() {
            self.output.push_str(&self.unit);
        }
    }

    pub fn line(&mut self, text: &str) {
        self.indent();
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Empty line without trailing indentation.
    pub fn blank(&mut self) {
        self.output.push('\n');
    }

    /// Writes a multi-line fragment, each line at the current indentation.
    /// `prefix` goes before the first line and `suffix` after the last.
    pub fn aligned(&mut self, prefix: &str, text: &str, suffix: &str) {
        let mut lines = text.lines().peekable();
        let mut first = true;
        while let Some(l) = lines.next() {
            self.indent();
            if first {
                self.output.push_str(prefix);
                first = false;
            }
            self.output.push_str(l);
            if lines.peek().is_none() {
                self.output.push_str(suffix);
            }
            self.output.push('\n');
        }
    }

    fn open(&mut self, header: &str, closer: &'static str) {
        self.line(header);
        self.line("{");
        self.closers.push(closer);
    }

    fn close(&mut self) {
        if let Some(closer) = self.closers.pop() {
            self.line(closer);
        }
    }

    /// `header`, then `{`, the body one level deeper, then `}`.
    /// The block is closed even if the body fails.
    pub fn block(&mut self, header: &str, body: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        self.open(header, "}");
        let result = body(self);
        self.close();
        result
    }

    /// Like [`CodeWriter::block`] but closed with `};`, for initializers.
    pub fn initializer(
        &mut self,
        header: &str,
        body: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.open(header, "};");
        let result = body(self);
        self.close();
        result
    }

    pub fn finish(mut self) -> String {
        while !self.closers.is_empty() {
            self.close();
        }
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, GrammarError};

    fn writer() -> CodeWriter {
        CodeWriter::new(&GeneratorOptions::default())
    }

    #[test]
    fn test_nested_blocks() {
        let mut w = writer();
        w.block("namespace App", |w| {
            w.block("class A", |w| {
                w.line("int x;");
                Ok(())
            })
        })
        .unwrap();
        assert_eq!(
            w.finish(),
            "namespace App\n{\n    class A\n    {\n        int x;\n    }\n}\n"
        );
    }

    #[test]
    fn test_block_closed_on_error() {
        let mut w = writer();
        let result = w.block("class A", |w| {
            w.line("int x;");
            Err(GrammarError::CloseOutsideTable.into())
        });
        assert!(matches!(result, Err(Error::Grammar(_))));
        w.line("after");
        assert_eq!(w.finish(), "class A\n{\n    int x;\n}\nafter\n");
    }

    #[test]
    fn test_initializer_and_aligned() {
        let mut w = writer();
        w.initializer("var x = new X", |w| {
            w.aligned("var sql = @\"", "SELECT a\nFROM t;", "\";");
            Ok(())
        })
        .unwrap();
        assert_eq!(
            w.finish(),
            "var x = new X\n{\n    var sql = @\"SELECT a\n    FROM t;\";\n};\n"
        );
    }

    #[test]
    fn test_tabs() {
        let options = GeneratorOptions {
            use_tabs: true,
            ..GeneratorOptions::default()
        };
        let mut w = CodeWriter::new(&options);
        w.block("a", |w| {
            w.blank();
            w.line("b");
            Ok(())
        })
        .unwrap();
        assert_eq!(w.finish(), "a\n{\n\n\tb\n}\n");
    }
}

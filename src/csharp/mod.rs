//! C# sources: a plain record class and an Npgsql repository per table.

mod record;
mod repository;

pub use record::GeneratedRecord;
pub use repository::GeneratedRepository;

use crate::ast::Column;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Prefixes `@` when `name` is a reserved word.
pub fn escape_identifier(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("@{}", name)
    } else {
        name.to_string()
    }
}

/// Locals and fields the repository methods refer to by name.
const REPOSITORY_LOCALS: &[&str] = &[
    "connection",
    "command",
    "reader",
    "result",
    "affected",
    "connectionString",
];

/// Method argument name. Keywords get `@`, names that would shadow a
/// repository local get a `Value` suffix.
pub fn argument_name(name: &str) -> String {
    if REPOSITORY_LOCALS.contains(&name) {
        format!("{}Value", name)
    } else {
        escape_identifier(name)
    }
}

/// Record property for `column`. A member may not share its class's name.
pub fn property_name(column: &Column, class_name: &str) -> String {
    if column.pascal_name() == class_name {
        format!("{}Value", class_name)
    } else {
        column.pascal_name().to_string()
    }
}

/// `Task` would clash with `System.Threading.Tasks.Task`, so that one class
/// is always written with its namespace.
pub fn qualified_class_name(class_name: &str, namespace: &str) -> String {
    if class_name == "Task" {
        format!("{}.{}", namespace, class_name)
    } else {
        class_name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ColumnSpec;
    use crate::types::DataType;

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("event"), "@event");
        assert_eq!(escape_identifier("class"), "@class");
        assert_eq!(escape_identifier("customer"), "customer");
        assert_eq!(escape_identifier("Event"), "Event");
    }

    #[test]
    fn test_argument_avoids_repository_locals() {
        assert_eq!(argument_name("command"), "commandValue");
        assert_eq!(argument_name("reader"), "readerValue");
        assert_eq!(argument_name("connectionString"), "connectionStringValue");
        assert_eq!(argument_name("event"), "@event");
        assert_eq!(argument_name("order"), "order");
    }

    #[test]
    fn test_property_avoids_class_name() {
        let note = Column::new(ColumnSpec::new("note", DataType::String)).unwrap();
        assert_eq!(property_name(&note, "Note"), "NoteValue");
        assert_eq!(property_name(&note, "Memo"), "Note");
    }

    #[test]
    fn test_task_is_qualified() {
        assert_eq!(qualified_class_name("Task", "Todo.Models"), "Todo.Models.Task");
        assert_eq!(qualified_class_name("Tasks", "Todo.Models"), "Tasks");
        assert_eq!(qualified_class_name("User", "Todo.Models"), "User");
    }
}

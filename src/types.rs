//! DSL type keywords and their SQL / C# counterparts.

use std::fmt;

/// A column data type from the fixed DSL catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Guid,
    String,
    DateTime,
    Bool,
    Short,
    Int,
    Long,
    Decimal,
    Float,
    Double,
    TimeSpan,
    Bytes,
}

/// Keyword table, matched case-insensitively. Several keywords may share a type.
const KEYWORDS: &[(&str, DataType)] = &[
    ("guid", DataType::Guid),
    ("string", DataType::String),
    ("datetime", DataType::DateTime),
    ("bool", DataType::Bool),
    ("short", DataType::Short),
    ("int", DataType::Int),
    ("long", DataType::Long),
    ("decimal", DataType::Decimal),
    ("float", DataType::Float),
    ("single", DataType::Float),
    ("double", DataType::Double),
    ("timespan", DataType::TimeSpan),
    ("bytes", DataType::Bytes),
    ("byte-array", DataType::Bytes),
];

impl DataType {
    /// Look up a DSL type keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(kw, _)| kw.eq_ignore_ascii_case(s))
            .map(|(_, typ)| *typ)
    }

    /// Canonical DSL keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Guid => "guid",
            Self::String => "string",
            Self::DateTime => "datetime",
            Self::Bool => "bool",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Double => "double",
            Self::TimeSpan => "timespan",
            Self::Bytes => "bytes",
        }
    }

    /// PostgreSQL column type.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Guid => "uuid",
            Self::String => "text",
            Self::DateTime => "timestamp",
            Self::Bool => "bool",
            Self::Short => "int2",
            Self::Int => "int4",
            Self::Long => "int8",
            Self::Decimal => "numeric",
            Self::Float => "float4",
            Self::Double => "float8",
            Self::TimeSpan => "interval",
            Self::Bytes => "bytea",
        }
    }

    /// C# type used for record fields and key parameters.
    pub fn host_type(self) -> &'static str {
        match self {
            Self::Guid => "Guid",
            Self::String => "string",
            Self::DateTime => "DateTime",
            Self::Bool => "bool",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Double => "double",
            Self::TimeSpan => "TimeSpan",
            Self::Bytes => "byte[]",
        }
    }

    /// Value types need `?` to become nullable; reference types already are.
    pub fn is_value_type(self) -> bool {
        !matches!(self, Self::String | Self::Bytes)
    }

    /// Host type widened for a nullable column.
    pub fn host_type_nullable(self, nullable: bool) -> String {
        if nullable && self.is_value_type() {
            format!("{}?", self.host_type())
        } else {
            self.host_type().to_string()
        }
    }

    /// `DbDataReader` accessor that reads this type.
    pub fn reader_method(self) -> &'static str {
        match self {
            Self::Guid => "GetGuid",
            Self::String => "GetString",
            Self::DateTime => "GetDateTime",
            Self::Bool => "GetBoolean",
            Self::Short => "GetInt16",
            Self::Int => "GetInt32",
            Self::Long => "GetInt64",
            Self::Decimal => "GetDecimal",
            Self::Float => "GetFloat",
            Self::Double => "GetDouble",
            Self::TimeSpan => "GetFieldValue<TimeSpan>",
            Self::Bytes => "GetFieldValue<byte[]>",
        }
    }

    /// Whether the C# type lives in the `System` namespace.
    pub fn needs_system_namespace(self) -> bool {
        matches!(self, Self::Guid | Self::DateTime | Self::TimeSpan)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

//! Bound values and their type tags.
//!
//! Every value that ends up in a [`QueryParameters`](crate::QueryParameters)
//! set is a [`SqlValue`]. The compiler never inspects foreign types: casting
//! and operator decisions are made on the closed [`ValueKind`] tag set.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A SQL value that can be bound as a parameter.
///
/// Serializes untagged, as the plain JSON the value denotes: arrays become
/// JSON arrays, UUIDs and timestamps become strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// UUID value.
    Uuid(Uuid),
    /// Timestamp with time zone, normalized to UTC.
    Timestamp(DateTime<Utc>),
    /// Structured document stored in a JSON column.
    Json(serde_json::Value),
    /// Homogeneous array, bound natively by the driver.
    Array(Vec<SqlValue>),
}

/// The type tag of a [`SqlValue`] or of an entity property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    Uuid,
    Timestamp,
    Json,
    Array,
    /// A property type with no specific tag; the driver infers it.
    Unknown,
}

impl ValueKind {
    /// Returns true for kinds that the containment operator applies to.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json | Self::Array)
    }
}

impl SqlValue {
    /// Returns the type tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Uuid(_) => ValueKind::Uuid,
            Self::Timestamp(_) => ValueKind::Timestamp,
            Self::Json(_) => ValueKind::Json,
            Self::Array(_) => ValueKind::Array,
        }
    }

    /// Returns true if this is the language-level null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts an array into the JSON document it denotes, so it can be
    /// bound against a jsonb column. Other values are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if an element has no JSON representation.
    pub fn into_json_document(self) -> Result<Self> {
        match self {
            Self::Array(_) => serde_json::to_value(&self)
                .map(Self::Json)
                .map_err(|e| Error::Encoding(e.to_string())),
            other => Ok(other),
        }
    }

    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: the statement builder never inlines values; this exists
    /// for diagnostics and for evaluating compiled predicates in tests.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => quote_literal(s),
            Self::Uuid(u) => quote_literal(&u.to_string()),
            Self::Timestamp(t) => quote_literal(&t.to_rfc3339()),
            Self::Json(j) => quote_literal(&j.to_string()),
            Self::Array(items) => {
                let items: Vec<String> = items.iter().map(Self::to_sql_inline).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }
}

fn quote_literal(s: &str) -> String {
    // Escape single quotes by doubling them
    let escaped = s.replace('\'', "''");
    format!("'{escaped}'")
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

/// Compile-time type tag of a Rust type, used by `#[derive(Entity)]`.
pub trait SqlType {
    /// The tag recorded for properties of this type.
    const KIND: ValueKind;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl SqlType for SqlValue {
    const KIND: ValueKind = ValueKind::Unknown;
}

macro_rules! impl_scalar {
    ($kind:ident, $variant:ident, $($ty:ty),+) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::$variant(self.into())
                }
            }

            impl SqlType for $ty {
                const KIND: ValueKind = ValueKind::$kind;
            }
        )+
    };
}

impl_scalar!(Bool, Bool, bool);
impl_scalar!(Int, Int, i64, i32, i16, i8, u32, u16, u8);
impl_scalar!(Float, Float, f64, f32);
impl_scalar!(Text, Text, String);
impl_scalar!(Uuid, Uuid, Uuid);
impl_scalar!(Timestamp, Timestamp, DateTime<Utc>);
impl_scalar!(Json, Json, serde_json::Value);

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl SqlType for &str {
    const KIND: ValueKind = ValueKind::Text;
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl<T: SqlType> SqlType for Option<T> {
    const KIND: ValueKind = T::KIND;
}

impl<T: ToSqlValue> ToSqlValue for Vec<T> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Array(self.into_iter().map(ToSqlValue::to_sql_value).collect())
    }
}

impl<T: SqlType> SqlType for Vec<T> {
    const KIND: ValueKind = ValueKind::Array;
}

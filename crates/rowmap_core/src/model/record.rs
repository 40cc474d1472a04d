//! Record capability trait and declaration macro.
//!
//! # Responsibility
//! - Give the mapper typed, by-name access to record attributes.
//! - Convert between Rust field types and SQLite values.
//!
//! # Invariants
//! - `Record::shape()` lists every attribute reachable through `get`/`set`.
//! - `set` never coerces silently; conversions follow `rusqlite`'s `FromSql`.

use crate::db::DbError;
use crate::mapper::{MapperError, MapperResult};
use crate::model::shape::{AttributeType, RecordShape};
use rusqlite::types::{FromSql, FromSqlResult, ValueRef};

pub use rusqlite::types::Value;

/// A Rust type that can back a record attribute.
pub trait FieldValue: Sized {
    /// Declared attribute type reported in the record shape.
    const ATTRIBUTE_TYPE: AttributeType;

    fn to_value(&self) -> Value;
    fn from_value(value: &Value) -> FromSqlResult<Self>;
}

macro_rules! impl_field_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const ATTRIBUTE_TYPE: AttributeType = AttributeType::$kind;

                fn to_value(&self) -> Value {
                    Value::from(<$ty>::clone(self))
                }

                fn from_value(value: &Value) -> FromSqlResult<Self> {
                    <$ty as FromSql>::column_result(ValueRef::from(value))
                }
            }
        )*
    };
}

impl_field_value! {
    i32 => Integer,
    i64 => Long,
    String => Text,
    f64 => Real,
    bool => Boolean,
    Vec<u8> => Blob,
}

/// Static capability a type needs to be mapped onto a table.
///
/// Usually generated by [`define_record!`](crate::define_record); a manual
/// implementation must keep `shape()`, `get` and `set` in agreement.
pub trait Record: Sized {
    /// Ordered attribute list of this record type.
    fn shape() -> RecordShape;

    /// Creates an empty instance to hydrate from a result row.
    ///
    /// # Errors
    /// - Returns `MapperError::Instantiation` when no instance can be built.
    fn instantiate() -> MapperResult<Self>;

    /// Reads the current value of `attribute`, or `None` for unknown names.
    fn get(&self, attribute: &str) -> Option<Value>;

    /// Writes `value` into `attribute`.
    ///
    /// # Errors
    /// - Returns `MapperError::AttributeNotFound` for unknown names.
    /// - Returns `MapperError::Database` when the value cannot be converted to
    ///   the attribute's Rust type.
    fn set(&mut self, attribute: &str, value: Value) -> MapperResult<()>;
}

/// Converts a raw SQLite value into a field type, tagging failures with the
/// attribute name.
pub fn decode_attribute<T: FieldValue>(attribute: &str, value: &Value) -> MapperResult<T> {
    T::from_value(value).map_err(|source| {
        MapperError::Database(DbError::Conversion {
            attribute: attribute.to_string(),
            source,
        })
    })
}

/// Declares a struct and implements [`Record`] for it.
///
/// The generated struct derives `Default`, which backs `instantiate()`.
/// Exactly one field should carry `#[primary_key]`, and its type must be
/// `i32` or `i64`. Fields accept doc comments and `#[primary_key]` in any
/// order; other field attributes are not supported.
///
/// ```
/// rowmap_core::define_record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Person {
///         /// Assigned on insert.
///         #[primary_key]
///         pub id: i32,
///         pub name: String,
///         /// Whole years.
///         pub age: i32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_record {
    (@primary_key) => {
        false
    };
    (@primary_key primary_key $($rest:ident)*) => {
        true
    };
    (@primary_key $other:ident $($rest:ident)*) => {
        $crate::define_record!(@primary_key $($rest)*)
    };
    (@field_doc doc $text:literal) => {
        $text
    };
    (@field_doc primary_key) => {
        "Primary key."
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$attr:ident $(= $attr_value:literal)?])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Default)]
        $vis struct $name {
            $(
                $(#[doc = $crate::define_record!(@field_doc $attr $($attr_value)?)])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::model::record::Record for $name {
            fn shape() -> $crate::model::shape::RecordShape {
                const ATTRIBUTES: &[$crate::model::shape::AttributeDescriptor] = &[
                    $(
                        $crate::model::shape::AttributeDescriptor::new(
                            stringify!($field),
                            <$ty as $crate::model::record::FieldValue>::ATTRIBUTE_TYPE,
                            $crate::define_record!(@primary_key $($attr)*),
                        ),
                    )*
                ];
                $crate::model::shape::RecordShape::new(stringify!($name), ATTRIBUTES)
            }

            fn instantiate() -> $crate::mapper::MapperResult<Self> {
                Ok(<Self as Default>::default())
            }

            fn get(&self, attribute: &str) -> Option<$crate::model::record::Value> {
                match attribute {
                    $(
                        stringify!($field) => Some(
                            $crate::model::record::FieldValue::to_value(&self.$field),
                        ),
                    )*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn set(
                &mut self,
                attribute: &str,
                value: $crate::model::record::Value,
            ) -> $crate::mapper::MapperResult<()> {
                match attribute {
                    $(
                        stringify!($field) => {
                            self.$field = $crate::model::record::decode_attribute(attribute, &value)?;
                            Ok(())
                        }
                    )*
                    other => Err($crate::mapper::MapperError::AttributeNotFound {
                        record: stringify!($name),
                        attribute: other.to_string(),
                    }),
                }
            }
        }
    };
}

//! Record shape and attribute descriptors.
//!
//! # Responsibility
//! - Describe one record type as an ordered list of named, typed attributes.
//! - Translate attribute types into SQLite column declarations.
//!
//! # Invariants
//! - Descriptors are `'static`; a shape is cheap to re-derive on every call.
//! - Only `Integer`, `Long` and `Text` have a column mapping.

use crate::mapper::{MapperError, MapperResult};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Declared type of a record attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// UTF-8 text.
    Text,
    /// 64-bit float. Declarable, but has no column mapping.
    Real,
    /// Boolean flag. Declarable, but has no column mapping.
    Boolean,
    /// Raw bytes. Declarable, but has no column mapping.
    Blob,
}

impl AttributeType {
    /// Returns the column type used in `CREATE TABLE`, or `None` when the
    /// attribute type cannot be stored as a column.
    pub fn column_type(self) -> Option<&'static str> {
        match self {
            Self::Integer => Some("INT"),
            Self::Long => Some("BIGINT"),
            Self::Text => Some("VARCHAR(100)"),
            Self::Real | Self::Boolean | Self::Blob => None,
        }
    }

    /// Whether a generated integer key can be stored in this type.
    pub fn is_key_type(self) -> bool {
        matches!(self, Self::Integer | Self::Long)
    }
}

impl Display for AttributeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Text => "text",
            Self::Real => "real",
            Self::Boolean => "boolean",
            Self::Blob => "blob",
        };
        f.write_str(name)
    }
}

/// One named, typed slot of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeDescriptor {
    /// Attribute name, used verbatim as the column name.
    pub name: &'static str,
    pub attribute_type: AttributeType,
    /// Marks the identity column.
    pub is_primary_key: bool,
}

impl AttributeDescriptor {
    pub const fn new(name: &'static str, attribute_type: AttributeType, is_primary_key: bool) -> Self {
        Self {
            name,
            attribute_type,
            is_primary_key,
        }
    }

    /// Returns the mapped column type.
    ///
    /// # Errors
    /// - Returns `MapperError::UnsupportedAttributeType` for unmapped types.
    pub fn column_type(&self) -> MapperResult<&'static str> {
        self.attribute_type
            .column_type()
            .ok_or(MapperError::UnsupportedAttributeType {
                attribute: self.name,
                attribute_type: self.attribute_type,
            })
    }

    /// Checks that this attribute can hold a generated integer key.
    ///
    /// # Errors
    /// - Returns `MapperError::UnsupportedAttributeType` unless the type is
    ///   `Integer` or `Long`.
    pub fn ensure_key_type(&self) -> MapperResult<()> {
        if self.attribute_type.is_key_type() {
            return Ok(());
        }
        Err(MapperError::UnsupportedAttributeType {
            attribute: self.name,
            attribute_type: self.attribute_type,
        })
    }
}

/// Ordered attribute list of one record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordShape {
    /// Record type name, used in error messages.
    pub record: &'static str,
    pub attributes: &'static [AttributeDescriptor],
}

impl RecordShape {
    pub const fn new(record: &'static str, attributes: &'static [AttributeDescriptor]) -> Self {
        Self { record, attributes }
    }

    pub fn attributes(&self) -> &'static [AttributeDescriptor] {
        self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&'static AttributeDescriptor> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Returns the single attribute flagged as primary key.
    ///
    /// # Errors
    /// - Returns `MapperError::NoPrimaryKeyDefined` when no attribute is flagged.
    /// - Returns `MapperError::DuplicatePrimaryKey` when more than one is.
    pub fn primary_key(&self) -> MapperResult<&'static AttributeDescriptor> {
        let mut flagged = self.attributes.iter().filter(|attr| attr.is_primary_key);
        let first = flagged.next().ok_or(MapperError::NoPrimaryKeyDefined {
            record: self.record,
        })?;
        if let Some(second) = flagged.next() {
            return Err(MapperError::DuplicatePrimaryKey {
                record: self.record,
                first: first.name,
                second: second.name,
            });
        }
        Ok(first)
    }

    /// Non-key attributes in declaration order.
    pub fn value_attributes(&self) -> impl Iterator<Item = &'static AttributeDescriptor> {
        self.attributes.iter().filter(|attr| !attr.is_primary_key)
    }
}

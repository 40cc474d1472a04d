//! SQL text builders for record mapping.
//!
//! Identifiers (table and attribute names) are interpolated as-is; values are
//! represented by numbered placeholders and bound by the caller in the order
//! documented on each builder.

use crate::mapper::MapperResult;
use crate::model::shape::RecordShape;

/// Builds `CREATE TABLE` with the primary key first, then every non-key
/// attribute in declaration order.
///
/// # Errors
/// - `NoPrimaryKeyDefined` / `DuplicatePrimaryKey` unless exactly one
///   attribute is the key.
/// - `UnsupportedAttributeType` for a key that is not `Integer`/`Long`, or any
///   non-key attribute without a mapping.
pub fn create_table_sql(table: &str, shape: &RecordShape) -> MapperResult<String> {
    let primary_key = shape.primary_key()?;
    primary_key.ensure_key_type()?;
    let mut columns = vec![format!(
        "{} INTEGER PRIMARY KEY AUTOINCREMENT",
        primary_key.name
    )];
    for attr in shape.value_attributes() {
        columns.push(format!("{} {}", attr.name, attr.column_type()?));
    }

    Ok(format!("CREATE TABLE {table}({})", columns.join(", ")))
}

/// Builds an `INSERT` returning the generated key.
///
/// Binds: non-key attribute values in declaration order.
///
/// # Errors
/// - `UnsupportedAttributeType` when the key cannot hold the generated value.
pub fn insert_sql(table: &str, shape: &RecordShape) -> MapperResult<String> {
    let primary_key = shape.primary_key()?;
    primary_key.ensure_key_type()?;
    let names = shape
        .value_attributes()
        .map(|attr| attr.name)
        .collect::<Vec<_>>();

    if names.is_empty() {
        return Ok(format!(
            "INSERT INTO {table} DEFAULT VALUES RETURNING {}",
            primary_key.name
        ));
    }

    Ok(format!(
        "INSERT INTO {table}({}) VALUES({}) RETURNING {}",
        names.join(", "),
        placeholders(1, names.len()).join(", "),
        primary_key.name
    ))
}

/// Builds an `UPDATE` keyed by the primary key, or `None` when the shape has
/// nothing but the key to write.
///
/// Binds: non-key attribute values in declaration order, then the key value.
pub fn update_sql(table: &str, shape: &RecordShape) -> MapperResult<Option<String>> {
    let primary_key = shape.primary_key()?;
    let names = shape
        .value_attributes()
        .map(|attr| attr.name)
        .collect::<Vec<_>>();

    if names.is_empty() {
        return Ok(None);
    }

    let assignments = names
        .iter()
        .zip(placeholders(1, names.len()))
        .map(|(name, placeholder)| format!("{name} = {placeholder}"))
        .collect::<Vec<_>>();

    Ok(Some(format!(
        "UPDATE {table} SET {} WHERE {} = ?{}",
        assignments.join(", "),
        primary_key.name,
        names.len() + 1
    )))
}

/// Builds a `DELETE` keyed by the primary key.
///
/// Binds: the key value.
pub fn delete_sql(table: &str, shape: &RecordShape) -> MapperResult<String> {
    let primary_key = shape.primary_key()?;
    Ok(format!("DELETE FROM {table} WHERE {} = ?1", primary_key.name))
}

/// Builds `SELECT *`, or a projection over `columns` in the given order.
pub fn select_sql(table: &str, columns: &[&str]) -> String {
    if columns.is_empty() {
        format!("SELECT * FROM {table}")
    } else {
        format!("SELECT {} FROM {table}", columns.join(", "))
    }
}

fn placeholders(first: usize, count: usize) -> Vec<String> {
    (first..first + count).map(|index| format!("?{index}")).collect()
}

#[cfg(test)]
mod tests {
    use super::{create_table_sql, delete_sql, insert_sql, select_sql, update_sql};
    use crate::mapper::MapperError;
    use crate::model::shape::{AttributeDescriptor, AttributeType, RecordShape};

    const PERSON: RecordShape = RecordShape {
        record: "Person",
        attributes: &[
            AttributeDescriptor::new("name", AttributeType::Text, false),
            AttributeDescriptor::new("id", AttributeType::Integer, true),
            AttributeDescriptor::new("age", AttributeType::Integer, false),
            AttributeDescriptor::new("visits", AttributeType::Long, false),
        ],
    };

    const KEY_ONLY: RecordShape = RecordShape {
        record: "Ticket",
        attributes: &[AttributeDescriptor::new("id", AttributeType::Integer, true)],
    };

    const KEYLESS: RecordShape = RecordShape {
        record: "Keyless",
        attributes: &[AttributeDescriptor::new("name", AttributeType::Text, false)],
    };

    #[test]
    fn create_table_puts_primary_key_first() {
        assert_eq!(
            create_table_sql("people", &PERSON).unwrap(),
            "CREATE TABLE people(id INTEGER PRIMARY KEY AUTOINCREMENT, name VARCHAR(100), age INT, visits BIGINT)"
        );
        assert_eq!(
            create_table_sql("tickets", &KEY_ONLY).unwrap(),
            "CREATE TABLE tickets(id INTEGER PRIMARY KEY AUTOINCREMENT)"
        );
    }

    #[test]
    fn create_table_rejects_unmapped_type() {
        const SCORED: RecordShape = RecordShape {
            record: "Scored",
            attributes: &[
                AttributeDescriptor::new("id", AttributeType::Integer, true),
                AttributeDescriptor::new("score", AttributeType::Real, false),
            ],
        };
        let err = create_table_sql("scores", &SCORED).unwrap_err();
        assert!(matches!(
            err,
            MapperError::UnsupportedAttributeType {
                attribute: "score",
                ..
            }
        ));
    }

    #[test]
    fn non_integer_primary_key_is_rejected_for_create_and_insert() {
        const TEXT_KEY: RecordShape = RecordShape {
            record: "Tag",
            attributes: &[
                AttributeDescriptor::new("slug", AttributeType::Text, true),
                AttributeDescriptor::new("label", AttributeType::Text, false),
            ],
        };
        for result in [
            create_table_sql("tags", &TEXT_KEY),
            insert_sql("tags", &TEXT_KEY),
        ] {
            assert!(matches!(
                result,
                Err(MapperError::UnsupportedAttributeType {
                    attribute: "slug",
                    attribute_type: AttributeType::Text,
                })
            ));
        }
    }

    #[test]
    fn long_primary_key_is_accepted() {
        const LONG_KEY: RecordShape = RecordShape {
            record: "Event",
            attributes: &[
                AttributeDescriptor::new("id", AttributeType::Long, true),
                AttributeDescriptor::new("name", AttributeType::Text, false),
            ],
        };
        assert_eq!(
            create_table_sql("events", &LONG_KEY).unwrap(),
            "CREATE TABLE events(id INTEGER PRIMARY KEY AUTOINCREMENT, name VARCHAR(100))"
        );
    }

    #[test]
    fn insert_skips_primary_key_and_returns_it() {
        assert_eq!(
            insert_sql("people", &PERSON).unwrap(),
            "INSERT INTO people(name, age, visits) VALUES(?1, ?2, ?3) RETURNING id"
        );
        assert_eq!(
            insert_sql("tickets", &KEY_ONLY).unwrap(),
            "INSERT INTO tickets DEFAULT VALUES RETURNING id"
        );
    }

    #[test]
    fn update_binds_key_last() {
        assert_eq!(
            update_sql("people", &PERSON).unwrap().as_deref(),
            Some("UPDATE people SET name = ?1, age = ?2, visits = ?3 WHERE id = ?4")
        );
        assert_eq!(update_sql("tickets", &KEY_ONLY).unwrap(), None);
    }

    #[test]
    fn delete_is_keyed_by_primary_key() {
        assert_eq!(
            delete_sql("people", &PERSON).unwrap(),
            "DELETE FROM people WHERE id = ?1"
        );
    }

    #[test]
    fn select_projects_requested_columns() {
        assert_eq!(select_sql("people", &[]), "SELECT * FROM people");
        assert_eq!(
            select_sql("people", &["name", "age"]),
            "SELECT name, age FROM people"
        );
    }

    #[test]
    fn every_keyed_builder_rejects_missing_primary_key() {
        for result in [
            create_table_sql("t", &KEYLESS),
            insert_sql("t", &KEYLESS),
            update_sql("t", &KEYLESS).map(|sql| sql.unwrap_or_default()),
            delete_sql("t", &KEYLESS),
        ] {
            assert!(matches!(
                result,
                Err(MapperError::NoPrimaryKeyDefined { record: "Keyless" })
            ));
        }
    }
}

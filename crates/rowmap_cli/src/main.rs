//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise every mapper operation against an in-memory database.
//! - Print the record shape and resulting rows as deterministic JSON.

use rowmap_core::{open_db_in_memory, Record, RecordRepository, SqliteRecordMapper, Value};
use serde_json::{json, Map};
use std::error::Error;
use std::process::ExitCode;

rowmap_core::define_record! {
    #[derive(Debug, Clone)]
    struct Person {
        #[primary_key]
        id: i32,
        name: String,
        age: i32,
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rowmap_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("rowmap_core version={}", rowmap_core::core_version());

    let conn = open_db_in_memory()?;
    let mapper = SqliteRecordMapper::<Person>::new(&conn, "people");
    mapper.create_table()?;

    let mut ada = Person {
        id: 0,
        name: "ada".to_string(),
        age: 36,
    };
    let mut alan = Person {
        id: 0,
        name: "alan".to_string(),
        age: 41,
    };
    mapper.insert(&mut ada)?;
    mapper.insert(&mut alan)?;

    ada.age += 1;
    mapper.update(&ada)?;
    mapper.delete(&alan)?;

    let rows = mapper
        .select_all(&[])?
        .iter()
        .map(record_json)
        .collect::<Vec<_>>();

    let report = json!({
        "shape": Person::shape(),
        "table": mapper.table(),
        "rows": rows,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn record_json<R: Record>(record: &R) -> serde_json::Value {
    let mut object = Map::new();
    for attr in R::shape().attributes() {
        let value = match record.get(attr.name) {
            Some(Value::Integer(number)) => json!(number),
            Some(Value::Real(number)) => json!(number),
            Some(Value::Text(text)) => json!(text),
            Some(Value::Blob(bytes)) => json!(bytes),
            Some(Value::Null) | None => serde_json::Value::Null,
        };
        object.insert(attr.name.to_string(), value);
    }
    serde_json::Value::Object(object)
}

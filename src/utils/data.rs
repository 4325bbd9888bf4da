use crate::core::table::{Record, Table};
use serde_json::Value;

/// Fields lifted out of a data source's `connectionDetails`
pub const CONNECTION_FIELDS: [&str; 5] = ["server", "database", "connectionString", "url", "path"];

/// Extract connection details from a `connectionDetails` cell
///
/// The service normally sends an object; some payloads carry it as a JSON
/// encoded string. Anything else yields all-null fields.
pub fn extract_connection_details(value: Option<&Value>) -> Vec<(&'static str, Value)> {
    let parsed = match value {
        Some(Value::Object(details)) => Some(details.clone()),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(details)) => Some(details),
            Ok(_) => None,
            Err(e) => {
                log::debug!("Error parsing connectionDetails: {}", e);
                None
            }
        },
        _ => None,
    };

    CONNECTION_FIELDS
        .iter()
        .map(|field| {
            let value = parsed
                .as_ref()
                .and_then(|details| details.get(*field))
                .cloned()
                .unwrap_or(Value::Null);
            (*field, value)
        })
        .collect()
}

/// Add the flattened connection columns to every row of a data source listing
pub fn flatten_connection_details(table: Table) -> Table {
    if table.is_empty() {
        return table;
    }

    let records: Vec<Record> = table
        .into_records()
        .into_iter()
        .map(|mut record| {
            for (field, value) in extract_connection_details(record.get("connectionDetails")) {
                record.insert(field.to_string(), value);
            }
            record
        })
        .collect();

    Table::from_records(records)
}

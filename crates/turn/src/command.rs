//! Command record serialization.
//!
//! The upload format is text: one record per entity,
//! `Kind<id>=key1:::value1|||key2:::value2|||...`, collected into a single
//! JSON document with one `commands` section. Every field the entity
//! carries is serialized, including pass-through fields the core never
//! interpreted; the server rejects turns with fields missing.

use serde::Serialize;
use serde_json::Value;

/// One serialized entity command.
#[derive(Debug, Clone)]
pub struct CommandRecord {
    kind: &'static str,
    id: i64,
    fields: Vec<(String, String)>,
}

impl CommandRecord {
    /// Empty command for one entity.
    pub fn new(kind: &'static str, id: i64) -> Self {
        Self {
            kind,
            id,
            fields: Vec::new(),
        }
    }

    /// Build a command from a serialized entity, taking every field of the
    /// JSON object in order.
    pub fn from_entity(kind: &'static str, id: i64, entity: &Value) -> Self {
        let mut record = Self::new(kind, id);
        if let Value::Object(map) = entity {
            for (key, value) in map {
                record.push(key, render_value(value));
            }
        }
        record
    }

    /// Append one field.
    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.fields.push((key.to_string(), value.into()));
    }

    /// Render to the wire form.
    pub fn serialize(&self) -> String {
        let body: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| format!("{key}:::{value}"))
            .collect();
        format!("{}{}={}", self.kind, self.id, body.join("|||"))
    }
}

/// Render one JSON value the way the server expects it in a command field.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The upload document: one `commands` section.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TurnDocument {
    /// Serialized command records, in emission order.
    pub commands: Vec<String>,
}

impl TurnDocument {
    /// Append one command.
    pub fn push(&mut self, record: &CommandRecord) {
        self.commands.push(record.serialize());
    }

    /// Serialize the whole document to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("command document serialization")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_serialize_with_the_field_separators() {
        let mut record = CommandRecord::new("Ship", 42);
        record.push("friendlycode", "abc");
        record.push("warp", "9");
        assert_eq!(record.serialize(), "Ship42=friendlycode:::abc|||warp:::9");
    }

    #[test]
    fn entities_serialize_every_field() {
        let entity = json!({"amount": 3, "flag": true, "note": null, "name": "Dock"});
        let record = CommandRecord::from_entity("Stock", 7, &entity);
        let wire = record.serialize();
        assert!(wire.starts_with("Stock7="));
        assert!(wire.contains("amount:::3"));
        assert!(wire.contains("flag:::true"));
        assert!(wire.contains("note:::"));
        assert!(wire.contains("name:::Dock"));
    }

    #[test]
    fn document_has_one_commands_section() {
        let mut document = TurnDocument::default();
        document.push(&CommandRecord::new("Planet", 10));
        let json: Value = serde_json::from_str(&document.to_json()).unwrap();
        assert_eq!(json["commands"], json!(["Planet10="]));
    }
}

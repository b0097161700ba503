//! Immutable in-memory collections and human identifier lookup.

use std::collections::HashMap;

use query_core::value::coerce_number;
use query_core::Record;

const NAME: &str = "name";
const NAMESPACED_ID: &str = "namespacedId";

/// How a caller-supplied identifier is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    /// 1-based position in the collection.
    Position(usize),
    NamespacedId(&'a str),
    Name(&'a str),
}

impl<'a> Identifier<'a> {
    /// Anything that reads as a number is a position, an all-lowercase string
    /// is a namespaced id, anything else is a display name.
    pub fn parse(raw: &'a str) -> Self {
        if let Some(n) = coerce_number(raw) {
            // Fractional or non-positive numbers name no position.
            let position = if n.fract() == 0.0 && n >= 1.0 { n as usize } else { 0 };
            return Identifier::Position(position);
        }
        if raw.chars().any(char::is_uppercase) {
            Identifier::Name(raw)
        } else {
            Identifier::NamespacedId(raw)
        }
    }
}

/// A loaded collection with lookup indexes. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    records: Vec<Record>,
    by_namespaced_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl Collection {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        let mut by_namespaced_id = HashMap::new();
        let mut by_name = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            if let Some(id) = record.get(NAMESPACED_ID).and_then(|v| v.as_str()) {
                by_namespaced_id.entry(id.to_string()).or_insert(i);
            }
            if let Some(name) = record.get(NAME).and_then(|v| v.as_str()) {
                by_name.entry(name.to_string()).or_insert(i);
            }
        }
        Self {
            name: name.into(),
            records,
            by_namespaced_id,
            by_name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn at_position(&self, position: usize) -> Option<&Record> {
        position.checked_sub(1).and_then(|i| self.records.get(i))
    }

    pub fn find(&self, id: Identifier<'_>) -> Option<&Record> {
        match id {
            Identifier::Position(p) => self.at_position(p),
            Identifier::NamespacedId(s) => self.by_namespaced_id.get(s).map(|&i| &self.records[i]),
            Identifier::Name(s) => self.by_name.get(s).map(|&i| &self.records[i]),
        }
    }

    /// Resolve a raw human identifier.
    pub fn lookup(&self, raw: &str) -> Option<&Record> {
        self.find(Identifier::parse(raw))
    }
}

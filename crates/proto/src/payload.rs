// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured payload decoding.
//!
//! `OK <bytes>` responses carry a YAML subset: a `---` document marker
//! followed by either `- element` lines (sequence) or `key: value`
//! lines (mapping). Values that look numeric are left as strings;
//! coercion happens only when the caller asks for it.

use indexmap::IndexMap;
use serde::Serialize;

use crate::ProtocolError;

/// Decode a sequence payload into its elements, in order.
///
/// Lines that are not sequence elements (the document marker, blank
/// lines) are skipped. An empty body decodes to an empty vec.
pub fn parse_list(body: &[u8]) -> Result<Vec<String>, ProtocolError> {
    let text = as_utf8(body)?;
    Ok(text
        .lines()
        .filter_map(|line| line.strip_prefix("- "))
        .map(|element| element.to_string())
        .collect())
}

/// Decode a mapping payload into an insertion-ordered [`Stats`] map.
///
/// Lines without a `key: value` shape are skipped. An empty body
/// decodes to an empty mapping.
pub fn parse_mapping(body: &[u8]) -> Result<Stats, ProtocolError> {
    let text = as_utf8(body)?;
    let mut entries = IndexMap::new();
    for line in text.lines() {
        if line.starts_with("---") {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            entries.insert(key.to_string(), value.trim().to_string());
        }
    }
    Ok(Stats(entries))
}

fn as_utf8(body: &[u8]) -> Result<&str, ProtocolError> {
    std::str::from_utf8(body)
        .map_err(|e| ProtocolError::Payload(format!("payload is not UTF-8: {e}")))
}

/// A string-keyed statistics mapping in server emission order.
///
/// Leaf values stay strings; `get_u64`/`get_i64`/`get_f64` coerce on
/// demand and return None when the value does not parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Stats(IndexMap<String, String>);

impl Stats {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key)?.parse().ok()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.parse().ok()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.parse().ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.0
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;

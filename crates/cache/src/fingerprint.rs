// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Statement fingerprints (cache keys)
//!
//! A fingerprint is the SHA-256 digest of the dialect id, the SQL text and
//! every parameter, each written as a length-prefixed field so adjacent
//! fields can never run into each other. Parameters are tagged with their
//! type before their bytes, so `Integer(1)`, `String("1")` and `Json(1)` hash
//! differently.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use unified_sql_query_compiler::CompiledStatement;
use unified_sql_query_ir::{Dialect, Value};

/// Hex-encoded SHA-256 cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Digest of (dialect, sql, params)
    pub fn new(dialect: Dialect, sql: &str, params: &[Value]) -> Self {
        let mut hasher = Sha256::new();
        write_field(&mut hasher, dialect.as_str().as_bytes());
        write_field(&mut hasher, sql.as_bytes());

        hasher.update((params.len() as u64).to_be_bytes());
        for param in params {
            write_field(&mut hasher, param.type_name().as_bytes());
            write_value(&mut hasher, param);
        }

        Self(hex::encode(hasher.finalize()))
    }

    pub fn of(dialect: Dialect, statement: &CompiledStatement) -> Self {
        Self::new(dialect, &statement.sql, &statement.params)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn write_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

fn write_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => write_field(hasher, &[]),
        Value::Boolean(b) => write_field(hasher, &[u8::from(*b)]),
        Value::Integer(i) => write_field(hasher, &i.to_be_bytes()),
        Value::Float(f) => write_field(hasher, &f.to_bits().to_be_bytes()),
        Value::String(s) => write_field(hasher, s.as_bytes()),
        Value::Bytes(b) => write_field(hasher, b),
        Value::Json(json) => write_field(hasher, json.to_string().as_bytes()),
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

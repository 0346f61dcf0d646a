// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    database_error::DatabaseError,
    structure::storage_value::{DATE_TIME_FORMAT, StorageValue},
};

use super::MemberPath;

/// Storage type of an indexed or unique member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool,
    Int,
    Float,
    String,
    Guid,
    DateTime,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Guid => "guid",
            DataType::DateTime => "datetime",
        }
    }

    /// Convert a (non-null) member value of a serialized document into its storage form.
    pub fn convert(&self, path: &MemberPath, value: &Value) -> Result<StorageValue, DatabaseError> {
        let converted = match (self, value) {
            (DataType::Bool, Value::Bool(v)) => Some(StorageValue::Bool(*v)),
            (DataType::Int, Value::Number(v)) => v.as_i64().map(StorageValue::Int),
            (DataType::Float, Value::Number(v)) => v.as_f64().map(StorageValue::Float),
            (DataType::String, Value::String(v)) => Some(StorageValue::String(v.clone())),
            (DataType::Guid, Value::String(v)) => Uuid::parse_str(v).ok().map(StorageValue::Guid),
            (DataType::DateTime, Value::String(v)) => parse_date_time(v).map(StorageValue::DateTime),
            _ => None,
        };

        converted.ok_or_else(|| DatabaseError::InvalidValue {
            path: path.to_string(),
            expected: self.name().to_string(),
        })
    }
}

fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT))
        .ok()
}

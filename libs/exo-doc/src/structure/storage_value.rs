// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::schema::DataType;

pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A typed value as handed to the backend, either as a column value in a bulk row or as a query
/// parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Guid(Uuid),
    DateTime(NaiveDateTime),
}

impl StorageValue {
    /// `None` for null, which has no storage type of its own
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            StorageValue::Null => None,
            StorageValue::Bool(_) => Some(DataType::Bool),
            StorageValue::Int(_) => Some(DataType::Int),
            StorageValue::Float(_) => Some(DataType::Float),
            StorageValue::String(_) => Some(DataType::String),
            StorageValue::Guid(_) => Some(DataType::Guid),
            StorageValue::DateTime(_) => Some(DataType::DateTime),
        }
    }

    /// Stable textual form, used for unique values and their hashes.
    pub fn to_canonical_string(&self) -> String {
        match self {
            StorageValue::Null => "null".to_string(),
            StorageValue::Bool(v) => v.to_string(),
            StorageValue::Int(v) => v.to_string(),
            StorageValue::Float(v) => v.to_string(),
            StorageValue::String(v) => v.clone(),
            StorageValue::Guid(v) => v.hyphenated().to_string(),
            StorageValue::DateTime(v) => v.format(DATE_TIME_FORMAT).to_string(),
        }
    }
}

impl Display for StorageValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageValue::String(v) => write!(f, "'{v}'"),
            other => f.write_str(&other.to_canonical_string()),
        }
    }
}

impl From<bool> for StorageValue {
    fn from(value: bool) -> Self {
        StorageValue::Bool(value)
    }
}

impl From<i32> for StorageValue {
    fn from(value: i32) -> Self {
        StorageValue::Int(value.into())
    }
}

impl From<i64> for StorageValue {
    fn from(value: i64) -> Self {
        StorageValue::Int(value)
    }
}

impl From<f64> for StorageValue {
    fn from(value: f64) -> Self {
        StorageValue::Float(value)
    }
}

impl From<&str> for StorageValue {
    fn from(value: &str) -> Self {
        StorageValue::String(value.to_string())
    }
}

impl From<String> for StorageValue {
    fn from(value: String) -> Self {
        StorageValue::String(value)
    }
}

impl From<Uuid> for StorageValue {
    fn from(value: Uuid) -> Self {
        StorageValue::Guid(value)
    }
}

impl From<NaiveDateTime> for StorageValue {
    fn from(value: NaiveDateTime) -> Self {
        StorageValue::DateTime(value)
    }
}

impl<T> From<Option<T>> for StorageValue
where
    T: Into<StorageValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(StorageValue::Null)
    }
}

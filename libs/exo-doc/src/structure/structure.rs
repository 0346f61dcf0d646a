// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use serde_json::Value;
use uuid::Uuid;

use crate::schema::{DataType, MemberPath};

use super::StorageValue;

/// The assigned id of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StructureId {
    Guid(Uuid),
    Identity(i64),
}

impl StructureId {
    pub fn data_type(&self) -> DataType {
        match self {
            StructureId::Guid(_) => DataType::Guid,
            StructureId::Identity(_) => DataType::Int,
        }
    }

    pub fn to_storage_value(&self) -> StorageValue {
        match self {
            StructureId::Guid(id) => StorageValue::Guid(*id),
            StructureId::Identity(id) => StorageValue::Int(*id),
        }
    }

    /// The form written into the id member of the serialized document
    pub fn to_json(&self) -> Value {
        match self {
            StructureId::Guid(id) => Value::String(id.hyphenated().to_string()),
            StructureId::Identity(id) => Value::from(*id),
        }
    }
}

impl Display for StructureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureId::Guid(id) => id.hyphenated().fmt(f),
            StructureId::Identity(id) => id.fmt(f),
        }
    }
}

impl From<Uuid> for StructureId {
    fn from(id: Uuid) -> Self {
        StructureId::Guid(id)
    }
}

impl From<i64> for StructureId {
    fn from(id: i64) -> Self {
        StructureId::Identity(id)
    }
}

/// The value of one indexed member of a structure
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub structure_id: StructureId,
    pub path: MemberPath,
    pub value: StorageValue,
}

/// The value of one unique member of a structure, with the digest used to enforce uniqueness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueEntry {
    pub structure_id: StructureId,
    pub path: MemberPath,
    pub value: String,
    pub value_hash: String,
}

/// One decomposed document, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    id: StructureId,
    json: String,
    indexes: Vec<IndexEntry>,
    uniques: Vec<UniqueEntry>,
}

impl Structure {
    pub(crate) fn new(
        id: StructureId,
        json: String,
        indexes: Vec<IndexEntry>,
        uniques: Vec<UniqueEntry>,
    ) -> Self {
        Self {
            id,
            json,
            indexes,
            uniques,
        }
    }

    pub fn id(&self) -> StructureId {
        self.id
    }

    /// The serialized document body
    pub fn json(&self) -> &str {
        &self.json
    }

    pub fn indexes(&self) -> &[IndexEntry] {
        &self.indexes
    }

    pub fn uniques(&self) -> &[UniqueEntry] {
        &self.uniques
    }

    pub fn index_value(&self, path: &str) -> Option<&StorageValue> {
        self.indexes
            .iter()
            .find(|entry| entry.path.as_str() == path)
            .map(|entry| &entry.value)
    }
}

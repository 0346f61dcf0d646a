// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

use serde::Serialize;

use crate::{database_error::DatabaseError, sql::identifier::Identifier};

use super::{DataType, MemberPath, storage_schema::STRUCTURE_ID_COLUMN};

pub const DEFAULT_ID_MEMBER: &str = "StructureId";

/// How the id of a new structure comes to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdStrategy {
    /// A random guid assigned before decomposition
    ClientGenerated,
    /// An integer identity reserved from the backend before decomposition
    AutoIncrement,
}

impl IdStrategy {
    pub fn data_type(&self) -> DataType {
        match self {
            IdStrategy::ClientGenerated => DataType::Guid,
            IdStrategy::AutoIncrement => DataType::Int,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexField {
    pub path: MemberPath,
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueField {
    pub path: MemberPath,
    pub data_type: DataType,
}

/// The persistence descriptor of one document type.
///
/// Built once per type (see [`StructureSchemas`](super::StructureSchemas)) and immutable
/// afterwards. The order of `index_fields` and `unique_fields` is the declaration order, which is
/// the order used both for the storage schemas and the rows written to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureSchema {
    name: Identifier,
    id_strategy: IdStrategy,
    id_member: MemberPath,
    index_fields: Vec<IndexField>,
    unique_fields: Vec<UniqueField>,
}

impl StructureSchema {
    pub fn builder(name: impl Into<String>) -> StructureSchemaBuilder {
        StructureSchemaBuilder {
            name: name.into(),
            id_strategy: IdStrategy::ClientGenerated,
            id_member: DEFAULT_ID_MEMBER.to_string(),
            index_fields: vec![],
            unique_fields: vec![],
        }
    }

    pub fn name(&self) -> &Identifier {
        &self.name
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.id_strategy
    }

    /// The member of the serialized document carrying the structure id
    pub fn id_member(&self) -> &MemberPath {
        &self.id_member
    }

    pub fn index_fields(&self) -> &[IndexField] {
        &self.index_fields
    }

    pub fn unique_fields(&self) -> &[UniqueField] {
        &self.unique_fields
    }

    pub fn index_field(&self, path: &str) -> Option<&IndexField> {
        self.index_fields
            .iter()
            .find(|field| field.path.as_str() == path)
    }

    pub fn has_uniques(&self) -> bool {
        !self.unique_fields.is_empty()
    }
}

pub struct StructureSchemaBuilder {
    name: String,
    id_strategy: IdStrategy,
    id_member: String,
    index_fields: Vec<(String, DataType)>,
    unique_fields: Vec<(String, DataType)>,
}

impl StructureSchemaBuilder {
    pub fn id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.id_strategy = id_strategy;
        self
    }

    pub fn id_member(mut self, id_member: impl Into<String>) -> Self {
        self.id_member = id_member.into();
        self
    }

    pub fn index(mut self, path: impl Into<String>, data_type: DataType) -> Self {
        self.index_fields.push((path.into(), data_type));
        self
    }

    pub fn unique(mut self, path: impl Into<String>, data_type: DataType) -> Self {
        self.unique_fields.push((path.into(), data_type));
        self
    }

    pub fn build(self) -> Result<StructureSchema, DatabaseError> {
        let name = Identifier::new(self.name)?;
        let id_member = MemberPath::new(self.id_member)?;

        let index_fields = unique_paths(&name, &id_member, self.index_fields)?
            .into_iter()
            .map(|(path, data_type)| IndexField { path, data_type })
            .collect();
        let unique_fields = unique_paths(&name, &id_member, self.unique_fields)?
            .into_iter()
            .map(|(path, data_type)| UniqueField { path, data_type })
            .collect();

        Ok(StructureSchema {
            name,
            id_strategy: self.id_strategy,
            id_member,
            index_fields,
            unique_fields,
        })
    }
}

fn unique_paths(
    structure: &Identifier,
    id_member: &MemberPath,
    fields: Vec<(String, DataType)>,
) -> Result<Vec<(MemberPath, DataType)>, DatabaseError> {
    let mut seen = HashSet::new();

    fields
        .into_iter()
        .map(|(path, data_type)| {
            let path = MemberPath::new(path)?;

            if &path == id_member || path.as_str() == STRUCTURE_ID_COLUMN {
                return Err(DatabaseError::Validation(format!(
                    "'{path}' of '{structure}' is the structure id and cannot be declared as a field"
                )));
            }
            if !seen.insert(path.clone()) {
                return Err(DatabaseError::Validation(format!(
                    "'{path}' is declared more than once for '{structure}'"
                )));
            }

            Ok((path, data_type))
        })
        .collect()
}

/// A document type that can be persisted as a structure.
///
/// The descriptor replaces runtime member inspection: implementors declare the id strategy and the
/// members to index once, and the returned schema is cached per type.
pub trait StructureType: Serialize + 'static {
    fn structure_schema() -> Result<StructureSchema, DatabaseError>;
}

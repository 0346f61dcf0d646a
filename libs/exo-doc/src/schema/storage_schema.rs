// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{database_error::DatabaseError, sql::identifier::Identifier};

use super::{DataType, StructureSchema};

pub const STRUCTURE_ID_COLUMN: &str = "StructureId";
pub const JSON_COLUMN: &str = "Json";
pub const UQ_MEMBER_PATH_COLUMN: &str = "UqMemberPath";
pub const UQ_VALUE_COLUMN: &str = "UqValue";
pub const UQ_VALUE_HASH_COLUMN: &str = "UqValueHash";

pub const STRUCTURE_TABLE_SUFFIX: &str = "Structure";
pub const INDEX_TABLE_SUFFIX: &str = "Index";
pub const UNIQUE_TABLE_SUFFIX: &str = "Unique";

/// `<Type>Structure`: the table holding the serialized documents
pub fn structure_table_name(structure_name: &Identifier) -> Result<Identifier, DatabaseError> {
    structure_name.with_suffix(STRUCTURE_TABLE_SUFFIX)
}

/// `<Type>Index`: one row per structure, one column per indexed member
pub fn index_table_name(structure_name: &Identifier) -> Result<Identifier, DatabaseError> {
    structure_name.with_suffix(INDEX_TABLE_SUFFIX)
}

/// `<Type>Unique`: one row per unique member value
pub fn unique_table_name(structure_name: &Identifier) -> Result<Identifier, DatabaseError> {
    structure_name.with_suffix(UNIQUE_TABLE_SUFFIX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub ordinal: usize,
    pub name: Identifier,
    pub data_type: DataType,
}

/// The physical layout of one of the three tables backing a structure.
///
/// Fields are kept in ordinal order. That order is the column order of the rows produced for the
/// table, and the bulk writer maps columns by walking it, so both must come from the same
/// derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSchema {
    table_name: Identifier,
    fields: Vec<SchemaField>,
}

impl StorageSchema {
    /// `StructureId, Json`
    pub fn structures(schema: &StructureSchema) -> Result<Self, DatabaseError> {
        Ok(Self::with_fields(
            structure_table_name(schema.name())?,
            vec![
                (
                    Identifier::from_static(STRUCTURE_ID_COLUMN),
                    schema.id_strategy().data_type(),
                ),
                (Identifier::from_static(JSON_COLUMN), DataType::String),
            ],
        ))
    }

    /// `StructureId` followed by every index field in declaration order
    pub fn indexes(schema: &StructureSchema) -> Result<Self, DatabaseError> {
        let id_field = (
            Identifier::from_static(STRUCTURE_ID_COLUMN),
            schema.id_strategy().data_type(),
        );
        let index_fields = schema
            .index_fields()
            .iter()
            .map(|field| (field.path.column_name().clone(), field.data_type));

        Ok(Self::with_fields(
            index_table_name(schema.name())?,
            std::iter::once(id_field).chain(index_fields).collect(),
        ))
    }

    /// `StructureId, UqMemberPath, UqValue, UqValueHash`
    pub fn uniques(schema: &StructureSchema) -> Result<Self, DatabaseError> {
        Ok(Self::with_fields(
            unique_table_name(schema.name())?,
            vec![
                (
                    Identifier::from_static(STRUCTURE_ID_COLUMN),
                    schema.id_strategy().data_type(),
                ),
                (Identifier::from_static(UQ_MEMBER_PATH_COLUMN), DataType::String),
                (Identifier::from_static(UQ_VALUE_COLUMN), DataType::String),
                (Identifier::from_static(UQ_VALUE_HASH_COLUMN), DataType::String),
            ],
        ))
    }

    fn with_fields(
        table_name: Identifier,
        fields: Vec<(Identifier, DataType)>,
    ) -> Self {
        Self {
            table_name,
            fields: fields
                .into_iter()
                .enumerate()
                .map(|(ordinal, (name, data_type))| SchemaField {
                    ordinal,
                    name,
                    data_type,
                })
                .collect(),
        }
    }

    pub fn table_name(&self) -> &Identifier {
        &self.table_name
    }

    pub fn fields_ordered_by_index(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_ordinal(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .find(|field| field.name.as_str() == name)
            .map(|field| field.ordinal)
    }
}

/// The three storage schemas of one structure schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureStorageSchemas {
    pub structures: StorageSchema,
    pub indexes: StorageSchema,
    pub uniques: StorageSchema,
}

impl StructureStorageSchemas {
    pub fn new(schema: &StructureSchema) -> Result<Self, DatabaseError> {
        Ok(Self {
            structures: StorageSchema::structures(schema)?,
            indexes: StorageSchema::indexes(schema)?,
            uniques: StorageSchema::uniques(schema)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IdStrategy;

    fn customer_schema() -> StructureSchema {
        StructureSchema::builder("Customer")
            .id_strategy(IdStrategy::AutoIncrement)
            .index("Name", DataType::String)
            .index("Age", DataType::Int)
            .index("Address.City", DataType::String)
            .unique("Email", DataType::String)
            .build()
            .unwrap()
    }

    fn names(storage_schema: &StorageSchema) -> Vec<&str> {
        storage_schema
            .fields_ordered_by_index()
            .iter()
            .map(|field| field.name.as_str())
            .collect()
    }

    #[test]
    fn table_names_follow_convention() {
        let storage = StructureStorageSchemas::new(&customer_schema()).unwrap();

        assert_eq!(storage.structures.table_name().as_str(), "CustomerStructure");
        assert_eq!(storage.indexes.table_name().as_str(), "CustomerIndex");
        assert_eq!(storage.uniques.table_name().as_str(), "CustomerUnique");
    }

    #[test]
    fn field_order() {
        let storage = StructureStorageSchemas::new(&customer_schema()).unwrap();

        assert_eq!(names(&storage.structures), vec!["StructureId", "Json"]);
        assert_eq!(
            names(&storage.indexes),
            vec!["StructureId", "Name", "Age", "Address.City"]
        );
        assert_eq!(
            names(&storage.uniques),
            vec!["StructureId", "UqMemberPath", "UqValue", "UqValueHash"]
        );
        assert_eq!(storage.indexes.field_ordinal("Address.City"), Some(3));
        assert_eq!(
            storage.indexes.fields_ordered_by_index()[0].data_type,
            DataType::Int
        );
    }

    #[test]
    fn independent_derivations_agree() {
        let first = StructureStorageSchemas::new(&customer_schema()).unwrap();
        let second = StructureStorageSchemas::new(&customer_schema()).unwrap();

        assert_eq!(first, second);
    }
}

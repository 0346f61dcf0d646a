// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::{database_error::DatabaseError, schema::StructureSchema};

use super::{IndexEntry, Structure, StructureId, UniqueEntry};

/// Decomposes serialized documents into structures following a schema.
///
/// Only members declared in the schema produce index and unique entries. The body is the whole
/// document, so members of a richer type inserted under a narrower schema are stored but never
/// indexed.
pub struct StructureBuilder<'a> {
    schema: &'a StructureSchema,
}

impl<'a> StructureBuilder<'a> {
    pub fn new(schema: &'a StructureSchema) -> Self {
        Self { schema }
    }

    /// Decompose a document whose id member already carries `id`
    pub fn build(&self, id: StructureId, document: &Value) -> Result<Structure, DatabaseError> {
        let id_member = self.schema.id_member();
        if id_member.resolve(document) != Some(&id.to_json()) {
            return Err(DatabaseError::Validation(format!(
                "Structure id {id} must be assigned to '{id_member}' before building a '{}' structure",
                self.schema.name()
            )));
        }

        let indexes = self
            .schema
            .index_fields()
            .iter()
            .filter_map(|field| {
                field.path.resolve(document).map(|value| {
                    Ok(IndexEntry {
                        structure_id: id,
                        path: field.path.clone(),
                        value: field.data_type.convert(&field.path, value)?,
                    })
                })
            })
            .collect::<Result<Vec<_>, DatabaseError>>()?;

        let uniques = self
            .schema
            .unique_fields()
            .iter()
            .filter_map(|field| {
                field.path.resolve(document).map(|value| {
                    let value = field
                        .data_type
                        .convert(&field.path, value)?
                        .to_canonical_string();
                    Ok(UniqueEntry {
                        structure_id: id,
                        path: field.path.clone(),
                        value_hash: value_hash(&value),
                        value,
                    })
                })
            })
            .collect::<Result<Vec<_>, DatabaseError>>()?;

        Ok(Structure::new(id, document.to_string(), indexes, uniques))
    }

    pub fn build_all(
        &self,
        ids: &[StructureId],
        documents: &[Value],
    ) -> Result<Vec<Structure>, DatabaseError> {
        if ids.len() != documents.len() {
            return Err(DatabaseError::Validation(format!(
                "Got {} ids for {} documents",
                ids.len(),
                documents.len()
            )));
        }

        ids.iter()
            .zip(documents)
            .map(|(id, document)| self.build(*id, document))
            .collect()
    }
}

/// Lowercase hex SHA-256 of the canonical unique value
fn value_hash(value: &str) -> String {
    format!("{:x}", Sha256::digest(value.as_bytes()))
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::{
        schema::{DataType, IdStrategy},
        structure::StorageValue,
    };

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

    #[test]
    fn declared_index_values_round_trip() {
        let schema = customer_schema();
        let document = json!({
            "StructureId": 5,
            "Name": "Daniel",
            "Age": 37,
            "Address": {"City": "Stockholm"},
            "Email": "daniel@example.com",
        });

        let structure = StructureBuilder::new(&schema)
            .build(StructureId::Identity(5), &document)
            .unwrap();

        for field in schema.index_fields() {
            let value = structure.index_value(field.path.as_str()).unwrap();
            let original = field.path.resolve(&document).unwrap();
            assert_eq!(value, &field.data_type.convert(&field.path, original).unwrap());
        }
        assert_eq!(structure.index_value("Age"), Some(&StorageValue::Int(37)));
        assert!(structure
            .indexes()
            .iter()
            .all(|entry| entry.structure_id == StructureId::Identity(5)));
    }

    #[test]
    fn absent_members_produce_no_entries() {
        let schema = customer_schema();
        let document = json!({"StructureId": 2, "Name": "Anna", "Address": null, "Email": null});

        let structure = StructureBuilder::new(&schema)
            .build(StructureId::Identity(2), &document)
            .unwrap();

        let paths: Vec<_> = structure
            .indexes()
            .iter()
            .map(|entry| entry.path.as_str())
            .collect();
        assert_eq!(paths, vec!["Name"]);
        assert!(structure.uniques().is_empty());
    }

    #[test]
    fn unique_values_are_hashed() {
        let schema = customer_schema();
        let document = json!({"StructureId": 1, "Email": "a@b.c"});

        let structure = StructureBuilder::new(&schema)
            .build(StructureId::Identity(1), &document)
            .unwrap();

        let unique = &structure.uniques()[0];
        assert_eq!(unique.path.as_str(), "Email");
        assert_eq!(unique.value, "a@b.c");
        assert_eq!(unique.value_hash.len(), 64);
        assert_eq!(unique.value_hash, value_hash("a@b.c"));
        assert_ne!(unique.value_hash, value_hash("a@b.d"));
    }

    #[test]
    fn body_is_canonical_json() {
        let schema = customer_schema();
        let document = json!({"Name": "B", "StructureId": 1, "Age": 3});

        let structure = StructureBuilder::new(&schema)
            .build(StructureId::Identity(1), &document)
            .unwrap();

        assert_eq!(structure.json(), r#"{"Age":3,"Name":"B","StructureId":1}"#);
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct PremiumCustomer {
        structure_id: Uuid,
        name: String,
        loyalty_level: i32,
    }

    #[test]
    fn derived_members_are_stored_but_not_indexed() {
        let schema = StructureSchema::builder("Customer")
            .index("Name", DataType::String)
            .build()
            .unwrap();
        let id = Uuid::new_v4();
        let document = serde_json::to_value(PremiumCustomer {
            structure_id: id,
            name: "Vera".into(),
            loyalty_level: 3,
        })
        .unwrap();

        let structure = StructureBuilder::new(&schema)
            .build(StructureId::Guid(id), &document)
            .unwrap();

        assert_eq!(structure.indexes().len(), 1);
        assert_eq!(structure.index_value("LoyaltyLevel"), None);
        assert!(structure.json().contains(r#""LoyaltyLevel":3"#));
    }

    #[test]
    fn id_must_be_assigned_first() {
        let schema = customer_schema();

        assert!(matches!(
            StructureBuilder::new(&schema).build(StructureId::Identity(1), &json!({"Name": "x"})),
            Err(DatabaseError::Validation(_))
        ));
    }

    #[test]
    fn mistyped_members_are_rejected() {
        let schema = customer_schema();
        let document = json!({"StructureId": 1, "Age": "old"});

        assert!(matches!(
            StructureBuilder::new(&schema).build(StructureId::Identity(1), &document),
            Err(DatabaseError::InvalidValue { .. })
        ));
    }
}

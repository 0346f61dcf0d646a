// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    database_error::DatabaseError,
    schema::{MemberPath, STRUCTURE_ID_COLUMN, StructureSchema},
    sql::{Column, Identifier},
};

/// Maps member paths onto the columns generated for a structure schema.
///
/// The index table has one column per declared index field, named after its member path, and the
/// id member maps onto the `StructureId` column. Anything else fails to resolve.
pub struct ColumnResolver<'a> {
    schema: &'a StructureSchema,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(schema: &'a StructureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &StructureSchema {
        self.schema
    }

    pub fn resolve(&self, path: &MemberPath) -> Result<Column, DatabaseError> {
        if path == self.schema.id_member() {
            return Ok(Column::Structure(Identifier::from_static(STRUCTURE_ID_COLUMN)));
        }

        self.resolve_index_column(path).map(Column::Index)
    }

    /// Resolve to a column of the index table only
    pub fn resolve_index_column(&self, path: &MemberPath) -> Result<Identifier, DatabaseError> {
        self.schema
            .index_field(path.as_str())
            .map(|field| field.path.column_name().clone())
            .ok_or_else(|| {
                DatabaseError::schema_resolution(self.schema.name().as_str(), path.as_str())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;

    #[test]
    fn resolves_index_fields_and_id() {
        let schema = StructureSchema::builder("Customer")
            .index("Address.City", DataType::String)
            .build()
            .unwrap();
        let resolver = ColumnResolver::new(&schema);

        assert_eq!(
            resolver
                .resolve(&MemberPath::new("Address.City").unwrap())
                .unwrap(),
            Column::Index(Identifier::new("Address.City").unwrap())
        );
        assert_eq!(
            resolver
                .resolve(&MemberPath::new("StructureId").unwrap())
                .unwrap(),
            Column::Structure(Identifier::new("StructureId").unwrap())
        );
        assert!(matches!(
            resolver.resolve(&MemberPath::new("Address").unwrap()),
            Err(DatabaseError::SchemaResolution { structure, path })
                if structure == "Customer" && path == "Address"
        ));
    }
}

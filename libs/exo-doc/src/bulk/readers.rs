// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

use tracing::trace;

use crate::{
    database_error::DatabaseError,
    schema::StorageSchema,
    structure::{StorageValue, Structure, StructureId, UniqueEntry},
};

/// Column values in the field order of the reader's storage schema
pub type Row = Vec<StorageValue>;

/// A forward-only stream of rows destined for one table.
pub trait RowReader {
    fn storage_schema(&self) -> &StorageSchema;

    /// The total number of rows the reader produces
    fn records_affected(&self) -> usize;

    fn read(&mut self) -> Option<Row>;
}

/// Proof that the structure rows of a set of structures have been written.
///
/// Only the bulk inserter creates one, after its structure write succeeded, and the index and
/// unique readers cannot be created without it.
pub struct StructuresWritten {
    ids: HashSet<StructureId>,
}

impl StructuresWritten {
    pub(super) fn new(structures: &[Structure]) -> Self {
        Self {
            ids: structures.iter().map(Structure::id).collect(),
        }
    }

    pub fn contains(&self, id: &StructureId) -> bool {
        self.ids.contains(id)
    }

    fn check(&self, id: &StructureId) -> Result<(), DatabaseError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(DatabaseError::ReferentialOrderViolation {
                structure_id: id.to_string(),
            })
        }
    }
}

/// `StructureId, Json` per structure
pub struct StructuresReader<'a> {
    storage_schema: &'a StorageSchema,
    structures: &'a [Structure],
    position: usize,
}

impl<'a> StructuresReader<'a> {
    pub fn new(storage_schema: &'a StorageSchema, structures: &'a [Structure]) -> Self {
        Self {
            storage_schema,
            structures,
            position: 0,
        }
    }
}

impl RowReader for StructuresReader<'_> {
    fn storage_schema(&self) -> &StorageSchema {
        self.storage_schema
    }

    fn records_affected(&self) -> usize {
        self.structures.len()
    }

    fn read(&mut self) -> Option<Row> {
        let structure = self.structures.get(self.position)?;
        self.position += 1;

        Some(vec![
            structure.id().to_storage_value(),
            StorageValue::String(structure.json().to_string()),
        ])
    }
}

impl Drop for StructuresReader<'_> {
    fn drop(&mut self) {
        release(self.storage_schema, self.position);
    }
}

/// One row per structure: `StructureId` followed by the value of every index field, `null` where
/// the structure has no value
pub struct IndexesReader<'a> {
    storage_schema: &'a StorageSchema,
    structures: &'a [Structure],
    position: usize,
}

impl<'a> IndexesReader<'a> {
    pub fn new(
        storage_schema: &'a StorageSchema,
        structures: &'a [Structure],
        written: &StructuresWritten,
    ) -> Result<Self, DatabaseError> {
        structures
            .iter()
            .try_for_each(|structure| written.check(&structure.id()))?;

        Ok(Self {
            storage_schema,
            structures,
            position: 0,
        })
    }
}

impl RowReader for IndexesReader<'_> {
    fn storage_schema(&self) -> &StorageSchema {
        self.storage_schema
    }

    fn records_affected(&self) -> usize {
        self.structures.len()
    }

    fn read(&mut self) -> Option<Row> {
        let structure = self.structures.get(self.position)?;
        self.position += 1;

        let mut row = vec![StorageValue::Null; self.storage_schema.field_count()];
        row[0] = structure.id().to_storage_value();
        for entry in structure.indexes() {
            if let Some(ordinal) = self.storage_schema.field_ordinal(entry.path.as_str()) {
                row[ordinal] = entry.value.clone();
            }
        }

        Some(row)
    }
}

impl Drop for IndexesReader<'_> {
    fn drop(&mut self) {
        release(self.storage_schema, self.position);
    }
}

/// `StructureId, UqMemberPath, UqValue, UqValueHash` per unique entry of every structure
pub struct UniquesReader<'a> {
    storage_schema: &'a StorageSchema,
    entries: Vec<&'a UniqueEntry>,
    position: usize,
}

impl<'a> UniquesReader<'a> {
    pub fn new(
        storage_schema: &'a StorageSchema,
        structures: &'a [Structure],
        written: &StructuresWritten,
    ) -> Result<Self, DatabaseError> {
        let entries: Vec<_> = structures
            .iter()
            .flat_map(|structure| structure.uniques())
            .collect();
        entries
            .iter()
            .try_for_each(|entry| written.check(&entry.structure_id))?;

        Ok(Self {
            storage_schema,
            entries,
            position: 0,
        })
    }
}

impl RowReader for UniquesReader<'_> {
    fn storage_schema(&self) -> &StorageSchema {
        self.storage_schema
    }

    fn records_affected(&self) -> usize {
        self.entries.len()
    }

    fn read(&mut self) -> Option<Row> {
        let entry = self.entries.get(self.position)?;
        self.position += 1;

        Some(vec![
            entry.structure_id.to_storage_value(),
            StorageValue::String(entry.path.to_string()),
            StorageValue::String(entry.value.clone()),
            StorageValue::String(entry.value_hash.clone()),
        ])
    }
}

impl Drop for UniquesReader<'_> {
    fn drop(&mut self) {
        release(self.storage_schema, self.position);
    }
}

fn release(storage_schema: &StorageSchema, rows_read: usize) {
    trace!(
        table = %storage_schema.table_name(),
        rows_read,
        "Released row reader"
    );
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::{
    config::BulkInsertConfig,
    database_error::DatabaseError,
    schema::{IdStrategy, StorageSchema, StructureSchema, StructureStorageSchemas},
    sql::Identifier,
    structure::Structure,
};

use super::{
    bulk_copy::{BulkCopy, BulkCopyRequest, ColumnMapping, TransactionScope},
    readers::{IndexesReader, RowReader, StructuresReader, StructuresWritten, UniquesReader},
};

/// Writes decomposed structures to their three tables: structures, then indexes, then uniques.
///
/// The three writes are sequential and a failure aborts the remaining ones. They are atomic only
/// when a transaction scope is passed; otherwise a failed index write leaves structures that can
/// be fetched by id but not found through queries.
pub struct DbBulkInserter {
    bulk_copy: Arc<dyn BulkCopy>,
    schema_name: Identifier,
    config: BulkInsertConfig,
}

impl DbBulkInserter {
    pub fn new(bulk_copy: Arc<dyn BulkCopy>, schema_name: Identifier, config: BulkInsertConfig) -> Self {
        Self {
            bulk_copy,
            schema_name,
            config,
        }
    }

    #[instrument(
        name = "DbBulkInserter::insert"
        skip_all
        fields(
            structure = %schema.name(),
            count = structures.len(),
            transaction = transaction.map(|tx| tx.id())
            )
        )]
    pub async fn insert(
        &self,
        schema: &StructureSchema,
        structures: &[Structure],
        transaction: Option<&dyn TransactionScope>,
    ) -> Result<(), DatabaseError> {
        if structures.is_empty() {
            debug!("Nothing to insert");
            return Ok(());
        }

        let storage_schemas = StructureStorageSchemas::new(schema)?;
        let keep_identities = schema.id_strategy() == IdStrategy::AutoIncrement;

        let written = {
            let mut reader = StructuresReader::new(&storage_schemas.structures, structures);
            self.write(
                &mut reader,
                self.config.structures_batch_size,
                keep_identities,
                transaction,
            )
            .await?;
            StructuresWritten::new(structures)
        };

        {
            let mut reader = IndexesReader::new(&storage_schemas.indexes, structures, &written)?;
            self.write(&mut reader, self.config.indexes_batch_size, false, transaction)
                .await?;
        }

        let unique_count: usize = structures.iter().map(|s| s.uniques().len()).sum();
        if unique_count == 0 {
            debug!("No unique values, skipping {}", storage_schemas.uniques.table_name());
            return Ok(());
        }

        let mut reader = UniquesReader::new(&storage_schemas.uniques, structures, &written)?;
        self.write(&mut reader, self.config.uniques_batch_size, false, transaction)
            .await
    }

    async fn write(
        &self,
        reader: &mut (dyn RowReader + Send),
        max_batch_size: usize,
        keep_identities: bool,
        transaction: Option<&dyn TransactionScope>,
    ) -> Result<(), DatabaseError> {
        let storage_schema: &StorageSchema = reader.storage_schema();
        let table = storage_schema.table_name().clone();
        let rows = reader.records_affected();
        let column_mappings: Vec<_> = storage_schema
            .fields_ordered_by_index()
            .iter()
            .map(|field| ColumnMapping::identity(field.name.clone()))
            .collect();

        let request = BulkCopyRequest {
            schema_name: &self.schema_name,
            destination_table: &table,
            batch_size: rows.min(max_batch_size),
            column_mappings,
            keep_identities,
            transaction,
        };

        debug!(
            table = %request.qualified_table_name(),
            columns = request.column_mappings.len(),
            batch_size = request.batch_size,
            rows,
            keep_identities,
            "Bulk writing"
        );

        self.bulk_copy.write(request, reader).await.map_err(|source| {
            error!("Bulk write to {table} failed: {source:?}");
            DatabaseError::BackendWrite {
                table: table.to_string(),
                source,
            }
        })
    }
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::{
    bulk::{BulkCopy, BulkCopyRequest, Row, RowReader},
    database_error::BoxError,
};

/// One write received by a [`RecordingBulkCopy`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedWrite {
    pub schema_name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub batch_size: usize,
    pub keep_identities: bool,
    pub transaction: Option<String>,
    pub rows: Vec<Row>,
    /// Row count of every physical batch, as the backend would have sent them
    pub batches: Vec<usize>,
}

/// A bulk copy backend that keeps every write in memory.
#[derive(Debug, Default)]
pub struct RecordingBulkCopy {
    writes: Mutex<Vec<RecordedWrite>>,
    failing_table: Option<String>,
}

impl RecordingBulkCopy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail (after recording it) every write to `table`
    pub fn failing_on(table: impl Into<String>) -> Self {
        Self {
            writes: Mutex::default(),
            failing_table: Some(table.into()),
        }
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Destination tables in write order
    pub fn tables(&self) -> Vec<String> {
        self.writes().into_iter().map(|write| write.table).collect()
    }
}

#[async_trait]
impl BulkCopy for RecordingBulkCopy {
    async fn write(
        &self,
        request: BulkCopyRequest<'_>,
        rows: &mut (dyn RowReader + Send),
    ) -> Result<(), BoxError> {
        let batch_size = request.batch_size.max(1);
        let mut recorded_rows = vec![];
        let mut batches = vec![];

        loop {
            let batch: Vec<_> = std::iter::from_fn(|| rows.read()).take(batch_size).collect();
            if batch.is_empty() {
                break;
            }
            if batch
                .iter()
                .any(|row| row.len() != request.column_mappings.len())
            {
                return Err(format!(
                    "Rows of {} do not match its {} column mappings",
                    request.destination_table,
                    request.column_mappings.len()
                )
                .into());
            }
            batches.push(batch.len());
            recorded_rows.extend(batch);
        }

        let table = request.destination_table.to_string();
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedWrite {
                schema_name: request.schema_name.to_string(),
                table: table.clone(),
                columns: request
                    .column_mappings
                    .iter()
                    .map(|mapping| mapping.destination.to_string())
                    .collect(),
                batch_size: request.batch_size,
                keep_identities: request.keep_identities,
                transaction: request.transaction.map(|tx| tx.id().to_string()),
                rows: recorded_rows,
                batches,
            });

        if self.failing_table.as_deref() == Some(table.as_str()) {
            return Err(format!("Simulated failure writing {table}").into());
        }

        Ok(())
    }
}

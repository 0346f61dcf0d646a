// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;

use crate::{database_error::BoxError, sql::Identifier};

use super::readers::RowReader;

/// A caller-owned transaction that backend writes enlist in.
///
/// When a scope is passed to an insert, all of its writes are atomic together. Without one every
/// write commits on its own.
pub trait TransactionScope: Send + Sync {
    /// Identifies the underlying transaction to the backend
    fn id(&self) -> &str;
}

/// Maps a column of the rows produced by a [`RowReader`] onto a destination column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub source: Identifier,
    pub destination: Identifier,
}

impl ColumnMapping {
    /// Map a column onto the identically named destination column
    pub fn identity(name: Identifier) -> Self {
        Self {
            source: name.clone(),
            destination: name,
        }
    }
}

/// Everything a backend needs to bulk write the rows of one table
pub struct BulkCopyRequest<'a> {
    pub schema_name: &'a Identifier,
    pub destination_table: &'a Identifier,
    /// In the column order of the rows
    pub column_mappings: Vec<ColumnMapping>,
    /// Upper bound of rows per physical batch
    pub batch_size: usize,
    /// Write the provided ids instead of letting the backend assign identities
    pub keep_identities: bool,
    pub transaction: Option<&'a dyn TransactionScope>,
}

impl BulkCopyRequest<'_> {
    /// `[<schema>].[<table>]`
    pub fn qualified_table_name(&self) -> String {
        format!("[{}].[{}]", self.schema_name, self.destination_table)
    }
}

/// The backend side of a bulk insert: transfers a row stream into one table.
///
/// Implementations report failure of any batch through the returned error; the rows of batches
/// written before the failure persist unless the request carries a transaction that is rolled
/// back.
#[async_trait]
pub trait BulkCopy: Send + Sync {
    async fn write(
        &self,
        request: BulkCopyRequest<'_>,
        rows: &mut (dyn RowReader + Send),
    ) -> Result<(), BoxError>;
}

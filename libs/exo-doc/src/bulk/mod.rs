// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Bulk persistence of decomposed structures through a backend [`BulkCopy`] collaborator.

mod bulk_copy;
mod bulk_inserter;
mod readers;

pub use bulk_copy::{BulkCopy, BulkCopyRequest, ColumnMapping, TransactionScope};
pub use bulk_inserter::DbBulkInserter;
pub use readers::{
    IndexesReader, Row, RowReader, StructuresReader, StructuresWritten, UniquesReader,
};

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Stores arbitrary documents ("structures") in a relational backend without a predeclared
/// table schema.
///
/// Every document type declares a [StructureSchema] once (through [StructureType]). From it, three
/// tables are derived: `<Type>Structure` holds the serialized body of each document,
/// `<Type>Index` holds one row per document with a column per indexed member, and
/// `<Type>Unique` holds the values of unique members. Inserting documents (see
/// [StructureStore::insert]) assigns their ids, decomposes them with a [StructureBuilder] and
/// writes the three row sets through the [DbBulkInserter], in that order.
///
/// Queries are expressed with [Expression]s (`member("Age").gte(value(18))`), parsed into a
/// [ParsedLambda] of [Node]s and compiled by the [QueryGenerator] into query text that filters and
/// sorts over the index table and can inline referenced child documents through correlated
/// sub-selects.
///
/// The backend itself stays outside this crate: it is reached through the [BulkCopy] and
/// [IdentityGenerator] traits, and query text is returned as [SqlQuery] for the caller to execute.
pub mod bulk;
pub mod config;
pub mod database_error;
pub mod query;
pub mod schema;
pub mod sql;
mod store;
pub mod structure;
pub mod transform;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

/// Public types at the root level of this crate
pub use bulk::{BulkCopy, BulkCopyRequest, ColumnMapping, DbBulkInserter, TransactionScope};
pub use config::{BulkInsertConfig, StoreConfig};
pub use database_error::DatabaseError;
pub use query::{
    Expression, Modifier, Node, ParsedLambda, QueryBuilder, QueryCommand, member, not, value,
};
pub use schema::{DataType, IdStrategy, MemberPath, StructureSchema, StructureType};
pub use sql::{Identifier, SqlInclude, SqlQuery};
pub use store::StructureStore;
pub use structure::{IdentityGenerator, StorageValue, Structure, StructureBuilder, StructureId};
pub use transform::QueryGenerator;

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Per-type persistence descriptors and the three storage schemas derived from them.

mod data_type;
mod member_path;
mod storage_schema;
mod structure_schema;
mod structure_schemas;

pub use data_type::DataType;
pub use member_path::MemberPath;
pub use storage_schema::{
    INDEX_TABLE_SUFFIX, JSON_COLUMN, STRUCTURE_ID_COLUMN, STRUCTURE_TABLE_SUFFIX, SchemaField,
    StorageSchema, StructureStorageSchemas, UNIQUE_TABLE_SUFFIX,
    UQ_MEMBER_PATH_COLUMN, UQ_VALUE_COLUMN, UQ_VALUE_HASH_COLUMN, index_table_name,
    structure_table_name, unique_table_name,
};
pub use structure_schema::{
    DEFAULT_ID_MEMBER, IdStrategy, IndexField, StructureSchema, StructureSchemaBuilder,
    StructureType, UniqueField,
};
pub use structure_schemas::StructureSchemas;

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod env;

pub use env::{EnvError, Environment, MapEnvironment, SystemEnvironment, get_parsed};

use crate::{database_error::DatabaseError, sql::identifier::Identifier};

pub const EXO_DOC_SCHEMA_NAME: &str = "EXO_DOC_SCHEMA_NAME";
pub const EXO_DOC_STRUCTURES_BATCH_SIZE: &str = "EXO_DOC_STRUCTURES_BATCH_SIZE";
pub const EXO_DOC_INDEXES_BATCH_SIZE: &str = "EXO_DOC_INDEXES_BATCH_SIZE";
pub const EXO_DOC_UNIQUES_BATCH_SIZE: &str = "EXO_DOC_UNIQUES_BATCH_SIZE";

pub const DEFAULT_SCHEMA_NAME: &str = "dbo";

pub const MAX_STRUCTURES_BATCH_SIZE: usize = 1000;
pub const MAX_INDEXES_BATCH_SIZE: usize = 6000;
pub const MAX_UNIQUES_BATCH_SIZE: usize = 6000;

/// Per-table caps handed to the bulk writer as batch size hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkInsertConfig {
    pub structures_batch_size: usize,
    pub indexes_batch_size: usize,
    pub uniques_batch_size: usize,
}

impl Default for BulkInsertConfig {
    fn default() -> Self {
        Self {
            structures_batch_size: MAX_STRUCTURES_BATCH_SIZE,
            indexes_batch_size: MAX_INDEXES_BATCH_SIZE,
            uniques_batch_size: MAX_UNIQUES_BATCH_SIZE,
        }
    }
}

impl BulkInsertConfig {
    pub fn from_env(env: &dyn Environment) -> Result<Self, DatabaseError> {
        Ok(Self {
            structures_batch_size: batch_size(
                env,
                EXO_DOC_STRUCTURES_BATCH_SIZE,
                MAX_STRUCTURES_BATCH_SIZE,
            )?,
            indexes_batch_size: batch_size(env, EXO_DOC_INDEXES_BATCH_SIZE, MAX_INDEXES_BATCH_SIZE)?,
            uniques_batch_size: batch_size(env, EXO_DOC_UNIQUES_BATCH_SIZE, MAX_UNIQUES_BATCH_SIZE)?,
        })
    }
}

fn batch_size(env: &dyn Environment, key: &str, default_value: usize) -> Result<usize, DatabaseError> {
    let size = get_parsed(env, key, default_value)?;

    if size == 0 {
        return Err(DatabaseError::Validation(format!(
            "{key} must be a positive number"
        )));
    }

    Ok(size)
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Namespace used to qualify every generated table reference (`[<schema_name>].[<table>]`)
    pub schema_name: Identifier,
    pub bulk_insert: BulkInsertConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            schema_name: Identifier::from_static(DEFAULT_SCHEMA_NAME),
            bulk_insert: BulkInsertConfig::default(),
        }
    }
}

impl StoreConfig {
    pub fn from_env(env: &dyn Environment) -> Result<Self, DatabaseError> {
        let schema_name = Identifier::new(env.get_or_else(EXO_DOC_SCHEMA_NAME, DEFAULT_SCHEMA_NAME))?;

        Ok(Self {
            schema_name,
            bulk_insert: BulkInsertConfig::from_env(env)?,
        })
    }
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use crate::config::EnvError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// A parser that requires at least one expression received none
    #[error("At least one {0} expression is required")]
    EmptyInput(&'static str),

    #[error("Unsupported modifier '{modifier}' in {context}")]
    UnsupportedModifier {
        modifier: String,
        context: &'static str,
    },

    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("Member '{path}' could not be resolved against structure '{structure}'")]
    SchemaResolution { structure: String, path: String },

    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Invalid value for member '{path}': expected {expected}")]
    InvalidValue { path: String, expected: String },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] EnvError),

    #[error("Bulk write to '{table}' failed: {source}")]
    BackendWrite {
        table: String,
        #[source]
        source: BoxError,
    },

    /// Index or unique rows were about to be written for a structure whose row was not part of the
    /// preceding structure write
    #[error("Rows for structure {structure_id} must be written after its structure row")]
    ReferentialOrderViolation { structure_id: String },

    #[error("Identity checkout for '{structure}' failed: {source}")]
    IdentityCheckout {
        structure: String,
        #[source]
        source: BoxError,
    },

    #[error("{0} {1}")]
    WithContext(String, #[source] Box<DatabaseError>),
}

impl DatabaseError {
    pub fn with_context(self, context: String) -> DatabaseError {
        DatabaseError::WithContext(context, Box::new(self))
    }

    pub(crate) fn schema_resolution(structure: &str, path: impl Into<String>) -> DatabaseError {
        DatabaseError::SchemaResolution {
            structure: structure.to_string(),
            path: path.into(),
        }
    }
}

pub trait WithContext {
    fn with_context(self, context: String) -> Self;
}

impl<T> WithContext for Result<T, DatabaseError> {
    fn with_context(self, context: String) -> Result<T, DatabaseError> {
        self.map_err(|e| e.with_context(context))
    }
}

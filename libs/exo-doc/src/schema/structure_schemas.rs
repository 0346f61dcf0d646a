// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    any::TypeId,
    sync::{Arc, PoisonError, RwLock},
};

use indexmap::IndexMap;
use tracing::debug;

use crate::database_error::DatabaseError;

use super::{StructureSchema, StructureType};

/// Lazily derived, immutable schemas keyed by document type.
#[derive(Default)]
pub struct StructureSchemas {
    schemas: RwLock<IndexMap<TypeId, Arc<StructureSchema>>>,
}

impl StructureSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the schema of `T`, deriving and caching it on first use
    pub fn get_schema<T: StructureType>(&self) -> Result<Arc<StructureSchema>, DatabaseError> {
        let type_id = TypeId::of::<T>();

        if let Some(schema) = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return Ok(schema.clone());
        }

        let schema = T::structure_schema()?;
        debug!("Registering structure schema {}", schema.name());

        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have registered it in the meantime; the first one wins
        Ok(schemas
            .entry(type_id)
            .or_insert_with(|| Arc::new(schema))
            .clone())
    }

    /// Drop the cached schema of `T` so that the next use derives it again
    pub fn remove_schema<T: StructureType>(&self) -> Option<Arc<StructureSchema>> {
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(&TypeId::of::<T>())
    }

    /// All registered schemas in registration order
    pub fn schemas(&self) -> Vec<Arc<StructureSchema>> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

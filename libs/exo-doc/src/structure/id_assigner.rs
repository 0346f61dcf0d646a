// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::{
    database_error::{BoxError, DatabaseError},
    schema::{IdStrategy, MemberPath, StructureSchema},
};

use super::StructureId;

/// Reserves ranges of identities for structures with an [`IdStrategy::AutoIncrement`] id.
///
/// Implemented by the backend (typically through a per-structure identity table).
#[async_trait]
pub trait IdentityGenerator: Send + Sync {
    /// Reserve `count` consecutive identities and return the first one
    async fn check_out(&self, schema: &StructureSchema, count: usize) -> Result<i64, BoxError>;
}

/// Assigns ids to serialized documents before they are decomposed.
#[derive(Clone, Default)]
pub struct IdAssigner {
    identity_generator: Option<Arc<dyn IdentityGenerator>>,
}

impl IdAssigner {
    pub fn new(identity_generator: Option<Arc<dyn IdentityGenerator>>) -> Self {
        Self { identity_generator }
    }

    /// Assign an id to every document lacking one and write it into the id member.
    ///
    /// Returns the ids in document order. Documents that already carry an id (a non-nil guid or a
    /// positive identity) keep it.
    pub async fn assign(
        &self,
        schema: &StructureSchema,
        documents: &mut [Value],
    ) -> Result<Vec<StructureId>, DatabaseError> {
        let existing = documents
            .iter()
            .map(|document| existing_id(schema, document))
            .collect::<Result<Vec<_>, _>>()?;

        let missing = existing.iter().filter(|id| id.is_none()).count();
        let mut next_identity = match schema.id_strategy() {
            IdStrategy::AutoIncrement if missing > 0 => self.check_out(schema, missing).await?,
            _ => 0,
        };

        documents
            .iter_mut()
            .zip(existing)
            .map(|(document, existing)| {
                let id = match (existing, schema.id_strategy()) {
                    (Some(id), _) => id,
                    (None, IdStrategy::ClientGenerated) => StructureId::Guid(Uuid::new_v4()),
                    (None, IdStrategy::AutoIncrement) => {
                        let id = StructureId::Identity(next_identity);
                        next_identity += 1;
                        id
                    }
                };
                // Kept guids may be braced or upper case; the body always holds the hyphenated form
                set_member(document, schema.id_member(), id.to_json())?;
                Ok(id)
            })
            .collect()
    }

    async fn check_out(&self, schema: &StructureSchema, count: usize) -> Result<i64, DatabaseError> {
        let generator = self.identity_generator.as_ref().ok_or_else(|| {
            DatabaseError::Validation(format!(
                "'{}' uses auto-increment ids, but no identity generator is configured",
                schema.name()
            ))
        })?;

        let first = generator
            .check_out(schema, count)
            .await
            .map_err(|source| DatabaseError::IdentityCheckout {
                structure: schema.name().to_string(),
                source,
            })?;
        debug!("Checked out {count} identities for {} starting at {first}", schema.name());

        Ok(first)
    }
}

fn existing_id(
    schema: &StructureSchema,
    document: &Value,
) -> Result<Option<StructureId>, DatabaseError> {
    let id_member = schema.id_member();
    let invalid = || DatabaseError::InvalidValue {
        path: id_member.to_string(),
        expected: schema.id_strategy().data_type().name().to_string(),
    };

    match (schema.id_strategy(), id_member.resolve(document)) {
        (_, None) => Ok(None),
        (IdStrategy::ClientGenerated, Some(Value::String(id))) => {
            let id = Uuid::parse_str(id).map_err(|_| invalid())?;
            Ok((!id.is_nil()).then_some(StructureId::Guid(id)))
        }
        (IdStrategy::AutoIncrement, Some(Value::Number(id))) => {
            let id = id.as_i64().ok_or_else(invalid)?;
            Ok((id > 0).then_some(StructureId::Identity(id)))
        }
        _ => Err(invalid()),
    }
}

/// Write `value` at `path`, creating intermediate objects as needed
fn set_member(document: &mut Value, path: &MemberPath, value: Value) -> Result<(), DatabaseError> {
    let not_an_object = || {
        DatabaseError::Validation(format!(
            "Cannot assign id member '{path}': the document is not an object"
        ))
    };

    let mut segments = path.segments().peekable();
    let mut current = document.as_object_mut().ok_or_else(not_an_object)?;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return Ok(());
        }

        let child = current
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()));
        if child.is_null() {
            *child = Value::Object(Map::new());
        }
        current = child.as_object_mut().ok_or_else(not_an_object)?;
    }

    Ok(())
}

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

use crate::{database_error::BoxError, schema::StructureSchema, structure::IdentityGenerator};

/// Hands out consecutive identities starting at a fixed value, recording every checkout.
#[derive(Debug)]
pub struct SequentialIdentityGenerator {
    next: Mutex<i64>,
    checkouts: Mutex<Vec<usize>>,
}

impl SequentialIdentityGenerator {
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: Mutex::new(first),
            checkouts: Mutex::default(),
        }
    }

    /// The size of every checkout so far
    pub fn checkouts(&self) -> Vec<usize> {
        self.checkouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl IdentityGenerator for SequentialIdentityGenerator {
    async fn check_out(&self, _schema: &StructureSchema, count: usize) -> Result<i64, BoxError> {
        let count_i64 = i64::try_from(count)?;
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let first = *next;
        *next += count_i64;

        self.checkouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(count);

        Ok(first)
    }
}

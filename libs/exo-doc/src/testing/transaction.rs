// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::bulk::TransactionScope;

/// A transaction scope identified by a fixed id
#[derive(Debug, Clone)]
pub struct TestTransaction {
    id: String,
}

impl TestTransaction {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl TransactionScope for TestTransaction {
    fn id(&self) -> &str {
        &self.id
    }
}

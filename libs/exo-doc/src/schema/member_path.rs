// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use serde_json::Value;

use crate::{database_error::DatabaseError, sql::identifier::Identifier};

/// A dotted path from the root of a document to one of its members, such as `Owner.Name`.
///
/// The path doubles as the column name in the index table, so it is held as an [`Identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberPath(Identifier);

impl MemberPath {
    pub fn new(path: impl Into<String>) -> Result<Self, DatabaseError> {
        Ok(Self(Identifier::new(path)?))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.as_str().split('.')
    }

    /// The right-most member name (`Name` for `Owner.Name`)
    pub fn leaf(&self) -> &str {
        self.segments().last().unwrap_or_default()
    }

    pub fn column_name(&self) -> &Identifier {
        &self.0
    }

    /// Walk the path through nested objects. Absent members and explicit nulls both resolve to
    /// `None`.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments()
            .try_fold(document, |current, segment| current.as_object()?.get(segment))
            .filter(|value| !value.is_null())
    }
}

impl Display for MemberPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::structure::StorageValue;

use super::{ExpressionBuilder, SQLBuilder, identifier::Identifier};

/// Alias of the structure table in generated queries
pub const STRUCTURE_ALIAS: &str = "s";
/// Alias of the index table in generated queries
pub const INDEX_ALIAS: &str = "si";

/// A column-like operand of a predicate or an order by element.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// A column of the index table, `si.[<name>]`
    Index(Identifier),
    /// A column of the structure table, `s.[<name>]`
    Structure(Identifier),
    /// A literal value. This will be mapped to a placeholder to avoid SQL injection.
    Param(StorageValue),
    Null,
}

impl From<StorageValue> for Column {
    fn from(value: StorageValue) -> Self {
        match value {
            StorageValue::Null => Column::Null,
            value => Column::Param(value),
        }
    }
}

impl ExpressionBuilder for Column {
    fn build(&self, builder: &mut SQLBuilder) {
        match self {
            Column::Index(name) => builder.push_column(INDEX_ALIAS, name),
            Column::Structure(name) => builder.push_column(STRUCTURE_ALIAS, name),
            Column::Param(value) => builder.push_param(value.clone()),
            Column::Null => builder.push_str("null"),
        }
    }
}

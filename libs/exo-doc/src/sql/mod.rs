// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Building blocks of the generated query text.
//!
//! Identifiers are bracket-quoted and every literal becomes a `@p<n>` placeholder, so the text
//! only ever contains validated names and fixed keywords.

pub(crate) mod column;
mod expression_builder;
pub(crate) mod identifier;
pub(crate) mod include;
pub(crate) mod order;
pub(crate) mod predicate;
pub(crate) mod select;
mod sql_builder;

pub use column::{Column, INDEX_ALIAS, STRUCTURE_ALIAS};
pub use expression_builder::ExpressionBuilder;
pub use identifier::Identifier;
pub use include::SqlInclude;
pub use order::{OrderBy, OrderByElement, Ordering};
pub use predicate::{ParamEquality, Predicate, escape_like};
pub use select::{Select, SelectById, SqlQuery};
pub use sql_builder::{PARAM_PREFIX, SQLBuilder};

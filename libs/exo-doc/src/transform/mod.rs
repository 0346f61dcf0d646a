// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Compilation of parsed lambdas into query text.
//!
//! Member paths are resolved through the structure schema (see [`ColumnResolver`]), so generated
//! queries refer to exactly the columns of the generated tables.

mod column_resolver;
mod include_processor;
mod predicate_processor;
mod query_generator;
mod sorting_processor;

pub use column_resolver::ColumnResolver;
pub use include_processor::ParsedIncludeSqlProcessor;
pub use predicate_processor::ParsedWhereSqlProcessor;
pub use query_generator::QueryGenerator;
pub use sorting_processor::ParsedSortingSqlProcessor;

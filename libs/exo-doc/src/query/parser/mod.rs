// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Conversion of caller expressions into parsed lambdas, one parser per clause kind.

mod include_parser;
mod sorting_parser;
mod where_parser;

pub use include_parser::IncludeParser;
pub use sorting_parser::SortingParser;
pub use where_parser::WhereParser;

use super::expression::Expression;

/// Short description of an expression for error messages
fn describe(expression: &Expression) -> String {
    match expression {
        Expression::Member(path) => format!("member '{path}'"),
        Expression::Constant(value) => format!("constant {value}"),
        Expression::Binary { op, .. } => format!("{op:?} expression"),
        Expression::Not(_) => "negation".to_string(),
        Expression::Call { modifier, .. } => format!("{} call", modifier.name()),
    }
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The caller-facing query model: expressions, the parsed node tree and the parsers between them.

pub mod expression;
pub mod nodes;
pub mod parser;
mod query_builder;
mod query_command;

pub use expression::{BinaryOperator, Expression, Modifier, member, not, value};
pub use nodes::{
    IncludeNode, MemberNode, Node, OperatorKind, OperatorNode, ParsedLambda, SortDirection,
    SortingNode, ValueNode,
};
pub use parser::{IncludeParser, SortingParser, WhereParser};
pub use query_builder::QueryBuilder;
pub use query_command::QueryCommand;

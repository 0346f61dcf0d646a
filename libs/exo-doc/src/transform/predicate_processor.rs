// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    database_error::DatabaseError,
    query::{Node, OperatorKind, OperatorNode, ParsedLambda, ValueNode},
    sql::{Column, Predicate},
    structure::StorageValue,
};

use super::column_resolver::ColumnResolver;

/// Compiles a where lambda into a predicate over the index table columns.
pub struct ParsedWhereSqlProcessor<'a> {
    resolver: &'a ColumnResolver<'a>,
}

impl<'a> ParsedWhereSqlProcessor<'a> {
    pub fn new(resolver: &'a ColumnResolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn process(&self, lambda: &ParsedLambda) -> Result<Predicate, DatabaseError> {
        match lambda.nodes() {
            [root] => self.predicate(root),
            nodes => Err(DatabaseError::UnsupportedExpression(format!(
                "A where lambda must have exactly one root node, got {}",
                nodes.len()
            ))),
        }
    }

    fn predicate(&self, node: &Node) -> Result<Predicate, DatabaseError> {
        let operator = match node {
            Node::Value(ValueNode {
                value: StorageValue::Bool(value),
            }) => return Ok((*value).into()),
            Node::Operator(operator) => operator,
            node => {
                return Err(DatabaseError::UnsupportedExpression(format!(
                    "{node:?} is not a boolean expression"
                )));
            }
        };

        let OperatorNode { kind, children } = operator;

        match (kind, children.as_slice()) {
            (OperatorKind::And, [lhs, rhs]) => {
                Ok(Predicate::and(self.predicate(lhs)?, self.predicate(rhs)?))
            }
            (OperatorKind::Or, [lhs, rhs]) => {
                Ok(Predicate::or(self.predicate(lhs)?, self.predicate(rhs)?))
            }
            (OperatorKind::Not, [inner]) => Ok(!self.predicate(inner)?),

            (OperatorKind::Eq, [lhs, rhs]) => Ok(Predicate::eq(self.column(lhs)?, self.column(rhs)?)),
            (OperatorKind::Neq, [lhs, rhs]) => {
                Ok(Predicate::neq(self.column(lhs)?, self.column(rhs)?))
            }
            (OperatorKind::Lt, [lhs, rhs]) => Ok(Predicate::Lt(self.column(lhs)?, self.column(rhs)?)),
            (OperatorKind::Lte, [lhs, rhs]) => {
                Ok(Predicate::Lte(self.column(lhs)?, self.column(rhs)?))
            }
            (OperatorKind::Gt, [lhs, rhs]) => Ok(Predicate::Gt(self.column(lhs)?, self.column(rhs)?)),
            (OperatorKind::Gte, [lhs, rhs]) => {
                Ok(Predicate::Gte(self.column(lhs)?, self.column(rhs)?))
            }

            (OperatorKind::StartsWith, [target, operand]) => {
                Ok(Predicate::starts_with(self.column(target)?, text(operand)?))
            }
            (OperatorKind::EndsWith, [target, operand]) => {
                Ok(Predicate::ends_with(self.column(target)?, text(operand)?))
            }
            (OperatorKind::Contains, [target, operand]) => {
                Ok(Predicate::contains(self.column(target)?, text(operand)?))
            }
            (OperatorKind::Like, [target, pattern]) => Ok(Predicate::like(
                self.column(target)?,
                Column::Param(StorageValue::String(text(pattern)?.to_string())),
            )),
            (OperatorKind::In, [target, values @ ..]) => Ok(Predicate::in_values(
                self.column(target)?,
                values
                    .iter()
                    .map(|value| self.column(value))
                    .collect::<Result<_, _>>()?,
            )),
            (OperatorKind::IsNull, [target]) => Ok(Predicate::eq(self.column(target)?, Column::Null)),
            (OperatorKind::IsNotNull, [target]) => {
                Ok(Predicate::neq(self.column(target)?, Column::Null))
            }

            (kind, children) => Err(DatabaseError::UnsupportedExpression(format!(
                "{kind:?} with {} operand(s)",
                children.len()
            ))),
        }
    }

    fn column(&self, node: &Node) -> Result<Column, DatabaseError> {
        match node {
            Node::Member(member) => self.resolver.resolve(&member.path),
            Node::Value(ValueNode { value }) => Ok(value.clone().into()),
            node => Err(DatabaseError::UnsupportedExpression(format!(
                "{node:?} cannot be used as an operand"
            ))),
        }
    }
}

fn text(node: &Node) -> Result<&str, DatabaseError> {
    match node {
        Node::Value(ValueNode {
            value: StorageValue::String(value),
        }) => Ok(value),
        node => Err(DatabaseError::UnsupportedExpression(format!(
            "Expected a string operand, got {node:?}"
        ))),
    }
}

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
    query::{
        expression::{Expression, Modifier},
        nodes::{Node, ParsedLambda, SortDirection, SortingNode},
    },
    schema::MemberPath,
};

use super::describe;

const CONTEXT: &str = "sorting";

/// Parses sort expressions such as `member("Name").desc()`.
pub struct SortingParser;

impl SortingParser {
    /// One sorting node per expression, in input order
    pub fn parse(expressions: &[Expression]) -> Result<ParsedLambda, DatabaseError> {
        if expressions.is_empty() {
            return Err(DatabaseError::EmptyInput(CONTEXT));
        }

        expressions
            .iter()
            .map(|expression| {
                let (direction, target) = match expression {
                    Expression::Call {
                        modifier,
                        target,
                        args,
                    } => (direction(*modifier, args)?, target.as_ref()),
                    expression => (SortDirection::Asc, expression),
                };

                Ok(Node::Sorting(SortingNode {
                    path: sorted_member(target)?,
                    direction,
                }))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ParsedLambda::new)
    }
}

fn direction(modifier: Modifier, args: &[Expression]) -> Result<SortDirection, DatabaseError> {
    let direction = match modifier {
        Modifier::Asc => SortDirection::Asc,
        Modifier::Desc => SortDirection::Desc,
        modifier => {
            return Err(DatabaseError::UnsupportedModifier {
                modifier: modifier.name().to_string(),
                context: CONTEXT,
            });
        }
    };

    if !args.is_empty() {
        return Err(DatabaseError::UnsupportedExpression(format!(
            "{} takes no arguments",
            modifier.name()
        )));
    }

    Ok(direction)
}

/// The right-most member of the expression the direction applies to
fn sorted_member(expression: &Expression) -> Result<MemberPath, DatabaseError> {
    match expression {
        Expression::Member(path) => MemberPath::new(path.as_str()),
        // An inner direction (`member("A").asc().desc()`) is overridden by the outer one
        Expression::Call {
            modifier, target, ..
        } if modifier.is_direction() => sorted_member(target),
        Expression::Call { modifier, .. } => Err(DatabaseError::UnsupportedModifier {
            modifier: modifier.name().to_string(),
            context: CONTEXT,
        }),
        expression => Err(DatabaseError::UnsupportedExpression(format!(
            "Cannot sort by {}",
            describe(expression)
        ))),
    }
}

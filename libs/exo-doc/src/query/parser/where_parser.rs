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
        expression::{BinaryOperator, Expression, Modifier},
        nodes::{MemberNode, Node, OperatorKind, OperatorNode, ParsedLambda, ValueNode},
    },
    schema::MemberPath,
    structure::StorageValue,
};

use super::describe;

const CONTEXT: &str = "where";

/// Parses a boolean expression into a lambda with a single root node.
pub struct WhereParser;

impl WhereParser {
    pub fn parse(expression: &Expression) -> Result<ParsedLambda, DatabaseError> {
        match expression {
            Expression::Member(_) => Err(DatabaseError::UnsupportedExpression(format!(
                "{} is not a boolean expression",
                describe(expression)
            ))),
            Expression::Constant(value) if !matches!(value, StorageValue::Bool(_)) => {
                Err(DatabaseError::UnsupportedExpression(format!(
                    "{} is not a boolean expression",
                    describe(expression)
                )))
            }
            expression => Ok(ParsedLambda::new(vec![parse_node(expression)?])),
        }
    }
}

fn parse_node(expression: &Expression) -> Result<Node, DatabaseError> {
    match expression {
        Expression::Member(path) => Ok(Node::Member(MemberNode {
            path: MemberPath::new(path.as_str())?,
        })),
        Expression::Constant(value) => Ok(Node::Value(ValueNode {
            value: value.clone(),
        })),
        Expression::Binary { op, lhs, rhs } => operator(
            binary_kind(*op),
            [lhs.as_ref(), rhs.as_ref()].into_iter(),
        ),
        Expression::Not(inner) => operator(OperatorKind::Not, std::iter::once(inner.as_ref())),
        Expression::Call {
            modifier,
            target,
            args,
        } => {
            let kind = modifier_kind(*modifier)?;

            if modifier.arity().is_some_and(|arity| arity != args.len()) {
                return Err(DatabaseError::UnsupportedExpression(format!(
                    "{} expects {} argument(s), got {}",
                    modifier.name(),
                    modifier.arity().unwrap_or_default(),
                    args.len()
                )));
            }

            operator(kind, std::iter::once(target.as_ref()).chain(args.iter()))
        }
    }
}

fn operator<'a>(
    kind: OperatorKind,
    children: impl Iterator<Item = &'a Expression>,
) -> Result<Node, DatabaseError> {
    Ok(Node::Operator(OperatorNode {
        kind,
        children: children.map(parse_node).collect::<Result<_, _>>()?,
    }))
}

fn binary_kind(op: BinaryOperator) -> OperatorKind {
    match op {
        BinaryOperator::Eq => OperatorKind::Eq,
        BinaryOperator::Neq => OperatorKind::Neq,
        BinaryOperator::Lt => OperatorKind::Lt,
        BinaryOperator::Lte => OperatorKind::Lte,
        BinaryOperator::Gt => OperatorKind::Gt,
        BinaryOperator::Gte => OperatorKind::Gte,
        BinaryOperator::And => OperatorKind::And,
        BinaryOperator::Or => OperatorKind::Or,
    }
}

fn modifier_kind(modifier: Modifier) -> Result<OperatorKind, DatabaseError> {
    match modifier {
        Modifier::StartsWith => Ok(OperatorKind::StartsWith),
        Modifier::EndsWith => Ok(OperatorKind::EndsWith),
        Modifier::Contains => Ok(OperatorKind::Contains),
        Modifier::Like => Ok(OperatorKind::Like),
        Modifier::In => Ok(OperatorKind::In),
        Modifier::IsNull => Ok(OperatorKind::IsNull),
        Modifier::IsNotNull => Ok(OperatorKind::IsNotNull),
        Modifier::Asc | Modifier::Desc => Err(DatabaseError::UnsupportedModifier {
            modifier: modifier.name().to_string(),
            context: CONTEXT,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::expression::{member, value};

    fn member_node(path: &str) -> Node {
        Node::Member(MemberNode {
            path: MemberPath::new(path).unwrap(),
        })
    }

    fn value_node(value: impl Into<StorageValue>) -> Node {
        Node::Value(ValueNode {
            value: value.into(),
        })
    }

    fn operator_node(kind: OperatorKind, children: Vec<Node>) -> Node {
        Node::Operator(OperatorNode { kind, children })
    }

    #[test]
    fn comparisons_and_logic() {
        let lambda = WhereParser::parse(
            &member("Age")
                .gt(value(20))
                .and(!member("Owner.Name").eq(value("Anna"))),
        )
        .unwrap();

        assert_eq!(
            lambda.nodes(),
            &[operator_node(
                OperatorKind::And,
                vec![
                    operator_node(
                        OperatorKind::Gt,
                        vec![member_node("Age"), value_node(20)]
                    ),
                    operator_node(
                        OperatorKind::Not,
                        vec![operator_node(
                            OperatorKind::Eq,
                            vec![member_node("Owner.Name"), value_node("Anna")]
                        )]
                    ),
                ]
            )]
        );
    }

    #[test]
    fn modifiers_become_operators() {
        let lambda = WhereParser::parse(&member("Code").in_values([1, 2, 3])).unwrap();

        assert_eq!(
            lambda.nodes(),
            &[operator_node(
                OperatorKind::In,
                vec![
                    member_node("Code"),
                    value_node(1),
                    value_node(2),
                    value_node(3)
                ]
            )]
        );

        let lambda = WhereParser::parse(&member("Name").starts_with("Da")).unwrap();
        assert_eq!(
            lambda.nodes(),
            &[operator_node(
                OperatorKind::StartsWith,
                vec![member_node("Name"), value_node("Da")]
            )]
        );
    }

    #[test]
    fn direction_modifiers_are_rejected() {
        assert!(matches!(
            WhereParser::parse(&member("Age").desc().eq(value(1))),
            Err(DatabaseError::UnsupportedModifier { modifier, context: "where" }) if modifier == "Desc"
        ));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let expression = member("Name").call(Modifier::StartsWith, vec![]);

        assert!(matches!(
            WhereParser::parse(&expression),
            Err(DatabaseError::UnsupportedExpression(_))
        ));
    }

    #[test]
    fn root_must_be_boolean() {
        assert!(matches!(
            WhereParser::parse(&member("Active")),
            Err(DatabaseError::UnsupportedExpression(_))
        ));
        assert!(matches!(
            WhereParser::parse(&value(3)),
            Err(DatabaseError::UnsupportedExpression(_))
        ));
        assert!(WhereParser::parse(&value(true)).is_ok());
    }
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{database_error::DatabaseError, structure::StorageValue};

/// A modifier call attached to an expression, resolved once when the expression is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Asc,
    Desc,
    StartsWith,
    EndsWith,
    Contains,
    Like,
    In,
    IsNull,
    IsNotNull,
}

impl Modifier {
    const ALL: [Modifier; 9] = [
        Modifier::Asc,
        Modifier::Desc,
        Modifier::StartsWith,
        Modifier::EndsWith,
        Modifier::Contains,
        Modifier::Like,
        Modifier::In,
        Modifier::IsNull,
        Modifier::IsNotNull,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Modifier::Asc => "Asc",
            Modifier::Desc => "Desc",
            Modifier::StartsWith => "StartsWith",
            Modifier::EndsWith => "EndsWith",
            Modifier::Contains => "Contains",
            Modifier::Like => "Like",
            Modifier::In => "In",
            Modifier::IsNull => "IsNull",
            Modifier::IsNotNull => "IsNotNull",
        }
    }

    /// Resolve a modifier by name (case-insensitive, underscores ignored: `starts_with` and
    /// `StartsWith` are the same modifier)
    pub fn from_name(name: &str) -> Result<Self, DatabaseError> {
        let normalized: String = name.chars().filter(|c| *c != '_').collect();

        Self::ALL
            .into_iter()
            .find(|modifier| modifier.name().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| DatabaseError::UnsupportedModifier {
                modifier: name.to_string(),
                context: "expression",
            })
    }

    /// Whether this is a sort direction
    pub fn is_direction(&self) -> bool {
        matches!(self, Modifier::Asc | Modifier::Desc)
    }

    /// The number of arguments the modifier takes, or `None` for any number
    pub fn arity(&self) -> Option<usize> {
        match self {
            Modifier::Asc | Modifier::Desc | Modifier::IsNull | Modifier::IsNotNull => Some(0),
            Modifier::StartsWith | Modifier::EndsWith | Modifier::Contains | Modifier::Like => {
                Some(1)
            }
            Modifier::In => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

/// A caller-built query expression over the members of a document.
///
/// ```ignore
/// member("Age").gte(value(18)).and(member("Name").starts_with("A"))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A (dotted) member path, validated when the expression is parsed
    Member(String),
    Constant(StorageValue),
    Binary {
        op: BinaryOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Not(Box<Expression>),
    Call {
        modifier: Modifier,
        target: Box<Expression>,
        args: Vec<Expression>,
    },
}

pub fn member(path: impl Into<String>) -> Expression {
    Expression::Member(path.into())
}

pub fn value(value: impl Into<StorageValue>) -> Expression {
    Expression::Constant(value.into())
}

pub fn not(expression: Expression) -> Expression {
    Expression::Not(Box::new(expression))
}

impl Expression {
    fn binary(self, op: BinaryOperator, rhs: Expression) -> Expression {
        Expression::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    pub fn eq(self, rhs: Expression) -> Expression {
        self.binary(BinaryOperator::Eq, rhs)
    }

    pub fn neq(self, rhs: Expression) -> Expression {
        self.binary(BinaryOperator::Neq, rhs)
    }

    pub fn lt(self, rhs: Expression) -> Expression {
        self.binary(BinaryOperator::Lt, rhs)
    }

    pub fn lte(self, rhs: Expression) -> Expression {
        self.binary(BinaryOperator::Lte, rhs)
    }

    pub fn gt(self, rhs: Expression) -> Expression {
        self.binary(BinaryOperator::Gt, rhs)
    }

    pub fn gte(self, rhs: Expression) -> Expression {
        self.binary(BinaryOperator::Gte, rhs)
    }

    pub fn and(self, rhs: Expression) -> Expression {
        self.binary(BinaryOperator::And, rhs)
    }

    pub fn or(self, rhs: Expression) -> Expression {
        self.binary(BinaryOperator::Or, rhs)
    }

    /// Apply a modifier call
    pub fn call(self, modifier: Modifier, args: Vec<Expression>) -> Expression {
        Expression::Call {
            modifier,
            target: Box::new(self),
            args,
        }
    }

    pub fn asc(self) -> Expression {
        self.call(Modifier::Asc, vec![])
    }

    pub fn desc(self) -> Expression {
        self.call(Modifier::Desc, vec![])
    }

    pub fn starts_with(self, prefix: impl Into<StorageValue>) -> Expression {
        self.call(Modifier::StartsWith, vec![value(prefix)])
    }

    pub fn ends_with(self, suffix: impl Into<StorageValue>) -> Expression {
        self.call(Modifier::EndsWith, vec![value(suffix)])
    }

    pub fn contains(self, infix: impl Into<StorageValue>) -> Expression {
        self.call(Modifier::Contains, vec![value(infix)])
    }

    /// Match against a pattern with the backend's own `%` and `_` wildcards
    pub fn like(self, pattern: impl Into<StorageValue>) -> Expression {
        self.call(Modifier::Like, vec![value(pattern)])
    }

    pub fn in_values<V: Into<StorageValue>>(self, values: impl IntoIterator<Item = V>) -> Expression {
        self.call(Modifier::In, values.into_iter().map(value).collect())
    }

    pub fn is_null(self) -> Expression {
        self.call(Modifier::IsNull, vec![])
    }

    pub fn is_not_null(self) -> Expression {
        self.call(Modifier::IsNotNull, vec![])
    }
}

impl std::ops::Not for Expression {
    type Output = Expression;

    fn not(self) -> Self::Output {
        not(self)
    }
}

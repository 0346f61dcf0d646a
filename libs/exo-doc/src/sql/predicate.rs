// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::structure::StorageValue;

use super::{ExpressionBuilder, SQLBuilder, column::Column};

/// A predicate is a boolean expression that can be used in a `where` clause.
#[derive(Debug, PartialEq, Clone)]
pub enum Predicate {
    True,
    False,
    Eq(Column, Column),
    Neq(Column, Column),
    Lt(Column, Column),
    Lte(Column, Column),
    Gt(Column, Column),
    Gte(Column, Column),
    In(Column, Vec<Column>),
    Like(Column, Column),

    // Prefer Predicate::and(), which simplifies the clause
    And(Box<Predicate>, Box<Predicate>),
    // Prefer Predicate::or(), which simplifies the clause
    Or(Box<Predicate>, Box<Predicate>),
    // Prefer Predicate::not(), which simplifies the clause
    Not(Box<Predicate>),
}

impl Predicate {
    /// Compare two columns and reduce to a simpler predicate if possible.
    ///
    /// Only two parameters of the same type are folded. Columns may hold nulls, so comparing a
    /// column with itself stays in the query text.
    pub fn eq(lhs: Column, rhs: Column) -> Predicate {
        match lhs.param_eq(&rhs) {
            Some(equal) => equal.into(),
            None => Predicate::Eq(lhs, rhs),
        }
    }

    /// Compare two columns and reduce to a simpler predicate if possible
    pub fn neq(lhs: Column, rhs: Column) -> Predicate {
        !Self::eq(lhs, rhs)
    }

    /// Membership in a list of values. An empty list matches nothing.
    pub fn in_values(lhs: Column, values: Vec<Column>) -> Predicate {
        if values.is_empty() {
            Predicate::False
        } else {
            Predicate::In(lhs, values)
        }
    }

    /// `like` with the caller's pattern, wildcards included
    pub fn like(lhs: Column, pattern: Column) -> Predicate {
        Predicate::Like(lhs, pattern)
    }

    pub fn starts_with(lhs: Column, prefix: &str) -> Predicate {
        Self::like_param(lhs, format!("{}%", escape_like(prefix)))
    }

    pub fn ends_with(lhs: Column, suffix: &str) -> Predicate {
        Self::like_param(lhs, format!("%{}", escape_like(suffix)))
    }

    pub fn contains(lhs: Column, infix: &str) -> Predicate {
        Self::like_param(lhs, format!("%{}%", escape_like(infix)))
    }

    fn like_param(lhs: Column, pattern: String) -> Predicate {
        Predicate::Like(lhs, Column::Param(StorageValue::String(pattern)))
    }

    /// Logical and of two predicates, reducing to a simpler predicate if possible.
    pub fn and(lhs: Predicate, rhs: Predicate) -> Predicate {
        match (lhs, rhs) {
            (Predicate::False, _) | (_, Predicate::False) => Predicate::False,
            (Predicate::True, rhs) => rhs,
            (lhs, Predicate::True) => lhs,
            (lhs, rhs) if lhs == rhs => lhs,
            (lhs, rhs) => Predicate::And(Box::new(lhs), Box::new(rhs)),
        }
    }

    /// Logical or of two predicates, reducing to a simpler predicate if possible.
    pub fn or(lhs: Predicate, rhs: Predicate) -> Predicate {
        match (lhs, rhs) {
            (Predicate::True, _) | (_, Predicate::True) => Predicate::True,
            (Predicate::False, rhs) => rhs,
            (lhs, Predicate::False) => lhs,
            (lhs, rhs) if lhs == rhs => lhs,
            (lhs, rhs) => Predicate::Or(Box::new(lhs), Box::new(rhs)),
        }
    }
}

impl From<bool> for Predicate {
    fn from(b: bool) -> Predicate {
        if b { Predicate::True } else { Predicate::False }
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        match self {
            // Reduced to a simpler form when possible, else fall back to Predicate::Not
            Predicate::True => Predicate::False,
            Predicate::False => Predicate::True,
            Predicate::Eq(lhs, rhs) => Predicate::Neq(lhs, rhs),
            Predicate::Neq(lhs, rhs) => Predicate::Eq(lhs, rhs),
            Predicate::Not(predicate) => *predicate,
            predicate => Predicate::Not(Box::new(predicate)),
        }
    }
}

/// Compare two parameters so that we can reduce a predicate to a boolean before it reaches the
/// query text. `Eq(Param(1), Param(2))`, for example, is always false.
pub trait ParamEquality {
    /// Returns `None` unless both columns are non-null parameters of the same type, otherwise
    /// returns `Some(true)` if the parameters are equal, and `Some(false)` if they are not.
    /// Parameters of different types (`1` and `1.0`) are left for the backend to compare.
    fn param_eq(&self, other: &Self) -> Option<bool>;
}

impl ParamEquality for Column {
    fn param_eq(&self, other: &Self) -> Option<bool> {
        match (self, other) {
            (Column::Param(v1), Column::Param(v2)) => match (v1.data_type(), v2.data_type()) {
                (Some(t1), Some(t2)) if t1 == t2 => Some(v1 == v2),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Escape the `like` metacharacters of a literal operand
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '[' => escaped.push_str("[[]"),
            '%' => escaped.push_str("[%]"),
            '_' => escaped.push_str("[_]"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl ExpressionBuilder for Predicate {
    fn build(&self, builder: &mut SQLBuilder) {
        match self {
            Predicate::True => builder.push_str("1 = 1"),
            Predicate::False => builder.push_str("1 = 0"),
            Predicate::Eq(column1, column2) => null_aware(column1, column2, "=", "is null", builder),
            Predicate::Neq(column1, column2) => {
                null_aware(column1, column2, "<>", "is not null", builder)
            }
            Predicate::Lt(column1, column2) => relational_combine(column1, column2, "<", builder),
            Predicate::Lte(column1, column2) => relational_combine(column1, column2, "<=", builder),
            Predicate::Gt(column1, column2) => relational_combine(column1, column2, ">", builder),
            Predicate::Gte(column1, column2) => relational_combine(column1, column2, ">=", builder),
            Predicate::In(column, values) => {
                column.build(builder);
                builder.push_str(" in (");
                builder.push_elems(values, ", ");
                builder.push(')');
            }
            Predicate::Like(column1, column2) => {
                relational_combine(column1, column2, "like", builder)
            }
            Predicate::And(predicate1, predicate2) => {
                logical_combine(predicate1, predicate2, "and", builder)
            }
            Predicate::Or(predicate1, predicate2) => {
                logical_combine(predicate1, predicate2, "or", builder)
            }
            Predicate::Not(predicate) => {
                builder.push_str("not (");
                predicate.build(builder);
                builder.push(')');
            }
        }
    }
}

/// Comparisons against `null` use `is [not] null`, whichever side the `null` is on
fn null_aware(
    left: &Column,
    right: &Column,
    op: &'static str,
    null_op: &'static str,
    builder: &mut SQLBuilder,
) {
    let operand = match (left, right) {
        (column, Column::Null) | (Column::Null, column) => column,
        _ => return relational_combine(left, right, op, builder),
    };

    operand.build(builder);
    builder.push_space();
    builder.push_str(null_op);
}

/// Combine two expressions with a relational operator.
fn relational_combine<E1: ExpressionBuilder, E2: ExpressionBuilder>(
    left: &E1,
    right: &E2,
    op: &'static str,
    builder: &mut SQLBuilder,
) {
    left.build(builder);
    builder.push_space();
    builder.push_str(op);
    builder.push_space();
    right.build(builder);
}

/// Combine two expressions with a logical binary operator.
fn logical_combine<E1: ExpressionBuilder, E2: ExpressionBuilder>(
    left: &E1,
    right: &E2,
    op: &'static str,
    builder: &mut SQLBuilder,
) {
    builder.push('(');
    left.build(builder);
    builder.push_space();
    builder.push_str(op);
    builder.push_space();
    right.build(builder);
    builder.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::identifier::Identifier;

    fn column(name: &str) -> Column {
        Column::Index(Identifier::new(name).unwrap())
    }

    fn param(value: impl Into<StorageValue>) -> Column {
        Column::Param(value.into())
    }

    #[test]
    fn true_and_false() {
        assert_eq!(Predicate::True.to_sql().0, "1 = 1");
        assert_eq!(Predicate::False.to_sql().0, "1 = 0");
    }

    #[test]
    fn relational() {
        let (sql, params) = Predicate::Gte(column("Age"), param(18)).to_sql();
        assert_eq!(sql, "si.[Age] >= @p0");
        assert_eq!(params, vec![StorageValue::Int(18)]);
    }

    #[test]
    fn null_comparisons() {
        assert_eq!(
            Predicate::eq(column("Name"), Column::Null).to_sql().0,
            "si.[Name] is null"
        );
        assert_eq!(
            Predicate::neq(Column::Null, column("Name")).to_sql().0,
            "si.[Name] is not null"
        );
    }

    #[test]
    fn logical() {
        let predicate = Predicate::or(
            Predicate::and(
                Predicate::eq(column("Name"), param("Anna")),
                Predicate::Lt(column("Age"), param(30)),
            ),
            Predicate::eq(column("City"), param("Lund")),
        );

        let (sql, params) = predicate.to_sql();
        assert_eq!(
            sql,
            "((si.[Name] = @p0 and si.[Age] < @p1) or si.[City] = @p2)"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn simplification() {
        let age = Predicate::Gt(column("Age"), param(1));

        assert_eq!(Predicate::and(Predicate::True, age.clone()), age);
        assert_eq!(Predicate::and(age.clone(), Predicate::False), Predicate::False);
        assert_eq!(Predicate::or(Predicate::False, age.clone()), age);
        assert_eq!(Predicate::or(age.clone(), Predicate::True), Predicate::True);
        assert_eq!(!!age.clone(), age);
        assert_eq!(Predicate::eq(param(1), param(2)), Predicate::False);
        assert_eq!(Predicate::eq(param(1), param(1)), Predicate::True);
    }

    #[test]
    fn folding_keeps_backend_semantics() {
        // null = null is not true in the backend
        assert_eq!(
            Predicate::eq(column("Age"), column("Age")),
            Predicate::Eq(column("Age"), column("Age"))
        );
        assert_eq!(
            Predicate::eq(param(1), param(1.0)).to_sql().0,
            "@p0 = @p1"
        );
        assert_eq!(
            Predicate::eq(param(StorageValue::Null), param(StorageValue::Null)),
            Predicate::Eq(param(StorageValue::Null), param(StorageValue::Null))
        );
        assert_eq!(
            Predicate::neq(param("a"), param("b")),
            Predicate::True
        );
    }

    #[test]
    fn negation() {
        let predicate = !Predicate::Gt(column("Age"), param(1));
        assert_eq!(predicate.to_sql().0, "not (si.[Age] > @p0)");

        let predicate = !Predicate::eq(column("Age"), param(1));
        assert_eq!(predicate.to_sql().0, "si.[Age] <> @p0");
    }

    #[test]
    fn in_values() {
        let (sql, params) =
            Predicate::in_values(column("Age"), vec![param(1), param(2)]).to_sql();
        assert_eq!(sql, "si.[Age] in (@p0, @p1)");
        assert_eq!(params, vec![StorageValue::Int(1), StorageValue::Int(2)]);

        assert_eq!(Predicate::in_values(column("Age"), vec![]), Predicate::False);
    }

    #[test]
    fn string_matching_escapes_metacharacters() {
        let (sql, params) = Predicate::starts_with(column("Code"), "10%_[x]").to_sql();
        assert_eq!(sql, "si.[Code] like @p0");
        assert_eq!(params, vec![StorageValue::from("10[%][_][[]x]%")]);

        let (_, params) = Predicate::ends_with(column("Code"), "AB").to_sql();
        assert_eq!(params, vec![StorageValue::from("%AB")]);

        let (_, params) = Predicate::contains(column("Code"), "B").to_sql();
        assert_eq!(params, vec![StorageValue::from("%B%")]);

        let (_, params) = Predicate::like(column("Code"), param("A_C%")).to_sql();
        assert_eq!(params, vec![StorageValue::from("A_C%")]);
    }
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::database_error::DatabaseError;

use super::{
    expression::Expression,
    nodes::{Node, OperatorKind, OperatorNode, ParsedLambda},
    parser::{IncludeParser, SortingParser, WhereParser},
    query_command::QueryCommand,
};

/// Accumulates the clauses of a query, parsing each one as it is added.
///
/// ```ignore
/// let command = QueryBuilder::new()
///     .filter(member("Age").gte(value(18)))?
///     .sort_by(&[member("Name").desc()])?
///     .include("Owner", &[member("OwnerId")])?
///     .take(10)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct QueryBuilder {
    command: QueryCommand,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a where expression. Multiple expressions are combined with `and`.
    pub fn filter(mut self, expression: Expression) -> Result<Self, DatabaseError> {
        let parsed = WhereParser::parse(&expression)?;

        self.command.where_lambda = Some(match self.command.where_lambda.take() {
            None => parsed,
            Some(existing) => ParsedLambda::new(vec![Node::Operator(OperatorNode {
                kind: OperatorKind::And,
                children: existing.into_nodes().into_iter().chain(parsed.into_nodes()).collect(),
            })]),
        });

        Ok(self)
    }

    /// Add sort expressions after any previously added ones
    pub fn sort_by(mut self, expressions: &[Expression]) -> Result<Self, DatabaseError> {
        let parsed = SortingParser::parse(expressions)?;
        self.command.sortings = Some(append(self.command.sortings.take(), parsed));
        Ok(self)
    }

    /// Inline the bodies of `child_structure_name` structures referenced by the given id members
    pub fn include(
        mut self,
        child_structure_name: &str,
        expressions: &[Expression],
    ) -> Result<Self, DatabaseError> {
        let parsed = IncludeParser::parse(child_structure_name, expressions)?;
        self.command.includes = Some(append(self.command.includes.take(), parsed));
        Ok(self)
    }

    pub fn take(mut self, count: usize) -> Self {
        self.command.take = Some(count);
        self
    }

    pub fn build(self) -> QueryCommand {
        self.command
    }
}

fn append(existing: Option<ParsedLambda>, parsed: ParsedLambda) -> ParsedLambda {
    match existing {
        Some(existing) => existing.merge(parsed),
        None => parsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::expression::{member, value};

    #[test]
    fn clauses_accumulate() {
        let command = QueryBuilder::new()
            .filter(member("Age").gte(value(18)))
            .unwrap()
            .filter(member("Name").is_not_null())
            .unwrap()
            .sort_by(&[member("Name")])
            .unwrap()
            .sort_by(&[member("Age").desc()])
            .unwrap()
            .include("Owner", &[member("OwnerId")])
            .unwrap()
            .include("Category", &[member("CategoryId")])
            .unwrap()
            .take(5)
            .build();

        let where_lambda = command.where_lambda.as_ref().unwrap();
        assert_eq!(where_lambda.len(), 1);
        assert!(matches!(
            &where_lambda.nodes()[0],
            Node::Operator(OperatorNode { kind: OperatorKind::And, children }) if children.len() == 2
        ));
        assert_eq!(command.sortings.as_ref().unwrap().len(), 2);
        assert_eq!(command.includes.as_ref().unwrap().len(), 2);
        assert_eq!(command.take, Some(5));
        assert!(command.has_where() && command.has_sortings() && command.has_includes());
    }

    #[test]
    fn fails_on_first_invalid_clause() {
        let result = QueryBuilder::new()
            .filter(member("Age").gte(value(18)))
            .and_then(|builder| builder.sort_by(&[]))
            .and_then(|builder| builder.include("Owner", &[member("OwnerId")]));

        assert!(matches!(result, Err(DatabaseError::EmptyInput("sorting"))));
    }

    #[test]
    fn empty_builder() {
        let command = QueryBuilder::new().build();

        assert_eq!(command, QueryCommand::default());
        assert!(!command.has_where());
    }
}

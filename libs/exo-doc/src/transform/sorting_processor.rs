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
    query::{Node, ParsedLambda, SortDirection},
    sql::{OrderBy, OrderByElement, Ordering},
};

use super::column_resolver::ColumnResolver;

/// Compiles the sorting nodes of a lambda into an order by clause, in declared order.
pub struct ParsedSortingSqlProcessor<'a> {
    resolver: &'a ColumnResolver<'a>,
}

impl<'a> ParsedSortingSqlProcessor<'a> {
    pub fn new(resolver: &'a ColumnResolver<'a>) -> Self {
        Self { resolver }
    }

    /// `None` when the lambda has no sorting nodes
    pub fn process(&self, lambda: &ParsedLambda) -> Result<Option<OrderBy>, DatabaseError> {
        let elements = lambda
            .nodes()
            .iter()
            .filter_map(|node| match node {
                Node::Sorting(sorting) => Some(sorting),
                _ => None,
            })
            .map(|sorting| {
                let ordering = match sorting.direction {
                    SortDirection::Asc => Ordering::Asc,
                    SortDirection::Desc => Ordering::Desc,
                };
                Ok(OrderByElement(self.resolver.resolve(&sorting.path)?, ordering))
            })
            .collect::<Result<Vec<_>, DatabaseError>>()?;

        Ok((!elements.is_empty()).then_some(OrderBy(elements)))
    }
}

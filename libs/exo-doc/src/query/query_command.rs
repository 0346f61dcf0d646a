// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::nodes::ParsedLambda;

/// A parsed query, ready to be compiled against a structure schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryCommand {
    pub where_lambda: Option<ParsedLambda>,
    pub sortings: Option<ParsedLambda>,
    pub includes: Option<ParsedLambda>,
    pub take: Option<usize>,
}

impl QueryCommand {
    pub fn has_where(&self) -> bool {
        self.where_lambda.is_some()
    }

    pub fn has_sortings(&self) -> bool {
        self.sortings.as_ref().is_some_and(|lambda| !lambda.is_empty())
    }

    pub fn has_includes(&self) -> bool {
        self.includes.as_ref().is_some_and(|lambda| !lambda.is_empty())
    }
}

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
    query::{Node, ParsedLambda},
    schema::structure_table_name,
    sql::{Identifier, SqlInclude},
};

/// Compiles the include nodes of a lambda into correlated sub-selects.
///
/// Non-include nodes are skipped. The k-th include node found becomes `cs<k>`, whatever its
/// position among the other nodes.
pub struct ParsedIncludeSqlProcessor {
    schema_name: Identifier,
}

impl ParsedIncludeSqlProcessor {
    pub fn new(schema_name: Identifier) -> Self {
        Self { schema_name }
    }

    pub fn process(&self, lambda: &ParsedLambda) -> Result<Vec<SqlInclude>, DatabaseError> {
        lambda
            .nodes()
            .iter()
            .filter_map(|node| match node {
                Node::Include(include) => Some(include),
                _ => None,
            })
            .enumerate()
            .map(|(position, include)| {
                Ok(SqlInclude::new(
                    position,
                    self.schema_name.clone(),
                    structure_table_name(&include.child_structure_name)?,
                    include.id_reference_path.column_name().clone(),
                    include.object_reference_path.column_name().clone(),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::{IncludeParser, SortingParser, WhereParser, member, value},
        sql::ExpressionBuilder,
    };

    fn processor() -> ParsedIncludeSqlProcessor {
        ParsedIncludeSqlProcessor::new(Identifier::new("dbo").unwrap())
    }

    #[test]
    fn owner_and_category() {
        let lambda = WhereParser::parse(&member("Name").eq(value("x")))
            .unwrap()
            .merge(IncludeParser::parse("Owner", &[member("OwnerId")]).unwrap())
            .merge(IncludeParser::parse("Category", &[member("CategoryId")]).unwrap());

        let includes: Vec<_> = processor()
            .process(&lambda)
            .unwrap()
            .iter()
            .map(|include| include.to_sql().0)
            .collect();

        assert_eq!(
            includes,
            vec![
                "(select cs0.[json] from [dbo].[OwnerStructure] as cs0 where si.[OwnerId] = cs0.StructureId) as [Owner]",
                "(select cs1.[json] from [dbo].[CategoryStructure] as cs1 where si.[CategoryId] = cs1.StructureId) as [Category]",
            ]
        );
    }

    #[test]
    fn aliases_follow_include_positions_only() {
        // Includes interleaved with sorting nodes: I S I S S I
        let lambda = IncludeParser::parse("A", &[member("AId")])
            .unwrap()
            .merge(SortingParser::parse(&[member("X")]).unwrap())
            .merge(IncludeParser::parse("B", &[member("BId")]).unwrap())
            .merge(SortingParser::parse(&[member("Y"), member("Z").desc()]).unwrap())
            .merge(IncludeParser::parse("C", &[member("CId")]).unwrap());

        let includes = processor().process(&lambda).unwrap();

        assert_eq!(includes.len(), 3);
        for (k, (include, alias)) in includes.iter().zip(["A", "B", "C"]).enumerate() {
            assert_eq!(include.position(), k);
            assert_eq!(include.alias().as_str(), alias);
            assert!(include.sql().starts_with(&format!("(select cs{k}.[json] from [dbo].[{alias}Structure] as cs{k} ")));
        }
    }

    #[test]
    fn no_include_nodes() {
        let lambda = SortingParser::parse(&[member("X")]).unwrap();

        assert!(processor().process(&lambda).unwrap().is_empty());
    }
}

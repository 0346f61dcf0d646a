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
        expression::Expression,
        nodes::{IncludeNode, Node, ParsedLambda},
    },
    schema::{DEFAULT_ID_MEMBER, MemberPath},
    sql::Identifier,
};

use super::describe;

/// Suffixes of id reference members, longest first
const ID_REFERENCE_SUFFIXES: [&str; 2] = [DEFAULT_ID_MEMBER, "Id"];

/// Parses include instructions: each expression names a member of the parent holding the id of a
/// `child_structure_name` structure (`member("OwnerId")`).
pub struct IncludeParser;

impl IncludeParser {
    pub fn parse(
        child_structure_name: &str,
        expressions: &[Expression],
    ) -> Result<ParsedLambda, DatabaseError> {
        if expressions.is_empty() {
            return Err(DatabaseError::EmptyInput("include"));
        }

        let child_structure_name = Identifier::new(child_structure_name)?;

        expressions
            .iter()
            .map(|expression| {
                let Expression::Member(path) = expression else {
                    return Err(DatabaseError::UnsupportedExpression(format!(
                        "Cannot include through {}",
                        describe(expression)
                    )));
                };

                let id_reference_path = MemberPath::new(path.as_str())?;
                let object_reference_path = object_reference_path(&id_reference_path)?;

                Ok(Node::Include(IncludeNode {
                    id_reference_path,
                    child_structure_name: child_structure_name.clone(),
                    object_reference_path,
                }))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ParsedLambda::new)
    }
}

/// `OwnerId` -> `Owner`, `Order.CustomerStructureId` -> `Order.Customer`
fn object_reference_path(id_reference_path: &MemberPath) -> Result<MemberPath, DatabaseError> {
    let path = id_reference_path.as_str();

    ID_REFERENCE_SUFFIXES
        .iter()
        .find_map(|suffix| path.strip_suffix(suffix))
        .filter(|stripped| !stripped.is_empty() && !stripped.ends_with('.'))
        .map(MemberPath::new)
        .transpose()?
        .ok_or_else(|| {
            DatabaseError::UnsupportedExpression(format!(
                "'{path}' does not reference an id (expected a member ending with 'Id' or 'StructureId')"
            ))
        })
}

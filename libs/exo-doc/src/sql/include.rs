// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::schema::STRUCTURE_ID_COLUMN;

use super::{ExpressionBuilder, SQLBuilder, column::INDEX_ALIAS, identifier::Identifier};

const CHILD_ALIAS_PREFIX: &str = "cs";

/// A correlated sub-select inlining the body of a referenced child structure:
///
/// `(select cs<k>.[json] from [<schema>].[<Child>Structure] as cs<k> where si.[<IdReference>] = cs<k>.StructureId) as [<Alias>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlInclude {
    /// Position among the includes of one query; determines the `cs<k>` alias
    position: usize,
    schema_name: Identifier,
    child_table: Identifier,
    id_reference: Identifier,
    alias: Identifier,
}

impl SqlInclude {
    pub fn new(
        position: usize,
        schema_name: Identifier,
        child_table: Identifier,
        id_reference: Identifier,
        alias: Identifier,
    ) -> Self {
        Self {
            position,
            schema_name,
            child_table,
            id_reference,
            alias,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The column alias the child body is exposed under
    pub fn alias(&self) -> &Identifier {
        &self.alias
    }

    pub fn child_alias(&self) -> String {
        format!("{CHILD_ALIAS_PREFIX}{}", self.position)
    }

    /// The fragment as query text (includes never carry parameters)
    pub fn sql(&self) -> String {
        self.to_sql().0
    }
}

impl ExpressionBuilder for SqlInclude {
    fn build(&self, builder: &mut SQLBuilder) {
        let child_alias = self.child_alias();

        builder.push_str("(select ");
        builder.push_str(&child_alias);
        builder.push_str(".[json] from ");
        builder.push_table(&self.schema_name, &self.child_table);
        builder.push_str(" as ");
        builder.push_str(&child_alias);
        builder.push_str(" where ");
        builder.push_column(INDEX_ALIAS, &self.id_reference);
        builder.push_str(" = ");
        builder.push_str(&child_alias);
        builder.push('.');
        builder.push_str(STRUCTURE_ID_COLUMN);
        builder.push_str(") as ");
        builder.push_identifier(&self.alias);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment() {
        let include = SqlInclude::new(
            2,
            Identifier::new("dbo").unwrap(),
            Identifier::new("OwnerStructure").unwrap(),
            Identifier::new("OwnerId").unwrap(),
            Identifier::new("Owner").unwrap(),
        );

        assert_eq!(
            include.sql(),
            "(select cs2.[json] from [dbo].[OwnerStructure] as cs2 where si.[OwnerId] = cs2.StructureId) as [Owner]"
        );
        assert_eq!(include.alias().as_str(), "Owner");
        assert_eq!(include.child_alias(), "cs2");
    }
}

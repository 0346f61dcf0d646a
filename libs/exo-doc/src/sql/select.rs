// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    schema::{JSON_COLUMN, STRUCTURE_ID_COLUMN},
    structure::{StorageValue, StructureId},
};

use super::{
    ExpressionBuilder, SQLBuilder,
    column::{INDEX_ALIAS, STRUCTURE_ALIAS},
    identifier::Identifier,
    include::SqlInclude,
    order::OrderBy,
    predicate::Predicate,
};

/// Query text together with the parameters its placeholders refer to
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<StorageValue>,
}

impl SqlQuery {
    pub fn from_expression(expression: &impl ExpressionBuilder) -> Self {
        let mut builder = SQLBuilder::new();
        expression.build(&mut builder);
        let (sql, params) = builder.into_sql();
        Self { sql, params }
    }
}

/// Selection of structure bodies, filtered and sorted through the index table
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub schema_name: Identifier,
    pub structure_table: Identifier,
    pub index_table: Identifier,
    /// Child bodies appended to the selected columns
    pub includes: Vec<SqlInclude>,
    pub predicate: Predicate,
    pub order_by: Option<OrderBy>,
    pub take: Option<usize>,
}

impl ExpressionBuilder for Select {
    fn build(&self, builder: &mut SQLBuilder) {
        let json_column = Identifier::from_static(JSON_COLUMN);
        let id_column = Identifier::from_static(STRUCTURE_ID_COLUMN);

        builder.push_str("select ");
        if let Some(take) = self.take {
            builder.push_str(format!("top({take}) "));
        }
        builder.push_column(STRUCTURE_ALIAS, &json_column);
        for include in &self.includes {
            builder.push_str(", ");
            include.build(builder);
        }

        builder.push_str(" from ");
        builder.push_table(&self.schema_name, &self.structure_table);
        builder.push_str(" as ");
        builder.push_str(STRUCTURE_ALIAS);
        builder.push_str(" inner join ");
        builder.push_table(&self.schema_name, &self.index_table);
        builder.push_str(" as ");
        builder.push_str(INDEX_ALIAS);
        builder.push_str(" on ");
        builder.push_column(INDEX_ALIAS, &id_column);
        builder.push_str(" = ");
        builder.push_column(STRUCTURE_ALIAS, &id_column);

        // Avoid correct, but inelegant "where 1 = 1" clause
        if self.predicate != Predicate::True {
            builder.push_str(" where ");
            self.predicate.build(builder);
        }
        if let Some(order_by) = &self.order_by {
            builder.push_space();
            order_by.build(builder);
        }
    }
}

/// Selection of one structure body by id
#[derive(Debug, Clone, PartialEq)]
pub struct SelectById {
    pub schema_name: Identifier,
    pub structure_table: Identifier,
    pub id: StructureId,
}

impl ExpressionBuilder for SelectById {
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("select ");
        builder.push_column(STRUCTURE_ALIAS, &Identifier::from_static(JSON_COLUMN));
        builder.push_str(" from ");
        builder.push_table(&self.schema_name, &self.structure_table);
        builder.push_str(" as ");
        builder.push_str(STRUCTURE_ALIAS);
        builder.push_str(" where ");
        builder.push_column(STRUCTURE_ALIAS, &Identifier::from_static(STRUCTURE_ID_COLUMN));
        builder.push_str(" = ");
        builder.push_param(self.id.to_storage_value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{
        column::Column,
        order::{OrderByElement, Ordering},
    };

    fn identifier(name: &str) -> Identifier {
        Identifier::new(name).unwrap()
    }

    fn select() -> Select {
        Select {
            schema_name: identifier("dbo"),
            structure_table: identifier("CustomerStructure"),
            index_table: identifier("CustomerIndex"),
            includes: vec![],
            predicate: Predicate::True,
            order_by: None,
            take: None,
        }
    }

    #[test]
    fn plain() {
        assert_eq!(
            SqlQuery::from_expression(&select()).sql,
            "select s.[Json] from [dbo].[CustomerStructure] as s inner join [dbo].[CustomerIndex] as si on si.[StructureId] = s.[StructureId]"
        );
    }

    #[test]
    fn all_clauses() {
        let select = Select {
            includes: vec![SqlInclude::new(
                0,
                identifier("dbo"),
                identifier("OwnerStructure"),
                identifier("OwnerId"),
                identifier("Owner"),
            )],
            predicate: Predicate::Gt(
                Column::Index(identifier("Age")),
                Column::Param(StorageValue::Int(30)),
            ),
            order_by: Some(OrderBy(vec![OrderByElement(
                Column::Index(identifier("Name")),
                Ordering::Desc,
            )])),
            take: Some(10),
            ..select()
        };

        let query = SqlQuery::from_expression(&select);
        assert_eq!(
            query.sql,
            "select top(10) s.[Json], (select cs0.[json] from [dbo].[OwnerStructure] as cs0 where si.[OwnerId] = cs0.StructureId) as [Owner] from [dbo].[CustomerStructure] as s inner join [dbo].[CustomerIndex] as si on si.[StructureId] = s.[StructureId] where si.[Age] > @p0 order by si.[Name] desc"
        );
        assert_eq!(query.params, vec![StorageValue::Int(30)]);
    }

    #[test]
    fn by_id() {
        let query = SqlQuery::from_expression(&SelectById {
            schema_name: identifier("dbo"),
            structure_table: identifier("CustomerStructure"),
            id: StructureId::Identity(42),
        });

        assert_eq!(
            query.sql,
            "select s.[Json] from [dbo].[CustomerStructure] as s where s.[StructureId] = @p0"
        );
        assert_eq!(query.params, vec![StorageValue::Int(42)]);
    }
}

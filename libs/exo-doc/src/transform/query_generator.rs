// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing::debug;

use crate::{
    database_error::DatabaseError,
    query::{Node, QueryCommand},
    schema::{StructureSchema, index_table_name, structure_table_name},
    sql::{Identifier, Predicate, Select, SelectById, SqlQuery},
    structure::StructureId,
};

use super::{
    column_resolver::ColumnResolver, include_processor::ParsedIncludeSqlProcessor,
    predicate_processor::ParsedWhereSqlProcessor, sorting_processor::ParsedSortingSqlProcessor,
};

/// Compiles query commands into query text for one namespace.
#[derive(Debug, Clone)]
pub struct QueryGenerator {
    schema_name: Identifier,
}

impl QueryGenerator {
    pub fn new(schema_name: Identifier) -> Self {
        Self { schema_name }
    }

    pub fn schema_name(&self) -> &Identifier {
        &self.schema_name
    }

    pub fn generate(
        &self,
        schema: &StructureSchema,
        command: &QueryCommand,
    ) -> Result<SqlQuery, DatabaseError> {
        let resolver = ColumnResolver::new(schema);

        let predicate = match &command.where_lambda {
            Some(lambda) => ParsedWhereSqlProcessor::new(&resolver).process(lambda)?,
            None => Predicate::True,
        };

        let order_by = match &command.sortings {
            Some(lambda) => ParsedSortingSqlProcessor::new(&resolver).process(lambda)?,
            None => None,
        };

        let includes = match &command.includes {
            Some(lambda) => {
                // The sub-selects correlate on index columns, so the references must be indexed
                for node in lambda.nodes() {
                    if let Node::Include(include) = node {
                        resolver.resolve_index_column(&include.id_reference_path)?;
                    }
                }
                ParsedIncludeSqlProcessor::new(self.schema_name.clone()).process(lambda)?
            }
            None => vec![],
        };

        let select = Select {
            schema_name: self.schema_name.clone(),
            structure_table: structure_table_name(schema.name())?,
            index_table: index_table_name(schema.name())?,
            includes,
            predicate,
            order_by,
            take: command.take,
        };

        let query = SqlQuery::from_expression(&select);
        debug!(structure = %schema.name(), sql = %query.sql, params = query.params.len(), "Generated query");
        Ok(query)
    }

    pub fn get_by_id(
        &self,
        schema: &StructureSchema,
        id: StructureId,
    ) -> Result<SqlQuery, DatabaseError> {
        let expected = schema.id_strategy().data_type();
        if id.data_type() != expected {
            return Err(DatabaseError::InvalidValue {
                path: schema.id_member().to_string(),
                expected: expected.name().to_string(),
            }
            .with_context(format!("While looking up a '{}' by id:", schema.name())));
        }

        Ok(SqlQuery::from_expression(&SelectById {
            schema_name: self.schema_name.clone(),
            structure_table: structure_table_name(schema.name())?,
            id,
        }))
    }
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::structure::StorageValue;

use super::{ExpressionBuilder, identifier::Identifier};

/// Prefix of parameter placeholders (`@p0`, `@p1`, ...)
pub const PARAM_PREFIX: &str = "@p";

pub struct SQLBuilder {
    /// The SQL being built with placeholders for each parameter
    sql: String,
    /// The list of parameters, in placeholder order
    params: Vec<StorageValue>,
}

impl SQLBuilder {
    pub fn new() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a string
    pub fn push_str<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push_str(s.as_ref());
    }

    /// Push a character
    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Push a bracket-quoted identifier (`[name]`). Only validated identifiers are accepted, so the
    /// brackets can never be closed early.
    pub fn push_identifier(&mut self, identifier: &Identifier) {
        self.sql.push('[');
        self.sql.push_str(identifier.as_str());
        self.sql.push(']');
    }

    /// Push `[<schema>].[<table>]`
    pub fn push_table(&mut self, schema_name: &Identifier, table_name: &Identifier) {
        self.push_identifier(schema_name);
        self.push('.');
        self.push_identifier(table_name);
    }

    /// Push `<alias>.[<column>]`
    pub fn push_column(&mut self, table_alias: &str, column_name: &Identifier) {
        self.push_str(table_alias);
        self.push('.');
        self.push_identifier(column_name);
    }

    /// Push a space. This is a common operation, so it is provided as a separate method.
    pub fn push_space(&mut self) {
        self.sql.push(' ');
    }

    /// Push a parameter, which will be replaced with a placeholder in the SQL string
    /// and the parameter will be added to the list of parameters.
    pub fn push_param(&mut self, param: StorageValue) {
        self.sql.push_str(PARAM_PREFIX);
        self.sql.push_str(&self.params.len().to_string());
        self.params.push(param);
    }

    /// Push elements of an iterator, separated by `sep`. The `push_elem` function maps each
    /// element onto the builder.
    pub fn push_iter<T>(
        &mut self,
        iter: impl Iterator<Item = T>,
        sep: &str,
        push_elem: impl Fn(&mut Self, T),
    ) {
        for (i, item) in iter.enumerate() {
            if i > 0 {
                self.sql.push_str(sep);
            }
            push_elem(self, item);
        }
    }

    /// Push elements of a slice, separated by `sep`.
    pub fn push_elems<T: ExpressionBuilder>(&mut self, elems: &[T], sep: &str) {
        self.push_iter(elems.iter(), sep, |builder, elem| {
            elem.build(builder);
        });
    }

    /// Get the SQL string and the list of parameters. Calling this method should be the final step
    /// in building an SQL expression, and thus this builder consumes the `self`.
    pub fn into_sql(self) -> (String, Vec<StorageValue>) {
        (self.sql, self.params)
    }
}

impl Default for SQLBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_numbered_from_zero() {
        let mut builder = SQLBuilder::new();
        builder.push_column("si", &Identifier::new("Age").unwrap());
        builder.push_str(" between ");
        builder.push_param(18.into());
        builder.push_str(" and ");
        builder.push_param(65.into());

        let (sql, params) = builder.into_sql();
        assert_eq!(sql, "si.[Age] between @p0 and @p1");
        assert_eq!(params, vec![StorageValue::Int(18), StorageValue::Int(65)]);
    }

    #[test]
    fn tables_are_qualified() {
        let mut builder = SQLBuilder::new();
        builder.push_table(
            &Identifier::new("dbo").unwrap(),
            &Identifier::new("CustomerStructure").unwrap(),
        );

        assert_eq!(builder.into_sql().0, "[dbo].[CustomerStructure]");
    }
}

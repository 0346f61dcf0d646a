// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{ExpressionBuilder, SQLBuilder, column::Column};

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum Ordering {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByElement(pub Column, pub Ordering);

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy(pub Vec<OrderByElement>);

impl ExpressionBuilder for OrderByElement {
    fn build(&self, builder: &mut SQLBuilder) {
        self.0.build(builder);
        builder.push_space();

        if self.1 == Ordering::Asc {
            builder.push_str("asc");
        } else {
            builder.push_str("desc");
        }
    }
}

impl ExpressionBuilder for OrderBy {
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("order by ");
        builder.push_elems(&self.0, ", ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::identifier::Identifier;

    fn column(name: &str) -> Column {
        Column::Index(Identifier::new(name).unwrap())
    }

    #[test]
    fn single() {
        let order_by = OrderBy(vec![OrderByElement(column("Age"), Ordering::Desc)]);

        assert_eq!(order_by.to_sql().0, "order by si.[Age] desc");
    }

    #[test]
    fn multiple() {
        {
            let order_by = OrderBy(vec![
                OrderByElement(column("Name"), Ordering::Asc),
                OrderByElement(column("Age"), Ordering::Desc),
            ]);

            assert_eq!(
                order_by.to_sql().0,
                "order by si.[Name] asc, si.[Age] desc"
            );
        }

        // Reverse the order and it should be reflected in the statement
        {
            let order_by = OrderBy(vec![
                OrderByElement(column("Age"), Ordering::Desc),
                OrderByElement(column("Name"), Ordering::Asc),
            ]);

            assert_eq!(
                order_by.to_sql().0,
                "order by si.[Age] desc, si.[Name] asc"
            );
        }
    }
}

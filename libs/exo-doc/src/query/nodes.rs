// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    schema::MemberPath,
    sql::Identifier,
    structure::StorageValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
    Not,
    StartsWith,
    EndsWith,
    Contains,
    Like,
    In,
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberNode {
    pub path: MemberPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    pub value: StorageValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorNode {
    pub kind: OperatorKind,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortingNode {
    pub path: MemberPath,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncludeNode {
    /// Member of the parent holding the id of the child
    pub id_reference_path: MemberPath,
    pub child_structure_name: Identifier,
    /// Name the child body is exposed under
    pub object_reference_path: MemberPath,
}

/// A parsed query fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Member(MemberNode),
    Value(ValueNode),
    Operator(OperatorNode),
    Sorting(SortingNode),
    Include(IncludeNode),
}

impl Node {
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Operator(node) => &node.children,
            _ => &[],
        }
    }

    /// Pre-order traversal
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

/// The nodes parsed from one or more expressions, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLambda {
    nodes: Vec<Node>,
}

impl ParsedLambda {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append the nodes of `other` after the nodes of `self`
    pub fn merge(mut self, other: ParsedLambda) -> ParsedLambda {
        self.nodes.extend(other.nodes);
        self
    }

    /// Every node, including nested ones, in pre-order
    pub fn descendants(&self) -> Vec<&Node> {
        let mut nodes = vec![];
        for node in &self.nodes {
            node.walk(&mut |node| nodes.push(node));
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(path: &str) -> Node {
        Node::Member(MemberNode {
            path: MemberPath::new(path).unwrap(),
        })
    }

    #[test]
    fn pre_order_traversal() {
        let lambda = ParsedLambda::new(vec![Node::Operator(OperatorNode {
            kind: OperatorKind::And,
            children: vec![
                Node::Operator(OperatorNode {
                    kind: OperatorKind::IsNull,
                    children: vec![member("Name")],
                }),
                member("Active"),
            ],
        })]);

        let kinds: Vec<_> = lambda
            .descendants()
            .into_iter()
            .map(|node| match node {
                Node::Operator(node) => format!("{:?}", node.kind),
                Node::Member(node) => node.path.to_string(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(kinds, vec!["And", "IsNull", "Name", "Active"]);
    }

    #[test]
    fn merge_keeps_order() {
        let merged = ParsedLambda::new(vec![member("A")]).merge(ParsedLambda::new(vec![member("B")]));

        assert_eq!(merged.nodes(), &[member("A"), member("B")]);
    }
}

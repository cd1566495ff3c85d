//! Flat dotted paths → rooted tree.
//!
//! Every prefix of every path becomes a node, linked under its immediate
//! prefix exactly once. Parsing is best-effort: a path with an empty
//! segment (`A..B`, trailing dot) keeps the prefixes before the bad
//! segment and drops the rest.

use std::collections::{HashMap, VecDeque};

use super::table::Row;
use super::{Node, NodeId, Taxonomy};
use crate::error::{AtlasError, Result};

#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    by_path: HashMap<String, NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from table rows, rooted at the top-level segment `root_name`.
    pub fn from_rows(rows: &[Row], root_name: &str) -> Result<Taxonomy> {
        let mut builder = Self::new();
        for row in rows {
            builder.insert_path(&row.id);
        }
        builder.finish(root_name)
    }

    /// Build from bare path strings.
    pub fn from_ids<'a>(
        ids: impl IntoIterator<Item = &'a str>,
        root_name: &str,
    ) -> Result<Taxonomy> {
        let mut builder = Self::new();
        for id in ids {
            builder.insert_path(id);
        }
        builder.finish(root_name)
    }

    /// Insert every prefix of `path`.
    pub fn insert_path(&mut self, path: &str) {
        let mut prefix = String::with_capacity(path.len());
        let mut parent: Option<NodeId> = None;

        for segment in path.split('.') {
            let segment = segment.trim();
            if segment.is_empty() {
                log::warn!("malformed taxonomy path `{}`: empty segment, truncated", path);
                return;
            }
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);

            let id = match self.by_path.get(&prefix) {
                Some(&id) => id,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(Node::new(segment, &prefix));
                    self.by_path.insert(prefix.clone(), id);
                    id
                }
            };

            // Link once: a node that already has its parent is left alone.
            if let Some(p) = parent {
                if self.nodes[id].parent.is_none() {
                    self.nodes[id].parent = Some(p);
                    self.nodes[p].children.push(id);
                }
            }
            parent = Some(id);
        }
    }

    /// Pick the top-level node named `root_name` and compact its subtree
    /// into a fresh arena. Other top-level trees are discarded.
    pub fn finish(self, root_name: &str) -> Result<Taxonomy> {
        let root = self
            .nodes
            .iter()
            .position(|n| n.parent.is_none() && n.name == root_name)
            .ok_or_else(|| AtlasError::RootNotFound(root_name.to_string()))?;

        let discarded = self
            .nodes
            .iter()
            .filter(|n| n.parent.is_none() && n.name != root_name)
            .count();
        if discarded > 0 {
            log::warn!("{} top-level entries outside `{}` ignored", discarded, root_name);
        }

        // Breadth-first renumbering keeps children in insertion order.
        let mut remap: HashMap<NodeId, NodeId> = HashMap::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([root]);
        while let Some(old) = queue.pop_front() {
            remap.insert(old, order.len());
            order.push(old);
            queue.extend(self.nodes[old].children.iter().copied());
        }

        let nodes = order
            .iter()
            .map(|&old| {
                let src = &self.nodes[old];
                let mut node = Node::new(&src.name, &src.full_path);
                node.parent = src.parent.and_then(|p| remap.get(&p).copied());
                node.children = src.children.iter().map(|c| remap[c]).collect();
                node
            })
            .collect();

        Ok(Taxonomy::from_nodes(nodes))
    }
}

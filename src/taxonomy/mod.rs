//! Taxonomy tree: an arena of nodes addressed by `NodeId`.
//!
//! Parents own their children through the `children` id lists; the
//! `parent` field is a plain back-reference. Node ids are dense indices
//! into `Taxonomy::nodes`, with the root always at index 0.

pub mod builder;
pub mod depth;
pub mod table;

use std::collections::HashMap;

use egui::Pos2;

pub type NodeId = usize;

/// One taxonomy entry.
#[derive(Debug, Clone)]
pub struct Node {
    /// Last dotted segment.
    pub name: String,
    /// Full dotted path, unique within the tree.
    pub full_path: String,
    pub(crate) depth: Option<u8>,
    /// Angle on the node's ring, degrees in [0, 360).
    pub angle_deg: f32,
    /// World-space position, derived from depth and angle.
    pub pos: Pos2,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(name: &str, full_path: &str) -> Self {
        Self {
            name: name.to_string(),
            full_path: full_path.to_string(),
            depth: None,
            angle_deg: 0.0,
            pos: Pos2::ZERO,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Ring index. Nodes not yet visited by the depth pass report 0.
    pub fn depth(&self) -> u8 {
        self.depth.unwrap_or(0)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rooted taxonomy tree.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl Taxonomy {
    /// Build from nodes already laid out with the root at index 0.
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(id, n)| (n.full_path.clone(), id))
            .collect();
        Self { nodes, index }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    pub fn find_by_path(&self, full_path: &str) -> Option<NodeId> {
        self.index.get(full_path).copied()
    }

    /// Ids of every node on ring `depth`, in arena order.
    pub fn at_depth(&self, depth: u8) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, n)| n.depth() == depth)
            .map(|(id, _)| id)
            .collect()
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.nodes[id].parent;
        while let Some(p) = cur {
            out.push(p);
            cur = self.nodes[p].parent;
        }
        out
    }

    /// Nearest node to `world` whose disc (per-depth radius, plus `slop`)
    /// contains it. `interactive` filters candidates.
    pub fn hit_test(
        &self,
        world: Pos2,
        node_radii: &[f32],
        slop: f32,
        interactive: impl Fn(&Node) -> bool,
    ) -> Option<NodeId> {
        let mut best: Option<(NodeId, f32)> = None;
        for (id, node) in self.iter() {
            if !interactive(node) {
                continue;
            }
            let r = node_radii
                .get(node.depth() as usize)
                .copied()
                .unwrap_or(0.0)
                + slop;
            let d2 = node.pos.distance_sq(world);
            if d2 <= r * r && best.map_or(true, |(_, b)| d2 < b) {
                best = Some((id, d2));
            }
        }
        best.map(|(id, _)| id)
    }
}

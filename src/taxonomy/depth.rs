//! Ring assignment.
//!
//! Breadth-first from the root: a child sits one ring outside its parent,
//! except that media-type names are pinned to ring 4 and children of a
//! ring-4 node go to ring 5. Everything is clamped to ring 5. The
//! parent-on-ring-4 rule is applied after the media-type rule.

use std::collections::{HashSet, VecDeque};

use super::Taxonomy;
use crate::config::RING_COUNT;

pub const MEDIA_RING: u8 = 4;
pub const LEAF_RING: u8 = (RING_COUNT - 1) as u8;

pub struct DepthAssigner {
    media_types: HashSet<String>,
}

impl DepthAssigner {
    pub fn new<S: AsRef<str>>(media_types: &[S]) -> Self {
        Self {
            media_types: media_types.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    pub fn is_media_type(&self, name: &str) -> bool {
        self.media_types.contains(name)
    }

    /// Ring for a child of a node on `parent_depth`.
    pub fn child_depth(&self, parent_depth: u8, child_name: &str) -> u8 {
        let mut depth = parent_depth.saturating_add(1);
        if self.is_media_type(child_name) {
            depth = MEDIA_RING;
        }
        if parent_depth == MEDIA_RING {
            depth = LEAF_RING;
        }
        depth.min(LEAF_RING)
    }

    /// Assign a ring to every node reachable from the root. A node keeps
    /// the first depth it receives. Returns node counts per ring.
    pub fn assign(&self, tax: &mut Taxonomy) -> [usize; RING_COUNT] {
        let mut counts = [0usize; RING_COUNT];
        let root = tax.root();
        if tax.is_empty() {
            return counts;
        }
        tax.node_mut(root).depth = Some(0);
        counts[0] = 1;

        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            let parent_depth = tax.node(id).depth();
            let children = tax.node(id).children.clone();
            for child in children {
                if tax.node(child).depth.is_some() {
                    continue;
                }
                let depth = self.child_depth(parent_depth, &tax.node(child).name);
                tax.node_mut(child).depth = Some(depth);
                counts[depth as usize] += 1;
                queue.push_back(child);
            }
        }
        counts
    }
}

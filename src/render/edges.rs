//! Edge routing between a node and its parent.
//!
//! Each edge is one cubic S-curve whose control points sit at the midpoint
//! radius, the first on the parent's angle and the second on the child's.
//! Leaf-ring edges take two legs: out from the parent along the parent's
//! angle to the collar radius, then across to the leaf with both control
//! points on the leaf's angle.

use egui::Pos2;

use super::layout::RadialGeometry;
use crate::taxonomy::depth::LEAF_RING;
use crate::taxonomy::{NodeId, Taxonomy};

/// One cubic Bézier: start, two control points, end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub points: [Pos2; 4],
}

impl CubicSegment {
    pub fn start(&self) -> Pos2 {
        self.points[0]
    }

    pub fn end(&self) -> Pos2 {
        self.points[3]
    }

    /// Point at parameter `t` in [0, 1].
    pub fn sample(&self, t: f32) -> Pos2 {
        let [p0, p1, p2, p3] = self.points;
        let u = 1.0 - t;
        let w0 = u * u * u;
        let w1 = 3.0 * u * u * t;
        let w2 = 3.0 * u * t * t;
        let w3 = t * t * t;
        Pos2::new(
            w0 * p0.x + w1 * p1.x + w2 * p2.x + w3 * p3.x,
            w0 * p0.y + w1 * p1.y + w2 * p2.y + w3 * p3.y,
        )
    }
}

/// Routed path from `parent` to `child`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub parent: NodeId,
    pub child: NodeId,
    pub segments: Vec<CubicSegment>,
}

impl EdgePath {
    pub fn start(&self) -> Option<Pos2> {
        self.segments.first().map(CubicSegment::start)
    }

    pub fn end(&self) -> Option<Pos2> {
        self.segments.last().map(CubicSegment::end)
    }
}

/// Cubic from `start` to `end` with its control points at radius `mid`,
/// on angles `c1_deg` and `c2_deg`.
fn cubic(
    geometry: &RadialGeometry,
    start: Pos2,
    (c1_deg, c2_deg): (f32, f32),
    mid: f32,
    end: Pos2,
) -> CubicSegment {
    CubicSegment {
        points: [
            start,
            geometry.polar(c1_deg, mid),
            geometry.polar(c2_deg, mid),
            end,
        ],
    }
}

/// Route the edge into `child`. `None` for the root.
pub fn route_edge(
    tax: &Taxonomy,
    child: NodeId,
    geometry: &RadialGeometry,
    collar_offset: f32,
) -> Option<EdgePath> {
    let node = tax.node(child);
    let parent_id = node.parent?;
    let parent = tax.node(parent_id);

    let r_parent = geometry.ring_radius(parent.depth());
    let r_child = geometry.ring_radius(node.depth());
    let (a_parent, a_child) = (parent.angle_deg, node.angle_deg);

    let segments = if node.depth() == LEAF_RING {
        let r_collar = r_parent + collar_offset;
        let collar = geometry.polar(a_parent, r_collar);
        vec![
            cubic(
                geometry,
                parent.pos,
                (a_parent, a_parent),
                (r_parent + r_collar) * 0.5,
                collar,
            ),
            cubic(
                geometry,
                collar,
                (a_child, a_child),
                (r_collar + r_child) * 0.5,
                node.pos,
            ),
        ]
    } else {
        vec![cubic(
            geometry,
            parent.pos,
            (a_parent, a_child),
            (r_parent + r_child) * 0.5,
            node.pos,
        )]
    };

    Some(EdgePath {
        parent: parent_id,
        child,
        segments,
    })
}

/// Route every parent→child edge, in arena order.
pub fn route_all(tax: &Taxonomy, geometry: &RadialGeometry, collar_offset: f32) -> Vec<EdgePath> {
    (0..tax.len())
        .filter_map(|id| route_edge(tax, id, geometry, collar_offset))
        .collect()
}

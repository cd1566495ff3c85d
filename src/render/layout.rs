//! Radial layout: one ring per depth, nodes spread evenly by path order.

use egui::{pos2, Pos2};

use crate::config::{AtlasConfig, RING_COUNT};
use crate::taxonomy::{Node, Taxonomy};

/// Fixed centre and per-ring radii of the diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGeometry {
    pub center: Pos2,
    pub ring_radii: [f32; RING_COUNT],
}

impl RadialGeometry {
    pub fn from_config(config: &AtlasConfig) -> Self {
        Self {
            center: pos2(config.center[0], config.center[1]),
            ring_radii: config.ring_radii,
        }
    }

    pub fn ring_radius(&self, depth: u8) -> f32 {
        self.ring_radii[(depth as usize).min(RING_COUNT - 1)]
    }

    /// Point at `radius` along `angle_deg`, with 0° pointing up.
    pub fn polar(&self, angle_deg: f32, radius: f32) -> Pos2 {
        polar_to_cartesian(self.center, angle_deg, radius)
    }

    pub fn node_position(&self, node: &Node) -> Pos2 {
        self.polar(node.angle_deg, self.ring_radius(node.depth()))
    }
}

/// Angle/radius → Cartesian around `center`. 0° is straight up and angles
/// grow clockwise in screen space (y down).
pub fn polar_to_cartesian(center: Pos2, angle_deg: f32, radius: f32) -> Pos2 {
    let rad = (angle_deg - 90.0).to_radians();
    pos2(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

/// Assign `angle_deg` per ring: nodes on a ring are sorted by full path
/// and spaced `360 / count` apart. The root stays at 0°.
pub fn assign_angles(tax: &mut Taxonomy) {
    for depth in 0..RING_COUNT as u8 {
        let mut ids = tax.at_depth(depth);
        ids.sort_by(|a, b| tax.node(*a).full_path.cmp(&tax.node(*b).full_path));
        let count = ids.len() as f32;
        for (i, id) in ids.into_iter().enumerate() {
            tax.node_mut(id).angle_deg = 360.0 * i as f32 / count;
        }
    }
    let root = tax.root();
    tax.node_mut(root).angle_deg = 0.0;
}

/// Recompute every node's position from its ring and angle.
pub fn apply_positions(tax: &mut Taxonomy, geometry: &RadialGeometry) {
    for id in 0..tax.len() {
        let pos = geometry.node_position(tax.node(id));
        tax.node_mut(id).pos = pos;
    }
}

/// Where and how a label is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAnchor {
    pub pos: Pos2,
    /// Text rotation in radians.
    pub rotation: f32,
    /// Text should end at `pos` rather than start there. Set from 180°
    /// onwards so labels never read upside down.
    pub flip: bool,
    pub centered: bool,
}

pub fn label_anchor(node: &Node, geometry: &RadialGeometry, offset: f32) -> LabelAnchor {
    if node.depth() == 0 {
        return LabelAnchor {
            pos: node.pos,
            rotation: 0.0,
            flip: false,
            centered: true,
        };
    }
    let radius = geometry.ring_radius(node.depth()) + offset;
    let pos = geometry.polar(node.angle_deg, radius);
    let flip = node.angle_deg >= 180.0;
    let mut rotation = (node.angle_deg - 90.0).to_radians();
    if flip {
        rotation += std::f32::consts::PI;
    }
    LabelAnchor {
        pos,
        rotation,
        flip,
        centered: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::builder::TreeBuilder;
    use crate::taxonomy::depth::DepthAssigner;

    fn geometry() -> RadialGeometry {
        RadialGeometry::from_config(&AtlasConfig::default())
    }

    fn close(a: Pos2, b: Pos2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn zero_degrees_points_up() {
        let c = pos2(100.0, 100.0);
        assert!(close(polar_to_cartesian(c, 0.0, 50.0), pos2(100.0, 50.0)));
        assert!(close(polar_to_cartesian(c, 90.0, 50.0), pos2(150.0, 100.0)));
        assert!(close(polar_to_cartesian(c, 180.0, 50.0), pos2(100.0, 150.0)));
        assert!(close(polar_to_cartesian(c, 270.0, 50.0), pos2(50.0, 100.0)));
        assert!(close(polar_to_cartesian(c, 123.0, 0.0), c));
    }

    #[test]
    fn angles_follow_path_order_and_are_even() {
        let mut tax = TreeBuilder::from_ids(["R.d", "R.b", "R.a", "R.c", "R.b.x"], "R").unwrap();
        DepthAssigner::new::<&str>(&[]).assign(&mut tax);
        assign_angles(&mut tax);

        let ring1 = ["R.a", "R.b", "R.c", "R.d"];
        for (i, path) in ring1.iter().enumerate() {
            let n = tax.node(tax.find_by_path(path).unwrap());
            assert_eq!(n.angle_deg, 360.0 * i as f32 / 4.0);
        }
        assert_eq!(tax.root_node().angle_deg, 0.0);
        assert_eq!(tax.node(tax.find_by_path("R.b.x").unwrap()).angle_deg, 0.0);
    }

    #[test]
    fn angles_strictly_increase_within_each_ring() {
        let mut tax = TreeBuilder::from_ids(
            ["R.z.q", "R.m.a", "R.m.b", "R.a.k", "R.a.c.e", "R.a.c.d"],
            "R",
        )
        .unwrap();
        DepthAssigner::new::<&str>(&[]).assign(&mut tax);
        assign_angles(&mut tax);
        for depth in 0..RING_COUNT as u8 {
            let mut nodes: Vec<&Node> = tax.nodes().iter().filter(|n| n.depth() == depth).collect();
            nodes.sort_by(|a, b| a.full_path.cmp(&b.full_path));
            for w in nodes.windows(2) {
                assert!(w[0].angle_deg < w[1].angle_deg);
            }
            for n in &nodes {
                assert!((0.0..360.0).contains(&n.angle_deg));
            }
        }
    }

    #[test]
    fn positions_sit_on_their_ring() {
        let g = geometry();
        let mut tax = TreeBuilder::from_ids(["R.a.b.c", "R.e"], "R").unwrap();
        DepthAssigner::new::<&str>(&[]).assign(&mut tax);
        assign_angles(&mut tax);
        apply_positions(&mut tax, &g);
        assert!(close(tax.root_node().pos, g.center));
        for (_, n) in tax.iter() {
            let r = n.pos.distance(g.center);
            assert!((r - g.ring_radius(n.depth())).abs() < 1e-2);
        }
    }

    #[test]
    fn labels_flip_on_left_half() {
        let g = geometry();
        let mut node = Node::new("x", "R.x");
        node.depth = Some(2);
        node.angle_deg = 270.0;
        node.pos = g.node_position(&node);
        let anchor = label_anchor(&node, &g, 10.0);
        assert!(anchor.flip);
        assert!((anchor.pos.distance(g.center) - 310.0).abs() < 1e-2);

        node.angle_deg = 45.0;
        assert!(!label_anchor(&node, &g, 10.0).flip);

        // Straight down already counts as the left half.
        node.angle_deg = 180.0;
        assert!(label_anchor(&node, &g, 10.0).flip);
        node.angle_deg = 179.9;
        assert!(!label_anchor(&node, &g, 10.0).flip);
    }
}

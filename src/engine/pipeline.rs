use crate::config::{AtlasConfig, RING_COUNT};
use crate::error::Result;
use crate::net::fetch::AssetSource;
use crate::render::edges::{route_all, EdgePath};
use crate::render::layout::{apply_positions, assign_angles, RadialGeometry};
use crate::taxonomy::builder::TreeBuilder;
use crate::taxonomy::depth::DepthAssigner;
use crate::taxonomy::table::parse_table;
use crate::taxonomy::Taxonomy;

/// A laid-out diagram, ready to paint.
#[derive(Debug, Clone)]
pub struct Atlas {
    pub taxonomy: Taxonomy,
    pub edges: Vec<EdgePath>,
    pub geometry: RadialGeometry,
    /// Node count per ring.
    pub ring_counts: [usize; RING_COUNT],
}

impl Atlas {
    pub fn node_count(&self) -> usize {
        self.taxonomy.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Re-run angles, positions and edge routing, e.g. after the geometry
    /// changed. Depths are kept.
    pub fn relayout(&mut self, geometry: RadialGeometry, collar_offset: f32) {
        self.geometry = geometry;
        assign_angles(&mut self.taxonomy);
        apply_positions(&mut self.taxonomy, &self.geometry);
        self.edges = route_all(&self.taxonomy, &self.geometry, collar_offset);
    }
}

/// Table → tree → depths → angles → positions → edges.
pub struct AtlasEngine {
    config: AtlasConfig,
    depths: DepthAssigner,
}

impl AtlasEngine {
    pub fn new(config: AtlasConfig) -> Self {
        let depths = DepthAssigner::new(&config.media_types);
        Self { config, depths }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Read the taxonomy table from `source` and lay it out.
    pub fn load(&self, source: &AssetSource) -> Result<Atlas> {
        let text = source.read_text(&self.config.taxonomy_file)?;
        self.build_from_table(&text)
    }

    pub fn build_from_table(&self, text: &str) -> Result<Atlas> {
        let rows = parse_table(text)?;
        let taxonomy = TreeBuilder::from_rows(&rows, &self.config.root_name)?;
        Ok(self.lay_out(taxonomy))
    }

    pub fn build_from_ids<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Result<Atlas> {
        let taxonomy = TreeBuilder::from_ids(ids, &self.config.root_name)?;
        Ok(self.lay_out(taxonomy))
    }

    fn lay_out(&self, mut taxonomy: Taxonomy) -> Atlas {
        let ring_counts = self.depths.assign(&mut taxonomy);
        let mut atlas = Atlas {
            taxonomy,
            edges: Vec::new(),
            geometry: RadialGeometry::from_config(&self.config),
            ring_counts,
        };
        atlas.relayout(atlas.geometry, self.config.collar_offset);
        log::info!(
            "atlas built: {} nodes, {} edges, rings {:?}",
            atlas.node_count(),
            atlas.edge_count(),
            atlas.ring_counts
        );
        atlas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtlasError;
    use crate::taxonomy::depth::{LEAF_RING, MEDIA_RING};

    fn engine(root: &str) -> AtlasEngine {
        AtlasEngine::new(AtlasConfig {
            root_name: root.to_string(),
            ..AtlasConfig::default()
        })
    }

    #[test]
    fn costumed_play_scenario() {
        let table = "id,value\nCostumedPlay,\nCostumedPlay.Performance,\nCostumedPlay.Performance.DragQueens,\n";
        let atlas = engine("CostumedPlay").build_from_table(table).unwrap();
        let tax = &atlas.taxonomy;
        assert_eq!(tax.root_node().name, "CostumedPlay");
        assert_eq!(tax.root_node().children.len(), 1);

        let perf = tax.find_by_path("CostumedPlay.Performance").unwrap();
        let drag = tax.find_by_path("CostumedPlay.Performance.DragQueens").unwrap();
        assert_eq!(tax.node(perf).depth(), 1);
        assert_eq!(tax.node(drag).depth(), 2);
        assert_eq!(tax.node(drag).parent, Some(perf));
        assert_eq!(atlas.ring_counts, [1, 1, 1, 0, 0, 0]);
        assert_eq!(atlas.edge_count(), 2);
    }

    #[test]
    fn media_rings_and_positions() {
        let atlas = engine("R")
            .build_from_ids(["R.Comics.Batman", "R.Fandom.Anime.SailorMoon", "R.Fandom.Cosplay"])
            .unwrap();
        let tax = &atlas.taxonomy;
        let comics = tax.find_by_path("R.Comics").unwrap();
        let batman = tax.find_by_path("R.Comics.Batman").unwrap();
        let moon = tax.find_by_path("R.Fandom.Anime.SailorMoon").unwrap();
        assert_eq!(tax.node(comics).depth(), MEDIA_RING);
        assert_eq!(tax.node(batman).depth(), LEAF_RING);
        assert_eq!(tax.node(moon).depth(), LEAF_RING);

        for (_, node) in tax.iter() {
            let r = atlas.geometry.ring_radius(node.depth());
            let d = node.pos.distance(atlas.geometry.center);
            assert!((d - r).abs() < 1e-2, "{} off its ring", node.full_path);
        }
        for edge in &atlas.edges {
            assert_eq!(edge.end(), Some(tax.node(edge.child).pos));
        }
    }

    #[test]
    fn missing_root_is_fatal() {
        let err = engine("Nope").build_from_ids(["A.b"]).unwrap_err();
        assert!(matches!(err, AtlasError::RootNotFound(_)));
    }

    #[test]
    fn loads_from_asset_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("taxonomy.csv"),
            "/* comment */\nid,value\nS,\nS.Goth,\nS.Goth.Trad,\n",
        )
        .unwrap();
        let atlas = engine("S")
            .load(&AssetSource::Local(dir.path().to_path_buf()))
            .unwrap();
        assert_eq!(atlas.node_count(), 3);
    }

    #[test]
    fn relayout_follows_new_geometry() {
        let e = engine("R");
        let mut atlas = e.build_from_ids(["R.a", "R.b"]).unwrap();
        let mut geometry = atlas.geometry;
        geometry.center = egui::pos2(0.0, 0.0);
        atlas.relayout(geometry, e.config().collar_offset);
        let a = atlas.taxonomy.find_by_path("R.a").unwrap();
        assert!((atlas.taxonomy.node(a).pos - egui::pos2(0.0, -150.0)).length() < 1e-3);
    }
}

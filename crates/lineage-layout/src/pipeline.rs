//! The build pipeline: graph, generations, band forest, widths, positions, connections.

use crate::builder::{FamilyGraph, build_family_graph};
use crate::forest::{BandForest, grow_forest};
use crate::generation::{Generations, assign_generations};
use crate::model::{BoundingBox, SpouseInfo, TreeLayout, TreeNode};
use crate::position::{Placement, place};
use crate::route::{RouteInput, route};
use crate::width::subtree_widths;
use indexmap::IndexMap;
use lineage_core::{
    BuildTreeOptions, Result, TreeData, TreeLayoutConfig, TreeStyleConfig, TreeViewState,
};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;

/// Per-node view flags carried into a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFlags {
    pub collapsed: BTreeSet<String>,
    pub highlighted: BTreeSet<String>,
}

impl NodeFlags {
    pub fn from_view(view: &TreeViewState) -> Self {
        Self {
            collapsed: view.collapsed_node_ids.clone(),
            highlighted: view.highlighted_person_ids.clone(),
        }
    }
}

/// A validated layout/style configuration that builds layouts.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: TreeLayoutConfig,
    style: TreeStyleConfig,
}

impl LayoutEngine {
    pub fn new(config: TreeLayoutConfig, style: TreeStyleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, style })
    }

    pub fn config(&self) -> &TreeLayoutConfig {
        &self.config
    }

    pub fn style(&self) -> &TreeStyleConfig {
        &self.style
    }

    pub fn build(&self, data: &TreeData, options: &BuildTreeOptions) -> Result<TreeLayout> {
        self.build_with(data, None, options, &NodeFlags::default())
    }

    /// Builds with an explicit root (taking precedence over `options`) and view flags.
    pub fn build_with(
        &self,
        data: &TreeData,
        root: Option<&str>,
        options: &BuildTreeOptions,
        flags: &NodeFlags,
    ) -> Result<TreeLayout> {
        let cfg = &self.config;
        let fg = build_family_graph(data, root, options)?;

        let cap = options.max_generations.or(cfg.max_generations);
        let gens = assign_generations(&fg, cfg.layout_type, options, cap);

        let collapsed: FxHashSet<usize> = flags
            .collapsed
            .iter()
            .filter_map(|id| fg.ix(id))
            .filter(|&ix| gens.is_retained(ix))
            .collect();
        let forest = grow_forest(&fg, &gens, cfg.layout_type, &collapsed);
        let widths = subtree_widths(&forest, cfg);
        let placement = place(&fg, &gens, &forest, &widths, cfg);
        let connections = route(&RouteInput {
            fg: &fg,
            gens: &gens,
            forest: &forest,
            placement: &placement,
            config: cfg,
            style: &self.style,
        });

        let nodes = assemble_nodes(&fg, &gens, &forest, &widths, &placement, flags);
        let bounds = bounds(&nodes, cfg);

        tracing::debug!(
            nodes = nodes.len(),
            connections = connections.len(),
            width = bounds.width,
            height = bounds.height,
            "layout built"
        );

        Ok(TreeLayout {
            nodes,
            connections,
            bounds,
            root_id: fg.root_id().to_string(),
            layout_type: cfg.layout_type,
            direction: cfg.direction,
            node_width: cfg.node_width,
            node_height: cfg.node_height,
            diagnostics: fg.diagnostics().to_vec(),
        })
    }
}

/// One-shot convenience around [`LayoutEngine`].
pub fn build_tree_layout(
    data: &TreeData,
    config: &TreeLayoutConfig,
    style: &TreeStyleConfig,
    options: &BuildTreeOptions,
) -> Result<TreeLayout> {
    LayoutEngine::new(config.clone(), style.clone())?.build(data, options)
}

fn assemble_nodes(
    fg: &FamilyGraph,
    gens: &Generations,
    forest: &BandForest,
    widths: &[f64],
    placement: &Placement,
    flags: &NodeFlags,
) -> IndexMap<String, TreeNode> {
    let ids = |ixs: Vec<usize>| -> Vec<String> {
        ixs.into_iter()
            .filter(|&ix| gens.is_retained(ix))
            .map(|ix| fg.id(ix).to_string())
            .collect()
    };

    let mut nodes: IndexMap<String, TreeNode> = IndexMap::new();
    for ix in gens.retained() {
        let id = fg.id(ix).to_string();
        let children = fg.children(ix);
        let spouses = fg
            .spouses(ix)
            .into_iter()
            .filter(|(s, _)| gens.is_retained(*s))
            .map(|(s, rel)| {
                let shared = children
                    .iter()
                    .copied()
                    .filter(|c| fg.parents(*c).contains(&s))
                    .collect();
                SpouseInfo {
                    partner_id: fg.id(s).to_string(),
                    relationship: rel.clone(),
                    child_ids: ids(shared),
                }
            })
            .collect();
        let subtree_width = forest.band_of[ix]
            .map(|b| widths[b])
            .unwrap_or_default();

        let node = TreeNode {
            id: id.clone(),
            person: fg.person(ix).clone(),
            x: placement.x[ix],
            y: placement.y[ix],
            level: gens.level(ix).unwrap_or(0),
            parent_ids: ids(fg.parents(ix)),
            child_ids: ids(children),
            spouses,
            subtree_width,
            is_collapsed: flags.collapsed.contains(&id),
            is_highlighted: flags.highlighted.contains(&id),
            is_visible: placement.visible[ix],
            layout_parent_id: forest.layout_parent[ix].map(|p| fg.id(p).to_string()),
        };
        nodes.insert(id, node);
    }
    nodes
}

fn bounds(nodes: &IndexMap<String, TreeNode>, cfg: &TreeLayoutConfig) -> BoundingBox {
    let (hw, hh) = (cfg.node_width / 2.0, cfg.node_height / 2.0);
    let mut visible = nodes.values().filter(|n| n.is_visible).peekable();
    if visible.peek().is_none() {
        return BoundingBox::empty();
    }
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for n in visible {
        min_x = min_x.min(n.x - hw);
        max_x = max_x.max(n.x + hw);
        min_y = min_y.min(n.y - hh);
        max_y = max_y.max(n.y + hh);
    }
    BoundingBox::from_extents(min_x, max_x, min_y, max_y)
}

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction, Graph};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::resolver::{is_relative, PathResolver};
use crate::parsers::SymbolRecord;

/// Canonical file path or an opaque external package token.
pub type NodeId = String;

/// Records keyed by absolute file path. Iteration order is path order.
pub type RecordMap = BTreeMap<PathBuf, SymbolRecord>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// An analysed input file.
    File,
    /// Non-relative specifier such as a package name.
    External,
    /// Relative target without a record, usually a missing file.
    Dangling,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyNode {
    pub id: NodeId,
    pub kind: NodeKind,
}

/// File-level import graph. Edges point from importer to imported; the
/// inbound side is always derived from those same edges.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: Graph<DependencyNode, (), Directed>,
    node_map: HashMap<NodeId, NodeIndex>,
}

impl DependencyGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.node_map.get(id).map(|&idx| &self.graph[idx])
    }

    /// All nodes in insertion order: input files first, then lazily added targets.
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes().map(|node| node.id.as_str())
    }

    /// Targets this node depends on, in import order.
    pub fn outbound(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Nodes that depend on this node, in edge insertion order.
    pub fn inbound(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Incoming)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.graph.edge_references().map(move |edge| {
            (
                self.graph[edge.source()].id.as_str(),
                self.graph[edge.target()].id.as_str(),
            )
        })
    }

    pub(crate) fn inner(&self) -> &Graph<DependencyNode, (), Directed> {
        &self.graph
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    // petgraph walks adjacency lists newest-first, so sort by edge index to
    // recover insertion order.
    pub(crate) fn neighbor_indices(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (edge.id(), other)
            })
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, other)| other).collect()
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&str> {
        match self.index_of(id) {
            Some(idx) => self
                .neighbor_indices(idx, direction)
                .into_iter()
                .map(|other| self.graph[other].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }
}

pub struct GraphBuilder {
    graph: DependencyGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::default(),
        }
    }

    pub fn add_node(&mut self, id: impl Into<NodeId>, kind: NodeKind) -> NodeIndex {
        let id = id.into();
        if let Some(&existing) = self.graph.node_map.get(&id) {
            return existing;
        }
        let index = self.graph.graph.add_node(DependencyNode {
            id: id.clone(),
            kind,
        });
        self.graph.node_map.insert(id, index);
        index
    }

    /// Adds `source -> target` once; repeated pairs are ignored.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Option<EdgeIndex> {
        let source_idx = self.graph.index_of(source)?;
        let target_idx = self.graph.index_of(target)?;
        if self.graph.graph.contains_edge(source_idx, target_idx) {
            return None;
        }
        Some(self.graph.graph.add_edge(source_idx, target_idx, ()))
    }

    /// Builds the import graph for a complete set of records.
    ///
    /// One node per record, then every import is resolved against its file,
    /// then edges are added, creating external or dangling target nodes on
    /// demand. Cycles and self-imports are kept as-is.
    pub fn from_records(records: &RecordMap, resolver: &PathResolver) -> DependencyGraph {
        let mut builder = Self::new();

        let pending: Vec<(NodeId, &Path, Vec<&str>)> = records
            .iter()
            .map(|(path, record)| {
                let id = path.to_string_lossy().into_owned();
                builder.add_node(id.clone(), NodeKind::File);
                (id, path.as_path(), record.import_sources().collect())
            })
            .collect();

        // Probes are independent per file; all of them finish before any edge exists.
        let resolved: Vec<(NodeId, Vec<(NodeId, &str)>)> = pending
            .into_par_iter()
            .map(|(id, path, raw)| {
                let mut seen = HashSet::new();
                let targets = raw
                    .into_iter()
                    .map(|specifier| (resolver.resolve(path, specifier), specifier))
                    .filter(|(target, _)| seen.insert(target.clone()))
                    .collect();
                (id, targets)
            })
            .collect();

        for (source, targets) in &resolved {
            for (target, specifier) in targets {
                if !builder.graph.contains(target) {
                    let kind = if is_relative(specifier) {
                        NodeKind::Dangling
                    } else {
                        NodeKind::External
                    };
                    builder.add_node(target.clone(), kind);
                }
                builder.add_edge(source, target);
            }
        }

        debug!(
            "Dependency graph: {} nodes, {} edges",
            builder.graph.node_count(),
            builder.graph.edge_count()
        );
        builder.build()
    }

    pub fn build(self) -> DependencyGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! File-level import graph

use super::risk::FileEdge;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Directed graph of imports between scanned files
///
/// Every scanned file is a node, even when it imports nothing and nothing
/// imports it, so fan-in and fan-out are defined (as zero) for isolated files.
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    graph: DiGraph<PathBuf, ()>,
    index: HashMap<PathBuf, NodeIndex>,
    seen: HashSet<(NodeIndex, NodeIndex)>,
}

impl ImportGraph {
    /// Create a graph with one node per file
    pub fn with_files<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        let mut graph = Self::default();
        for file in files {
            graph.add_file(file.clone());
        }
        graph
    }

    pub fn add_file(&mut self, path: PathBuf) -> NodeIndex {
        if let Some(idx) = self.index.get(&path) {
            return *idx;
        }
        let idx = self.graph.add_node(path.clone());
        self.index.insert(path, idx);
        idx
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    /// Add an edge between two known files
    ///
    /// Returns false when the edge was not added: self-imports, unknown
    /// endpoints and duplicates of an existing ordered pair are ignored.
    pub fn add_edge(&mut self, from: &Path, to: &Path) -> bool {
        if from == to {
            return false;
        }
        let (Some(&a), Some(&b)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        if !self.seen.insert((a, b)) {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    /// Number of distinct files importing `path`
    pub fn fan_in(&self, path: &Path) -> usize {
        self.index
            .get(path)
            .map(|&idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
            .unwrap_or(0)
    }

    /// Number of distinct files `path` imports
    pub fn fan_out(&self, path: &Path) -> usize {
        self.index
            .get(path)
            .map(|&idx| self.graph.neighbors_directed(idx, Direction::Outgoing).count())
            .unwrap_or(0)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    /// All edges, sorted by (from, to)
    pub fn edges(&self) -> Vec<FileEdge> {
        let mut edges: Vec<FileEdge> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| FileEdge::new(self.graph[a].clone(), self.graph[b].clone()))
            .collect();
        edges.sort();
        edges
    }

    /// Import cycles: strongly connected components with more than one file
    pub fn cycles(&self) -> Vec<Vec<PathBuf>> {
        let mut cycles: Vec<Vec<PathBuf>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut files: Vec<PathBuf> =
                    component.into_iter().map(|idx| self.graph[idx].clone()).collect();
                files.sort();
                files
            })
            .collect();
        cycles.sort();
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("/p/{}", n))).collect()
    }

    #[test]
    fn test_isolated_files_have_zero_fan() {
        let paths = files(&["a.ts", "b.ts"]);
        let graph = ImportGraph::with_files(&paths);
        assert_eq!(graph.fan_in(&paths[0]), 0);
        assert_eq!(graph.fan_out(&paths[1]), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.file_count(), 2);
    }

    #[test]
    fn test_duplicate_and_self_edges_ignored() {
        let paths = files(&["a.ts", "b.ts"]);
        let mut graph = ImportGraph::with_files(&paths);
        assert!(graph.add_edge(&paths[0], &paths[1]));
        assert!(!graph.add_edge(&paths[0], &paths[1]));
        assert!(!graph.add_edge(&paths[0], &paths[0]));
        assert!(!graph.add_edge(&paths[0], Path::new("/elsewhere/c.ts")));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.fan_out(&paths[0]), 1);
        assert_eq!(graph.fan_in(&paths[1]), 1);
    }

    #[test]
    fn test_reverse_edge_is_distinct() {
        let paths = files(&["a.ts", "b.ts", "c.ts"]);
        let mut graph = ImportGraph::with_files(&paths);
        graph.add_edge(&paths[0], &paths[1]);
        graph.add_edge(&paths[1], &paths[0]);
        graph.add_edge(&paths[2], &paths[0]);

        assert_eq!(graph.edge_count(), 3);
        let fan_in: usize = paths.iter().map(|p| graph.fan_in(p)).sum();
        let fan_out: usize = paths.iter().map(|p| graph.fan_out(p)).sum();
        assert_eq!(fan_in, 3);
        assert_eq!(fan_out, 3);

        let cycles = graph.cycles();
        assert_eq!(cycles, vec![vec![paths[0].clone(), paths[1].clone()]]);
    }

    #[test]
    fn test_edges_sorted() {
        let paths = files(&["a.ts", "b.ts", "c.ts"]);
        let mut graph = ImportGraph::with_files(&paths);
        graph.add_edge(&paths[2], &paths[0]);
        graph.add_edge(&paths[0], &paths[2]);
        graph.add_edge(&paths[0], &paths[1]);
        let edges = graph.edges();
        assert_eq!(edges[0], FileEdge::new(&paths[0], &paths[1]));
        assert_eq!(edges[1], FileEdge::new(&paths[0], &paths[2]));
        assert_eq!(edges[2], FileEdge::new(&paths[2], &paths[0]));
    }
}

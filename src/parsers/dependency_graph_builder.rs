//! Import graph construction from scanned sources

use crate::models::{ImportGraph, Language};
use crate::parsers::imports::relative_specifiers;
use crate::utils::path_resolver::ImportResolver;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::debug;

/// Builds the import graph for one scan pass
///
/// Runs once, after every file has been analysed, over the full file list and
/// the sources read during analysis.
pub struct DependencyGraphBuilder<'a> {
    files: &'a [PathBuf],
    sources: &'a HashMap<PathBuf, String>,
}

impl<'a> DependencyGraphBuilder<'a> {
    pub fn new(files: &'a [PathBuf], sources: &'a HashMap<PathBuf, String>) -> Self {
        Self { files, sources }
    }

    pub fn build(&self) -> ImportGraph {
        let file_set: HashSet<PathBuf> = self.files.iter().cloned().collect();
        let resolver = ImportResolver::new(&file_set);
        let mut graph = ImportGraph::with_files(self.files);

        for file in self.files {
            let Some(source) = self.sources.get(file) else {
                continue;
            };
            let language = Language::from_path(file);
            for specifier in relative_specifiers(source, language) {
                if let Some(target) = resolver.resolve(file, &specifier) {
                    graph.add_edge(file, &target);
                }
            }
        }

        debug!(
            files = graph.file_count(),
            edges = graph.edge_count(),
            "import graph built"
        );
        graph
    }
}

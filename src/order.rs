//! Dependency ordering of files.
//!
//! Kahn's algorithm over the resolved graph, with edges pointing from a
//! dependency to its dependents so prerequisites render first. Ties break
//! toward ascending file id, and files stuck in cycles are appended in
//! input order, so the output is total and deterministic either way.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::SourceFile;

/// Indices into `files` in dependency order.
pub fn dependency_order(files: &[SourceFile]) -> Vec<usize> {
    let index_of: BTreeMap<u32, usize> = files
        .iter()
        .enumerate()
        .map(|(i, f)| (f.id, i))
        .collect();

    let mut adjacency: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
    let mut in_degree: BTreeMap<u32, usize> = BTreeMap::new();
    for file in files {
        adjacency.insert(file.id, BTreeSet::new());
        in_degree.insert(file.id, 0);
    }

    for file in files {
        let symbol_targets = file
            .symbols
            .iter()
            .flat_map(|s| s.dependencies.iter())
            .filter_map(|d| d.resolved_file_id);
        let file_targets = file
            .file_relationships
            .iter()
            .filter_map(|r| r.resolved_file_id);

        for dep_id in symbol_targets.chain(file_targets) {
            if dep_id == file.id || !index_of.contains_key(&dep_id) {
                continue;
            }
            if let Some(out) = adjacency.get_mut(&dep_id) {
                if out.insert(file.id) {
                    *in_degree.entry(file.id).or_insert(0) += 1;
                }
            }
        }
    }

    // BTreeSet keeps the ready queue sorted by id.
    let mut ready: BTreeSet<u32> = in_degree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut sorted: Vec<usize> = Vec::with_capacity(files.len());
    while let Some(id) = ready.iter().next().copied() {
        ready.remove(&id);
        sorted.push(index_of[&id]);
        if let Some(out) = adjacency.get(&id) {
            for &next in out {
                if let Some(d) = in_degree.get_mut(&next) {
                    *d = d.saturating_sub(1);
                    if *d == 0 {
                        ready.insert(next);
                    }
                }
            }
        }
    }

    // Cycles never make it into `sorted`; append the leftovers as given.
    if sorted.len() < files.len() {
        let placed: BTreeSet<usize> = sorted.iter().copied().collect();
        for i in 0..files.len() {
            if !placed.contains(&i) {
                sorted.push(i);
            }
        }
    }

    sorted
}

//! Link graph using petgraph for structural analysis of resolved entries

use docgraph_core::prelude::*;
use petgraph::algo::tarjan_scc;
use petgraph::prelude::*;
use std::collections::HashMap;

/// Node index type for graph
type NodeIndex = petgraph::graph::NodeIndex;

/// Directed graph of entries: one node per entry, one edge per distinct
/// (source, target) pair of valid links between two different entries.
/// Edge weights count the links behind the edge.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    graph: DiGraph<String, usize>,
    id_index: HashMap<String, NodeIndex>,
}

impl LinkGraph {
    /// Build the graph from resolved entries
    pub fn build(entries: &[Entry]) -> Self {
        let mut graph = DiGraph::new();
        let mut id_index = HashMap::new();

        for entry in entries {
            let idx = graph.add_node(entry.id.clone());
            id_index.insert(entry.id.clone(), idx);
        }

        for entry in entries {
            let Some(&source) = id_index.get(&entry.id) else {
                continue;
            };
            for link in &entry.outbound_links {
                if link.status != LinkStatus::Valid {
                    continue;
                }
                let Some(&target) = link
                    .target_resolved
                    .as_deref()
                    .and_then(|id| id_index.get(id))
                else {
                    continue;
                };
                if target == source {
                    continue;
                }
                match graph.find_edge(source, target) {
                    Some(edge) => graph[edge] += 1,
                    None => {
                        graph.add_edge(source, target, 1);
                    }
                }
            }
        }

        Self { graph, id_index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the entry has at least one inbound or outbound edge
    pub fn is_connected(&self, id: &str) -> bool {
        self.id_index
            .get(id)
            .is_some_and(|&idx| self.graph.neighbors_undirected(idx).next().is_some())
    }

    /// Ids this entry links to
    pub fn forward_links(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Outgoing)
    }

    /// Ids linking to this entry
    pub fn backlinks(&self, id: &str) -> Vec<String> {
        self.neighbors(id, Incoming)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<String> {
        let Some(&idx) = self.id_index.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<String> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        ids.sort();
        ids
    }

    /// Strongly connected components with more than one entry, members sorted
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut ids: Vec<String> = scc.iter().map(|&idx| self.graph[idx].clone()).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(id: &str, targets: &[&str]) -> Entry {
        let meta = DocumentMetadata {
            id: Some(id.to_string()),
            ..Default::default()
        };
        let links = targets
            .iter()
            .map(|t| {
                Link::draft(LinkKind::ShortReference, id, *t, 1, 1, "")
                    .resolved(Some(t.to_string()), LinkStatus::Valid)
            })
            .collect();
        Entry::from_metadata(PathBuf::from(format!("{}.md", id)), meta, String::new())
            .with_links(links)
    }

    #[test]
    fn test_edges_are_distinct_and_skip_self_links() {
        let graph = LinkGraph::build(&[entry("a", &["b", "b", "a"]), entry("b", &[])]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.forward_links("a"), vec!["b"]);
        assert_eq!(graph.backlinks("b"), vec!["a"]);
    }

    #[test]
    fn test_links_to_unknown_ids_are_ignored() {
        let graph = LinkGraph::build(&[entry("a", &["ghost"])]);
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.is_connected("a"));
    }

    #[test]
    fn test_cycles() {
        let graph = LinkGraph::build(&[
            entry("a", &["b"]),
            entry("b", &["c"]),
            entry("c", &["a"]),
            entry("d", &["e"]),
            entry("e", &["d"]),
            entry("f", &["a"]),
        ]);
        assert_eq!(
            graph.cycles(),
            vec![
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                vec!["d".to_string(), "e".to_string()],
            ]
        );
        assert_eq!(graph.cycle_count(), 2);
        assert!(graph.is_connected("f"));
    }

    #[test]
    fn test_chain_has_no_cycles() {
        let graph = LinkGraph::build(&[entry("a", &["b"]), entry("b", &["c"]), entry("c", &[])]);
        assert_eq!(graph.cycle_count(), 0);
        assert!(graph.is_connected("c"));
    }
}

//! Undirected station-to-station track lookup.

use crate::models::{Track, Train};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// Graph of stations joined by tracks, answering "which track connects A and B"
///
/// Tracks are undirected: a track from A to B also matches a train going B to A.
/// When several tracks join the same pair, the first one in input order wins.
pub struct TrackIndex<'a> {
    graph: UnGraph<&'a str, usize>,
    nodes: HashMap<&'a str, NodeIndex>,
    tracks: &'a [Track],
}

impl<'a> TrackIndex<'a> {
    #[must_use]
    pub fn new(tracks: &'a [Track]) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut nodes: HashMap<&'a str, NodeIndex> = HashMap::new();

        for (idx, track) in tracks.iter().enumerate() {
            let from = *nodes
                .entry(track.from_station.as_str())
                .or_insert_with(|| graph.add_node(track.from_station.as_str()));
            let to = *nodes
                .entry(track.to_station.as_str())
                .or_insert_with(|| graph.add_node(track.to_station.as_str()));

            if graph.find_edge(from, to).is_none() {
                graph.add_edge(from, to, idx);
            }
        }

        Self { graph, nodes, tracks }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// The track joining two stations, in either direction
    #[must_use]
    pub fn between(&self, a: &str, b: &str) -> Option<&'a Track> {
        let from = *self.nodes.get(a)?;
        let to = *self.nodes.get(b)?;
        let edge = self.graph.find_edge(from, to)?;
        let tracks = self.tracks;
        self.graph.edge_weight(edge).map(|&idx| &tracks[idx])
    }

    /// The track a train is currently running on, from its current and next station
    #[must_use]
    pub fn track_of(&self, train: &Train) -> Option<&'a Track> {
        let (current, next) = train.leg()?;
        self.between(current, next)
    }
}

//! Directed route graph and fastest-route queries.
//!
//! Location names are interned to dense indices; each location keeps its
//! outgoing connections in insertion order. Parallel connections between the
//! same pair are kept, and the query simply prefers the cheapest.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
    fmt,
};

use tracing::{debug, instrument};

use crate::{error::RouteError, reader::Connection};

/// A fastest route between two locations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Location names from origin to destination, both included.
    pub locations: Vec<String>,
    /// Sum of the travel times along the route.
    pub total_time: u64,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.locations.join(" -> "))
    }
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    target: usize,
    time: u32,
}

/// Directed, weighted graph of locations.
///
/// # Examples
/// ```
/// use routefix_core::RouteGraph;
///
/// let mut graph = RouteGraph::new();
/// graph.add_connection("LOC1", "LOC2", 5);
/// graph.add_connection("LOC2", "LOC3", 5);
/// graph.add_connection("LOC1", "LOC3", 20);
/// let route = graph
///     .fastest_route("LOC1", "LOC3")
///     .expect("both locations exist")
///     .expect("LOC3 is reachable");
/// assert_eq!(route.total_time, 10);
/// assert_eq!(route.to_string(), "LOC1 -> LOC2 -> LOC3");
/// ```
#[derive(Clone, Debug, Default)]
pub struct RouteGraph {
    index: HashMap<String, usize>,
    names: Vec<String>,
    adjacency: Vec<Vec<Edge>>,
    connections: usize,
}

impl RouteGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from parsed connections.
    #[must_use]
    pub fn from_connections<I>(connections: I) -> Self
    where
        I: IntoIterator<Item = Connection>,
    {
        let mut graph = Self::new();
        for connection in connections {
            graph.add_connection(&connection.start, &connection.end, connection.time);
        }
        graph
    }

    /// Adds a one-way connection, creating either location if needed.
    pub fn add_connection(&mut self, start: &str, end: &str, time: u32) {
        let origin = self.intern(start);
        let target = self.intern(end);
        if let Some(edges) = self.adjacency.get_mut(origin) {
            edges.push(Edge { target, time });
            self.connections += 1;
        }
    }

    /// Number of distinct locations.
    #[must_use]
    pub fn location_count(&self) -> usize {
        self.names.len()
    }

    /// Number of connections, counting parallel ones separately.
    #[must_use]
    pub const fn connection_count(&self) -> usize {
        self.connections
    }

    /// Returns `true` when `name` appears in any connection.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Finds the route with the smallest total travel time using Dijkstra's
    /// algorithm.
    ///
    /// Returns `Ok(None)` when the destination cannot be reached. A query from
    /// a location to itself yields a single-location route of time zero.
    ///
    /// # Errors
    /// Returns [`RouteError::UnknownLocation`] when either name is absent from
    /// the graph.
    #[instrument(
        name = "route.fastest",
        level = "debug",
        err,
        skip(self),
        fields(locations = self.names.len(), connections = self.connections),
    )]
    pub fn fastest_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<Route>, RouteError> {
        let source = self.lookup(origin)?;
        let target = self.lookup(destination)?;

        let mut best: Vec<Option<u64>> = vec![None; self.names.len()];
        let mut previous: Vec<Option<usize>> = vec![None; self.names.len()];
        let mut queue = BinaryHeap::new();
        set(&mut best, source, 0);
        queue.push(Reverse((0_u64, source)));

        while let Some(Reverse((time, node))) = queue.pop() {
            if node == target {
                break;
            }
            // Stale queue entries carry a time worse than the settled one.
            if best.get(node).copied().flatten().is_some_and(|known| time > known) {
                continue;
            }
            for edge in self.adjacency.get(node).map_or(&[][..], Vec::as_slice) {
                let candidate = time.saturating_add(u64::from(edge.time));
                let improves = best
                    .get(edge.target)
                    .copied()
                    .flatten()
                    .is_none_or(|known| candidate < known);
                if improves {
                    set(&mut best, edge.target, candidate);
                    set(&mut previous, edge.target, node);
                    queue.push(Reverse((candidate, edge.target)));
                }
            }
        }

        let Some(total_time) = best.get(target).copied().flatten() else {
            debug!(origin, destination, "destination unreachable");
            return Ok(None);
        };
        Ok(Some(Route {
            locations: self.trace_back(&previous, target),
            total_time,
        }))
    }

    fn lookup(&self, name: &str) -> Result<usize, RouteError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| RouteError::UnknownLocation {
                name: name.to_owned(),
            })
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_owned());
        self.adjacency.push(Vec::new());
        self.index.insert(name.to_owned(), id);
        id
    }

    fn trace_back(&self, previous: &[Option<usize>], target: usize) -> Vec<String> {
        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if let Some(name) = self.names.get(node) {
                path.push(name.clone());
            }
            cursor = previous.get(node).copied().flatten();
        }
        path.reverse();
        path
    }
}

fn set<T>(slots: &mut [Option<T>], index: usize, value: T) {
    if let Some(slot) = slots.get_mut(index) {
        *slot = Some(value);
    }
}

use crate::core::containers::{Queue, Stack};
use crate::utils::error::{LessonError, Result};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Directed graph as an adjacency list. Neighbour order is preserved and
/// drives traversal order; nodes that only appear as neighbours are leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: BTreeMap<String, Vec<String>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges<I, N, M>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<M>)>,
        N: Into<String>,
        M: Into<String>,
    {
        let mut graph = Self::new();
        for (node, neighbours) in edges {
            let node = node.into();
            for neighbour in neighbours {
                graph.add_edge(&node, neighbour);
            }
            graph.adjacency.entry(node).or_default();
        }
        graph
    }

    /// The tree used throughout the lessons:
    ///
    /// ```text
    ///       A
    ///      / \
    ///     B   C
    ///    / \   \
    ///   D   E   F
    /// ```
    pub fn sample() -> Self {
        Self::from_edges([
            ("A", vec!["B", "C"]),
            ("B", vec!["D", "E"]),
            ("C", vec!["F"]),
        ])
    }

    pub fn add_edge(&mut self, from: &str, to: impl Into<String>) {
        let to = to.into();
        self.adjacency.entry(to.clone()).or_default();
        self.adjacency.entry(from.to_string()).or_default().push(to);
    }

    pub fn neighbours(&self, node: &str) -> &[String] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    fn require(&self, node: &str) -> Result<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(LessonError::UnknownNode {
                node: node.to_string(),
            })
        }
    }

    /// `A -> [B, C]` per node with outgoing edges, in node order.
    pub fn describe(&self) -> Vec<String> {
        self.adjacency
            .iter()
            .filter(|(_, neighbours)| !neighbours.is_empty())
            .map(|(node, neighbours)| format!("{} -> [{}]", node, neighbours.join(", ")))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalStep {
    pub visited: String,
    /// Frontier contents right after `visited` was taken off it.
    pub frontier: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    pub order: Vec<String>,
    pub steps: Vec<TraversalStep>,
}

/// Breadth-first search with a FIFO frontier. A node is marked visited when
/// it is dequeued, then all of its neighbours are enqueued.
pub fn bfs(graph: &Graph, start: &str) -> Result<Traversal> {
    graph.require(start)?;

    let mut visited = HashSet::new();
    let mut frontier = Queue::new();
    let mut traversal = Traversal::default();
    frontier.enqueue(start.to_string());

    while let Some(node) = frontier.dequeue() {
        if !visited.insert(node.clone()) {
            continue;
        }
        traversal.steps.push(TraversalStep {
            visited: node.clone(),
            frontier: frontier.iter().cloned().collect(),
        });
        for neighbour in graph.neighbours(&node) {
            frontier.enqueue(neighbour.clone());
        }
        traversal.order.push(node);
    }

    tracing::debug!("BFS from {} visited {} nodes", start, traversal.order.len());
    Ok(traversal)
}

/// Depth-first search with a LIFO frontier. Neighbours are pushed in reverse
/// so the leftmost branch is explored first.
pub fn dfs(graph: &Graph, start: &str) -> Result<Traversal> {
    graph.require(start)?;

    let mut visited = HashSet::new();
    let mut frontier = Stack::new();
    let mut traversal = Traversal::default();
    frontier.push(start.to_string());

    while let Some(node) = frontier.pop() {
        if !visited.insert(node.clone()) {
            continue;
        }
        traversal.steps.push(TraversalStep {
            visited: node.clone(),
            frontier: frontier.iter().cloned().collect(),
        });
        for neighbour in graph.neighbours(&node).iter().rev() {
            frontier.push(neighbour.clone());
        }
        traversal.order.push(node);
    }

    tracing::debug!("DFS from {} visited {} nodes", start, traversal.order.len());
    Ok(traversal)
}

/// Hop count from `start` to every reachable node.
pub fn bfs_distances(graph: &Graph, start: &str) -> Result<HashMap<String, usize>> {
    graph.require(start)?;

    let mut distances = HashMap::new();
    let mut queue = VecDeque::new();
    distances.insert(start.to_string(), 0);
    queue.push_back(start.to_string());

    while let Some(node) = queue.pop_front() {
        let next = distances[&node] + 1;
        for neighbour in graph.neighbours(&node) {
            if !distances.contains_key(neighbour) {
                distances.insert(neighbour.clone(), next);
                queue.push_back(neighbour.clone());
            }
        }
    }
    Ok(distances)
}

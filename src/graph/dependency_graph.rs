//! Directed acyclic graph over dense vertex indices, stored as an orthogonal list.
//!
//! Every vertex stores the first and last edge of its outgoing and incoming lists. Every edge stores both of its
//! endpoints and the next edge leaving its head and the next edge entering its tail. Edges live in one flat
//! array, so inserting an edge never allocates per edge and never reorders existing links.

use anyhow::Result;

use crate::Error;

#[derive(Debug, Default, Copy, Clone)]
struct VertexLinks {
    first_out: Option<usize>,
    last_out: Option<usize>,
    first_in: Option<usize>,
    last_in: Option<usize>,
}

#[derive(Debug, Copy, Clone)]
struct EdgeLinks {
    head: usize,
    tail: usize,
    next_out: Option<usize>,
    next_in: Option<usize>,
}

/// Dependency graph between abstract vertices. Acyclicity is not checked, the caller must only add edges that
/// keep the graph acyclic.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    vertices: Vec<VertexLinks>,
    edges: Vec<EdgeLinks>,
}

/// Walks one intrusive edge list.
struct EdgeWalk<'a> {
    edges: &'a [EdgeLinks],
    current: Option<usize>,
    next: fn(&EdgeLinks) -> Option<usize>,
}

impl<'a> Iterator for EdgeWalk<'a> {
    type Item = &'a EdgeLinks;

    fn next(&mut self) -> Option<Self::Item> {
        let edges = self.edges;
        let edge = &edges[self.current?];
        self.current = (self.next)(edge);
        Some(edge)
    }
}

impl DependencyGraph {
    /// Create a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertices: vec![VertexLinks::default(); vertex_count],
            edges: Vec::new(),
        }
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self) -> usize {
        self.vertices.push(VertexLinks::default());
        self.vertices.len() - 1
    }

    /// Number of vertices in the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn check_vertex(&self, vertex: usize) -> Result<()> {
        if vertex < self.vertices.len() {
            Ok(())
        } else {
            Err(Error::VertexOutOfRange(vertex).into())
        }
    }

    /// Add an edge `head -> tail`. The edge is appended to the outgoing list of `head` and the incoming list of `tail`.
    /// # Errors
    /// - Fails if either vertex does not exist.
    pub fn add_edge(&mut self, head: usize, tail: usize) -> Result<()> {
        self.check_vertex(head)?;
        self.check_vertex(tail)?;

        let edge = self.edges.len();
        self.edges.push(EdgeLinks {
            head,
            tail,
            next_out: None,
            next_in: None,
        });

        match self.vertices[head].last_out {
            Some(last) => self.edges[last].next_out = Some(edge),
            None => self.vertices[head].first_out = Some(edge),
        }
        self.vertices[head].last_out = Some(edge);

        match self.vertices[tail].last_in {
            Some(last) => self.edges[last].next_in = Some(edge),
            None => self.vertices[tail].first_in = Some(edge),
        }
        self.vertices[tail].last_in = Some(edge);
        Ok(())
    }

    /// All vertices with no incoming edges, in index order.
    pub fn sources(&self) -> Vec<usize> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, vertex)| vertex.first_in.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    /// All vertices with no outgoing edges, in index order.
    pub fn sinks(&self) -> Vec<usize> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, vertex)| vertex.first_out.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    /// Vertices reachable through one outgoing edge of `vertex`, in edge insertion order.
    /// # Errors
    /// - Fails if the vertex does not exist.
    pub fn forward_neighbors(&self, vertex: usize) -> Result<Vec<usize>> {
        self.check_vertex(vertex)?;
        Ok(EdgeWalk {
            edges: &self.edges,
            current: self.vertices[vertex].first_out,
            next: |edge| edge.next_out,
        }
        .map(|edge| edge.tail)
        .collect())
    }

    /// Vertices that reach `vertex` through one incoming edge, in edge insertion order.
    /// # Errors
    /// - Fails if the vertex does not exist.
    pub fn backward_neighbors(&self, vertex: usize) -> Result<Vec<usize>> {
        self.check_vertex(vertex)?;
        Ok(EdgeWalk {
            edges: &self.edges,
            current: self.vertices[vertex].first_in,
            next: |edge| edge.next_in,
        }
        .map(|edge| edge.head)
        .collect())
    }

    /// Iterate over all edges as `(head, tail)` pairs, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().map(|edge| (edge.head, edge.tail))
    }
}

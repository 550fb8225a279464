//! The core `Graph` container.
//!
//! A directed multigraph with string node ids, dense node indices, and named edges. Adjacency
//! lists are maintained eagerly because the layout passes query parents/children far more often
//! than they mutate the graph.

use rustc_hash::FxBuildHasher;

mod edge_key;

pub use edge_key::EdgeKey;
use edge_key::KeyRef;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// A borrowed view of one stored edge.
#[derive(Debug)]
pub struct EdgeRef<'a, E> {
    /// Position of the edge in insertion order.
    pub ix: usize,
    pub key: &'a EdgeKey,
    pub v: usize,
    pub w: usize,
    pub label: &'a E,
}

impl<E> Clone for EdgeRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EdgeRef<'_, E> {}

#[derive(Debug, Clone)]
struct StoredEdge<E> {
    key: EdgeKey,
    /// (tail, head) node indices.
    ends: (usize, usize),
    label: E,
}

#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    // Parallel, indexed by node index.
    ids: Vec<String>,
    labels: Vec<N>,
    node_index: HashMap<String, usize>,

    edges: Vec<StoredEdge<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    // Edge indices per node, in edge insertion order.
    out_adj: Vec<Vec<usize>>,
    in_adj: Vec<Vec<usize>>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            labels: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            out_adj: Vec::new(),
            in_adj: Vec::new(),
        }
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Inserts a node, or replaces the label of an existing one. Returns the node index.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> usize {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(&id) {
            self.labels[ix] = label;
            return ix;
        }
        let ix = self.ids.len();
        self.ids.push(id.clone());
        self.labels.push(label);
        self.node_index.insert(id, ix);
        self.out_adj.push(Vec::new());
        self.in_adj.push(Vec::new());
        ix
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&ix| &self.labels[ix])
    }

    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    /// Panics when `ix` is out of range, like slice indexing.
    pub fn node_id(&self, ix: usize) -> &str {
        &self.ids[ix]
    }

    /// Panics when `ix` is out of range, like slice indexing.
    pub fn node_label(&self, ix: usize) -> &N {
        &self.labels[ix]
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_index.contains_key(&KeyRef { v, w, name })
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        self.edge_index
            .get(&KeyRef { v, w, name })
            .map(|&ix| &self.edges[ix].label)
    }

    /// Inserts an edge between two existing nodes.
    ///
    /// Returns `false` (leaving the graph untouched) when either endpoint is missing or the
    /// edge already exists; the first label stored for a key wins.
    pub fn set_edge(&mut self, v: &str, w: &str, name: Option<&str>, label: E) -> bool {
        let (Some(v_ix), Some(w_ix)) = (self.node_ix(v), self.node_ix(w)) else {
            return false;
        };
        if self.has_edge(v, w, name) {
            return false;
        }
        let ix = self.edges.len();
        let key = EdgeKey::new(v, w, name);
        self.edge_index.insert(key.clone(), ix);
        self.edges.push(StoredEdge {
            key,
            ends: (v_ix, w_ix),
            label,
        });
        self.out_adj[v_ix].push(ix);
        self.in_adj[w_ix].push(ix);
        true
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_, E>> {
        (0..self.edges.len()).map(move |ix| self.edge_ref(ix))
    }

    pub fn out_edges(&self, v: usize) -> impl Iterator<Item = EdgeRef<'_, E>> {
        self.out_adj
            .get(v)
            .into_iter()
            .flatten()
            .map(move |&ix| self.edge_ref(ix))
    }

    pub fn in_edges(&self, w: usize) -> impl Iterator<Item = EdgeRef<'_, E>> {
        self.in_adj
            .get(w)
            .into_iter()
            .flatten()
            .map(move |&ix| self.edge_ref(ix))
    }

    /// Keeps only the edges for which `keep` returns `true`, preserving their relative order.
    pub fn retain_edges<F>(&mut self, mut keep: F)
    where
        F: FnMut(EdgeRef<'_, E>) -> bool,
    {
        let keep_flags: Vec<bool> = (0..self.edges.len())
            .map(|ix| keep(self.edge_ref(ix)))
            .collect();
        if keep_flags.iter().all(|&k| k) {
            return;
        }

        let old = std::mem::take(&mut self.edges);
        self.edge_index.clear();
        for adj in self.out_adj.iter_mut().chain(self.in_adj.iter_mut()) {
            adj.clear();
        }
        for (stored, keep) in old.into_iter().zip(keep_flags) {
            if !keep {
                continue;
            }
            let ix = self.edges.len();
            let (v, w) = stored.ends;
            self.edge_index.insert(stored.key.clone(), ix);
            self.out_adj[v].push(ix);
            self.in_adj[w].push(ix);
            self.edges.push(stored);
        }
    }

    fn edge_ref(&self, ix: usize) -> EdgeRef<'_, E> {
        let e = &self.edges[ix];
        let (v, w) = e.ends;
        EdgeRef {
            ix,
            key: &e.key,
            v,
            w,
            label: &e.label,
        }
    }
}

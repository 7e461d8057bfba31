use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

type OrderedMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Construction-time switches. They cannot change after the graph is built.
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub directed: bool,
    pub multigraph: bool,
    pub compound: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            directed: true,
            multigraph: false,
            compound: false,
        }
    }
}

/// Identifies one edge: the ordered `(tail, head)` pair plus an optional
/// disambiguating name for parallel edges in a multigraph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeId {
    pub tail: String,
    pub head: String,
    pub name: Option<String>,
}

impl EdgeId {
    pub fn new(
        tail: impl Into<String>,
        head: impl Into<String>,
        name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            tail: tail.into(),
            head: head.into(),
            name: name.map(Into::into),
        }
    }
}

pub struct Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    options: GraphOptions,
    label: G,

    default_node_label: Box<dyn Fn() -> N + Send + Sync>,
    default_edge_label: Box<dyn Fn() -> E + Send + Sync>,

    nodes: OrderedMap<String, N>,
    edges: OrderedMap<EdgeId, E>,

    // Incidence lists in insertion order. Every id in these lists is a key in
    // `edges`; removal keeps them in sync.
    out: HashMap<String, Vec<EdgeId>>,
    inn: HashMap<String, Vec<EdgeId>>,

    parent: HashMap<String, String>,
    children: HashMap<String, Vec<String>>,
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            label: G::default(),
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: OrderedMap::default(),
            edges: OrderedMap::default(),
            out: HashMap::default(),
            inn: HashMap::default(),
            parent: HashMap::default(),
            children: HashMap::default(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.label
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Box::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Box::new(f);
        self
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        self.nodes.insert(id, label);
        self
    }

    /// Inserts the node with a default label unless it already exists.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if !self.nodes.contains_key(&id) {
            let label = (self.default_node_label)();
            self.nodes.insert(id, label);
        }
        self
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.nodes.get_mut(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Removes the node, its incident edges, and its compound links. Children
    /// of a removed node move to the root of the forest.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }

        let mut incident: Vec<EdgeId> = Vec::new();
        if let Some(es) = self.out.get(id) {
            incident.extend(es.iter().cloned());
        }
        if let Some(es) = self.inn.get(id) {
            incident.extend(es.iter().cloned());
        }
        for e in incident {
            self.remove_edge_id(&e);
        }
        self.out.remove(id);
        self.inn.remove(id);

        if self.options.compound {
            if let Some(children) = self.children.remove(id) {
                for c in children {
                    self.parent.remove(&c);
                }
            }
            if let Some(p) = self.parent.remove(id) {
                if let Some(siblings) = self.children.get_mut(&p) {
                    siblings.retain(|v| v != id);
                }
            }
        }

        self.nodes.shift_remove(id).is_some()
    }

    // ------------------------------------------------------------------
    // Compound structure
    // ------------------------------------------------------------------

    pub fn set_parent(&mut self, child: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        assert!(
            self.options.compound,
            "set_parent is only valid on compound graphs"
        );
        let child = child.into();
        let parent = parent.into();

        // Reject ancestry cycles: a node may not become its own ancestor.
        let mut cursor = Some(parent.clone());
        while let Some(v) = cursor {
            assert!(v != child, "setting parent would create an ancestry cycle");
            cursor = self.parent.get(&v).cloned();
        }

        self.ensure_node(child.clone());
        self.ensure_node(parent.clone());
        self.clear_parent(&child);
        self.parent.insert(child.clone(), parent.clone());
        self.children.entry(parent).or_default().push(child);
        self
    }

    pub fn clear_parent(&mut self, child: &str) -> &mut Self {
        if let Some(p) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(&p) {
                siblings.retain(|v| v != child);
            }
        }
        self
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        self.parent.get(child).map(String::as_str)
    }

    pub fn children(&self, parent: &str) -> Vec<String> {
        self.children.get(parent).cloned().unwrap_or_default()
    }

    /// Nodes with no parent. On a non-compound graph this is every node.
    pub fn roots(&self) -> Vec<String> {
        if !self.options.compound {
            return self.node_ids();
        }
        self.nodes
            .keys()
            .filter(|id| !self.parent.contains_key(*id))
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    fn canonical_id(&self, mut id: EdgeId) -> EdgeId {
        if !self.options.directed && id.tail > id.head {
            std::mem::swap(&mut id.tail, &mut id.head);
        }
        if !self.options.multigraph {
            id.name = None;
        }
        id
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges.keys()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().cloned().collect()
    }

    pub fn set_edge(&mut self, tail: impl Into<String>, head: impl Into<String>) -> &mut Self {
        self.set_edge_named(tail, head, None::<String>, None)
    }

    pub fn set_edge_with(
        &mut self,
        tail: impl Into<String>,
        head: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(tail, head, None::<String>, Some(label))
    }

    /// Inserts or updates the edge `(tail, head, name)`. A `None` label keeps
    /// the existing label, or materializes the default for a new edge.
    pub fn set_edge_named(
        &mut self,
        tail: impl Into<String>,
        head: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let id = self.canonical_id(EdgeId::new(tail, head, name));
        self.ensure_node(id.tail.clone());
        self.ensure_node(id.head.clone());

        if self.edges.contains_key(&id) {
            if let Some(label) = label {
                self.edges.insert(id, label);
            }
            return self;
        }

        let label = label.unwrap_or_else(|| (self.default_edge_label)());
        self.out.entry(id.tail.clone()).or_default().push(id.clone());
        self.inn.entry(id.head.clone()).or_default().push(id.clone());
        self.edges.insert(id, label);
        self
    }

    pub fn set_edge_id(&mut self, id: EdgeId, label: E) -> &mut Self {
        let EdgeId { tail, head, name } = id;
        self.set_edge_named(tail, head, name, Some(label))
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, tail: &str, head: &str, name: Option<&str>) -> bool {
        let id = self.canonical_id(EdgeId::new(tail, head, name));
        self.edges.contains_key(&id)
    }

    pub fn edge(&self, tail: &str, head: &str, name: Option<&str>) -> Option<&E> {
        let id = self.canonical_id(EdgeId::new(tail, head, name));
        self.edges.get(&id)
    }

    pub fn edge_mut(&mut self, tail: &str, head: &str, name: Option<&str>) -> Option<&mut E> {
        let id = self.canonical_id(EdgeId::new(tail, head, name));
        self.edges.get_mut(&id)
    }

    pub fn edge_by_id(&self, id: &EdgeId) -> Option<&E> {
        let id = self.canonical_id(id.clone());
        self.edges.get(&id)
    }

    pub fn edge_mut_by_id(&mut self, id: &EdgeId) -> Option<&mut E> {
        let id = self.canonical_id(id.clone());
        self.edges.get_mut(&id)
    }

    pub fn remove_edge(&mut self, tail: &str, head: &str, name: Option<&str>) -> Option<E> {
        let id = EdgeId::new(tail, head, name);
        self.remove_edge_id(&id)
    }

    pub fn remove_edge_id(&mut self, id: &EdgeId) -> Option<E> {
        let id = self.canonical_id(id.clone());
        let label = self.edges.shift_remove(&id)?;
        if let Some(es) = self.out.get_mut(&id.tail) {
            es.retain(|e| e != &id);
        }
        if let Some(es) = self.inn.get_mut(&id.head) {
            es.retain(|e| e != &id);
        }
        Some(label)
    }

    /// Edges pointing at `head`, optionally restricted to one tail. On an
    /// undirected graph this is every incident edge.
    pub fn in_edges(&self, head: &str, tail: Option<&str>) -> Vec<EdgeId> {
        if !self.options.directed {
            return self.node_edges(head);
        }
        let mut out: Vec<EdgeId> = Vec::new();
        if let Some(es) = self.inn.get(head) {
            for e in es {
                if tail.is_none_or(|t| e.tail == t) {
                    out.push(e.clone());
                }
            }
        }
        out
    }

    /// Edges leaving `tail`, optionally restricted to one head.
    pub fn out_edges(&self, tail: &str, head: Option<&str>) -> Vec<EdgeId> {
        if !self.options.directed {
            return self.node_edges(tail);
        }
        let mut out: Vec<EdgeId> = Vec::new();
        if let Some(es) = self.out.get(tail) {
            for e in es {
                if head.is_none_or(|h| e.head == h) {
                    out.push(e.clone());
                }
            }
        }
        out
    }

    /// All edges incident on `v`, in insertion order, each at most once.
    pub fn node_edges(&self, v: &str) -> Vec<EdgeId> {
        let mut out: Vec<EdgeId> = Vec::new();
        if let Some(es) = self.out.get(v) {
            out.extend(es.iter().cloned());
        }
        if let Some(es) = self.inn.get(v) {
            for e in es {
                if e.tail != e.head {
                    out.push(e.clone());
                }
            }
        }
        out
    }

    pub fn successors(&self, v: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        if let Some(es) = self.out.get(v) {
            for e in es {
                if !seen.iter().any(|s| s == &e.head) {
                    seen.push(e.head.clone());
                }
            }
        }
        seen
    }

    pub fn predecessors(&self, v: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        if let Some(es) = self.inn.get(v) {
            for e in es {
                if !seen.iter().any(|s| s == &e.tail) {
                    seen.push(e.tail.clone());
                }
            }
        }
        seen
    }

    pub fn neighbors(&self, v: &str) -> Vec<String> {
        let mut seen = self.predecessors(v);
        for s in self.successors(v) {
            if !seen.iter().any(|t| t == &s) {
                seen.push(s);
            }
        }
        seen
    }

    pub fn sources(&self) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|id| self.inn.get(*id).is_none_or(Vec::is_empty))
            .cloned()
            .collect()
    }

    pub fn sinks(&self) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|id| self.out.get(*id).is_none_or(Vec::is_empty))
            .cloned()
            .collect()
    }
}

impl<N, E, G> std::fmt::Debug for Graph<N, E, G>
where
    N: Default + std::fmt::Debug + 'static,
    E: Default + std::fmt::Debug + 'static,
    G: Default + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("options", &self.options)
            .field("label", &self.label)
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .field("parent", &self.parent)
            .finish()
    }
}

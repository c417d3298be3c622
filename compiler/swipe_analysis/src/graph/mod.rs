//! Declaration graph for cross-procedural queries.
//!
//! Nodes are the package-level declarations of the root packages: types,
//! constants, functions and methods. An edge `a → b` means the body of `a`
//! calls `b`. A call through an interface method fans out to every method
//! node whose receiver implements that interface.
//!
//! ```text
//! handler ──► Svc.Create (interface) ══► svc.Create ──► store.Insert
//!                                    ╚═► mock.Create
//! ```
//!
//! The graph is built once after loading and is read-only afterwards.

mod build;

use std::collections::VecDeque;
use std::ops::ControlFlow;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use swipe_types::{ConstValue, DeclRef, FuncKind, ObjId, Program, TypeId};

/// Index of a node in the [`TypeGraph`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node identity: name, receiver type hash, type hash.
///
/// Methods use their bare name and are told apart by the receiver hash;
/// every other declaration uses its object identity and a zero receiver
/// hash.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeKey {
    pub name: String,
    pub recv_hash: u64,
    pub type_hash: u64,
}

/// A value a function returns, as far as it can be known statically.
#[derive(Clone, PartialEq, Debug)]
pub enum NodeValue {
    Const(ConstValue),
    /// A composite literal (or its address) of a named type.
    Type(TypeId),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub key: NodeKey,
    pub obj: ObjId,
    pub ty: TypeId,
    pub decl: Option<DeclRef>,
    /// Return values collected from the body, in source order.
    pub values: Vec<NodeValue>,
}

impl Node {
    /// The single return value, if it is an integer constant.
    pub fn int_value(&self) -> Option<i64> {
        match self.values.as_slice() {
            [NodeValue::Const(c)] => c.as_i64(),
            _ => None,
        }
    }

    /// The single return value, if it is a string constant.
    pub fn string_value(&self) -> Option<&str> {
        match self.values.as_slice() {
            [NodeValue::Const(c)] => c.as_str(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    nodes: Vec<Node>,
    edges: Vec<SmallVec<[NodeId; 4]>>,
    by_key: FxHashMap<NodeKey, NodeId>,
    by_obj: FxHashMap<ObjId, NodeId>,
    /// Method nodes of named types by method name.
    methods: FxHashMap<String, SmallVec<[NodeId; 2]>>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph over the root packages of `prog`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn build(prog: &Program) -> Self {
        let graph = build::build(prog);
        tracing::debug!(
            nodes = graph.len(),
            edges = graph.edges.iter().map(SmallVec::len).sum::<usize>(),
            "type graph built"
        );
        graph
    }

    /// Add `node`, or return the node already registered under its key.
    pub fn add(&mut self, node: Node) -> NodeId {
        if let Some(&id) = self.by_key.get(&node.key) {
            self.by_obj.entry(node.obj).or_insert(id);
            return id;
        }
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.by_key.insert(node.key.clone(), id);
        self.by_obj.insert(node.obj, id);
        if node.key.recv_hash != 0 {
            self.methods.entry(node.key.name.clone()).or_default().push(id);
        }
        self.nodes.push(node);
        self.edges.push(SmallVec::new());
        id
    }

    /// Add edge `from → to`; duplicate edges are ignored.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        let out = &mut self.edges[from.index()];
        if !out.contains(&to) {
            out.push(to);
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn node_by_obj(&self, obj: ObjId) -> Option<NodeId> {
        self.by_obj.get(&obj).copied()
    }

    pub fn node_by_key(&self, key: &NodeKey) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    pub fn edges(&self, id: NodeId) -> &[NodeId] {
        &self.edges[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visit every node in insertion order until `visit` breaks.
    pub fn for_each(&self, mut visit: impl FnMut(NodeId, &Node) -> ControlFlow<()>) {
        for (i, node) in self.nodes.iter().enumerate() {
            let id = NodeId(u32::try_from(i).unwrap_or(u32::MAX));
            if visit(id, node).is_break() {
                return;
            }
        }
    }

    /// Breadth-first traversal from `start`.
    ///
    /// Nodes are marked when enqueued, so each reachable node is visited
    /// exactly once; `visit` runs after dequeue and may stop the walk.
    pub fn bfs(&self, start: NodeId, mut visit: impl FnMut(NodeId, &Node) -> ControlFlow<()>) {
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some(id) = queue.pop_front() {
            if visit(id, self.node(id)).is_break() {
                return;
            }
            for &next in self.edges(id) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    /// Method nodes named `method` whose receiver implements `iface`.
    pub fn implementations(&self, prog: &Program, iface: TypeId, method: &str) -> Vec<NodeId> {
        let Some(candidates) = self.methods.get(method) else {
            return Vec::new();
        };
        candidates
            .iter()
            .copied()
            .filter(|&id| match prog.object(self.node(id).obj).func_kind() {
                Some(FuncKind::Method { recv, .. }) => prog.pointer_implements(recv, iface),
                _ => false,
            })
            .collect()
    }
}

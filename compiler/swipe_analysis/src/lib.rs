//! Analysis stages of Swipe: everything between a loaded [`Program`] and
//! the plugins.
//!
//! ```text
//! Program ──► CommentIndex ──► EnumMap ──► TypeGraph
//!                  │
//!                  ▼
//!   decode ──► Normalizer ──► IrArena ◄── plugins
//!                                ▲
//!   find_errors / find_iface_errors (over TypeGraph)
//! ```
//!
//! [`Analysis`] owns every product. The comment index, the enum map and the
//! type graph are built once when the session is created; IR nodes are
//! normalized on demand and shared by every later stage.

mod comments;
mod decode;
mod enums;
mod finder;
mod graph;
mod ids;
mod normalize;
mod scan;

#[cfg(test)]
mod test_support;

pub use comments::CommentIndex;
pub use decode::{annotation, decode};
pub use enums::{EnumConst, EnumMap, EnumValue};
pub use finder::{find_errors, find_iface_errors, ErrorType, IfaceErrors};
pub use graph::{Node, NodeId, NodeKey, NodeValue, TypeGraph};
pub use ids::{func_id, method_id, object_id};
pub use normalize::{is_context, method_identity, zero_value, Normalizer, Visited};

use swipe_diagnostic::{Diagnostic, Diagnostics};
use swipe_ir::{CancellationToken, DecodeResult, IrArena, IrId};
use swipe_types::{Driver, LoadOptions, Program};

/// One analysis session over a loaded program.
pub struct Analysis {
    program: Program,
    comments: CommentIndex,
    enums: EnumMap,
    graph: TypeGraph,
    arena: IrArena,
    visited: Visited,
}

impl Analysis {
    /// Load `opts.patterns` through `driver` and index the result.
    #[tracing::instrument(level = "debug", skip_all, fields(work_dir = %opts.work_dir.display()))]
    pub fn load(
        driver: &dyn Driver,
        opts: &LoadOptions,
        cancel: &CancellationToken,
    ) -> Result<Self, Diagnostic> {
        let program = Program::load(driver, opts, cancel)?;
        if cancel.is_cancelled() {
            return Err(Diagnostic::cancelled());
        }
        Ok(Analysis::new(program))
    }

    pub fn new(program: Program) -> Self {
        let comments = CommentIndex::build(&program);
        let enums = EnumMap::build(&program);
        let graph = TypeGraph::build(&program);
        Analysis {
            program,
            comments,
            enums,
            graph,
            arena: IrArena::new(),
            visited: Visited::default(),
        }
    }

    #[inline]
    pub fn program(&self) -> &Program {
        &self.program
    }

    #[inline]
    pub fn comments(&self) -> &CommentIndex {
        &self.comments
    }

    #[inline]
    pub fn enums(&self) -> &EnumMap {
        &self.enums
    }

    #[inline]
    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    #[inline]
    pub fn arena(&self) -> &IrArena {
        &self.arena
    }

    #[inline]
    pub fn visited(&self) -> &Visited {
        &self.visited
    }

    pub fn normalizer(&mut self) -> Normalizer<'_> {
        Normalizer::new(
            &self.program,
            &self.comments,
            &mut self.arena,
            &mut self.visited,
        )
    }

    pub fn normalize(&mut self, ty: swipe_types::TypeId) -> Result<IrId, Diagnostic> {
        self.normalizer().normalize(ty)
    }

    /// Decode the DSL calls of the root packages for the given plugins.
    pub fn decode(
        &mut self,
        plugin_ids: &[&str],
        diagnostics: &mut Diagnostics,
    ) -> Result<DecodeResult, Diagnostic> {
        let norm = Normalizer::new(
            &self.program,
            &self.comments,
            &mut self.arena,
            &mut self.visited,
        );
        decode(norm, &self.comments, plugin_ids, diagnostics)
    }

    /// Error types of the main module.
    pub fn find_errors(&self) -> Vec<ErrorType> {
        find_errors(&self.program, &self.graph, &self.program.main_module().path)
    }

    /// Errors the methods of the normalized interfaces `ifaces` may return.
    ///
    /// Handles that were not produced by this session are ignored.
    pub fn iface_errors(&self, ifaces: &[IrId], errors: &[ErrorType]) -> IfaceErrors {
        let origins: Vec<_> = ifaces
            .iter()
            .filter_map(|&id| self.visited.origin(id))
            .collect();
        find_iface_errors(&self.program, &self.graph, &origins, errors)
    }

    /// Per-package problems of the load, as warnings.
    pub fn package_diagnostics(&self) -> Vec<Diagnostic> {
        self.program
            .errors()
            .map(|(pkg, err)| {
                Diagnostic::warn(format!("{}: {}", pkg.path, err.message)).at_opt(err.pos.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;

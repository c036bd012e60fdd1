//! Program assembly: joining compilation units and splicing imports.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::{Declaration, NodeId, Program, Statement, SyntaxNode};
use crate::error::{CycleError, ImportError};
use crate::visit;

/// Supplies the program for an `import Name` declaration.
pub trait ImportLoader {
    fn load(&mut self, name: &str) -> Option<Program>;
}

impl<F> ImportLoader for F
where
    F: FnMut(&str) -> Option<Program>,
{
    fn load(&mut self, name: &str) -> Option<Program> {
        self(name)
    }
}

impl ImportLoader for FxHashMap<String, Program> {
    fn load(&mut self, name: &str) -> Option<Program> {
        self.get(name).cloned()
    }
}

impl Program {
    /// Concatenate the blocks of `programs` in order under a fresh id.
    pub fn join(programs: impl IntoIterator<Item = Program>) -> Program {
        let block = programs.into_iter().flat_map(|p| p.block).collect();
        Program::new(block)
    }

    /// Find the node with the given id anywhere in the program.
    pub fn find(&self, id: &NodeId) -> Option<SyntaxNode<'_>> {
        let mut found = None;
        visit::walk(SyntaxNode::Program(self), &mut |node| {
            if found.is_none() && node.id() == id {
                found = Some(node);
            }
        });
        found
    }

    /// Ids of every node reachable through [`visit::walk`], in pre-order.
    pub fn ids(&self) -> Vec<&NodeId> {
        let mut ids = Vec::new();
        visit::walk(SyntaxNode::Program(self), &mut |node| ids.push(node.id()));
        ids
    }
}

/// Replace every top-level `import X` with the statements of module `X`,
/// transitively.
///
/// A module is spliced at its first import only; later imports of the same
/// module are dropped. Importing a module that is still being expanded is
/// a cycle and fails with the import chain, e.g. `A -> B -> A`.
pub fn expand_imports(
    program: Program,
    loader: &mut impl ImportLoader,
) -> Result<Program, ImportError> {
    let mut expander = Expander {
        loader,
        in_progress: Vec::new(),
        expanded: FxHashSet::default(),
    };
    let block = expander.expand_block(program.block)?;
    Ok(Program {
        id: program.id,
        block,
    })
}

struct Expander<'l, L> {
    loader: &'l mut L,
    /// Modules on the current import chain, outermost first.
    in_progress: Vec<String>,
    expanded: FxHashSet<String>,
}

impl<L: ImportLoader> Expander<'_, L> {
    fn expand_block(&mut self, block: Vec<Statement>) -> Result<Vec<Statement>, ImportError> {
        let mut out = Vec::with_capacity(block.len());
        for statement in block {
            match statement {
                Statement::Declaration {
                    content: Declaration::ImportDeclaration(import),
                    ..
                } => out.extend(self.expand_module(import.name.name)?),
                other => out.push(other),
            }
        }
        Ok(out)
    }

    fn expand_module(&mut self, name: String) -> Result<Vec<Statement>, ImportError> {
        if let Some(pos) = self.in_progress.iter().position(|n| *n == name) {
            let mut cycle_path = self.in_progress[pos..].to_vec();
            cycle_path.push(name);
            return Err(ImportError::Cycle(CycleError { cycle_path }));
        }
        if self.expanded.contains(&name) {
            return Ok(Vec::new());
        }

        let module = self
            .loader
            .load(&name)
            .ok_or_else(|| ImportError::NotFound { name: name.clone() })?;

        self.in_progress.push(name.clone());
        let block = self.expand_block(module.block)?;
        self.in_progress.pop();
        self.expanded.insert(name);
        Ok(block)
    }
}

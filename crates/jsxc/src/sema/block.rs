//! Block stack: one frame per nested statement list
//!
//! Each frame carries a copy of the local variable statuses taken from the
//! enclosing frame when it was pushed, so sibling lists (the two arms of an
//! `if`, the parts of a `try`) never see each other's assignments.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::common::Token;
use crate::types::Type;
use super::AnalysisContext;

/// Definite-assignment state of a local variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalVariableStatus {
    Unset,
    Set,
}

/// Statuses of every local variable visible in a frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalVariableStatuses {
    statuses: HashMap<String, LocalVariableStatus>,
}

impl LocalVariableStatuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<String>, status: LocalVariableStatus) {
        self.statuses.insert(name.into(), status);
    }

    pub fn status(&self, name: &str) -> Option<LocalVariableStatus> {
        self.statuses.get(name).copied()
    }

    /// Mark a declared variable as assigned. Returns false if `name` is not
    /// a local of this function.
    pub fn set(&mut self, name: &str) -> bool {
        match self.statuses.get_mut(name) {
            Some(status) => {
                *status = LocalVariableStatus::Set;
                true
            }
            None => false,
        }
    }
}

/// The statement that owns a frame
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOwner {
    /// The function body itself; always the bottom frame
    Function,
    DoWhile { label: Option<Token> },
    ForIn { label: Option<Token> },
    For { label: Option<Token> },
    While { label: Option<Token> },
    /// `expr_type` is the controlling expression's type, if known
    Switch { label: Option<Token>, expr_type: Option<Type> },
    If,
    Try,
}

impl BlockOwner {
    /// Label of a labellable owner
    pub fn label(&self) -> Option<&Token> {
        match self {
            BlockOwner::DoWhile { label }
            | BlockOwner::ForIn { label }
            | BlockOwner::For { label }
            | BlockOwner::While { label }
            | BlockOwner::Switch { label, .. } => label.as_ref(),
            BlockOwner::Function | BlockOwner::If | BlockOwner::Try => None,
        }
    }

    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            BlockOwner::DoWhile { .. } | BlockOwner::ForIn { .. } | BlockOwner::For { .. } | BlockOwner::While { .. }
        )
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, BlockOwner::Switch { .. })
    }
}

/// One frame of the block stack
#[derive(Debug, Clone)]
pub struct BlockContext {
    pub statuses: LocalVariableStatuses,
    pub owner: BlockOwner,
}

impl BlockContext {
    pub fn new(statuses: LocalVariableStatuses, owner: BlockOwner) -> Self {
        Self { statuses, owner }
    }
}

/// Stack of frames. The function frame sits at index 0 and can never be
/// popped.
#[derive(Debug, Clone)]
pub struct BlockStack {
    function: BlockContext,
    nested: Vec<BlockContext>,
}

impl BlockStack {
    pub fn new(function_statuses: LocalVariableStatuses) -> Self {
        Self {
            function: BlockContext::new(function_statuses, BlockOwner::Function),
            nested: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.nested.len() + 1
    }

    pub fn top(&self) -> &BlockContext {
        self.nested.last().unwrap_or(&self.function)
    }

    pub fn top_mut(&mut self) -> &mut BlockContext {
        self.nested.last_mut().unwrap_or(&mut self.function)
    }

    /// Frames above the function frame, innermost first
    pub fn enclosing(&self) -> impl Iterator<Item = &BlockContext> {
        self.nested.iter().rev()
    }

    fn push(&mut self, owner: BlockOwner) {
        let statuses = self.top().statuses.clone();
        self.nested.push(BlockContext::new(statuses, owner));
        tracing::trace!(depth = self.depth(), "push block");
    }

    fn pop(&mut self) {
        debug_assert!(!self.nested.is_empty(), "popping the function frame");
        self.nested.pop();
        tracing::trace!(depth = self.depth(), "pop block");
    }
}

/// A pushed frame. Dereferences to the analysis context and pops the frame
/// when dropped, whichever way the nested analysis exits.
pub struct BlockGuard<'a> {
    ctx: &'a mut AnalysisContext,
}

impl<'a> BlockGuard<'a> {
    pub(crate) fn new(ctx: &'a mut AnalysisContext, owner: BlockOwner) -> Self {
        ctx.block_stack.push(owner);
        Self { ctx }
    }
}

impl Deref for BlockGuard<'_> {
    type Target = AnalysisContext;

    fn deref(&self) -> &AnalysisContext {
        self.ctx
    }
}

impl DerefMut for BlockGuard<'_> {
    fn deref_mut(&mut self) -> &mut AnalysisContext {
        self.ctx
    }
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        self.ctx.block_stack.pop();
    }
}

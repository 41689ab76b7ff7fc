//! Placement and label checks for break and continue

use crate::ast::{JumpKind, JumpStatement, StatementNode};
use crate::common::CompileError;
use super::{AnalysisContext, BlockOwner};

impl JumpKind {
    /// Whether a jump of this kind may target a frame owned by `owner`
    fn may_leave(self, owner: &BlockOwner) -> bool {
        match self {
            JumpKind::Break => owner.is_loop() || owner.is_switch(),
            JumpKind::Continue => owner.is_loop(),
        }
    }

    fn placement_error(self) -> &'static str {
        match self {
            JumpKind::Break => {
                "cannot break (a break statement is only allowed within the following statements: for/do-while/while/switch)"
            }
            JumpKind::Continue => {
                "cannot continue (a continue statement is only allowed within the following statements: for/do-while/while)"
            }
        }
    }
}

/// Check that the jump sits inside a statement it may leave, then that its
/// label (if any) names an enclosing labellable statement.
///
/// The two checks scan the stack independently: the labelled statement
/// need not be the innermost one accepted by the placement check.
pub(crate) fn check_jump(jump: &JumpStatement, ctx: &mut AnalysisContext) {
    let allowed = ctx
        .block_stack
        .enclosing()
        .any(|frame| jump.kind().may_leave(&frame.owner));
    if !allowed {
        ctx.errors
            .push(CompileError::semantic(jump.token(), jump.kind().placement_error()));
        return;
    }
    assert_is_jumpable(jump, ctx);
}

fn assert_is_jumpable(jump: &JumpStatement, ctx: &mut AnalysisContext) {
    let Some(label) = jump.label() else {
        return;
    };
    let found = ctx
        .block_stack
        .enclosing()
        .filter_map(|frame| frame.owner.label())
        .any(|statement_label| statement_label.value() == label.value());
    tracing::trace!(label = label.value(), found, "resolve jump label");
    if !found {
        ctx.errors.push(CompileError::semantic(
            label,
            format!(
                "label '{}' is either not defined or invalid as the destination",
                label.value()
            ),
        ));
    }
}

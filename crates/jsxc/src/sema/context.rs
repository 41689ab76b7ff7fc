//! State threaded through the analysis of one function body

use std::collections::HashMap;
use std::rc::Rc;

use crate::common::{CompileError, Token};
use crate::types::{ClassDefinition, Type};
use super::block::{BlockContext, BlockGuard, BlockOwner, BlockStack, LocalVariableStatuses};

/// Signature of the function whose body is being analyzed
#[derive(Debug, Clone)]
pub struct FunctionDefinition {
    pub token: Token,
    pub return_type: Type,
    pub class_def: Rc<ClassDefinition>,
}

impl FunctionDefinition {
    pub fn new(token: Token, return_type: Type, class_def: &Rc<ClassDefinition>) -> Self {
        Self {
            token,
            return_type,
            class_def: Rc::clone(class_def),
        }
    }

    pub fn name(&self) -> &str {
        self.token.value()
    }
}

/// Classes visible to the compilation unit, keyed by name and by
/// `alias.Name` for imported ones
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Rc<ClassDefinition>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class_def: &Rc<ClassDefinition>) {
        self.classes.insert(class_def.name().to_string(), Rc::clone(class_def));
    }

    pub fn register_imported(&mut self, alias: &str, class_def: &Rc<ClassDefinition>) {
        self.classes
            .insert(format!("{}.{}", alias, class_def.name()), Rc::clone(class_def));
    }

    pub fn lookup(&self, import: Option<&str>, name: &str) -> Option<&Rc<ClassDefinition>> {
        match import {
            Some(alias) => self.classes.get(&format!("{}.{}", alias, name)),
            None => self.classes.get(name),
        }
    }
}

/// Analysis context for one function body
#[derive(Debug)]
pub struct AnalysisContext {
    /// Diagnostic sink; append only
    pub errors: Vec<CompileError>,
    pub func_def: FunctionDefinition,
    pub block_stack: BlockStack,
    pub classes: Rc<ClassRegistry>,
}

impl AnalysisContext {
    pub fn new(func_def: FunctionDefinition, locals: LocalVariableStatuses, classes: Rc<ClassRegistry>) -> Self {
        Self {
            errors: Vec::new(),
            func_def,
            block_stack: BlockStack::new(locals),
            classes,
        }
    }

    pub fn top_block(&self) -> &BlockContext {
        self.block_stack.top()
    }

    pub fn top_block_mut(&mut self) -> &mut BlockContext {
        self.block_stack.top_mut()
    }

    /// Push a frame owned by `owner`, seeded from the current top frame.
    /// The frame is popped when the returned guard is dropped.
    pub fn enter_block(&mut self, owner: BlockOwner) -> BlockGuard<'_> {
        BlockGuard::new(self, owner)
    }
}

//! Mutable drafts of entities, held in an arena and assembled bottom-up.
//!
//! Scopes refer to their children by arena index. Children are always
//! pushed after their parent, so assembling from the highest index down
//! builds every child before the scope that owns it.

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::hir::entities::{
    CallSite, Class, ClassKind, EntityInfo, Function, FunctionFlags, Import, Module, Mutability,
    Parameter, Variable, VariableScope,
};

use super::helpers::expr_head;

pub(super) type ScopeId = usize;
pub(super) type VarId = usize;

/// What a name in a scope is already bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Binding {
    Function(ScopeId),
    Class(ScopeId),
    Variable(VarId),
}

#[derive(Debug)]
pub(super) enum ScopeData {
    Module {
        path: Arc<Path>,
        is_package: bool,
        exports: Option<Vec<String>>,
    },
    Class {
        bases: Vec<String>,
        metaclass: Option<String>,
        keywords: Vec<String>,
    },
    Function {
        params: Vec<Parameter>,
        returns: Option<String>,
        flags: FunctionFlags,
        owner: Option<Arc<str>>,
        /// The class scope a method belongs to
        owner_scope: Option<ScopeId>,
        /// `self` for instance methods
        receiver: Option<SmolStr>,
        calls: Vec<CallSite>,
    },
}

#[derive(Debug)]
pub(super) struct ScopeDraft {
    pub info: EntityInfo,
    pub data: ScopeData,
    pub imports: Vec<Import>,
    pub variables: Vec<VarId>,
    pub functions: Vec<ScopeId>,
    pub classes: Vec<ScopeId>,
    pub bindings: FxHashMap<SmolStr, Binding>,
}

impl ScopeDraft {
    pub fn new(info: EntityInfo, data: ScopeData) -> Self {
        Self {
            info,
            data,
            imports: Vec::new(),
            variables: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            bindings: FxHashMap::default(),
        }
    }

    pub fn qualified_name(&self) -> Arc<str> {
        self.info.qualified_name.clone()
    }

    pub fn child_name(&self, name: &str) -> Arc<str> {
        Arc::from(format!("{}.{}", self.info.qualified_name, name))
    }

    pub fn variable_scope(&self) -> VariableScope {
        match self.data {
            ScopeData::Module { .. } => VariableScope::Module,
            ScopeData::Class { .. } => VariableScope::Class,
            ScopeData::Function { .. } => VariableScope::Local,
        }
    }

    pub fn is_module(&self) -> bool {
        matches!(self.data, ScopeData::Module { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.data, ScopeData::Function { .. })
    }
}

#[derive(Debug)]
pub(super) struct VariableDraft {
    pub info: EntityInfo,
    pub annotation: Option<String>,
    pub value: Option<String>,
    pub scope: VariableScope,
}

impl VariableDraft {
    pub fn mutability(&self) -> Mutability {
        let is_final = self
            .annotation
            .as_deref()
            .is_some_and(|a| matches!(expr_head(a), "Final" | "typing.Final" | "typing_extensions.Final"));
        if is_final {
            Mutability::Final
        } else if matches!(self.scope, VariableScope::Module | VariableScope::Class)
            && crate::core::is_upper_case_name(&self.info.name)
        {
            Mutability::Constant
        } else {
            Mutability::Mutable
        }
    }

    fn finish(self) -> Variable {
        let mutability = self.mutability();
        Variable {
            info: self.info,
            annotation: self.annotation,
            value: self.value,
            scope: self.scope,
            mutability,
        }
    }
}

enum Built {
    Module(Module),
    Class(Arc<Class>),
    Function(Arc<Function>),
}

/// Drafts addressed by index
#[derive(Debug, Default)]
pub(super) struct Arena {
    pub scopes: Vec<ScopeDraft>,
    pub variables: Vec<VariableDraft>,
}

impl Arena {
    pub fn push_scope(&mut self, draft: ScopeDraft) -> ScopeId {
        self.scopes.push(draft);
        self.scopes.len() - 1
    }

    pub fn push_variable(&mut self, draft: VariableDraft) -> VarId {
        self.variables.push(draft);
        self.variables.len() - 1
    }

    /// Build the module tree rooted at scope 0.
    pub fn assemble(self) -> Option<Module> {
        let mut variables: Vec<Option<Arc<Variable>>> = self
            .variables
            .into_iter()
            .map(|v| Some(Arc::new(v.finish())))
            .collect();
        let mut built: Vec<Option<Built>> = Vec::with_capacity(self.scopes.len());
        built.resize_with(self.scopes.len(), || None);

        let mut scopes: Vec<Option<ScopeDraft>> = self.scopes.into_iter().map(Some).collect();
        for id in (0..scopes.len()).rev() {
            let Some(draft) = scopes[id].take() else {
                continue;
            };
            let vars: Vec<Arc<Variable>> = draft
                .variables
                .iter()
                .filter_map(|v| variables.get_mut(*v).and_then(Option::take))
                .collect();
            let functions: Vec<Arc<Function>> = draft
                .functions
                .iter()
                .filter_map(|f| match built.get_mut(*f).and_then(Option::take) {
                    Some(Built::Function(f)) => Some(f),
                    _ => None,
                })
                .collect();
            let classes: Vec<Arc<Class>> = draft
                .classes
                .iter()
                .filter_map(|c| match built.get_mut(*c).and_then(Option::take) {
                    Some(Built::Class(c)) => Some(c),
                    _ => None,
                })
                .collect();
            let imports: Vec<Arc<Import>> = draft.imports.into_iter().map(Arc::new).collect();

            built[id] = Some(match draft.data {
                ScopeData::Module {
                    path,
                    is_package,
                    exports,
                } => Built::Module(Module {
                    info: draft.info,
                    path,
                    is_package,
                    imports,
                    variables: vars,
                    functions,
                    classes,
                    exports,
                }),
                ScopeData::Class {
                    bases,
                    metaclass,
                    keywords,
                } => {
                    let kind = ClassKind::classify(&bases, &draft.info.decorators);
                    let is_abstract = is_abstract_class(&bases, metaclass.as_deref(), &functions);
                    Built::Class(Arc::new(Class {
                        info: draft.info,
                        bases,
                        metaclass,
                        keywords,
                        methods: functions,
                        variables: vars,
                        classes,
                        imports,
                        is_abstract,
                        kind,
                    }))
                }
                ScopeData::Function {
                    params,
                    returns,
                    flags,
                    owner,
                    calls,
                    ..
                } => Built::Function(Arc::new(Function {
                    info: draft.info,
                    params,
                    returns,
                    flags,
                    owner,
                    calls,
                    functions,
                    classes,
                    variables: vars,
                    imports,
                })),
            });
        }

        match built.into_iter().next().flatten() {
            Some(Built::Module(module)) => Some(module),
            _ => None,
        }
    }
}

fn is_abstract_class(bases: &[String], metaclass: Option<&str>, methods: &[Arc<Function>]) -> bool {
    bases.iter().any(|b| {
        matches!(
            expr_head(b),
            "ABC" | "abc.ABC" | "Protocol" | "typing.Protocol" | "typing_extensions.Protocol"
        )
    }) || metaclass.is_some_and(|m| matches!(expr_head(m), "ABCMeta" | "abc.ABCMeta"))
        || methods.iter().any(|m| m.flags.is_abstract)
}

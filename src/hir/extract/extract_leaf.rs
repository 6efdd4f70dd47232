//! Leaf extraction: imports, variables and call sites.

use rowan::TextRange;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::core::text_utils::truncate_chars;
use crate::hir::diagnostics::DiagnosticKind;
use crate::hir::entities::{CallSite, Import, ImportResolution, ImportedName, VariableScope};
use crate::parser::{
    AnnAssignStmt, AssignStmt, AstNode, AttributeExpr, AugAssignStmt, FromImportStmt, ImportStmt,
    NameRef, SyntaxKind, SyntaxNode, TypeAliasStmt,
};

use super::Extractor;
use super::drafts::{Binding, ScopeData, ScopeId, VariableDraft};
use super::helpers::{collect_calls, normalize_expr, string_sequence, target_name, unpacked_names};

const ALL: &str = "__all__";

/// A name binding found in an assignment target
struct Target {
    name: String,
    range: TextRange,
    annotation: Option<String>,
    value: Option<String>,
    doc: Option<(String, TextRange)>,
}

impl Extractor {
    // ========================================================================
    // Imports
    // ========================================================================

    /// `import a.b, c as d`: one import entity per alias
    pub(super) fn extract_import(&mut self, scope: ScopeId, stmt: &ImportStmt) {
        let range = stmt.syntax().text_range();
        for alias in stmt.aliases() {
            let Some(module) = alias.name() else {
                continue;
            };
            let imported = ImportedName {
                name: SmolStr::new(&module),
                alias: alias.alias().map(|t| SmolStr::new(t.text())),
            };
            self.push_import(scope, range, module, 0, vec![imported], false, false);
        }
    }

    /// `from ..pkg import a, b as c`: one import entity per statement
    pub(super) fn extract_from_import(&mut self, scope: ScopeId, stmt: &FromImportStmt) {
        let level = stmt.level();
        let mut module = ".".repeat(level as usize);
        if let Some(path) = stmt.module() {
            module.push_str(&path.text());
        }
        let names: Vec<ImportedName> = stmt
            .aliases()
            .filter_map(|alias| {
                Some(ImportedName {
                    name: SmolStr::new(alias.name()?),
                    alias: alias.alias().map(|t| SmolStr::new(t.text())),
                })
            })
            .collect();
        let range = stmt.syntax().text_range();
        self.push_import(scope, range, module, level, names, true, stmt.is_wildcard());
    }

    #[allow(clippy::too_many_arguments)]
    fn push_import(
        &mut self,
        scope: ScopeId,
        range: TextRange,
        module: String,
        level: u32,
        names: Vec<ImportedName>,
        is_from: bool,
        is_wildcard: bool,
    ) {
        let parent = self.arena.scopes[scope].qualified_name();
        let qualified_name = self.ctx.next_import_name(&parent, range);
        let info = self.ctx.info(
            &module,
            qualified_name.clone(),
            Some(parent.clone()),
            range,
            Vec::new(),
        );
        let mut import = Import {
            info,
            module,
            level,
            names,
            is_from,
            is_wildcard,
            resolution: ImportResolution::Unresolved,
        };
        // Named after the first name it binds
        let display = if is_wildcard {
            Some("*".to_string())
        } else {
            import.bindings().next().map(|(bound, _)| bound.to_string())
        };
        if let Some(display) = display {
            import.info = self
                .ctx
                .info(&display, qualified_name, Some(parent), range, Vec::new());
        }
        self.arena.scopes[scope].imports.push(import);
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    pub(super) fn extract_assign(
        &mut self,
        scope: ScopeId,
        stmt: &AssignStmt,
        outer: &FxHashSet<SmolStr>,
        doc: Option<(String, TextRange)>,
    ) {
        let value_node = stmt.value();
        let value = value_node.as_ref().map(|v| self.value_text(v));

        for target in stmt.targets() {
            match target.kind() {
                SyntaxKind::NAME_REF => {
                    let Some(name) = target_name(&target) else {
                        continue;
                    };
                    if name == ALL && self.arena.scopes[scope].is_module() {
                        self.set_exports(scope, value_node.as_ref(), false);
                    }
                    self.bind_variable(
                        scope,
                        outer,
                        Target {
                            name,
                            range: target.text_range(),
                            annotation: None,
                            value: value.clone(),
                            doc: doc.clone(),
                        },
                    );
                }
                SyntaxKind::ATTRIBUTE_EXPR => {
                    self.bind_instance_attribute(scope, &target, None, value.clone());
                }
                SyntaxKind::TUPLE_EXPR
                | SyntaxKind::LIST_EXPR
                | SyntaxKind::PAREN_EXPR
                | SyntaxKind::STARRED_EXPR => {
                    for name in unpacked_names(&target) {
                        self.bind_variable(
                            scope,
                            outer,
                            Target {
                                name,
                                range: target.text_range(),
                                annotation: None,
                                value: None,
                                doc: None,
                            },
                        );
                    }
                }
                _ => {}
            }
        }
    }

    pub(super) fn extract_ann_assign(
        &mut self,
        scope: ScopeId,
        stmt: &AnnAssignStmt,
        outer: &FxHashSet<SmolStr>,
        doc: Option<(String, TextRange)>,
    ) {
        let Some(target) = stmt.target() else {
            return;
        };
        let annotation = stmt.annotation().map(|a| normalize_expr(&a));
        let value_node = stmt.value();
        let value = value_node.as_ref().map(|v| self.value_text(v));

        match target.kind() {
            SyntaxKind::NAME_REF => {
                let Some(name) = target_name(&target) else {
                    return;
                };
                if name == ALL && self.arena.scopes[scope].is_module() {
                    self.set_exports(scope, value_node.as_ref(), false);
                }
                self.bind_variable(
                    scope,
                    outer,
                    Target {
                        name,
                        range: target.text_range(),
                        annotation,
                        value,
                        doc,
                    },
                );
            }
            SyntaxKind::ATTRIBUTE_EXPR => {
                self.bind_instance_attribute(scope, &target, annotation, value);
            }
            _ => {}
        }
    }

    /// Only `__all__ += [...]` matters; other augmented targets are already bound.
    pub(super) fn extract_aug_assign(&mut self, scope: ScopeId, stmt: &AugAssignStmt) {
        if !self.arena.scopes[scope].is_module() {
            return;
        }
        let is_all = stmt
            .target()
            .and_then(|t| target_name(&t))
            .is_some_and(|name| name == ALL);
        if is_all {
            self.set_exports(scope, stmt.value().as_ref(), true);
        }
    }

    pub(super) fn extract_type_alias(
        &mut self,
        scope: ScopeId,
        stmt: &TypeAliasStmt,
        outer: &FxHashSet<SmolStr>,
    ) {
        let Some(name) = stmt.name() else {
            return;
        };
        let range = stmt.syntax().text_range();
        self.ctx.report(
            DiagnosticKind::UnsupportedConstruct,
            range,
            format!("`type {}` alias recorded as a plain variable", name.text()),
        );
        let value = stmt.value().map(|v| self.value_text(&v));
        self.bind_variable(
            scope,
            outer,
            Target {
                name: name.text().to_string(),
                range: name.text_range(),
                annotation: None,
                value,
                doc: None,
            },
        );
    }

    fn value_text(&self, node: &SyntaxNode) -> String {
        truncate_chars(&normalize_expr(node), self.ctx.max_value_len)
    }

    fn set_exports(&mut self, scope: ScopeId, value: Option<&SyntaxNode>, extend: bool) {
        let names = value.and_then(string_sequence);
        let ScopeData::Module { exports, .. } = &mut self.arena.scopes[scope].data else {
            return;
        };
        match (names, extend) {
            (Some(names), true) => exports.get_or_insert_with(Vec::new).extend(names),
            (Some(names), false) => *exports = Some(names),
            // A computed __all__ cannot be followed
            (None, _) => {}
        }
    }

    /// Bind `target` in `scope`. The first binding wins; a later annotation
    /// fills a missing one.
    fn bind_variable(&mut self, scope: ScopeId, outer: &FxHashSet<SmolStr>, target: Target) {
        let draft = &self.arena.scopes[scope];
        if draft.is_function() && outer.contains(target.name.as_str()) {
            return;
        }
        if let Some(binding) = draft.bindings.get(target.name.as_str()).copied() {
            if let (Binding::Variable(id), Some(annotation)) = (binding, target.annotation) {
                let existing = &mut self.arena.variables[id];
                if existing.annotation.is_none() {
                    existing.annotation = Some(annotation);
                }
            }
            return;
        }

        let parent = draft.qualified_name();
        let qualified_name = draft.child_name(&target.name);
        let variable_scope = draft.variable_scope();
        let mut info = self
            .ctx
            .info(&target.name, qualified_name, Some(parent), target.range, Vec::new());
        if let Some((raw, range)) = &target.doc {
            self.set_docstring(&mut info, raw, *range);
        }

        let id = self.arena.push_variable(VariableDraft {
            info,
            annotation: target.annotation,
            value: target.value,
            scope: variable_scope,
        });
        let draft = &mut self.arena.scopes[scope];
        draft.variables.push(id);
        draft
            .bindings
            .insert(SmolStr::new(&target.name), Binding::Variable(id));
    }

    /// `self.x = ...` inside a method adds an instance attribute to its class.
    fn bind_instance_attribute(
        &mut self,
        scope: ScopeId,
        target: &SyntaxNode,
        annotation: Option<String>,
        value: Option<String>,
    ) {
        let ScopeData::Function {
            owner_scope: Some(class),
            receiver: Some(receiver),
            ..
        } = &self.arena.scopes[scope].data
        else {
            return;
        };
        let class = *class;
        let Some(attribute) = AttributeExpr::cast(target.clone()) else {
            return;
        };
        let is_receiver = attribute
            .receiver()
            .and_then(NameRef::cast)
            .is_some_and(|r| r.text() == receiver.as_str());
        let Some(attr) = attribute.attr() else {
            return;
        };
        if !is_receiver {
            return;
        }
        let name = attr.text();

        let class_draft = &self.arena.scopes[class];
        if class_draft.bindings.contains_key(name) {
            return;
        }
        let parent = class_draft.qualified_name();
        let qualified_name = class_draft.child_name(name);
        let info = self
            .ctx
            .info(name, qualified_name, Some(parent), target.text_range(), Vec::new());
        let id = self.arena.push_variable(VariableDraft {
            info,
            annotation,
            value,
            scope: VariableScope::Instance,
        });
        let class_draft = &mut self.arena.scopes[class];
        class_draft.variables.push(id);
        class_draft
            .bindings
            .insert(SmolStr::new(name), Binding::Variable(id));
    }

    // ========================================================================
    // Calls
    // ========================================================================

    pub(super) fn extract_calls(&mut self, scope: ScopeId, body: &SyntaxNode) {
        let sites: Vec<CallSite> = collect_calls(body)
            .into_iter()
            .filter_map(|call| {
                let callee = call.callee()?;
                Some(CallSite {
                    callee: normalize_expr(&callee),
                    location: self.ctx.location(call.syntax().text_range()),
                })
            })
            .collect();
        if let ScopeData::Function { calls, .. } = &mut self.arena.scopes[scope].data {
            calls.extend(sites);
        }
    }
}

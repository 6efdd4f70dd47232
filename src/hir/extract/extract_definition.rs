//! Function and class extraction.

use smol_str::SmolStr;

use crate::hir::diagnostics::DiagnosticKind;
use crate::hir::entities::{Decorator, FunctionFlags, KnownDecorator, ParamKind, Parameter};
use crate::parser::{AstNode, ClassDef, FunctionDef, ParamList, ParamMarker, Statement};

use super::Extractor;
use super::Task;
use super::drafts::{Binding, ScopeData, ScopeDraft, ScopeId};
use super::helpers::{leading_docstring, normalize_expr};

const CONSTRUCTORS: &[&str] = &["__init__", "__new__"];
const IMPLICIT_CLASSMETHODS: &[&str] = &["__init_subclass__", "__class_getitem__"];

impl Extractor {
    pub(super) fn extract_function(
        &mut self,
        scope: ScopeId,
        def: &FunctionDef,
        decorators: Vec<Decorator>,
    ) {
        let Some(name_token) = def.name() else {
            return;
        };
        let name = name_token.text();
        let range = def.syntax().text_range();
        let statements: Vec<Statement> = def
            .body()
            .map(|b| b.statements().collect())
            .unwrap_or_default();

        match self.arena.scopes[scope].bindings.get(name).copied() {
            Some(Binding::Function(existing)) if self.folds_into(existing, name, &decorators) => {
                self.fold_function(existing, &decorators, &statements);
                return;
            }
            Some(_) => {
                self.ctx.report(
                    DiagnosticKind::DuplicateDefinition,
                    range,
                    format!("`{name}` is already defined in this scope; later definition ignored"),
                );
                return;
            }
            None => {}
        }

        let parent = &self.arena.scopes[scope];
        let parent_name = parent.qualified_name();
        let qualified_name = parent.child_name(name);
        let (owner, owner_scope) = match parent.data {
            ScopeData::Class { .. } => (Some(parent_name.clone()), Some(scope)),
            _ => (None, None),
        };

        let params = extract_params(def.param_list());
        let returns = def.return_type().map(|node| normalize_expr(&node));
        let flags = function_flags(name, owner.is_some(), def.is_async(), &decorators);
        let receiver = if owner.is_some() && !flags.is_static && !flags.is_classmethod {
            params
                .first()
                .filter(|p| {
                    matches!(
                        p.kind,
                        ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword
                    )
                })
                .map(|p| p.name.clone())
        } else {
            None
        };

        let mut info = self
            .ctx
            .info(name, qualified_name, Some(parent_name), range, decorators);
        self.attach_docstring(&mut info, &statements);

        let data = ScopeData::Function {
            params,
            returns,
            flags,
            owner,
            owner_scope,
            receiver,
            calls: Vec::new(),
        };
        let id = self.arena.push_scope(ScopeDraft::new(info, data));
        let parent = &mut self.arena.scopes[scope];
        parent.functions.push(id);
        parent.bindings.insert(SmolStr::new(name), Binding::Function(id));

        self.queue.push_back(Task {
            scope: id,
            statements,
            body: def.body().map(|b| b.syntax().clone()),
        });
    }

    /// Overload groups and property accessors share one entity.
    fn folds_into(&self, existing: ScopeId, name: &str, decorators: &[Decorator]) -> bool {
        let ScopeData::Function { flags, .. } = &self.arena.scopes[existing].data else {
            return false;
        };
        let is_overload = decorators
            .iter()
            .any(|d| d.known == Some(KnownDecorator::Overload));
        let is_accessor = decorators
            .iter()
            .filter_map(|d| d.known.as_ref())
            .any(|k| k.accessor_of() == Some(name));
        flags.is_overload || is_overload || (flags.is_property && is_accessor)
    }

    fn fold_function(&mut self, existing: ScopeId, decorators: &[Decorator], statements: &[Statement]) {
        let is_overload = decorators
            .iter()
            .any(|d| d.known == Some(KnownDecorator::Overload));
        if is_overload {
            if let ScopeData::Function { flags, .. } = &mut self.arena.scopes[existing].data {
                flags.is_overload = true;
            }
        }
        if self.arena.scopes[existing].info.docstring.is_some() {
            return;
        }
        if let Some((raw, node)) = leading_docstring(statements) {
            let (cleaned, parsed) = self.ctx.docstring(&raw, node.text_range());
            let info = &mut self.arena.scopes[existing].info;
            info.docstring = Some(cleaned);
            info.parsed_doc = Some(parsed);
        }
    }

    pub(super) fn extract_class(&mut self, scope: ScopeId, def: &ClassDef, decorators: Vec<Decorator>) {
        let Some(name_token) = def.name() else {
            return;
        };
        let name = name_token.text();
        let range = def.syntax().text_range();

        if self.arena.scopes[scope].bindings.contains_key(name) {
            self.ctx.report(
                DiagnosticKind::DuplicateDefinition,
                range,
                format!("`{name}` is already defined in this scope; later definition ignored"),
            );
            return;
        }

        let mut bases = Vec::new();
        let mut metaclass = None;
        let mut keywords = Vec::new();
        for arg in def.arg_list().into_iter().flat_map(|list| list.args()) {
            if arg.is_unpack() {
                continue;
            }
            let Some(expr) = arg.expr() else {
                continue;
            };
            let value = normalize_expr(&expr);
            match arg.keyword() {
                Some(keyword) if keyword.text() == "metaclass" => metaclass = Some(value),
                Some(keyword) => keywords.push(format!("{}={}", keyword.text(), value)),
                None => bases.push(value),
            }
        }

        let statements: Vec<Statement> = def
            .body()
            .map(|b| b.statements().collect())
            .unwrap_or_default();
        let parent = &self.arena.scopes[scope];
        let parent_name = parent.qualified_name();
        let qualified_name = parent.child_name(name);
        let mut info = self
            .ctx
            .info(name, qualified_name, Some(parent_name), range, decorators);
        self.attach_docstring(&mut info, &statements);

        let data = ScopeData::Class {
            bases,
            metaclass,
            keywords,
        };
        let id = self.arena.push_scope(ScopeDraft::new(info, data));
        let parent = &mut self.arena.scopes[scope];
        parent.classes.push(id);
        parent.bindings.insert(SmolStr::new(name), Binding::Class(id));

        self.queue.push_back(Task {
            scope: id,
            statements,
            body: None,
        });
    }
}

fn function_flags(name: &str, is_method: bool, is_async: bool, decorators: &[Decorator]) -> FunctionFlags {
    let has = |known: KnownDecorator| decorators.iter().any(|d| d.known.as_ref() == Some(&known));
    FunctionFlags {
        is_constructor: is_method && CONSTRUCTORS.contains(&name),
        is_property: decorators
            .iter()
            .filter_map(|d| d.known.as_ref())
            .any(KnownDecorator::is_property_like),
        is_async,
        is_static: has(KnownDecorator::StaticMethod),
        is_classmethod: has(KnownDecorator::ClassMethod)
            || (is_method && IMPLICIT_CLASSMETHODS.contains(&name)),
        is_abstract: has(KnownDecorator::AbstractMethod),
        is_overload: has(KnownDecorator::Overload),
    }
}

fn extract_params(list: Option<ParamList>) -> Vec<Parameter> {
    let mut params: Vec<Parameter> = Vec::new();
    let mut keyword_only = false;

    for param in list.into_iter().flat_map(|l| l.params()) {
        let marker = param.marker();
        if marker == ParamMarker::Slash {
            for earlier in &mut params {
                if earlier.kind == ParamKind::PositionalOrKeyword {
                    earlier.kind = ParamKind::PositionalOnly;
                }
            }
            continue;
        }
        if marker == ParamMarker::Star {
            keyword_only = true;
        }
        let Some(name) = param.name() else {
            continue;
        };
        let kind = match marker {
            ParamMarker::Star => ParamKind::VarPositional,
            ParamMarker::DoubleStar => ParamKind::VarKeyword,
            _ if keyword_only => ParamKind::KeywordOnly,
            _ => ParamKind::PositionalOrKeyword,
        };
        params.push(Parameter {
            name: SmolStr::new(name.text()),
            annotation: param.annotation().map(|n| normalize_expr(&n)),
            default: param.default().map(|n| normalize_expr(&n)),
            kind,
        });
    }
    params
}

//! Source extraction: parse one file and build its [`Module`] tree.
//!
//! Scopes are processed breadth-first from a FIFO worklist. Each scope
//! becomes a draft in an arena; drafts are assembled bottom-up once every
//! body has been visited, so recursion depth never follows nesting depth.

mod context;
mod drafts;
mod extract_definition;
mod extract_leaf;
mod helpers;

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use rowan::TextRange;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::debug;

use crate::base::LineIndex;
use crate::core::text_utils::last_segment;
use crate::hir::diagnostics::{Diagnostic, DiagnosticKind};
use crate::hir::entities::{Decorator, EntityInfo, Module, Visibility};
use crate::parser::{AstNode, Definition, SourceFile, Statement, SyntaxNode, parse_python};
use crate::project::AnalysisConfig;

use context::ExtractionContext;
use drafts::{Arena, ScopeData, ScopeDraft, ScopeId};

pub use helpers::{expr_head, is_package_file, module_name, normalize_expr};

/// Parse one source file into a module entity.
///
/// A file with any syntax error yields no module and a single
/// [`DiagnosticKind::ParseError`] at the first error.
pub fn parse_source(
    path: &Path,
    text: &str,
    config: &AnalysisConfig,
) -> (Option<Module>, Vec<Diagnostic>) {
    let file: Arc<Path> = Arc::from(path);
    let parse = parse_python(text);
    if let Some(error) = parse.first_error() {
        let span = LineIndex::new(text).span(error.range);
        debug!("{}: rejected, {}", path.display(), error.message);
        let diagnostic =
            Diagnostic::parse_error(file, span, format!("syntax error: {}", error.message));
        return (None, vec![diagnostic]);
    }
    let Some(source) = SourceFile::cast(parse.syntax()) else {
        let diagnostic = Diagnostic::parse_error(file, Default::default(), "no source file root");
        return (None, vec![diagnostic]);
    };

    let qualified_name = module_name(path, config.root());
    let ctx = ExtractionContext::new(file, text, config.max_value_len);
    let extractor = Extractor::new(ctx);
    let (module, diagnostics) = extractor.run(&source, &qualified_name, is_package_file(path));
    if let Some(module) = &module {
        debug!(
            "{}: extracted `{}` ({} diagnostics)",
            path.display(),
            module.info.qualified_name,
            diagnostics.len()
        );
    }
    (module, diagnostics)
}

/// One scope body waiting to be visited
struct Task {
    scope: ScopeId,
    statements: Vec<Statement>,
    /// Function body node, walked for call sites
    body: Option<SyntaxNode>,
}

/// A statement after compound blocks were flattened, tagged with its block
struct FlatStatement {
    statement: Statement,
    block: u32,
}

pub(super) struct Extractor {
    ctx: ExtractionContext,
    arena: Arena,
    queue: VecDeque<Task>,
}

impl Extractor {
    fn new(ctx: ExtractionContext) -> Self {
        Self {
            ctx,
            arena: Arena::default(),
            queue: VecDeque::new(),
        }
    }

    fn run(
        mut self,
        source: &SourceFile,
        qualified_name: &str,
        is_package: bool,
    ) -> (Option<Module>, Vec<Diagnostic>) {
        let statements: Vec<Statement> = source.statements().collect();
        let name = last_segment(qualified_name);
        let mut info = self.ctx.info(
            name,
            Arc::from(qualified_name),
            None,
            source.syntax().text_range(),
            Vec::new(),
        );
        self.attach_docstring(&mut info, &statements);
        let data = ScopeData::Module {
            path: self.ctx.file.clone(),
            is_package,
            exports: None,
        };
        let root = self.arena.push_scope(ScopeDraft::new(info, data));
        self.queue.push_back(Task {
            scope: root,
            statements,
            body: None,
        });

        while let Some(task) = self.queue.pop_front() {
            self.extract_body(task);
        }

        self.apply_exports(root);
        (self.arena.assemble(), self.ctx.diagnostics)
    }

    fn extract_body(&mut self, task: Task) {
        let Task {
            scope,
            statements,
            body,
        } = task;
        let flat = flatten(statements);
        let outer = outer_names(&flat);
        let is_module = self.arena.scopes[scope].is_module();

        for (index, item) in flat.iter().enumerate() {
            match &item.statement {
                Statement::FunctionDef(def) => self.extract_function(scope, def, Vec::new()),
                Statement::ClassDef(def) => self.extract_class(scope, def, Vec::new()),
                Statement::Decorated(decorated) => {
                    let decorators: Vec<Decorator> = decorated
                        .decorators()
                        .filter_map(|d| d.expr())
                        .map(|e| Decorator::new(normalize_expr(&e)))
                        .collect();
                    match decorated.definition() {
                        Some(Definition::Function(def)) => {
                            self.extract_function(scope, &def, decorators)
                        }
                        Some(Definition::Class(def)) => self.extract_class(scope, &def, decorators),
                        None => {}
                    }
                }
                Statement::Import(stmt) => self.extract_import(scope, stmt),
                Statement::FromImport(stmt) => self.extract_from_import(scope, stmt),
                Statement::Assign(stmt) => {
                    let doc = attribute_docstring(&flat, index);
                    self.extract_assign(scope, stmt, &outer, doc);
                }
                Statement::AnnAssign(stmt) => {
                    let doc = attribute_docstring(&flat, index);
                    self.extract_ann_assign(scope, stmt, &outer, doc);
                }
                Statement::AugAssign(stmt) => self.extract_aug_assign(scope, stmt),
                Statement::TypeAlias(stmt) => self.extract_type_alias(scope, stmt, &outer),
                Statement::Global(stmt) if is_module => {
                    self.ctx.report(
                        DiagnosticKind::UnsupportedConstruct,
                        stmt.syntax().text_range(),
                        "`global` at module level has no effect; ignored",
                    );
                }
                Statement::Global(_)
                | Statement::Nonlocal(_)
                | Statement::Expr(_)
                | Statement::Compound(_)
                | Statement::Other(_) => {}
            }
        }

        if let Some(body) = body {
            self.extract_calls(scope, &body);
        }
    }

    /// Attach the leading docstring of `statements` to `info`.
    fn attach_docstring(&mut self, info: &mut EntityInfo, statements: &[Statement]) {
        if let Some((raw, node)) = helpers::leading_docstring(statements) {
            self.set_docstring(info, &raw, node.text_range());
        }
    }

    fn set_docstring(&mut self, info: &mut EntityInfo, raw: &str, range: TextRange) {
        let (cleaned, parsed) = self.ctx.docstring(raw, range);
        info.docstring = Some(cleaned);
        info.parsed_doc = Some(parsed);
    }

    /// `__all__` decides the visibility of top-level names when present.
    fn apply_exports(&mut self, root: ScopeId) {
        let exports: FxHashSet<String> = match &self.arena.scopes[root].data {
            ScopeData::Module {
                exports: Some(exports),
                ..
            } => exports.iter().cloned().collect(),
            _ => return,
        };
        let visibility = |name: &str| {
            if exports.contains(name) {
                Visibility::Public
            } else {
                Visibility::Private
            }
        };

        let (functions, classes, variables) = {
            let module = &self.arena.scopes[root];
            (
                module.functions.clone(),
                module.classes.clone(),
                module.variables.clone(),
            )
        };
        for id in functions.into_iter().chain(classes) {
            let info = &mut self.arena.scopes[id].info;
            info.visibility = visibility(&info.name);
        }
        for id in variables {
            let info = &mut self.arena.variables[id].info;
            info.visibility = visibility(&info.name);
        }
        for import in &mut self.arena.scopes[root].imports {
            import.info.visibility = visibility(&import.info.name);
        }
    }
}

/// Inline compound statement blocks, keeping source order.
fn flatten(statements: Vec<Statement>) -> Vec<FlatStatement> {
    let mut out = Vec::with_capacity(statements.len());
    let mut next_block = 1;
    let mut stack: Vec<FlatStatement> = statements
        .into_iter()
        .rev()
        .map(|statement| FlatStatement {
            statement,
            block: 0,
        })
        .collect();

    while let Some(item) = stack.pop() {
        if let Statement::Compound(compound) = &item.statement {
            for block in compound.blocks().into_iter().rev() {
                let id = next_block;
                next_block += 1;
                let inner: Vec<Statement> = block.statements().collect();
                stack.extend(inner.into_iter().rev().map(|statement| FlatStatement {
                    statement,
                    block: id,
                }));
            }
        }
        out.push(item);
    }
    out
}

/// Names declared `global`/`nonlocal` in this body
fn outer_names(flat: &[FlatStatement]) -> FxHashSet<SmolStr> {
    let mut names = FxHashSet::default();
    for item in flat {
        match &item.statement {
            Statement::Global(stmt) => names.extend(stmt.names().map(|t| SmolStr::new(t.text()))),
            Statement::Nonlocal(stmt) => {
                names.extend(stmt.names().map(|t| SmolStr::new(t.text())))
            }
            _ => {}
        }
    }
    names
}

/// A string statement directly after an assignment in the same block
fn attribute_docstring(flat: &[FlatStatement], index: usize) -> Option<(String, TextRange)> {
    let current = flat.get(index)?;
    let next = flat.get(index + 1)?;
    if next.block != current.block {
        return None;
    }
    match &next.statement {
        Statement::Expr(expr) => Some((expr.string_value()?, expr.syntax().text_range())),
        _ => None,
    }
}

//! The traversal dispatcher: one depth-first pass over a module.
//!
//! Per declaration: suppression check, classification, wrap-state detection,
//! then rewrite. Classification and wrap-state are decided on the original
//! node before its subtree is visited; the wrap call built by the rewrite is
//! never visited, so a component cannot be wrapped twice in one pass.

use std::sync::Arc;

use swc_core::{
    common::{comments::Comments, SourceMapper, Span, DUMMY_SP},
    ecma::{
        ast::*,
        visit::{visit_mut_pass, VisitMut, VisitMutWith},
    },
};

use crate::{
    classify::Declaration,
    config::Config,
    imports::{self, ImportOutcome, ImportScan},
    normalize_filename,
    pragma::Suppression,
    rewrite,
    wrap_state,
};

/// Where a declaration sits. Each site has its own visitor entry, which picks
/// the rewrite: `Statement` declarations go through `rebind_declaration`,
/// `ExportDefault` declarations through `rebind_default_export`, expressions at
/// any site through `wrap_in_place`. The site is reported with every verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSite {
    VarDeclarator,
    ExportDefault,
    Statement,
    Argument,
    Nested,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Unvisited,
    Traversed,
    NodesRewritten,
    ImportResolved,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Wrap,
    Suppressed,
    NotComponent,
    Decorated,
}

/// Everything the pass learns about one module. Rebuilt for every module.
#[derive(Debug, Default)]
pub struct ModuleContext {
    pub suppression: Suppression,
    pub imports: ImportScan,
    /// Unsuppressed components found: wrapped here, already wrapped, or
    /// decorated with the wrap symbol. Any of them needs the import.
    pub components: usize,
    pub wrapped: usize,
    pub import_outcome: Option<ImportOutcome>,
    pub phase: Phase,
}

pub struct AutoObserver<C: Comments> {
    config: Config,
    comments: C,
    source_map: Option<Arc<dyn SourceMapper>>,
    ctx: ModuleContext,
}

/// The transform as an SWC pass, for hosts that drive passes themselves.
pub fn auto_observer<C: Comments>(config: Config, comments: C) -> impl Pass {
    visit_mut_pass(AutoObserver::new(config, comments, None))
}

impl<C: Comments> AutoObserver<C> {
    pub fn new(config: Config, comments: C, source_map: Option<Arc<dyn SourceMapper>>) -> Self {
        Self {
            config,
            comments,
            source_map,
            ctx: ModuleContext::default(),
        }
    }

    /// State of the last module visited.
    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    fn span_file_lines(&self, s: Span) -> String {
        if s.is_dummy() {
            return "unknown:0-0".to_string();
        }
        if let Some(ref cm) = self.source_map {
            let lo = cm.lookup_char_pos(s.lo());
            let hi = cm.lookup_char_pos(s.hi());
            return format!(
                "{}:{}-{}",
                normalize_filename(&lo.file.name.to_string()),
                lo.line,
                hi.line
            );
        }
        "unknown:0-0".to_string()
    }

    fn symbol(&self) -> &str {
        &self.config.wrap_symbol_name
    }

    fn inspect(&mut self, decl: &Declaration<'_>, site: BindingSite) -> Verdict {
        let verdict = if self.ctx.suppression.covers(decl.span()) {
            Verdict::Suppressed
        } else if !decl.is_component() {
            Verdict::NotComponent
        } else if wrap_state::is_decorated(decl.decorators(), self.symbol()) {
            Verdict::Decorated
        } else {
            Verdict::Wrap
        };
        debug_log!(
            self.config,
            kind = decl.kind(),
            name = decl.name().unwrap_or("Anonymous"),
            site = ?site,
            location = %self.span_file_lines(decl.span()),
            verdict = ?verdict,
            "classified declaration"
        );
        if verdict == Verdict::Decorated {
            self.ctx.components += 1;
        }
        verdict
    }

    fn record_wrap(&mut self) {
        self.ctx.components += 1;
        self.ctx.wrapped += 1;
    }

    /// Expression-shaped declarations: arrows, function and class expressions.
    fn visit_site(&mut self, expr: &mut Expr, site: BindingSite) {
        let Some(verdict) = Declaration::from_expr(expr).map(|decl| self.inspect(&decl, site))
        else {
            expr.visit_mut_children_with(self);
            return;
        };
        expr.visit_mut_children_with(self);
        if verdict == Verdict::Wrap {
            rewrite::wrap_in_place(expr, &self.config.wrap_symbol_name);
            self.record_wrap();
        }
    }

    /// Arguments of an existing wrap call are already bound; only their
    /// bodies are visited.
    fn visit_wrapped_arg(&mut self, arg: &mut Expr) {
        match wrap_state::wrapped_target(arg) {
            Some((target, state)) => {
                let component = Declaration::from_expr(target).filter(|decl| {
                    decl.is_component() && !self.ctx.suppression.covers(decl.span())
                });
                debug_log!(
                    self.config,
                    kind = component.map(|d| d.kind()).unwrap_or("non-component"),
                    state = ?state,
                    "already wrapped"
                );
                if component.is_some() {
                    self.ctx.components += 1;
                }
                target.visit_mut_children_with(self);
            }
            None => self.visit_site(arg, BindingSite::Argument),
        }
    }

    fn visit_default_export(&mut self, mut export: ExportDefaultDecl) -> Vec<ModuleItem> {
        let verdict = Declaration::from_default_decl(&export.decl)
            .map(|decl| self.inspect(&decl, BindingSite::ExportDefault));
        export.decl.visit_mut_children_with(self);
        if verdict == Some(Verdict::Wrap) {
            self.record_wrap();
            return rewrite::rebind_default_export(export, &self.config.wrap_symbol_name);
        }
        vec![ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export))]
    }
}

impl<C: Comments> VisitMut for AutoObserver<C> {
    /// Scripts cannot carry an import, so one that needs the wrap import is
    /// promoted to a module.
    fn visit_mut_program(&mut self, program: &mut Program) {
        let Program::Script(script) = program else {
            program.visit_mut_children_with(self);
            return;
        };
        let Script { span, body, shebang } = std::mem::replace(
            script,
            Script {
                span: DUMMY_SP,
                body: vec![],
                shebang: None,
            },
        );
        let mut module = Module {
            span,
            body: body.into_iter().map(ModuleItem::Stmt).collect(),
            shebang,
        };
        self.visit_mut_module(&mut module);

        if self.ctx.import_outcome.is_some() {
            *program = Program::Module(module);
        } else {
            *program = Program::Script(Script {
                span: module.span,
                body: module
                    .body
                    .into_iter()
                    .filter_map(|item| match item {
                        ModuleItem::Stmt(stmt) => Some(stmt),
                        ModuleItem::ModuleDecl(_) => None,
                    })
                    .collect(),
                shebang: module.shebang,
            });
        }
    }

    fn visit_mut_module(&mut self, module: &mut Module) {
        self.ctx = ModuleContext {
            suppression: Suppression::resolve(module, &self.comments),
            ..Default::default()
        };
        if self.ctx.suppression.file_suppressed {
            debug_log!(self.config, "file ignored by pragma");
            self.ctx.phase = Phase::Done;
            return;
        }
        self.ctx.imports = imports::scan_imports(
            &module.body,
            &self.config.wrap_source_module,
            &self.config.wrap_symbol_name,
        );
        self.ctx.phase = Phase::Traversed;

        module.visit_mut_children_with(self);
        self.ctx.phase = Phase::NodesRewritten;

        if self.ctx.components > 0 {
            let outcome = imports::ensure_import(
                module,
                &self.config.wrap_source_module,
                &self.config.wrap_symbol_name,
                self.ctx.imports,
            );
            debug_log!(self.config, outcome = ?outcome, "resolved wrap import");
            self.ctx.import_outcome = Some(outcome);
        } else {
            debug_log!(self.config, "no components in this module");
        }
        self.ctx.phase = Phase::ImportResolved;

        debug_log!(self.config, wrapped = self.ctx.wrapped, "module done");
        self.ctx.phase = Phase::Done;
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        let mut out = Vec::with_capacity(items.len());
        for item in items.drain(..) {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
                    out.extend(self.visit_default_export(export));
                }
                mut item => {
                    item.visit_mut_with(self);
                    out.push(item);
                }
            }
        }
        *items = out;
    }

    fn visit_mut_decl(&mut self, decl: &mut Decl) {
        let verdict =
            Declaration::from_decl(decl).map(|d| self.inspect(&d, BindingSite::Statement));
        decl.visit_mut_children_with(self);
        if verdict != Some(Verdict::Wrap) {
            return;
        }
        match rewrite::rebind_declaration(decl, &self.config.wrap_symbol_name) {
            Ok(()) => self.record_wrap(),
            Err(err) => debug_log!(self.config, error = %err, "left declaration unwrapped"),
        }
    }

    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        let wrapped = wrap_state::is_wrap_call(call, self.symbol());
        call.callee.visit_mut_with(self);
        for arg in call.args.iter_mut() {
            if wrapped {
                self.visit_wrapped_arg(&mut arg.expr);
            } else {
                self.visit_site(&mut arg.expr, BindingSite::Argument);
            }
        }
        call.type_args.visit_mut_with(self);
    }

    fn visit_mut_var_declarator(&mut self, declarator: &mut VarDeclarator) {
        declarator.name.visit_mut_with(self);
        if let Some(init) = &mut declarator.init {
            self.visit_site(init, BindingSite::VarDeclarator);
        }
    }

    fn visit_mut_expr_stmt(&mut self, stmt: &mut ExprStmt) {
        self.visit_site(&mut stmt.expr, BindingSite::Statement);
    }

    fn visit_mut_export_default_expr(&mut self, export: &mut ExportDefaultExpr) {
        self.visit_site(&mut export.expr, BindingSite::ExportDefault);
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        self.visit_site(expr, BindingSite::Nested);
    }
}

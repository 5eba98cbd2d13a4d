//! Keeps exactly one named import of the wrap symbol once something was
//! wrapped. Detection reads import specifier lists, never source text.

use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::ast::*,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportScan {
    /// A usable `import { symbol } from "source"` exists.
    pub has_specifier: bool,
    /// Index of the first import from the source that can take another
    /// named specifier.
    pub mergeable: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    AlreadyPresent,
    Appended,
    Inserted,
}

fn is_from(decl: &ImportDecl, source: &str) -> bool {
    decl.src.value.to_string() == source
}

fn export_name_is(name: &ModuleExportName, symbol: &str) -> bool {
    match name {
        ModuleExportName::Ident(ident) => &*ident.sym == symbol,
        ModuleExportName::Str(s) => s.value.to_string() == symbol,
    }
}

/// `{ symbol }` or `{ symbol as symbol }`. An aliased import binds another
/// local name, so a call of the bare symbol would not resolve to it.
fn binds_symbol(spec: &ImportSpecifier, symbol: &str) -> bool {
    match spec {
        ImportSpecifier::Named(named) => {
            !named.is_type_only
                && &*named.local.sym == symbol
                && named
                    .imported
                    .as_ref()
                    .map_or(true, |imported| export_name_is(imported, symbol))
        }
        ImportSpecifier::Default(_) | ImportSpecifier::Namespace(_) => false,
    }
}

/// A namespace import cannot be combined with named specifiers, and a
/// type-only import is erased.
fn accepts_named(decl: &ImportDecl) -> bool {
    !decl.type_only
        && !decl
            .specifiers
            .iter()
            .any(|spec| matches!(spec, ImportSpecifier::Namespace(_)))
}

pub fn scan_imports(items: &[ModuleItem], source: &str, symbol: &str) -> ImportScan {
    let mut scan = ImportScan::default();
    for (index, item) in items.iter().enumerate() {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) = item else {
            continue;
        };
        if !is_from(decl, source) {
            continue;
        }
        if !decl.type_only && decl.specifiers.iter().any(|s| binds_symbol(s, symbol)) {
            scan.has_specifier = true;
        }
        if scan.mergeable.is_none() && accepts_named(decl) {
            scan.mergeable = Some(index);
        }
    }
    scan
}

fn named_specifier(symbol: &str) -> ImportSpecifier {
    ImportSpecifier::Named(ImportNamedSpecifier {
        span: DUMMY_SP,
        local: Ident::new(symbol.into(), DUMMY_SP, SyntaxContext::empty()),
        imported: None,
        is_type_only: false,
    })
}

fn import_decl(source: &str, symbol: &str) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![named_specifier(symbol)],
        src: Box::new(Str {
            span: DUMMY_SP,
            value: source.into(),
            raw: None,
        }),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }))
}

/// `"use client"` and friends must stay in front of everything.
fn directive_prologue_len(items: &[ModuleItem]) -> usize {
    items
        .iter()
        .take_while(|item| match item {
            ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) => {
                matches!(&**expr, Expr::Lit(Lit::Str(_)))
            }
            _ => false,
        })
        .count()
}

/// Appends the specifier to an existing import from `source` when one can
/// take it, otherwise inserts a fresh import ahead of every other statement.
///
/// The one exception is the directive prologue: `"use client"` and friends
/// only act as directives while they come first, so the import goes right
/// after them.
pub fn ensure_import(
    module: &mut Module,
    source: &str,
    symbol: &str,
    scan: ImportScan,
) -> ImportOutcome {
    if scan.has_specifier {
        return ImportOutcome::AlreadyPresent;
    }
    if let Some(index) = scan.mergeable {
        if let Some(ModuleItem::ModuleDecl(ModuleDecl::Import(decl))) = module.body.get_mut(index)
        {
            if !decl.specifiers.iter().any(|s| binds_symbol(s, symbol)) {
                decl.specifiers.push(named_specifier(symbol));
            }
            return ImportOutcome::Appended;
        }
    }
    let at = directive_prologue_len(&module.body);
    module.body.insert(at, import_decl(source, symbol));
    ImportOutcome::Inserted
}

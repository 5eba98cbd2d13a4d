//! Turns an unwrapped component into its wrapped form, keeping its binding
//! name and export-ness.

use swc_core::{
    common::{util::take::Take, SyntaxContext, DUMMY_SP},
    ecma::{ast::*, utils::ExprFactory},
};

use crate::{
    error::{Error, Result},
    wrap_state::is_wrap_decorator,
};

/// `symbol(arg)`
pub fn wrap_call(symbol: &str, arg: Expr) -> Expr {
    Expr::Call(CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: Expr::Ident(Ident::new(symbol.into(), DUMMY_SP, SyntaxContext::empty()))
            .as_callee(),
        args: vec![arg.as_arg()],
        type_args: None,
    })
}

/// Arrow functions, function expressions and class expressions compose at
/// any binding site, so they are wrapped where they stand.
pub fn wrap_in_place(expr: &mut Expr, symbol: &str) {
    if let Expr::Class(class_expr) = expr {
        strip_wrap_decorators(&mut class_expr.class, symbol);
    }
    let original = expr.take();
    *expr = wrap_call(symbol, original);
}

fn strip_wrap_decorators(class: &mut Class, symbol: &str) {
    class.decorators.retain(|d| !is_wrap_decorator(d, symbol));
}

fn const_decl(name: Ident, init: Expr) -> Decl {
    Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: VarDeclKind::Const,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(BindingIdent {
                id: name,
                type_ann: None,
            }),
            init: Some(Box::new(init)),
            definite: false,
        }],
    }))
}

fn placeholder_decl() -> Decl {
    Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: VarDeclKind::Const,
        declare: false,
        decls: vec![],
    }))
}

/// `function Name() {}` / `class Name {}` at statement position cannot sit
/// inside a call, so they become `const Name = symbol(function Name() {})`.
/// The binding is no longer hoisted.
///
/// Ambient declarations are rejected before anything is touched, leaving the
/// node as it was.
pub fn rebind_declaration(decl: &mut Decl, symbol: &str) -> Result<()> {
    match decl {
        Decl::Fn(FnDecl { ident, declare: true, .. })
        | Decl::Class(ClassDecl { ident, declare: true, .. }) => {
            return Err(Error::AmbientDeclaration {
                name: ident.sym.to_string(),
            });
        }
        Decl::Fn(_) | Decl::Class(_) => {}
        _ => return Ok(()),
    }

    *decl = match std::mem::replace(decl, placeholder_decl()) {
        Decl::Fn(FnDecl { ident, function, .. }) => {
            let fn_expr = Expr::Fn(FnExpr {
                ident: Some(ident.clone()),
                function,
            });
            const_decl(ident, wrap_call(symbol, fn_expr))
        }
        Decl::Class(ClassDecl {
            ident, mut class, ..
        }) => {
            strip_wrap_decorators(&mut class, symbol);
            let class_expr = Expr::Class(ClassExpr {
                ident: Some(ident.clone()),
                class,
            });
            const_decl(ident, wrap_call(symbol, class_expr))
        }
        other => other,
    };
    Ok(())
}

/// Rewrites `export default function Name() {}` into
/// `const Name = symbol(function Name() {}); export default Name;` so the
/// module-local binding survives. Anonymous defaults become
/// `export default symbol(function () {})`.
pub fn rebind_default_export(export: ExportDefaultDecl, symbol: &str) -> Vec<ModuleItem> {
    let ExportDefaultDecl { span, decl } = export;
    let (ident, expr) = match decl {
        DefaultDecl::Fn(fn_expr) => (fn_expr.ident.clone(), Expr::Fn(fn_expr)),
        DefaultDecl::Class(mut class_expr) => {
            strip_wrap_decorators(&mut class_expr.class, symbol);
            (class_expr.ident.clone(), Expr::Class(class_expr))
        }
        decl @ DefaultDecl::TsInterfaceDecl(_) => {
            return vec![ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(
                ExportDefaultDecl { span, decl },
            ))];
        }
    };

    let wrapped = wrap_call(symbol, expr);
    match ident {
        Some(ident) => vec![
            ModuleItem::Stmt(Stmt::Decl(const_decl(ident.clone(), wrapped))),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(ExportDefaultExpr {
                span,
                expr: Box::new(Expr::Ident(ident)),
            })),
        ],
        None => vec![ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(
            ExportDefaultExpr {
                span,
                expr: Box::new(wrapped),
            },
        ))],
    }
}

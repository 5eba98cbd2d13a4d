//! Structural component detection.
//!
//! A declaration is a component when it produces markup: a function whose
//! final statement returns JSX (or whose arrow body is JSX), or a class with a
//! `render` method returning JSX or extending `Component` / `React.Component`.
//! Only the last statement of a body is looked at, so an early
//! `if (!ready) return null;` does not disqualify a function.

use swc_core::{common::Span, ecma::ast::*};

/// Roots whose member calls construct elements once JSX has been lowered.
const ELEMENT_ROOTS: &[&str] = &["React"];
const ELEMENT_FACTORIES: &[&str] = &["createElement"];
/// Automatic-runtime helpers emitted by JSX lowering.
const RUNTIME_HELPERS: &[&str] = &["_jsx", "_jsxs", "jsx", "jsxs", "_jsxDEV", "jsxDEV"];
const COMPONENT_BASE: &str = "Component";
const RENDER_METHOD: &str = "render";

/// The five declaration shapes a component can take.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    FnDecl(&'a FnDecl),
    FnExpr(&'a FnExpr),
    Arrow(&'a ArrowExpr),
    ClassDecl(&'a ClassDecl),
    ClassExpr(&'a ClassExpr),
}

impl<'a> Declaration<'a> {
    pub fn from_expr(expr: &'a Expr) -> Option<Self> {
        match expr {
            Expr::Fn(f) => Some(Self::FnExpr(f)),
            Expr::Arrow(a) => Some(Self::Arrow(a)),
            Expr::Class(c) => Some(Self::ClassExpr(c)),
            _ => None,
        }
    }

    pub fn from_decl(decl: &'a Decl) -> Option<Self> {
        match decl {
            Decl::Fn(f) => Some(Self::FnDecl(f)),
            Decl::Class(c) => Some(Self::ClassDecl(c)),
            _ => None,
        }
    }

    pub fn from_default_decl(decl: &'a DefaultDecl) -> Option<Self> {
        match decl {
            DefaultDecl::Fn(f) => Some(Self::FnExpr(f)),
            DefaultDecl::Class(c) => Some(Self::ClassExpr(c)),
            DefaultDecl::TsInterfaceDecl(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::FnDecl(_) => "function declaration",
            Self::FnExpr(_) => "function expression",
            Self::Arrow(_) => "arrow function",
            Self::ClassDecl(_) => "class declaration",
            Self::ClassExpr(_) => "class expression",
        }
    }

    pub fn name(&self) -> Option<&'a str> {
        match self {
            Self::FnDecl(f) => Some(&*f.ident.sym),
            Self::FnExpr(f) => f.ident.as_ref().map(|i| &*i.sym),
            Self::Arrow(_) => None,
            Self::ClassDecl(c) => Some(&*c.ident.sym),
            Self::ClassExpr(c) => c.ident.as_ref().map(|i| &*i.sym),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::FnDecl(f) => f.function.span,
            Self::FnExpr(f) => f.function.span,
            Self::Arrow(a) => a.span,
            Self::ClassDecl(c) => c.class.span,
            Self::ClassExpr(c) => c.class.span,
        }
    }

    pub fn decorators(&self) -> &'a [Decorator] {
        match self {
            Self::FnDecl(_) | Self::FnExpr(_) | Self::Arrow(_) => &[],
            Self::ClassDecl(c) => c.class.decorators.as_slice(),
            Self::ClassExpr(c) => c.class.decorators.as_slice(),
        }
    }

    pub fn is_component(&self) -> bool {
        match self {
            Self::FnDecl(f) => function_returns_jsx(&f.function),
            Self::FnExpr(f) => function_returns_jsx(&f.function),
            Self::Arrow(a) => arrow_returns_jsx(a),
            Self::ClassDecl(c) => class_is_component(&c.class),
            Self::ClassExpr(c) => class_is_component(&c.class),
        }
    }
}

fn matches_any(sym: &str, names: &[&str]) -> bool {
    names.iter().any(|name| *name == sym)
}

/// JSX syntax, or the call JSX lowering turns it into.
pub fn is_jsx(expr: &Expr) -> bool {
    match expr {
        Expr::JSXElement(_) | Expr::JSXFragment(_) => true,
        Expr::Paren(paren) => is_jsx(&paren.expr),
        Expr::Call(call) => is_lowered_element(call),
        _ => false,
    }
}

fn is_lowered_element(call: &CallExpr) -> bool {
    let Callee::Expr(callee) = &call.callee else {
        return false;
    };
    match &**callee {
        Expr::Member(member) => match (&*member.obj, &member.prop) {
            (Expr::Ident(root), MemberProp::Ident(method)) => {
                matches_any(&root.sym, ELEMENT_ROOTS) && matches_any(&method.sym, ELEMENT_FACTORIES)
            }
            _ => false,
        },
        Expr::Ident(helper) => matches_any(&helper.sym, RUNTIME_HELPERS),
        _ => false,
    }
}

fn block_returns_jsx(block: &BlockStmt) -> bool {
    match block.stmts.last() {
        Some(Stmt::Return(ReturnStmt { arg: Some(arg), .. })) => is_jsx(arg),
        _ => false,
    }
}

fn function_returns_jsx(function: &Function) -> bool {
    function.body.as_ref().is_some_and(block_returns_jsx)
}

fn arrow_returns_jsx(arrow: &ArrowExpr) -> bool {
    match &*arrow.body {
        BlockStmtOrExpr::Expr(expr) => is_jsx(expr),
        BlockStmtOrExpr::BlockStmt(block) => block_returns_jsx(block),
    }
}

fn class_is_component(class: &Class) -> bool {
    render_returns_jsx(class) || extends_component(class)
}

fn render_returns_jsx(class: &Class) -> bool {
    class.body.iter().any(|member| match member {
        ClassMember::Method(method) => {
            method.kind == MethodKind::Method
                && is_render_key(&method.key)
                && function_returns_jsx(&method.function)
        }
        _ => false,
    })
}

fn is_render_key(key: &PropName) -> bool {
    match key {
        PropName::Ident(ident) => &*ident.sym == RENDER_METHOD,
        PropName::Str(s) => s.value.to_string() == RENDER_METHOD,
        _ => false,
    }
}

/// `extends Component` or `extends React.Component`. Render content is not
/// consulted on this path.
fn extends_component(class: &Class) -> bool {
    match class.super_class.as_deref() {
        Some(Expr::Ident(base)) => &*base.sym == COMPONENT_BASE,
        Some(Expr::Member(member)) => match (&*member.obj, &member.prop) {
            (Expr::Ident(root), MemberProp::Ident(prop)) => {
                &*prop.sym == COMPONENT_BASE && matches_any(&root.sym, ELEMENT_ROOTS)
            }
            _ => false,
        },
        _ => false,
    }
}

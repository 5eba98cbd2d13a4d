//! Detects components that are already bound to the wrap symbol.
//!
//! Detection always looks at the node's original parent: the dispatcher asks
//! from the enclosing call before anything inside that call is rewritten.

use swc_core::ecma::ast::*;

use crate::classify::Declaration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapState {
    /// `observer(<declaration>)`
    ByCall,
    /// `observer(_tmp = <declaration>)`, left behind by legacy decorator lowering.
    ByAssignment,
}

fn is_symbol(expr: &Expr, symbol: &str) -> bool {
    matches!(expr, Expr::Ident(ident) if &*ident.sym == symbol)
}

/// The callee is the bare wrap identifier.
pub fn is_wrap_call(call: &CallExpr, symbol: &str) -> bool {
    match &call.callee {
        Callee::Expr(callee) => is_symbol(callee, symbol),
        Callee::Super(_) | Callee::Import(_) => false,
    }
}

/// For an argument of a wrap call, the declaration it binds. Parentheses are
/// transparent.
pub fn wrapped_target(arg: &mut Expr) -> Option<(&mut Expr, WrapState)> {
    match arg {
        Expr::Paren(paren) => wrapped_target(&mut paren.expr),
        Expr::Assign(assign) => {
            let right = unparen_mut(&mut assign.right);
            if Declaration::from_expr(right).is_some() {
                Some((right, WrapState::ByAssignment))
            } else {
                None
            }
        }
        other => {
            if Declaration::from_expr(other).is_some() {
                Some((other, WrapState::ByCall))
            } else {
                None
            }
        }
    }
}

fn unparen_mut(expr: &mut Expr) -> &mut Expr {
    match expr {
        Expr::Paren(paren) => unparen_mut(&mut paren.expr),
        other => other,
    }
}

pub fn is_wrap_decorator(decorator: &Decorator, symbol: &str) -> bool {
    is_symbol(&decorator.expr, symbol)
}

/// `@observer class ..`. These are left to whichever pass lowers decorators;
/// that pass has to run after this one for the class to end up bound.
pub fn is_decorated(decorators: &[Decorator], symbol: &str) -> bool {
    decorators.iter().any(|d| is_wrap_decorator(d, symbol))
}

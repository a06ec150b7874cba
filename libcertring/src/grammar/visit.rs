//! Traits for visiting libcertring expression trees.

use super::*;

/// Descends down an expression.
pub fn descend_expr<'a, V: ExprVisitor<'a>>(visitor: &mut V, expr: &'a RcExpr) {
    match expr.as_ref() {
        Expr::Num(n) => visitor.visit_num(n),
        Expr::Atom(name) => visitor.visit_atom(name, expr),
        Expr::App(name, args) => visitor.visit_app(name, args, expr),
        Expr::Meta(name) => visitor.visit_meta(name),
        Expr::BinaryExpr(b) => visitor.visit_binary(b),
        Expr::UnaryExpr(u) => visitor.visit_unary(u),
    }
}

/// Descends down the arguments of a function application.
pub fn descend_app<'a, V: ExprVisitor<'a>>(visitor: &mut V, args: &'a [RcExpr]) {
    for arg in args {
        visitor.visit_expr(arg);
    }
}

/// Descends down a binary expression.
pub fn descend_binary<'a, V: ExprVisitor<'a>>(visitor: &mut V, expr: &'a BinaryExpr) {
    visitor.visit_expr(&expr.lhs);
    visitor.visit_expr(&expr.rhs);
}

/// Descends down a unary expression.
pub fn descend_unary<'a, V: ExprVisitor<'a>>(visitor: &mut V, expr: &'a UnaryExpr) {
    visitor.visit_expr(&expr.rhs);
}

/// Descends down both sides of a proposition.
pub fn descend_prop<'a, V: ExprVisitor<'a>>(visitor: &mut V, prop: &'a Prop) {
    visitor.visit_expr(prop.lhs());
    visitor.visit_expr(prop.rhs());
}

/// Describes an [expression](super::Expr) visitor.
pub trait ExprVisitor<'a>: Sized {
    /// Visits a proposition.
    fn visit_prop(&mut self, prop: &'a Prop) {
        descend_prop(self, prop);
    }

    /// Visits an expression.
    fn visit_expr(&mut self, expr: &'a RcExpr) {
        descend_expr(self, expr);
    }

    /// Visits an integer literal.
    fn visit_num(&mut self, _num: &'a BigInt) {}

    /// Visits a named atom.
    fn visit_atom(&mut self, _name: &'a str, _expr: &'a RcExpr) {}

    /// Visits a function application.
    fn visit_app(&mut self, _name: &'a str, args: &'a [RcExpr], _expr: &'a RcExpr) {
        descend_app(self, args);
    }

    /// Visits a metavariable.
    fn visit_meta(&mut self, _name: &'a str) {}

    /// Visits a binary expression.
    fn visit_binary(&mut self, expr: &'a BinaryExpr) {
        descend_binary(self, expr);
    }

    /// Visits a unary expression.
    fn visit_unary(&mut self, expr: &'a UnaryExpr) {
        descend_unary(self, expr);
    }
}

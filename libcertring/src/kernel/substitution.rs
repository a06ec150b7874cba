use crate::grammar::*;

use std::collections::HashMap;
use std::sync::Arc;

/// A mapping of metavariables to the terms they stand for.
///
/// A substitution is usually obtained by [matching](Substitution::match_expr) a schema pattern
/// against a concrete term, and is then used to [transform](Substitution::transform) other
/// patterns of the same schema into concrete terms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    map: HashMap<String, RcExpr>,
}

impl Substitution {
    /// Binds `meta`, named with its sigil, to `term`.
    pub fn with<S: Into<String>>(mut self, meta: S, term: RcExpr) -> Self {
        self.map.insert(meta.into(), term);
        self
    }

    pub fn get(&self, meta: &str) -> Option<&RcExpr> {
        self.map.get(meta)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = (&String, &RcExpr)> {
        self.map.iter()
    }

    /// Matches a pattern against a target term wholly.
    ///
    /// - `_a` matches any term
    /// - `#a` matches only an integer literal
    /// - an integer literal matches only the same integer literal
    /// - all other nodes must agree in kind and operator, and their children must match
    ///
    /// A metavariable occurring several times must match the same term at every occurrence.
    pub fn match_expr(pattern: &RcExpr, target: &RcExpr) -> Option<Substitution> {
        match (pattern.as_ref(), target.as_ref()) {
            (Expr::Meta(name), _) => {
                if name.starts_with('#') && target.as_num().is_none() {
                    return None;
                }
                Some(Self::default().with(name.as_str(), RcExpr::clone(target)))
            }
            (Expr::Num(a), Expr::Num(b)) if a == b => Some(Self::default()),
            (Expr::Atom(a), Expr::Atom(b)) if a == b => Some(Self::default()),
            (Expr::App(f, pargs), Expr::App(g, targs)) => {
                if f != g || pargs.len() != targs.len() {
                    return None;
                }
                pargs
                    .iter()
                    .zip(targs.iter())
                    .try_fold(Self::default(), |acc, (p, t)| {
                        Self::try_merge(acc, Self::match_expr(p, t)?)
                    })
            }
            (Expr::BinaryExpr(p), Expr::BinaryExpr(t)) => {
                if p.op != t.op {
                    return None;
                }
                let lhs = Self::match_expr(&p.lhs, &t.lhs)?;
                let rhs = Self::match_expr(&p.rhs, &t.rhs)?;
                Self::try_merge(lhs, rhs)
            }
            (Expr::UnaryExpr(p), Expr::UnaryExpr(t)) => {
                if p.op != t.op {
                    return None;
                }
                Self::match_expr(&p.rhs, &t.rhs)
            }
            _ => None,
        }
    }

    /// Matches a proposition pattern against a target proposition of the same relation.
    pub fn match_prop(pattern: &Prop, target: &Prop) -> Option<Substitution> {
        if pattern.is_equation() != target.is_equation() {
            return None;
        }
        let lhs = Self::match_expr(pattern.lhs(), target.lhs())?;
        let rhs = Self::match_expr(pattern.rhs(), target.rhs())?;
        Self::try_merge(lhs, rhs)
    }

    /// Merges two substitutions. If they bind the same metavariable to different terms, merging
    /// fails and nothing is returned.
    pub fn try_merge(left: Substitution, right: Substitution) -> Option<Substitution> {
        let mut merged = left;
        for (meta, term) in right.map.into_iter() {
            if let Some(existing) = merged.map.get(&meta) {
                if *existing != term {
                    return None;
                }
                continue;
            }
            merged.map.insert(meta, term);
        }
        Some(merged)
    }

    /// Replaces every bound metavariable in `expr`. Unbound metavariables are left in place, and
    /// subterms without bound metavariables are shared with the input.
    pub fn transform(&self, expr: &RcExpr) -> RcExpr {
        match expr.as_ref() {
            Expr::Meta(name) => match self.map.get(name) {
                Some(term) => RcExpr::clone(term),
                None => RcExpr::clone(expr),
            },
            Expr::Num(_) | Expr::Atom(_) => RcExpr::clone(expr),
            Expr::App(name, args) => {
                let new_args: Vec<_> = args.iter().map(|a| self.transform(a)).collect();
                if new_args.iter().zip(args).all(|(n, o)| Arc::ptr_eq(n, o)) {
                    return RcExpr::clone(expr);
                }
                Expr::app(name.as_str(), new_args)
            }
            Expr::BinaryExpr(BinaryExpr { op, lhs, rhs }) => {
                let (new_lhs, new_rhs) = (self.transform(lhs), self.transform(rhs));
                if Arc::ptr_eq(&new_lhs, lhs) && Arc::ptr_eq(&new_rhs, rhs) {
                    return RcExpr::clone(expr);
                }
                Expr::binary(*op, new_lhs, new_rhs)
            }
            Expr::UnaryExpr(UnaryExpr { op, rhs }) => {
                let new_rhs = self.transform(rhs);
                if Arc::ptr_eq(&new_rhs, rhs) {
                    return RcExpr::clone(expr);
                }
                Expr::unary(*op, new_rhs)
            }
        }
    }

    pub fn transform_prop(&self, prop: &Prop) -> Prop {
        prop.map(|side| self.transform(side))
    }
}

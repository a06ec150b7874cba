//! Module `collectors` provides utilities for collecting items in a libcertring expression.

use crate::grammar::{BinaryExpr, BinaryOperator, Expr, ExprVisitor, Prop, RcExpr};

use std::collections::{BTreeSet, HashSet};

/// Collects unique metavariable names in an expression.
pub fn collect_metavariables(expr: &RcExpr) -> BTreeSet<&str> {
    let mut collector = MetaCollector::default();
    collector.visit_expr(expr);
    collector.metas
}

/// Collects unique metavariable names in a proposition.
pub fn collect_prop_metavariables(prop: &Prop) -> BTreeSet<&str> {
    let mut collector = MetaCollector::default();
    collector.visit_prop(prop);
    collector.metas
}

#[derive(Default)]
struct MetaCollector<'a> {
    metas: BTreeSet<&'a str>,
}
impl<'a> ExprVisitor<'a> for MetaCollector<'a> {
    fn visit_meta(&mut self, name: &'a str) {
        self.metas.insert(name);
    }
}

/// Collects the names of integer metavariables (`#x`) used as an exponent in a proposition.
pub fn collect_exponent_metavariables(prop: &Prop) -> BTreeSet<&str> {
    let mut collector = ExponentMetaCollector::default();
    collector.visit_prop(prop);
    collector.metas
}

#[derive(Default)]
struct ExponentMetaCollector<'a> {
    metas: BTreeSet<&'a str>,
}
impl<'a> ExprVisitor<'a> for ExponentMetaCollector<'a> {
    fn visit_binary(&mut self, expr: &'a BinaryExpr) {
        if let (BinaryOperator::Exp, Expr::Meta(name)) = (expr.op, expr.rhs.as_ref()) {
            if name.starts_with('#') {
                self.metas.insert(name);
            }
        }
        super::descend_binary(self, expr);
    }
}

/// Collects the maximal subterms of an expression that a polynomial ring treats as
/// [opaque atoms](crate::Expr::is_ring_atom), deduplicated and in order of first occurrence.
pub fn collect_ring_atoms(expr: &RcExpr) -> Vec<RcExpr> {
    let mut collector = RingAtomCollector::default();
    collector.visit_expr(expr);
    collector.atoms
}

#[derive(Default)]
struct RingAtomCollector {
    seen: HashSet<RcExpr>,
    atoms: Vec<RcExpr>,
}
impl<'a> ExprVisitor<'a> for RingAtomCollector {
    fn visit_expr(&mut self, expr: &'a RcExpr) {
        if !expr.is_ring_atom() {
            return super::descend_expr(self, expr);
        }
        if self.seen.insert(RcExpr::clone(expr)) {
            self.atoms.push(RcExpr::clone(expr));
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{parse_expression, parse_proposition, scan};

    macro_rules! parse {
        ($parser:ident, $program:expr) => {{
            let result = $parser(scan($program).tokens);
            assert!(result.diagnostics.is_empty());
            result.program
        }};
    }

    #[test]
    fn collect_metavariables() {
        let prop = parse!(parse_proposition, "_a + #b * _a = -(_c ^ #b)");
        let metas: Vec<_> = super::collect_prop_metavariables(&prop)
            .into_iter()
            .collect();
        assert_eq!(metas, vec!["#b", "_a", "_c"]);
    }

    #[test]
    fn collect_exponent_metavariables() {
        let prop = parse!(parse_proposition, "_x ^ #i * #j = (_x ^ _e) ^ #k + 2 ^ #i");
        let metas: Vec<_> = super::collect_exponent_metavariables(&prop)
            .into_iter()
            .collect();
        assert_eq!(metas, vec!["#i", "#k"]);
    }

    #[test]
    fn collect_ring_atoms() {
        let expr = parse!(
            parse_expression,
            "y * f(x) + x ^ 2 - 1/2 + y / x + f(x) - z ^ n + 2 ^ 3"
        );
        let atoms: Vec<_> = super::collect_ring_atoms(&expr)
            .into_iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(atoms, vec!["y", "f(x)", "x", "y / x", "z ^ n"]);
    }

    #[test]
    fn literals_are_not_atoms() {
        let expr = parse!(parse_expression, "-3 + 4/6 * 2 ^ 10");
        assert!(super::collect_ring_atoms(&expr).is_empty());
    }
}

//! Kernel steps taken by the ring engine.
//!
//! The engine only asks for steps that hold. A step the kernel rejects is an engine bug, so it is
//! logged with the offending terms and aborts.

use crate::grammar::{Expr, Prop, RcExpr};
use crate::kernel::{self, Certificate, KernelError, LemmaName, Substitution};

use num_bigint::BigInt;

fn rejected(step: &str, err: KernelError, premises: &[&Certificate]) -> ! {
    let premises = premises
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    tracing::error!(%err, %premises, "kernel rejected {}", step);
    panic!("kernel rejected {}: {}", step, err);
}

/// Applies a lemma to premises proven by the engine.
pub(crate) fn by(lemma: LemmaName, premises: &[&Certificate]) -> Certificate {
    by_with(lemma, premises, Substitution::default())
}

/// Applies a lemma to premises proven by the engine, binding the metavariables the premises leave
/// open.
pub(crate) fn by_with(
    lemma: LemmaName,
    premises: &[&Certificate],
    bindings: Substitution,
) -> Certificate {
    match kernel::apply_with(lemma, premises, bindings) {
        Ok(cert) => cert,
        Err(err) => rejected(&format!("{:?}", lemma), err, premises),
    }
}

/// `a = b` and `b = c` give `a = c`.
pub(crate) fn chain(left: &Certificate, right: &Certificate) -> Certificate {
    match kernel::trans(left, right) {
        Ok(cert) => cert,
        Err(err) => rejected("a transitive step", err, &[left, right]),
    }
}

/// A ground integer fact.
pub(crate) fn fact(prop: Prop) -> Certificate {
    match kernel::compute(prop) {
        Ok(cert) => cert,
        Err(err) => rejected("a ground fact", err, &[]),
    }
}

/// Binds a single metavariable.
pub(crate) fn bind(meta: &str, term: &RcExpr) -> Substitution {
    Substitution::default().with(meta, RcExpr::clone(term))
}

pub(crate) fn num(n: &BigInt) -> RcExpr {
    Expr::num(n.clone())
}

/// `lhs = rhs` as a proposition over integer literals.
pub(crate) fn int_eq(lhs: RcExpr, rhs: &BigInt) -> Prop {
    Prop::equal(lhs, num(rhs))
}

/// `n != 0`.
pub(crate) fn nonzero(n: &BigInt) -> Prop {
    Prop::not_equal(num(n), Expr::num(0))
}

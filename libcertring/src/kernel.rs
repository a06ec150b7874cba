//! A small LCF-style proof kernel.
//!
//! A [`Certificate`] can only be obtained through the functions of this module, each of which
//! checks the step it takes:
//!
//! - [`refl`] proves `t = t`;
//! - [`lemma`] yields a schema lemma of the fixed [library](LemmaName), which [`instantiate`]
//!   specializes and [`discharge`] strips of proven hypotheses;
//! - [`trans`] chains `a = b` and `b = c` into `a = c`;
//! - [`compute`] proves ground integer facts like `2 * 3 + 1 = 7` or `6 != 0` by exact
//!   evaluation.
//!
//! [`apply`] and [`apply_with`] compose instantiation and discharge, inferring the instantiation
//! from the premises given for the lemma's hypotheses.
//!
//! The kernel knows nothing about polynomials; the ring engine is just another client of it.

mod errors;
mod ground;
mod lemmas;
mod substitution;

pub use errors::KernelError;
pub use lemmas::{free_conclusion_metas, BadLemma, BuildLemmaErrors, LemmaName};
pub use substitution::Substitution;

use crate::grammar::collectors::{collect_exponent_metavariables, collect_prop_metavariables};
use crate::grammar::{Prop, RcExpr};

use num_traits::Signed;
use std::collections::BTreeSet;

/// A proof that the [conclusion](Certificate::conclusion) holds whenever all
/// [hypotheses](Certificate::hypotheses) hold.
///
/// A certificate without hypotheses is closed. A certificate may mention metavariables, in which
/// case it holds for every instantiation of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Certificate {
    hyps: Vec<Prop>,
    concl: Prop,
}

impl Certificate {
    fn new(hyps: Vec<Prop>, concl: Prop) -> Self {
        Self { hyps, concl }
    }

    pub fn conclusion(&self) -> &Prop {
        &self.concl
    }

    pub fn hypotheses(&self) -> &[Prop] {
        &self.hyps
    }

    /// Left-hand side of the conclusion.
    pub fn lhs(&self) -> &RcExpr {
        self.concl.lhs()
    }

    /// Right-hand side of the conclusion.
    pub fn rhs(&self) -> &RcExpr {
        self.concl.rhs()
    }

    pub fn is_closed(&self) -> bool {
        self.hyps.is_empty()
    }

    /// Whether the certificate is closed and mentions no metavariables.
    pub fn is_ground(&self) -> bool {
        self.is_closed() && collect_prop_metavariables(&self.concl).is_empty()
    }
}

/// Proves `term = term`.
pub fn refl(term: RcExpr) -> Certificate {
    Certificate::new(Vec::new(), Prop::equal(RcExpr::clone(&term), term))
}

/// Yields a schema lemma of the library.
pub fn lemma(name: LemmaName) -> Certificate {
    lemmas::get(name).clone()
}

/// Specializes the metavariables of a certificate bound by `subst`.
///
/// Metavariables named `#x` may only be bound to integer literals. One used as an exponent, like
/// `#i` in `_x ^ #i`, may only be bound to a non-negative literal.
pub fn instantiate(cert: &Certificate, subst: &Substitution) -> Result<Certificate, KernelError> {
    let exponents: BTreeSet<&str> = cert
        .hyps
        .iter()
        .chain(std::iter::once(&cert.concl))
        .flat_map(collect_exponent_metavariables)
        .collect();
    for (meta, term) in subst.iter() {
        if !meta.starts_with('#') {
            continue;
        }
        match term.as_num() {
            None => {
                return Err(KernelError::NotANumeral {
                    meta: meta.clone(),
                    term: RcExpr::clone(term),
                })
            }
            Some(n) if n.is_negative() && exponents.contains(meta.as_str()) => {
                return Err(KernelError::NegativeExponent {
                    meta: meta.clone(),
                    term: RcExpr::clone(term),
                })
            }
            Some(_) => {}
        }
    }
    Ok(Certificate::new(
        cert.hyps.iter().map(|h| subst.transform_prop(h)).collect(),
        subst.transform_prop(&cert.concl),
    ))
}

/// Removes the hypothesis proven by a closed `premise` from `cert`.
pub fn discharge(cert: &Certificate, premise: &Certificate) -> Result<Certificate, KernelError> {
    if !premise.is_closed() {
        return Err(KernelError::OpenPremise(Box::new(premise.clone())));
    }
    let pos = cert
        .hyps
        .iter()
        .position(|h| *h == premise.concl)
        .ok_or_else(|| KernelError::HypothesisNotFound(premise.concl.clone()))?;
    let mut hyps = cert.hyps.clone();
    hyps.remove(pos);
    Ok(Certificate::new(hyps, cert.concl.clone()))
}

/// Chains `a = b` and `b = c` into `a = c`.
pub fn trans(left: &Certificate, right: &Certificate) -> Result<Certificate, KernelError> {
    for cert in &[left, right] {
        if !cert.is_closed() {
            return Err(KernelError::OpenPremise(Box::new((*cert).clone())));
        }
    }
    match (&left.concl, &right.concl) {
        (Prop::Eq(a, b1), Prop::Eq(b2, c)) if b1 == b2 => Ok(Certificate::new(
            Vec::new(),
            Prop::equal(RcExpr::clone(a), RcExpr::clone(c)),
        )),
        (l, r) => Err(KernelError::TransMismatch(l.clone(), r.clone())),
    }
}

/// Proves a ground integer equation or disequation by evaluating both sides.
pub fn compute(prop: Prop) -> Result<Certificate, KernelError> {
    match ground::decide(&prop) {
        Some(true) => Ok(Certificate::new(Vec::new(), prop)),
        Some(false) => Err(KernelError::FalseFact(prop)),
        None => Err(KernelError::NotGround(prop)),
    }
}

/// Applies a lemma to closed premises, one for each of its hypotheses in order.
pub fn apply(name: LemmaName, premises: &[&Certificate]) -> Result<Certificate, KernelError> {
    apply_with(name, premises, Substitution::default())
}

/// Applies a lemma to closed premises, with `bindings` supplying the metavariables the premises do
/// not determine.
///
/// The instantiation is inferred by matching each hypothesis against the conclusion of its
/// premise; every premise is then discharged. The result must be free of the lemma's
/// metavariables.
pub fn apply_with(
    name: LemmaName,
    premises: &[&Certificate],
    bindings: Substitution,
) -> Result<Certificate, KernelError> {
    let schema = lemmas::get(name);
    if schema.hyps.len() != premises.len() {
        return Err(KernelError::PremiseCount {
            lemma: name,
            expected: schema.hyps.len(),
            found: premises.len(),
        });
    }
    if let Some(meta) = free_conclusion_metas(name)
        .into_iter()
        .find(|m| bindings.get(m).is_none())
    {
        return Err(KernelError::Unbound { lemma: name, meta });
    }

    let mut subst = bindings;
    for (index, (hyp, premise)) in schema.hyps.iter().zip(premises.iter()).enumerate() {
        if !premise.is_closed() {
            return Err(KernelError::OpenPremise(Box::new((*premise).clone())));
        }
        let matched = Substitution::match_prop(hyp, &premise.concl).ok_or_else(|| {
            KernelError::PremiseMismatch {
                lemma: name,
                index,
                expected: subst.transform_prop(hyp),
                found: premise.concl.clone(),
            }
        })?;
        subst = Substitution::try_merge(subst, matched)
            .ok_or(KernelError::Conflict { lemma: name, index })?;
    }

    let mut cert = instantiate(schema, &subst)?;
    for premise in premises {
        cert = discharge(&cert, premise)?;
    }

    let schema_metas = collect_prop_metavariables(&schema.concl);
    if let Some(meta) = collect_prop_metavariables(&cert.concl)
        .into_iter()
        .find(|m| schema_metas.contains(m) && subst.get(m).is_none())
    {
        return Err(KernelError::Unbound {
            lemma: name,
            meta: meta.to_owned(),
        });
    }
    Ok(cert)
}

use super::{Certificate, LemmaName};
use crate::grammar::{Prop, RcExpr};

use thiserror::Error;

/// A step the kernel refused to take.
///
/// The ring engine only ever asks the kernel for steps that hold, so any of these surfacing from
/// the engine indicates an engine bug.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("{lemma:?} takes {expected} premises, but {found} were given")]
    PremiseCount {
        lemma: LemmaName,
        expected: usize,
        found: usize,
    },

    #[error("premise `{0}` has open hypotheses")]
    OpenPremise(Box<Certificate>),

    #[error("premise {index} of {lemma:?} should prove `{expected}`, but proves `{found}`")]
    PremiseMismatch {
        lemma: LemmaName,
        index: usize,
        expected: Prop,
        found: Prop,
    },

    #[error("premise {index} of {lemma:?} binds a metavariable inconsistently with earlier premises")]
    Conflict { lemma: LemmaName, index: usize },

    #[error("`{meta}` stands for an integer literal, but was bound to `{term}`")]
    NotANumeral { meta: String, term: RcExpr },

    #[error("`{meta}` is an exponent, but was bound to the negative `{term}`")]
    NegativeExponent { meta: String, term: RcExpr },

    #[error("`{0}` is not a hypothesis of the certificate")]
    HypothesisNotFound(Prop),

    #[error("cannot chain `{0}` with `{1}`")]
    TransMismatch(Prop, Prop),

    #[error("`{0}` is not a ground integer fact")]
    NotGround(Prop),

    #[error("`{0}` does not hold")]
    FalseFact(Prop),

    #[error("{lemma:?} leaves `{meta}` unbound")]
    Unbound { lemma: LemmaName, meta: String },
}

//! The fixed library of schema lemmas the kernel instantiates.
//!
//! Lemmas are written as propositions over patterns: `_a` stands for any term and `#a` for an
//! integer literal. A lemma `[h1, h2] => c` reads "for all instantiations of the metavariables,
//! if `h1` and `h2` hold then `c` holds".
//!
//! The lemmas are sound for rational arithmetic, where `a / b` is exact division and `x ^ n` is
//! repeated multiplication. Side conditions on denominators are stated as explicit hypotheses; an
//! integer metavariable in an exponent, like `#i` in `_x ^ #i`, only ranges over the naturals (see
//! [`instantiate`](super::instantiate)).

use super::Certificate;
use crate::grammar::{collectors::collect_prop_metavariables, Prop};
use crate::utils::indent;
use crate::{parse_proposition, scan};

use core::fmt;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::error::Error;

macro_rules! define_lemmas {
    ($($name:ident: [$($hyp:literal),* $(,)?] => $concl:literal)*) => {
        /// Names of the schema lemmas known to the kernel.
        #[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub enum LemmaName {
            $($name,)*
        }

        impl LemmaName {
            /// All lemma names, in declaration order.
            pub const ALL: &'static [LemmaName] = &[$(LemmaName::$name,)*];

            /// The source patterns of the lemma's hypotheses and conclusion.
            pub fn source(self) -> (&'static [&'static str], &'static str) {
                match self {
                    $(LemmaName::$name => {
                        const HYPS: &[&str] = &[$($hyp),*];
                        (HYPS, $concl)
                    })*
                }
            }
        }
    };
}

define_lemmas! {
    // Rational coefficients. A coefficient's value is always the literal `#n / #d`.
          CoeffOfInt: []                                                     => "#n = #n / 1"
            CoeffNeg: ["_a = #n / #d", "-#n = #m"]                           => "-_a = #m / #d"
            CoeffAdd: ["_a = #ln / #ld", "_b = #rn / #rd", "#ln * #rd + #rn * #ld = #pn",
                       "#ld * #rd = #pd", "#ld != 0", "#rd != 0"]            => "_a + _b = #pn / #pd"
            CoeffSub: ["_a = #ln / #ld", "_b = #rn / #rd", "#ln * #rd - #rn * #ld = #pn",
                       "#ld * #rd = #pd", "#ld != 0", "#rd != 0"]            => "_a - _b = #pn / #pd"
            CoeffMul: ["_a = #ln / #ld", "_b = #rn / #rd", "#ln * #rn = #pn",
                       "#ld * #rd = #pd", "#ld != 0", "#rd != 0"]            => "_a * _b = #pn / #pd"
         CoeffReduce: ["_a = #n / #d", "#m * #g = #n", "#e * #g = #d", "#g != 0"]
                                                                             => "_a = #m / #e"
           CoeffZero: ["_a = 0 / #d", "#d != 0"]                             => "_a = 0"
        CoeffUnitDen: ["_a = #n / 1"]                                        => "_a = #n"
          CoeffSplit: ["_x = #n / #d", "#n * #b - #a * #d = #e", "#d * #b = #f",
                       "#d != 0", "#b != 0"]                                 => "_x = #a / #b + #e / #f"

    // Power products.
              OneMul: ["_r = _y"]                                            => "1 * _r = _y"
              MulOne: ["_r = _y"]                                            => "_r * 1 = _y"
              PowOne: []                                                     => "_x ^ 1 = _x"
           PowOneMul: ["_u = 1"]                                             => "_x ^ 1 * _u = _x"
              PowAdd: ["#i + #j = #k"]                                       => "_x ^ #i * _x ^ #j = _x ^ #k"
       MulInterleave: ["_a * _c = _e", "_b * _d = _f"]                       => "(_a * _b) * (_c * _d) = _e * _f"
             MulCong: ["_a = _c", "_b = _d"]                                 => "_a * _b = _c * _d"
            MulUnitR: ["_a = _c", "_b = 1"]                                  => "_a * _b = _c"

    // Monomials. A monomial's value is `c * p` for a coefficient value `c` and power product `p`.
           MonoConst: ["_a = _c", "_p = 1"]                                  => "_a = _c * _p"
             MonoVar: ["_p = _x"]                                            => "_x = 1 / 1 * _p"
             MonoMul: ["_a = _c1 * _p1", "_b = _c2 * _p2", "_c1 * _c2 = _c3",
                       "_p1 * _p2 = _p3"]                                    => "_a * _b = _c3 * _p3"
             MonoNeg: ["_a = _c * _p", "-_c = _d"]                           => "-_a = _d * _p"
             MonoAdd: ["_a = _c1 * _p", "_b = _c2 * _p", "_c1 + _c2 = _c3"]  => "_a + _b = _c3 * _p"
            MonoZero: ["_a = _c * _p", "_c = 0"]                             => "_a = 0"
       MonoUnitCoeff: ["_a = _c * _p", "_c = 1", "_p = _q"]                  => "_a = _q"
         MonoNormPos: ["_a = _c * _p", "_c = _k", "_p = _q"]                 => "_a = _k * _q"
       MonoNormConst: ["_a = _c * _p", "_c = _k", "_p = 1"]                  => "_a = _k"
      MonoFactorSign: ["_a = _c * _p", "-_c = _e"]                           => "_a = -(_e * _p)"
             NegCong: ["_a = _b"]                                            => "-_a = -_b"
           MonoSplit: ["_a = _c * _p", "_c = _c1 + _c2"]                     => "_a = _c1 * _p + _c2 * _p"
           SplitCong: ["_v = _a + _b", "_a = _c", "_b = _d"]                 => "_v = _c + _d"

    // Insertion into 2-3 trees. `_i` is the inserted term. A 2-node has the value
    // `(_l + _v) + _r`; a 3-node has the value `(((_l + _v) + _m) + _y) + _r`.
            InsEmpty: ["_i = _w"]                                            => "0 + _i = (0 + _w) + 0"
                B2Eq: ["_v + _i = _w"]                      => "((_l + _v) + _r) + _i = (_l + _w) + _r"
              B2Left: ["_l + _i = _k"]                      => "((_l + _v) + _r) + _i = (_k + _v) + _r"
             B2Right: ["_r + _i = _k"]                      => "((_l + _v) + _r) + _i = (_l + _v) + _k"
       B2RightSprout: ["_r + _i = (_a + _u) + _b"]
                                  => "((_l + _v) + _r) + _i = (((_l + _v) + _a) + _u) + _b"
              B3EqV1: ["_v + _i = _w"]
                                  => "((((_l + _v) + _m) + _y) + _r) + _i = (((_l + _w) + _m) + _y) + _r"
              B3EqV2: ["_y + _i = _w"]
                                  => "((((_l + _v) + _m) + _y) + _r) + _i = (((_l + _v) + _m) + _w) + _r"
          B3LeftStay: ["_l + _i = _k"]
                                  => "((((_l + _v) + _m) + _y) + _r) + _i = (((_k + _v) + _m) + _y) + _r"
           B3MidStay: ["_m + _i = _k"]
                                  => "((((_l + _v) + _m) + _y) + _r) + _i = (((_l + _v) + _k) + _y) + _r"
         B3RightStay: ["_r + _i = _k"]
                                  => "((((_l + _v) + _m) + _y) + _r) + _i = (((_l + _v) + _m) + _y) + _k"
        B3LeftSprout: ["_l + _i = (_a + _u) + _b"]
                                  => "((((_l + _v) + _m) + _y) + _r) + _i = (((_a + _u) + _b) + _v) + ((_m + _y) + _r)"
         B3MidSprout: ["_m + _i = (_a + _u) + _b"]
                                  => "((((_l + _v) + _m) + _y) + _r) + _i = (((_l + _v) + _a) + _u) + ((_b + _y) + _r)"
       B3RightSprout: ["_r + _i = (_a + _u) + _b"]
                                  => "((((_l + _v) + _m) + _y) + _r) + _i = (((_l + _v) + _m) + _y) + ((_a + _u) + _b)"
            AddCongL: ["_a = _b", "_b + _c = _d"]                            => "_a + _c = _d"
            ZeroAddL: ["0 + _a = _b"]                                        => "_a = _b"

    // Sums and differences of trees, folding over the right operand.
             AddZero: ["_p = _s"]                                            => "_p + 0 = _s"
               AddB2: ["((_p + _l) + _v) + _r = _s"]                         => "_p + ((_l + _v) + _r) = _s"
               AddB3: ["((((_p + _l) + _v) + _m) + _y) + _r = _s"]
                                                                 => "_p + ((((_l + _v) + _m) + _y) + _r) = _s"
            AddCongR: ["_q = _b", "_p + _b = _s"]                            => "_p + _q = _s"
             SubZero: ["_p = _s"]                                            => "_p - 0 = _s"
             SubMono: ["_p + -_v = _s"]                                      => "_p - _v = _s"
               SubB2: ["((_p - _l) - _v) - _r = _s"]                         => "_p - ((_l + _v) + _r) = _s"
               SubB3: ["((((_p - _l) - _v) - _m) - _y) - _r = _s"]
                                                                 => "_p - ((((_l + _v) + _m) + _y) + _r) = _s"
            SubCongR: ["_q = _b", "_p - _b = _s"]                            => "_p - _q = _s"

    // Negation.
             NegZero: []                                                     => "-(0) = 0"
               NegB2: ["-_l = _a", "-_v = _b", "-_r = _c"]                   => "-((_l + _v) + _r) = (_a + _b) + _c"
               NegB3: ["-_l = _a", "-_v = _b", "-_m = _c", "-_y = _d", "-_r = _e"]
                                          => "-((((_l + _v) + _m) + _y) + _r) = (((_a + _b) + _c) + _d) + _e"
            NegTrans: ["_a = _b", "-_b = _c"]                                => "-_a = _c"

    // Products.
            MulZeroL: []                                                     => "0 * _i = 0"
           MulMonoB2: ["_l * _i = _a", "_v * _i = _b", "_r * _i = _c"]       => "((_l + _v) + _r) * _i = (_a + _b) + _c"
           MulMonoB3: ["_l * _i = _a", "_v * _i = _b", "_m * _i = _c", "_y * _i = _d", "_r * _i = _e"]
                                          => "((((_l + _v) + _m) + _y) + _r) * _i = (((_a + _b) + _c) + _d) + _e"
            MulCongL: ["_a = _b", "_b * _c = _d"]                            => "_a * _c = _d"
            MulZeroR: []                                                     => "_p * 0 = 0"
               MulB2: ["((_p * _l) + (_p * _v)) + (_p * _r) = _s"]           => "_p * ((_l + _v) + _r) = _s"
               MulB3: ["((((_p * _l) + (_p * _v)) + (_p * _m)) + (_p * _y)) + (_p * _r) = _s"]
                                                                 => "_p * ((((_l + _v) + _m) + _y) + _r) = _s"
            MulCongR: ["_q = _b", "_p * _b = _s"]                            => "_p * _q = _s"

    // Powers of trees.
             PowZero: ["1 = _o"]                                             => "_p ^ 0 = _o"
             PowOneP: ["_p = _s"]                                            => "_p ^ 1 = _s"
             PowEven: ["#m + #m = #n", "_p ^ #m * _p ^ #m = _s"]             => "_p ^ #n = _s"
              PowOdd: ["#m + #m + 1 = #n", "_p ^ #m * _p ^ #m * _p = _s"]    => "_p ^ #n = _s"
             ExpCong: ["_e = #n", "_b ^ #n = _s"]                            => "_b ^ _e = _s"
               PosId: ["_a = _b"]                                            => "+_a = _b"

    // Normal forms.
            AddCong3: ["_l = _a", "_v = _b", "_r = _c"]                      => "(_l + _v) + _r = (_a + _b) + _c"
            AddCong5: ["_l = _a", "_v = _b", "_m = _c", "_y = _d", "_r = _e"]
                                          => "(((_l + _v) + _m) + _y) + _r = (((_a + _b) + _c) + _d) + _e"
        AddCongTrans: ["_a = _c", "_c + _b = _d"]                            => "_a + _b = _d"
           AddZeroR: []                                                      => "_a + 0 = _a"
          AddZeroLT: ["_b = _c"]                                             => "0 + _b = _c"
       AddAssocChain: ["_a + _b = _c", "_c + _d = _e"]                       => "_a + (_b + _d) = _e"
           AddNegSub: []                                                     => "_a + -_b = _a - _b"
           AddNegLit: ["-#m = #n"]                                           => "_a + #n = _a - #m"

    // Partitions and approximations.
      PartitionSplit: ["(_p - _a) - _b = 0"]                                 => "_p = _a + _b"
           ZeroSplit: []                                                     => "0 = 0 + 0"
            ApproxB2: ["_l = _a1 + _a2", "_v = _b1 + _b2", "_r = _c1 + _c2"]
                                          => "(_l + _v) + _r = ((_a1 + _b1) + _c1) + ((_a2 + _b2) + _c2)"
            ApproxB3: ["_l = _a1 + _a2", "_v = _b1 + _b2", "_m = _c1 + _c2", "_y = _d1 + _d2", "_r = _e1 + _e2"]
                                          => "(((_l + _v) + _m) + _y) + _r = (((_a1 + _b1) + _c1) + _d1) + _e1 + ((((_a2 + _b2) + _c2) + _d2) + _e2)"
}

/// A lemma whose source could not be read.
#[derive(Debug)]
pub struct BadLemma {
    lemma: LemmaName,
    pattern: &'static str,
    reason: String,
}

impl fmt::Display for BadLemma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: could not read \"{}\": {}",
            self.lemma, self.pattern, self.reason
        )
    }
}

impl Error for BadLemma {}

#[derive(Debug)]
pub struct BuildLemmaErrors {
    errors: Vec<Box<dyn Error>>,
}

impl fmt::Display for BuildLemmaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self
            .errors
            .iter()
            .enumerate()
            .map(|(i, r)| format!("({}) {}", i + 1, r.to_string()))
            .map(|s| indent(s, 4))
            .collect::<Vec<_>>()
            .join("\n");

        write!(
            f,
            "Failed to build lemmas with {} errors.\n{}",
            self.errors.len(),
            errors
        )
    }
}

impl Error for BuildLemmaErrors {}

fn build_prop(lemma: LemmaName, pattern: &'static str) -> Result<Prop, BadLemma> {
    let scanned = scan(pattern);
    if let Some(diag) = scanned.diagnostics.first() {
        return Err(BadLemma {
            lemma,
            pattern,
            reason: diag.title.clone(),
        });
    }
    let parsed = parse_proposition(scanned.tokens);
    if let Some(diag) = parsed.diagnostics.first() {
        return Err(BadLemma {
            lemma,
            pattern,
            reason: diag.title.clone(),
        });
    }
    Ok(parsed.program)
}

/// Builds the lemma library, reporting every lemma that fails to build.
pub(super) fn build_library() -> Result<HashMap<LemmaName, Certificate>, BuildLemmaErrors> {
    let mut library = HashMap::with_capacity(LemmaName::ALL.len());
    let mut errors: Vec<Box<dyn Error>> = Vec::new();
    for &lemma in LemmaName::ALL {
        let (hyps, concl) = lemma.source();
        let hyps: Vec<_> = hyps.iter().map(|h| build_prop(lemma, h)).collect();
        let concl = build_prop(lemma, concl);

        let mut built_hyps = Vec::with_capacity(hyps.len());
        for hyp in hyps {
            match hyp {
                Ok(hyp) => built_hyps.push(hyp),
                Err(err) => errors.push(err.into()),
            }
        }
        match concl {
            Ok(concl) if built_hyps.len() == lemma.source().0.len() => {
                library.insert(lemma, Certificate::new(built_hyps, concl));
            }
            Ok(_) => {}
            Err(err) => errors.push(err.into()),
        }
    }

    if !errors.is_empty() {
        return Err(BuildLemmaErrors { errors });
    }
    Ok(library)
}

lazy_static! {
    static ref LIBRARY: HashMap<LemmaName, Certificate> = match build_library() {
        Ok(library) => library,
        Err(errors) => {
            tracing::error!(%errors, "the lemma library failed to build");
            panic!("{}", errors);
        }
    };
}

/// Looks up a lemma of the library.
pub(super) fn get(lemma: LemmaName) -> &'static Certificate {
    match LIBRARY.get(&lemma) {
        Some(cert) => cert,
        // `build_library` inserts every name of `LemmaName::ALL` or fails.
        None => unreachable!(),
    }
}

/// Metavariables of a lemma that occur in its conclusion but in none of its hypotheses. These must
/// be bound explicitly when the lemma is applied.
pub fn free_conclusion_metas(lemma: LemmaName) -> Vec<String> {
    let cert = get(lemma);
    let mut bound = std::collections::BTreeSet::new();
    for hyp in cert.hypotheses() {
        bound.extend(collect_prop_metavariables(hyp));
    }
    collect_prop_metavariables(cert.conclusion())
        .into_iter()
        .filter(|m| !bound.contains(m))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::Emit;

    #[test]
    fn builds_lemmas() {
        let library = build_library().expect("lemmas build");
        assert_eq!(library.len(), LemmaName::ALL.len());
    }

    #[test]
    fn lemma_names_are_unique_in_declaration_order() {
        let mut names = LemmaName::ALL.to_vec();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), LemmaName::ALL.len());
    }

    #[test]
    fn bad_lemma_is_reported() {
        let err = build_prop(LemmaName::OneMul, "1 * _r =").unwrap_err();
        assert!(err.to_string().starts_with("OneMul: could not read \"1 * _r =\""));
    }

    #[test]
    fn build_errors_are_listed() {
        let errors = BuildLemmaErrors {
            errors: vec![
                build_prop(LemmaName::OneMul, "1 *").unwrap_err().into(),
                build_prop(LemmaName::MulOne, "_r + ").unwrap_err().into(),
            ],
        };
        let msg = errors.to_string();
        assert!(msg.starts_with("Failed to build lemmas with 2 errors.\n    (1) OneMul"));
        assert!(msg.contains("\n    (2) MulOne"));
    }

    #[test]
    fn free_conclusion_metas() {
        assert_eq!(super::free_conclusion_metas(LemmaName::PowOne), vec!["_x"]);
        assert_eq!(super::free_conclusion_metas(LemmaName::CoeffOfInt), vec!["#n"]);
        assert!(super::free_conclusion_metas(LemmaName::CoeffAdd).is_empty());
        assert_eq!(
            super::free_conclusion_metas(LemmaName::AddNegSub),
            vec!["_a", "_b"]
        );
    }

    #[test]
    fn lemma_text() {
        assert_eq!(
            get(LemmaName::CoeffReduce).emit_pretty(),
            "_a = #n / #d, #m * #g = #n, #e * #g = #d, #g != 0 |- _a = #m / #e"
        );
        assert_eq!(get(LemmaName::NegZero).emit_pretty(), "|- -(0) = 0");
    }
}

#[macro_use]
extern crate criterion;
extern crate lazy_static;
extern crate libcertring;

use criterion::Criterion;
use lazy_static::lazy_static;
use libcertring::{Coefficient, Expr, Monomial, PolynomialRing, TreePolynomial};
use std::sync::Arc;

lazy_static! {
    static ref RING: PolynomialRing =
        PolynomialRing::new(vec![Expr::atom("x"), Expr::atom("y"), Expr::atom("z")]).unwrap();
}

/// The monomials `k * x ^ (k % 5) * y ^ (k % 3) * z ^ (k % 2)` for `k` in `1..=n`.
fn monomials(n: i64) -> Vec<Monomial> {
    let vars: Arc<[_]> = RING.vars().into();
    let var = |i| Monomial::variable(Arc::clone(&vars), i);
    (1..=n)
        .map(|k| {
            let mut m = Monomial::constant(Arc::clone(&vars), &Coefficient::constant(k));
            for (i, e) in [k % 5, k % 3, k % 2].iter().enumerate() {
                for _ in 0..*e {
                    m = m.multiply(&var(i));
                }
            }
            m
        })
        .collect()
}

macro_rules! bench_insert {
    ($($name: ident: $size: expr)*)=> {
        $(
        fn $name(c: &mut Criterion) {
            let monomials = monomials($size);
            c.bench_function(concat!("insert_", $size), |b| {
                b.iter(|| {
                    monomials
                        .iter()
                        .fold(RING.zero(), |p: TreePolynomial, m| p.insert(m))
                })
            });
        }
    )*
    }
}

bench_insert! {
    size_8: 8
    size_32: 32
    size_64: 64
}

criterion_group!(insert_benches, size_8, size_32, size_64);
criterion_main!(insert_benches);

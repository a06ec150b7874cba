#[macro_use]
extern crate criterion;
extern crate libcertring;

use criterion::Criterion;
use libcertring::{parse_expression, scan, PolynomialRing};

macro_rules! bench_pow {
    ($($name: ident: $program: expr, $n: expr)*)=> {
        $(
        fn $name(c: &mut Criterion) {
            let expr = parse_expression(scan($program).tokens).program;
            let ring = PolynomialRing::new(libcertring::collectors::collect_ring_atoms(&expr)).unwrap();
            let p = ring.of_term(&expr).unwrap();
            c.bench_function(concat!("pow_", stringify!($name)), |b| {
                b.iter(|| p.pow($n).normalized())
            });
        }
    )*
    }
}

bench_pow! {
    binomial_8: "x + y", 8
    binomial_21: "x + y", 21
    trinomial_6: "x - 2 * y + 1 / 3", 6
}

criterion_group!(pow_benches, binomial_8, binomial_21, trinomial_6);
criterion_main!(pow_benches);

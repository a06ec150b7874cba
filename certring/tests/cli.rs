use certring::{get_opts, run_certring, CertringResult, Opts};

fn opts(args: &[&str]) -> Result<Opts, clap::Error> {
    let args = std::iter::once("certring").chain(args.iter().copied());
    get_opts(|app| app.get_matches_from_safe(args), false)
}

fn run(args: &[&str]) -> CertringResult {
    run_certring(opts(args).unwrap())
}

macro_rules! stdout_tests {
    ($($name:ident: [$($arg:expr),*] => $stdout:expr)*) => {
    $(
        #[test]
        fn $name() {
            let result = run(&[$($arg),*]);
            assert_eq!(result.stderr, "");
            assert_eq!(result.stdout, $stdout);
            assert_eq!(result.code, 0);
        }
    )*
    }
}

stdout_tests! {
    normal_form:        ["(x + y) ^ 2"]                                   => "x ^ 2 + 2 * x * y + y ^ 2"
    explicit_vars:      ["(x + y) ^ 2", "--vars", "y,x"]                  => "y ^ 2 + 2 * y * x + x ^ 2"
    application_vars:   ["f(x) * x - x * f(x) + x", "--vars", "x, f(x)"]  => "x"
    certificate:        ["x + x", "--certificate"]                        => "|- x + x = 2 * x"
    s_expression:       ["1 - x + 2 * x", "-o", "s-expression"]           => "(+ x 1)"
    zero_test:          ["(x + y) ^ 2 - (x * x + 2 * x * y + y * y)", "--zero-test"]
                                                                          => "0"
    zero_certificate:   ["x - x", "--zero-test", "--certificate"]         => "|- x - x = 0"
    approx:             ["2 / 3 * x + y - 7 / 4", "--approx", "1"]
                                                   => "3 / 5 * x + y - 9 / 5 + 1 / 15 * x + 1 / 20"
    constant:           ["1 / 2 + 1 / 3"]                                 => "5 / 6"
}

macro_rules! failure_tests {
    ($($name:ident: [$($arg:expr),*] => $($stderr:expr),+)*) => {
    $(
        #[test]
        fn $name() {
            let result = run(&[$($arg),*]);
            assert_eq!(result.stdout, "");
            assert_eq!(result.code, 1);
            $(
                assert!(
                    result.stderr.contains($stderr),
                    "{:?} is not in\n{}",
                    $stderr,
                    result.stderr
                );
            )+
        }
    )*
    }
}

failure_tests! {
    invalid_token:      ["1 + 2.5"]                      => "error[S0001]: Invalid token"
    parse_error:        ["1 +"]                          => "error[P"
    negative_exponent:  ["x ^ -1"]                       => "error[R0001]", "`x ^ -1` has a negative exponent"
    zero_denominator:   ["x + 1 / 0"]                    => "error[R0002]", "--explain R0002"
    unknown_atom:       ["x + z", "--vars", "x,y"]       => "error[R0003]", "`z` is not a variable of the ring"
    exponent_overflow:  ["x ^ 4294967295 * x"]          => "error[R0006]", "--explain R0006"
    duplicate_var:      ["x", "--vars", "x,x"]           => "error[R0004]"
    bad_var:            ["x", "--vars", "x,2.5"]         => "error[S0001]", "--vars"
    not_zero:           ["x - y", "--zero-test"]         => "The program is not zero", "normalizes to `x - y`"
    unknown_code:       ["--explain", "Z9999"]           => "Z9999 is not a diagnostic code"
}

#[test]
fn explain() {
    let result = run(&["--explain", "R0002"]);
    assert_eq!(result.code, 0);
    assert!(result.page);
    assert!(result.stdout.contains("denominator"));
}

#[test]
fn bad_arguments() {
    assert!(opts(&["x", "--approx", "two"]).is_err());
    assert!(opts(&["x", "--approx", "1", "--zero-test"]).is_err());
    assert!(opts(&["x", "-o", "latex"]).is_err());
    assert!(opts(&[]).is_err());
}

#[test]
fn options() {
    let opts = opts(&["x + y", "--vars", "y, x", "--certificate", "--approx", "3"]).unwrap();
    assert_eq!(opts.program, "x + y");
    assert_eq!(opts.vars, vec!["y", "x"]);
    assert_eq!(opts.emit_format, "pretty");
    assert!(opts.certificate);
    assert!(!opts.zero_test);
    assert_eq!(opts.approx, Some(3));
}

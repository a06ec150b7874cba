#![no_main]
use libfuzzer_sys::fuzz_target;

use certring::{run_certring, Opts};

// Any program must either normalize or be rejected with diagnostics; a panic means a certificate
// could not be built.
fuzz_target!(|program: String| {
    for zero_test in &[false, true] {
        run_certring(Opts {
            program: program.clone(),
            vars: Vec::new(),
            emit_format: "pretty".into(),
            certificate: true,
            zero_test: *zero_test,
            approx: None,
            explain_diagnostic: None,
            color: false,
        });
    }
});

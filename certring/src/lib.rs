//! The certring app. For an overview of certring's design, see
//! [libcertring's documentation](libcertring).

#![deny(missing_docs)]

mod diagnostics;
use diagnostics::{
    emit_certring_diagnostics, emit_not_zero, emit_ring_error, sanitize_source_for_diagnostics,
};

use libcertring::collectors::collect_ring_atoms;
use libcertring::diagnostics::Diagnostic;
use libcertring::{
    parse_expression, scan, Emit, EmitFormat, ParseResult, PolynomialRing, RcExpr, RingError,
    ScanResult,
};

/// Options to run certring with.
pub struct Opts {
    /// Program to normalize.
    pub program: String,
    /// Variables of the ring to normalize in, in order. When empty, the ring is made of the atoms
    /// of the program in order of first occurrence.
    pub vars: Vec<String>,
    /// How the result of certring's execution should be emitted.
    pub emit_format: String,
    /// When true, certring emits the certificate of its result rather than just the result.
    pub certificate: bool,
    /// When true, certring only checks that the program is zero.
    pub zero_test: bool,
    /// When is [Some](Option::Some) number of decimal digits, certring rounds the coefficients of
    /// the program to that many digits and emits the rounded polynomial plus the remainder.
    pub approx: Option<u32>,
    /// When is [Some](Option::Some) diagnostic code, will explain that code.
    pub explain_diagnostic: Option<String>,
    /// When true, certring emit will be colored.
    pub color: bool,
}

/// Parses [Opts](self::Opts) from the command line or given a parser that acts on the clap
/// [App](clap::App).
pub fn get_opts<P>(parser: P, color: bool) -> Result<Opts, clap::Error>
where
    P: for<'a> FnOnce(clap::App<'a, '_>) -> Result<clap::ArgMatches<'a>, clap::Error>,
{
    let matches = clap::App::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .author(clap::crate_authors!())
        .arg(
            clap::Arg::with_name("program")
                .help("Program to normalize")
                .required(true)
                .default_value_if("explain", None, ""),
        )
        .arg(
            clap::Arg::with_name("vars")
                .long("vars")
                .value_name("var")
                .help("Variables of the ring to normalize in, in order. Defaults to the atoms of the program.")
                .takes_value(true)
                .multiple(true)
                .use_delimiter(true)
                .require_delimiter(true),
        )
        .arg(
            clap::Arg::with_name("output-form")
                .short("o")
                .long("output-form")
                .next_line_help(true)
                .help(
                    "certring emit format. Possible values:\n\
                    \tpretty:       Human-readable text, like \"1 + 2\".\n\
                    \ts-expression: Prefixed s-expression, like \"(+ 1 2)\".\n\
                    ",
                )
                .hide_possible_values(true)
                .default_value("pretty")
                .takes_value(true)
                .possible_values(&["pretty", "s-expression"]),
        )
        .arg(
            clap::Arg::with_name("certificate")
                .long("certificate")
                .help("Emit the certificate of the result, like \"|- x + x = 2 * x\"."),
        )
        .arg(
            clap::Arg::with_name("zero-test")
                .long("zero-test")
                .help("Check that the program is zero. Fails if it is not."),
        )
        .arg(
            clap::Arg::with_name("approx")
                .long("approx")
                .value_name("digits")
                .help("Round the coefficients of the result down to a number of decimal digits.")
                .takes_value(true)
                .conflicts_with("zero-test")
                .validator(|digits| {
                    digits
                        .parse::<u32>()
                        .map(|_| ())
                        .map_err(|_| format!("\"{}\" is not a number of digits", digits))
                }),
        )
        .arg(
            clap::Arg::with_name("explain")
                .long("explain")
                .value_name("diagnostic")
                .help("Provide a detailed explanation for a diagnostic code.")
                .takes_value(true),
        );
    let matches = parser(matches)?;

    Ok(Opts {
        program: matches.value_of("program").unwrap_or_default().into(),
        vars: matches
            .values_of("vars")
            .map(|vars| vars.map(|v| v.trim().to_owned()).collect())
            .unwrap_or_default(),
        emit_format: matches.value_of("output-form").unwrap_or("pretty").into(),
        certificate: matches.is_present("certificate"),
        zero_test: matches.is_present("zero-test"),
        approx: matches.value_of("approx").and_then(|d| d.parse().ok()),
        explain_diagnostic: matches.value_of("explain").map(str::to_owned),
        color,
    })
}

/// Output of a certring execution.
#[derive(Default, Debug)]
pub struct CertringResult {
    /// Exit code
    pub code: i32,
    /// Emit for stdout
    pub stdout: String,
    /// Emit for stderr
    pub stderr: String,
    /// Whether the stdout should be emit as paged
    pub page: bool,
}

/// Builds a [CertringResult](self::CertringResult).
struct CertringResultBuilder<'a> {
    /// Original certring program source code.
    org_program: &'a str,
    /// Program source code sanitized for diagnostic emission.
    sanitized_program: String,
    emit_format: EmitFormat,
    color: bool,
    stdout: String,
    stderr: String,
    page: bool,
}

impl<'a> CertringResultBuilder<'a> {
    fn new(program: &'a str, emit_format: impl Into<EmitFormat>, color: bool) -> Self {
        Self {
            org_program: program,
            sanitized_program: sanitize_source_for_diagnostics(program),
            emit_format: emit_format.into(),
            color,
            page: false,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    fn emit(&mut self, obj: &dyn Emit) {
        self.stdout.push_str(&obj.emit(self.emit_format));
    }

    fn err(&mut self, diagnostics: &[Diagnostic]) {
        self.stderr.push_str(&emit_certring_diagnostics(
            None,
            &self.sanitized_program,
            diagnostics,
            self.color,
        ));
    }

    /// Emits diagnostics for a `--vars` value rather than the program.
    fn err_in_var(&mut self, var: &str, diagnostics: &[Diagnostic]) {
        self.stderr.push_str(&emit_certring_diagnostics(
            Some("--vars"),
            &sanitize_source_for_diagnostics(var),
            diagnostics,
            self.color,
        ));
    }

    fn ring_err(&mut self, err: &RingError) {
        self.stderr
            .push_str(&emit_ring_error(self.org_program, err, self.color));
    }

    fn page(&mut self, page: bool) {
        self.page = page;
    }

    fn ok(self) -> CertringResult {
        CertringResult {
            code: 0,
            stdout: self.stdout,
            stderr: self.stderr,
            page: self.page,
        }
    }

    fn failed(self) -> CertringResult {
        CertringResult {
            code: 1,
            stdout: self.stdout,
            stderr: self.stderr,
            page: self.page,
        }
    }
}

/// Scans and parses an expression, or returns the diagnostics that stopped it.
fn parse(source: &str) -> Result<RcExpr, Vec<Diagnostic>> {
    let ScanResult {
        tokens,
        diagnostics,
    } = scan(source);
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }
    let ParseResult {
        program,
        diagnostics,
    } = parse_expression(tokens);
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }
    Ok(program)
}

/// Runs certring end-to-end.
pub fn run_certring(opts: Opts) -> CertringResult {
    let mut result = CertringResultBuilder::new(&opts.program, opts.emit_format, opts.color);

    if let Some(diag_code) = opts.explain_diagnostic {
        let codes = Diagnostic::all_codes_with_explanations();
        return match codes.get::<str>(&diag_code) {
            Some(explanation) => {
                result.stdout.push_str(explanation);
                result.page(true);
                result.ok()
            }
            None => {
                result
                    .stderr
                    .push_str(&format!("{} is not a diagnostic code", diag_code));
                result.failed()
            }
        };
    }

    let program = match parse(&opts.program) {
        Ok(program) => program,
        Err(diagnostics) => {
            result.err(&diagnostics);
            return result.failed();
        }
    };

    let vars = if opts.vars.is_empty() {
        collect_ring_atoms(&program)
    } else {
        let mut vars = Vec::with_capacity(opts.vars.len());
        for var in opts.vars.iter() {
            match parse(var) {
                Ok(var) => vars.push(var),
                Err(diagnostics) => {
                    result.err_in_var(var, &diagnostics);
                    return result.failed();
                }
            }
        }
        vars
    };
    tracing::debug!(
        program = %program,
        vars = %vars.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "),
        "normalizing"
    );

    let polynomial = match PolynomialRing::new(vars).and_then(|ring| ring.of_term(&program)) {
        Ok(polynomial) => polynomial,
        Err(err) => {
            result.ring_err(&err);
            return result.failed();
        }
    };

    let cert = if opts.zero_test {
        match polynomial.zero_test() {
            Some(cert) => cert,
            None => {
                let normal_form = polynomial.normalized().rhs().emit(result.emit_format);
                result.stderr.push_str(&emit_not_zero(
                    result.org_program,
                    &normal_form,
                    result.color,
                ));
                return result.failed();
            }
        }
    } else if let Some(digits) = opts.approx {
        polynomial.approx_normalized(digits).0
    } else {
        polynomial.normalized()
    };

    if opts.certificate {
        result.emit(&cert);
    } else {
        result.emit(cert.rhs());
    }
    result.ok()
}

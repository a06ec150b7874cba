//! The libcertring scanner.

#[macro_use]
pub(crate) mod errors;
pub mod types;

use crate::diagnostics::{Diagnostic, DiagnosticRecord};
use crate::utils::PeekIter;
use errors::*;
use types::*;

use num_bigint::BigInt;

/// The result of scanning a program.
pub struct ScanResult {
    /// Scanned tokens, always terminated by [EOF](TokenType::EOF).
    pub tokens: Vec<Token>,
    /// Diagnostics produced while scanning.
    pub diagnostics: Vec<Diagnostic>,
}

/// Scans a program into tokens.
pub fn scan<T: Into<String>>(input: T) -> ScanResult {
    let mut scanner = Scanner::new(input);
    scanner.scan();
    ScanResult {
        tokens: scanner.output,
        diagnostics: scanner.diagnostics,
    }
}

struct Scanner {
    pos: usize,
    input: PeekIter<char>,
    output: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Scanner {
    fn new<T: Into<String>>(input: T) -> Scanner {
        let chars: Vec<char> = input.into().chars().collect();

        Scanner {
            pos: 0,
            input: PeekIter::new(chars.into_iter()),
            output: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn scan(&mut self) {
        while let Some(&c) = self.input.peek() {
            match c {
                _ if c.is_whitespace() => {
                    self.next();
                }
                _ if c.is_ascii_digit() => self.scan_num(),
                '#' => self.scan_pattern(TokenType::ConstPattern),
                '_' => self.scan_pattern(TokenType::AnyPattern),
                _ if c.is_alphabetic() => self.scan_ident(),
                _ => self.scan_symbol(),
            }
        }

        self.output
            .push(Token::new(TokenType::EOF, self.pos..self.pos + 1));
    }

    fn next(&mut self) -> Option<char> {
        let c = self.input.next();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn collect_while<P>(&mut self, pred: P) -> String
    where
        P: Fn(&char) -> bool,
    {
        let collected: String = self.input.collect_while(pred);
        self.pos += collected.chars().count();
        collected
    }

    fn scan_symbol(&mut self) {
        use TokenType::*;
        let start = self.pos;
        let c = match self.next() {
            Some(c) => c,
            None => return,
        };
        let ty = match c {
            '+' => Plus,
            '-' => Minus,
            '*' => Mult,
            '/' => Div,
            '^' => Exp,
            '=' => Equal,
            ',' => Comma,
            '(' => OpenParen,
            ')' => CloseParen,
            '!' if self.input.peek() == Some(&'=') => {
                self.next();
                NotEqual
            }
            c => {
                let did_you_mean = match c {
                    '!' => Some("!="),
                    '[' => Some("("),
                    ']' => Some(")"),
                    _ => None,
                };
                self.diagnostics
                    .push(InvalidToken!(start..self.pos, did_you_mean));
                Invalid(c.to_string())
            }
        };
        self.output.push(Token::new(ty, start..self.pos));
    }

    fn scan_num(&mut self) {
        let start = self.pos;
        let digits = self.collect_while(|c| c.is_ascii_digit());
        // Only ASCII digits were collected, so the literal is well-formed.
        let num = digits.parse::<BigInt>().unwrap_or_default();
        self.output
            .push(Token::new(TokenType::Int(num), start..self.pos));
    }

    fn scan_ident_str(&mut self) -> String {
        self.collect_while(|c| c.is_alphanumeric() || *c == '_')
    }

    fn scan_ident(&mut self) {
        let start = self.pos;
        let name = self.scan_ident_str();
        self.output
            .push(Token::new(TokenType::Ident(name), start..self.pos));
    }

    fn scan_pattern(&mut self, ty: fn(String) -> TokenType) {
        let start = self.pos;
        let mut pat = String::with_capacity(4);
        if let Some(sigil) = self.next() {
            pat.push(sigil);
        }
        pat.push_str(&self.scan_ident_str());
        self.output.push(Token::new(ty(pat), start..self.pos));
    }
}

#[cfg(test)]
mod tests {
    // Tests the Scanner's output against a humanized string representation of the expected tokens.
    // See [Token]'s impl of Display for more details.
    // [Token]: src/scanner/types.rs
    macro_rules! scanner_tests {
        ($($name:ident: $program:expr, $format_str:expr)*) => {
        $(
            #[test]
            fn $name() {
                use crate::scanner::scan;

                let mut tokens = scan($program)
                    .tokens
                    .into_iter()
                    .map(|tok| tok.to_string())
                    .collect::<Vec<_>>();
                tokens.pop();
                assert_eq!(tokens.join(" "), $format_str);
            }
        )*
        }
    }

    mod scan {
        scanner_tests! {
            integer: "2", "2"
            big_integer: "123456789012345678901234567890", "123456789012345678901234567890"
            plus: "+", "+"
            minus: "-", "-"
            mult: "*", "*"
            div: "/", "/"
            exp: "^", "^"
            equal: "=", "="
            not_equal: "!=", "!="
            comma: ",", ","
            open_paren: "(", "("
            close_paren: ")", ")"
            const_pattern: "#a", "#a"
            any_pattern: "_a", "_a"
            numbered_pattern: "_c1", "_c1"

            empty_string: "", ""
            skip_whitespace: "  =  ", "="

            multiple_integers: "1 2 3", "1 2 3"
            expressions: "1 + 2 ^ 5", "1 + 2 ^ 5"
            application: "f(x, y1)", "f ( x , y1 )"
            proposition: "_a + 0 = _a", "_a + 0 = _a"
            juxtaposed: "2x", "2 x"
        }
    }

    mod scan_invalid {
        scanner_tests! {
            invalid_tokens: "@", "@"
            invalid_tokens_mixed_with_valid: "=@/", "= @ /"
            lone_bang: "a ! b", "a ! b"
            decimal: "2.5", "2 . 5"
        }
    }

    mod diagnostics {
        use crate::scanner::scan;

        #[test]
        fn invalid_token_spans() {
            let result = scan("1 + 2.5");
            assert_eq!(result.diagnostics.len(), 1);
            let diag = &result.diagnostics[0];
            assert_eq!(diag.code, Some("S0001"));
            assert_eq!((diag.span.lo, diag.span.hi), (5, 6));
        }

        #[test]
        fn suggests_not_equal() {
            let result = scan("a ! b");
            let diag = &result.diagnostics[0];
            assert_eq!(diag.unspanned_associated_diagnostics.len(), 2);
            assert_eq!(
                diag.unspanned_associated_diagnostics[1].msg,
                r#"did you mean "!="?"#
            );
        }

        #[test]
        fn valid_program_has_no_diagnostics() {
            assert!(scan("(x + y) ^ 2 - f(x)").diagnostics.is_empty());
        }
    }
}

//! The libcertring parser.
//!
//! The parser is a recursive descent over the grammar
//!
//! ```text
//! prop    := expr ("=" | "!=") expr
//! expr    := term (("+" | "-") term)*
//! term    := unary (("*" | "/") unary)*
//! unary   := "-" int            (when not followed by "^")
//!          | ("+" | "-") unary
//!          | power
//! power   := primary ("^" unary)?
//! primary := int | ident | ident "(" expr ("," expr)* ")" | pattern | "(" expr ")"
//! ```
//!
//! A minus sign directly in front of an integer literal is read as part of the literal, so `-3`
//! is the number negative three, while `-x` and `-3^2` are negations.

#[macro_use]
pub(crate) mod errors;

use crate::common::Span;
use crate::diagnostics::{Diagnostic, DiagnosticRecord};
use crate::grammar::*;
use crate::scanner::types::{Token, TokenType};
use crate::utils::PeekIter;
use errors::*;

use core::convert::TryFrom;

/// The result of parsing a program.
pub struct ParseResult<T> {
    /// The parsed program. If there are any `diagnostics`, the program is only a best-effort
    /// recovery and should not be evaluated.
    pub program: T,
    /// Diagnostics produced while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses an expression. Patterns are reported as errors.
pub fn parse_expression(input: Vec<Token>) -> ParseResult<RcExpr> {
    let mut parser = ExpressionParser::new(input, false);
    let program = parser.parse_whole(ExpressionParser::expr);
    parser.finish(program)
}

/// Parses an expression pattern, which may contain `_a` and `#a` metavariables.
pub fn parse_expression_pattern(input: Vec<Token>) -> ParseResult<RcExpr> {
    let mut parser = ExpressionParser::new(input, true);
    let program = parser.parse_whole(ExpressionParser::expr);
    parser.finish(program)
}

/// Parses a proposition `a = b` or `a != b`, which may contain metavariables.
pub fn parse_proposition(input: Vec<Token>) -> ParseResult<Prop> {
    let mut parser = ExpressionParser::new(input, true);
    let program = parser.parse_whole(ExpressionParser::prop);
    parser.finish(program)
}

struct ExpressionParser {
    input: PeekIter<Token>,
    diagnostics: Vec<Diagnostic>,
    allow_patterns: bool,
}

impl ExpressionParser {
    fn new(input: Vec<Token>, allow_patterns: bool) -> Self {
        Self {
            input: PeekIter::new(input.into_iter()),
            diagnostics: Vec::new(),
            allow_patterns,
        }
    }

    fn finish<T>(self, program: T) -> ParseResult<T> {
        ParseResult {
            program,
            diagnostics: self.diagnostics,
        }
    }

    /// Parses a complete program with `parse`, reporting any tokens left over.
    fn parse_whole<T>(&mut self, parse: fn(&mut Self) -> (T, Span)) -> T {
        let (program, _) = parse(self);
        if !self.done() {
            let first = self.peek_span();
            let mut last = first;
            while !self.done() {
                if let Some(tok) = self.input.next() {
                    last = tok.span;
                }
            }
            self.diagnostics.push(ExtraTokens!(first.to(last)));
        }
        program
    }

    fn done(&mut self) -> bool {
        match self.input.peek() {
            None => true,
            Some(tok) => tok.ty == TokenType::EOF,
        }
    }

    fn peek_ty(&mut self) -> TokenType {
        self.input
            .peek()
            .map(|tok| tok.ty.clone())
            .unwrap_or(TokenType::EOF)
    }

    fn peek_span(&mut self) -> Span {
        self.input.peek().map(|tok| tok.span).unwrap_or_default()
    }

    fn advance(&mut self) -> Option<Token> {
        match self.input.peek() {
            Some(tok) if tok.ty == TokenType::EOF => None,
            _ => self.input.next(),
        }
    }

    fn prop(&mut self) -> (Prop, Span) {
        let (lhs, lhs_span) = self.expr();
        let relation = self.peek_ty();
        let relation_span = self.peek_span();
        let make: fn(RcExpr, RcExpr) -> Prop = match relation {
            TokenType::Equal => Prop::equal,
            TokenType::NotEqual => Prop::not_equal,
            found => {
                self.diagnostics
                    .push(ExpectedRelation!(relation_span, found));
                return (Prop::equal(lhs.clone(), lhs), lhs_span);
            }
        };
        self.advance();
        let (rhs, rhs_span) = self.expr();
        (make(lhs, rhs), lhs_span.to(rhs_span))
    }

    fn expr(&mut self) -> (RcExpr, Span) {
        let (mut lhs, mut span) = self.term();
        loop {
            let op = match self.peek_ty() {
                TokenType::Plus => BinaryOperator::Plus,
                TokenType::Minus => BinaryOperator::Minus,
                _ => break,
            };
            self.advance();
            let (rhs, rhs_span) = self.term();
            lhs = Expr::binary(op, lhs, rhs);
            span = span.to(rhs_span);
        }
        (lhs, span)
    }

    fn term(&mut self) -> (RcExpr, Span) {
        let (mut lhs, mut span) = self.unary();
        loop {
            let op = match self.peek_ty() {
                TokenType::Mult => BinaryOperator::Mult,
                TokenType::Div => BinaryOperator::Div,
                _ => break,
            };
            self.advance();
            let (rhs, rhs_span) = self.unary();
            lhs = Expr::binary(op, lhs, rhs);
            span = span.to(rhs_span);
        }
        (lhs, span)
    }

    fn unary(&mut self) -> (RcExpr, Span) {
        let mut next_3 = self.input.peek_map_n(3, |tok| tok.ty.clone());
        let (first, second, third) = (next_3.pop_front(), next_3.pop_front(), next_3.pop_front());
        if let (Some(TokenType::Minus), Some(TokenType::Int(n))) = (&first, &second) {
            if third != Some(TokenType::Exp) {
                let lo = self.peek_span();
                self.advance();
                let hi = self.peek_span();
                self.advance();
                return (Expr::num(-n.clone()), lo.to(hi));
            }
        }

        let op = self
            .input
            .peek()
            .and_then(|tok| UnaryOperator::try_from(tok).ok());
        match op {
            Some(op) => {
                let lo = self.peek_span();
                self.advance();
                let (rhs, span) = self.unary();
                (Expr::unary(op, rhs), lo.to(span))
            }
            None => self.power(),
        }
    }

    fn power(&mut self) -> (RcExpr, Span) {
        let (base, span) = self.primary();
        if self.peek_ty() != TokenType::Exp {
            return (base, span);
        }
        self.advance();
        let (exponent, exp_span) = self.unary();
        (Expr::exp(base, exponent), span.to(exp_span))
    }

    fn primary(&mut self) -> (RcExpr, Span) {
        let span = self.peek_span();
        match self.peek_ty() {
            TokenType::Int(n) => {
                self.advance();
                (Expr::num(n), span)
            }
            TokenType::Ident(name) => {
                self.advance();
                if self.peek_ty() == TokenType::OpenParen {
                    self.application(name, span)
                } else {
                    (Expr::atom(name), span)
                }
            }
            TokenType::ConstPattern(name) | TokenType::AnyPattern(name) => {
                self.advance();
                if !self.allow_patterns {
                    self.diagnostics.push(IllegalPattern!(span, name));
                }
                (Expr::meta(name), span)
            }
            TokenType::OpenParen => {
                self.advance();
                let (inner, _) = self.expr();
                let hi = self.close_paren(span);
                (inner, span.to(hi))
            }
            found => {
                // The offending token is left in place; an enclosing rule may still accept it,
                // and anything left over is reported as extra tokens.
                self.diagnostics.push(ExpectedExpr!(span, found));
                (Expr::num(0), span)
            }
        }
    }

    fn application(&mut self, name: String, name_span: Span) -> (RcExpr, Span) {
        let open_span = self.peek_span();
        self.advance();
        let mut args = Vec::with_capacity(2);
        if self.peek_ty() != TokenType::CloseParen {
            loop {
                let (arg, _) = self.expr();
                args.push(arg);
                if self.peek_ty() != TokenType::Comma {
                    break;
                }
                self.advance();
            }
        }
        let hi = self.close_paren(open_span);
        (Expr::app(name, args), name_span.to(hi))
    }

    /// Consumes a closing parenthesis matching an opener at `open_span`, returning the span of
    /// the closer.
    fn close_paren(&mut self, open_span: Span) -> Span {
        let span = self.peek_span();
        match self.peek_ty() {
            TokenType::CloseParen => {
                self.advance();
            }
            found => self
                .diagnostics
                .push(UnclosedDelimiter!(at span, opened at open_span; found found)),
        }
        span
    }
}

#[cfg(test)]
mod tests {
    // Parses a program and checks its emitted s-expression form.
    macro_rules! parser_tests {
        ($parser:ident $($name:ident: $program:expr => $sexpr:expr)*) => {
        $(
            #[test]
            fn $name() {
                use crate::emit::Emit;
                use crate::parser::$parser;
                use crate::scanner::scan;

                let result = $parser(scan($program).tokens);
                assert!(result.diagnostics.is_empty(), "unexpected diagnostics");
                assert_eq!(result.program.emit_s_expression(), $sexpr);
            }
        )*
        }
    }

    macro_rules! parser_error_tests {
        ($parser:ident $($name:ident: $program:expr => $codes:expr)*) => {
        $(
            #[test]
            fn $name() {
                use crate::parser::$parser;
                use crate::scanner::scan;

                let result = $parser(scan($program).tokens);
                let codes: Vec<_> = result
                    .diagnostics
                    .iter()
                    .filter_map(|d| d.code)
                    .collect();
                assert_eq!(codes.join(" "), $codes);
            }
        )*
        }
    }

    mod expression {
        parser_tests! {
            parse_expression

            int:                 "12"               => "12"
            atom:                "x"                => "x"
            negative_literal:    "-3"               => "-3"
            negation:            "-x"               => "(- x)"
            negated_power:       "-3 ^ 2"           => "(- (^ 3 2))"
            double_negation:     "--3"              => "(- -3)"
            plus_minus_assoc:    "1 - 2 + 3"        => "(+ (- 1 2) 3)"
            mult_div_assoc:      "1 / 2 * 3"        => "(* (/ 1 2) 3)"
            precedence:          "1 + 2 * 3 ^ 4"    => "(+ 1 (* 2 (^ 3 4)))"
            exp_right_assoc:     "x ^ 2 ^ 3"        => "(^ x (^ 2 3))"
            negative_exponent:   "x ^ -1"           => "(^ x -1)"
            parens:              "(x + y) * z"      => "(* (+ x y) z)"
            application:         "f(x, y + 1)"      => "(f x (+ y 1))"
            nullary_application: "g()"              => "(g)"
            nested_application:  "f(g(x))"          => "(f (g x))"
            rational:            "-3/4"             => "(/ -3 4)"
        }
    }

    mod expression_pattern {
        parser_tests! {
            parse_expression_pattern

            any_pattern:         "_a + 0"           => "(+ _a 0)"
            const_pattern:       "#n / #d"          => "(/ #n #d)"
        }
    }

    mod proposition {
        parser_tests! {
            parse_proposition

            equation:            "_a * 1 = _a"      => "(= (* _a 1) _a)"
            disequation:         "#d != 0"          => "(!= #d 0)"
        }
    }

    mod errors {
        parser_error_tests! {
            parse_expression

            extra_tokens:        "1 + 2 3 + 4"      => "P0001"
            missing_operand:     "1 +"              => "P0002"
            missing_operator:    "1 + * 2"          => "P0002"
            unclosed_paren:      "(1 + 2"           => "P0003"
            unclosed_app:        "f(x, y"           => "P0003"
            illegal_pattern:     "_a + #b"          => "P0004 P0004"
            unmatched_closer:    "1 + 2)"           => "P0001"
        }

        parser_error_tests! {
            parse_proposition

            missing_relation:    "_a + 0"           => "P0005"
        }
    }

    mod spans {
        use crate::parser::parse_expression;
        use crate::scanner::scan;

        #[test]
        fn extra_tokens_span() {
            let result = parse_expression(scan("1 + 2 3 + 4").tokens);
            let diag = &result.diagnostics[0];
            assert_eq!((diag.span.lo, diag.span.hi), (6, 11));
        }

        #[test]
        fn unclosed_paren_notes_opener() {
            let result = parse_expression(scan("(1 + 2").tokens);
            let diag = &result.diagnostics[0];
            assert_eq!(diag.associated_diagnostics.len(), 1);
            assert_eq!(diag.associated_diagnostics[0].span.lo, 0);
        }
    }
}

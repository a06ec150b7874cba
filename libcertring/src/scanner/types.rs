//! Definitions of types used in the libcertring scanner.

use crate::common::Span;

use core::fmt;
use num_bigint::BigInt;

/// The type of a [Token][Token].
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum TokenType {
    /// An integer literal.
    Int(BigInt),

    /// + symbol
    Plus,

    /// - symbol
    Minus,

    /// * symbol
    Mult,

    /// / symbol
    Div,

    /// ^ symbol
    Exp,

    /// = symbol
    Equal,

    /// != symbol
    NotEqual,

    /// , symbol
    Comma,

    /// ( symbol
    OpenParen,

    /// ) symbol
    CloseParen,

    /// An atom or function name.
    Ident(String),

    /// A numeral pattern, of form #name.
    ConstPattern(String),

    /// An any pattern, of form _name.
    AnyPattern(String),

    /// An invalid token.
    Invalid(String),

    /// End of file.
    EOF,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenType::*;
        match self {
            Int(num) => write!(f, "{}", num),
            Plus => f.write_str("+"),
            Minus => f.write_str("-"),
            Mult => f.write_str("*"),
            Div => f.write_str("/"),
            Exp => f.write_str("^"),
            Equal => f.write_str("="),
            NotEqual => f.write_str("!="),
            Comma => f.write_str(","),
            OpenParen => f.write_str("("),
            CloseParen => f.write_str(")"),
            Ident(s) | ConstPattern(s) | AnyPattern(s) | Invalid(s) => f.write_str(s),
            EOF => f.write_str("end of file"),
        }
    }
}

/// Describes a token in a certring program.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Token {
    /// The type of the token.
    pub ty: TokenType,
    /// The source span of the token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new<Sp>(ty: TokenType, span: Sp) -> Self
    where
        Sp: Into<Span>,
    {
        Self {
            ty,
            span: span.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)
    }
}

#[cfg(test)]
mod tests {
    mod format {
        use crate::scanner::types::*;

        macro_rules! format_tests {
            ($($name:ident: $ty:expr, $format_str:expr)*) => {
            $(
                #[test]
                fn $name() {
                    use TokenType::*;
                    let tok = Token::new($ty, 0..0);
                    assert_eq!(tok.to_string(), $format_str);
                }
            )*
            }
        }

        format_tests! {
            int: Int(13.into()), "13"
            plus: Plus, "+"
            minus: Minus, "-"
            mult: Mult, "*"
            div: Div, "/"
            exp: Exp, "^"
            equal: Equal, "="
            not_equal: NotEqual, "!="
            comma: Comma, ","
            open_paren: OpenParen, "("
            close_paren: CloseParen, ")"
            ident: Ident("ab".into()), "ab"
            const_pattern: ConstPattern("#n".into()), "#n"
            any_pattern: AnyPattern("_a".into()), "_a"
            invalid: Invalid("@&@".into()), "@&@"
            eof: EOF, "end of file"
        }
    }
}

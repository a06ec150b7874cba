//! Emit strategies for the libcertring grammar.

use crate::grammar::*;
use crate::kernel::Certificate;

use core::cmp::Ordering;
use core::fmt;

/// The format in which a libcertring object should be emitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EmitFormat {
    /// Canonical, human-readable form.
    /// For example, `1+1` is output as `1 + 1`.
    Pretty,
    /// S-expression form.
    /// For example, `1+1` is output as `(+ 1 1)`.
    SExpression,
}

impl From<&str> for EmitFormat {
    fn from(form: &str) -> Self {
        match form {
            "s-expression" => Self::SExpression,
            _ => Self::Pretty,
        }
    }
}

impl From<String> for EmitFormat {
    fn from(form: String) -> Self {
        form.as_str().into()
    }
}

/// Implements the emission of a type in an [EmitFormat][EmitFormat].
pub trait Emit
where
    // `Display` is trivially implementable using `emit_pretty`. The easiest way to do this is with
    // the `fmt_emit_impl` macro.
    Self: fmt::Display,
{
    /// Emit `self` with the given [EmitFormat][EmitFormat].
    fn emit(&self, form: EmitFormat) -> String {
        match form {
            EmitFormat::Pretty => self.emit_pretty(),
            EmitFormat::SExpression => self.emit_s_expression(),
        }
    }

    /// Emit `self` with the [pretty emit format][EmitFormat::Pretty]
    fn emit_pretty(&self) -> String;

    /// Emit `self` with the [s_expression emit format][EmitFormat::SExpression]
    fn emit_s_expression(&self) -> String;
}

/// Implements `core::fmt::Display` for a type implementing `Emit`.
macro_rules! fmt_emit_impl {
    ($S:path) => {
        impl core::fmt::Display for $S {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.emit_pretty())
            }
        }
    };
}

fmt_emit_impl!(Expr);
impl Emit for Expr {
    fn emit_pretty(&self) -> String {
        match self {
            Self::Num(num) => num.to_string(),
            Self::Atom(name) | Self::Meta(name) => name.to_string(),
            Self::App(name, args) => format!(
                "{}({})",
                name,
                args.iter()
                    .map(|arg| arg.emit_pretty())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::BinaryExpr(binary_expr) => binary_expr.emit_pretty(),
            Self::UnaryExpr(unary_expr) => unary_expr.emit_pretty(),
        }
    }

    fn emit_s_expression(&self) -> String {
        match self {
            Self::Num(num) => num.to_string(),
            Self::Atom(name) | Self::Meta(name) => name.to_string(),
            Self::App(name, args) => {
                let mut parts = Vec::with_capacity(args.len() + 1);
                parts.push(name.to_string());
                parts.extend(args.iter().map(|arg| arg.emit_s_expression()));
                format!("({})", parts.join(" "))
            }
            Self::BinaryExpr(BinaryExpr { op, lhs, rhs }) => format!(
                "({} {} {})",
                op,
                lhs.emit_s_expression(),
                rhs.emit_s_expression()
            ),
            Self::UnaryExpr(UnaryExpr { op, rhs }) => {
                format!("({} {})", op, rhs.emit_s_expression())
            }
        }
    }
}

impl Emit for RcExpr {
    fn emit_pretty(&self) -> String {
        self.as_ref().emit_pretty()
    }

    fn emit_s_expression(&self) -> String {
        self.as_ref().emit_s_expression()
    }
}

fmt_emit_impl!(BinaryOperator);
impl Emit for BinaryOperator {
    fn emit_pretty(&self) -> String {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mult => "*",
            Self::Div => "/",
            Self::Exp => "^",
        }
        .to_owned()
    }

    fn emit_s_expression(&self) -> String {
        self.emit_pretty()
    }
}

fmt_emit_impl!(BinaryExpr);
impl Emit for BinaryExpr {
    fn emit_pretty(&self) -> String {
        // We want to format items like
        //    v--------- child op
        //         v---- parent op
        // (3 + 5) ^ 2 [1]
        //  3 + 5  + 2
        //  3 * 5  + 2
        // and
        //   v---------- parent op
        //        v----- child op
        // 2 +  3 + 5
        // 2 - (3 + 5) [2]
        // 2 ^  3 ^ 5
        //
        // - a child op of lower precedence than its parent is always parenthesized ([1])
        // - a child op of equal precedence is unwrapped on the side the parent associates
        //   towards, and on the right only when both ops are the same associative op ([2])
        let format_arg = |arg: &RcExpr, right_child: bool| match arg.as_ref() {
            Expr::BinaryExpr(child) => {
                let parens = match child.op.precedence().cmp(&self.op.precedence()) {
                    Ordering::Less => true,
                    Ordering::Greater => false,
                    Ordering::Equal if self.op.is_right_associative() => !right_child,
                    Ordering::Equal => {
                        right_child && !(self.op.is_associative() && child.op == self.op)
                    }
                };
                if parens {
                    format!("({})", child.emit_pretty())
                } else {
                    child.emit_pretty()
                }
            }
            // A signed base would otherwise be read as the sign of the whole power.
            Expr::UnaryExpr(_) | Expr::Num(_)
                if !right_child && self.op == BinaryOperator::Exp
                    && (arg.is_negative_num() || matches!(arg.as_ref(), Expr::UnaryExpr(_))) =>
            {
                format!("({})", arg.emit_pretty())
            }
            _ => arg.emit_pretty(),
        };
        format!(
            "{} {} {}",
            format_arg(&self.lhs, false),
            self.op,
            format_arg(&self.rhs, true)
        )
    }

    fn emit_s_expression(&self) -> String {
        format!(
            "({} {} {})",
            self.op,
            self.lhs.emit_s_expression(),
            self.rhs.emit_s_expression()
        )
    }
}

fmt_emit_impl!(UnaryOperator);
impl Emit for UnaryOperator {
    fn emit_pretty(&self) -> String {
        match self {
            Self::SignPositive => "+",
            Self::SignNegative => "-",
        }
        .to_owned()
    }

    fn emit_s_expression(&self) -> String {
        self.emit_pretty()
    }
}

fmt_emit_impl!(UnaryExpr);
impl Emit for UnaryExpr {
    fn emit_pretty(&self) -> String {
        let arg = match self.rhs.as_ref() {
            Expr::BinaryExpr(child) if child.op != BinaryOperator::Exp => {
                format!("({})", child.emit_pretty())
            }
            // `-3` is a negative literal; the negation of the literal `3` is `-(3)`.
            Expr::Num(_)
                if self.op == UnaryOperator::SignNegative && !self.rhs.is_negative_num() =>
            {
                format!("({})", self.rhs.emit_pretty())
            }
            _ => self.rhs.emit_pretty(),
        };
        format!("{}{}", self.op, arg)
    }

    fn emit_s_expression(&self) -> String {
        format!("({} {})", self.op, self.rhs.emit_s_expression())
    }
}

fmt_emit_impl!(Prop);
impl Emit for Prop {
    fn emit_pretty(&self) -> String {
        match self {
            Self::Eq(lhs, rhs) => format!("{} = {}", lhs.emit_pretty(), rhs.emit_pretty()),
            Self::Ne(lhs, rhs) => format!("{} != {}", lhs.emit_pretty(), rhs.emit_pretty()),
        }
    }

    fn emit_s_expression(&self) -> String {
        let (rel, lhs, rhs) = match self {
            Self::Eq(lhs, rhs) => ("=", lhs, rhs),
            Self::Ne(lhs, rhs) => ("!=", lhs, rhs),
        };
        format!(
            "({} {} {})",
            rel,
            lhs.emit_s_expression(),
            rhs.emit_s_expression()
        )
    }
}

fmt_emit_impl!(Certificate);
impl Emit for Certificate {
    fn emit_pretty(&self) -> String {
        let concl = self.conclusion().emit_pretty();
        if self.hypotheses().is_empty() {
            return format!("|- {}", concl);
        }
        let hyps = self
            .hypotheses()
            .iter()
            .map(|h| h.emit_pretty())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} |- {}", hyps, concl)
    }

    fn emit_s_expression(&self) -> String {
        let hyps = self
            .hypotheses()
            .iter()
            .map(|h| h.emit_s_expression())
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "(|- ({}) {})",
            hyps,
            self.conclusion().emit_s_expression()
        )
    }
}

#[cfg(test)]
mod tests {
    // Parses a program and checks that its pretty form is the expected string.
    macro_rules! emit_tests {
        ($($name:ident: $program:expr => $pretty:expr)*) => {
        $(
            #[test]
            fn $name() {
                use crate::{parse_expression, scan};

                let parsed = parse_expression(scan($program).tokens).program;
                assert_eq!(parsed.to_string(), $pretty);
            }
        )*
        }
    }

    mod pretty {
        emit_tests! {
            spaces:              "1+1"                => "1 + 1"
            left_assoc:          "1 - 2 + 3"          => "1 - 2 + 3"
            right_nested_sub:    "1 - (2 + 3)"        => "1 - (2 + 3)"
            right_nested_plus:   "1 + (2 + 3)"        => "1 + 2 + 3"
            right_nested_mixed:  "1 + (2 - 3)"        => "1 + (2 - 3)"
            right_nested_mult:   "2 * (x * y)"        => "2 * x * y"
            lower_precedence:    "(x + y) * z"        => "(x + y) * z"
            power_of_sum:        "(x + y) ^ 2"        => "(x + y) ^ 2"
            power_tower:         "x ^ 2 ^ 3"          => "x ^ 2 ^ 3"
            left_power:          "(x ^ 2) ^ 3"        => "(x ^ 2) ^ 3"
            negated_sum:         "-(x + y)"           => "-(x + y)"
            negated_power:       "-x ^ 2"             => "-x ^ 2"
            negative_base:       "(-3) ^ 2"           => "(-3) ^ 2"
            negated_base:        "(-x) ^ 2"           => "(-x) ^ 2"
            negated_literal:     "-(3)"               => "-(3)"
            negative_literal:    "-3"                 => "-3"
            application:         "f(x, y+1)"          => "f(x, y + 1)"
            subtract_negative:   "x - -3"             => "x - -3"
        }
    }

    mod s_expression {
        use crate::emit::Emit;
        use crate::{parse_proposition, scan};

        #[test]
        fn proposition() {
            let prop = parse_proposition(scan("-_a != 0 / #d").tokens).program;
            assert_eq!(prop.emit_s_expression(), "(!= (- _a) (/ 0 #d))");
            assert_eq!(prop.emit_pretty(), "-_a != 0 / #d");
        }
    }

    mod reparse {
        use crate::{parse_expression, scan};

        // Pretty output reads back as an expression of the same value; operands of associative
        // operators may regroup.
        #[test]
        fn pretty_reparses_to_same_structure_without_regrouping() {
            for program in &["-(3) * x", "(-3) ^ 2", "-3 ^ 2", "x ^ -1", "1 - (2 - 3)"] {
                let parsed = parse_expression(scan(*program).tokens).program;
                let reparsed = parse_expression(scan(parsed.to_string()).tokens).program;
                assert_eq!(parsed, reparsed, "{}", program);
            }
        }
    }
}

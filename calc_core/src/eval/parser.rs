//! Recursive-descent formula parser.
//!
//! Grammar (standard precedence, `^` binds tightest and associates right):
//!
//! ```text
//! expr   := term  (('+' | '-') term)*
//! term   := unary (('*' | '/' | '%') unary)*
//! unary  := ('-' | '+') unary | power
//! power  := atom ('^' unary)?
//! atom   := NUMBER | IDENT | IDENT '(' expr (',' expr)* ')' | '(' expr ')'
//! ```
//!
//! `-2^2` therefore parses as `-(2^2)` and `2^3^2` as `2^(3^2)`, matching
//! conventional math notation. Function calls are restricted to the fixed
//! [`Func`] table; there is no way to reach anything but arithmetic from a
//! formula, which keeps the trust boundary small.

use crate::errors::{CalcError, CalcResult};
use crate::eval::token::{Spanned, Token};

/// Parsed formula AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Func,
        args: Vec<Expr>,
    },
}

/// Binary operators in precedence order (lowest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Rem => lhs % rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

/// The built-in math function table.
///
/// Mirrors the common-function surface of general math expression
/// libraries, restricted to pure numeric operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sqrt,
    Cbrt,
    Abs,
    Exp,
    Ln,
    Log,
    Log2,
    Log10,
    Pow,
    Min,
    Max,
    Floor,
    Ceil,
    Round,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
}

impl Func {
    /// Look up a function by its formula-text name
    pub fn from_name(name: &str) -> Option<Func> {
        Some(match name {
            "sqrt" => Func::Sqrt,
            "cbrt" => Func::Cbrt,
            "abs" => Func::Abs,
            "exp" => Func::Exp,
            "ln" => Func::Ln,
            "log" => Func::Log,
            "log2" => Func::Log2,
            "log10" => Func::Log10,
            "pow" => Func::Pow,
            "min" => Func::Min,
            "max" => Func::Max,
            "floor" => Func::Floor,
            "ceil" => Func::Ceil,
            "round" => Func::Round,
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "asin" => Func::Asin,
            "acos" => Func::Acos,
            "atan" => Func::Atan,
            "atan2" => Func::Atan2,
            "sinh" => Func::Sinh,
            "cosh" => Func::Cosh,
            "tanh" => Func::Tanh,
            _ => return None,
        })
    }

    /// Accepted argument counts: (min, max)
    pub fn arity(self) -> (usize, usize) {
        match self {
            Func::Pow | Func::Atan2 => (2, 2),
            // log(x) is natural log; log(x, base) is arbitrary base
            Func::Log => (1, 2),
            Func::Min | Func::Max => (1, usize::MAX),
            _ => (1, 1),
        }
    }

    /// Apply to already-evaluated arguments (arity checked at parse time)
    pub fn apply(self, args: &[f64]) -> f64 {
        match self {
            Func::Sqrt => args[0].sqrt(),
            Func::Cbrt => args[0].cbrt(),
            Func::Abs => args[0].abs(),
            Func::Exp => args[0].exp(),
            Func::Ln => args[0].ln(),
            Func::Log => {
                if args.len() == 2 {
                    args[0].log(args[1])
                } else {
                    args[0].ln()
                }
            }
            Func::Log2 => args[0].log2(),
            Func::Log10 => args[0].log10(),
            Func::Pow => args[0].powf(args[1]),
            Func::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
            Func::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Func::Floor => args[0].floor(),
            Func::Ceil => args[0].ceil(),
            Func::Round => args[0].round(),
            Func::Sin => args[0].sin(),
            Func::Cos => args[0].cos(),
            Func::Tan => args[0].tan(),
            Func::Asin => args[0].asin(),
            Func::Acos => args[0].acos(),
            Func::Atan => args[0].atan(),
            Func::Atan2 => args[0].atan2(args[1]),
            Func::Sinh => args[0].sinh(),
            Func::Cosh => args[0].cosh(),
            Func::Tanh => args[0].tanh(),
        }
    }
}

/// Parse a token stream into an AST.
pub fn parse(tokens: &[Spanned], source_len: usize) -> CalcResult<Expr> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        source_len,
    };
    let expr = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(CalcError::formula_parse(
            tok.offset,
            format!("unexpected token {:?}", tok.token),
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    source_len: usize,
}

impl<'a> Parser<'a> {
    // references are tied to the token slice, not the parser borrow
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'a Spanned> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn offset(&self) -> usize {
        self.peek().map(|t| t.offset).unwrap_or(self.source_len)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek().map(|t| &t.token) == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token, what: &str) -> CalcResult<()> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(CalcError::formula_parse(
                self.offset(),
                format!("expected {}", what),
            ))
        }
    }

    fn expr(&mut self) -> CalcResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().map(|t| &t.token) {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> CalcResult<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek().map(|t| &t.token) {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> CalcResult<Expr> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> CalcResult<Expr> {
        let base = self.atom()?;
        if self.eat(&Token::Caret) {
            // right-associative; exponent may carry its own sign
            let exponent = self.unary()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn atom(&mut self) -> CalcResult<Expr> {
        let offset = self.offset();
        let Some(spanned) = self.bump() else {
            return Err(CalcError::formula_parse(offset, "unexpected end of formula"));
        };
        match &spanned.token {
            Token::Number(n) => Ok(Expr::Number(*n)),
            Token::Ident(name) => {
                let name = name.clone();
                if self.eat(&Token::LParen) {
                    self.call(&name, offset)
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            other => Err(CalcError::formula_parse(
                offset,
                format!("unexpected token {:?}", other),
            )),
        }
    }

    fn call(&mut self, name: &str, offset: usize) -> CalcResult<Expr> {
        let Some(func) = Func::from_name(name) else {
            return Err(CalcError::formula_parse(
                offset,
                format!("unknown function '{}'", name),
            ));
        };

        let mut args = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                args.push(self.expr()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(Token::RParen, "')' or ','")?;
                break;
            }
        }

        let (min, max) = func.arity();
        if args.len() < min || args.len() > max {
            return Err(CalcError::formula_parse(
                offset,
                format!("'{}' takes {} argument(s), got {}", name, min, args.len()),
            ));
        }
        Ok(Expr::Call { func, args })
    }
}

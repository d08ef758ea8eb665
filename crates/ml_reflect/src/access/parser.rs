//! Text syntax for navigation lambdas.
//!
//! ```text
//! lambda  := ident "=>" expr | "|" ident [":" type] "|" expr
//! expr    := postfix { binop postfix } [ "=" expr ]
//! postfix := primary { "." ident [ "(" args ")" ] | "[" expr "]" }
//! primary := ident [ "(" args ")" ] | literal | "(" expr ")" | ("!" | "-") postfix
//! ```

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::access::{BinaryOp, Expr, NavExpr};

// -----------------------------------------------------------------------------
// ParseError

/// An error produced while parsing a navigation lambda from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError<'a> {
    /// Position in `path`.
    pub offset: usize,
    /// The text that the error occurred in.
    pub path: &'a str,
    /// The underlying error.
    pub error: Cow<'a, str>,
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encountered an error at offset {} while parsing `{}`: {}",
            self.offset, self.path, self.error,
        )
    }
}

impl core::error::Error for ParseError<'_> {}

// -----------------------------------------------------------------------------
// Parser

const OPERATORS: [(&str, BinaryOp); 13] = [
    ("==", BinaryOp::Eq),
    ("!=", BinaryOp::Ne),
    ("<=", BinaryOp::Le),
    (">=", BinaryOp::Ge),
    ("&&", BinaryOp::And),
    ("||", BinaryOp::Or),
    ("+", BinaryOp::Add),
    ("-", BinaryOp::Sub),
    ("*", BinaryOp::Mul),
    ("/", BinaryOp::Div),
    ("%", BinaryOp::Rem),
    ("<", BinaryOp::Lt),
    (">", BinaryOp::Gt),
];

/// Deepest expression tree the parser builds. Member steps, binary
/// operands, parentheses and unary operators each add a level.
const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

#[inline]
fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

impl<'a> Parser<'a> {
    #[cold]
    fn error(&self, offset: usize, error: impl Into<Cow<'a, str>>) -> ParseError<'a> {
        ParseError {
            offset,
            path: self.text,
            error: error.into(),
        }
    }

    fn enter(&mut self) -> Result<(), ParseError<'a>> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(self.pos, "expression nested too deeply"));
        }
        Ok(())
    }

    #[inline]
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.rest().bytes().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &'static str) -> Result<(), ParseError<'a>> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(self.pos, alloc::format!("expected `{token}`")))
        }
    }

    fn ident(&mut self) -> Result<&'a str, ParseError<'a>> {
        self.skip_whitespace();
        let len = self.rest().bytes().take_while(|&b| is_ident_byte(b)).count();
        if len == 0 {
            return Err(self.error(self.pos, "expected an identifier"));
        }
        let ident = &self.rest()[..len];
        self.pos += len;
        Ok(ident)
    }

    fn lambda(&mut self) -> Result<(&'a str, Expr), ParseError<'a>> {
        let param = if self.eat("|") {
            let param = self.ident()?;
            if self.eat(":") {
                // The annotation is informative only; the root type comes from `T`.
                let len = self.rest().find('|').unwrap_or(self.rest().len());
                self.pos += len;
            }
            self.expect("|")?;
            param
        } else {
            let param = self.ident()?;
            self.expect("=>")?;
            param
        };

        let body = self.expr()?;
        if self.peek().is_some() {
            return Err(self.error(self.pos, "unexpected trailing input"));
        }
        Ok((param, body))
    }

    fn expr(&mut self) -> Result<Expr, ParseError<'a>> {
        self.enter()?;
        let mut expr = self.binary(0)?;
        self.skip_whitespace();
        let rest = self.rest();
        if rest.starts_with('=') && !rest.starts_with("==") && !rest.starts_with("=>") {
            self.pos += 1;
            let value = self.expr()?;
            expr = expr.assign(value);
        }
        self.depth -= 1;
        Ok(expr)
    }

    fn operator(&mut self) -> Option<(&'static str, BinaryOp)> {
        self.skip_whitespace();
        let rest = self.rest();
        OPERATORS
            .iter()
            .copied()
            .find(|(token, _)| rest.starts_with(token))
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Expr, ParseError<'a>> {
        let depth = self.depth;
        let mut lhs = self.postfix()?;
        while let Some((token, op)) = self.operator() {
            if op.precedence() < min_precedence {
                break;
            }
            self.enter()?;
            self.pos += token.len();
            let rhs = self.binary(op.precedence() + 1)?;
            lhs = lhs.binary(op, rhs);
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn args(&mut self) -> Result<Vec<Expr>, ParseError<'a>> {
        let mut args = Vec::new();
        if self.eat(")") {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.eat(")") {
                return Ok(args);
            }
            self.expect(",")?;
        }
    }

    fn postfix(&mut self) -> Result<Expr, ParseError<'a>> {
        let depth = self.depth;
        let mut expr = self.primary()?;
        loop {
            if self.peek().is_some_and(|byte| byte == b'.' || byte == b'[') {
                self.enter()?;
            }
            if self.eat(".") {
                let name = self.ident()?;
                expr = if self.eat("(") {
                    let args = self.args()?;
                    expr.call(name, args)
                } else {
                    expr.member(name)
                };
            } else if self.eat("[") {
                let index = self.expr()?;
                self.expect("]")?;
                expr = expr.index(index);
            } else {
                self.depth = depth;
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError<'a>> {
        let next = self.peek();
        let start = self.pos;
        match next {
            None => Err(self.error(self.pos, "unexpected end of input")),
            Some(b'(') => {
                self.pos += 1;
                let expr = self.expr()?;
                self.expect(")")?;
                Ok(expr)
            }
            Some(b'"') => self.string(),
            Some(b'-') if self.rest()[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                self.pos += 1;
                self.number(start, true)
            }
            Some(b'!' | b'-') => {
                self.pos += 1;
                self.enter()?;
                self.postfix()?;
                self.depth -= 1;
                Ok(Expr::opaque(self.text[start..self.pos].trim()))
            }
            Some(byte) if byte.is_ascii_digit() => self.number(start, false),
            Some(byte) if is_ident_byte(byte) => {
                let ident = self.ident()?;
                match ident {
                    "true" => Ok(Expr::bool(true)),
                    "false" => Ok(Expr::bool(false)),
                    _ if self.eat("(") => {
                        self.args()?;
                        Ok(Expr::opaque(self.text[start..self.pos].trim()))
                    }
                    _ => Ok(Expr::param(ident)),
                }
            }
            Some(_) => Err(self.error(self.pos, "unexpected character")),
        }
    }

    fn number(&mut self, start: usize, negative: bool) -> Result<Expr, ParseError<'a>> {
        let digits = |s: &str| s.bytes().take_while(u8::is_ascii_digit).count();

        let digits_start = self.pos;
        self.pos += digits(self.rest());
        let rest = self.rest();
        let is_float = rest.starts_with('.') && rest[1..].starts_with(|c: char| c.is_ascii_digit());
        if is_float {
            self.pos += 1;
            self.pos += digits(self.rest());
        }

        let text = &self.text[digits_start..self.pos];
        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| self.error(start, "invalid float literal"))?;
            Ok(Expr::float(if negative { -value } else { value }))
        } else {
            let value: i128 = text
                .parse()
                .map_err(|_| self.error(start, "integer literal out of range"))?;
            Ok(Expr::int(if negative { -value } else { value }))
        }
    }

    fn string(&mut self) -> Result<Expr, ParseError<'a>> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((index, ch)) = chars.next() {
            match ch {
                '"' => {
                    self.pos += index + 1;
                    return Ok(Expr::str(value));
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, escaped @ ('"' | '\\'))) => value.push(escaped),
                    _ => return Err(self.error(start + 1 + index, "invalid escape")),
                },
                _ => value.push(ch),
            }
        }
        Err(self.error(start, "unterminated string literal"))
    }
}

impl<T, V> NavExpr<T, V> {
    /// Parses a navigation lambda from text.
    ///
    /// Both `c => c.address.city` and `|c| c.address.city` are accepted; a
    /// type annotation `|c: Customer|` is allowed and ignored. The body may
    /// contain any expression of the grammar; whether it is a usable member
    /// chain is decided later by [`resolve`](crate::access::resolve).
    ///
    /// ```
    /// use ml_reflect::access::{Expr, NavExpr};
    ///
    /// let expr = NavExpr::<(), ()>::parse("|c| c.address.city").unwrap();
    /// assert_eq!(expr.param(), "c");
    /// assert_eq!(expr.body(), &Expr::param("c").member("address").member("city"));
    ///
    /// let error = NavExpr::<(), ()>::parse("c => c.").unwrap_err();
    /// assert_eq!(error.offset, 7);
    /// ```
    pub fn parse<'a>(text: &'a str) -> Result<Self, ParseError<'a>> {
        let mut parser = Parser {
            text,
            pos: 0,
            depth: 0,
        };
        let (param, body) = parser.lambda()?;
        Ok(NavExpr::new(param, body))
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use crate::access::{BinaryOp, Expr, NavExpr};

    type Nav = NavExpr<(), ()>;

    #[test]
    fn arrow_and_closure_forms() {
        let arrow = Nav::parse("c => c.address.city").unwrap();
        let closure = Nav::parse("|c: Customer| c.address.city").unwrap();
        assert_eq!(arrow, closure);
        assert_eq!(arrow.to_string(), "c => c.address.city");
    }

    #[test]
    fn method_calls_and_indexing() {
        let expr = Nav::parse("c => c.orders[1].total()").unwrap();
        let expected = Expr::param("c")
            .member("orders")
            .index(Expr::int(1))
            .call("total", Vec::new());
        assert_eq!(expr.body(), &expected);
    }

    #[test]
    fn binary_precedence() {
        let expr = Nav::parse("c => c.a + c.b * 2").unwrap();
        let a = Expr::param("c").member("a");
        let b = Expr::param("c").member("b");
        let expected = a.binary(BinaryOp::Add, b.binary(BinaryOp::Mul, Expr::int(2)));
        assert_eq!(expr.body(), &expected);
    }

    #[test]
    fn literals_and_unary() {
        let expr = Nav::parse(r#"x => f(x, "a\"b", -2.5)"#).unwrap();
        assert_eq!(expr.body(), &Expr::opaque(r#"f(x, "a\"b", -2.5)"#));

        let expr = Nav::parse("x => !x.flag").unwrap();
        assert_eq!(expr.body(), &Expr::opaque("!x.flag"));

        let expr = Nav::parse("x => x.n == -3").unwrap();
        let expected = Expr::param("x").member("n").binary(BinaryOp::Eq, Expr::int(-3));
        assert_eq!(expr.body(), &expected);
    }

    #[test]
    fn assignment() {
        let expr = Nav::parse("c => c.name = \"x\"").unwrap();
        let expected = Expr::param("c").member("name").assign(Expr::str("x"));
        assert_eq!(expr.body(), &expected);
    }

    #[test]
    fn errors_carry_offsets() {
        let error = Nav::parse("c => c.name extra").unwrap_err();
        assert_eq!(error.offset, 12);
        assert_eq!(error.error, "unexpected trailing input");

        let error = Nav::parse("c -> c.name").unwrap_err();
        assert_eq!(error.offset, 2);

        let error = Nav::parse("c => \"open").unwrap_err();
        assert_eq!(error.offset, 5);
        assert_eq!(error.error, "unterminated string literal");
    }

    #[test]
    fn deep_nesting_is_an_error() {
        for text in [
            format!("c => {}", "(".repeat(10_000)),
            format!("c => {}c.w{}", "(".repeat(3_000), ")".repeat(3_000)),
            format!("c => c{}", ".a".repeat(50_000)),
            format!("c => {}c", "!".repeat(10_000)),
            format!("c => c{}", " + c".repeat(10_000)),
            format!("c => c{}", "[0]".repeat(10_000)),
        ] {
            let error = Nav::parse(&text).unwrap_err();
            assert_eq!(error.error, "expression nested too deeply");
        }
    }

    #[test]
    fn long_chains_within_the_limit_parse() {
        let text = format!("c => (((c{})))", ".a".repeat(200));
        let expr = Nav::parse(&text).unwrap();
        let expected = (0..200).fold(Expr::param("c"), |expr, _| expr.member("a"));
        assert_eq!(expr.body(), &expected);
    }
}

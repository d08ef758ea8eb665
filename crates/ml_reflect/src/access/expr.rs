use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

// -----------------------------------------------------------------------------
// Expr

/// A small expression tree.
///
/// It represents the body of a navigation lambda. Besides member chains it
/// can also hold the shapes an accessor must refuse (calls, indexing,
/// computations), so that refusing them is a decision of the resolver and
/// not of whoever built the tree.
///
/// ```
/// use ml_reflect::access::Expr;
///
/// let expr = Expr::param("c").member("address").member("city");
/// assert_eq!(expr.to_string(), "c.address.city");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A variable: the lambda parameter or a free variable.
    Parameter(String),
    /// `target.name`
    Member { target: Box<Expr>, name: String },
    /// `receiver.method(args..)`
    Call {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    /// `target[index]`
    Index { target: Box<Expr>, index: Box<Expr> },
    Literal(Literal),
    /// `lhs op rhs`
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `target = value`
    Assign { target: Box<Expr>, value: Box<Expr> },
    /// Anything else, kept as source text.
    Opaque(String),
}

/// A literal constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i128),
    Float(f64),
    Str(String),
}

/// The operator of [`Expr::Binary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    /// The operator as written in source.
    pub const fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Binding strength, higher binds tighter.
    pub(crate) const fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => 3,
            BinaryOp::Add | BinaryOp::Sub => 4,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 5,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// Builders

impl Expr {
    #[inline]
    pub fn param(name: impl Into<String>) -> Self {
        Expr::Parameter(name.into())
    }

    #[inline]
    pub fn member(self, name: impl Into<String>) -> Self {
        Expr::Member {
            target: Box::new(self),
            name: name.into(),
        }
    }

    #[inline]
    pub fn call(self, method: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Call {
            receiver: Box::new(self),
            method: method.into(),
            args: args.into_iter().collect(),
        }
    }

    #[inline]
    pub fn index(self, index: Expr) -> Self {
        Expr::Index {
            target: Box::new(self),
            index: Box::new(index),
        }
    }

    #[inline]
    pub fn binary(self, op: BinaryOp, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    #[inline]
    pub fn assign(self, value: Expr) -> Self {
        Expr::Assign {
            target: Box::new(self),
            value: Box::new(value),
        }
    }

    #[inline]
    pub fn int(value: i128) -> Self {
        Expr::Literal(Literal::Int(value))
    }

    #[inline]
    pub fn float(value: f64) -> Self {
        Expr::Literal(Literal::Float(value))
    }

    #[inline]
    pub fn bool(value: bool) -> Self {
        Expr::Literal(Literal::Bool(value))
    }

    #[inline]
    pub fn str(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Str(value.into()))
    }

    #[inline]
    pub fn opaque(text: impl Into<String>) -> Self {
        Expr::Opaque(text.into())
    }
}

// -----------------------------------------------------------------------------
// Display

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(value) => write!(f, "{value}"),
            Literal::Int(value) => write!(f, "{value}"),
            Literal::Float(value) => write!(f, "{value:?}"),
            Literal::Str(value) => write!(f, "{value:?}"),
        }
    }
}

impl Expr {
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent: BinaryOp) -> fmt::Result {
        match self {
            Expr::Binary { op, .. } if op.precedence() <= parent.precedence() => {
                write!(f, "({self})")
            }
            Expr::Assign { .. } => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Parameter(name) => f.write_str(name),
            Expr::Member { target, name } => write!(f, "{target}.{name}"),
            Expr::Call {
                receiver,
                method,
                args,
            } => {
                write!(f, "{receiver}.{method}(")?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Index { target, index } => write!(f, "{target}[{index}]"),
            Expr::Literal(literal) => write!(f, "{literal}"),
            Expr::Binary { op, lhs, rhs } => {
                lhs.fmt_operand(f, *op)?;
                write!(f, " {op} ")?;
                rhs.fmt_operand(f, *op)
            }
            Expr::Assign { target, value } => write!(f, "{target} = {value}"),
            Expr::Opaque(text) => f.write_str(text),
        }
    }
}

// -----------------------------------------------------------------------------
// NavExpr

/// A single-parameter lambda `param => body` navigating from a `T` to a `V`.
///
/// The input of [`resolve`](crate::access::resolve) and
/// [`Accessor::from_expression`](crate::access::Accessor::from_expression).
/// It can be built from parts, parsed with [`NavExpr::parse`], or written
/// with the `nav!` macro.
///
/// ```
/// use ml_reflect::access::{Expr, NavExpr};
///
/// let expr = NavExpr::<(), u32>::new("c", Expr::param("c").member("id"));
/// assert_eq!(expr.to_string(), "c => c.id");
/// ```
pub struct NavExpr<T, V> {
    param: String,
    body: Expr,
    _marker: PhantomData<fn(&T) -> V>,
}

impl<T, V> NavExpr<T, V> {
    /// Creates the lambda `param => body`.
    #[inline]
    pub fn new(param: impl Into<String>, body: Expr) -> Self {
        Self {
            param: param.into(),
            body,
            _marker: PhantomData,
        }
    }

    /// The name of the lambda parameter.
    #[inline]
    pub fn param(&self) -> &str {
        &self.param
    }

    #[inline]
    pub fn body(&self) -> &Expr {
        &self.body
    }

    #[inline]
    pub fn into_parts(self) -> (String, Expr) {
        (self.param, self.body)
    }
}

impl<T, V> Clone for NavExpr<T, V> {
    fn clone(&self) -> Self {
        Self {
            param: self.param.clone(),
            body: self.body.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, V> PartialEq for NavExpr<T, V> {
    fn eq(&self, other: &Self) -> bool {
        self.param == other.param && self.body == other.body
    }
}

impl<T, V> fmt::Debug for NavExpr<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavExpr")
            .field("param", &self.param)
            .field("body", &self.body)
            .finish()
    }
}

impl<T, V> fmt::Display for NavExpr<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.param, self.body)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{BinaryOp, Expr};

    #[test]
    fn display_keeps_precedence() {
        let a = Expr::param("a");
        let b = Expr::param("b");
        let c = Expr::param("c");

        let sum_then_mul = a.clone().binary(BinaryOp::Add, b.clone()).binary(BinaryOp::Mul, c.clone());
        assert_eq!(sum_then_mul.to_string(), "(a + b) * c");

        let mul_then_sum = a.binary(BinaryOp::Mul, b).binary(BinaryOp::Add, c);
        assert_eq!(mul_then_sum.to_string(), "a * b + c");
    }

    #[test]
    fn display_calls_and_indexing() {
        let expr = Expr::param("c")
            .member("orders")
            .index(Expr::int(0))
            .call("total", [Expr::str("eur"), Expr::bool(true)]);
        assert_eq!(expr.to_string(), "c.orders[0].total(\"eur\", true)");
    }
}

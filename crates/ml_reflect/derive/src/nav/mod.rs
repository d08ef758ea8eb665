//! `nav!`: turns a closure into a `NavExpr` tree.
//!
//! Only the closure's shape is captured; nothing is type checked here.
//! Whether the body is a valid member chain is decided at resolution.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::spanned::Spanned;
use syn::{BinOp, Expr, ExprClosure, Lit, Member, Pat, ReturnType, Stmt, UnOp};

use crate::path::{binary_op_, expr_, nav_expr_};

pub(crate) fn impl_nav(closure: &ExprClosure) -> syn::Result<TokenStream> {
    let ml_reflect_path = crate::path::ml_reflect();

    let mut inputs = closure.inputs.iter();
    let (Some(input), None) = (inputs.next(), inputs.next()) else {
        return Err(syn::Error::new(
            closure.inputs.span(),
            "a navigation closure takes exactly one parameter",
        ));
    };

    let (param, root_ty) = match input {
        Pat::Ident(pat) => (&pat.ident, quote! { _ }),
        Pat::Type(pat) => match &*pat.pat {
            Pat::Ident(ident) => (&ident.ident, pat.ty.to_token_stream()),
            other => return Err(syn::Error::new(other.span(), "expected a parameter name")),
        },
        other => return Err(syn::Error::new(other.span(), "expected a parameter name")),
    };

    let value_ty = match &closure.output {
        ReturnType::Default => quote! { _ },
        ReturnType::Type(_, ty) => ty.to_token_stream(),
    };

    let converter = Converter {
        expr_: expr_(&ml_reflect_path),
        binary_op_: binary_op_(&ml_reflect_path),
    };
    let body = converter.convert(strip_block(&closure.body));
    let param = param.to_string();
    let nav_expr_ = nav_expr_(&ml_reflect_path);

    Ok(quote! {
        #nav_expr_::<#root_ty, #value_ty>::new(#param, #body)
    })
}

/// `{ expr }` with a single trailing expression is the expression itself.
fn strip_block(expr: &Expr) -> &Expr {
    match expr {
        Expr::Block(block) if block.label.is_none() => match block.block.stmts.as_slice() {
            [Stmt::Expr(inner, None)] => strip_block(inner),
            _ => expr,
        },
        Expr::Paren(paren) => strip_block(&paren.expr),
        Expr::Group(group) => strip_block(&group.expr),
        _ => expr,
    }
}

struct Converter {
    expr_: TokenStream,
    binary_op_: TokenStream,
}

impl Converter {
    fn convert(&self, expr: &Expr) -> TokenStream {
        let expr_ = &self.expr_;
        match expr {
            Expr::Path(path) if path.qself.is_none() && path.path.get_ident().is_some() => {
                let name = path.path.to_token_stream().to_string();
                quote! { #expr_::param(#name) }
            }
            Expr::Field(field) => {
                let base = self.convert(&field.base);
                let name = match &field.member {
                    Member::Named(ident) => ident.to_string(),
                    Member::Unnamed(index) => index.index.to_string(),
                };
                quote! { #base.member(#name) }
            }
            Expr::MethodCall(call) => {
                let receiver = self.convert(&call.receiver);
                let method = call.method.to_string();
                let args = if call.args.is_empty() {
                    quote! { ::core::iter::empty::<#expr_>() }
                } else {
                    let args = call.args.iter().map(|arg| self.convert(arg));
                    quote! { [#(#args),*] }
                };
                quote! { #receiver.call(#method, #args) }
            }
            Expr::Index(index) => {
                let target = self.convert(&index.expr);
                let index = self.convert(&index.index);
                quote! { #target.index(#index) }
            }
            Expr::Binary(binary) => match self.binary_op(&binary.op) {
                Some(op) => {
                    let lhs = self.convert(&binary.left);
                    let rhs = self.convert(&binary.right);
                    quote! { #lhs.binary(#op, #rhs) }
                }
                None => self.opaque(expr),
            },
            Expr::Assign(assign) => {
                let target = self.convert(&assign.left);
                let value = self.convert(&assign.right);
                quote! { #target.assign(#value) }
            }
            Expr::Lit(lit) => self
                .literal(&lit.lit, false)
                .unwrap_or_else(|| self.opaque(expr)),
            Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match &*unary.expr {
                Expr::Lit(lit) => self
                    .literal(&lit.lit, true)
                    .unwrap_or_else(|| self.opaque(expr)),
                _ => self.opaque(expr),
            },
            Expr::Paren(_) | Expr::Group(_) | Expr::Block(_) => {
                let inner = strip_block(expr);
                if core::ptr::eq(inner, expr) {
                    self.opaque(expr)
                } else {
                    self.convert(inner)
                }
            }
            _ => self.opaque(expr),
        }
    }

    /// Numbers may be `negated`; other literals may not.
    fn literal(&self, lit: &Lit, negated: bool) -> Option<TokenStream> {
        let expr_ = &self.expr_;
        Some(match lit {
            Lit::Int(int) => {
                let value: i128 = int.base10_parse().ok()?;
                let value = if negated { value.checked_neg()? } else { value };
                quote! { #expr_::int(#value) }
            }
            Lit::Float(float) => {
                let value: f64 = float.base10_parse().ok()?;
                let value = if negated { -value } else { value };
                quote! { #expr_::float(#value) }
            }
            Lit::Bool(flag) if !negated => {
                let value = flag.value;
                quote! { #expr_::bool(#value) }
            }
            Lit::Str(text) if !negated => {
                let value = text.value();
                quote! { #expr_::str(#value) }
            }
            _ => return None,
        })
    }

    fn binary_op(&self, op: &BinOp) -> Option<TokenStream> {
        let variant = match op {
            BinOp::Add(_) => quote! { Add },
            BinOp::Sub(_) => quote! { Sub },
            BinOp::Mul(_) => quote! { Mul },
            BinOp::Div(_) => quote! { Div },
            BinOp::Rem(_) => quote! { Rem },
            BinOp::Eq(_) => quote! { Eq },
            BinOp::Ne(_) => quote! { Ne },
            BinOp::Lt(_) => quote! { Lt },
            BinOp::Le(_) => quote! { Le },
            BinOp::Gt(_) => quote! { Gt },
            BinOp::Ge(_) => quote! { Ge },
            BinOp::And(_) => quote! { And },
            BinOp::Or(_) => quote! { Or },
            _ => return None,
        };
        let binary_op_ = &self.binary_op_;
        Some(quote! { #binary_op_::#variant })
    }

    /// Anything else is kept as source text.
    fn opaque(&self, expr: &Expr) -> TokenStream {
        let expr_ = &self.expr_;
        let text = expr.to_token_stream().to_string();
        quote! { #expr_::opaque(#text) }
    }
}

#[cfg(test)]
mod tests {
    use super::impl_nav;

    fn expand(input: &str) -> String {
        let closure: syn::ExprClosure = syn::parse_str(input).unwrap();
        impl_nav(&closure).unwrap().to_string().replace(' ', "")
    }

    #[test]
    fn member_chain() {
        let out = expand("|c: Customer| -> String { c.address.city }");
        assert!(out.contains("NavExpr::<Customer,String>::new(\"c\""));
        assert!(out.contains("Expr::param(\"c\").member(\"address\").member(\"city\")"));
    }

    #[test]
    fn untyped_parameter() {
        let out = expand("|c| c.id");
        assert!(out.contains("NavExpr::<_,_>::new(\"c\""));
    }

    #[test]
    fn calls_and_operators() {
        let out = expand("|c: Customer| c.name.len() + 1");
        assert!(out.contains(".call(\"len\","));
        assert!(out.contains("BinaryOp::Add"));
        assert!(out.contains("Expr::int(1i128)"));
    }

    #[test]
    fn negative_numbers() {
        let out = expand("|c: Customer| c.balance > -5");
        assert!(out.contains("Expr::int(-5i128)"));
    }

    #[test]
    fn unsupported_syntax_is_opaque() {
        let out = expand("|c: Customer| !c.active");
        assert!(out.contains("Expr::opaque("));
    }

    #[test]
    fn rejects_two_parameters() {
        let closure: syn::ExprClosure = syn::parse_str("|a, b| a.x").unwrap();
        assert!(impl_nav(&closure).is_err());
    }
}

//! Parenthesized-prefix AST pretty printer, e.g. `(+ 1 2)`, `(group (+ 1 2))`,
//! `(= x 3)`.
//!
//! A debugging collaborator whose only contract is the AST shape, used by the `parse`
//! subcommand to render a parsed expression. Deliberately a separate visitor from the
//! interpreter's own `stringify` — number literals print as `N.0` here even when
//! integral, matching the scanner's own `tokenize` rendering rather than `print`'s.

use crate::ast::{Expr, ExprKind, Literal};

/// Renders `expr` as a fully-parenthesized prefix expression.
#[must_use]
pub fn print(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Literal(literal) => print_literal(literal),
        ExprKind::Grouping(inner) => parenthesize("group", &[inner]),
        ExprKind::Unary { op, right } => parenthesize(&op.lexeme, &[right]),
        ExprKind::Binary { left, op, right } | ExprKind::Logical { left, op, right } => {
            parenthesize(&op.lexeme, &[left, right])
        }
        ExprKind::Variable { name } => name.lexeme.clone(),
        ExprKind::Assign { name, value } => parenthesize(&format!("= {}", name.lexeme), &[value]),
        ExprKind::Call { callee, args, .. } => {
            let mut parts = vec![print(callee)];
            parts.extend(args.iter().map(print));
            format!("(call {})", parts.join(" "))
        }
        ExprKind::Get { object, name } => format!("(. {} {})", print(object), name.lexeme),
        ExprKind::Set { object, name, value } => {
            format!("(= (. {} {}) {})", print(object), name.lexeme, print(value))
        }
        ExprKind::This { .. } => "this".to_owned(),
        ExprKind::Super { method, .. } => format!("(super {})", method.lexeme),
    }
}

fn print_literal(literal: &Literal) -> String {
    match literal {
        Literal::Number(n) => crate::numeric::format_tokenize(*n),
        Literal::String(s) => s.to_string(),
        Literal::Bool(b) => b.to_string(),
        Literal::Nil => "nil".to_owned(),
    }
}

fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
    let mut parts = vec![name.to_owned()];
    parts.extend(exprs.iter().map(|e| print(e)));
    format!("({})", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::Literal as AstLiteral, token::Token, token::TokenKind};

    fn op(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, None, 1)
    }

    #[test]
    fn prints_binary_expression() {
        let expr = Expr::binary(
            Expr::literal(AstLiteral::Number(1.0)),
            op(TokenKind::Plus, "+"),
            Expr::literal(AstLiteral::Number(2.0)),
        );
        assert_eq!(print(&expr), "(+ 1.0 2.0)");
    }

    #[test]
    fn prints_grouping() {
        let inner = Expr::binary(
            Expr::literal(AstLiteral::Number(1.0)),
            op(TokenKind::Plus, "+"),
            Expr::literal(AstLiteral::Number(2.0)),
        );
        let expr = Expr::grouping(inner);
        assert_eq!(print(&expr), "(group (+ 1.0 2.0))");
    }

    #[test]
    fn prints_assignment() {
        let expr = Expr::assign(op(TokenKind::Identifier, "x"), Expr::literal(AstLiteral::Number(3.0)));
        assert_eq!(print(&expr), "(= x 3.0)");
    }

    #[test]
    fn integral_numbers_keep_trailing_zero() {
        let expr = Expr::literal(AstLiteral::Number(10.0));
        assert_eq!(print(&expr), "10.0");
    }
}

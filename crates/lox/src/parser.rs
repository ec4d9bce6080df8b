//! Recursive-descent parser: token stream → statement list.
//!
//! Single pass, no backtracking. Precedence climbs through a chain of methods from
//! `assignment` (lowest) down to `primary` (highest), one method per grammar
//! production.

use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDecl, Literal, Stmt},
    error::{ParseError, ParseErrorLocation},
    token::{Token, TokenKind},
};

const MAX_ARGS: usize = 255;

/// Parses a full program (a sequence of declarations terminated by EOF) for the `run`
/// subcommand. Errors are accumulated; a non-empty error vec means the returned
/// statement list must not be evaluated.
pub fn parse(tokens: Vec<Token>) -> (Vec<Stmt>, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let mut statements = Vec::new();
    while !parser.is_at_end() {
        match parser.declaration() {
            Ok(stmt) => statements.push(stmt),
            Err(_) => parser.synchronize(),
        }
    }
    (statements, parser.errors)
}

/// Parses a single expression for the `parse`/`evaluate` subcommands.
pub fn parse_expression(tokens: Vec<Token>) -> (Option<Expr>, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    match parser.expression() {
        Ok(expr) => (Some(expr), parser.errors),
        Err(_) => (None, parser.errors),
    }
}

/// Marker error: a parse failure has already been recorded in `Parser::errors`.
/// Parsing functions that fail return this so callers can synchronize; the message
/// itself lives in the accumulated error list, not in this type.
struct ParseFailure;

type PResult<T> = Result<T, ParseFailure>;

struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0, errors: Vec::new() }
    }

    // --- declarations ---

    fn declaration(&mut self) -> PResult<Stmt> {
        if self.match_token(&[TokenKind::Class]) {
            return self.class_declaration();
        }
        if self.match_token(&[TokenKind::Fun]) {
            return self.function_declaration("function");
        }
        if self.match_token(&[TokenKind::Var]) {
            return self.var_declaration();
        }
        self.statement()
    }

    fn class_declaration(&mut self) -> PResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect class name.")?.clone();

        let superclass = if self.match_token(&[TokenKind::Less]) {
            let super_name = self.consume(TokenKind::Identifier, "Expect superclass name.")?.clone();
            Some(Expr::variable(super_name))
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            methods.push(Rc::new(self.function("method")?));
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class { name, superclass, methods })
    }

    fn function_declaration(&mut self, kind: &str) -> PResult<Stmt> {
        Ok(Stmt::Function(Rc::new(self.function(kind)?)))
    }

    fn function(&mut self, kind: &str) -> PResult<FunctionDecl> {
        let name = self.consume(TokenKind::Identifier, &format!("Expect {kind} name.")).cloned()?;
        self.consume(TokenKind::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_ARGS {
                    self.error_at_current("Can't have more than 255 parameters.");
                }
                params.push(self.consume(TokenKind::Identifier, "Expect parameter name.")?.clone());
                if !self.match_token(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;

        self.consume(TokenKind::LeftBrace, &format!("Expect '{{' before {kind} body."))?;
        let body = self.block()?;

        Ok(FunctionDecl { name, params, body })
    }

    fn var_declaration(&mut self) -> PResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?.clone();

        let initializer = if self.match_token(&[TokenKind::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var { name, initializer })
    }

    // --- statements ---

    fn statement(&mut self) -> PResult<Stmt> {
        if self.match_token(&[TokenKind::Print]) {
            return self.print_statement();
        }
        if self.match_token(&[TokenKind::Return]) {
            return self.return_statement();
        }
        if self.match_token(&[TokenKind::While]) {
            return self.while_statement();
        }
        if self.match_token(&[TokenKind::For]) {
            return self.for_statement();
        }
        if self.match_token(&[TokenKind::If]) {
            return self.if_statement();
        }
        if self.match_token(&[TokenKind::LeftBrace]) {
            return Ok(Stmt::Block(self.block()?));
        }
        self.expression_statement()
    }

    fn print_statement(&mut self) -> PResult<Stmt> {
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(value))
    }

    fn return_statement(&mut self) -> PResult<Stmt> {
        let keyword = self.previous().clone();
        let value = if self.check(TokenKind::Semicolon) { None } else { Some(self.expression()?) };
        self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn while_statement(&mut self) -> PResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body })
    }

    /// Desugars `for (init; cond; incr) body` into a `while` loop wrapped in an outer
    /// block; there is no dedicated `Stmt::For` variant.
    fn for_statement(&mut self) -> PResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.match_token(&[TokenKind::Semicolon]) {
            None
        } else if self.match_token(&[TokenKind::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition = condition.unwrap_or_else(|| Expr::literal(Literal::Bool(true)));
        body = Stmt::While { condition, body: Box::new(body) };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> PResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_token(&[TokenKind::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    fn block(&mut self) -> PResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => {
                    self.synchronize();
                }
            }
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> PResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    // --- expressions, lowest to highest precedence ---

    fn expression(&mut self) -> PResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> PResult<Expr> {
        let expr = self.or()?;

        if self.match_token(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr.kind {
                crate::ast::ExprKind::Variable { name } => Ok(Expr::assign(name, value)),
                crate::ast::ExprKind::Get { object, name } => Ok(Expr::set(*object, name, value)),
                _ => {
                    self.error_at(&equals, "Invalid assignment target.");
                    Err(ParseFailure)
                }
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> PResult<Expr> {
        let mut expr = self.and()?;
        while self.match_token(&[TokenKind::Or]) {
            let op = self.previous().clone();
            let right = self.and()?;
            expr = Expr::logical(expr, op, right);
        }
        Ok(expr)
    }

    fn and(&mut self) -> PResult<Expr> {
        let mut expr = self.equality()?;
        while self.match_token(&[TokenKind::And]) {
            let op = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::logical(expr, op, right);
        }
        Ok(expr)
    }

    fn equality(&mut self) -> PResult<Expr> {
        let mut expr = self.comparison()?;
        while self.match_token(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let op = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::binary(expr, op, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> PResult<Expr> {
        let mut expr = self.term()?;
        while self.match_token(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let op = self.previous().clone();
            let right = self.term()?;
            expr = Expr::binary(expr, op, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> PResult<Expr> {
        let mut expr = self.factor()?;
        while self.match_token(&[TokenKind::Minus, TokenKind::Plus]) {
            let op = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::binary(expr, op, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> PResult<Expr> {
        let mut expr = self.unary()?;
        while self.match_token(&[TokenKind::Slash, TokenKind::Star]) {
            let op = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::binary(expr, op, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> PResult<Expr> {
        if self.match_token(&[TokenKind::Bang, TokenKind::Minus]) {
            let op = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::unary(op, right));
        }
        self.call()
    }

    fn call(&mut self) -> PResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.match_token(&[TokenKind::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else if self.match_token(&[TokenKind::Dot]) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'.")?.clone();
                expr = Expr::get(expr, name);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> PResult<Expr> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if args.len() >= MAX_ARGS {
                    self.error_at_current("Can't have more than 255 arguments.");
                }
                args.push(self.expression()?);
                if !self.match_token(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?.clone();
        Ok(Expr::call(callee, paren, args))
    }

    fn primary(&mut self) -> PResult<Expr> {
        if self.match_token(&[TokenKind::False]) {
            return Ok(Expr::literal(Literal::Bool(false)));
        }
        if self.match_token(&[TokenKind::True]) {
            return Ok(Expr::literal(Literal::Bool(true)));
        }
        if self.match_token(&[TokenKind::Nil]) {
            return Ok(Expr::literal(Literal::Nil));
        }
        if self.match_token(&[TokenKind::Number]) {
            let value = match &self.previous().literal {
                Some(crate::token::Literal::Number(n)) => *n,
                _ => unreachable!("NUMBER token always carries a numeric literal"),
            };
            return Ok(Expr::literal(Literal::Number(value)));
        }
        if self.match_token(&[TokenKind::String]) {
            let value = match &self.previous().literal {
                Some(crate::token::Literal::String(s)) => Rc::from(s.as_str()),
                _ => unreachable!("STRING token always carries a string literal"),
            };
            return Ok(Expr::literal(Literal::String(value)));
        }
        if self.match_token(&[TokenKind::This]) {
            return Ok(Expr::this(self.previous().clone()));
        }
        if self.match_token(&[TokenKind::Super]) {
            let keyword = self.previous().clone();
            self.consume(TokenKind::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(TokenKind::Identifier, "Expect superclass method name.")?.clone();
            return Ok(Expr::super_(keyword, method));
        }
        if self.match_token(&[TokenKind::Identifier]) {
            return Ok(Expr::variable(self.previous().clone()));
        }
        if self.match_token(&[TokenKind::LeftParen]) {
            let expr = self.expression()?;
            self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::grouping(expr));
        }

        self.error_at_current("Expect expression.");
        Err(ParseFailure)
    }

    // --- token stream primitives ---

    fn match_token(&mut self, kinds: &[TokenKind]) -> bool {
        for kind in kinds {
            if self.check(*kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> PResult<&Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        self.error_at_current(message);
        Err(ParseFailure)
    }

    fn error_at_current(&mut self, message: &str) {
        let token = self.peek().clone();
        self.error_at(&token, message);
    }

    fn error_at(&mut self, token: &Token, message: &str) {
        let where_ = if token.kind == TokenKind::Eof {
            ParseErrorLocation::End
        } else {
            ParseErrorLocation::Token(token.lexeme.clone())
        };
        self.errors.push(ParseError { line: token.line, where_, message: message.to_owned() });
    }

    /// Discards tokens until after a statement boundary (`;`) or just before a token
    /// that starts a new declaration/statement, so parsing can resume and report
    /// further errors in the same run.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {}
            }

            self.advance();
        }
    }
}

/// Helper trait so `consume(..)?.clone()` reads naturally without an intermediate
/// binding at every call site.
trait ConsumeExt {
    fn cloned(self) -> PResult<Token>;
}

impl ConsumeExt for PResult<&Token> {
    fn cloned(self) -> PResult<Token> {
        self.map(Clone::clone)
    }
}

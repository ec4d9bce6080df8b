//! Tagged-variant AST node types shared by the parser, resolver, interpreter, and
//! printer.
//!
//! Every expression node carries a unique [`NodeId`], assigned at construction, so the
//! resolver can key its side-table by node identity in O(1) rather than by pointer
//! identity.

use std::{
    cell::Cell,
    rc::Rc,
};

use crate::token::Token;

/// Unique identifier for an expression node, used to key the resolver's depth table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

thread_local! {
    static NEXT_ID: Cell<u32> = const { Cell::new(0) };
}

impl NodeId {
    fn next() -> Self {
        NEXT_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            Self(id)
        })
    }
}

/// An expression AST node.
///
/// `id` is assigned once at construction and never changes; it is the key the
/// resolver's side-table uses to record lexical depth for variable/assignment/this/
/// super occurrences.
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    Grouping(Box<Expr>),
    Unary { op: Token, right: Box<Expr> },
    Binary { left: Box<Expr>, op: Token, right: Box<Expr> },
    Logical { left: Box<Expr>, op: Token, right: Box<Expr> },
    Variable { name: Token },
    Assign { name: Token, value: Box<Expr> },
    Call { callee: Box<Expr>, paren: Token, args: Vec<Expr> },
    Get { object: Box<Expr>, name: Token },
    Set { object: Box<Expr>, name: Token, value: Box<Expr> },
    This { keyword: Token },
    Super { keyword: Token, method: Token },
}

/// A literal value embedded directly in the AST (distinct from `token::Literal`,
/// which is only what the scanner can produce; this adds `Bool`/`Nil` for the parser's
/// `true`/`false`/`nil` primaries).
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(Rc<str>),
    Bool(bool),
    Nil,
}

impl Expr {
    fn new(kind: ExprKind) -> Self {
        Self { id: NodeId::next(), kind }
    }

    #[must_use]
    pub fn literal(value: Literal) -> Self {
        Self::new(ExprKind::Literal(value))
    }

    #[must_use]
    pub fn grouping(inner: Expr) -> Self {
        Self::new(ExprKind::Grouping(Box::new(inner)))
    }

    #[must_use]
    pub fn unary(op: Token, right: Expr) -> Self {
        Self::new(ExprKind::Unary { op, right: Box::new(right) })
    }

    #[must_use]
    pub fn binary(left: Expr, op: Token, right: Expr) -> Self {
        Self::new(ExprKind::Binary { left: Box::new(left), op, right: Box::new(right) })
    }

    #[must_use]
    pub fn logical(left: Expr, op: Token, right: Expr) -> Self {
        Self::new(ExprKind::Logical { left: Box::new(left), op, right: Box::new(right) })
    }

    #[must_use]
    pub fn variable(name: Token) -> Self {
        Self::new(ExprKind::Variable { name })
    }

    #[must_use]
    pub fn assign(name: Token, value: Expr) -> Self {
        Self::new(ExprKind::Assign { name, value: Box::new(value) })
    }

    #[must_use]
    pub fn call(callee: Expr, paren: Token, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call { callee: Box::new(callee), paren, args })
    }

    #[must_use]
    pub fn get(object: Expr, name: Token) -> Self {
        Self::new(ExprKind::Get { object: Box::new(object), name })
    }

    #[must_use]
    pub fn set(object: Expr, name: Token, value: Expr) -> Self {
        Self::new(ExprKind::Set { object: Box::new(object), name, value: Box::new(value) })
    }

    #[must_use]
    pub fn this(keyword: Token) -> Self {
        Self::new(ExprKind::This { keyword })
    }

    #[must_use]
    pub fn super_(keyword: Token, method: Token) -> Self {
        Self::new(ExprKind::Super { keyword, method })
    }
}

/// A statement AST node.
#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(Expr),
    Print(Expr),
    Var { name: Token, initializer: Option<Expr> },
    Block(Vec<Stmt>),
    If { condition: Expr, then_branch: Box<Stmt>, else_branch: Option<Box<Stmt>> },
    While { condition: Expr, body: Box<Stmt> },
    Function(Rc<FunctionDecl>),
    Return { keyword: Token, value: Option<Expr> },
    Class {
        name: Token,
        superclass: Option<Expr>,
        methods: Vec<Rc<FunctionDecl>>,
    },
}

/// A named, parameterized function body, shared (via `Rc`) between the `Stmt::Function`
/// declaration site and every `Value::Callable` created from it.
#[derive(Debug)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

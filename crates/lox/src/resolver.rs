//! Static resolver: walks the AST once before evaluation and records, for every
//! variable/assignment/this/super occurrence, the number of enclosing scopes to step
//! over to reach its declaring scope.
//!
//! Implements the same visitor surface as the interpreter but over a scope stack of
//! per-block `name -> {declared, defined}` tables, rather than a live environment
//! chain — the whole point is to do this work once, statically, so evaluation can use
//! O(1) indexed environment access instead of walking parent links on every lookup.

use ahash::AHashMap;

use crate::{
    ast::{Expr, ExprKind, NodeId, Stmt},
    error::ResolveError,
    token::Token,
};

#[derive(Clone, Copy, PartialEq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Clone, Copy, PartialEq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

struct Scope {
    /// `false` between a variable's `declare` and `define` phases.
    names: AHashMap<String, bool>,
}

impl Scope {
    fn new() -> Self {
        Self { names: AHashMap::new() }
    }
}

/// The resolver's output: lexical depth for every expression node it could resolve to
/// a local binding. Absence means the reference is global.
pub type Depths = AHashMap<NodeId, usize>;

pub struct Resolver {
    scopes: Vec<Scope>,
    depths: Depths,
    errors: Vec<ResolveError>,
    current_function: FunctionKind,
    current_class: ClassKind,
}

/// Resolves a whole program (statement list), returning the depth side-table and any
/// static errors found. A non-empty error list means evaluation must not proceed.
pub fn resolve(statements: &[Stmt]) -> (Depths, Vec<ResolveError>) {
    let mut resolver = Resolver {
        scopes: Vec::new(),
        depths: Depths::default(),
        errors: Vec::new(),
        current_function: FunctionKind::None,
        current_class: ClassKind::None,
    };
    resolver.resolve_statements(statements);
    (resolver.depths, resolver.errors)
}

impl Resolver {
    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            }
            Stmt::Block(body) => {
                self.begin_scope();
                self.resolve_statements(body);
                self.end_scope();
            }
            Stmt::If { condition, then_branch, else_branch } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            Stmt::Function(decl) => {
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(&decl.params, &decl.body, FunctionKind::Function);
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    self.error(keyword, "Can't return from top-level code.");
                }
                if let Some(value) = value {
                    if self.current_function == FunctionKind::Initializer {
                        self.error(keyword, "Can't return a value from an initializer.");
                    }
                    self.resolve_expr(value);
                }
            }
            Stmt::Class { name, superclass, methods } => self.resolve_class(name, superclass.as_ref(), methods),
        }
    }

    fn resolve_class(&mut self, name: &Token, superclass: Option<&Expr>, methods: &[std::rc::Rc<crate::ast::FunctionDecl>]) {
        let enclosing_class = self.current_class;
        self.current_class = ClassKind::Class;

        self.declare(name);
        self.define(name);

        if let Some(superclass_expr) = superclass {
            if let ExprKind::Variable { name: super_name } = &superclass_expr.kind {
                if super_name.lexeme == name.lexeme {
                    self.error(super_name, "A class can't inherit from itself.");
                }
            }
            self.current_class = ClassKind::Subclass;
            self.resolve_expr(superclass_expr);

            self.begin_scope();
            self.scopes.last_mut().unwrap().names.insert("super".to_owned(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().unwrap().names.insert("this".to_owned(), true);

        for method in methods {
            let kind = if method.name.lexeme == "init" { FunctionKind::Initializer } else { FunctionKind::Method };
            self.resolve_function(&method.params, &method.body, kind);
        }

        self.end_scope();

        if superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_function(&mut self, params: &[Token], body: &[Stmt], kind: FunctionKind) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_statements(body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(_) => {}
            ExprKind::Grouping(inner) => self.resolve_expr(inner),
            ExprKind::Unary { right, .. } => self.resolve_expr(right),
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            ExprKind::Variable { name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.names.get(name.lexeme.as_str()) == Some(&false) {
                        self.error(name, "Can't read local variable in its own initializer.");
                    }
                }
                self.resolve_local(expr.id, name);
            }
            ExprKind::Assign { name, value } => {
                self.resolve_expr(value);
                self.resolve_local(expr.id, name);
            }
            ExprKind::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            ExprKind::Get { object, .. } => self.resolve_expr(object),
            ExprKind::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }
            ExprKind::This { keyword } => {
                if self.current_class == ClassKind::None {
                    self.error(keyword, "Can't use 'this' outside of a class.");
                    return;
                }
                self.resolve_local(expr.id, keyword);
            }
            ExprKind::Super { keyword, .. } => {
                match self.current_class {
                    ClassKind::None => self.error(keyword, "Can't use 'super' outside of a class."),
                    ClassKind::Class => self.error(keyword, "Can't use 'super' in a class with no superclass."),
                    ClassKind::Subclass => {}
                }
                self.resolve_local(expr.id, keyword);
            }
        }
    }

    fn resolve_local(&mut self, id: NodeId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.names.contains_key(name.lexeme.as_str()) {
                self.depths.insert(id, depth);
                return;
            }
        }
        // Not found in any scope: treated as global, left unrecorded.
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };
        if scope.names.contains_key(name.lexeme.as_str()) {
            self.error(name, "Already a variable with this name in this scope.");
        }
        scope.names.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };
        scope.names.insert(name.lexeme.clone(), true);
    }

    fn begin_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn error(&mut self, token: &Token, message: &str) {
        self.errors.push(ResolveError { line: token.line, message: message.to_owned() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::scan, parser::parse};

    fn resolve_source(source: &str) -> Vec<ResolveError> {
        let (tokens, _) = scan(source);
        let (stmts, parse_errors) = parse(tokens);
        assert!(parse_errors.is_empty(), "{parse_errors:?}");
        resolve(&stmts).1
    }

    #[test]
    fn self_referential_initializer_is_an_error() {
        let errors = resolve_source("var a = 1; { var a = a; }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Can't read local variable in its own initializer.");
    }

    #[test]
    fn redeclaring_local_is_an_error() {
        let errors = resolve_source("{ var a = 1; var a = 2; }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Already a variable with this name in this scope.");
    }

    #[test]
    fn redeclaring_global_is_allowed() {
        let errors = resolve_source("var a = 1; var a = 2;");
        assert!(errors.is_empty());
    }

    #[test]
    fn return_at_top_level_is_an_error() {
        let errors = resolve_source("return 1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Can't return from top-level code.");
    }

    #[test]
    fn return_value_in_initializer_is_an_error() {
        let errors = resolve_source("class A { init() { return 1; } }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Can't return a value from an initializer.");
    }

    #[test]
    fn bare_return_in_initializer_is_allowed() {
        let errors = resolve_source("class A { init() { return; } }");
        assert!(errors.is_empty());
    }

    #[test]
    fn this_outside_class_is_an_error() {
        let errors = resolve_source("print this;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Can't use 'this' outside of a class.");
    }

    #[test]
    fn super_without_superclass_is_an_error() {
        let errors = resolve_source("class A { bad() { super.x(); } }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Can't use 'super' in a class with no superclass.");
    }

    #[test]
    fn class_inheriting_from_itself_is_an_error() {
        let errors = resolve_source("class A < A {}");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "A class can't inherit from itself.");
    }
}

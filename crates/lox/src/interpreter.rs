//! Tree-walking evaluator: executes a resolved statement list directly against the
//! AST, without any intermediate bytecode representation.

use std::rc::Rc;

use ahash::AHashMap;

use crate::{
    ast::{Expr, ExprKind, Literal, NodeId, Stmt},
    builtins,
    environment::{EnvRef, Environment},
    error::RuntimeError,
    io::{PrintWriter, StdPrint},
    resolver::Depths,
    token::{Token, TokenKind},
    value::{Callable, LoxClass, LoxFunction, Value},
};

/// How generous the call-depth ceiling is before a runaway recursive program is
/// stopped with a `RuntimeError` rather than aborting the process on a native stack
/// overflow. Chosen to comfortably outlast any legitimate recursive Lox program while
/// still triggering well before the host stack itself is exhausted.
const MAX_CALL_DEPTH: usize = 1024;

/// Non-local control flow that can unwind out of statement execution: either a
/// function `return` (unwinds up to the enclosing call) or a runtime error (unwinds
/// all the way out of `interpret`).
enum Unwind {
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Self::Error(err)
    }
}

type ExecResult = Result<(), Unwind>;

pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    depths: Depths,
    call_depth: usize,
    output: Box<dyn PrintWriter>,
}

impl Interpreter {
    /// Builds an interpreter that writes `print` output through `output`.
    #[must_use]
    pub fn new(output: Box<dyn PrintWriter>) -> Self {
        let globals = Environment::root();
        builtins::install(&globals);
        Self { environment: Rc::clone(&globals), globals, depths: Depths::default(), call_depth: 0, output }
    }

    /// Convenience constructor for the common case of writing straight to stdout.
    #[must_use]
    pub fn with_stdout() -> Self {
        Self::new(Box::new(StdPrint))
    }

    /// Replaces the resolver side-table used for variable lookups. Called once per
    /// `execute` so a REPL session can re-resolve after each new statement without
    /// losing the live global environment.
    pub fn set_depths(&mut self, depths: Depths) {
        self.depths = depths;
    }

    /// Executes a whole program's statement list against the current global state.
    /// A `RuntimeError` here means execution stopped partway through; any side effects
    /// of statements before the failing one (prints, variable definitions) have
    /// already happened — execution stops on the first runtime error rather than
    /// collecting them the way scan/parse/resolve do.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in statements {
            match self.execute(stmt) {
                Ok(()) => {}
                Err(Unwind::Return(_)) => unreachable!("resolver rejects top-level return"),
                Err(Unwind::Error(err)) => return Err(err),
            }
        }
        Ok(())
    }

    /// Evaluates a single expression for the `evaluate` subcommand.
    pub fn interpret_expression(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        self.evaluate(expr)
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.output.print_line(&value.stringify());
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block(body) => {
                let enclosing = Rc::clone(&self.environment);
                self.environment = Environment::child(&enclosing);
                let result = self.execute_block(body);
                self.environment = enclosing;
                result
            }
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function(decl) => {
                let function = LoxFunction::new(Rc::clone(decl), Rc::clone(&self.environment), false);
                let value = Value::Callable(Callable::Function(Rc::new(function)));
                self.environment.define(decl.name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }
            Stmt::Class { name, superclass, methods } => self.execute_class(name, superclass.as_ref(), methods),
        }
    }

    fn execute_class(&mut self, name: &Token, superclass: Option<&Expr>, methods: &[Rc<crate::ast::FunctionDecl>]) -> ExecResult {
        let superclass_value = match superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                match value {
                    Value::Callable(Callable::Class(class)) => Some(class),
                    _ => return Err(RuntimeError::new(name.line, "Superclass must be a class.").into()),
                }
            }
            None => None,
        };

        self.environment.define(name.lexeme.clone(), Value::Nil);

        let method_env = if let Some(superclass) = &superclass_value {
            let env = Environment::child(&self.environment);
            env.define("super", Value::Callable(Callable::Class(Rc::clone(superclass))));
            env
        } else {
            Rc::clone(&self.environment)
        };

        let mut method_table = AHashMap::new();
        for method in methods {
            let is_initializer = method.name.lexeme == "init";
            let function = LoxFunction::new(Rc::clone(method), Rc::clone(&method_env), is_initializer);
            method_table.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        let class = LoxClass::new(name.lexeme.clone(), superclass_value, method_table);
        self.environment
            .assign(&name.lexeme, Value::Callable(Callable::Class(Rc::new(class))))
            .expect("class name was just defined in this environment");
        Ok(())
    }

    /// Executes a block's statements without introducing a new environment — the
    /// caller (either `Stmt::Block` or a function call) is responsible for pushing
    /// and popping the scope, so function bodies can reuse this for their own
    /// (pre-pushed) parameter scope.
    fn execute_block(&mut self, statements: &[Stmt]) -> ExecResult {
        for stmt in statements {
            self.execute(stmt)?;
        }
        Ok(())
    }

    /// Runs a function/method body in `env` (the parameter scope, already chained to
    /// the closure), honoring the call-depth guard and translating a `Return` signal
    /// into its carried value.
    pub fn execute_function_body(&mut self, body: &[Stmt], env: EnvRef) -> Result<Value, RuntimeError> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::new(0, "Stack overflow."));
        }
        self.call_depth += 1;

        let enclosing = std::mem::replace(&mut self.environment, env);
        let result = self.execute_block(body);
        self.environment = enclosing;

        self.call_depth -= 1;

        match result {
            Ok(()) => Ok(Value::Nil),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(err)) => Err(err),
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(Self::literal_value(literal)),
            ExprKind::Grouping(inner) => self.evaluate(inner),
            ExprKind::Unary { op, right } => self.evaluate_unary(op, right),
            ExprKind::Binary { left, op, right } => self.evaluate_binary(left, op, right),
            ExprKind::Logical { left, op, right } => self.evaluate_logical(left, op, right),
            ExprKind::Variable { name } => self.lookup_variable(expr.id, name),
            ExprKind::Assign { name, value } => {
                let value = self.evaluate(value)?;
                match self.depths.get(&expr.id) {
                    Some(&distance) => self.environment.assign_at(distance, &name.lexeme, value.clone()),
                    None => self
                        .globals
                        .assign(&name.lexeme, value.clone())
                        .map_err(|_| RuntimeError::new(name.line, format!("Undefined variable '{}'.", name.lexeme)))?,
                }
                Ok(value)
            }
            ExprKind::Call { callee, paren, args } => self.evaluate_call(callee, paren, args),
            ExprKind::Get { object, name } => {
                let object = self.evaluate(object)?;
                match object {
                    Value::Instance(instance) => instance
                        .get(&name.lexeme)
                        .ok_or_else(|| RuntimeError::new(name.line, format!("Undefined property '{}'.", name.lexeme))),
                    _ => Err(RuntimeError::new(name.line, "Only instances have properties.")),
                }
            }
            ExprKind::Set { object, name, value } => {
                let object = self.evaluate(object)?;
                let Value::Instance(instance) = object else {
                    return Err(RuntimeError::new(name.line, "Only instances have properties."));
                };
                let value = self.evaluate(value)?;
                instance.set(name.lexeme.clone(), value.clone());
                Ok(value)
            }
            ExprKind::This { keyword } => self.lookup_variable(expr.id, keyword),
            ExprKind::Super { keyword, method } => self.evaluate_super(expr.id, keyword, method),
        }
    }

    fn literal_value(literal: &Literal) -> Value {
        match literal {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(Rc::clone(s)),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Nil => Value::Nil,
        }
    }

    fn lookup_variable(&self, id: NodeId, name: &Token) -> Result<Value, RuntimeError> {
        match self.depths.get(&id) {
            Some(&distance) => Ok(self.environment.get_at(distance, &name.lexeme)),
            None => self
                .globals
                .get(&name.lexeme)
                .map_err(|_| RuntimeError::new(name.line, format!("Undefined variable '{}'.", name.lexeme))),
        }
    }

    fn evaluate_unary(&mut self, op: &Token, right: &Expr) -> Result<Value, RuntimeError> {
        let right = self.evaluate(right)?;
        match op.kind {
            TokenKind::Minus => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::new(op.line, "Operand must be a number.")),
            },
            TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
            _ => unreachable!("parser only produces ! and - as unary operators"),
        }
    }

    fn evaluate_logical(&mut self, left: &Expr, op: &Token, right: &Expr) -> Result<Value, RuntimeError> {
        let left = self.evaluate(left)?;
        match op.kind {
            TokenKind::Or if left.is_truthy() => Ok(left),
            TokenKind::And if !left.is_truthy() => Ok(left),
            _ => self.evaluate(right),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> Result<Value, RuntimeError> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match op.kind {
            TokenKind::Plus => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(Rc::from(format!("{a}{b}")))),
                _ => Err(RuntimeError::new(op.line, "Operands must be two numbers or two strings.")),
            },
            TokenKind::Minus => Self::numeric_binary(op, left, right, |a, b| Value::Number(a - b)),
            TokenKind::Star => Self::numeric_binary(op, left, right, |a, b| Value::Number(a * b)),
            TokenKind::Slash => Self::numeric_binary(op, left, right, |a, b| Value::Number(a / b)),
            TokenKind::Greater => Self::numeric_binary(op, left, right, |a, b| Value::Bool(a > b)),
            TokenKind::GreaterEqual => Self::numeric_binary(op, left, right, |a, b| Value::Bool(a >= b)),
            TokenKind::Less => Self::numeric_binary(op, left, right, |a, b| Value::Bool(a < b)),
            TokenKind::LessEqual => Self::numeric_binary(op, left, right, |a, b| Value::Bool(a <= b)),
            TokenKind::EqualEqual => Ok(Value::Bool(left.lox_eq(&right))),
            TokenKind::BangEqual => Ok(Value::Bool(!left.lox_eq(&right))),
            _ => unreachable!("parser only produces these kinds as binary operators"),
        }
    }

    fn numeric_binary(op: &Token, left: Value, right: Value, f: impl Fn(f64, f64) -> Value) -> Result<Value, RuntimeError> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(f(a, b)),
            _ => Err(RuntimeError::new(op.line, "Operands must be numbers.")),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &Token, args: &[Expr]) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(callee)?;
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate(arg)?);
        }

        let Value::Callable(callable) = callee else {
            return Err(RuntimeError::new(paren.line, "Can only call functions and classes."));
        };

        let arity = callable.arity();
        if arg_values.len() != arity {
            return Err(RuntimeError::new(
                paren.line,
                format!("Expected {arity} arguments but got {}.", arg_values.len()),
            ));
        }

        callable.call(self, arg_values)
    }

    fn evaluate_super(&mut self, id: NodeId, keyword: &Token, method: &Token) -> Result<Value, RuntimeError> {
        let distance = *self.depths.get(&id).expect("resolver always resolves 'super'");
        let superclass = self.environment.get_at(distance, "super");
        let Value::Callable(Callable::Class(superclass)) = superclass else {
            unreachable!("'super' always resolves to a class value");
        };

        // `this` always lives exactly one scope closer than `super`, per how the
        // resolver lays out the class-body scopes.
        let instance = self.environment.get_at(distance - 1, "this");
        let Value::Instance(instance) = instance else {
            unreachable!("'this' always resolves to an instance value");
        };

        let found = superclass
            .find_method(&method.lexeme)
            .ok_or_else(|| RuntimeError::new(method.line, format!("Undefined property '{}'.", method.lexeme)))?;

        Ok(Value::Callable(Callable::Function(Rc::new(found.bind(&instance)))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{io::CollectStringPrint, lexer::scan, parser::parse, resolver::resolve};

    fn run(source: &str) -> (Vec<String>, Option<RuntimeError>) {
        let (tokens, scan_errors) = scan(source);
        assert!(scan_errors.is_empty(), "{scan_errors:?}");
        let (stmts, parse_errors) = parse(tokens);
        assert!(parse_errors.is_empty(), "{parse_errors:?}");
        let (depths, resolve_errors) = resolve(&stmts);
        assert!(resolve_errors.is_empty(), "{resolve_errors:?}");

        let writer = CollectStringPrint::new();
        let lines = writer.lines();
        let mut interpreter = Interpreter::new(Box::new(writer));
        interpreter.set_depths(depths);
        let result = interpreter.interpret(&stmts);
        let output = lines.borrow().clone();
        (output, result.err())
    }

    #[test]
    fn arithmetic_and_print() {
        let (output, err) = run("print 1 + 2 * 3;");
        assert!(err.is_none());
        assert_eq!(output, vec!["7"]);
    }

    #[test]
    fn string_concatenation() {
        let (output, err) = run(r#"print "a" + "b";"#);
        assert!(err.is_none());
        assert_eq!(output, vec!["ab"]);
    }

    #[test]
    fn closures_capture_by_reference() {
        let source = r"
            fun counter() {
                var i = 0;
                fun inc() { i = i + 1; return i; }
                return inc;
            }
            var c = counter();
            print c();
            print c();
        ";
        let (output, err) = run(source);
        assert!(err.is_none());
        assert_eq!(output, vec!["1", "2"]);
    }

    #[test]
    fn classes_initializer_and_methods() {
        let source = r#"
            class Greeter {
                init(name) { this.name = name; }
                greet() { return "hi " + this.name; }
            }
            var g = Greeter("lox");
            print g.greet();
        "#;
        let (output, err) = run(source);
        assert!(err.is_none());
        assert_eq!(output, vec!["hi lox"]);
    }

    #[test]
    fn inheritance_and_super_call() {
        let source = r#"
            class Animal {
                speak() { return "..."; }
            }
            class Dog < Animal {
                speak() { return "woof, " + super.speak(); }
            }
            print Dog().speak();
        "#;
        let (output, err) = run(source);
        assert!(err.is_none());
        assert_eq!(output, vec!["woof, ..."]);
    }

    #[test]
    fn dividing_by_zero_produces_infinity_not_an_error() {
        let (output, err) = run("print 1 / 0;");
        assert!(err.is_none());
        assert_eq!(output, vec!["inf"]);
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        let (_, err) = run("var a = 1; a();");
        assert_eq!(err.unwrap().message, "Can only call functions and classes.");
    }

    #[test]
    fn adding_number_and_string_is_a_runtime_error() {
        let (_, err) = run(r#"print 1 + "a";"#);
        assert_eq!(err.unwrap().message, "Operands must be two numbers or two strings.");
    }

    #[test]
    fn undefined_variable_is_a_runtime_error() {
        let (_, err) = run("print missing;");
        assert_eq!(err.unwrap().message, "Undefined variable 'missing'.");
    }
}

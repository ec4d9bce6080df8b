//! Runtime values: everything a Lox expression can evaluate to.
//!
//! `Value` is the single currency the interpreter passes around. Composite values
//! (functions, classes, instances) are `Rc`-wrapped so that closures, bound methods,
//! and instances can be cheaply cloned and outlive the scope that created them.

use std::{cell::RefCell, fmt, rc::Rc};

use ahash::AHashMap;

use crate::{ast::FunctionDecl, environment::EnvRef, error::RuntimeError, interpreter::Interpreter};

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Callable(Callable),
    Instance(Rc<Instance>),
}

impl Value {
    /// Lox truthiness: only `nil` and `false` are falsy, everything else — including
    /// `0` and `""` — is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    /// Structural equality for `==`/`!=`: numbers and strings compare by value,
    /// `nil` only equals `nil`, and every other kind (callables, instances) compares
    /// by identity via `Rc::ptr_eq`, never structurally.
    #[must_use]
    pub fn lox_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => Rc::ptr_eq(a, b),
            (Self::Callable(a), Self::Callable(b)) => a.identity_eq(b),
            _ => false,
        }
    }

    /// The `print`/string-concatenation rendering of a value (distinct from the AST
    /// printer's literal rendering, which keeps `N.0` for integral numbers).
    #[must_use]
    pub fn stringify(&self) -> String {
        match self {
            Self::Nil => "nil".to_owned(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => crate::numeric::format_stringify(*n),
            Self::String(s) => s.to_string(),
            Self::Callable(c) => c.to_string(),
            Self::Instance(i) => i.to_string(),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Callable(_) => "callable",
            Self::Instance(_) => "instance",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stringify())
    }
}

#[cfg(test)]
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.lox_eq(other)
    }
}

/// Anything that can be called with `(...)`.
#[derive(Clone)]
pub enum Callable {
    /// A user-declared `fun` or method, closing over the environment where it was
    /// declared. `is_initializer` marks a class's `init` method so calls to it always
    /// return `this` regardless of any explicit `return` value.
    Function(Rc<LoxFunction>),
    /// A class used as a constructor: calling it allocates an `Instance` and, if an
    /// `init` method exists, runs it bound to the new instance before returning it.
    Class(Rc<LoxClass>),
    /// A Rust-implemented function exposed to Lox programs (only `clock` today).
    Native(Rc<NativeFunction>),
}

impl Callable {
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Function(f) => f.declaration.params.len(),
            Self::Class(c) => c.find_method("init").map_or(0, |init| init.declaration.params.len()),
            Self::Native(n) => n.arity,
        }
    }

    pub fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match self {
            Self::Function(f) => f.call(interpreter, args),
            Self::Class(c) => c.construct(interpreter, args),
            Self::Native(n) => Ok((n.func)(args)),
        }
    }

    fn identity_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(func) => write!(f, "<fn {}>", func.declaration.name.lexeme),
            Self::Class(class) => write!(f, "{}", class.name),
            Self::Native(_) => write!(f, "<native fn>"),
        }
    }
}

/// A user-declared function or method, bound to the environment it closed over at
/// declaration time.
pub struct LoxFunction {
    pub declaration: Rc<FunctionDecl>,
    pub closure: EnvRef,
    pub is_initializer: bool,
}

impl LoxFunction {
    #[must_use]
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef, is_initializer: bool) -> Self {
        Self { declaration, closure, is_initializer }
    }

    /// Produces a copy of this function whose closure has `this` (and `super`, if the
    /// enclosing environment defines it) bound to `instance` — used when a method is
    /// looked up off an instance (`instance.method`) so later calls see the right
    /// receiver even if the resulting value outlives the `get` expression.
    #[must_use]
    pub fn bind(&self, instance: &Rc<Instance>) -> Self {
        let env = crate::environment::Environment::child(&self.closure);
        env.define("this", Value::Instance(Rc::clone(instance)));
        Self {
            declaration: Rc::clone(&self.declaration),
            closure: env,
            is_initializer: self.is_initializer,
        }
    }

    fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let env = crate::environment::Environment::child(&self.closure);
        for (param, arg) in self.declaration.params.iter().zip(args) {
            env.define(param.lexeme.clone(), arg);
        }

        let result = interpreter.execute_function_body(&self.declaration.body, env);

        if self.is_initializer {
            result?;
            return Ok(self.closure.get_at(0, "this"));
        }

        result
    }
}

/// A class declaration: its name, its own methods, and (optionally) its superclass.
pub struct LoxClass {
    pub name: String,
    pub superclass: Option<Rc<LoxClass>>,
    pub methods: AHashMap<String, Rc<LoxFunction>>,
}

impl LoxClass {
    #[must_use]
    pub fn new(name: String, superclass: Option<Rc<LoxClass>>, methods: AHashMap<String, Rc<LoxFunction>>) -> Self {
        Self { name, superclass, methods }
    }

    /// Looks up a method by name, walking the superclass chain if not found locally.
    #[must_use]
    pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }
        self.superclass.as_ref().and_then(|superclass| superclass.find_method(name))
    }

    fn construct(self: &Rc<Self>, interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let instance = Rc::new(Instance { class: Rc::clone(self), fields: RefCell::new(AHashMap::new()) });

        if let Some(init) = self.find_method("init") {
            init.bind(&instance).call(interpreter, args)?;
        }

        Ok(Value::Instance(instance))
    }
}

/// An instance of a Lox class: its own field table plus a reference back to its class
/// for method lookup.
pub struct Instance {
    pub class: Rc<LoxClass>,
    fields: RefCell<AHashMap<String, Value>>,
}

impl Instance {
    /// Reads a field, falling back to a bound method if no field with that name exists.
    pub fn get(self: &Rc<Self>, name: &str) -> Option<Value> {
        if let Some(value) = self.fields.borrow().get(name) {
            return Some(value.clone());
        }
        self.class.find_method(name).map(|method| Value::Callable(Callable::Function(Rc::new(method.bind(self)))))
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(name.into(), value);
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.class.name)
    }
}

/// A Rust function exposed to Lox programs as a callable value.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: Box<dyn Fn(Vec<Value>) -> Value>,
}

//! Lexical environments: a chain of name→value scopes with an optional parent link.
//!
//! Closures force environments to outlive their lexical scope, so environments are
//! shared via `Rc<RefCell<_>>` rather than owned outright. The resolver records a
//! *depth* rather than a flat slot index, so lookups walk the parent chain that many
//! hops rather than indexing into a fixed-size frame.

use std::{cell::RefCell, rc::Rc};

use ahash::AHashMap;

use crate::value::Value;

/// A single lexical scope: its own bindings plus a link to the enclosing scope.
#[derive(Debug)]
pub struct Environment {
    values: RefCell<AHashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

pub type EnvRef = Rc<Environment>;

impl Environment {
    /// Creates the root (global) environment with no parent.
    #[must_use]
    pub fn root() -> EnvRef {
        Rc::new(Self { values: RefCell::new(AHashMap::new()), parent: None })
    }

    /// Creates a child environment whose parent is `enclosing`.
    #[must_use]
    pub fn child(enclosing: &EnvRef) -> EnvRef {
        Rc::new(Self { values: RefCell::new(AHashMap::new()), parent: Some(Rc::clone(enclosing)) })
    }

    /// Defines (or redefines) `name` in this environment's own frame. Always succeeds;
    /// redefining overwrites the previous binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.values.borrow_mut().insert(name.into(), value);
    }

    /// Looks up `name`, walking parent links until found or exhausted.
    pub fn get(self: &Rc<Self>, name: &str) -> Result<Value, UndefinedVariable> {
        if let Some(value) = self.values.borrow().get(name) {
            return Ok(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.get(name),
            None => Err(UndefinedVariable),
        }
    }

    /// Assigns `name` to `value`, walking parent links until an existing binding is
    /// found. Fails if `name` is not bound anywhere on the chain (Lox has no implicit
    /// global declaration via assignment).
    pub fn assign(self: &Rc<Self>, name: &str, value: Value) -> Result<(), UndefinedVariable> {
        if self.values.borrow().contains_key(name) {
            self.values.borrow_mut().insert(name.to_owned(), value);
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(UndefinedVariable),
        }
    }

    /// Steps exactly `distance` parent links (no traversal beyond that), then reads
    /// `name` from that frame. The resolver guarantees the binding exists there.
    pub fn get_at(self: &Rc<Self>, distance: usize, name: &str) -> Value {
        self.ancestor(distance)
            .values
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("resolver recorded depth {distance} for '{name}' but binding is missing"))
    }

    /// Steps exactly `distance` parent links, then writes `name` in that frame.
    pub fn assign_at(self: &Rc<Self>, distance: usize, name: &str, value: Value) {
        self.ancestor(distance).values.borrow_mut().insert(name.to_owned(), value);
    }

    fn ancestor(self: &Rc<Self>, distance: usize) -> Rc<Self> {
        let mut env = Rc::clone(self);
        for _ in 0..distance {
            let parent = env.parent.clone().expect("resolver depth exceeds environment chain length");
            env = parent;
        }
        env
    }
}

/// Raised when a name is looked up or assigned but is not bound anywhere on the chain.
/// Carries no data of its own; the caller attaches the offending name and line when
/// converting to a `RuntimeError`.
#[derive(Debug, Clone, Copy)]
pub struct UndefinedVariable;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_sees_parent_bindings() {
        let root = Environment::root();
        root.define("a", Value::Number(1.0));
        let child = Environment::child(&root);
        assert_eq!(child.get("a").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn shadowing_in_child_does_not_affect_parent() {
        let root = Environment::root();
        root.define("a", Value::Number(1.0));
        let child = Environment::child(&root);
        child.define("a", Value::Number(2.0));
        assert_eq!(child.get("a").unwrap(), Value::Number(2.0));
        assert_eq!(root.get("a").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_walks_up_to_the_defining_frame() {
        let root = Environment::root();
        root.define("a", Value::Number(1.0));
        let child = Environment::child(&root);
        child.assign("a", Value::Number(9.0)).unwrap();
        assert_eq!(root.get("a").unwrap(), Value::Number(9.0));
    }

    #[test]
    fn assign_to_undefined_name_fails() {
        let root = Environment::root();
        assert!(root.assign("missing", Value::Nil).is_err());
    }

    #[test]
    fn get_at_steps_exact_distance() {
        let root = Environment::root();
        root.define("a", Value::Number(1.0));
        let mid = Environment::child(&root);
        mid.define("a", Value::Number(2.0));
        let leaf = Environment::child(&mid);
        leaf.define("a", Value::Number(3.0));
        assert_eq!(leaf.get_at(0, "a"), Value::Number(3.0));
        assert_eq!(leaf.get_at(1, "a"), Value::Number(2.0));
        assert_eq!(leaf.get_at(2, "a"), Value::Number(1.0));
    }
}

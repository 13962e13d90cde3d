use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use hashbrown::HashMap as SpurMap;
use lasso::Spur;

use crate::error::CinderError;
use crate::value::{intern, resolve, Value};

/// A lexical frame. Cloning an `Env` aliases the same bindings.
#[derive(Clone)]
pub struct Env {
    pub bindings: Rc<RefCell<SpurMap<Spur, Value>>>,
    pub parent: Option<Rc<Env>>,
}

/// Non-owning handle to a frame, for builtins that must call back into their own root.
#[derive(Clone)]
pub struct WeakEnv {
    bindings: Weak<RefCell<SpurMap<Spur, Value>>>,
    parent: Option<Rc<Env>>,
}

impl Env {
    pub fn new() -> Self {
        Env {
            bindings: Rc::new(RefCell::new(SpurMap::new())),
            parent: None,
        }
    }

    pub fn with_parent(parent: Rc<Env>) -> Self {
        Env {
            bindings: Rc::new(RefCell::new(SpurMap::new())),
            parent: Some(parent),
        }
    }

    pub fn get(&self, name: Spur) -> Option<Value> {
        if let Some(val) = self.bindings.borrow().get(&name) {
            Some(val.clone())
        } else if let Some(parent) = &self.parent {
            parent.get(name)
        } else {
            None
        }
    }

    pub fn get_str(&self, name: &str) -> Option<Value> {
        self.get(intern(name))
    }

    /// Walk outward from this frame; failing at the root is an unbound-variable error.
    pub fn lookup(&self, name: Spur) -> Result<Value, CinderError> {
        self.get(name)
            .ok_or_else(|| CinderError::Unbound(resolve(name)))
    }

    /// Bind `name` in this frame, shadowing any outer binding.
    pub fn define(&self, name: Spur, val: Value) {
        self.bindings.borrow_mut().insert(name, val);
    }

    pub fn define_str(&self, name: &str, val: Value) {
        self.define(intern(name), val);
    }

    /// A fresh frame under this one with `params` bound positionally to `args`.
    pub fn create_child(&self, params: &[Spur], args: &[Value]) -> Result<Env, CinderError> {
        if params.len() != args.len() {
            return Err(CinderError::arity(
                "lambda",
                params.len().to_string(),
                args.len(),
            ));
        }
        let child = Env::with_parent(Rc::new(self.clone()));
        {
            let mut bindings = child.bindings.borrow_mut();
            for (param, arg) in params.iter().zip(args) {
                bindings.insert(*param, arg.clone());
            }
        }
        Ok(child)
    }

    pub fn downgrade(&self) -> WeakEnv {
        WeakEnv {
            bindings: Rc::downgrade(&self.bindings),
            parent: self.parent.clone(),
        }
    }

    /// Names bound directly in this frame, sorted.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.borrow().keys().map(|k| resolve(*k)).collect();
        names.sort();
        names
    }

    pub fn depth(&self) -> usize {
        match &self.parent {
            Some(parent) => 1 + parent.depth(),
            None => 0,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<env depth={} bindings={}>",
            self.depth(),
            self.bindings.borrow().len()
        )
    }
}

impl WeakEnv {
    /// `None` once every owning `Env` for the frame is gone.
    pub fn upgrade(&self) -> Option<Env> {
        self.bindings.upgrade().map(|bindings| Env {
            bindings,
            parent: self.parent.clone(),
        })
    }
}

impl fmt::Debug for WeakEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<weak-env live={}>", self.bindings.strong_count() > 0)
    }
}

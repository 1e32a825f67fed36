use crate::object::Object;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// A scope shared between the code running in it and every closure that captured it.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn new_enclosed(outer: Env) -> Self {
        Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Writes into this scope only, shadowing any outer binding of the same name.
    pub fn set(&mut self, key: &str, value: Object) {
        self.store.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        match self.store.get(key) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(key)),
        }
    }
}

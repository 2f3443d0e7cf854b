use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

/// Shared handle to a scope. Closures hold one of these for their
/// defining scope, so a frame lives as long as its longest holder.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    /// A fresh top-level scope.
    pub fn root() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(Rc::clone(outer)),
        }))
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        match self.store.get(key) {
            Some(obj) => Some(obj.clone()),
            None => match &self.outer {
                Some(env) => env.borrow().get(key),
                None => None,
            },
        }
    }

    /// Always binds in this frame, shadowing any outer binding.
    pub fn set(&mut self, key: impl Into<String>, value: Object) {
        self.store.insert(key.into(), value);
    }
}

#[cfg(test)]
mod test {
    use crate::environment::Environment;
    use crate::object::Object;

    fn integer(obj: Option<Object>) -> i64 {
        match obj {
            Some(Object::Integer(i)) => i,
            other => panic!("expected integer, got {:?}", other),
        }
    }

    #[test]
    fn test_get_walks_outer_scopes() {
        let root = Environment::root();
        root.borrow_mut().set("a", Object::Integer(1));
        let child = Environment::new_enclosed(&root);
        let grandchild = Environment::new_enclosed(&child);

        assert_eq!(integer(grandchild.borrow().get("a")), 1);
        assert!(grandchild.borrow().get("missing").is_none());
    }

    #[test]
    fn test_set_shadows_without_touching_outer() {
        let root = Environment::root();
        root.borrow_mut().set("a", Object::Integer(1));
        let child = Environment::new_enclosed(&root);
        child.borrow_mut().set("a", Object::Integer(2));

        assert_eq!(integer(child.borrow().get("a")), 2);
        assert_eq!(integer(root.borrow().get("a")), 1);
    }

    #[test]
    fn test_outer_updates_are_visible() {
        let root = Environment::root();
        let child = Environment::new_enclosed(&root);
        root.borrow_mut().set("late", Object::Integer(7));

        assert_eq!(integer(child.borrow().get("late")), 7);
    }
}

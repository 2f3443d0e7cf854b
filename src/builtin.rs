use std::fmt;
use std::fmt::Formatter;
use std::io::Write;
use std::rc::Rc;

use log::warn;

use crate::evaluator::new_error;
use crate::object::{Object, NULL};

/// Native function signature. `out` is the evaluator's output sink.
pub type BuiltinFn = fn(args: Vec<Object>, out: &mut dyn Write) -> Object;

#[derive(Clone, Copy, Debug)]
pub struct BuiltinFunction {
    name: &'static str,
    func: BuiltinFn,
}

const BUILTINS: &[BuiltinFunction] = &[
    BuiltinFunction { name: "len", func: len },
    BuiltinFunction { name: "first", func: first },
    BuiltinFunction { name: "last", func: last },
    BuiltinFunction { name: "rest", func: rest },
    BuiltinFunction { name: "push", func: push },
    BuiltinFunction { name: "log", func: log_values },
];

impl fmt::Display for BuiltinFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl BuiltinFunction {
    pub fn look_up(name: &str) -> Option<Self> {
        BUILTINS.iter().find(|b| b.name == name).copied()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: Vec<Object>, out: &mut dyn Write) -> Object {
        (self.func)(args, out)
    }
}

fn wrong_arguments(got: usize, wanted: usize) -> Object {
    new_error(format!("wrong number of arguments. got={}, wanted={}", got, wanted))
}

fn len(args: Vec<Object>, _: &mut dyn Write) -> Object {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }

    match &args[0] {
        Object::String(s) => Object::Integer(s.chars().count() as i64),
        Object::Array(arr) => Object::Integer(arr.len() as i64),
        other => new_error(format!("argument to `len` not supported, got {}", other.object_type())),
    }
}

fn first(args: Vec<Object>, _: &mut dyn Write) -> Object {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }

    match &args[0] {
        Object::Array(arr) => arr.first().cloned().unwrap_or(NULL),
        other => new_error(format!("argument to `first` must be ARRAY, got {}", other.object_type())),
    }
}

fn last(args: Vec<Object>, _: &mut dyn Write) -> Object {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }

    match &args[0] {
        Object::Array(arr) => arr.last().cloned().unwrap_or(NULL),
        other => new_error(format!("argument to `last` must be ARRAY, got {}", other.object_type())),
    }
}

fn rest(args: Vec<Object>, _: &mut dyn Write) -> Object {
    if args.len() != 1 {
        return wrong_arguments(args.len(), 1);
    }

    match &args[0] {
        Object::Array(arr) if arr.is_empty() => NULL,
        Object::Array(arr) => Object::Array(Rc::new(arr[1..].to_vec())),
        other => new_error(format!("argument to `rest` must be ARRAY, got {}", other.object_type())),
    }
}

fn push(args: Vec<Object>, _: &mut dyn Write) -> Object {
    if args.len() != 2 {
        return wrong_arguments(args.len(), 2);
    }

    match &args[0] {
        Object::Array(arr) => {
            let mut elements = Vec::with_capacity(arr.len() + 1);
            elements.extend(arr.iter().cloned());
            elements.push(args[1].clone());
            Object::Array(Rc::new(elements))
        }
        other => new_error(format!("argument to `push` must be ARRAY, got {}", other.object_type())),
    }
}

fn log_values(args: Vec<Object>, out: &mut dyn Write) -> Object {
    for arg in args {
        if let Err(err) = writeln!(out, "{}", arg.inspect()) {
            warn!("log builtin failed to write: {}", err);
        }
    }
    NULL
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use crate::builtin::BuiltinFunction;
    use crate::object::Object;

    fn call(name: &str, args: Vec<Object>) -> (Object, String) {
        let mut out = Vec::new();
        let builtin = BuiltinFunction::look_up(name).expect("builtin exists");
        let result = builtin.call(args, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn array(values: &[i64]) -> Object {
        Object::Array(Rc::new(values.iter().map(|v| Object::Integer(*v)).collect()))
    }

    #[test]
    fn test_look_up() {
        for name in ["len", "first", "last", "rest", "push", "log"] {
            assert_eq!(BuiltinFunction::look_up(name).map(|b| b.name()), Some(name));
        }
        assert!(BuiltinFunction::look_up("puts").is_none());
    }

    #[test]
    fn test_rest_returns_new_array() {
        let original = array(&[1, 2, 3]);
        let (result, _) = call("rest", vec![original.clone()]);
        assert_eq!(result.inspect(), "[2, 3]");
        assert_eq!(original.inspect(), "[1, 2, 3]");
        assert!(!result.is_identical(&original));
    }

    #[test]
    fn test_push_does_not_mutate() {
        let original = array(&[1]);
        let (result, _) = call("push", vec![original.clone(), Object::Integer(2)]);
        assert_eq!(result.inspect(), "[1, 2]");
        assert_eq!(original.inspect(), "[1]");
    }

    #[test]
    fn test_log_writes_each_argument() {
        let (result, out) = call("log", vec![Object::String("hi".to_string()), Object::Integer(3)]);
        assert!(matches!(result, Object::Null));
        assert_eq!(out, "hi\n3\n");
    }

    #[test]
    fn test_len_counts_characters() {
        let (result, _) = call("len", vec![Object::String("héllo".to_string())]);
        assert!(matches!(result, Object::Integer(5)));
    }
}

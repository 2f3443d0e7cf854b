//! Lexer, Pratt parser and tree-walking evaluator for the Monkey language.
//!
//! ```
//! use monkey_interpreter::{evaluate, parse, Environment};
//!
//! let (program, errors) = parse("let add = fn(a, b) { a + b }; add(1, 2)");
//! assert!(errors.is_empty());
//! let env = Environment::root();
//! let result = evaluate(&program, &env).unwrap();
//! assert_eq!(result.inspect(), "3");
//! ```

pub mod ast;
pub mod builtin;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod token;

pub use crate::ast::{Node, Program};
pub use crate::environment::{Env, Environment};
pub use crate::error::{Error, Result};
pub use crate::evaluator::Evaluator;
pub use crate::object::Object;

use crate::lexer::Lexer;
use crate::parser::Parser;

/// Parses `source`, returning the program together with every parser error.
/// Callers should not evaluate the program when the list is non-empty.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    (program, parser.into_errors())
}

/// Evaluates `program` in `env`, sending `log` output to stdout.
pub fn evaluate(program: &Program, env: &Env) -> Option<Object> {
    Evaluator::new().eval(Node::Program(program), env)
}

/// Parses and evaluates `source` in a fresh environment.
pub fn run(source: &str) -> Result<Option<Object>> {
    let (program, errors) = parse(source);
    if !errors.is_empty() {
        return Err(Error::Parse(errors));
    }
    Ok(evaluate(&program, &Environment::root()))
}

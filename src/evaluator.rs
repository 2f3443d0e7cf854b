use std::io::{self, Stdout, Write};
use std::rc::Rc;

use log::trace;

use crate::ast::{BlockStatement, Expression, FunctionLiteral, Node, Program, Statement};
use crate::builtin::BuiltinFunction;
use crate::environment::{Env, Environment};
use crate::object::{Function, Hash, HashPair, Object, FALSE, NULL, TRUE};

/// Tree-walking evaluator. Bindings live in the [`Env`] passed to
/// [`Evaluator::eval`]; the evaluator itself only owns the sink that the
/// `log` builtin writes to.
pub struct Evaluator<W: Write = Stdout> {
    out: W,
}

impl Evaluator<Stdout> {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for Evaluator<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Evaluator<W> {
    pub fn with_output(out: W) -> Self {
        Self { out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Evaluates `node` in `env`. `None` means the node produced no value,
    /// as with a `let` statement or an empty program.
    pub fn eval(&mut self, node: Node, env: &Env) -> Option<Object> {
        match node {
            Node::Program(program) => self.eval_program(program, env),
            Node::Block(block) => self.eval_block_statement(block, env),
            Node::Statement(stmt) => self.eval_statement(stmt, env),
            Node::Expression(exp) => self.eval_expression(exp, env),
        }
    }

    fn eval_program(&mut self, program: &Program, env: &Env) -> Option<Object> {
        let mut result = None;

        for stmt in &program.statements {
            result = self.eval_statement(stmt, env);

            match result {
                Some(Object::ReturnValue(ret)) => return Some(*ret),
                Some(Object::Error(_)) => return result,
                _ => {}
            }
        }
        result
    }

    // Unlike `eval_program`, return values stay wrapped so they keep
    // unwinding through enclosing blocks up to the function call.
    fn eval_block_statement(&mut self, block: &BlockStatement, env: &Env) -> Option<Object> {
        let mut result = None;

        for stmt in &block.statements {
            result = self.eval_statement(stmt, env);

            if let Some(Object::ReturnValue(_) | Object::Error(_)) = result {
                return result;
            }
        }
        result
    }

    fn eval_statement(&mut self, stmt: &Statement, env: &Env) -> Option<Object> {
        match stmt {
            Statement::ExpressionStatement(exp) => self.eval_expression(exp, env),
            Statement::ReturnStatement(r) => {
                let val = self.eval_operand(r, env);
                if val.is_error() {
                    return Some(val);
                }
                Some(Object::ReturnValue(Box::new(val)))
            }
            Statement::LetStatement { identifier, value } => {
                let val = self.eval_operand(value, env);
                if val.is_error() {
                    return Some(val);
                }
                env.borrow_mut().set(identifier.value.clone(), val);
                None
            }
        }
    }

    // Operand positions read a valueless result (an empty block, or a
    // body ending in `let`) as `null`.
    fn eval_operand(&mut self, exp: &Expression, env: &Env) -> Object {
        self.eval_expression(exp, env).unwrap_or(NULL)
    }

    fn eval_expression(&mut self, exp: &Expression, env: &Env) -> Option<Object> {
        match exp {
            Expression::Integer(i) => Some(Object::Integer(*i)),
            Expression::String(s) => Some(Object::String(s.clone())),
            Expression::Boolean(b) => Some(native_bool_to_object(*b)),
            Expression::PrefixExpression { operation, right } => {
                let right = self.eval_operand(right, env);
                if right.is_error() {
                    return Some(right);
                }
                Some(eval_prefix_expression(operation, right))
            }
            Expression::InfixExpression { operation, left, right } => {
                let left = self.eval_operand(left, env);
                if left.is_error() {
                    return Some(left);
                }
                let right = self.eval_operand(right, env);
                if right.is_error() {
                    return Some(right);
                }
                Some(eval_infix_expression(operation, left, right))
            }
            Expression::IfExpression { condition, consequence, alternative } => {
                let condition = self.eval_operand(condition, env);
                if condition.is_error() {
                    return Some(condition);
                }

                if is_truthy(&condition) {
                    self.eval_block_statement(consequence, env)
                } else {
                    match alternative {
                        None => Some(NULL),
                        Some(alt) => self.eval_block_statement(alt, env),
                    }
                }
            }
            Expression::Identifier(ident) => Some(eval_identifier(&ident.value, env)),
            Expression::Function(FunctionLiteral { parameters, body }) => {
                Some(Object::Function(Rc::new(Function {
                    parameters: parameters.clone(),
                    body: Rc::clone(body),
                    env: Rc::clone(env),
                })))
            }
            Expression::CallExpression { function, arguments } => {
                let function = self.eval_operand(function, env);
                if function.is_error() {
                    return Some(function);
                }
                let args = match self.eval_expressions(arguments, env) {
                    Ok(args) => args,
                    Err(err) => return Some(err),
                };
                self.apply_function(function, args)
            }
            Expression::Array(exps) => match self.eval_expressions(exps, env) {
                Ok(elements) => Some(Object::Array(Rc::new(elements))),
                Err(err) => Some(err),
            },
            Expression::IndexExpression { left, index } => {
                let left = self.eval_operand(left, env);
                if left.is_error() {
                    return Some(left);
                }
                let index = self.eval_operand(index, env);
                if index.is_error() {
                    return Some(index);
                }
                Some(eval_index_expression(left, index))
            }
            Expression::Hash(pairs) => Some(self.eval_hash_literal(pairs, env)),
        }
    }

    // Evaluates left to right, stopping at the first error. Expressions
    // that produce no value are left out of the list.
    fn eval_expressions(&mut self, exps: &[Expression], env: &Env) -> Result<Vec<Object>, Object> {
        let mut result = Vec::with_capacity(exps.len());

        for exp in exps {
            match self.eval_expression(exp, env) {
                Some(evaluated) if evaluated.is_error() => return Err(evaluated),
                Some(evaluated) => result.push(evaluated),
                None => trace!("dropping valueless element {}", exp),
            }
        }
        Ok(result)
    }

    // A pair whose key or value produces no value is left out.
    fn eval_hash_literal(&mut self, pairs: &[(Expression, Expression)], env: &Env) -> Object {
        let mut hash = Hash::default();

        for (key_exp, value_exp) in pairs {
            let key = match self.eval_expression(key_exp, env) {
                Some(key) if key.is_error() => return key,
                Some(key) => key,
                None => continue,
            };
            let hash_key = match key.hash_key() {
                Some(hash_key) => hash_key,
                None => return unusable_as_hash_key(&key),
            };

            let value = match self.eval_expression(value_exp, env) {
                Some(value) if value.is_error() => return value,
                Some(value) => value,
                None => continue,
            };

            hash.insert(hash_key, HashPair { key, value });
        }
        Object::Hash(Rc::new(hash))
    }

    fn apply_function(&mut self, function: Object, args: Vec<Object>) -> Option<Object> {
        match function {
            Object::Function(func) => {
                trace!("applying fn with {} of {} arguments", args.len(), func.parameters.len());
                let extended = Environment::new_enclosed(&func.env);
                // missing arguments stay unbound, extra ones are dropped
                for (param, arg) in func.parameters.iter().zip(args) {
                    extended.borrow_mut().set(param.value.clone(), arg);
                }

                match self.eval_block_statement(&func.body, &extended)? {
                    Object::ReturnValue(ret) => Some(*ret),
                    other => Some(other),
                }
            }
            Object::Builtin(builtin) => {
                trace!("calling builtin {}", builtin);
                Some(builtin.call(args, &mut self.out))
            }
            other => Some(new_error(format!("not a function: {}", other.object_type()))),
        }
    }
}

pub fn new_error(msg: String) -> Object {
    Object::Error(msg)
}

fn unusable_as_hash_key(key: &Object) -> Object {
    new_error(format!("unusable as hash key: {}", key.object_type()))
}

fn native_bool_to_object(input: bool) -> Object {
    if input {
        TRUE
    } else {
        FALSE
    }
}

/// `null` and `false` are falsy, everything else (including `0`) is truthy.
pub fn is_truthy(obj: &Object) -> bool {
    match obj {
        Object::Null => false,
        Object::Boolean(b) => *b,
        _ => true,
    }
}

fn eval_identifier(name: &str, env: &Env) -> Object {
    if let Some(obj) = env.borrow().get(name) {
        return obj;
    }
    match BuiltinFunction::look_up(name) {
        Some(builtin) => Object::Builtin(builtin),
        None => new_error(format!("identifier not found: {}", name)),
    }
}

fn eval_prefix_expression(operation: &str, right: Object) -> Object {
    match operation {
        "!" => eval_bang_expression(right),
        "-" => eval_minus_prefix_expression(right),
        _ => new_error(format!("unknown operator: {}{}", operation, right.object_type())),
    }
}

fn eval_bang_expression(right: Object) -> Object {
    native_bool_to_object(!is_truthy(&right))
}

fn eval_minus_prefix_expression(right: Object) -> Object {
    match right {
        Object::Integer(i) => Object::Integer(i.wrapping_neg()),
        _ => new_error(format!("unknown operator: -{}", right.object_type())),
    }
}

fn eval_infix_expression(operation: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_expression(operation, *l, *r),
        _ if left.object_type() != right.object_type() => new_error(format!(
            "type mismatch: {} {} {}",
            left.object_type(),
            operation,
            right.object_type()
        )),
        (Object::String(l), Object::String(r)) => eval_string_infix_expression(operation, l, r),
        _ => match operation {
            "==" => native_bool_to_object(left.is_identical(&right)),
            "!=" => native_bool_to_object(!left.is_identical(&right)),
            _ => unknown_infix_operator(operation, &left, &right),
        },
    }
}

fn unknown_infix_operator(operation: &str, left: &Object, right: &Object) -> Object {
    new_error(format!(
        "unknown operator: {} {} {}",
        left.object_type(),
        operation,
        right.object_type()
    ))
}

// Arithmetic wraps on overflow; division truncates toward zero.
fn eval_integer_infix_expression(operation: &str, left: i64, right: i64) -> Object {
    match operation {
        "+" => Object::Integer(left.wrapping_add(right)),
        "-" => Object::Integer(left.wrapping_sub(right)),
        "*" => Object::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                new_error("division by zero".to_string())
            } else {
                Object::Integer(left.wrapping_div(right))
            }
        }
        "<" => native_bool_to_object(left < right),
        ">" => native_bool_to_object(left > right),
        "==" => native_bool_to_object(left == right),
        "!=" => native_bool_to_object(left != right),
        _ => unknown_infix_operator(operation, &Object::Integer(left), &Object::Integer(right)),
    }
}

fn eval_string_infix_expression(operation: &str, left: &str, right: &str) -> Object {
    match operation {
        "+" => Object::String(format!("{}{}", left, right)),
        _ => new_error(format!("unknown operator: STRING {} STRING", operation)),
    }
}

fn eval_index_expression(left: Object, index: Object) -> Object {
    match (&left, &index) {
        (Object::Array(arr), Object::Integer(i)) => eval_array_index(arr, *i),
        (Object::Hash(hash), _) => match index.hash_key() {
            Some(key) => hash.get(&key).map(|pair| pair.value.clone()).unwrap_or(NULL),
            None => unusable_as_hash_key(&index),
        },
        _ => new_error(format!("index operator not supported: {}", left.object_type())),
    }
}

fn eval_array_index(arr: &[Object], index: i64) -> Object {
    usize::try_from(index)
        .ok()
        .and_then(|i| arr.get(i))
        .cloned()
        .unwrap_or(NULL)
}

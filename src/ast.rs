use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;

/// Borrowed view over any AST node, the unit the evaluator dispatches on.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Block(&'a BlockStatement),
    Expression(&'a Expression),
}

impl Node<'_> {
    pub fn token_literal(&self) -> String {
        match self {
            Node::Program(p) => p.token_literal(),
            Node::Statement(s) => s.token_literal(),
            Node::Block(b) => b.token_literal(),
            Node::Expression(e) => e.token_literal(),
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Program(p) => write!(f, "{}", p),
            Node::Statement(s) => write!(f, "{}", s),
            Node::Block(b) => write!(f, "{}", b),
            Node::Expression(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> String {
        match self.statements.first() {
            Some(stmt) => stmt.token_literal(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements)
    }
}

fn write_statements(f: &mut Formatter<'_>, statements: &[Statement]) -> fmt::Result {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            write!(f, "; ")?;
        }
        write!(f, "{}", stmt)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub value: String,
}

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Identifier { value: value.into() }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl BlockStatement {
    pub fn new(statements: Vec<Statement>) -> Self {
        BlockStatement { statements }
    }

    pub fn token_literal(&self) -> String {
        "{".to_string()
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }
        write!(f, "{{ ")?;
        write_statements(f, &self.statements)?;
        write!(f, " }}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    LetStatement { identifier: Identifier, value: Expression },
    ReturnStatement(Expression),
    ExpressionStatement(Expression),
}

impl Statement {
    pub fn token_literal(&self) -> String {
        match self {
            Statement::LetStatement { .. } => "let".to_string(),
            Statement::ReturnStatement(_) => "return".to_string(),
            Statement::ExpressionStatement(exp) => exp.token_literal(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::LetStatement { identifier, value } => {
                write!(f, "let {} = {}", identifier, value)
            }
            Statement::ReturnStatement(ret) => write!(f, "return {}", ret),
            Statement::ExpressionStatement(exp) => write!(f, "{}", exp),
        }
    }
}

/// Parameters and body of a `fn` literal. The body is reference counted so
/// function objects can keep it alive after the program that defined them
/// has been dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}) {}", join(&self.parameters), self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Identifier(Identifier),
    Boolean(bool),
    Integer(i64),
    String(String),
    Array(Vec<Expression>),
    Hash(Vec<(Expression, Expression)>),
    PrefixExpression {
        operation: String,
        right: Box<Expression>,
    },
    InfixExpression {
        operation: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    IfExpression {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Function(FunctionLiteral),
    CallExpression {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    IndexExpression {
        left: Box<Expression>,
        index: Box<Expression>,
    },
}

impl Expression {
    pub fn token_literal(&self) -> String {
        match self {
            Expression::Identifier(ident) => ident.value.clone(),
            Expression::Boolean(b) => b.to_string(),
            Expression::Integer(i) => i.to_string(),
            Expression::String(s) => s.clone(),
            Expression::Array(_) => "[".to_string(),
            Expression::Hash(_) => "{".to_string(),
            Expression::PrefixExpression { operation, .. } => operation.clone(),
            Expression::InfixExpression { operation, .. } => operation.clone(),
            Expression::IfExpression { .. } => "if".to_string(),
            Expression::Function(_) => "fn".to_string(),
            Expression::CallExpression { .. } => "(".to_string(),
            Expression::IndexExpression { .. } => "[".to_string(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::Boolean(b) => write!(f, "{}", b),
            Expression::Integer(int) => write!(f, "{}", int),
            Expression::String(st) => write!(f, "\"{}\"", st),
            Expression::Array(exps) => write!(f, "[{}]", join(exps)),
            Expression::Hash(pairs) => write!(
                f,
                "{{{}}}",
                pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Expression::PrefixExpression { operation, right } => {
                write!(f, "({}{})", operation, right)
            }
            Expression::InfixExpression { operation, left, right } => {
                write!(f, "({} {} {})", left, operation, right)
            }
            Expression::IfExpression { condition, consequence, alternative } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, " else {}", alt)?;
                }
                Ok(())
            }
            Expression::Function(func) => write!(f, "{}", func),
            Expression::CallExpression { function, arguments } => {
                write!(f, "{}({})", function, join(arguments))
            }
            Expression::IndexExpression { left, index } => {
                write!(f, "({}[{}])", left, index)
            }
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

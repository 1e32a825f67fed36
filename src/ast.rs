use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expression {
    Identifier(String),
    IntegerLiteral(i64),
    Boolean(bool),
    StringLiteral(String),
    ArrayLiteral(Vec<Expression>),
    /// Key/value pairs in source order; keys stay unevaluated until runtime.
    HashLiteral(Vec<(Expression, Expression)>),
    /// The body is shared so every closure built from this literal points at the same block.
    FunctionLiteral(Vec<String>, Rc<BlockStatement>),
    Call(Box<Expression>, Vec<Expression>),
    Index(Box<Expression>, Box<Expression>),
    Prefix(PrefixOperator, Box<Expression>),
    Infix(InfixOperator, Box<Expression>, Box<Expression>),
    If(Box<Expression>, BlockStatement, Option<BlockStatement>),
}

impl Expression {
    /// The literal of the token this expression was parsed from.
    pub fn token_literal(&self) -> String {
        match self {
            Expression::Identifier(name) => name.clone(),
            Expression::IntegerLiteral(v) => v.to_string(),
            Expression::Boolean(b) => b.to_string(),
            Expression::StringLiteral(s) => s.clone(),
            Expression::ArrayLiteral(_) | Expression::Index(_, _) => "[".to_owned(),
            Expression::HashLiteral(_) => "{".to_owned(),
            Expression::FunctionLiteral(_, _) => "fn".to_owned(),
            Expression::Call(_, _) => "(".to_owned(),
            Expression::Prefix(operator, _) => operator.to_string(),
            Expression::Infix(operator, _, _) => operator.to_string(),
            Expression::If(_, _, _) => "if".to_owned(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::IntegerLiteral(v) => write!(f, "{}", v),
            Expression::Boolean(b) => write!(f, "{}", b),
            Expression::StringLiteral(s) => write!(f, "{}", s),
            Expression::ArrayLiteral(elements) => write!(f, "[{}]", join(elements)),
            Expression::HashLiteral(pairs) => {
                let pairs: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| format!("{}:{}", key, value))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Expression::FunctionLiteral(parameters, body) => {
                write!(f, "fn({}) {}", parameters.join(", "), body)
            }
            Expression::Call(function, arguments) => {
                write!(f, "{}({})", function, join(arguments))
            }
            Expression::Index(left, index) => write!(f, "({}[{}])", left, index),
            Expression::Prefix(operator, right) => write!(f, "({}{})", operator, right),
            Expression::Infix(operator, left, right) => {
                write!(f, "({} {} {})", left, operator, right)
            }
            Expression::If(condition, consequence, alternative) => {
                write!(f, "if {} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
        }
    }
}

fn join(expressions: &[Expression]) -> String {
    expressions
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrefixOperator {
    Bang,
    Minus,
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrefixOperator::Bang => write!(f, "!"),
            PrefixOperator::Minus => write!(f, "-"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InfixOperator {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Asterisk => "*",
            InfixOperator::Slash => "/",
            InfixOperator::Lt => "<",
            InfixOperator::Gt => ">",
            InfixOperator::Eq => "==",
            InfixOperator::NotEq => "!=",
        };
        f.write_str(op)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Statement {
    Let(String, Expression),
    /// `None` for a bare `return`.
    Return(Option<Expression>),
    Expression(Expression),
}

impl Statement {
    pub fn token_literal(&self) -> String {
        match self {
            Statement::Let(_, _) => "let".to_owned(),
            Statement::Return(_) => "return".to_owned(),
            Statement::Expression(expression) => expression.token_literal(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Let(name, value) => write!(f, "let {} = {};", name, value),
            Statement::Return(Some(value)) => write!(f, "return {};", value),
            Statement::Return(None) => write!(f, "return;"),
            Statement::Expression(expression) => write!(f, "{}", expression),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl BlockStatement {
    pub fn token_literal(&self) -> String {
        "{".to_owned()
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> String {
        self.statements
            .first()
            .map(Statement::token_literal)
            .unwrap_or_default()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

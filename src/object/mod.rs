use crate::ast::{BlockStatement, InfixOperator, PrefixOperator};
pub use crate::object::builtins::Builtin;
pub use crate::object::environment::{Env, Environment};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

pub mod builtins;
pub mod environment;

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Null,
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Rc<Vec<Object>>),
    Hash(Rc<HashPairs>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Return(Box<Object>),
    Error(EvalError),
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Null => write!(f, "null"),
            Object::Integer(v) => write!(f, "{}", v),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::String(s) => write!(f, "{}", s),
            Object::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Object::Hash(pairs) => {
                let pairs: Vec<String> = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key, pair.value))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Object::Function(function) => write!(f, "{}", function),
            Object::Builtin(_) => write!(f, "builtin function"),
            Object::Return(obj) => write!(f, "{}", obj),
            Object::Error(err) => write!(f, "ERROR: {}", err),
        }
    }
}

impl Object {
    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Null => false,
            Object::Boolean(b) => *b,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Boolean(_) => "BOOLEAN",
            Object::Integer(_) => "INTEGER",
            Object::Null => "NULL",
            Object::Return(_) => "RETURN_VALUE",
            Object::Function(_) => "FUNCTION",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Builtin(_) => "BUILTIN",
            Object::Error(_) => "ERROR",
        }
    }

    /// The canonical key for this value, or `None` when it cannot be used as one.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Object::Integer(v) => Some(HashKey::Integer(*v)),
            Object::Boolean(b) => Some(HashKey::Boolean(*b)),
            Object::String(s) => Some(HashKey::String(s.clone())),
            _ => None,
        }
    }

    /// Identity comparison: canonical singletons match by value, composites by allocation.
    pub fn is_identical(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Array(a), Object::Array(b)) => Rc::ptr_eq(a, b),
            (Object::Hash(a), Object::Hash(b)) => Rc::ptr_eq(a, b),
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

pub fn native_bool_to_object(value: bool) -> Object {
    if value {
        TRUE
    } else {
        FALSE
    }
}

/// Type tag plus primitive content; equal content always yields an equal key.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

/// The evaluated key is retained next to the value for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

pub type HashPairs = IndexMap<HashKey, HashPair>;

pub struct Function {
    pub parameters: Vec<String>,
    pub body: Rc<BlockStatement>,
    pub env: Env,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fn({}) {{\n{}\n}}", self.parameters.join(", "), self.body)
    }
}

// The captured environment may hold this very function, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body.to_string())
            .finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

pub type EvalResult = std::result::Result<Object, EvalError>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("not a function: {0}")]
    NotCallable(&'static str),
    #[error("unknown operator: {1} {0} {2}")]
    UnsupportedInfixOperator(InfixOperator, &'static str, &'static str),
    #[error("unknown operator: {0}{1}")]
    UnsupportedPrefixOperator(PrefixOperator, &'static str),
    #[error("type mismatch: {1} {0} {2}")]
    TypeMismatch(InfixOperator, &'static str, &'static str),
    #[error("division by zero")]
    DivisionByZero,
    #[error("index operator not supported: {0}")]
    UnsupportedIndex(&'static str),
    #[error("unusable as hash key: {0}")]
    UnusableHashKey(String),
    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongArgumentCount { got: usize, want: usize },
    #[error("argument to `{0}` not supported, got {1}")]
    UnsupportedArgument(&'static str, &'static str),
    #[error("argument to `{0}` must be ARRAY, got {1}")]
    ExpectedArray(&'static str, &'static str),
}

pub fn assert_argument_count(expected: usize, args: &[Object]) -> Result<(), EvalError> {
    if args.len() != expected {
        return Err(EvalError::WrongArgumentCount {
            got: args.len(),
            want: expected,
        });
    }

    Ok(())
}

use crate::ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement};
use crate::object::{
    builtins, native_bool_to_object, Env, Environment, EvalError, Function, HashPair, HashPairs,
    Object, NULL,
};
use std::{cell::RefCell, rc::Rc};
use thiserror::Error;
use tracing::{trace, warn};

/// Nested evaluations allowed before the evaluator gives up.
pub const DEFAULT_MAX_DEPTH: usize = 512;

// Remaining stack below which a nested evaluation moves to a fresh segment.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Failures that cannot be represented as a language value.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum FatalError {
    #[error("evaluation exceeded the maximum depth of {limit} nested calls and expressions")]
    DepthExceeded { limit: usize },
}

/// Why an evaluation stopped early.
enum Halt {
    Error(EvalError),
    Fatal(FatalError),
}

impl From<EvalError> for Halt {
    fn from(err: EvalError) -> Self {
        Halt::Error(err)
    }
}

impl From<FatalError> for Halt {
    fn from(err: FatalError) -> Self {
        Halt::Fatal(err)
    }
}

type EvalResult<T = Object> = std::result::Result<T, Halt>;

/// Evaluates `program` in `env` with the default depth bound.
///
/// Returns `Ok(None)` when the last statement surfaces no value, such as a `let`.
/// Language-level errors come back as `Ok(Some(Object::Error(..)))`.
pub fn eval(program: &Program, env: &Env) -> Result<Option<Object>, FatalError> {
    Evaluator::default().eval(program, env)
}

pub struct Evaluator {
    max_depth: usize,
    depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl Evaluator {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Evaluator {
            max_depth,
            depth: 0,
        }
    }

    pub fn eval(&mut self, program: &Program, env: &Env) -> Result<Option<Object>, FatalError> {
        self.depth = 0;

        match self.eval_program(program, env) {
            Ok(obj) => Ok(obj),
            Err(Halt::Error(err)) => Ok(Some(Object::Error(err))),
            Err(Halt::Fatal(err)) => {
                warn!(%err, "evaluation aborted");
                Err(err)
            }
        }
    }

    fn eval_program(&mut self, program: &Program, env: &Env) -> EvalResult<Option<Object>> {
        let mut res = None;

        for statement in &program.statements {
            match self.eval_statement(statement, env)? {
                Some(Object::Return(value)) => return Ok(Some(*value)),
                obj => res = obj,
            }
        }

        Ok(res)
    }

    fn eval_block_statement(&mut self, block: &BlockStatement, env: &Env) -> EvalResult {
        let mut res = NULL;

        for statement in &block.statements {
            res = self.eval_statement(statement, env)?.unwrap_or(NULL);

            if let Object::Return(_) = res {
                return Ok(res);
            }
        }

        Ok(res)
    }

    /// `None` for statements that leave nothing behind.
    fn eval_statement(&mut self, statement: &Statement, env: &Env) -> EvalResult<Option<Object>> {
        match statement {
            Statement::Expression(exp) => self.eval_expression(exp, env).map(Some),
            Statement::Return(Some(exp)) => {
                let value = self.eval_expression(exp, env)?;
                Ok(Some(Object::Return(Box::new(value))))
            }
            Statement::Return(None) => Ok(Some(Object::Return(Box::new(NULL)))),
            Statement::Let(name, exp) => {
                let value = self.eval_expression(exp, env)?;
                env.borrow_mut().set(name, value);
                Ok(None)
            }
        }
    }

    fn eval_expression(&mut self, expression: &Expression, env: &Env) -> EvalResult {
        if self.depth >= self.max_depth {
            return Err(FatalError::DepthExceeded {
                limit: self.max_depth,
            }
            .into());
        }

        self.depth += 1;
        let res = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.eval_nested_expression(expression, env)
        });
        self.depth -= 1;

        res
    }

    fn eval_nested_expression(&mut self, expression: &Expression, env: &Env) -> EvalResult {
        match expression {
            Expression::IntegerLiteral(v) => Ok(Object::Integer(*v)),
            Expression::Boolean(b) => Ok(native_bool_to_object(*b)),
            Expression::StringLiteral(s) => Ok(Object::String(s.clone())),
            Expression::Identifier(name) => eval_identifier(name, env),
            Expression::Prefix(operator, right) => {
                let right = self.eval_expression(right, env)?;
                Ok(eval_prefix_expression(*operator, right)?)
            }
            Expression::Infix(operator, left, right) => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                Ok(eval_infix_expression(*operator, left, right)?)
            }
            Expression::If(condition, consequence, alternative) => {
                let condition = self.eval_expression(condition, env)?;

                if condition.is_truthy() {
                    self.eval_block_statement(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block_statement(alternative, env)
                } else {
                    Ok(NULL)
                }
            }
            Expression::FunctionLiteral(parameters, body) => {
                Ok(Object::Function(Rc::new(Function {
                    parameters: parameters.clone(),
                    body: Rc::clone(body),
                    env: Rc::clone(env),
                })))
            }
            Expression::Call(function, arguments) => {
                let function = self.eval_expression(function, env)?;
                let args = self.eval_expressions(arguments, env)?;
                self.apply_function(function, args)
            }
            Expression::ArrayLiteral(elements) => {
                let elements = self.eval_expressions(elements, env)?;
                Ok(Object::Array(Rc::new(elements)))
            }
            Expression::Index(left, index) => {
                let left = self.eval_expression(left, env)?;
                let index = self.eval_expression(index, env)?;
                Ok(eval_index_expression(left, index)?)
            }
            Expression::HashLiteral(pairs) => self.eval_hash_literal(pairs, env),
        }
    }

    fn eval_expressions(&mut self, expressions: &[Expression], env: &Env) -> EvalResult<Vec<Object>> {
        expressions
            .iter()
            .map(|exp| self.eval_expression(exp, env))
            .collect()
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expression, Expression)], env: &Env) -> EvalResult {
        let mut res = HashPairs::with_capacity(pairs.len());

        for (key_expression, value_expression) in pairs {
            let key = self.eval_expression(key_expression, env)?;
            let hash_key = key
                .hash_key()
                .ok_or_else(|| EvalError::UnusableHashKey(key.to_string()))?;

            let value = self.eval_expression(value_expression, env)?;
            res.insert(hash_key, HashPair { key, value });
        }

        Ok(Object::Hash(Rc::new(res)))
    }

    fn apply_function(&mut self, function: Object, args: Vec<Object>) -> EvalResult {
        match function {
            Object::Function(function) => {
                if args.len() != function.parameters.len() {
                    return Err(EvalError::WrongArgumentCount {
                        got: args.len(),
                        want: function.parameters.len(),
                    }
                    .into());
                }

                trace!(parameters = ?function.parameters, depth = self.depth, "calling function");

                let mut scope = Environment::new_enclosed(Rc::clone(&function.env));
                for (parameter, arg) in function.parameters.iter().zip(args) {
                    scope.set(parameter, arg);
                }
                let scope = Rc::new(RefCell::new(scope));

                match self.eval_block_statement(&function.body, &scope)? {
                    Object::Return(value) => Ok(*value),
                    obj => Ok(obj),
                }
            }
            Object::Builtin(builtin) => {
                trace!(name = builtin.name, "calling builtin");
                Ok(builtin.call(args)?)
            }
            other => Err(EvalError::NotCallable(other.type_name()).into()),
        }
    }
}

fn eval_identifier(name: &str, env: &Env) -> EvalResult {
    if let Some(obj) = env.borrow().get(name) {
        return Ok(obj);
    }

    builtins::lookup(name).ok_or_else(|| EvalError::IdentifierNotFound(name.to_owned()).into())
}

fn eval_prefix_expression(operator: PrefixOperator, right: Object) -> Result<Object, EvalError> {
    match (operator, right) {
        (PrefixOperator::Bang, right) => Ok(native_bool_to_object(!right.is_truthy())),
        (PrefixOperator::Minus, Object::Integer(v)) => Ok(Object::Integer(v.wrapping_neg())),
        (PrefixOperator::Minus, right) => Err(EvalError::UnsupportedPrefixOperator(
            operator,
            right.type_name(),
        )),
    }
}

fn eval_infix_expression(
    operator: InfixOperator,
    left: Object,
    right: Object,
) -> Result<Object, EvalError> {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Object::String(l), Object::String(r)) => match operator {
            InfixOperator::Plus => Ok(Object::String(format!("{}{}", l, r))),
            _ => Err(EvalError::UnsupportedInfixOperator(
                operator,
                left.type_name(),
                right.type_name(),
            )),
        },
        _ => match operator {
            InfixOperator::Eq => Ok(native_bool_to_object(left.is_identical(&right))),
            InfixOperator::NotEq => Ok(native_bool_to_object(!left.is_identical(&right))),
            _ if left.type_name() != right.type_name() => Err(EvalError::TypeMismatch(
                operator,
                left.type_name(),
                right.type_name(),
            )),
            _ => Err(EvalError::UnsupportedInfixOperator(
                operator,
                left.type_name(),
                right.type_name(),
            )),
        },
    }
}

fn eval_integer_infix_expression(
    operator: InfixOperator,
    left: i64,
    right: i64,
) -> Result<Object, EvalError> {
    let res = match operator {
        InfixOperator::Plus => Object::Integer(left.wrapping_add(right)),
        InfixOperator::Minus => Object::Integer(left.wrapping_sub(right)),
        InfixOperator::Asterisk => Object::Integer(left.wrapping_mul(right)),
        InfixOperator::Slash if right == 0 => return Err(EvalError::DivisionByZero),
        InfixOperator::Slash => Object::Integer(left.wrapping_div(right)),
        InfixOperator::Lt => native_bool_to_object(left < right),
        InfixOperator::Gt => native_bool_to_object(left > right),
        InfixOperator::Eq => native_bool_to_object(left == right),
        InfixOperator::NotEq => native_bool_to_object(left != right),
    };

    Ok(res)
}

fn eval_index_expression(left: Object, index: Object) -> Result<Object, EvalError> {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(NULL)),
        (Object::Hash(pairs), _) => {
            let key = index
                .hash_key()
                .ok_or_else(|| EvalError::UnusableHashKey(index.type_name().to_owned()))?;

            Ok(pairs.get(&key).map(|pair| pair.value.clone()).unwrap_or(NULL))
        }
        _ => Err(EvalError::UnsupportedIndex(left.type_name())),
    }
}

use crate::evaluator::{Evaluator, FatalError};
use crate::lexer::Lexer;
use crate::object::{Env, Environment, Object};
use crate::parser::Parser;
use std::{cell::RefCell, rc::Rc};
use tracing::debug;

/// What running one chunk of source produced.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The chunk did not parse; nothing was evaluated.
    Diagnostics(Vec<String>),
    Value(Object),
    Nothing,
}

/// A global scope that survives between chunks, as in a REPL.
pub struct Session {
    env: Env,
    evaluator: Evaluator,
}

impl Default for Session {
    fn default() -> Self {
        Session::with_evaluator(Evaluator::default())
    }
}

impl Session {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Session::with_evaluator(Evaluator::with_max_depth(max_depth))
    }

    fn with_evaluator(evaluator: Evaluator) -> Self {
        Session {
            env: Rc::new(RefCell::new(Environment::new())),
            evaluator,
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn run(&mut self, source: &str) -> Result<Outcome, FatalError> {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();

        if !parser.errors().is_empty() {
            debug!(count = parser.errors().len(), "rejecting chunk with parse errors");
            return Ok(Outcome::Diagnostics(
                parser.errors().iter().map(|err| err.to_string()).collect(),
            ));
        }

        Ok(match self.evaluator.eval(&program, &self.env)? {
            Some(obj) => Outcome::Value(obj),
            None => Outcome::Nothing,
        })
    }
}

use std::mem;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::ast::{
    BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement,
};
use crate::lexer::Lexer;
use crate::token::Token;

type Result<T> = std::result::Result<T, ParserError>;

/// Deepest chain of nested expressions the parser will follow.
pub const MAX_NESTING: usize = 256;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParserError {
    #[error("no prefix parse function for {0} found")]
    NoPrefixParseFn(&'static str),
    #[error("expected next token to be {expected}, got {got}")]
    UnexpectedToken {
        expected: &'static str,
        got: &'static str,
    },
    #[error("could not parse {0} as integer")]
    InvalidInteger(String),
    #[error("expression nesting exceeds {0} levels")]
    NestingTooDeep(usize),
}

/// Binding strength of an operator, weakest first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

fn precedence_of(token: &Token) -> Precedence {
    match token {
        Token::Eq | Token::NotEq => Precedence::Equals,
        Token::Lt | Token::Gt => Precedence::LessGreater,
        Token::Plus | Token::Minus => Precedence::Sum,
        Token::Asterisk | Token::Slash => Precedence::Product,
        Token::OpenParen | Token::OpenBracket => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

fn infix_operator(token: &Token) -> Option<InfixOperator> {
    match token {
        Token::Plus => Some(InfixOperator::Plus),
        Token::Minus => Some(InfixOperator::Minus),
        Token::Asterisk => Some(InfixOperator::Asterisk),
        Token::Slash => Some(InfixOperator::Slash),
        Token::Lt => Some(InfixOperator::Lt),
        Token::Gt => Some(InfixOperator::Gt),
        Token::Eq => Some(InfixOperator::Eq),
        Token::NotEq => Some(InfixOperator::NotEq),
        _ => None,
    }
}

type PrefixParseFn<'a> = fn(&mut Parser<'a>) -> Result<Expression>;
type InfixParseFn<'a> = fn(&mut Parser<'a>, Expression) -> Result<Expression>;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<ParserError>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let mut p = Parser {
            lexer,
            cur_token: Token::Eof,
            peek_token: Token::Eof,
            errors: vec![],
            depth: 0,
        };

        // Read 2 tokens so that cur_token and peek_token are both initialised
        p.next_token();
        p.next_token();

        p
    }

    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.cur_token = mem::replace(&mut self.peek_token, next);
    }

    fn record(&mut self, err: ParserError) {
        debug!(error = %err, "parse error");
        self.errors.push(err);
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = vec![];

        while self.cur_token != Token::Eof {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => self.record(err),
            }
            self.next_token();
        }

        Program { statements }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.cur_token {
            Token::Let => self.parse_let_statement(),
            Token::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Statement> {
        let name = self.expect_peek_ident()?;
        self.expect_peek(Token::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Statement::Let(name, value))
    }

    fn parse_return_statement(&mut self) -> Result<Statement> {
        match self.peek_token {
            Token::SemiColon => {
                self.next_token();
                return Ok(Statement::Return(None));
            }
            Token::CloseBrace | Token::Eof => return Ok(Statement::Return(None)),
            _ => {}
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Statement::Return(Some(value)))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Statement::Expression(expression))
    }

    fn skip_semicolon(&mut self) {
        if self.peek_token == Token::SemiColon {
            self.next_token();
        }
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut statements = vec![];

        self.next_token();

        while self.cur_token != Token::CloseBrace && self.cur_token != Token::Eof {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => self.record(err),
            }
            self.next_token();
        }

        BlockStatement { statements }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression> {
        if self.depth >= MAX_NESTING {
            return Err(ParserError::NestingTooDeep(MAX_NESTING));
        }

        let entry_depth = self.depth;
        self.depth += 1;
        let expression = self.parse_operators(precedence);
        self.depth = entry_depth;

        expression
    }

    fn parse_operators(&mut self, precedence: Precedence) -> Result<Expression> {
        let prefix = self
            .prefix_rule()
            .ok_or_else(|| ParserError::NoPrefixParseFn(self.cur_token.category()))?;
        let mut left = prefix(self)?;

        while self.peek_token != Token::SemiColon && precedence < self.peek_precedence() {
            let infix = match self.infix_rule() {
                Some(infix) => infix,
                None => return Ok(left),
            };

            // Every fold wraps `left` one level deeper.
            if self.depth >= MAX_NESTING {
                return Err(ParserError::NestingTooDeep(MAX_NESTING));
            }
            self.depth += 1;

            self.next_token();
            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn prefix_rule(&self) -> Option<PrefixParseFn<'a>> {
        let rule: PrefixParseFn<'a> = match self.cur_token {
            Token::Ident(_) => Self::parse_identifier,
            Token::Int(_) => Self::parse_integer_literal,
            Token::String(_) => Self::parse_string_literal,
            Token::True | Token::False => Self::parse_boolean,
            Token::Bang | Token::Minus => Self::parse_prefix_expression,
            Token::OpenParen => Self::parse_grouped_expression,
            Token::OpenBracket => Self::parse_array_literal,
            Token::OpenBrace => Self::parse_hash_literal,
            Token::If => Self::parse_if_expression,
            Token::Function => Self::parse_function_literal,
            _ => return None,
        };
        Some(rule)
    }

    fn infix_rule(&self) -> Option<InfixParseFn<'a>> {
        let rule: InfixParseFn<'a> = match self.peek_token {
            Token::Plus
            | Token::Minus
            | Token::Asterisk
            | Token::Slash
            | Token::Lt
            | Token::Gt
            | Token::Eq
            | Token::NotEq => Self::parse_infix_expression,
            Token::OpenParen => Self::parse_call_expression,
            Token::OpenBracket => Self::parse_index_expression,
            _ => return None,
        };
        Some(rule)
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(&self.peek_token)
    }

    fn cur_precedence(&self) -> Precedence {
        precedence_of(&self.cur_token)
    }

    fn no_prefix_parse_fn(&self) -> ParserError {
        ParserError::NoPrefixParseFn(self.cur_token.category())
    }

    fn parse_identifier(&mut self) -> Result<Expression> {
        match &self.cur_token {
            Token::Ident(name) => Ok(Expression::Identifier(name.clone())),
            _ => Err(self.no_prefix_parse_fn()),
        }
    }

    fn parse_integer_literal(&mut self) -> Result<Expression> {
        match &self.cur_token {
            Token::Int(digits) => digits
                .parse()
                .map(Expression::IntegerLiteral)
                .map_err(|_| ParserError::InvalidInteger(digits.clone())),
            _ => Err(self.no_prefix_parse_fn()),
        }
    }

    fn parse_string_literal(&mut self) -> Result<Expression> {
        match &self.cur_token {
            Token::String(s) => Ok(Expression::StringLiteral(s.clone())),
            _ => Err(self.no_prefix_parse_fn()),
        }
    }

    fn parse_boolean(&mut self) -> Result<Expression> {
        Ok(Expression::Boolean(self.cur_token == Token::True))
    }

    fn parse_prefix_expression(&mut self) -> Result<Expression> {
        let operator = match self.cur_token {
            Token::Bang => PrefixOperator::Bang,
            Token::Minus => PrefixOperator::Minus,
            _ => return Err(self.no_prefix_parse_fn()),
        };

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix(operator, Box::new(right)))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Result<Expression> {
        let operator = infix_operator(&self.cur_token).ok_or_else(|| self.no_prefix_parse_fn())?;
        let precedence = self.cur_precedence();

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Ok(Expression::Infix(operator, Box::new(left), Box::new(right)))
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::CloseParen)?;

        Ok(expression)
    }

    fn parse_if_expression(&mut self) -> Result<Expression> {
        self.expect_peek(Token::OpenParen)?;
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(Token::CloseParen)?;
        self.expect_peek(Token::OpenBrace)?;

        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token == Token::Else {
            self.next_token();
            self.expect_peek(Token::OpenBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };

        Ok(Expression::If(Box::new(condition), consequence, alternative))
    }

    fn parse_function_literal(&mut self) -> Result<Expression> {
        self.expect_peek(Token::OpenParen)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(Token::OpenBrace)?;
        let body = self.parse_block_statement();

        Ok(Expression::FunctionLiteral(parameters, Rc::new(body)))
    }

    fn parse_function_parameters(&mut self) -> Result<Vec<String>> {
        let mut identifiers = vec![];

        if self.peek_token == Token::CloseParen {
            self.next_token();
            return Ok(identifiers);
        }

        identifiers.push(self.expect_peek_ident()?);

        while self.peek_token == Token::Comma {
            self.next_token();
            identifiers.push(self.expect_peek_ident()?);
        }

        self.expect_peek(Token::CloseParen)?;

        Ok(identifiers)
    }

    fn parse_array_literal(&mut self) -> Result<Expression> {
        let elements = self.parse_expression_list(Token::CloseBracket)?;

        Ok(Expression::ArrayLiteral(elements))
    }

    fn parse_hash_literal(&mut self) -> Result<Expression> {
        let mut pairs = vec![];

        while self.peek_token != Token::CloseBrace {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            self.expect_peek(Token::Colon)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if self.peek_token != Token::CloseBrace {
                self.expect_peek(Token::Comma)?;
            }
        }

        self.expect_peek(Token::CloseBrace)?;

        Ok(Expression::HashLiteral(pairs))
    }

    fn parse_call_expression(&mut self, function: Expression) -> Result<Expression> {
        let arguments = self.parse_expression_list(Token::CloseParen)?;

        Ok(Expression::Call(Box::new(function), arguments))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Result<Expression> {
        self.next_token();

        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::CloseBracket)?;

        Ok(Expression::Index(Box::new(left), Box::new(index)))
    }

    fn parse_expression_list(&mut self, end: Token) -> Result<Vec<Expression>> {
        let mut list = vec![];

        if self.peek_token == end {
            self.next_token();
            return Ok(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token == Token::Comma {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;

        Ok(list)
    }

    fn expect_peek(&mut self, token: Token) -> Result<()> {
        if self.peek_token != token {
            return Err(ParserError::UnexpectedToken {
                expected: token.category(),
                got: self.peek_token.category(),
            });
        }

        self.next_token();
        Ok(())
    }

    fn expect_peek_ident(&mut self) -> Result<String> {
        let name = match &self.peek_token {
            Token::Ident(name) => name.clone(),
            other => {
                return Err(ParserError::UnexpectedToken {
                    expected: "IDENT",
                    got: other.category(),
                })
            }
        };

        self.next_token();
        Ok(name)
    }
}

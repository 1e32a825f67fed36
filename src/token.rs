use std::fmt;

/// Enum representing common lexeme types.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Token {
    Illegal(char),
    Eof,

    Ident(String),
    /// Digits are kept as written; the parser decides whether they fit.
    Int(String),
    String(String),

    /// "="
    Assign,
    /// "+"
    Plus,
    /// "-"
    Minus,
    /// "!"
    Bang,
    /// "*"
    Asterisk,
    /// "/"
    Slash,
    /// "<"
    Lt,
    /// ">"
    Gt,
    /// "=="
    Eq,
    /// "!="
    NotEq,
    /// "("
    OpenParen,
    /// ")"
    CloseParen,
    /// "{"
    OpenBrace,
    /// "}"
    CloseBrace,
    /// "["
    OpenBracket,
    /// "]"
    CloseBracket,
    /// ","
    Comma,
    /// ";"
    SemiColon,
    /// ":"
    Colon,

    // Keywords
    /// "fn"
    Function,
    /// "let"
    Let,
    /// "if"
    If,
    /// "else"
    Else,
    /// "true"
    True,
    /// "false"
    False,
    /// "return"
    Return,
}

impl Token {
    /// The category name reported in parser diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            Token::Illegal(_) => "ILLEGAL",
            Token::Eof => "EOF",
            Token::Ident(_) => "IDENT",
            Token::Int(_) => "INT",
            Token::String(_) => "STRING",
            Token::Assign => "=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Bang => "!",
            Token::Asterisk => "*",
            Token::Slash => "/",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Eq => "==",
            Token::NotEq => "!=",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::OpenBrace => "{",
            Token::CloseBrace => "}",
            Token::OpenBracket => "[",
            Token::CloseBracket => "]",
            Token::Comma => ",",
            Token::SemiColon => ";",
            Token::Colon => ":",
            Token::Function => "FUNCTION",
            Token::Let => "LET",
            Token::If => "IF",
            Token::Else => "ELSE",
            Token::True => "TRUE",
            Token::False => "FALSE",
            Token::Return => "RETURN",
        }
    }

    /// The source text this token was scanned from.
    pub fn literal(&self) -> String {
        match self {
            Token::Illegal(c) => c.to_string(),
            Token::Eof => String::new(),
            Token::Ident(s) | Token::Int(s) | Token::String(s) => s.clone(),
            Token::Function => "fn".to_owned(),
            Token::Let => "let".to_owned(),
            Token::If => "if".to_owned(),
            Token::Else => "else".to_owned(),
            Token::True => "true".to_owned(),
            Token::False => "false".to_owned(),
            Token::Return => "return".to_owned(),
            other => other.category().to_owned(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.category())
    }
}

pub fn lookup_ident(ident: &str) -> Token {
    keyword_to_token(ident).unwrap_or_else(|| Token::Ident(ident.to_owned()))
}

fn keyword_to_token(keyword: &str) -> Option<Token> {
    match keyword {
        "fn" => Some(Token::Function),
        "let" => Some(Token::Let),
        "if" => Some(Token::If),
        "else" => Some(Token::Else),
        "true" => Some(Token::True),
        "false" => Some(Token::False),
        "return" => Some(Token::Return),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{lookup_ident, Token};

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(lookup_ident("fn"), Token::Function);
        assert_eq!(lookup_ident("return"), Token::Return);
        assert_eq!(lookup_ident("fnord"), Token::Ident("fnord".to_owned()));
    }

    #[test]
    fn categories_and_literals() {
        assert_eq!(Token::Ident("x".to_owned()).category(), "IDENT");
        assert_eq!(Token::Function.category(), "FUNCTION");
        assert_eq!(Token::Function.literal(), "fn");
        assert_eq!(Token::NotEq.literal(), "!=");
        assert_eq!(Token::Eof.literal(), "");
    }
}

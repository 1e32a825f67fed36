use std::iter::Peekable;
use std::str::Chars;

use crate::token;
use crate::token::Token;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    fn read_char(&mut self) -> Option<char> {
        self.input.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    /// Consumes the next character when it satisfies `predicate`.
    fn read_char_if<F>(&mut self, predicate: F) -> Option<char>
    where
        F: FnOnce(char) -> bool,
    {
        self.input.next_if(|&c| predicate(c))
    }

    fn read_while<F>(&mut self, first: Option<char>, predicate: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut res: String = first.into_iter().collect();

        while let Some(c) = self.read_char_if(&predicate) {
            res.push(c);
        }

        res
    }

    fn read_string(&mut self) -> String {
        let res = self.read_while(None, |c| c != '"');

        // Consume the closing '"', if the input has one
        self.read_char();

        res
    }

    fn skip_whitespace(&mut self) {
        while self.read_char_if(is_whitespace).is_some() {}
    }

    fn either(&mut self, next: char, matched: Token, otherwise: Token) -> Token {
        if self.peek_char() == Some(next) {
            self.read_char();
            matched
        } else {
            otherwise
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.read_char() {
            Some('=') => self.either('=', Token::Eq, Token::Assign),
            Some('!') => self.either('=', Token::NotEq, Token::Bang),
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Asterisk,
            Some('/') => Token::Slash,
            Some('<') => Token::Lt,
            Some('>') => Token::Gt,
            Some('(') => Token::OpenParen,
            Some(')') => Token::CloseParen,
            Some('{') => Token::OpenBrace,
            Some('}') => Token::CloseBrace,
            Some('[') => Token::OpenBracket,
            Some(']') => Token::CloseBracket,
            Some(',') => Token::Comma,
            Some(';') => Token::SemiColon,
            Some(':') => Token::Colon,
            Some('"') => Token::String(self.read_string()),
            Some(c) if is_letter(c) => token::lookup_ident(&self.read_while(Some(c), is_letter)),
            Some(c) if c.is_ascii_digit() => {
                Token::Int(self.read_while(Some(c), |c| c.is_ascii_digit()))
            }
            Some(c) => Token::Illegal(c),
            None => Token::Eof,
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;
    use crate::token::Token;

    fn test_lexing(input: &str, expected_tokens: Vec<Token>) {
        let mut l = Lexer::new(input);

        for expected in expected_tokens {
            let actual = l.next_token();

            assert_eq!(expected, actual);
        }
    }

    fn ident(name: &str) -> Token {
        Token::Ident(name.to_owned())
    }

    fn int(digits: &str) -> Token {
        Token::Int(digits.to_owned())
    }

    #[test]
    fn test_next_token() {
        test_lexing(
            "=+(){},;",
            vec![
                Token::Assign,
                Token::Plus,
                Token::OpenParen,
                Token::CloseParen,
                Token::OpenBrace,
                Token::CloseBrace,
                Token::Comma,
                Token::SemiColon,
                Token::Eof,
            ],
        );
    }

    #[test]
    fn eof_is_sticky() {
        test_lexing("x", vec![ident("x"), Token::Eof, Token::Eof, Token::Eof]);
    }

    #[test]
    fn illegal_characters_become_tokens() {
        test_lexing(
            "a @ 1 # b",
            vec![
                ident("a"),
                Token::Illegal('@'),
                int("1"),
                Token::Illegal('#'),
                ident("b"),
                Token::Eof,
            ],
        );
    }

    #[test]
    fn identifiers_stop_at_digits() {
        test_lexing(
            "foo_bar x1",
            vec![ident("foo_bar"), ident("x"), int("1"), Token::Eof],
        );
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        test_lexing(
            "\"abc",
            vec![Token::String("abc".to_owned()), Token::Eof],
        );
    }

    #[test]
    fn test_next_token_on_monkey() {
        test_lexing(
            r#"let five = 5;

let ten = 10;

let add = fn( x, y) {
    x + y;
};

let result = add( five, ten);

!-/* 5;
5 < 10 > 5;

if (5 < 10) {
    return true;
} else {
    return false;
}

10 == 10;

10 != 9;
"foobar"
"foo bar"
[1, 2]
{"foo": "bar"}
"#,
            vec![
                Token::Let,
                ident("five"),
                Token::Assign,
                int("5"),
                Token::SemiColon,
                Token::Let,
                ident("ten"),
                Token::Assign,
                int("10"),
                Token::SemiColon,
                Token::Let,
                ident("add"),
                Token::Assign,
                Token::Function,
                Token::OpenParen,
                ident("x"),
                Token::Comma,
                ident("y"),
                Token::CloseParen,
                Token::OpenBrace,
                ident("x"),
                Token::Plus,
                ident("y"),
                Token::SemiColon,
                Token::CloseBrace,
                Token::SemiColon,
                Token::Let,
                ident("result"),
                Token::Assign,
                ident("add"),
                Token::OpenParen,
                ident("five"),
                Token::Comma,
                ident("ten"),
                Token::CloseParen,
                Token::SemiColon,
                Token::Bang,
                Token::Minus,
                Token::Slash,
                Token::Asterisk,
                int("5"),
                Token::SemiColon,
                int("5"),
                Token::Lt,
                int("10"),
                Token::Gt,
                int("5"),
                Token::SemiColon,
                Token::If,
                Token::OpenParen,
                int("5"),
                Token::Lt,
                int("10"),
                Token::CloseParen,
                Token::OpenBrace,
                Token::Return,
                Token::True,
                Token::SemiColon,
                Token::CloseBrace,
                Token::Else,
                Token::OpenBrace,
                Token::Return,
                Token::False,
                Token::SemiColon,
                Token::CloseBrace,
                int("10"),
                Token::Eq,
                int("10"),
                Token::SemiColon,
                int("10"),
                Token::NotEq,
                int("9"),
                Token::SemiColon,
                Token::String("foobar".to_owned()),
                Token::String("foo bar".to_owned()),
                Token::OpenBracket,
                int("1"),
                Token::Comma,
                int("2"),
                Token::CloseBracket,
                Token::OpenBrace,
                Token::String("foo".to_owned()),
                Token::Colon,
                Token::String("bar".to_owned()),
                Token::CloseBrace,
                Token::Eof,
            ],
        );
    }
}

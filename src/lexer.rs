use crate::token::{look_up_ident, Token, TokenType};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    read_position: usize,
    // `None` once the input is exhausted
    ch: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut l = Lexer {
            input: input.chars().collect(),
            position: 0,
            read_position: 0,
            ch: None,
        };
        l.read_char();
        l
    }

    /// Produces the next token. Once the input is exhausted every call
    /// yields `Eof`.
    pub fn next_token(&mut self) -> Token {
        self.skip_white_space();

        let ch = match self.ch {
            Some(ch) => ch,
            None => return Token::new(TokenType::Eof, ""),
        };

        let tok = match ch {
            '=' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    Token::new(TokenType::Eq, "==")
                } else {
                    new_token(TokenType::Assign, ch)
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    Token::new(TokenType::NotEq, "!=")
                } else {
                    new_token(TokenType::Bang, ch)
                }
            }
            '+' => new_token(TokenType::Plus, ch),
            '-' => new_token(TokenType::Minus, ch),
            '*' => new_token(TokenType::Asterisk, ch),
            '/' => new_token(TokenType::Slash, ch),
            '<' => new_token(TokenType::Lt, ch),
            '>' => new_token(TokenType::Gt, ch),
            ';' => new_token(TokenType::Semicolon, ch),
            ':' => new_token(TokenType::Colon, ch),
            ',' => new_token(TokenType::Comma, ch),
            '{' => new_token(TokenType::LBrace, ch),
            '}' => new_token(TokenType::RBrace, ch),
            '(' => new_token(TokenType::LParen, ch),
            ')' => new_token(TokenType::RParen, ch),
            '[' => new_token(TokenType::LBracket, ch),
            ']' => new_token(TokenType::RBracket, ch),
            '"' => Token::new(TokenType::String, self.read_string()),
            _ => {
                if is_letter(ch) {
                    let literal = self.read_identifier();
                    return Token::new(look_up_ident(&literal), literal);
                } else if is_digit(ch) {
                    return Token::new(TokenType::Int, self.read_number());
                } else {
                    new_token(TokenType::Illegal, ch)
                }
            }
        };
        self.read_char();

        tok
    }

    fn skip_white_space(&mut self) {
        while matches!(self.ch, Some(' ' | '\t' | '\n' | '\r')) {
            self.read_char();
        }
    }

    fn read_char(&mut self) {
        self.ch = self.input.get(self.read_position).copied();
        self.position = self.read_position.min(self.input.len());
        self.read_position += 1;
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.read_position).copied()
    }

    fn read_identifier(&mut self) -> String {
        let position = self.position;
        // digits are allowed after the first character
        while self.ch.is_some_and(|ch| is_letter(ch) || is_digit(ch)) {
            self.read_char();
        }
        self.slice(position, self.position)
    }

    fn read_number(&mut self) -> String {
        let position = self.position;
        while self.ch.is_some_and(is_digit) {
            self.read_char();
        }
        self.slice(position, self.position)
    }

    // An unterminated string runs to the end of the input.
    fn read_string(&mut self) -> String {
        let position = self.position + 1;
        loop {
            self.read_char();
            if matches!(self.ch, Some('"') | None) {
                break;
            }
        }
        self.slice(position, self.position)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields tokens up to, but not including, `Eof`.
    fn next(&mut self) -> Option<Token> {
        let tok = self.next_token();
        if tok.token_type == TokenType::Eof {
            None
        } else {
            Some(tok)
        }
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn new_token(token_type: TokenType, ch: char) -> Token {
    Token::new(token_type, ch.to_string())
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;
    use crate::token::TokenType;

    #[test]
    fn test_lexer() {
        let input = r#"let five_1 = 5;
let add = fn(x, y) {
    x + y;
};

let result = add(five_1, 10);
!-/*5;
5 < 10 > 5;
if (5 < 10) {
    return true;
} else {
    return false;
}
10 == 10;
10 != 9;
"foo bar"
[1, 2];
{"foo": "bar"}"#;

        let expected_tokens = vec![
            (TokenType::Let, "let"),
            (TokenType::Ident, "five_1"),
            (TokenType::Assign, "="),
            (TokenType::Int, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::Let, "let"),
            (TokenType::Ident, "add"),
            (TokenType::Assign, "="),
            (TokenType::Function, "fn"),
            (TokenType::LParen, "("),
            (TokenType::Ident, "x"),
            (TokenType::Comma, ","),
            (TokenType::Ident, "y"),
            (TokenType::RParen, ")"),
            (TokenType::LBrace, "{"),
            (TokenType::Ident, "x"),
            (TokenType::Plus, "+"),
            (TokenType::Ident, "y"),
            (TokenType::Semicolon, ";"),
            (TokenType::RBrace, "}"),
            (TokenType::Semicolon, ";"),
            (TokenType::Let, "let"),
            (TokenType::Ident, "result"),
            (TokenType::Assign, "="),
            (TokenType::Ident, "add"),
            (TokenType::LParen, "("),
            (TokenType::Ident, "five_1"),
            (TokenType::Comma, ","),
            (TokenType::Int, "10"),
            (TokenType::RParen, ")"),
            (TokenType::Semicolon, ";"),
            (TokenType::Bang, "!"),
            (TokenType::Minus, "-"),
            (TokenType::Slash, "/"),
            (TokenType::Asterisk, "*"),
            (TokenType::Int, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::Int, "5"),
            (TokenType::Lt, "<"),
            (TokenType::Int, "10"),
            (TokenType::Gt, ">"),
            (TokenType::Int, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::If, "if"),
            (TokenType::LParen, "("),
            (TokenType::Int, "5"),
            (TokenType::Lt, "<"),
            (TokenType::Int, "10"),
            (TokenType::RParen, ")"),
            (TokenType::LBrace, "{"),
            (TokenType::Return, "return"),
            (TokenType::True, "true"),
            (TokenType::Semicolon, ";"),
            (TokenType::RBrace, "}"),
            (TokenType::Else, "else"),
            (TokenType::LBrace, "{"),
            (TokenType::Return, "return"),
            (TokenType::False, "false"),
            (TokenType::Semicolon, ";"),
            (TokenType::RBrace, "}"),
            (TokenType::Int, "10"),
            (TokenType::Eq, "=="),
            (TokenType::Int, "10"),
            (TokenType::Semicolon, ";"),
            (TokenType::Int, "10"),
            (TokenType::NotEq, "!="),
            (TokenType::Int, "9"),
            (TokenType::Semicolon, ";"),
            (TokenType::String, "foo bar"),
            (TokenType::LBracket, "["),
            (TokenType::Int, "1"),
            (TokenType::Comma, ","),
            (TokenType::Int, "2"),
            (TokenType::RBracket, "]"),
            (TokenType::Semicolon, ";"),
            (TokenType::LBrace, "{"),
            (TokenType::String, "foo"),
            (TokenType::Colon, ":"),
            (TokenType::String, "bar"),
            (TokenType::RBrace, "}"),
            (TokenType::Eof, ""),
        ];

        let mut l = Lexer::new(input);

        for (i, (exp_token_type, exp_literal)) in expected_tokens.iter().enumerate() {
            let tok = l.next_token();
            assert_eq!(tok.token_type, *exp_token_type, "test {}: wrong token type", i);
            assert_eq!(tok.literal, *exp_literal, "test {}: wrong literal", i);
        }
    }

    #[test]
    fn test_illegal_character() {
        let mut l = Lexer::new("a @ b");
        assert_eq!(l.next_token().token_type, TokenType::Ident);
        let tok = l.next_token();
        assert_eq!(tok.token_type, TokenType::Illegal);
        assert_eq!(tok.literal, "@");
        assert_eq!(l.next_token().literal, "b");
    }

    #[test]
    fn test_unterminated_string() {
        let mut l = Lexer::new(r#""abc def"#);
        let tok = l.next_token();
        assert_eq!(tok.token_type, TokenType::String);
        assert_eq!(tok.literal, "abc def");
        assert_eq!(l.next_token().token_type, TokenType::Eof);
        assert_eq!(l.next_token().token_type, TokenType::Eof);
    }

    #[test]
    fn test_nul_character() {
        let mut l = Lexer::new("1 \0 + 2");
        let tokens: Vec<(TokenType, String)> = std::iter::from_fn(|| Some(l.next_token()))
            .take(5)
            .map(|t| (t.token_type, t.literal))
            .collect();
        assert_eq!(tokens, vec![
            (TokenType::Int, "1".to_string()),
            (TokenType::Illegal, "\0".to_string()),
            (TokenType::Plus, "+".to_string()),
            (TokenType::Int, "2".to_string()),
            (TokenType::Eof, "".to_string()),
        ]);

        let mut l = Lexer::new("\"x\0y\" z");
        assert_eq!(l.next_token().literal, "x\0y");
        assert_eq!(l.next_token().literal, "z");
    }

    #[test]
    fn test_strings_are_not_escaped() {
        let mut l = Lexer::new(r#""a\nb""#);
        assert_eq!(l.next_token().literal, "a\\nb");
    }

    #[test]
    fn test_iterator_stops_before_eof() {
        let kinds: Vec<TokenType> = Lexer::new("let x = 1;").map(|t| t.token_type).collect();
        assert_eq!(kinds, vec![
            TokenType::Let,
            TokenType::Ident,
            TokenType::Assign,
            TokenType::Int,
            TokenType::Semicolon,
        ]);
    }
}

use crate::token::{Kind, Token};
use log::trace;

const TWO_CHAR_OPERATORS: [&[u8; 2]; 6] = [b"==", b"!=", b">=", b"<=", b"&&", b"||"];
const OPERATORS: &[u8] = b"+-*/%<>=!&|~";

/// Position of the lexer inside the source. Copied out and written back
/// when a compound keyword turns out not to match.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cursor {
    pos: usize,
    line: usize,
    column: usize,
}

/// Pull-based tokenizer. Every call to [`Lexer::next_token`] yields one token;
/// once the input is exhausted it keeps returning [`Kind::EOF`].
pub struct Lexer<'a> {
    bytes: &'a [u8],
    cursor: Cursor,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            cursor: Cursor {
                pos: 0,
                line: 1,
                column: 0,
            },
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.cursor.pos).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.bytes.get(self.cursor.pos + 1).copied()
    }

    /// Byte width of the character starting at `pos`, read from its leading byte.
    fn width_at(&self, pos: usize) -> usize {
        let width = utf8_width(self.bytes[pos]);
        width.min(self.bytes.len() - pos)
    }

    /// Consumes one whole character. Columns count characters, not bytes.
    fn advance(&mut self) -> Option<u8> {
        let first = self.peek()?;
        self.cursor.pos += self.width_at(self.cursor.pos);
        if first == b'\n' {
            self.cursor.line += 1;
            self.cursor.column = 0;
        } else {
            self.cursor.column += 1;
        }
        Some(first)
    }

    fn save(&self) -> Cursor {
        self.cursor
    }

    fn restore(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.bytes[start..end]).into_owned()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.advance();
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let line = self.cursor.line;
        let column = self.cursor.column + 1;

        let token = match self.peek() {
            None => Token::new(Kind::EOF, "", line, column),
            Some(b'"') => self.string(line, column),
            Some(b) if is_identifier_start(b) => self.identifier(line, column),
            Some(b) if b.is_ascii_digit() => self.number(line, column),
            Some(b) => self.symbol(b, line, column),
        };

        trace!("lexed {}", token);
        token
    }

    /// Collects every token up to and including the end-of-input token.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == Kind::EOF;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn string(&mut self, line: usize, column: usize) -> Token {
        self.advance(); // opening quote
        let start = self.cursor.pos;

        loop {
            match self.peek() {
                None => {
                    return Token::new(Kind::Error, "Unterminated string literal", line, column);
                }
                Some(b'"') => {
                    let value = self.text(start, self.cursor.pos);
                    self.advance();
                    return Token::new(Kind::String, value, line, column);
                }
                Some(b'\\') => {
                    self.advance();
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.cursor.pos;
        while let Some(b) = self.peek() {
            if !is_identifier_continue(b) {
                break;
            }
            self.advance();
        }
        self.text(start, self.cursor.pos)
    }

    fn identifier(&mut self, line: usize, column: usize) -> Token {
        let word = self.read_word();

        if let Some((second, kind)) = compound_keyword(&word) {
            let checkpoint = self.save();
            self.skip_whitespace();

            let matched = match self.peek() {
                Some(b) if is_identifier_start(b) => self.read_word() == second,
                _ => false,
            };

            if matched {
                return Token::new(kind, format!("{} {}", word, second), line, column);
            }
            self.restore(checkpoint);
        }

        let kind = keyword(&word).unwrap_or(Kind::Identifier);
        Token::new(kind, word, line, column)
    }

    fn number(&mut self, line: usize, column: usize) -> Token {
        let start = self.cursor.pos;
        self.skip_digits();

        if self.peek() == Some(b'.') && self.peek_next().map_or(false, |b| b.is_ascii_digit()) {
            self.advance();
            self.skip_digits();
        }

        Token::new(Kind::Number, self.text(start, self.cursor.pos), line, column)
    }

    fn skip_digits(&mut self) {
        while self.peek().map_or(false, |b| b.is_ascii_digit()) {
            self.advance();
        }
    }

    fn symbol(&mut self, first: u8, line: usize, column: usize) -> Token {
        if let Some(second) = self.peek_next() {
            if TWO_CHAR_OPERATORS.contains(&&[first, second]) {
                self.advance();
                self.advance();
                return Token::new(Kind::Operator, self.text(self.cursor.pos - 2, self.cursor.pos), line, column);
            }
        }

        let start = self.cursor.pos;
        self.advance();
        let value = self.text(start, self.cursor.pos);

        let kind = match first {
            b if OPERATORS.contains(&b) => Kind::Operator,
            b'(' => Kind::LParen,
            b')' => Kind::RParen,
            b'{' => Kind::LBrace,
            b'}' => Kind::RBrace,
            b',' => Kind::Comma,
            b';' => Kind::Semicolon,
            b':' => Kind::Colon,
            _ => Kind::Unknown,
        };

        Token::new(kind, value, line, column)
    }
}

/// Width in bytes of a UTF-8 character given its leading byte. Anything that
/// is not a valid leading byte counts as a single byte.
pub fn utf8_width(first_byte: u8) -> usize {
    if first_byte & 0x80 == 0 {
        1
    } else if first_byte & 0xE0 == 0xC0 {
        2
    } else if first_byte & 0xF0 == 0xE0 {
        3
    } else if first_byte & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

// Every non-ASCII character counts as a letter.
fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_identifier_continue(b: u8) -> bool {
    is_identifier_start(b) || b.is_ascii_digit()
}

pub fn keyword(word: &str) -> Option<Kind> {
    match word {
        "biến" => Some(Kind::Var),
        "nếu" => Some(Kind::If),
        "cho" => Some(Kind::For),
        "hàm" => Some(Kind::Function),
        "trả" => Some(Kind::Return),
        "đúng" | "sai" => Some(Kind::Boolean),
        _ => None,
    }
}

/// Second word and resulting kind for words that may open a two-word keyword.
fn compound_keyword(first: &str) -> Option<(&'static str, Kind)> {
    match first {
        "trong" => Some(("khi", Kind::While)),
        "không" => Some(("thì", Kind::Else)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Kind> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_single_tokens() {
        let cases = [
            ("abc", Kind::Identifier),
            ("_x1", Kind::Identifier),
            ("42", Kind::Number),
            ("3.14", Kind::Number),
            ("đúng", Kind::Boolean),
            ("sai", Kind::Boolean),
            ("biến", Kind::Var),
            ("nếu", Kind::If),
            ("cho", Kind::For),
            ("hàm", Kind::Function),
            ("trả", Kind::Return),
            ("==", Kind::Operator),
            ("&&", Kind::Operator),
            ("%", Kind::Operator),
            ("(", Kind::LParen),
            (")", Kind::RParen),
            ("{", Kind::LBrace),
            ("}", Kind::RBrace),
            (",", Kind::Comma),
            (";", Kind::Semicolon),
            (":", Kind::Colon),
            ("@", Kind::Unknown),
        ];

        for (source, kind) in cases {
            let token = Lexer::new(source).next_token();
            assert_eq!(token.kind, kind, "source {:?}", source);
            assert_eq!(token.value, source);
            assert_eq!((token.line, token.column), (1, 1));
        }
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, Kind::Identifier);
        for _ in 0..3 {
            assert_eq!(lexer.next_token().kind, Kind::EOF);
        }
    }

    #[test]
    fn test_columns_count_characters() {
        let mut lexer = Lexer::new("biến x");
        let var = lexer.next_token();
        let name = lexer.next_token();
        assert_eq!(var.column, 1);
        // "biến" is four characters but five bytes
        assert_eq!(name.column, 6);
    }

    #[test]
    fn test_newline_resets_column() {
        let mut lexer = Lexer::new("a\n  bb\nc");
        let a = lexer.next_token();
        let bb = lexer.next_token();
        let c = lexer.next_token();
        assert_eq!((a.line, a.column), (1, 1));
        assert_eq!((bb.line, bb.column), (2, 3));
        assert_eq!((c.line, c.column), (3, 1));
    }

    #[test]
    fn test_multibyte_identifier_is_one_token() {
        let tokens = Lexer::new("tổng_số2 + 1").tokenize();
        assert_eq!(tokens[0].kind, Kind::Identifier);
        assert_eq!(tokens[0].value, "tổng_số2");
        assert_eq!(tokens[1].column, 10);
    }

    #[test]
    fn test_compound_keywords() {
        let tokens = Lexer::new("trong khi không thì").tokenize();
        assert_eq!(tokens[0].kind, Kind::While);
        assert_eq!(tokens[0].value, "trong khi");
        assert_eq!(tokens[1].kind, Kind::Else);
        assert_eq!(tokens[1].value, "không thì");
        assert_eq!(tokens[1].column, 11);
        assert_eq!(tokens[2].kind, Kind::EOF);
    }

    #[test]
    fn test_compound_keyword_backtracks() {
        let tokens = Lexer::new("trong nhà").tokenize();
        assert_eq!(tokens[0].kind, Kind::Identifier);
        assert_eq!(tokens[0].value, "trong");
        assert_eq!(tokens[1].kind, Kind::Identifier);
        assert_eq!(tokens[1].value, "nhà");
        assert_eq!(tokens[1].column, 7);
        assert_eq!(tokens[2].kind, Kind::EOF);
    }

    #[test]
    fn test_compound_keyword_backtracks_before_symbol() {
        assert_eq!(kinds("không ;"), vec![Kind::Identifier, Kind::Semicolon, Kind::EOF]);
        assert_eq!(kinds("không"), vec![Kind::Identifier, Kind::EOF]);
        assert_eq!(kinds("trong khix"), vec![Kind::Identifier, Kind::Identifier, Kind::EOF]);
    }

    #[test]
    fn test_strings() {
        let token = Lexer::new("\"xin chào\"").next_token();
        assert_eq!(token.kind, Kind::String);
        assert_eq!(token.value, "xin chào");

        let token = Lexer::new(r#""a\"b""#).next_token();
        assert_eq!(token.kind, Kind::String);
        assert_eq!(token.value, r#"a\"b"#);
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("\"abc");
        let token = lexer.next_token();
        assert_eq!(token.kind, Kind::Error);
        assert_eq!(token.value, "Unterminated string literal");
        assert_eq!(lexer.next_token().kind, Kind::EOF);
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::new("1.5 7. 12").tokenize();
        assert_eq!(tokens[0].value, "1.5");
        assert_eq!(tokens[1].value, "7");
        assert_eq!(tokens[2].kind, Kind::Unknown);
        assert_eq!(tokens[2].value, ".");
        assert_eq!(tokens[3].value, "12");
    }

    #[test]
    fn test_operators() {
        let values: Vec<String> = Lexer::new("a<=b!c||d&e")
            .tokenize()
            .into_iter()
            .map(|t| t.value)
            .collect();
        assert_eq!(values, vec!["a", "<=", "b", "!", "c", "||", "d", "&", "e", ""]);
    }

    #[test]
    fn test_utf8_width() {
        assert_eq!(utf8_width(b'a'), 1);
        assert_eq!(utf8_width(0xC3), 2);
        assert_eq!(utf8_width(0xE1), 3);
        assert_eq!(utf8_width(0xF0), 4);
        assert_eq!(utf8_width(0x80), 1);
    }
}

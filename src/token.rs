use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub line: usize,
    pub column: usize,
    pub kind: Kind,
    pub value: String,
}

impl Token {
    pub fn new(kind: Kind, value: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            kind,
            value: value.into(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Kind {
    // Literals
    Identifier,
    Number,
    String,
    Boolean,    // đúng, sai

    // Operators
    Operator,   // + - * / % < > = ! & | ~ == != >= <= && ||

    // Brackets and delimiters
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    Comma,      // ,
    Semicolon,  // ;
    Colon,      // :

    // Keywords
    Var,        // biến
    If,         // nếu
    Else,       // không thì
    While,      // trong khi
    For,        // cho
    Function,   // hàm
    Return,     // trả

    EOF,
    Unknown,    // unrecognized character
    Error,      // malformed literal, value holds the message
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Identifier => "Identifier",
            Kind::Number => "Number",
            Kind::String => "String",
            Kind::Boolean => "Boolean",
            Kind::Operator => "Operator",
            Kind::LParen => "LParen",
            Kind::RParen => "RParen",
            Kind::LBrace => "LBrace",
            Kind::RBrace => "RBrace",
            Kind::Comma => "Comma",
            Kind::Semicolon => "Semicolon",
            Kind::Colon => "Colon",
            Kind::Var => "Var",
            Kind::If => "If",
            Kind::Else => "Else",
            Kind::While => "While",
            Kind::For => "For",
            Kind::Function => "Function",
            Kind::Return => "Return",
            Kind::EOF => "EndOfFile",
            Kind::Unknown => "Unknown",
            Kind::Error => "Error",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{} ({}) {:?}", self.line, self.column, self.kind, self.value)
    }
}

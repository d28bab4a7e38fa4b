use crate::ast::{Expr, LiteralKind, Parameter, Stmt};
use crate::error::{ErrorKind, ParseError};
use crate::lexer::Lexer;
use crate::symbol_table::{FunctionSymbol, SymbolTable, VariableSymbol};
use crate::token::{Kind, Token};
use crate::types::Type;
use log::debug;

/// Name of the function every program must define.
pub const ENTRY_POINT: &str = "chính";

const ASSIGNMENT_PRECEDENCE: u8 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub symbols: SymbolTable,
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    symbols: SymbolTable,
    current_function: Option<String>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self, ParseError> {
        let current = lexer.next_token();
        reject_error_token(&current)?;

        Ok(Self {
            lexer,
            current,
            symbols: SymbolTable::new(),
            current_function: None,
        })
    }

    /// Parses the whole source unit. The parser is consumed: one instance
    /// handles exactly one program.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();

        while !self.check(Kind::EOF) {
            body.push(self.parse_statement()?);
        }

        self.enforce_entry_point()?;
        debug!("parsed {} top-level statements", body.len());

        Ok(Program {
            body,
            symbols: self.symbols,
        })
    }

    /// Replaces the current token with the next one and returns the old one.
    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token();
        reject_error_token(&next)?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn check(&self, kind: Kind) -> bool {
        self.current.kind == kind
    }

    fn check_operator(&self, operator: &str) -> bool {
        self.current.kind == Kind::Operator && self.current.value == operator
    }

    fn match_token(&mut self, kind: Kind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: Kind, message: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(ParseError::syntax(&self.current, message))
        }
    }

    fn enforce_entry_point(&self) -> Result<(), ParseError> {
        let entry = self.symbols.get_function(ENTRY_POINT).ok_or_else(|| {
            ParseError::semantic(
                &self.current,
                format!("Program must define a '{}' function as the entry point.", ENTRY_POINT),
            )
        })?;

        if !entry.parameters.is_empty() {
            return Err(ParseError::semantic(
                &self.current,
                format!("'{}' function should not take parameters.", ENTRY_POINT),
            ));
        }

        if !entry.return_type.is_void() {
            return Err(ParseError::semantic(
                &self.current,
                format!("'{}' function must return '{}'.", ENTRY_POINT, Type::Void),
            ));
        }

        Ok(())
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.current.kind {
            Kind::If => {
                self.advance()?;
                self.parse_if()
            }
            Kind::While => {
                self.advance()?;
                self.parse_while()
            }
            Kind::For => {
                self.advance()?;
                self.parse_for()
            }
            Kind::LBrace => {
                self.advance()?;
                Ok(Stmt::Block(self.parse_block()?))
            }
            Kind::Var => {
                self.advance()?;
                self.parse_var_declaration()
            }
            Kind::Function => {
                self.advance()?;
                self.parse_function()
            }
            Kind::Return => {
                let keyword = self.advance()?;
                self.parse_return(&keyword)
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(Kind::Semicolon, "Expected ';' after expression.")?;
                Ok(Stmt::Expression(expr))
            }
        }
    }

    /// Statements up to the closing brace. The opening brace is already consumed.
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(Kind::RBrace) && !self.check(Kind::EOF) {
            statements.push(self.parse_statement()?);
        }

        self.expect(Kind::RBrace, "Expected '}' at the end of a block.")?;
        Ok(statements)
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Kind::LParen, "Expected '(' after 'nếu'.")?;
        let condition = self.parse_expression()?;
        self.expect(Kind::RParen, "Expected ')' after 'nếu' condition.")?;

        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(Kind::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Kind::LParen, "Expected '(' after 'trong khi'.")?;
        let condition = self.parse_expression()?;
        self.expect(Kind::RParen, "Expected ')' after 'trong khi' condition.")?;

        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::While { condition, body })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Kind::LParen, "Expected '(' after 'cho'.")?;

        // The initializer statement consumes its own ';'.
        let initializer = if self.match_token(Kind::Semicolon)? {
            None
        } else {
            Some(Box::new(self.parse_statement()?))
        };

        let condition = if self.check(Kind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(Kind::Semicolon, "Expected ';' after loop condition.")?;

        let increment = if self.check(Kind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(Kind::RParen, "Expected ')' after 'cho' clauses.")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For {
            initializer,
            condition,
            increment,
            body,
        })
    }

    fn parse_var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect(Kind::Identifier, "Expected variable name after 'biến'.")?;

        let mut annotation = None;
        if self.match_token(Kind::Colon)? {
            let type_token = self.current.clone();
            let ty = self.parse_type("Expected type name after ':'.")?;
            if ty.is_void() {
                return Err(ParseError::semantic(
                    &type_token,
                    format!("Variable type cannot be '{}'.", Type::Void),
                ));
            }
            annotation = Some(ty);
        }

        let mut initializer = None;
        let mut initializer_token = self.current.clone();
        if self.check_operator("=") {
            self.advance()?;
            initializer_token = self.current.clone();
            initializer = Some(self.parse_expression()?);
        }

        let resolved = match (&annotation, &initializer) {
            (None, None) => {
                return Err(ParseError::semantic(
                    &name,
                    "Uninitialized variable must have a type annotation.",
                ));
            }
            (Some(declared), None) => declared.clone(),
            (declared, Some(expr)) => {
                let inferred = infer_type(expr).ok_or_else(|| {
                    ParseError::semantic(&initializer_token, "Cannot infer type from expression.")
                })?;

                if let Some(declared) = declared {
                    if *declared != inferred {
                        return Err(ParseError::semantic(
                            &initializer_token,
                            format!("Type mismatch: Expected '{}', but got '{}'.", declared, inferred),
                        ));
                    }
                }
                inferred
            }
        };

        self.expect(Kind::Semicolon, "Expected ';' after variable declaration.")?;
        self.declare_variable(&name, resolved, initializer.is_some())?;

        Ok(Stmt::VarDecl {
            name: name.value,
            ty: annotation,
            initializer,
        })
    }

    fn declare_variable(&mut self, name: &Token, ty: Type, initialized: bool) -> Result<(), ParseError> {
        let function = self.current_function.as_deref().ok_or_else(|| {
            ParseError::semantic(
                name,
                format!("Variable '{}' declared outside of a function.", name.value),
            )
        })?;

        let variable = VariableSymbol {
            name: name.value.clone(),
            ty,
            initialized,
        };

        self.symbols
            .add_variable(function, variable)
            .map_err(|err| ParseError::semantic(name, err.to_string()))
    }

    /// Type names, including the two-word `số nguyên`, `số thực` and `luận lý`.
    fn parse_type(&mut self, message: &str) -> Result<Type, ParseError> {
        let first = self.expect(Kind::Identifier, message)?;

        let seconds: &[&str] = match first.value.as_str() {
            "số" => &["nguyên", "thực"],
            "luận" => &["lý"],
            _ => return Ok(Type::from_name(&first.value)),
        };

        if !self.check(Kind::Identifier) {
            return Ok(Type::from_name(&first.value));
        }

        if !seconds.contains(&self.current.value.as_str()) {
            return Err(ParseError::syntax(
                &self.current,
                format!("Unknown type '{} {}'.", first.value, self.current.value),
            ));
        }

        let second = self.advance()?;
        Ok(Type::from_name(&format!("{} {}", first.value, second.value)))
    }

    fn parse_function(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect(Kind::Identifier, "Expected function name.")?;
        self.expect(Kind::LParen, "Expected '(' after function name.")?;

        let mut parameters: Vec<Parameter> = Vec::new();
        let mut parameter_tokens = Vec::new();
        if !self.match_token(Kind::RParen)? {
            loop {
                let parameter = self.expect(Kind::Identifier, "Expected parameter name.")?;
                self.expect(Kind::Colon, "Expected ':' after parameter name.")?;

                let type_token = self.current.clone();
                let ty = self.parse_type("Expected parameter type.")?;
                if ty.is_void() {
                    return Err(ParseError::semantic(
                        &type_token,
                        format!("Parameter type cannot be '{}'.", Type::Void),
                    ));
                }

                parameters.push(Parameter {
                    name: parameter.value.clone(),
                    ty,
                });
                parameter_tokens.push(parameter);

                if !self.match_token(Kind::Comma)? {
                    break;
                }
            }
            self.expect(Kind::RParen, "Expected ')' after parameters.")?;
        }

        let return_type = if self.match_token(Kind::Colon)? {
            self.parse_type("Expected return type after ':'.")?
        } else {
            Type::Void
        };

        let signature = FunctionSymbol::new(
            name.value.clone(),
            parameters.iter().map(|p| (p.name.clone(), p.ty.clone())).collect(),
            return_type.clone(),
        );
        if !self.symbols.add_function(signature) {
            return Err(ParseError::semantic(
                &name,
                format!("Function '{}' is already defined.", name.value),
            ));
        }
        debug!("registered function '{}' with {} parameters", name.value, parameters.len());

        let previous = self.current_function.replace(name.value.clone());

        for (parameter, token) in parameters.iter().zip(&parameter_tokens) {
            self.declare_variable(token, parameter.ty.clone(), true)?;
        }

        self.expect(Kind::LBrace, "Expected '{' before function body.")?;
        let body = self.parse_block();
        self.current_function = previous;

        Ok(Stmt::Function {
            name: name.value,
            parameters,
            return_type,
            body: body?,
        })
    }

    fn parse_return(&mut self, keyword: &Token) -> Result<Stmt, ParseError> {
        let function = match &self.current_function {
            Some(function) => function.clone(),
            None => {
                return Err(ParseError::semantic(keyword, "Return statement outside of a function."));
            }
        };

        if self.match_token(Kind::Semicolon)? {
            return Ok(Stmt::Return(None));
        }

        let value_token = self.current.clone();
        let value = self.parse_expression()?;
        self.expect(Kind::Semicolon, "Expected ';' after return expression.")?;

        let return_type = match self.symbols.get_function(&function) {
            Some(symbol) => symbol.return_type.clone(),
            None => {
                return Err(ParseError::semantic(
                    keyword,
                    format!("Function '{}' is not defined.", function),
                ));
            }
        };

        if return_type.is_void() {
            return Err(ParseError::semantic(
                &value_token,
                format!("Cannot return a value from a '{}' function.", Type::Void),
            ));
        }

        let inferred = infer_type(&value)
            .ok_or_else(|| ParseError::semantic(&value_token, "Cannot infer type from expression."))?;

        if inferred != return_type {
            return Err(ParseError::semantic(
                &value_token,
                format!("Return type mismatch: Expected '{}', got '{}'.", return_type, inferred),
            ));
        }

        Ok(Stmt::Return(Some(value)))
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_unary()?;
        self.parse_binary(ASSIGNMENT_PRECEDENCE, lhs)
    }

    /// Precedence climbing. Binary operators are left-associative, `=` is
    /// right-associative and needs a variable on its left.
    fn parse_binary(&mut self, min_precedence: u8, mut lhs: Expr) -> Result<Expr, ParseError> {
        while let Some(precedence) = self.binary_precedence() {
            if precedence < min_precedence {
                break;
            }

            let operator = self.advance()?;
            let rhs = self.parse_unary()?;

            let rhs = if precedence == ASSIGNMENT_PRECEDENCE {
                if !matches!(lhs, Expr::Variable(_)) {
                    return Err(ParseError::syntax(&operator, "Invalid assignment target."));
                }
                self.parse_binary(ASSIGNMENT_PRECEDENCE, rhs)?
            } else {
                self.parse_binary(precedence + 1, rhs)?
            };

            lhs = Expr::Binary {
                lhs: Box::new(lhs),
                operator: operator.value,
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn binary_precedence(&self) -> Option<u8> {
        if self.current.kind != Kind::Operator {
            return None;
        }
        match self.current.value.as_str() {
            "=" => Some(ASSIGNMENT_PRECEDENCE),
            "||" => Some(1),
            "&&" => Some(2),
            "==" | "!=" => Some(3),
            "<" | "<=" | ">" | ">=" => Some(4),
            "+" | "-" => Some(5),
            "*" | "/" | "%" => Some(6),
            _ => None,
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.check_operator("-") || self.check_operator("!") || self.check_operator("~") {
            let operator = self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                operator: operator.value,
                operand: Box::new(operand),
            });
        }

        let primary = self.parse_primary()?;
        self.parse_call(primary)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.current.kind {
            Kind::Number => {
                let token = self.advance()?;
                let kind = if token.value.contains('.') {
                    LiteralKind::Real
                } else {
                    LiteralKind::Integer
                };
                Ok(Expr::Literal {
                    kind,
                    value: token.value,
                })
            }
            Kind::String => Ok(Expr::Literal {
                kind: LiteralKind::String,
                value: self.advance()?.value,
            }),
            Kind::Boolean => Ok(Expr::Literal {
                kind: LiteralKind::Boolean,
                value: self.advance()?.value,
            }),
            Kind::Identifier => Ok(Expr::Variable(self.advance()?.value)),
            Kind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Kind::RParen, "Expected ')' after expression.")?;
                Ok(expr)
            }
            Kind::EOF => Err(ParseError::syntax(&self.current, "Unexpected end of input.")),
            _ => Err(ParseError::syntax(
                &self.current,
                format!("Unexpected token: {}", self.current.value),
            )),
        }
    }

    fn parse_call(&mut self, mut callee: Expr) -> Result<Expr, ParseError> {
        while self.match_token(Kind::LParen)? {
            let mut arguments = Vec::new();

            if !self.check(Kind::RParen) {
                loop {
                    arguments.push(self.parse_expression()?);
                    if !self.match_token(Kind::Comma)? {
                        break;
                    }
                }
            }
            self.expect(Kind::RParen, "Expected ')' after function arguments.")?;

            callee = Expr::Call {
                callee: Box::new(callee),
                arguments,
            };
        }

        Ok(callee)
    }
}

/// Type of an expression, known only for bare literals.
pub fn infer_type(expr: &Expr) -> Option<Type> {
    match expr {
        Expr::Literal { kind, .. } => Some(kind.ty()),
        _ => None,
    }
}

fn reject_error_token(token: &Token) -> Result<(), ParseError> {
    match token.kind {
        Kind::Error => Err(ParseError::from_token(ErrorKind::Lexical, token, token.value.clone())),
        Kind::Unknown => Err(ParseError::from_token(
            ErrorKind::Lexical,
            token,
            format!("Unrecognized character '{}'", token.value),
        )),
        _ => Ok(()),
    }
}

use crate::types::Type;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Real,
    String,
    Boolean,
}

impl LiteralKind {
    pub fn ty(self) -> Type {
        match self {
            LiteralKind::Integer => Type::Integer,
            LiteralKind::Real => Type::Real,
            LiteralKind::String => Type::String,
            LiteralKind::Boolean => Type::Boolean,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        kind: LiteralKind,
        value: String,
    },
    Variable(String),
    Unary {
        operator: String,
        operand: Box<Expr>,
    },
    Binary {
        lhs: Box<Expr>,
        operator: String,
        rhs: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    VarDecl {
        name: String,
        ty: Option<Type>,
        initializer: Option<Expr>,
    },
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    For {
        initializer: Option<Box<Stmt>>,
        condition: Option<Expr>,
        increment: Option<Expr>,
        body: Box<Stmt>,
    },
    Function {
        name: String,
        parameters: Vec<Parameter>,
        return_type: Type,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal { kind: LiteralKind::String, value } => write!(f, "\"{}\"", value),
            Expr::Literal { value, .. } => write!(f, "{}", value),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Unary { operator, operand } => write!(f, "({} {})", operator, operand),
            Expr::Binary { lhs, operator, rhs } => write!(f, "({} {} {})", operator, lhs, rhs),
            Expr::Call { callee, arguments } => {
                write!(f, "(call {}", callee)?;
                for argument in arguments {
                    write!(f, " {}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

fn write_stmt(f: &mut fmt::Formatter, stmt: &Stmt, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);

    match stmt {
        Stmt::Expression(expr) => writeln!(f, "{}Expr {}", pad, expr),
        Stmt::VarDecl { name, ty, initializer } => {
            write!(f, "{}Var {}", pad, name)?;
            if let Some(ty) = ty {
                write!(f, ": {}", ty)?;
            }
            if let Some(initializer) = initializer {
                write!(f, " = {}", initializer)?;
            }
            writeln!(f)
        }
        Stmt::Block(statements) => {
            writeln!(f, "{}Block", pad)?;
            for statement in statements {
                write_stmt(f, statement, depth + 1)?;
            }
            Ok(())
        }
        Stmt::If { condition, then_branch, else_branch } => {
            writeln!(f, "{}If {}", pad, condition)?;
            write_stmt(f, then_branch, depth + 1)?;
            if let Some(else_branch) = else_branch {
                writeln!(f, "{}Else", pad)?;
                write_stmt(f, else_branch, depth + 1)?;
            }
            Ok(())
        }
        Stmt::While { condition, body } => {
            writeln!(f, "{}While {}", pad, condition)?;
            write_stmt(f, body, depth + 1)
        }
        Stmt::For { initializer, condition, increment, body } => {
            writeln!(f, "{}For", pad)?;
            if let Some(initializer) = initializer {
                writeln!(f, "{}  init:", pad)?;
                write_stmt(f, initializer, depth + 2)?;
            }
            if let Some(condition) = condition {
                writeln!(f, "{}  cond: {}", pad, condition)?;
            }
            if let Some(increment) = increment {
                writeln!(f, "{}  step: {}", pad, increment)?;
            }
            write_stmt(f, body, depth + 1)
        }
        Stmt::Function { name, parameters, return_type, body } => {
            let params: Vec<String> = parameters
                .iter()
                .map(|p| format!("{}: {}", p.name, p.ty))
                .collect();
            writeln!(f, "{}Function {}({}): {}", pad, name, params.join(", "), return_type)?;
            for statement in body {
                write_stmt(f, statement, depth + 1)?;
            }
            Ok(())
        }
        Stmt::Return(Some(expr)) => writeln!(f, "{}Return {}", pad, expr),
        Stmt::Return(None) => writeln!(f, "{}Return", pad),
    }
}

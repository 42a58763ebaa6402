use super::expression::{Expression, ExpressionAtom};
use crate::token::Token;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    // Declarations
    Var {
        name: Token,
        initializer: Option<Expression>,
    },
    Function(Rc<FunctionDecl>),
    // Non-declarations
    Expression(Expression),
    Print(Expression),
    Block(Vec<Statement>),
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    Return {
        keyword: Token,
        value: Option<Expression>,
    },
}

/// A function declaration. Function values share it with the tree they were parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub parameters: Vec<Token>,
    pub body: Vec<Statement>,
}

/// The pieces of a `for` loop header.
#[derive(Debug)]
pub struct ForClauses {
    pub initializer: Option<Statement>,
    pub condition: Option<Expression>,
    pub increment: Option<Expression>,
}

impl ForClauses {
    /// Rewrites the loop as `{ initializer; while (condition) { body; increment; } }`.
    pub fn desugar(self, body: Statement) -> Statement {
        let body = match self.increment {
            Some(increment) => Statement::Block(vec![body, Statement::Expression(increment)]),
            None => body,
        };
        let condition = self
            .condition
            .unwrap_or(Expression::Literal(ExpressionAtom::Bool(true)));

        let mut statements = Vec::with_capacity(2);
        if let Some(initializer) = self.initializer {
            statements.push(initializer);
        }
        statements.push(Statement::While {
            condition,
            body: Box::new(body),
        });
        Statement::Block(statements)
    }
}

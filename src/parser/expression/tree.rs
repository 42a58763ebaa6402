use super::{InfixOperator, InfixShortCircuitOperator, PrefixOperator};
use crate::token::Token;
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionAtom {
    Number(f64),
    Bool(bool),
    Nil,
    StringLiteral(CompactString),
}

/// An expression node. Every node exclusively owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(ExpressionAtom),
    Grouping(Box<Expression>),
    Variable(Token),
    Assign {
        name: Token,
        value: Box<Expression>,
    },
    Unary {
        operator: PrefixOperator,
        token: Token,
        rhs: Box<Expression>,
    },
    Binary {
        operator: InfixOperator,
        token: Token,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Logical {
        operator: InfixShortCircuitOperator,
        token: Token,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        /// The closing parenthesis, used to attribute errors raised by the call.
        paren: Token,
        arguments: Vec<Expression>,
    },
}

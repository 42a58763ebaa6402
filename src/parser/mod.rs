mod error;
pub mod expression;
pub mod formatter;
pub mod statement;

pub use error::{ParserError, ParserErrorKind};
use expression::{
    Expression, ExpressionAtom, InfixAssignmentOperator, InfixOperator,
    InfixShortCircuitOperator, PostfixOperator, PrefixOperator,
};
use statement::{ForClauses, FunctionDecl, Statement};
use std::rc::Rc;

use crate::token::{Literal, Token, TokenKind};

/// Upper bound on the number of call arguments and function parameters.
pub const MAX_ARGUMENTS: usize = 255;

#[derive(Debug, Default)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    pub fn get_statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<ParserError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(token) if token.kind == TokenKind::Eof) {
            let (line, offset) = tokens
                .last()
                .map_or((1, 0), |t| (t.line, t.span.end()));
            tokens.push(Token::eof(line, offset));
        }
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn next_token(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn expect(&mut self, expected: TokenKind, message: &'static str) -> Result<Token, ParserError> {
        if self.check(expected) {
            Ok(self.next_token())
        } else {
            Err(ParserError {
                kind: ParserErrorKind::UnexpectedToken { expected, message },
                token: self.peek().clone(),
            })
        }
    }

    fn eat_if(&mut self, next: TokenKind) -> Option<Token> {
        if self.check(next) {
            Some(self.next_token())
        } else {
            None
        }
    }

    /// Records an error that does not interrupt the current rule.
    fn report(&mut self, kind: ParserErrorKind, token: Token) {
        self.errors.push(ParserError { kind, token });
    }

    /// Discards tokens until just after a `;` or just before a token that starts a statement.
    fn synchronize(&mut self) {
        let _ = self.next_token();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon || self.peek().kind.starts_statement() {
                return;
            }
            let _ = self.next_token();
        }
    }
}

// Pratt parser for expressions
impl Parser {
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        self.parse_expression_pratt(0)
    }

    fn expect_left_expression(&mut self) -> Result<Expression, ParserError> {
        let token = self.peek().clone();

        if let Some(operator) = PrefixOperator::from_token_kind(token.kind) {
            let _ = self.next_token();
            let rhs = self.parse_expression_pratt(operator.get_binding_power())?;
            return Ok(Expression::Unary {
                operator,
                token,
                rhs: Box::new(rhs),
            });
        }

        let atom = match (token.kind, &token.literal) {
            (TokenKind::NumericLiteral, Some(Literal::Number(value))) => {
                ExpressionAtom::Number(*value)
            }
            (TokenKind::StringLiteral, Some(Literal::String(value))) => {
                ExpressionAtom::StringLiteral(value.clone())
            }
            (TokenKind::KeywordTrue, _) => ExpressionAtom::Bool(true),
            (TokenKind::KeywordFalse, _) => ExpressionAtom::Bool(false),
            (TokenKind::KeywordNil, _) => ExpressionAtom::Nil,
            (TokenKind::Ident, _) => {
                let _ = self.next_token();
                return Ok(Expression::Variable(token));
            }
            // Bracketed expression
            (TokenKind::LeftParenthesis, _) => {
                let _ = self.next_token();
                let inner = self.parse_expression_pratt(0)?;
                self.expect(
                    TokenKind::RightParenthesis,
                    "Expect ')' after expression.",
                )?;
                return Ok(Expression::Grouping(Box::new(inner)));
            }
            _ => {
                return Err(ParserError {
                    kind: ParserErrorKind::NonExpression,
                    token,
                })
            }
        };
        let _ = self.next_token();
        Ok(Expression::Literal(atom))
    }

    fn parse_expression_pratt(&mut self, min_bp: u8) -> Result<Expression, ParserError> {
        let mut lhs = self.expect_left_expression()?;

        loop {
            let token = self.peek().clone();

            if token.kind == TokenKind::LeftParenthesis {
                if PostfixOperator::Call.get_binding_power() < min_bp {
                    break;
                }
                let _ = self.next_token();
                lhs = self.finish_call(lhs)?;
                continue;
            }

            if let Some(operator) = InfixOperator::from_token_kind(token.kind) {
                let (lbp, rbp) = operator.get_binding_power();
                if lbp < min_bp {
                    break;
                }
                let _ = self.next_token();
                let rhs = self.parse_expression_pratt(rbp)?;
                lhs = Expression::Binary {
                    operator,
                    token,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                };
                continue;
            }

            if let Some(operator) = InfixShortCircuitOperator::from_token_kind(token.kind) {
                let (lbp, rbp) = operator.get_binding_power();
                if lbp < min_bp {
                    break;
                }
                let _ = self.next_token();
                let rhs = self.parse_expression_pratt(rbp)?;
                lhs = Expression::Logical {
                    operator,
                    token,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                };
                continue;
            }

            if token.kind == TokenKind::Equal {
                let (lbp, rbp) = InfixAssignmentOperator::Assign.get_binding_power();
                if lbp < min_bp {
                    break;
                }
                let _ = self.next_token();
                let value = self.parse_expression_pratt(rbp)?;
                // The target is only validated once the whole left side is known.
                lhs = match lhs {
                    Expression::Variable(name) => Expression::Assign {
                        name,
                        value: Box::new(value),
                    },
                    lhs => {
                        self.report(ParserErrorKind::InvalidLValue, token);
                        lhs
                    }
                };
                continue;
            }

            break;
        }
        Ok(lhs)
    }

    fn finish_call(&mut self, callee: Expression) -> Result<Expression, ParserError> {
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightParenthesis) {
            loop {
                if arguments.len() >= MAX_ARGUMENTS {
                    let token = self.peek().clone();
                    self.report(
                        ParserErrorKind::TooManyArguments {
                            limit: MAX_ARGUMENTS,
                        },
                        token,
                    );
                }
                arguments.push(self.parse_expression()?);
                if self.eat_if(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let paren = self.expect(TokenKind::RightParenthesis, "Expect ')' after arguments.")?;
        Ok(Expression::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }
}

// Parse program/statements
impl Parser {
    /// Parses every statement in the token stream. Malformed statements are reported, skipped and
    /// contribute nothing to the returned program.
    pub fn parse(mut self) -> (Program, Vec<ParserError>) {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(statement) = self.parse_declaration_or_recover() {
                statements.push(statement);
            }
        }
        (Program { statements }, self.errors)
    }

    fn parse_declaration_or_recover(&mut self) -> Option<Statement> {
        match self.parse_declaration() {
            Ok(statement) => Some(statement),
            Err(error) => {
                self.errors.push(error);
                self.synchronize();
                None
            }
        }
    }

    fn parse_declaration(&mut self) -> Result<Statement, ParserError> {
        if self.eat_if(TokenKind::KeywordFun).is_some() {
            self.parse_function_declaration()
        } else if self.eat_if(TokenKind::KeywordVar).is_some() {
            self.parse_variable_declaration()
        } else {
            self.parse_non_declaration()
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<Statement, ParserError> {
        let name = self.expect(TokenKind::Ident, "Expect variable name.")?;
        let initializer = match self.eat_if(TokenKind::Equal) {
            Some(_) => Some(self.parse_expression()?),
            None => None,
        };
        self.expect(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
        )?;
        Ok(Statement::Var { name, initializer })
    }

    fn parse_function_declaration(&mut self) -> Result<Statement, ParserError> {
        let name = self.expect(TokenKind::Ident, "Expect function name.")?;
        self.expect(
            TokenKind::LeftParenthesis,
            "Expect '(' after function name.",
        )?;
        let mut parameters = Vec::new();
        if !self.check(TokenKind::RightParenthesis) {
            loop {
                if parameters.len() >= MAX_ARGUMENTS {
                    let token = self.peek().clone();
                    self.report(
                        ParserErrorKind::TooManyParameters {
                            limit: MAX_ARGUMENTS,
                        },
                        token,
                    );
                }
                parameters.push(self.expect(TokenKind::Ident, "Expect parameter name.")?);
                if self.eat_if(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParenthesis, "Expect ')' after parameters.")?;
        self.expect(TokenKind::LeftBrace, "Expect '{' before function body.")?;
        let body = self.parse_block()?;
        Ok(Statement::Function(Rc::new(FunctionDecl {
            name,
            parameters,
            body,
        })))
    }

    fn parse_non_declaration(&mut self) -> Result<Statement, ParserError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::KeywordPrint => {
                let _ = self.next_token();
                let value = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "Expect ';' after value.")?;
                Ok(Statement::Print(value))
            }
            TokenKind::KeywordReturn => {
                let keyword = self.next_token();
                let value = match self.check(TokenKind::Semicolon) {
                    true => None,
                    false => Some(self.parse_expression()?),
                };
                self.expect(TokenKind::Semicolon, "Expect ';' after return value.")?;
                Ok(Statement::Return { keyword, value })
            }
            TokenKind::LeftBrace => {
                let _ = self.next_token();
                Ok(Statement::Block(self.parse_block()?))
            }
            TokenKind::KeywordIf => {
                let _ = self.next_token();
                self.parse_if_statement()
            }
            TokenKind::KeywordWhile => {
                let _ = self.next_token();
                self.parse_while_statement()
            }
            TokenKind::KeywordFor => {
                let _ = self.next_token();
                self.parse_for_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, ParserError> {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Statement::Expression(expr))
    }

    /// Parses the statements of a block whose opening brace was already consumed.
    fn parse_block(&mut self) -> Result<Vec<Statement>, ParserError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(statement) = self.parse_declaration_or_recover() {
                statements.push(statement);
            }
        }
        self.expect(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn parse_if_statement(&mut self) -> Result<Statement, ParserError> {
        self.expect(TokenKind::LeftParenthesis, "Expect '(' after 'if'.")?;
        let condition = self.parse_expression()?;
        self.expect(
            TokenKind::RightParenthesis,
            "Expect ')' after if condition.",
        )?;
        let then_branch = Box::new(self.parse_non_declaration()?);
        let else_branch = match self.eat_if(TokenKind::KeywordElse) {
            Some(_) => Some(Box::new(self.parse_non_declaration()?)),
            None => None,
        };
        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Statement, ParserError> {
        self.expect(TokenKind::LeftParenthesis, "Expect '(' after 'while'.")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RightParenthesis, "Expect ')' after condition.")?;
        let body = Box::new(self.parse_non_declaration()?);
        Ok(Statement::While { condition, body })
    }

    fn parse_for_statement(&mut self) -> Result<Statement, ParserError> {
        self.expect(TokenKind::LeftParenthesis, "Expect '(' after 'for'.")?;
        let initializer = if self.eat_if(TokenKind::Semicolon).is_some() {
            None
        } else if self.eat_if(TokenKind::KeywordVar).is_some() {
            Some(self.parse_variable_declaration()?)
        } else {
            Some(self.parse_expression_statement()?)
        };

        let condition = match self.check(TokenKind::Semicolon) {
            true => None,
            false => Some(self.parse_expression()?),
        };
        self.expect(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = match self.check(TokenKind::RightParenthesis) {
            true => None,
            false => Some(self.parse_expression()?),
        };
        self.expect(
            TokenKind::RightParenthesis,
            "Expect ')' after for clauses.",
        )?;

        let body = self.parse_non_declaration()?;
        let clauses = ForClauses {
            initializer,
            condition,
            increment,
        };
        Ok(clauses.desugar(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> (Program, Vec<ParserError>) {
        Parser::new(Lexer::new(source).scan().tokens).parse()
    }

    #[test]
    fn empty_token_stream_gets_eof() {
        let (program, errors) = Parser::new(Vec::new()).parse();
        assert!(program.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn synchronizes_after_bad_statement() {
        let (program, errors) = parse("print ; var a = 1; print a;");
        assert_eq!(errors.len(), 1);
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn synchronizes_inside_block() {
        let (program, errors) = parse("{ var = 1; print 2; } print 3;");
        assert_eq!(errors.len(), 1);
        assert_eq!(program.len(), 2);
        let Some(Statement::Block(inner)) = program.get_statement(0) else {
            panic!("Expected a block statement.");
        };
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn invalid_assignment_target_keeps_left_expression() {
        let (program, errors) = parse("1 + 2 = 3;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParserErrorKind::InvalidLValue);
        assert!(matches!(
            program.get_statement(0),
            Some(Statement::Expression(Expression::Binary { .. }))
        ));
    }

    #[test]
    fn too_many_arguments_is_not_fatal() {
        let arguments = vec!["1"; MAX_ARGUMENTS + 1].join(", ");
        let (program, errors) = parse(&format!("f({arguments});"));
        assert_eq!(errors.len(), 1);
        assert_eq!(program.len(), 1);
    }
}

use super::{
    environment::Environment,
    error::{RuntimeError, RuntimeErrorKind},
    value::{Function, LoxValue},
    ProgramState, SystemContext,
};
use crate::{
    parser::{
        expression::{
            Expression, ExpressionAtom, InfixOperator, InfixShortCircuitOperator, PrefixOperator,
        },
        statement::Statement,
        Program,
    },
    token::Token,
};
use std::rc::Rc;

/// Executes programs against a global scope that outlives any single program, so consecutive
/// runs see each other's definitions.
pub struct TreeWalkInterpreter {
    globals: Environment,
    environment: Environment,
}

impl TreeWalkInterpreter {
    pub fn new() -> Self {
        let globals = Environment::new();
        Self {
            environment: globals.clone(),
            globals,
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// Runs the top-level statements in order, stopping at the first runtime error or top-level
    /// `return`.
    pub fn interpret<C: SystemContext>(
        &mut self,
        program: &Program,
        context: &mut C,
    ) -> Result<ProgramState, RuntimeError> {
        for statement in program {
            if let ProgramState::Return(value) = self.interpret_statement(statement, context)? {
                return Ok(ProgramState::Return(value));
            }
        }
        Ok(ProgramState::Run)
    }

    pub fn interpret_statement<C: SystemContext>(
        &mut self,
        statement: &Statement,
        context: &mut C,
    ) -> Result<ProgramState, RuntimeError> {
        match statement {
            Statement::Var { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer, context)?,
                    None => LoxValue::Nil,
                };
                self.environment.define(&name.lexeme, value);
            }
            Statement::Function(declaration) => {
                let function = Function::new(Rc::clone(declaration), self.environment.clone());
                self.environment
                    .define(&declaration.name.lexeme, LoxValue::Function(Rc::new(function)));
            }
            Statement::Expression(expr) => {
                let _ = self.evaluate(expr, context)?;
            }
            Statement::Print(expr) => {
                let value = self.evaluate(expr, context)?;
                context.writeln(&value.to_string());
            }
            Statement::Block(statements) => {
                let scope = self.environment.new_scope();
                return self.interpret_block(statements, scope, context);
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, context)?.is_truthy() {
                    return self.interpret_statement(then_branch, context);
                } else if let Some(else_branch) = else_branch {
                    return self.interpret_statement(else_branch, context);
                }
            }
            Statement::While { condition, body } => {
                while self.evaluate(condition, context)?.is_truthy() {
                    if let ProgramState::Return(value) = self.interpret_statement(body, context)? {
                        return Ok(ProgramState::Return(value));
                    }
                }
            }
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value, context)?,
                    None => LoxValue::Nil,
                };
                return Ok(ProgramState::Return(value));
            }
        }
        Ok(ProgramState::Run)
    }

    /// Runs `statements` inside `scope`. The previous scope is restored however the block exits.
    fn interpret_block<C: SystemContext>(
        &mut self,
        statements: &[Statement],
        scope: Environment,
        context: &mut C,
    ) -> Result<ProgramState, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, scope);
        let result = self.interpret_statements(statements, context);
        self.environment = previous;
        result
    }

    fn interpret_statements<C: SystemContext>(
        &mut self,
        statements: &[Statement],
        context: &mut C,
    ) -> Result<ProgramState, RuntimeError> {
        for statement in statements {
            if let ProgramState::Return(value) = self.interpret_statement(statement, context)? {
                return Ok(ProgramState::Return(value));
            }
        }
        Ok(ProgramState::Run)
    }
}

// Expressions
impl TreeWalkInterpreter {
    pub fn evaluate<C: SystemContext>(
        &mut self,
        expr: &Expression,
        context: &mut C,
    ) -> Result<LoxValue, RuntimeError> {
        match expr {
            Expression::Literal(atom) => Ok(Self::evaluate_atom(atom)),
            Expression::Grouping(inner) => self.evaluate(inner, context),
            Expression::Variable(name) => self.environment.get(name),
            Expression::Assign { name, value } => {
                let value = self.evaluate(value, context)?;
                self.environment.assign(name, value.clone())?;
                Ok(value)
            }
            Expression::Unary {
                operator,
                token,
                rhs,
            } => {
                let rhs = self.evaluate(rhs, context)?;
                match operator {
                    PrefixOperator::Bang => Ok(rhs.logical_not()),
                    PrefixOperator::Minus => rhs.numeric_negate().map_err(|kind| RuntimeError {
                        kind,
                        token: token.clone(),
                    }),
                }
            }
            Expression::Binary {
                operator,
                token,
                lhs,
                rhs,
            } => {
                let lhs = self.evaluate(lhs, context)?;
                let rhs = self.evaluate(rhs, context)?;
                Self::evaluate_binary(*operator, &lhs, &rhs).map_err(|kind| RuntimeError {
                    kind,
                    token: token.clone(),
                })
            }
            Expression::Logical {
                operator, lhs, rhs, ..
            } => {
                let lhs = self.evaluate(lhs, context)?;
                match (operator, lhs.is_truthy()) {
                    (InfixShortCircuitOperator::Or, true)
                    | (InfixShortCircuitOperator::And, false) => Ok(lhs),
                    _ => self.evaluate(rhs, context),
                }
            }
            Expression::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee, context)?;
                let arguments = arguments
                    .iter()
                    .map(|argument| self.evaluate(argument, context))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call(callee, arguments, paren, context)
            }
        }
    }

    fn evaluate_atom(atom: &ExpressionAtom) -> LoxValue {
        match atom {
            ExpressionAtom::Number(v) => LoxValue::Number(*v),
            ExpressionAtom::Bool(v) => LoxValue::Bool(*v),
            ExpressionAtom::Nil => LoxValue::Nil,
            ExpressionAtom::StringLiteral(v) => LoxValue::String(v.clone()),
        }
    }

    fn evaluate_binary(
        operator: InfixOperator,
        lhs: &LoxValue,
        rhs: &LoxValue,
    ) -> Result<LoxValue, RuntimeErrorKind> {
        match operator {
            InfixOperator::Add => lhs.add(rhs),
            InfixOperator::Subtract => lhs.subtract(rhs),
            InfixOperator::Multiply => lhs.multiply(rhs),
            InfixOperator::Divide => lhs.divide(rhs),
            InfixOperator::LessThan => lhs.less_than(rhs),
            InfixOperator::LessThanEqual => lhs.less_than_or_equal(rhs),
            InfixOperator::GreaterThan => lhs.greater_than(rhs),
            InfixOperator::GreaterThanEqual => lhs.greater_than_or_equal(rhs),
            InfixOperator::EqualEqual => Ok(LoxValue::Bool(lhs.is_equal(rhs))),
            InfixOperator::BangEqual => Ok(LoxValue::Bool(!lhs.is_equal(rhs))),
        }
    }

    fn call<C: SystemContext>(
        &mut self,
        callee: LoxValue,
        arguments: Vec<LoxValue>,
        paren: &Token,
        context: &mut C,
    ) -> Result<LoxValue, RuntimeError> {
        let error = |kind: RuntimeErrorKind| RuntimeError {
            kind,
            token: paren.clone(),
        };

        match callee {
            LoxValue::NativeFunction(fun) => {
                if arguments.len() != fun.arity() {
                    return Err(error(RuntimeErrorKind::InvalidArgumentCount {
                        actual: arguments.len(),
                        expected: fun.arity(),
                    }));
                }
                tracing::trace!(name = fun.get_name(), "calling native function");
                fun.call(&arguments).map_err(error)
            }
            LoxValue::Function(fun) => {
                if arguments.len() != fun.arity() {
                    return Err(error(RuntimeErrorKind::InvalidArgumentCount {
                        actual: arguments.len(),
                        expected: fun.arity(),
                    }));
                }
                tracing::trace!(name = fun.name(), arity = fun.arity(), "calling function");

                let scope = fun.closure().new_scope();
                for (parameter, argument) in fun.declaration().parameters.iter().zip(arguments) {
                    scope.define(&parameter.lexeme, argument);
                }
                match self.interpret_block(&fun.declaration().body, scope, context)? {
                    ProgramState::Return(value) => Ok(value),
                    ProgramState::Run => Ok(LoxValue::Nil),
                }
            }
            value => Err(error(RuntimeErrorKind::InvalidCallee(value))),
        }
    }
}

impl Default for TreeWalkInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{interpreter::BufferedContext, lexer::Lexer, parser::Parser};

    fn run(
        interpreter: &mut TreeWalkInterpreter,
        source: &str,
    ) -> (Result<ProgramState, RuntimeError>, BufferedContext) {
        let (program, errors) = Parser::new(Lexer::new(source).scan().tokens).parse();
        assert!(errors.is_empty(), "{errors:?}");
        let mut context = BufferedContext::new();
        let result = interpreter.interpret(&program, &mut context);
        (result, context)
    }

    #[test]
    fn scope_is_restored_after_runtime_error() {
        let mut interpreter = TreeWalkInterpreter::new();
        let (result, _) = run(&mut interpreter, "var a = 1; { var a = 2; a + nil; }");
        assert!(result.is_err());

        let (result, context) = run(&mut interpreter, "print a;");
        assert!(result.is_ok());
        assert_eq!(context.output(), "1\n");
    }

    #[test]
    fn scope_is_restored_after_return() {
        let mut interpreter = TreeWalkInterpreter::new();
        let source = "var x = \"global\"; fun f() { var x = \"local\"; { return x; } } print f(); print x;";
        let (result, context) = run(&mut interpreter, source);
        assert!(result.is_ok());
        assert_eq!(context.output(), "local\nglobal\n");
    }

    #[test]
    fn arguments_are_evaluated_before_arity_check() {
        let mut interpreter = TreeWalkInterpreter::new();
        let (result, context) = run(&mut interpreter, "fun f(a) {} f(1, 2 + nil);");
        let error = result.unwrap_err();
        assert_eq!(error.code(), "RT003");
        assert!(context.output().is_empty());
    }

    #[test]
    fn top_level_return_stops_the_program() {
        let mut interpreter = TreeWalkInterpreter::new();
        let (result, context) = run(&mut interpreter, "print 1; return 2; print 3;");
        assert!(matches!(result, Ok(ProgramState::Return(LoxValue::Number(v))) if v == 2.0));
        assert_eq!(context.output(), "1\n");
    }

    #[test]
    fn each_call_gets_a_fresh_scope() {
        let mut interpreter = TreeWalkInterpreter::new();
        let source = "fun f(n) { var local = n; return local; } print f(1); print f(2);";
        let (_, context) = run(&mut interpreter, source);
        assert_eq!(context.output(), "1\n2\n");
        assert!(interpreter
            .globals()
            .get(&Lexer::new("local").scan().tokens[0])
            .is_err());
    }
}

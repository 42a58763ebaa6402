use super::{
    expression::{Expression, ExpressionAtom, InfixOperator, InfixShortCircuitOperator, PrefixOperator},
    statement::Statement,
    Program,
};

pub trait ExpressionFormatter {
    fn format(&self, tree: &Expression) -> String;
}

pub trait ProgramFormatter {
    fn format_statement(&self, statement: &Statement) -> String;

    fn format_program(&self, program: &Program) -> String {
        program
            .iter()
            .map(|statement| self.format_statement(statement))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct DebugFormatter;

impl ExpressionFormatter for DebugFormatter {
    fn format(&self, tree: &Expression) -> String {
        format!("{tree:?}")
    }
}

impl ProgramFormatter for DebugFormatter {
    fn format_statement(&self, statement: &Statement) -> String {
        format!("{statement:?}")
    }
}

/// Prints trees as fully parenthesized prefix expressions, e.g. `(+ 1.0 (group 2.0))`.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    fn format_atom(atom: &ExpressionAtom) -> String {
        match atom {
            ExpressionAtom::Number(v) => format!("{v:?}"),
            ExpressionAtom::Bool(v) => format!("{v}"),
            ExpressionAtom::Nil => "nil".into(),
            ExpressionAtom::StringLiteral(v) => format!("{v}"),
        }
    }

    fn format_expression(tree: &Expression) -> String {
        match tree {
            Expression::Literal(atom) => Self::format_atom(atom),
            Expression::Variable(name) => name.lexeme.to_string(),
            Expression::Grouping(inner) => format!("(group {})", Self::format_expression(inner)),
            Expression::Assign { name, value } => {
                format!("(= {} {})", name.lexeme, Self::format_expression(value))
            }
            Expression::Unary { operator, rhs, .. } => format!(
                "({} {})",
                Self::format_unary_operator(operator),
                Self::format_expression(rhs)
            ),
            Expression::Binary {
                operator, lhs, rhs, ..
            } => format!(
                "({} {} {})",
                Self::format_binary_operator(operator),
                Self::format_expression(lhs),
                Self::format_expression(rhs)
            ),
            Expression::Logical {
                operator, lhs, rhs, ..
            } => format!(
                "({} {} {})",
                Self::format_binary_short_circuit_operator(operator),
                Self::format_expression(lhs),
                Self::format_expression(rhs)
            ),
            Expression::Call {
                callee, arguments, ..
            } => {
                let mut buffer = format!("(call {}", Self::format_expression(callee));
                for argument in arguments {
                    buffer.push(' ');
                    buffer.push_str(&Self::format_expression(argument));
                }
                buffer.push(')');
                buffer
            }
        }
    }

    fn format_unary_operator(operator: &PrefixOperator) -> &'static str {
        match operator {
            PrefixOperator::Bang => "!",
            PrefixOperator::Minus => "-",
        }
    }

    fn format_binary_operator(operator: &InfixOperator) -> &'static str {
        match operator {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::LessThan => "<",
            InfixOperator::LessThanEqual => "<=",
            InfixOperator::GreaterThan => ">",
            InfixOperator::GreaterThanEqual => ">=",
            InfixOperator::EqualEqual => "==",
            InfixOperator::BangEqual => "!=",
        }
    }

    fn format_binary_short_circuit_operator(operator: &InfixShortCircuitOperator) -> &'static str {
        match operator {
            InfixShortCircuitOperator::And => "and",
            InfixShortCircuitOperator::Or => "or",
        }
    }

    fn format_block(statements: &[Statement]) -> String {
        let mut buffer = String::from("(block");
        for statement in statements {
            buffer.push(' ');
            buffer.push_str(&Self::format_stmt(statement));
        }
        buffer.push(')');
        buffer
    }

    fn format_stmt(statement: &Statement) -> String {
        match statement {
            Statement::Var { name, initializer } => match initializer {
                Some(initializer) => format!(
                    "(var {} {})",
                    name.lexeme,
                    Self::format_expression(initializer)
                ),
                None => format!("(var {})", name.lexeme),
            },
            Statement::Function(decl) => {
                let parameters = decl
                    .parameters
                    .iter()
                    .map(|p| p.lexeme.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let mut buffer = format!("(fun {} ({parameters})", decl.name.lexeme);
                for statement in &decl.body {
                    buffer.push(' ');
                    buffer.push_str(&Self::format_stmt(statement));
                }
                buffer.push(')');
                buffer
            }
            Statement::Expression(expr) => format!("(expr {})", Self::format_expression(expr)),
            Statement::Print(expr) => format!("(print {})", Self::format_expression(expr)),
            Statement::Block(statements) => Self::format_block(statements),
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    Self::format_expression(condition),
                    Self::format_stmt(then_branch),
                    Self::format_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    Self::format_expression(condition),
                    Self::format_stmt(then_branch)
                ),
            },
            Statement::While { condition, body } => format!(
                "(while {} {})",
                Self::format_expression(condition),
                Self::format_stmt(body)
            ),
            Statement::Return { value, .. } => match value {
                Some(value) => format!("(return {})", Self::format_expression(value)),
                None => "(return)".into(),
            },
        }
    }
}

impl ExpressionFormatter for SExpressionFormatter {
    fn format(&self, tree: &Expression) -> String {
        Self::format_expression(tree)
    }
}

impl ProgramFormatter for SExpressionFormatter {
    fn format_statement(&self, statement: &Statement) -> String {
        Self::format_stmt(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::Lexer, parser::Parser};

    fn format_source(source: &str) -> String {
        let (program, errors) = Parser::new(Lexer::new(source).scan().tokens).parse();
        assert!(errors.is_empty(), "{errors:?}");
        SExpressionFormatter.format_program(&program)
    }

    #[test]
    fn for_loop_is_printed_as_desugared_while() {
        assert_eq!(
            format_source("for (var i = 0; i < 2; i = i + 1) print i;"),
            "(block (var i 0.0) (while (< i 2.0) (block (print i) (expr (= i (+ i 1.0))))))"
        );
    }

    #[test]
    fn function_declaration() {
        assert_eq!(
            format_source("fun add(a, b) { return a + b; }"),
            "(fun add (a b) (return (+ a b)))"
        );
    }

    #[test]
    fn if_without_else() {
        assert_eq!(
            format_source("if (!ok) print \"no\";"),
            "(if (! ok) (print no))"
        );
    }
}

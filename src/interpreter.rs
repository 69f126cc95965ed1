use crate::ast::{Leaf, Node, Operator};
use crate::environment::{Environment, Int};
use crate::error::EvalError;

type Result<T> = std::result::Result<T, EvalError>;

/// Evaluate a tree against `env`.
///
/// Children are evaluated left first, then right. Assignments write through
/// to `env` as they are reached, and only the selected branch of a `?` runs.
pub fn evaluate(node: &Node, env: &mut Environment) -> Result<Int> {
    match node {
        Node::Leaf(Leaf::Integer { value, .. }) => Ok(*value),
        Node::Leaf(Leaf::Symbol(name)) => env
            .lookup(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
        Node::Interior { op, left, right } => match op {
            Operator::Add => binary(*op, left, right, env, |a, b| Ok(a.wrapping_add(b))),
            Operator::Subtract => binary(*op, left, right, env, |a, b| Ok(a.wrapping_sub(b))),
            Operator::Multiply => binary(*op, left, right, env, |a, b| Ok(a.wrapping_mul(b))),
            Operator::Divide => binary(*op, left, right, env, |a, b| {
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(a.wrapping_div(b))
            }),
            Operator::Modulo => binary(*op, left, right, env, |a, b| {
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(a.wrapping_rem(b))
            }),
            Operator::Assign => assign(left, right, env),
            Operator::Condition => {
                let condition = evaluate(left, env)?;
                log::debug!("Condition {left} is {condition}");
                select(right, condition != 0, env)
            }
            Operator::Alternative => Err(EvalError::DanglingAlternative),
        },
    }
}

fn binary(
    op: Operator,
    left: &Node,
    right: &Node,
    env: &mut Environment,
    apply: impl FnOnce(Int, Int) -> Result<Int>,
) -> Result<Int> {
    let first = evaluate(left, env)?;
    let second = evaluate(right, env)?;
    let result = apply(first, second)?;
    log::debug!("Applied {first} {} {second} = {result}", op.token());
    Ok(result)
}

/// `target = value`: the target must be a symbol that is already defined.
fn assign(target: &Node, value: &Node, env: &mut Environment) -> Result<Int> {
    let Node::Leaf(Leaf::Symbol(name)) = target else {
        return Err(EvalError::InvalidAssignTarget(target.to_string()));
    };
    if env.lookup(name).is_none() {
        return Err(EvalError::UndefinedVariable(name.clone()));
    }

    let result = evaluate(value, env)?;
    env.assign(name, result)?;
    log::debug!("Assigned {name} = {result}");
    Ok(result)
}

/// Evaluate one branch of an alternative node, leaving the other untouched.
fn select(alternative: &Node, take_first: bool, env: &mut Environment) -> Result<Int> {
    match alternative {
        Node::Interior {
            op: Operator::Alternative,
            left,
            right,
        } => {
            if take_first {
                evaluate(left, env)
            } else {
                evaluate(right, env)
            }
        }
        _ => Err(EvalError::MissingAlternative),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    use crate::infix::render;
    use crate::parser::parse;
    use crate::tokeniser::tokenise;

    fn eval_in(expr: &str, env: &mut Environment) -> Result<Int> {
        evaluate(&parse(tokenise(expr)).unwrap(), env)
    }

    fn eval_str(expr: &str) -> Result<Int> {
        eval_in(expr, &mut Environment::new())
    }

    #[test]
    fn evaluate_number() {
        assert_eq!(eval_str("42"), Ok(42));
        assert_eq!(eval_str("-42"), Ok(-42));
    }

    #[test]
    fn evaluate_addition() {
        assert_eq!(eval_str("5 3 +"), Ok(8));
    }

    #[test]
    fn evaluate_arithmetic() {
        assert_eq!(eval_str("10 4 -"), Ok(6));
        assert_eq!(eval_str("6 7 *"), Ok(42));
        assert_eq!(eval_str("17 5 /"), Ok(3));
        assert_eq!(eval_str("17 5 %"), Ok(2));
        assert_eq!(eval_str("1 2 + 3 4 - *"), Ok(-3));
    }

    #[test]
    fn evaluate_truncating_division() {
        assert_eq!(eval_str("-7 2 /"), Ok(-3));
        assert_eq!(eval_str("-7 2 %"), Ok(-1));
    }

    #[test]
    fn evaluate_division_by_zero() {
        assert_eq!(eval_str("5 0 /"), Err(EvalError::DivisionByZero));
        assert_eq!(eval_str("5 0 %"), Err(EvalError::DivisionByZero));
        assert_eq!(eval_str("5 1 1 - /"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn evaluate_wraps_on_overflow() {
        assert_eq!(eval_str("9223372036854775807 1 +"), Ok(Int::MIN));
        assert_eq!(eval_str("-9223372036854775808 -1 /"), Ok(Int::MIN));
        assert_eq!(eval_str("-9223372036854775808 -1 %"), Ok(0));
    }

    #[test]
    fn evaluate_symbol() {
        let mut env = Environment::new();
        env.define("x", 10).unwrap();
        assert_eq!(eval_in("x x *", &mut env), Ok(100));
    }

    #[test]
    fn evaluate_undefined_symbol() {
        assert_eq!(
            eval_str("y 1 +"),
            Err(EvalError::UndefinedVariable("y".to_string()))
        );
    }

    #[test]
    fn evaluate_assignment() {
        let mut env = Environment::new();
        env.define("x", 1).unwrap();
        assert_eq!(eval_in("x 5 =", &mut env), Ok(5));
        assert_eq!(env.lookup("x"), Some(5));
    }

    #[test]
    fn evaluate_increment() {
        let mut env = Environment::new();
        env.define("x", 41).unwrap();
        assert_eq!(eval_in("x x 1 + =", &mut env), Ok(42));
        assert_eq!(env.lookup("x"), Some(42));
    }

    #[test]
    fn evaluate_assignment_to_undefined() {
        let mut env = Environment::new();
        assert_eq!(
            eval_in("x 5 =", &mut env),
            Err(EvalError::UndefinedVariable("x".to_string()))
        );
        assert!(env.is_empty());
    }

    #[test]
    fn evaluate_assignment_to_non_symbol() {
        assert_eq!(
            eval_str("3 5 ="),
            Err(EvalError::InvalidAssignTarget("3".to_string()))
        );
        let mut env = Environment::new();
        env.define("x", 1).unwrap();
        assert_eq!(
            eval_in("x 1 + 5 =", &mut env),
            Err(EvalError::InvalidAssignTarget("(x + 1)".to_string()))
        );
    }

    #[test]
    fn evaluate_left_before_right() {
        let mut env = Environment::new();
        env.define("x", 1).unwrap();
        assert_eq!(eval_in("x x 5 = +", &mut env), Ok(6));

        env.define("x", 1).unwrap();
        assert_eq!(eval_in("x 5 = x +", &mut env), Ok(10));
    }

    #[test]
    fn evaluate_conditional() {
        assert_eq!(eval_str("20 10 1 ?"), Ok(10));
        assert_eq!(eval_str("20 10 0 ?"), Ok(20));
        assert_eq!(eval_str("20 10 -3 ?"), Ok(10));
    }

    #[test]
    fn evaluate_conditional_on_expression() {
        let mut env = Environment::new();
        env.define("n", 4).unwrap();
        assert_eq!(eval_in("0 1 n 2 % ?", &mut env), Ok(0));
    }

    #[test]
    fn conditional_skips_true_branch() {
        let mut env = Environment::new();
        env.define("x", 1).unwrap();
        assert_eq!(eval_in("0 x 5 = 0 ?", &mut env), Ok(0));
        assert_eq!(env.lookup("x"), Some(1));
    }

    #[test]
    fn conditional_skips_false_branch() {
        let mut env = Environment::new();
        env.define("x", 1).unwrap();
        env.define("y", 1).unwrap();
        assert_eq!(eval_in("y 9 = x 5 = 1 ?", &mut env), Ok(5));
        assert_eq!(env.lookup("x"), Some(5));
        assert_eq!(env.lookup("y"), Some(1));
    }

    #[test]
    fn conditional_skips_failing_branch() {
        assert_eq!(eval_str("1 0 / 7 1 ?"), Ok(7));
        assert_eq!(eval_str("7 undefined 0 ?"), Ok(7));
    }

    #[test]
    fn evaluate_dangling_alternative() {
        assert_eq!(eval_str("2 1 :"), Err(EvalError::DanglingAlternative));
    }

    #[test]
    fn evaluate_condition_without_alternative() {
        let node = interior!(Condition, Node::integer(1, "1"), Node::integer(2, "2"));
        assert_eq!(
            evaluate(&node, &mut Environment::new()),
            Err(EvalError::MissingAlternative)
        );
    }

    #[test]
    fn error_stops_evaluation() {
        let mut env = Environment::new();
        env.define("x", 1).unwrap();
        assert_eq!(
            eval_in("x 5 = 0 /", &mut env).unwrap_err(),
            EvalError::DivisionByZero
        );
        // The left side ran before the right side failed.
        assert_eq!(env.lookup("x"), Some(5));

        env.define("x", 1).unwrap();
        assert!(eval_in("1 0 / x 5 = +", &mut env).is_err());
        assert_eq!(env.lookup("x"), Some(1));
    }

    #[test]
    fn rendered_tree_evaluates_the_same() {
        let cases = [
            ("5 3 +", "(5 + 3)", 8),
            ("a b * 2 -", "((a * b) - 2)", 10),
            ("1 2 a b - ?", "((a - b) ? (2 : 1))", 2),
            ("a a b + =", "(a = (a + b))", 7),
            ("b a % 7 /", "((b % a) / 7)", 0),
        ];
        for (expr, infix, value) in cases {
            let mut env = Environment::new();
            env.define("a", 3).unwrap();
            env.define("b", 4).unwrap();
            let tree = parse(tokenise(expr)).unwrap();
            assert_eq!(render(&tree), infix, "rendering {expr:?}");
            assert_eq!(evaluate(&tree, &mut env), Ok(value), "evaluating {expr:?}");
        }
    }

    struct CaptureLogger {
        records: Mutex<Vec<String>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut records) = self.records.lock() {
                records.push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLogger = CaptureLogger {
        records: Mutex::new(Vec::new()),
    };

    #[test]
    fn arithmetic_is_traced() {
        // Other tests may log too, so only look for this test's own line.
        if log::set_logger(&CAPTURE).is_ok() {
            log::set_max_level(log::LevelFilter::Debug);
        }
        assert_eq!(eval_str("40 2 +"), Ok(42));
        let records = CAPTURE.records.lock().unwrap();
        assert!(records.iter().any(|line| line == "Applied 40 + 2 = 42"));
    }
}

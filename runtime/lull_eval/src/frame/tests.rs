use super::*;
use crate::errors::ScriptErrorKind;
use lull_ir::{Symbol, Var};
use pretty_assertions::assert_eq;

fn args(source: &str) -> ScriptValue {
    lull_parse::parse(source).unwrap_or_else(|err| panic!("parse of {source:?} failed: {err}"))
}

fn env_with_x() -> ScriptEnv {
    let mut env = ScriptEnv::new();
    env.set_value("x", ScriptValue::new(5_i32));
    env
}

#[test]
fn test_next_returns_unevaluated() {
    let mut env = env_with_x();
    let mut frame = ScriptFrame::new(&mut env, "f", args("x (+ 1 2)"));
    assert!(frame.has_next());
    let first = frame.next();
    assert_eq!(first.as_symbol().map(Symbol::name), Some("x"));
    assert_eq!(frame.position(), 1);
    assert!(frame.next().as_cons().is_some());
    assert!(!frame.has_next());
}

#[test]
fn test_eval_next_evaluates() {
    let mut env = env_with_x();
    let mut frame = ScriptFrame::new(&mut env, "f", args("x (+ 1 2)"));
    let x = frame.eval_next().unwrap_or_else(|err| panic!("{err}"));
    let sum = frame.eval_next().unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(x.get::<i32>(), Some(5));
    assert_eq!(sum.get::<i32>(), Some(3));
}

#[test]
#[should_panic(expected = "ScriptFrame::next called on 'f' with no arguments left")]
fn test_next_without_argument_panics() {
    let mut env = ScriptEnv::new();
    let mut frame = ScriptFrame::new(&mut env, "f", ScriptValue::Nil);
    let _ = frame.next();
}

#[test]
fn test_try_eval_next_reports_missing_argument() {
    let mut env = ScriptEnv::new();
    let mut frame = ScriptFrame::new(&mut env, "f", ScriptValue::Nil);
    let err = frame.try_eval_next().err().unwrap_or_else(|| panic!("expected an error"));
    assert_eq!(err.kind, ScriptErrorKind::MissingArgument);
    assert_eq!(err.context.as_deref(), Some("f argument 0"));
}

#[test]
fn test_eval_next_as_converts() {
    let mut env = env_with_x();
    let mut frame = ScriptFrame::new(&mut env, "f", args("x x 'text'"));
    assert_eq!(frame.eval_next_as::<i64>().ok(), Some(5));
    assert_eq!(frame.eval_next_as::<f64>().ok(), Some(5.0));
    let err = frame.eval_next_as::<i32>().err().unwrap_or_else(|| panic!("expected an error"));
    assert_eq!(
        err.kind,
        ScriptErrorKind::TypeMismatch {
            name: String::from("f"),
            position: 2,
            expected: String::from("i32"),
            got: String::from("alloc::string::String"),
        }
    );
}

#[test]
fn test_next_symbol() {
    let mut env = ScriptEnv::new();
    let mut frame = ScriptFrame::new(&mut env, "=", args("foo 1"));
    assert_eq!(frame.next_symbol().ok().map(|s| s.name().to_owned()), Some(String::from("foo")));
    assert!(matches!(
        frame.next_symbol().map_err(|err| err.kind),
        Err(ScriptErrorKind::TypeMismatch { .. })
    ));
}

#[test]
fn test_arity_helpers() {
    let mut env = ScriptEnv::new();
    let mut frame = ScriptFrame::new(&mut env, "add", args("1"));
    assert_eq!(frame.arg::<i32>(2).ok(), Some(1));
    assert_eq!(
        frame.arg::<i32>(2).map_err(|err| err.kind),
        Err(ScriptErrorKind::ArityMismatch {
            name: String::from("add"),
            expected: 2,
            got: 1,
        })
    );

    let mut frame = ScriptFrame::new(&mut env, "add", args("1 2 3"));
    let _ = frame.arg::<i32>(2);
    let _ = frame.arg::<i32>(2);
    assert_eq!(
        frame.finish(2).map_err(|err| err.kind),
        Err(ScriptErrorKind::ArityMismatch {
            name: String::from("add"),
            expected: 2,
            got: 3,
        })
    );
}

#[test]
fn test_rest_takes_remaining() {
    let mut env = ScriptEnv::new();
    let mut frame = ScriptFrame::new(&mut env, "do", args("1 2 3"));
    let _ = frame.next();
    let rest = frame.rest();
    assert_eq!(rest.len(), 2);
    assert_eq!(frame.position(), 3);
    assert!(!frame.has_next());
}

#[test]
fn test_release_return_value_moves_once() {
    let mut env = ScriptEnv::new();
    let mut frame = ScriptFrame::new(&mut env, "f", ScriptValue::Nil);
    frame.return_var(Var::new(7_i32));
    assert_eq!(frame.release_return_value().get::<i32>(), Some(7));
    assert!(frame.release_return_value().is_nil());
}

#[test]
fn test_error_carries_position() {
    let mut env = ScriptEnv::new();
    let mut frame = ScriptFrame::new(&mut env, "f", args("1 2"));
    let _ = frame.next();
    let err = frame.error("bad value");
    assert_eq!(err.to_string(), "bad value (in f argument 1)");
}

#[test]
fn test_describe() {
    assert_eq!(describe(&ScriptValue::Nil), "nil");
    assert_eq!(describe(&ScriptValue::symbol("x")), "symbol x");
    assert_eq!(describe(&args("1")), "list");
    assert_eq!(describe(&ScriptValue::new(true)), "bool");
}

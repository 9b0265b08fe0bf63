use super::*;
use crate::config::EngineConfig;
use crate::errors::ScriptErrorKind;
use crate::print_handler::{buffer_handler, SharedPrintHandler};
use crate::script_env::ScriptEnv;
use lull_ir::{hash, HashValue, TypeId};
use pretty_assertions::assert_eq;
use std::any::Any;

fn new_env(print_handler: SharedPrintHandler) -> ScriptEnv {
    let config = EngineConfig::default().with_print_handler(print_handler);
    ScriptEnv::with_globals(SharedGlobals::new(config))
}

fn run(source: &str) -> ScriptValue {
    let mut env = new_env(buffer_handler());
    env.exec(source)
        .unwrap_or_else(|err| panic!("{source} failed: {err}"))
}

fn run_as<T: Any + Clone + std::fmt::Debug>(source: &str) -> T {
    let value = run(source);
    value
        .get::<T>()
        .unwrap_or_else(|| panic!("{source} produced {value:?}"))
}

fn run_err(source: &str) -> ScriptErrorKind {
    let mut env = new_env(buffer_handler());
    match env.exec(source) {
        Ok(value) => panic!("expected {source} to fail, got {value}"),
        Err(err) => err.kind,
    }
}

fn rendered(source: &str) -> String {
    run(source).to_string()
}

// Truthiness

#[test]
fn test_only_false_is_falsy() {
    assert!(!is_truthy(&ScriptValue::new(false)));
    assert!(is_truthy(&ScriptValue::new(true)));
    assert!(is_truthy(&ScriptValue::new(0_i32)));
    assert!(is_truthy(&ScriptValue::Nil));
    assert!(is_truthy(&ScriptValue::new(String::new())));
}

// Branching

#[test]
fn test_cond_picks_first_true_clause() {
    assert_eq!(run_as::<i32>("(cond (true 1) (false 2))"), 1);
    assert_eq!(run_as::<i32>("(cond (false 1) (true 2))"), 2);
    assert!(run("(cond (false 1))").is_nil());
}

#[test]
fn test_cond_skips_untaken_clauses() {
    assert_eq!(run_as::<i32>("(cond (false (missing)) (true 3) ((missing) 4))"), 3);
}

#[test]
fn test_cond_rejects_non_list_clause() {
    assert!(matches!(
        run_err("(cond 1)"),
        ScriptErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_if_branches() {
    assert_eq!(run_as::<i32>("(if false 1 2)"), 2);
    assert_eq!(run_as::<i32>("(if true 1 2)"), 1);
    assert_eq!(run_as::<i32>("(if 0 1 2)"), 1);
    assert!(run("(if false 1)").is_nil());
}

#[test]
fn test_if_evaluates_only_taken_branch() {
    assert_eq!(run_as::<i32>("(if true 1 (missing))"), 1);
    assert_eq!(run_as::<i32>("(if false (missing) 2)"), 2);
}

#[test]
fn test_return_passes_through_branches() {
    assert_eq!(run_as::<i32>("(def f (x) (if (> x 0) (return 1)) 2) (f 5)"), 1);
    assert_eq!(run_as::<i32>("(def f (x) (if (> x 0) (return 1)) 2) (f -5)"), 2);
    assert_eq!(
        run_as::<i32>("(def f (x) (cond ((> x 0) (return 7))) 8) (f 1)"),
        7
    );
}

#[test]
fn test_and_or_short_circuit() {
    assert!(!run_as::<bool>("(and true false (missing))"));
    assert!(run_as::<bool>("(or false true (missing))"));
    assert_eq!(run_as::<i32>("(and 1 2)"), 2);
    assert_eq!(run_as::<i32>("(or false 5)"), 5);
    assert!(run_as::<bool>("(and)"));
    assert!(!run_as::<bool>("(or)"));
}

#[test]
fn test_not() {
    assert!(run_as::<bool>("(not false)"));
    assert!(!run_as::<bool>("(not 0)"));
}

// Binding forms

#[test]
fn test_do_and_begin_yield_last() {
    assert_eq!(run_as::<i32>("(do 123)"), 123);
    assert_eq!(run_as::<i32>("(do 1 2 3)"), 3);
    assert_eq!(run_as::<i32>("(begin 1 2 3)"), 3);
    assert_eq!(run_as::<i32>("(eval 123)"), 123);
}

#[test]
fn test_return_exits_do() {
    assert_eq!(run_as::<i32>("(do 1 (return 2) 3)"), 2);
    assert!(run("(do (return) 2)").is_nil());
}

#[test]
fn test_assign_and_declare() {
    assert_eq!(run_as::<i32>("(do (= foo 123) foo)"), 123);
    assert_eq!(run_as::<i32>("(do (var foo 123) foo)"), 123);
    assert_eq!(run_as::<i32>("(= foo 456)"), 456);
}

#[test]
fn test_begin_scopes_var_but_not_assign() {
    assert_eq!(
        run_as::<i32>("(do (= foo 123) (begin (= foo 456)) foo)"),
        456
    );
    assert_eq!(
        run_as::<i32>("(do (= foo 123) (begin (var foo 456)) foo)"),
        123
    );
}

#[test]
fn test_begin_drops_new_bindings() {
    assert!(matches!(
        run_err("(do (begin (var inner 1)) inner)"),
        ScriptErrorKind::UndefinedSymbol { .. }
    ));
}

#[test]
fn test_assign_requires_symbol() {
    assert!(matches!(
        run_err("(= 1 2)"),
        ScriptErrorKind::TypeMismatch { .. }
    ));
    assert_eq!(run_err("(= foo)"), ScriptErrorKind::MissingArgument);
}

#[test]
fn test_def_rejects_bad_parameter_list() {
    assert!(matches!(
        run_err("(def f (1) 2)"),
        ScriptErrorKind::TypeMismatch { .. }
    ));
    assert!(matches!(
        run_err("(lambda x 2)"),
        ScriptErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_print_joins_with_spaces() {
    let handler = buffer_handler();
    let mut env = new_env(handler.clone());
    let value = env
        .exec("(? 'hello' 'world')")
        .unwrap_or_else(|err| panic!("print failed: {err}"));
    assert_eq!(value.get::<String>(), Some(String::from("hello world")));
    let value = env
        .exec("(? 'hello world' 1 true)")
        .unwrap_or_else(|err| panic!("print failed: {err}"));
    assert_eq!(value.get::<String>(), Some(String::from("hello world 1 true")));
    assert_eq!(handler.output(), "hello world\nhello world 1 true\n");
}

// Operators

#[test]
fn test_arithmetic_same_type() {
    assert_eq!(run_as::<i32>("(+ 1 2)"), 3);
    assert_eq!(run_as::<i32>("(- 10 3 2)"), 5);
    assert_eq!(run_as::<i32>("(* 4 5)"), 20);
    assert_eq!(run_as::<i32>("(/ 7 2)"), 3);
    assert_eq!(run_as::<i32>("(% 7 2)"), 1);
}

#[test]
fn test_arithmetic_promotes() {
    assert_eq!(run_as::<f64>("(+ 1 2.5)"), 3.5);
    assert_eq!(run_as::<f32>("(+ 1 2.f)"), 3.0);
    assert_eq!(run_as::<f64>("(* 2.f 1.5)"), 3.0);
    assert_eq!(run_as::<i64>("(+ 1u 2l)"), 3);
    assert_eq!(run_as::<u64>("(+ 1u 2ul)"), 3);
}

#[test]
fn test_integer_arithmetic_wraps() {
    assert_eq!(run_as::<i32>("(+ 2147483647 1)"), i32::MIN);
    assert_eq!(run_as::<u8>("(+ (uint8 255) (uint8 1))"), 0);
}

#[test]
fn test_integer_division_by_zero() {
    assert_eq!(run_err("(/ 1 0)"), ScriptErrorKind::DivisionByZero);
    assert_eq!(run_err("(% 1 0)"), ScriptErrorKind::DivisionByZero);
    assert!(run_as::<f64>("(/ 1.0 0.0)").is_infinite());
}

#[test]
fn test_string_concatenation() {
    assert_eq!(run_as::<String>("(+ 'a' 'b' 'c')"), "abc");
}

#[test]
fn test_arithmetic_errors() {
    assert_eq!(
        run_err("(+ 1)"),
        ScriptErrorKind::ArityMismatch {
            name: String::from("+"),
            expected: 2,
            got: 1,
        }
    );
    assert_eq!(
        run_err("(+ 1 true)"),
        ScriptErrorKind::TypeMismatch {
            name: String::from("+"),
            position: 1,
            expected: String::from("number"),
            got: String::from("bool"),
        }
    );
}

#[test]
fn test_comparisons() {
    assert!(run_as::<bool>("(< 1 2.5)"));
    assert!(run_as::<bool>("(<= 2 2)"));
    assert!(run_as::<bool>("(> 3u 2)"));
    assert!(run_as::<bool>("(>= 2.f 2)"));
    assert!(!run_as::<bool>("(> 1 2)"));
    assert!(run_as::<bool>("(< 'a' 'b')"));
}

#[test]
fn test_equality() {
    assert!(run_as::<bool>("(== 1 1.0)"));
    assert!(run_as::<bool>("(== 'a' 'a')"));
    assert!(run_as::<bool>("(!= 'a' 'b')"));
    assert!(run_as::<bool>("(== nil nil)"));
    assert!(!run_as::<bool>("(== nil 0)"));
    assert!(!run_as::<bool>("(== true 1)"));
    assert!(run_as::<bool>("(== :foo (hash 'foo'))"));
}

#[test]
fn test_ordering_needs_comparable_values() {
    assert!(matches!(
        run_err("(< true false)"),
        ScriptErrorKind::TypeMismatch { .. }
    ));
    assert!(matches!(
        run_err("(< 1)"),
        ScriptErrorKind::ArityMismatch { .. }
    ));
}

// Types

#[test]
fn test_casts() {
    assert_eq!(run_as::<i8>("(int8 1)"), 1);
    assert_eq!(run_as::<i8>("(int8 1.f)"), 1);
    assert_eq!(run_as::<i16>("(int16 2)"), 2);
    assert_eq!(run_as::<i32>("(int32 3.9)"), 3);
    assert_eq!(run_as::<i64>("(int64 4)"), 4);
    assert_eq!(run_as::<u8>("(uint8 300)"), 44);
    assert_eq!(run_as::<u16>("(uint16 6)"), 6);
    assert_eq!(run_as::<u32>("(uint32 7.f)"), 7);
    assert_eq!(run_as::<u64>("(uint64 8)"), 8);
    assert_eq!(run_as::<f32>("(float 9.f)"), 9.0);
    assert_eq!(run_as::<f64>("(double 10)"), 10.0);
}

#[test]
fn test_cast_rejects_non_numbers() {
    assert!(matches!(
        run_err("(int32 'x')"),
        ScriptErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_type_queries() {
    assert!(run_as::<bool>("(is? 1 :i32)"));
    assert!(!run_as::<bool>("(is? 1 :f32)"));
    assert!(run_as::<bool>("(is? 1 (typeof 2))"));
    assert!(run_as::<bool>("(nil? nil)"));
    assert!(!run_as::<bool>("(nil? 0)"));
    assert_eq!(run_as::<TypeId>("(typeof 1)"), TypeId::of::<i32>());
    assert!(run_as::<bool>("(== (typeof 1.f) :f32)"));
}

#[test]
fn test_hash() {
    assert_eq!(run_as::<HashValue>("(hash 'hello')"), hash("hello"));
    assert_eq!(run_as::<HashValue>("(hash :hello)"), hash("hello"));
}

// Containers

#[test]
fn test_array_construction_and_size() {
    assert_eq!(rendered("[1 2 3]"), "[1 2 3]");
    assert_eq!(run_as::<i32>("(array-size [1 2 3])"), 3);
    assert!(run_as::<bool>("(array-empty [])"));
    assert!(!run_as::<bool>("(array-empty [1])"));
}

#[test]
fn test_array_mutation_is_shared() {
    let source = "(do (= a [1]) (= b a) (array-push b 2) (array-size a))";
    assert_eq!(run_as::<i32>(source), 2);
}

#[test]
fn test_array_operations() {
    assert_eq!(rendered("(do (= a [1 3]) (array-insert a 1 2) a)"), "[1 2 3]");
    assert_eq!(rendered("(do (= a [1 3]) (array-insert a 2 4) a)"), "[1 3 4]");
    assert_eq!(run_as::<i32>("(array-erase [5 6 7] 1)"), 6);
    assert_eq!(rendered("(do (= a [5 6 7]) (array-erase a 0) a)"), "[6 7]");
    assert_eq!(rendered("(do (= a [1 2]) (array-set a 0 9) a)"), "[9 2]");
    assert_eq!(run_as::<i32>("(array-at [10 20] 1)"), 20);
    assert_eq!(run_as::<i32>("(array-pop [1 2])"), 2);
    assert!(run("(array-pop [])").is_nil());
}

#[test]
fn test_array_index_errors() {
    assert!(matches!(run_err("(array-at [1] 1)"), ScriptErrorKind::Custom { .. }));
    assert!(matches!(run_err("(array-at [1] -1)"), ScriptErrorKind::Custom { .. }));
    assert!(matches!(
        run_err("(array-insert [1] 5 0)"),
        ScriptErrorKind::Custom { .. }
    ));
    assert!(matches!(
        run_err("(array-size 1)"),
        ScriptErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_array_foreach() {
    let source = "(do (= sum 0) (array-foreach [1 2 3] (lambda (x) (= sum (+ sum x)))) sum)";
    assert_eq!(run_as::<i32>(source), 6);
}

#[test]
fn test_map_construction_and_lookup() {
    assert_eq!(run_as::<i32>("(map-size {:a 1 :b 2})"), 2);
    assert_eq!(run_as::<i32>("(map-get {:a 1} :a)"), 1);
    assert_eq!(run_as::<i32>("(map-get {:a 1} 'a')"), 1);
    assert!(run("(map-get {:a 1} :b)").is_nil());
    assert_eq!(run_as::<i32>("(map-get-or {:a 1} :b 7)"), 7);
    assert!(run_as::<bool>("(map-empty {})"));
}

#[test]
fn test_map_mutation() {
    assert!(!run_as::<bool>("(map-insert {:a 1} :a 2)"));
    assert_eq!(
        run_as::<i32>("(do (= m {:a 1}) (map-insert m :a 2) (map-get m :a))"),
        1
    );
    assert_eq!(
        run_as::<i32>("(do (= m {:a 1}) (map-set m :a 2) (map-get m :a))"),
        2
    );
    assert_eq!(
        run_as::<i32>("(do (= m {:a 1 :b 2}) (map-erase m :a) (map-size m))"),
        1
    );
    assert!(!run_as::<bool>("(map-erase {} :a)"));
}

#[test]
fn test_map_requires_pairs() {
    assert!(matches!(run_err("{:a}"), ScriptErrorKind::Custom { .. }));
    assert!(matches!(
        run_err("{1 2}"),
        ScriptErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_map_foreach() {
    let source =
        "(do (= total 0) (map-foreach {:a 1 :b 2} (lambda (k v) (= total (+ total v)))) total)";
    assert_eq!(run_as::<i32>(source), 3);
}

#[test]
fn test_messages() {
    assert_eq!(
        run_as::<i32>("(do (= m (make-msg :hit :damage 5)) (msg-get m :damage))"),
        5
    );
    assert!(run_as::<bool>("(== (msg-type (make-msg :hit)) :hit)"));
    assert_eq!(run_as::<i32>("(msg-get-or (make-msg :hit) :damage 3)"), 3);
    assert!(run("(msg-get (make-msg :hit) :damage)").is_nil());
    assert!(matches!(
        run_err("(msg-get 1 :damage)"),
        ScriptErrorKind::TypeMismatch { .. }
    ));
}

//! End-to-end behavior of the engine as a host sees it.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::rc::Rc;

use lull_eval::{
    buffer_handler, EngineConfig, FunctionBinder, ScriptEngine, ScriptEnum, ScriptErrorKind, Var,
    VarArray,
};
use lull_ir::{impl_var_value, TypeId};
use lull_registry::Registry;
use pretty_assertions::assert_eq;

fn eval(engine: &ScriptEngine, source: &str) -> Var {
    engine.run_now(source).unwrap()
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Weather {
    Sunny,
    Rainy,
}

impl_var_value!(Weather);

impl ScriptEnum for Weather {
    fn members() -> &'static [(&'static str, Self)] {
        &[("Sunny", Weather::Sunny), ("Rainy", Weather::Rainy)]
    }
}

#[test]
fn cond_takes_first_true_clause() {
    let engine = ScriptEngine::default();
    assert_eq!(eval(&engine, "(cond (true 1) (false 2))").get::<i32>(), Some(&1));
    assert_eq!(eval(&engine, "(cond (false 1) (true 2))").get::<i32>(), Some(&2));
    assert!(eval(&engine, "(cond (false 1))").is_empty());
}

#[test]
fn if_picks_else_branch() {
    let engine = ScriptEngine::default();
    assert_eq!(eval(&engine, "(if false 1 2)").get::<i32>(), Some(&2));
    assert_eq!(eval(&engine, "(if true 1 2)").get::<i32>(), Some(&1));
    assert_eq!(eval(&engine, "(if 0 1 2)").get::<i32>(), Some(&1));
}

#[test]
fn bound_function_dies_with_binder() {
    let engine = ScriptEngine::default();
    {
        let mut binder = FunctionBinder::new(&engine);
        binder.register_function("add", |x: i32, y: i32| x + y);
        assert_eq!(eval(&engine, "(add 12 34)").get::<i32>(), Some(&46));
    }
    let err = engine.run_now("(add 12 34)").unwrap_err();
    assert_eq!(
        err.kind,
        ScriptErrorKind::UndefinedSymbol {
            name: "add".to_owned()
        }
    );
    assert_eq!(eval(&engine, "(+ 12 34)").get::<i32>(), Some(&46));
}

#[test]
fn enum_values_round_trip() {
    let engine = ScriptEngine::default();
    engine.register_enum::<Weather>("Weather");
    engine.register_function("return_enum", || Weather::Rainy);
    engine.register_function("is_sunny", |weather: Weather| weather == Weather::Sunny);

    let value = eval(&engine, "(return_enum)");
    assert!(value.is::<Weather>());
    assert_eq!(value.get::<Weather>(), Some(&Weather::Rainy));

    let type_id = eval(&engine, "(typeof (return_enum))");
    assert_eq!(type_id.get::<TypeId>(), Some(&TypeId::of::<Weather>()));

    assert_eq!(eval(&engine, "(is_sunny Weather.Sunny)").get::<bool>(), Some(&true));
}

struct Inventory {
    items: RefCell<Vec<String>>,
}

impl Inventory {
    fn add(&self, item: String) -> i32 {
        let mut items = self.items.borrow_mut();
        items.push(item);
        i32::try_from(items.len()).unwrap_or(i32::MAX)
    }

    fn has(&self, item: String) -> bool {
        self.items.borrow().contains(&item)
    }
}

#[test]
fn registry_hosts_engine_and_services() {
    let mut registry = Registry::new();
    registry.register(ScriptEngine::new(
        EngineConfig::default().with_print_handler(buffer_handler()),
    ));
    registry.register(Rc::new(Inventory {
        items: RefCell::new(Vec::new()),
    }));
    registry.declare_dependency::<Rc<Inventory>, ScriptEngine>();
    registry.initialize();

    let inventory = Rc::clone(registry.get::<Rc<Inventory>>().unwrap());
    let mut binder = FunctionBinder::from_registry(&registry).unwrap();
    binder.register_mem_fn("inventory-add", &inventory, Inventory::add);
    binder.register_mem_fn("inventory-has", &inventory, Inventory::has);

    let engine = registry.get::<ScriptEngine>().unwrap();
    let mut script = engine
        .read_script(
            "(inventory-add 'lamp')
             (inventory-add 'rope')
             (? 'carrying' (inventory-add item))
             (inventory-has 'rope')",
        )
        .unwrap();
    script.set_value("item", String::from("map"));
    assert_eq!(script.run().unwrap().get::<bool>(), Some(&true));
    assert_eq!(inventory.items.borrow().len(), 3);
    assert_eq!(engine.print_handler().take_output(), "carrying 3\n");

    drop(binder);
    assert!(!engine.is_registered("inventory-add"));
    assert!(script.run().is_err());
}

#[test]
fn script_errors_do_not_poison_engine() {
    let engine = ScriptEngine::default();
    engine.register_function("half", |x: f64| x / 2.0);
    assert!(engine.run_now("(half 'two')").is_err());
    assert!(engine.run_now("(missing 1)").is_err());
    assert!(engine.run_now("(((").is_err());
    assert_eq!(eval(&engine, "(half 5)").get::<f64>(), Some(&2.5));
}

#[test]
fn scripts_call_back_into_host() {
    let engine = ScriptEngine::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    engine.register_function("record", move |value: i32| log.borrow_mut().push(value));

    let mut script = engine
        .read_script(
            "(def each (items f) (array-foreach items f))
             (each [1 2 3] (lambda (n) (record (* n n))))",
        )
        .unwrap();
    script.run().unwrap();
    assert_eq!(*seen.borrow(), vec![1, 4, 9]);

    let items: VarArray = vec![Var::new(5_i32)];
    let result = script
        .call("each", vec![Var::new(items), eval(&engine, "record")])
        .unwrap();
    assert!(result.is_empty());
    assert_eq!(*seen.borrow(), vec![1, 4, 9, 5]);
}

use super::*;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<&'static str>>>;

struct Audio {
    volume: u32,
}

struct Input;

struct Scripting {
    volume_seen: u32,
}

#[test]
fn test_get_returns_registered_instance() {
    let mut registry = Registry::new();
    assert!(registry.get::<Audio>().is_none());
    registry.register(Audio { volume: 7 });
    assert_eq!(registry.get::<Audio>().map(|audio| audio.volume), Some(7));
    assert!(registry.contains::<Audio>());
    assert!(!registry.contains::<Input>());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_get_mut() {
    let mut registry = Registry::new();
    registry.register(Audio { volume: 1 });
    if let Some(audio) = registry.get_mut::<Audio>() {
        audio.volume = 9;
    }
    assert_eq!(registry.get::<Audio>().map(|audio| audio.volume), Some(9));
}

#[test]
#[should_panic(expected = "registered twice")]
fn test_double_registration_panics() {
    let mut registry = Registry::new();
    registry.register(Input);
    registry.register(Input);
}

#[test]
fn test_initializer_sees_dependency() {
    let mut registry = Registry::new();
    registry.register(Scripting { volume_seen: 0 });
    registry.register(Audio { volume: 0 });
    registry.declare_dependency::<Scripting, Audio>();
    registry.register_initializer::<Scripting>(|scripting, registry| {
        scripting.volume_seen = registry.get::<Audio>().map_or(0, |audio| audio.volume);
    });
    registry.register_initializer::<Audio>(|audio, _| audio.volume = 11);
    registry.initialize();
    assert_eq!(registry.get::<Scripting>().map(|s| s.volume_seen), Some(11));
}

#[test]
fn test_initializers_run_once() {
    let log: Log = Rc::default();
    let mut registry = Registry::new();
    registry.register(Input);
    let sink = Rc::clone(&log);
    registry.register_initializer::<Input>(move |_, _| sink.borrow_mut().push("input"));
    registry.initialize();
    registry.initialize();
    assert_eq!(*log.borrow(), vec!["input"]);
}

#[test]
fn test_missing_dependency_reports_every_pair() {
    let mut registry = Registry::new();
    registry.register(Scripting { volume_seen: 0 });
    registry.declare_dependency::<Scripting, Audio>();
    registry.declare_dependency::<Scripting, Input>();
    let Err(RegistryError::MissingDependencies(missing)) = registry.try_initialize() else {
        panic!("expected missing dependencies");
    };
    assert_eq!(missing.len(), 2);
    assert_eq!(missing[0].dependency, type_name::<Audio>());
    assert_eq!(missing[1].dependency, type_name::<Input>());
    assert_eq!(missing[0].dependent, type_name::<Scripting>());
}

#[test]
#[should_panic(expected = "missing registry dependencies")]
fn test_initialize_panics_on_missing_dependency() {
    let mut registry = Registry::new();
    registry.declare_dependency::<Scripting, Audio>();
    registry.initialize();
}

#[test]
fn test_cycle_is_reported() {
    let mut registry = Registry::new();
    registry.register(Audio { volume: 0 });
    registry.register(Input);
    registry.declare_dependency::<Audio, Input>();
    registry.declare_dependency::<Input, Audio>();
    assert!(matches!(
        registry.try_initialize(),
        Err(RegistryError::DependencyCycle(names)) if names.len() == 2
    ));
}

#[test]
fn test_missing_dependency_message() {
    let err = RegistryError::MissingDependencies(vec![MissingDependency {
        dependent: "A",
        dependency: "B",
    }]);
    assert_eq!(err.to_string(), "missing registry dependencies: A depends on B");
}

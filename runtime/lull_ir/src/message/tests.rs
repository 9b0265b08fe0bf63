use super::*;
use crate::hash::hash;
use pretty_assertions::assert_eq;

#[derive(Clone, Debug, PartialEq)]
struct Clicked {
    button: i32,
    label: String,
}

impl Record for Clicked {
    fn to_table(&self) -> VarTable {
        let mut table = VarTable::new();
        table.set(hash("button"), self.button);
        table.set(hash("label"), self.label.clone());
        table
    }

    fn from_table(table: &VarTable) -> Option<Self> {
        Some(Clicked {
            button: *table.try_find(hash("button"))?.get::<i32>()?,
            label: table.try_find(hash("label"))?.get::<String>()?.clone(),
        })
    }
}

fn clicked() -> Clicked {
    Clicked {
        button: 2,
        label: String::from("ok"),
    }
}

#[test]
fn test_concrete_message_type_and_get() {
    let message = Message::new(clicked());
    assert_eq!(message.type_id(), TypeId::of::<Clicked>());
    assert!(!message.is_dynamic());
    assert_eq!(message.get::<Clicked>(), Some(&clicked()));
    assert_eq!(message.get::<String>(), None);
}

#[test]
fn test_concrete_message_reads_fields() {
    let message = Message::new(clicked());
    assert_eq!(message.value_or(hash("button"), 0_i32), 2);
    assert_eq!(message.value_or(hash("missing"), 7_i32), 7);
    assert_eq!(message.values().len(), 2);
}

#[test]
fn test_dynamic_message_rebuilds_record() {
    let mut message = Message::dynamic(TypeId::of::<Clicked>(), VarTable::new());
    assert!(message.set_value(hash("button"), 2_i32));
    assert!(message.set_value(hash("label"), String::from("ok")));
    assert_eq!(message.to_record::<Clicked>(), Some(clicked()));
    assert_eq!(message.get::<Clicked>(), None);
}

#[test]
fn test_to_record_checks_type() {
    let message = Message::dynamic(TypeId::from_hash(hash("other")), VarTable::new());
    assert_eq!(message.to_record::<Clicked>(), None);
}

#[test]
fn test_clone_is_independent() {
    let mut original = Message::dynamic(TypeId::from_hash(hash("event")), VarTable::new());
    assert!(original.set_value(hash("x"), 1_i32));
    let copy = original.clone();
    assert!(original.set_value(hash("x"), 2_i32));
    assert_eq!(copy.value_or(hash("x"), 0_i32), 1);
    assert_eq!(original.value_or(hash("x"), 0_i32), 2);
}

#[test]
fn test_set_value_on_concrete_is_refused() {
    let mut message = Message::new(clicked());
    assert!(!message.set_value(hash("button"), 3_i32));
    assert!(!message.set_value(hash("extra"), 1_i32));
    assert_eq!(message.to_record::<Clicked>(), Some(clicked()));
    assert!(!message.has_value(hash("extra")));
}

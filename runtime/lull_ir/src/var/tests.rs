use super::*;
use crate::hash::hash;
use pretty_assertions::assert_eq;

#[derive(Clone, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn test_default_is_empty() {
    let var = Var::default();
    assert!(var.is_empty());
    assert_eq!(var.type_id(), TypeId::NONE);
    assert_eq!(var.get::<i32>(), None);
    assert_eq!(var.type_name(), "nil");
    assert_eq!(var.count(), 0);
}

#[test]
fn test_get_exact_type_only() {
    let var = Var::new(42_i32);
    assert_eq!(var.get::<i32>(), Some(&42));
    assert_eq!(var.get::<i64>(), None);
    assert_eq!(var.get::<f32>(), None);
    assert!(var.is::<i32>());
    assert_eq!(var.type_id(), TypeId::of::<i32>());
}

#[test]
fn test_custom_type_round_trip() {
    let var = Var::new(Point { x: 1, y: 2 });
    assert_eq!(var.get::<Point>(), Some(&Point { x: 1, y: 2 }));
    assert_eq!(var.type_id(), TypeId::of::<Point>());
}

#[test]
fn test_clone_is_deep() {
    let mut original = Var::new(vec![1, 2, 3]);
    let copy = original.clone();
    if let Some(items) = original.get_mut::<Vec<i32>>() {
        items.push(4);
    }
    assert_eq!(copy.get::<Vec<i32>>(), Some(&vec![1, 2, 3]));
    assert_eq!(original.get::<Vec<i32>>(), Some(&vec![1, 2, 3, 4]));
}

#[test]
fn test_take_moves_and_empties() {
    let mut source = Var::new(String::from("hello"));
    let destination = source.take();
    assert!(source.is_empty());
    assert_eq!(source.get::<String>(), None);
    assert_eq!(destination.get::<String>().map(String::as_str), Some("hello"));
}

#[test]
fn test_value_or() {
    let var = Var::new(7_u8);
    assert_eq!(var.value_or(0_u8), 7);
    assert_eq!(var.value_or(-1_i32), -1);
    assert_eq!(Var::empty().value_or(3.5_f32), 3.5);
}

#[test]
fn test_set_and_clear() {
    let mut var = Var::new(1_i32);
    var.set(String::from("text"));
    assert!(var.is::<String>());
    var.clear();
    assert!(var.is_empty());
}

#[test]
fn test_into_inner() {
    let var = Var::new(Point { x: 3, y: 4 });
    assert_eq!(var.into_inner::<Point>().ok(), Some(Point { x: 3, y: 4 }));

    let var = Var::new(5_i32);
    let back = var.into_inner::<String>().err();
    assert_eq!(back.and_then(|var| var.get::<i32>().copied()), Some(5));
}

#[test]
fn test_table_try_find() {
    let mut table = VarTable::new();
    table.set(hash("a"), 1_i32);
    table.insert(hash("b"), Var::new(2.0_f32));
    assert_eq!(table.len(), 2);
    assert_eq!(table.try_find(hash("a")).and_then(Var::get::<i32>), Some(&1));
    assert!(table.try_find(hash("missing")).is_none());

    let var = Var::new(table);
    assert_eq!(var.count(), 2);
}

#[test]
fn test_array_count() {
    let array: VarArray = vec![Var::new(1_i32), Var::new(2_i32), Var::new(3_i32)];
    assert_eq!(Var::new(array).count(), 3);
    assert_eq!(Var::new(9_i32).count(), 1);
}

#[test]
fn test_display() {
    assert_eq!(Var::new(12_i32).to_string(), "12");
    assert_eq!(Var::new(String::from("hi")).to_string(), "hi");
    assert_eq!(Var::new(true).to_string(), "true");
    assert_eq!(Var::empty().to_string(), "nil");
    let array: VarArray = vec![Var::new(1_i32), Var::new(String::from("x"))];
    assert_eq!(Var::new(array).to_string(), "[1 x]");
    assert!(Var::new(Point { x: 0, y: 0 }).to_string().contains("Point"));
}

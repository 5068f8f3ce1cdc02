use super::{DefaultReduction, Step, reduce_breadth_first, reduce_depth_first};
use crate::arena::{Arena, NodeId};
use crate::error::ReduceError;
use crate::test_utils::{TREE, branch, infer, leaf, union};
use crate::value::{Record, Value};

fn leaf_value(record: &Record) -> Option<i64> {
    match record.get("Value") {
        Some(Value::Int(n)) if record.type_name == "Leaf" => Some(*n),
        _ => None,
    }
}

fn collect_leaves(_: NodeId, record: &Record, mut acc: Vec<i64>) -> Step<Vec<i64>> {
    acc.extend(leaf_value(record));
    Step::Continue(acc)
}

#[test]
fn traversal_orders() {
    let tree = union(&infer(TREE), "Tree");
    let mut arena = Arena::new();
    let root = arena.intern(&tree, branch(branch(leaf(1), leaf(2)), leaf(3))).unwrap();

    let depth = reduce_depth_first(&arena, &tree, root, &mut collect_leaves, Vec::new()).unwrap();
    assert_eq!(depth, [1, 2, 3]);

    let breadth = reduce_breadth_first(&arena, &tree, root, &mut collect_leaves, Vec::new()).unwrap();
    assert_eq!(breadth, [3, 1, 2]);
}

#[test]
fn shared_nodes() {
    let tree = union(&infer(TREE), "Tree");
    let mut arena = Arena::new();
    let shared = arena.push(leaf(5));
    let root = arena.push(branch(shared, shared));
    let mut count = |_: NodeId, _: &Record, n: usize| Step::Continue(n + 1);

    assert_eq!(reduce_depth_first(&arena, &tree, root, &mut count, 0).unwrap(), 3);
    assert_eq!(reduce_breadth_first(&arena, &tree, root, &mut count, 0).unwrap(), 2);
}

#[test]
fn stop_short_circuits() {
    let tree = union(&infer(TREE), "Tree");
    let mut arena = Arena::new();
    let root = arena.intern(&tree, branch(branch(leaf(1), leaf(2)), leaf(3))).unwrap();
    let mut first_leaf = |_: NodeId, record: &Record, found: Option<i64>| match leaf_value(record) {
        Some(n) => Step::Stop(Some(n)),
        None => Step::Continue(found),
    };

    assert_eq!(reduce_depth_first(&arena, &tree, root, &mut first_leaf, None).unwrap(), Some(1));
    assert_eq!(reduce_breadth_first(&arena, &tree, root, &mut first_leaf, None).unwrap(), Some(3));
}

#[test]
fn block_children_in_field_order() {
    let tree = union(&infer(TREE), "Tree");
    let mut arena = Arena::new();
    let block = Record::new("Block")
        .with("Items", Value::List(vec![leaf(1).into(), leaf(2).into()]))
        .with(
            "Named",
            Value::Map(vec![
                (Value::from("x"), leaf(3).into()),
                (Value::from("y"), Value::Null),
            ]),
        );
    let root = arena.intern(&tree, block).unwrap();

    let depth = reduce_depth_first(&arena, &tree, root, &mut collect_leaves, Vec::new()).unwrap();
    assert_eq!(depth, [1, 2, 3]);
}

#[test]
fn default_reduction() {
    let tree = union(&infer(TREE), "Tree");
    let mut arena = Arena::new();
    let root = arena.intern(&tree, branch(leaf(2), leaf(3))).unwrap();

    let mut sum = DefaultReduction::new().on("Leaf", |_, record: &Record, acc: i64| {
        Step::Continue(acc + leaf_value(record).unwrap_or_default())
    });
    assert_eq!(reduce_depth_first(&arena, &tree, root, &mut sum, 0).unwrap(), 5);

    let mut strict = DefaultReduction::new()
        .on("Leaf", |_, _: &Record, acc: i64| Step::Continue(acc))
        .fail_on_fallback(true);
    let err = reduce_depth_first(&arena, &tree, root, &mut strict, 0).unwrap_err();
    assert_eq!(err, ReduceError::Fallback("Branch".to_string()));
    insta::assert_snapshot!(err.to_string(), @"no reduction for Branch");

    let mut stopping = DefaultReduction::new()
        .on("Leaf", |_, _: &Record, acc: i64| Step::Continue(acc + 1))
        .default_stop(true);
    assert_eq!(reduce_depth_first(&arena, &tree, root, &mut stopping, 0).unwrap(), 0);
}

#[test]
fn dangling_root() {
    let tree = union(&infer(TREE), "Tree");
    let mut elsewhere = Arena::new();
    let stray = elsewhere.push(leaf(1));
    let mut count = |_: NodeId, _: &Record, n: usize| Step::Continue(n + 1);

    let err = reduce_breadth_first(&Arena::new(), &tree, stray, &mut count, 0).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"node #0 is not in the arena");
}

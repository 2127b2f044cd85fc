//! Non-recursive, bulk, and recursive removal semantics.

use hivereg::{Hive, RegError, Root, Status, create, exists, query, remove};

#[test]
fn remove_key_is_false_on_absence_and_true_on_removal() {
    let hive = Hive::open_in_memory().expect("hive");

    assert!(!remove::remove_key(&hive, Root::Software, "ghost").expect("absent"));

    create::create_key(&hive, Root::Software, "leaf").expect("create");
    assert!(remove::remove_key(&hive, Root::Software, "leaf").expect("remove"));
    assert!(!exists::key_exists(&hive, Root::Software, "leaf"));
}

#[test]
fn remove_key_fails_loudly_while_children_remain() {
    let hive = Hive::open_in_memory().expect("hive");

    create::create_key(&hive, Root::Software, "parent/child").expect("create");
    match remove::remove_key(&hive, Root::Software, "parent") {
        Err(RegError::SystemFailure { code, .. }) => {
            assert_eq!(code, Status::NOT_EMPTY.code());
        }
        other => panic!("expected SystemFailure(NOT_EMPTY), got {other:?}"),
    }
    // Nothing was removed.
    assert!(exists::key_exists(&hive, Root::Software, "parent/child"));
}

#[test]
fn remove_cluster_clears_deep_and_wide_trees() {
    let hive = Hive::open_in_memory().expect("hive");

    // Ten nested levels under the first sibling, plus flat siblings.
    let deep = "top/d1/d2/d3/d4/d5/d6/d7/d8/d9/d10";
    create::create_integer(&hive, Root::Software, deep, "marker", 1).expect("deep");
    for sibling in ["top/s1", "top/s2", "top/s3"] {
        create::create_string(&hive, Root::Software, sibling, "tag", "x").expect("sibling");
    }

    assert!(remove::remove_cluster(&hive, Root::Software, "top").expect("cluster"));
    assert!(!exists::key_exists(&hive, Root::Software, "top"));
    assert!(!exists::key_exists(&hive, Root::Software, deep));
    assert!(!exists::key_exists(&hive, Root::Software, "top/s2"));

    assert!(!remove::remove_cluster(&hive, Root::Software, "top").expect("already gone"));
}

#[test]
fn remove_subkeys_leaves_the_node_and_its_entries() {
    let hive = Hive::open_in_memory().expect("hive");

    create::create_string(&hive, Root::Software, "app", "version", "1.2").expect("entry");
    create::create_key(&hive, Root::Software, "app/cache/images").expect("nested");
    create::create_integer(&hive, Root::Software, "app/state", "dirty", 1).expect("child entry");

    let before = query::key_info(&hive, Root::Software, "app").expect("before");
    assert_eq!(before.subkeys, 2);

    assert!(remove::remove_subkeys(&hive, Root::Software, "app").expect("subkeys"));

    let after = query::key_info(&hive, Root::Software, "app").expect("after");
    assert_eq!(after.subkeys, 0);
    assert!(!exists::key_exists(&hive, Root::Software, "app/cache/images"));
    // The parent's own entry survives.
    assert_eq!(
        query::read_string(&hive, Root::Software, "app", "version").expect("read"),
        "1.2"
    );

    // Second run: nothing left to remove.
    assert!(!remove::remove_subkeys(&hive, Root::Software, "app").expect("idempotent"));
    assert!(!remove::remove_subkeys(&hive, Root::Software, "ghost").expect("absent"));
}

#[test]
fn remove_values_leaves_the_node_and_its_subkeys() {
    let hive = Hive::open_in_memory().expect("hive");

    create::create_integer(&hive, Root::Software, "app", "a", 1).expect("a");
    create::create_string(&hive, Root::Software, "app", "b", "x").expect("b");
    create::create_integer(&hive, Root::Software, "app/child", "keep", 5).expect("child");

    assert!(remove::remove_values(&hive, Root::Software, "app").expect("values"));

    let info = query::key_info(&hive, Root::Software, "app").expect("info");
    assert_eq!(info.values, 0);
    assert_eq!(info.subkeys, 1);
    // Entries below the direct children are untouched.
    assert_eq!(
        query::read_integer(&hive, Root::Software, "app/child", "keep").expect("read"),
        5
    );

    assert!(!remove::remove_values(&hive, Root::Software, "app").expect("nothing left"));
    assert!(!remove::remove_values(&hive, Root::Software, "ghost").expect("absent"));
}

#[test]
fn remove_value_requires_both_key_and_value() {
    let hive = Hive::open_in_memory().expect("hive");

    assert!(!remove::remove_value(&hive, Root::Software, "ghost", "x").expect("no key"));

    create::create_key(&hive, Root::Software, "app").expect("create");
    assert!(!remove::remove_value(&hive, Root::Software, "app", "x").expect("no value"));

    create::create_integer(&hive, Root::Software, "app", "x", 3).expect("value");
    assert!(remove::remove_value(&hive, Root::Software, "app", "x").expect("removed"));
    assert!(!exists::value_exists(&hive, Root::Software, "app", "x"));
}

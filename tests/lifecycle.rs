//! End-to-end key/value lifecycle: create, read, update, remove.

use hivereg::{Disposition, Hive, Root, TypedValue, create, exists, query, remove, update};
use tempfile::tempdir;

#[test]
fn key_exists_tracks_create_and_remove() {
    let hive = Hive::open_in_memory().expect("hive");

    assert!(!exists::key_exists(&hive, Root::Software, "acme/app"));
    let (_, disposition) = create::create_key(&hive, Root::Software, "acme/app").expect("create");
    assert_eq!(disposition, Disposition::KeyCreated);
    assert!(exists::key_exists(&hive, Root::Software, "acme/app"));

    assert!(remove::remove_cluster(&hive, Root::Software, "acme").expect("cluster"));
    assert!(!exists::key_exists(&hive, Root::Software, "acme/app"));
    assert!(!exists::key_exists(&hive, Root::Software, "acme"));
}

#[test]
fn create_key_is_idempotent_and_preserves_contents() {
    let hive = Hive::open_in_memory().expect("hive");

    let (_, first) = create::create_key(&hive, Root::User, "prefs").expect("first create");
    assert_eq!(first, Disposition::KeyCreated);
    create::create_integer(&hive, Root::User, "prefs", "volume", 7).expect("value");
    create::create_key(&hive, Root::User, "prefs/advanced").expect("subkey");

    let (_, second) = create::create_key(&hive, Root::User, "prefs").expect("second create");
    assert_eq!(second, Disposition::KeyExisted);

    // The second call left children and entries alone.
    let info = query::key_info(&hive, Root::User, "prefs").expect("info");
    assert_eq!(info.subkeys, 1);
    assert_eq!(info.values, 1);
    assert_eq!(
        query::read_integer(&hive, Root::User, "prefs", "volume").expect("read"),
        7
    );
}

#[test]
fn create_value_ensures_present_without_overwriting() {
    let hive = Hive::open_in_memory().expect("hive");

    let (_, first) =
        create::create_integer(&hive, Root::Software, "acme", "retries", 3).expect("create");
    assert_eq!(first, Disposition::ValueCreated);

    // A second create with different data reports existence and changes nothing.
    let (_, second) =
        create::create_integer(&hive, Root::Software, "acme", "retries", 99).expect("re-create");
    assert_eq!(second, Disposition::ValueExisted);
    assert_eq!(
        query::read_integer(&hive, Root::Software, "acme", "retries").expect("read"),
        3
    );

    let (_, text) =
        create::create_string(&hive, Root::Software, "acme", "greeting", "hello").expect("create");
    assert_eq!(text, Disposition::ValueCreated);
    let (_, text_again) =
        create::create_string(&hive, Root::Software, "acme", "greeting", "other").expect("again");
    assert_eq!(text_again, Disposition::ValueExisted);
    assert_eq!(
        query::read_string(&hive, Root::Software, "acme", "greeting").expect("read"),
        "hello"
    );
}

#[test]
fn create_value_reports_entry_disposition_when_key_is_created_too() {
    let hive = Hive::open_in_memory().expect("hive");

    let (_, disposition) =
        create::create_integer(&hive, Root::Config, "fresh/nested/deep", "x", 1).expect("create");
    assert_eq!(disposition, Disposition::ValueCreated);
    assert!(exists::key_exists(&hive, Root::Config, "fresh/nested/deep"));
}

#[test]
fn create_value_under_empty_path_attaches_to_root() {
    let hive = Hive::open_in_memory().expect("hive");

    let (_, disposition) =
        create::create_string(&hive, Root::Machine, "", "motd", "welcome").expect("create");
    assert_eq!(disposition, Disposition::ValueCreated);
    assert!(exists::value_exists(&hive, Root::Machine, "", "motd"));
    assert_eq!(
        query::read_string(&hive, Root::Machine, "", "motd").expect("read"),
        "welcome"
    );
}

#[test]
fn default_entry_has_empty_name() {
    let hive = Hive::open_in_memory().expect("hive");

    create::create_string(&hive, Root::Software, "acme", "", "default data").expect("create");
    assert!(exists::value_exists(&hive, Root::Software, "acme", ""));
    assert_eq!(
        query::read_string(&hive, Root::Software, "acme", "").expect("read"),
        "default data"
    );
}

#[test]
fn integer_round_trip_covers_extremes() {
    let hive = Hive::open_in_memory().expect("hive");
    create::create_integer(&hive, Root::Software, "acme", "n", 1).expect("create");

    for data in [0u32, 1, 42, u32::MAX] {
        update::write_integer(&hive, Root::Software, "acme", "n", data).expect("write");
        assert_eq!(
            query::read_integer(&hive, Root::Software, "acme", "n").expect("read"),
            data
        );
    }
}

#[test]
fn string_round_trip_covers_empty_and_control_characters() {
    let hive = Hive::open_in_memory().expect("hive");
    create::create_string(&hive, Root::Software, "acme", "s", "seed").expect("create");

    for data in ["", "x", "line one\r\nline two\ttabbed", "café"] {
        update::write_string(&hive, Root::Software, "acme", "s", data).expect("write");
        assert_eq!(
            query::read_string(&hive, Root::Software, "acme", "s").expect("read"),
            data
        );
    }
}

#[test]
fn scenario_nested_key_value_full_lifecycle() {
    let hive = Hive::open_in_memory().expect("hive");

    create::create_key(&hive, Root::Software, "A/B/C").expect("create key");
    create::create_integer(&hive, Root::Software, "A/B/C", "X", 42).expect("create value");
    assert_eq!(
        query::read_integer(&hive, Root::Software, "A/B/C", "X").expect("read"),
        42
    );

    update::write_integer(&hive, Root::Software, "A/B/C", "X", 0).expect("update");
    assert_eq!(
        query::read_integer(&hive, Root::Software, "A/B/C", "X").expect("read back"),
        0
    );

    assert!(remove::remove_value(&hive, Root::Software, "A/B/C", "X").expect("remove value"));
    assert!(!exists::value_exists(&hive, Root::Software, "A/B/C", "X"));

    assert!(remove::remove_cluster(&hive, Root::Software, "A").expect("remove cluster"));
    assert!(!exists::key_exists(&hive, Root::Software, "A"));
    assert!(!exists::key_exists(&hive, Root::Software, "A/B/C"));
}

#[test]
fn paths_accept_both_separators_and_ignore_case() {
    let hive = Hive::open_in_memory().expect("hive");

    create::create_key(&hive, Root::Software, "Vendor\\Product").expect("create");
    assert!(exists::key_exists(&hive, Root::Software, "vendor/product"));
    assert!(exists::key_exists(&hive, Root::Software, "VENDOR\\PRODUCT"));
}

#[test]
fn typed_value_dispatch_creates_matching_types() {
    let hive = Hive::open_in_memory().expect("hive");

    create::create_value(&hive, Root::Software, "acme", "n", TypedValue::Integer(5))
        .expect("int");
    create::create_value(
        &hive,
        Root::Software,
        "acme",
        "s",
        TypedValue::Text("t".into()),
    )
    .expect("text");
    assert_eq!(
        query::read_integer(&hive, Root::Software, "acme", "n").expect("read n"),
        5
    );
    assert_eq!(
        query::read_string(&hive, Root::Software, "acme", "s").expect("read s"),
        "t"
    );
}

#[test]
fn hive_file_persists_across_reopens() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("hive.db");

    {
        let hive = Hive::open(&path).expect("first open");
        create::create_integer(&hive, Root::System, "boot", "attempts", 2).expect("create");
    }

    let hive = Hive::open(&path).expect("reopen");
    assert!(exists::key_exists(&hive, Root::System, "boot"));
    assert_eq!(
        query::read_integer(&hive, Root::System, "boot", "attempts").expect("read"),
        2
    );
}

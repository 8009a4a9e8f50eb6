//! Registry and evaluator integration tests
//!
//! End-to-end scenarios over the public surface: registration, lookup,
//! expression checking, and merges with data hooks.

use rstest::rstest;
use serde_json::{json, Value};
use vexil::{Data, Flag, FlagRegistry};

fn roles() -> FlagRegistry {
    FlagRegistry::with_flags([
        Flag::new("admin", "A").with_lvl(3),
        Flag::new("user", "U").with_lvl(1),
        Flag::new("guest", "G"),
    ])
}

fn data(value: Value) -> Data {
    value.as_object().cloned().unwrap_or_default()
}

// === Registration ===

#[test]
fn test_registration_is_idempotent() {
    let mut registry = FlagRegistry::new();
    registry.add([Flag::new("admin", "A").with_lvl(1)]);
    registry.add([Flag::new("admin", "A").with_lvl(1)]);

    assert_eq!(registry.len(), 1);
    let admin = registry.exists("admin").unwrap();
    assert_eq!(admin.code, "A");
    assert_eq!(admin.lvl, 1);
}

#[test]
fn test_override_replaces_in_place() {
    let mut registry = FlagRegistry::with_flags([Flag::new("admin", "A").with_lvl(1)]);
    registry.add([Flag::new("admin", "B").with_lvl(5)]);

    assert_eq!(registry.len(), 1);
    let admin = registry.exists("admin").unwrap();
    assert_eq!(admin.code, "B");
    assert_eq!(admin.lvl, 5);
    assert!(admin.data.is_none());
    assert!(admin.add.is_none());
    assert!(admin.remove.is_none());
}

#[test]
fn test_override_lowercases_stored_name() {
    let mut registry = FlagRegistry::with_flags([Flag::new("Admin", "A")]);
    registry.add([Flag::new("aDmIn", "B")]);

    assert_eq!(registry.all()[0].name, "admin");
}

#[test]
fn test_exists_resolves_either_case() {
    let registry = roles();
    let by_upper = registry.exists("ADMIN").unwrap();
    let by_lower = registry.exists("admin").unwrap();
    assert_eq!(by_upper.code, by_lower.code);
}

// === Levels and codes ===

#[test]
fn test_lvl_is_monotonic_over_the_list() {
    let registry = roles();
    assert_eq!(registry.lvl("admin user"), 3);
    assert_eq!(registry.lvl("user"), 1);
    assert_eq!(registry.lvl(""), 0);
    assert_eq!(registry.lvl("unknown"), 0);
}

#[test]
fn test_codes_concatenate_in_order() {
    let registry = roles();
    assert_eq!(registry.codes("admin user"), "AU");
    assert_eq!(registry.codes("user admin"), "UA");
}

// === Expression checking ===

#[rstest]
#[case("admin user", "admin", true)]
#[case("admin user", "!guest", true)]
#[case("admin user", "!admin", false)]
#[case("admin user", "admin|guest", true)]
#[case("guest", "admin|moderator", false)]
#[case("admin", "admin+", true)]
#[case("", "admin+", false)]
#[case("admin user", "admin !guest", true)]
#[case("admin user", "admin guest", false)]
#[case("anything at all", "", true)]
#[case("admin", "   ", true)]
fn test_check_matrix(#[case] list: &str, #[case] expr: &str, #[case] expected: bool) {
    assert_eq!(roles().check(list, expr), expected);
}

#[test]
fn test_threshold_not_expanded_inside_alternation() {
    let registry = roles();
    // "admin+" as an alternative is a literal membership token, so neither
    // alternative matches the list "admin".
    assert!(!registry.check("admin", "guest|admin+"));
    assert!(registry.check("admin", "admin+"));
}

#[test]
fn test_check_does_not_resolve_codes() {
    let registry = roles();
    assert!(!registry.check("A", "admin"));
    assert!(registry.check("A U", "A U"));
}

// === Merging ===

#[test]
fn test_set_swaps_flags_and_drops_data_key() {
    let registry = roles();
    let initial = data(json!({"existing": "data", "admin": {"seat": 1}}));

    let result = registry.set("admin", initial, "!admin user");
    assert_eq!(result.flags, "user");
    assert!(!result.data.contains_key("admin"));
    assert_eq!(result.data["existing"], json!("data"));
}

#[test]
fn test_set_seeds_default_data_once() {
    let registry =
        FlagRegistry::with_flags([Flag::new("pro", "P").with_data(data(json!({"quota": 10})))]);

    let first = registry.set("", Data::new(), "pro");
    assert_eq!(first.data["pro"], json!({"quota": 10}));

    // An existing entry under the flag's name is never overwritten.
    let flags = first.flags.clone();
    let mut carried = first.data;
    carried.insert("pro".to_string(), json!({"quota": 99}));
    let second = registry.set(&flags, carried, "pro");
    assert_eq!(second.data["pro"], json!({"quota": 99}));
}

#[test]
fn test_add_hook_runs_per_activation() {
    let registry = FlagRegistry::with_flags([Flag::new("session", "S").on_add(|mut data| {
        let count = data.get("logins").and_then(Value::as_u64).unwrap_or(0);
        data.insert("logins".to_string(), json!(count + 1));
        data
    })]);

    let first = registry.set("", Data::new(), "session");
    assert_eq!(first.data["logins"], json!(1));

    // Threading the returned map through a second call accumulates.
    let second = registry.set(&first.flags.clone(), first.data, "session");
    assert_eq!(second.data["logins"], json!(2));
    assert_eq!(second.flags, "session");
}

#[test]
fn test_remove_hook_runs_on_deactivation() {
    let registry = FlagRegistry::with_flags([Flag::new("admin", "A").on_remove(|mut data| {
        data.insert("revoked".to_string(), json!(true));
        data
    })]);

    let result = registry.set("admin user", Data::new(), "!admin");
    assert_eq!(result.flags, "user");
    assert_eq!(result.data["revoked"], json!(true));
}

#[test]
fn test_set_adds_stored_name_not_raw_token() {
    let registry = FlagRegistry::with_flags([Flag::new("Admin", "A")]);
    let result = registry.set("user", Data::new(), "ADMIN");
    assert_eq!(result.flags, "user Admin");
}

#[test]
fn test_set_resolves_codes() {
    let registry = roles();
    let result = registry.set("", Data::new(), "A U");
    assert_eq!(result.flags, "admin user");
}

#[test]
fn test_set_removal_of_absent_flag_is_harmless() {
    let registry = roles();
    let result = registry.set("user", data(json!({"keep": 1})), "!admin");
    assert_eq!(result.flags, "user");
    assert_eq!(result.data["keep"], json!(1));
}

#[test]
fn test_set_directive_order_drives_hooks() {
    // Activate then deactivate in one expression: both hooks run, and the
    // flag ends up absent.
    let registry = FlagRegistry::with_flags([Flag::new("trial", "T")
        .on_add(|mut data| {
            data.insert("started".to_string(), json!(true));
            data
        })
        .on_remove(|mut data| {
            data.insert("ended".to_string(), json!(true));
            data
        })]);

    let result = registry.set("", Data::new(), "trial !trial");
    assert_eq!(result.flags, "");
    assert_eq!(result.data["started"], json!(true));
    assert_eq!(result.data["ended"], json!(true));
}

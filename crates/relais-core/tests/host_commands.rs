//! Host behaviour through the dispatch surface, on a headless desktop.

use std::path::PathBuf;
use std::sync::Arc;

use relais_core::{Config, Database, HeadlessDesktop, Host, Position};
use serde_json::{json, Value};

struct Fixture {
    host: Host,
    desktop: HeadlessDesktop,
    db: Database,
}

fn fixture() -> Fixture {
    let db = Database::open_in_memory().unwrap();
    fixture_on(db)
}

fn fixture_on(db: Database) -> Fixture {
    let desktop = HeadlessDesktop::new();
    let config = Config::new(PathBuf::from("/tmp/relais-test"));
    let host = Host::with_database(config, db.clone(), Arc::new(desktop.clone())).unwrap();
    Fixture { host, desktop, db }
}

fn create(host: &Host, label: &str) {
    host.dispatch(
        "main",
        "view_create",
        json!({"url": "https://example.com", "label": label}),
    )
    .unwrap();
}

#[test]
fn test_view_create_then_close_twice() {
    let f = fixture();

    let created = f.host.dispatch(
        "main",
        "view_create",
        json!({"url": "https://example.com", "label": "v1"}),
    );
    assert_eq!(created, Ok(Value::Null));
    assert_eq!(f.desktop.open_labels(), vec!["ctrl_v1", "main", "v1"]);

    assert_eq!(
        f.host.dispatch("main", "view_close", json!({"label": "v1"})),
        Ok(Value::Null)
    );
    assert_eq!(f.desktop.open_labels(), vec!["main"]);

    assert_eq!(
        f.host.dispatch("main", "view_close", json!({"label": "v1"})),
        Err("view not found: v1".to_string())
    );
}

#[test]
fn test_view_sits_next_to_its_ctrl_window() {
    let f = fixture();
    create(&f.host, "v1");

    let ctrl = f.desktop.state("ctrl_v1").unwrap().position;
    let view = f.desktop.state("v1").unwrap().position;
    assert_eq!(view, Position::new(ctrl.x + 40, ctrl.y));
}

#[test]
fn test_generated_label_and_scheme() {
    let f = fixture();
    let view = f.host.view_create("example.com", None).unwrap();

    assert!(view.label.starts_with("window_"));
    assert_eq!(view.url, "https://example.com/");
    assert_eq!(f.host.get_windows()[0].label, view.label);
}

#[test]
fn test_duplicate_label_is_rejected() {
    let f = fixture();
    create(&f.host, "v1");

    let err = f
        .host
        .dispatch(
            "main",
            "view_create",
            json!({"url": "https://example.org", "label": "v1"}),
        )
        .unwrap_err();
    assert_eq!(err, "view already exists: v1");
    assert_eq!(f.host.get_windows().len(), 1);
}

#[test]
fn test_failed_window_leaves_nothing_behind() {
    let f = fixture();
    f.desktop.refuse_open("v2");

    let err = f
        .host
        .dispatch("main", "view_create", json!({"url": "example.com", "label": "v2"}))
        .unwrap_err();
    assert!(err.contains("v2"));
    assert!(f.host.get_windows().is_empty());
    assert_eq!(f.desktop.open_labels(), vec!["main"]);
}

#[test]
fn test_toggle_pin_from_ctrl_window() {
    let f = fixture();
    create(&f.host, "v1");

    let first = f.host.dispatch("ctrl_v1", "toggle_pin", Value::Null).unwrap();
    let second = f.host.dispatch("ctrl_v1", "toggle_pin", Value::Null).unwrap();
    assert_eq!(first, json!(true));
    assert_eq!(second, json!(false));

    f.host
        .dispatch("ctrl_v1", "set_pin", json!({"value": true}))
        .unwrap();
    assert_eq!(f.host.dispatch("v1", "get_pin", Value::Null), Ok(json!(true)));
    assert!(f.desktop.state("v1").unwrap().always_on_top);
    assert!(f.desktop.state("ctrl_v1").unwrap().always_on_top);
}

#[test]
fn test_click_through() {
    let f = fixture();
    create(&f.host, "v1");

    assert_eq!(
        f.host
            .dispatch("ctrl_v1", "toggle_ignore_cursor_events", Value::Null),
        Ok(json!(true))
    );
    assert!(f.desktop.state("v1").unwrap().ignore_cursor_events);
    assert!(f.host.get_windows()[0].ignore);

    f.host
        .dispatch("ctrl_v1", "set_ignore_cursor_events", json!({"value": false}))
        .unwrap();
    assert_eq!(
        f.host
            .dispatch("ctrl_v1", "get_ignore_cursor_events", Value::Null),
        Ok(json!(false))
    );
}

#[test]
fn test_set_transparent_hides_controls() {
    let f = fixture();
    create(&f.host, "v1");

    f.host
        .dispatch("ctrl_v1", "set_transparent", json!({"alpha": 0.5}))
        .unwrap();
    assert_eq!(
        f.host.dispatch("ctrl_v1", "get_transparent", Value::Null),
        Ok(json!(true))
    );
    assert_eq!(f.desktop.state("v1").unwrap().alpha, 128);
    assert!(!f.desktop.state("ctrl_v1").unwrap().visible);

    f.host
        .dispatch("v1", "set_transparent", json!({"alpha": 1.0}))
        .unwrap();
    assert_eq!(
        f.host.dispatch("ctrl_v1", "get_transparent", Value::Null),
        Ok(json!(false))
    );
    assert!(f.desktop.state("ctrl_v1").unwrap().visible);
}

#[test]
fn test_toggle_transparent_remembers_alpha() {
    let f = fixture();
    create(&f.host, "v1");

    assert_eq!(
        f.host
            .dispatch("ctrl_v1", "toggle_transparent", json!({"alpha": 0.2})),
        Ok(json!(true))
    );
    assert_eq!(f.desktop.state("v1").unwrap().alpha, 51);

    assert_eq!(
        f.host
            .dispatch("ctrl_v1", "toggle_transparent", json!({"alpha": 0.2})),
        Ok(json!(false))
    );
    assert_eq!(f.desktop.state("v1").unwrap().alpha, 255);

    assert_eq!(f.db.get_setting("transparent_alpha").unwrap().as_deref(), Some("0.2"));
    assert_eq!(f.host.config().transparent_alpha, 0.2);

    let state = f.host.get_state().unwrap();
    let config: Value = serde_json::from_str(&state.config).unwrap();
    assert_eq!(config["transparent_alpha"], json!(0.2));

    // A new host on the same database starts from the remembered value
    let again = fixture_on(f.db.clone());
    assert_eq!(again.host.config().transparent_alpha, 0.2);
}

#[test]
fn test_toggle_overlay_fades_every_view() {
    let f = fixture();
    assert!(!f.host.toggle_overlay().unwrap());

    create(&f.host, "v1");
    create(&f.host, "v2");
    f.host
        .dispatch("ctrl_v2", "set_transparent", json!({"alpha": 0.2}))
        .unwrap();

    // One view is still opaque, so everything fades to the configured alpha
    assert!(f.host.toggle_overlay().unwrap());
    for label in ["v1", "v2"] {
        assert_eq!(f.desktop.state(label).unwrap().alpha, 128);
        assert!(!f.desktop.state(&format!("ctrl_{label}")).unwrap().visible);
    }

    assert!(!f.host.toggle_overlay().unwrap());
    for label in ["v1", "v2"] {
        assert_eq!(f.desktop.state(label).unwrap().alpha, 255);
        assert!(f.desktop.state(&format!("ctrl_{label}")).unwrap().visible);
    }

    let saved = saved_alphas(&f.db);
    assert_eq!(saved, vec![("v1".to_string(), 255), ("v2".to_string(), 255)]);
}

fn saved_alphas(db: &Database) -> Vec<(String, u8)> {
    db.with_connection(|conn| {
        let mut stmt = conn.prepare("SELECT label, alpha FROM views ORDER BY label")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
    .unwrap()
}

#[test]
fn test_invalid_alpha_is_rejected() {
    let f = fixture();
    create(&f.host, "v1");

    let err = f
        .host
        .dispatch("ctrl_v1", "set_transparent", json!({"alpha": 2.0}))
        .unwrap_err();
    assert_eq!(err, "alpha must be between 0 and 1, got 2");
    assert_eq!(f.desktop.state("v1").unwrap().alpha, 255);
}

#[test]
fn test_zoom_is_clamped() {
    let f = fixture();
    create(&f.host, "v1");

    f.host.dispatch("ctrl_v1", "view_zoomin", Value::Null).unwrap();
    assert_eq!(f.desktop.state("v1").unwrap().zoom, 1.1);

    for _ in 0..20 {
        f.host.dispatch("ctrl_v1", "view_zoomout", Value::Null).unwrap();
    }
    assert_eq!(f.desktop.state("v1").unwrap().zoom, 0.2);
    assert_eq!(f.host.get_windows()[0].zoom, 0.2);
}

#[test]
fn test_drag_and_minimize_act_on_view() {
    let f = fixture();
    create(&f.host, "v1");

    f.host.dispatch("ctrl_v1", "view_drag", Value::Null).unwrap();
    f.host.dispatch("ctrl_v1", "view_minimize", Value::Null).unwrap();

    let view = f.desktop.state("v1").unwrap();
    assert_eq!(view.drag_count, 1);
    assert!(view.minimized);
    assert_eq!(f.desktop.state("ctrl_v1").unwrap().drag_count, 0);
}

#[test]
fn test_view_commands_need_a_view() {
    let f = fixture();

    assert_eq!(
        f.host.dispatch("main", "toggle_pin", Value::Null),
        Err("view not found: main".to_string())
    );
    assert_eq!(
        f.host.dispatch("ctrl_gone", "view_zoomin", Value::Null),
        Err("view not found: gone".to_string())
    );
}

#[test]
fn test_window_focus_and_hide() {
    let f = fixture();
    create(&f.host, "v1");

    f.host.dispatch("ctrl_v1", "window_hide", Value::Null).unwrap();
    assert!(!f.desktop.state("ctrl_v1").unwrap().visible);
    assert!(f.desktop.state("v1").unwrap().visible);

    f.host.dispatch("ctrl_v1", "window_focus", Value::Null).unwrap();
    let ctrl = f.desktop.state("ctrl_v1").unwrap();
    assert!(ctrl.visible && ctrl.focused);

    f.host.dispatch("ctrl_v1", "main_window_focus", Value::Null).unwrap();
    assert!(f.desktop.state("main").unwrap().focused);
}

#[test]
fn test_platform_close_unregisters_view() {
    let f = fixture();
    create(&f.host, "v1");

    assert!(f.host.view_closed("v1").unwrap());
    assert!(f.host.get_windows().is_empty());
    assert!(f.desktop.state("ctrl_v1").unwrap().closed);

    assert!(!f.host.view_closed("v1").unwrap());
    assert!(!f.host.view_closed("ctrl_v1").unwrap());
}

#[test]
fn test_restore_reopens_saved_views() {
    let db = Database::open_in_memory().unwrap();
    let first = fixture_on(db.clone());
    create(&first.host, "v1");
    create(&first.host, "v2");
    first
        .host
        .dispatch("ctrl_v1", "set_pin", json!({"value": true}))
        .unwrap();
    first
        .host
        .dispatch("ctrl_v1", "set_transparent", json!({"alpha": 0.5}))
        .unwrap();
    first
        .host
        .dispatch("main", "view_close", json!({"label": "v2"}))
        .unwrap();

    let second = fixture_on(db);
    assert!(second.host.get_windows().is_empty());
    assert_eq!(second.host.restore().unwrap(), 1);

    let windows = second.host.get_windows();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].label, "v1");
    assert!(windows[0].pin);

    let view = second.desktop.state("v1").unwrap();
    assert!(view.always_on_top);
    assert_eq!(view.alpha, 128);
    assert!(!second.desktop.state("ctrl_v1").unwrap().visible);
}

#[test]
fn test_restore_drops_views_that_fail_to_open() {
    let db = Database::open_in_memory().unwrap();
    let first = fixture_on(db.clone());
    create(&first.host, "v1");

    let second = fixture_on(db.clone());
    second.desktop.refuse_open("v1");
    assert_eq!(second.host.restore().unwrap(), 0);
    assert_eq!(second.desktop.open_labels(), vec!["main"]);

    let third = fixture_on(db);
    assert_eq!(third.host.restore().unwrap(), 0);
}

#[test]
fn test_restore_can_be_disabled() {
    let db = Database::open_in_memory().unwrap();
    let first = fixture_on(db.clone());
    create(&first.host, "v1");

    let desktop = HeadlessDesktop::new();
    let mut config = Config::new(PathBuf::from("/tmp/relais-test"));
    config.restore_views = false;
    let host = Host::with_database(config, db, Arc::new(desktop.clone())).unwrap();

    assert_eq!(host.restore().unwrap(), 0);
    assert_eq!(desktop.open_labels(), vec!["main"]);
}

#[test]
fn test_mutations_push_state() {
    let f = fixture();
    let mut rx = f.host.subscribe();

    create(&f.host, "v1");

    let windows = rx.try_recv().unwrap();
    assert_eq!(windows.event, "update_windows");
    assert_eq!(windows.payload[0]["label"], json!("v1"));

    let state = rx.try_recv().unwrap();
    assert_eq!(state.event, "update_state");
    assert_eq!(state.payload["windows"][0]["label"], json!("v1"));
    assert!(state.payload["config"].is_string());
}

#[test]
fn test_unknown_command_and_bad_arguments() {
    let f = fixture();

    assert_eq!(
        f.host.dispatch("main", "reload", Value::Null),
        Err("unknown command: reload".to_string())
    );

    let err = f
        .host
        .dispatch("main", "view_close", json!({"name": "v1"}))
        .unwrap_err();
    assert!(err.starts_with("invalid arguments for view_close: "));
}

#[test]
fn test_exit_terminates_desktop() {
    let f = fixture();
    assert_eq!(f.host.dispatch("main", "exit", Value::Null), Ok(Value::Null));
    assert_eq!(f.desktop.exit_code(), Some(0));
}

#[test]
fn test_log_accepts_mixed_values() {
    let f = fixture();
    assert_eq!(
        f.host
            .dispatch("ctrl_v1", "log", json!({"values": ["clicked", 3]})),
        Ok(Value::Null)
    );
}

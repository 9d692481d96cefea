use rtimeboard::core::{DataStore, NoticeLevel};
use rtimeboard::errors::AppError;
use rtimeboard::models::{Client, EventDraft, EventType};
use rtimeboard::store::local::{CLIENTS_KEY, EVENTS_KEY};
use rtimeboard::store::{MemoryRemote, RemoteStore, Table};
use serde_json::json;
use std::sync::Arc;

mod common;
use common::{fresh_cache, setup_test_db};

fn with_remote(name: &str, remote: MemoryRemote) -> (DataStore, Arc<MemoryRemote>) {
    let remote = Arc::new(remote);
    let dyn_remote: Arc<dyn RemoteStore> = remote.clone();
    let store = DataStore::open(fresh_cache(name), Some(dyn_remote));
    (store, remote)
}

fn draft(date: &str, hours: f64) -> EventDraft {
    EventDraft {
        date: date.into(),
        hours,
        description: "meeting".into(),
        kind: EventType::Meeting,
        ..Default::default()
    }
}

#[test]
fn acme_session_lifecycle_keeps_total_in_step() {
    let (mut store, remote) = with_remote("ds_acme", MemoryRemote::new());

    let acme = store.add_client("Acme").expect("add client");
    assert_eq!(acme.total_hours, 0.0);
    assert!(acme.sessions.is_empty());

    store.add_time_session(&acme.id, 2.5, "design").expect("add session");
    let c = store.client(&acme.id).expect("client");
    assert_eq!(c.total_hours, 2.5);
    assert_eq!(c.sessions.len(), 1);
    assert_eq!(c.sessions[0].description, "design");
    assert!(c.is_consistent());

    store.edit_session(&acme.id, 1, 1.0, None).expect("edit");
    let c = store.client(&acme.id).expect("client");
    assert_eq!(c.total_hours, 1.0);
    assert_eq!(c.sessions[0].description, "design");
    assert!(c.is_consistent());

    store.delete_session(&acme.id, 1).expect("delete");
    let c = store.client(&acme.id).expect("client");
    assert_eq!(c.total_hours, 0.0);
    assert!(c.sessions.is_empty());

    store.flush_remote();
    assert!(store.take_notices().is_empty());

    let rows = remote.rows(Table::Clients);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Acme");
    assert_eq!(rows[0]["total_hours"], 0.0);
}

#[test]
fn total_matches_sessions_after_every_step() {
    let mut store = DataStore::open(fresh_cache("ds_invariant"), None);
    let id = store.add_client("Inv").expect("add").id;

    let ops: [(&str, f64, usize); 7] = [
        ("add", 1.25, 0),
        ("add", 0.75, 0),
        ("add", 3.0, 0),
        ("edit", 0.5, 2),
        ("del", 0.0, 1),
        ("add", 0.1, 0),
        ("del", 0.0, 3),
    ];
    for (op, hours, pos) in ops {
        match op {
            "add" => {
                store.add_time_session(&id, hours, "").expect("add");
            }
            "edit" => {
                store.edit_session(&id, pos, hours, Some("edited")).expect("edit");
            }
            _ => {
                store.delete_session(&id, pos).expect("del");
            }
        }
        let c = store.client(&id).expect("client");
        assert!(c.is_consistent(), "after {op}: {} vs {}", c.total_hours, c.sessions_total());
    }
}

#[test]
fn newest_session_comes_first() {
    let mut store = DataStore::open(fresh_cache("ds_order"), None);
    let id = store.add_client("Order").expect("add").id;
    store.add_time_session(&id, 1.0, "first").expect("add");
    store.add_time_session(&id, 2.0, "second").expect("add");

    let c = store.client(&id).expect("client");
    assert_eq!(c.sessions[0].description, "second");
    assert_ne!(c.sessions[0].id, c.sessions[1].id);
}

#[test]
fn invalid_hours_are_rejected_without_changes() {
    let mut store = DataStore::open(fresh_cache("ds_invalid"), None);
    let id = store.add_client("Val").expect("add").id;
    store.add_time_session(&id, 1.0, "").expect("add");

    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            store.add_time_session(&id, bad, ""),
            Err(AppError::Validation(_))
        ));
        assert!(store.edit_session(&id, 1, bad, None).is_err());
    }
    assert!(matches!(
        store.edit_session(&id, 2, 1.0, None),
        Err(AppError::InvalidSession(2))
    ));
    assert!(matches!(
        store.delete_session(&id, 0),
        Err(AppError::InvalidSession(0))
    ));
    assert!(matches!(
        store.add_time_session("nope", 1.0, ""),
        Err(AppError::ClientNotFound(_))
    ));
    assert!(matches!(store.add_client("   "), Err(AppError::Validation(_))));

    let c = store.client(&id).expect("client");
    assert_eq!(c.total_hours, 1.0);
    assert_eq!(c.sessions.len(), 1);
}

#[test]
fn newer_remote_client_wins_on_load() {
    let db = setup_test_db("ds_remote_wins");
    {
        let mut store = DataStore::open(
            rtimeboard::store::LocalCache::open(&db).expect("cache"),
            None,
        );
        store.add_client("Old name").expect("add");
    }

    let local = rtimeboard::store::LocalCache::open(&db).expect("cache");
    let cached: Vec<Client> = local.get(CLIENTS_KEY).expect("read").expect("present");
    let id = cached[0].id.clone();

    let remote = Arc::new(MemoryRemote::new().with_rows(
        Table::Clients,
        vec![json!({
            "id": id,
            "name": "New name",
            "total_hours": 4.0,
            "sessions": [{"id": "s1", "date": "2025-01-01", "hours": 4.0, "description": "x"}],
            "created_at": "2020-01-01T00:00:00Z",
            "updated_at": "2999-01-01T00:00:00Z"
        })],
    ));
    let store = DataStore::open(local, Some(remote as Arc<dyn RemoteStore>));

    assert_eq!(store.clients().len(), 1);
    assert_eq!(store.clients()[0].name, "New name");
    assert_eq!(store.clients()[0].total_hours, 4.0);

    let cached: Vec<Client> = store.local().get(CLIENTS_KEY).expect("read").expect("present");
    assert_eq!(cached[0].name, "New name", "merge result is written back locally");
}

#[test]
fn reload_is_idempotent() {
    let remote = MemoryRemote::new().with_rows(
        Table::CalendarEvents,
        vec![json!({"id": "r1", "date": "2025-02-02", "hours": 1.0, "type": "task"})],
    );
    let (mut store, _remote) = with_remote("ds_idempotent", remote);
    store.add_client("Local").expect("add");
    store.flush_remote();

    let (clients, events) = (store.clients().to_vec(), store.events().to_vec());
    store.refresh();
    store.refresh();

    assert_eq!(store.clients(), clients.as_slice());
    assert_eq!(store.events(), events.as_slice());
    let notices = store.take_notices();
    assert!(notices.iter().all(|n| n.level == NoticeLevel::Info));
}

#[test]
fn missing_clients_table_warns_but_missing_events_table_does_not() {
    let remote = MemoryRemote::new();
    remote.drop_table(Table::CalendarEvents);
    let (mut store, _r) = with_remote("ds_missing_events", remote);
    assert!(store.take_notices().is_empty());

    let remote = MemoryRemote::new();
    remote.drop_table(Table::Clients);
    let (mut store, _r) = with_remote("ds_missing_clients", remote);
    let notices = store.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].message.contains("do not exist"));
}

#[test]
fn one_failing_table_does_not_block_the_other() {
    let remote = MemoryRemote::new().with_rows(
        Table::Clients,
        vec![json!({"id": "c1", "name": "Remote Co", "total_hours": 0.0, "sessions": []})],
    );
    remote.break_table(Table::CalendarEvents);
    let (mut store, _r) = with_remote("ds_events_broken", remote);

    assert_eq!(store.clients().len(), 1);
    assert_eq!(store.clients()[0].name, "Remote Co");
    assert!(store.events().is_empty());
    let notices = store.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].message.contains("calendar events"));
    let cached: Vec<Client> = store.local().get(CLIENTS_KEY).expect("read").expect("present");
    assert_eq!(cached.len(), 1);

    let remote = MemoryRemote::new().with_rows(
        Table::CalendarEvents,
        vec![json!({"id": "e1", "date": "2025-10-01", "hours": 2.0, "type": "meeting"})],
    );
    remote.break_table(Table::Clients);
    let (mut store, _r) = with_remote("ds_clients_broken", remote);

    assert!(store.clients().is_empty());
    assert_eq!(store.events_for_date("2025-10-01").len(), 1);
    let notices = store.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.contains("Could not load clients"));
}

#[test]
fn unreachable_remote_never_rolls_back_local_changes() {
    let remote = MemoryRemote::new();
    remote.set_unreachable(true);
    let (mut store, remote) = with_remote("ds_unreachable", remote);

    let load_notices = store.take_notices();
    assert!(
        load_notices
            .iter()
            .any(|n| n.level == NoticeLevel::Warning && n.message.contains("clients"))
    );

    let c = store.add_client("Offline Co").expect("local add still succeeds");
    store.add_time_session(&c.id, 2.0, "work").expect("add");
    store.flush_remote();

    assert_eq!(store.client(&c.id).map(|c| c.total_hours), Some(2.0));
    let cached: Vec<Client> = store.local().get(CLIENTS_KEY).expect("read").expect("present");
    assert_eq!(cached.len(), 1);

    let notices = store.take_notices();
    assert!(
        notices
            .iter()
            .any(|n| n.level == NoticeLevel::Warning && n.message.contains("did not reach"))
    );
    assert!(remote.rows(Table::Clients).is_empty());
}

#[test]
fn only_changed_rows_are_upserted() {
    let (mut store, remote) = with_remote("ds_changed_only", MemoryRemote::new());
    let a = store.add_client("A").expect("add");
    let b = store.add_client("B").expect("add");
    store.flush_remote();

    let rows_before = remote.rows(Table::Clients);
    let b_before = rows_before
        .iter()
        .find(|r| r["id"] == b.id.as_str())
        .cloned()
        .expect("b row");

    let upserts_before = remote.calls().iter().filter(|c| c.starts_with("upsert")).count();
    store.rename_client(&a.id, "A2").expect("rename");
    store.flush_remote();
    let upserts_after = remote.calls().iter().filter(|c| c.starts_with("upsert")).count();

    assert_eq!(upserts_after - upserts_before, 1);
    let b_after = remote
        .rows(Table::Clients)
        .into_iter()
        .find(|r| r["id"] == b.id.as_str())
        .expect("b row");
    assert_eq!(b_before, b_after, "untouched client keeps its updated_at");
}

#[test]
fn deletes_reach_both_tiers() {
    let (mut store, remote) = with_remote("ds_delete", MemoryRemote::new());
    let c = store.add_client("Gone").expect("add");
    let e = store
        .add_calendar_event(EventDraft {
            client_id: Some(c.id.clone()),
            ..draft("2025-04-04", 1.0)
        })
        .expect("event");
    store.flush_remote();
    assert_eq!(remote.rows(Table::CalendarEvents).len(), 1);

    store.delete_client(&c.id).expect("delete client");
    store.delete_calendar_event(&e.id).expect("delete event");
    store.flush_remote();

    assert!(store.clients().is_empty());
    assert!(store.events().is_empty());
    assert!(remote.rows(Table::Clients).is_empty());
    assert!(remote.rows(Table::CalendarEvents).is_empty());
    assert!(remote.calls().contains(&"delete clients".to_string()));
}

#[test]
fn deleting_a_client_keeps_its_events() {
    let mut store = DataStore::open(fresh_cache("ds_orphan"), None);
    let c = store.add_client("Parent").expect("add");
    store
        .add_calendar_event(EventDraft {
            client_id: Some(c.id.clone()),
            ..draft("2025-04-04", 1.0)
        })
        .expect("event");

    store.delete_client(&c.id).expect("delete");
    assert_eq!(store.events_for_client(&c.id).len(), 1);
    assert_eq!(store.events()[0].client_name.as_deref(), Some("Parent"));
}

#[test]
fn calendar_event_crud_and_validation() {
    let mut store = DataStore::open(fresh_cache("ds_events"), None);

    assert!(matches!(
        store.add_calendar_event(draft("2025-13-01", 1.0)),
        Err(AppError::InvalidDate(_))
    ));
    assert!(matches!(
        store.add_calendar_event(EventDraft {
            start_time: Some("25:00".into()),
            ..draft("2025-01-01", 1.0)
        }),
        Err(AppError::InvalidTime(_))
    ));
    assert!(store.add_calendar_event(draft("2025-01-01", -0.5)).is_err());
    assert!(matches!(
        store.add_calendar_event(draft("2025-01-01", 0.0)),
        Err(AppError::Validation(_))
    ));
    assert!(store.add_calendar_event(draft("2025-01-01", f64::NAN)).is_err());
    assert!(matches!(
        store.add_calendar_event(EventDraft {
            description: "   ".into(),
            ..draft("2025-01-01", 1.0)
        }),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        store.add_calendar_event(EventDraft {
            client_id: Some("ghost".into()),
            ..draft("2025-01-01", 1.0)
        }),
        Err(AppError::ClientNotFound(_))
    ));
    assert!(store.events().is_empty());

    let e = store.add_calendar_event(draft("2025-01-01", 0.5)).expect("add event");
    assert_eq!(store.events_for_date("2025-01-01").len(), 1);

    let mut zeroed = e.clone();
    zeroed.hours = 0.0;
    assert!(store.update_calendar_event(zeroed).is_err());
    let mut blank = e.clone();
    blank.description = String::new();
    assert!(store.update_calendar_event(blank).is_err());
    assert_eq!(store.events()[0].hours, 0.5);
    assert_eq!(store.events()[0].description, "meeting");

    let mut edited = e.clone();
    edited.description = "standup".into();
    edited.kind = EventType::Other;
    let updated = store.update_calendar_event(edited).expect("update");
    assert_eq!(updated.description, "standup");
    assert_eq!(updated.created_at, e.created_at);

    let cached: Vec<rtimeboard::models::CalendarEvent> =
        store.local().get(EVENTS_KEY).expect("read").expect("present");
    assert_eq!(cached[0].kind, EventType::Other);

    let mut ghost = e.clone();
    ghost.id = "ghost".into();
    assert!(matches!(
        store.update_calendar_event(ghost),
        Err(AppError::EventNotFound(_))
    ));
}

#[test]
fn event_dates_and_descriptions_are_normalised() {
    let mut store = DataStore::open(fresh_cache("ds_event_norm"), None);

    let e = store
        .add_calendar_event(EventDraft {
            description: "  review  ".into(),
            ..draft(" 2025-01-01 ", 1.0)
        })
        .expect("padded date accepted");
    assert_eq!(e.date, "2025-01-01");
    assert_eq!(e.description, "review");
    assert_eq!(store.events_for_date("2025-01-01").len(), 1);

    let mut moved = e.clone();
    moved.date = "2025-01-02 ".into();
    let updated = store.update_calendar_event(moved).expect("update");
    assert_eq!(updated.date, "2025-01-02");
    assert_eq!(store.events_for_date("2025-01-02").len(), 1);
    assert!(store.events_for_date("2025-01-01").is_empty());

    let cached: Vec<rtimeboard::models::CalendarEvent> =
        store.local().get(EVENTS_KEY).expect("read").expect("present");
    assert_eq!(cached[0].date, "2025-01-02");
}

#[test]
fn find_client_by_id_or_name() {
    let mut store = DataStore::open(fresh_cache("ds_find"), None);
    let c = store.add_client("Globex Corp").expect("add");

    assert_eq!(store.find_client(&c.id).map(|x| x.id.as_str()), Some(c.id.as_str()));
    assert_eq!(store.find_client("globex corp").map(|x| x.id.as_str()), Some(c.id.as_str()));
    assert!(store.find_client("Initech").is_none());
}

#[test]
fn corrupt_local_collection_becomes_an_error_notice() {
    let cache = fresh_cache("ds_corrupt");
    cache.set(CLIENTS_KEY, "not a list").expect("seed");

    let mut store = DataStore::open(cache, None);
    assert!(store.clients().is_empty());
    let notices = store.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

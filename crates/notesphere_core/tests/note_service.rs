use chrono::{DateTime, Local, TimeZone};
use notesphere_core::repo::note_store::DEFAULT_STORAGE_KEY;
use notesphere_core::{
    open_db, open_db_in_memory, MemoryNoteStore, Note, NoteDraft, NoteId, NoteService,
    NoteStore, NotificationLevel, SqliteNoteStore, SuggestionSession, SuggestionState,
};

fn at(day: u32, hour: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 10, day, hour, 30, 0)
        .single()
        .unwrap()
}

fn draft(title: &str) -> NoteDraft {
    NoteDraft::new(title, format!("{title} objective"), format!("{title} body"))
}

fn memory_service() -> NoteService<MemoryNoteStore> {
    NoteService::open(MemoryNoteStore::new())
}

#[test]
fn add_assigns_day_scoped_sequential_ids() {
    let mut service = memory_service();

    let first = service.add_at(draft("one"), at(19, 9)).value;
    let second = service.add_at(draft("two"), at(19, 10)).value;
    let next_day = service.add_at(draft("three"), at(20, 8)).value;

    assert_eq!(first.id.as_str(), "25101901");
    assert_eq!(second.id.as_str(), "25101902");
    assert_eq!(next_day.id.as_str(), "25102001");
    assert!(!first.is_pinned);
    assert!(first.created_at.ends_with('Z'));
    assert_eq!(service.len(), 3);
}

#[test]
fn add_continues_after_highest_sequence_of_the_day() {
    let seeded = r#"[{"id":"25101907","title":"t","objective":"o","notesArea":"n",
        "createdAt":"2025-10-19T07:00:00.000Z","isPinned":false,"images":[]}]"#;
    let mut service = NoteService::open(MemoryNoteStore::with_entry(seeded));

    let added = service.add_at(draft("next"), at(19, 12)).value;
    assert_eq!(added.id.as_str(), "25101908");
}

#[test]
fn added_note_is_readable_and_listed_first() {
    let mut service = memory_service();
    service.add_at(draft("older"), at(18, 9));
    let newer = service.add_at(draft("newer"), at(19, 9)).value;

    assert_eq!(service.get_by_id(&newer.id), Some(&newer));
    assert_eq!(service.notes()[0].id, newer.id);
}

#[test]
fn update_replaces_by_id_and_ignores_unknown_ids() {
    let mut service = memory_service();
    let mut note = service.add_at(draft("draft"), at(19, 9)).value;
    note.title = "final".to_string();

    let outcome = service.update(note.clone());
    assert!(outcome.value);
    assert_eq!(outcome.notification.level, NotificationLevel::Success);
    assert_eq!(service.get_by_id(&note.id).unwrap().title, "final");

    let mut ghost = note.clone();
    ghost.id = NoteId::new("99999999");
    let outcome = service.update(ghost);
    assert!(!outcome.value);
    assert_eq!(service.len(), 1);
}

#[test]
fn toggle_pin_twice_restores_state_and_pinned_sort_first() {
    let mut service = memory_service();
    let old = service.add_at(draft("old"), at(18, 9)).value;
    service.add_at(draft("new"), at(19, 9));

    let pinned = service.toggle_pin(&old.id).value.unwrap();
    assert!(pinned.is_pinned);
    assert_eq!(service.notes()[0].id, old.id);

    let unpinned = service.toggle_pin(&old.id).value.unwrap();
    assert!(!unpinned.is_pinned);
    assert_eq!(service.notes()[1].id, old.id);

    assert!(service.toggle_pin(&NoteId::new("nope")).value.is_none());
}

#[test]
fn bulk_pin_and_delete_report_counts() {
    let mut service = memory_service();
    let a = service.add_at(draft("a"), at(19, 9)).value;
    let b = service.add_at(draft("b"), at(19, 10)).value;
    let c = service.add_at(draft("c"), at(19, 11)).value;

    let outcome = service.set_pin_many(&[a.id.clone(), b.id.clone(), NoteId::new("x")], true);
    assert_eq!(outcome.value, 2);
    assert!(service.notes().iter().filter(|n| n.is_pinned).count() == 2);

    let outcome = service.delete_many(&[a.id.clone(), c.id.clone()]);
    assert_eq!(outcome.value.len(), 2);
    assert_eq!(outcome.notification.level, NotificationLevel::Error);
    assert_eq!(service.len(), 1);
    assert!(service.get_by_id(&a.id).is_none());

    let outcome = service.delete(&NoteId::new("missing"));
    assert!(outcome.value.is_empty());
    assert_eq!(outcome.notification.level, NotificationLevel::Info);
    assert_eq!(service.len(), 1);
}

#[test]
fn clear_empties_collection_and_store() {
    let mut service = memory_service();
    service.add_at(draft("a"), at(19, 9));
    service.add_at(draft("b"), at(19, 10));

    let outcome = service.clear();
    assert_eq!(outcome.value.len(), 2);
    assert!(service.is_empty());
    assert_eq!(service.store().raw_entry().as_deref(), Some("[]"));
}

#[test]
fn removed_ids_release_the_suggestion_selection() {
    let mut service = memory_service();
    let a = service.add_at(draft("a"), at(19, 9)).value;
    let b = service.add_at(draft("b"), at(19, 10)).value;
    let mut session = SuggestionSession::new();

    session.begin(a.id.clone());
    let outcome = service.delete(&b.id);
    assert!(!session.clear_if(&outcome.value));
    assert_eq!(session.selected(), Some(&a.id));

    let outcome = service.delete(&a.id);
    assert!(session.clear_if(&outcome.value));
    assert_eq!(session.state(), &SuggestionState::Idle);

    let c = service.add_at(draft("c"), at(19, 11)).value;
    session.begin(c.id.clone());
    let outcome = service.clear();
    assert_eq!(outcome.value, vec![c.id]);
    assert!(session.clear_if(&outcome.value));
    assert!(session.selected().is_none());
}

#[test]
fn every_change_is_mirrored_to_the_store() {
    let mut service = memory_service();
    let note = service.add_at(draft("a"), at(19, 9)).value;

    let stored: Vec<Note> =
        serde_json::from_str(&service.store().raw_entry().unwrap()).unwrap();
    assert_eq!(stored, vec![note]);
}

#[test]
fn failed_write_keeps_memory_state_and_warns() {
    let mut service = memory_service();
    service.store().reject_writes(true);

    let outcome = service.add_at(draft("a"), at(19, 9));
    assert_eq!(service.len(), 1);
    let warning = outcome.persistence_warning.unwrap();
    assert_eq!(warning.level, NotificationLevel::Warning);
    assert!(service.store().raw_entry().is_none());
}

#[test]
fn corrupt_or_partially_invalid_entries_fail_open() {
    let service = NoteService::open(MemoryNoteStore::with_entry("{not json"));
    assert!(service.is_empty());

    let mixed = r#"[
        {"id":"25101901","title":"ok","objective":"o","notesArea":"n",
         "createdAt":"2025-10-19T07:00:00.000Z","isPinned":true},
        {"id":"25101902","title":"no date","objective":"o","notesArea":"n","isPinned":false},
        42
    ]"#;
    let service = NoteService::open(MemoryNoteStore::with_entry(mixed));
    assert_eq!(service.len(), 1);
    assert!(service.notes()[0].images.is_empty());
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notesphere.sqlite3");

    let created = {
        let store = SqliteNoteStore::try_new(open_db(&path).unwrap(), DEFAULT_STORAGE_KEY).unwrap();
        let mut service = NoteService::open(store);
        let note = service.add_at(draft("persisted"), at(19, 9)).value;
        service.toggle_pin(&note.id).value.unwrap()
    };

    let store = SqliteNoteStore::try_new(open_db(&path).unwrap(), DEFAULT_STORAGE_KEY).unwrap();
    let service = NoteService::open(store);
    assert_eq!(service.notes(), &[created]);
}

#[test]
fn sqlite_store_keys_are_independent() {
    let store = SqliteNoteStore::try_new(open_db_in_memory().unwrap(), "other-key").unwrap();
    assert_eq!(store.key(), "other-key");
    assert!(store.load().unwrap().is_none());
    store.save("[]").unwrap();
    store.save("[1]").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("[1]"));
}

#[test]
fn sqlite_store_rejects_unmigrated_connections() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    assert!(SqliteNoteStore::try_new(conn, DEFAULT_STORAGE_KEY).is_err());
}

use memopad_core::db::open_db_in_memory;
use memopad_core::{
    MemoInput, MemoRepository, MemoService, MemoServiceError, RepoError, SqliteMemoRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn input(title: &str, slug: &str, text: &str) -> MemoInput {
    MemoInput {
        title: title.to_string(),
        slug: slug.to_string(),
        text: text.to_string(),
    }
}

fn memo_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM memos;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    let created = service
        .create(&input("Example", "example", "This is an example text."))
        .unwrap();
    assert_eq!(created.title, "Example");
    assert_eq!(created.slug, "example");
    assert_eq!(created.text, "This is an example text.");
    assert!(created.created_at > 0);
    assert_eq!(created.created_at, created.updated_at);

    let loaded = service.get("example").unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_with_empty_text_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    let err = service.create(&input("Example", "example", "")).unwrap_err();
    assert!(matches!(err, MemoServiceError::Validation(_)));
    assert_eq!(memo_count(&conn), 0);
}

#[test]
fn create_with_duplicate_slug_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    service
        .create(&input("First", "example", "first body"))
        .unwrap();
    let err = service
        .create(&input("Second", "example", "second body"))
        .unwrap_err();
    assert!(matches!(err, MemoServiceError::SlugTaken(slug) if slug == "example"));
    assert_eq!(memo_count(&conn), 1);

    let kept = service.get("example").unwrap();
    assert_eq!(kept.title, "First");
}

#[test]
fn get_unknown_slug_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    let err = service.get("missing").unwrap_err();
    assert!(matches!(err, MemoServiceError::MemoNotFound(slug) if slug == "missing"));
}

#[test]
fn update_replaces_fields_and_refreshes_updated_at_only() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    let created = service
        .create(&input("Example", "example", "This is an example text."))
        .unwrap();
    conn.execute(
        "UPDATE memos SET created_at = 1000, updated_at = 1000 WHERE slug = 'example';",
        [],
    )
    .unwrap();

    let updated = service
        .update("example", &input("Example", "example", "This text is updated."))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.text, "This text is updated.");
    assert_eq!(updated.created_at, 1000);
    assert!(updated.updated_at > 1000);
}

#[test]
fn update_can_change_the_slug() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    service
        .create(&input("Example", "example", "body"))
        .unwrap();
    let updated = service
        .update("example", &input("Example", "renamed", "body"))
        .unwrap();
    assert_eq!(updated.slug, "renamed");

    let err = service.get("example").unwrap_err();
    assert!(matches!(err, MemoServiceError::MemoNotFound(_)));
    assert_eq!(service.get("renamed").unwrap().slug, "renamed");
}

#[test]
fn update_to_a_taken_slug_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    service.create(&input("One", "one", "body one")).unwrap();
    service.create(&input("Two", "two", "body two")).unwrap();

    let err = service
        .update("two", &input("Two", "one", "body two"))
        .unwrap_err();
    assert!(matches!(err, MemoServiceError::SlugTaken(slug) if slug == "one"));
    assert_eq!(service.get("two").unwrap().title, "Two");
}

#[test]
fn update_unknown_slug_returns_not_found_before_validation() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    // Input is also invalid; the missing record must win.
    let err = service.update("missing", &MemoInput::default()).unwrap_err();
    assert!(matches!(err, MemoServiceError::MemoNotFound(slug) if slug == "missing"));
    assert_eq!(memo_count(&conn), 0);
}

#[test]
fn failed_update_validation_leaves_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    service
        .create(&input("Example", "example", "This is an example text."))
        .unwrap();
    let err = service
        .update("example", &input("Example", "example", ""))
        .unwrap_err();
    assert!(matches!(err, MemoServiceError::Validation(_)));

    let kept = service.get("example").unwrap();
    assert_eq!(kept.text, "This is an example text.");
}

#[test]
fn delete_removes_exactly_one_record() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    service.create(&input("One", "one", "body one")).unwrap();
    service.create(&input("Two", "two", "body two")).unwrap();

    service.delete("one").unwrap();
    assert_eq!(memo_count(&conn), 1);
    assert_eq!(service.get("two").unwrap().slug, "two");
}

#[test]
fn deleting_an_absent_slug_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::new(&conn));

    service.create(&input("One", "one", "body one")).unwrap();
    service.delete("one").unwrap();

    let err = service.delete("one").unwrap_err();
    assert!(matches!(err, MemoServiceError::MemoNotFound(slug) if slug == "one"));
}

#[test]
fn repository_rejects_invalid_persisted_id() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO memos (id, title, slug, text) VALUES ('not-a-uuid', 'T', 's', 'b');",
        [],
    )
    .unwrap();

    let repo = SqliteMemoRepository::new(&conn);
    let err = repo.find_by_slug("s").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_insert_validates_before_touching_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    let err = repo.insert(Uuid::new_v4(), &MemoInput::default()).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(memo_count(&conn), 0);
}

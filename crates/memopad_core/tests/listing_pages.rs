use memopad_core::db::open_db_in_memory;
use memopad_core::{list_page, ListingError, MemoInput, MemoService, SqliteMemoRepository};
use rusqlite::{params, Connection};

fn create_memo(conn: &Connection, title: &str, slug: &str, text: &str, created_at: i64) {
    let service = MemoService::new(SqliteMemoRepository::new(conn));
    service
        .create(&MemoInput {
            title: title.to_string(),
            slug: slug.to_string(),
            text: text.to_string(),
        })
        .unwrap();
    // Pin timestamps so ordering does not depend on same-millisecond inserts.
    conn.execute(
        "UPDATE memos SET created_at = ?1, updated_at = ?1 WHERE slug = ?2;",
        params![created_at, slug],
    )
    .unwrap();
}

#[test]
fn empty_listing_is_a_valid_empty_first_page() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::new(&conn);

    let page = list_page(&repo, None, None).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.page_number, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.total_items, 0);
    assert!(!page.has_previous());
    assert!(!page.has_next());
}

#[test]
fn listing_orders_by_descending_creation_time() {
    let conn = open_db_in_memory().unwrap();
    create_memo(&conn, "First memo", "first-memo", "body", 1_000);
    create_memo(&conn, "Second memo", "second-memo", "body", 2_000);

    let repo = SqliteMemoRepository::new(&conn);
    let page = list_page(&repo, None, None).unwrap();
    let titles: Vec<&str> = page.items.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Second memo", "First memo"]);
}

#[test]
fn eleven_memos_split_into_a_full_page_and_a_remainder() {
    let conn = open_db_in_memory().unwrap();
    for i in 1..=11 {
        create_memo(
            &conn,
            &format!("Memo {i}"),
            &format!("memo-{i:02}"),
            "body",
            i64::from(i) * 1_000,
        );
    }

    let repo = SqliteMemoRepository::new(&conn);

    let first = list_page(&repo, None, None).unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.items[0].slug, "memo-11");
    assert_eq!(first.items[9].slug, "memo-02");
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.total_items, 11);
    assert!(!first.has_previous());
    assert!(first.has_next());

    let second = list_page(&repo, None, Some("2")).unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].slug, "memo-01");
    assert!(second.has_previous());
    assert!(!second.has_next());
}

#[test]
fn page_beyond_the_last_one_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    for i in 1..=11 {
        create_memo(
            &conn,
            &format!("Memo {i}"),
            &format!("memo-{i:02}"),
            "body",
            i64::from(i) * 1_000,
        );
    }

    let repo = SqliteMemoRepository::new(&conn);
    let err = list_page(&repo, None, Some("3")).unwrap_err();
    assert!(matches!(err, ListingError::PageNotFound(token) if token == "3"));
}

#[test]
fn non_numeric_page_token_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    create_memo(&conn, "Only", "only", "body", 1_000);

    let repo = SqliteMemoRepository::new(&conn);
    let err = list_page(&repo, None, Some("not-a-number")).unwrap_err();
    assert!(matches!(err, ListingError::PageNotFound(token) if token == "not-a-number"));
}

#[test]
fn keyword_narrows_the_listing_and_pagination_follows_the_filtered_set() {
    let conn = open_db_in_memory().unwrap();
    create_memo(&conn, "Shopping list", "shopping", "milk and eggs", 1_000);
    create_memo(&conn, "First draft", "draft", "rough outline", 2_000);
    create_memo(&conn, "Notes", "notes", "the first of many", 3_000);

    let repo = SqliteMemoRepository::new(&conn);
    let page = list_page(&repo, Some("FIRST"), None).unwrap();
    let slugs: Vec<&str> = page.items.iter().map(|m| m.slug.as_str()).collect();
    assert_eq!(slugs, vec!["notes", "draft"]);
    assert_eq!(page.total_pages, 1);

    // Page 2 exists for the unfiltered set only when there are enough rows;
    // for this filtered set it must be a not-found condition.
    let err = list_page(&repo, Some("FIRST"), Some("2")).unwrap_err();
    assert!(matches!(err, ListingError::PageNotFound(_)));
}

#[test]
fn keyword_with_no_matches_is_an_empty_page_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    create_memo(&conn, "Only", "only", "body", 1_000);

    let repo = SqliteMemoRepository::new(&conn);
    let page = list_page(&repo, Some("zzz-no-match"), None).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 0);
    assert_eq!(page.total_pages, 1);
}

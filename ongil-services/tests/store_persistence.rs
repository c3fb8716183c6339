//! Community store on disk: save/reopen, corrupt files, and history properties.

use chrono::Utc;
use ongil_services::community::{Board, BoardTab, CommunityStore, NewPost, SearchField, MAX_HISTORY};
use ongil_services::seed;
use proptest::prelude::*;

#[test]
fn reopen_restores_posts_comments_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("community.json");

    let mut store = CommunityStore::open(&path);
    assert!(store.is_empty());
    let id = store
        .create_post(NewPost::new(Board::Free, "Rent in Mapo", "Anyone under 1.5M?").nick("mapo"))
        .unwrap()
        .id;
    store.add_comment(id, None, "Try the side streets").unwrap();
    store.record_search("rent");
    store.save().unwrap();

    let reopened = CommunityStore::open(&path);
    let post = reopened.post(id).unwrap();
    assert_eq!(post.nick, "mapo");
    assert_eq!(reopened.comment_count(id), 1);
    assert_eq!(reopened.search_history(), ["rent"]);
    assert_eq!(reopened.search("Mapo", SearchField::Title).len(), 1);
}

#[test]
fn ids_stay_unique_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("community.json");
    let mut store = CommunityStore::open(&path);
    seed::sample_posts(&mut store, Utc::now()).unwrap();
    store.save().unwrap();

    let mut reopened = CommunityStore::open(&path);
    let new_id = reopened
        .create_post(NewPost::new(Board::Partner, "New", "post"))
        .unwrap()
        .id;
    let ids: Vec<u64> = reopened.list_posts(BoardTab::All).iter().map(|p| p.id).collect();
    assert_eq!(ids.iter().filter(|&&i| i == new_id).count(), 1);
}

#[test]
fn corrupt_file_opens_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("community.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut store = CommunityStore::open(&path);
    assert!(store.is_empty());
    store.create_post(NewPost::new(Board::Free, "fresh", "start")).unwrap();
    store.save().unwrap();
    assert_eq!(CommunityStore::open(&path).list_posts(BoardTab::All).len(), 1);
}

#[test]
fn in_memory_save_is_a_no_op() {
    let store = CommunityStore::in_memory();
    assert!(store.path().is_none());
    store.save().unwrap();
}

proptest! {
    #[test]
    fn history_invariants(queries in prop::collection::vec("[a-c]{0,2}", 0..40)) {
        let mut store = CommunityStore::in_memory();
        for q in &queries {
            store.record_search(q);
        }
        let history = store.search_history();
        prop_assert!(history.len() <= MAX_HISTORY);
        let mut seen = std::collections::HashSet::new();
        for h in history {
            prop_assert!(!h.trim().is_empty());
            prop_assert!(seen.insert(h.clone()), "duplicate {}", h);
        }
        if let Some(last) = queries.iter().rev().find(|q| !q.trim().is_empty()) {
            prop_assert_eq!(&history[0], last);
        }
    }
}

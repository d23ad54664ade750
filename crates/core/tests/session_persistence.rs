//! Integration test: open a session over a file-backed store, edit it, and
//! reopen it the way a restarted app would. Checks seeding, URL precedence,
//! and that damaged records are dropped without losing their neighbours.

use everysize_core::EverysizeConfig;
use everysize_core::model::{Session, default_layout};
use everysize_core::store::{BOXES_KEY, FileStorage, Storage, URL_KEY};
use everysize_core::sync::query::{URL_PARAM, query_param, with_query_param};
use everysize_core::sync::{DEFAULT_URL, UrlSyncState};
use everysize_protocol::BoxCommand;

#[test]
fn session_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("storage.json");

    // First launch: nothing stored, no link.
    let mut session = Session::open(FileStorage::open(&path), EverysizeConfig::default(), None);
    assert_eq!(
        session.boxes(),
        &default_layout()[..],
        "empty storage should be seeded with the default layout"
    );
    assert_eq!(session.url(), Some(DEFAULT_URL));

    let added = session.add_device();
    session.apply(BoxCommand::Move {
        item_id: added.clone(),
        position_x: -120,
        position_y: 400,
    });
    session.apply(BoxCommand::ApplyDevice {
        item_id: "default-desktop".into(),
        device_code: "laptop".into(),
    });
    session.apply(BoxCommand::Remove {
        item_id: "default-tablet".into(),
    });
    session.set_url("https://everysize.test/pricing");
    let before = session.boxes().to_vec();
    drop(session);

    // Second launch: everything comes back exactly, no reseeding.
    let session = Session::open(FileStorage::open(&path), EverysizeConfig::default(), None);
    assert_eq!(session.boxes(), &before[..], "boxes should survive a restart");
    assert_eq!(session.url(), Some("https://everysize.test/pricing"));
    assert_eq!(session.url_state().sync_state(), UrlSyncState::Synced);

    let moved = session.find_box(&added).expect("added box persisted");
    assert_eq!((moved.position_x, moved.position_y), (-120, 400));
    let desktop = session.find_box("default-desktop").expect("desktop kept");
    assert_eq!(desktop.device_code.as_deref(), Some("laptop"));
    assert_eq!((desktop.width, desktop.height), (1366, 768));
}

#[test]
fn stored_url_wins_over_shared_link() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("storage.json");

    let storage = FileStorage::open(&path);
    storage
        .set_item(URL_KEY, "https://previous.test")
        .expect("write url");

    let query = "?url=https%3A%2F%2Fshared.test%2Fdocs&ref=chat";
    let session = Session::open(storage, EverysizeConfig::default(), query_param(query, URL_PARAM));
    assert_eq!(session.url(), Some("https://previous.test"));
    assert_eq!(session.url_state().sync_state(), UrlSyncState::Synced);

    // The address bar is rewritten to the stored URL and keeps its other
    // parameters.
    let next_query = with_query_param(query, URL_PARAM, session.url());
    assert_eq!(next_query, "?url=https%3A%2F%2Fprevious.test&ref=chat");
    drop(session);

    let session = Session::open(FileStorage::open(&path), EverysizeConfig::default(), None);
    assert_eq!(session.url(), Some("https://previous.test"));
}

#[test]
fn shared_link_is_remembered_on_first_visit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("storage.json");

    let query = "?url=https%3A%2F%2Fshared.test%2Fdocs&ref=chat";
    let session = Session::open(
        FileStorage::open(&path),
        EverysizeConfig::default(),
        query_param(query, URL_PARAM),
    );
    assert_eq!(session.url(), Some("https://shared.test/docs"));
    assert_eq!(
        with_query_param(query, URL_PARAM, session.url()),
        query,
        "query already carries the URL"
    );
    drop(session);

    // Opening later without a link falls back to the remembered URL.
    let session = Session::open(FileStorage::open(&path), EverysizeConfig::default(), None);
    assert_eq!(session.url(), Some("https://shared.test/docs"));
}

#[test]
fn damaged_records_are_dropped_silently() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("storage.json");

    let storage = FileStorage::open(&path);
    storage
        .set_item(
            BOXES_KEY,
            "keep-1|375|812|0|0|1|iphone-x,half|375,keep-2|768|1024|400|0|0.75|,bad|x|1|0|0|1|",
        )
        .expect("write boxes");

    let session = Session::open(storage, EverysizeConfig::default(), None);
    let ids: Vec<&str> = session.boxes().iter().map(|b| b.item_id.as_str()).collect();
    assert_eq!(ids, ["keep-1", "keep-2"], "valid siblings keep their order");
    assert_eq!(session.boxes()[1].device_code, None);
}

#[test]
fn custom_delimiter_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("storage.json");
    let config = EverysizeConfig::from_toml_str("[session]\nlist_delimiter = \";\"")
        .expect("valid config");

    let session = Session::open(FileStorage::open(&path), config.clone(), None);
    let raw = session
        .storage()
        .get_item(BOXES_KEY)
        .expect("read")
        .expect("seeded");
    assert_eq!(raw.matches(';').count(), 2, "three records, two separators");
    drop(session);

    let session = Session::open(FileStorage::open(&path), config, None);
    assert_eq!(session.boxes(), &default_layout()[..]);
}

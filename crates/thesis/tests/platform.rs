use thesis::domain::config::ApiConfig;
use thesis::features;
use thesis::kernel::prelude::ApiState;
use thesis_database::Database;
use thesis_event_bus::EventBus;

#[tokio::test]
async fn every_slice_is_registered() {
    let config = ApiConfig::default();
    let db = Database::builder().url("mem://").session("thesis", "platform").init().await.unwrap();
    let events = EventBus::new();

    let platform = thesis::init(&config, &db, &events).await.unwrap();
    assert_eq!(platform.slices.len(), 8);
    assert_eq!(platform.notifications.listeners(), 6);

    let state = ApiState::builder()
        .config(config)
        .db(db)
        .events(events)
        .register_slices(platform.slices)
        .build()
        .unwrap();
    assert!(state.get_slice::<features::council::Councils>().is_some());
    assert!(state.get_slice::<features::meeting::Meetings>().is_some());
    assert!(state.get_slice::<features::decision::Decisions>().is_some());
    platform.notifications.shutdown();
}

#[test]
fn api_paths_cover_every_slice() {
    let (_, doc) = thesis::api_router().split_for_parts();
    for path in [
        "/api/me",
        "/api/system-configs/{key}",
        "/api/submission-periods/active",
        "/api/topics/validate",
        "/api/groups/{id}/topic",
        "/api/councils/{id}/assignments/{group_id}",
        "/api/meetings/{id}",
        "/api/decisions",
    ] {
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
    assert!(features::is_enabled("meeting"));
    assert!(!features::is_enabled("licensing"));
}

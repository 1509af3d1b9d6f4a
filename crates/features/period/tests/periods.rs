use thesis_database::Database;
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::{Role, TimelineStatus, timeline};
use thesis_period::{
    CreatePeriodRequest, PeriodError, PeriodFilter, PeriodRepository, PeriodService,
    UpdatePeriodRequest,
};

async fn setup() -> (Database, PeriodService) {
    let db = Database::builder().url("mem://").session("thesis", "period").init().await.unwrap();
    (db.clone(), PeriodService::new(PeriodRepository::new(db)))
}

fn manager() -> CurrentUser {
    CurrentUser { id: "mgr".into(), role: Role::Manager, email: "m@uni.vn".into(), full_name: "M".into() }
}

fn days_from_now(days: i64) -> String {
    timeline::format(timeline::now() + chrono::Duration::days(days))
}

fn request(semester: &str, round: u32, from: i64, to: i64) -> CreatePeriodRequest {
    CreatePeriodRequest {
        semester: semester.into(),
        round_number: round,
        start_date: days_from_now(from),
        end_date: days_from_now(to),
        description: Some("  Đợt đăng ký đề tài  ".into()),
    }
}

#[tokio::test]
async fn create_derives_status_and_normalizes() {
    let (_, periods) = setup().await;
    let view = periods.create(&manager(), request(" su25 ", 1, -1, 10)).await.unwrap();
    assert_eq!(view.semester, "SU25");
    assert_eq!(view.status, TimelineStatus::Active);
    assert_eq!(view.description.as_deref(), Some("Đợt đăng ký đề tài"));

    let upcoming = periods.create(&manager(), request("SU25", 2, 20, 30)).await.unwrap();
    assert_eq!(upcoming.status, TimelineStatus::Upcoming);

    let active = periods.active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, view.id);

    let filtered = periods
        .list(&PeriodFilter { semester: Some("su25".into()), status: Some(TimelineStatus::Upcoming) })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].round_number, 2);
}

#[tokio::test]
async fn clashes_are_rejected() {
    let (_, periods) = setup().await;
    periods.create(&manager(), request("SU25", 1, 1, 10)).await.unwrap();

    let err = periods.create(&manager(), request("SU25", 1, 20, 30)).await.unwrap_err();
    assert!(matches!(err, PeriodError::Conflict { .. }));

    let err = periods.create(&manager(), request("SU25", 2, 5, 15)).await.unwrap_err();
    assert!(matches!(err, PeriodError::Conflict { .. }));

    let err = periods.create(&manager(), request("SU25", 3, 30, 20)).await.unwrap_err();
    assert!(matches!(err, PeriodError::Timeline { .. }));

    assert!(periods.create(&manager(), request("FA25", 1, 5, 15)).await.is_ok());
}

#[tokio::test]
async fn back_to_back_rounds_must_not_share_an_instant() {
    let (_, periods) = setup().await;
    let boundary = days_from_now(10);
    let first = CreatePeriodRequest { end_date: boundary.clone(), ..request("SU25", 1, 1, 10) };
    periods.create(&manager(), first).await.unwrap();

    let touching = CreatePeriodRequest { start_date: boundary.clone(), ..request("SU25", 2, 10, 20) };
    let err = periods.create(&manager(), touching).await.unwrap_err();
    assert!(matches!(err, PeriodError::Conflict { .. }));

    let next = timeline::format(timeline::parse(&boundary).unwrap() + chrono::Duration::seconds(1));
    let after = CreatePeriodRequest { start_date: next, ..request("SU25", 2, 10, 20) };
    assert!(periods.create(&manager(), after).await.is_ok());
}

#[tokio::test]
async fn active_period_keeps_its_start() {
    let (_, periods) = setup().await;
    let view = periods.create(&manager(), request("SU25", 1, -2, 10)).await.unwrap();

    let moved = UpdatePeriodRequest { start_date: Some(days_from_now(-1)), ..Default::default() };
    let err = periods.update(&manager(), &view.id, moved).await.unwrap_err();
    assert!(matches!(err, PeriodError::Validation { .. }));

    let new_end = days_from_now(20);
    let extended = UpdatePeriodRequest { end_date: Some(new_end.clone()), ..Default::default() };
    let updated = periods.update(&manager(), &view.id, extended).await.unwrap();
    assert_eq!(updated.end_date, new_end);
    assert_eq!(updated.start_date, view.start_date);
}

#[tokio::test]
async fn delete_is_blocked_by_topics() {
    let (db, periods) = setup().await;
    let kept = periods.create(&manager(), request("SU25", 1, 1, 10)).await.unwrap();
    let free = periods.create(&manager(), request("SU25", 2, 20, 30)).await.unwrap();

    db.query("CREATE topic CONTENT { uid: 't1', period_id: $period, is_deleted: false }")
        .bind(("period", kept.id.clone()))
        .await
        .unwrap()
        .check()
        .unwrap();

    let err = periods.delete(&manager(), &kept.id).await.unwrap_err();
    assert!(matches!(err, PeriodError::Conflict { .. }));

    periods.delete(&manager(), &free.id).await.unwrap();
    let err = periods.get(&free.id).await.unwrap_err();
    assert!(matches!(err, PeriodError::NotFound { .. }));
}

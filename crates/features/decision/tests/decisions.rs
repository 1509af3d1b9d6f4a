use thesis_decision::{
    CreateDecisionRequest, DecisionError, DecisionFilter, DecisionRepository, DecisionService,
    UpdateDecisionRequest,
};
use thesis_database::Database;
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::{DecisionKind, Role, timeline};

async fn setup() -> DecisionService {
    let db = Database::builder().url("mem://").session("thesis", "decision").init().await.unwrap();
    DecisionService::new(DecisionRepository::new(db))
}

fn manager() -> CurrentUser {
    CurrentUser { id: "mgr".into(), role: Role::Manager, email: "m@uni.vn".into(), full_name: "M".into() }
}

fn request(number: &str, kind: DecisionKind) -> CreateDecisionRequest {
    CreateDecisionRequest {
        number: number.into(),
        title: "  Giao đề tài   khóa luận ".into(),
        kind,
        semester: "su25".into(),
        signed_date: "2025-05-20".into(),
        signer: "PGS. TS. Trần Văn A".into(),
        file_url: Some("https://files.uni.vn/qd.pdf".into()),
        note: None,
    }
}

#[tokio::test]
async fn create_normalizes_and_numbers_stay_unique() {
    let decisions = setup().await;
    let record = decisions.create(&manager(), request("QĐ-101", DecisionKind::TopicAssignment)).await.unwrap();
    assert_eq!(record.title, "Giao đề tài khóa luận");
    assert_eq!(record.semester, "SU25");
    assert_eq!(record.signed_date, "2025-05-20T00:00:00Z");

    let err = decisions
        .create(&manager(), request(" qđ-101 ", DecisionKind::DefenseResult))
        .await
        .unwrap_err();
    assert!(matches!(err, DecisionError::Conflict { .. }));

    decisions.delete(&manager(), &record.uid).await.unwrap();
    decisions.create(&manager(), request("QĐ-101", DecisionKind::DefenseResult)).await.unwrap();
}

#[tokio::test]
async fn required_fields_and_signing_date_are_checked() {
    let decisions = setup().await;

    let blank_signer = CreateDecisionRequest { signer: "  ".into(), ..request("QĐ-1", DecisionKind::TopicAssignment) };
    let err = decisions.create(&manager(), blank_signer).await.unwrap_err();
    assert!(matches!(err, DecisionError::Validation { .. }));

    let blank_title = CreateDecisionRequest { title: String::new(), ..request("QĐ-1", DecisionKind::TopicAssignment) };
    let err = decisions.create(&manager(), blank_title).await.unwrap_err();
    assert!(matches!(err, DecisionError::Validation { .. }));

    let tomorrow = timeline::format(timeline::now() + chrono::Duration::days(1));
    let future = CreateDecisionRequest { signed_date: tomorrow, ..request("QĐ-1", DecisionKind::TopicAssignment) };
    let err = decisions.create(&manager(), future).await.unwrap_err();
    assert!(matches!(err, DecisionError::Validation { .. }));

    let garbled = CreateDecisionRequest { signed_date: "20/05/2025".into(), ..request("QĐ-1", DecisionKind::TopicAssignment) };
    let err = decisions.create(&manager(), garbled).await.unwrap_err();
    assert!(matches!(err, DecisionError::Timeline { .. }));
}

#[tokio::test]
async fn update_and_filter() {
    let decisions = setup().await;
    let first = decisions.create(&manager(), request("QĐ-1", DecisionKind::TopicAssignment)).await.unwrap();
    decisions.create(&manager(), request("QĐ-2", DecisionKind::CouncilEstablishment)).await.unwrap();

    let err = decisions
        .update(
            &manager(),
            &first.uid,
            UpdateDecisionRequest { number: Some("qđ-2".into()), ..UpdateDecisionRequest::default() },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DecisionError::Conflict { .. }));

    let updated = decisions
        .update(
            &manager(),
            &first.uid,
            UpdateDecisionRequest {
                number: Some("qđ-1".into()),
                file_url: Some(String::new()),
                note: Some("Bổ sung danh sách".into()),
                ..UpdateDecisionRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.number, "qđ-1");
    assert_eq!(updated.file_url, None);
    assert_eq!(updated.note.as_deref(), Some("Bổ sung danh sách"));

    let councils = decisions
        .list(DecisionFilter { kind: Some(DecisionKind::CouncilEstablishment), ..DecisionFilter::default() })
        .await
        .unwrap();
    assert_eq!(councils.len(), 1);
    assert_eq!(councils[0].number, "QĐ-2");
    assert!(decisions
        .list(DecisionFilter { semester: Some("FA25".into()), ..DecisionFilter::default() })
        .await
        .unwrap()
        .is_empty());

    let err = decisions.get("missing").await.unwrap_err();
    assert!(matches!(err, DecisionError::NotFound { .. }));
}

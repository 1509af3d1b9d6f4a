use chrono::Duration;
use std::sync::Arc;
use thesis_database::Database;
use thesis_event_bus::{EventBus, Subscription};
use thesis_group::{
    AddMemberRequest, AssignTopicRequest, CreateGroupRequest, GroupRepository, GroupService,
};
use thesis_identity::{CreateUserRequest, CurrentUser, UserRepository, UserService};
use thesis_kernel::domain::config::SettingsConfig;
use thesis_kernel::domain::events::MeetingScheduled;
use thesis_kernel::prelude::{Role, TimelineStatus, TopicStatus, timeline};
use thesis_meeting::{
    CreateMeetingRequest, MeetingError, MeetingFilter, MeetingRecord, MeetingRepository,
    MeetingService, UpdateMeetingRequest,
};
use thesis_period::{CreatePeriodRequest, PeriodRepository, PeriodService};
use thesis_settings::{SettingsRepository, SettingsService};
use thesis_topic::{
    CreateTopicRequest, ReviewTopicRequest, StubTopicValidator, TopicRepository, TopicService,
};

struct Fixture {
    meetings: MeetingService,
    repo: MeetingRepository,
    groups: GroupService,
    topics: TopicService,
    events: EventBus,
    admin: CurrentUser,
    lecturers: Vec<CurrentUser>,
    students: Vec<CurrentUser>,
    period: String,
}

async fn person(users: &UserService, email: &str, role: Role) -> CurrentUser {
    let record = users
        .create(CreateUserRequest { email: email.into(), full_name: email.into(), role })
        .await
        .unwrap();
    CurrentUser { id: record.uid, role, email: record.email, full_name: record.full_name }
}

async fn fixture() -> Fixture {
    let db = Database::builder().url("mem://").session("thesis", "meeting").init().await.unwrap();
    let users = UserService::new(UserRepository::new(db.clone()));
    let settings = SettingsService::new(SettingsRepository::new(db.clone()), &SettingsConfig::default());
    let periods = PeriodService::new(PeriodRepository::new(db.clone()));
    let events = EventBus::new();

    let admin = person(&users, "admin@uni.vn", Role::Admin).await;
    let lecturers = vec![
        person(&users, "gv0@uni.vn", Role::Lecturer).await,
        person(&users, "gv1@uni.vn", Role::Lecturer).await,
    ];
    let mut students = Vec::new();
    for n in 0..5 {
        students.push(person(&users, &format!("sv{n}@uni.vn"), Role::Student).await);
    }

    let now = timeline::now();
    let period = periods
        .create(
            &admin,
            CreatePeriodRequest {
                semester: "SU25".into(),
                round_number: 1,
                start_date: timeline::format(now - Duration::days(1)),
                end_date: timeline::format(now + Duration::days(30)),
                description: None,
            },
        )
        .await
        .unwrap();

    let topics = TopicService::new(
        TopicRepository::new(db.clone()),
        users.clone(),
        settings.clone(),
        periods,
        events.clone(),
        Arc::new(StubTopicValidator),
    );
    let groups =
        GroupService::new(GroupRepository::new(db.clone()), users, settings, topics.clone(), events.clone());
    let repo = MeetingRepository::new(db);
    let meetings = MeetingService::new(repo.clone(), groups.clone(), events.clone());
    Fixture {
        meetings,
        repo,
        groups,
        topics,
        events,
        admin,
        lecturers,
        students,
        period: period.id,
    }
}

impl Fixture {
    /// Two-student group led by `leader` and mentored by lecturer 0.
    async fn group(&self, leader: usize) -> String {
        let mentor = &self.lecturers[0];
        let topic = self
            .topics
            .create(
                mentor,
                CreateTopicRequest {
                    title_vi: format!("Đề tài họp nhóm {leader}"),
                    title_en: "Topic".into(),
                    description: None,
                    period_id: self.period.clone(),
                    main_mentor_id: None,
                    sub_mentor_id: None,
                    max_students: Some(3),
                },
            )
            .await
            .unwrap();
        self.topics
            .review(&self.admin, &topic.uid, ReviewTopicRequest { status: TopicStatus::Approved, note: None })
            .await
            .unwrap();

        let leader_user = &self.students[leader];
        let group = self
            .groups
            .create(leader_user, CreateGroupRequest { semester: "SU25".into(), name: None })
            .await
            .unwrap();
        self.groups
            .add_member(
                leader_user,
                &group.group.uid,
                AddMemberRequest { student_id: self.students[leader + 1].id.clone() },
            )
            .await
            .unwrap();
        self.groups
            .assign_topic(&self.admin, &group.group.uid, AssignTopicRequest { topic_id: topic.uid })
            .await
            .unwrap();
        group.group.uid
    }

    fn in_hours(&self, hours: i64) -> String {
        timeline::format(timeline::now() + Duration::hours(hours))
    }

    fn request(&self, group: &str, hours: i64) -> CreateMeetingRequest {
        CreateMeetingRequest {
            group_id: group.to_owned(),
            mentor_id: None,
            start_time: self.in_hours(hours),
            duration_minutes: None,
            location: Some("  Phòng B2 ".into()),
            agenda: Some("Báo cáo tiến độ".into()),
        }
    }

    /// Stores a meeting that started ten minutes ago, bypassing the future-start rule.
    async fn running(&self, group: &str) -> String {
        let start = timeline::now() - Duration::minutes(10);
        let stamp = timeline::format(timeline::now());
        let record = MeetingRecord {
            uid: "running".into(),
            group_id: group.to_owned(),
            mentor_id: self.lecturers[0].id.clone(),
            semester: "SU25".into(),
            start_time: timeline::format(start),
            end_time: timeline::format(start + Duration::minutes(60)),
            duration_minutes: 60,
            location: None,
            agenda: None,
            notes: None,
            created_by: self.lecturers[0].id.clone(),
            created_at: stamp.clone(),
            updated_at: stamp,
            is_deleted: false,
            deleted_at: None,
        };
        self.repo.insert(&record).await.unwrap();
        record.uid
    }
}

#[tokio::test]
async fn mentors_schedule_without_clashes() {
    let f = fixture().await;
    let mut scheduled = f.events.subscribe::<MeetingScheduled>().unwrap();
    let first = f.group(0).await;
    let second = f.group(2).await;
    let mentor = &f.lecturers[0];

    let meeting = f.meetings.create(mentor, f.request(&first, 24)).await.unwrap();
    assert_eq!(meeting.mentor_id, mentor.id);
    assert_eq!(meeting.duration_minutes, 60);
    assert_eq!(meeting.location.as_deref(), Some("Phòng B2"));
    assert_eq!(meeting.semester, "SU25");
    let event = scheduled.next().await.unwrap();
    assert_eq!(event.meeting_id, meeting.uid);

    let err = f.meetings.create(&f.lecturers[1], f.request(&first, 48)).await.unwrap_err();
    assert!(matches!(err, MeetingError::Forbidden { .. }));

    let err = f.meetings.create(mentor, f.request(&first, -1)).await.unwrap_err();
    assert!(matches!(err, MeetingError::Validation { .. }));

    let short = CreateMeetingRequest { duration_minutes: Some(10), ..f.request(&first, 48) };
    let err = f.meetings.create(mentor, short).await.unwrap_err();
    assert!(matches!(err, MeetingError::Validation { .. }));

    let err = f.meetings.create(&f.admin, f.request(&first, 48)).await.unwrap_err();
    assert!(matches!(err, MeetingError::Validation { .. }));
    let outsider =
        CreateMeetingRequest { mentor_id: Some(f.lecturers[1].id.clone()), ..f.request(&first, 48) };
    let err = f.meetings.create(&f.admin, outsider).await.unwrap_err();
    assert!(matches!(err, MeetingError::Validation { .. }));

    let err = f.meetings.create(mentor, f.request(&second, 24)).await.unwrap_err();
    assert!(matches!(err, MeetingError::Conflict { .. }));

    let back_to_back = CreateMeetingRequest {
        start_time: timeline::format(timeline::parse(&meeting.end_time).unwrap()),
        ..f.request(&second, 0)
    };
    f.meetings.create(mentor, back_to_back).await.unwrap();

    let by_admin =
        CreateMeetingRequest { mentor_id: Some(mentor.id.clone()), ..f.request(&first, 72) };
    f.meetings.create(&f.admin, by_admin).await.unwrap();
}

#[tokio::test]
async fn students_only_see_their_groups() {
    let f = fixture().await;
    let first = f.group(0).await;
    let second = f.group(2).await;
    let mentor = &f.lecturers[0];
    f.meetings.create(mentor, f.request(&first, 24)).await.unwrap();
    let other = f.meetings.create(mentor, f.request(&second, 48)).await.unwrap();

    let all = f.meetings.list(mentor, MeetingFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let own = f.meetings.list(&f.students[1], MeetingFilter::default()).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].group_id, first);

    let err = f.meetings.get(&f.students[0], &other.uid).await.unwrap_err();
    assert!(matches!(err, MeetingError::Forbidden { .. }));
    f.meetings.get(&f.students[2], &other.uid).await.unwrap();

    f.running(&first).await;
    let active = f
        .meetings
        .list(&f.admin, MeetingFilter { status: Some(TimelineStatus::Active), ..MeetingFilter::default() })
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].uid, "running");
}

#[tokio::test]
async fn started_meetings_only_take_notes() {
    let f = fixture().await;
    let group = f.group(0).await;
    let mentor = &f.lecturers[0];
    let running = f.running(&group).await;

    let err = f
        .meetings
        .update(
            mentor,
            &running,
            UpdateMeetingRequest { location: Some("Online".into()), ..UpdateMeetingRequest::default() },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MeetingError::Validation { .. }));

    let notes = UpdateMeetingRequest { notes: Some("Đã chốt phạm vi".into()), ..UpdateMeetingRequest::default() };
    let err = f.meetings.update(&f.admin, &running, notes.clone()).await.unwrap_err();
    assert!(matches!(err, MeetingError::Forbidden { .. }));
    let updated = f.meetings.update(mentor, &running, notes).await.unwrap();
    assert_eq!(updated.notes.as_deref(), Some("Đã chốt phạm vi"));

    let err = f.meetings.delete(mentor, &running).await.unwrap_err();
    assert!(matches!(err, MeetingError::Validation { .. }));
}

#[tokio::test]
async fn upcoming_meetings_can_move_and_be_cancelled() {
    let f = fixture().await;
    let group = f.group(0).await;
    let mentor = &f.lecturers[0];
    let first = f.meetings.create(mentor, f.request(&group, 24)).await.unwrap();
    let second = f.meetings.create(mentor, f.request(&group, 48)).await.unwrap();

    let onto_second = UpdateMeetingRequest {
        start_time: Some(second.start_time.clone()),
        ..UpdateMeetingRequest::default()
    };
    let err = f.meetings.update(mentor, &first.uid, onto_second).await.unwrap_err();
    assert!(matches!(err, MeetingError::Conflict { .. }));

    let longer = UpdateMeetingRequest {
        duration_minutes: Some(120),
        agenda: Some("Demo".into()),
        ..UpdateMeetingRequest::default()
    };
    let moved = f.meetings.update(mentor, &first.uid, longer).await.unwrap();
    assert_eq!(moved.duration_minutes, 120);
    assert_eq!(moved.start_time, first.start_time);
    assert_eq!(moved.agenda.as_deref(), Some("Demo"));

    f.meetings.delete(&f.admin, &second.uid).await.unwrap();
    let err = f.meetings.get(&f.admin, &second.uid).await.unwrap_err();
    assert!(matches!(err, MeetingError::NotFound { .. }));
}

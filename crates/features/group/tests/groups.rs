use std::sync::Arc;
use thesis_database::Database;
use thesis_event_bus::{EventBus, Subscription};
use thesis_group::{
    AddMemberRequest, AddMentorRequest, AssignTopicRequest, ChangeLeaderRequest,
    CreateGroupRequest, GroupError, GroupFilter, GroupRepository, GroupService,
};
use thesis_identity::{CreateUserRequest, CurrentUser, UserRepository, UserService};
use thesis_kernel::domain::config::SettingsConfig;
use thesis_kernel::domain::events::{GroupMemberAdded, MentorAssigned};
use thesis_kernel::prelude::{MentorRole, Role, TopicStatus, timeline};
use thesis_period::{CreatePeriodRequest, PeriodRepository, PeriodService};
use thesis_settings::{SettingsRepository, SettingsService};
use thesis_topic::{
    CreateTopicRequest, ReviewTopicRequest, StubTopicValidator, TopicRepository, TopicService,
};

struct Fixture {
    db: Database,
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
    let db = Database::builder().url("mem://").session("thesis", "group").init().await.unwrap();
    let users = UserService::new(UserRepository::new(db.clone()));
    let settings = SettingsService::new(SettingsRepository::new(db.clone()), &SettingsConfig::default());
    let periods = PeriodService::new(PeriodRepository::new(db.clone()));
    let events = EventBus::new();

    let admin = person(&users, "admin@uni.vn", Role::Admin).await;
    let mut lecturers = Vec::new();
    for n in 0..3 {
        lecturers.push(person(&users, &format!("gv{n}@uni.vn"), Role::Lecturer).await);
    }
    let mut students = Vec::new();
    for n in 0..7 {
        students.push(person(&users, &format!("sv{n}@uni.vn"), Role::Student).await);
    }

    let now = timeline::now();
    let period = periods
        .create(
            &admin,
            CreatePeriodRequest {
                semester: "SU25".into(),
                round_number: 1,
                start_date: timeline::format(now - chrono::Duration::days(1)),
                end_date: timeline::format(now + chrono::Duration::days(30)),
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
    let groups = GroupService::new(
        GroupRepository::new(db.clone()),
        users,
        settings,
        topics.clone(),
        events.clone(),
    );
    Fixture { db, groups, topics, events, admin, lecturers, students, period: period.id }
}

impl Fixture {
    async fn topic(&self, mentor: &CurrentUser, sub: Option<&CurrentUser>, approve: bool) -> String {
        let topic = self
            .topics
            .create(
                mentor,
                CreateTopicRequest {
                    title_vi: format!("Đề tài của {}", mentor.email),
                    title_en: "Topic".into(),
                    description: None,
                    period_id: self.period.clone(),
                    main_mentor_id: None,
                    sub_mentor_id: sub.map(|s| s.id.clone()),
                    max_students: Some(3),
                },
            )
            .await
            .unwrap();
        if approve {
            self.topics
                .review(&self.admin, &topic.uid, ReviewTopicRequest { status: TopicStatus::Approved, note: None })
                .await
                .unwrap();
        }
        topic.uid
    }

    async fn group_with(&self, leader: usize, others: &[usize]) -> String {
        let leader = &self.students[leader];
        let group = self
            .groups
            .create(leader, CreateGroupRequest { semester: "su25".into(), name: None })
            .await
            .unwrap();
        for &other in others {
            self.groups
                .add_member(leader, &group.group.uid, AddMemberRequest { student_id: self.students[other].id.clone() })
                .await
                .unwrap();
        }
        group.group.uid
    }
}

#[tokio::test]
async fn student_creator_leads_and_membership_is_exclusive() {
    let f = fixture().await;
    let mut joined = f.events.subscribe::<GroupMemberAdded>().unwrap();

    let created = f
        .groups
        .create(&f.students[0], CreateGroupRequest { semester: " su25 ".into(), name: None })
        .await
        .unwrap();
    assert_eq!(created.group.code, "SU25-G001");
    assert_eq!(created.group.name, "SU25-G001");
    assert_eq!(created.leader().unwrap().student_id, f.students[0].id);

    let err = f
        .groups
        .create(&f.students[0], CreateGroupRequest { semester: "SU25".into(), name: None })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Conflict { .. }));

    let id = created.group.uid;
    let details = f
        .groups
        .add_member(&f.students[0], &id, AddMemberRequest { student_id: f.students[1].id.clone() })
        .await
        .unwrap();
    assert_eq!(details.members.len(), 2);
    assert_eq!(joined.next().await.unwrap().student_id, f.students[1].id);

    let err = f
        .groups
        .add_member(&f.students[1], &id, AddMemberRequest { student_id: f.students[2].id.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Forbidden { .. }));

    let other = f.group_with(3, &[]).await;
    let err = f
        .groups
        .add_member(&f.students[3], &other, AddMemberRequest { student_id: f.students[1].id.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Conflict { .. }));

    let err = f
        .groups
        .add_member(&f.admin, &other, AddMemberRequest { student_id: f.lecturers[0].id.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Identity { .. }));
}

#[tokio::test]
async fn capacity_and_leader_handover() {
    let f = fixture().await;
    let id = f.group_with(0, &[1, 2, 3, 4]).await;

    let err = f
        .groups
        .add_member(&f.admin, &id, AddMemberRequest { student_id: f.students[5].id.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Conflict { .. }));

    let details = f.groups.remove_member(&f.admin, &id, &f.students[0].id).await.unwrap();
    assert_eq!(details.members.len(), 4);
    assert_eq!(details.leader().unwrap().student_id, f.students[1].id);

    let err = f
        .groups
        .change_leader(&f.students[1], &id, ChangeLeaderRequest { student_id: f.students[0].id.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Validation { .. }));

    let details = f
        .groups
        .change_leader(&f.students[1], &id, ChangeLeaderRequest { student_id: f.students[3].id.clone() })
        .await
        .unwrap();
    assert_eq!(details.leader().unwrap().student_id, f.students[3].id);
    assert_eq!(details.members.iter().filter(|m| m.is_leader).count(), 1);

    let details = f.groups.remove_member(&f.students[2], &id, &f.students[2].id).await.unwrap();
    assert!(details.member(&f.students[2].id).is_none());
}

#[tokio::test]
async fn mentor_seats_and_load() {
    let f = fixture().await;
    let mut assigned = f.events.subscribe::<MentorAssigned>().unwrap();
    let id = f.group_with(0, &[1]).await;
    let main = AddMentorRequest { lecturer_id: f.lecturers[0].id.clone(), role: MentorRole::Main };

    f.groups.add_mentor(&f.admin, &id, main.clone()).await.unwrap();
    assert_eq!(assigned.next().await.unwrap().role, MentorRole::Main);

    let err = f.groups.add_mentor(&f.admin, &id, main).await.unwrap_err();
    assert!(matches!(err, GroupError::Conflict { .. }));

    let both = AddMentorRequest { lecturer_id: f.lecturers[0].id.clone(), role: MentorRole::Sub };
    let err = f.groups.add_mentor(&f.admin, &id, both).await.unwrap_err();
    assert!(matches!(err, GroupError::Conflict { .. }));

    let sub = AddMentorRequest { lecturer_id: f.lecturers[1].id.clone(), role: MentorRole::Sub };
    let details = f.groups.add_mentor(&f.admin, &id, sub).await.unwrap();
    assert_eq!(details.mentors.len(), 2);

    let details = f.groups.remove_mentor(&f.admin, &id, &f.lecturers[1].id).await.unwrap();
    assert_eq!(details.mentors.len(), 1);

    let mentored = f
        .groups
        .list(GroupFilter { mentor_id: Some(f.lecturers[0].id.clone()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(mentored.len(), 1);
    assert_eq!(mentored[0].members.len(), 2);
}

#[tokio::test]
async fn topic_assignment_attaches_mentors() {
    let f = fixture().await;
    let pending = f.topic(&f.lecturers[0], Some(&f.lecturers[1]), false).await;
    let approved = f.topic(&f.lecturers[2], Some(&f.lecturers[1]), true).await;
    let id = f.group_with(0, &[1]).await;

    let err = f
        .groups
        .assign_topic(&f.students[0], &id, AssignTopicRequest { topic_id: pending })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Validation { .. }));

    let details = f
        .groups
        .assign_topic(&f.students[0], &id, AssignTopicRequest { topic_id: approved.clone() })
        .await
        .unwrap();
    assert_eq!(details.group.topic_id.as_deref(), Some(approved.as_str()));
    assert_eq!(details.mentor_with_role(MentorRole::Main).unwrap().lecturer_id, f.lecturers[2].id);
    assert_eq!(details.mentor_with_role(MentorRole::Sub).unwrap().lecturer_id, f.lecturers[1].id);
    assert_eq!(f.topics.get(&approved).await.unwrap().group_id.as_deref(), Some(id.as_str()));

    let other = f.group_with(2, &[3]).await;
    let err = f
        .groups
        .assign_topic(&f.admin, &other, AssignTopicRequest { topic_id: approved.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Conflict { .. }));

    let err = f.groups.remove_member(&f.admin, &id, &f.students[1].id).await.unwrap_err();
    assert!(matches!(err, GroupError::Validation { .. }));

    let err = f.groups.remove_mentor(&f.admin, &id, &f.lecturers[2].id).await.unwrap_err();
    assert!(matches!(err, GroupError::Validation { .. }));

    let wrong_main = AddMentorRequest { lecturer_id: f.lecturers[0].id.clone(), role: MentorRole::Main };
    f.groups.add_mentor(&f.admin, &other, wrong_main).await.unwrap();
    let err = f
        .groups
        .assign_topic(&f.admin, &other, AssignTopicRequest { topic_id: f.topic(&f.lecturers[1], None, true).await })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Validation { .. }));
}

#[tokio::test]
async fn lone_group_cannot_take_a_topic() {
    let f = fixture().await;
    let approved = f.topic(&f.lecturers[0], None, true).await;
    let id = f.group_with(0, &[]).await;

    let err = f
        .groups
        .assign_topic(&f.admin, &id, AssignTopicRequest { topic_id: approved })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Validation { .. }));
}

#[tokio::test]
async fn delete_cascades_and_frees_topic() {
    let f = fixture().await;
    let approved = f.topic(&f.lecturers[0], None, true).await;
    let id = f.group_with(0, &[1]).await;
    f.groups.assign_topic(&f.admin, &id, AssignTopicRequest { topic_id: approved.clone() }).await.unwrap();

    f.groups.delete(&f.admin, &id).await.unwrap();
    assert!(matches!(f.groups.get(&id).await, Err(GroupError::NotFound { .. })));
    assert_eq!(f.topics.get(&approved).await.unwrap().group_id, None);

    let again = f.group_with(1, &[0]).await;
    let details = f.groups.get(&again).await.unwrap();
    assert_eq!(details.group.code, "SU25-G002");
    assert_eq!(details.members.len(), 2);
}

#[tokio::test]
async fn council_members_cannot_mentor_the_groups_they_grade() {
    let f = fixture().await;
    let id = f.group_with(0, &[1]).await;
    let grader = &f.lecturers[0];

    f.db
        .query(
            "CREATE council_member CONTENT {
                uid: 'cm1', council_id: 'hd1', lecturer_id: $lecturer, semester: 'SU25',
                role: 'CHAIRMAN', added_at: time::now(), is_deleted: false
            };
            CREATE council_assignment CONTENT {
                uid: 'ca1', council_id: 'hd1', group_id: $group, kind: 'FINAL', semester: 'SU25',
                defense_at: time::now(), created_at: time::now(), is_deleted: false
            };",
        )
        .bind(("lecturer", grader.id.clone()))
        .bind(("group", id.clone()))
        .await
        .unwrap()
        .check()
        .unwrap();

    let main = AddMentorRequest { lecturer_id: grader.id.clone(), role: MentorRole::Main };
    let err = f.groups.add_mentor(&f.admin, &id, main).await.unwrap_err();
    assert!(matches!(err, GroupError::Conflict { .. }));

    let approved = f.topic(grader, None, true).await;
    let err = f
        .groups
        .assign_topic(&f.admin, &id, AssignTopicRequest { topic_id: approved })
        .await
        .unwrap_err();
    assert!(matches!(err, GroupError::Conflict { .. }));
    assert!(f.groups.get(&id).await.unwrap().mentors.is_empty());

    let free = AddMentorRequest { lecturer_id: f.lecturers[1].id.clone(), role: MentorRole::Main };
    assert_eq!(f.groups.add_mentor(&f.admin, &id, free).await.unwrap().mentors.len(), 1);
}

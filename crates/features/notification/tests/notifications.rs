use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thesis_database::Database;
use thesis_event_bus::EventBus;
use thesis_group::{AddMemberRequest, CreateGroupRequest, GroupRepository, GroupService};
use thesis_identity::{CreateUserRequest, CurrentUser, UpdateUserRequest, UserRepository, UserService};
use thesis_kernel::domain::config::{MailConfig, SettingsConfig};
use thesis_kernel::domain::events::{GroupMemberAdded, MeetingScheduled, TopicReviewed};
use thesis_kernel::prelude::{Role, TopicStatus};
use thesis_notification::{Dispatcher, MailMessage, Mailer, NotificationError, start};
use thesis_period::{PeriodRepository, PeriodService};
use thesis_settings::{SettingsRepository, SettingsService};
use thesis_topic::{StubTopicValidator, TopicRepository, TopicService};

#[derive(Debug, Clone, Default)]
struct Outbox {
    sent: Arc<Mutex<Vec<MailMessage>>>,
    fail: bool,
}

impl Mailer for Outbox {
    async fn send(&self, message: &MailMessage) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::Delivery { message: "relay down".into(), context: None });
        }
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

impl Outbox {
    async fn wait_for(&self, count: usize) -> Vec<MailMessage> {
        for _ in 0..100 {
            if self.sent.lock().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent.lock().clone()
    }
}

struct Fixture {
    users: UserService,
    groups: GroupService,
    events: EventBus,
}

async fn fixture() -> Fixture {
    let db = Database::builder().url("mem://").session("thesis", "notification").init().await.unwrap();
    let users = UserService::new(UserRepository::new(db.clone()));
    let settings = SettingsService::new(SettingsRepository::new(db.clone()), &SettingsConfig::default());
    let events = EventBus::new();
    let topics = TopicService::new(
        TopicRepository::new(db.clone()),
        users.clone(),
        settings.clone(),
        PeriodService::new(PeriodRepository::new(db.clone())),
        events.clone(),
        Arc::new(StubTopicValidator),
    );
    let groups = GroupService::new(GroupRepository::new(db), users.clone(), settings, topics, events.clone());
    Fixture { users, groups, events }
}

async fn person(users: &UserService, email: &str, role: Role) -> CurrentUser {
    let record = users
        .create(CreateUserRequest { email: email.into(), full_name: email.into(), role })
        .await
        .unwrap();
    CurrentUser { id: record.uid, role, email: record.email, full_name: record.full_name }
}

#[tokio::test]
async fn review_results_reach_active_recipients_with_prefix() {
    let f = fixture().await;
    let outbox = Outbox::default();
    let workers =
        start(&f.events, outbox.clone(), &MailConfig::default(), f.users.clone(), f.groups.clone()).unwrap();
    assert_eq!(workers.listeners(), 6);

    let admin = person(&f.users, "admin@uni.vn", Role::Admin).await;
    let lecturer = person(&f.users, "gv@uni.vn", Role::Lecturer).await;
    let retired = person(&f.users, "old@uni.vn", Role::Lecturer).await;
    f.users
        .update(&admin, &retired.id, UpdateUserRequest { is_active: Some(false), ..UpdateUserRequest::default() })
        .await
        .unwrap();

    f.events
        .publish(TopicReviewed {
            topic_id: "t1".into(),
            topic_code: "SU25-T001".into(),
            title: "Đề tài".into(),
            status: TopicStatus::Approved,
            note: None,
            recipients: vec![lecturer.id.clone(), retired.id.clone()],
        })
        .unwrap();

    let sent = outbox.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["gv@uni.vn".to_owned()]);
    assert_eq!(sent[0].subject, "[ThesisHub] Kết quả duyệt đề tài SU25-T001");
    assert_eq!(sent[0].from, MailConfig::default().from);
    workers.shutdown();
}

#[tokio::test]
async fn meetings_mail_the_whole_group_and_the_mentor() {
    let f = fixture().await;
    let mentor = person(&f.users, "gv@uni.vn", Role::Lecturer).await;
    let leader = person(&f.users, "sv1@uni.vn", Role::Student).await;
    let member = person(&f.users, "sv2@uni.vn", Role::Student).await;
    let group = f.groups.create(&leader, CreateGroupRequest { semester: "SU25".into(), name: None }).await.unwrap();
    f.groups
        .add_member(&leader, &group.group.uid, AddMemberRequest { student_id: member.id.clone() })
        .await
        .unwrap();

    let outbox = Outbox::default();
    let dispatcher = Dispatcher::new(outbox.clone(), &MailConfig::default(), f.users.clone(), f.groups.clone());
    let delivered = dispatcher
        .deliver(&MeetingScheduled {
            meeting_id: "m1".into(),
            group_id: group.group.uid.clone(),
            mentor_id: mentor.id.clone(),
            start_time: "2025-06-10T08:00:00Z".into(),
            location: Some("B2".into()),
        })
        .await
        .unwrap();
    assert_eq!(delivered, 3);

    let mut to = outbox.sent.lock()[0].to.clone();
    to.sort();
    assert_eq!(to, vec!["gv@uni.vn", "sv1@uni.vn", "sv2@uni.vn"]);

    let err = dispatcher
        .deliver(&MeetingScheduled {
            meeting_id: "m2".into(),
            group_id: "missing".into(),
            mentor_id: mentor.id,
            start_time: "2025-06-10T08:00:00Z".into(),
            location: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, NotificationError::Group { .. }));
}

#[tokio::test]
async fn delivery_failures_do_not_stop_the_listener() {
    let f = fixture().await;
    let failing = Outbox { fail: true, ..Outbox::default() };
    let _workers =
        start(&f.events, failing.clone(), &MailConfig::default(), f.users.clone(), f.groups.clone()).unwrap();
    let student = person(&f.users, "sv@uni.vn", Role::Student).await;

    let added = GroupMemberAdded { group_id: "g".into(), group_code: "SU25-G001".into(), student_id: student.id };
    assert_eq!(f.events.publish(added.clone()).unwrap(), 1);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(f.events.publish(added).unwrap(), 1);
    assert!(failing.sent.lock().is_empty());
}

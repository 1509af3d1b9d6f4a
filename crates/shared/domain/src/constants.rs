//! Table names and `OpenAPI` tags.

pub const USER: &str = "user";
pub const SYSTEM_CONFIG: &str = "system_config";
pub const SUBMISSION_PERIOD: &str = "submission_period";
pub const TOPIC: &str = "topic";
pub const GROUP: &str = "student_group";
pub const GROUP_MEMBER: &str = "group_member";
pub const GROUP_MENTOR: &str = "group_mentor";
pub const COUNCIL: &str = "council";
pub const COUNCIL_MEMBER: &str = "council_member";
pub const COUNCIL_ASSIGNMENT: &str = "council_assignment";
pub const MEETING: &str = "meeting_schedule";
pub const DECISION: &str = "decision";

pub const SYSTEM_TAG: &str = "System";
pub const IDENTITY_TAG: &str = "Identity";
pub const SETTINGS_TAG: &str = "System Config";
pub const PERIOD_TAG: &str = "Submission Periods";
pub const TOPIC_TAG: &str = "Topics";
pub const GROUP_TAG: &str = "Groups";
pub const COUNCIL_TAG: &str = "Councils";
pub const MEETING_TAG: &str = "Meetings";
pub const DECISION_TAG: &str = "Decisions";

/// Length of generated record keys.
pub const ID_LENGTH: usize = 12;

//! Who hears about each domain event and what the mail says.

use thesis_kernel::domain::events::{
    CouncilMemberAdded, GroupAssignedToCouncil, GroupMemberAdded, MeetingScheduled,
    MentorAssigned, TopicReviewed,
};
use thesis_kernel::prelude::{CouncilRole, MentorRole, TopicStatus};

/// Recipients of a notice, before they are resolved to mail addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Users(Vec<String>),
    /// Every member of the group plus `extra` users.
    Group { group_id: String, extra: Vec<String> },
}

/// A domain event that turns into one e-mail.
pub trait Notice: Send + Sync + 'static {
    fn audience(&self) -> Audience;
    fn subject(&self) -> String;
    fn body(&self) -> String;
}

impl Notice for GroupMemberAdded {
    fn audience(&self) -> Audience {
        Audience::Users(vec![self.student_id.clone()])
    }

    fn subject(&self) -> String {
        format!("Bạn đã được thêm vào nhóm {}", self.group_code)
    }

    fn body(&self) -> String {
        format!("Bạn là thành viên mới của nhóm {}.", self.group_code)
    }
}

impl Notice for MentorAssigned {
    fn audience(&self) -> Audience {
        Audience::Users(vec![self.lecturer_id.clone()])
    }

    fn subject(&self) -> String {
        format!("Phân công hướng dẫn nhóm {}", self.group_code)
    }

    fn body(&self) -> String {
        let role = match self.role {
            MentorRole::Main => "giảng viên hướng dẫn chính",
            MentorRole::Sub => "giảng viên hướng dẫn phụ",
        };
        format!("Bạn được phân công làm {role} của nhóm {}.", self.group_code)
    }
}

impl Notice for TopicReviewed {
    fn audience(&self) -> Audience {
        Audience::Users(self.recipients.clone())
    }

    fn subject(&self) -> String {
        format!("Kết quả duyệt đề tài {}", self.topic_code)
    }

    fn body(&self) -> String {
        let outcome = match self.status {
            TopicStatus::Approved => "đã được duyệt",
            TopicStatus::Rejected => "bị từ chối",
            TopicStatus::NeedsRevision => "cần chỉnh sửa",
            TopicStatus::Pending => "đang chờ duyệt",
        };
        match &self.note {
            Some(note) => format!("Đề tài \"{}\" {outcome}.\nGhi chú: {note}", self.title),
            None => format!("Đề tài \"{}\" {outcome}.", self.title),
        }
    }
}

impl Notice for CouncilMemberAdded {
    fn audience(&self) -> Audience {
        Audience::Users(vec![self.lecturer_id.clone()])
    }

    fn subject(&self) -> String {
        format!("Tham gia hội đồng {}", self.council_name)
    }

    fn body(&self) -> String {
        let role = match self.role {
            CouncilRole::Chairman => "chủ tịch",
            CouncilRole::Secretary => "thư ký",
            CouncilRole::Member => "ủy viên",
        };
        format!("Bạn được phân công làm {role} hội đồng {}.", self.council_name)
    }
}

impl Notice for GroupAssignedToCouncil {
    fn audience(&self) -> Audience {
        Audience::Group { group_id: self.group_id.clone(), extra: Vec::new() }
    }

    fn subject(&self) -> String {
        format!("Lịch bảo vệ của nhóm {}", self.group_code)
    }

    fn body(&self) -> String {
        format!(
            "Nhóm {} được xếp vào hội đồng {} lúc {}.",
            self.group_code, self.council_name, self.defense_at
        )
    }
}

impl Notice for MeetingScheduled {
    fn audience(&self) -> Audience {
        Audience::Group { group_id: self.group_id.clone(), extra: vec![self.mentor_id.clone()] }
    }

    fn subject(&self) -> String {
        "Lịch họp nhóm mới".to_owned()
    }

    fn body(&self) -> String {
        match &self.location {
            Some(location) => format!("Cuộc họp bắt đầu lúc {} tại {location}.", self.start_time),
            None => format!("Cuộc họp bắt đầu lúc {}.", self.start_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_mentions_outcome_and_note() {
        let notice = TopicReviewed {
            topic_id: "t1".into(),
            topic_code: "SU25-T001".into(),
            title: "Hệ thống quản lý khóa luận".into(),
            status: TopicStatus::NeedsRevision,
            note: Some("Thu hẹp phạm vi".into()),
            recipients: vec!["gv".into()],
        };
        assert_eq!(notice.subject(), "Kết quả duyệt đề tài SU25-T001");
        assert!(notice.body().contains("cần chỉnh sửa"));
        assert!(notice.body().ends_with("Ghi chú: Thu hẹp phạm vi"));
        assert_eq!(notice.audience(), Audience::Users(vec!["gv".into()]));
    }

    #[test]
    fn meetings_reach_group_and_mentor() {
        let notice = MeetingScheduled {
            meeting_id: "m1".into(),
            group_id: "g1".into(),
            mentor_id: "gv".into(),
            start_time: "2025-06-10T08:00:00Z".into(),
            location: None,
        };
        assert_eq!(
            notice.audience(),
            Audience::Group { group_id: "g1".into(), extra: vec!["gv".into()] }
        );
        assert_eq!(notice.body(), "Cuộc họp bắt đầu lúc 2025-06-10T08:00:00Z.");
    }
}

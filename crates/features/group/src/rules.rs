use crate::error::GroupError;
use crate::model::{GroupDetails, MemberRecord};
use thesis_kernel::prelude::MentorRole;

pub(crate) fn normalize_semester(raw: &str) -> Result<String, GroupError> {
    let semester = raw.trim().to_uppercase();
    if semester.is_empty() {
        return Err(GroupError::Validation {
            message: "Học kỳ không được để trống".into(),
            context: None,
        });
    }
    Ok(semester)
}

pub(crate) fn group_code(semester: &str, sequence: i64) -> String {
    format!("{semester}-G{sequence:03}")
}

/// Member that takes over when `leaving` leaves: the earliest joiner left.
pub(crate) fn successor<'a>(members: &'a [MemberRecord], leaving: &str) -> Option<&'a MemberRecord> {
    members
        .iter()
        .filter(|m| m.student_id != leaving)
        .min_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.seq.cmp(&b.seq)))
}

/// One MAIN, at most one SUB, and a lecturer never holds both seats.
pub(crate) fn ensure_mentor_seat(
    details: &GroupDetails,
    lecturer_id: &str,
    role: MentorRole,
) -> Result<(), GroupError> {
    if details.is_mentor(lecturer_id) {
        return Err(GroupError::Conflict {
            message: "Giảng viên đã hướng dẫn nhóm này".into(),
            context: Some(lecturer_id.to_owned().into()),
        });
    }
    if details.mentor_with_role(role).is_some() {
        let message = match role {
            MentorRole::Main => "Nhóm đã có giảng viên hướng dẫn chính",
            MentorRole::Sub => "Nhóm đã có giảng viên hướng dẫn phụ",
        };
        return Err(GroupError::Conflict { message: message.into(), context: None });
    }
    Ok(())
}

pub(crate) fn ensure_member_count(count: usize, min: i64, max: i64) -> Result<(), GroupError> {
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    if count < min || count > max {
        return Err(GroupError::Validation {
            message: format!("Số thành viên của nhóm phải từ {min} đến {max}").into(),
            context: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GroupRecord, MentorRecord};

    fn member(student: &str, seq: u32, joined_at: &str, leader: bool) -> MemberRecord {
        MemberRecord {
            uid: format!("m{seq}"),
            group_id: "g".into(),
            student_id: student.into(),
            semester: "SU25".into(),
            is_leader: leader,
            seq,
            joined_at: joined_at.into(),
            is_deleted: false,
            deleted_at: None,
        }
    }

    fn details(mentors: Vec<(&str, MentorRole)>) -> GroupDetails {
        GroupDetails {
            group: GroupRecord {
                uid: "g".into(),
                code: "SU25-G001".into(),
                name: "G".into(),
                semester: "SU25".into(),
                topic_id: None,
                created_by: "x".into(),
                created_at: String::new(),
                updated_at: String::new(),
                is_deleted: false,
                deleted_at: None,
            },
            members: Vec::new(),
            mentors: mentors
                .into_iter()
                .map(|(id, role)| MentorRecord {
                    uid: format!("x{id}"),
                    group_id: "g".into(),
                    lecturer_id: id.into(),
                    semester: "SU25".into(),
                    role,
                    assigned_at: String::new(),
                    is_deleted: false,
                    deleted_at: None,
                })
                .collect(),
        }
    }

    #[test]
    fn earliest_remaining_member_succeeds() {
        let members = vec![
            member("a", 1, "2025-03-01T00:00:00Z", true),
            member("c", 3, "2025-03-01T00:00:05Z", false),
            member("b", 2, "2025-03-01T00:00:05Z", false),
        ];
        assert_eq!(successor(&members, "a").unwrap().student_id, "b");
        assert_eq!(successor(&members, "b").unwrap().student_id, "a");
        assert!(successor(&members[..1], "a").is_none());
    }

    #[test]
    fn mentor_seats() {
        let group = details(vec![("l1", MentorRole::Main)]);
        assert!(ensure_mentor_seat(&group, "l1", MentorRole::Sub).is_err());
        assert!(ensure_mentor_seat(&group, "l2", MentorRole::Main).is_err());
        assert!(ensure_mentor_seat(&group, "l2", MentorRole::Sub).is_ok());
    }

    #[test]
    fn member_bounds() {
        assert!(ensure_member_count(1, 2, 5).is_err());
        assert!(ensure_member_count(2, 2, 5).is_ok());
        assert!(ensure_member_count(6, 2, 5).is_err());
        assert_eq!(group_code("FA25", 12), "FA25-G012");
    }
}

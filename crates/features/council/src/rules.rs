use crate::error::CouncilError;
use crate::model::{AssignmentRecord, CouncilDetails, CouncilRecord};
use chrono::{DateTime, Utc};
use thesis_kernel::prelude::{CouncilRole, TimelineStatus, Window, timeline};

/// Length of one defense slot.
pub(crate) const SLOT_MINUTES: i64 = 60;

pub(crate) fn normalize_name(raw: &str) -> Result<String, CouncilError> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(CouncilError::Validation {
            message: "Tên hội đồng không được để trống".into(),
            context: None,
        });
    }
    Ok(name)
}

pub(crate) fn council_code(semester: &str, sequence: i64) -> String {
    format!("{semester}-C{sequence:03}")
}

pub(crate) fn window_of(record: &CouncilRecord) -> Result<Window, CouncilError> {
    Ok(Window::new(timeline::parse(&record.start_time)?, timeline::parse(&record.end_time)?)?)
}

pub(crate) fn status_of(record: &CouncilRecord, now: DateTime<Utc>) -> TimelineStatus {
    window_of(record).map_or(TimelineStatus::Complete, |window| window.status_at(now))
}

pub(crate) fn slot_of(assignment: &AssignmentRecord) -> Result<Window, CouncilError> {
    Ok(Window::from_duration(timeline::parse(&assignment.defense_at)?, SLOT_MINUTES)?)
}

pub(crate) fn ensure_mutable(status: TimelineStatus) -> Result<(), CouncilError> {
    if status == TimelineStatus::Complete {
        return Err(CouncilError::Validation {
            message: "Hội đồng đã kết thúc, không thể thay đổi".into(),
            context: None,
        });
    }
    Ok(())
}

pub(crate) fn ensure_seat_free(details: &CouncilDetails, role: CouncilRole) -> Result<(), CouncilError> {
    if role.is_unique_seat() && details.has_role(role) {
        let message = match role {
            CouncilRole::Chairman => "Hội đồng đã có chủ tịch",
            _ => "Hội đồng đã có thư ký",
        };
        return Err(CouncilError::Conflict { message: message.into(), context: None });
    }
    Ok(())
}

/// A new slot must sit inside the council window and clear every other slot.
pub(crate) fn ensure_slot(
    council: &Window,
    slot: &Window,
    others: &[AssignmentRecord],
) -> Result<(), CouncilError> {
    if !council.encloses(slot) {
        return Err(CouncilError::Validation {
            message: "Thời gian bảo vệ phải nằm trong thời gian làm việc của hội đồng".into(),
            context: None,
        });
    }
    for other in others {
        if slot_of(other)?.overlaps(slot) {
            return Err(CouncilError::Conflict {
                message: "Thời gian bảo vệ trùng với nhóm khác của hội đồng".into(),
                context: Some(other.group_id.clone().into()),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use thesis_kernel::prelude::CouncilKind;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, hour, minute, 0).unwrap()
    }

    fn assignment(group: &str, hour: u32, minute: u32) -> AssignmentRecord {
        AssignmentRecord {
            uid: format!("a-{group}"),
            council_id: "c".into(),
            group_id: group.into(),
            kind: CouncilKind::Defense,
            semester: "SU25".into(),
            defense_at: timeline::format(at(hour, minute)),
            created_at: String::new(),
            is_deleted: false,
            deleted_at: None,
        }
    }

    #[test]
    fn names_and_codes() {
        assert_eq!(normalize_name("  Hội đồng   1 ").unwrap(), "Hội đồng 1");
        assert!(normalize_name(" ").is_err());
        assert_eq!(council_code("SU25", 3), "SU25-C003");
    }

    #[test]
    fn slots_stay_inside_and_apart() {
        let council = Window::new(at(8, 0), at(12, 0)).unwrap();
        let others = vec![assignment("g1", 8, 0)];

        let next = Window::from_duration(at(9, 0), SLOT_MINUTES).unwrap();
        assert!(ensure_slot(&council, &next, &others).is_ok());

        let clash = Window::from_duration(at(8, 30), SLOT_MINUTES).unwrap();
        assert!(matches!(ensure_slot(&council, &clash, &others), Err(CouncilError::Conflict { .. })));

        let late = Window::from_duration(at(11, 30), SLOT_MINUTES).unwrap();
        assert!(matches!(ensure_slot(&council, &late, &others), Err(CouncilError::Validation { .. })));
    }

    #[test]
    fn completed_councils_are_frozen() {
        assert!(ensure_mutable(TimelineStatus::Upcoming).is_ok());
        assert!(ensure_mutable(TimelineStatus::Active).is_ok());
        assert!(ensure_mutable(TimelineStatus::Complete).is_err());
    }
}

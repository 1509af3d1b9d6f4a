use crate::error::PeriodError;
use crate::model::PeriodRecord;
use chrono::{DateTime, Utc};
use thesis_kernel::prelude::{TimelineStatus, Window, timeline};

pub(crate) fn normalize_semester(raw: &str) -> Result<String, PeriodError> {
    let semester = raw.trim().to_uppercase();
    if semester.is_empty() {
        return Err(PeriodError::Validation {
            message: "Học kỳ không được để trống".into(),
            context: None,
        });
    }
    Ok(semester)
}

pub(crate) fn validate_round(round: u32) -> Result<u32, PeriodError> {
    if round == 0 {
        return Err(PeriodError::Validation {
            message: "Số thứ tự đợt nộp phải lớn hơn hoặc bằng 1".into(),
            context: None,
        });
    }
    Ok(round)
}

pub(crate) fn window_of(record: &PeriodRecord) -> Result<Window, PeriodError> {
    Ok(Window::new(timeline::parse(&record.start_date)?, timeline::parse(&record.end_date)?)?)
}

pub(crate) fn status_of(record: &PeriodRecord, now: DateTime<Utc>) -> TimelineStatus {
    window_of(record).map_or(TimelineStatus::Complete, |window| window.status_at(now))
}

/// Checks a candidate against the other active periods of its semester.
/// Periods are closed windows, so sharing an end instant is a clash.
pub(crate) fn ensure_no_clash(
    semester: &str,
    round: u32,
    window: &Window,
    siblings: &[PeriodRecord],
) -> Result<(), PeriodError> {
    if siblings.iter().any(|p| p.round_number == round) {
        return Err(PeriodError::Conflict {
            message: format!("Đợt nộp {round} của học kỳ {semester} đã tồn tại").into(),
            context: None,
        });
    }
    for sibling in siblings {
        if window_of(sibling)?.intersects(window) {
            return Err(PeriodError::Conflict {
                message: "Thời gian trùng với một đợt nộp khác trong cùng học kỳ".into(),
                context: Some(sibling.uid.clone().into()),
            });
        }
    }
    Ok(())
}

/// COMPLETE periods are frozen; an ACTIVE period keeps its start date.
pub(crate) fn ensure_editable(
    status: TimelineStatus,
    current_start: DateTime<Utc>,
    new_start: DateTime<Utc>,
) -> Result<(), PeriodError> {
    match status {
        TimelineStatus::Complete => Err(PeriodError::Validation {
            message: "Không thể chỉnh sửa đợt nộp đã kết thúc".into(),
            context: None,
        }),
        TimelineStatus::Active if current_start != new_start => Err(PeriodError::Validation {
            message: "Không thể thay đổi ngày bắt đầu của đợt nộp đang diễn ra".into(),
            context: None,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, 0, 0, 0).unwrap()
    }

    fn period(uid: &str, round: u32, start: u32, end: u32) -> PeriodRecord {
        PeriodRecord {
            uid: uid.into(),
            semester: "SU25".into(),
            round_number: round,
            start_date: timeline::format(day(start)),
            end_date: timeline::format(day(end)),
            description: None,
            created_by: "admin".into(),
            created_at: String::new(),
            updated_at: String::new(),
            is_deleted: false,
            deleted_at: None,
        }
    }

    #[test]
    fn semester_and_round_are_required() {
        assert_eq!(normalize_semester(" su25 ").unwrap(), "SU25");
        assert!(normalize_semester("  ").is_err());
        assert!(validate_round(0).is_err());
        assert_eq!(validate_round(2).unwrap(), 2);
    }

    #[test]
    fn duplicate_round_and_overlap_conflict() {
        let siblings = vec![period("p1", 1, 1, 10)];
        let later = Window::new(day(11), day(20)).unwrap();
        let overlapping = Window::new(day(5), day(15)).unwrap();

        assert!(ensure_no_clash("SU25", 2, &later, &siblings).is_ok());
        assert!(matches!(
            ensure_no_clash("SU25", 1, &later, &siblings),
            Err(PeriodError::Conflict { .. })
        ));
        assert!(matches!(
            ensure_no_clash("SU25", 2, &overlapping, &siblings),
            Err(PeriodError::Conflict { .. })
        ));
    }

    #[test]
    fn shared_boundary_instant_clashes() {
        let siblings = vec![period("p1", 1, 1, 10)];
        let touching = Window::new(day(10), day(20)).unwrap();
        let before = Window::new(Utc.with_ymd_and_hms(2025, 2, 20, 0, 0, 0).unwrap(), day(1)).unwrap();
        let apart = Window::new(day(10) + chrono::Duration::seconds(1), day(20)).unwrap();

        assert!(matches!(
            ensure_no_clash("SU25", 2, &touching, &siblings),
            Err(PeriodError::Conflict { .. })
        ));
        assert!(ensure_no_clash("SU25", 2, &before, &siblings).is_err());
        assert!(ensure_no_clash("SU25", 2, &apart, &siblings).is_ok());
        assert_eq!(status_of(&siblings[0], day(10)), TimelineStatus::Active);
    }

    #[test]
    fn status_follows_the_clock() {
        let record = period("p1", 1, 5, 10);
        assert_eq!(status_of(&record, day(1)), TimelineStatus::Upcoming);
        assert_eq!(status_of(&record, day(7)), TimelineStatus::Active);
        assert_eq!(status_of(&record, day(12)), TimelineStatus::Complete);
    }

    #[test]
    fn edit_restrictions() {
        assert!(ensure_editable(TimelineStatus::Upcoming, day(1), day(2)).is_ok());
        assert!(ensure_editable(TimelineStatus::Active, day(1), day(1)).is_ok());
        assert!(ensure_editable(TimelineStatus::Active, day(1), day(2)).is_err());
        assert!(ensure_editable(TimelineStatus::Complete, day(1), day(1)).is_err());
    }
}

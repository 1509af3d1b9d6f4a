use crate::error::MeetingError;
use crate::model::MeetingRecord;
use chrono::{DateTime, Utc};
use thesis_kernel::prelude::{TimelineStatus, Window, timeline};

pub(crate) const DEFAULT_DURATION: i64 = 60;
const MIN_DURATION: i64 = 15;
const MAX_DURATION: i64 = 240;

pub(crate) fn duration(minutes: Option<i64>) -> Result<i64, MeetingError> {
    let minutes = minutes.unwrap_or(DEFAULT_DURATION);
    if !(MIN_DURATION..=MAX_DURATION).contains(&minutes) {
        return Err(MeetingError::Validation {
            message: format!(
                "Thời lượng cuộc họp phải từ {MIN_DURATION} đến {MAX_DURATION} phút"
            )
            .into(),
            context: None,
        });
    }
    Ok(minutes)
}

pub(crate) fn ensure_future(start: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), MeetingError> {
    if start <= now {
        return Err(MeetingError::Validation {
            message: "Thời gian họp phải ở tương lai".into(),
            context: None,
        });
    }
    Ok(())
}

pub(crate) fn window_of(record: &MeetingRecord) -> Result<Window, MeetingError> {
    Ok(Window::from_duration(timeline::parse(&record.start_time)?, record.duration_minutes)?)
}

pub(crate) fn status_of(record: &MeetingRecord, now: DateTime<Utc>) -> TimelineStatus {
    window_of(record).map_or(TimelineStatus::Complete, |window| window.status_at(now))
}

/// `candidates` are the other live meetings of the same group or mentor.
pub(crate) fn ensure_no_clash(
    slot: &Window,
    group_id: &str,
    candidates: &[MeetingRecord],
) -> Result<(), MeetingError> {
    for other in candidates {
        if !window_of(other)?.overlaps(slot) {
            continue;
        }
        let message = if other.group_id == group_id {
            "Nhóm đã có cuộc họp khác trong khoảng thời gian này"
        } else {
            "Giảng viên đã có cuộc họp khác trong khoảng thời gian này"
        };
        return Err(MeetingError::Conflict {
            message: message.into(),
            context: Some(other.uid.clone().into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, hour, minute, 0).unwrap()
    }

    fn meeting(uid: &str, group: &str, hour: u32, minutes: i64) -> MeetingRecord {
        MeetingRecord {
            uid: uid.into(),
            group_id: group.into(),
            mentor_id: "gv".into(),
            semester: "SU25".into(),
            start_time: timeline::format(at(hour, 0)),
            end_time: timeline::format(at(hour, 0) + chrono::Duration::minutes(minutes)),
            duration_minutes: minutes,
            location: None,
            agenda: None,
            notes: None,
            created_by: "gv".into(),
            created_at: String::new(),
            updated_at: String::new(),
            is_deleted: false,
            deleted_at: None,
        }
    }

    #[test]
    fn duration_defaults_and_bounds() {
        assert_eq!(duration(None).unwrap(), 60);
        assert_eq!(duration(Some(15)).unwrap(), 15);
        assert_eq!(duration(Some(240)).unwrap(), 240);
        assert!(duration(Some(14)).is_err());
        assert!(duration(Some(241)).is_err());
    }

    #[test]
    fn start_must_be_ahead() {
        assert!(ensure_future(at(9, 0), at(8, 0)).is_ok());
        assert!(ensure_future(at(8, 0), at(8, 0)).is_err());
    }

    #[test]
    fn clashes_name_the_busy_side() {
        let others = vec![meeting("m1", "g1", 9, 60), meeting("m2", "g2", 11, 30)];

        let free = Window::from_duration(at(10, 0), 60).unwrap();
        assert!(ensure_no_clash(&free, "g1", &others).is_ok());

        let group_clash = Window::from_duration(at(9, 30), 30).unwrap();
        let Err(MeetingError::Conflict { message, .. }) = ensure_no_clash(&group_clash, "g1", &others)
        else {
            panic!("expected a conflict");
        };
        assert!(message.starts_with("Nhóm"));

        let mentor_clash = Window::from_duration(at(11, 15), 30).unwrap();
        let Err(MeetingError::Conflict { message, .. }) =
            ensure_no_clash(&mentor_clash, "g1", &others)
        else {
            panic!("expected a conflict");
        };
        assert!(message.starts_with("Giảng viên"));
    }
}

use crate::error::TopicError;
use thesis_kernel::prelude::TopicStatus;

pub(crate) fn normalize_title(raw: &str, field: &'static str) -> Result<String, TopicError> {
    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        return Err(TopicError::Validation {
            message: format!("{field} không được để trống").into(),
            context: None,
        });
    }
    Ok(title)
}

/// Comparison key: case and spacing do not make two titles different.
pub(crate) fn title_key(title: &str) -> String {
    title.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join(" ")
}

pub(crate) fn topic_code(semester: &str, sequence: i64) -> String {
    format!("{semester}-T{sequence:03}")
}

pub(crate) fn ensure_distinct_mentors(main: &str, sub: Option<&str>) -> Result<(), TopicError> {
    if sub == Some(main) {
        return Err(TopicError::Validation {
            message: "Giảng viên hướng dẫn phụ phải khác giảng viên hướng dẫn chính".into(),
            context: None,
        });
    }
    Ok(())
}

pub(crate) fn ensure_capacity(max_students: u32, min: i64, max: i64) -> Result<(), TopicError> {
    let value = i64::from(max_students);
    if value < min || value > max {
        return Err(TopicError::Validation {
            message: format!("Số sinh viên tối đa phải nằm trong khoảng {min} đến {max}").into(),
            context: None,
        });
    }
    Ok(())
}

/// Validates a review outcome and returns the trimmed note.
pub(crate) fn review_note(
    status: TopicStatus,
    note: Option<&str>,
) -> Result<Option<String>, TopicError> {
    if !status.is_review_outcome() {
        return Err(TopicError::Validation {
            message: "Trạng thái duyệt không hợp lệ".into(),
            context: Some(status.to_string().into()),
        });
    }
    let note = note.map(str::trim).filter(|n| !n.is_empty()).map(str::to_owned);
    if status.requires_note() && note.is_none() {
        return Err(TopicError::Validation {
            message: "Vui lòng nhập lý do khi từ chối hoặc yêu cầu chỉnh sửa đề tài".into(),
            context: None,
        });
    }
    Ok(note)
}

pub(crate) fn ensure_editable(status: TopicStatus) -> Result<(), TopicError> {
    if status == TopicStatus::Approved {
        return Err(TopicError::Validation {
            message: "Không thể chỉnh sửa đề tài đã được duyệt".into(),
            context: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_collapse_whitespace() {
        assert_eq!(normalize_title("  Hệ thống   quản lý ", "Tên").unwrap(), "Hệ thống quản lý");
        assert!(normalize_title("   ", "Tên").is_err());
        assert_eq!(title_key("Hệ Thống  QUẢN lý"), title_key("hệ thống quản lý"));
    }

    #[test]
    fn codes_are_zero_padded() {
        assert_eq!(topic_code("SU25", 7), "SU25-T007");
        assert_eq!(topic_code("SU25", 1234), "SU25-T1234");
    }

    #[test]
    fn mentors_and_capacity() {
        assert!(ensure_distinct_mentors("a", Some("a")).is_err());
        assert!(ensure_distinct_mentors("a", Some("b")).is_ok());
        assert!(ensure_distinct_mentors("a", None).is_ok());
        assert!(ensure_capacity(1, 2, 5).is_err());
        assert!(ensure_capacity(6, 2, 5).is_err());
        assert!(ensure_capacity(4, 2, 5).is_ok());
    }

    #[test]
    fn review_outcomes() {
        assert!(review_note(TopicStatus::Pending, Some("x")).is_err());
        assert_eq!(review_note(TopicStatus::Approved, None).unwrap(), None);
        assert!(review_note(TopicStatus::Rejected, Some("   ")).is_err());
        assert_eq!(
            review_note(TopicStatus::NeedsRevision, Some(" Bổ sung mục tiêu ")).unwrap().as_deref(),
            Some("Bổ sung mục tiêu")
        );
    }
}

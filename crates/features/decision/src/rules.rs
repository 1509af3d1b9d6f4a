use crate::error::DecisionError;
use chrono::{DateTime, Utc};

pub(crate) fn required(raw: &str, field: &'static str) -> Result<String, DecisionError> {
    let value = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if value.is_empty() {
        return Err(DecisionError::Validation {
            message: format!("{field} không được để trống").into(),
            context: None,
        });
    }
    Ok(value)
}

pub(crate) fn number_key(number: &str) -> String {
    number.to_lowercase()
}

pub(crate) fn normalize_semester(raw: &str) -> Result<String, DecisionError> {
    required(raw, "Học kỳ").map(|s| s.to_uppercase())
}

pub(crate) fn ensure_signed(signed: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), DecisionError> {
    if signed > now {
        return Err(DecisionError::Validation {
            message: "Ngày ký không được ở tương lai".into(),
            context: None,
        });
    }
    Ok(())
}

/// Attachments are links to the document store.
pub(crate) fn file_url(raw: Option<String>) -> Result<Option<String>, DecisionError> {
    let Some(url) = raw.map(|u| u.trim().to_owned()).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(DecisionError::Validation {
            message: "Đường dẫn tệp đính kèm không hợp lệ".into(),
            context: Some(url.into()),
        });
    }
    Ok(Some(url))
}

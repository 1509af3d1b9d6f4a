use crate::error::SettingsError;
use thesis_kernel::prelude::SettingKey;

/// Keys are upper snake case: `MAX_GROUP_MEMBERS`, `DEFENSE_ROOM`.
pub(crate) fn validate_key(key: &str) -> Result<(), SettingsError> {
    let mut chars = key.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && key.len() <= 64;
    if valid {
        Ok(())
    } else {
        Err(SettingsError::Validation {
            message: "Khóa cấu hình không hợp lệ".into(),
            context: Some(key.to_owned().into()),
        })
    }
}

/// Quotas are positive integers.
pub(crate) fn parse_quota(key: SettingKey, raw: &str) -> Result<i64, SettingsError> {
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(SettingsError::Validation {
            message: format!("Giá trị của {key} phải là số nguyên dương").into(),
            context: Some(raw.to_owned().into()),
        }),
    }
}

/// `MIN_*` may not exceed the matching `MAX_*`.
pub(crate) fn ensure_bounds(
    key: SettingKey,
    value: i64,
    current: impl Fn(SettingKey) -> i64,
) -> Result<(), SettingsError> {
    let Some((min_key, max_key)) = key.bounds_pair() else {
        return Ok(());
    };
    let (min, max) =
        if key == min_key { (value, current(max_key)) } else { (current(min_key), value) };
    if min > max {
        return Err(SettingsError::Validation {
            message: format!("{min_key} ({min}) không được lớn hơn {max_key} ({max})").into(),
            context: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_must_be_upper_snake_case() {
        assert!(validate_key("MAX_GROUP_MEMBERS").is_ok());
        assert!(validate_key("ROOM_2").is_ok());
        for bad in ["", "max", "_X", "A-B", "2X"] {
            assert!(validate_key(bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn quotas_are_positive_integers() {
        assert_eq!(parse_quota(SettingKey::MaxGroupMembers, " 6 ").unwrap(), 6);
        assert!(parse_quota(SettingKey::MaxGroupMembers, "0").is_err());
        assert!(parse_quota(SettingKey::MaxGroupMembers, "-1").is_err());
        assert!(parse_quota(SettingKey::MaxGroupMembers, "five").is_err());
    }

    #[test]
    fn min_cannot_pass_max() {
        let defaults = SettingKey::default_value;
        assert!(ensure_bounds(SettingKey::MinGroupMembers, 5, defaults).is_ok());
        assert!(ensure_bounds(SettingKey::MinGroupMembers, 6, defaults).is_err());
        assert!(ensure_bounds(SettingKey::MaxCouncilMembers, 2, defaults).is_err());
        assert!(ensure_bounds(SettingKey::MaxTopicsPerLecturer, 1, defaults).is_ok());
    }
}

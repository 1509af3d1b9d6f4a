//! Input normalization for user accounts.

use crate::error::IdentityError;
use thesis_kernel::prelude::Role;

pub(crate) fn normalize_email(raw: &str) -> Result<String, IdentityError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(IdentityError::Validation {
            message: "Email không được để trống".into(),
            context: None,
        });
    }
    if !is_well_formed_email(&email) {
        return Err(IdentityError::Validation {
            message: "Email không hợp lệ".into(),
            context: Some(email.into()),
        });
    }
    Ok(email)
}

pub(crate) fn normalize_name(raw: &str) -> Result<String, IdentityError> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(IdentityError::Validation {
            message: "Họ tên không được để trống".into(),
            context: None,
        });
    }
    Ok(name)
}

/// One `@`, a non-empty local part, and a dotted domain without blanks.
fn is_well_formed_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

/// Vietnamese label used in messages.
#[must_use]
pub const fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "quản trị viên",
        Role::Manager => "quản lý",
        Role::Lecturer => "giảng viên",
        Role::Student => "sinh viên",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  An.Nguyen@Uni.EDU.vn ").unwrap(), "an.nguyen@uni.edu.vn");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in ["", "   ", "no-at-sign", "@uni.vn", "a@b", "a@@b.vn", "a b@uni.vn", "a@uni..vn"] {
            assert!(normalize_email(raw).is_err(), "{raw} accepted");
        }
    }

    #[test]
    fn names_collapse_whitespace() {
        assert_eq!(normalize_name("  Nguyễn   Văn  An ").unwrap(), "Nguyễn Văn An");
        assert!(normalize_name(" \t ").is_err());
    }
}

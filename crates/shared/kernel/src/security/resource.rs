use std::borrow::Cow;

#[thesis_derive::thesis_error]
pub enum ResourceGuardError {
    #[error("Resource validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Validation of identifiers received from clients.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Validates an id against `expected_table` and returns the bare key.
    ///
    /// Accepts `table:key` or just `key`. A prefix naming another table is
    /// rejected (no `system_config:x` passed to the topic endpoints), and so
    /// is any key outside `[A-Za-z0-9_-]`, which keeps keys safe to bind.
    ///
    /// # Errors
    /// [`ResourceGuardError::Validation`] for a table mismatch or a malformed key.
    pub fn verify<I, T>(id: I, expected_table: T) -> Result<String, ResourceGuardError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let id_ref = id.as_ref().trim();
        let table_ref = expected_table.as_ref();

        let key = match id_ref.split_once(':') {
            Some((table, key)) if table == table_ref => key,
            Some((table, _)) => {
                return Err(ResourceGuardError::Validation {
                    message: format!("Expected '{table_ref}', got '{table}'").into(),
                    context: Some("ID table mismatch".into()),
                });
            },
            None => id_ref,
        };

        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ResourceGuardError::Validation {
                message: format!("Malformed key '{key}'").into(),
                context: Some(table_ref.to_owned().into()),
            });
        }

        Ok(key.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_prefixed_and_bare_keys() {
        assert_eq!(ResourceGuard::verify("topic:123", "topic").unwrap(), "123");
        assert_eq!(ResourceGuard::verify("Ab3_x-9", "topic").unwrap(), "Ab3_x-9");
    }

    #[test]
    fn rejects_foreign_tables_and_bad_keys() {
        assert!(ResourceGuard::verify("system_config:x", "topic").is_err());
        assert!(ResourceGuard::verify("", "topic").is_err());
        assert!(ResourceGuard::verify("topic:", "topic").is_err());
        assert!(ResourceGuard::verify("a b", "topic").is_err());
        assert!(ResourceGuard::verify("x'; DELETE topic", "topic").is_err());
    }
}

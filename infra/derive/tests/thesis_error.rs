use std::borrow::Cow;
use thesis_derive::thesis_error;

#[thesis_error]
pub enum SyncError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_roster() -> Result<(), std::io::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::NotFound, "roster.csv"))
}

#[test]
fn context_is_attached_to_foreign_errors() {
    let err = read_roster().context("Loading roster").unwrap_err();
    assert!(matches!(err, SyncError::Io { .. }));
    assert_eq!(err.to_string(), "IO error (Loading roster): roster.csv");
}

#[test]
fn context_is_attached_to_own_errors() {
    let result: Result<(), SyncError> =
        Err(SyncError::Conflict { message: "duplicate".into(), context: None });
    let err = result.context("Group G-001").unwrap_err();
    assert_eq!(err.to_string(), "Conflict (Group G-001): duplicate");
}

#[test]
fn question_mark_converts_sources() {
    fn load() -> Result<(), SyncError> {
        read_roster()?;
        Ok(())
    }
    let err = load().unwrap_err();
    assert_eq!(err.to_string(), "IO error: roster.csv");
}

#[test]
fn strings_become_internal_errors() {
    let err = SyncError::from(String::from("unexpected state"));
    assert!(matches!(err, SyncError::Internal { .. }));
    assert_eq!(SyncError::from("boom").to_string(), "Internal error: boom");
}

#[test]
fn ui_forms_compile() {
    let cases = trybuild::TestCases::new();
    cases.pass("tests/ui/thesis_error_pass.rs");
}

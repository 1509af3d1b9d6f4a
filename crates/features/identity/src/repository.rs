use crate::model::UserRecord;
use surrealdb::Response;
use thesis_database::{Database, DatabaseError, DatabaseErrorExt};
use thesis_kernel::prelude::Role;

const INSERT: &str = "CREATE user CONTENT $record";
const FIND: &str = "SELECT * OMIT id FROM user WHERE uid = $uid";
const FIND_ACTIVE_BY_EMAIL: &str =
    "SELECT * OMIT id FROM user WHERE email = $email AND is_active = true";
const FIND_MANY: &str = "SELECT * OMIT id FROM user WHERE uid INSIDE $uids";
const LIST: &str = "SELECT * OMIT id FROM user
    WHERE ($role = NONE OR role = $role) AND ($include_inactive OR is_active = true)
    ORDER BY full_name ASC";
const UPDATE: &str = "UPDATE user CONTENT $record WHERE uid = $uid";
const COUNT_ACTIVE_ADMINS: &str =
    "SELECT count() AS total FROM user WHERE role = 'ADMIN' AND is_active = true GROUP ALL";

#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn insert(&self, record: &UserRecord) -> Result<(), DatabaseError> {
        self.db
            .query(INSERT)
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Creating user")?;
        Ok(())
    }

    pub async fn find(&self, uid: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let rows: Vec<UserRecord> = self
            .db
            .query(FIND)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Loading user")?
            .take(0)
            .context("Decoding user")?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, DatabaseError> {
        let rows: Vec<UserRecord> = self
            .db
            .query(FIND_ACTIVE_BY_EMAIL)
            .bind(("email", email.to_owned()))
            .await
            .context("Looking up user by email")?
            .take(0)
            .context("Decoding user")?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_many(&self, uids: Vec<String>) -> Result<Vec<UserRecord>, DatabaseError> {
        self.db
            .query(FIND_MANY)
            .bind(("uids", uids))
            .await
            .context("Loading users")?
            .take(0)
            .context("Decoding users")
    }

    pub async fn list(
        &self,
        role: Option<Role>,
        include_inactive: bool,
    ) -> Result<Vec<UserRecord>, DatabaseError> {
        self.db
            .query(LIST)
            .bind(("role", role))
            .bind(("include_inactive", include_inactive))
            .await
            .context("Listing users")?
            .take(0)
            .context("Decoding users")
    }

    pub async fn update(&self, record: &UserRecord) -> Result<(), DatabaseError> {
        self.db
            .query(UPDATE)
            .bind(("uid", record.uid.clone()))
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Updating user")?;
        Ok(())
    }

    pub async fn count_active_admins(&self) -> Result<i64, DatabaseError> {
        let total: Option<i64> = self
            .db
            .query(COUNT_ACTIVE_ADMINS)
            .await
            .context("Counting administrators")?
            .take((0, "total"))
            .context("Decoding administrator count")?;
        Ok(total.unwrap_or(0))
    }
}

use crate::auth::CurrentUser;
use crate::error::IdentityError;
use crate::model::{CreateUserRequest, UpdateUserRequest, UserFilter, UserRecord};
use crate::repository::UserRepository;
use crate::rules::{normalize_email, normalize_name, role_label};
use thesis_kernel::domain::config::BootstrapAdmin;
use thesis_kernel::prelude::{Role, safe_nanoid, timeline};
use tracing::{info, instrument};

const USER_NOT_FOUND: &str = "Không tìm thấy người dùng";

/// User accounts and the directory other slices query for role checks.
#[derive(Debug, Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub const fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, request), fields(role = %request.role))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserRecord, IdentityError> {
        let email = normalize_email(&request.email)?;
        let full_name = normalize_name(&request.full_name)?;
        self.ensure_email_free(&email, None).await?;

        let now = timeline::format(timeline::now());
        let record = UserRecord {
            uid: safe_nanoid!(),
            email,
            full_name,
            role: request.role,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        };
        self.repo.insert(&record).await?;

        info!(user = %record.uid, "User created");
        Ok(record)
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<UserRecord>, IdentityError> {
        Ok(self.repo.list(filter.role, filter.include_inactive.unwrap_or(false)).await?)
    }

    /// Any account, active or not.
    pub async fn find(&self, id: &str) -> Result<Option<UserRecord>, IdentityError> {
        Ok(self.repo.find(id).await?)
    }

    /// Active account registered under `email`, compared case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, IdentityError> {
        let email = normalize_email(email)?;
        Ok(self.repo.find_active_by_email(&email).await?)
    }

    pub async fn get(&self, id: &str) -> Result<UserRecord, IdentityError> {
        self.find(id).await?.ok_or_else(|| IdentityError::NotFound {
            message: USER_NOT_FOUND.into(),
            context: Some(id.to_owned().into()),
        })
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserRecord, IdentityError> {
        let mut record = self.get(id).await?;

        if let Some(email) = request.email.as_deref() {
            let email = normalize_email(email)?;
            if email != record.email {
                self.ensure_email_free(&email, Some(&record.uid)).await?;
                record.email = email;
            }
        }
        if let Some(name) = request.full_name.as_deref() {
            record.full_name = normalize_name(name)?;
        }
        if let Some(role) = request.role {
            if actor.id == record.uid && role != record.role {
                return Err(IdentityError::Validation {
                    message: "Không thể thay đổi vai trò của chính bạn".into(),
                    context: None,
                });
            }
            record.role = role;
        }
        if let Some(active) = request.is_active {
            if !active {
                ensure_not_self(actor, &record)?;
            } else if !record.is_active {
                self.ensure_email_free(&record.email, Some(&record.uid)).await?;
            }
            record.is_active = active;
        }

        record.updated_at = timeline::format(timeline::now());
        self.repo.update(&record).await?;

        info!(user = %record.uid, "User updated");
        Ok(record)
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn deactivate(&self, actor: &CurrentUser, id: &str) -> Result<(), IdentityError> {
        let mut record = self.get(id).await?;
        ensure_not_self(actor, &record)?;
        if !record.is_active {
            return Ok(());
        }

        record.is_active = false;
        record.updated_at = timeline::format(timeline::now());
        self.repo.update(&record).await?;

        info!(user = %record.uid, "User deactivated");
        Ok(())
    }

    /// The active account `id` holding `role`.
    ///
    /// # Errors
    /// `NotFound` when the account is missing or inactive, `Validation` when
    /// it holds another role.
    pub async fn require_role(&self, id: &str, role: Role) -> Result<UserRecord, IdentityError> {
        let record = self.repo.find(id).await?.filter(|user| user.is_active).ok_or_else(|| {
            IdentityError::NotFound {
                message: format!("Không tìm thấy {} đang hoạt động", role_label(role)).into(),
                context: Some(id.to_owned().into()),
            }
        })?;

        if record.role != role {
            return Err(IdentityError::Validation {
                message: format!("Người dùng {} không phải là {}", record.full_name, role_label(role))
                    .into(),
                context: Some(id.to_owned().into()),
            });
        }
        Ok(record)
    }

    /// Active accounts among `ids`; unknown ids are skipped.
    pub async fn find_active(&self, ids: Vec<String>) -> Result<Vec<UserRecord>, IdentityError> {
        let users = self.repo.find_many(ids).await?;
        Ok(users.into_iter().filter(|user| user.is_active).collect())
    }

    /// Creates the configured administrator unless an active one exists.
    pub async fn ensure_bootstrap_admin(
        &self,
        admin: &BootstrapAdmin,
    ) -> Result<Option<UserRecord>, IdentityError> {
        if self.repo.count_active_admins().await? > 0 {
            return Ok(None);
        }

        let record = self
            .create(CreateUserRequest {
                email: admin.email.clone(),
                full_name: admin.full_name.clone(),
                role: Role::Admin,
            })
            .await?;
        info!(user = %record.uid, email = %record.email, "Bootstrap administrator created");
        Ok(Some(record))
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<&str>) -> Result<(), IdentityError> {
        match self.repo.find_active_by_email(email).await? {
            Some(existing) if Some(existing.uid.as_str()) != owner => Err(IdentityError::Conflict {
                message: "Email đã được sử dụng".into(),
                context: Some(email.to_owned().into()),
            }),
            _ => Ok(()),
        }
    }
}

fn ensure_not_self(actor: &CurrentUser, record: &UserRecord) -> Result<(), IdentityError> {
    if actor.id == record.uid {
        return Err(IdentityError::Validation {
            message: "Không thể vô hiệu hóa chính tài khoản của bạn".into(),
            context: None,
        });
    }
    Ok(())
}

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Account role carried in the bearer token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Lecturer,
    Student,
}

impl Role {
    #[must_use]
    pub const fn as_set(self) -> RoleSet {
        match self {
            Self::Admin => RoleSet::ADMIN,
            Self::Manager => RoleSet::MANAGER,
            Self::Lecturer => RoleSet::LECTURER,
            Self::Student => RoleSet::STUDENT,
        }
    }

    /// Administrators and managers run the thesis process.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        RoleSet::STAFF.contains(self.as_set())
    }
}

bitflags! {
    /// Roles allowed to perform an operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct RoleSet: u8 {
        const ADMIN = 1 << 0;
        const MANAGER = 1 << 1;
        const LECTURER = 1 << 2;
        const STUDENT = 1 << 3;

        const STAFF = Self::ADMIN.bits() | Self::MANAGER.bits();
        const ALL = Self::STAFF.bits() | Self::LECTURER.bits() | Self::STUDENT.bits();
    }
}

impl RoleSet {
    #[must_use]
    pub const fn allows(self, role: Role) -> bool {
        self.contains(role.as_set())
    }
}

impl From<Role> for RoleSet {
    fn from(role: Role) -> Self {
        role.as_set()
    }
}

impl Serialize for RoleSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

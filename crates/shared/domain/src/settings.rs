//! Known system configuration keys and their defaults.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Quota stored in the `system_config` table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingKey {
    MaxGroupMembers,
    MinGroupMembers,
    MaxGroupsPerMentor,
    MaxCouncilMembers,
    MinCouncilMembers,
    MaxCouncilsPerLecturer,
    MaxTopicsPerLecturer,
}

impl SettingKey {
    #[must_use]
    pub const fn default_value(self) -> i64 {
        match self {
            Self::MaxGroupMembers
            | Self::MaxGroupsPerMentor
            | Self::MaxCouncilMembers
            | Self::MaxTopicsPerLecturer => 5,
            Self::MinGroupMembers => 2,
            Self::MinCouncilMembers | Self::MaxCouncilsPerLecturer => 3,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MaxGroupMembers => "Số thành viên tối đa của một nhóm",
            Self::MinGroupMembers => "Số thành viên tối thiểu của một nhóm",
            Self::MaxGroupsPerMentor => "Số nhóm tối đa một giảng viên hướng dẫn trong học kỳ",
            Self::MaxCouncilMembers => "Số thành viên tối đa của một hội đồng",
            Self::MinCouncilMembers => "Số thành viên tối thiểu của một hội đồng",
            Self::MaxCouncilsPerLecturer => "Số hội đồng tối đa một giảng viên tham gia trong học kỳ",
            Self::MaxTopicsPerLecturer => "Số đề tài tối đa một giảng viên hướng dẫn trong học kỳ",
        }
    }

    /// The `(min, max)` pair this key belongs to, if any.
    #[must_use]
    pub const fn bounds_pair(self) -> Option<(Self, Self)> {
        match self {
            Self::MaxGroupMembers | Self::MinGroupMembers => {
                Some((Self::MinGroupMembers, Self::MaxGroupMembers))
            },
            Self::MaxCouncilMembers | Self::MinCouncilMembers => {
                Some((Self::MinCouncilMembers, Self::MaxCouncilMembers))
            },
            _ => None,
        }
    }
}

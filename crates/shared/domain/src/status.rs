//! Workflow status and classification enums.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

macro_rules! domain_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
            AsRefStr,
        )]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }
    };
}

domain_enum! {
    /// Derived from a `[start, end]` window and the current time.
    TimelineStatus { Upcoming, Active, Complete }
}

domain_enum! {
    TopicStatus { Pending, Approved, Rejected, NeedsRevision }
}

domain_enum! {
    CouncilKind { Review, Defense }
}

domain_enum! {
    CouncilRole { Chairman, Secretary, Member }
}

domain_enum! {
    MentorRole { Main, Sub }
}

domain_enum! {
    DecisionKind { TopicAssignment, CouncilEstablishment, DefenseResult }
}

impl TopicStatus {
    /// Outcomes a reviewer may set.
    #[must_use]
    pub const fn is_review_outcome(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Rejections and revision requests must explain themselves.
    #[must_use]
    pub const fn requires_note(self) -> bool {
        matches!(self, Self::Rejected | Self::NeedsRevision)
    }
}

impl CouncilRole {
    /// Chairman and secretary seats are single.
    #[must_use]
    pub const fn is_unique_seat(self) -> bool {
        matches!(self, Self::Chairman | Self::Secretary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn wire_names() {
        assert_eq!(TopicStatus::NeedsRevision.to_string(), "NEEDS_REVISION");
        assert_eq!(DecisionKind::from_str("DEFENSE_RESULT").unwrap(), DecisionKind::DefenseResult);
        assert_eq!(
            serde_json::to_string(&TimelineStatus::Upcoming).unwrap(),
            "\"UPCOMING\""
        );
    }

    #[test]
    fn review_rules() {
        assert!(!TopicStatus::Pending.is_review_outcome());
        assert!(TopicStatus::Approved.is_review_outcome());
        assert!(!TopicStatus::Approved.requires_note());
        assert!(TopicStatus::Rejected.requires_note());
        assert!(CouncilRole::Secretary.is_unique_seat());
        assert!(!CouncilRole::Member.is_unique_seat());
    }
}

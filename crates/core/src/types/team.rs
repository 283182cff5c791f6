//! Team members shown on the About page (`team_members` table).

use serde::{Deserialize, Serialize};

use super::{Draft, TEAM_MEMBER_PLACEHOLDER_IMAGE, TeamMemberId, image_or_placeholder};

/// A team member as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub name: String,
    pub role: String,
    pub bio: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TeamMember {
    /// Portrait to render for this member.
    #[must_use]
    pub fn image_src(&self) -> &str {
        image_or_placeholder(self.image_url.as_deref(), TEAM_MEMBER_PLACEHOLDER_IMAGE)
    }
}

/// Field values written on insert or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TeamMemberDraft {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image_url: Option<String>,
}

impl From<&TeamMember> for TeamMemberDraft {
    fn from(member: &TeamMember) -> Self {
        Self {
            name: member.name.clone(),
            role: member.role.clone(),
            bio: member.bio.clone(),
            image_url: member.image_url.clone(),
        }
    }
}

impl Draft for TeamMemberDraft {
    fn first_blank_field(&self) -> Option<&'static str> {
        [("name", &self.name), ("role", &self.role), ("bio", &self.bio)]
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }
}

//! Team members.

use frontier_core::{TeamMember, TeamMemberDraft, TeamMemberId};

use super::{Db, Entity, RepositoryError};
use crate::remote::{Select, Table};

impl Entity for TeamMember {
    type Id = TeamMemberId;
    type Draft = TeamMemberDraft;

    const TABLE: Table = Table::TeamMembers;

    fn id(&self) -> TeamMemberId {
        self.id
    }
}

/// Repository for the `team_members` table.
pub struct TeamRepository<'a> {
    db: Db<'a>,
}

impl<'a> TeamRepository<'a> {
    #[must_use]
    pub const fn new(db: Db<'a>) -> Self {
        Self { db }
    }

    /// All team members, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> Result<Vec<TeamMember>, RepositoryError> {
        self.db
            .fetch_all(&Select::from_table(Table::TeamMembers).order_asc("name"))
            .await
    }
}

//! Contact messages.

use frontier_core::{ContactMessage, ContactMessageId, NewContactMessage};
use serde_json::{Map, Value};

use super::{Db, Entity, RepositoryError};
use crate::remote::{Filter, Select, Table};

impl Entity for ContactMessage {
    type Id = ContactMessageId;
    type Draft = NewContactMessage;

    const TABLE: Table = Table::ContactMessages;

    fn id(&self) -> ContactMessageId {
        self.id
    }
}

/// Repository for the `contact_messages` table.
pub struct MessageRepository<'a> {
    db: Db<'a>,
}

impl<'a> MessageRepository<'a> {
    #[must_use]
    pub const fn new(db: Db<'a>) -> Self {
        Self { db }
    }

    /// All messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        self.db
            .fetch_all(&Select::from_table(Table::ContactMessages).order_desc("created_at"))
            .await
    }

    /// Store a message from the contact form.
    ///
    /// The stored row is not read back; visitors may write messages but not
    /// read them.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn submit(&self, message: &NewContactMessage) -> Result<(), RepositoryError> {
        self.db
            .insert_without_return(Table::ContactMessages, message)
            .await
    }

    /// Set `read = true`. Repeating the call on a read message is harmless.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no message has `id`.
    pub async fn mark_read(&self, id: ContactMessageId) -> Result<ContactMessage, RepositoryError> {
        let mut patch = Map::new();
        patch.insert("read".to_string(), Value::Bool(true));

        self.db
            .update_where(Table::ContactMessages, &[Filter::eq("id", id)], patch)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("contact message {id}")))
    }

    /// Delete one message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no message has `id`.
    pub async fn delete(&self, id: ContactMessageId) -> Result<(), RepositoryError> {
        self.db.delete::<ContactMessage>(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use frontier_core::Email;

    use super::*;
    use crate::remote::{MemoryDataService, Mutation};

    #[tokio::test]
    async fn test_mark_read_twice_is_stable() {
        let service = MemoryDataService::new();
        let repo = MessageRepository::new(Db::authenticated(&service, "token"));
        repo.submit(&NewContactMessage::new(
            "Pat".to_string(),
            Email::parse("pat@example.com").unwrap(),
            None,
            "Do you handle clean-outs?".to_string(),
        ))
        .await
        .unwrap();
        let message = repo.list().await.unwrap().remove(0);
        assert!(!message.read);

        let first = repo.mark_read(message.id).await.unwrap();
        let second = repo.mark_read(message.id).await.unwrap();
        assert!(first.read);
        assert_eq!(first, second);

        let updates: Vec<Mutation> = service
            .mutations()
            .into_iter()
            .filter(|m| matches!(m, Mutation::Update { .. }))
            .collect();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates.first(), updates.last());
    }

    #[tokio::test]
    async fn test_delete_unknown_message_is_not_found() {
        let service = MemoryDataService::new();
        let repo = MessageRepository::new(Db::authenticated(&service, "token"));
        let err = repo.delete(ContactMessageId::random()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}

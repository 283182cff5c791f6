//! Create/edit form shared by the sale and team member panels.
//!
//! The form is in create mode when opened without an entity and in edit
//! mode when opened on one. Submitting validates required fields, then
//! inserts (create) or updates by ID (edit).

use frontier_core::{Draft, Sale, SaleStatus, TeamMember};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_sessions::Session;

use crate::db::{Db, Entity, RepositoryError};
use crate::middleware::session_keys;

/// Per-entity wording and routes for [`EntityForm`].
pub trait FormEntity: Entity<Draft: DeserializeOwned> {
    /// Collection route; edits post to `{ROUTE}/{id}`.
    const ROUTE: &'static str;
    /// Dashboard query key that keeps the form open.
    const QUERY_KEY: &'static str;
    const CREATE_HEADING: &'static str;
    const EDIT_HEADING: &'static str;
    const CREATE_LABEL: &'static str;
    const UPDATE_LABEL: &'static str;
    const CREATED_MESSAGE: &'static str;
    const UPDATED_MESSAGE: &'static str;
    const SAVE_ERROR: &'static str;
    const DELETED_MESSAGE: &'static str;
    const DELETE_ERROR: &'static str;

    /// Field values for a blank create form.
    fn blank_draft() -> Self::Draft;

    /// Field values pre-filled from an existing row.
    fn draft_of(&self) -> Self::Draft;
}

impl FormEntity for Sale {
    const ROUTE: &'static str = "/admin/sales";
    const QUERY_KEY: &'static str = "sale";
    const CREATE_HEADING: &'static str = "Add New Sale";
    const EDIT_HEADING: &'static str = "Edit Sale";
    const CREATE_LABEL: &'static str = "Create Sale";
    const UPDATE_LABEL: &'static str = "Update Sale";
    const CREATED_MESSAGE: &'static str = "Sale created successfully";
    const UPDATED_MESSAGE: &'static str = "Sale updated successfully";
    const SAVE_ERROR: &'static str = "Error saving sale";
    const DELETED_MESSAGE: &'static str = "Sale deleted successfully";
    const DELETE_ERROR: &'static str = "Error deleting sale";

    fn blank_draft() -> Self::Draft {
        Self::Draft::default()
    }

    fn draft_of(&self) -> Self::Draft {
        self.into()
    }
}

impl FormEntity for TeamMember {
    const ROUTE: &'static str = "/admin/team";
    const QUERY_KEY: &'static str = "member";
    const CREATE_HEADING: &'static str = "Add New Team Member";
    const EDIT_HEADING: &'static str = "Edit Team Member";
    const CREATE_LABEL: &'static str = "Add Team Member";
    const UPDATE_LABEL: &'static str = "Update Team Member";
    const CREATED_MESSAGE: &'static str = "Team member added successfully";
    const UPDATED_MESSAGE: &'static str = "Team member updated successfully";
    const SAVE_ERROR: &'static str = "Error saving team member";
    const DELETED_MESSAGE: &'static str = "Team member deleted successfully";
    const DELETE_ERROR: &'static str = "Error deleting team member";

    fn blank_draft() -> Self::Draft {
        Self::Draft::default()
    }

    fn draft_of(&self) -> Self::Draft {
        self.into()
    }
}

/// Which write a submission performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

/// Why a submission was not saved.
#[derive(Debug, Error)]
pub enum FormError {
    /// A required field was blank; nothing was written.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The remote write failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Values of a form whose save failed, held in the session until the
/// dashboard is next rendered.
#[derive(Debug, Serialize, Deserialize)]
pub struct UnsavedForm<D> {
    /// `new`, or the ID of the row being edited.
    pub target: String,
    pub values: D,
}

/// Form state for one entity type.
pub struct EntityForm<E: FormEntity> {
    pub mode: FormMode<E::Id>,
    pub values: E::Draft,
}

impl<E: FormEntity> EntityForm<E> {
    /// Open the form: edit mode pre-filled from `existing`, else create mode
    /// with defaults.
    #[must_use]
    pub fn new(existing: Option<&E>) -> Self {
        match existing {
            Some(entity) => Self {
                mode: FormMode::Edit(entity.id()),
                values: entity.draft_of(),
            },
            None => Self {
                mode: FormMode::Create,
                values: E::blank_draft(),
            },
        }
    }

    /// A submission carrying `values` for `mode`.
    #[must_use]
    pub const fn submitted(mode: FormMode<E::Id>, values: E::Draft) -> Self {
        Self { mode, values }
    }

    #[must_use]
    pub const fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// Where the form posts.
    #[must_use]
    pub fn action(&self) -> String {
        match self.mode {
            FormMode::Create => E::ROUTE.to_string(),
            FormMode::Edit(id) => format!("{}/{id}", E::ROUTE),
        }
    }

    /// Dashboard URL that reopens this form.
    #[must_use]
    pub fn reopen_href(&self) -> String {
        Self::reopen_href_for(self.mode)
    }

    /// Dashboard URL that reopens a form in `mode`.
    #[must_use]
    pub fn reopen_href_for(mode: FormMode<E::Id>) -> String {
        format!("/admin?{}={}", E::QUERY_KEY, Self::target(mode))
    }

    /// Query value naming the form: `new` or the edited row's ID.
    fn target(mode: FormMode<E::Id>) -> String {
        match mode {
            FormMode::Create => "new".to_string(),
            FormMode::Edit(id) => id.to_string(),
        }
    }

    fn unsaved_key() -> String {
        format!("{}{}", session_keys::UNSAVED_FORM_PREFIX, E::QUERY_KEY)
    }

    /// Hold the submitted values so the reopened form shows them.
    pub async fn keep_unsaved(&self, session: &Session) {
        let unsaved = UnsavedForm {
            target: Self::target(self.mode),
            values: &self.values,
        };
        if let Err(e) = session.insert(&Self::unsaved_key(), unsaved).await {
            tracing::warn!(entity = E::QUERY_KEY, error = %e, "Failed to keep form values");
        }
    }

    /// Remove and return values held by [`keep_unsaved`](Self::keep_unsaved).
    pub async fn take_unsaved(session: &Session) -> Option<UnsavedForm<E::Draft>> {
        session
            .remove::<UnsavedForm<E::Draft>>(&Self::unsaved_key())
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(entity = E::QUERY_KEY, error = %e, "Failed to read form values");
                None
            })
    }

    /// Show held values if they were submitted from this same form.
    pub fn restore(&mut self, unsaved: UnsavedForm<E::Draft>) {
        if unsaved.target == Self::target(self.mode) {
            self.values = unsaved.values;
        }
    }

    #[must_use]
    pub const fn heading(&self) -> &'static str {
        if self.is_edit() {
            E::EDIT_HEADING
        } else {
            E::CREATE_HEADING
        }
    }

    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            E::UPDATE_LABEL
        } else {
            E::CREATE_LABEL
        }
    }

    /// Success notice for this mode.
    #[must_use]
    pub const fn success_message(&self) -> &'static str {
        if self.is_edit() {
            E::UPDATED_MESSAGE
        } else {
            E::CREATED_MESSAGE
        }
    }

    /// Validate and write.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingField` without touching the remote store
    /// when a required field is blank, or the repository error if the write
    /// fails.
    pub async fn submit(&self, db: Db<'_>) -> Result<E, FormError> {
        if let Some(field) = self.values.first_blank_field() {
            return Err(FormError::MissingField(field));
        }

        let saved = match self.mode {
            FormMode::Create => db.create::<E>(&self.values).await?,
            FormMode::Edit(id) => db.update::<E>(id, &self.values).await?,
        };
        Ok(saved)
    }
}

/// One `<option>` in the sale status select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl EntityForm<Sale> {
    /// Status choices with the current value selected.
    #[must_use]
    pub fn status_options(&self) -> Vec<StatusOption> {
        SaleStatus::ALL
            .iter()
            .map(|&status| StatusOption {
                value: status.as_str(),
                label: status.label(),
                selected: status == self.values.status,
            })
            .collect()
    }
}

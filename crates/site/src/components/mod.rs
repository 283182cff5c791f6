//! Reusable admin UI pieces.

pub mod form;

pub use form::{EntityForm, FormEntity, FormError, FormMode, StatusOption};

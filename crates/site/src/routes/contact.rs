//! Contact page and message submission.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
use frontier_core::{Draft, Email, NewContactMessage, non_blank};
use serde::Deserialize;
use tracing::instrument;

use crate::db::MessageRepository;
use crate::filters;
use crate::layout::Shell;
use crate::state::AppState;

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const REQUIRED_FIELDS_MESSAGE: &str = "Name and message are required.";
pub const SUBMIT_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub const THANK_YOU_MESSAGE: &str =
    "Thank you for reaching out! We'll get back to you as soon as possible.";

/// Contact form fields, echoed back when a submission is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub shell: Shell,
    pub form: ContactForm,
    pub notice: Option<&'static str>,
    pub error: Option<&'static str>,
}

/// Display the contact page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    ContactTemplate {
        shell: super::shell(&state, "/contact").await,
        form: ContactForm::default(),
        notice: None,
        error: None,
    }
}

/// Store a contact message with the anonymous key.
///
/// POST /contact
///
/// Re-renders the page with a thank-you notice, or with the error and the
/// submitted values.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    let shell = super::shell(&state, "/contact").await;

    let message = match validate(&form) {
        Ok(message) => message,
        Err(error) => {
            let template = ContactTemplate {
                shell,
                form,
                notice: None,
                error: Some(error),
            };
            return (StatusCode::BAD_REQUEST, template);
        }
    };

    match MessageRepository::new(state.anonymous_db())
        .submit(&message)
        .await
    {
        Ok(()) => {
            tracing::info!("Contact message received");
            let template = ContactTemplate {
                shell,
                form: ContactForm::default(),
                notice: Some(THANK_YOU_MESSAGE),
                error: None,
            };
            (StatusCode::OK, template)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store contact message");
            let template = ContactTemplate {
                shell,
                form,
                notice: None,
                error: Some(SUBMIT_ERROR_MESSAGE),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, template)
        }
    }
}

fn validate(form: &ContactForm) -> Result<NewContactMessage, &'static str> {
    let email = Email::parse(&form.email).map_err(|_| INVALID_EMAIL_MESSAGE)?;

    let message = NewContactMessage::new(
        form.name.trim().to_string(),
        email,
        non_blank(Some(form.phone.clone())),
        form.message.trim().to_string(),
    );

    if message.first_blank_field().is_some() {
        return Err(REQUIRED_FIELDS_MESSAGE);
    }
    Ok(message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, phone: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let message = validate(&form(" Pat ", "Pat@Example.com", "  ", "Do you buy pianos?")).unwrap();
        assert_eq!(message.name, "Pat");
        assert_eq!(message.email.as_str(), "pat@example.com");
        assert!(message.phone.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_email_first() {
        assert_eq!(
            validate(&form("", "not-an-email", "", "")).unwrap_err(),
            INVALID_EMAIL_MESSAGE
        );
    }

    #[test]
    fn test_validate_requires_name_and_message() {
        assert_eq!(
            validate(&form("Pat", "pat@example.com", "910-555-0100", "   ")).unwrap_err(),
            REQUIRED_FIELDS_MESSAGE
        );
    }
}

//! About page with the team roster.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use frontier_core::{TEAM_MEMBER_PLACEHOLDER_IMAGE, TeamMember};
use tracing::instrument;

use crate::db::TeamRepository;
use crate::filters;
use crate::layout::Shell;
use crate::state::AppState;

/// A heading and paragraph in "What Sets Us Apart".
pub struct Strength {
    pub title: &'static str,
    pub body: &'static str,
}

const STRENGTHS: [Strength; 4] = [
    Strength {
        title: "Expertise",
        body: "Our years of experience in online sales and appraisals allow us to accurately \
               value a wide range of items, ensuring fair prices for both sellers and buyers.",
    },
    Strength {
        title: "Compassion",
        body: "We approach each estate with sensitivity and respect, understanding the emotional \
               weight that often accompanies these sales.",
    },
    Strength {
        title: "Innovation",
        body: "By blending traditional estate sale methods with modern technology, we reach a \
               broader audience and maximize value for our clients.",
    },
    Strength {
        title: "Community Focus",
        body: "We're committed to strengthening our local community by facilitating the transfer \
               of goods from one generation to the next.",
    },
];

const PROMISES: [&str; 5] = [
    "Handle your estate with the utmost care and respect",
    "Provide honest, accurate appraisals",
    "Maximize the value of your items through strategic marketing and pricing",
    "Create a welcoming, organized shopping experience",
    "Offer support and guidance throughout the entire process",
];

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub shell: Shell,
    pub strengths: &'static [Strength],
    pub promises: &'static [&'static str],
    /// Sorted by name; empty hides the team section.
    pub team: Vec<TeamMember>,
    pub placeholder: &'static str,
}

/// Display the about page.
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> impl IntoResponse {
    let team = TeamRepository::new(state.anonymous_db())
        .list()
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load team members");
            Vec::new()
        });

    AboutTemplate {
        shell: super::shell(&state, "/about").await,
        strengths: &STRENGTHS,
        promises: &PROMISES,
        team,
        placeholder: TEAM_MEMBER_PLACEHOLDER_IMAGE,
    }
}

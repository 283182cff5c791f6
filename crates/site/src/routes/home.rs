//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::layout::Shell;
use crate::state::AppState;

/// A selling point in the "Why Choose Frontier?" grid.
pub struct Feature {
    pub title: &'static str,
    pub body: &'static str,
}

const FEATURES: [Feature; 3] = [
    Feature {
        title: "Expert Valuation",
        body: "We'll care for your belongings like they're our own, and during the appraisal \
               process, our years of experience will ensure your antiques, collectibles, and \
               household items bring you the most value.",
    },
    Feature {
        title: "Peace of Mind",
        body: "This process can be emotional and even overwhelming and we are sensitive to the \
               toll it takes. Allow our team to handle the stress so you don't have to. With care \
               and compassion we will help you through it.",
    },
    Feature {
        title: "Timely Execution",
        body: "Efficient organization and execution of estate sales, respecting your timeline \
               and requirements. We aim to please.",
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: Shell,
    pub features: &'static [Feature],
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    HomeTemplate {
        shell: super::shell(&state, "/").await,
        features: &FEATURES,
    }
}

//! Contact form

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::post,
    Form, Router,
};
use serde::Deserialize;

use crate::db::{ContactRepository, NewContact};
use crate::html::{render_index, IndexView};
use crate::state::AppState;

pub const CONTACT_SUCCESS: &str = "Message sent successfully!";
pub const CONTACT_INCOMPLETE: &str = "Please fill in your name, email and message.";

pub fn router() -> Router<AppState> {
    Router::new().route("/contact", post(submit_contact))
}

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

impl ContactForm {
    fn into_contact(self) -> Option<NewContact> {
        let field = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Some(NewContact {
            name: field(self.name)?,
            email: field(self.email)?,
            message: field(self.message)?,
        })
    }
}

async fn submit_contact(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Response {
    let Some(contact) = form.into_contact() else {
        return (
            StatusCode::BAD_REQUEST,
            Html(render_index(&IndexView::error(CONTACT_INCOMPLETE))),
        )
            .into_response();
    };

    match ContactRepository::new(state.db()).create(&contact).await {
        Ok(_) => Html(render_index(&IndexView::success(CONTACT_SUCCESS))).into_response(),
        Err(e) => {
            tracing::error!("Failed to store contact message: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_index(&IndexView::error("Failed to send message."))),
            )
                .into_response()
        }
    }
}

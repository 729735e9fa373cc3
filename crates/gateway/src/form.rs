//! Lenient form extraction for the POST handlers.
//!
//! Bodies are read as raw pairs so a repeated field resolves to its last
//! value. Anything unreadable is answered with a flash and a redirect back
//! to the page that owns the form.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::flash::{self, Flash};

pub const UNREADABLE_FORM: &str = "The submitted form could not be read. Please try again.";

/// A urlencoded form body deserialized into `T`.
#[derive(Debug, Clone)]
pub struct PostedForm<T>(pub T);

/// Flash + `303` back to the form page.
#[derive(Debug)]
pub struct FormRejected {
    jar: CookieJar,
    redirect_to: &'static str,
}

impl IntoResponse for FormRejected {
    fn into_response(self) -> Response {
        (
            flash::push(self.jar, Flash::error(UNREADABLE_FORM)),
            Redirect::to(self.redirect_to),
        )
            .into_response()
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for PostedForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FormRejected;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(req.headers());
        let redirect_to = form_page(req.uri().path());

        let pairs = match Form::<Vec<(String, String)>>::from_request(req, state).await {
            Ok(Form(pairs)) => pairs,
            Err(rejection) => {
                debug!(error = %rejection, redirect_to, "unreadable form body");
                return Err(FormRejected { jar, redirect_to });
            }
        };

        match serde_json::from_value(last_values(pairs)) {
            Ok(form) => Ok(PostedForm(form)),
            Err(err) => {
                debug!(error = %err, redirect_to, "form fields did not match");
                Err(FormRejected { jar, redirect_to })
            }
        }
    }
}

fn last_values(pairs: Vec<(String, String)>) -> Value {
    let fields: Map<String, Value> = pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    Value::Object(fields)
}

fn form_page(path: &str) -> &'static str {
    match path {
        "/register" => "/register",
        "/login" => "/login",
        _ => "/preferences",
    }
}

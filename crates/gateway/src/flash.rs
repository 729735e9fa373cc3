//! One-shot flash messages carried in a cookie between a POST and the next
//! rendered page.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const FLASH_COOKIE: &str = "accountdesk_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Append a message to the queue stored in `jar`.
pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    let mut queue = queued(&jar);
    queue.push(flash);

    match serde_json::to_vec(&queue) {
        Ok(bytes) => jar.add(
            Cookie::build((FLASH_COOKIE, URL_SAFE_NO_PAD.encode(bytes)))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        ),
        Err(err) => {
            warn!(error = %err, "failed to encode flash messages");
            jar
        }
    }
}

/// Drain the queue, clearing the cookie if one was sent.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Flash>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }

    let queue = queued(&jar);
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, queue)
}

fn queued(jar: &CookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

// Tampered or stale cookies are dropped rather than rejected.
fn decode(value: &str) -> Option<Vec<Flash>> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn jar_with(value: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{FLASH_COOKIE}={value}")).unwrap(),
        );
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn pushed_messages_queue_in_order() {
        let jar = push(CookieJar::new(), Flash::error("first"));
        let jar = push(jar, Flash::success("second"));

        let value = jar.get(FLASH_COOKIE).unwrap().value().to_string();
        let (_, messages) = take(jar_with(&value));

        assert_eq!(
            messages,
            vec![Flash::error("first"), Flash::success("second")]
        );
    }

    #[test]
    fn take_without_cookie_is_empty() {
        let (jar, messages) = take(CookieJar::new());
        assert!(messages.is_empty());
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn take_clears_the_cookie() {
        let encoded = URL_SAFE_NO_PAD.encode(br#"[{"level":"success","message":"saved"}]"#);
        let (jar, messages) = take(jar_with(&encoded));

        assert_eq!(messages, vec![Flash::success("saved")]);
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn garbage_cookie_yields_no_messages() {
        let (_, messages) = take(jar_with("not-base64-json!"));
        assert!(messages.is_empty());

        let jar = push(jar_with("%%%"), Flash::success("fresh"));
        let value = jar.get(FLASH_COOKIE).unwrap().value().to_string();
        let (_, messages) = take(jar_with(&value));
        assert_eq!(messages, vec![Flash::success("fresh")]);
    }

    #[test]
    fn levels_serialize_lowercase() {
        let json = serde_json::to_string(&Flash::error("nope")).unwrap();
        assert_eq!(json, r#"{"level":"error","message":"nope"}"#);
    }
}

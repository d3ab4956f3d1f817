use std::{env, sync::LazyLock};

// "__Host-" prefix makes the cookie host-only; override the name when
// serving plain HTTP in development.

pub(crate) static GANDI_CSRF_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    env::var("GANDI_CSRF_COOKIE_NAME")
        .ok()
        .unwrap_or("__Host-GandiCsrfId".to_string())
});

pub(crate) static GANDI_CSRF_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    env::var("GANDI_CSRF_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60) // Default to 60 seconds if not set or invalid
});

pub(crate) static GANDI_POST_LOGIN_REDIRECT: LazyLock<String> = LazyLock::new(|| {
    env::var("GANDI_POST_LOGIN_REDIRECT")
        .ok()
        .unwrap_or("/".to_string())
});

use gloo_storage::{LocalStorage, Storage};
use shared::dashboard::AuthStatus;
use wasm_bindgen::JsValue;
use web_sys::UrlSearchParams;

pub const TOKEN_KEY: &str = "auth_token";

/// Where the sign-in button sends visitors. The identity provider returns
/// them with `?token=<jwt>`.
pub const LOGIN_URL: &str = match option_env!("DASHBOARD_LOGIN_URL") {
    Some(url) => url,
    None => "/auth/login",
};

pub fn stored_token() -> Option<String> {
    LocalStorage::get::<String>(TOKEN_KEY)
        .ok()
        .filter(|token| !token.is_empty())
}

pub fn current_status() -> AuthStatus {
    if stored_token().is_some() {
        AuthStatus::SignedIn
    } else {
        AuthStatus::SignedOut
    }
}

/// Moves a `token` query parameter into local storage and drops it from
/// the address bar.
pub fn capture_token_from_url() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    let Ok(search) = location.search() else {
        return;
    };
    let Ok(params) = UrlSearchParams::new_with_str(&search) else {
        return;
    };
    let Some(token) = params.get("token") else {
        return;
    };

    if let Err(e) = LocalStorage::set(TOKEN_KEY, token) {
        log::error!("Failed to store auth token: {:?}", e);
        return;
    }
    log::info!("Stored auth token from sign-in redirect");

    params.delete("token");
    let query = String::from(params.to_string());
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let clean_url = if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query)
    };

    if let Ok(history) = window.history() {
        if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(&clean_url)) {
            log::warn!("Failed to clean sign-in URL: {:?}", e);
        }
    }
}

pub fn navigate(url: &str) {
    match web_sys::window() {
        Some(window) => {
            if let Err(e) = window.location().set_href(url) {
                log::error!("Navigation to {} failed: {:?}", url, e);
            }
        }
        None => log::error!("no global `window` exists"),
    }
}

pub fn sign_in() {
    navigate(LOGIN_URL);
}

pub fn sign_out() {
    LocalStorage::delete(TOKEN_KEY);
    navigate("/");
}

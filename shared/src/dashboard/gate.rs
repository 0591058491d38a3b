use super::api::Router;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Identity provider has not answered yet.
    Loading,
    SignedOut,
    SignedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the loading placeholder and do nothing else.
    Wait,
    Redirected,
    /// Authentication just became available.
    Enter,
    Unchanged,
}

/// Keeps signed-out visitors off a gated page.
pub struct SessionGate<R> {
    router: R,
    home: String,
    last: Option<AuthStatus>,
}

impl<R: Router> SessionGate<R> {
    pub fn new(router: R) -> Self {
        Self::with_home(router, "/")
    }

    pub fn with_home(router: R, home: impl Into<String>) -> Self {
        Self {
            router,
            home: home.into(),
            last: None,
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.last.unwrap_or(AuthStatus::Loading)
    }

    pub fn is_open(&self) -> bool {
        self.status() == AuthStatus::SignedIn
    }

    pub fn observe(&mut self, status: AuthStatus) -> GateDecision {
        if self.last == Some(status) {
            return match status {
                AuthStatus::Loading => GateDecision::Wait,
                _ => GateDecision::Unchanged,
            };
        }
        self.last = Some(status);

        match status {
            AuthStatus::Loading => GateDecision::Wait,
            AuthStatus::SignedOut => {
                log::info!("Not signed in, redirecting to {}", self.home);
                self.router.redirect(&self.home);
                GateDecision::Redirected
            }
            AuthStatus::SignedIn => GateDecision::Enter,
        }
    }
}

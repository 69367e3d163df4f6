use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::cancel::CancelToken;

/// Where the dashboard sends users whose session ended.
pub const ROOT_PATH: &str = "/";

const SESSION_EXPIRED: &str = "Session has expired";
const UNAUTHORIZED_ACCESS: &str = "Unauthorized Access";

/// Host-side navigation. The transport only needs to know the current location
/// and how to leave it.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn redirect(&self, path: &str);
}

/// Navigator that just remembers where it is. Used by the binary and tests.
#[derive(Debug)]
pub struct InMemoryNavigator {
    path: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl InMemoryNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(path.into()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for InMemoryNavigator {
    fn current_path(&self) -> String {
        self.path.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn redirect(&self, path: &str) {
        *self.path.lock().unwrap_or_else(|e| e.into_inner()) = path.to_string();
        self.redirects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.to_string());
    }
}

/// True when a failed response means the admin session is over.
pub fn is_session_expired(status: u16, body_code: Option<u16>, message: Option<&str>) -> bool {
    status == 401
        || body_code == Some(401)
        || matches!(message, Some(SESSION_EXPIRED) | Some(UNAUTHORIZED_ACCESS))
}

/// Owns the current cancellation token and the expiry reaction.
#[derive(Clone)]
pub struct SessionGuard {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    token: RwLock<CancelToken>,
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
}

impl SessionGuard {
    pub fn new(navigator: Arc<dyn Navigator>, redirect_delay: Duration) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(CancelToken::new()),
                navigator,
                redirect_delay,
            }),
        }
    }

    pub fn current_token(&self) -> CancelToken {
        self.inner
            .token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Cancels everything in flight, then after the redirect delay installs a
    /// fresh token and sends the user to [`ROOT_PATH`] unless already there.
    ///
    /// Returns `None` when the current token was already cancelled, so a burst
    /// of 401s produces a single redirect.
    pub fn expire(&self, reason: &str) -> Option<JoinHandle<()>> {
        let token = self.current_token();
        if !token.cancel(reason) {
            return None;
        }
        warn!(reason, "Session ended, cancelling in-flight requests");

        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move {
            tokio::time::sleep(inner.redirect_delay).await;
            {
                let mut current = inner.token.write().unwrap_or_else(|e| e.into_inner());
                if current.same_as(&token) {
                    *current = CancelToken::new();
                }
            }
            if inner.navigator.current_path() != ROOT_PATH {
                info!(to = ROOT_PATH, "Redirecting after session expiry");
                inner.navigator.redirect(ROOT_PATH);
            }
        }))
    }
}

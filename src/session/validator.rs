//! Timer-driven session validation.
//!
//! The validator runs one validation pass immediately on `start` and then
//! every five minutes from a spawned timer task. A pass is two stages:
//! a local check (token present, expiry in the future) that short-circuits
//! without touching the network, then a remote round-trip to the auth
//! service. Any failure ends the session: the persisted user is cleared,
//! one `SessionEvent::Expired` is emitted, and the timer is torn down.
//!
//! A transport error counts as "not authenticated" - there is no retry
//! tier, so an unreachable backend logs the user out rather than leaving
//! a possibly-revoked session alive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::AuthClient;
use crate::storage::{keys, SettingsStore};

use super::AuthUser;

// ============================================================================
// Constants
// ============================================================================

/// Period between validation passes.
/// Five minutes keeps revocation latency bounded without hammering the
/// backend; the immediate pass at start covers the common case.
const VALIDATION_PERIOD: Duration = Duration::from_secs(5 * 60);

/// Buffer size for the expiry event channel.
/// Expiry fires at most once per started session, so a small buffer is
/// plenty even if the listener lags.
const EVENT_BUFFER_SIZE: usize = 8;

/// Session lifecycle notifications emitted by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session stopped validating; carries the stale user.
    Expired(AuthUser),
}

struct Inner {
    current_user: Option<AuthUser>,
    timer: Option<JoinHandle<()>>,
}

/// Periodic session validator.
///
/// `Idle` (no timer, no user) and `Active` (timer armed, user held) are the
/// only states; every failure path lands back in `Idle`. Once closed, all
/// operations become neutral no-ops.
pub struct SessionValidator {
    auth: Arc<dyn AuthClient>,
    settings: Arc<dyn SettingsStore>,
    inner: Mutex<Inner>,
    /// Single-flight guard: a timer tick can never overlap an explicit pass
    pass_gate: tokio::sync::Mutex<()>,
    events: mpsc::Sender<SessionEvent>,
    closed: AtomicBool,
    period: Duration,
    /// Handle the timer task uses to reach back into the validator without
    /// keeping it alive
    self_ref: Weak<Self>,
}

impl SessionValidator {
    /// Create a validator and the receiving end of its event channel.
    pub fn new(
        auth: Arc<dyn AuthClient>,
        settings: Arc<dyn SettingsStore>,
    ) -> (Arc<Self>, mpsc::Receiver<SessionEvent>) {
        Self::with_period(auth, settings, VALIDATION_PERIOD)
    }

    fn with_period(
        auth: Arc<dyn AuthClient>,
        settings: Arc<dyn SettingsStore>,
        period: Duration,
    ) -> (Arc<Self>, mpsc::Receiver<SessionEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER_SIZE);
        let validator = Arc::new_cyclic(|self_ref| Self {
            auth,
            settings,
            inner: Mutex::new(Inner {
                current_user: None,
                timer: None,
            }),
            pass_gate: tokio::sync::Mutex::new(()),
            events: tx,
            closed: AtomicBool::new(false),
            period,
            self_ref: self_ref.clone(),
        });
        (validator, rx)
    }

    /// Begin validating a user's session.
    ///
    /// Replaces any session already being validated, arms the repeating
    /// timer, and runs the first validation pass before returning. The
    /// return value is that first pass's verdict; `false` on a closed
    /// validator without any work done.
    pub async fn start(&self, user: AuthUser) -> bool {
        if self.closed.load(Ordering::SeqCst) {
            return false;
        }

        self.stop();
        info!(username = %user.username, "session validation started");

        {
            let mut inner = self.inner.lock().unwrap();
            inner.current_user = Some(user);

            // Weak handle so an abandoned validator doesn't keep ticking
            let validator = self.self_ref.clone();
            let period = self.period;
            inner.timer = Some(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                // The first interval tick completes immediately; the
                // synchronous pass in start already covers it.
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let Some(validator) = validator.upgrade() else {
                        break;
                    };
                    validator.run_validation_pass().await;
                }
            }));
        }

        self.run_validation_pass().await
    }

    /// Cancel the timer and drop the held session. Idempotent; safe to call
    /// when already idle.
    pub fn stop(&self) {
        let timer = {
            let mut inner = self.inner.lock().unwrap();
            inner.current_user = None;
            inner.timer.take()
        };
        if let Some(timer) = timer {
            timer.abort();
            debug!("session validation stopped");
        }
    }

    /// Stop validating and refuse all further operations.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.stop();
    }

    /// Whether a session is currently being validated.
    pub fn is_active(&self) -> bool {
        self.inner.lock().unwrap().current_user.is_some()
    }

    /// Run the two-stage check for a user without touching validator state.
    /// The login flow uses this directly before handing the session over.
    pub async fn validate(&self, user: &AuthUser) -> bool {
        if self.closed.load(Ordering::SeqCst) {
            return false;
        }
        if !self.validate_locally(user) {
            return false;
        }
        self.validate_remotely(user).await
    }

    fn validate_locally(&self, user: &AuthUser) -> bool {
        if !user.has_token() {
            debug!(username = %user.username, "local check failed: token missing");
            return false;
        }
        if user.is_expired() {
            debug!(
                username = %user.username,
                expires_at = %user.expires_at,
                "local check failed: token expired"
            );
            return false;
        }
        true
    }

    async fn validate_remotely(&self, user: &AuthUser) -> bool {
        match self.auth.check_token(&user.access_token).await {
            Ok(status) => status.is_auth,
            Err(err) => {
                warn!(error = %err, "remote token check failed, treating as not authenticated");
                false
            }
        }
    }

    /// One logical validation pass against the held session.
    async fn run_validation_pass(&self) -> bool {
        let _gate = self.pass_gate.lock().await;

        let user = { self.inner.lock().unwrap().current_user.clone() };
        let Some(user) = user else {
            return false;
        };

        if self.validate(&user).await {
            debug!(username = %user.username, "session validation passed");
            return true;
        }

        info!(username = %user.username, "session expired, clearing persisted user");
        if let Err(err) = self.settings.set(keys::CURRENT_USER, None) {
            warn!(error = %err, "failed to clear persisted user");
        }

        // No awaits from here on: when this pass runs on the timer task,
        // stop() aborts that very task and the abort lands at the next
        // suspension point.
        if self.events.try_send(SessionEvent::Expired(user)).is_err() {
            debug!("expiry event dropped, no listener");
        }
        self.stop();
        false
    }
}

impl Drop for SessionValidator {
    fn drop(&mut self) {
        if let Some(timer) = self.inner.lock().unwrap().timer.take() {
            timer.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

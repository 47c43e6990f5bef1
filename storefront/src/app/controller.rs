//! # Screen Controller
//!
//! Generic load/submit state machine shared by every screen:
//!
//! ```text
//! Idle ──load──▶ Loading ──▶ Ready(T) ──submit──▶ Submitting(T) ──▶ Ready(T)
//!                   │                                   │
//!                   └────────────▶ Error ◀──────────────┘
//! ```
//!
//! A controller is mounted while its screen is visible. Mounting starts a new
//! lifetime (fresh cancellation token); unmounting cancels it. Loads and
//! submissions race the token and are tagged with a generation number, so a
//! result that arrives after unmount, or after a newer load started, is dropped
//! instead of written into state.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::core::error::{AppError, ErrorKind, Result};
use crate::services::session::Session;

/// Snapshot of a screen's state, as rendered by presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    Idle,
    Loading,
    Ready(T),
    Submitting(T),
    Error(ScreenError),
}

impl<T> ScreenState<T> {
    /// Loaded data, also available while a submission is in flight.
    pub fn data(&self) -> Option<&T> {
        match self {
            ScreenState::Ready(data) | ScreenState::Submitting(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ScreenError> {
        match self {
            ScreenState::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, ScreenState::Submitting(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScreenState::Idle => "idle",
            ScreenState::Loading => "loading",
            ScreenState::Ready(_) => "ready",
            ScreenState::Submitting(_) => "submitting",
            ScreenState::Error(_) => "error",
        }
    }
}

/// Error surfaced to presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    /// Whether to offer a retry affordance. Nothing retries automatically.
    pub retryable: bool,
}

impl ScreenError {
    pub fn no_session() -> Self {
        Self::from(&AppError::Unauthenticated)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl From<&AppError> for ScreenError {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
            status: err.http_status(),
            retryable: err.is_retryable(),
        }
    }
}

pub const SUBMISSION_IN_PROGRESS: &str = "A submission is already in progress";

/// Lifecycle every screen controller exposes to the orchestrator.
#[async_trait]
pub trait ScreenLifecycle: Send + Sync {
    fn mount(&self);

    fn unmount(&self);

    /// Populate the screen. Called after mount and on refresh.
    async fn load(&self) -> Result<()>;
}

pub struct ScreenController<T> {
    name: &'static str,
    state: RwLock<ScreenState<T>>,
    lifetime: Mutex<Option<CancellationToken>>,
    generation: AtomicU64,
}

impl<T> ScreenController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RwLock::new(ScreenState::Idle),
            lifetime: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Start a visible lifetime. Any previous lifetime is cancelled.
    pub fn mount(&self) {
        let previous = self.lifetime.lock().replace(CancellationToken::new());
        if let Some(token) = previous {
            token.cancel();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.state.write() = ScreenState::Idle;
        tracing::debug!(screen = self.name, "Mounted");
    }

    /// End the visible lifetime. In-flight work is cancelled and its results dropped;
    /// drafts are discarded.
    pub fn unmount(&self) {
        if let Some(token) = self.lifetime.lock().take() {
            token.cancel();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.state.write() = ScreenState::Idle;
        tracing::debug!(screen = self.name, "Unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.lifetime.lock().is_some()
    }

    pub fn state(&self) -> ScreenState<T> {
        self.state.read().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.read().data().cloned()
    }

    /// Replace the state with `Ready(data)`. Used by screens that start from a
    /// local draft instead of a fetch.
    pub fn set_ready(&self, data: T) {
        if self.is_mounted() {
            *self.state.write() = ScreenState::Ready(data);
        }
    }

    /// Edit the data in place. Only applies in `Ready`; returns whether it did.
    pub fn update<F>(&self, edit: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match &mut *self.state.write() {
            ScreenState::Ready(data) => {
                edit(data);
                true
            }
            _ => false,
        }
    }

    pub fn fail(&self, err: &AppError) {
        if self.is_mounted() {
            *self.state.write() = ScreenState::Error(ScreenError::from(err));
        }
    }

    fn lifetime(&self) -> Option<(CancellationToken, u64)> {
        let token = self.lifetime.lock().clone()?;
        Some((token, self.generation.load(Ordering::SeqCst)))
    }

    fn is_current(&self, token: &CancellationToken, generation: u64) -> bool {
        !token.is_cancelled() && self.generation.load(Ordering::SeqCst) == generation
    }

    /// Run `fetch` and store its outcome. Without a mounted lifetime, nothing runs.
    pub async fn load<F, Fut>(&self, fetch: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some((token, _)) = self.lifetime() else {
            tracing::debug!(screen = self.name, "Load skipped, screen not mounted");
            return Ok(());
        };
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.write() = ScreenState::Loading;

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(screen = self.name, "Load cancelled");
                return Ok(());
            }
            result = fetch() => result,
        };

        if !self.is_current(&token, generation) {
            tracing::debug!(screen = self.name, "Stale load result dropped");
            return result.map(|_| ());
        }

        let mut state = self.state.write();
        match result {
            Ok(data) => {
                *state = ScreenState::Ready(data);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(screen = self.name, error = %err, "Load failed");
                *state = ScreenState::Error(ScreenError::from(&err));
                Err(err)
            }
        }
    }

    /// Load gated on a session. Without one the screen goes straight to
    /// `Error(no-session)` and `fetch` is never called.
    pub async fn load_for_session<F, Fut>(&self, session: Option<Session>, fetch: F) -> Result<()>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match session {
            Some(session) => self.load(move || fetch(session)).await,
            None => {
                if self.is_mounted() {
                    *self.state.write() = ScreenState::Error(ScreenError::no_session());
                }
                Err(AppError::Unauthenticated)
            }
        }
    }

    /// Submit a mutation of the current data. A failure moves the screen to `Error`.
    pub async fn submit<R, F, Fut>(&self, mutation: F) -> Result<R>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(T, R)>>,
    {
        self.run_submit(mutation, None::<fn(&mut T, &AppError)>).await
    }

    /// Submit a mutation; on failure return to `Ready` with `recover` applied to the
    /// data (typically to record the error on the form).
    pub async fn submit_recoverable<R, F, Fut, E>(&self, mutation: F, recover: E) -> Result<R>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(T, R)>>,
        E: FnOnce(&mut T, &AppError),
    {
        self.run_submit(mutation, Some(recover)).await
    }

    async fn run_submit<R, F, Fut, E>(&self, mutation: F, recover: Option<E>) -> Result<R>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(T, R)>>,
        E: FnOnce(&mut T, &AppError),
    {
        let (token, generation, draft) = {
            let Some((token, generation)) = self.lifetime() else {
                return Err(AppError::Validation("Screen is not open".to_string()));
            };
            let mut state = self.state.write();
            let draft = match &*state {
                ScreenState::Ready(data) => data.clone(),
                ScreenState::Submitting(_) => {
                    tracing::debug!(screen = self.name, "Duplicate submission rejected");
                    return Err(AppError::Validation(SUBMISSION_IN_PROGRESS.to_string()));
                }
                other => {
                    return Err(AppError::Validation(format!(
                        "Cannot submit while {}",
                        other.label()
                    )))
                }
            };
            *state = ScreenState::Submitting(draft.clone());
            (token, generation, draft)
        };

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(screen = self.name, "Submission cancelled");
                return Err(AppError::Validation("Screen was closed".to_string()));
            }
            result = mutation(draft.clone()) => result,
        };

        if !self.is_current(&token, generation) {
            tracing::debug!(screen = self.name, "Stale submission result dropped");
            return result.map(|(_, r)| r);
        }

        let mut state = self.state.write();
        match result {
            Ok((data, output)) => {
                *state = ScreenState::Ready(data);
                Ok(output)
            }
            Err(err) => {
                tracing::warn!(screen = self.name, error = %err, "Submission failed");
                *state = match recover {
                    Some(recover) => {
                        let mut data = draft;
                        recover(&mut data, &err);
                        ScreenState::Ready(data)
                    }
                    None => ScreenState::Error(ScreenError::from(&err)),
                };
                Err(err)
            }
        }
    }
}

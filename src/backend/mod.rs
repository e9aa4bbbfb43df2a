pub mod analysis;
pub mod auth;
pub mod catalog;
pub mod filters;
pub mod forms;
pub mod panel;

use analysis::{AnalysisError, AnalysisRecord, AnalysisService, ApiAnalysis, MockAnalysis, QueryIntent};
use auth::{AuthError, AuthProvider, AuthSession, AuthUser, LocalAuth, SupabaseAuth};
use forms::{FormError, LoginForm, RegisterForm, SignInRequest, SignUpRequest};
use panel::{PanelError, SearchPanel};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::AppConfig;

/// Identifies one submission from send to outcome.
pub type Ticket = u64;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

pub fn next_ticket() -> Ticket {
    NEXT_TICKET.fetch_add(1, Ordering::Relaxed)
}

#[cfg(not(target_arch = "wasm32"))]
pub type DynAuth = Arc<dyn AuthProvider + Send + Sync>;
#[cfg(target_arch = "wasm32")]
pub type DynAuth = Arc<dyn AuthProvider>;

#[cfg(not(target_arch = "wasm32"))]
pub type DynAnalysis = Arc<dyn AnalysisService + Send + Sync>;
#[cfg(target_arch = "wasm32")]
pub type DynAnalysis = Arc<dyn AnalysisService>;

#[derive(Debug)]
pub enum AppCmd {
    SignIn { ticket: Ticket, request: SignInRequest },
    SignUp { ticket: Ticket, request: SignUpRequest },
    Analyze { ticket: Ticket, intent: QueryIntent },
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    SignInFinished { ticket: Ticket, outcome: Result<AuthSession, AuthError> },
    SignUpFinished { ticket: Ticket, outcome: Result<AuthUser, AuthError> },
    AnalysisFinished { ticket: Ticket, outcome: Result<Vec<AnalysisRecord>, AnalysisError> },
}

pub struct Backend {
    auth: DynAuth,
    analysis: DynAnalysis,
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    request_timeout: Duration,
}

impl Backend {
    pub fn new(
        auth: DynAuth,
        analysis: DynAnalysis,
        cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        request_timeout: Duration,
    ) -> Self {
        Self { auth, analysis, cmd_rx, event_tx, request_timeout }
    }

    pub fn from_config(
        config: &AppConfig,
        cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let auth: DynAuth = match &config.supabase {
            Some(supabase) => {
                tracing::info!("Using Supabase auth at {}", supabase.url);
                Arc::new(SupabaseAuth::new(supabase.url.clone(), supabase.anon_key.clone()))
            }
            None => {
                tracing::info!("No Supabase project configured, using local accounts");
                Arc::new(LocalAuth::new())
            }
        };
        let analysis: DynAnalysis = match &config.api_base {
            Some(base) => {
                tracing::info!("Using analysis API at {}", base);
                Arc::new(ApiAnalysis::new(base.clone()))
            }
            None => {
                tracing::info!("No analysis API configured, using sample results");
                Arc::new(MockAnalysis)
            }
        };
        Self::new(auth, analysis, cmd_rx, event_tx, config.request_timeout)
    }

    /// Reads commands until every sender is gone. Each command runs in its
    /// own task so a slow call never holds up the next one.
    pub async fn run(&mut self) {
        while let Some(cmd) = self.cmd_rx.recv().await {
            let task = handle_command(
                self.auth.clone(),
                self.analysis.clone(),
                self.event_tx.clone(),
                self.request_timeout,
                cmd,
            );

            #[cfg(not(target_arch = "wasm32"))]
            tokio::spawn(task);

            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(task);
        }
        tracing::info!("Command channel closed, backend stopping");
    }
}

async fn handle_command(
    auth: DynAuth,
    analysis: DynAnalysis,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    request_timeout: Duration,
    cmd: AppCmd,
) {
    let event = match cmd {
        AppCmd::SignIn { ticket, request } => {
            let outcome = with_timeout(request_timeout, auth.sign_in(&request.email, &request.password))
                .await
                .unwrap_or(Err(AuthError::TimedOut));
            AppEvent::SignInFinished { ticket, outcome }
        }
        AppCmd::SignUp { ticket, request } => {
            let outcome = with_timeout(
                request_timeout,
                auth.sign_up(&request.email, &request.password, &request.full_name),
            )
            .await
            .unwrap_or(Err(AuthError::TimedOut));
            AppEvent::SignUpFinished { ticket, outcome }
        }
        AppCmd::Analyze { ticket, intent } => {
            let outcome = with_timeout(request_timeout, analysis.analyze(&intent))
                .await
                .unwrap_or(Err(AnalysisError::TimedOut));
            AppEvent::AnalysisFinished { ticket, outcome }
        }
    };
    if event_tx.send(event).is_err() {
        tracing::debug!("UI is gone, dropping event");
    }
}

/// `None` when `duration` passes first.
async fn with_timeout<F: Future>(duration: Duration, fut: F) -> Option<F::Output> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        tokio::time::timeout(duration, fut).await.ok()
    }
    #[cfg(target_arch = "wasm32")]
    {
        use futures::future::{select, Either};
        let fut = std::pin::pin!(fut);
        let sleep = std::pin::pin!(gloo_timers::future::sleep(duration));
        match select(fut, sleep).await {
            Either::Left((output, _)) => Some(output),
            Either::Right(_) => None,
        }
    }
}

pub async fn init(
    config: AppConfig,
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) {
    let mut backend = Backend::from_config(&config, cmd_rx, event_tx);
    backend.run().await
}

pub fn dispatch_sign_in(form: &mut LoginForm, cmd_tx: &mpsc::UnboundedSender<AppCmd>) -> Result<Ticket, FormError> {
    let ticket = next_ticket();
    let request = form.submit(ticket)?;
    if cmd_tx.send(AppCmd::SignIn { ticket, request }).is_err() {
        tracing::error!("Backend is not running");
        form.resolve(ticket, Err(AuthError::Transport("backend is not running".to_string())));
    }
    Ok(ticket)
}

/// A password mismatch returns before anything is sent.
pub fn dispatch_sign_up(form: &mut RegisterForm, cmd_tx: &mpsc::UnboundedSender<AppCmd>) -> Result<Ticket, FormError> {
    let ticket = next_ticket();
    let request = form.submit(ticket)?;
    if cmd_tx.send(AppCmd::SignUp { ticket, request }).is_err() {
        tracing::error!("Backend is not running");
        form.resolve(ticket, Err(AuthError::Transport("backend is not running".to_string())));
    }
    Ok(ticket)
}

pub fn dispatch_analysis(panel: &mut SearchPanel, cmd_tx: &mpsc::UnboundedSender<AppCmd>) -> Result<Ticket, PanelError> {
    let ticket = next_ticket();
    let intent = panel.submit(ticket)?;
    if cmd_tx.send(AppCmd::Analyze { ticket, intent }).is_err() {
        tracing::error!("Backend is not running");
        panel.resolve(ticket, Err(AnalysisError::Transport("backend is not running".to_string())));
    }
    Ok(ticket)
}

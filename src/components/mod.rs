pub mod common;
pub mod home_page;
pub mod login_page;
pub mod nav_bar;
pub mod register_page;
pub mod results;
pub mod sentiment_page;

use dioxus::prelude::*;
use chrono::{DateTime, Utc};
use crate::backend::auth::{take_if_expired, AuthSession};
use crate::backend::catalog::RegionCatalog;
use crate::backend::forms::{LoginForm, RegisterForm, Resolution, Screen, MSG_SESSION_EXPIRED};
use crate::backend::panel::SearchPanel;
use crate::backend::AppEvent;

#[derive(Clone, Copy)]
pub struct AppState {
    pub session: Signal<Option<AuthSession>>,
    pub notice: Signal<Option<String>>, // Flash message shown by the layout
    pub navigate_to: Signal<Option<Screen>>,
    pub login_form: Signal<LoginForm>,
    pub register_form: Signal<RegisterForm>,
    pub search_panel: Signal<SearchPanel>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: use_signal(|| None),
            notice: use_signal(|| None),
            navigate_to: use_signal(|| None),
            login_form: use_signal(LoginForm::default),
            register_form: use_signal(RegisterForm::default),
            search_panel: use_signal(|| SearchPanel::new(RegionCatalog::builtin())),
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SignInFinished { ticket, outcome } => {
                let resolution = self.login_form.write().resolve(ticket, outcome);
                if let Some(Resolution::Succeeded { value, next, notice }) = resolution {
                    self.session.set(Some(value));
                    self.notice.set(Some(notice.to_string()));
                    self.navigate_to.set(Some(next));
                }
            }
            AppEvent::SignUpFinished { ticket, outcome } => {
                let resolution = self.register_form.write().resolve(ticket, outcome);
                if let Some(Resolution::Succeeded { next, notice, .. }) = resolution {
                    self.notice.set(Some(notice.to_string()));
                    self.navigate_to.set(Some(next));
                }
            }
            AppEvent::AnalysisFinished { ticket, outcome } => {
                self.search_panel.write().resolve(ticket, outcome);
            }
        }
    }

    pub fn expire_session(&mut self, now: DateTime<Utc>) {
        let expired = take_if_expired(&mut self.session.write(), now);
        if let Some(session) = expired {
            tracing::info!("Session for {} expired", session.user.email);
            self.notice.set(Some(MSG_SESSION_EXPIRED.to_string()));
            self.navigate_to.set(Some(Screen::Login));
        }
    }

    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!("Signed out {}", session.user.email);
        }
        self.notice.set(None);
        self.navigate_to.set(Some(Screen::Login));
    }
}

use std::fmt;
use thiserror::Error;

use super::auth::{AuthError, AuthSession, AuthUser};
use super::Ticket;

pub const MSG_LOGIN_SUCCESS: &str = "로그인 성공!";
pub const MSG_INVALID_CREDENTIALS: &str = "이메일 또는 비밀번호가 잘못되었습니다.";
pub const MSG_PASSWORD_MISMATCH: &str = "비밀번호가 일치하지 않습니다!";
pub const MSG_SIGNUP_SUCCESS: &str = "회원가입 성공! 이메일을 확인하여 계정을 인증해주세요.";
pub const MSG_SESSION_EXPIRED: &str = "로그인 세션이 만료되었습니다. 다시 로그인해주세요.";

/// Named navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Home,
    Sentiment,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{}", MSG_PASSWORD_MISMATCH)]
    PasswordMismatch,

    #[error("A submission is already in progress")]
    AlreadySubmitting,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting(Ticket),
    Succeeded,
    Failed(String),
}

impl FormPhase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, FormPhase::Submitting(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FormPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    // editing after a result starts over
    fn touch(&mut self) {
        if matches!(self, FormPhase::Succeeded | FormPhase::Failed(_)) {
            *self = FormPhase::Editing;
        }
    }

    fn settle(&mut self, ticket: Ticket) -> bool {
        if *self != FormPhase::Submitting(ticket) {
            tracing::warn!("Discarding auth outcome for ticket {}, not pending", ticket);
            return false;
        }
        true
    }
}

/// Result of a submission as seen by the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Succeeded { value: T, next: Screen, notice: &'static str },
    Failed(String),
}

pub fn sign_in_failure_message(error: &AuthError) -> String {
    match error {
        AuthError::InvalidCredentials => MSG_INVALID_CREDENTIALS.to_string(),
        other => format!("로그인 오류: {}", other),
    }
}

pub fn sign_up_failure_message(error: &AuthError) -> String {
    format!("회원가입 오류: {}", error)
}

fn input_type(visible: bool) -> &'static str {
    if visible {
        "text"
    } else {
        "password"
    }
}

#[derive(Clone, PartialEq)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInRequest").field("email", &self.email).finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    phase: FormPhase,
}

impl LoginForm {
    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn set_email(&mut self, value: String) {
        self.email = value;
        self.phase.touch();
    }

    pub fn set_password(&mut self, value: String) {
        self.password = value;
        self.phase.touch();
    }

    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn password_input_type(&self) -> &'static str {
        input_type(self.show_password)
    }

    pub fn submit(&mut self, ticket: Ticket) -> Result<SignInRequest, FormError> {
        if self.phase.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }
        self.phase = FormPhase::Submitting(ticket);
        tracing::info!("Sign-in {} submitted for {}", ticket, self.email);
        Ok(SignInRequest { email: self.email.trim().to_string(), password: self.password.clone() })
    }

    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: Result<AuthSession, AuthError>,
    ) -> Option<Resolution<AuthSession>> {
        if !self.phase.settle(ticket) {
            return None;
        }
        match outcome {
            Ok(session) => {
                tracing::info!("Sign-in {} succeeded for {}", ticket, session.user.email);
                self.phase = FormPhase::Succeeded;
                self.password.clear();
                Some(Resolution::Succeeded { value: session, next: Screen::Home, notice: MSG_LOGIN_SUCCESS })
            }
            Err(e) => {
                tracing::warn!("Sign-in {} failed: {}", ticket, e);
                let message = sign_in_failure_message(&e);
                self.phase = FormPhase::Failed(message.clone());
                Some(Resolution::Failed(message))
            }
        }
    }

    pub fn abandon(&mut self) {
        if self.phase.is_submitting() {
            self.phase = FormPhase::Editing;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub show_password: bool,
    pub show_confirm_password: bool,
    phase: FormPhase,
}

impl RegisterForm {
    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn set_full_name(&mut self, value: String) {
        self.full_name = value;
        self.phase.touch();
    }

    pub fn set_email(&mut self, value: String) {
        self.email = value;
        self.phase.touch();
    }

    pub fn set_password(&mut self, value: String) {
        self.password = value;
        self.phase.touch();
    }

    pub fn set_confirm_password(&mut self, value: String) {
        self.confirm_password = value;
        self.phase.touch();
    }

    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn toggle_confirm_password(&mut self) {
        self.show_confirm_password = !self.show_confirm_password;
    }

    pub fn password_input_type(&self) -> &'static str {
        input_type(self.show_password)
    }

    pub fn confirm_input_type(&self) -> &'static str {
        input_type(self.show_confirm_password)
    }

    /// A mismatch fails locally; nothing is handed to the provider.
    pub fn submit(&mut self, ticket: Ticket) -> Result<SignUpRequest, FormError> {
        if self.phase.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }
        if self.password != self.confirm_password {
            self.phase = FormPhase::Failed(MSG_PASSWORD_MISMATCH.to_string());
            return Err(FormError::PasswordMismatch);
        }
        self.phase = FormPhase::Submitting(ticket);
        tracing::info!("Sign-up {} submitted for {}", ticket, self.email);
        Ok(SignUpRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            full_name: self.full_name.trim().to_string(),
        })
    }

    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: Result<AuthUser, AuthError>,
    ) -> Option<Resolution<AuthUser>> {
        if !self.phase.settle(ticket) {
            return None;
        }
        match outcome {
            Ok(user) => {
                tracing::info!("Sign-up {} succeeded for {}", ticket, user.email);
                *self = RegisterForm { phase: FormPhase::Succeeded, ..RegisterForm::default() };
                Some(Resolution::Succeeded { value: user, next: Screen::Login, notice: MSG_SIGNUP_SUCCESS })
            }
            Err(e) => {
                tracing::warn!("Sign-up {} failed: {}", ticket, e);
                let message = sign_up_failure_message(&e);
                self.phase = FormPhase::Failed(message.clone());
                Some(Resolution::Failed(message))
            }
        }
    }

    pub fn abandon(&mut self) {
        if self.phase.is_submitting() {
            self.phase = FormPhase::Editing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session(email: &str) -> AuthSession {
        AuthSession {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: AuthUser { id: "u1".into(), email: email.into(), full_name: None },
        }
    }

    fn filled_login() -> LoginForm {
        let mut form = LoginForm::default();
        form.set_email(" kim@example.com ".into());
        form.set_password("secret1".into());
        form
    }

    #[test]
    fn test_login_submit_and_success() {
        let mut form = filled_login();
        let request = form.submit(1).unwrap();
        assert_eq!(request.email, "kim@example.com");
        assert_eq!(request.password, "secret1");
        assert_eq!(form.phase(), &FormPhase::Submitting(1));

        match form.resolve(1, Ok(session("kim@example.com"))) {
            Some(Resolution::Succeeded { next, notice, .. }) => {
                assert_eq!(next, Screen::Home);
                assert_eq!(notice, MSG_LOGIN_SUCCESS);
            }
            other => panic!("unexpected resolution {:?}", other),
        }
        assert_eq!(form.phase(), &FormPhase::Succeeded);
    }

    #[test]
    fn test_login_invalid_credentials_message() {
        let mut form = filled_login();
        form.submit(1).unwrap();
        let resolution = form.resolve(1, Err(AuthError::from_message("Invalid login credentials")));
        assert_eq!(resolution, Some(Resolution::Failed(MSG_INVALID_CREDENTIALS.to_string())));
        assert_eq!(form.phase().message(), Some(MSG_INVALID_CREDENTIALS));
    }

    #[test]
    fn test_login_other_failure_message() {
        let mut form = filled_login();
        form.submit(1).unwrap();
        let resolution = form.resolve(1, Err(AuthError::Transport("network down".into())));
        assert_eq!(resolution, Some(Resolution::Failed("로그인 오류: network down".to_string())));

        form.submit(2).unwrap();
        let resolution = form.resolve(2, Err(AuthError::from_message("Email not confirmed")));
        assert_eq!(resolution, Some(Resolution::Failed("로그인 오류: Email not confirmed".to_string())));
    }

    #[test]
    fn test_login_resolves_once_and_ignores_stale() {
        let mut form = filled_login();
        form.submit(5).unwrap();
        assert_eq!(form.resolve(4, Err(AuthError::TimedOut)), None);
        assert!(form.resolve(5, Err(AuthError::TimedOut)).is_some());
        assert_eq!(form.resolve(5, Ok(session("kim@example.com"))), None);
    }

    #[test]
    fn test_login_refuses_double_submit() {
        let mut form = filled_login();
        form.submit(1).unwrap();
        assert_eq!(form.submit(2).unwrap_err(), FormError::AlreadySubmitting);
    }

    #[test]
    fn test_edit_after_failure_returns_to_editing() {
        let mut form = filled_login();
        form.submit(1).unwrap();
        form.resolve(1, Err(AuthError::InvalidCredentials));
        form.set_password("secret2".into());
        assert_eq!(form.phase(), &FormPhase::Editing);
    }

    #[test]
    fn test_password_toggle_does_not_change_request() {
        let mut form = filled_login();
        assert_eq!(form.password_input_type(), "password");
        form.toggle_password();
        assert_eq!(form.password_input_type(), "text");
        let request = form.submit(1).unwrap();
        assert_eq!(request.password, "secret1");
        assert!(!format!("{:?}", request).contains("secret1"));
    }

    fn filled_register(confirm: &str) -> RegisterForm {
        let mut form = RegisterForm::default();
        form.set_full_name("이영희".into());
        form.set_email("lee@example.com".into());
        form.set_password("secret1".into());
        form.set_confirm_password(confirm.into());
        form
    }

    #[test]
    fn test_register_mismatch_fails_locally() {
        let mut form = filled_register("secret2");
        assert_eq!(form.submit(1), Err(FormError::PasswordMismatch));
        assert_eq!(form.phase().message(), Some(MSG_PASSWORD_MISMATCH));
        // a late outcome for that ticket has nothing to land on
        assert_eq!(form.resolve(1, Err(AuthError::TimedOut)), None);
    }

    #[test]
    fn test_register_success_goes_to_login() {
        let mut form = filled_register("secret1");
        let request = form.submit(3).unwrap();
        assert_eq!(request.full_name, "이영희");

        let user = AuthUser { id: "u9".into(), email: "lee@example.com".into(), full_name: Some("이영희".into()) };
        match form.resolve(3, Ok(user)) {
            Some(Resolution::Succeeded { next, notice, .. }) => {
                assert_eq!(next, Screen::Login);
                assert_eq!(notice, MSG_SIGNUP_SUCCESS);
            }
            other => panic!("unexpected resolution {:?}", other),
        }
        assert!(form.password.is_empty());
        assert_eq!(form.phase(), &FormPhase::Succeeded);
    }

    #[test]
    fn test_register_failure_passes_provider_message() {
        let mut form = filled_register("secret1");
        form.submit(1).unwrap();
        let resolution = form.resolve(1, Err(AuthError::Provider("User already registered".into())));
        assert_eq!(resolution, Some(Resolution::Failed("회원가입 오류: User already registered".into())));
    }

    #[test]
    fn test_register_toggles_are_independent() {
        let mut form = filled_register("secret1");
        form.toggle_confirm_password();
        assert_eq!(form.password_input_type(), "password");
        assert_eq!(form.confirm_input_type(), "text");
    }

    #[test]
    fn test_abandon_drops_pending_submission() {
        let mut form = filled_login();
        form.submit(1).unwrap();
        form.abandon();
        assert_eq!(form.phase(), &FormPhase::Editing);
        assert_eq!(form.resolve(1, Ok(session("kim@example.com"))), None);
    }
}

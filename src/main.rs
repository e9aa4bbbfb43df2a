mod backend;
mod components;
mod config;

use components::home_page::HomeComponent;
use components::login_page::LoginComponent;
use components::nav_bar::NavComponent;
use components::register_page::RegisterComponent;
use components::sentiment_page::SentimentComponent;
use components::AppState;

use backend::forms::Screen;
use backend::{AppCmd, AppEvent};
use config::AppConfig;
use dioxus::prelude::*;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};

const SESSION_CHECK_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[layout(NavComponent)]
    #[redirect("/", || Route::LoginComponent {})]
    #[route("/login")]
    LoginComponent {},
    #[route("/register")]
    RegisterComponent {},
    #[route("/home")]
    HomeComponent {},
    #[route("/sentiment")]
    SentimentComponent {},
}

impl From<Screen> for Route {
    fn from(screen: Screen) -> Self {
        match screen {
            Screen::Login => Route::LoginComponent {},
            Screen::Register => Route::RegisterComponent {},
            Screen::Home => Route::HomeComponent {},
            Screen::Sentiment => Route::SentimentComponent {},
        }
    }
}

fn main() {
    let config = AppConfig::from_env();
    if let Err(e) = dioxus::logger::init(config.log_level) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}

#[component]
fn App() -> Element {
    let config = use_context::<AppConfig>();
    let mut app_state = AppState::new();
    use_context_provider(|| app_state);

    let cmd_tx = use_hook(|| {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<AppCmd>();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

        spawn(backend::init(config, cmd_rx, event_tx));
        spawn(async move {
            while let Some(event) = event_rx.recv().await {
                app_state.apply_event(event);
            }
        });
        spawn(async move {
            loop {
                #[cfg(not(target_arch = "wasm32"))]
                tokio::time::sleep(SESSION_CHECK_INTERVAL).await;
                #[cfg(target_arch = "wasm32")]
                gloo_timers::future::sleep(SESSION_CHECK_INTERVAL).await;
                app_state.expire_session(chrono::Utc::now());
            }
        });

        cmd_tx
    });
    use_context_provider::<UnboundedSender<AppCmd>>(|| cmd_tx);

    rsx! {
        document::Stylesheet {href: asset!("/assets/main.css")}
        Router::<Route> {}
    }
}

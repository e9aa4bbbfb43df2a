use dioxus::prelude::*;
use crate::Route;

#[component]
pub fn NavComponent() -> Element {
    let mut app_state = use_context::<crate::components::AppState>();
    let mut notice = app_state.notice;
    let mut navigate_to = app_state.navigate_to;

    // Screens reached from backend outcomes
    use_effect(move || {
        if let Some(screen) = navigate_to() {
            navigator().push(Route::from(screen));
            navigate_to.set(None);
        }
    });

    let account = app_state.session.read().as_ref().map(|s| s.user.email.clone());

    rsx! {
        div { class: "min-h-screen flex flex-col",
            nav { class: "nav-bar",
                div { class: "page-container",
                    div { class: "nav-logo",
                        span { class: "logo-text", "K-LegiSight" }
                    }

                    div { class: "nav-links",
                        Link {
                            to: Route::HomeComponent {},
                            class: "nav-link",
                            active_class: "active",
                            "홈"
                        }
                        Link {
                            to: Route::SentimentComponent {},
                            class: "nav-link",
                            active_class: "active",
                            "법안 분석"
                        }
                        if let Some(email) = account {
                            span { class: "nav-account", "{email}" }
                            button {
                                class: "btn btn-secondary btn-sm",
                                onclick: move |_| app_state.sign_out(),
                                "로그아웃"
                            }
                        } else {
                            Link {
                                to: Route::LoginComponent {},
                                class: "nav-link",
                                active_class: "active",
                                "로그인"
                            }
                            Link {
                                to: Route::RegisterComponent {},
                                class: "nav-link",
                                active_class: "active",
                                "회원가입"
                            }
                        }
                    }
                }
            }

            div { class: "fixed-header-spacer" }

            if let Some(message) = notice() {
                div { class: "page-container",
                    div { class: "flash-notice",
                        span { "{message}" }
                        button {
                            class: "btn btn-ghost btn-sm",
                            onclick: move |_| notice.set(None),
                            "✕"
                        }
                    }
                }
            }

            div { class: "flex-1",
                Outlet::<Route> {}
            }
        }
    }
}

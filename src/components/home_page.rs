use dioxus::prelude::*;
use crate::Route;

#[component]
pub fn HomeComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let greeting = match app_state.session.read().as_ref() {
        Some(session) => {
            let name = session.user.full_name.clone().unwrap_or_else(|| session.user.email.clone());
            format!("{}님, 환영합니다", name)
        }
        None => "환영합니다".to_string(),
    };

    rsx! {
        div { class: "page-container py-8 animate-fade-in",
            div { class: "page-header",
                h1 { class: "page-title", "K-LegiSight" }
                p { class: "text-muted", "{greeting}" }
            }

            div { class: "panel",
                div { class: "panel-header",
                    h2 { class: "panel-title", "의원별 법안 분석" }
                }
                p { class: "text-muted mb-4",
                    "회의록 발언을 바탕으로 국회의원의 법안 협력 성향을 AI로 분석합니다."
                }
                Link { to: Route::SentimentComponent {}, class: "btn btn-primary", "분석 시작하기" }
            }
        }
    }
}

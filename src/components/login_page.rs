use dioxus::core::use_drop;
use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedSender;
use crate::backend::{dispatch_sign_in, AppCmd};
use crate::components::common::PasswordField;
use crate::Route;

#[component]
pub fn LoginComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();
    let mut login_form = app_state.login_form;

    use_drop(move || login_form.write().abandon());

    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        if let Err(e) = dispatch_sign_in(&mut login_form.write(), &cmd_tx) {
            tracing::warn!("Sign-in not started: {}", e);
        }
    };

    let form = login_form.read().clone();
    let submitting = form.phase().is_submitting();

    rsx! {
        div { class: "page-container auth-page animate-fade-in",
            div { class: "panel auth-panel",
                div { class: "panel-header",
                    h1 { class: "page-title", "로그인" }
                    p { class: "text-muted", "K-LegiSight 계정으로 로그인하세요" }
                }

                form { onsubmit: on_submit,
                    div { class: "form-group",
                        label { class: "form-label", "이메일" }
                        input {
                            class: "input",
                            r#type: "email",
                            placeholder: "name@example.com",
                            value: "{form.email}",
                            required: true,
                            oninput: move |e| login_form.write().set_email(e.value())
                        }
                    }
                    PasswordField {
                        label: "비밀번호",
                        value: form.password.clone(),
                        input_type: form.password_input_type(),
                        placeholder: "비밀번호를 입력하세요",
                        oninput: move |v| login_form.write().set_password(v),
                        ontoggle: move |_| login_form.write().toggle_password(),
                    }

                    if let Some(message) = form.phase().message() {
                        div { class: "form-error", "{message}" }
                    }

                    button {
                        class: "btn btn-primary w-full",
                        r#type: "submit",
                        disabled: submitting,
                        if submitting { "로그인 중..." } else { "로그인" }
                    }
                }

                p { class: "auth-switch",
                    "계정이 없으신가요? "
                    Link { to: Route::RegisterComponent {}, class: "link", "회원가입" }
                }
            }
        }
    }
}

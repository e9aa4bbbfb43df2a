use dioxus::core::use_drop;
use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedSender;
use crate::backend::{dispatch_sign_up, AppCmd};
use crate::components::common::PasswordField;
use crate::Route;

#[component]
pub fn RegisterComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();
    let mut register_form = app_state.register_form;

    use_drop(move || register_form.write().abandon());

    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        // A mismatch is already shown on the form
        if let Err(e) = dispatch_sign_up(&mut register_form.write(), &cmd_tx) {
            tracing::debug!("Sign-up not started: {}", e);
        }
    };

    let form = register_form.read().clone();
    let submitting = form.phase().is_submitting();

    rsx! {
        div { class: "page-container auth-page animate-fade-in",
            div { class: "panel auth-panel",
                div { class: "panel-header",
                    h1 { class: "page-title", "회원가입" }
                    p { class: "text-muted", "새 계정을 만드세요" }
                }

                form { onsubmit: on_submit,
                    div { class: "form-group",
                        label { class: "form-label", "이름" }
                        input {
                            class: "input",
                            placeholder: "홍길동",
                            value: "{form.full_name}",
                            required: true,
                            oninput: move |e| register_form.write().set_full_name(e.value())
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", "이메일" }
                        input {
                            class: "input",
                            r#type: "email",
                            placeholder: "name@example.com",
                            value: "{form.email}",
                            required: true,
                            oninput: move |e| register_form.write().set_email(e.value())
                        }
                    }
                    PasswordField {
                        label: "비밀번호",
                        value: form.password.clone(),
                        input_type: form.password_input_type(),
                        placeholder: "비밀번호를 입력하세요",
                        oninput: move |v| register_form.write().set_password(v),
                        ontoggle: move |_| register_form.write().toggle_password(),
                    }
                    PasswordField {
                        label: "비밀번호 확인",
                        value: form.confirm_password.clone(),
                        input_type: form.confirm_input_type(),
                        placeholder: "비밀번호를 다시 입력하세요",
                        oninput: move |v| register_form.write().set_confirm_password(v),
                        ontoggle: move |_| register_form.write().toggle_confirm_password(),
                    }

                    if let Some(message) = form.phase().message() {
                        div { class: "form-error", "{message}" }
                    }

                    button {
                        class: "btn btn-primary w-full",
                        r#type: "submit",
                        disabled: submitting,
                        if submitting { "처리 중..." } else { "회원가입" }
                    }
                }

                p { class: "auth-switch",
                    "이미 계정이 있으신가요? "
                    Link { to: Route::LoginComponent {}, class: "link", "로그인" }
                }
            }
        }
    }
}

use dioxus::prelude::*;
use crate::backend::filters::SelectOption;

#[component]
pub fn FilterItem(label: String, children: Element) -> Element {
    rsx! {
        div { class: "form-group",
            label { class: "form-label", "{label}" }
            {children}
        }
    }
}

/// A labelled `<select>` over option-table entries. The value is the option code.
#[component]
pub fn SelectField(
    label: String,
    options: Vec<SelectOption>,
    value: String,
    onchange: EventHandler<String>,
    #[props(default)] disabled: bool,
) -> Element {
    rsx! {
        FilterItem { label,
            select {
                class: "input",
                disabled,
                value: "{value}",
                onchange: move |e| onchange.call(e.value()),
                for opt in options.iter() {
                    option {
                        key: "{opt.value}",
                        value: "{opt.value}",
                        selected: opt.value == value,
                        "{opt.label}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn PasswordField(
    label: String,
    value: String,
    input_type: &'static str,
    placeholder: String,
    oninput: EventHandler<String>,
    ontoggle: EventHandler<()>,
) -> Element {
    let toggle_label = if input_type == "password" { "보기" } else { "숨기기" };

    rsx! {
        div { class: "form-group",
            label { class: "form-label", "{label}" }
            div { class: "password-field",
                input {
                    class: "input",
                    r#type: input_type,
                    placeholder: "{placeholder}",
                    value: "{value}",
                    required: true,
                    oninput: move |e| oninput.call(e.value())
                }
                button {
                    class: "btn btn-ghost btn-sm",
                    r#type: "button",
                    onclick: move |_| ontoggle.call(()),
                    "{toggle_label}"
                }
            }
        }
    }
}

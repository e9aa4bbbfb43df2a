use dioxus::core::use_drop;
use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedSender;
use crate::backend::filters::{
    AgeBand, Choice, Committee, ElectionCount, ElectionMethod, FieldName, Gender, Party, SelectOption,
    CURRENT_TERM,
};
use crate::backend::{dispatch_analysis, AppCmd};
use crate::components::common::{FilterItem, SelectField};
use crate::components::results::ResultsComponent;

#[component]
pub fn SentimentComponent() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let cmd_tx = use_context::<UnboundedSender<AppCmd>>();
    let mut search_panel = app_state.search_panel;

    // Leaving the page drops any analysis still in flight
    use_drop(move || search_panel.write().abandon());

    let mut set_field = move |field: FieldName, value: String| {
        if let Err(e) = search_panel.write().set_field(field, &value) {
            tracing::warn!("Rejected filter value: {}", e);
        }
    };

    let on_analyze = move |_| {
        if let Err(e) = dispatch_analysis(&mut search_panel.write(), &cmd_tx) {
            tracing::warn!("Analysis not started: {}", e);
        }
    };

    let panel = search_panel.read();
    let filters = &panel.filters;
    let pending = panel.is_pending();
    let error = panel.error().map(str::to_string);
    let view = panel.view().clone();
    let term_options = vec![SelectOption::new(CURRENT_TERM.to_string(), format!("제{}대", CURRENT_TERM))];
    let province_options = filters.region.province_options();
    let district_options = filters.region.district_options();
    let province_value = filters.value_of(FieldName::Province);
    let district_value = filters.value_of(FieldName::District);
    let member_name = filters.member_name.clone();
    let target_bill = filters.target_bill.clone();

    rsx! {
        div { class: "page-container py-8 animate-fade-in",

            // Header
            div { class: "page-header",
                h1 { class: "page-title", "의원별 법안 분석" }
            }

            div { class: "panel mb-6",
                div { class: "filter-grid",
                    SelectField {
                        label: "대수",
                        options: term_options,
                        value: filters.value_of(FieldName::Term),
                        onchange: move |v| set_field(FieldName::Term, v),
                    }
                    FilterItem { label: "의원명",
                        input {
                            class: "input",
                            placeholder: "이름 입력",
                            value: "{member_name}",
                            oninput: move |e| set_field(FieldName::MemberName, e.value())
                        }
                    }
                    SelectField {
                        label: "정당",
                        options: Party::options(),
                        value: filters.value_of(FieldName::Party),
                        onchange: move |v| set_field(FieldName::Party, v),
                    }
                    SelectField {
                        label: "위원회",
                        options: Committee::options(),
                        value: filters.value_of(FieldName::Committee),
                        onchange: move |v| set_field(FieldName::Committee, v),
                    }
                    FilterItem { label: "지역선거구",
                        div { class: "region-pair",
                            select {
                                class: "input",
                                value: province_value.clone(),
                                onchange: move |e| set_field(FieldName::Province, e.value()),
                                for opt in province_options.iter() {
                                    option {
                                        key: "{opt.value}",
                                        value: "{opt.value}",
                                        selected: opt.value == province_value,
                                        "{opt.label}"
                                    }
                                }
                            }
                            select {
                                class: "input",
                                value: district_value.clone(),
                                disabled: district_options.len() <= 1,
                                onchange: move |e| set_field(FieldName::District, e.value()),
                                for opt in district_options.iter() {
                                    option {
                                        key: "{opt.value}",
                                        value: "{opt.value}",
                                        selected: opt.value == district_value,
                                        "{opt.label}"
                                    }
                                }
                            }
                        }
                    }
                    SelectField {
                        label: "성별",
                        options: Gender::options(),
                        value: filters.value_of(FieldName::Gender),
                        onchange: move |v| set_field(FieldName::Gender, v),
                    }
                    SelectField {
                        label: "연령",
                        options: AgeBand::options(),
                        value: filters.value_of(FieldName::AgeBand),
                        onchange: move |v| set_field(FieldName::AgeBand, v),
                    }
                    SelectField {
                        label: "당선횟수",
                        options: ElectionCount::options(),
                        value: filters.value_of(FieldName::ElectionCount),
                        onchange: move |v| set_field(FieldName::ElectionCount, v),
                    }
                    SelectField {
                        label: "당선방법",
                        options: ElectionMethod::options(),
                        value: filters.value_of(FieldName::ElectionMethod),
                        onchange: move |v| set_field(FieldName::ElectionMethod, v),
                    }
                }

                div { class: "bill-input",
                    label { class: "form-label", "대상 법안" }
                    input {
                        class: "input",
                        placeholder: "분석하고 싶은 법안명을 입력하세요 (예: 인공지능 산업 육성법)",
                        value: "{target_bill}",
                        oninput: move |e| set_field(FieldName::TargetBill, e.value())
                    }
                }

                if let Some(message) = error {
                    div { class: "form-error", "{message}" }
                }

                div { class: "flex justify-center gap-2 pt-4",
                    button {
                        class: "btn btn-primary btn-lg",
                        disabled: pending,
                        onclick: on_analyze,
                        if pending { "분석 중..." } else { "AI 분석 시작" }
                    }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| search_panel.write().reset(),
                        "초기화"
                    }
                }
            }

            ResultsComponent { view }
        }
    }
}

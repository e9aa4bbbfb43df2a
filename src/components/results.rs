use dioxus::prelude::*;
use crate::backend::analysis::{AnalysisRecord, Sentiment};
use crate::backend::panel::ResultView;

#[component]
pub fn ResultsComponent(view: ResultView) -> Element {
    match view {
        ResultView::NotYetSearched => rsx! {
            div { class: "empty-state results-placeholder",
                div { class: "empty-state-icon", "🔍" }
                p { class: "empty-state-text", "검색 조건을 입력하고 \"AI 분석 시작\" 버튼을 눌러주세요." }
            }
        },
        ResultView::HasResults(records) => {
            let count = records.len();
            rsx! {
                div { class: "results animate-fade-in",
                    div { class: "flex justify-between items-center mb-4",
                        h2 { class: "panel-title", "AI 분석 결과 ({count}건)" }
                        span { class: "badge badge-outline", "AI Model v2.0" }
                    }

                    if records.is_empty() {
                        div { class: "empty-state py-12",
                            p { class: "empty-state-title", "검색 결과가 없습니다." }
                        }
                    } else {
                        div { class: "results-list",
                            for record in records.iter() {
                                ResultCard { key: "{record.id}", record: record.clone() }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ResultCard(record: AnalysisRecord) -> Element {
    let band = record.band();
    let party_class = record.party_class();
    let sentiment = record.sentiment.as_ref().map_or("-", Sentiment::label);
    let badge_class = band.map_or("badge band-none", |b| b.badge_class());
    let text_class = band.map_or("score-text band-none", |b| b.text_class());
    let bar_class = band.map_or("score-bar band-none", |b| b.bar_class());
    let score_text = record.score.map_or_else(|| "-".to_string(), |s| format!("{}/100", s));
    let width = record.score.unwrap_or(0);

    rsx! {
        div { class: "panel result-card",
            // Member
            div { class: "result-member",
                div { class: "avatar",
                    img { src: "{record.portrait_url}", alt: "{record.name}" }
                }
                div {
                    h3 { class: "result-name", "{record.name}" }
                    div { class: "result-meta",
                        span { class: "{party_class}", "{record.party}" }
                        span { "{record.region}" }
                    }
                }
            }

            // Bill and score
            div { class: "result-analysis",
                div { class: "flex justify-between items-center mb-4",
                    div {
                        span { class: "result-caption", "TARGET BILL" }
                        div { class: "result-bill", "{record.bill}" }
                    }
                    span { class: badge_class, "{sentiment}" }
                }
                div { class: "flex justify-between text-sm",
                    span { class: "text-muted", "AI 협력 지수 (Cooperation Score)" }
                    span { class: text_class, "{score_text}" }
                }
                div { class: "score-track",
                    div { class: bar_class, style: "width: {width}%;" }
                }
                p { class: "result-footnote", "* 회의록 발언 기반 감성 분석 결과" }
            }
        }
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::filters::{
    AgeBand, Choice, Committee, ElectionCount, ElectionMethod, FilterState, Gender, Party,
};

/// Bill label used when the target bill field is left empty.
pub const DEFAULT_BILL: &str = "AI 기본법";

/// Scores at or above this are shown as cooperative.
pub const HIGH_SCORE: u8 = 70;
/// Scores at or below this are shown as non-cooperative.
pub const LOW_SCORE: u8 = 30;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Analysis request failed: {0}")]
    Transport(String),

    #[error("Analysis service returned an error: {0}")]
    Backend(String),

    #[error("Analysis response was malformed: {0}")]
    Malformed(String),

    #[error("Analysis timed out")]
    TimedOut,
}

impl From<reqwest::Error> for AnalysisError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            AnalysisError::Malformed(error.to_string())
        } else {
            AnalysisError::Transport(error.to_string())
        }
    }
}

/// Snapshot of the filter panel taken when "AI 분석 시작" is pressed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryIntent {
    pub term: u8,
    pub member_name: Option<String>,
    pub party: Option<Party>,
    pub committee: Option<Committee>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub gender: Option<Gender>,
    pub age_band: Option<AgeBand>,
    pub election_count: Option<ElectionCount>,
    pub election_method: Option<ElectionMethod>,
    pub target_bill: String,
}

impl QueryIntent {
    pub fn from_filters(filters: &FilterState) -> Self {
        let member_name = filters.member_name.trim();
        Self {
            term: filters.term,
            member_name: (!member_name.is_empty()).then(|| member_name.to_string()),
            party: filters.party,
            committee: filters.committee,
            province: filters.region.province().map(str::to_string),
            district: filters.region.district().map(str::to_string),
            gender: filters.gender,
            age_band: filters.age_band,
            election_count: filters.election_count,
            election_method: filters.election_method,
            target_bill: filters.target_bill.clone(),
        }
    }

    /// The bill under analysis, `DEFAULT_BILL` when none was typed.
    pub fn bill_label(&self) -> &str {
        let bill = self.target_bill.trim();
        if bill.is_empty() {
            DEFAULT_BILL
        } else {
            bill
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "협력")]
    Cooperative,
    #[serde(rename = "중립")]
    Neutral,
    #[serde(rename = "비협력")]
    NonCooperative,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Cooperative => "협력",
            Sentiment::Neutral => "중립",
            Sentiment::NonCooperative => "비협력",
        }
    }

    pub fn from_score(score: u8) -> Self {
        match ScoreBand::of(score) {
            ScoreBand::High => Sentiment::Cooperative,
            ScoreBand::Neutral => Sentiment::Neutral,
            ScoreBand::Low => Sentiment::NonCooperative,
        }
    }
}

/// Emphasis band of a cooperation score. The badge, the score text and the
/// bar all take their colour from this one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Neutral,
    Low,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        if score >= HIGH_SCORE {
            ScoreBand::High
        } else if score <= LOW_SCORE {
            ScoreBand::Low
        } else {
            ScoreBand::Neutral
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            ScoreBand::High => "badge band-high",
            ScoreBand::Neutral => "badge band-neutral",
            ScoreBand::Low => "badge band-low",
        }
    }

    pub fn text_class(&self) -> &'static str {
        match self {
            ScoreBand::High => "score-text band-high",
            ScoreBand::Neutral => "score-text band-neutral",
            ScoreBand::Low => "score-text band-low",
        }
    }

    pub fn bar_class(&self) -> &'static str {
        match self {
            ScoreBand::High => "score-bar band-high",
            ScoreBand::Neutral => "score-bar band-neutral",
            ScoreBand::Low => "score-bar band-low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: u64,
    pub name: String,
    pub party: String,
    pub region: String,
    #[serde(rename = "img")]
    pub portrait_url: String,
    pub bill: String,
    /// `None` until the member's speeches have been scored.
    pub sentiment: Option<Sentiment>,
    pub score: Option<u8>,
}

impl AnalysisRecord {
    pub fn band(&self) -> Option<ScoreBand> {
        self.score.map(ScoreBand::of)
    }

    pub fn party_class(&self) -> &'static str {
        match self.party.as_str() {
            "더불어민주당" => "party party-blue",
            "국민의힘" => "party party-red",
            _ => "party party-slate",
        }
    }
}

/// Whatever turns a `QueryIntent` into result rows.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AnalysisService {
    async fn analyze(&self, intent: &QueryIntent) -> Result<Vec<AnalysisRecord>, AnalysisError>;
}

/// Fixed sample rows, used until an analysis API is configured.
#[derive(Debug, Default)]
pub struct MockAnalysis;

impl MockAnalysis {
    pub fn records(intent: &QueryIntent) -> Vec<AnalysisRecord> {
        let bill = intent.bill_label();
        let row = |id: u64, name: &str, party: &str, region: &str, seed: &str, score: u8| AnalysisRecord {
            id,
            name: name.to_string(),
            party: party.to_string(),
            region: region.to_string(),
            portrait_url: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", seed),
            bill: bill.to_string(),
            sentiment: Some(Sentiment::from_score(score)),
            score: Some(score),
        };
        vec![
            row(1, "김철수 (Kim Chul-soo)", "더불어민주당", "서울 종로구", "Felix", 85),
            row(2, "이영희 (Lee Young-hee)", "국민의힘", "부산 해운대구갑", "Aneka", 24),
            row(3, "박민수 (Park Min-soo)", "조국혁신당", "비례대표", "John", 52),
        ]
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AnalysisService for MockAnalysis {
    async fn analyze(&self, intent: &QueryIntent) -> Result<Vec<AnalysisRecord>, AnalysisError> {
        Ok(Self::records(intent))
    }
}

/// Body of `POST /api/search`.
#[derive(Debug, Serialize)]
struct SearchInput<'a> {
    r#type: &'static str,
    query: Option<&'a str>,
    committee: Option<&'static str>,
    filters: BTreeMap<&'static str, String>,
}

impl<'a> SearchInput<'a> {
    fn from_intent(intent: &'a QueryIntent) -> Self {
        let mut filters = BTreeMap::new();
        filters.insert("term", intent.term.to_string());
        filters.insert("bill", intent.bill_label().to_string());
        let mut put = |key: &'static str, value: Option<&str>| {
            if let Some(v) = value {
                filters.insert(key, v.to_string());
            }
        };
        put("committee", intent.committee.map(|c| c.value()));
        put("party", intent.party.map(|p| p.label()));
        put("province", intent.province.as_deref());
        put("district", intent.district.as_deref());
        put("gender", intent.gender.map(|g| g.value()));
        put("age", intent.age_band.map(|a| a.value()));
        put("count", intent.election_count.map(|c| c.value()));
        put("method", intent.election_method.map(|m| m.value()));

        Self {
            r#type: "sentiment",
            query: intent.member_name.as_deref(),
            committee: intent.committee.map(|c| c.value()),
            filters,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchRow>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchRow {
    id: u64,
    name: Option<String>,
    party: Option<String>,
    region: Option<String>,
    #[serde(default)]
    img: Option<String>,
    #[serde(default)]
    bill: Option<String>,
    #[serde(default)]
    sentiment: Option<Sentiment>,
    #[serde(default)]
    score: Option<u8>,
}

impl SearchRow {
    fn into_record(self, intent: &QueryIntent) -> Result<AnalysisRecord, AnalysisError> {
        if let Some(score) = self.score.filter(|s| *s > 100) {
            return Err(AnalysisError::Malformed(format!("row {} has score {}", self.id, score)));
        }
        if self.score.is_none() {
            tracing::debug!("Row {} has no score yet", self.id);
        }
        Ok(AnalysisRecord {
            id: self.id,
            name: self.name.unwrap_or_default(),
            party: self.party.unwrap_or_default(),
            region: self.region.unwrap_or_else(|| "비례대표".to_string()),
            portrait_url: self.img.unwrap_or_default(),
            bill: self.bill.unwrap_or_else(|| intent.bill_label().to_string()),
            sentiment: self.sentiment.or_else(|| self.score.map(Sentiment::from_score)),
            score: self.score,
        })
    }
}

/// Client for the K-LegiSight search API.
#[derive(Debug, Clone)]
pub struct ApiAnalysis {
    client: reqwest::Client,
    base_url: String,
}

impl ApiAnalysis {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn parse_response(body: SearchResponse, intent: &QueryIntent) -> Result<Vec<AnalysisRecord>, AnalysisError> {
        if let Some(message) = &body.message {
            tracing::debug!("Search API says: {}", message);
        }
        // one bad row fails the whole batch
        body.results.into_iter().map(|row| row.into_record(intent)).collect()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AnalysisService for ApiAnalysis {
    async fn analyze(&self, intent: &QueryIntent) -> Result<Vec<AnalysisRecord>, AnalysisError> {
        let url = format!("{}/api/search", self.base_url);
        let resp = self.client.post(&url).json(&SearchInput::from_intent(intent)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            #[derive(Deserialize)]
            struct Detail {
                detail: String,
            }
            let text = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<Detail>(&text).map(|d| d.detail).unwrap_or(text);
            return Err(AnalysisError::Backend(format!("{}: {}", status, detail)));
        }

        let body = resp.json::<SearchResponse>().await?;
        Self::parse_response(body, intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::catalog::RegionCatalog;
    use crate::backend::filters::FieldName;

    fn intent_with_bill(bill: &str) -> QueryIntent {
        let mut filters = FilterState::new(RegionCatalog::builtin());
        filters.set_field(FieldName::TargetBill, bill).unwrap();
        QueryIntent::from_filters(&filters)
    }

    #[test]
    fn test_score_band_thresholds() {
        assert_eq!(ScoreBand::of(100), ScoreBand::High);
        assert_eq!(ScoreBand::of(70), ScoreBand::High);
        assert_eq!(ScoreBand::of(69), ScoreBand::Neutral);
        assert_eq!(ScoreBand::of(31), ScoreBand::Neutral);
        assert_eq!(ScoreBand::of(30), ScoreBand::Low);
        assert_eq!(ScoreBand::of(0), ScoreBand::Low);
    }

    #[test]
    fn test_badge_and_bar_share_band() {
        for score in [0u8, 30, 31, 50, 69, 70, 100] {
            let band = ScoreBand::of(score);
            let tone = band.badge_class().rsplit(' ').next().unwrap();
            assert!(band.bar_class().ends_with(tone));
            assert!(band.text_class().ends_with(tone));
        }
    }

    #[test]
    fn test_party_colours() {
        let records = MockAnalysis::records(&intent_with_bill(""));
        let classes: Vec<&str> = records.iter().map(|r| r.party_class()).collect();
        assert_eq!(classes, vec!["party party-blue", "party party-red", "party party-slate"]);
    }

    #[tokio::test]
    async fn test_mock_returns_three_banded_records() {
        let records = MockAnalysis.analyze(&intent_with_bill("AI 기본법")).await.unwrap();
        let scores: Vec<Option<u8>> = records.iter().map(|r| r.score).collect();
        let sentiments: Vec<Option<Sentiment>> = records.iter().map(|r| r.sentiment).collect();
        assert_eq!(scores, vec![Some(85), Some(24), Some(52)]);
        assert_eq!(
            sentiments,
            vec![Some(Sentiment::Cooperative), Some(Sentiment::NonCooperative), Some(Sentiment::Neutral)]
        );
        assert_eq!(records[0].region, "서울 종로구");
    }

    #[tokio::test]
    async fn test_empty_bill_uses_default_label() {
        let records = MockAnalysis.analyze(&intent_with_bill("")).await.unwrap();
        assert!(records.iter().all(|r| r.bill == DEFAULT_BILL));

        let records = MockAnalysis.analyze(&intent_with_bill("   ")).await.unwrap();
        assert!(records.iter().all(|r| r.bill == DEFAULT_BILL));

        let records = MockAnalysis.analyze(&intent_with_bill("데이터 보호법")).await.unwrap();
        assert!(records.iter().all(|r| r.bill == "데이터 보호법"));
    }

    #[test]
    fn test_intent_snapshots_filters() {
        let mut filters = FilterState::new(RegionCatalog::builtin());
        filters.set_field(FieldName::MemberName, "  ").unwrap();
        filters.set_field(FieldName::Province, "광주").unwrap();
        filters.set_field(FieldName::District, "광주 북구갑").unwrap();
        let intent = QueryIntent::from_filters(&filters);

        filters.set_field(FieldName::Province, "대전").unwrap();
        assert_eq!(intent.member_name, None);
        assert_eq!(intent.province.as_deref(), Some("광주"));
        assert_eq!(intent.district.as_deref(), Some("광주 북구갑"));
    }

    #[test]
    fn test_search_input_body() {
        let mut filters = FilterState::new(RegionCatalog::builtin());
        filters.set_field(FieldName::MemberName, "김철수").unwrap();
        filters.set_field(FieldName::Committee, "10").unwrap();
        filters.set_field(FieldName::Party, "101").unwrap();
        let intent = QueryIntent::from_filters(&filters);

        let body = serde_json::to_value(SearchInput::from_intent(&intent)).unwrap();
        assert_eq!(body["type"], "sentiment");
        assert_eq!(body["query"], "김철수");
        assert_eq!(body["committee"], "10");
        assert_eq!(body["filters"]["party"], "더불어민주당");
        assert_eq!(body["filters"]["bill"], DEFAULT_BILL);
        assert!(body["filters"].get("gender").is_none());
    }

    #[test]
    fn test_parse_search_response() {
        let intent = intent_with_bill("");
        let body: SearchResponse = serde_json::from_str(
            r#"{
                "results": [
                    {"id": 7, "name": "홍길동", "party": "정의당", "region": "서울 마포구을", "img": "", "score": 71},
                    {"id": 8, "name": "김영수", "party": "무소속", "region": null, "score": 12, "sentiment": "비협력"}
                ],
                "total_count": 2,
                "message": "성공적으로 조회되었습니다."
            }"#,
        )
        .unwrap();

        let records = ApiAnalysis::parse_response(body, &intent).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sentiment, Some(Sentiment::Cooperative));
        assert_eq!(records[0].bill, DEFAULT_BILL);
        assert_eq!(records[1].region, "비례대표");
        assert_eq!(records[1].sentiment, Some(Sentiment::NonCooperative));
    }

    #[test]
    fn test_member_rows_without_score_are_kept() {
        let intent = intent_with_bill("AI 기본법");
        let body: SearchResponse = serde_json::from_str(
            r#"{
                "results": [
                    {"id": 1, "name": "홍길동", "party": "정의당", "committee": "교육위원회",
                     "region": "서울 마포구을", "img": "", "gender": "남", "count": "초선", "method": "지역구"}
                ],
                "total_count": 1,
                "message": "성공적으로 조회되었습니다."
            }"#,
        )
        .unwrap();

        let records = ApiAnalysis::parse_response(body, &intent).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "홍길동");
        assert_eq!(records[0].region, "서울 마포구을");
        assert_eq!(records[0].bill, "AI 기본법");
        assert_eq!(records[0].score, None);
        assert_eq!(records[0].sentiment, None);
        assert_eq!(records[0].band(), None);
    }

    #[test]
    fn test_out_of_range_score_fails_batch() {
        let intent = intent_with_bill("");
        let body: SearchResponse = serde_json::from_str(
            r#"{"results": [{"id": 1, "name": "a", "party": "b", "region": "c", "score": 50},
                            {"id": 2, "name": "d", "party": "e", "region": "f", "score": 180}]}"#,
        )
        .unwrap();
        assert!(matches!(
            ApiAnalysis::parse_response(body, &intent),
            Err(AnalysisError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_result_set_is_ok() {
        let intent = intent_with_bill("");
        let body: SearchResponse =
            serde_json::from_str(r#"{"results": [], "total_count": 0, "message": "검색 결과가 없습니다."}"#).unwrap();
        assert_eq!(ApiAnalysis::parse_response(body, &intent), Ok(vec![]));
    }
}

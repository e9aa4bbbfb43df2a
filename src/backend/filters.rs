use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use super::catalog::{RegionCatalog, ALL};

pub const ALL_LABEL: &str = "전체";

/// The only assembly term the analysis data covers.
pub const CURRENT_TERM: u8 = 21;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unknown option {value:?} for {field:?}")]
    UnknownOption { field: FieldName, value: String },

    #[error("District {district:?} does not belong to the selected province")]
    DistrictNotInProvince { district: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }

    pub fn all() -> Self {
        Self::new(ALL, ALL_LABEL)
    }
}

/// A closed set of values a `<select>` offers, next to the "전체" sentinel.
pub trait Choice: Copy + PartialEq + 'static {
    const VARIANTS: &'static [Self];

    fn value(&self) -> &'static str;
    fn label(&self) -> &'static str;

    /// `Some(None)` for the sentinel, `None` for a value outside the table.
    fn parse(value: &str) -> Option<Option<Self>> {
        if value == ALL || value.is_empty() {
            return Some(None);
        }
        Self::VARIANTS.iter().copied().find(|c| c.value() == value).map(Some)
    }

    fn options() -> Vec<SelectOption> {
        std::iter::once(SelectOption::all())
            .chain(Self::VARIANTS.iter().map(|c| SelectOption::new(c.value(), c.label())))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Party {
    pub code: &'static str,
    pub name: &'static str,
}

const fn party(code: &'static str, name: &'static str) -> Party {
    Party { code, name }
}

pub const PARTIES: &[Party] = &[
    party("100", "무소속"),
    party("101", "더불어민주당"),
    party("102", "더불어시민당"),
    party("103", "열린민주당"),
    party("104", "미래통합당"),
    party("105", "미래한국당"),
    party("106", "국민의힘"),
    party("107", "정의당"),
    party("108", "국민의당"),
    party("109", "새로운미래"),
    party("110", "개혁신당"),
    party("111", "조국혁신당"),
    party("112", "자유통일당"),
    party("113", "기본소득당"),
    party("114", "진보당"),
    party("115", "시대전환"),
];

impl Choice for Party {
    const VARIANTS: &'static [Self] = PARTIES;

    fn value(&self) -> &'static str {
        self.code
    }

    fn label(&self) -> &'static str {
        self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Committee {
    pub code: &'static str,
    pub name: &'static str,
}

const fn committee(code: &'static str, name: &'static str) -> Committee {
    Committee { code, name }
}

pub const COMMITTEES: &[Committee] = &[
    committee("1", "과학기술정보방송통신위원회"),
    committee("2", "교육위원회"),
    committee("3", "국방위원회"),
    committee("4", "국토교통위원회"),
    committee("5", "국회운영위원회"),
    committee("6", "기획재정위원회"),
    committee("7", "농림축산식품해양수산위원회"),
    committee("8", "문화체육관광위원회"),
    committee("9", "법제사법위원회"),
    committee("10", "보건복지위원회"),
    committee("11", "산업통상자원중소벤처기업위원회"),
    committee("12", "여성가족위원회"),
    committee("13", "연금개혁특별위원회"),
    committee("14", "예산결산특별위원회"),
    committee("15", "외교통일위원회"),
    committee("16", "윤리특별위원회"),
    committee("17", "정무위원회"),
    committee("18", "정보위원회"),
    committee("19", "정치개혁특별위원회"),
    committee("20", "첨단전략산업특별위원회"),
    committee("21", "행정안전위원회"),
    committee("22", "환경노동위원회"),
    committee("23", "인구위기특별위원회"),
    committee("24", "기후위기특별위원회"),
];

impl Choice for Committee {
    const VARIANTS: &'static [Self] = COMMITTEES;

    fn value(&self) -> &'static str {
        self.code
    }

    fn label(&self) -> &'static str {
        self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
}

impl Choice for Gender {
    const VARIANTS: &'static [Self] = &[Gender::Male, Gender::Female];

    fn value(&self) -> &'static str {
        match self {
            Gender::Male => "m",
            Gender::Female => "f",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Gender::Male => "남",
            Gender::Female => "여",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeBand {
    #[serde(rename = "u30")]
    Under30,
    #[serde(rename = "u40")]
    Thirties,
    #[serde(rename = "u50")]
    Forties,
    #[serde(rename = "u60")]
    Fifties,
    #[serde(rename = "u70")]
    Sixties,
    #[serde(rename = "o70")]
    SeventyPlus,
}

impl Choice for AgeBand {
    const VARIANTS: &'static [Self] = &[
        AgeBand::Under30,
        AgeBand::Thirties,
        AgeBand::Forties,
        AgeBand::Fifties,
        AgeBand::Sixties,
        AgeBand::SeventyPlus,
    ];

    fn value(&self) -> &'static str {
        match self {
            AgeBand::Under30 => "u30",
            AgeBand::Thirties => "u40",
            AgeBand::Forties => "u50",
            AgeBand::Fifties => "u60",
            AgeBand::Sixties => "u70",
            AgeBand::SeventyPlus => "o70",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AgeBand::Under30 => "30세미만",
            AgeBand::Thirties => "30세",
            AgeBand::Forties => "40세",
            AgeBand::Fifties => "50세",
            AgeBand::Sixties => "60세",
            AgeBand::SeventyPlus => "70세이상",
        }
    }
}

/// Number of times elected, 1 (초선) through 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ElectionCount(u8);

const ELECTION_COUNT_LABELS: [&str; 10] =
    ["초선", "재선", "3선", "4선", "5선", "6선", "7선", "8선", "9선", "10선"];

impl Choice for ElectionCount {
    const VARIANTS: &'static [Self] = &[
        ElectionCount(1),
        ElectionCount(2),
        ElectionCount(3),
        ElectionCount(4),
        ElectionCount(5),
        ElectionCount(6),
        ElectionCount(7),
        ElectionCount(8),
        ElectionCount(9),
        ElectionCount(10),
    ];

    // the form posts the label itself
    fn value(&self) -> &'static str {
        self.label()
    }

    fn label(&self) -> &'static str {
        ELECTION_COUNT_LABELS[usize::from(self.0 - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElectionMethod {
    #[serde(rename = "지역구")]
    District,
    #[serde(rename = "비례대표")]
    Proportional,
}

impl Choice for ElectionMethod {
    const VARIANTS: &'static [Self] = &[ElectionMethod::District, ElectionMethod::Proportional];

    fn value(&self) -> &'static str {
        self.label()
    }

    fn label(&self) -> &'static str {
        match self {
            ElectionMethod::District => "지역구",
            ElectionMethod::Proportional => "비례대표",
        }
    }
}

/// Province → district pair of selectors.
///
/// Changing the province always puts the district back on "전체"; the old
/// district is never carried over, even when the same province is picked again.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCascade {
    catalog: Arc<RegionCatalog>,
    province: Option<String>,
    district: Option<String>,
}

impl RegionCascade {
    pub fn new(catalog: Arc<RegionCatalog>) -> Self {
        Self { catalog, province: None, district: None }
    }

    pub fn province(&self) -> Option<&str> {
        self.province.as_deref()
    }

    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    /// Unknown names select "전체".
    pub fn select_province(&mut self, value: &str) {
        self.province = if self.catalog.contains_province(value) {
            Some(value.to_string())
        } else {
            if value != ALL {
                tracing::warn!("Unknown province {:?}, falling back to 전체", value);
            }
            None
        };
        self.district = None;
    }

    pub fn select_district(&mut self, value: &str) -> Result<(), FilterError> {
        if value == ALL {
            self.district = None;
            return Ok(());
        }
        let belongs = self
            .province
            .as_deref()
            .and_then(|p| self.catalog.districts(p))
            .is_some_and(|ds| ds.iter().any(|d| d == value));
        if !belongs {
            return Err(FilterError::DistrictNotInProvince { district: value.to_string() });
        }
        self.district = Some(value.to_string());
        Ok(())
    }

    pub fn province_options(&self) -> Vec<SelectOption> {
        std::iter::once(SelectOption::all())
            .chain(self.catalog.provinces().map(|p| SelectOption::new(p, p)))
            .collect()
    }

    /// "전체" followed by the selected province's districts; "전체" alone when no province is picked.
    pub fn district_options(&self) -> Vec<SelectOption> {
        let districts = self
            .province
            .as_deref()
            .and_then(|p| self.catalog.districts(p))
            .unwrap_or(&[]);
        std::iter::once(SelectOption::all())
            .chain(districts.iter().map(|d| SelectOption::new(d.as_str(), d.as_str())))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Term,
    MemberName,
    Party,
    Committee,
    Province,
    District,
    Gender,
    AgeBand,
    ElectionCount,
    ElectionMethod,
    TargetBill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub term: u8,
    pub member_name: String,
    pub party: Option<Party>,
    pub committee: Option<Committee>,
    pub region: RegionCascade,
    pub gender: Option<Gender>,
    pub age_band: Option<AgeBand>,
    pub election_count: Option<ElectionCount>,
    pub election_method: Option<ElectionMethod>,
    pub target_bill: String,
}

impl FilterState {
    pub fn new(catalog: Arc<RegionCatalog>) -> Self {
        Self {
            term: CURRENT_TERM,
            member_name: String::new(),
            party: None,
            committee: None,
            region: RegionCascade::new(catalog),
            gender: None,
            age_band: None,
            election_count: None,
            election_method: None,
            target_bill: String::new(),
        }
    }

    /// Sets one field from its form value. Only a province change touches another field.
    pub fn set_field(&mut self, field: FieldName, value: &str) -> Result<(), FilterError> {
        let unknown = || FilterError::UnknownOption { field, value: value.to_string() };
        match field {
            FieldName::Term => {
                self.term = match value.parse::<u8>() {
                    Ok(CURRENT_TERM) => CURRENT_TERM,
                    _ => return Err(unknown()),
                };
            }
            FieldName::MemberName => self.member_name = value.to_string(),
            FieldName::Party => self.party = Party::parse(value).ok_or_else(unknown)?,
            FieldName::Committee => self.committee = Committee::parse(value).ok_or_else(unknown)?,
            FieldName::Province => self.region.select_province(value),
            FieldName::District => self.region.select_district(value)?,
            FieldName::Gender => self.gender = Gender::parse(value).ok_or_else(unknown)?,
            FieldName::AgeBand => self.age_band = AgeBand::parse(value).ok_or_else(unknown)?,
            FieldName::ElectionCount => {
                self.election_count = ElectionCount::parse(value).ok_or_else(unknown)?
            }
            FieldName::ElectionMethod => {
                self.election_method = ElectionMethod::parse(value).ok_or_else(unknown)?
            }
            FieldName::TargetBill => self.target_bill = value.to_string(),
        }
        tracing::debug!("Filter {:?} set to {:?}", field, value);
        Ok(())
    }

    /// Current form value of a field, "all" for unset selectors.
    pub fn value_of(&self, field: FieldName) -> String {
        fn choice<C: Choice>(c: Option<C>) -> String {
            c.map(|c| c.value()).unwrap_or(ALL).to_string()
        }
        match field {
            FieldName::Term => self.term.to_string(),
            FieldName::MemberName => self.member_name.clone(),
            FieldName::Party => choice(self.party),
            FieldName::Committee => choice(self.committee),
            FieldName::Province => self.region.province().unwrap_or(ALL).to_string(),
            FieldName::District => self.region.district().unwrap_or(ALL).to_string(),
            FieldName::Gender => choice(self.gender),
            FieldName::AgeBand => choice(self.age_band),
            FieldName::ElectionCount => choice(self.election_count),
            FieldName::ElectionMethod => choice(self.election_method),
            FieldName::TargetBill => self.target_bill.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> FilterState {
        FilterState::new(RegionCatalog::builtin())
    }

    #[test]
    fn test_district_options_follow_catalog_order() {
        let catalog = RegionCatalog::builtin();
        let mut cascade = RegionCascade::new(catalog.clone());
        for province in catalog.provinces() {
            cascade.select_province(province);
            let options = cascade.district_options();
            assert_eq!(options[0], SelectOption::all());
            let listed: Vec<&str> = options[1..].iter().map(|o| o.value.as_str()).collect();
            let stored: Vec<&str> = catalog.districts(province).unwrap().iter().map(|d| d.as_str()).collect();
            assert_eq!(listed, stored, "district list for {}", province);
        }
    }

    #[test]
    fn test_seoul_lists_jongno() {
        let mut cascade = RegionCascade::new(RegionCatalog::builtin());
        cascade.select_province("서울");
        assert!(cascade.district_options().iter().any(|o| o.label.contains("종로구")));
    }

    #[test]
    fn test_all_province_lists_only_sentinel() {
        let mut cascade = RegionCascade::new(RegionCatalog::builtin());
        assert_eq!(cascade.district_options(), vec![SelectOption::all()]);

        cascade.select_province("서울");
        cascade.select_province(ALL);
        assert_eq!(cascade.province(), None);
        assert_eq!(cascade.district_options(), vec![SelectOption::all()]);
    }

    #[test]
    fn test_unknown_province_is_treated_as_all() {
        let mut cascade = RegionCascade::new(RegionCatalog::builtin());
        cascade.select_province("평양");
        assert_eq!(cascade.province(), None);
        assert_eq!(cascade.district_options(), vec![SelectOption::all()]);
    }

    #[test]
    fn test_province_change_resets_district() {
        let mut cascade = RegionCascade::new(RegionCatalog::builtin());
        cascade.select_province("서울");
        cascade.select_district("서울 종로구").unwrap();
        assert_eq!(cascade.district(), Some("서울 종로구"));

        cascade.select_province("부산");
        assert_eq!(cascade.district(), None);

        // re-selecting the same province resets as well
        cascade.select_district("부산 수영구").unwrap();
        cascade.select_province("부산");
        assert_eq!(cascade.district(), None);
    }

    #[test]
    fn test_district_must_belong_to_province() {
        let mut cascade = RegionCascade::new(RegionCatalog::builtin());
        assert!(cascade.select_district("서울 종로구").is_err());

        cascade.select_province("부산");
        let err = cascade.select_district("서울 종로구").unwrap_err();
        assert_eq!(err, FilterError::DistrictNotInProvince { district: "서울 종로구".into() });
        assert_eq!(cascade.district(), None);
    }

    #[test]
    fn test_province_options_start_with_all() {
        let cascade = RegionCascade::new(RegionCatalog::builtin());
        let options = cascade.province_options();
        assert_eq!(options.len(), 18);
        assert_eq!(options[0].label, ALL_LABEL);
        assert_eq!(options[1].value, "서울");
    }

    #[test]
    fn test_set_field_parses_choices() {
        let mut filters = state();
        filters.set_field(FieldName::Party, "106").unwrap();
        filters.set_field(FieldName::Committee, "9").unwrap();
        filters.set_field(FieldName::Gender, "f").unwrap();
        filters.set_field(FieldName::AgeBand, "o70").unwrap();
        filters.set_field(FieldName::ElectionCount, "재선").unwrap();
        filters.set_field(FieldName::ElectionMethod, "비례대표").unwrap();

        assert_eq!(filters.party.map(|p| p.name), Some("국민의힘"));
        assert_eq!(filters.committee.map(|c| c.name), Some("법제사법위원회"));
        assert_eq!(filters.gender, Some(Gender::Female));
        assert_eq!(filters.age_band, Some(AgeBand::SeventyPlus));
        assert_eq!(filters.election_count, Some(ElectionCount(2)));
        assert_eq!(filters.election_method, Some(ElectionMethod::Proportional));

        filters.set_field(FieldName::Party, ALL).unwrap();
        assert_eq!(filters.party, None);
    }

    #[test]
    fn test_set_field_rejects_unknown_codes() {
        let mut filters = state();
        filters.set_field(FieldName::Gender, "m").unwrap();
        let err = filters.set_field(FieldName::Gender, "x").unwrap_err();
        assert_eq!(err, FilterError::UnknownOption { field: FieldName::Gender, value: "x".into() });
        assert_eq!(filters.gender, Some(Gender::Male));

        assert!(filters.set_field(FieldName::Term, "20").is_err());
        assert_eq!(filters.term, CURRENT_TERM);
    }

    #[test]
    fn test_set_field_leaves_other_fields_alone() {
        let mut filters = state();
        filters.set_field(FieldName::Province, "서울").unwrap();
        filters.set_field(FieldName::District, "서울 용산구").unwrap();
        filters.set_field(FieldName::Party, "101").unwrap();

        let before = filters.clone();
        filters.set_field(FieldName::MemberName, "김철수").unwrap();
        filters.set_field(FieldName::TargetBill, "데이터 보호법").unwrap();

        assert_eq!(filters.region, before.region);
        assert_eq!(filters.party, before.party);
        assert_eq!(filters.member_name, "김철수");
        assert_eq!(filters.target_bill, "데이터 보호법");
    }

    #[test]
    fn test_value_of_round_trips_form_values() {
        let mut filters = state();
        assert_eq!(filters.value_of(FieldName::Party), ALL);
        assert_eq!(filters.value_of(FieldName::Term), "21");

        filters.set_field(FieldName::ElectionCount, "10선").unwrap();
        filters.set_field(FieldName::Province, "제주").unwrap();
        assert_eq!(filters.value_of(FieldName::ElectionCount), "10선");
        assert_eq!(filters.value_of(FieldName::Province), "제주");
        assert_eq!(filters.value_of(FieldName::District), ALL);
    }

    #[test]
    fn test_choice_options() {
        let options = ElectionCount::options();
        assert_eq!(options.len(), 11);
        assert_eq!(options[1].label, "초선");
        assert_eq!(options[10].label, "10선");
        assert_eq!(Party::options().len(), PARTIES.len() + 1);
        assert!(ElectionCount::parse("11선").is_none());
        assert_eq!(ElectionCount::parse(ALL), Some(None));
        assert_eq!(ElectionCount::parse("3선"), Some(Some(ElectionCount(3))));
    }
}

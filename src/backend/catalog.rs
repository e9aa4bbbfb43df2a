use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Sentinel value shared by every "전체" option.
pub const ALL: &str = "all";

const BUILTIN_REGIONS: &str = include_str!("../../assets/regions.json");

static BUILTIN: Lazy<Arc<RegionCatalog>> = Lazy::new(|| {
    match RegionCatalog::from_json(BUILTIN_REGIONS) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            tracing::error!("Failed to load built-in region catalog: {}", e);
            Arc::new(RegionCatalog::default())
        }
    }
});

#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("Region catalog is not valid JSON: {0}")]
    Parse(String),

    #[error("Province listed twice: {0}")]
    DuplicateProvince(String),

    #[error("\"{0}\" is reserved for the 전체 option")]
    ReservedName(String),

    #[error("District {district} listed twice (in {province})")]
    DuplicateDistrict { province: String, district: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Province {
    #[serde(rename = "province")]
    pub name: String,
    pub districts: Vec<String>,
}

/// Read-only province → districts table. Order is the order of the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionCatalog {
    provinces: Vec<Province>,
}

impl RegionCatalog {
    /// The catalog shipped in `assets/regions.json`, parsed on first use.
    pub fn builtin() -> Arc<RegionCatalog> {
        BUILTIN.clone()
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let provinces: Vec<Province> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(provinces)
    }

    pub fn new(provinces: Vec<Province>) -> Result<Self, CatalogError> {
        let mut seen_provinces = HashSet::new();
        let mut seen_districts = HashSet::new();
        for province in &provinces {
            if province.name == ALL {
                return Err(CatalogError::ReservedName(province.name.clone()));
            }
            if !seen_provinces.insert(province.name.as_str()) {
                return Err(CatalogError::DuplicateProvince(province.name.clone()));
            }
            // a district belongs to exactly one province
            for district in &province.districts {
                if !seen_districts.insert(district.as_str()) {
                    return Err(CatalogError::DuplicateDistrict {
                        province: province.name.clone(),
                        district: district.clone(),
                    });
                }
            }
        }
        Ok(Self { provinces })
    }

    pub fn provinces(&self) -> impl Iterator<Item = &str> {
        self.provinces.iter().map(|p| p.name.as_str())
    }

    pub fn contains_province(&self, name: &str) -> bool {
        self.provinces.iter().any(|p| p.name == name)
    }

    /// Districts of `province` in stored order, `None` if the province is unknown.
    pub fn districts(&self, province: &str) -> Option<&[String]> {
        self.provinces
            .iter()
            .find(|p| p.name == province)
            .map(|p| p.districts.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = RegionCatalog::builtin();
        assert_eq!(catalog.provinces().count(), 17);
        assert_eq!(catalog.provinces().next(), Some("서울"));
        assert_eq!(catalog.provinces().last(), Some("세종"));

        let total: usize = catalog
            .provinces()
            .map(|p| catalog.districts(p).map(|d| d.len()).unwrap_or(0))
            .sum();
        assert_eq!(total, 253);
    }

    #[test]
    fn test_districts_keep_stored_order() {
        let catalog = RegionCatalog::builtin();
        let jeju = catalog.districts("제주").unwrap();
        assert_eq!(jeju, &["제주 제주시갑", "제주 제주시을", "제주 서귀포시"]);
        assert!(catalog.districts("평양").is_none());
    }

    #[test]
    fn test_rejects_district_in_two_provinces() {
        let json = r#"[
            {"province": "A", "districts": ["x", "y"]},
            {"province": "B", "districts": ["y"]}
        ]"#;
        assert_eq!(
            RegionCatalog::from_json(json),
            Err(CatalogError::DuplicateDistrict { province: "B".into(), district: "y".into() })
        );
    }

    #[test]
    fn test_rejects_duplicate_province_and_sentinel_name() {
        let dup = r#"[{"province": "A", "districts": []}, {"province": "A", "districts": []}]"#;
        assert_eq!(RegionCatalog::from_json(dup), Err(CatalogError::DuplicateProvince("A".into())));

        let sentinel = r#"[{"province": "all", "districts": []}]"#;
        assert_eq!(RegionCatalog::from_json(sentinel), Err(CatalogError::ReservedName("all".into())));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(RegionCatalog::from_json("{"), Err(CatalogError::Parse(_))));
    }
}

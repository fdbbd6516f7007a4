//! Filter State
//!
//! 상권 0~1개 + 업종(전체 10종 또는 단일) 선택 상태와 캐시 키 파생

use serde::{Deserialize, Serialize};

use crate::config::FOOD10;
use crate::error::DashboardError;
use crate::models::AreaCode;

/// 업종 선택: 전체 10종 또는 단일 업종
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum CategorySelection {
    All,
    Single(String),
}

impl CategorySelection {
    /// 목록 형태의 업종 선택을 해석합니다.
    ///
    /// 빈 목록이나 10종 전체와 같은 집합이면 `All`, 정확히 1개면 `Single`,
    /// 그 외 부분집합은 지원하지 않습니다.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, DashboardError> {
        let mut sorted: Vec<&str> = names.iter().map(|n| n.as_ref().trim()).collect();
        sorted.sort_unstable();
        sorted.dedup();

        if sorted.is_empty() || is_full_category_set(&sorted) {
            return Ok(CategorySelection::All);
        }
        if sorted.len() == 1 {
            return CategorySelection::single(sorted[0]);
        }
        Err(DashboardError::InvalidSelection(format!(
            "Category selection must be all {} categories or exactly one, got {}",
            FOOD10.len(),
            sorted.len()
        )))
    }

    /// 단일 업종 선택 (10종 목록에 없는 이름은 거부)
    pub fn single(name: &str) -> Result<Self, DashboardError> {
        let name = name.trim();
        if !FOOD10.contains(&name) {
            return Err(DashboardError::CategoryNotFound(name.to_string()));
        }
        Ok(CategorySelection::Single(name.to_string()))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategorySelection::All)
    }

    /// 조회에 넘길 업종 이름 목록
    pub fn names(&self) -> Vec<String> {
        match self {
            CategorySelection::All => all_categories(),
            CategorySelection::Single(name) => vec![name.clone()],
        }
    }
}

/// 10종 전체 업종 이름
pub fn all_categories() -> Vec<String> {
    FOOD10.iter().map(|s| s.to_string()).collect()
}

fn is_full_category_set(sorted_unique: &[&str]) -> bool {
    if sorted_unique.len() != FOOD10.len() {
        return false;
    }
    let mut all: Vec<&str> = FOOD10.to_vec();
    all.sort_unstable();
    all == sorted_unique
}

/// 현재 필터 선택
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    pub area: Option<AreaCode>,
    pub categories: CategorySelection,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            area: None,
            categories: CategorySelection::All,
        }
    }
}

impl FilterSelection {
    pub fn new(area: Option<AreaCode>, categories: CategorySelection) -> Self {
        Self { area, categories }
    }

    /// 목록 형태 입력에서 필터 구성 (상권은 최대 1개)
    pub fn from_lists<S: AsRef<str>>(
        areas: &[AreaCode],
        categories: &[S],
    ) -> Result<Self, DashboardError> {
        let mut areas = areas.to_vec();
        areas.sort_unstable();
        areas.dedup();
        if areas.len() > 1 {
            return Err(DashboardError::InvalidSelection(format!(
                "At most one area may be selected, got {}",
                areas.len()
            )));
        }

        Ok(Self {
            area: areas.first().copied(),
            categories: CategorySelection::from_names(categories)?,
        })
    }

    pub fn area_selected(&self) -> bool {
        self.area.is_some()
    }

    pub fn categories_are_all(&self) -> bool {
        self.categories.is_all()
    }

    /// 조회에 넘길 상권 목록 (미선택이면 None = 제한 없음)
    pub fn area_codes(&self) -> Option<Vec<AreaCode>> {
        self.area.map(|code| vec![code])
    }

    pub fn cache_key(&self) -> FilterKey {
        FilterKey::new(self.area_codes().as_deref(), &self.categories.names())
    }
}

/// 정렬된 (상권 코드, 업종 이름) 튜플
///
/// 같은 논리적 선택이면 입력 순서와 관계없이 같은 키가 됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterKey {
    pub areas: Vec<AreaCode>,
    pub categories: Vec<String>,
}

impl FilterKey {
    pub fn new<S: AsRef<str>>(areas: Option<&[AreaCode]>, categories: &[S]) -> Self {
        let mut areas = areas.map(|a| a.to_vec()).unwrap_or_default();
        areas.sort_unstable();
        areas.dedup();

        let mut categories: Vec<String> =
            categories.iter().map(|c| c.as_ref().to_string()).collect();
        categories.sort();
        categories.dedup();

        Self { areas, categories }
    }
}

//! Catalog Commands
//!
//! 필터 선택지(상권, 업종, 보고 기간) 조회

use serde::Serialize;

use super::AppState;
use crate::data::DataSource;
use crate::error::CommandResult;
use crate::models::AreaCode;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaOption {
    pub code: AreaCode,
    /// "상권이름 (구 동)"
    pub label: String,
    pub name: String,
    pub has_coordinates: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub areas: Vec<AreaOption>,
    pub categories: Vec<String>,
    pub period: String,
    pub map_enabled: bool,
}

/// 필터 선택지 조회
pub fn get_filter_options<S: DataSource>(state: &AppState<S>) -> CommandResult<FilterOptions> {
    let areas = state
        .source
        .areas()?
        .into_iter()
        .map(|area| AreaOption {
            code: area.code,
            label: area.label(),
            has_coordinates: area.coordinates().is_some(),
            name: area.name,
        })
        .collect();

    Ok(FilterOptions {
        areas,
        categories: state.source.categories()?,
        period: state.source.period().label(),
        map_enabled: state.map.has_key(),
    })
}

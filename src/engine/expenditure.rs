//! Expenditure Panel
//!
//! 상권이 속한 행정동의 총지출/음식지출

use serde::{Deserialize, Serialize};

use super::population::area_pool;
use super::stats::mean;
use crate::data::DataSource;
use crate::error::DashboardError;
use crate::filter::FilterSelection;
use crate::models::{AreaChoice, AreaCode, AreaDong, Panel, Placeholder};

/// 지출 막대 데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureBars {
    pub title: String,
    /// 단일 동 집계일 때만 존재 (평균이면 None)
    pub dong_name: Option<String>,
    pub total: f64,
    pub food: f64,
}

impl ExpenditureBars {
    pub fn is_average(&self) -> bool {
        self.dong_name.is_none()
    }
}

/// 필터 기준 지출 패널
///
/// 상권 선택 시 그 상권의 동, 아니면 활성 상권 집합의 동별 합계 평균.
pub fn expenditure<S: DataSource + ?Sized>(
    source: &S,
    filter: &FilterSelection,
) -> Result<Panel<ExpenditureBars>, DashboardError> {
    match filter.area {
        Some(area) => expenditure_for_areas(source, &[area], None),
        None => {
            let pool = area_pool(source, filter)?;
            pool_average(source, &pool)
        }
    }
}

/// 상권 집합의 지출
///
/// 상권들이 2개 이상의 동에 걸치면 `chosen` 으로 하나를 고르기 전까지
/// `AmbiguousDong` 으로 후보 상권 목록을 돌려줍니다. `chosen` 은 `areas` 에 있어야 합니다.
pub fn expenditure_for_areas<S: DataSource + ?Sized>(
    source: &S,
    areas: &[AreaCode],
    chosen: Option<AreaCode>,
) -> Result<Panel<ExpenditureBars>, DashboardError> {
    if let Some(choice) = chosen {
        if !areas.contains(&choice) {
            return Err(DashboardError::InvalidSelection(format!(
                "Chosen area {} is not part of the selection",
                choice
            )));
        }
    }

    let mapping = source.area_dong_map()?;
    let picked: Vec<&AreaDong> = mapping
        .iter()
        .filter(|m| match chosen {
            Some(choice) => m.area_code == choice,
            None => areas.contains(&m.area_code),
        })
        .collect();
    if picked.is_empty() {
        return Ok(Panel::no_data());
    }

    let mut dongs: Vec<&str> = picked.iter().filter_map(|m| m.dong_code.as_deref()).collect();
    dongs.sort_unstable();
    dongs.dedup();

    if dongs.len() > 1 {
        let choices = picked
            .iter()
            .map(|m| AreaChoice {
                area_code: m.area_code,
                area_name: m.area_name.clone(),
                dong_name: m.dong_name.clone(),
            })
            .collect();
        tracing::debug!(dongs = dongs.len(), "expenditure scope spans several dongs");
        return Ok(Panel::Placeholder(Placeholder::AmbiguousDong { choices }));
    }

    let Some(dong_code) = dongs.first() else {
        return Ok(Panel::no_data());
    };

    let rows: Vec<_> = source
        .expenditure_by_dong()?
        .into_iter()
        .filter(|row| row.dong_code == *dong_code)
        .collect();
    if rows.is_empty() {
        return Ok(Panel::no_data());
    }

    let dong_name = picked
        .iter()
        .find_map(|m| m.dong_name.clone())
        .unwrap_or_else(|| rows[0].dong_name.clone());
    let period = source.period().label();

    Ok(Panel::Ready(ExpenditureBars {
        title: format!("{} — {} 지출", dong_name, period),
        dong_name: Some(dong_name),
        total: rows.iter().map(|r| r.total_expenditure).sum(),
        food: rows.iter().map(|r| r.food_expenditure).sum(),
    }))
}

/// 상권 집합이 속한 동들의 동별 합계를 평균
fn pool_average<S: DataSource + ?Sized>(
    source: &S,
    pool: &[AreaCode],
) -> Result<Panel<ExpenditureBars>, DashboardError> {
    if pool.is_empty() {
        return Ok(Panel::no_data());
    }

    let mut dongs: Vec<String> = source
        .area_dong_map()?
        .into_iter()
        .filter(|m| pool.contains(&m.area_code))
        .filter_map(|m| m.dong_code)
        .collect();
    dongs.sort_unstable();
    dongs.dedup();

    let mut totals: Vec<(String, f64, f64)> = Vec::new();
    for row in source.expenditure_by_dong()? {
        if !dongs.contains(&row.dong_code) {
            continue;
        }
        match totals.iter_mut().find(|(code, _, _)| *code == row.dong_code) {
            Some((_, total, food)) => {
                *total += row.total_expenditure;
                *food += row.food_expenditure;
            }
            None => totals.push((row.dong_code, row.total_expenditure, row.food_expenditure)),
        }
    }

    let total_values: Vec<f64> = totals.iter().map(|(_, t, _)| *t).collect();
    let food_values: Vec<f64> = totals.iter().map(|(_, _, f)| *f).collect();
    match (mean(&total_values), mean(&food_values)) {
        (Some(total), Some(food)) => Ok(Panel::Ready(ExpenditureBars {
            title: format!(
                "해당 업종 보유 상권의 소속 동 평균 지출 ({})",
                source.period().label()
            ),
            dong_name: None,
            total,
            food,
        })),
        _ => Ok(Panel::no_data()),
    }
}

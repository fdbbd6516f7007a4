//! Population Panels
//!
//! 유동인구 구성비, 시간대 곡선, 상주/직장 인구

use serde::{Deserialize, Serialize};

use super::stats::{column_means, percentage_shares};
use crate::data::DataSource;
use crate::error::DashboardError;
use crate::filter::FilterSelection;
use crate::models::{AreaCode, Panel, Placeholder};

/// 인구/지출 패널이 집계하는 상권 범위
///
/// 상권을 선택했으면 그 상권 하나, 아니면 현재 업종 필터의 매출 조회에
/// 나타나는 상권 전체 (활성 상권 집합).
pub fn area_pool<S: DataSource + ?Sized>(
    source: &S,
    filter: &FilterSelection,
) -> Result<Vec<AreaCode>, DashboardError> {
    if let Some(area) = filter.area {
        return Ok(vec![area]);
    }

    let mut codes: Vec<AreaCode> = source
        .sales_by_area(None, &filter.categories.names())?
        .into_iter()
        .map(|row| row.area_code)
        .collect();
    codes.sort_unstable();
    codes.dedup();
    Ok(codes)
}

/// 요일/성별 유동인구 구성비(%)
///
/// 합계가 0 인 쪽은 `None` 이고, 나머지 한쪽은 그대로 표시됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub weekday_shares: Option<Vec<f64>>,
    pub gender_shares: Option<Vec<f64>>,
}

/// 시간대별 평균 유동인구
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeCurve {
    pub values: [f64; 6],
}

/// 상주/직장 인구 평균
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentWorkerBars {
    pub resident: f64,
    pub worker: f64,
}

/// 범위 내 상권의 유동인구 평균 (요일 7, 시간대 6, 성별 2)
struct FloatingMeans {
    weekday: [f64; 7],
    time_slots: [f64; 6],
    gender: [f64; 2],
}

fn floating_means<S: DataSource + ?Sized>(
    source: &S,
    pool: &[AreaCode],
) -> Result<Option<FloatingMeans>, DashboardError> {
    if pool.is_empty() {
        return Ok(None);
    }

    let rows: Vec<_> = source
        .floating_population(Some(pool))?
        .into_iter()
        .filter(|row| pool.contains(&row.area_code))
        .collect();

    let weekday = column_means(rows.iter().map(|r| &r.weekday));
    let time_slots = column_means(rows.iter().map(|r| &r.time_slots));
    let gender = column_means(rows.iter().map(|r| &r.gender));

    Ok(match (weekday, time_slots, gender) {
        (Some(weekday), Some(time_slots), Some(gender)) => Some(FloatingMeans {
            weekday,
            time_slots,
            gender,
        }),
        _ => None,
    })
}

/// 요일/성별 구성비
///
/// 상권별 평균을 먼저 구한 뒤 그룹 합계 대비 비중을 계산합니다.
pub fn composition<S: DataSource + ?Sized>(
    source: &S,
    filter: &FilterSelection,
) -> Result<Panel<Composition>, DashboardError> {
    let pool = area_pool(source, filter)?;
    let Some(means) = floating_means(source, &pool)? else {
        tracing::debug!(pool = pool.len(), "composition has no floating population rows");
        return Ok(Panel::no_data());
    };

    let weekday_shares = percentage_shares(&means.weekday);
    let gender_shares = percentage_shares(&means.gender);
    if weekday_shares.is_none() && gender_shares.is_none() {
        tracing::debug!("composition totals are zero");
        return Ok(Panel::Placeholder(Placeholder::ZeroTotal));
    }

    Ok(Panel::Ready(Composition {
        weekday_shares,
        gender_shares,
    }))
}

/// 시간대별 유동인구 곡선
pub fn time_curve<S: DataSource + ?Sized>(
    source: &S,
    filter: &FilterSelection,
) -> Result<Panel<TimeCurve>, DashboardError> {
    let pool = area_pool(source, filter)?;
    match floating_means(source, &pool)? {
        Some(means) => Ok(Panel::Ready(TimeCurve {
            values: means.time_slots,
        })),
        None => Ok(Panel::no_data()),
    }
}

/// 상주/직장 인구 막대
pub fn resident_worker<S: DataSource + ?Sized>(
    source: &S,
    filter: &FilterSelection,
) -> Result<Panel<ResidentWorkerBars>, DashboardError> {
    let pool = area_pool(source, filter)?;
    if pool.is_empty() {
        return Ok(Panel::no_data());
    }

    let pairs: Vec<[f64; 2]> = source
        .resident_worker(Some(&pool[..]))?
        .into_iter()
        .filter(|row| pool.contains(&row.area_code))
        .map(|row| [row.resident, row.worker])
        .collect();

    match column_means(pairs.iter()) {
        Some([resident, worker]) => Ok(Panel::Ready(ResidentWorkerBars { resident, worker })),
        None => Ok(Panel::no_data()),
    }
}

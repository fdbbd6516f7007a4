//! Recommendation Selection
//!
//! 상권 하나 또는 업종 하나를 기준으로 점포당 평균 매출 순위와
//! 고객/유동인구 차트를 만드는 단발성 분석.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::charts::map::{MapEmbed, MapRenderer};
use crate::charts::{self, ChartSpec, TimeCurveStyle};
use crate::config::{CATEGORY_TIME_TOP_N, RECOMMEND_TOP_N, SMALL_CHART_HEIGHT};
use crate::data::DataSource;
use crate::engine::stats::{column_means, per_shop_average};
use crate::error::DashboardError;
use crate::filter::{all_categories, CategorySelection};
use crate::models::{AgeSales, Area, AreaCode, DemographicScope, GenderSales, Panel, SalesShopRow};

/// 분석 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode", content = "target")]
pub enum AnalyzeCommand {
    /// 상권 → 추천 업종
    Area(AreaCode),
    /// 업종 → 추천 상권
    Category(String),
}

/// 순위 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: usize,
    /// 업종 이름 (상권 분석) 또는 상권 이름 (업종 분석)
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_code: Option<AreaCode>,
    pub total_sales: i64,
    pub shop_count: i64,
    /// 점포당 평균 매출, 점포가 없으면 None
    pub avg_sales: Option<i64>,
    pub gu: Option<String>,
    pub dong: Option<String>,
}

/// 순위 기준 이름
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankSubject {
    Category,
    Area,
}

/// 점포당 평균 매출 내림차순 정렬
///
/// 안정 정렬이라 같은 평균은 입력 순서를 유지하고, 평균이 없는 행은 맨 뒤로 갑니다.
pub fn rank_by_per_shop(rows: &[SalesShopRow], subject: RankSubject) -> Vec<RankedEntry> {
    let mut scored: Vec<(&SalesShopRow, Option<i64>)> = rows
        .iter()
        .map(|row| (row, per_shop_average(row.total_sales, row.shop_count)))
        .collect();

    scored.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (row, avg_sales))| {
            let (name, area_code) = match subject {
                RankSubject::Category => (row.category.clone(), None),
                RankSubject::Area => (row.area_name.clone(), Some(row.area_code)),
            };
            RankedEntry {
                rank: idx + 1,
                name,
                area_code,
                total_sales: row.total_sales,
                shop_count: row.shop_count,
                avg_sales,
                gu: row.gu.clone(),
                dong: row.dong.clone(),
            }
        })
        .collect()
}

static AGE_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("TEENS", "10대"),
        ("TWENTIES", "20대"),
        ("THIRTIES", "30대"),
        ("FORTIES", "40대"),
        ("FIFTIES", "50대"),
        ("SIXTIES_PLUS", "60대+"),
        ("10s", "10대"),
        ("20s", "20대"),
        ("30s", "30대"),
        ("40s", "40대"),
        ("50s", "50대"),
        ("60s", "60대+"),
        ("10", "10대"),
        ("20", "20대"),
        ("30", "30대"),
        ("40", "40대"),
        ("50", "50대"),
        ("60", "60대+"),
        ("10대", "10대"),
        ("20대", "20대"),
        ("30대", "30대"),
        ("40대", "40대"),
        ("50대", "50대"),
        ("60대", "60대+"),
        ("60대+", "60대+"),
    ]
    .into_iter()
    .collect()
});

const AGE_ORDER: [&str; 6] = ["10대", "20대", "30대", "40대", "50대", "60대+"];

/// 연령 코드를 10대…60대+ 로 맞추고 합친 뒤 연령 순으로 정렬
///
/// 모르는 코드는 그대로 두고 맨 뒤에 붙입니다.
pub fn normalize_age(rows: &[AgeSales]) -> Vec<(String, f64)> {
    let mut merged: Vec<(String, f64)> = Vec::new();
    for row in rows {
        let code = row.age.trim();
        let label = AGE_LABELS.get(code).copied().unwrap_or(code);
        match merged.iter_mut().find(|(l, _)| l == label) {
            Some((_, sales)) => *sales += row.sales as f64,
            None => merged.push((label.to_string(), row.sales as f64)),
        }
    }

    let order = |label: &str| {
        AGE_ORDER
            .iter()
            .position(|a| *a == label)
            .unwrap_or(AGE_ORDER.len())
    };
    merged.sort_by_key(|(label, _)| order(label));
    merged
}

/// 성별 코드 M/F 를 남성/여성으로 바꾸고 합친 뒤 남성, 여성 순으로 정렬
pub fn normalize_sex(rows: &[GenderSales]) -> Vec<(String, f64)> {
    let mut merged: Vec<(String, f64)> = Vec::new();
    for row in rows {
        let code = row.sex.trim();
        let label = match code {
            "M" => "남성",
            "F" => "여성",
            other => other,
        };
        match merged.iter_mut().find(|(l, _)| l == label) {
            Some((_, sales)) => *sales += row.sales as f64,
            None => merged.push((label.to_string(), row.sales as f64)),
        }
    }

    merged.sort_by_key(|(label, _)| match label.as_str() {
        "남성" => 0,
        "여성" => 1,
        _ => 2,
    });
    merged
}

/// 상권 분석 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaReport {
    pub area: Area,
    pub label: String,
    /// 추천 업종 상위 5개
    pub recommendations: Vec<RankedEntry>,
    pub gender_sales: Panel<ChartSpec>,
    pub age_sales: Panel<ChartSpec>,
    pub weekday_population: Panel<ChartSpec>,
    pub gender_population: Panel<ChartSpec>,
    pub time_curve: Panel<ChartSpec>,
    pub map: Panel<MapEmbed>,
}

/// 업종 분석 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    pub category: String,
    /// 추천 상권 상위 5개
    pub recommendations: Vec<RankedEntry>,
    pub gender_sales: Panel<ChartSpec>,
    pub age_sales: Panel<ChartSpec>,
    /// 매출 상위 상권들의 시간대별 유동인구 평균
    pub time_curve: Panel<ChartSpec>,
    /// 시간대 평균에 쓰인 상권 이름 (매출 순)
    pub time_curve_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum AnalysisReport {
    Area(AreaReport),
    Category(CategoryReport),
}

/// 단발성 분석 실행
pub fn analyze<S: DataSource + ?Sized>(
    source: &S,
    command: &AnalyzeCommand,
    map: &MapRenderer,
) -> Result<AnalysisReport, DashboardError> {
    match command {
        AnalyzeCommand::Area(code) => analyze_area(source, *code, map).map(AnalysisReport::Area),
        AnalyzeCommand::Category(name) => {
            analyze_category(source, name).map(AnalysisReport::Category)
        }
    }
}

/// 상권 → 추천 업종
pub fn analyze_area<S: DataSource + ?Sized>(
    source: &S,
    code: AreaCode,
    map: &MapRenderer,
) -> Result<AreaReport, DashboardError> {
    let area = source.area(code)?.ok_or(DashboardError::AreaNotFound(code))?;

    let rows = source.category_sales_in_area(code, &all_categories())?;
    let mut recommendations = rank_by_per_shop(&rows, RankSubject::Category);
    recommendations.truncate(RECOMMEND_TOP_N);

    let scope = DemographicScope::Area(code);
    let gender_sales = demographic_panel(
        normalize_sex(&source.gender_sales(&scope)?),
        charts::gender_sales_pie,
    );
    let age_sales = demographic_panel(
        normalize_age(&source.age_sales(&scope)?),
        charts::age_sales_bar,
    );

    let codes = [code];
    let floating = source.floating_population(Some(&codes[..]))?;
    let population = floating.first();
    let weekday_population = match population {
        Some(p) => Panel::Ready(charts::weekday_population_bar(&p.weekday)),
        None => Panel::no_data(),
    };
    let gender_population = match population {
        Some(p) => Panel::Ready(charts::gender_population_pie(&p.gender)),
        None => Panel::no_data(),
    };
    let time_curve = match population {
        Some(p) => Panel::Ready(charts::time_curve(&p.time_slots, TimeCurveStyle::Recommendation)),
        None => Panel::no_data(),
    };

    let map = map.clone().with_height(SMALL_CHART_HEIGHT).render(&area)?;

    tracing::info!(
        area = code,
        recommendations = recommendations.len(),
        "area analysis completed"
    );

    Ok(AreaReport {
        label: area.label(),
        area,
        recommendations,
        gender_sales,
        age_sales,
        weekday_population,
        gender_population,
        time_curve,
        map,
    })
}

/// 업종 → 추천 상권
pub fn analyze_category<S: DataSource + ?Sized>(
    source: &S,
    name: &str,
) -> Result<CategoryReport, DashboardError> {
    let category = match CategorySelection::single(name)? {
        CategorySelection::Single(category) => category,
        CategorySelection::All => return Err(DashboardError::CategoryNotFound(name.to_string())),
    };

    let rows = source.area_sales_for_category(&category)?;
    let mut recommendations = rank_by_per_shop(&rows, RankSubject::Area);
    recommendations.truncate(RECOMMEND_TOP_N);

    let scope = DemographicScope::Category(category.clone());
    let gender_sales = demographic_panel(
        normalize_sex(&source.gender_sales(&scope)?),
        charts::gender_sales_pie,
    );
    let age_sales = demographic_panel(
        normalize_age(&source.age_sales(&scope)?),
        charts::age_sales_bar,
    );

    let top_areas = source.area_time_sales_for_category(&category, CATEGORY_TIME_TOP_N)?;
    let time_curve = match column_means(top_areas.iter().map(|a| &a.time_slots)) {
        Some(values) => Panel::Ready(charts::time_curve(&values, TimeCurveStyle::Recommendation)),
        None => Panel::no_data(),
    };

    tracing::info!(
        category = %category,
        recommendations = recommendations.len(),
        time_areas = top_areas.len(),
        "category analysis completed"
    );

    Ok(CategoryReport {
        category,
        recommendations,
        gender_sales,
        age_sales,
        time_curve,
        time_curve_areas: top_areas.into_iter().map(|a| a.area_name).collect(),
    })
}

fn demographic_panel(
    series: Vec<(String, f64)>,
    build: fn(&[(String, f64)]) -> ChartSpec,
) -> Panel<ChartSpec> {
    if series.is_empty() {
        return Panel::no_data();
    }
    Panel::Ready(build(&series))
}

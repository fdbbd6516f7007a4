//! Dashboard Assembly
//!
//! 필터 하나로 여섯 개 패널(매출, 구성비, 시간대, 상주/직장, 지출, 지도)을 만듭니다.

use serde::Serialize;

use super::{
    compare_sales, composition, expenditure, expenditure_for_areas, resident_worker, time_curve,
};
use crate::charts::map::{MapEmbed, MapRenderer, MISSING_COORDINATES_MESSAGE, MISSING_KEY_MESSAGE};
use crate::charts::{self, ChartSpec, TimeCurveStyle};
use crate::data::DataSource;
use crate::error::DashboardError;
use crate::filter::FilterSelection;
use crate::models::{AreaCode, Panel, Placeholder};

pub const SELECT_FILTER_MESSAGE: &str = "상단에서 상권 또는 업종을 선택해 주세요.";
pub const SELECT_AREA_MESSAGE: &str = "사이드바에서 상권을 1개 선택하면 해당 위치로 지도가 표시됩니다.";
pub const AMBIGUOUS_DONG_MESSAGE: &str = "어느 상권의 소속 동을 보시겠습니까?";
const NO_SALES_MESSAGE: &str = "선택 조건에 해당하는 매출 데이터가 없습니다.";
const NO_FLOATING_MESSAGE: &str = "선택 조건에 해당하는 유동인구 데이터가 없습니다.";
const NO_RESIDENT_MESSAGE: &str = "선택 조건에 해당하는 상주/직장 인구 데이터가 없습니다.";
const NO_EXPENDITURE_MESSAGE: &str = "해당 조건의 동 지출 데이터가 없습니다.";
const EXPENDITURE_TITLE: &str = "상권 소속 동의 총지출 · 음식지출";

/// 제목 + 결과 + 안내 문구
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPanel<T> {
    pub title: String,
    pub content: Panel<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DashboardPanel<T> {
    fn new(title: &str, content: Panel<T>, no_data_message: &str) -> Self {
        let message = content.placeholder().map(|p| placeholder_message(p, no_data_message));
        Self {
            title: title.to_string(),
            content,
            message,
        }
    }
}

/// 안내 종류별 사용자 문구
pub fn placeholder_message(placeholder: &Placeholder, no_data_message: &str) -> String {
    match placeholder {
        Placeholder::SelectFilter => SELECT_FILTER_MESSAGE.to_string(),
        Placeholder::SelectArea => SELECT_AREA_MESSAGE.to_string(),
        Placeholder::AmbiguousDong { .. } => AMBIGUOUS_DONG_MESSAGE.to_string(),
        Placeholder::MapUnavailable { reason } => reason.clone(),
        Placeholder::NoData | Placeholder::ZeroTotal => no_data_message.to_string(),
    }
}

/// 대시보드 전체 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub filter: FilterSelection,
    pub period: String,
    /// epoch millis
    pub generated_at: i64,
    pub sales: DashboardPanel<ChartSpec>,
    pub composition: DashboardPanel<ChartSpec>,
    pub time_curve: DashboardPanel<ChartSpec>,
    pub resident_worker: DashboardPanel<ChartSpec>,
    pub expenditure: DashboardPanel<ChartSpec>,
    pub map: DashboardPanel<MapEmbed>,
}

impl DashboardView {
    pub fn ready_count(&self) -> usize {
        [
            self.sales.content.is_ready(),
            self.composition.content.is_ready(),
            self.time_curve.content.is_ready(),
            self.resident_worker.content.is_ready(),
            self.expenditure.content.is_ready(),
            self.map.content.is_ready(),
        ]
        .iter()
        .filter(|ready| **ready)
        .count()
    }
}

/// 필터 하나에 대한 대시보드 구성
pub fn build_dashboard<S: DataSource + ?Sized>(
    source: &S,
    filter: &FilterSelection,
    map: &MapRenderer,
) -> Result<DashboardView, DashboardError> {
    let sales = compare_sales(source, filter)?.map(|d| charts::sales_comparison(&d));
    let comp = composition(source, filter)?.map(|d| charts::composition(&d));
    let curve = time_curve(source, filter)?
        .map(|d| charts::time_curve(&d.values, TimeCurveStyle::Dashboard));
    let population = resident_worker(source, filter)?.map(|d| charts::resident_worker(&d));
    let spending = expenditure(source, filter)?.map(|d| charts::expenditure(&d));
    let location = map_panel(source, filter, map)?;

    let view = DashboardView {
        filter: filter.clone(),
        period: source.period().label(),
        generated_at: chrono::Utc::now().timestamp_millis(),
        sales: DashboardPanel::new("상권별/업종별 매출액", sales, NO_SALES_MESSAGE),
        composition: DashboardPanel::new("성별 · 요일별 유동인구 구성비", comp, NO_FLOATING_MESSAGE),
        time_curve: DashboardPanel::new("시간대별 유동인구 (분기별 평균)", curve, NO_FLOATING_MESSAGE),
        resident_worker: DashboardPanel::new(
            "상주 · 직장 인구 (분기별 평균)",
            population,
            NO_RESIDENT_MESSAGE,
        ),
        expenditure: DashboardPanel::new(EXPENDITURE_TITLE, spending, NO_EXPENDITURE_MESSAGE),
        map: DashboardPanel::new("상권 위치 (Kakao Map)", location, MISSING_COORDINATES_MESSAGE),
    };

    tracing::info!(
        area = ?filter.area,
        ready = view.ready_count(),
        "dashboard assembled"
    );
    Ok(view)
}

/// 상권 집합의 지출 패널
///
/// 여러 동에 걸치면 `AmbiguousDong` 안내와 후보 상권을 돌려주고, `chosen` 이 있으면 그 상권의 동만 집계합니다.
pub fn build_expenditure_panel<S: DataSource + ?Sized>(
    source: &S,
    areas: &[AreaCode],
    chosen: Option<AreaCode>,
) -> Result<DashboardPanel<ChartSpec>, DashboardError> {
    let content = expenditure_for_areas(source, areas, chosen)?.map(|d| charts::expenditure(&d));
    Ok(DashboardPanel::new(EXPENDITURE_TITLE, content, NO_EXPENDITURE_MESSAGE))
}

fn map_panel<S: DataSource + ?Sized>(
    source: &S,
    filter: &FilterSelection,
    map: &MapRenderer,
) -> Result<Panel<MapEmbed>, DashboardError> {
    let Some(code) = filter.area else {
        if !map.has_key() {
            return Ok(Panel::Placeholder(Placeholder::MapUnavailable {
                reason: MISSING_KEY_MESSAGE.to_string(),
            }));
        }
        return Ok(Panel::Placeholder(Placeholder::SelectArea));
    };

    match source.area(code)? {
        Some(area) => map.render(&area),
        None => Ok(Panel::Placeholder(Placeholder::MapUnavailable {
            reason: MISSING_COORDINATES_MESSAGE.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CachedSource;
    use crate::filter::CategorySelection;
    use crate::testing::sample_source;

    fn renderer() -> MapRenderer {
        MapRenderer::new(Some("test-key".to_string()))
    }

    #[test]
    fn test_area_selected_fills_every_panel() {
        let source = sample_source();
        let filter = FilterSelection::new(Some(1), CategorySelection::All);
        let view = build_dashboard(&source, &filter, &renderer()).unwrap();
        assert_eq!(view.ready_count(), 6);
        assert_eq!(view.period, "2024 Q4");
        assert!(view.sales.message.is_none());
        assert_eq!(
            view.sales.content.ready().unwrap().traces[0].labels,
            vec!["city average (all)", "selected area (all)"]
        );
    }

    #[test]
    fn test_degenerate_filter_prompts_and_keeps_population() {
        let source = sample_source();
        let view = build_dashboard(&source, &FilterSelection::default(), &renderer()).unwrap();
        assert_eq!(view.sales.content.placeholder(), Some(&Placeholder::SelectFilter));
        assert_eq!(view.sales.message.as_deref(), Some(SELECT_FILTER_MESSAGE));
        assert_eq!(view.map.content.placeholder(), Some(&Placeholder::SelectArea));
        assert!(view.time_curve.content.is_ready());
        assert!(view.expenditure.content.is_ready());
    }

    #[test]
    fn test_zero_total_uses_floating_message() {
        let source = sample_source();
        let filter = FilterSelection::new(Some(4), CategorySelection::All);
        let view = build_dashboard(&source, &filter, &renderer()).unwrap();
        assert_eq!(view.composition.content.placeholder(), Some(&Placeholder::ZeroTotal));
        assert_eq!(view.composition.message.as_deref(), Some(NO_FLOATING_MESSAGE));
    }

    #[test]
    fn test_missing_map_key_is_reported() {
        let source = sample_source();
        let filter = FilterSelection::new(Some(1), CategorySelection::All);
        let view = build_dashboard(&source, &filter, &MapRenderer::new(None)).unwrap();
        assert!(matches!(
            view.map.content.placeholder(),
            Some(Placeholder::MapUnavailable { .. })
        ));
        assert!(view.map.message.unwrap().contains("KAKAO_JAVASCRIPT_KEY"));
    }

    #[test]
    fn test_unknown_area_map_message() {
        let source = sample_source();
        let filter = FilterSelection::new(Some(99), CategorySelection::All);
        let view = build_dashboard(&source, &filter, &renderer()).unwrap();
        assert_eq!(view.map.message.as_deref(), Some(MISSING_COORDINATES_MESSAGE));
        assert_eq!(view.expenditure.content.placeholder(), Some(&Placeholder::NoData));
    }

    #[test]
    fn test_repeat_dashboard_hits_cache() {
        let source = CachedSource::new(sample_source());
        let filter = FilterSelection::new(None, CategorySelection::single("커피-음료").unwrap());

        let first = build_dashboard(&source, &filter, &renderer()).unwrap();
        let calls = source.inner().calls("sales_by_area");
        let second = build_dashboard(&source, &filter, &renderer()).unwrap();

        assert_eq!(source.inner().calls("sales_by_area"), calls);
        assert_eq!(first.sales, second.sales);
        assert_eq!(first.expenditure, second.expenditure);
    }

    #[test]
    fn test_expenditure_panel_disambiguation() {
        let source = sample_source();
        let panel = build_expenditure_panel(&source, &[1, 2], None).unwrap();
        assert_eq!(panel.message.as_deref(), Some(AMBIGUOUS_DONG_MESSAGE));

        let panel = build_expenditure_panel(&source, &[1, 2], Some(1)).unwrap();
        assert!(panel.message.is_none());
        let chart = panel.content.ready().unwrap();
        assert_eq!(chart.layout.title.as_deref(), Some("연남동 — 2024 Q4 지출"));
    }

    #[test]
    fn test_view_serializes() {
        let source = sample_source();
        let filter = FilterSelection::new(Some(2), CategorySelection::All);
        let view = build_dashboard(&source, &filter, &renderer()).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["sales"]["content"]["status"], "ready");
        assert_eq!(json["filter"]["area"], 2);
        assert!(json["map"]["content"]["data"]["html"].as_str().unwrap().contains("kakao"));
    }
}

//! Chart Construction
//!
//! 완성된 시리즈를 선언형 차트 명세(plotly 호환 필드)로 변환합니다.
//! 대시보드와 추천 화면이 같은 빌더를 사용합니다.

pub mod map;

use serde::{Deserialize, Serialize};

use crate::config::{
    BASE_COLORS, CHART_HEIGHT, CHART_TEMPLATE, DAY_LABELS, EXPENDITURE_AVG_TYPES,
    EXPENDITURE_COLORS, EXPENDITURE_TYPES, GENDER_COLORS, GENDER_LABELS, POPULATION_COLORS,
    POPULATION_TYPES, SMALL_CHART_HEIGHT, TIME_LABELS, TIME_X_VALS,
};
use crate::engine::{Composition, ExpenditureBars, ResidentWorkerBars, SalesComparison};

const AGE_BAR_COLOR: &str = "lightblue";
const WEEKDAY_BAR_COLOR: &str = "lightgreen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraceKind {
    Bar,
    Line,
    Pie,
}

/// 차트 시리즈 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 범주 라벨 (막대 x / 파이 조각 / 선 차트 hover 텍스트)
    pub labels: Vec<String>,
    /// 선 차트의 수치 x 좌표
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<f64>>,
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_template: Option<String>,
}

impl Trace {
    fn bar(labels: &[&str], values: Vec<f64>) -> Self {
        Self {
            kind: TraceKind::Bar,
            name: None,
            labels: to_strings(labels),
            x: None,
            values,
            colors: Vec::new(),
            line_width: None,
            hover_template: None,
        }
    }

    fn pie(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            kind: TraceKind::Pie,
            ..Self::bar(&[], values)
        }
        .with_labels(labels)
    }

    fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    fn colored(mut self, colors: &[&str]) -> Self {
        self.colors = to_strings(colors);
        self
    }

    fn hover(mut self, template: &str) -> Self {
        self.hover_template = Some(template.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_vals: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_text: Option<Vec<String>>,
}

impl Axis {
    fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    /// 0~24시 고정 시간축
    fn hours(title: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            range: Some([0.0, 24.0]),
            tick_vals: Some(TIME_X_VALS.to_vec()),
            tick_text: Some(to_strings(&TIME_LABELS)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub template: String,
    pub height: u32,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub show_legend: bool,
}

impl Layout {
    fn new(height: u32) -> Self {
        Self {
            title: None,
            template: CHART_TEMPLATE.to_string(),
            height,
            x_axis: Axis::default(),
            y_axis: Axis::default(),
            show_legend: false,
        }
    }
}

/// 선언형 차트 명세
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// 1. 매출 비교 막대
pub fn sales_comparison(data: &SalesComparison) -> ChartSpec {
    let labels: Vec<&str> = data.labels.iter().map(String::as_str).collect();
    let colors = &BASE_COLORS[..data.values.len().min(BASE_COLORS.len())];

    let mut layout = Layout::new(CHART_HEIGHT);
    layout.y_axis = Axis::titled("매출(원)");

    ChartSpec {
        traces: vec![Trace::bar(&labels, data.values.clone())
            .colored(colors)
            .hover("%{x}: %{y:,.0f}원<extra></extra>")],
        layout,
    }
}

/// 2. 요일/성별 유동인구 구성비 막대 (합계 0 인 쪽은 생략)
pub fn composition(data: &Composition) -> ChartSpec {
    let mut layout = Layout::new(CHART_HEIGHT);
    layout.show_legend = true;
    layout.y_axis = Axis {
        range: Some([0.0, 100.0]),
        ..Axis::titled("비중(%)")
    };

    let weekday = data.weekday_shares.as_ref().map(|shares| {
        Trace::bar(&DAY_LABELS, shares.clone()).named("요일별 구성비(%)")
    });
    let gender = data.gender_shares.as_ref().map(|shares| {
        Trace::bar(&GENDER_LABELS, shares.clone()).named("성별 비중(%)")
    });

    ChartSpec {
        traces: weekday
            .into_iter()
            .chain(gender)
            .map(|trace| trace.hover("%{x}: %{y:.1f}%<extra></extra>"))
            .collect(),
        layout,
    }
}

/// 시간대 곡선 표시 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeCurveStyle {
    /// 대시보드: 검은 굵은 선
    Dashboard,
    /// 추천 화면: 파란 선, 축 제목 포함
    Recommendation,
}

/// 3. 시간대별 유동인구 선 차트
pub fn time_curve(values: &[f64; 6], style: TimeCurveStyle) -> ChartSpec {
    let (name, color, hover, x_title, y_title) = match style {
        TimeCurveStyle::Dashboard => (
            "전체",
            "#000000",
            "%{text}: %{y:,}<extra></extra>",
            None,
            "유동인구",
        ),
        TimeCurveStyle::Recommendation => (
            "유동인구",
            "#636EFA",
            "%{text}: %{y:,.0f}명<extra></extra>",
            Some("시간대"),
            "유동인구 수",
        ),
    };

    let mut layout = Layout::new(CHART_HEIGHT);
    layout.x_axis = Axis::hours(x_title);
    layout.y_axis = Axis::titled(y_title);

    let trace = Trace {
        kind: TraceKind::Line,
        x: Some(TIME_X_VALS.to_vec()),
        line_width: Some(3),
        ..Trace::bar(&TIME_LABELS, values.to_vec())
    }
    .named(name)
    .colored(&[color])
    .hover(hover);

    ChartSpec {
        traces: vec![trace],
        layout,
    }
}

/// 4. 상주/직장 인구 막대
pub fn resident_worker(data: &ResidentWorkerBars) -> ChartSpec {
    let mut layout = Layout::new(CHART_HEIGHT);
    layout.y_axis = Axis::titled("상주, 직장인구");

    ChartSpec {
        traces: vec![Trace::bar(&POPULATION_TYPES, vec![data.resident, data.worker])
            .colored(&POPULATION_COLORS)
            .hover("%{x}: %{y:,}<extra></extra>")],
        layout,
    }
}

/// 5. 행정동 지출 막대 (단일 동 또는 평균)
pub fn expenditure(data: &ExpenditureBars) -> ChartSpec {
    let labels = if data.is_average() {
        EXPENDITURE_AVG_TYPES
    } else {
        EXPENDITURE_TYPES
    };

    let mut layout = Layout::new(CHART_HEIGHT);
    layout.title = Some(data.title.clone());
    layout.y_axis = Axis::titled("금액(원)");

    ChartSpec {
        traces: vec![Trace::bar(&labels, vec![data.total, data.food])
            .colored(&EXPENDITURE_COLORS)
            .hover("%{x}: %{y:,}<extra></extra>")],
        layout,
    }
}

/// 성별 매출 파이 (라벨은 정규화된 값)
pub fn gender_sales_pie(series: &[(String, f64)]) -> ChartSpec {
    let labels = series.iter().map(|(label, _)| label.clone()).collect();
    let values = series.iter().map(|(_, v)| *v).collect();

    ChartSpec {
        traces: vec![Trace::pie(labels, values).colored(&GENDER_COLORS)],
        layout: Layout::new(SMALL_CHART_HEIGHT),
    }
}

/// 연령대 매출 막대
pub fn age_sales_bar(series: &[(String, f64)]) -> ChartSpec {
    let labels: Vec<&str> = series.iter().map(|(label, _)| label.as_str()).collect();
    let values = series.iter().map(|(_, v)| *v).collect();

    let mut layout = Layout::new(SMALL_CHART_HEIGHT);
    layout.x_axis = Axis::titled("연령대");
    layout.y_axis = Axis::titled("매출(원)");

    ChartSpec {
        traces: vec![Trace::bar(&labels, values).colored(&[AGE_BAR_COLOR])],
        layout,
    }
}

/// 요일별 유동인구 막대
pub fn weekday_population_bar(weekday: &[f64; 7]) -> ChartSpec {
    let mut layout = Layout::new(SMALL_CHART_HEIGHT);
    layout.y_axis = Axis::titled("인구수");

    ChartSpec {
        traces: vec![Trace::bar(&DAY_LABELS, weekday.to_vec()).colored(&[WEEKDAY_BAR_COLOR])],
        layout,
    }
}

/// 성별 유동인구 파이
pub fn gender_population_pie(gender: &[f64; 2]) -> ChartSpec {
    ChartSpec {
        traces: vec![Trace::pie(to_strings(&GENDER_LABELS), gender.to_vec()).colored(&GENDER_COLORS)],
        layout: Layout::new(SMALL_CHART_HEIGHT),
    }
}

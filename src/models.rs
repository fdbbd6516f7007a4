//! Dashboard Data Models
//!
//! 저장소 집계 결과 행과 대시보드 출력 모델

use serde::{Deserialize, Serialize};

/// 상권 코드
pub type AreaCode = i64;

/// 상권 (Commercial_Area)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub code: AreaCode,
    pub name: String,
    pub gu: Option<String>,
    pub dong: Option<String>,
    pub dong_code: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

impl Area {
    /// "상권이름 (구 동)" 형식 라벨
    pub fn label(&self) -> String {
        let gu = self.gu.as_deref().unwrap_or("");
        let dong = self.dong.as_deref().unwrap_or("");
        let region = format!("{} {}", gu, dong);
        let region = region.trim();
        if region.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, region)
        }
    }

    /// 좌표가 모두 있을 때만 (위도, 경도)
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// 상권별 매출 합계 (sales fetch 한 행)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSales {
    pub area_code: AreaCode,
    pub sales_sum: f64,
}

/// 상권별 유동인구 (분기 평균)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingPopulation {
    pub area_code: AreaCode,
    /// 월~일
    pub weekday: [f64; 7],
    /// 00-06, 06-11, 11-14, 14-17, 17-21, 21-24
    pub time_slots: [f64; 6],
    /// 남성, 여성
    pub gender: [f64; 2],
}

/// 상권별 상주/직장 인구 (분기별 합계의 평균)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentWorker {
    pub area_code: AreaCode,
    pub resident: f64,
    pub worker: f64,
}

/// 행정동별 지출 합계
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DongExpenditure {
    pub dong_code: String,
    pub dong_name: String,
    pub total_expenditure: f64,
    pub food_expenditure: f64,
}

/// 상권 → 행정동 매핑
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDong {
    pub area_code: AreaCode,
    pub area_name: String,
    pub dong_code: Option<String>,
    pub dong_name: Option<String>,
}

/// 업종(또는 상권) 단위 매출/점포수 집계 행
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesShopRow {
    pub area_code: AreaCode,
    pub area_name: String,
    pub gu: Option<String>,
    pub dong: Option<String>,
    pub category: String,
    pub total_sales: i64,
    pub shop_count: i64,
}

/// 성별 매출
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderSales {
    pub sex: String,
    pub sales: i64,
}

/// 연령대 매출
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeSales {
    pub age: String,
    pub sales: i64,
}

/// 업종 보유 상권의 시간대별 유동인구 + 매출
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaTimeSales {
    pub area_code: AreaCode,
    pub area_name: String,
    pub time_slots: [f64; 6],
    pub total_sales: i64,
}

/// 성별/연령 매출 조회 범위
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum DemographicScope {
    Area(AreaCode),
    Category(String),
}

/// 모호한 집계 범위에서 사용자가 고를 수 있는 상권
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaChoice {
    pub area_code: AreaCode,
    pub area_name: String,
    pub dong_name: Option<String>,
}

/// 차트 대신 표시할 안내
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Placeholder {
    /// 조회 결과가 비어 있음
    NoData,
    /// 필터 조합이 아무것도 선택하지 않음
    SelectFilter,
    /// 상권 선택이 필요한 패널
    SelectArea,
    /// 구성비 계산의 분모가 0
    ZeroTotal,
    /// 지도 키/좌표 문제 등 외부 자원 사용 불가
    MapUnavailable { reason: String },
    /// 여러 행정동이 걸려 있어 명시적 선택 필요
    AmbiguousDong { choices: Vec<AreaChoice> },
}

/// 패널 결과: 준비된 값 또는 안내
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "data")]
pub enum Panel<T> {
    Ready(T),
    Placeholder(Placeholder),
}

impl<T> Panel<T> {
    pub fn no_data() -> Self {
        Panel::Placeholder(Placeholder::NoData)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(v) => Some(v),
            Panel::Placeholder(_) => None,
        }
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        match self {
            Panel::Ready(_) => None,
            Panel::Placeholder(p) => Some(p),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Panel<U> {
        match self {
            Panel::Ready(v) => Panel::Ready(f(v)),
            Panel::Placeholder(p) => Panel::Placeholder(p),
        }
    }
}

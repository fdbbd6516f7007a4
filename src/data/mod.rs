//! Data Access Module
//!
//! 집계 엔진에 주입되는 읽기 전용 조회 인터페이스와 캐시

mod cache;

pub use cache::{CacheKey, CacheStats, CachedSource, Dataset, QueryCache};

use crate::config::ReportingPeriod;
use crate::error::DashboardError;
use crate::models::{
    AgeSales, Area, AreaCode, AreaDong, AreaSales, AreaTimeSales, DemographicScope,
    DongExpenditure, FloatingPopulation, GenderSales, ResidentWorker, SalesShopRow,
};

/// 읽기 전용 집계 조회
///
/// 모든 조회는 같은 보고 기간을 사용하고, 결과가 없으면 빈 Vec 을 돌려줍니다.
/// `areas` 가 `None` 이거나 비어 있으면 상권 제한이 없습니다.
pub trait DataSource: Send + Sync {
    /// 모든 조회가 공유하는 보고 기간
    fn period(&self) -> ReportingPeriod;

    /// 상권 카탈로그 (구, 동, 이름 순, 좌표가 없는 상권 포함)
    fn areas(&self) -> Result<Vec<Area>, DashboardError>;

    /// 코드로 상권 하나 조회 (좌표 유무와 무관)
    fn area(&self, code: AreaCode) -> Result<Option<Area>, DashboardError>;

    /// 저장소에 존재하는 외식 10종 업종 이름 (이름 순)
    fn categories(&self) -> Result<Vec<String>, DashboardError>;

    /// 상권별 매출 합계
    fn sales_by_area(
        &self,
        areas: Option<&[AreaCode]>,
        categories: &[String],
    ) -> Result<Vec<AreaSales>, DashboardError>;

    /// 상권별 요일/시간대/성별 유동인구 평균
    fn floating_population(
        &self,
        areas: Option<&[AreaCode]>,
    ) -> Result<Vec<FloatingPopulation>, DashboardError>;

    /// 상권별 상주/직장 인구
    fn resident_worker(
        &self,
        areas: Option<&[AreaCode]>,
    ) -> Result<Vec<ResidentWorker>, DashboardError>;

    /// 행정동별 총지출/음식지출
    fn expenditure_by_dong(&self) -> Result<Vec<DongExpenditure>, DashboardError>;

    /// 상권 → 행정동 매핑
    fn area_dong_map(&self) -> Result<Vec<AreaDong>, DashboardError>;

    /// 한 상권의 업종별 매출/점포수
    fn category_sales_in_area(
        &self,
        area: AreaCode,
        categories: &[String],
    ) -> Result<Vec<SalesShopRow>, DashboardError>;

    /// 한 업종의 상권별 매출/점포수
    fn area_sales_for_category(&self, category: &str)
        -> Result<Vec<SalesShopRow>, DashboardError>;

    /// 성별 매출
    fn gender_sales(&self, scope: &DemographicScope) -> Result<Vec<GenderSales>, DashboardError>;

    /// 연령대 매출
    fn age_sales(&self, scope: &DemographicScope) -> Result<Vec<AgeSales>, DashboardError>;

    /// 업종 매출 상위 `limit` 개 상권의 시간대별 유동인구
    fn area_time_sales_for_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<AreaTimeSales>, DashboardError>;
}

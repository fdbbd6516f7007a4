//! Aggregation / Derivation Engine
//!
//! 필터 상태와 [`DataSource`](crate::data::DataSource) 조회 결과로 패널별 수치를 계산합니다.
//! 빈 조회, 필터 미선택, 0 분모는 에러가 아니라 [`Placeholder`](crate::models::Placeholder) 로 돌려줍니다.

mod dashboard;
mod expenditure;
mod population;
mod sales;
pub mod stats;

pub use dashboard::{
    build_dashboard, build_expenditure_panel, placeholder_message, DashboardPanel, DashboardView,
    AMBIGUOUS_DONG_MESSAGE, SELECT_AREA_MESSAGE, SELECT_FILTER_MESSAGE,
};
pub use expenditure::{expenditure, expenditure_for_areas, ExpenditureBars};
pub use population::{
    area_pool, composition, resident_worker, time_curve, Composition, ResidentWorkerBars,
    TimeCurve,
};
pub use sales::{compare_sales, dispatch, SalesComparison, SalesScope};

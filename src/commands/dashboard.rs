//! Dashboard Commands
//!
//! 필터 변경 시 대시보드 전체와 지출 패널 재계산

use serde::Deserialize;

use super::AppState;
use crate::charts::ChartSpec;
use crate::data::DataSource;
use crate::engine::{build_dashboard, build_expenditure_panel, DashboardPanel, DashboardView};
use crate::error::{CommandError, CommandResult};
use crate::filter::FilterSelection;
use crate::models::AreaCode;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardArgs {
    /// 0~1개
    #[serde(default)]
    pub areas: Vec<AreaCode>,
    /// 비어 있거나 10종 전체면 전체, 아니면 정확히 1개
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureArgs {
    pub areas: Vec<AreaCode>,
    /// 여러 동에 걸칠 때 고른 상권
    #[serde(default)]
    pub choose: Option<AreaCode>,
}

/// 대시보드 조회
#[tracing::instrument(skip(state))]
pub fn get_dashboard<S: DataSource>(
    args: DashboardArgs,
    state: &AppState<S>,
) -> CommandResult<DashboardView> {
    let filter = FilterSelection::from_lists(&args.areas, &args.categories)?;
    Ok(build_dashboard(&state.source, &filter, &state.map)?)
}

/// 상권 집합의 소속 동 지출
#[tracing::instrument(skip(state))]
pub fn get_expenditure<S: DataSource>(
    args: ExpenditureArgs,
    state: &AppState<S>,
) -> CommandResult<DashboardPanel<ChartSpec>> {
    if args.areas.is_empty() {
        return Err(CommandError {
            code: "INVALID_SELECTION".to_string(),
            message: "At least one area must be selected".to_string(),
            details: None,
        });
    }

    Ok(build_expenditure_panel(
        &state.source,
        &args.areas,
        args.choose,
    )?)
}

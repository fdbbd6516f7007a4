//! Recommendation Commands
//!
//! 상권/업종 단발성 분석

use super::AppState;
use crate::data::DataSource;
use crate::error::CommandResult;
use crate::recommend::{analyze, AnalysisReport, AnalyzeCommand};

/// 분석 실행
#[tracing::instrument(skip(state))]
pub fn run_analysis<S: DataSource>(
    command: AnalyzeCommand,
    state: &AppState<S>,
) -> CommandResult<AnalysisReport> {
    Ok(analyze(&state.source, &command, &state.map)?)
}

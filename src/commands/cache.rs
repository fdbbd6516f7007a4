//! Cache Commands
//!
//! 조회 캐시 상태 확인과 수동 비우기

use serde::Serialize;

use super::AppState;
use crate::data::{CacheStats, DataSource};
use crate::error::CommandResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// 가장 최근 항목 저장 시각 (epoch millis)
    pub last_cached_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCacheResult {
    pub cleared: usize,
}

pub fn cache_stats<S: DataSource>(state: &AppState<S>) -> CommandResult<CacheStatus> {
    let cache = state.source.cache();
    Ok(CacheStatus {
        stats: cache.stats(),
        last_cached_at: cache.last_cached_at(),
    })
}

/// 모든 캐시 항목 삭제 (다음 조회부터 저장소를 다시 읽음)
pub fn clear_cache<S: DataSource>(state: &AppState<S>) -> CommandResult<ClearCacheResult> {
    let cleared = state.source.cache().clear()?;
    Ok(ClearCacheResult { cleared })
}

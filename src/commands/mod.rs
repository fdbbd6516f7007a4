//! Dashboard Commands Module
//!
//! 프론트엔드/CLI 에서 호출 가능한 명령어 정의

pub mod cache;
pub mod catalog;
pub mod dashboard;
pub mod recommend;

use crate::charts::map::MapRenderer;
use crate::config::AppConfig;
use crate::data::{CachedSource, DataSource};
use crate::db::{Database, DbState};
use crate::error::DashboardError;

/// 명령어가 공유하는 앱 상태
pub struct AppState<S = DbState> {
    pub source: CachedSource<S>,
    pub map: MapRenderer,
}

impl<S: DataSource> AppState<S> {
    pub fn new(source: S, map: MapRenderer) -> Self {
        Self {
            source: CachedSource::new(source),
            map,
        }
    }
}

impl AppState<DbState> {
    /// 설정의 SQLite 파일로 앱 상태 구성
    pub fn open(config: &AppConfig) -> Result<Self, DashboardError> {
        if !config.database_path.exists() {
            return Err(DashboardError::Config(format!(
                "Database file not found: {} (set DB_PATH)",
                config.database_path.display()
            )));
        }

        let db = Database::new(&config.database_path)?;
        let state = DbState::new(db, config.reporting_period);
        tracing::info!(
            path = %config.database_path.display(),
            period = %config.reporting_period.label(),
            map = config.kakao_js_key.is_some(),
            "dashboard state opened"
        );
        Ok(Self::new(state, MapRenderer::new(config.kakao_js_key.clone())))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::seeded_database;

    #[test]
    fn test_open_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_path: dir.path().join("missing.db"),
            ..AppConfig::default()
        };
        let result = AppState::open(&config);
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_open_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seoul.db");
        let db = Database::new(&path).unwrap();
        db.initialize().unwrap();
        drop(db);

        let config = AppConfig {
            database_path: path,
            ..AppConfig::default()
        };
        let state = AppState::open(&config).unwrap();
        assert!(!state.map.has_key());
        assert!(state.source.areas().unwrap().is_empty());
    }

    #[test]
    fn test_state_over_seeded_store() {
        let source = DbState::new(seeded_database(), Default::default());
        let state = AppState::new(source, MapRenderer::new(None));
        let areas = state.source.areas().unwrap();
        assert_eq!(areas.len(), 4);
        assert!(areas.iter().any(|a| a.code == 4 && a.coordinates().is_none()));

        let options = catalog::get_filter_options(&state).unwrap();
        let flags: Vec<(i64, bool)> = options
            .areas
            .iter()
            .map(|a| (a.code, a.has_coordinates))
            .collect();
        assert_eq!(flags, vec![(2, true), (1, true), (3, true), (4, false)]);
    }
}

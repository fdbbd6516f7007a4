//! Dashboard Configuration
//!
//! 환경 변수(.env / .env.local) 기반 설정과 차트/지도 상수

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

// --- 외식 10종 목록 ---
pub const FOOD10: [&str; 10] = [
    "한식음식점",
    "중식음식점",
    "일식음식점",
    "양식음식점",
    "제과점",
    "패스트푸드점",
    "치킨전문점",
    "분식전문점",
    "호프-간이주점",
    "커피-음료",
];

/// 기본 보고 기간 (2024년 4분기)
pub const DEFAULT_QUARTER: u32 = 20244;
pub const DEFAULT_DB_PATH: &str = "data/seoul.db";

// Chart configuration
pub const CHART_HEIGHT: u32 = 350;
pub const SMALL_CHART_HEIGHT: u32 = 300;
pub const CHART_TEMPLATE: &str = "plotly_white";

// Color schemes
pub const BASE_COLORS: [&str; 2] = ["#636EFA", "#EF553B"];
pub const POPULATION_COLORS: [&str; 2] = ["#1f77b4", "#2ca02c"];
pub const EXPENDITURE_COLORS: [&str; 2] = ["#636EFA", "#EF553B"];
pub const GENDER_COLORS: [&str; 2] = ["#1f77b4", "#ff7f0e"];

// Map configuration
pub const DEFAULT_MAP_LEVEL: u8 = 5;
pub const MAP_LOAD_TIMEOUT_MS: u32 = 2000;
pub const KOREA_LAT_RANGE: (f64, f64) = (33.0, 39.0);
pub const KOREA_LON_RANGE: (f64, f64) = (124.0, 132.0);
pub const KAKAO_SDK_URL: &str = "https://dapi.kakao.com/v2/maps/sdk.js";

// 시간대 (중심 시각은 0~24시 x축 위치)
pub const TIME_LABELS: [&str; 6] = ["00-06", "06-11", "11-14", "14-17", "17-21", "21-24"];
pub const TIME_X_VALS: [f64; 6] = [3.0, 8.5, 12.5, 15.5, 19.0, 22.5];

pub const DAY_LABELS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];
pub const GENDER_LABELS: [&str; 2] = ["남성", "여성"];
pub const POPULATION_TYPES: [&str; 2] = ["상주", "직장"];
pub const EXPENDITURE_TYPES: [&str; 2] = ["총지출", "음식지출"];
pub const EXPENDITURE_AVG_TYPES: [&str; 2] = ["총지출(평균)", "음식지출(평균)"];

/// 추천 목록 크기
pub const RECOMMEND_TOP_N: usize = 5;
/// 업종별 시간대 패턴에 사용하는 상위 상권 수
pub const CATEGORY_TIME_TOP_N: usize = 10;

/// 보고 기간 (year_quarter 코드, 예: 20244)
///
/// 모든 조회는 `year_quarter BETWEEN from AND to` 로 같은 기간을 공유합니다.
/// 단일 분기는 `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub from: u32,
    pub to: u32,
}

impl ReportingPeriod {
    pub fn quarter(code: u32) -> Result<Self, DashboardError> {
        Self::range(code, code)
    }

    pub fn range(from: u32, to: u32) -> Result<Self, DashboardError> {
        validate_quarter_code(from)?;
        validate_quarter_code(to)?;
        if from > to {
            return Err(DashboardError::Config(format!(
                "Reporting period start {} is after end {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// "20244" 또는 "20241-20244" 형식 파싱
    pub fn parse(raw: &str) -> Result<Self, DashboardError> {
        let raw = raw.trim();
        let parse_code = |s: &str| {
            s.trim().parse::<u32>().map_err(|_| {
                DashboardError::Config(format!("Invalid year_quarter code: '{}'", s.trim()))
            })
        };

        match raw.split_once('-') {
            Some((from, to)) => Self::range(parse_code(from)?, parse_code(to)?),
            None => Self::quarter(parse_code(raw)?),
        }
    }

    pub fn is_single_quarter(&self) -> bool {
        self.from == self.to
    }

    /// 차트 제목용 라벨 (예: "2024 Q4", "2024 Q1~Q4")
    pub fn label(&self) -> String {
        let (fy, fq) = (self.from / 10, self.from % 10);
        let (ty, tq) = (self.to / 10, self.to % 10);
        if self.is_single_quarter() {
            format!("{} Q{}", fy, fq)
        } else if fy == ty {
            format!("{} Q{}~Q{}", fy, fq, tq)
        } else {
            format!("{} Q{}~{} Q{}", fy, fq, ty, tq)
        }
    }
}

impl Default for ReportingPeriod {
    fn default() -> Self {
        Self {
            from: DEFAULT_QUARTER,
            to: DEFAULT_QUARTER,
        }
    }
}

fn validate_quarter_code(code: u32) -> Result<(), DashboardError> {
    let quarter = code % 10;
    let year = code / 10;
    if !(1..=4).contains(&quarter) || !(1900..=2999).contains(&year) {
        return Err(DashboardError::Config(format!(
            "Invalid year_quarter code: {}",
            code
        )));
    }
    Ok(())
}

/// 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database_path: PathBuf,
    /// 카카오맵 JavaScript 키 (없으면 지도 패널은 안내 메시지로 대체)
    pub kakao_js_key: Option<String>,
    pub reporting_period: ReportingPeriod,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            kakao_js_key: None,
            reporting_period: ReportingPeriod::default(),
        }
    }
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 로드 (빈 문자열은 미설정으로 취급)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = AppConfig::default();

        if let Some(path) = get("DB_PATH") {
            config.database_path = PathBuf::from(path);
        }
        // 지도 키: KAKAO_JAVASCRIPT_KEY > KAKAO_JS_KEY
        config.kakao_js_key = get("KAKAO_JAVASCRIPT_KEY").or_else(|| get("KAKAO_JS_KEY"));
        if let Some(period) = get("REPORTING_PERIOD") {
            config.reporting_period = ReportingPeriod::parse(&period)?;
        }

        Ok(config)
    }

    /// CLI 인자 적용 (빈 기간 문자열은 미지정으로 취급)
    pub fn with_overrides(
        mut self,
        database_path: Option<PathBuf>,
        period: Option<&str>,
    ) -> Result<Self, DashboardError> {
        if let Some(path) = database_path {
            self.database_path = path;
        }
        if let Some(period) = period.filter(|p| !p.trim().is_empty()) {
            self.reporting_period = ReportingPeriod::parse(period)?;
        }
        Ok(self)
    }
}

/// `KEY=VALUE` 한 줄을 해석 (주석, 코드펜스, 설명 문장, 소문자 키는 None)
fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.starts_with('#') || line.starts_with("```") {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
    valid.then(|| (key, unquote(value.trim())))
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
}

/// KEY=VALUE 라인만 읽는 관대한 .env 로더
///
/// markdown 이 섞인 .env.local 처럼 dotenvy 가 거부하는 파일용입니다.
/// 이미 비어있지 않은 값이 설정된 키는 덮어쓰지 않습니다.
pub fn load_env_lenient(path: &Path) -> std::io::Result<usize> {
    let text = std::fs::read_to_string(path)?;
    let mut loaded = 0usize;
    for (key, value) in text.lines().filter_map(parse_env_line) {
        if std::env::var(key).is_ok_and(|v| !v.trim().is_empty()) {
            continue;
        }
        std::env::set_var(key, value);
        loaded += 1;
    }
    Ok(loaded)
}

/// `start` 부터 최대 `max_hops` 단계 위까지 `filename` 탐색
fn find_upwards(start: &Path, filename: &str, max_hops: usize) -> Option<PathBuf> {
    start
        .ancestors()
        .take(max_hops + 1)
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

/// .env.local (CWD 및 상위 디렉토리) 과 .env 로드
///
/// 실패는 무시하고, 실제로 읽은 파일 경로를 돌려줍니다.
pub fn load_env() -> Vec<PathBuf> {
    let mut loaded = Vec::new();
    if let Some(path) = load_env_local() {
        tracing::debug!(path = %path.display(), "loaded .env.local");
        loaded.push(path);
    }
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env");
            loaded.push(path);
        }
        Err(e) if e.not_found() => tracing::debug!("no .env file"),
        Err(e) => tracing::debug!(error = %e, ".env ignored"),
    }
    loaded
}

fn load_env_local() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let path = find_upwards(&cwd, ".env.local", 6)?;
    match dotenvy::from_path(&path) {
        Ok(()) => Some(path),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "strict parse failed, reading KEY=VALUE lines");
            match load_env_lenient(&path) {
                Ok(loaded) if loaded > 0 => Some(path),
                _ => None,
            }
        }
    }
}

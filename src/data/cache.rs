//! Query Cache
//!
//! 조회 인자(데이터셋, 상권, 업종, 보고 기간)를 키로 하는 read-through 캐시

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;

use super::DataSource;
use crate::config::ReportingPeriod;
use crate::error::DashboardError;
use crate::filter::FilterKey;
use crate::models::{
    AgeSales, Area, AreaCode, AreaDong, AreaSales, AreaTimeSales, DemographicScope,
    DongExpenditure, FloatingPopulation, GenderSales, ResidentWorker, SalesShopRow,
};

/// 캐시되는 논리 데이터셋
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Dataset {
    Areas,
    Area,
    Categories,
    Sales,
    FloatingPopulation,
    ResidentWorker,
    Expenditure,
    AreaDongMap,
    CategorySalesInArea,
    AreaSalesForCategory,
    GenderSales,
    AgeSales,
    AreaTimeSales,
}

/// 캐시 키: 결과에 영향을 주는 모든 인자를 포함
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheKey {
    pub dataset: Dataset,
    pub filter: FilterKey,
    pub limit: Option<usize>,
    pub period: ReportingPeriod,
}

impl CacheKey {
    pub fn new(dataset: Dataset, filter: FilterKey, period: ReportingPeriod) -> Self {
        Self {
            dataset,
            filter,
            limit: None,
            period,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// 캐시 통계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    cached_at: i64,
}

/// 조회 결과 캐시
///
/// 읽기는 동시에 가능하고, 같은 키를 동시에 놓치면 중복 계산될 수 있습니다.
/// `clear()` 는 쓰기 잠금 하나로 모든 항목을 한 번에 비웁니다.
pub struct QueryCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// 캐시에 있으면 복사본을, 없으면 `fetch` 결과를 저장 후 반환
    ///
    /// 조회 중 에러는 캐시하지 않습니다.
    pub fn get_or_fetch<T, F>(&self, key: CacheKey, fetch: F) -> Result<Vec<T>, DashboardError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<Vec<T>, DashboardError>,
    {
        if let Some(rows) = self.lookup::<T>(&key)? {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(dataset = ?key.dataset, rows = rows.len(), "cache hit");
            return Ok(rows.as_ref().clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let rows = fetch()?;
        tracing::debug!(dataset = ?key.dataset, rows = rows.len(), "cache miss, stored");

        let mut entries = self
            .entries
            .write()
            .map_err(|e| DashboardError::Lock(format!("Failed to acquire cache lock: {}", e)))?;
        entries.insert(
            key,
            CacheEntry {
                value: Arc::new(rows.clone()),
                cached_at: chrono::Utc::now().timestamp_millis(),
            },
        );

        Ok(rows)
    }

    fn lookup<T>(&self, key: &CacheKey) -> Result<Option<Arc<Vec<T>>>, DashboardError>
    where
        T: Send + Sync + 'static,
    {
        let entries = self
            .entries
            .read()
            .map_err(|e| DashboardError::Lock(format!("Failed to acquire cache lock: {}", e)))?;

        Ok(entries
            .get(key)
            .and_then(|entry| Arc::clone(&entry.value).downcast::<Vec<T>>().ok()))
    }

    /// 모든 항목 삭제, 삭제된 항목 수 반환
    pub fn clear(&self) -> Result<usize, DashboardError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DashboardError::Lock(format!("Failed to acquire cache lock: {}", e)))?;
        let removed = entries.len();
        entries.clear();
        tracing::info!(removed, "query cache cleared");
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 가장 최근에 저장된 항목의 시각 (epoch millis)
    pub fn last_cached_at(&self) -> Option<i64> {
        self.entries
            .read()
            .ok()
            .and_then(|e| e.values().map(|entry| entry.cached_at).max())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// 캐시를 거치는 [`DataSource`] 래퍼
pub struct CachedSource<S> {
    inner: S,
    cache: Arc<QueryCache>,
}

impl<S: DataSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_cache(inner, Arc::new(QueryCache::new()))
    }

    pub fn with_cache(inner: S, cache: Arc<QueryCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn key(&self, dataset: Dataset, areas: Option<&[AreaCode]>, categories: &[String]) -> CacheKey {
        CacheKey::new(
            dataset,
            FilterKey::new(areas, categories),
            self.inner.period(),
        )
    }
}

fn scope_filter(scope: &DemographicScope) -> FilterKey {
    match scope {
        DemographicScope::Area(code) => FilterKey::new::<String>(Some(&[*code][..]), &[]),
        DemographicScope::Category(name) => FilterKey::new(None, &[name.as_str()]),
    }
}

const NO_CATEGORIES: &[String] = &[];

impl<S: DataSource> DataSource for CachedSource<S> {
    fn period(&self) -> ReportingPeriod {
        self.inner.period()
    }

    fn areas(&self) -> Result<Vec<Area>, DashboardError> {
        let key = self.key(Dataset::Areas, None, NO_CATEGORIES);
        self.cache.get_or_fetch(key, || self.inner.areas())
    }

    fn area(&self, code: AreaCode) -> Result<Option<Area>, DashboardError> {
        let key = self.key(Dataset::Area, Some(&[code][..]), NO_CATEGORIES);
        let rows = self
            .cache
            .get_or_fetch(key, || Ok(self.inner.area(code)?.into_iter().collect()))?;
        Ok(rows.into_iter().next())
    }

    fn categories(&self) -> Result<Vec<String>, DashboardError> {
        let key = self.key(Dataset::Categories, None, NO_CATEGORIES);
        self.cache.get_or_fetch(key, || self.inner.categories())
    }

    fn sales_by_area(
        &self,
        areas: Option<&[AreaCode]>,
        categories: &[String],
    ) -> Result<Vec<AreaSales>, DashboardError> {
        let key = self.key(Dataset::Sales, areas, categories);
        self.cache
            .get_or_fetch(key, || self.inner.sales_by_area(areas, categories))
    }

    fn floating_population(
        &self,
        areas: Option<&[AreaCode]>,
    ) -> Result<Vec<FloatingPopulation>, DashboardError> {
        let key = self.key(Dataset::FloatingPopulation, areas, NO_CATEGORIES);
        self.cache
            .get_or_fetch(key, || self.inner.floating_population(areas))
    }

    fn resident_worker(
        &self,
        areas: Option<&[AreaCode]>,
    ) -> Result<Vec<ResidentWorker>, DashboardError> {
        let key = self.key(Dataset::ResidentWorker, areas, NO_CATEGORIES);
        self.cache.get_or_fetch(key, || self.inner.resident_worker(areas))
    }

    fn expenditure_by_dong(&self) -> Result<Vec<DongExpenditure>, DashboardError> {
        let key = self.key(Dataset::Expenditure, None, NO_CATEGORIES);
        self.cache.get_or_fetch(key, || self.inner.expenditure_by_dong())
    }

    fn area_dong_map(&self) -> Result<Vec<AreaDong>, DashboardError> {
        let key = self.key(Dataset::AreaDongMap, None, NO_CATEGORIES);
        self.cache.get_or_fetch(key, || self.inner.area_dong_map())
    }

    fn category_sales_in_area(
        &self,
        area: AreaCode,
        categories: &[String],
    ) -> Result<Vec<SalesShopRow>, DashboardError> {
        let key = self.key(Dataset::CategorySalesInArea, Some(&[area][..]), categories);
        self.cache
            .get_or_fetch(key, || self.inner.category_sales_in_area(area, categories))
    }

    fn area_sales_for_category(
        &self,
        category: &str,
    ) -> Result<Vec<SalesShopRow>, DashboardError> {
        let key = CacheKey::new(
            Dataset::AreaSalesForCategory,
            FilterKey::new(None, &[category]),
            self.inner.period(),
        );
        self.cache
            .get_or_fetch(key, || self.inner.area_sales_for_category(category))
    }

    fn gender_sales(&self, scope: &DemographicScope) -> Result<Vec<GenderSales>, DashboardError> {
        let key = CacheKey::new(Dataset::GenderSales, scope_filter(scope), self.inner.period());
        self.cache.get_or_fetch(key, || self.inner.gender_sales(scope))
    }

    fn age_sales(&self, scope: &DemographicScope) -> Result<Vec<AgeSales>, DashboardError> {
        let key = CacheKey::new(Dataset::AgeSales, scope_filter(scope), self.inner.period());
        self.cache.get_or_fetch(key, || self.inner.age_sales(scope))
    }

    fn area_time_sales_for_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<AreaTimeSales>, DashboardError> {
        let key = CacheKey::new(
            Dataset::AreaTimeSales,
            FilterKey::new(None, &[category]),
            self.inner.period(),
        )
        .with_limit(limit);
        self.cache
            .get_or_fetch(key, || self.inner.area_time_sales_for_category(category, limit))
    }
}

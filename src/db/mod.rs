//! Database Module
//!
//! SQLite 집계 조회 (읽기 전용)

#[cfg(test)]
pub(crate) mod fixtures;
mod schema;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use crate::config::{ReportingPeriod, FOOD10};
use crate::data::DataSource;
use crate::error::DashboardError;
use crate::models::{
    AgeSales, Area, AreaCode, AreaDong, AreaSales, AreaTimeSales, DemographicScope,
    DongExpenditure, FloatingPopulation, GenderSales, ResidentWorker, SalesShopRow,
};

/// 공유 데이터베이스 핸들 (보고 기간 고정)
pub struct DbState {
    db: Mutex<Database>,
    period: ReportingPeriod,
}

impl DbState {
    pub fn new(db: Database, period: ReportingPeriod) -> Self {
        Self {
            db: Mutex::new(db),
            period,
        }
    }

    fn db(&self) -> Result<MutexGuard<'_, Database>, DashboardError> {
        self.db
            .lock()
            .map_err(|e| DashboardError::Lock(format!("Failed to acquire database lock: {}", e)))
    }
}

/// 데이터베이스 래퍼
pub struct Database {
    conn: Connection,
}

/// `?, ?, ?` 형태의 IN 목록 자리표시자
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn period_params(period: ReportingPeriod) -> [Value; 2] {
    [
        Value::Integer(i64::from(period.from)),
        Value::Integer(i64::from(period.to)),
    ]
}

/// NULL 평균은 0 으로
fn avg_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<f64> {
    Ok(row.get::<_, Option<f64>>(idx)?.unwrap_or(0.0))
}

fn slots<const N: usize>(row: &Row<'_>, start: usize) -> rusqlite::Result<[f64; N]> {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = avg_col(row, start + i)?;
    }
    Ok(out)
}

const AREA_SELECT: &str =
    "SELECT code, name, gu, dong, dong_code, lon, lat FROM Commercial_Area";

fn area_row(row: &Row<'_>) -> rusqlite::Result<Area> {
    Ok(Area {
        code: row.get(0)?,
        name: row.get(1)?,
        gu: row.get(2)?,
        dong: row.get(3)?,
        dong_code: row.get(4)?,
        lon: row.get(5)?,
        lat: row.get(6)?,
    })
}

fn sales_shop_row(row: &Row<'_>) -> rusqlite::Result<SalesShopRow> {
    Ok(SalesShopRow {
        area_code: row.get(0)?,
        area_name: row.get(1)?,
        gu: row.get(2)?,
        dong: row.get(3)?,
        category: row.get(4)?,
        total_sales: row.get(5)?,
        shop_count: row.get(6)?,
    })
}

/// 매출은 점포(store_id)별로 먼저 합산해 점포수가 요일구분 행 수만큼 부풀지 않게 함
const SALES_SHOP_SELECT: &str = "
    SELECT ca.code, ca.name, ca.gu, ca.dong, cat.name AS category,
           CAST(TOTAL(s.sales) AS INTEGER) AS total_sales,
           CAST(TOTAL(sh.shop_count) AS INTEGER) AS shop_count
    FROM Shop_Count sh
    JOIN Commercial_Area ca ON ca.code = sh.commercial_area_code
    JOIN Service_Category cat ON cat.code = sh.service_category_code
    JOIN (SELECT store_id, TOTAL(sales) AS sales FROM Sales_Daytype GROUP BY store_id) s
      ON s.store_id = sh.id";

impl Database {
    /// 새 데이터베이스 연결 생성
    pub fn new(path: &Path) -> Result<Self, DashboardError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, DashboardError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// 데이터베이스 스키마 초기화
    pub fn initialize(&self) -> Result<(), DashboardError> {
        self.conn.execute_batch(schema::CREATE_SCHEMA)?;
        Ok(())
    }

    /// 상권 목록 (좌표가 없는 상권 포함, 지도 제외는 렌더링 단계에서)
    pub fn list_areas(&self) -> Result<Vec<Area>, DashboardError> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY gu, dong, name",
            AREA_SELECT
        ))?;
        let iter = stmt.query_map([], area_row)?;

        let mut out = Vec::new();
        for area in iter {
            out.push(area?);
        }
        Ok(out)
    }

    /// 코드로 상권 하나 조회
    pub fn find_area(&self, code: AreaCode) -> Result<Option<Area>, DashboardError> {
        let area = self
            .conn
            .query_row(&format!("{} WHERE code = ?1", AREA_SELECT), [code], area_row)
            .optional()?;
        Ok(area)
    }

    /// 저장된 업종 중 외식 10종
    pub fn list_categories(&self) -> Result<Vec<String>, DashboardError> {
        let sql = format!(
            "SELECT name FROM Service_Category WHERE name IN ({}) ORDER BY name",
            placeholders(FOOD10.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(params_from_iter(FOOD10.iter()), |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for name in iter {
            names.push(name?);
        }
        Ok(names)
    }

    /// 상권별 매출 합계 (업종 필터, 선택 상권 필터)
    pub fn sales_by_area(
        &self,
        period: ReportingPeriod,
        areas: Option<&[AreaCode]>,
        categories: &[String],
    ) -> Result<Vec<AreaSales>, DashboardError> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let mut params: Vec<Value> = period_params(period).to_vec();
        params.extend(categories.iter().cloned().map(Value::Text));
        let mut sql = format!(
            "SELECT sc.commercial_area_code, TOTAL(sdt.sales) AS sales_sum
             FROM Shop_Count sc
             JOIN Sales_Daytype sdt ON sdt.store_id = sc.id
             JOIN Service_Category cat ON cat.code = sc.service_category_code
             WHERE sc.year_quarter BETWEEN ? AND ?
               AND cat.name IN ({})",
            placeholders(categories.len())
        );
        if let Some(codes) = areas.filter(|a| !a.is_empty()) {
            sql.push_str(&format!(
                " AND sc.commercial_area_code IN ({})",
                placeholders(codes.len())
            ));
            params.extend(codes.iter().map(|c| Value::Integer(*c)));
        }
        sql.push_str(" GROUP BY sc.commercial_area_code ORDER BY sc.commercial_area_code");

        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(params_from_iter(params), |row| {
            Ok(AreaSales {
                area_code: row.get(0)?,
                sales_sum: row.get(1)?,
            })
        })?;

        let mut out = Vec::new();
        for row in iter {
            out.push(row?);
        }
        tracing::debug!(rows = out.len(), "fetched sales by area");
        Ok(out)
    }

    /// 상권별 유동인구 평균
    pub fn floating_population(
        &self,
        period: ReportingPeriod,
        areas: Option<&[AreaCode]>,
    ) -> Result<Vec<FloatingPopulation>, DashboardError> {
        let mut params: Vec<Value> = period_params(period).to_vec();
        let mut sql = String::from(
            "SELECT commercial_area_code,
                    AVG(mon_pop), AVG(tue_pop), AVG(wed_pop), AVG(thu_pop),
                    AVG(fri_pop), AVG(sat_pop), AVG(sun_pop),
                    AVG(t00_06_pop), AVG(t06_11_pop), AVG(t11_14_pop),
                    AVG(t14_17_pop), AVG(t17_21_pop), AVG(t21_24_pop),
                    AVG(male_pop), AVG(female_pop)
             FROM Floating_Population
             WHERE year_quarter BETWEEN ? AND ?",
        );
        if let Some(codes) = areas.filter(|a| !a.is_empty()) {
            sql.push_str(&format!(
                " AND commercial_area_code IN ({})",
                placeholders(codes.len())
            ));
            params.extend(codes.iter().map(|c| Value::Integer(*c)));
        }
        sql.push_str(" GROUP BY commercial_area_code ORDER BY commercial_area_code");

        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(params_from_iter(params), |row| {
            Ok(FloatingPopulation {
                area_code: row.get(0)?,
                weekday: slots::<7>(row, 1)?,
                time_slots: slots::<6>(row, 8)?,
                gender: slots::<2>(row, 14)?,
            })
        })?;

        let mut out = Vec::new();
        for row in iter {
            out.push(row?);
        }
        tracing::debug!(rows = out.len(), "fetched floating population");
        Ok(out)
    }

    /// 상권별 상주/직장 인구: 분기별 합계의 분기 평균
    pub fn resident_worker(
        &self,
        period: ReportingPeriod,
        areas: Option<&[AreaCode]>,
    ) -> Result<Vec<ResidentWorker>, DashboardError> {
        let mut params: Vec<Value> = period_params(period).to_vec();
        let mut area_clause = String::new();
        if let Some(codes) = areas.filter(|a| !a.is_empty()) {
            area_clause = format!(
                " AND pg.commercial_area_code IN ({})",
                placeholders(codes.len())
            );
            params.extend(codes.iter().map(|c| Value::Integer(*c)));
        }

        let sql = format!(
            "WITH agg AS (
               SELECT pg.year_quarter, pg.commercial_area_code, pg.pop_type,
                      TOTAL(pg.population) AS pop_sum
               FROM Population_GA pg
               WHERE pg.year_quarter BETWEEN ? AND ?{}
               GROUP BY pg.year_quarter, pg.commercial_area_code, pg.pop_type
             ),
             per_type AS (
               SELECT commercial_area_code, pop_type, AVG(pop_sum) AS pop_avg
               FROM agg
               GROUP BY commercial_area_code, pop_type
             )
             SELECT commercial_area_code,
                    MAX(CASE WHEN pop_type = 'RESIDENT' THEN pop_avg ELSE 0 END),
                    MAX(CASE WHEN pop_type = 'WORKING' THEN pop_avg ELSE 0 END)
             FROM per_type
             GROUP BY commercial_area_code
             ORDER BY commercial_area_code",
            area_clause
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(params_from_iter(params), |row| {
            Ok(ResidentWorker {
                area_code: row.get(0)?,
                resident: avg_col(row, 1)?,
                worker: avg_col(row, 2)?,
            })
        })?;

        let mut out = Vec::new();
        for row in iter {
            out.push(row?);
        }
        tracing::debug!(rows = out.len(), "fetched resident/worker population");
        Ok(out)
    }

    /// 행정동별 지출 합계
    pub fn expenditure_by_dong(
        &self,
        period: ReportingPeriod,
    ) -> Result<Vec<DongExpenditure>, DashboardError> {
        let mut stmt = self.conn.prepare(
            "SELECT i.dong_code, d.name,
                    TOTAL(i.total_expenditure), TOTAL(i.food_expenditure)
             FROM Income i
             JOIN Dong d ON d.code = i.dong_code
             WHERE i.year_quarter BETWEEN ? AND ?
             GROUP BY i.dong_code, d.name
             ORDER BY i.dong_code",
        )?;
        let iter = stmt.query_map(params_from_iter(period_params(period)), |row| {
            Ok(DongExpenditure {
                dong_code: row.get(0)?,
                dong_name: row.get(1)?,
                total_expenditure: row.get(2)?,
                food_expenditure: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for row in iter {
            out.push(row?);
        }
        tracing::debug!(rows = out.len(), "fetched expenditure by dong");
        Ok(out)
    }

    /// 상권 → 행정동 매핑
    pub fn area_dong_map(&self) -> Result<Vec<AreaDong>, DashboardError> {
        let mut stmt = self.conn.prepare(
            "SELECT ca.code, ca.name, ca.dong_code, d.name
             FROM Commercial_Area ca
             LEFT JOIN Dong d ON d.code = ca.dong_code
             ORDER BY ca.code",
        )?;
        let iter = stmt.query_map([], |row| {
            Ok(AreaDong {
                area_code: row.get(0)?,
                area_name: row.get(1)?,
                dong_code: row.get(2)?,
                dong_name: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for row in iter {
            out.push(row?);
        }
        Ok(out)
    }

    /// 한 상권의 업종별 매출/점포수 (매출 내림차순)
    pub fn category_sales_in_area(
        &self,
        period: ReportingPeriod,
        area: AreaCode,
        categories: &[String],
    ) -> Result<Vec<SalesShopRow>, DashboardError> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let mut params: Vec<Value> = vec![Value::Integer(area)];
        params.extend(categories.iter().cloned().map(Value::Text));
        params.extend(period_params(period));
        let sql = format!(
            "{}
             WHERE sh.commercial_area_code = ?
               AND cat.name IN ({})
               AND sh.year_quarter BETWEEN ? AND ?
             GROUP BY ca.code, ca.name, ca.gu, ca.dong, cat.name
             ORDER BY total_sales DESC, cat.name",
            SALES_SHOP_SELECT,
            placeholders(categories.len())
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(params_from_iter(params), sales_shop_row)?;

        let mut out = Vec::new();
        for row in iter {
            out.push(row?);
        }
        tracing::debug!(area, rows = out.len(), "fetched category sales in area");
        Ok(out)
    }

    /// 한 업종의 상권별 매출/점포수 (매출 내림차순)
    pub fn area_sales_for_category(
        &self,
        period: ReportingPeriod,
        category: &str,
    ) -> Result<Vec<SalesShopRow>, DashboardError> {
        let mut params: Vec<Value> = vec![Value::Text(category.to_string())];
        params.extend(period_params(period));
        let sql = format!(
            "{}
             WHERE cat.name = ?
               AND sh.year_quarter BETWEEN ? AND ?
             GROUP BY ca.code, ca.name, ca.gu, ca.dong, cat.name
             ORDER BY total_sales DESC, ca.code",
            SALES_SHOP_SELECT
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(params_from_iter(params), sales_shop_row)?;

        let mut out = Vec::new();
        for row in iter {
            out.push(row?);
        }
        tracing::debug!(category, rows = out.len(), "fetched area sales for category");
        Ok(out)
    }

    /// 성별 또는 연령대 매출 (`table` 은 Sales_Sex / Sales_Age, `column` 은 sex / age)
    fn demographic_sales(
        &self,
        period: ReportingPeriod,
        scope: &DemographicScope,
        table: &str,
        column: &str,
    ) -> Result<Vec<(String, i64)>, DashboardError> {
        let (join, condition, scope_param) = match scope {
            DemographicScope::Area(code) => ("", "sh.commercial_area_code = ?", Value::Integer(*code)),
            DemographicScope::Category(name) => (
                "JOIN Service_Category cat ON cat.code = sh.service_category_code",
                "cat.name = ?",
                Value::Text(name.clone()),
            ),
        };

        let sql = format!(
            "SELECT d.{column}, CAST(TOTAL(d.sales) AS INTEGER) AS sales
             FROM Shop_Count sh
             {join}
             JOIN {table} d ON d.store_id = sh.id
             WHERE {condition}
               AND sh.year_quarter BETWEEN ? AND ?
             GROUP BY d.{column}
             ORDER BY d.{column}",
        );
        let mut params = vec![scope_param];
        params.extend(period_params(period));

        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(params_from_iter(params), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut out = Vec::new();
        for row in iter {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn gender_sales(
        &self,
        period: ReportingPeriod,
        scope: &DemographicScope,
    ) -> Result<Vec<GenderSales>, DashboardError> {
        Ok(self
            .demographic_sales(period, scope, "Sales_Sex", "sex")?
            .into_iter()
            .map(|(sex, sales)| GenderSales { sex, sales })
            .collect())
    }

    pub fn age_sales(
        &self,
        period: ReportingPeriod,
        scope: &DemographicScope,
    ) -> Result<Vec<AgeSales>, DashboardError> {
        Ok(self
            .demographic_sales(period, scope, "Sales_Age", "age")?
            .into_iter()
            .map(|(age, sales)| AgeSales { age, sales })
            .collect())
    }

    /// 업종 매출 상위 상권의 시간대별 유동인구
    pub fn area_time_sales_for_category(
        &self,
        period: ReportingPeriod,
        category: &str,
        limit: usize,
    ) -> Result<Vec<AreaTimeSales>, DashboardError> {
        let sql = "
            WITH sales AS (
              SELECT sh.commercial_area_code AS code, TOTAL(sdt.sales) AS total_sales
              FROM Shop_Count sh
              JOIN Service_Category cat ON cat.code = sh.service_category_code
              JOIN Sales_Daytype sdt ON sdt.store_id = sh.id
              WHERE cat.name = ?
                AND sh.year_quarter BETWEEN ? AND ?
              GROUP BY sh.commercial_area_code
            ),
            fp AS (
              SELECT commercial_area_code AS code,
                     AVG(t00_06_pop) AS t00_06, AVG(t06_11_pop) AS t06_11,
                     AVG(t11_14_pop) AS t11_14, AVG(t14_17_pop) AS t14_17,
                     AVG(t17_21_pop) AS t17_21, AVG(t21_24_pop) AS t21_24
              FROM Floating_Population
              WHERE year_quarter BETWEEN ? AND ?
              GROUP BY commercial_area_code
            )
            SELECT ca.code, ca.name,
                   fp.t00_06, fp.t06_11, fp.t11_14, fp.t14_17, fp.t17_21, fp.t21_24,
                   CAST(sales.total_sales AS INTEGER)
            FROM sales
            JOIN fp ON fp.code = sales.code
            JOIN Commercial_Area ca ON ca.code = sales.code
            ORDER BY sales.total_sales DESC, ca.code
            LIMIT ?";

        let mut params: Vec<Value> = vec![Value::Text(category.to_string())];
        params.extend(period_params(period));
        params.extend(period_params(period));
        params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));

        let mut stmt = self.conn.prepare(sql)?;
        let iter = stmt.query_map(params_from_iter(params), |row| {
            Ok(AreaTimeSales {
                area_code: row.get(0)?,
                area_name: row.get(1)?,
                time_slots: slots::<6>(row, 2)?,
                total_sales: row.get(8)?,
            })
        })?;

        let mut out = Vec::new();
        for row in iter {
            out.push(row?);
        }
        tracing::debug!(category, rows = out.len(), "fetched top areas time pattern");
        Ok(out)
    }
}

impl DataSource for DbState {
    fn period(&self) -> ReportingPeriod {
        self.period
    }

    fn areas(&self) -> Result<Vec<Area>, DashboardError> {
        self.db()?.list_areas()
    }

    fn area(&self, code: AreaCode) -> Result<Option<Area>, DashboardError> {
        self.db()?.find_area(code)
    }

    fn categories(&self) -> Result<Vec<String>, DashboardError> {
        self.db()?.list_categories()
    }

    fn sales_by_area(
        &self,
        areas: Option<&[AreaCode]>,
        categories: &[String],
    ) -> Result<Vec<AreaSales>, DashboardError> {
        self.db()?.sales_by_area(self.period, areas, categories)
    }

    fn floating_population(
        &self,
        areas: Option<&[AreaCode]>,
    ) -> Result<Vec<FloatingPopulation>, DashboardError> {
        self.db()?.floating_population(self.period, areas)
    }

    fn resident_worker(
        &self,
        areas: Option<&[AreaCode]>,
    ) -> Result<Vec<ResidentWorker>, DashboardError> {
        self.db()?.resident_worker(self.period, areas)
    }

    fn expenditure_by_dong(&self) -> Result<Vec<DongExpenditure>, DashboardError> {
        self.db()?.expenditure_by_dong(self.period)
    }

    fn area_dong_map(&self) -> Result<Vec<AreaDong>, DashboardError> {
        self.db()?.area_dong_map()
    }

    fn category_sales_in_area(
        &self,
        area: AreaCode,
        categories: &[String],
    ) -> Result<Vec<SalesShopRow>, DashboardError> {
        self.db()?.category_sales_in_area(self.period, area, categories)
    }

    fn area_sales_for_category(
        &self,
        category: &str,
    ) -> Result<Vec<SalesShopRow>, DashboardError> {
        self.db()?.area_sales_for_category(self.period, category)
    }

    fn gender_sales(&self, scope: &DemographicScope) -> Result<Vec<GenderSales>, DashboardError> {
        self.db()?.gender_sales(self.period, scope)
    }

    fn age_sales(&self, scope: &DemographicScope) -> Result<Vec<AgeSales>, DashboardError> {
        self.db()?.age_sales(self.period, scope)
    }

    fn area_time_sales_for_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<AreaTimeSales>, DashboardError> {
        self.db()?
            .area_time_sales_for_category(self.period, category, limit)
    }
}

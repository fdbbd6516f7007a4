//! 테스트용 인메모리 데이터 소스 (호출 횟수 기록)

use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::ReportingPeriod;
use crate::data::DataSource;
use crate::error::DashboardError;
use crate::models::{
    AgeSales, Area, AreaCode, AreaDong, AreaSales, AreaTimeSales, DemographicScope,
    DongExpenditure, FloatingPopulation, GenderSales, ResidentWorker, SalesShopRow,
};

pub(crate) struct FakeSource {
    pub period: ReportingPeriod,
    pub areas: Vec<Area>,
    /// (상권, 업종, 매출)
    pub sales: Vec<(AreaCode, String, f64)>,
    pub floating: Vec<FloatingPopulation>,
    pub resident: Vec<ResidentWorker>,
    pub expenditure: Vec<DongExpenditure>,
    pub shop_rows: Vec<SalesShopRow>,
    pub gender: Vec<(DemographicScope, GenderSales)>,
    pub age: Vec<(DemographicScope, AgeSales)>,
    /// (업종, 상권 시간대 행)
    pub time_sales: Vec<(String, AreaTimeSales)>,
    fail: bool,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeSource {
    pub fn empty() -> Self {
        Self {
            period: ReportingPeriod::default(),
            areas: Vec::new(),
            sales: Vec::new(),
            floating: Vec::new(),
            resident: Vec::new(),
            expenditure: Vec::new(),
            shop_rows: Vec::new(),
            gender: Vec::new(),
            age: Vec::new(),
            time_sales: Vec::new(),
            fail: false,
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// 모든 조회가 Database 에러를 반환
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    pub fn with_period(mut self, period: ReportingPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(method)
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, method: &'static str) -> Result<(), DashboardError> {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
        if self.fail {
            return Err(DashboardError::Database(rusqlite::Error::QueryReturnedNoRows));
        }
        Ok(())
    }
}

pub(crate) fn area(
    code: AreaCode,
    name: &str,
    gu: &str,
    dong: &str,
    dong_code: &str,
    coords: Option<(f64, f64)>,
) -> Area {
    Area {
        code,
        name: name.to_string(),
        gu: Some(gu.to_string()),
        dong: Some(dong.to_string()),
        dong_code: Some(dong_code.to_string()),
        lat: coords.map(|(lat, _)| lat),
        lon: coords.map(|(_, lon)| lon),
    }
}

pub(crate) fn shop_row(area: &Area, category: &str, total_sales: i64, shop_count: i64) -> SalesShopRow {
    SalesShopRow {
        area_code: area.code,
        area_name: area.name.clone(),
        gu: area.gu.clone(),
        dong: area.dong.clone(),
        category: category.to_string(),
        total_sales,
        shop_count,
    }
}

/// 상권 1~4 (3, 4 는 같은 명동) 과 매출/인구/지출 데이터
///
/// 상권별 전체 업종 매출: 1=600, 2=1100, 3=2000, 4=300 (평균 1000).
pub(crate) fn sample_source() -> FakeSource {
    let areas = vec![
        area(1, "연남동 상권", "마포구", "연남동", "D1", Some((37.562, 126.923))),
        area(2, "홍대입구역", "마포구", "서교동", "D2", Some((37.557, 126.924))),
        area(3, "명동 거리", "중구", "명동", "D3", Some((37.563, 126.985))),
        area(4, "을지로 골목", "중구", "명동", "D3", Some((37.566, 126.991))),
    ];

    let sales = vec![
        (1, "한식음식점".to_string(), 400.0),
        (1, "제과점".to_string(), 200.0),
        (2, "한식음식점".to_string(), 1000.0),
        (2, "커피-음료".to_string(), 100.0),
        (3, "한식음식점".to_string(), 2000.0),
        (4, "커피-음료".to_string(), 300.0),
    ];

    let floating = vec![
        FloatingPopulation {
            area_code: 1,
            weekday: [100.0, 100.0, 100.0, 100.0, 100.0, 250.0, 250.0],
            time_slots: [10.0, 50.0, 120.0, 80.0, 150.0, 20.0],
            gender: [400.0, 600.0],
        },
        FloatingPopulation {
            area_code: 2,
            weekday: [300.0, 300.0, 300.0, 300.0, 300.0, 250.0, 250.0],
            time_slots: [40.0, 200.0, 300.0, 250.0, 400.0, 150.0],
            gender: [1800.0, 2200.0],
        },
        FloatingPopulation {
            area_code: 3,
            weekday: [900.0, 900.0, 900.0, 900.0, 1000.0, 1200.0, 1100.0],
            time_slots: [20.0, 300.0, 500.0, 450.0, 600.0, 100.0],
            gender: [3000.0, 3500.0],
        },
        FloatingPopulation {
            area_code: 4,
            weekday: [0.0; 7],
            time_slots: [0.0; 6],
            gender: [0.0; 2],
        },
    ];

    let resident = vec![
        ResidentWorker { area_code: 1, resident: 150.0, worker: 300.0 },
        ResidentWorker { area_code: 2, resident: 200.0, worker: 800.0 },
        ResidentWorker { area_code: 3, resident: 100.0, worker: 1000.0 },
        ResidentWorker { area_code: 4, resident: 50.0, worker: 250.0 },
    ];

    let expenditure = vec![
        DongExpenditure {
            dong_code: "D1".to_string(),
            dong_name: "연남동".to_string(),
            total_expenditure: 1500.0,
            food_expenditure: 400.0,
        },
        DongExpenditure {
            dong_code: "D2".to_string(),
            dong_name: "서교동".to_string(),
            total_expenditure: 2000.0,
            food_expenditure: 500.0,
        },
        DongExpenditure {
            dong_code: "D3".to_string(),
            dong_name: "명동".to_string(),
            total_expenditure: 3000.0,
            food_expenditure: 900.0,
        },
    ];

    let shop_rows = vec![
        shop_row(&areas[0], "한식음식점", 400, 4),
        shop_row(&areas[0], "제과점", 200, 1),
        shop_row(&areas[1], "한식음식점", 1000, 5),
        shop_row(&areas[1], "커피-음료", 100, 0),
        shop_row(&areas[2], "한식음식점", 2000, 10),
        shop_row(&areas[3], "커피-음료", 300, 3),
    ];

    let korean = DemographicScope::Category("한식음식점".to_string());
    let gender = vec![
        (DemographicScope::Area(1), GenderSales { sex: "F".to_string(), sales: 300 }),
        (DemographicScope::Area(1), GenderSales { sex: "M".to_string(), sales: 300 }),
        (korean.clone(), GenderSales { sex: "F".to_string(), sales: 1550 }),
        (korean.clone(), GenderSales { sex: "M".to_string(), sales: 1850 }),
    ];
    let age = vec![
        (DemographicScope::Area(1), AgeSales { age: "THIRTIES".to_string(), sales: 200 }),
        (DemographicScope::Area(1), AgeSales { age: "20".to_string(), sales: 150 }),
        (DemographicScope::Area(1), AgeSales { age: "20s".to_string(), sales: 50 }),
        (DemographicScope::Area(1), AgeSales { age: "60대".to_string(), sales: 100 }),
        (korean.clone(), AgeSales { age: "20대".to_string(), sales: 700 }),
        (korean.clone(), AgeSales { age: "30대".to_string(), sales: 2200 }),
    ];

    let time_sales = vec![
        (
            "한식음식점".to_string(),
            AreaTimeSales {
                area_code: 3,
                area_name: "명동 거리".to_string(),
                time_slots: [20.0, 300.0, 500.0, 450.0, 600.0, 100.0],
                total_sales: 2000,
            },
        ),
        (
            "한식음식점".to_string(),
            AreaTimeSales {
                area_code: 2,
                area_name: "홍대입구역".to_string(),
                time_slots: [40.0, 200.0, 300.0, 250.0, 400.0, 150.0],
                total_sales: 1000,
            },
        ),
    ];

    FakeSource {
        areas,
        sales,
        floating,
        resident,
        expenditure,
        shop_rows,
        gender,
        age,
        time_sales,
        ..FakeSource::empty()
    }
}

fn in_areas(areas: Option<&[AreaCode]>, code: AreaCode) -> bool {
    match areas {
        Some(codes) if !codes.is_empty() => codes.contains(&code),
        _ => true,
    }
}

impl DataSource for FakeSource {
    fn period(&self) -> ReportingPeriod {
        self.period
    }

    fn areas(&self) -> Result<Vec<Area>, DashboardError> {
        self.record("areas")?;
        Ok(self.areas.clone())
    }

    fn area(&self, code: AreaCode) -> Result<Option<Area>, DashboardError> {
        self.record("area")?;
        Ok(self.areas.iter().find(|a| a.code == code).cloned())
    }

    fn categories(&self) -> Result<Vec<String>, DashboardError> {
        self.record("categories")?;
        let mut names: Vec<String> = self.sales.iter().map(|(_, c, _)| c.clone()).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn sales_by_area(
        &self,
        areas: Option<&[AreaCode]>,
        categories: &[String],
    ) -> Result<Vec<AreaSales>, DashboardError> {
        self.record("sales_by_area")?;
        let mut sums: Vec<AreaSales> = Vec::new();
        for (code, category, amount) in &self.sales {
            if !categories.contains(category) || !in_areas(areas, *code) {
                continue;
            }
            match sums.iter_mut().find(|s| s.area_code == *code) {
                Some(existing) => existing.sales_sum += amount,
                None => sums.push(AreaSales {
                    area_code: *code,
                    sales_sum: *amount,
                }),
            }
        }
        sums.sort_by_key(|s| s.area_code);
        Ok(sums)
    }

    fn floating_population(
        &self,
        areas: Option<&[AreaCode]>,
    ) -> Result<Vec<FloatingPopulation>, DashboardError> {
        self.record("floating_population")?;
        Ok(self
            .floating
            .iter()
            .filter(|f| in_areas(areas, f.area_code))
            .cloned()
            .collect())
    }

    fn resident_worker(
        &self,
        areas: Option<&[AreaCode]>,
    ) -> Result<Vec<ResidentWorker>, DashboardError> {
        self.record("resident_worker")?;
        Ok(self
            .resident
            .iter()
            .filter(|r| in_areas(areas, r.area_code))
            .cloned()
            .collect())
    }

    fn expenditure_by_dong(&self) -> Result<Vec<DongExpenditure>, DashboardError> {
        self.record("expenditure_by_dong")?;
        Ok(self.expenditure.clone())
    }

    fn area_dong_map(&self) -> Result<Vec<AreaDong>, DashboardError> {
        self.record("area_dong_map")?;
        Ok(self
            .areas
            .iter()
            .map(|a| AreaDong {
                area_code: a.code,
                area_name: a.name.clone(),
                dong_code: a.dong_code.clone(),
                dong_name: a.dong.clone(),
            })
            .collect())
    }

    fn category_sales_in_area(
        &self,
        area: AreaCode,
        categories: &[String],
    ) -> Result<Vec<SalesShopRow>, DashboardError> {
        self.record("category_sales_in_area")?;
        Ok(self
            .shop_rows
            .iter()
            .filter(|r| r.area_code == area && categories.contains(&r.category))
            .cloned()
            .collect())
    }

    fn area_sales_for_category(
        &self,
        category: &str,
    ) -> Result<Vec<SalesShopRow>, DashboardError> {
        self.record("area_sales_for_category")?;
        Ok(self
            .shop_rows
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect())
    }

    fn gender_sales(&self, scope: &DemographicScope) -> Result<Vec<GenderSales>, DashboardError> {
        self.record("gender_sales")?;
        Ok(self
            .gender
            .iter()
            .filter(|(s, _)| s == scope)
            .map(|(_, g)| g.clone())
            .collect())
    }

    fn age_sales(&self, scope: &DemographicScope) -> Result<Vec<AgeSales>, DashboardError> {
        self.record("age_sales")?;
        Ok(self
            .age
            .iter()
            .filter(|(s, _)| s == scope)
            .map(|(_, a)| a.clone())
            .collect())
    }

    fn area_time_sales_for_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<AreaTimeSales>, DashboardError> {
        self.record("area_time_sales_for_category")?;
        Ok(self
            .time_sales
            .iter()
            .filter(|(c, _)| c == category)
            .map(|(_, t)| t.clone())
            .take(limit)
            .collect())
    }
}

//! Database Schema
//!
//! 상권/업종/매출/인구/지출 테이블 스키마 정의

/// 데이터베이스 스키마 생성 SQL
pub const CREATE_SCHEMA: &str = r#"
-- 행정동 테이블
CREATE TABLE IF NOT EXISTS Dong (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

-- 상권 테이블
CREATE TABLE IF NOT EXISTS Commercial_Area (
    code INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    gu TEXT,
    dong TEXT,
    dong_code TEXT,
    lon REAL,
    lat REAL,
    FOREIGN KEY (dong_code) REFERENCES Dong(code)
);

-- 업종 테이블
CREATE TABLE IF NOT EXISTS Service_Category (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

-- 점포수 테이블 (분기 x 상권 x 업종, 매출 테이블의 store_id 가 참조)
CREATE TABLE IF NOT EXISTS Shop_Count (
    id INTEGER PRIMARY KEY,
    year_quarter INTEGER NOT NULL,
    commercial_area_code INTEGER NOT NULL,
    service_category_code TEXT NOT NULL,
    shop_count INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (commercial_area_code) REFERENCES Commercial_Area(code),
    FOREIGN KEY (service_category_code) REFERENCES Service_Category(code)
);

CREATE INDEX IF NOT EXISTS idx_shop_count_quarter ON Shop_Count(year_quarter);
CREATE INDEX IF NOT EXISTS idx_shop_count_area ON Shop_Count(commercial_area_code);

-- 요일구분별 매출
CREATE TABLE IF NOT EXISTS Sales_Daytype (
    store_id INTEGER NOT NULL,
    day_type TEXT NOT NULL,
    sales INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (store_id) REFERENCES Shop_Count(id)
);

-- 성별 매출
CREATE TABLE IF NOT EXISTS Sales_Sex (
    store_id INTEGER NOT NULL,
    sex TEXT NOT NULL,
    sales INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (store_id) REFERENCES Shop_Count(id)
);

-- 연령대 매출
CREATE TABLE IF NOT EXISTS Sales_Age (
    store_id INTEGER NOT NULL,
    age TEXT NOT NULL,
    sales INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (store_id) REFERENCES Shop_Count(id)
);

CREATE INDEX IF NOT EXISTS idx_sales_daytype_store ON Sales_Daytype(store_id);
CREATE INDEX IF NOT EXISTS idx_sales_sex_store ON Sales_Sex(store_id);
CREATE INDEX IF NOT EXISTS idx_sales_age_store ON Sales_Age(store_id);

-- 유동인구 (요일/시간대/성별)
CREATE TABLE IF NOT EXISTS Floating_Population (
    year_quarter INTEGER NOT NULL,
    commercial_area_code INTEGER NOT NULL,
    mon_pop REAL, tue_pop REAL, wed_pop REAL, thu_pop REAL,
    fri_pop REAL, sat_pop REAL, sun_pop REAL,
    t00_06_pop REAL, t06_11_pop REAL, t11_14_pop REAL,
    t14_17_pop REAL, t17_21_pop REAL, t21_24_pop REAL,
    male_pop REAL, female_pop REAL,
    FOREIGN KEY (commercial_area_code) REFERENCES Commercial_Area(code)
);

CREATE INDEX IF NOT EXISTS idx_floating_area ON Floating_Population(commercial_area_code, year_quarter);

-- 상주/직장 인구 (pop_type: RESIDENT | WORKING)
CREATE TABLE IF NOT EXISTS Population_GA (
    year_quarter INTEGER NOT NULL,
    commercial_area_code INTEGER NOT NULL,
    pop_type TEXT NOT NULL CHECK (pop_type IN ('RESIDENT', 'WORKING')),
    population REAL NOT NULL DEFAULT 0,
    FOREIGN KEY (commercial_area_code) REFERENCES Commercial_Area(code)
);

CREATE INDEX IF NOT EXISTS idx_population_ga_area ON Population_GA(commercial_area_code, year_quarter);

-- 행정동 소득/지출
CREATE TABLE IF NOT EXISTS Income (
    year_quarter INTEGER NOT NULL,
    dong_code TEXT NOT NULL,
    total_expenditure REAL NOT NULL DEFAULT 0,
    food_expenditure REAL NOT NULL DEFAULT 0,
    FOREIGN KEY (dong_code) REFERENCES Dong(code)
);

CREATE INDEX IF NOT EXISTS idx_income_dong ON Income(dong_code, year_quarter);
"#;

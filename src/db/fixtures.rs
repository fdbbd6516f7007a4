//! 테스트용 인메모리 데이터셋
//!
//! 상권 1(연남동), 2(서교동), 3(명동), 4(좌표 없음) 과 2024 Q3/Q4 데이터.

use rusqlite::params;

use super::Database;

const SEED: &str = r#"
INSERT INTO Dong (code, name) VALUES
    ('1144071000', '연남동'),
    ('1144066000', '서교동'),
    ('1114055000', '명동');

INSERT INTO Commercial_Area (code, name, gu, dong, dong_code, lon, lat) VALUES
    (1, '연남동 상권', '마포구', '연남동', '1144071000', 126.923, 37.562),
    (2, '홍대입구역', '마포구', '서교동', '1144066000', 126.924, 37.557),
    (3, '명동 거리', '중구', '명동', '1114055000', 126.985, 37.563),
    (4, '좌표없는 상권', '중구', '명동', '1114055000', NULL, NULL);

INSERT INTO Service_Category (code, name) VALUES
    ('CS100001', '한식음식점'),
    ('CS100008', '제과점'),
    ('CS100010', '커피-음료'),
    ('CS300002', '편의점');

INSERT INTO Shop_Count (id, year_quarter, commercial_area_code, service_category_code, shop_count) VALUES
    (1, 20244, 1, 'CS100001', 4),
    (2, 20244, 1, 'CS100008', 2),
    (3, 20244, 2, 'CS100001', 5),
    (4, 20244, 2, 'CS100010', 0),
    (5, 20244, 3, 'CS100001', 10),
    (6, 20243, 1, 'CS100001', 3),
    (7, 20244, 1, 'CS300002', 1),
    (8, 20244, 4, 'CS100008', 1);

INSERT INTO Sales_Daytype (store_id, day_type, sales) VALUES
    (1, 'WEEKDAY', 300), (1, 'WEEKEND', 100),
    (2, 'WEEKDAY', 150), (2, 'WEEKEND', 50),
    (3, 'WEEKDAY', 800), (3, 'WEEKEND', 200),
    (4, 'WEEKDAY', 90), (4, 'WEEKEND', 10),
    (5, 'WEEKDAY', 1500), (5, 'WEEKEND', 500),
    (6, 'WEEKDAY', 100), (6, 'WEEKEND', 50),
    (7, 'WEEKDAY', 70),
    (8, 'WEEKDAY', 120);

INSERT INTO Sales_Sex (store_id, sex, sales) VALUES
    (1, 'M', 250), (1, 'F', 150),
    (2, 'M', 50), (2, 'F', 150),
    (3, 'M', 600), (3, 'F', 400),
    (5, 'M', 1000), (5, 'F', 1000);

INSERT INTO Sales_Age (store_id, age, sales) VALUES
    (1, '20대', 200), (1, '30대', 200),
    (3, '20대', 500), (3, '40대', 500),
    (5, '30대', 2000);

INSERT INTO Population_GA (year_quarter, commercial_area_code, pop_type, population) VALUES
    (20244, 1, 'RESIDENT', 100), (20244, 1, 'RESIDENT', 50), (20244, 1, 'WORKING', 300),
    (20244, 2, 'RESIDENT', 200), (20244, 2, 'WORKING', 800),
    (20243, 1, 'RESIDENT', 50);

INSERT INTO Income (year_quarter, dong_code, total_expenditure, food_expenditure) VALUES
    (20244, '1144071000', 1000, 300),
    (20244, '1144071000', 500, 100),
    (20244, '1144066000', 2000, 500),
    (20244, '1114055000', 3000, 900),
    (20243, '1144071000', 999, 99);
"#;

fn insert_floating(
    db: &Database,
    year_quarter: u32,
    area: i64,
    weekday: [f64; 7],
    time_slots: [f64; 6],
    gender: [f64; 2],
) {
    db.conn
        .execute(
            "INSERT INTO Floating_Population (
                year_quarter, commercial_area_code,
                mon_pop, tue_pop, wed_pop, thu_pop, fri_pop, sat_pop, sun_pop,
                t00_06_pop, t06_11_pop, t11_14_pop, t14_17_pop, t17_21_pop, t21_24_pop,
                male_pop, female_pop
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                year_quarter,
                area,
                weekday[0],
                weekday[1],
                weekday[2],
                weekday[3],
                weekday[4],
                weekday[5],
                weekday[6],
                time_slots[0],
                time_slots[1],
                time_slots[2],
                time_slots[3],
                time_slots[4],
                time_slots[5],
                gender[0],
                gender[1],
            ],
        )
        .unwrap();
}

/// 스키마 + 시드 데이터가 들어간 인메모리 DB
pub(crate) fn seeded_database() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.initialize().unwrap();
    db.conn.execute_batch(SEED).unwrap();

    insert_floating(
        &db,
        20244,
        1,
        [100.0, 100.0, 100.0, 100.0, 100.0, 200.0, 200.0],
        [10.0, 50.0, 120.0, 80.0, 150.0, 20.0],
        [400.0, 600.0],
    );
    insert_floating(
        &db,
        20244,
        1,
        [200.0, 200.0, 200.0, 200.0, 200.0, 300.0, 300.0],
        [30.0, 70.0, 140.0, 100.0, 170.0, 40.0],
        [600.0, 800.0],
    );
    insert_floating(
        &db,
        20244,
        2,
        [500.0, 500.0, 500.0, 500.0, 600.0, 900.0, 800.0],
        [40.0, 200.0, 300.0, 250.0, 400.0, 150.0],
        [1800.0, 2200.0],
    );
    insert_floating(
        &db,
        20244,
        3,
        [900.0, 900.0, 900.0, 900.0, 1000.0, 1200.0, 1100.0],
        [20.0, 300.0, 500.0, 450.0, 600.0, 100.0],
        [3000.0, 3500.0],
    );
    insert_floating(
        &db,
        20243,
        1,
        [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        [1.0, 1.0],
    );

    db
}

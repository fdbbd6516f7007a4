//! Seoul Food Dashboard - Backend Library
//!
//! 서울시 상권 외식업 BI 대시보드 백엔드. 집계 조회(SQLite), 필터 상태,
//! 2x2 매출 비교와 인구/지출 집계, 추천 분석, 조회 캐시를 담당합니다.

pub mod charts;
pub mod commands;
pub mod config;
pub mod data;
pub mod db;
pub mod engine;
pub mod error;
pub mod filter;
pub mod models;
pub mod recommend;

#[cfg(test)]
pub(crate) mod testing;

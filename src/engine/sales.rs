//! Sales Comparison
//!
//! 상권 선택 여부 x 업종 전체 여부 (2x2) 에 따라 비교할 두 매출 범위를 고릅니다.
//!
//! | 상권 | 업종      | 막대 A                | 막대 B                 |
//! |------|-----------|-----------------------|------------------------|
//! | O    | 전체      | 서울 평균 (전체)      | 선택 상권 (전체)       |
//! | X    | 단일      | 서울 평균 (전체)      | 서울 평균 (선택 업종)  |
//! | O    | 단일      | 선택 상권 (전체)      | 선택 상권 (선택 업종)  |
//! | X    | 전체      | 차트 없음, 필터 선택 안내                      |

use serde::{Deserialize, Serialize};

use super::stats::mean;
use crate::data::DataSource;
use crate::error::DashboardError;
use crate::filter::{CategorySelection, FilterSelection};
use crate::models::{AreaCode, Panel, Placeholder};

/// 비교 막대 하나의 집계 범위
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum SalesScope {
    /// 상권 제한 없이 상권별 합계를 평균
    CityAverage { categories: CategorySelection },
    /// 선택 상권의 합계
    AreaSum {
        area: AreaCode,
        categories: CategorySelection,
    },
}

impl SalesScope {
    pub fn label(&self) -> String {
        match self {
            SalesScope::CityAverage { categories } => {
                format!("city average ({})", selection_label(categories))
            }
            SalesScope::AreaSum { categories, .. } => {
                format!("selected area ({})", selection_label(categories))
            }
        }
    }

    /// 범위의 매출 값. 조회 결과가 비어 있으면 None
    pub fn evaluate<S: DataSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Option<f64>, DashboardError> {
        match self {
            SalesScope::CityAverage { categories } => {
                let rows = source.sales_by_area(None, &categories.names())?;
                let sums: Vec<f64> = rows.iter().map(|r| r.sales_sum).collect();
                Ok(mean(&sums))
            }
            SalesScope::AreaSum { area, categories } => {
                let rows = source.sales_by_area(Some(&[*area][..]), &categories.names())?;
                if rows.is_empty() {
                    return Ok(None);
                }
                Ok(Some(rows.iter().map(|r| r.sales_sum).sum()))
            }
        }
    }
}

fn selection_label(categories: &CategorySelection) -> &str {
    match categories {
        CategorySelection::All => "all",
        CategorySelection::Single(name) => name.as_str(),
    }
}

/// 필터 조합별 비교 범위 (상권 미선택 + 업종 전체는 None)
pub fn dispatch(filter: &FilterSelection) -> Option<[SalesScope; 2]> {
    match (filter.area, &filter.categories) {
        (Some(area), CategorySelection::All) => Some([
            SalesScope::CityAverage {
                categories: CategorySelection::All,
            },
            SalesScope::AreaSum {
                area,
                categories: CategorySelection::All,
            },
        ]),
        (None, single @ CategorySelection::Single(_)) => Some([
            SalesScope::CityAverage {
                categories: CategorySelection::All,
            },
            SalesScope::CityAverage {
                categories: single.clone(),
            },
        ]),
        (Some(area), single @ CategorySelection::Single(_)) => Some([
            SalesScope::AreaSum {
                area,
                categories: CategorySelection::All,
            },
            SalesScope::AreaSum {
                area,
                categories: single.clone(),
            },
        ]),
        (None, CategorySelection::All) => None,
    }
}

/// 매출 비교 막대 데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesComparison {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// 매출 비교
///
/// 두 범위 모두 조회 결과가 없으면 NoData, 한쪽만 비면 그 막대는 0.
pub fn compare_sales<S: DataSource + ?Sized>(
    source: &S,
    filter: &FilterSelection,
) -> Result<Panel<SalesComparison>, DashboardError> {
    let Some(scopes) = dispatch(filter) else {
        tracing::debug!("sales comparison skipped: no area and all categories");
        return Ok(Panel::Placeholder(Placeholder::SelectFilter));
    };

    let mut labels = Vec::with_capacity(scopes.len());
    let mut values = Vec::with_capacity(scopes.len());
    for scope in &scopes {
        labels.push(scope.label());
        values.push(scope.evaluate(source)?);
    }

    if values.iter().all(Option::is_none) {
        tracing::debug!(?labels, "sales comparison has no rows");
        return Ok(Panel::no_data());
    }

    Ok(Panel::Ready(SalesComparison {
        labels,
        values: values.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::all_categories;
    use crate::testing::{sample_source, FakeSource};

    fn single(name: &str) -> CategorySelection {
        CategorySelection::single(name).unwrap()
    }

    #[test]
    fn test_area_with_all_categories() {
        let source = sample_source();
        let filter = FilterSelection::new(Some(1), CategorySelection::All);
        let panel = compare_sales(&source, &filter).unwrap();
        let chart = panel.ready().unwrap();
        assert_eq!(chart.labels, vec!["city average (all)", "selected area (all)"]);
        assert_eq!(chart.values, vec![1000.0, 600.0]);
    }

    #[test]
    fn test_category_without_area() {
        let source = sample_source();
        let filter = FilterSelection::new(None, single("커피-음료"));
        let chart = compare_sales(&source, &filter).unwrap().ready().cloned().unwrap();
        assert_eq!(chart.labels, vec!["city average (all)", "city average (커피-음료)"]);
        assert_eq!(chart.values, vec![1000.0, 200.0]);
    }

    #[test]
    fn test_area_with_category() {
        let source = sample_source();
        let filter = FilterSelection::new(Some(1), single("제과점"));
        let chart = compare_sales(&source, &filter).unwrap().ready().cloned().unwrap();
        assert_eq!(chart.labels, vec!["selected area (all)", "selected area (제과점)"]);
        assert_eq!(chart.values, vec![600.0, 200.0]);
    }

    #[test]
    fn test_degenerate_filter_prompts() {
        let source = sample_source();
        let panel = compare_sales(&source, &FilterSelection::default()).unwrap();
        assert_eq!(panel.placeholder(), Some(&Placeholder::SelectFilter));
        assert_eq!(source.calls("sales_by_area"), 0);
    }

    #[test]
    fn test_missing_category_in_area_is_zero_bar() {
        let source = sample_source();
        let filter = FilterSelection::new(Some(3), single("제과점"));
        let chart = compare_sales(&source, &filter).unwrap().ready().cloned().unwrap();
        assert_eq!(chart.values, vec![2000.0, 0.0]);
    }

    #[test]
    fn test_all_empty_is_no_data() {
        let source = FakeSource::empty();
        let filter = FilterSelection::new(Some(1), CategorySelection::All);
        let panel = compare_sales(&source, &filter).unwrap();
        assert_eq!(panel.placeholder(), Some(&Placeholder::NoData));
    }

    #[test]
    fn test_dispatch_is_exhaustive() {
        let cases = [
            (Some(1), CategorySelection::All, true),
            (None, single("제과점"), true),
            (Some(1), single("제과점"), true),
            (None, CategorySelection::All, false),
        ];
        for (area, categories, expect_chart) in cases {
            let filter = FilterSelection::new(area, categories);
            assert_eq!(dispatch(&filter).is_some(), expect_chart);
            assert!(compare_sales(&sample_source(), &filter).is_ok());
        }
    }

    #[test]
    fn test_city_average_is_mean_of_area_sums() {
        let source = sample_source();
        let rows = source.sales_by_area(None, &all_categories()).unwrap();
        let manual = rows.iter().map(|r| r.sales_sum).sum::<f64>() / rows.len() as f64;
        let scope = SalesScope::CityAverage {
            categories: CategorySelection::All,
        };
        assert_eq!(scope.evaluate(&source).unwrap(), Some(manual));
    }
}

//! 집계 보조 계산

/// 산술 평균 (빈 입력이면 None)
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 소수 첫째 자리 반올림
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 그룹 합계 대비 구성비(%)
///
/// 합계가 0 이거나 입력이 비어 있으면 None.
pub fn percentage_shares(values: &[f64]) -> Option<Vec<f64>> {
    let sum: f64 = values.iter().sum();
    if values.is_empty() || sum == 0.0 || !sum.is_finite() {
        return None;
    }
    Some(values.iter().map(|v| round1(v / sum * 100.0)).collect())
}

/// 점포당 평균 매출 (내림 나눗셈, 점포수 0 이면 None)
pub fn per_shop_average(total_sales: i64, shop_count: i64) -> Option<i64> {
    if shop_count == 0 {
        return None;
    }
    let q = total_sales / shop_count;
    let r = total_sales % shop_count;
    if r != 0 && ((r < 0) != (shop_count < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

/// 행별 고정 길이 배열의 열 평균
pub fn column_means<'a, const N: usize, I>(rows: I) -> Option<[f64; N]>
where
    I: IntoIterator<Item = &'a [f64; N]>,
{
    let mut sums = [0.0; N];
    let mut count = 0usize;
    for row in rows {
        for (sum, value) in sums.iter_mut().zip(row.iter()) {
            *sum += value;
        }
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(sums.map(|s| s / count as f64))
}

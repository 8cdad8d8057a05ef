//! Zero Classification Module
//!
//! 計測チャネルのセル値を「0」とみなすかどうかを判定するモジュール。

use crate::types::CellValue;

/// 未計測を表すセンチネル文字列
pub const NO_MEASUREMENT: &str = "-";

/// セル値が0かどうかを判定
///
/// 判定の優先順位:
///
/// 1. 数値の0 → `true`
/// 2. 空セル、空文字列、`"-"` → `false`（未計測であり0ではない）
/// 3. 前後の空白を除いて空でなく、全体が数値として解釈でき、その値が0の文字列 → `true`
/// 4. それ以外 → `false`
///
/// 数値の前方一致ではなく全体一致で判定するため、`"0A"` のような単位付き文字列は0になりません。
///
/// # 使用例
///
/// ```rust
/// use pcszero::{is_zero, CellValue};
///
/// assert!(is_zero(&CellValue::Number(0.0)));
/// assert!(is_zero(&CellValue::String(" 0 ".to_string())));
/// assert!(!is_zero(&CellValue::String("-".to_string())));
/// assert!(!is_zero(&CellValue::String("0A".to_string())));
/// ```
pub fn is_zero(value: &CellValue) -> bool {
    match value {
        CellValue::Number(n) => *n == 0.0,
        CellValue::String(s) => {
            if s.is_empty() || s == NO_MEASUREMENT {
                return false;
            }
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == NO_MEASUREMENT {
                return false;
            }
            parse_finite(trimmed).is_some_and(|n| n == 0.0)
        }
        _ => false,
    }
}

// "inf" や "NaN" は数値として扱わない
fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn string(s: &str) -> CellValue {
        CellValue::String(s.to_string())
    }

    #[test]
    fn test_numeric_zero() {
        assert!(is_zero(&CellValue::Number(0.0)));
        assert!(is_zero(&CellValue::Number(-0.0)));
        assert!(!is_zero(&CellValue::Number(0.001)));
        assert!(!is_zero(&CellValue::Number(5.0)));
    }

    #[test]
    fn test_sentinels_are_not_zero() {
        assert!(!is_zero(&CellValue::Empty));
        assert!(!is_zero(&string("")));
        assert!(!is_zero(&string("-")));
        assert!(!is_zero(&string(" - ")));
        assert!(!is_zero(&string("   ")));
    }

    #[test]
    fn test_zero_strings() {
        assert!(is_zero(&string("0")));
        assert!(is_zero(&string(" 0 ")));
        assert!(is_zero(&string("0.0")));
        assert!(is_zero(&string("0.000")));
        assert!(is_zero(&string("-0")));
        assert!(is_zero(&string("0e5")));
    }

    #[test]
    fn test_non_zero_strings() {
        assert!(!is_zero(&string("0A")));
        assert!(!is_zero(&string("0 kW")));
        assert!(!is_zero(&string("1")));
        assert!(!is_zero(&string("abc")));
        assert!(!is_zero(&string("NaN")));
    }

    #[test]
    fn test_other_types() {
        assert!(!is_zero(&CellValue::Bool(false)));
        assert!(!is_zero(&CellValue::Error("#DIV/0!".to_string())));
        let dt = NaiveDate::from_ymd_opt(1899, 12, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(!is_zero(&CellValue::DateTime(dt)));
    }
}

//! Timestamp Module
//!
//! タイムスタンプ列のセル値を「0時からの分数」に正規化するモジュール。
//!
//! 抽出の優先順位:
//!
//! 1. 日付・時刻セル: 記録された時・分フィールドをそのまま使う（タイムゾーン変換なし）
//! 2. 文字列: 埋め込まれた `H:MM` / `HH:MM` パターンを正規表現で抽出
//! 3. 文字列（フォールバック）: 既知の日付書式で解析し、時・分を使う
//!
//! 汎用的な日付解析は実行環境のタイムゾーンに依存しやすいため、
//! パターン抽出を必ず先に試みます。

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;

use crate::types::CellValue;

lazy_static::lazy_static! {
    // 行頭・空白・日時区切りの `T` の直後にある時刻（例: "09:00", " 9:00", "T09:00"）
    static ref CLOCK_RE: Regex = Regex::new(r"(?:^|\s|T)(\d{1,2}):(\d{2})").unwrap();
}

/// フォールバックで試す日時書式
const DATETIME_FORMATS: &[&str] = &[
    "%Y%m%d%H%M%S",
    "%Y%m%d%H%M",
    "%Y/%m/%d %H.%M",
    "%Y-%m-%d %H.%M",
];

/// フォールバックで試す日付のみの書式（時刻は0時とみなす）
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%Y.%m.%d", "%Y年%m月%d日"];

/// セル値から0時からの分数を取得する
///
/// # 戻り値
///
/// * `Some(u32)` - 0〜1439の分数
/// * `None` - 空セル、数値・論理値・エラー値、または時刻として解釈できない文字列
pub fn extract_minutes(value: &CellValue) -> Option<u32> {
    match value {
        CellValue::DateTime(dt) => Some(minutes_of(dt)),
        CellValue::String(s) if !s.trim().is_empty() => {
            match_clock_pattern(s).or_else(|| parse_fallback(s.trim()))
        }
        _ => None,
    }
}

fn minutes_of(dt: &NaiveDateTime) -> u32 {
    dt.hour() * 60 + dt.minute()
}

fn match_clock_pattern(text: &str) -> Option<u32> {
    let caps = CLOCK_RE.captures(text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

fn parse_fallback(text: &str) -> Option<u32> {
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(minutes_of(&dt));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(|_| 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(s: &str) -> CellValue {
        CellValue::String(s.to_string())
    }

    #[test]
    fn test_datetime_value_uses_stored_fields() {
        let dt = NaiveDate::from_ymd_opt(2025, 12, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(extract_minutes(&CellValue::DateTime(dt)), Some(540));
    }

    // 時刻のみのセル（1899-12-30起点）でも時・分が取れること
    #[test]
    fn test_time_only_value() {
        let dt = NaiveDate::from_ymd_opt(1899, 12, 30)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(extract_minutes(&CellValue::DateTime(dt)), Some(1439));
    }

    #[test]
    fn test_embedded_pattern() {
        assert_eq!(extract_minutes(&string("2025/12/15 09:00:00")), Some(540));
        assert_eq!(extract_minutes(&string("09:00")), Some(540));
        assert_eq!(extract_minutes(&string(" 9:30")), Some(570));
        assert_eq!(extract_minutes(&string("2025-12-15T18:45:10")), Some(1125));
        assert_eq!(extract_minutes(&string("2025/12/15\u{3000}7:05")), Some(425));
    }

    // 日付値と文字列が同じ壁時計時刻を表すなら同じ分数になる
    #[test]
    fn test_representations_agree() {
        let dt = NaiveDate::from_ymd_opt(2025, 12, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(
            extract_minutes(&CellValue::DateTime(dt)),
            extract_minutes(&string("2025/12/15 09:00:00"))
        );
    }

    #[test]
    fn test_pattern_out_of_range_falls_through() {
        assert_eq!(extract_minutes(&string("25:00")), None);
        assert_eq!(extract_minutes(&string("12:75")), None);
    }

    #[test]
    fn test_fallback_formats() {
        assert_eq!(extract_minutes(&string("20251215093000")), Some(570));
        assert_eq!(extract_minutes(&string("2025/12/15 14.20")), Some(860));
        assert_eq!(extract_minutes(&string("2025/12/15")), Some(0));
        assert_eq!(extract_minutes(&string("2025年12月15日")), Some(0));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(extract_minutes(&CellValue::Empty), None);
        assert_eq!(extract_minutes(&string("")), None);
        assert_eq!(extract_minutes(&string("   ")), None);
        assert_eq!(extract_minutes(&string("not a time")), None);
        assert_eq!(extract_minutes(&string("ab12:30")), None);
        assert_eq!(extract_minutes(&CellValue::Number(0.375)), None);
        assert_eq!(extract_minutes(&CellValue::Bool(true)), None);
    }
}

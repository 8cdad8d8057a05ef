//! Time Window Module
//!
//! 判定時間帯（`HH:MM`〜`HH:MM`）を表すモジュール。
//! 終了時刻が開始時刻より前の場合は、日付をまたぐ時間帯として扱います。

use std::fmt;

use crate::error::MergeError;

/// 1日の分数（00:00〜23:59）
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// `H:MM` または `HH:MM` を0時からの分数に変換する
///
/// # 戻り値
///
/// * `Ok(u32)` - 0〜1439の分数
/// * `Err(MergeError::InvalidTimeFormat)` - `:` で2つの数値に分割できない、
///   または時が0〜23・分が0〜59の範囲外の場合
pub fn parse_time_of_day(text: &str) -> Result<u32, MergeError> {
    let invalid = || MergeError::InvalidTimeFormat(format!("'{}' is not H:MM or HH:MM", text));

    let (hour, minute) = text.trim().split_once(':').ok_or_else(invalid)?;
    if hour.is_empty() || minute.is_empty() || minute.contains(':') {
        return Err(invalid());
    }
    if !hour.bytes().all(|b| b.is_ascii_digit()) || !minute.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(MergeError::InvalidTimeFormat(format!(
            "'{}' is out of range (hour 0-23, minute 0-59)",
            text
        )));
    }

    Ok(hour * 60 + minute)
}

/// 判定時間帯
///
/// 境界（開始・終了）はどちらも時間帯に含まれます。
/// 開始と終了が同じ場合は1分間だけの時間帯になります（終日ではありません）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: u32,
    end: u32,
}

impl TimeWindow {
    /// `HH:MM` 形式の開始・終了時刻から時間帯を構築する
    pub fn parse(start: &str, end: &str) -> Result<Self, MergeError> {
        Ok(Self {
            start: parse_time_of_day(start)?,
            end: parse_time_of_day(end)?,
        })
    }

    /// 分数から直接構築する（値は1439で頭打ち）
    pub fn from_minutes(start: u32, end: u32) -> Self {
        Self {
            start: start.min(MINUTES_PER_DAY - 1),
            end: end.min(MINUTES_PER_DAY - 1),
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// 日付をまたぐ時間帯かどうか（例: 23:00〜05:00）
    pub fn is_cross_day(&self) -> bool {
        self.end < self.start
    }

    /// 指定時刻（0時からの分数）が時間帯に含まれるかを判定
    ///
    /// 時刻が取得できないセルは `minutes.is_some_and(|m| window.contains(m))` のように
    /// 呼び出し側で対象外として扱います。
    pub fn contains(&self, minutes: u32) -> bool {
        if self.is_cross_day() {
            minutes >= self.start || minutes <= self.end
        } else {
            self.start <= minutes && minutes <= self.end
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start / 60,
            self.start % 60,
            self.end / 60,
            self.end % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("09:00").unwrap(), 540);
        assert_eq!(parse_time_of_day("9:00").unwrap(), 540);
        assert_eq!(parse_time_of_day("00:00").unwrap(), 0);
        assert_eq!(parse_time_of_day("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_parse_time_of_day_invalid() {
        for text in ["", "0900", "9:", ":30", "9:xx", "ab:cd", "9:00:00", "24:00", "12:60", "-1:00"] {
            assert!(
                matches!(parse_time_of_day(text), Err(MergeError::InvalidTimeFormat(_))),
                "expected InvalidTimeFormat for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_same_day_window() {
        let window = TimeWindow::parse("09:00", "18:00").unwrap();
        assert!(!window.is_cross_day());
        assert!(window.contains(540));
        assert!(window.contains(1080));
        assert!(window.contains(720));
        assert!(!window.contains(539));
        assert!(!window.contains(1081));
    }

    #[test]
    fn test_cross_day_window() {
        let window = TimeWindow::parse("23:00", "05:00").unwrap();
        assert!(window.is_cross_day());
        assert!(window.contains(23 * 60));
        assert!(window.contains(0));
        assert!(window.contains(5 * 60));
        assert!(!window.contains(5 * 60 + 1));
        assert!(!window.contains(12 * 60));
    }

    // 開始==終了は1分間だけの時間帯
    #[test]
    fn test_single_minute_window() {
        let window = TimeWindow::parse("12:00", "12:00").unwrap();
        assert!(!window.is_cross_day());
        assert!(window.contains(720));
        assert!(!window.contains(719));
        assert!(!window.contains(721));
    }

    #[test]
    fn test_display() {
        let window = TimeWindow::parse("9:05", "18:00").unwrap();
        assert_eq!(window.to_string(), "09:05-18:00");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_contains_matches_definition(
                start in 0u32..MINUTES_PER_DAY,
                end in 0u32..MINUTES_PER_DAY,
                m in 0u32..MINUTES_PER_DAY,
            ) {
                let window = TimeWindow::from_minutes(start, end);
                let expected = if start <= end {
                    start <= m && m <= end
                } else {
                    m >= start || m <= end
                };
                prop_assert_eq!(window.contains(m), expected);
            }

            #[test]
            fn prop_boundaries_always_inside(
                start in 0u32..MINUTES_PER_DAY,
                end in 0u32..MINUTES_PER_DAY,
            ) {
                let window = TimeWindow::from_minutes(start, end);
                prop_assert!(window.contains(start));
                prop_assert!(window.contains(end));
            }

            #[test]
            fn prop_parse_formatted_time(hour in 0u32..24, minute in 0u32..60) {
                let text = format!("{}:{:02}", hour, minute);
                prop_assert_eq!(parse_time_of_day(&text).unwrap(), hour * 60 + minute);
            }
        }
    }
}

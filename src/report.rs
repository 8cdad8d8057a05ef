//! Run Report Module
//!
//! マージ処理の統計・未登録デバイスキー・ファイル単位の警告など、
//! 1回の実行結果を表す型を定義するモジュール。

use std::collections::HashSet;

use serde::Serialize;

use crate::output::MergedSheet;

/// 未登録キーのサンプルとして公開する最大件数
pub const UNKNOWN_KEYS_SAMPLE_LIMIT: usize = 10;

/// 実行統計
///
/// 各カウンタはマージ処理中にのみ増加し、返却後は変更されません。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// 出力されたデータ行数
    pub total_rows: usize,
    /// 判定時間帯に含まれたデータ行数
    pub target_rows: usize,
    /// ハイライトされたセル数
    pub highlighted_cells: usize,
    /// マスタに存在しないデバイスキーが現れた行数
    pub unknown_device_count: usize,
    /// 処理されたファイル数（スキップされたファイルは含まない）
    pub files_processed: usize,
}

/// マスタに存在しなかったデバイスキー（初出順・重複なし）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownKeys {
    keys: Vec<String>,
    seen: HashSet<String>,
}

impl UnknownKeys {
    /// キーを記録する
    ///
    /// # 戻り値
    ///
    /// 初めて現れたキーの場合は `true`
    pub fn insert(&mut self, key: &str) -> bool {
        if !self.seen.insert(key.to_string()) {
            return false;
        }
        self.keys.push(key.to_string());
        true
    }

    /// 初出順の先頭 `limit` 件
    pub fn sample(&self, limit: usize) -> Vec<String> {
        self.keys.iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

/// スキップされたファイルの警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWarning {
    pub file: String,
    pub reason: String,
}

/// シリアライズ前のマージ結果
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    pub sheet: MergedSheet,
    pub stats: RunStats,
    pub unknown_keys: UnknownKeys,
    pub warnings: Vec<FileWarning>,
}

/// マージ処理の最終結果
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// 出力ワークブック（XLSX）のバイナリ
    pub buffer: Vec<u8>,
    pub stats: RunStats,
    /// 未登録デバイスキー（先頭10件まで）
    pub unknown_keys: Vec<String>,
    pub warnings: Vec<FileWarning>,
}

/// ホストへ転送するための実行サマリ（バイナリを除く）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub stats: RunStats,
    pub unknown_keys: Vec<String>,
    pub warnings: Vec<FileWarning>,
}

impl MergeOutcome {
    /// バイナリを除いた実行サマリを取得
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            stats: self.stats,
            unknown_keys: self.unknown_keys.clone(),
            warnings: self.warnings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_dedup_and_order() {
        let mut keys = UnknownKeys::default();
        assert!(keys.insert("PCS 9-9-9"));
        assert!(keys.insert("PCS 1-2-3"));
        assert!(!keys.insert("PCS 9-9-9"));
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.sample(10), vec!["PCS 9-9-9", "PCS 1-2-3"]);
    }

    #[test]
    fn test_unknown_keys_many_repeats() {
        let mut keys = UnknownKeys::default();
        let mut first_sightings = 0;
        for round in 0..200 {
            for unit in 0..50 {
                if keys.insert(&format!("PCS {}-1-1", unit)) {
                    first_sightings += 1;
                    assert_eq!(round, 0);
                }
            }
        }
        assert_eq!(first_sightings, 50);
        assert_eq!(keys.len(), 50);
        let all: Vec<&str> = keys.iter().collect();
        assert_eq!(all[0], "PCS 0-1-1");
        assert_eq!(all[49], "PCS 49-1-1");
        assert!(keys.insert(""));
        assert!(!keys.insert(""));
        assert_eq!(keys.len(), 51);
    }

    #[test]
    fn test_unknown_keys_sample_limit() {
        let mut keys = UnknownKeys::default();
        for i in 0..15 {
            keys.insert(&format!("PCS {}-1-1", i));
        }
        let sample = keys.sample(UNKNOWN_KEYS_SAMPLE_LIMIT);
        assert_eq!(sample.len(), 10);
        assert_eq!(sample[0], "PCS 0-1-1");
        assert_eq!(sample[9], "PCS 9-1-1");
    }

    #[test]
    fn test_summary_json_uses_camel_case() {
        let outcome = MergeOutcome {
            buffer: vec![1, 2, 3],
            stats: RunStats {
                total_rows: 2,
                target_rows: 1,
                highlighted_cells: 2,
                unknown_device_count: 0,
                files_processed: 1,
            },
            unknown_keys: vec!["PCS 9-9-9".to_string()],
            warnings: vec![FileWarning {
                file: "bad.xlsx".to_string(),
                reason: "ZIP archive error".to_string(),
            }],
        };

        let json = serde_json::to_value(outcome.summary()).unwrap();
        assert_eq!(json["stats"]["totalRows"], 2);
        assert_eq!(json["stats"]["highlightedCells"], 2);
        assert_eq!(json["stats"]["unknownDeviceCount"], 0);
        assert_eq!(json["unknownKeys"][0], "PCS 9-9-9");
        assert_eq!(json["warnings"][0]["file"], "bad.xlsx");
        assert!(json.get("buffer").is_none());
    }
}

//! Device Module
//!
//! デバイスラベル（例: `192.168.1.201 unit1 A-1/PCS1-3-4`）からデバイスキーを取り出し、
//! マスタテーブルの表記（`PCS 1-3-4`）に正規化するモジュール。
//! 回路数マスタ（`MasterTable`）もここで定義します。

use std::collections::HashMap;
use std::io::Read;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::MergeError;

/// デフォルトのデバイス接頭辞
pub const DEFAULT_DEVICE_PREFIX: &str = "PCS";

/// デバイスラベルの解決器
///
/// ラベルを `/` で分割し、最後の区切りの後ろをデバイスキーとして扱います。
/// 接頭辞の直後に数字が続く場合（`PCS1-3-4`）は、接頭辞と数字の間に空白を1つ挿入します。
/// 接頭辞の照合は大文字小文字を区別しません。
#[derive(Debug, Clone)]
pub struct DeviceKeyResolver {
    prefix: String,
    pattern: Regex,
}

impl DeviceKeyResolver {
    /// 指定した接頭辞で解決器を構築
    ///
    /// # 引数
    ///
    /// * `prefix` - デバイス接頭辞（空でないASCII英字のみ）
    ///
    /// # 戻り値
    ///
    /// * `Err(MergeError::Config)` - 接頭辞が空、または英字以外を含む場合
    pub fn new(prefix: &str) -> Result<Self, MergeError> {
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(MergeError::Config(format!(
                "device prefix must be non-empty ASCII letters, got '{}'",
                prefix
            )));
        }

        let pattern = Regex::new(&format!(r"(?i)^{}(\d)", regex::escape(prefix)))
            .map_err(|e| MergeError::Config(format!("invalid device prefix pattern: {}", e)))?;

        Ok(Self {
            prefix: prefix.to_string(),
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// ラベル文字列をデバイスキーに解決
    ///
    /// # 戻り値
    ///
    /// * `Some(String)` - 正規化済みのデバイスキー
    /// * `None` - `/` を含まない場合
    ///
    /// 最後の区切りの後ろが空（`A-1/`）の場合は空文字列のキーを返します。
    /// 空のキーはマスタに存在しないため、未登録デバイスとして扱われます。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use pcszero::DeviceKeyResolver;
    ///
    /// let resolver = DeviceKeyResolver::new("PCS").unwrap();
    /// assert_eq!(
    ///     resolver.resolve("192.168.1.201 u1 A-1/PCS1-3-4").as_deref(),
    ///     Some("PCS 1-3-4")
    /// );
    /// assert_eq!(resolver.resolve("no-slash-label"), None);
    /// ```
    pub fn resolve(&self, label: &str) -> Option<String> {
        let (_, suffix) = label.rsplit_once('/')?;
        let suffix = suffix.trim();

        let replacement = format!("{} ${{1}}", self.prefix);
        Some(self.pattern.replace(suffix, replacement.as_str()).into_owned())
    }
}

impl Default for DeviceKeyResolver {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_DEVICE_PREFIX.to_string(),
            pattern: Regex::new(r"(?i)^PCS(\d)").unwrap(),
        }
    }
}

/// マスタの1エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterEntry {
    #[serde(rename = "pcsKey")]
    pub device_key: String,
    #[serde(rename = "circuitCount")]
    pub circuit_count: u32,
}

impl MasterEntry {
    pub fn new(device_key: impl Into<String>, circuit_count: u32) -> Self {
        Self {
            device_key: device_key.into(),
            circuit_count,
        }
    }
}

#[derive(Deserialize)]
struct MasterDocument {
    #[serde(rename = "pcsMaster")]
    entries: Vec<MasterEntry>,
}

/// デバイスキー → 回路数のマスタテーブル
///
/// 同じキーが複数回現れた場合は後勝ちです。実行中は読み取り専用で使用されます。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterTable {
    circuits: HashMap<String, u32>,
}

impl MasterTable {
    /// エントリ列からマスタを構築
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = MasterEntry>,
    {
        let circuits = entries
            .into_iter()
            .map(|entry| (entry.device_key, entry.circuit_count))
            .collect();
        Self { circuits }
    }

    /// `{"pcsMaster": [{"pcsKey": "...", "circuitCount": n}]}` 形式のJSONから構築
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use pcszero::MasterTable;
    ///
    /// let master = MasterTable::from_json_str(
    ///     r#"{"pcsMaster": [{"pcsKey": "PCS 1-1-1", "circuitCount": 7}]}"#,
    /// ).unwrap();
    /// assert_eq!(master.circuit_count("PCS 1-1-1"), Some(7));
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, MergeError> {
        let document: MasterDocument = serde_json::from_str(json)?;
        Ok(Self::from_entries(document.entries))
    }

    /// リーダーからJSONを読み込んで構築
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, MergeError> {
        let document: MasterDocument = serde_json::from_reader(reader)?;
        Ok(Self::from_entries(document.entries))
    }

    /// デバイスキーの回路数を取得
    pub fn circuit_count(&self, device_key: &str) -> Option<u32> {
        self.circuits.get(device_key).copied()
    }

    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }
}

impl FromIterator<MasterEntry> for MasterTable {
    fn from_iter<I: IntoIterator<Item = MasterEntry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_inserts_space() {
        let resolver = DeviceKeyResolver::default();
        assert_eq!(
            resolver.resolve("192.168.1.201 u1 A-1/PCS1-3-4").as_deref(),
            Some("PCS 1-3-4")
        );
    }

    #[test]
    fn test_resolve_case_insensitive_prefix() {
        let resolver = DeviceKeyResolver::default();
        assert_eq!(resolver.resolve("x/pcs2-1-1").as_deref(), Some("PCS 2-1-1"));
        assert_eq!(resolver.resolve("x/Pcs12-1-1").as_deref(), Some("PCS 12-1-1"));
    }

    #[test]
    fn test_resolve_already_normalized() {
        let resolver = DeviceKeyResolver::default();
        assert_eq!(resolver.resolve("x/ PCS 1-3-4 ").as_deref(), Some("PCS 1-3-4"));
    }

    #[test]
    fn test_resolve_uses_last_segment() {
        let resolver = DeviceKeyResolver::default();
        assert_eq!(resolver.resolve("a/b/c/PCS3-2-1").as_deref(), Some("PCS 3-2-1"));
    }

    #[test]
    fn test_resolve_failures() {
        let resolver = DeviceKeyResolver::default();
        assert_eq!(resolver.resolve("no-slash-label"), None);
        assert_eq!(resolver.resolve(""), None);
    }

    #[test]
    fn test_resolve_empty_suffix() {
        let resolver = DeviceKeyResolver::default();
        assert_eq!(resolver.resolve("192.168.1.201 A-1/").as_deref(), Some(""));
        assert_eq!(resolver.resolve("192.168.1.201 A-1/   ").as_deref(), Some(""));
        assert_eq!(resolver.resolve("/").as_deref(), Some(""));
    }

    // 接頭辞以外のサフィックスはそのまま返す
    #[test]
    fn test_resolve_other_suffix() {
        let resolver = DeviceKeyResolver::default();
        assert_eq!(resolver.resolve("x/INV1-1").as_deref(), Some("INV1-1"));
        assert_eq!(resolver.resolve("x/PCSA-1").as_deref(), Some("PCSA-1"));
    }

    #[test]
    fn test_custom_prefix() {
        let resolver = DeviceKeyResolver::new("INV").unwrap();
        assert_eq!(resolver.prefix(), "INV");
        assert_eq!(resolver.resolve("x/inv4-1-2").as_deref(), Some("INV 4-1-2"));
        assert_eq!(resolver.resolve("x/PCS1-1-1").as_deref(), Some("PCS1-1-1"));
    }

    #[test]
    fn test_invalid_prefix() {
        assert!(matches!(DeviceKeyResolver::new(""), Err(MergeError::Config(_))));
        assert!(matches!(DeviceKeyResolver::new("PC S"), Err(MergeError::Config(_))));
        assert!(matches!(DeviceKeyResolver::new("PCS1"), Err(MergeError::Config(_))));
    }

    #[test]
    fn test_master_last_write_wins() {
        let master = MasterTable::from_entries(vec![
            MasterEntry::new("PCS 1-1-1", 8),
            MasterEntry::new("PCS 1-1-2", 7),
            MasterEntry::new("PCS 1-1-1", 7),
        ]);
        assert_eq!(master.len(), 2);
        assert_eq!(master.circuit_count("PCS 1-1-1"), Some(7));
        assert_eq!(master.circuit_count("PCS 9-9-9"), None);
    }

    #[test]
    fn test_master_from_json() {
        let json = r#"{
            "pcsMaster": [
                {"pcsKey": "PCS 1-1-1", "circuitCount": 8},
                {"pcsKey": "PCS 1-1-2", "circuitCount": 7}
            ]
        }"#;
        let master = MasterTable::from_json_str(json).unwrap();
        assert_eq!(master.circuit_count("PCS 1-1-2"), Some(7));

        let master = MasterTable::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(master.len(), 2);
    }

    #[test]
    fn test_master_from_json_invalid() {
        assert!(matches!(
            MasterTable::from_json_str(r#"{"pcsMaster": [{"pcsKey": 1}]}"#),
            Err(MergeError::Json(_))
        ));
        assert!(MasterTable::from_json_str("{}").is_err());
    }
}

//! Public API Types
//!
//! 公開APIで使用する列挙型・入力型・進捗通知の型を定義するモジュール。

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::error::MergeError;

/// 行数が足りないファイルの扱い
///
/// ヘッダー4行＋データ行（5行目以降）の構成を満たさないファイルをどう処理するかを指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum LayoutPolicy {
    /// 5行未満のファイルをスキップし、警告を記録する（デフォルト）
    #[default]
    Strict,

    /// 行数に関係なく処理する
    ///
    /// 4行以下のファイルはデータ行を持たないため、最初のファイルであれば
    /// ヘッダーのみが出力に取り込まれます。
    Lenient,
}

/// 判定時間帯の指定（`H:MM` または `HH:MM`）
///
/// 検証は `MergerBuilder::build()` 時に行われます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::new("09:00", "18:00")
    }
}

/// 入力ファイル（名前とバイナリ内容）
///
/// 名前は進捗通知と警告にのみ使用されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl InputFile {
    /// メモリ上のバイト列から入力ファイルを生成
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// ディスク上のファイルを読み込む
    ///
    /// 名前にはファイル名部分（ディレクトリを除く）を使用します。
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MergeError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, data })
    }
}

/// 進捗フェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPhase {
    /// ファイル読み込み開始（current = 1始まりのファイル番号, total = ファイル数）
    Reading,
    /// 行処理中（current = 元ファイルの行番号, total = 元ファイルの最終行）
    Processing,
}

/// 進捗イベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub phase: ProgressPhase,
    pub current: usize,
    pub total: usize,
    pub filename: String,
}

/// 進捗イベントの受け取り側
///
/// クロージャ `FnMut(&ProgressEvent)` はそのまま `ProgressSink` として使用できます。
///
/// # 使用例
///
/// ```rust
/// use pcszero::{ProgressEvent, ProgressSink};
///
/// let mut seen = Vec::new();
/// let mut sink = |event: &ProgressEvent| seen.push(event.current);
/// # let _ = &mut sink as &mut dyn ProgressSink;
/// ```
pub trait ProgressSink {
    fn on_progress(&mut self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressEvent),
{
    fn on_progress(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// 進捗を受け取らないシンク
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _event: &ProgressEvent) {}
}

/// 協調的キャンセル用のトークン
///
/// クローンは同じフラグを共有します。マージ処理は進捗通知と同じ間隔でフラグを確認し、
/// キャンセルされていれば `MergeError::Cancelled` を返します。
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(LayoutPolicy::default(), LayoutPolicy::Strict);
        let range = TimeRange::default();
        assert_eq!(range.start, "09:00");
        assert_eq!(range.end, "18:00");
    }

    #[test]
    fn test_closure_as_sink() {
        let mut phases = Vec::new();
        {
            let mut sink = |event: &ProgressEvent| phases.push(event.phase);
            let event = ProgressEvent {
                phase: ProgressPhase::Reading,
                current: 1,
                total: 2,
                filename: "a.xlsx".to_string(),
            };
            sink.on_progress(&event);
        }
        assert_eq!(phases, vec![ProgressPhase::Reading]);
    }

    #[test]
    fn test_progress_event_json() {
        let event = ProgressEvent {
            phase: ProgressPhase::Processing,
            current: 500,
            total: 1200,
            filename: "log.xlsx".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""phase":"processing""#));
        assert!(json.contains(r#""filename":"log.xlsx""#));
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_input_file_open() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut tmp, b"PK").unwrap();
        let file = InputFile::open(tmp.path()).unwrap();
        assert_eq!(file.data, b"PK");
        assert!(!file.name.is_empty());

        assert!(matches!(
            InputFile::open("definitely/missing/log.xlsx"),
            Err(MergeError::Io(_))
        ));
    }
}

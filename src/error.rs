//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// pcszeroクレート全体で使用するエラー型
///
/// マージ処理の致命的エラーと、ファイル単位でスキップされる非致命的エラーの
/// 両方をこの型で表します。どちらとして扱われるかは発生箇所で決まります。
///
/// # 致命的エラー（呼び出し元に返る）
///
/// - `InvalidInput`: ファイル未指定、マスタ未指定
/// - `InvalidTimeFormat`: 時間帯の書式不正（ファイル読込前に検出）
/// - `Config`: ビルダー設定の検証失敗
/// - `Cancelled`: キャンセルトークンによる中断
/// - `Write`: 出力ワークブックのシリアライズ失敗
///
/// # 非致命的エラー（該当ファイルをスキップし、警告として記録）
///
/// - `Io` / `Parse` / `Zip` / `Xml` / `SecurityViolation` など入力ファイル由来のもの
///
/// # 使用例
///
/// ```rust,no_run
/// use pcszero::{MergeError, MergerBuilder};
///
/// match MergerBuilder::new().with_time_range("9:xx", "18:00").build() {
///     Err(MergeError::InvalidTimeFormat(msg)) => eprintln!("時間帯エラー: {}", msg),
///     _ => {}
/// }
/// ```
#[derive(Error, Debug)]
pub enum MergeError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// calamineがワークブックの値を読み込む際に発生したエラー
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// 数値の解析エラー（XML属性値など）
    #[error("Number parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// ZIPアーカイブの解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// パッケージ内XMLの解析エラー
    #[error("XML parse error: {0}")]
    Xml(String),

    /// 出力ワークブックの生成エラー（rust_xlsxwriter由来）
    #[error("Failed to write output workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// マスタJSONの解析エラー
    #[error("Master table JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `MergerBuilder::build()`時に検出されます。例えば、空のデバイス接頭辞や
    /// 0行の進捗間隔などです。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力が不足しているエラー（ファイルなし、マスタなし）
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 時刻文字列が `H:MM` / `HH:MM` として解釈できないエラー
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb、パストラバーサル、ファイルサイズ上限などに違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// キャンセルトークンにより処理が中断された
    #[error("Merge run was cancelled")]
    Cancelled,
}

impl MergeError {
    /// ファイル単位でスキップして処理を継続できるエラーかどうか
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            MergeError::Io(_)
                | MergeError::Parse(_)
                | MergeError::Utf8(_)
                | MergeError::ParseInt(_)
                | MergeError::Zip(_)
                | MergeError::Xml(_)
                | MergeError::SecurityViolation(_)
        )
    }
}

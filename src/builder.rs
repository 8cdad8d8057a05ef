//! Builder Module
//!
//! Fluent Builder APIを提供し、`Merger`インスタンスを段階的に構築する。

use tracing::info;

use crate::api::{CancelToken, InputFile, LayoutPolicy, ProgressSink, TimeRange};
use crate::device::{DeviceKeyResolver, MasterTable, DEFAULT_DEVICE_PREFIX};
use crate::error::MergeError;
use crate::merge::MergeEngine;
use crate::output::write_workbook;
use crate::report::{MergeOutcome, MergeReport, UNKNOWN_KEYS_SAMPLE_LIMIT};
use crate::security::SecurityConfig;
use crate::window::TimeWindow;

/// ハイライトの既定色（薄い赤）
pub const DEFAULT_HIGHLIGHT_COLOR: u32 = 0xFF9999;

/// 未登録デバイスの既定回路数（全チャネルを判定）
pub const DEFAULT_CIRCUIT_COUNT: u32 = 8;

/// 進捗通知・キャンセル確認の既定間隔（行）
pub const DEFAULT_YIELD_INTERVAL: usize = 500;

/// マージ処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct MergeConfig {
    /// 判定時間帯
    pub time_range: TimeRange,

    /// 行数不足ファイルの扱い
    pub layout_policy: LayoutPolicy,

    /// ハイライト色（0xRRGGBB）
    pub highlight_color: u32,

    /// デバイス接頭辞
    pub device_prefix: String,

    /// 未登録デバイスの回路数
    pub default_circuit_count: u32,

    /// 進捗通知・キャンセル確認の間隔（元ファイルの行数）
    pub yield_interval: usize,

    /// 13列目に回路数を出力するか
    pub circuit_count_column: bool,

    /// キャンセルトークン
    pub cancel_token: Option<CancelToken>,

    /// 入力ファイルごとのセキュリティ制限
    pub security: SecurityConfig,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            time_range: TimeRange::default(),
            layout_policy: LayoutPolicy::Strict,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR,
            device_prefix: DEFAULT_DEVICE_PREFIX.to_string(),
            default_circuit_count: DEFAULT_CIRCUIT_COUNT,
            yield_interval: DEFAULT_YIELD_INTERVAL,
            circuit_count_column: false,
            cancel_token: None,
            security: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Merger`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use pcszero::{LayoutPolicy, MergerBuilder};
///
/// # fn main() -> Result<(), pcszero::MergeError> {
/// let merger = MergerBuilder::new()
///     .with_time_range("23:00", "05:00")
///     .with_layout_policy(LayoutPolicy::Lenient)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MergerBuilder {
    /// 内部設定（構築中）
    config: MergeConfig,
}

impl Default for MergerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MergerBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 判定時間帯: 09:00〜18:00
    /// - 行数不足ファイル: スキップ（`LayoutPolicy::Strict`）
    /// - ハイライト色: `0xFF9999`
    /// - デバイス接頭辞: `PCS`
    /// - 未登録デバイスの回路数: 8
    /// - 進捗通知間隔: 500行
    /// - 回路数の検証用列: 出力しない
    pub fn new() -> Self {
        Self {
            config: MergeConfig::default(),
        }
    }

    /// 判定時間帯を指定する（`H:MM` または `HH:MM`）
    ///
    /// 終了が開始より前の場合は日付をまたぐ時間帯として扱います。
    /// 書式は `build()` 時に検証され、不正な場合は `MergeError::InvalidTimeFormat` になります。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use pcszero::MergerBuilder;
    ///
    /// // 夜間（23:00〜翌05:00）
    /// let builder = MergerBuilder::new().with_time_range("23:00", "5:00");
    /// ```
    pub fn with_time_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.config.time_range = TimeRange::new(start, end);
        self
    }

    /// 行数が足りないファイルの扱いを指定する
    pub fn with_layout_policy(mut self, policy: LayoutPolicy) -> Self {
        self.config.layout_policy = policy;
        self
    }

    /// ハイライトの塗りつぶし色を指定する（0xRRGGBB）
    pub fn with_highlight_color(mut self, color: u32) -> Self {
        self.config.highlight_color = color;
        self
    }

    /// デバイス接頭辞を指定する
    ///
    /// ラベル末尾の `PCS1-3-4` を `PCS 1-3-4` に正規化する際の接頭辞です。
    pub fn with_device_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.device_prefix = prefix.into();
        self
    }

    /// マスタに存在しないデバイスの回路数を指定する
    pub fn with_default_circuit_count(mut self, count: u32) -> Self {
        self.config.default_circuit_count = count;
        self
    }

    /// 進捗通知とキャンセル確認の間隔（元ファイルの行数）を指定する
    pub fn with_yield_interval(mut self, rows: usize) -> Self {
        self.config.yield_interval = rows;
        self
    }

    /// 13列目に判定に使った回路数を出力するかを指定する
    ///
    /// 有効にすると、4行目13列目に見出し `検証用:回路数` が入り、
    /// デバイスキーが解決できた各データ行の13列目に回路数が入ります。
    pub fn with_circuit_count_column(mut self, enabled: bool) -> Self {
        self.config.circuit_count_column = enabled;
        self
    }

    /// キャンセルトークンを指定する
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.config.cancel_token = Some(token);
        self
    }

    /// 入力ファイルに適用するセキュリティ制限を指定する
    pub fn with_security_config(mut self, security: SecurityConfig) -> Self {
        self.config.security = security;
        self
    }

    /// 設定を検証し、`Merger`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Merger)`: 設定が有効な場合
    /// * `Err(MergeError::InvalidTimeFormat)`: 時間帯の書式が不正な場合
    /// * `Err(MergeError::Config)`: その他の設定が不正な場合
    ///   * ハイライト色が `0xFFFFFF` を超える
    ///   * デバイス接頭辞が空、または英字以外を含む
    ///   * 既定回路数または進捗通知間隔が0
    pub fn build(self) -> Result<Merger, MergeError> {
        // 1. 時間帯の検証
        let window = TimeWindow::parse(&self.config.time_range.start, &self.config.time_range.end)?;

        // 2. ハイライト色の検証
        if self.config.highlight_color > 0xFF_FFFF {
            return Err(MergeError::Config(format!(
                "Invalid highlight color: {:#X} (expected 0xRRGGBB)",
                self.config.highlight_color
            )));
        }

        // 3. デバイス接頭辞の検証
        let resolver = DeviceKeyResolver::new(&self.config.device_prefix)?;

        // 4. 数値設定の検証
        if self.config.default_circuit_count == 0 {
            return Err(MergeError::Config(
                "Default circuit count must be at least 1".to_string(),
            ));
        }
        if self.config.yield_interval == 0 {
            return Err(MergeError::Config(
                "Yield interval must be at least 1 row".to_string(),
            ));
        }

        Ok(Merger {
            config: self.config,
            window,
            resolver,
        })
    }
}

/// マージ処理のファサード
///
/// 複数のログファイルを1つのワークブックにまとめ、判定時間帯の0値をハイライトする
/// メインエントリーポイントです。1つの `Merger` は何度でも実行でき、
/// 各実行の状態（出力シート・統計）は実行ごとに新しく作られます。
///
/// # 使用例
///
/// ```rust,no_run
/// use pcszero::{InputFile, MasterTable, MergerBuilder, NoProgress};
///
/// # fn main() -> Result<(), pcszero::MergeError> {
/// let merger = MergerBuilder::new().build()?;
/// let master = MasterTable::from_json_str(&std::fs::read_to_string("pcs_master.json")?)?;
/// let files = vec![InputFile::open("log_0901.xlsx")?, InputFile::open("log_0902.xlsx")?];
///
/// let outcome = merger.run(&files, Some(&master), &mut NoProgress)?;
/// std::fs::write("result.xlsx", &outcome.buffer)?;
/// println!("highlighted cells: {}", outcome.stats.highlighted_cells);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Merger {
    config: MergeConfig,
    window: TimeWindow,
    resolver: DeviceKeyResolver,
}

impl Merger {
    /// 判定時間帯
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// ファイルをマージし、出力ワークブックのバイナリと統計を返す
    ///
    /// # 引数
    ///
    /// * `files` - 入力ファイル（この順に処理される）
    /// * `master` - 回路数マスタ
    /// * `progress` - 進捗イベントの受け取り側
    ///
    /// # 戻り値
    ///
    /// * `Ok(MergeOutcome)` - 出力バイナリ・統計・未登録キー（先頭10件）・ファイル警告
    /// * `Err(MergeError::InvalidInput)` - ファイルまたはマスタが指定されていない場合
    /// * `Err(MergeError::Cancelled)` - キャンセルされた場合
    /// * `Err(MergeError::Write)` - 出力ワークブックの生成に失敗した場合
    pub fn run(
        &self,
        files: &[InputFile],
        master: Option<&MasterTable>,
        progress: &mut dyn ProgressSink,
    ) -> Result<MergeOutcome, MergeError> {
        let report = self.merge(files, master, progress)?;
        let buffer = write_workbook(&report.sheet, self.config.highlight_color)?;

        Ok(MergeOutcome {
            buffer,
            stats: report.stats,
            unknown_keys: report.unknown_keys.sample(UNKNOWN_KEYS_SAMPLE_LIMIT),
            warnings: report.warnings,
        })
    }

    /// ファイルをマージし、シリアライズ前のシートと統計を返す
    ///
    /// `run` と同じ処理を行いますが、出力ワークブックは生成しません。
    pub fn merge(
        &self,
        files: &[InputFile],
        master: Option<&MasterTable>,
        progress: &mut dyn ProgressSink,
    ) -> Result<MergeReport, MergeError> {
        if files.is_empty() {
            return Err(MergeError::InvalidInput("no input files".to_string()));
        }
        let master = master
            .ok_or_else(|| MergeError::InvalidInput("master table is required".to_string()))?;

        info!(
            files = files.len(),
            master_entries = master.len(),
            window = %self.window,
            "starting merge run"
        );

        let engine = MergeEngine::new(&self.config, self.window, &self.resolver, master);
        let report = engine.run(files, progress)?;

        info!(
            files_processed = report.stats.files_processed,
            files_skipped = report.warnings.len(),
            total_rows = report.stats.total_rows,
            target_rows = report.stats.target_rows,
            highlighted_cells = report.stats.highlighted_cells,
            unknown_device_count = report.stats.unknown_device_count,
            "merge run finished"
        );
        Ok(report)
    }
}

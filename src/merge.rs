//! Merge Engine Module
//!
//! 入力ファイルを順番に読み込み、データ行を1枚のシートに連結しながら、
//! 判定時間帯に含まれる行の計測チャネルの0値をハイライトするモジュール。
//!
//! ファイルは指定順、行は元の行順で処理されるため、出力の行順と統計は常に決定的です。

use tracing::{debug, warn};

use crate::api::{InputFile, LayoutPolicy, ProgressEvent, ProgressPhase, ProgressSink};
use crate::builder::MergeConfig;
use crate::device::{DeviceKeyResolver, MasterTable};
use crate::error::MergeError;
use crate::output::MergedSheet;
use crate::parser::{load_first_sheet, SourceSheet};
use crate::report::{FileWarning, MergeReport, RunStats, UnknownKeys};
use crate::timestamp::extract_minutes;
use crate::types::{CellValue, Row};
use crate::window::TimeWindow;
use crate::zero::is_zero;

/// ヘッダー（メタデータ）行数
pub const HEADER_ROWS: u32 = 4;
/// データ行の開始行番号
pub const FIRST_DATA_ROW: u32 = 5;
/// データ行としてコピーする最小列数（A〜L）
pub const MIN_COLUMNS: u16 = 12;
/// デバイスラベル列（C）
pub const LABEL_COLUMN: u16 = 3;
/// タイムスタンプ列（D）
pub const TIMESTAMP_COLUMN: u16 = 4;
/// 最初の計測チャネル列（E = PV1）
pub const FIRST_CHANNEL_COLUMN: u16 = 5;
/// 最後の計測チャネル列（L = PV8）
pub const LAST_CHANNEL_COLUMN: u16 = 12;
/// チャネル範囲を1列狭める回路数
pub const NARROW_CIRCUIT_COUNT: u32 = 7;
/// 回路数の検証用出力列（M）
pub const CIRCUIT_COUNT_COLUMN: u16 = 13;
/// 回路数の検証用出力列の見出し（4行目）
pub const CIRCUIT_COUNT_HEADER: &str = "検証用:回路数";

/// 回路数から0判定の対象となる最後の列を求める
///
/// 回路数が7の場合のみE〜K列、それ以外（既定値8を含む）はE〜L列が対象です。
pub fn last_channel_column(circuit_count: u32) -> u16 {
    if circuit_count == NARROW_CIRCUIT_COUNT {
        LAST_CHANNEL_COLUMN - 1
    } else {
        LAST_CHANNEL_COLUMN
    }
}

/// 1回の実行の状態を保持するマージエンジン
///
/// 出力シートと統計はこのインスタンスが排他的に所有し、`run` の終了とともに返却されます。
pub(crate) struct MergeEngine<'a> {
    config: &'a MergeConfig,
    window: TimeWindow,
    resolver: &'a DeviceKeyResolver,
    master: &'a MasterTable,
    sheet: MergedSheet,
    stats: RunStats,
    unknown_keys: UnknownKeys,
    warnings: Vec<FileWarning>,
    header_copied: bool,
}

impl<'a> MergeEngine<'a> {
    pub fn new(
        config: &'a MergeConfig,
        window: TimeWindow,
        resolver: &'a DeviceKeyResolver,
        master: &'a MasterTable,
    ) -> Self {
        Self {
            config,
            window,
            resolver,
            master,
            sheet: MergedSheet::default(),
            stats: RunStats::default(),
            unknown_keys: UnknownKeys::default(),
            warnings: Vec::new(),
            header_copied: false,
        }
    }

    /// すべてのファイルを処理してマージ結果を返す
    ///
    /// # 戻り値
    ///
    /// * `Ok(MergeReport)` - 処理に成功した場合（スキップしたファイルは警告に含まれる）
    /// * `Err(MergeError::Cancelled)` - キャンセルトークンにより中断された場合
    pub fn run(
        mut self,
        files: &[InputFile],
        progress: &mut dyn ProgressSink,
    ) -> Result<MergeReport, MergeError> {
        for (index, file) in files.iter().enumerate() {
            self.check_cancelled()?;
            progress.on_progress(&ProgressEvent {
                phase: ProgressPhase::Reading,
                current: index + 1,
                total: files.len(),
                filename: file.name.clone(),
            });

            let source = match load_first_sheet(file, &self.config.security) {
                Ok(Some(source)) => source,
                Ok(None) => {
                    self.skip_file(file, "workbook has no worksheets".to_string());
                    continue;
                }
                Err(e) if e.is_per_file() => {
                    self.skip_file(file, e.to_string());
                    continue;
                }
                Err(e) => return Err(e),
            };

            if self.config.layout_policy == LayoutPolicy::Strict
                && source.row_count() < FIRST_DATA_ROW
            {
                self.skip_file(
                    file,
                    format!(
                        "expected at least {} rows ({} header rows and data), found {}",
                        FIRST_DATA_ROW,
                        HEADER_ROWS,
                        source.row_count()
                    ),
                );
                continue;
            }

            self.process_sheet(file, &source, progress)?;
        }

        Ok(MergeReport {
            sheet: self.sheet,
            stats: self.stats,
            unknown_keys: self.unknown_keys,
            warnings: self.warnings,
        })
    }

    fn process_sheet(
        &mut self,
        file: &InputFile,
        source: &SourceSheet,
        progress: &mut dyn ProgressSink,
    ) -> Result<(), MergeError> {
        if !self.header_copied {
            self.copy_header(source);
        }

        let row_count = source.row_count();
        let interval = u32::try_from(self.config.yield_interval).unwrap_or(u32::MAX);
        let rows_before = self.stats.total_rows;

        for r in FIRST_DATA_ROW..=row_count {
            if let Some(src) = source.row(r).filter(|row| row.has_values()) {
                let mut row = src.clone();
                row.ensure_width(src.cell_count().max(MIN_COLUMNS));
                self.evaluate_row(&mut row);
                self.sheet.data_rows.push(row);
                self.stats.total_rows += 1;
            }

            if r % interval == 0 {
                self.check_cancelled()?;
                std::thread::yield_now();
                progress.on_progress(&ProgressEvent {
                    phase: ProgressPhase::Processing,
                    current: r as usize,
                    total: row_count as usize,
                    filename: file.name.clone(),
                });
            }
        }

        self.stats.files_processed += 1;
        debug!(
            file = %file.name,
            sheet = %source.name,
            rows = self.stats.total_rows - rows_before,
            "merged file"
        );
        Ok(())
    }

    /// 最初に処理するファイルから1〜4行目と列幅をコピー
    fn copy_header(&mut self, source: &SourceSheet) {
        let header_rows = HEADER_ROWS.min(source.row_count());
        self.sheet.header_rows = (1..=header_rows)
            .map(|r| source.row(r).cloned().unwrap_or_default())
            .collect();
        self.sheet.column_widths = source.column_widths.clone();

        if self.config.circuit_count_column {
            self.sheet
                .header_rows
                .resize_with(HEADER_ROWS as usize, Row::default);
            if let Some(row) = self.sheet.header_rows.last_mut() {
                row.set_value(
                    CIRCUIT_COUNT_COLUMN,
                    CellValue::String(CIRCUIT_COUNT_HEADER.to_string()),
                );
            }
        }
        self.header_copied = true;
    }

    /// 1行分の判定（デバイスキー解決 → 回路数 → 時間帯 → 0判定）
    fn evaluate_row(&mut self, row: &mut Row) {
        let label = row.value(LABEL_COLUMN).display_text();
        let Some(device_key) = self.resolver.resolve(&label) else {
            return;
        };

        let circuit_count = match self.master.circuit_count(&device_key) {
            Some(count) => count,
            None => {
                self.stats.unknown_device_count += 1;
                if self.unknown_keys.insert(&device_key) {
                    warn!(
                        device_key = %device_key,
                        default_circuit_count = self.config.default_circuit_count,
                        "device key not found in master table"
                    );
                }
                self.config.default_circuit_count
            }
        };

        if self.config.circuit_count_column {
            row.set_value(CIRCUIT_COUNT_COLUMN, CellValue::Number(f64::from(circuit_count)));
        }

        let minutes = extract_minutes(row.value(TIMESTAMP_COLUMN));
        if !minutes.is_some_and(|m| self.window.contains(m)) {
            return;
        }
        self.stats.target_rows += 1;

        for col in FIRST_CHANNEL_COLUMN..=last_channel_column(circuit_count) {
            if let Some(cell) = row.cell_mut(col) {
                if is_zero(&cell.value) {
                    cell.highlighted = true;
                    self.stats.highlighted_cells += 1;
                }
            }
        }
    }

    fn skip_file(&mut self, file: &InputFile, reason: String) {
        warn!(file = %file.name, reason = %reason, "skipping input file");
        self.warnings.push(FileWarning {
            file: file.name.clone(),
            reason,
        });
    }

    fn check_cancelled(&self) -> Result<(), MergeError> {
        match &self.config.cancel_token {
            Some(token) if token.is_cancelled() => Err(MergeError::Cancelled),
            _ => Ok(()),
        }
    }
}

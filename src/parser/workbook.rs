//! Workbook Loader Module
//!
//! calamineで読み込んだセル値と、パッケージXMLから取得したスタイルを組み合わせて
//! 最初のシートをメモリ上の行モデル（`SourceSheet`）に変換します。

use std::collections::BTreeMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use tracing::debug;

use crate::api::InputFile;
use crate::error::MergeError;
use crate::parser::styles::XlsxPackage;
use crate::security::SecurityConfig;
use crate::types::{Cell, CellValue, Row};

/// 読み込んだ最初のシート
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceSheet {
    pub name: String,
    /// `rows[0]` が1行目
    pub rows: Vec<Row>,
    /// 列番号（1始まり）-> 列幅
    pub column_widths: BTreeMap<u16, f64>,
}

impl SourceSheet {
    /// 値またはスタイルを持つ最後の行番号
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// 指定行を取得（1始まり）
    pub fn row(&self, row: u32) -> Option<&Row> {
        if row == 0 {
            return None;
        }
        self.rows.get(row as usize - 1)
    }
}

/// 入力ファイルの最初のシートを読み込む
///
/// # 引数
///
/// * `file` - 入力ファイル（XLSX）
/// * `security` - 入力に適用するセキュリティ制限
///
/// # 戻り値
///
/// * `Ok(Some(SourceSheet))` - 読み込みに成功した場合
/// * `Ok(None)` - ワークブックにシートが存在しない場合
/// * `Err(MergeError)` - 読み込みエラー、またはセキュリティ制限違反
pub(crate) fn load_first_sheet(
    file: &InputFile,
    security: &SecurityConfig,
) -> Result<Option<SourceSheet>, MergeError> {
    security.check_input_size(file.data.len())?;

    // 1. パッケージXMLからスタイルとレイアウトを取得（セキュリティチェックを含む）
    let mut package = XlsxPackage::new(Cursor::new(file.data.as_slice()), security)?;
    let layout = package.take_first_sheet().unwrap_or_default();

    // 2. calamineでセル値を取得
    let sheets = open_workbook_auto_from_rs(Cursor::new(file.data.as_slice()))?;
    let mut workbook = match sheets {
        Sheets::Xlsx(workbook) => workbook,
        _ => {
            return Err(MergeError::Parse(calamine::Error::Msg(
                "Only XLSX format is supported",
            )))
        }
    };

    let sheet_name = if layout.name.is_empty() {
        match workbook.sheet_names().first() {
            Some(name) => name.clone(),
            None => return Ok(None),
        }
    } else {
        layout.name.clone()
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| MergeError::Parse(e.into()))?;

    // 3. 値とスタイルを行モデルに統合
    let mut grid: Vec<Vec<Cell>> = Vec::new();
    if let Some((start_row, start_col)) = range.start() {
        for (row_offset, data_row) in range.rows().enumerate() {
            let row = start_row + row_offset as u32 + 1;
            for (col_offset, data) in data_row.iter().enumerate() {
                let value = convert_value(data);
                if value.is_empty() {
                    continue;
                }
                let col = (start_col as usize + col_offset + 1).min(usize::from(u16::MAX)) as u16;
                *cell_at(&mut grid, row, col) = Cell::new(value);
            }
        }
    }

    for (&(row, col), &style_id) in &layout.cell_styles {
        let has_value = grid
            .get(row as usize - 1)
            .and_then(|cells| cells.get(usize::from(col) - 1))
            .is_some_and(|cell| !cell.value.is_empty());
        // 既定スタイル（0）のみの空セルは空として扱う
        if !has_value && style_id == 0 {
            continue;
        }
        if let Some(style) = package.style(style_id) {
            cell_at(&mut grid, row, col).style = Some(style);
        }
    }

    let mut rows: Vec<Row> = grid.into_iter().map(Row::from_cells).collect();
    while rows.last().is_some_and(|row| row.cell_count() == 0) {
        rows.pop();
    }

    debug!(
        file = %file.name,
        sheet = %sheet_name,
        rows = rows.len(),
        "loaded first sheet"
    );

    Ok(Some(SourceSheet {
        name: sheet_name,
        rows,
        column_widths: layout.column_widths,
    }))
}

/// グリッド上のセルを取得（必要に応じて行・列を拡張）
fn cell_at(grid: &mut Vec<Vec<Cell>>, row: u32, col: u16) -> &mut Cell {
    let row_idx = row as usize - 1;
    let col_idx = usize::from(col) - 1;
    if grid.len() <= row_idx {
        grid.resize_with(row_idx + 1, Vec::new);
    }
    let cells = &mut grid[row_idx];
    if cells.len() <= col_idx {
        cells.resize_with(col_idx + 1, Cell::empty);
    }
    &mut cells[col_idx]
}

/// calamineの値を `CellValue` に変換
///
/// 数式セルはキャッシュされた結果値として扱います。
fn convert_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::DateTime(round_to_second(value)),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// シリアル値の浮動小数点誤差（例: 08:59:59.999）を最も近い秒に丸める
fn round_to_second(value: NaiveDateTime) -> NaiveDateTime {
    let rounded = value + Duration::milliseconds(500);
    rounded.with_nanosecond(0).unwrap_or(rounded)
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Color, ExcelDateTime, Format, Workbook};

    fn build_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Log").unwrap();
        worksheet.set_column_width(2, 30).unwrap();

        let fill = Format::new().set_background_color(Color::RGB(0xFFF2CC));
        let date = Format::new().set_num_format("yyyy/mm/dd hh:mm:ss");

        worksheet.write_string(0, 0, "title").unwrap();
        worksheet
            .write_string(4, 2, "192.168.1.201 A-1/PCS1-1-1")
            .unwrap();
        let timestamp = ExcelDateTime::parse_from_str("2025-12-15 09:00:00").unwrap();
        worksheet.write_datetime_with_format(4, 3, &timestamp, &date).unwrap();
        worksheet.write_number(4, 4, 0).unwrap();
        worksheet.write_string(4, 5, "-").unwrap();
        worksheet.write_blank(5, 6, &fill).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_load_first_sheet() {
        let file = InputFile::from_bytes("log.xlsx", build_workbook());
        let sheet = load_first_sheet(&file, &SecurityConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(sheet.name, "Log");
        // 6行目はスタイル付きの空セルのみ
        assert_eq!(sheet.row_count(), 6);
        assert!(sheet.column_widths.contains_key(&3));

        let row5 = sheet.row(5).unwrap();
        assert_eq!(row5.cell_count(), 6);
        assert_eq!(
            row5.value(3),
            &CellValue::String("192.168.1.201 A-1/PCS1-1-1".to_string())
        );
        let expected = NaiveDate::from_ymd_opt(2025, 12, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(row5.value(4), &CellValue::DateTime(expected));
        assert_eq!(
            row5.cell(4).and_then(|c| c.style.as_ref()).and_then(|s| s.num_format.clone()),
            Some("yyyy/mm/dd hh:mm:ss".to_string())
        );
        assert_eq!(row5.value(5), &CellValue::Number(0.0));
        assert_eq!(row5.value(6), &CellValue::String("-".to_string()));

        let row6 = sheet.row(6).unwrap();
        assert!(!row6.has_values());
        assert_eq!(row6.cell_count(), 7);
        assert_eq!(
            row6.cell(7).and_then(|c| c.style.as_ref()).and_then(|s| s.fill),
            Some(0xFFF2CC)
        );

        assert_eq!(sheet.row(2).map(Row::cell_count), Some(0));
        assert!(sheet.row(0).is_none());
        assert!(sheet.row(7).is_none());
    }

    #[test]
    fn test_load_rejects_oversized_input() {
        let file = InputFile::from_bytes("log.xlsx", build_workbook());
        let security = SecurityConfig {
            max_input_file_size: 16,
            ..SecurityConfig::default()
        };
        assert!(matches!(
            load_first_sheet(&file, &security),
            Err(MergeError::SecurityViolation(_))
        ));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let file = InputFile::from_bytes("broken.xlsx", b"definitely not a workbook".to_vec());
        let err = load_first_sheet(&file, &SecurityConfig::default()).unwrap_err();
        assert!(err.is_per_file());
    }

    #[test]
    fn test_round_to_second() {
        let almost = NaiveDate::from_ymd_opt(2025, 12, 15)
            .unwrap()
            .and_hms_milli_opt(8, 59, 59, 999)
            .unwrap();
        assert_eq!(round_to_second(almost).hour(), 9);
        assert_eq!(round_to_second(almost).minute(), 0);
    }

    #[test]
    fn test_convert_value() {
        assert_eq!(convert_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert_value(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Error("#DIV/0!".to_string())
        );
        let expected = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(
            convert_value(&Data::DateTimeIso("2025-01-02T03:04:05".to_string())),
            CellValue::DateTime(expected)
        );
    }
}

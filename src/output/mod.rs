//! Output Module
//!
//! マージ結果のシートモデルと、そのXLSXへのシリアライズを提供するモジュール。

mod xlsx;

use std::collections::BTreeMap;

use crate::types::{CellCoord, Row};

pub(crate) use xlsx::write_workbook;

/// 出力シート名
pub const OUTPUT_SHEET_NAME: &str = "Result";

/// マージ後のシート
///
/// 1〜4行目がヘッダー、5行目以降がすべての入力ファイルのデータ行（ファイル順・行順）です。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSheet {
    /// ヘッダー行（1〜4行目）
    pub header_rows: Vec<Row>,
    /// データ行（5行目から連番）
    pub data_rows: Vec<Row>,
    /// 列番号（1始まり）-> 列幅
    pub column_widths: BTreeMap<u16, f64>,
}

impl MergedSheet {
    /// データ行の開始行番号
    pub const FIRST_DATA_ROW: u32 = 5;

    /// 出力上の行を取得（1始まり）
    pub fn row(&self, row: u32) -> Option<&Row> {
        if row == 0 {
            None
        } else if row < Self::FIRST_DATA_ROW {
            self.header_rows.get(row as usize - 1)
        } else {
            self.data_rows.get((row - Self::FIRST_DATA_ROW) as usize)
        }
    }

    /// 出力行番号付きで全行を列挙
    pub fn rows(&self) -> impl Iterator<Item = (u32, &Row)> {
        let header = self
            .header_rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (idx as u32 + 1, row));
        let data = self
            .data_rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (idx as u32 + Self::FIRST_DATA_ROW, row));
        header.chain(data)
    }

    /// ハイライトされたセルの座標（行順・列順）
    pub fn highlighted_cells(&self) -> Vec<CellCoord> {
        self.rows()
            .flat_map(|(row_num, row)| {
                row.iter()
                    .filter(|(_, cell)| cell.highlighted)
                    .map(move |(col, _)| CellCoord::new(row_num, col))
            })
            .collect()
    }
}

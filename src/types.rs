//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//!
//! 行番号・列番号はすべて1始まり（Excelの表記と同じ）で扱います。

use chrono::NaiveDateTime;
use std::sync::Arc;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 日付・時刻（タイムゾーンを持たない壁時計の値）
    ///
    /// ワークブックに記録された時・分をそのまま保持します。
    DateTime(NaiveDateTime),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空文字列も空として扱います。
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// セルの表示テキストを取得
    ///
    /// デバイスラベル列のように、値の型に関係なく文字列として扱いたい場合に使用します。
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y/%m/%d %H:%M:%S").to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// セル座標（1始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub row: u32,
    pub col: u16,
}

impl CellCoord {
    /// 新しい座標を生成
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// A1形式の文字列に変換（例: (5, 12) -> "L5"）
    pub fn to_a1_notation(self) -> String {
        format!("{}{}", column_letter(self.col), self.row)
    }
}

/// 列番号を列記号に変換（1 -> "A", 26 -> "Z", 27 -> "AA"）
pub fn column_letter(col: u16) -> String {
    let mut result = String::new();
    let mut n = u32::from(col.max(1));
    while n > 0 {
        let remainder = (n - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }
    result
}

/// 罫線の線種
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderLine {
    Thin,
    Medium,
    Dashed,
    Dotted,
    Thick,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderLine {
    /// `styles.xml` の `style` 属性値から線種を取得
    ///
    /// `none` や未知の値は `None` を返します。
    pub fn from_ooxml(value: &str) -> Option<Self> {
        let line = match value {
            "thin" => BorderLine::Thin,
            "medium" => BorderLine::Medium,
            "dashed" => BorderLine::Dashed,
            "dotted" => BorderLine::Dotted,
            "thick" => BorderLine::Thick,
            "double" => BorderLine::Double,
            "hair" => BorderLine::Hair,
            "mediumDashed" => BorderLine::MediumDashed,
            "dashDot" => BorderLine::DashDot,
            "mediumDashDot" => BorderLine::MediumDashDot,
            "dashDotDot" => BorderLine::DashDotDot,
            "mediumDashDotDot" => BorderLine::MediumDashDotDot,
            "slantDashDot" => BorderLine::SlantDashDot,
            _ => return None,
        };
        Some(line)
    }
}

/// 罫線の1辺
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderEdge {
    pub line: BorderLine,
    /// RGB（0xRRGGBB）。テーマ色など解決できない場合は `None`
    pub color: Option<u32>,
}

/// セルの罫線（4辺）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
}

/// フォント情報
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontStyle {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<u32>,
}

/// 水平方向の配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterAcross,
    Distributed,
}

/// 垂直方向の配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
    Justify,
    Distributed,
}

/// セルの配置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alignment {
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
    pub wrap_text: bool,
}

/// セルの見た目（cellXfs の1エントリを解決したもの）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    /// 数値書式（`General` の場合は `None`）
    pub num_format: Option<String>,
    pub font: FontStyle,
    /// 塗りつぶし（solidパターンのRGBのみ）
    pub fill: Option<u32>,
    pub border: BorderStyle,
    pub alignment: Alignment,
}

/// 共有されるスタイル参照
///
/// 同じ書式IDを持つセルは同じ `Arc` を共有します。
pub type StyleRef = Arc<CellStyle>;

/// 1セル分のデータ
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: Option<StyleRef>,
    /// 0判定でハイライト対象になったか（出力側のみで使用）
    pub highlighted: bool,
}

impl Cell {
    /// 値のみのセルを生成
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style: None,
            highlighted: false,
        }
    }

    /// 値とスタイルを持つセルを生成
    pub fn with_style(value: CellValue, style: Option<StyleRef>) -> Self {
        Self {
            value,
            style,
            highlighted: false,
        }
    }

    /// 空セル
    pub fn empty() -> Self {
        Self::new(CellValue::Empty)
    }

    /// 値もスタイルも持たないセルかどうか
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.style.is_none()
    }
}

/// 1行分のデータ
///
/// `cells[0]` が列1（A列）に対応します。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// セル列から行を生成（末尾の空セルは切り詰める）
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        let mut row = Self { cells };
        row.trim_trailing_blanks();
        row
    }

    /// 値またはスタイルを持つ最後の列番号（ExcelJSの `cellCount` 相当）
    pub fn cell_count(&self) -> u16 {
        self.cells.len() as u16
    }

    /// 少なくとも1つの非空の値を持つかどうか
    pub fn has_values(&self) -> bool {
        self.cells.iter().any(|c| !c.value.is_empty())
    }

    /// 指定列のセルを取得（1始まり）
    pub fn cell(&self, col: u16) -> Option<&Cell> {
        if col == 0 {
            return None;
        }
        self.cells.get(usize::from(col) - 1)
    }

    /// 指定列のセルを可変参照で取得（1始まり）
    pub fn cell_mut(&mut self, col: u16) -> Option<&mut Cell> {
        if col == 0 {
            return None;
        }
        self.cells.get_mut(usize::from(col) - 1)
    }

    /// 指定列の値を取得。列が存在しない場合は `CellValue::Empty`
    pub fn value(&self, col: u16) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cell(col).map(|c| &c.value).unwrap_or(&EMPTY)
    }

    /// 指定列までセルを確保する（足りない分は空セル）
    pub fn ensure_width(&mut self, width: u16) {
        let width = usize::from(width);
        if self.cells.len() < width {
            self.cells.resize_with(width, Cell::empty);
        }
    }

    /// 指定列の値を設定する（スタイルは保持）
    pub fn set_value(&mut self, col: u16, value: CellValue) {
        if col == 0 {
            return;
        }
        self.ensure_width(col);
        if let Some(cell) = self.cell_mut(col) {
            cell.value = value;
        }
    }

    /// 列番号付きでセルを列挙
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (idx as u16 + 1, cell))
    }

    fn trim_trailing_blanks(&mut self) {
        while self.cells.last().is_some_and(Cell::is_blank) {
            self.cells.pop();
        }
    }
}

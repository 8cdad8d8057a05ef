//! XLSX Writer
//!
//! `MergedSheet` を rust_xlsxwriter でXLSXバイナリにシリアライズします。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, FormatUnderline, Workbook, Worksheet,
};

use crate::error::MergeError;
use crate::output::{MergedSheet, OUTPUT_SHEET_NAME};
use crate::types::{BorderLine, Cell, CellStyle, CellValue, HorizontalAlign, VerticalAlign};

/// 書式を持たない日付セルに使う数値書式
pub const DEFAULT_DATETIME_FORMAT: &str = "yyyy/mm/dd hh:mm:ss";

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// シートをXLSXバイナリに変換
///
/// # 引数
///
/// * `sheet` - 出力するシート
/// * `highlight_color` - ハイライトセルの塗りつぶし色（0xRRGGBB）
///
/// # 戻り値
///
/// * `Ok(Vec<u8>)` - XLSXファイルのバイナリ
/// * `Err(MergeError::Write)` - シリアライズに失敗した場合
pub(crate) fn write_workbook(sheet: &MergedSheet, highlight_color: u32) -> Result<Vec<u8>, MergeError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(OUTPUT_SHEET_NAME)?;

    for (&col, &width) in &sheet.column_widths {
        if col > 0 {
            worksheet.set_column_width(col - 1, width)?;
        }
    }

    let mut formats = FormatCache::new(highlight_color);
    for (row_num, row) in sheet.rows() {
        for (col, cell) in row.iter() {
            if cell.is_blank() && !cell.highlighted {
                continue;
            }
            write_cell(worksheet, &mut formats, row_num - 1, col - 1, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(
    worksheet: &mut Worksheet,
    formats: &mut FormatCache,
    row: u32,
    col: u16,
    cell: &Cell,
) -> Result<(), MergeError> {
    let is_date = matches!(cell.value, CellValue::DateTime(_));
    let format = formats.get(cell, is_date);

    match &cell.value {
        CellValue::Number(n) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        CellValue::String(s) if s.is_empty() => {
            worksheet.write_blank(row, col, format)?;
        }
        CellValue::String(s) | CellValue::Error(s) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        CellValue::DateTime(dt) => {
            worksheet.write_number_with_format(row, col, excel_serial(dt), format)?;
        }
        CellValue::Empty => {
            worksheet.write_blank(row, col, format)?;
        }
    }
    Ok(())
}

/// 日付・時刻をExcelのシリアル値（1900年エポック）に変換
///
/// 1900-03-01より前の値は、Excelの1900年うるう年バグに合わせて1日ずらします。
pub(crate) fn excel_serial(dt: &NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let serial = (*dt - epoch).num_milliseconds() as f64 / MILLIS_PER_DAY;
    if serial < 61.0 {
        serial - 1.0
    } else {
        serial
    }
}

type FormatKey = (Option<usize>, bool, bool);

/// スタイル（`Arc` の同一性）・ハイライト有無・日付既定書式の組ごとに `Format` を共有する
struct FormatCache {
    highlight_color: u32,
    formats: HashMap<FormatKey, Format>,
}

impl FormatCache {
    fn new(highlight_color: u32) -> Self {
        Self {
            highlight_color,
            formats: HashMap::new(),
        }
    }

    fn get(&mut self, cell: &Cell, is_date: bool) -> &Format {
        let style = cell.style.as_deref();
        let needs_date_format = is_date && style.and_then(|s| s.num_format.as_ref()).is_none();
        let key = (
            cell.style.as_ref().map(|s| Arc::as_ptr(s) as usize),
            cell.highlighted,
            needs_date_format,
        );
        let highlight = cell.highlighted.then_some(self.highlight_color);

        self.formats.entry(key).or_insert_with(|| {
            let mut format = build_format(style, highlight);
            if needs_date_format {
                format = format.set_num_format(DEFAULT_DATETIME_FORMAT);
            }
            format
        })
    }
}

/// `CellStyle` から rust_xlsxwriter の `Format` を構築
///
/// `highlight` が指定された場合は、塗りつぶしをその色の単色塗りで上書きします。
fn build_format(style: Option<&CellStyle>, highlight: Option<u32>) -> Format {
    let mut format = Format::new();

    if let Some(style) = style {
        if let Some(code) = &style.num_format {
            format = format.set_num_format(code);
        }

        let font = &style.font;
        if let Some(name) = &font.name {
            format = format.set_font_name(name);
        }
        if let Some(size) = font.size {
            format = format.set_font_size(size);
        }
        if let Some(color) = font.color {
            format = format.set_font_color(Color::RGB(color));
        }
        if font.bold {
            format = format.set_bold();
        }
        if font.italic {
            format = format.set_italic();
        }
        if font.underline {
            format = format.set_underline(FormatUnderline::Single);
        }

        if let Some(fill) = style.fill {
            format = format
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(fill));
        }

        let border = &style.border;
        if let Some(edge) = border.left {
            format = format.set_border_left(border_line(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_left_color(Color::RGB(color));
            }
        }
        if let Some(edge) = border.right {
            format = format.set_border_right(border_line(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_right_color(Color::RGB(color));
            }
        }
        if let Some(edge) = border.top {
            format = format.set_border_top(border_line(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_top_color(Color::RGB(color));
            }
        }
        if let Some(edge) = border.bottom {
            format = format.set_border_bottom(border_line(edge.line));
            if let Some(color) = edge.color {
                format = format.set_border_bottom_color(Color::RGB(color));
            }
        }

        let alignment = &style.alignment;
        if let Some(horizontal) = alignment.horizontal {
            format = format.set_align(horizontal_align(horizontal));
        }
        if let Some(vertical) = alignment.vertical {
            format = format.set_align(vertical_align(vertical));
        }
        if alignment.wrap_text {
            format = format.set_text_wrap();
        }
    }

    if let Some(color) = highlight {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(color));
    }

    format
}

fn border_line(line: BorderLine) -> FormatBorder {
    match line {
        BorderLine::Thin => FormatBorder::Thin,
        BorderLine::Medium => FormatBorder::Medium,
        BorderLine::Dashed => FormatBorder::Dashed,
        BorderLine::Dotted => FormatBorder::Dotted,
        BorderLine::Thick => FormatBorder::Thick,
        BorderLine::Double => FormatBorder::Double,
        BorderLine::Hair => FormatBorder::Hair,
        BorderLine::MediumDashed => FormatBorder::MediumDashed,
        BorderLine::DashDot => FormatBorder::DashDot,
        BorderLine::MediumDashDot => FormatBorder::MediumDashDot,
        BorderLine::DashDotDot => FormatBorder::DashDotDot,
        BorderLine::MediumDashDotDot => FormatBorder::MediumDashDotDot,
        BorderLine::SlantDashDot => FormatBorder::SlantDashDot,
    }
}

fn horizontal_align(align: HorizontalAlign) -> FormatAlign {
    match align {
        HorizontalAlign::Left => FormatAlign::Left,
        HorizontalAlign::Center => FormatAlign::Center,
        HorizontalAlign::Right => FormatAlign::Right,
        HorizontalAlign::Fill => FormatAlign::Fill,
        HorizontalAlign::Justify => FormatAlign::Justify,
        HorizontalAlign::CenterAcross => FormatAlign::CenterAcross,
        HorizontalAlign::Distributed => FormatAlign::Distributed,
    }
}

fn vertical_align(align: VerticalAlign) -> FormatAlign {
    match align {
        VerticalAlign::Top => FormatAlign::Top,
        VerticalAlign::Center => FormatAlign::VerticalCenter,
        VerticalAlign::Bottom => FormatAlign::Bottom,
        VerticalAlign::Justify => FormatAlign::VerticalJustify,
        VerticalAlign::Distributed => FormatAlign::VerticalDistributed,
    }
}

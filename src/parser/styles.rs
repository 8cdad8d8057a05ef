//! XLSX Package Parser Module
//!
//! XLSX内部のXMLファイルから、calamineで取得不可能な情報を抽出するモジュール。
//! スタイルテーブル（数値書式・フォント・塗りつぶし・罫線・配置）、
//! 最初のシートのパス解決、セルごとのスタイルID、列幅を提供します。

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Seek};
use std::sync::Arc;

use quick_xml::events::attributes::Attribute;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::MergeError;
use crate::security::{validate_zip_path, SecurityConfig};
use crate::types::{
    Alignment, BorderEdge, BorderLine, BorderStyle, CellStyle, FontStyle, HorizontalAlign,
    StyleRef, VerticalAlign,
};

/// 列幅を保持する最大列番号
///
/// `<col min="13" max="16384">` のような「残り全列」指定を展開しすぎないための上限です。
const MAX_WIDTH_COLUMN: u32 = 256;

/// Excelの最大列番号（XFD）
const MAX_COLUMN: u32 = 16_384;

/// Excelの最大行番号
const MAX_ROW: u32 = 1_048_576;

/// 最初のシートのレイアウト情報
#[derive(Debug, Clone, Default)]
pub(crate) struct SheetLayout {
    /// シート名
    pub name: String,
    /// 列番号（1始まり）-> 列幅
    pub column_widths: BTreeMap<u16, f64>,
    /// (行, 列)（1始まり）-> cellXfsのインデックス
    pub cell_styles: HashMap<(u32, u16), u32>,
}

/// cellXfs要素（解決前）
#[derive(Debug, Clone, Default)]
struct RawXf {
    num_fmt_id: u32,
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    alignment: Alignment,
}

/// styles.xml の解析結果（解決前のテーブル）
#[derive(Debug, Default)]
struct StyleTables {
    num_formats: HashMap<u32, String>,
    fonts: Vec<FontStyle>,
    fills: Vec<Option<u32>>,
    borders: Vec<BorderStyle>,
    cell_xfs: Vec<RawXf>,
}

impl StyleTables {
    /// cellXfsの各エントリを `CellStyle` に解決する
    fn resolve(self) -> Vec<StyleRef> {
        self.cell_xfs
            .iter()
            .map(|xf| {
                let num_format = if xf.num_fmt_id < 164 {
                    get_builtin_format(xf.num_fmt_id).map(str::to_string)
                } else {
                    self.num_formats.get(&xf.num_fmt_id).cloned()
                }
                .filter(|code| !code.eq_ignore_ascii_case("General"));

                Arc::new(CellStyle {
                    num_format,
                    font: self.fonts.get(xf.font_id).cloned().unwrap_or_default(),
                    fill: self.fills.get(xf.fill_id).copied().flatten(),
                    border: self.borders.get(xf.border_id).copied().unwrap_or_default(),
                    alignment: xf.alignment,
                })
            })
            .collect()
    }
}

/// XLSXパッケージパーサー
///
/// XLSXファイル（ZIPアーカイブ）からXMLを直接解析し、
/// calamineで取得できない見た目の情報を抽出します。
#[derive(Debug, Clone, Default)]
pub(crate) struct XlsxPackage {
    /// cellXfsのインデックス -> 解決済みスタイル
    styles: Vec<StyleRef>,
    /// 最初のシート（シートが存在しない場合は `None`）
    first_sheet: Option<SheetLayout>,
}

impl XlsxPackage {
    /// XLSXファイル（ZIPアーカイブ）を解析
    ///
    /// # 引数
    ///
    /// * `reader` - XLSXファイルを読み込むためのリーダー（Read + Seekトレイトを実装）
    /// * `security` - アーカイブに適用するセキュリティ制限
    ///
    /// # 戻り値
    ///
    /// * `Ok(XlsxPackage)` - 解析に成功した場合
    /// * `Err(MergeError)` - ZIP/XMLの解析エラー、またはセキュリティ制限違反
    pub fn new<R: Read + Seek>(reader: R, security: &SecurityConfig) -> Result<Self, MergeError> {
        let mut archive = ZipArchive::new(reader).map_err(|e| MergeError::Zip(e.to_string()))?;
        security.check_archive(&mut archive)?;

        // 1. xl/styles.xml を解析
        let styles = match read_entry(&mut archive, "xl/styles.xml")? {
            Some(xml) => parse_styles(&xml)?.resolve(),
            None => Vec::new(),
        };

        // 2. xl/workbook.xml と xl/_rels/workbook.xml.rels から最初のシートを特定
        let first_sheet = match locate_first_sheet(&mut archive)? {
            Some((name, path)) => {
                let mut layout = match read_entry(&mut archive, &path)? {
                    Some(xml) => parse_worksheet(&xml)?,
                    None => SheetLayout::default(),
                };
                layout.name = name;
                Some(layout)
            }
            None => None,
        };

        Ok(Self {
            styles,
            first_sheet,
        })
    }

    /// スタイルIDから解決済みスタイルを取得
    pub fn style(&self, style_id: u32) -> Option<StyleRef> {
        self.styles.get(style_id as usize).cloned()
    }

    /// 最初のシートのレイアウト情報を取り出す
    pub fn take_first_sheet(&mut self) -> Option<SheetLayout> {
        self.first_sheet.take()
    }
}

fn xml_error(e: impl std::fmt::Display) -> MergeError {
    MergeError::Xml(e.to_string())
}

/// ZIPエントリを読み込む（存在しない場合は `None`）
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, MergeError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(MergeError::Zip(e.to_string())),
    };
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(Some(content))
}

fn new_reader(xml: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);
    reader
}

/// 要素の属性値を取得（名前空間接頭辞は無視）
fn attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, MergeError> {
    for attr in e.attributes() {
        let attr: Attribute<'_> = attr.map_err(xml_error)?;
        if attr.key.local_name().as_ref() == key {
            let raw = std::str::from_utf8(&attr.value)?;
            return Ok(Some(unescape(raw).map_err(xml_error)?.into_owned()));
        }
    }
    Ok(None)
}

fn attr_u32(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<u32>, MergeError> {
    match attr(e, key)? {
        Some(value) => Ok(Some(value.trim().parse::<u32>()?)),
        None => Ok(None),
    }
}

/// `<b/>` や `<b val="0"/>` のような真偽値要素を解釈
fn flag_element(e: &BytesStart<'_>) -> Result<bool, MergeError> {
    Ok(match attr(e, b"val")? {
        Some(v) => !(v == "0" || v.eq_ignore_ascii_case("false") || v == "none"),
        None => true,
    })
}

/// `<color rgb="FFRRGGBB"/>` / `<color indexed="n"/>` をRGBに変換
///
/// テーマ色・自動色は解決せず `None` を返します。
fn parse_color(e: &BytesStart<'_>) -> Result<Option<u32>, MergeError> {
    if let Some(rgb) = attr(e, b"rgb")? {
        let hex = rgb.trim();
        let hex = hex.get(hex.len().saturating_sub(6)..).unwrap_or(hex);
        return Ok(u32::from_str_radix(hex, 16).ok());
    }
    if let Some(index) = attr_u32(e, b"indexed")? {
        return Ok(indexed_color(index));
    }
    Ok(None)
}

/// 旧形式のインデックスカラーパレット（0〜63）
fn indexed_color(index: u32) -> Option<u32> {
    const PALETTE: [u32; 64] = [
        0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF, // 0-7
        0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0xFF00FF, 0x00FFFF, // 8-15
        0x800000, 0x008000, 0x000080, 0x808000, 0x800080, 0x008080, 0xC0C0C0, 0x808080, // 16-23
        0x9999FF, 0x993366, 0xFFFFCC, 0xCCFFFF, 0x660066, 0xFF8080, 0x0066CC, 0xCCCCFF, // 24-31
        0x000080, 0xFF00FF, 0xFFFF00, 0x00FFFF, 0x800080, 0x800000, 0x008080, 0x0000FF, // 32-39
        0x00CCFF, 0xCCFFFF, 0xCCFFCC, 0xFFFF99, 0x99CCFF, 0xFF99CC, 0xCC99FF, 0xFFCC99, // 40-47
        0x3366FF, 0x33CCCC, 0x99CC00, 0xFFCC00, 0xFF9900, 0xFF6600, 0x666699, 0x969696, // 48-55
        0x003366, 0x339966, 0x003300, 0x333300, 0x993300, 0x993366, 0x333399, 0x333333, // 56-63
    ];
    PALETTE.get(index as usize).copied()
}

fn parse_horizontal(value: &str) -> Option<HorizontalAlign> {
    match value {
        "left" => Some(HorizontalAlign::Left),
        "center" => Some(HorizontalAlign::Center),
        "right" => Some(HorizontalAlign::Right),
        "fill" => Some(HorizontalAlign::Fill),
        "justify" => Some(HorizontalAlign::Justify),
        "centerContinuous" => Some(HorizontalAlign::CenterAcross),
        "distributed" => Some(HorizontalAlign::Distributed),
        _ => None,
    }
}

fn parse_vertical(value: &str) -> Option<VerticalAlign> {
    match value {
        "top" => Some(VerticalAlign::Top),
        "center" => Some(VerticalAlign::Center),
        "bottom" => Some(VerticalAlign::Bottom),
        "justify" => Some(VerticalAlign::Justify),
        "distributed" => Some(VerticalAlign::Distributed),
        _ => None,
    }
}

fn parse_alignment(e: &BytesStart<'_>) -> Result<Alignment, MergeError> {
    Ok(Alignment {
        horizontal: attr(e, b"horizontal")?.as_deref().and_then(parse_horizontal),
        vertical: attr(e, b"vertical")?.as_deref().and_then(parse_vertical),
        wrap_text: attr(e, b"wrapText")?.is_some_and(|v| v == "1" || v == "true"),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellXfs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"left" | b"start" => Some(Side::Left),
            b"right" | b"end" => Some(Side::Right),
            b"top" => Some(Side::Top),
            b"bottom" => Some(Side::Bottom),
            _ => None,
        }
    }

    fn set(self, border: &mut BorderStyle, edge: Option<BorderEdge>) {
        match self {
            Side::Left => border.left = edge,
            Side::Right => border.right = edge,
            Side::Top => border.top = edge,
            Side::Bottom => border.bottom = edge,
        }
    }
}

/// styles.xml 解析中の状態
#[derive(Debug)]
struct StyleParser {
    tables: StyleTables,
    section: Section,
    font: Option<FontStyle>,
    // (solidかどうか, 前景色)
    fill: Option<(bool, Option<u32>)>,
    border: Option<BorderStyle>,
    edge: Option<(Side, Option<BorderLine>, Option<u32>)>,
    xf: Option<RawXf>,
}

impl StyleParser {
    fn new() -> Self {
        Self {
            tables: StyleTables::default(),
            section: Section::None,
            font: None,
            fill: None,
            border: None,
            edge: None,
            xf: None,
        }
    }

    fn on_start(&mut self, e: &BytesStart<'_>, is_empty: bool) -> Result<(), MergeError> {
        let name = e.local_name();
        match (self.section, name.as_ref()) {
            (_, b"numFmts") if !is_empty => self.section = Section::NumFmts,
            (_, b"fonts") if !is_empty => self.section = Section::Fonts,
            (_, b"fills") if !is_empty => self.section = Section::Fills,
            (_, b"borders") if !is_empty => self.section = Section::Borders,
            (_, b"cellXfs") if !is_empty => self.section = Section::CellXfs,

            (Section::NumFmts, b"numFmt") => {
                if let (Some(id), Some(code)) = (attr_u32(e, b"numFmtId")?, attr(e, b"formatCode")?) {
                    self.tables.num_formats.insert(id, code);
                }
            }

            (Section::Fonts, b"font") => {
                if is_empty {
                    self.tables.fonts.push(FontStyle::default());
                } else {
                    self.font = Some(FontStyle::default());
                }
            }
            (Section::Fonts, child) => {
                if let Some(font) = self.font.as_mut() {
                    match child {
                        b"b" => font.bold = flag_element(e)?,
                        b"i" => font.italic = flag_element(e)?,
                        b"u" => font.underline = flag_element(e)?,
                        b"sz" => {
                            font.size = attr(e, b"val")?.and_then(|v| v.trim().parse::<f64>().ok())
                        }
                        b"name" => font.name = attr(e, b"val")?,
                        b"color" => font.color = parse_color(e)?,
                        _ => {}
                    }
                }
            }

            (Section::Fills, b"fill") => {
                if is_empty {
                    self.tables.fills.push(None);
                } else {
                    self.fill = Some((false, None));
                }
            }
            (Section::Fills, b"patternFill") => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.0 = attr(e, b"patternType")?.as_deref() == Some("solid");
                }
            }
            (Section::Fills, b"fgColor") => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.1 = parse_color(e)?;
                }
            }

            (Section::Borders, b"border") => {
                if is_empty {
                    self.tables.borders.push(BorderStyle::default());
                } else {
                    self.border = Some(BorderStyle::default());
                }
            }
            (Section::Borders, b"color") => {
                if let Some(edge) = self.edge.as_mut() {
                    edge.2 = parse_color(e)?;
                }
            }
            (Section::Borders, side_name) => {
                if let (Some(side), Some(border)) = (Side::from_name(side_name), self.border.as_mut())
                {
                    let line = attr(e, b"style")?.as_deref().and_then(BorderLine::from_ooxml);
                    if is_empty {
                        side.set(border, line.map(|line| BorderEdge { line, color: None }));
                    } else {
                        self.edge = Some((side, line, None));
                    }
                }
            }

            (Section::CellXfs, b"xf") => {
                let raw = RawXf {
                    num_fmt_id: attr_u32(e, b"numFmtId")?.unwrap_or(0),
                    font_id: attr_u32(e, b"fontId")?.unwrap_or(0) as usize,
                    fill_id: attr_u32(e, b"fillId")?.unwrap_or(0) as usize,
                    border_id: attr_u32(e, b"borderId")?.unwrap_or(0) as usize,
                    alignment: Alignment::default(),
                };
                if is_empty {
                    self.tables.cell_xfs.push(raw);
                } else {
                    self.xf = Some(raw);
                }
            }
            (Section::CellXfs, b"alignment") => {
                if let Some(xf) = self.xf.as_mut() {
                    xf.alignment = parse_alignment(e)?;
                }
            }

            _ => {}
        }
        Ok(())
    }

    fn on_end(&mut self, name: &[u8]) {
        match (self.section, name) {
            (_, b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellXfs") => {
                self.section = Section::None;
            }
            (Section::Fonts, b"font") => {
                if let Some(font) = self.font.take() {
                    self.tables.fonts.push(font);
                }
            }
            (Section::Fills, b"fill") => {
                if let Some((solid, color)) = self.fill.take() {
                    self.tables.fills.push(if solid { color } else { None });
                }
            }
            (Section::Borders, b"border") => {
                if let Some(border) = self.border.take() {
                    self.tables.borders.push(border);
                }
            }
            (Section::Borders, side_name) => {
                if let (Some((side, line, color)), Some(border)) = (self.edge, self.border.as_mut()) {
                    if Side::from_name(side_name) == Some(side) {
                        side.set(border, line.map(|line| BorderEdge { line, color }));
                        self.edge = None;
                    }
                }
            }
            (Section::CellXfs, b"xf") => {
                if let Some(xf) = self.xf.take() {
                    self.tables.cell_xfs.push(xf);
                }
            }
            _ => {}
        }
    }
}

/// xl/styles.xml の解析
///
/// `<numFmts>`、`<fonts>`、`<fills>`、`<borders>`、`<cellXfs>` を解析します。
/// `<cellStyleXfs>` と `<dxfs>` は対象外です。
fn parse_styles(xml: &[u8]) -> Result<StyleTables, MergeError> {
    let mut reader = new_reader(xml);
    let mut buf = Vec::new();
    let mut parser = StyleParser::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.on_start(&e, false)?,
            Ok(Event::Empty(e)) => parser.on_start(&e, true)?,
            Ok(Event::End(e)) => parser.on_end(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.tables)
}

/// 最初のシートの名前とパッケージ内パスを取得
///
/// `xl/workbook.xml` の最初の `<sheet>` 要素を、`xl/_rels/workbook.xml.rels` で
/// パスに解決します。
fn locate_first_sheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Option<(String, String)>, MergeError> {
    let workbook_xml = match read_entry(archive, "xl/workbook.xml")? {
        Some(xml) => xml,
        None => return Ok(None),
    };

    let mut reader = new_reader(&workbook_xml);
    let mut buf = Vec::new();
    let mut first: Option<(String, Option<String>)> = None;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                first = Some((attr(&e, b"name")?.unwrap_or_default(), attr(&e, b"id")?));
                break;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    let (name, rel_id) = match first {
        Some(sheet) => sheet,
        None => return Ok(None),
    };

    let relationships = match read_entry(archive, "xl/_rels/workbook.xml.rels")? {
        Some(xml) => parse_relationships(&xml)?,
        None => HashMap::new(),
    };

    let path = rel_id
        .and_then(|id| relationships.get(&id).cloned())
        .map(|target| resolve_target(&target))
        .unwrap_or_else(|| "xl/worksheets/sheet1.xml".to_string());
    validate_zip_path(&path)
        .map_err(|e| MergeError::SecurityViolation(format!("Invalid sheet path: {}", e)))?;

    Ok(Some((name, path)))
}

/// リレーションシップファイルを解析（Id -> Target）
fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, MergeError> {
    let mut reader = new_reader(xml);
    let mut buf = Vec::new();
    let mut relationships = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr(&e, b"Id")?, attr(&e, b"Target")?) {
                    relationships.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// リレーションシップのターゲットをパッケージ内パスに変換
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

/// セル参照文字列を座標に変換（例: "AB12" -> (12, 28)）
pub(crate) fn parse_cell_ref(reference: &str) -> Option<(u32, u16)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    let mut col: u32 = 0;
    for b in letters.bytes() {
        col = col * 26 + u32::from(b.to_ascii_uppercase() - b'A' + 1);
        if col > MAX_COLUMN {
            return None;
        }
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 || row > MAX_ROW {
        return None;
    }
    Some((row, col as u16))
}

/// ワークシート解析中の状態
#[derive(Debug, Default)]
struct WorksheetParser {
    layout: SheetLayout,
    in_cols: bool,
    current_row: u32,
    current_col: u16,
}

impl WorksheetParser {
    fn on_start(&mut self, e: &BytesStart<'_>, is_empty: bool) -> Result<(), MergeError> {
        match e.local_name().as_ref() {
            b"cols" if !is_empty => self.in_cols = true,
            b"col" if self.in_cols => {
                // <col min="3" max="3" width="12.5" customWidth="1"/>
                let min = attr_u32(e, b"min")?.unwrap_or(1).max(1);
                let max = attr_u32(e, b"max")?.unwrap_or(min).min(MAX_WIDTH_COLUMN);
                if let Some(width) = attr(e, b"width")?.and_then(|w| w.trim().parse::<f64>().ok()) {
                    for col in min..=max {
                        self.layout.column_widths.insert(col as u16, width);
                    }
                }
            }
            b"row" => {
                // <row r="15"> （r属性が省略された場合は直前の行の次）
                let row = match attr_u32(e, b"r")? {
                    Some(r) => Some(r),
                    None => self.current_row.checked_add(1),
                };
                self.current_row = match row {
                    Some(r) if (1..=MAX_ROW).contains(&r) => r,
                    _ => {
                        return Err(MergeError::Xml(format!(
                            "row number out of range (max: {})",
                            MAX_ROW
                        )))
                    }
                };
                self.current_col = 0;
            }
            b"c" => {
                // <c r="A1" s="3" t="s">
                let (row, col) = match attr(e, b"r")? {
                    Some(reference) => parse_cell_ref(&reference).ok_or_else(|| {
                        MergeError::Xml(format!("invalid cell reference '{}'", reference))
                    })?,
                    None => {
                        let col = self.current_col.saturating_add(1);
                        if u32::from(col) > MAX_COLUMN {
                            return Err(MergeError::Xml(format!(
                                "column number out of range (max: {})",
                                MAX_COLUMN
                            )));
                        }
                        (self.current_row.max(1), col)
                    }
                };
                self.current_row = row;
                self.current_col = col;

                if let Some(style_id) = attr_u32(e, b"s")? {
                    self.layout.cell_styles.insert((row, col), style_id);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// ワークシートXMLから列幅とセルのスタイルIDを解析
fn parse_worksheet(xml: &[u8]) -> Result<SheetLayout, MergeError> {
    let mut reader = new_reader(xml);
    let mut buf = Vec::new();
    let mut parser = WorksheetParser::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.on_start(&e, false)?,
            Ok(Event::Empty(e)) => parser.on_start(&e, true)?,
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"cols" {
                    parser.in_cols = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.layout)
}

/// ビルトイン書式IDからNumber Format Stringを取得
fn get_builtin_format(id: u32) -> Option<&'static str> {
    match id {
        0 => Some("General"),
        1 => Some("0"),
        2 => Some("0.00"),
        3 => Some("#,##0"),
        4 => Some("#,##0.00"),
        9 => Some("0%"),
        10 => Some("0.00%"),
        11 => Some("0.00E+00"),
        12 => Some("# ?/?"),
        13 => Some("# ??/??"),
        14 => Some("mm-dd-yy"),
        15 => Some("d-mmm-yy"),
        16 => Some("d-mmm"),
        17 => Some("mmm-yy"),
        18 => Some("h:mm AM/PM"),
        19 => Some("h:mm:ss AM/PM"),
        20 => Some("h:mm"),
        21 => Some("h:mm:ss"),
        22 => Some("m/d/yy h:mm"),
        37 => Some("#,##0_);(#,##0)"),
        38 => Some("#,##0_);[Red](#,##0)"),
        39 => Some("#,##0.00_);(#,##0.00)"),
        40 => Some("#,##0.00_);[Red](#,##0.00)"),
        45 => Some("mm:ss"),
        46 => Some("[h]:mm:ss"),
        47 => Some("mm:ss.0"),
        48 => Some("##0.0E+0"),
        49 => Some("@"),
        _ => None,
    }
}

//! Parser Module
//!
//! 入力ワークブックの読み込み。セル値はcalamine、スタイルと列幅はパッケージXMLから取得します。

pub(crate) mod styles;
mod workbook;

pub(crate) use workbook::{load_first_sheet, SourceSheet};

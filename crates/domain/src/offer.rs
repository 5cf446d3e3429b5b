//! # オファー
//!
//! 週替わりオファー通知のペイロードを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`Offer`] | 週替わりオファー | 通知実行のトリガーとなるペイロード |
//! | [`VegetableLine`] | 野菜明細 | オファーに含まれる商品 1 行 |
//!
//! JSON のフィールド名は camelCase（`startDate`, `standardQuantity` 等）。

use serde::{Deserialize, Serialize};

/// 価格・数量が無い場合のプレースホルダー
pub const MISSING_VALUE_PLACEHOLDER: &str = "—";

/// 包装が無い場合のプレースホルダー
pub const MISSING_PACKAGING_PLACEHOLDER: &str = "N/A";

/// 週替わりオファー
///
/// リクエストスコープの一時的な値。永続化されない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub title:       String,
    pub description: String,
    /// 開始日（日付らしき文字列をそのまま表示する）
    pub start_date:  String,
    pub end_date:    String,
    /// 野菜明細（順序を保持する）
    #[serde(default)]
    pub vegetables:  Option<Vec<VegetableLine>>,
}

impl Offer {
    /// 表示すべき野菜明細を返す
    ///
    /// 未指定・空の場合は `None`。
    pub fn listed_vegetables(&self) -> Option<&[VegetableLine]> {
        self.vegetables.as_deref().filter(|lines| !lines.is_empty())
    }
}

/// 野菜明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetableLine {
    pub name:              String,
    #[serde(default)]
    pub price:             Option<f64>,
    #[serde(default)]
    pub packaging:         Option<String>,
    #[serde(default)]
    pub standard_quantity: Option<f64>,
}

impl VegetableLine {
    /// 価格表示（小数 2 桁 + 通貨記号）
    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) => format!("{price:.2} €"),
            None => MISSING_VALUE_PLACEHOLDER.to_string(),
        }
    }

    /// 包装表示
    pub fn packaging_label(&self) -> &str {
        self.packaging
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(MISSING_PACKAGING_PLACEHOLDER)
    }

    /// 標準数量表示（包装単位を併記）
    ///
    /// 包装が無い場合は数量のみを表示する。
    pub fn standard_quantity_label(&self) -> String {
        let Some(quantity) = self.standard_quantity else {
            return MISSING_VALUE_PLACEHOLDER.to_string();
        };
        match self.packaging.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(unit) => format!("{quantity} {unit}"),
            None => quantity.to_string(),
        }
    }
}

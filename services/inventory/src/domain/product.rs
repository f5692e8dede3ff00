//! 产品与库存相关的领域类型

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// 产品类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductType {
    Beer,
    Cocktail,
    Liqueur,
    #[serde(rename = "Hard Seltzer")]
    HardSeltzer,
}

impl ProductType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Beer" => Some(Self::Beer),
            "Cocktail" => Some(Self::Cocktail),
            "Liqueur" => Some(Self::Liqueur),
            "Hard Seltzer" => Some(Self::HardSeltzer),
            _ => None,
        }
    }
}

/// 包装类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageType {
    Can,
    Bottle,
}

impl PackageType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Can" => Some(Self::Can),
            "Bottle" => Some(Self::Bottle),
            _ => None,
        }
    }
}

/// 口味档案
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasteProfile {
    #[serde(default)]
    pub primary_flavor: Option<String>,
    #[serde(default)]
    pub sweetness: Option<String>,
    #[serde(default)]
    pub bitterness: Option<String>,
}

/// 通过校验的新增产品请求，按下游 API 的字段名序列化
///
/// 数值字段保留调用方给出的数字表示（`355` 不会变成 `355.0`）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub description: String,
    pub abv: Number,
    pub volume: Number,
    pub package: PackageType,
    pub price: Number,
    pub cost: Number,
    pub stock_quantity: u64,
    pub reorder_point: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taste_profile: Option<TasteProfile>,
}

/// 库存增减量，下游接口要求字段名为 `Quantity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockAdjustment {
    #[serde(rename = "Quantity")]
    pub quantity: i64,
}

/// 下游返回的产品中与补货判断相关的字段
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    #[serde(default)]
    pub stock_quantity: Option<f64>,
    #[serde(default)]
    pub reorder_point: Option<f64>,
}

impl StockLevel {
    /// 从下游产品记录中读取库存字段；字段缺失或类型不符时视为未知
    pub fn from_product(product: &Value) -> Self {
        serde_json::from_value(product.clone()).unwrap_or_default()
    }

    /// 库存量不高于补货点时为低库存
    pub fn is_low(&self) -> bool {
        match (self.stock_quantity, self.reorder_point) {
            (Some(stock), Some(reorder)) => stock <= reorder,
            _ => false,
        }
    }
}

//! 请求体字段校验
//!
//! 在任何下游调用之前同步执行；数值字段接受 JSON 数字或数字字符串。

use serde::Serialize;
use serde_json::{Number, Value};
use thiserror::Error;

use super::product::{NewProduct, PackageType, ProductType, StockAdjustment, TasteProfile};

/// 单个字段的校验失败
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: &'static str,
    pub path: String,
    pub location: &'static str,
}

impl Violation {
    pub fn body_field(path: &str, value: Option<&Value>, msg: &'static str) -> Self {
        Self {
            kind: "field",
            value: value.cloned(),
            msg,
            path: path.to_string(),
            location: "body",
        }
    }
}

/// 按字段声明顺序排列的校验失败列表，序列化为 `{ "errors": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("request failed validation on {} field(s)", errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<Violation>,
}

impl ValidationErrors {
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|v| v.path.as_str()).collect()
    }

    // 只在至少一个字段失败时构造
    fn collect(violations: impl IntoIterator<Item = Option<Violation>>) -> Self {
        Self {
            errors: violations.into_iter().flatten().collect(),
        }
    }
}

type Checked<T> = Result<T, Violation>;

fn require<T>(
    body: &Value,
    field: &str,
    msg: &'static str,
    rule: impl FnOnce(&Value) -> Option<T>,
) -> Checked<T> {
    let value = body.get(field);
    value
        .and_then(rule)
        .ok_or_else(|| Violation::body_field(field, value, msg))
}

fn optional<T>(
    body: &Value,
    field: &str,
    msg: &'static str,
    rule: impl FnOnce(&Value) -> Option<T>,
) -> Checked<Option<T>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => require(body, field, msg, rule).map(Some),
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

// 数字字符串按整数优先解析，保持 "355" → 355
fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n.into());
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n.into());
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

fn number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn non_negative_number(value: &Value) -> Option<Number> {
    number(value).filter(|n| n.as_f64().is_some_and(|f| f >= 0.0))
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
}

fn non_negative_integer(value: &Value) -> Option<u64> {
    integer(value).and_then(|n| u64::try_from(n).ok())
}

fn product_type(value: &Value) -> Option<ProductType> {
    value.as_str().and_then(ProductType::parse)
}

fn package_type(value: &Value) -> Option<PackageType> {
    value.as_str().and_then(PackageType::parse)
}

fn taste_profile(value: &Value) -> Option<TasteProfile> {
    value
        .is_object()
        .then(|| serde_json::from_value(value.clone()).ok())
        .flatten()
}

/// 校验新增产品请求
pub fn validate_new_product(body: &Value) -> Result<NewProduct, ValidationErrors> {
    let name = require(body, "name", "Name is required", non_empty_text);
    let product_type = require(body, "type", "Invalid product type", product_type);
    let description = require(body, "description", "Description is required", non_empty_text);
    let abv = require(body, "abv", "ABV must be a positive number", non_negative_number);
    let volume = require(body, "volume", "Volume must be a positive number", non_negative_number);
    let package = require(body, "package", "Invalid package type", package_type);
    let price = require(body, "price", "Price must be a positive number", non_negative_number);
    let cost = require(body, "cost", "Cost must be a positive number", non_negative_number);
    let stock_quantity = require(
        body,
        "stockQuantity",
        "Stock quantity must be a non-negative integer",
        non_negative_integer,
    );
    let reorder_point = require(
        body,
        "reorderPoint",
        "Reorder point must be a non-negative integer",
        non_negative_integer,
    );
    let taste_profile = optional(body, "tasteProfile", "Invalid taste profile", taste_profile);
    let is_active = body.get("isActive").and_then(Value::as_bool);

    match (
        name,
        product_type,
        description,
        abv,
        volume,
        package,
        price,
        cost,
        stock_quantity,
        reorder_point,
        taste_profile,
    ) {
        (
            Ok(name),
            Ok(product_type),
            Ok(description),
            Ok(abv),
            Ok(volume),
            Ok(package),
            Ok(price),
            Ok(cost),
            Ok(stock_quantity),
            Ok(reorder_point),
            Ok(taste_profile),
        ) => Ok(NewProduct {
            name,
            product_type,
            description,
            abv,
            volume,
            package,
            price,
            cost,
            stock_quantity,
            reorder_point,
            is_active,
            taste_profile,
        }),
        (
            name,
            product_type,
            description,
            abv,
            volume,
            package,
            price,
            cost,
            stock_quantity,
            reorder_point,
            taste_profile,
        ) => Err(ValidationErrors::collect([
            name.err(),
            product_type.err(),
            description.err(),
            abv.err(),
            volume.err(),
            package.err(),
            price.err(),
            cost.err(),
            stock_quantity.err(),
            reorder_point.err(),
            taste_profile.err(),
        ])),
    }
}

/// 校验库存调整请求，数量可正可负
pub fn validate_stock_adjustment(body: &Value) -> Result<StockAdjustment, ValidationErrors> {
    require(body, "quantity", "Quantity must be an integer", integer)
        .map(|quantity| StockAdjustment { quantity })
        .map_err(|violation| ValidationErrors {
            errors: vec![violation],
        })
}

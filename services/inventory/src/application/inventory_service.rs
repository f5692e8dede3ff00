//! 库存用例
//!
//! 校验 → 下游调用；库存调整在低库存时追加一次通知调用。

use std::sync::Arc;

use metrics::counter;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    CallContext, DownstreamError, InventoryGateway, LowStockNotifier, StockLevel,
    ValidationErrors, validate_new_product, validate_stock_adjustment,
};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Downstream(#[from] DownstreamError),
}

/// 通知失败时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPolicy {
    /// 记录日志，库存更新仍视为成功
    #[default]
    BestEffort,
    /// 通知失败即视为库存更新失败
    Required,
}

impl NotificationPolicy {
    pub fn from_fail_on_error(fail_on_error: bool) -> Self {
        if fail_on_error {
            Self::Required
        } else {
            Self::BestEffort
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowStockNotification {
    NotRequired,
    Sent,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockUpdate {
    pub product: Value,
    pub notification: LowStockNotification,
}

pub struct InventoryService {
    gateway: Arc<dyn InventoryGateway>,
    notifier: Arc<dyn LowStockNotifier>,
    policy: NotificationPolicy,
}

impl InventoryService {
    pub fn new(
        gateway: Arc<dyn InventoryGateway>,
        notifier: Arc<dyn LowStockNotifier>,
        policy: NotificationPolicy,
    ) -> Self {
        Self {
            gateway,
            notifier,
            policy,
        }
    }

    pub async fn add_product(
        &self,
        body: &Value,
        ctx: &CallContext,
    ) -> Result<Value, InventoryError> {
        let product = validate_new_product(body)?;
        let created = self.gateway.create_product(&product, ctx).await?;
        info!(name = %product.name, "Product added");
        Ok(created)
    }

    pub async fn get_product(&self, id: &str, ctx: &CallContext) -> Result<Value, InventoryError> {
        Ok(self.gateway.get_product(id, ctx).await?)
    }

    pub async fn update_product(
        &self,
        id: &str,
        changes: &Value,
        ctx: &CallContext,
    ) -> Result<Value, InventoryError> {
        Ok(self.gateway.update_product(id, changes, ctx).await?)
    }

    pub async fn delete_product(&self, id: &str, ctx: &CallContext) -> Result<(), InventoryError> {
        self.gateway.delete_product(id, ctx).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    pub async fn list_products(&self, ctx: &CallContext) -> Result<Value, InventoryError> {
        Ok(self.gateway.list_products(ctx).await?)
    }

    pub async fn low_stock_products(&self, ctx: &CallContext) -> Result<Value, InventoryError> {
        Ok(self.gateway.list_low_stock(ctx).await?)
    }

    /// 调整库存；更新后库存不高于补货点时通知补货
    pub async fn update_stock(
        &self,
        id: &str,
        body: &Value,
        ctx: &CallContext,
    ) -> Result<StockUpdate, InventoryError> {
        let adjustment = validate_stock_adjustment(body)?;
        let product = self.gateway.update_stock(id, &adjustment, ctx).await?;

        let level = StockLevel::from_product(&product);
        let notification = if level.is_low() {
            self.notify_low_stock(id, level).await?
        } else {
            LowStockNotification::NotRequired
        };

        info!(
            product_id = %id,
            quantity = adjustment.quantity,
            notification = ?notification,
            "Stock updated"
        );
        Ok(StockUpdate {
            product,
            notification,
        })
    }

    async fn notify_low_stock(
        &self,
        id: &str,
        level: StockLevel,
    ) -> Result<LowStockNotification, InventoryError> {
        match self.notifier.notify_low_stock(id).await {
            Ok(()) => {
                counter!("inventory_low_stock_notifications_total", "outcome" => "sent")
                    .increment(1);
                info!(
                    product_id = %id,
                    stock_quantity = ?level.stock_quantity,
                    reorder_point = ?level.reorder_point,
                    "Low-stock notification sent"
                );
                Ok(LowStockNotification::Sent)
            }
            Err(e) => {
                counter!("inventory_low_stock_notifications_total", "outcome" => "failed")
                    .increment(1);
                match self.policy {
                    NotificationPolicy::Required => Err(e.into()),
                    NotificationPolicy::BestEffort => {
                        warn!(product_id = %id, error = %e, "Low-stock notification failed");
                        Ok(LowStockNotification::Failed)
                    }
                }
            }
        }
    }
}

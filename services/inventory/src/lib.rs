//! inventory-service - 库存服务
//!
//! Brewery API 之上的库存 CRUD 门面，库存调整后按补货点触发低库存通知。

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shutdown;

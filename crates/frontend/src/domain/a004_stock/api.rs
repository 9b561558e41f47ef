use async_trait::async_trait;
use contracts::domain::a002_product::aggregate::Product;
use contracts::domain::a004_stock::aggregate::{StockAlert, StockLevel};
use contracts::domain::common::RowId;
use serde_json::Value;

use crate::domain::a002_product::api::fetch_products;
use crate::shared::http::{ApiClient, ApiError};

const BASE: &str = "/v1/stock";

pub async fn fetch_levels() -> Result<Vec<StockLevel>, ApiError> {
    ApiClient::new().get_json(BASE).await
}

/// Stock of one product; the document shape is not interpreted
pub async fn fetch_product_stock(product_id: RowId) -> Result<Value, ApiError> {
    ApiClient::new()
        .get_json(&format!("{}/produit/{}", BASE, product_id))
        .await
}

pub async fn fetch_alerts() -> Result<Vec<StockAlert>, ApiError> {
    ApiClient::new().get_json(&format!("{}/alertes", BASE)).await
}

/// Valuation is served as plain text
pub async fn fetch_valuation() -> Result<String, ApiError> {
    ApiClient::new()
        .get_text(&format!("{}/valorisation", BASE))
        .await
}

/// Read-only stock endpoints, plus the product list used by the lookup
#[async_trait(?Send)]
pub trait StockApi {
    async fn levels(&self) -> Result<Vec<StockLevel>, ApiError>;
    async fn product_stock(&self, product_id: RowId) -> Result<Value, ApiError>;
    async fn alerts(&self) -> Result<Vec<StockAlert>, ApiError>;
    async fn valuation(&self) -> Result<String, ApiError>;
    async fn products(&self) -> Result<Vec<Product>, ApiError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StockEndpoints;

#[async_trait(?Send)]
impl StockApi for StockEndpoints {
    async fn levels(&self) -> Result<Vec<StockLevel>, ApiError> {
        fetch_levels().await
    }

    async fn product_stock(&self, product_id: RowId) -> Result<Value, ApiError> {
        fetch_product_stock(product_id).await
    }

    async fn alerts(&self) -> Result<Vec<StockAlert>, ApiError> {
        fetch_alerts().await
    }

    async fn valuation(&self) -> Result<String, ApiError> {
        fetch_valuation().await
    }

    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        fetch_products().await
    }
}

use async_trait::async_trait;
use contracts::domain::a002_product::aggregate::{Product, ProductDto};
use contracts::domain::common::RowId;

use crate::shared::crud::{DeleteResource, FormMode, ListResource, SubmitResource};
use crate::shared::http::{ApiClient, ApiError};

const BASE: &str = "/produits";

pub async fn fetch_products() -> Result<Vec<Product>, ApiError> {
    ApiClient::new().get_json(BASE).await
}

pub async fn create_product(dto: &ProductDto) -> Result<(), ApiError> {
    ApiClient::new().post(BASE, dto).await
}

pub async fn update_product(id: RowId, dto: &ProductDto) -> Result<(), ApiError> {
    ApiClient::new().put(&format!("{}/{}", BASE, id), dto).await
}

pub async fn delete_product(id: RowId) -> Result<(), ApiError> {
    ApiClient::new().delete(&format!("{}/{}", BASE, id)).await
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductResource;

#[async_trait(?Send)]
impl ListResource for ProductResource {
    type Row = Product;

    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        fetch_products().await
    }
}

#[async_trait(?Send)]
impl SubmitResource<ProductDto> for ProductResource {
    async fn submit(&self, mode: FormMode, form: &ProductDto) -> Result<(), ApiError> {
        match mode {
            FormMode::Create => create_product(form).await,
            FormMode::Edit(id) => update_product(id, form).await,
        }
    }
}

#[async_trait(?Send)]
impl DeleteResource for ProductResource {
    async fn delete(&self, id: RowId) -> Result<(), ApiError> {
        delete_product(id).await
    }
}

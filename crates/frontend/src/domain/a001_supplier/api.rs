use async_trait::async_trait;
use contracts::domain::a001_supplier::aggregate::{Supplier, SupplierDto};
use contracts::domain::common::RowId;

use crate::shared::crud::{DeleteResource, FormMode, ListResource, SubmitResource};
use crate::shared::http::{ApiClient, ApiError};

const BASE: &str = "/v1/fournisseurs";

pub async fn fetch_suppliers() -> Result<Vec<Supplier>, ApiError> {
    ApiClient::new().get_json(BASE).await
}

pub async fn create_supplier(dto: &SupplierDto) -> Result<(), ApiError> {
    ApiClient::new().post(BASE, dto).await
}

pub async fn update_supplier(id: RowId, dto: &SupplierDto) -> Result<(), ApiError> {
    ApiClient::new().put(&format!("{}/{}", BASE, id), dto).await
}

pub async fn delete_supplier(id: RowId) -> Result<(), ApiError> {
    ApiClient::new().delete(&format!("{}/{}", BASE, id)).await
}

/// `/v1/fournisseurs` as seen by the CRUD controller
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplierResource;

#[async_trait(?Send)]
impl ListResource for SupplierResource {
    type Row = Supplier;

    async fn list(&self) -> Result<Vec<Supplier>, ApiError> {
        fetch_suppliers().await
    }
}

#[async_trait(?Send)]
impl SubmitResource<SupplierDto> for SupplierResource {
    async fn submit(&self, mode: FormMode, form: &SupplierDto) -> Result<(), ApiError> {
        match mode {
            FormMode::Create => create_supplier(form).await,
            FormMode::Edit(id) => update_supplier(id, form).await,
        }
    }
}

#[async_trait(?Send)]
impl DeleteResource for SupplierResource {
    async fn delete(&self, id: RowId) -> Result<(), ApiError> {
        delete_supplier(id).await
    }
}

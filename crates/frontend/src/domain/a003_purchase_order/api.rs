use async_trait::async_trait;
use contracts::domain::a003_purchase_order::aggregate::{PurchaseOrder, PurchaseOrderDto, ReceptionRequest};
use contracts::domain::common::RowId;

use crate::shared::crud::{DeleteResource, FormMode, ListResource, SubmitResource};
use crate::shared::http::{ApiClient, ApiError};

const BASE: &str = "/v1/commandes";

pub async fn fetch_orders() -> Result<Vec<PurchaseOrder>, ApiError> {
    ApiClient::new().get_json(BASE).await
}

pub async fn create_order(dto: &PurchaseOrderDto) -> Result<(), ApiError> {
    ApiClient::new().post(BASE, dto).await
}

pub async fn update_order(id: RowId, dto: &PurchaseOrderDto) -> Result<(), ApiError> {
    ApiClient::new().put(&format!("{}/{}", BASE, id), dto).await
}

pub async fn delete_order(id: RowId) -> Result<(), ApiError> {
    ApiClient::new().delete(&format!("{}/{}", BASE, id)).await
}

pub async fn receive_order(id: RowId, body: &ReceptionRequest) -> Result<(), ApiError> {
    ApiClient::new()
        .put(&format!("{}/{}/reception", BASE, id), body)
        .await
}

pub async fn validate_order(id: RowId) -> Result<(), ApiError> {
    ApiClient::new()
        .put_empty(&format!("{}/{}/valider", BASE, id))
        .await
}

pub async fn cancel_order(id: RowId) -> Result<(), ApiError> {
    ApiClient::new()
        .put_empty(&format!("{}/{}/annuler", BASE, id))
        .await
}

/// Status endpoints of a persisted order; legality is checked by the backend
#[async_trait(?Send)]
pub trait OrderTransitions {
    async fn receive(&self, id: RowId, body: &ReceptionRequest) -> Result<(), ApiError>;
    async fn validate(&self, id: RowId) -> Result<(), ApiError>;
    async fn cancel(&self, id: RowId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderResource;

#[async_trait(?Send)]
impl ListResource for OrderResource {
    type Row = PurchaseOrder;

    async fn list(&self) -> Result<Vec<PurchaseOrder>, ApiError> {
        fetch_orders().await
    }
}

#[async_trait(?Send)]
impl SubmitResource<PurchaseOrderDto> for OrderResource {
    /// Line subtotals are filled in here, right before sending
    async fn submit(&self, mode: FormMode, form: &PurchaseOrderDto) -> Result<(), ApiError> {
        let payload = form.with_subtotals();
        match mode {
            FormMode::Create => create_order(&payload).await,
            FormMode::Edit(id) => update_order(id, &payload).await,
        }
    }
}

#[async_trait(?Send)]
impl DeleteResource for OrderResource {
    async fn delete(&self, id: RowId) -> Result<(), ApiError> {
        delete_order(id).await
    }
}

#[async_trait(?Send)]
impl OrderTransitions for OrderResource {
    async fn receive(&self, id: RowId, body: &ReceptionRequest) -> Result<(), ApiError> {
        receive_order(id, body).await
    }

    async fn validate(&self, id: RowId) -> Result<(), ApiError> {
        validate_order(id).await
    }

    async fn cancel(&self, id: RowId) -> Result<(), ApiError> {
        cancel_order(id).await
    }
}

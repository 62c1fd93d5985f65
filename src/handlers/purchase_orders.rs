use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::{
    db::purchase_order_store::PurchaseOrderStore,
    error::Result,
    extract::{ApiJson, ApiPath, ApiQuery},
    models::purchase_order::{ListQuery, PageRequest, Pagination, PurchaseOrderPayload},
    response::ApiResponse,
};

/// # GET /api/purchase-orders
pub async fn list_purchase_orders(
    State(store): State<PurchaseOrderStore>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<impl IntoResponse> {
    let request = PageRequest::from(query);
    let (orders, total) = store.list(&request).await?;

    Ok(ApiResponse::ok(orders).with_pagination(Pagination::new(&request, total)))
}

/// # GET /api/purchase-orders/{id}
pub async fn get_purchase_order(
    State(store): State<PurchaseOrderStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    let order = store.get(id).await?;
    Ok(ApiResponse::ok(order))
}

/// # POST /api/purchase-orders
pub async fn create_purchase_order(
    State(store): State<PurchaseOrderStore>,
    ApiJson(payload): ApiJson<PurchaseOrderPayload>,
) -> Result<impl IntoResponse> {
    let fields = payload.validate()?;
    let order = store.create(&fields).await?;

    tracing::info!(id = %order.id, order_number = %order.order_number, "purchase order created");
    Ok((StatusCode::CREATED, ApiResponse::ok(order)))
}

/// # PUT /api/purchase-orders/{id}
pub async fn update_purchase_order(
    State(store): State<PurchaseOrderStore>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PurchaseOrderPayload>,
) -> Result<impl IntoResponse> {
    let fields = payload.validate()?;
    let order = store.update(id, &fields).await?;

    tracing::info!(%id, "purchase order updated");
    Ok(ApiResponse::ok(order))
}

/// # DELETE /api/purchase-orders/{id}
pub async fn delete_purchase_order(
    State(store): State<PurchaseOrderStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    store.delete(id).await?;

    tracing::info!(%id, "purchase order deleted");
    Ok(ApiResponse::message("Purchase order deleted successfully"))
}

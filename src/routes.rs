use std::sync::Arc;

use axum::{extract::{Path, State}, http::StatusCode, routing::{get, post, put}, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{dtos::{ApiError, CartResponse, Response, UpdateProductAmountRequest}, notifications::CartNotice, state::AppState};

pub fn cart_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/cart", get(get_cart))
        .route("/cart/products/{id}", post(add_product).delete(remove_product))
        .route("/cart/products/{id}/amount", put(update_product_amount))
        .with_state(state)
}

pub async fn healthz() -> &'static str {
    "OK"
}

pub async fn get_cart(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    reply(StatusCode::OK, cart_response(&state))
}

pub async fn add_product(Path(id): Path<u64>, State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let result = state.cart_store.add_product(id).await;
    respond(&state, result)
}

pub async fn remove_product(Path(id): Path<u64>, State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let result = state.cart_store.remove_product(id);
    respond(&state, result)
}

pub async fn update_product_amount(Path(id): Path<u64>, State(state): State<Arc<AppState>>, Json(request): Json<UpdateProductAmountRequest>) -> (StatusCode, Json<Value>) {
    let result = state.cart_store.update_product_amount(id, request.amount).await;
    respond(&state, result)
}

fn cart_response(state: &AppState) -> CartResponse {
    CartResponse {
        products: state.cart_store.cart().as_ref().clone()
    }
}

fn respond(state: &AppState, result: Result<(), CartNotice>) -> (StatusCode, Json<Value>) {
    match result {
        Ok(()) => reply(StatusCode::OK, cart_response(state)),
        Err(notice) => reply(StatusCode::UNPROCESSABLE_ENTITY, ApiError{error: notice.message().to_string()})
    }
}

fn reply<R: Response + Serialize>(status: StatusCode, response: R) -> (StatusCode, Json<Value>) {
    (status, Json(json!(response)))
}

use serde::{Deserialize, Serialize};

use crate::domain::LineItem;

pub trait Response{}

#[derive(Serialize, Deserialize)]
pub struct CartResponse {
    pub products: Vec<LineItem>,
}
impl Response for CartResponse{}

#[derive(Serialize, Deserialize)]
pub struct UpdateProductAmountRequest {
    pub amount: i64,
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String
}
impl Response for ApiError{}

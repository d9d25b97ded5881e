pub mod api;
pub mod cors;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    error::ApiError,
    error::Result as ApiResult,
    records::{
        records::{list_records, send_record},
        send_request::SendRequest,
    },
};

pub use crate::routes::build_router;

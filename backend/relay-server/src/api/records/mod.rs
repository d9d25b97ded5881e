#[allow(clippy::module_inception)]
pub mod records;
pub mod send_request;

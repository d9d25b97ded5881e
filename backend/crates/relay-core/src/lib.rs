pub mod error;
pub mod record;

pub use error::{CoreError, Result};
pub use record::{Record, TIMESTAMP_FORMAT};

pub use error_location::ErrorLocation;

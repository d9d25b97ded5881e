use serde::Deserialize;

/// Body of `POST /api/send`
#[derive(Debug, Clone, Deserialize)]
pub struct SendRequest {
    /// Missing is treated like blank and rejected by validation
    #[serde(default)]
    pub digits: String,
}

use crate::error::PrintError;
use crate::models::PrintReceipt;
use serde::{Deserialize, Serialize};

/// Body of every `/print` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl PrintResponse {
    pub fn success(receipt: PrintReceipt) -> Self {
        Self {
            success: true,
            job_id: receipt.job_id,
            exception: None,
            kind: None,
        }
    }

    pub fn failure(error: &PrintError) -> Self {
        Self {
            success: false,
            job_id: None,
            exception: Some(error.to_string()),
            kind: Some(error.kind().to_string()),
        }
    }
}

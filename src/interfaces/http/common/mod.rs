//! Response envelope and shared extractors

pub mod error;
pub mod validated_json;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::PaginatedResult;

pub use error::ApiError;
pub use validated_json::ValidatedJson;

/// Standard response envelope.
///
/// Success: `{"success": true, "data": {...}}`.
/// Failure: `{"success": false, "error": "...", "code": "DUPLICATE_BOOKING"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload, `null` on most failures
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable machine-readable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: None,
        }
    }

    pub fn error_with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::error(message)
        }
    }

    /// Failure that still carries a payload the client needs to act on.
    pub fn failure(data: T, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(message.into()),
            code: Some(code.into()),
        }
    }
}

/// Pagination query parameters
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct PaginationParams {
    /// Page number, starting at 1 (default 1)
    pub page: Option<u32>,
    /// Items per page, 1-100 (default 20)
    pub limit: Option<u32>,
}

/// One page of a listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T, U> From<PaginatedResult<U>> for PaginatedResponse<T>
where
    T: From<U>,
{
    fn from(result: PaginatedResult<U>) -> Self {
        Self {
            items: result.items.into_iter().map(T::from).collect(),
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_error_fields() {
        let json = serde_json::to_value(ApiResponse::success(7)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 7}));
    }

    #[test]
    fn error_envelope_carries_code() {
        let json =
            serde_json::to_value(ApiResponse::<()>::error_with_code("DUPLICATE_BOOKING", "taken"))
                .unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["data"], serde_json::Value::Null);
        assert_eq!(json["code"], "DUPLICATE_BOOKING");
        assert_eq!(json["error"], "taken");
    }

    #[test]
    fn paginated_response_maps_items() {
        let page = PaginatedResult::new(vec![1u8, 2], 5, 1, 2);
        let resp: PaginatedResponse<u32> = page.into();
        assert_eq!(resp.items, vec![1u32, 2]);
        assert_eq!(resp.total_pages, 3);
    }
}

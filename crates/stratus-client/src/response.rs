//! Per-call options and response envelopes.

use uuid::Uuid;

pub const OPC_REQUEST_ID: &str = "opc-request-id";
pub const OPC_WORK_REQUEST_ID: &str = "opc-work-request-id";
pub const OPC_NEXT_PAGE: &str = "opc-next-page";
pub const OPC_RETRY_TOKEN: &str = "opc-retry-token";
pub const IF_MATCH: &str = "if-match";
pub const ETAG: &str = "etag";

/// Headers the SDK acts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub status: u16,
    pub opc_request_id: Option<String>,
    pub opc_work_request_id: Option<String>,
    pub opc_next_page: Option<String>,
    pub etag: Option<String>,
}

/// A decoded body with its response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub headers: ResponseHeaders,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, headers: ResponseHeaders) -> Self {
        Self { data, headers }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            headers: self.headers,
        }
    }
}

/// Optional request headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub opc_request_id: Option<String>,
    /// Only apply the change if the resource's etag still matches.
    pub if_match: Option<String>,
    pub opc_retry_token: Option<String>,
}

impl RequestOptions {
    pub fn with_if_match(mut self, etag: impl Into<String>) -> Self {
        self.if_match = Some(etag.into());
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.opc_request_id = Some(id.into());
        self
    }

    pub fn with_retry_token(mut self, token: impl Into<String>) -> Self {
        self.opc_retry_token = Some(token.into());
        self
    }

    /// The caller's retry token, or a fresh one.
    pub fn retry_token_or_new(&self) -> String {
        self.opc_retry_token
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_token() {
        let fixed = RequestOptions::default().with_retry_token("token-1");
        assert_eq!(fixed.retry_token_or_new(), "token-1");

        let generated = RequestOptions::default();
        let a = generated.retry_token_or_new();
        let b = generated.retry_token_or_new();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_map_keeps_headers() {
        let headers = ResponseHeaders {
            status: 202,
            opc_work_request_id: Some("wr1".into()),
            ..Default::default()
        };
        let response = ApiResponse::new(2, headers.clone()).map(|n| n * 10);
        assert_eq!(response.data, 20);
        assert_eq!(response.headers, headers);
    }
}

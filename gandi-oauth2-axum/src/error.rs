use gandi_oauth2::StrategyError;
use http::StatusCode;

/// Helper trait for converting errors to a standard response error format
pub(super) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Implementation for StrategyError to map variants to appropriate status codes
impl<T> IntoResponseError<T> for Result<T, StrategyError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                StrategyError::MissingSession => StatusCode::BAD_REQUEST,
                StrategyError::TokenExchange(_)
                | StrategyError::TokenRefresh(_)
                | StrategyError::FetchTokenInfo(_)
                | StrategyError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
                StrategyError::Config(_) | StrategyError::Session(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, e.to_string())
        })
    }
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("channel {0} could not be resolved to a channel id")]
    Resolution(String),
    #[error("request failed: {0}")]
    Fetch(String),
    #[error("API returned error code {0}: {1}")]
    ErrorResponse(i64, String),
    #[error("response missing expected field '{0}'")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // 请求地址中带有 api key，不能出现在日志里
        ApiError::Fetch(err.without_url().to_string())
    }
}

/// エラー分類とリトライ判定ユーティリティ。
use anyhow::Error;
use reqwest::StatusCode;

/// エラーの種類。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    /// リトライ可能なエラー（一時的なネットワークエラー、タイムアウトなど）
    Retryable,
    /// リトライ不可能なエラー（バリデーションエラーなど）
    NonRetryable,
    /// 致命的なエラー（認証・認可エラーなど）
    Fatal,
}

/// エラーを分類する。
#[must_use]
pub(crate) fn classify_error(error: &Error) -> ErrorKind {
    // HTTPエラーの判定
    if let Some(reqwest_err) = error.downcast_ref::<reqwest::Error>() {
        if reqwest_err.is_timeout() || reqwest_err.is_connect() {
            return ErrorKind::Retryable;
        }

        if let Some(status) = reqwest_err.status() {
            match status {
                // 429と5xxエラーはリトライ可能
                StatusCode::TOO_MANY_REQUESTS
                | StatusCode::INTERNAL_SERVER_ERROR
                | StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT => return ErrorKind::Retryable,
                // 4xxエラー（認証・認可以外）はリトライ不可能
                StatusCode::BAD_REQUEST
                | StatusCode::NOT_FOUND
                | StatusCode::UNPROCESSABLE_ENTITY => return ErrorKind::NonRetryable,
                // 認証・認可エラーは致命的
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return ErrorKind::Fatal,
                _ => {}
            }
        }
    }

    // デフォルトはリトライ不可能
    ErrorKind::NonRetryable
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn plain_error_is_non_retryable() {
        let error = anyhow!("validation failed");
        assert_eq!(classify_error(&error), ErrorKind::NonRetryable);
    }

    #[test]
    fn context_wrapped_plain_error_is_non_retryable() {
        let error = anyhow!("boom").context("request failed");
        assert_eq!(classify_error(&error), ErrorKind::NonRetryable);
    }
}

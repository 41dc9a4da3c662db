//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum. On the client side a kind is either
//! derived from a backend HTTP status or describes a failure that never
//! reached the backend (`Network`).

use serde::Serialize;

/// エラー種別の列挙体
///
/// バックエンドの HTTP ステータス、またはクライアント側で発生した
/// 通信エラーを分類します。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::from_status(404);
/// assert_eq!(kind, ErrorKind::NotFound);
/// assert_eq!(kind.status_code(), Some(404));
/// assert_eq!(ErrorKind::Network.status_code(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Bad Request: 入力が不正
    BadRequest,
    /// 401 - Unauthorized: 認証が必要
    Unauthorized,
    /// 403 - Forbidden: 権限不足
    Forbidden,
    /// 404 - Not Found: リソースが見つからない
    NotFound,
    /// 408 - Request Timeout: タイムアウト
    RequestTimeout,
    /// 409 - Conflict: 現在の状態と競合
    Conflict,
    /// 422 - Unprocessable Entity: 処理不可能
    UnprocessableEntity,
    /// 500 - Internal Server Error: 内部エラー
    InternalServerError,
    /// 503 - Service Unavailable: サービス利用不可
    ServiceUnavailable,
    /// ステータスなし: 接続失敗・DNS 失敗など通信レベルのエラー
    Network,
}

impl ErrorKind {
    /// HTTP ステータスコードを取得
    ///
    /// ## Returns
    /// 対応するステータスコード。`Network` は応答が無いため `None`
    #[inline]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            ErrorKind::BadRequest => Some(400),
            ErrorKind::Unauthorized => Some(401),
            ErrorKind::Forbidden => Some(403),
            ErrorKind::NotFound => Some(404),
            ErrorKind::RequestTimeout => Some(408),
            ErrorKind::Conflict => Some(409),
            ErrorKind::UnprocessableEntity => Some(422),
            ErrorKind::InternalServerError => Some(500),
            ErrorKind::ServiceUnavailable => Some(503),
            ErrorKind::Network => None,
        }
    }

    /// バックエンドの HTTP ステータスから種別を決定
    ///
    /// 個別に対応しない 4xx は `BadRequest`、5xx は `InternalServerError`
    /// に丸めます。
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
    /// assert_eq!(ErrorKind::from_status(418), ErrorKind::BadRequest);
    /// assert_eq!(ErrorKind::from_status(502), ErrorKind::InternalServerError);
    /// ```
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::RequestTimeout,
            409 => ErrorKind::Conflict,
            422 => ErrorKind::UnprocessableEntity,
            503 => ErrorKind::ServiceUnavailable,
            400..=499 => ErrorKind::BadRequest,
            _ => ErrorKind::InternalServerError,
        }
    }

    /// ユーザー向けの文字列表現を取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::RequestTimeout => "Request Timeout",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::UnprocessableEntity => "Unprocessable Entity",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
            ErrorKind::Network => "Network Error",
        }
    }

    /// 時間をおいて再試行すれば成功し得るエラーかどうか
    ///
    /// 通信エラー・タイムアウト・5xx が該当します。UI 境界では
    /// 「しばらくしてから再度お試しください」の汎用メッセージに置き換えます。
    #[inline]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorKind::Network
                | ErrorKind::RequestTimeout
                | ErrorKind::InternalServerError
                | ErrorKind::ServiceUnavailable
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::BadRequest.status_code(), Some(400));
        assert_eq!(ErrorKind::Unauthorized.status_code(), Some(401));
        assert_eq!(ErrorKind::Forbidden.status_code(), Some(403));
        assert_eq!(ErrorKind::NotFound.status_code(), Some(404));
        assert_eq!(ErrorKind::RequestTimeout.status_code(), Some(408));
        assert_eq!(ErrorKind::Conflict.status_code(), Some(409));
        assert_eq!(ErrorKind::UnprocessableEntity.status_code(), Some(422));
        assert_eq!(ErrorKind::InternalServerError.status_code(), Some(500));
        assert_eq!(ErrorKind::ServiceUnavailable.status_code(), Some(503));
        assert_eq!(ErrorKind::Network.status_code(), None);
    }

    #[test]
    fn test_from_status() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::BadRequest);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::BadRequest);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::InternalServerError);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn test_is_transient() {
        assert!(ErrorKind::Network.is_transient());
        assert!(ErrorKind::RequestTimeout.is_transient());
        assert!(ErrorKind::ServiceUnavailable.is_transient());
        assert!(!ErrorKind::Unauthorized.is_transient());
        assert!(!ErrorKind::BadRequest.is_transient());
    }
}

//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that classifies failures observed by the
//! client, either from an HTTP status returned by the backend or from the
//! client itself (transport, decoding).

use serde::Serialize;

/// エラー種別の列挙体
///
/// バックエンドが返した HTTP ステータス、またはクライアント側で発生した
/// 失敗（通信エラー・デコードエラー）を分類します。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
/// * `Transport` / `Decode` は HTTP ステータスを持たない
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::from_status(404);
/// assert_eq!(kind, ErrorKind::NotFound);
/// assert_eq!(kind.status_code(), Some(404));
/// assert_eq!(ErrorKind::Transport.status_code(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Bad Request: リクエストが不正
    BadRequest,
    /// 401 - Unauthorized: 認証が必要（アクセストークン失効を含む）
    Unauthorized,
    /// 403 - Forbidden: アクセス権限なし
    Forbidden,
    /// 404 - Not Found: リソースが見つからない
    NotFound,
    /// 409 - Conflict: 現在の状態と競合
    Conflict,
    /// 422 - Unprocessable Entity: バリデーションエラー
    UnprocessableEntity,
    /// 429 - Too Many Requests: レート制限超過
    TooManyRequests,
    /// その他の 4xx
    OtherClientError,
    /// 500 - Internal Server Error: サーバー内部エラー
    InternalServerError,
    /// 503 - Service Unavailable: サービス利用不可
    ServiceUnavailable,
    /// その他の 5xx
    OtherServerError,
    /// 通信エラー（接続失敗・タイムアウトなど、ステータスなし）
    Transport,
    /// レスポンスのデコード失敗
    Decode,
    /// クライアント内部エラー（ストレージ・設定など）
    Internal,
}

impl ErrorKind {
    /// HTTP ステータスコードから種別を決定
    ///
    /// 2xx/3xx など、エラーではないステータスは `Internal` に分類されます。
    /// 呼び出し側は成功ステータスでこの関数を呼ぶべきではありません。
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
    /// assert_eq!(ErrorKind::from_status(418), ErrorKind::OtherClientError);
    /// assert_eq!(ErrorKind::from_status(502), ErrorKind::OtherServerError);
    /// ```
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            422 => ErrorKind::UnprocessableEntity,
            429 => ErrorKind::TooManyRequests,
            500 => ErrorKind::InternalServerError,
            503 => ErrorKind::ServiceUnavailable,
            402..=499 => ErrorKind::OtherClientError,
            501..=599 => ErrorKind::OtherServerError,
            _ => ErrorKind::Internal,
        }
    }

    /// 代表的な HTTP ステータスコードを取得
    ///
    /// ## Returns
    /// ステータスを持たない種別（`Transport`, `Decode`, `Internal`）と
    /// 範囲でまとめた種別（`OtherClientError`, `OtherServerError`）は `None`
    #[inline]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            ErrorKind::BadRequest => Some(400),
            ErrorKind::Unauthorized => Some(401),
            ErrorKind::Forbidden => Some(403),
            ErrorKind::NotFound => Some(404),
            ErrorKind::Conflict => Some(409),
            ErrorKind::UnprocessableEntity => Some(422),
            ErrorKind::TooManyRequests => Some(429),
            ErrorKind::InternalServerError => Some(500),
            ErrorKind::ServiceUnavailable => Some(503),
            ErrorKind::OtherClientError
            | ErrorKind::OtherServerError
            | ErrorKind::Transport
            | ErrorKind::Decode
            | ErrorKind::Internal => None,
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
            ErrorKind::Conflict => "Conflict",
            ErrorKind::UnprocessableEntity => "Unprocessable Entity",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::OtherClientError => "Client Error",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
            ErrorKind::OtherServerError => "Server Error",
            ErrorKind::Transport => "Transport Error",
            ErrorKind::Decode => "Decode Error",
            ErrorKind::Internal => "Internal Error",
        }
    }

    /// バックエンド側のエラーかどうかを判定
    ///
    /// 5xx系のエラーは `true` を返します。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::InternalServerError
                | ErrorKind::ServiceUnavailable
                | ErrorKind::OtherServerError
        )
    }

    /// リクエスト側のエラーかどうかを判定
    ///
    /// 4xx系のエラーは `true` を返します。
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::BadRequest
                | ErrorKind::Unauthorized
                | ErrorKind::Forbidden
                | ErrorKind::NotFound
                | ErrorKind::Conflict
                | ErrorKind::UnprocessableEntity
                | ErrorKind::TooManyRequests
                | ErrorKind::OtherClientError
        )
    }

    /// クライアント内部で発生したエラーかどうかを判定
    #[inline]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            ErrorKind::Transport | ErrorKind::Decode | ErrorKind::Internal
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
    fn test_from_status() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::BadRequest);
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Conflict);
        assert_eq!(ErrorKind::from_status(422), ErrorKind::UnprocessableEntity);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::TooManyRequests);
        assert_eq!(ErrorKind::from_status(410), ErrorKind::OtherClientError);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::InternalServerError);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::ServiceUnavailable);
        assert_eq!(ErrorKind::from_status(504), ErrorKind::OtherServerError);
        assert_eq!(ErrorKind::from_status(200), ErrorKind::Internal);
    }

    #[test]
    fn test_status_round_trip_for_named_kinds() {
        for code in [400u16, 401, 403, 404, 409, 422, 429, 500, 503] {
            assert_eq!(ErrorKind::from_status(code).status_code(), Some(code));
        }
        assert_eq!(ErrorKind::Transport.status_code(), None);
        assert_eq!(ErrorKind::OtherServerError.status_code(), None);
    }

    #[test]
    fn test_is_server_error() {
        assert!(!ErrorKind::BadRequest.is_server_error());
        assert!(ErrorKind::InternalServerError.is_server_error());
        assert!(ErrorKind::OtherServerError.is_server_error());
        assert!(!ErrorKind::Transport.is_server_error());
    }

    #[test]
    fn test_is_client_error() {
        assert!(ErrorKind::Unauthorized.is_client_error());
        assert!(ErrorKind::OtherClientError.is_client_error());
        assert!(!ErrorKind::InternalServerError.is_client_error());
        assert!(!ErrorKind::Decode.is_client_error());
    }

    #[test]
    fn test_is_local() {
        assert!(ErrorKind::Transport.is_local());
        assert!(ErrorKind::Decode.is_local());
        assert!(!ErrorKind::NotFound.is_local());
    }
}

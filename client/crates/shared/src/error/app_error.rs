//! Application Error - Unified error type for the client
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use serde_json::Value;

use super::kind::ErrorKind;

/// クライアント統一エラー型
///
/// クライアント全体で使用する標準エラー型です。
/// ビルダーパターンを使用してエラーを構築できます。
///
/// ## Fields
/// * `kind` - エラーの分類
/// * `status` - バックエンドが返した実際の HTTP ステータス（あれば）
/// * `message` - ユーザー向けのエラーメッセージ
/// * `payload` - バックエンドのエラーペイロード（あれば、加工せず保持）
/// * `action` - ユーザーが取るべきアクション（オプション）
/// * `source` - 元のエラー（オプション、デバッグ用）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
/// use serde_json::json;
///
/// // バックエンドのレスポンスから
/// let err = AppError::from_response(422, Some(json!({"message": "Email taken"})));
/// assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
/// assert_eq!(err.message(), "Email taken");
///
/// // クライアント側のエラー
/// let err = AppError::transport("connection refused")
///     .with_action("Check WORKPULSE_API_URL");
/// ```
pub struct AppError {
    /// エラー種別
    kind: ErrorKind,
    /// 実際の HTTP ステータス
    status: Option<u16>,
    /// ユーザー向けメッセージ
    message: Cow<'static, str>,
    /// バックエンドのエラーペイロード
    payload: Option<Value>,
    /// ユーザーが取るべきアクション
    action: Option<Cow<'static, str>>,
    /// 元のエラー（デバッグ用）
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// アプリケーション結果型エイリアス
///
/// `Result<T, AppError>` の省略形です。
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// 新しいエラーを作成
    ///
    /// `kind` が代表ステータスを持つ場合は `status` にも設定されます。
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            status: kind.status_code(),
            message: message.into(),
            action: None,
            payload: None,
            source: None,
        }
    }

    /// バックエンドの非 2xx レスポンスからエラーを作成
    ///
    /// メッセージはペイロードの `message` → `error` → `errors` の順で探し、
    /// 見つからなければステータスの理由フレーズを使います。
    /// ペイロードはそのまま保持されます。
    pub fn from_response(status: u16, payload: Option<Value>) -> Self {
        let kind = ErrorKind::from_status(status);
        let message = payload
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| kind.as_str().to_string());

        Self {
            kind,
            status: Some(status),
            message: Cow::Owned(message),
            action: None,
            payload,
            source: None,
        }
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// 400 Bad Request エラー
    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// 401 Unauthorized エラー
    #[inline]
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// 403 Forbidden エラー
    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// 404 Not Found エラー
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// 通信エラー
    #[inline]
    pub fn transport(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// デコードエラー
    #[inline]
    pub fn decode(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    /// クライアント内部エラー
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// ユーザー向けアクションを設定
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// バックエンドのペイロードを設定
    #[inline]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// 元のエラーを設定（デバッグ用）
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// エラー種別を取得
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP ステータスを取得（ステータスを持たないエラーは `None`）
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// メッセージを取得
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// バックエンドのペイロードを取得
    #[inline]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// アクションを取得
    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// 401 かどうか
    #[inline]
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    /// サーバーエラーかどうか
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// クライアントエラーかどうか
    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }
}

/// ペイロードからメッセージを抽出
fn extract_message(payload: &Value) -> Option<String> {
    match payload {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => ["message", "error", "errors"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Array(items) => {
                    let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                    (!parts.is_empty()).then(|| parts.join(", "))
                }
                _ => None,
            }),
        _ => None,
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("status", &self.status);
        builder.field("message", &self.message);
        if let Some(payload) = &self.payload {
            builder.field("payload", payload);
        }
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{} {}] {}", status, self.kind, self.message)?,
            None => write!(f, "[{}] {}", self.kind, self.message)?,
        }
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

/// Credentials of a logged-in storage session.
///
/// Passed through to the remote client untouched; the controller never
/// inspects it.
#[derive(Clone, Default)]
pub struct AuthContext {
    /// Raw `Cookie` header value
    pub cookie: String,
    /// Anti-CSRF token required by the web API
    pub bdstoken: String,
}

impl AuthContext {
    pub fn new<C: Into<String>, T: Into<String>>(cookie: C, bdstoken: T) -> Self {
        Self {
            cookie: cookie.into(),
            bdstoken: bdstoken.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cookie.is_empty()
    }
}

// Keep credentials out of logs
impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("cookie", &"<redacted>")
            .field("bdstoken", &"<redacted>")
            .finish()
    }
}

/// Credentials sent to the platform API
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// Service account token sent as `Authorization: Bearer <token>`
    Bearer(String),
    /// Don't use any authentication
    None,
}

impl Auth {
    pub fn new(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.is_empty() => Self::Bearer(token),
            _ => Self::None,
        }
    }
}

impl std::fmt::Display for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => write!(f, "Bearer"),
            Self::None => write!(f, "None"),
        }
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Auth({})", self)
    }
}

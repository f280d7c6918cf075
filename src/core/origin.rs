//! Purpose: Decide which cross-origin callers may read responses.
//! Exports: `OriginPolicy`.
//! Role: Pure policy; the transport layer sets the actual response headers.
//! Invariants: Matching is exact string equality; no wildcards or patterns.

/// Origins allowed when no extra `--cors-origin` values are configured.
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://127.0.0.1:5500",
    "http://127.0.0.1:5500/movies",
];

#[derive(Clone, Debug)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    /// Extra origins extend the built-in allow-list.
    pub fn with_extra_origins(extra: impl IntoIterator<Item = String>) -> Self {
        let mut allowed: Vec<String> = DEFAULT_ALLOWED_ORIGINS
            .iter()
            .map(|origin| origin.to_string())
            .collect();
        allowed.extend(extra);
        Self { allowed }
    }

    /// An absent origin means a same-origin or non-browser caller and is
    /// always allowed; a present origin must match the list exactly.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.allowed.iter().any(|allowed| allowed == origin),
        }
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed
    }
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::with_extra_origins([])
    }
}

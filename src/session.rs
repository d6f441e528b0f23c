use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const USER_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

impl UserId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let id = raw.trim();
        let valid = !id.is_empty()
            && id.len() <= 64
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::bad_request(
                "user id must be 1-64 characters of letters, digits, '-' or '_'",
            ));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| AppError::unauthorized("missing x-user-id header"))?;
        let raw = header
            .to_str()
            .map_err(|_| AppError::bad_request("x-user-id header is not valid text"))?;
        UserId::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_ids() {
        assert_eq!(UserId::parse(" user_42 ").unwrap().as_str(), "user_42");
        assert_eq!(UserId::parse("a-b").unwrap(), UserId("a-b".into()));
    }

    #[test]
    fn rejects_path_like_ids() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("../etc").is_err());
        assert!(UserId::parse("a/b").is_err());
        assert!(UserId::parse(&"x".repeat(65)).is_err());
    }
}

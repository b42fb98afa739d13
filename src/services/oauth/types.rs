use serde::Deserialize;

/// Identity resolved from one introspection lookup.
///
/// Lives for a single `authenticate_request` call; never cached.
/// `0` in `user_id` / `client_id` means "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub client_id: i64,
}

/// Raw answer from the introspection service, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status <= 299
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_unknown_fields() {
        let at: AccessToken = serde_json::from_str(
            r#"{"id":"abc","user_id":42,"client_id":7,"expires":1700000000}"#,
        )
        .unwrap();

        assert_eq!(
            at,
            AccessToken {
                id: "abc".into(),
                user_id: 42,
                client_id: 7,
            }
        );
    }

    #[test]
    fn missing_fields_are_zero() {
        let at: AccessToken = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();

        assert_eq!(at.user_id, 0);
        assert_eq!(at.client_id, 0);
    }

    #[test]
    fn success_range_is_inclusive_of_299() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(299, "").is_success());
        assert!(!RawResponse::new(300, "").is_success());
        assert!(!RawResponse::new(404, "").is_success());
    }
}

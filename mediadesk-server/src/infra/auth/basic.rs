use base64::{Engine as _, engine::general_purpose::STANDARD};
use zeroize::Zeroizing;

/// Realm sent back in `WWW-Authenticate`.
pub const REALM: &str = "mediadesk";

pub fn challenge() -> String {
    format!("Basic realm=\"{REALM}\"")
}

/// Credentials from an `Authorization: Basic` header.
pub struct BasicCredentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl BasicCredentials {
    /// `None` for any other scheme or malformed payload.
    pub fn parse(header: &str) -> Option<Self> {
        let (scheme, encoded) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = Zeroizing::new(STANDARD.decode(encoded.trim()).ok()?);
        let text = std::str::from_utf8(&decoded).ok()?;
        let (username, password) = text.split_once(':')?;
        if username.is_empty() {
            return None;
        }

        Some(Self {
            username: username.to_string(),
            password: Zeroizing::new(password.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn parses_username_and_password() {
        let creds = BasicCredentials::parse(&encode("admin:s3cret:with:colons")).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password.as_str(), "s3cret:with:colons");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let header = encode("admin:pw").replacen("Basic", "basic", 1);
        assert!(BasicCredentials::parse(&header).is_some());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(BasicCredentials::parse("Bearer abc").is_none());
        assert!(BasicCredentials::parse("Basic !!!").is_none());
        assert!(BasicCredentials::parse(&encode("no-colon")).is_none());
        assert!(BasicCredentials::parse(&encode(":pw")).is_none());
    }

    #[test]
    fn debug_hides_the_password() {
        let creds = BasicCredentials::parse(&encode("admin:hunter2")).unwrap();
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}

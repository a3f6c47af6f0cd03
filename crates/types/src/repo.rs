//! Persisted repository record and the change sets written back to storage

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Repository identifier assigned by the persistence layer
pub type RepoId = Uuid;

/// A known repository as held by the external repository store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub id: RepoId,
    /// Canonical primary address
    pub address: String,
    pub name: String,
    /// Upper-case SHA-256 hex of the signing certificate, when signed
    #[serde(default)]
    pub fingerprint: Option<String>,
    /// Mirrors announced by the repository index itself
    #[serde(default, with = "comma_list")]
    pub mirrors: Vec<String>,
    /// Mirrors the user added, in insertion order
    #[serde(default, with = "comma_list")]
    pub user_mirrors: Vec<String>,
    pub inuse: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Repo {
    /// Signed repos carry a non-empty fingerprint
    #[must_use]
    pub fn signing_fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref().filter(|fp| !fp.is_empty())
    }

    /// All mirror URLs, user mirrors first.
    pub fn mirror_list(&self) -> impl Iterator<Item = &str> {
        self.user_mirrors
            .iter()
            .chain(self.mirrors.iter())
            .map(String::as_str)
    }

    /// Whether `url` is this repo's primary address or one of its mirrors
    #[must_use]
    pub fn serves_url(&self, url: &str) -> bool {
        self.address == url || self.mirror_list().any(|m| m == url)
    }
}

/// Values written when a brand-new repository is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepo {
    pub address: String,
    pub fingerprint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Partial update of an existing repository; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoUpdate {
    pub inuse: Option<bool>,
    /// `Some(None)` clears the stored fingerprint
    pub fingerprint: Option<Option<String>>,
    #[serde(default, with = "comma_list::option")]
    pub user_mirrors: Option<Vec<String>>,
}

impl RepoUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inuse.is_none() && self.fingerprint.is_none() && self.user_mirrors.is_none()
    }
}

/// Join a mirror list into its stored comma-separated form.
///
/// An empty list is stored as absent.
#[must_use]
pub fn serialize_mirror_list(mirrors: &[String]) -> Option<String> {
    if mirrors.is_empty() {
        None
    } else {
        Some(mirrors.join(","))
    }
}

/// Split a stored comma-separated mirror list
#[must_use]
pub fn parse_mirror_list(stored: Option<&str>) -> Vec<String> {
    match stored {
        Some(s) if !s.is_empty() => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

mod comma_list {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S>(mirrors: &Vec<String>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match super::serialize_mirror_list(mirrors) {
            Some(joined) => s.serialize_some(&joined),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let stored = Option::<String>::deserialize(deserializer)?;
        Ok(super::parse_mirror_list(stored.as_deref()))
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        #[allow(clippy::ref_option)]
        pub fn serialize<S>(mirrors: &Option<Vec<String>>, s: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match mirrors {
                Some(list) => s.serialize_some(&list.join(",")),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let stored = Option::<String>::deserialize(deserializer)?;
            Ok(stored.map(|s| super::super::parse_mirror_list(Some(&s))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> Repo {
        Repo {
            id: Uuid::new_v4(),
            address: "https://f-droid.org/repo".into(),
            name: "F-Droid".into(),
            fingerprint: Some("43238D512C1E5EB2D6569F4A3AFBF5523418B82E0A3ED1552770ABB9A9C9CCAB".into()),
            mirrors: vec!["https://mirror.example.org/fdroid/repo".into()],
            user_mirrors: vec!["https://local.example.org/repo".into()],
            inuse: true,
            username: None,
            password: None,
        }
    }

    #[test]
    fn test_mirror_list_puts_user_mirrors_first() {
        let r = repo();
        let all: Vec<&str> = r.mirror_list().collect();
        assert_eq!(
            all,
            vec![
                "https://local.example.org/repo",
                "https://mirror.example.org/fdroid/repo"
            ]
        );
    }

    #[test]
    fn test_serves_url() {
        let r = repo();
        assert!(r.serves_url("https://f-droid.org/repo"));
        assert!(r.serves_url("https://local.example.org/repo"));
        assert!(!r.serves_url("https://f-droid.org/archive"));
    }

    #[test]
    fn test_empty_fingerprint_is_unsigned() {
        let mut r = repo();
        r.fingerprint = Some(String::new());
        assert_eq!(r.signing_fingerprint(), None);
    }

    #[test]
    fn test_mirror_list_wire_form() {
        assert_eq!(serialize_mirror_list(&[]), None);
        assert_eq!(
            serialize_mirror_list(&["a".to_string(), "b".to_string()]).as_deref(),
            Some("a,b")
        );
        assert!(parse_mirror_list(None).is_empty());
        assert!(parse_mirror_list(Some("")).is_empty());
        assert_eq!(parse_mirror_list(Some("a,b")), vec!["a", "b"]);
    }

    #[test]
    fn test_repo_serializes_mirrors_comma_joined() {
        let mut r = repo();
        r.mirrors.clear();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["user_mirrors"], "https://local.example.org/repo");
        assert!(json["mirrors"].is_null());

        let back: Repo = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}

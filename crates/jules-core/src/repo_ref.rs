use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Rejection raised for repository references that are not `owner/name`.
#[error("repository reference '{0}' must look like owner/name")]
pub struct RepoRefError(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Globally unique `owner/name` key for a repository.
pub struct RepoRef {
    full_name: String,
}

impl RepoRef {
    pub fn parse(raw: &str) -> Result<Self, RepoRefError> {
        let trimmed = raw.trim();
        let Some((owner, name)) = trimmed.split_once('/') else {
            return Err(RepoRefError(raw.to_string()));
        };
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(RepoRefError(raw.to_string()));
        }
        Ok(Self {
            full_name: trimmed.to_string(),
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn owner(&self) -> &str {
        self.full_name.split('/').next().unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.full_name.split('/').nth(1).unwrap_or_default()
    }
}

impl TryFrom<String> for RepoRef {
    type Error = RepoRefError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<RepoRef> for String {
    fn from(repo: RepoRef) -> Self {
        repo.full_name
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::RepoRef;

    #[test]
    fn unit_parse_accepts_owner_name_and_trims_whitespace() {
        let repo = RepoRef::parse("  octo/board  ").expect("valid repo");
        assert_eq!(repo.full_name(), "octo/board");
        assert_eq!(repo.owner(), "octo");
        assert_eq!(repo.name(), "board");
    }

    #[test]
    fn regression_parse_rejects_malformed_references() {
        assert!(RepoRef::parse("no-slash").is_err());
        assert!(RepoRef::parse("/name").is_err());
        assert!(RepoRef::parse("owner/").is_err());
        assert!(RepoRef::parse("a/b/c").is_err());
    }

    #[test]
    fn functional_serde_round_trip_preserves_full_name() {
        let repo = RepoRef::parse("octo/board").expect("valid repo");
        let encoded = serde_json::to_string(&repo).expect("encode");
        assert_eq!(encoded, "\"octo/board\"");
        let decoded: RepoRef = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, repo);
    }

    #[test]
    fn regression_serde_rejects_malformed_reference() {
        assert!(serde_json::from_str::<RepoRef>("\"not-a-repo\"").is_err());
    }
}

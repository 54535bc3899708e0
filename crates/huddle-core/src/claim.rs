use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An advisory note that an identity is editing a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub file: String,
    /// RFC 3339 UTC time the claim was set.
    pub since: String,
}

/// Identity -> claim. At most one claim per identity; several identities
/// may hold the same file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimRegistry {
    entries: BTreeMap<String, Claim>,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever `identity` held with a claim on `file`.
    pub fn set(&mut self, identity: &str, file: &str, since: &str) {
        self.entries.remove(identity);
        self.entries.insert(
            identity.to_string(),
            Claim {
                file: file.to_string(),
                since: since.to_string(),
            },
        );
    }

    /// Drop the claim of `identity`. Returns the removed claim, if any.
    pub fn clear(&mut self, identity: &str) -> Option<Claim> {
        self.entries.remove(identity)
    }

    /// First identity (in identity order) holding `file`.
    pub fn check(&self, file: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, claim)| claim.file == file)
            .map(|(identity, _)| identity.as_str())
    }

    pub fn get(&self, identity: &str) -> Option<&Claim> {
        self.entries.get(identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Claim)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, Claim> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_previous_claim_of_same_identity() {
        let mut reg = ClaimRegistry::new();
        reg.set("agent1", "src/a.rs", "t1");
        reg.set("agent1", "src/b.rs", "t2");
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("agent1").unwrap().file, "src/b.rs");
        assert_eq!(reg.get("agent1").unwrap().since, "t2");
    }

    #[test]
    fn two_identities_may_claim_one_file() {
        let mut reg = ClaimRegistry::new();
        reg.set("agent2", "src/lib.rs", "t1");
        reg.set("agent1", "src/lib.rs", "t2");
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.check("src/lib.rs"), Some("agent1"));
    }

    #[test]
    fn clear_is_noop_when_absent() {
        let mut reg = ClaimRegistry::new();
        assert!(reg.clear("ghost").is_none());
        reg.set("agent1", "x", "t");
        assert!(reg.clear("agent1").is_some());
        assert!(reg.check("x").is_none());
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut reg = ClaimRegistry::new();
        reg.set("agent1", "README.md", "2026-10-17T11:00:00Z");
        let json = serde_json::to_value(&reg).unwrap();
        assert_eq!(json["agent1"]["file"], "README.md");
        assert_eq!(json["agent1"]["since"], "2026-10-17T11:00:00Z");
        let back: ClaimRegistry = serde_json::from_value(json).unwrap();
        assert_eq!(back, reg);
    }
}

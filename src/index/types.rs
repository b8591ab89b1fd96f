use serde::{Deserialize, Serialize};

/// Identifier of a club in the backing document store
pub type ClubId = String;

/// Ordinal of a key inside one [`PrefixIndex`](super::trie::PrefixIndex)
pub type KeyId = u32;

/// Arena slot of a trie node
pub type NodeId = u32;

/// A club record as delivered by the page source.
///
/// Only the fields the search engine reads are typed; everything else the
/// store sends along (description, logo, leaders, ...) is carried untouched
/// in `display`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    #[serde(rename = "_id", alias = "id")]
    pub id: ClubId,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub affiliations: Vec<String>,
    #[serde(default, rename = "school")]
    pub schools: Vec<String>,
    #[serde(default)]
    pub followers: u64,
    /// Opaque presentation fields
    #[serde(flatten)]
    pub display: serde_json::Map<String, serde_json::Value>,
}

impl Club {
    pub fn new(id: impl Into<ClubId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aliases: Vec::new(),
            categories: Vec::new(),
            affiliations: Vec::new(),
            schools: Vec::new(),
            followers: 0,
            display: serde_json::Map::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_affiliations<I, S>(mut self, affiliations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affiliations = affiliations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_schools<I, S>(mut self, schools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schools = schools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_followers(mut self, followers: u64) -> Self {
        self.followers = followers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_store_record() {
        let json = r#"{
            "_id": "65f1",
            "name": "Chess Club",
            "aliases": ["CC"],
            "school": ["COLLEGE"],
            "followers": 10,
            "description": "We play chess",
            "logo": null
        }"#;

        let club: Club = serde_json::from_str(json).unwrap();
        assert_eq!(club.id, "65f1");
        assert_eq!(club.aliases, vec!["CC"]);
        assert_eq!(club.schools, vec!["COLLEGE"]);
        assert!(club.categories.is_empty());
        assert!(club.affiliations.is_empty());
        assert_eq!(club.followers, 10);
        assert_eq!(club.display["description"], "We play chess");
    }

    #[test]
    fn test_display_fields_round_trip() {
        let json = r#"{"_id":"1","name":"A","website":"https://a.example"}"#;
        let club: Club = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&club).unwrap();
        assert_eq!(back["website"], "https://a.example");
        assert_eq!(back["_id"], "1");
    }

    #[test]
    fn test_missing_followers_defaults_to_zero() {
        let club: Club = serde_json::from_str(r#"{"id":"x","name":"X"}"#).unwrap();
        assert_eq!(club.followers, 0);
    }
}

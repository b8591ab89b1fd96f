use serde::Serialize;
use std::fmt;

/// Summary of one index snapshot
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexStats {
    pub generation: u64,
    pub clubs: usize,
    pub keys: usize,
    pub trie_nodes: usize,
    /// Keys shared by several clubs, with the names they resolve to
    pub ambiguous_keys: Vec<(String, Vec<String>)>,
    /// Names or aliases that were blank after normalization
    pub skipped_keys: usize,
}

/// Number of ambiguous keys listed before eliding the rest
const MAX_LISTED_AMBIGUOUS: usize = 15;

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Index Statistics")?;
        writeln!(f, "================")?;
        writeln!(f)?;
        writeln!(f, "Generation:       {}", self.generation)?;
        writeln!(f, "Clubs:            {}", self.clubs)?;
        writeln!(f, "Index keys:       {}", self.keys)?;
        writeln!(f, "Trie nodes:       {}", self.trie_nodes)?;
        writeln!(f, "Skipped keys:     {}", self.skipped_keys)?;

        if !self.ambiguous_keys.is_empty() {
            writeln!(f)?;
            writeln!(f, "Ambiguous keys:")?;
            for (key, names) in self.ambiguous_keys.iter().take(MAX_LISTED_AMBIGUOUS) {
                writeln!(f, "  {:15} {}", key, names.join(", "))?;
            }
            if self.ambiguous_keys.len() > MAX_LISTED_AMBIGUOUS {
                writeln!(
                    f,
                    "  ... and {} more",
                    self.ambiguous_keys.len() - MAX_LISTED_AMBIGUOUS
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_ambiguous_keys() {
        let stats = IndexStats {
            generation: 2,
            clubs: 2,
            keys: 3,
            trie_nodes: 40,
            ambiguous_keys: vec![(
                "acm".to_string(),
                vec!["Association for Computing Machinery".to_string(), "Applied Cryptography Meetup".to_string()],
            )],
            skipped_keys: 0,
        };

        let text = stats.to_string();
        assert!(text.contains("Clubs:            2"));
        assert!(text.contains("acm"));
        assert!(text.contains("Applied Cryptography Meetup"));
    }

    #[test]
    fn test_display_elides_long_lists() {
        let stats = IndexStats {
            ambiguous_keys: (0..20)
                .map(|i| (format!("k{i}"), vec!["a".to_string(), "b".to_string()]))
                .collect(),
            ..Default::default()
        };
        assert!(stats.to_string().contains("... and 5 more"));
    }
}

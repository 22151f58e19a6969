use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(CandidateId);

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub display_name: String,
    pub symbol_label: String,
    pub icon_glyph: String,
}

impl Candidate {
    pub fn new(
        id: i64,
        display_name: impl Into<String>,
        symbol_label: impl Into<String>,
        icon_glyph: impl Into<String>,
    ) -> Self {
        Self {
            id: CandidateId(id),
            display_name: display_name.into(),
            symbol_label: symbol_label.into(),
            icon_glyph: icon_glyph.into(),
        }
    }
}

/// Fixed ballot definition loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotConfig {
    pub candidates: Vec<Candidate>,
    pub required_candidate: CandidateId,
    pub vote_limit: usize,
}

impl BallotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidates.is_empty() {
            return Err(ConfigError::NoCandidates);
        }
        if self.vote_limit == 0 {
            return Err(ConfigError::ZeroVoteLimit);
        }

        let mut seen = HashSet::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            if !seen.insert(candidate.id) {
                return Err(ConfigError::DuplicateCandidate(candidate.id.0));
            }
        }

        if !seen.contains(&self.required_candidate) {
            return Err(ConfigError::UnknownRequiredCandidate(
                self.required_candidate.0,
            ));
        }

        Ok(())
    }

    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn candidate_ids(&self) -> impl Iterator<Item = CandidateId> + '_ {
        self.candidates.iter().map(|c| c.id)
    }
}

impl Default for BallotConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                Candidate::new(1, "Harbor Alliance", "Boat", "⛵"),
                Candidate::new(2, "Harvest Front", "Sheaf of Paddy", "🌾"),
                Candidate::new(3, "Plough League", "Plough", "🚜"),
                Candidate::new(4, "Lantern Party", "Lantern", "🏮"),
                Candidate::new(5, "Sunrise Forum", "Rising Sun", "🌅"),
                Candidate::new(6, "Independent Bloc", "Scales", "⚖"),
            ],
            required_candidate: CandidateId(1),
            vote_limit: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ballot_is_valid() {
        let config = BallotConfig::default();
        config.validate().expect("default ballot");
        assert!(config.candidate(config.required_candidate).is_some());
    }

    #[test]
    fn rejects_duplicate_candidate_ids() {
        let mut config = BallotConfig::default();
        config.candidates.push(Candidate::new(2, "Clone", "Copy", "?"));
        assert_eq!(config.validate(), Err(ConfigError::DuplicateCandidate(2)));
    }

    #[test]
    fn rejects_required_candidate_outside_ballot() {
        let config = BallotConfig {
            required_candidate: CandidateId(99),
            ..BallotConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownRequiredCandidate(99))
        );
    }

    #[test]
    fn rejects_zero_vote_limit_and_empty_ballot() {
        let config = BallotConfig {
            vote_limit: 0,
            ..BallotConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroVoteLimit));

        let config = BallotConfig {
            candidates: Vec::new(),
            ..BallotConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoCandidates));
    }

    #[test]
    fn candidate_ids_serialize_as_plain_integers() {
        let candidate = Candidate::new(7, "Seven", "Star", "*");
        let json = serde_json::to_value(&candidate).expect("serialize");
        assert_eq!(json["id"], serde_json::json!(7));
        assert_eq!(json["display_name"], "Seven");
    }
}

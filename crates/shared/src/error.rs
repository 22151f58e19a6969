use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("ballot must list at least one candidate")]
    NoCandidates,
    #[error("vote limit must be at least 1")]
    ZeroVoteLimit,
    #[error("candidate id {0} appears more than once")]
    DuplicateCandidate(i64),
    #[error("required candidate {0} is not on the ballot")]
    UnknownRequiredCandidate(i64),
}

use crate::utils::error::{ModelError, Result, UnionAttempt};
use serde::{Deserialize, Serialize};

/// How a union picks among candidates that all validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionPolicy {
    /// Exactly one candidate may validate.
    #[default]
    Strict,
    /// The first candidate in declared order that validates wins.
    FirstMatch,
}

/// Try `attempt` against each candidate in declared order.
///
/// Validation failures (including failures of nested unions) disqualify a
/// candidate; any other error, such as an unregistered candidate, aborts the
/// whole resolution.
pub fn resolve<T, F>(
    union_schema: &str,
    candidates: &[&'static str],
    policy: UnionPolicy,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut(&'static str) -> Result<T>,
{
    let mut attempts = Vec::with_capacity(candidates.len());
    let mut matched: Vec<(&'static str, T)> = Vec::new();

    for &candidate in candidates {
        match attempt(candidate) {
            Ok(value) => {
                tracing::trace!("Union {} matched candidate {}", union_schema, candidate);
                attempts.push(UnionAttempt {
                    candidate: candidate.to_string(),
                    failure: None,
                });
                if policy == UnionPolicy::FirstMatch {
                    return Ok(value);
                }
                matched.push((candidate, value));
            }
            Err(e @ ModelError::Validation(_)) | Err(e @ ModelError::AmbiguousOrUnmatchedUnion { .. }) => {
                tracing::trace!("Union {} rejected candidate {}: {}", union_schema, candidate, e);
                attempts.push(UnionAttempt {
                    candidate: candidate.to_string(),
                    failure: Some(e.to_string()),
                });
            }
            Err(e) => return Err(e),
        }
    }

    if matched.len() == 1 {
        if let Some((_, value)) = matched.pop() {
            return Ok(value);
        }
    }

    Err(ModelError::AmbiguousOrUnmatchedUnion {
        union_schema: union_schema.to_string(),
        matched: matched.iter().map(|(name, _)| name.to_string()).collect(),
        attempts,
    })
}

//! Identifiers for jobs, chunks and workers
//!
//! All three are opaque strings on the wire. Chunk IDs embed their job ID as a
//! prefix (`{job}-{index}`) so a chunk can always be traced back to its job.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Longest worker ID accepted at registration
pub const MAX_WORKER_ID_LEN: usize = 128;

/// Unique identifier for a job
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn generate() -> Self {
        Self(format!("job-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a chunk, always prefixed by its job ID
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(String);

impl ChunkId {
    /// Build the ID of the `index`-th chunk of `job`
    pub fn for_job(job: &JobId, index: usize) -> Self {
        Self(format!("{job}-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChunkId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChunkId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a registered worker
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn generate() -> Self {
        Self(format!("worker-{}", Uuid::new_v4().simple()))
    }

    /// Accept a client-chosen ID only if it can be used as one URL path segment
    ///
    /// Allowed: ASCII letters, digits, `-`, `_` and `.`, up to
    /// [`MAX_WORKER_ID_LEN`] characters, but not `.` or `..` alone.
    pub fn parse(input: &str) -> SharedResult<Self> {
        let valid = !input.is_empty()
            && input.len() <= MAX_WORKER_ID_LEN
            && input != "."
            && input != ".."
            && input
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
        if !valid {
            return Err(SharedError::InvalidId {
                input: input.to_string(),
            });
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WorkerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_embeds_job_and_index() {
        let job = JobId::from("job-7");
        assert_eq!(ChunkId::for_job(&job, 3).as_str(), "job-7-3");
    }

    #[test]
    fn test_worker_id_parse_accepts_path_safe_ids() {
        for input in ["worker-9", "team_a.node-1", "W7"] {
            assert_eq!(WorkerId::parse(input).unwrap().as_str(), input);
        }
        let generated = WorkerId::generate();
        assert_eq!(WorkerId::parse(generated.as_str()).unwrap(), generated);
    }

    #[test]
    fn test_worker_id_parse_rejects_unroutable_ids() {
        let too_long = "w".repeat(MAX_WORKER_ID_LEN + 1);
        let inputs: [&str; 10] = [
            "", "team/a", "a?b", "a#b", "a b", "50%", ".", "..", "wörker", &too_long,
        ];
        for input in inputs {
            assert_eq!(
                WorkerId::parse(input),
                Err(SharedError::InvalidId {
                    input: input.to_string()
                }),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(JobId::generate(), JobId::generate());
        assert_ne!(WorkerId::generate(), WorkerId::generate());
        assert!(WorkerId::generate().as_str().starts_with("worker-"));
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&WorkerId::from("w-1")).unwrap();
        assert_eq!(json, "\"w-1\"");
    }
}

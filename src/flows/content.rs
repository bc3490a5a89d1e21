//! Read-only content snapshots consumed by the compiler.
//!
//! Content authoring and validation live outside this crate; the compiler
//! only reads the fields that drive step derivation.

use serde::{Deserialize, Serialize};

/// The slice of a question document the compiler consumes: ordered groups
/// with their timing parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDocument {
    #[serde(default)]
    pub groups: Vec<ContentGroup>,
}

/// One content group (a batch of questions sharing audio and timing).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentGroup {
    pub id: String,
    /// Preparation countdown before the group, in seconds. Overrides the
    /// module template's countdown seconds when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepare_seconds: Option<u32>,
    /// Answer window in seconds; 0 means untimed (manual advance).
    #[serde(default)]
    pub answer_seconds: u32,
}

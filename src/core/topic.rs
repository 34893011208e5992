use serde::{Deserialize, Serialize};

/// A thesis topic.
///
/// Topics carry no capacity of their own; the only binding limit is the
/// owning supervisor's capacity. The area is informational and only shows up
/// in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Raw topic id as it appeared in the input.
    pub name: String,

    /// Free-form area label, e.g. "Machine Learning".
    pub area: String,
}

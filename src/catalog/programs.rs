//! Bachelor program inference from student ids.
//!
//! The input format carries no explicit program field; a student's program is
//! inferred from the id prefix (`BDBA001` is a BDBA student). This is the
//! only program-specific logic in the crate, kept behind a configurable
//! prefix/alias table so new programs and id schemes can be registered
//! without touching the engine.

/// Normalize a bachelor tag: `_` and `+` are interchangeable connectors,
/// canonicalized to `+` (so `BBA_BDBA` and `BBA+BDBA` name the same program).
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    tag.replace('_', "+")
}

/// Program tag used when an id yields no usable prefix.
pub const UNKNOWN_PROGRAM: &str = "Other";

/// Maps student ids to canonical program tags via a prefix/alias table.
///
/// Each table entry maps an id prefix to a canonical tag; for the known
/// programs the prefix is the tag itself, while aliases let unrelated id
/// schemes (say, ids starting with `S`) resolve to a program. Prefixes are
/// tried longest-first, so `BBA_BDBA001` resolves to the joint `BBA+BDBA`
/// program rather than plain `BBA`. Ids matching no entry fall back to their
/// leading run of alphabetic and connector characters, normalized.
#[derive(Debug, Clone)]
pub struct ProgramResolver {
    /// (prefix, canonical tag), sorted longest-prefix-first.
    table: Vec<(String, String)>,
}

impl Default for ProgramResolver {
    fn default() -> Self {
        Self::new(["BBA+BDBA", "BCSAI", "BDBA", "BBA"])
    }
}

impl ProgramResolver {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolver = Self { table: Vec::new() };
        for tag in tags {
            resolver.register(tag.as_ref());
        }
        resolver
    }

    /// Register a program tag whose prefix is the tag itself.
    pub fn register(&mut self, tag: &str) {
        let tag = normalize_tag(tag);
        self.insert(tag.clone(), tag);
    }

    /// Register an alias: ids starting with `prefix` belong to `tag`.
    pub fn register_alias(&mut self, prefix: &str, tag: &str) {
        self.insert(normalize_tag(prefix), normalize_tag(tag));
    }

    fn insert(&mut self, prefix: String, tag: String) {
        if prefix.is_empty() || self.table.iter().any(|(p, _)| *p == prefix) {
            return;
        }
        self.table.push((prefix, tag));
        // Longest-first, then lexicographic, keeps matching deterministic.
        self.table
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
    }

    /// Canonical program tag for a student id.
    #[must_use]
    pub fn resolve(&self, student_id: &str) -> String {
        let normalized = normalize_tag(student_id);

        for (prefix, tag) in &self.table {
            if normalized.starts_with(prefix.as_str()) {
                return tag.clone();
            }
        }

        // Fallback: leading run of alphabetic characters and connectors.
        let run: String = normalized
            .chars()
            .take_while(|c| c.is_ascii_alphabetic() || *c == '+')
            .collect();
        let run = run.trim_end_matches('+');

        if run.is_empty() {
            UNKNOWN_PROGRAM.to_string()
        } else {
            run.to_string()
        }
    }
}

use std::fmt;

/// Lifecycle states that end a wait. Matching ignores ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetStates(Vec<String>);

impl TargetStates {
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut folded: Vec<String> = Vec::new();
        for state in states {
            let state = state.as_ref().trim().to_ascii_lowercase();
            if !state.is_empty() && !folded.contains(&state) {
                folded.push(state);
            }
        }
        Self(folded)
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, state: &str) -> bool {
        self.0.iter().any(|target| target.eq_ignore_ascii_case(state))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for TargetStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<none>");
        }
        let upper: Vec<String> = self.0.iter().map(|s| s.to_ascii_uppercase()).collect();
        f.write_str(&upper.join("|"))
    }
}

impl<S: AsRef<str>> FromIterator<S> for TargetStates {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// What a wait does when the polled resource no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotFoundPolicy {
    /// Disappearance is an error.
    #[default]
    Fail,
    /// Disappearance completes the wait. Used after deletes.
    Succeed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ignores_case() {
        let targets = TargetStates::new(["Active", "FAILED"]);
        assert!(targets.matches("ACTIVE"));
        assert!(targets.matches("failed"));
        assert!(!targets.matches("CREATING"));
    }

    #[test]
    fn test_blank_and_duplicate_states_dropped() {
        let targets: TargetStates = ["active", " ", "ACTIVE"].into_iter().collect();
        assert_eq!(targets.iter().collect::<Vec<_>>(), vec!["active"]);
        assert_eq!(targets.to_string(), "ACTIVE");
        assert!(TargetStates::none().is_empty());
    }
}

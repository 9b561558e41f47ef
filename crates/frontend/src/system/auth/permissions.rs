use contracts::system::permissions::PermissionSet;

use super::session::Session;

/// Answers permission questions for the current session.
///
/// Gating is driven only by permission names; the role name is display data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionEvaluator {
    granted: Option<PermissionSet>,
}

impl PermissionEvaluator {
    pub fn for_session(session: Option<&Session>) -> Self {
        Self {
            granted: session.map(|s| s.user.effective_permissions()),
        }
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.granted.as_ref().is_some_and(|set| set.contains(name))
    }

    pub fn has_any<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.granted
            .as_ref()
            .is_some_and(|set| set.contains_any(names))
    }

    /// An empty list holds for any session, never without one
    pub fn has_all<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.granted
            .as_ref()
            .is_some_and(|set| set.contains_all(names))
    }

    pub fn permissions(&self) -> Option<&PermissionSet> {
        self.granted.as_ref()
    }
}

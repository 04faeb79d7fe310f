use crate::config::EnvironmentsConfig;

/// How the active network relates to a live chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    /// Throwaway, locally simulated chain with no state across sessions
    Local,
    /// Local simulation mirroring a live chain at a snapshot block
    ForkedLocal,
    /// Any network that is neither local nor forked
    Live,
}

impl NetworkKind {
    /// Get the string representation of the network kind
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkKind::Local => "local",
            NetworkKind::ForkedLocal => "forked-local",
            NetworkKind::Live => "live",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDetails {
    pub name: String,
    pub kind: NetworkKind,
}

impl NetworkDetails {
    /// Classify a network name against the configured local and forked environments.
    ///
    /// A name listed in both is treated as local.
    pub fn new(name: impl Into<String>, environments: &EnvironmentsConfig) -> Self {
        let name = name.into();
        let kind = if environments.local.iter().any(|n| *n == name) {
            NetworkKind::Local
        } else if environments.forked.iter().any(|n| *n == name) {
            NetworkKind::ForkedLocal
        } else {
            NetworkKind::Live
        };

        Self { name, kind }
    }

    pub fn is_local(&self) -> bool {
        matches!(self.kind, NetworkKind::Local)
    }

    pub fn is_forked(&self) -> bool {
        matches!(self.kind, NetworkKind::ForkedLocal)
    }

    pub fn is_live(&self) -> bool {
        matches!(self.kind, NetworkKind::Live)
    }

    /// Local and forked networks both come with unlocked default accounts
    pub fn has_default_accounts(&self) -> bool {
        !self.is_live()
    }
}

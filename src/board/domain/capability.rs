//! Role-derived capabilities.
//!
//! The hosting layer resolves an actor's current roles for every interaction
//! and turns them into a [`CapabilitySet`] through the configured
//! [`RolePolicy`]. Nothing here caches role membership, so a role granted
//! after a task was posted takes effect on the next action.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Action permission granted by role membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May post new tasks.
    CreateTask,
    /// May claim open tasks.
    ClaimTask,
}

impl Capability {
    /// Returns the canonical name of the capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::ClaimTask => "claim_task",
        }
    }
}

/// Capabilities held by an actor at the moment of a single action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    can_create: bool,
    can_claim: bool,
}

impl CapabilitySet {
    /// Returns an empty capability set.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            can_create: false,
            can_claim: false,
        }
    }

    /// Returns a set holding every capability.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            can_create: true,
            can_claim: true,
        }
    }

    /// Adds a capability to the set.
    #[must_use]
    pub const fn with(mut self, capability: Capability) -> Self {
        match capability {
            Capability::CreateTask => self.can_create = true,
            Capability::ClaimTask => self.can_claim = true,
        }
        self
    }

    /// Returns whether the set grants the capability.
    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        match capability {
            Capability::CreateTask => self.can_create,
            Capability::ClaimTask => self.can_claim,
        }
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

/// Maps role names to capabilities.
///
/// Role names are compared exactly; `"pusher"` does not satisfy a claimer
/// role configured as `"Pusher"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    creator_roles: BTreeSet<String>,
    claimer_role: String,
}

impl RolePolicy {
    /// Creates a policy from the creator role set and the claimer role.
    #[must_use]
    pub fn new(
        creator_roles: impl IntoIterator<Item = String>,
        claimer_role: impl Into<String>,
    ) -> Self {
        Self {
            creator_roles: creator_roles.into_iter().collect(),
            claimer_role: claimer_role.into(),
        }
    }

    /// Returns the roles that grant [`Capability::CreateTask`].
    #[must_use]
    pub const fn creator_roles(&self) -> &BTreeSet<String> {
        &self.creator_roles
    }

    /// Returns the role that grants [`Capability::ClaimTask`].
    #[must_use]
    pub fn claimer_role(&self) -> &str {
        &self.claimer_role
    }

    /// Derives the capabilities of a member holding `roles`.
    #[must_use]
    pub fn capabilities_for<I, S>(&self, roles: I) -> CapabilitySet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        roles
            .into_iter()
            .fold(CapabilitySet::none(), |granted, role| {
                let name = role.as_ref();
                let with_create = if self.creator_roles.contains(name) {
                    granted.with(Capability::CreateTask)
                } else {
                    granted
                };
                if name == self.claimer_role {
                    with_create.with(Capability::ClaimTask)
                } else {
                    with_create
                }
            })
    }
}

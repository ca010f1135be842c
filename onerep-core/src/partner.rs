//! Two profiles sharing one device, taking turns set by set.

use crate::exercise::ProfileId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partner {
    One,
    Two,
}

impl Partner {
    pub fn other(self) -> Self {
        match self {
            Partner::One => Partner::Two,
            Partner::Two => Partner::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Partner::One => 1,
            Partner::Two => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerContext {
    pub current_partner: Partner,
    pub profile1: ProfileId,
    pub profile2: ProfileId,
}

impl PartnerContext {
    pub fn current_profile(&self) -> ProfileId {
        self.profile_of(self.current_partner)
    }

    pub fn profile_of(&self, partner: Partner) -> ProfileId {
        match partner {
            Partner::One => self.profile1,
            Partner::Two => self.profile2,
        }
    }
}

/// Tracks whose turn it is. The orchestrator decides when a turn ends; this
/// type only flips and counts.
#[derive(Debug, Clone)]
pub struct PartnerTurnCoordinator {
    context: PartnerContext,
    turns: u32,
}

impl PartnerTurnCoordinator {
    /// Partner one goes first. Both partners must be different profiles.
    pub fn new(profile1: ProfileId, profile2: ProfileId) -> Option<Self> {
        if profile1 == profile2 {
            return None;
        }
        Some(PartnerTurnCoordinator {
            context: PartnerContext {
                current_partner: Partner::One,
                profile1,
                profile2,
            },
            turns: 0,
        })
    }

    pub fn context(&self) -> PartnerContext {
        self.context
    }

    pub fn current_profile(&self) -> ProfileId {
        self.context.current_profile()
    }

    pub fn current_partner(&self) -> Partner {
        self.context.current_partner
    }

    /// Sets committed since partner mode started.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// A set was committed: hand the device to the other partner.
    pub fn advance_turn(&mut self) -> ProfileId {
        self.turns = self.turns.saturating_add(1);
        self.flip()
    }

    /// Manual hand-over without a committed set.
    pub fn switch_partner(&mut self) -> ProfileId {
        self.flip()
    }

    fn flip(&mut self) -> ProfileId {
        self.context.current_partner = self.context.current_partner.other();
        self.current_profile()
    }
}

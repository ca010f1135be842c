use super::orchestrator::{SessionOrchestrator, Stage};
use crate::exercise::ProfileId;
use crate::partner::PartnerTurnCoordinator;
use log::{debug, info};

impl SessionOrchestrator {
    /// Alternate sets between two profiles, `profile1` first.
    ///
    /// Refused while a set is live, while partner mode is already on, when
    /// both ids name the same profile, or when either list fails to load.
    pub fn start_partner_mode(&mut self, profile1: ProfileId, profile2: ProfileId) -> bool {
        if matches!(self.stage, Stage::Exercise(_)) || self.partner.is_some() {
            return false;
        }
        let Some(coordinator) = PartnerTurnCoordinator::new(profile1, profile2) else {
            return false;
        };
        if self.ensure_session(profile1).is_none() || self.ensure_session(profile2).is_none() {
            return false;
        }
        self.partner = Some(coordinator);
        info!("Partner mode: {} and {}", profile1, profile2);
        self.publish();
        true
    }

    /// Hand the device to the other partner without logging anything.
    /// Not allowed mid-set, so a turn can never change under a commit.
    pub fn switch_partner(&mut self) -> bool {
        if matches!(self.stage, Stage::Exercise(_)) {
            debug!("switch_partner ignored during a set");
            return false;
        }
        let Some(partner) = self.partner.as_mut() else {
            return false;
        };
        let now = partner.switch_partner();
        info!("Switched to {}", now);
        self.publish();
        true
    }

    /// Back to one profile: whoever holds the turn keeps going. Both
    /// profiles' logged sets and statuses are left as they are.
    pub fn end_partner_mode(&mut self) -> bool {
        if matches!(self.stage, Stage::Exercise(_)) {
            return false;
        }
        let Some(partner) = self.partner.take() else {
            return false;
        };
        self.solo_profile = partner.current_profile();
        info!(
            "Partner mode ended after {} sets, continuing as {}",
            partner.turns(),
            self.solo_profile
        );
        self.publish();
        true
    }
}

//! Contracts: secondary win conditions tied to a charge.

use serde::{Deserialize, Serialize};

use crate::game::{PlayerId, Role};

/// A contract held by one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Idiot, Survivor, Guard or Agent.
    pub role: Role,
    /// The player the contract depends on.
    pub charge: PlayerId,
    /// Resolved outcome, once known.
    pub success: Option<bool>,
}

impl Contract {
    /// Open a contract.
    #[must_use]
    pub fn new(role: Role, charge: PlayerId) -> Self {
        debug_assert!(role.is_contract(), "{role} cannot hold a contract");
        Self {
            role,
            charge,
            success: None,
        }
    }

    /// Outcome at game end for a still-open contract.
    ///
    /// An Idiot that was never elected has failed.
    #[must_use]
    pub fn final_success(&self, holder_alive: bool, charge_alive: bool) -> bool {
        if let Some(success) = self.success {
            return success;
        }
        match self.role {
            Role::Guard => charge_alive,
            Role::Agent => !charge_alive,
            Role::Survivor => holder_alive,
            _ => false,
        }
    }
}

/// Where a refocused contract points next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewCharge {
    /// The holder itself.
    Holder,
    /// Whoever killed the old charge.
    Aggressor,
}

/// New role and charge for a Guard or Agent whose charge just died.
///
/// If the holder did the killing, or the aggressor is gone, the contract
/// folds back onto the holder: a Guard becomes an Idiot and an Agent a
/// Survivor. Otherwise the holder swaps sides and takes the aggressor as
/// its new charge. Other roles are returned unchanged.
#[must_use]
pub const fn refocus(role: Role, holder_was_killer: bool, aggressor_alive: bool) -> (Role, NewCharge) {
    let orphaned = holder_was_killer || !aggressor_alive;
    match (role, orphaned) {
        (Role::Guard, true) => (Role::Idiot, NewCharge::Holder),
        (Role::Guard, false) => (Role::Agent, NewCharge::Aggressor),
        (Role::Agent, true) => (Role::Survivor, NewCharge::Holder),
        (Role::Agent, false) => (Role::Guard, NewCharge::Aggressor),
        (other, _) => (other, NewCharge::Holder),
    }
}

/// Resolved contract reported at game end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractOutcome {
    /// Contract holder.
    pub holder: PlayerId,
    /// Final contract role.
    pub role: Role,
    /// Final charge.
    pub charge: PlayerId,
    /// Whether the contract was fulfilled.
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refocus_third_party_kill() {
        assert_eq!(refocus(Role::Guard, false, true), (Role::Agent, NewCharge::Aggressor));
        assert_eq!(refocus(Role::Agent, false, true), (Role::Guard, NewCharge::Aggressor));
    }

    #[test]
    fn test_refocus_own_kill_or_orphaned() {
        assert_eq!(refocus(Role::Guard, true, true), (Role::Idiot, NewCharge::Holder));
        assert_eq!(refocus(Role::Guard, false, false), (Role::Idiot, NewCharge::Holder));
        assert_eq!(refocus(Role::Agent, true, false), (Role::Survivor, NewCharge::Holder));
    }

    #[test]
    fn test_final_success_open_contracts() {
        let guard = Contract::new(Role::Guard, "ann".into());
        assert!(guard.final_success(false, true));
        assert!(!guard.final_success(true, false));

        let agent = Contract::new(Role::Agent, "ann".into());
        assert!(agent.final_success(true, false));

        let survivor = Contract::new(Role::Survivor, "bob".into());
        assert!(survivor.final_success(true, true));

        let idiot = Contract::new(Role::Idiot, "dan".into());
        assert!(!idiot.final_success(true, true));
    }

    #[test]
    fn test_resolved_contract_is_final() {
        let mut agent = Contract::new(Role::Agent, "ann".into());
        agent.success = Some(true);
        assert!(agent.final_success(true, true));
    }
}

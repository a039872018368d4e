//! Nation Sub-System Templates
//!
//! One template type per cloned sub-system, each carrying a version marker
//! so template swaps are observable. The awards, timelock, and governor
//! slots are opaque addresses: governance itself is an external
//! collaborator, so the registry stores them for future nations but clones
//! nothing from them.

use lib_claims::StateDepartment;
use lib_editions::CommemorativeEdition;
use lib_factory::Template;
use lib_tokens::CitizenshipWithRegistry;
use lib_types::Address;
use lib_vault::VoterRegistration;

/// Citizenship-token template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitizenshipTemplate {
    pub version: u64,
}

impl Template for CitizenshipTemplate {
    type Instance = CitizenshipWithRegistry;

    fn kind(&self) -> &'static str {
        "citizenship"
    }

    fn clone_instance(&self) -> Result<Self::Instance, String> {
        Ok(CitizenshipWithRegistry::new_uninitialized())
    }
}

/// Claim-gate template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateDepartmentTemplate {
    pub version: u64,
}

impl Template for StateDepartmentTemplate {
    type Instance = StateDepartment;

    fn kind(&self) -> &'static str {
        "state-department"
    }

    fn clone_instance(&self) -> Result<Self::Instance, String> {
        Ok(StateDepartment::new_uninitialized())
    }
}

/// Wrapping-vault template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoterRegistrationTemplate {
    pub version: u64,
}

impl Template for VoterRegistrationTemplate {
    type Instance = VoterRegistration;

    fn kind(&self) -> &'static str {
        "voter-registration"
    }

    fn clone_instance(&self) -> Result<Self::Instance, String> {
        Ok(VoterRegistration::new_uninitialized())
    }
}

/// Fee-gated updater template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommemorativeEditionTemplate {
    pub version: u64,
}

impl Template for CommemorativeEditionTemplate {
    type Instance = CommemorativeEdition;

    fn kind(&self) -> &'static str {
        "commemorative-edition"
    }

    fn clone_instance(&self) -> Result<Self::Instance, String> {
        Ok(CommemorativeEdition::new_uninitialized())
    }
}

/// Everything `create_nation` clones from, plus the opaque governance
/// slots carried for future nations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSet {
    pub citizenship: CitizenshipTemplate,
    pub state_department: StateDepartmentTemplate,
    pub voter_registration: VoterRegistrationTemplate,
    pub commemorative_edition: CommemorativeEditionTemplate,
    pub awards: Address,
    pub timelock: Address,
    pub governor: Address,
}

impl TemplateSet {
    /// First-generation templates with empty governance slots.
    pub fn genesis() -> Self {
        Self::versioned(1)
    }

    /// Uniformly versioned set with empty governance slots.
    pub fn versioned(version: u64) -> Self {
        Self {
            citizenship: CitizenshipTemplate { version },
            state_department: StateDepartmentTemplate { version },
            voter_registration: VoterRegistrationTemplate { version },
            commemorative_edition: CommemorativeEditionTemplate { version },
            awards: Address::zero(),
            timelock: Address::zero(),
            governor: Address::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_kinds_are_distinct() {
        let set = TemplateSet::genesis();
        let kinds = [
            set.citizenship.kind(),
            set.state_department.kind(),
            set.voter_registration.kind(),
            set.commemorative_edition.kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for (j, b) in kinds.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_templates_produce_uninitialized_instances() {
        let set = TemplateSet::genesis();
        let citizenship = set.citizenship.clone_instance().unwrap();
        assert_eq!(citizenship.total_supply(), 0);

        let department = set.state_department.clone_instance().unwrap();
        assert!(!department.is_paused());
        assert!(department.address().is_zero());
    }
}

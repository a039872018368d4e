//! Nation Registry
//!
//! Orchestrates nation creation: clones the four sub-systems from the
//! current templates, initializes each atomically through its factory,
//! wires the role graph on the fresh citizenship token, and records the
//! bundle under its country code. Template hot-swaps install new factories
//! for future nations and never touch existing records or instances.
//!
//! The registry owns every created instance; factories only stamp them out.
//! Instances are stored (and the nation recorded) only after every creation
//! and wiring step succeeded, so a failed creation leaves no observable
//! partial nation.

use std::collections::BTreeMap;
use std::sync::Arc;

use lib_claims::{ClaimEvent, EligibilityVerifier, StateDepartment};
use lib_crypto::{Ed25519Verifier, Signature};
use lib_editions::{CommemorativeEdition, EditionEvent};
use lib_factory::CloneFactory;
use lib_tokens::{CitizenshipWithRegistry, Role, TokenEvent};
use lib_types::{Address, Amount, CountryCode, TokenId};
use lib_vault::VoterRegistration;
use serde::{Deserialize, Serialize};

use crate::country::CountryCodes;
use crate::errors::{NationError, NationResult};
use crate::events::{EventPublisher, NationEvent, NationListener};
use crate::templates::{
    CitizenshipTemplate, CommemorativeEditionTemplate, StateDepartmentTemplate, TemplateSet,
    VoterRegistrationTemplate,
};

/// Recorded nation bundle. Once written, a record never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationRecord {
    pub code: CountryCode,
    pub name: String,
    pub symbol: String,
    pub citizenship: Address,
    pub state_department: Address,
    pub voter_registration: Address,
    pub commemorative_edition: Address,
    pub founder: Address,
}

/// Multi-tenant nation orchestrator.
#[derive(Debug)]
pub struct NationRegistry {
    address: Address,
    admin: Address,
    permissionless: bool,
    default_fee: Amount,
    directory: CountryCodes,
    nations: BTreeMap<CountryCode, NationRecord>,
    nation_order: Vec<CountryCode>,
    citizenships: BTreeMap<Address, CitizenshipWithRegistry>,
    departments: BTreeMap<Address, StateDepartment>,
    vaults: BTreeMap<Address, VoterRegistration>,
    editions: BTreeMap<Address, CommemorativeEdition>,
    citizenship_factory: CloneFactory<CitizenshipTemplate>,
    department_factory: CloneFactory<StateDepartmentTemplate>,
    vault_factory: CloneFactory<VoterRegistrationTemplate>,
    edition_factory: CloneFactory<CommemorativeEditionTemplate>,
    awards: Address,
    timelock: Address,
    governor: Address,
    generation: u64,
    publisher: EventPublisher,
}

impl NationRegistry {
    /// Deploy a registry in Permissioned mode with generation-0 factories.
    pub fn new(address: Address, admin: Address, default_fee: Amount, templates: TemplateSet) -> Self {
        Self {
            address,
            admin,
            permissionless: false,
            default_fee,
            directory: CountryCodes::new(admin),
            nations: BTreeMap::new(),
            nation_order: Vec::new(),
            citizenships: BTreeMap::new(),
            departments: BTreeMap::new(),
            vaults: BTreeMap::new(),
            editions: BTreeMap::new(),
            citizenship_factory: CloneFactory::new(templates.citizenship, 0),
            department_factory: CloneFactory::new(templates.state_department, 0),
            vault_factory: CloneFactory::new(templates.voter_registration, 0),
            edition_factory: CloneFactory::new(templates.commemorative_edition, 0),
            awards: templates.awards,
            timelock: templates.timelock,
            governor: templates.governor,
            generation: 0,
            publisher: EventPublisher::new(),
        }
    }

    /// Register an event listener.
    pub fn subscribe(&mut self, listener: Box<dyn NationListener>) {
        self.publisher.subscribe(listener);
    }

    fn require_admin(&self, caller: Address) -> NationResult<()> {
        if caller != self.admin {
            return Err(NationError::CallerNotAdmin { account: caller });
        }
        Ok(())
    }

    // ========================================================================
    // CREATION MODE & DIRECTORY
    // ========================================================================

    /// Flip between Permissioned and Permissionless creation. Admin only.
    pub fn toggle_permissionless(&mut self, caller: Address) -> NationResult<bool> {
        self.require_admin(caller)?;
        self.permissionless = !self.permissionless;
        self.publisher.publish(&NationEvent::IsCreationPermissionless {
            permissionless: self.permissionless,
        });
        Ok(self.permissionless)
    }

    /// Add `(code, name)` entries to the country directory. Requires the
    /// Updater role on the directory.
    pub fn add_country_codes(
        &mut self,
        caller: Address,
        entries: &[(&str, &str)],
    ) -> NationResult<()> {
        let events = self.directory.add_country_codes(caller, entries)?;
        for event in &events {
            self.publisher.publish(event);
        }
        Ok(())
    }

    // ========================================================================
    // NATION CREATION
    // ========================================================================

    /// Create a nation under `code`.
    ///
    /// In Permissioned mode only the registry admin may create. The code
    /// must parse, resolve in the directory, and be unused. The four
    /// sub-systems are cloned from the current templates; the fresh
    /// citizenship token is wired with Minter → state department,
    /// UriUpdater → commemorative edition, the vault allowlisted as a
    /// transfer destination, and Admin + TransferEnabler → founder.
    pub fn create_nation(
        &mut self,
        caller: Address,
        code: &str,
        founder: Address,
        verifier: Arc<dyn EligibilityVerifier>,
        default_uri: &str,
    ) -> NationResult<NationRecord> {
        if !self.permissionless && caller != self.admin {
            return Err(NationError::ContractNotPermissionless);
        }
        let code = CountryCode::parse(code)?;
        let name = self.directory.country_name(code)?.to_string();
        if self.nations.contains_key(&code) {
            return Err(NationError::NationAlreadyExists(code));
        }

        let registry = self.address;
        let fee = self.default_fee;

        let (citizenship_addr, mut citizenship) =
            self.citizenship_factory
                .create_clone(|address, token: &mut CitizenshipWithRegistry| {
                    token.initialize(
                        address,
                        registry,
                        format!("{} Citizenship", name),
                        code.as_str(),
                        &[],
                    )
                })?;

        let (department_addr, department) =
            self.department_factory
                .create_clone(|address, dept: &mut StateDepartment| {
                    dept.initialize(
                        address,
                        citizenship_addr,
                        Arc::clone(&verifier),
                        default_uri,
                        founder,
                    )
                })?;

        let (vault_addr, vault) =
            self.vault_factory
                .create_clone(|address, vault: &mut VoterRegistration| {
                    vault.initialize(
                        address,
                        founder,
                        format!("{} Voter Registration", name),
                        format!("V{}", code),
                        citizenship_addr,
                    )
                })?;

        let (edition_addr, edition) =
            self.edition_factory
                .create_clone(|address, edition: &mut CommemorativeEdition| {
                    edition.initialize(
                        address,
                        citizenship_addr,
                        founder,
                        fee,
                        founder,
                        Arc::new(Ed25519Verifier),
                    )
                })?;

        // Role wiring on the fresh citizenship token. The registry holds
        // Admin from initialization, so these cannot fail on a fresh token.
        citizenship.grant_role(registry, Role::Minter, department_addr)?;
        citizenship.grant_role(registry, Role::UriUpdater, edition_addr)?;
        citizenship.update_allowlist(registry, &[vault_addr], &[true])?;
        citizenship.grant_role(registry, Role::Admin, founder)?;
        citizenship.grant_role(registry, Role::TransferEnabler, founder)?;

        let record = NationRecord {
            code,
            name,
            symbol: code.as_str().to_string(),
            citizenship: citizenship_addr,
            state_department: department_addr,
            voter_registration: vault_addr,
            commemorative_edition: edition_addr,
            founder,
        };

        self.citizenships.insert(citizenship_addr, citizenship);
        self.departments.insert(department_addr, department);
        self.vaults.insert(vault_addr, vault);
        self.editions.insert(edition_addr, edition);
        self.nations.insert(code, record.clone());
        self.nation_order.push(code);

        tracing::info!("nation {} ({}) created by {}", code, record.name, caller);
        self.publisher
            .publish(&NationEvent::NationCreated { code, founder });
        self.publisher.publish(&NationEvent::NationDetails {
            record: record.clone(),
        });

        Ok(record)
    }

    /// Replace the templates used by future `create_nation` calls. Admin
    /// only. Fresh factories get the new generation as their salt, so clone
    /// addresses never collide across swaps; existing nations are untouched.
    pub fn update_implementation(
        &mut self,
        caller: Address,
        templates: TemplateSet,
    ) -> NationResult<()> {
        self.require_admin(caller)?;

        self.generation += 1;
        let salt = self.generation;
        self.citizenship_factory = CloneFactory::new(templates.citizenship, salt);
        self.department_factory = CloneFactory::new(templates.state_department, salt);
        self.vault_factory = CloneFactory::new(templates.voter_registration, salt);
        self.edition_factory = CloneFactory::new(templates.commemorative_edition, salt);
        self.awards = templates.awards;
        self.timelock = templates.timelock;
        self.governor = templates.governor;

        tracing::info!("implementation updated to generation {}", self.generation);
        self.publisher.publish(&NationEvent::ImplementationUpdated {
            generation: self.generation,
            awards: self.awards,
            timelock: self.timelock,
            governor: self.governor,
        });
        Ok(())
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    /// The nation recorded under `code`; unknown codes fail hard.
    pub fn nation(&self, code: CountryCode) -> NationResult<&NationRecord> {
        self.nations
            .get(&code)
            .ok_or(NationError::UnknownNation(code))
    }

    /// Country codes in creation order.
    pub fn nation_codes(&self) -> &[CountryCode] {
        &self.nation_order
    }

    pub fn citizenship_of(&self, code: CountryCode) -> NationResult<&CitizenshipWithRegistry> {
        let address = self.nation(code)?.citizenship;
        self.citizenships
            .get(&address)
            .ok_or(NationError::UnknownNation(code))
    }

    pub fn citizenship_of_mut(
        &mut self,
        code: CountryCode,
    ) -> NationResult<&mut CitizenshipWithRegistry> {
        let address = self.nation(code)?.citizenship;
        self.citizenships
            .get_mut(&address)
            .ok_or(NationError::UnknownNation(code))
    }

    pub fn department_of(&self, code: CountryCode) -> NationResult<&StateDepartment> {
        let address = self.nation(code)?.state_department;
        self.departments
            .get(&address)
            .ok_or(NationError::UnknownNation(code))
    }

    pub fn department_of_mut(&mut self, code: CountryCode) -> NationResult<&mut StateDepartment> {
        let address = self.nation(code)?.state_department;
        self.departments
            .get_mut(&address)
            .ok_or(NationError::UnknownNation(code))
    }

    pub fn vault_of(&self, code: CountryCode) -> NationResult<&VoterRegistration> {
        let address = self.nation(code)?.voter_registration;
        self.vaults
            .get(&address)
            .ok_or(NationError::UnknownNation(code))
    }

    pub fn vault_of_mut(&mut self, code: CountryCode) -> NationResult<&mut VoterRegistration> {
        let address = self.nation(code)?.voter_registration;
        self.vaults
            .get_mut(&address)
            .ok_or(NationError::UnknownNation(code))
    }

    pub fn edition_of(&self, code: CountryCode) -> NationResult<&CommemorativeEdition> {
        let address = self.nation(code)?.commemorative_edition;
        self.editions
            .get(&address)
            .ok_or(NationError::UnknownNation(code))
    }

    pub fn edition_of_mut(&mut self, code: CountryCode) -> NationResult<&mut CommemorativeEdition> {
        let address = self.nation(code)?.commemorative_edition;
        self.editions
            .get_mut(&address)
            .ok_or(NationError::UnknownNation(code))
    }

    // ========================================================================
    // FACADE OPERATIONS (route to the right instances of a nation)
    // ========================================================================

    /// Claim citizenship in the nation under `code`.
    pub fn claim_citizenship(
        &mut self,
        caller: Address,
        code: CountryCode,
    ) -> NationResult<ClaimEvent> {
        let record = self.nation(code)?;
        let (department_addr, citizenship_addr) = (record.state_department, record.citizenship);

        let citizenship = self
            .citizenships
            .get_mut(&citizenship_addr)
            .ok_or(NationError::UnknownNation(code))?;
        let department = self
            .departments
            .get_mut(&department_addr)
            .ok_or(NationError::UnknownNation(code))?;

        Ok(department.claim_citizenship(caller, citizenship)?)
    }

    /// Deposit citizenship tokens into the nation's vault.
    pub fn deposit_for(
        &mut self,
        caller: Address,
        code: CountryCode,
        receiver: Address,
        token_ids: &[TokenId],
    ) -> NationResult<Vec<TokenEvent>> {
        let record = self.nation(code)?;
        let (vault_addr, citizenship_addr) = (record.voter_registration, record.citizenship);

        let citizenship = self
            .citizenships
            .get_mut(&citizenship_addr)
            .ok_or(NationError::UnknownNation(code))?;
        let vault = self
            .vaults
            .get_mut(&vault_addr)
            .ok_or(NationError::UnknownNation(code))?;

        Ok(vault.deposit_for(caller, receiver, token_ids, citizenship)?)
    }

    /// Withdraw escrowed citizenship tokens from the nation's vault.
    pub fn withdraw_to(
        &mut self,
        caller: Address,
        code: CountryCode,
        receiver: Address,
        token_ids: &[TokenId],
    ) -> NationResult<Vec<TokenEvent>> {
        let record = self.nation(code)?;
        let (vault_addr, citizenship_addr) = (record.voter_registration, record.citizenship);

        let citizenship = self
            .citizenships
            .get_mut(&citizenship_addr)
            .ok_or(NationError::UnknownNation(code))?;
        let vault = self
            .vaults
            .get_mut(&vault_addr)
            .ok_or(NationError::UnknownNation(code))?;

        Ok(vault.withdraw_to(caller, receiver, token_ids, citizenship)?)
    }

    /// Fee-gated URI update through the nation's commemorative edition.
    pub fn update_edition_uri(
        &mut self,
        caller: Address,
        code: CountryCode,
        token_id: TokenId,
        new_uri: &str,
        signature: &Signature,
        payment: Amount,
    ) -> NationResult<EditionEvent> {
        let record = self.nation(code)?;
        let (edition_addr, citizenship_addr) = (record.commemorative_edition, record.citizenship);

        let citizenship = self
            .citizenships
            .get_mut(&citizenship_addr)
            .ok_or(NationError::UnknownNation(code))?;
        let edition = self
            .editions
            .get_mut(&edition_addr)
            .ok_or(NationError::UnknownNation(code))?;

        Ok(edition.update_uri(caller, token_id, new_uri, signature, payment, citizenship)?)
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn is_permissionless(&self) -> bool {
        self.permissionless
    }

    pub fn default_fee(&self) -> Amount {
        self.default_fee
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn directory(&self) -> &CountryCodes {
        &self.directory
    }

    pub fn awards(&self) -> Address {
        self.awards
    }

    pub fn timelock(&self) -> Address {
        self.timelock
    }

    pub fn governor(&self) -> Address {
        self.governor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_claims::StaticEligibility;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 32])
    }

    const ADMIN: u8 = 1;
    const FOUNDER: u8 = 2;

    fn registry() -> NationRegistry {
        let mut registry = NationRegistry::new(addr(0xFE), addr(ADMIN), 100, TemplateSet::genesis());
        registry
            .add_country_codes(addr(ADMIN), &[("US", "United States"), ("DE", "Germany")])
            .unwrap();
        registry
    }

    fn create(registry: &mut NationRegistry, caller: Address, code: &str) -> NationResult<NationRecord> {
        registry.create_nation(
            caller,
            code,
            addr(FOUNDER),
            Arc::new(StaticEligibility::allow_all()),
            "default://citizen",
        )
    }

    #[test]
    fn test_permissioned_mode_restricts_creation_to_admin() {
        let mut registry = registry();

        let denied = create(&mut registry, addr(9), "US");
        assert!(matches!(denied, Err(NationError::ContractNotPermissionless)));

        assert!(create(&mut registry, addr(ADMIN), "US").is_ok());
    }

    #[test]
    fn test_permissionless_mode_opens_creation() {
        let mut registry = registry();
        assert!(!registry.is_permissionless());

        registry.toggle_permissionless(addr(ADMIN)).unwrap();
        assert!(registry.is_permissionless());
        assert!(create(&mut registry, addr(9), "US").is_ok());
    }

    #[test]
    fn test_toggle_permissionless_is_admin_only() {
        let mut registry = registry();
        assert!(matches!(
            registry.toggle_permissionless(addr(9)),
            Err(NationError::CallerNotAdmin { .. })
        ));
    }

    #[test]
    fn test_duplicate_code_fails_for_any_caller() {
        let mut registry = registry();
        registry.toggle_permissionless(addr(ADMIN)).unwrap();
        create(&mut registry, addr(ADMIN), "US").unwrap();

        for caller in [addr(ADMIN), addr(9)] {
            let result = create(&mut registry, caller, "US");
            assert!(matches!(result, Err(NationError::NationAlreadyExists(_))));
        }
    }

    #[test]
    fn test_unknown_code_and_bad_length_are_rejected() {
        let mut registry = registry();

        let unknown = create(&mut registry, addr(ADMIN), "FR");
        assert!(matches!(unknown, Err(NationError::UnknownCountryCode(_))));

        let malformed = create(&mut registry, addr(ADMIN), "USA");
        assert!(matches!(malformed, Err(NationError::InvalidCountryCode(_))));
    }

    #[test]
    fn test_created_nation_is_fully_wired() {
        let mut registry = registry();
        let record = create(&mut registry, addr(ADMIN), "US").unwrap();
        let code = record.code;

        assert_eq!(record.name, "United States");
        assert_eq!(record.symbol, "US");
        assert_eq!(record.founder, addr(FOUNDER));

        let citizenship = registry.citizenship_of(code).unwrap();
        assert_eq!(citizenship.name(), "United States Citizenship");
        assert!(citizenship.has_role(Role::Minter, &record.state_department));
        assert!(citizenship.has_role(Role::UriUpdater, &record.commemorative_edition));
        assert!(citizenship.has_role(Role::Admin, &record.founder));
        assert!(citizenship.has_role(Role::TransferEnabler, &record.founder));
        assert!(citizenship.is_allowlisted(&record.voter_registration));

        let department = registry.department_of(code).unwrap();
        assert_eq!(department.citizenship(), record.citizenship);
        assert_eq!(department.default_uri(), "default://citizen");

        let vault = registry.vault_of(code).unwrap();
        assert_eq!(vault.underlying(), record.citizenship);

        let edition = registry.edition_of(code).unwrap();
        assert_eq!(edition.citizenship(), record.citizenship);
        assert_eq!(edition.signer(), record.founder);
        assert_eq!(edition.fee(), registry.default_fee());
    }

    #[test]
    fn test_nations_get_distinct_sub_system_addresses() {
        let mut registry = registry();
        let us = create(&mut registry, addr(ADMIN), "US").unwrap();
        let de = create(&mut registry, addr(ADMIN), "DE").unwrap();

        let all = [
            us.citizenship,
            us.state_department,
            us.voter_registration,
            us.commemorative_edition,
            de.citizenship,
            de.state_department,
            de.voter_registration,
            de.commemorative_edition,
        ];
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_update_implementation_spares_existing_nations() {
        let mut registry = registry();
        let before = create(&mut registry, addr(ADMIN), "US").unwrap();

        registry
            .update_implementation(addr(ADMIN), TemplateSet::versioned(2))
            .unwrap();
        assert_eq!(registry.generation(), 1);

        // The recorded nation is bit-for-bit unchanged.
        let code = before.code;
        assert_eq!(registry.nation(code).unwrap(), &before);

        // Future nations come from the new factories (fresh salt).
        let after = create(&mut registry, addr(ADMIN), "DE").unwrap();
        assert_ne!(after.citizenship, before.citizenship);
    }

    #[test]
    fn test_update_implementation_is_admin_only() {
        let mut registry = registry();
        let result = registry.update_implementation(addr(9), TemplateSet::versioned(2));
        assert!(matches!(result, Err(NationError::CallerNotAdmin { .. })));
    }

    #[test]
    fn test_nation_lookup_fails_for_unknown_code() {
        let registry = registry();
        let us: CountryCode = "US".parse().unwrap();
        assert!(matches!(
            registry.nation(us),
            Err(NationError::UnknownNation(_))
        ));
    }

    #[test]
    fn test_nation_codes_keep_creation_order() {
        let mut registry = registry();
        create(&mut registry, addr(ADMIN), "DE").unwrap();
        create(&mut registry, addr(ADMIN), "US").unwrap();

        let codes: Vec<&str> = registry.nation_codes().iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["DE", "US"]);
    }

    #[test]
    fn test_nation_record_serialization_roundtrip() {
        let mut registry = registry();
        let record = create(&mut registry, addr(ADMIN), "US").unwrap();

        let bytes = bincode::serialize(&record).unwrap();
        let restored: NationRecord = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, record);
    }
}

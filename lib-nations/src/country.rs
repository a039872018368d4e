//! Country-Code Directory
//!
//! Jurisdiction codes a nation may be created under. The directory is
//! append/overwrite only: re-adding a code replaces its display name, and
//! nothing is ever removed. Updates are gated by the Updater role.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lib_tokens::{AuthoritySet, Role};
use lib_types::{Address, CountryCode};

use crate::errors::{NationError, NationResult};
use crate::events::NationEvent;

/// Directory of known jurisdiction codes and their display names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryCodes {
    directory: BTreeMap<CountryCode, String>,
    authorities: AuthoritySet,
}

impl CountryCodes {
    /// Fresh directory; `admin` receives Admin and Updater.
    pub fn new(admin: Address) -> Self {
        let mut authorities = AuthoritySet::new();
        authorities.add(Role::Admin, admin);
        authorities.add(Role::Updater, admin);
        Self {
            directory: BTreeMap::new(),
            authorities,
        }
    }

    /// Add `(code, name)` entries to the directory. Requires the Updater
    /// role; malformed codes fail the whole call, and a duplicate code
    /// overwrites its previous name.
    pub fn add_country_codes(
        &mut self,
        caller: Address,
        entries: &[(&str, &str)],
    ) -> NationResult<Vec<NationEvent>> {
        if !self.authorities.has_role(Role::Updater, &caller) {
            return Err(NationError::CallerNotAuthorized { account: caller });
        }

        // === VALIDATION PHASE (before any mutation) ===
        let mut parsed = Vec::with_capacity(entries.len());
        for (code, name) in entries {
            parsed.push((CountryCode::parse(code)?, name.to_string()));
        }

        // === MUTATION PHASE (all validations passed) ===
        let mut events = Vec::with_capacity(parsed.len());
        for (code, name) in parsed {
            self.directory.insert(code, name.clone());
            events.push(NationEvent::CountryCodeAdded { code, name });
        }
        Ok(events)
    }

    /// Display name for `code`; unknown codes fail hard.
    pub fn country_name(&self, code: CountryCode) -> NationResult<&str> {
        self.directory
            .get(&code)
            .map(String::as_str)
            .ok_or(NationError::UnknownCountryCode(code))
    }

    /// Whether `code` is known.
    pub fn contains(&self, code: CountryCode) -> bool {
        self.directory.contains_key(&code)
    }
}

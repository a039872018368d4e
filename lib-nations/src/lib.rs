//! Nation Provisioning and Governance
//!
//! The top of the stack: a [`NationRegistry`] stamps out per-jurisdiction
//! "nation" bundles (citizenship token, claim gate, voter-registration
//! vault, commemorative edition) from the current templates, wires the
//! role graph between the fresh clones, and records each bundle under its
//! unique country code. Template hot-swaps only affect future nations.
//!
//! - [`CountryCodes`]: the jurisdiction directory consulted at creation
//! - [`TemplateSet`]: the four clone templates plus opaque governance slots
//! - [`NationRegistry`]: creation modes, nation table, facade operations
//! - [`NationEvent`]: registry-level notifications with a synchronous
//!   publisher

pub mod country;
pub mod errors;
pub mod events;
pub mod registry;
pub mod templates;

pub use country::CountryCodes;
pub use errors::{NationError, NationResult};
pub use events::{EventPublisher, NationEvent, NationListener, RecordingListener};
pub use registry::{NationRecord, NationRegistry};
pub use templates::{
    CitizenshipTemplate, CommemorativeEditionTemplate, StateDepartmentTemplate, TemplateSet,
    VoterRegistrationTemplate,
};

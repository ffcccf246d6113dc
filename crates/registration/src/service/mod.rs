pub mod registration;
pub mod session_store;

pub use self::registration::{RegistrationService, RegistrationServiceDeps};
pub use self::session_store::{SessionStore, SharedFlow, run_session_sweeper};

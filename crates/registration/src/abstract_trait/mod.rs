mod member;
mod registration;

pub use self::member::{DynMemberCommandRepository, MemberCommandRepositoryTrait};
pub use self::registration::{DynRegistrationService, RegistrationServiceTrait};

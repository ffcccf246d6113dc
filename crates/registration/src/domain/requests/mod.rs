pub mod member;
pub mod session;

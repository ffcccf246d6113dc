pub mod catalog;
pub mod flow;
pub mod form;
pub mod notification;
pub mod phone;
pub mod requests;
pub mod response;
pub mod share;

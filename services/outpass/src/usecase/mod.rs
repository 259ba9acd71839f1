pub mod account;
pub mod notification;
pub mod outpass;
pub mod roster;

pub mod notifications;
pub mod outpasses;
pub mod users;

pub mod assignments;
pub mod core;
pub mod login;
pub mod roster;
pub mod subjects;

pub mod catalog;
pub mod laptop;
pub mod user;

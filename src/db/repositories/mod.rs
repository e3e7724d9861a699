pub mod business;
pub mod location;
pub mod weather;

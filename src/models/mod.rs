pub mod business;
pub mod location;
pub mod movie;
pub mod weather;

pub use business::Business;
pub use location::Location;
pub use movie::Movie;
pub use weather::Weather;

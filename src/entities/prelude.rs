pub use super::locations::Entity as Locations;
pub use super::weathers::Entity as Weathers;
pub use super::yelps::Entity as Yelps;

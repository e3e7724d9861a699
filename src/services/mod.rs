pub mod cache_aside;
pub use cache_aside::{CacheAside, Lookup, ResolveError, resolve};

pub mod location;
pub use location::LocationService;

pub mod weather;
pub use weather::WeatherService;

pub mod business;
pub use business::BusinessService;

pub mod movies;
pub use movies::MovieService;

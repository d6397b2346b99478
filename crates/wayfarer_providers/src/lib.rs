pub mod error;
pub mod mapbox;
pub mod routing_provider;

pub use error::RoutingError;
pub use mapbox::{MapboxClient, MapboxClientParams};
pub use routing_provider::RoutingProvider;

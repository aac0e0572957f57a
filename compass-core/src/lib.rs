pub mod cheapest;
pub mod opportunity;
pub mod registry;
pub mod segments;

pub use cheapest::resolve_cheapest;
pub use opportunity::cost_opportunity;
pub use registry::{Country, CountryRegistry, RosterError, UnknownCountryError};
pub use segments::{classify, relative_change, PriceSegment};

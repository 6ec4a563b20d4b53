mod dom;
mod error;
pub mod normalize;
pub mod sites;
mod static_selector;
mod weekday;

pub use error::Error;
pub use sites::Extractor;

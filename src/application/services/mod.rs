//! Application services
//!
//! Concrete services: the stateless layout pipeline and the file loader.
//! Only the loader touches I/O, through the `FileSystem` trait.

mod loader;
mod sunburst;

pub use loader::{DataLoader, Format};
pub use sunburst::SunburstService;

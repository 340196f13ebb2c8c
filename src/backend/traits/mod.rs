// ABOUTME: Composable capability traits for reaching the container tool.
// ABOUTME: Defines ContainerOps, ImageOps, LogOps, SystemOps, DnsOps and the FullBackend umbrella.

mod container;
mod dns;
mod image;
mod logs;
pub(crate) mod sealed;
mod system;

pub use container::ContainerOps;
pub use dns::DnsOps;
pub use image::ImageOps;
pub use logs::LogOps;
pub use system::SystemOps;

/// Every capability at once. Implemented automatically.
pub trait FullBackend: ContainerOps + ImageOps + LogOps + SystemOps + DnsOps {}

impl<T> FullBackend for T where T: ContainerOps + ImageOps + LogOps + SystemOps + DnsOps {}

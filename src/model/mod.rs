// ABOUTME: Domain records the bridge hands to its consumers.
// ABOUTME: Containers, images, system service state and log sources.

mod container;
mod image;
mod logs;
mod system;

pub use container::{Container, ContainerNetwork, ContainerStatus, Observed};
pub use image::ContainerImage;
pub use logs::{LogFilter, LogKind, LogQuery, LogSource};
pub use system::{DnsDomain, SystemInfo, SystemServiceStatus};

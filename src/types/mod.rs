// ABOUTME: Type-safe identifiers and validated values passed to the container tool.
// ABOUTME: Uses phantom types to prevent id confusion at compile time.

mod domain_name;
mod id;
mod image_ref;

pub use domain_name::{DomainName, DomainNameError};
pub use id::{ContainerId, Id, LogSourceId, SHORT_ID_LEN};
pub use image_ref::{DEFAULT_REGISTRY, DEFAULT_TAG, ImageRef, ParseImageRefError};

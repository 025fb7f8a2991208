//! Publishing: the per-project decision engine, the mirror-repository
//! publish procedure, and the production wiring between them.

pub mod engine;
pub mod mirror;
pub mod ops;

pub use engine::{publish_all_if_changed, publish_if_changed, PublishOps};
pub use mirror::{MirrorDir, MirrorPublisher, PublishReceipt, PublishStage, PACKAGE_REMOTE};
pub use ops::{GitPublishOps, PublishOptions};

//! 平台抽象 Trait

mod notifier;
mod save_repository;

pub use notifier::{DiscoveryNotifier, LogNotifier};
pub use save_repository::SaveRepository;

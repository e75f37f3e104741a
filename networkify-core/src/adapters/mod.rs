//! 内置仓库实现

mod memory;

pub use memory::InMemorySaveRepository;

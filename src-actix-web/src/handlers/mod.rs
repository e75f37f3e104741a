//! 请求处理模块

pub mod credential;
pub mod discovery;
pub mod health;
pub mod invoke;
pub mod records;
pub mod snapshot;

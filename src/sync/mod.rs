//! 同步原语模块
//!
//! 提供线程安全的同步原语，基于 embassy-sync 封装:
//! - `CriticalSignal`: 单值信号量
//! - `CriticalChannel`: 固定容量消息队列
//! - `AtomicCounter`: 无锁统计计数器

pub mod primitives;

pub use primitives::{AtomicCounter, CriticalChannel, CriticalSignal};

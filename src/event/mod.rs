//! 事件流水线核心
//!
//! 信号线边沿 → 中断入队 → 消费者出队 → 去抖 → 分发:
//! - `types`: 事件记录与源标识
//! - `queue`: 有界事件队列 (ISR 安全入队 / 任务阻塞出队)
//! - `debounce`: 按源去抖滤波器 (回绕安全)
//! - `dispatch`: 消费者单步处理逻辑
//! - `source`: 中断侧发送端能力句柄

pub mod debounce;
pub mod dispatch;
pub mod queue;
pub mod source;
pub mod types;

pub use debounce::{DebounceFilter, Decision};
pub use dispatch::{DispatchCounters, EventDispatcher, Outcome};
pub use queue::{EventQueue, QueueStats, RecvTimeout};
pub use source::EdgeSender;
pub use types::{EdgeEvent, SourceId};

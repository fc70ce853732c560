//! EdgeFlow - ESP32-S3 中断事件管道库
//!
//! 把信号线边沿变成任务可消费的事件流:
//! - 有界事件队列 (ISR 安全非阻塞入队 / 任务阻塞出队)
//! - 按源软件去抖 (消费者侧，tick 回绕安全)
//! - 事件分发、队列监视任务 (基于 Embassy)
//! - 条件编译日志系统

#![no_std]

pub mod event;
pub mod sync;
pub mod tasks;
pub mod util;

// ===== 重导出常用类型 =====
pub use event::{
    DebounceFilter,
    Decision,
    EdgeEvent,
    EdgeSender,
    EventDispatcher,
    EventQueue,
    Outcome,
    QueueStats,
    SourceId,
};
pub use sync::primitives::{AtomicCounter, CriticalChannel, CriticalSignal};

// ===== 版本信息 =====
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 系统配置常量
pub mod config {
    /// 事件队列深度
    pub const EVENT_QUEUE_DEPTH: usize = 10;

    /// 按键去抖窗口 (ms)
    pub const DEBOUNCE_MS: u64 = 30;

    /// 可跟踪的最大信号源数量 (必须是 2 的幂)
    pub const MAX_SOURCES: usize = 8;

    /// 边沿源任务实例上限
    pub const MAX_EDGE_SOURCES: usize = 4;

    /// 队列监视周期 (ms)
    pub const MONITOR_PERIOD_MS: u64 = 1000;

    /// BOOT 按键 GPIO 编号
    pub const BOOT_BUTTON_GPIO: u32 = 0;

    /// AUX 按键 GPIO 编号
    pub const AUX_BUTTON_GPIO: u32 = 4;
}

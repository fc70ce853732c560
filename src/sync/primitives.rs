//! 同步原语封装
//!
//! 基于 embassy-sync 提供的同步原语，统一使用 CriticalSectionRawMutex
//! 以确保在 ESP32-S3 单核/双核以及中断上下文下的正确性

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::Channel,
    signal::Signal,
};

// ===== 类型别名: 简化使用 =====

/// 临界区信号量 - 任务间单值通知
///
/// 发送方可以发送一个值，接收方异步等待；
/// 多次发送只保留最后一个值
///
/// # Example
/// ```ignore
/// static ACCEPTED: CriticalSignal<EdgeEvent> = CriticalSignal::new();
///
/// // 消费者侧
/// ACCEPTED.signal(event);
///
/// // 下游 (异步)
/// let event = ACCEPTED.wait().await;
/// ```
pub type CriticalSignal<T> = Signal<CriticalSectionRawMutex, T>;

/// 临界区通道 - 固定容量消息队列
///
/// 发送端提供中断安全的非阻塞 `try_send`，接收端异步阻塞等待。
/// 事件队列在其上封装投递统计。
///
/// # Type Parameters
/// * `T` - 消息类型
/// * `N` - 队列容量
pub type CriticalChannel<T, const N: usize> = Channel<CriticalSectionRawMutex, T, N>;

// ===== 同步工具函数 =====

/// 在临界区中执行闭包
///
/// 屏蔽中断确保原子性，只适用于非常短的操作
///
/// # Warning
/// 临界区内不能执行任何异步操作或长时间计算
#[inline]
pub fn with_critical_section<R, F>(f: F) -> R
where
    F: FnOnce(critical_section::CriticalSection) -> R,
{
    critical_section::with(f)
}

// ===== 优化的原子操作封装 =====

use portable_atomic::{AtomicU64, Ordering};

/// 原子计数器 - 投递统计
///
/// ISR 侧递增、任务侧读取，无锁
pub struct AtomicCounter {
    count: AtomicU64,
}

impl AtomicCounter {
    /// 创建新的计数器
    pub const fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
        }
    }

    /// 增加并返回新值
    #[inline(always)]
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 获取当前值
    #[inline(always)]
    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for AtomicCounter {
    fn default() -> Self {
        Self::new()
    }
}

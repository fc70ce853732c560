//! 有界事件队列
//!
//! ISR → 任务的单一共享通道: 生产者在中断上下文非阻塞入队，
//! 消费者任务阻塞出队。底层复用 embassy-sync 的临界区通道
//! (运行时提供的有界类型化队列原语)，在其上补充投递统计。
//!
//! 语义约定:
//! - 队列满时 `try_send` 返回 `false`，事件丢弃，中断上下文不重试
//! - 出队严格按入队到达顺序 (FIFO)，与生产者身份无关
//! - 入队成功会唤醒阻塞中的消费者; 在中断执行器上这会挂起对应的
//!   软件中断，由运行时在中断返回前完成抢占

use core::fmt;

use embassy_time::{with_timeout, Duration};

use crate::event::types::EdgeEvent;
use crate::sync::primitives::{AtomicCounter, CriticalChannel};

/// 限时出队超时
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecvTimeout;

impl fmt::Display for RecvTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "receive deadline elapsed")
    }
}

/// 队列投递统计快照
#[derive(Debug, Clone, Copy)]
pub struct QueueStats {
    /// 成功入队总数
    pub enqueued: u64,
    /// 队列满丢弃总数
    pub dropped: u64,
    /// 当前堆积深度
    pub depth: usize,
    /// 队列容量
    pub capacity: usize,
}

/// 有界事件队列
///
/// 所有中断源共享同一实例作为生产者，消费者任务是唯一出队方。
///
/// # Type Parameters
/// * `N` - 队列容量
///
/// # Example
/// ```ignore
/// static EVENT_QUEUE: EventQueue<10> = EventQueue::new();
///
/// // ISR 侧
/// EVENT_QUEUE.try_send(EdgeEvent::new(SourceId(0)));
///
/// // 消费者任务
/// let event = EVENT_QUEUE.recv().await;
/// ```
pub struct EventQueue<const N: usize> {
    channel: CriticalChannel<EdgeEvent, N>,
    enqueued: AtomicCounter,
    dropped: AtomicCounter,
}

impl<const N: usize> EventQueue<N> {
    /// 创建空队列 (静态分配友好)
    pub const fn new() -> Self {
        Self {
            channel: CriticalChannel::new(),
            enqueued: AtomicCounter::new(),
            dropped: AtomicCounter::new(),
        }
    }

    /// 非阻塞入队 (ISR 安全)
    ///
    /// 队列满返回 `false` 且队列不变; 成功时事件按到达顺序
    /// 对消费者可见，并唤醒阻塞中的消费者。
    /// 不阻塞、不分配，耗时有界。
    #[inline]
    pub fn try_send(&self, event: EdgeEvent) -> bool {
        match self.channel.try_send(event) {
            Ok(()) => {
                self.enqueued.increment();
                true
            }
            Err(_) => {
                self.dropped.increment();
                false
            }
        }
    }

    /// 阻塞出队 (无限等待)
    ///
    /// 挂起当前任务直到有事件可取，返回最早未投递的事件
    pub async fn recv(&self) -> EdgeEvent {
        self.channel.receive().await
    }

    /// 限时出队
    ///
    /// 截止时间内无事件返回 [`RecvTimeout`]，不改变队列状态
    pub async fn recv_deadline(&self, timeout: Duration) -> Result<EdgeEvent, RecvTimeout> {
        with_timeout(timeout, self.channel.receive())
            .await
            .map_err(|_| RecvTimeout)
    }

    /// 非阻塞出队 (监视/测试用)
    pub fn try_recv(&self) -> Option<EdgeEvent> {
        self.channel.try_receive().ok()
    }

    /// 当前堆积深度
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// 是否为空
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// 是否已满
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    /// 队列容量
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// 投递统计快照
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            enqueued: self.enqueued.get(),
            dropped: self.dropped.get(),
            depth: self.len(),
            capacity: N,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::types::SourceId;

    fn ev(n: u32) -> EdgeEvent {
        EdgeEvent::new(SourceId(n))
    }

    #[test]
    fn test_capacity_bound() {
        let queue: EventQueue<2> = EventQueue::new();

        assert!(queue.try_send(ev(1)));
        assert!(queue.try_send(ev(2)));

        // 满容量后入队立即失败，队列内容不变
        assert!(!queue.try_send(ev(3)));
        assert_eq!(queue.len(), 2);

        // 腾出空间后同一事件可再次入队
        assert_eq!(queue.try_recv(), Some(ev(1)));
        assert!(queue.try_send(ev(3)));

        let stats = queue.stats();
        assert_eq!(stats.enqueued, 3);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.capacity, 2);
    }

    #[test]
    fn test_fifo_across_producers() {
        let queue: EventQueue<8> = EventQueue::new();

        // 交错的多源入队，按到达顺序出队
        for n in [0, 4, 0, 7, 4] {
            assert!(queue.try_send(ev(n)));
        }
        for n in [0, 4, 0, 7, 4] {
            assert_eq!(queue.try_recv(), Some(ev(n)));
        }
        assert_eq!(queue.try_recv(), None);
    }

    #[test]
    fn test_single_event_delivered_exactly_once() {
        let queue: EventQueue<4> = EventQueue::new();

        assert!(queue.try_send(ev(9)));
        assert_eq!(queue.try_recv(), Some(ev(9)));

        // 无幻影事件
        assert_eq!(queue.try_recv(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_rejects_immediately() {
        let queue: EventQueue<1> = EventQueue::new();

        assert!(queue.try_send(ev(0)));
        // 生产者路径永不等待: 满即失败返回
        for _ in 0..100 {
            assert!(!queue.try_send(ev(0)));
        }
        assert_eq!(queue.stats().dropped, 100);
    }
}

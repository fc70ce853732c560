//! 中断侧事件源
//!
//! ISR 的全部工作就是构造事件记录并非阻塞入队，其余一概不做:
//! 不格式化、不等待、不分配。队列满即丢弃，溢出由队列统计计数。
//!
//! [`EdgeSender`] 在注册时把 (队列, 源标识) 绑定成一个能力句柄，
//! 替代裸函数指针 + 不透明参数的传统写法; 测试和仿真里可以直接
//! 驱动它，无需按键硬件。

use crate::event::queue::EventQueue;
use crate::event::types::{EdgeEvent, SourceId};

/// 边沿发送端
///
/// 绑定到具体队列与源的能力句柄，`Copy`，可安全地交给中断注册
#[derive(Clone, Copy)]
pub struct EdgeSender<const N: usize> {
    queue: &'static EventQueue<N>,
    source: SourceId,
}

impl<const N: usize> EdgeSender<N> {
    /// 绑定队列与源标识
    pub const fn bind(queue: &'static EventQueue<N>, source: SourceId) -> Self {
        Self { queue, source }
    }

    /// 绑定的源标识
    #[inline(always)]
    pub const fn source(&self) -> SourceId {
        self.source
    }

    /// 边沿触发入口 (ISR 安全)
    ///
    /// 返回事件是否入队成功; 失败即丢弃，中断上下文不能重试
    #[inline]
    pub fn on_edge(&self) -> bool {
        self.queue.try_send(EdgeEvent::new(self.source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_senders_share_one_queue() {
        static QUEUE: EventQueue<8> = EventQueue::new();

        let boot = EdgeSender::bind(&QUEUE, SourceId(0));
        let aux = EdgeSender::bind(&QUEUE, SourceId(4));

        // 交错触发，按到达顺序投递
        assert!(boot.on_edge());
        assert!(aux.on_edge());
        assert!(boot.on_edge());

        assert_eq!(QUEUE.try_recv(), Some(EdgeEvent::new(SourceId(0))));
        assert_eq!(QUEUE.try_recv(), Some(EdgeEvent::new(SourceId(4))));
        assert_eq!(QUEUE.try_recv(), Some(EdgeEvent::new(SourceId(0))));
    }

    #[test]
    fn test_overflow_is_silent_drop() {
        static QUEUE: EventQueue<2> = EventQueue::new();

        let sender = EdgeSender::bind(&QUEUE, SourceId(0));

        assert!(sender.on_edge());
        assert!(sender.on_edge());
        // 队列满: 立即返回失败，不等待
        assert!(!sender.on_edge());
        assert_eq!(QUEUE.stats().dropped, 1);
    }
}

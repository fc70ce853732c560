//! 事件分发
//!
//! 消费者的单步处理逻辑: 查源注册表 → 去抖 → 产出分发结果。
//! 与任务框架解耦，可以在宿主机上直接测试。
//!
//! 未注册的源只计数告警，不进入去抖跟踪 (下游无人消费它们)，
//! 也绝不中断消费者循环。

use heapless::FnvIndexMap;

use crate::event::debounce::{DebounceFilter, Decision};
use crate::event::types::{EdgeEvent, SourceId};

/// 单个事件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 已接受，交给下游分发
    Accepted {
        /// 注册时绑定的源名称
        label: &'static str,
    },
    /// 去抖拒绝，事件丢弃，去抖状态不变
    Debounced,
    /// 未注册的源，仅告警
    Unknown,
}

/// 处理计数
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchCounters {
    /// 接受并分发的事件数
    pub accepted: u64,
    /// 去抖丢弃的事件数
    pub debounced: u64,
    /// 未注册源的事件数
    pub unknown: u64,
}

/// 事件分发器
///
/// 由消费者任务独占持有: 源注册表与去抖状态都不跨上下文共享，
/// 不需要任何锁。
///
/// # Type Parameters
/// * `SOURCES` - 注册表/源表容量 (必须是 2 的幂)
pub struct EventDispatcher<const SOURCES: usize> {
    /// 已注册源 → 名称
    registry: FnvIndexMap<u32, &'static str, SOURCES>,
    filter: DebounceFilter<SOURCES>,
    counters: DispatchCounters,
}

impl<const SOURCES: usize> EventDispatcher<SOURCES> {
    /// 创建分发器，`debounce_ticks` 为去抖窗口 (tick)
    pub fn new(debounce_ticks: u64) -> Self {
        Self {
            registry: FnvIndexMap::new(),
            filter: DebounceFilter::new(debounce_ticks),
            counters: DispatchCounters::default(),
        }
    }

    /// 注册一个信号源
    ///
    /// 返回 `false` 表示注册表已满，该源会按未知源处理
    pub fn register(&mut self, source: SourceId, label: &'static str) -> bool {
        self.registry.insert(source.0, label).is_ok()
    }

    /// 已注册的源数量
    pub fn registered_sources(&self) -> usize {
        self.registry.len()
    }

    /// 处理计数快照
    pub fn counters(&self) -> DispatchCounters {
        self.counters
    }

    /// 处理一个事件
    ///
    /// `now_ticks` 为消费者出队时刻的单调 tick
    pub fn process(&mut self, event: EdgeEvent, now_ticks: u64) -> Outcome {
        let label = match self.registry.get(&event.source.0) {
            Some(label) => *label,
            None => {
                self.counters.unknown += 1;
                return Outcome::Unknown;
            }
        };

        // 只有注册过的源进入去抖; 注册表与源表同容量，
        // 所以 AcceptUntracked 在这里实际不可达
        match self.filter.check(event.source, now_ticks) {
            Decision::Accept | Decision::AcceptUntracked => {
                self.counters.accepted += 1;
                Outcome::Accepted { label }
            }
            Decision::Reject => {
                self.counters.debounced += 1;
                Outcome::Debounced
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(n: u32) -> EdgeEvent {
        EdgeEvent::new(SourceId(n))
    }

    fn dispatcher() -> EventDispatcher<4> {
        let mut d = EventDispatcher::new(30);
        assert!(d.register(SourceId(0), "BUTTON 1 (BOOT)"));
        assert!(d.register(SourceId(4), "BUTTON 2 (AUX)"));
        d
    }

    #[test]
    fn test_unknown_source_warns_and_continues() {
        let mut d = dispatcher();

        assert_eq!(d.process(ev(99), 0), Outcome::Unknown);
        // 后续事件正常处理
        assert_eq!(
            d.process(ev(0), 1),
            Outcome::Accepted { label: "BUTTON 1 (BOOT)" }
        );

        let c = d.counters();
        assert_eq!(c.unknown, 1);
        assert_eq!(c.accepted, 1);
    }

    #[test]
    fn test_debounce_applied_per_source() {
        let mut d = dispatcher();

        assert!(matches!(d.process(ev(0), 0), Outcome::Accepted { .. }));
        assert_eq!(d.process(ev(0), 10), Outcome::Debounced);
        // 另一源独立判定
        assert!(matches!(d.process(ev(4), 10), Outcome::Accepted { .. }));

        let c = d.counters();
        assert_eq!(c.accepted, 2);
        assert_eq!(c.debounced, 1);
    }

    #[test]
    fn test_unknown_source_not_tracked() {
        let mut d = dispatcher();

        // 未注册源不占用去抖表
        for t in 0..8 {
            assert_eq!(d.process(ev(50 + t as u32), t), Outcome::Unknown);
        }
        assert!(matches!(d.process(ev(0), 100), Outcome::Accepted { .. }));
        assert_eq!(d.counters().unknown, 8);
    }

    #[test]
    fn test_registry_capacity() {
        let mut d: EventDispatcher<2> = EventDispatcher::new(30);

        assert!(d.register(SourceId(1), "A"));
        assert!(d.register(SourceId(2), "B"));
        assert!(!d.register(SourceId(3), "C"));

        // 注册失败的源按未知源处理
        assert_eq!(d.process(ev(3), 0), Outcome::Unknown);
    }
}

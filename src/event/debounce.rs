//! 按源去抖滤波器
//!
//! 每个信号源记录一次"最近接受"时刻 (tick)。同一源两次接受之间
//! 至少间隔配置的去抖窗口; 被拒绝的事件不更新记录。滤波器只在
//! 消费者任务内被访问，无需加锁。
//!
//! tick 比较使用无符号回绕减法 (`wrapping_sub`)，计数器溢出后依然
//! 正确分类。回绕边界上的歧义差值 (最大可表示差值) 按"已超过窗口"
//! 处理。

use heapless::FnvIndexMap;

use crate::event::types::SourceId;

/// 去抖判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 接受，该源记录已更新
    Accept,
    /// 接受，但源表已满，该源不被跟踪
    AcceptUntracked,
    /// 拒绝 (距上次接受不足去抖窗口)，记录不变
    Reject,
}

impl Decision {
    /// 是否接受 (含未跟踪接受)
    #[inline(always)]
    pub fn is_accept(&self) -> bool {
        !matches!(self, Decision::Reject)
    }
}

/// 按源去抖滤波器
///
/// # Type Parameters
/// * `SOURCES` - 可跟踪的最大源数量 (必须是 2 的幂)
pub struct DebounceFilter<const SOURCES: usize> {
    /// 每源最近一次接受的 tick
    last_accepted: FnvIndexMap<u32, u64, SOURCES>,
    /// 去抖窗口 (tick)
    interval_ticks: u64,
}

impl<const SOURCES: usize> DebounceFilter<SOURCES> {
    /// 创建滤波器，窗口以 tick 为单位
    pub fn new(interval_ticks: u64) -> Self {
        Self {
            last_accepted: FnvIndexMap::new(),
            interval_ticks,
        }
    }

    /// 去抖窗口 (tick)
    pub fn interval_ticks(&self) -> u64 {
        self.interval_ticks
    }

    /// 当前被跟踪的源数量
    pub fn tracked_sources(&self) -> usize {
        self.last_accepted.len()
    }

    /// 判定一次事件
    ///
    /// 接受条件: 该源无历史记录，或 `now - last >= interval`
    /// (回绕安全减法)。拒绝时记录不变，事件由调用方丢弃。
    pub fn check(&mut self, source: SourceId, now_ticks: u64) -> Decision {
        if let Some(last) = self.last_accepted.get_mut(&source.0) {
            if now_ticks.wrapping_sub(*last) >= self.interval_ticks {
                *last = now_ticks;
                Decision::Accept
            } else {
                Decision::Reject
            }
        } else if self.last_accepted.insert(source.0, now_ticks).is_ok() {
            Decision::Accept
        } else {
            // 源表满: 事件照常放行，只是该源无法被去抖跟踪
            Decision::AcceptUntracked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试用去抖窗口 (tick)
    const D: u64 = 30;

    #[test]
    fn test_debounce_window() {
        let mut filter: DebounceFilter<4> = DebounceFilter::new(D);
        let s = SourceId(0);

        assert_eq!(filter.check(s, 0), Decision::Accept);
        assert_eq!(filter.check(s, 10), Decision::Reject);
        // 拒绝不更新记录: 35 与 0 比较，而不是与 10
        assert_eq!(filter.check(s, 35), Decision::Accept);
    }

    #[test]
    fn test_exact_interval_is_accepted() {
        let mut filter: DebounceFilter<4> = DebounceFilter::new(D);
        let s = SourceId(1);

        assert_eq!(filter.check(s, 100), Decision::Accept);
        assert_eq!(filter.check(s, 100 + D - 1), Decision::Reject);
        // 间隔恰好等于窗口: 接受
        assert_eq!(filter.check(s, 100 + D), Decision::Accept);
    }

    #[test]
    fn test_sources_are_independent() {
        let mut filter: DebounceFilter<4> = DebounceFilter::new(D);

        // S1@0 接受, S2@0 独立接受, S1@5 拒绝
        assert_eq!(filter.check(SourceId(0), 0), Decision::Accept);
        assert_eq!(filter.check(SourceId(4), 0), Decision::Accept);
        assert_eq!(filter.check(SourceId(0), 5), Decision::Reject);

        // S2 的历史不受 S1 影响
        assert_eq!(filter.check(SourceId(4), 40), Decision::Accept);
        assert_eq!(filter.tracked_sources(), 2);
    }

    #[test]
    fn test_tick_wraparound() {
        let mut filter: DebounceFilter<4> = DebounceFilter::new(D);
        let s = SourceId(2);

        assert_eq!(filter.check(s, u64::MAX - 9), Decision::Accept);
        // 回绕后实际间隔 19 tick < 30: 拒绝
        assert_eq!(filter.check(s, 9), Decision::Reject);
        // 回绕后实际间隔恰好 30 tick: 接受
        assert_eq!(filter.check(s, 20), Decision::Accept);
    }

    #[test]
    fn test_ambiguous_boundary_counts_as_elapsed() {
        let mut filter: DebounceFilter<4> = DebounceFilter::new(D);
        let s = SourceId(3);

        // 回绕差值为最大可表示值时按"已超过窗口"处理
        assert_eq!(filter.check(s, 1), Decision::Accept);
        assert_eq!(filter.check(s, 0), Decision::Accept);
    }

    #[test]
    fn test_table_overflow_still_accepts() {
        let mut filter: DebounceFilter<2> = DebounceFilter::new(D);

        assert_eq!(filter.check(SourceId(0), 0), Decision::Accept);
        assert_eq!(filter.check(SourceId(1), 0), Decision::Accept);
        // 第三个源放不进表: 放行但不跟踪
        assert_eq!(filter.check(SourceId(2), 0), Decision::AcceptUntracked);

        // 已跟踪的源不受影响
        assert_eq!(filter.check(SourceId(0), 5), Decision::Reject);
    }
}

//! 事件消费者任务
//!
//! 流水线的唯一出队方。两个状态往复: 阻塞等待下一个事件 (无限期)，
//! 出队后打上当前 tick 交给分发器去抖并分发，然后回到等待。
//! 任务没有终止状态，随系统运行终身。
//!
//! 被接受的事件除了日志输出，还通过 [`ACCEPTED`] 信号广播给
//! 下游 (示例里用来驱动 LED)。

use embassy_time::Instant;

use crate::config;
use crate::event::dispatch::{EventDispatcher, Outcome};
use crate::event::queue::EventQueue;
use crate::event::types::EdgeEvent;
use crate::sync::primitives::CriticalSignal;
use crate::util::log::*;

// ===== 下游通知 =====
/// 最近一次被接受的事件
pub static ACCEPTED: CriticalSignal<EdgeEvent> = CriticalSignal::new();

/// 等待下一个被接受的事件
///
/// 异步等待，不会阻塞其他任务
pub async fn wait_accepted() -> EdgeEvent {
    ACCEPTED.wait().await
}

// ===== 消费者任务 =====
/// 事件消费者任务
///
/// 去抖状态随分发器为任务独占，无需加锁。丢弃 (溢出或去抖)
/// 的事件不重试: 这是尽力而为的投递通道，不是可靠日志。
#[embassy_executor::task]
pub async fn consumer_task(
    queue: &'static EventQueue<{ config::EVENT_QUEUE_DEPTH }>,
    mut dispatcher: EventDispatcher<{ config::MAX_SOURCES }>,
) {
    log_info!(
        "Event consumer started (queue depth {}, {} sources)",
        queue.capacity(),
        dispatcher.registered_sources()
    );

    loop {
        // 阻塞点: 等待中断侧入队
        let event = queue.recv().await;
        let now = Instant::now().as_ticks();

        match dispatcher.process(event, now) {
            Outcome::Accepted { label } => {
                log_info!("{} pressed on GPIO {}", label, event.source.0);
                ACCEPTED.signal(event);
            }
            Outcome::Debounced => {
                log_debug!("Bounce ignored on GPIO {}", event.source.0);
            }
            Outcome::Unknown => {
                log_warn!("Unexpected event on GPIO {}", event.source.0);
            }
        }
    }
}

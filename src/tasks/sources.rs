//! 边沿信号源任务
//!
//! 把一条 GPIO 输入线变成事件源: 等待下降沿 (按键按下，低有效)，
//! 每个边沿只做一次入队，其余一概不做。去抖统一放在消费者侧，
//! 这里不做任何过滤。

use embedded_hal_async::digital::Wait;
use esp_hal::gpio::Input;

use crate::config;
use crate::event::source::EdgeSender;
use crate::util::log::*;

/// 边沿等待循环 (硬件无关)
///
/// 对任何实现 [`Wait`] 的输入线有效，仿真可以换成软件引脚
pub async fn run_edge_source<P: Wait>(
    pin: &mut P,
    sender: EdgeSender<{ config::EVENT_QUEUE_DEPTH }>,
) -> ! {
    loop {
        if pin.wait_for_falling_edge().await.is_err() {
            // esp-hal 的 Input 不会走到这里 (Error = Infallible)
            log_error!("Edge wait failed on GPIO {}", sender.source().0);
            continue;
        }

        // 队列满即静默丢弃，溢出在队列统计中可见
        sender.on_edge();
    }
}

/// GPIO 边沿源任务
///
/// 每条按键线一个实例，共享同一事件队列
#[embassy_executor::task(pool_size = crate::config::MAX_EDGE_SOURCES)]
pub async fn edge_source_task(
    mut pin: Input<'static>,
    sender: EdgeSender<{ config::EVENT_QUEUE_DEPTH }>,
) {
    log_info!("Edge source task started (GPIO {})", sender.source().0);

    run_edge_source(&mut pin, sender).await
}

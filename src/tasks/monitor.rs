//! 队列监视任务
//!
//! 只观察不收发: 周期性读取队列统计快照并输出，用于判断
//! 生产/消费速率是否匹配 (一直满? 一直空? 丢了多少?)。
//! 运行在最低优先级，观察本身不干扰投递路径。

use embassy_time::{Duration, Ticker};

use crate::config;
use crate::event::queue::EventQueue;
use crate::util::log::*;

/// 队列监视任务
#[embassy_executor::task]
pub async fn monitor_task(queue: &'static EventQueue<{ config::EVENT_QUEUE_DEPTH }>) {
    log_info!("Queue monitor started");

    let mut ticker = Ticker::every(Duration::from_millis(config::MONITOR_PERIOD_MS));

    loop {
        ticker.next().await;

        let stats = queue.stats();
        log_info!(
            "Queue: {}/{} waiting, {} enqueued, {} dropped",
            stats.depth,
            stats.capacity,
            stats.enqueued,
            stats.dropped
        );
    }
}

//! EdgeFlow - 双按键中断事件管道固件
//!
//! 两个按键共享同一条事件队列和同一个消费者:
//! - BOOT (GPIO0) / AUX (GPIO4)，低有效，内部上拉
//! - 边沿源任务等待下降沿，事件入队 (队列满即丢弃)
//! - 消费者任务出队、按源去抖 (30ms)、输出按键日志
//! - 监视任务每秒输出队列统计
//!
//! 硬件目标: ESP32-S3-N16R8 (双核 Xtensa LX7 @ 240MHz)

#![no_std]
#![no_main]

esp_bootloader_esp_idf::esp_app_desc!();

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_hal::{
    gpio::{Input, InputConfig, Pull},
    interrupt::{software::SoftwareInterruptControl, Priority},
    timer::timg::TimerGroup,
};
use esp_rtos::embassy::InterruptExecutor;
use static_cell::StaticCell;

use edgeflow::config;
use edgeflow::event::{EdgeSender, EventDispatcher, EventQueue, SourceId};
use edgeflow::tasks::{consumer::consumer_task, monitor::monitor_task, sources::edge_source_task};
use edgeflow::util::log::*;

// ===== Panic Handler =====
#[cfg(feature = "dev")]
use esp_backtrace as _;

#[cfg(not(feature = "dev"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop { core::hint::spin_loop(); }
}

// ===== 静态分配 =====
/// 事件队列: 所有中断源共享，消费者是唯一出队方
static EVENT_QUEUE: EventQueue<{ config::EVENT_QUEUE_DEPTH }> = EventQueue::new();

/// 高优先级执行器 - 边沿源任务
static EDGE_EXECUTOR: StaticCell<InterruptExecutor<2>> = StaticCell::new();

/// 中优先级执行器 - 事件消费者
static CONSUMER_EXECUTOR: StaticCell<InterruptExecutor<1>> = StaticCell::new();

// ===== 主入口点 =====
#[esp_rtos::main]
async fn main(low_prio_spawner: Spawner) {
    // ========================================
    // 1. 硬件初始化
    // ========================================
    let peripherals = esp_hal::init(esp_hal::Config::default());

    log_info!("{} v{} starting on ESP32-S3", edgeflow::NAME, edgeflow::VERSION);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // ========================================
    // 2. 按键输入 (低有效，内部上拉，下降沿 = 按下)
    // ========================================
    let pull_up = InputConfig::default().with_pull(Pull::Up);
    let boot_button = Input::new(peripherals.GPIO0, pull_up);
    let aux_button = Input::new(peripherals.GPIO4, pull_up);

    // ========================================
    // 3. 事件分发器: 源注册表 + 去抖窗口
    // ========================================
    let debounce_ticks = Duration::from_millis(config::DEBOUNCE_MS).as_ticks();
    let mut dispatcher: EventDispatcher<{ config::MAX_SOURCES }> =
        EventDispatcher::new(debounce_ticks);
    dispatcher.register(SourceId(config::BOOT_BUTTON_GPIO), "BUTTON 1 (BOOT)");
    dispatcher.register(SourceId(config::AUX_BUTTON_GPIO), "BUTTON 2 (AUX)");

    // ========================================
    // 4. 软件中断 + 多优先级执行器
    // ========================================
    let sw_ints = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);

    // 边沿源任务: 高优先级，保证边沿到入队的延迟最小
    let edge_executor = EDGE_EXECUTOR.init(InterruptExecutor::new(sw_ints.software_interrupt2));
    let edge_spawner = edge_executor.start(Priority::Priority3);

    edge_spawner.must_spawn(edge_source_task(
        boot_button,
        EdgeSender::bind(&EVENT_QUEUE, SourceId(config::BOOT_BUTTON_GPIO)),
    ));
    edge_spawner.must_spawn(edge_source_task(
        aux_button,
        EdgeSender::bind(&EVENT_QUEUE, SourceId(config::AUX_BUTTON_GPIO)),
    ));

    // 消费者: 中优先级，入队唤醒后抢占低优先级任务
    let consumer_executor =
        CONSUMER_EXECUTOR.init(InterruptExecutor::new(sw_ints.software_interrupt1));
    let consumer_spawner = consumer_executor.start(Priority::Priority2);

    consumer_spawner.must_spawn(consumer_task(&EVENT_QUEUE, dispatcher));

    // 监视任务: 主执行器 (最低优先级)
    low_prio_spawner.must_spawn(monitor_task(&EVENT_QUEUE));

    log_info!(
        "Listening on GPIO {} and GPIO {}",
        config::BOOT_BUTTON_GPIO,
        config::AUX_BUTTON_GPIO
    );

    // ========================================
    // 5. 主循环 - 心跳
    // ========================================
    let mut tick_count: u64 = 0;

    loop {
        tick_count += 1;

        // 每 10 秒输出一次心跳
        if tick_count % 10 == 0 {
            log_info!("System heartbeat: {} ticks", tick_count);
        }

        Timer::after(Duration::from_secs(1)).await;
    }
}

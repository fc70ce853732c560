//! 仿真信号源示例 - 无需按键硬件
//!
//! 用任务直接驱动 `EdgeSender` 模拟中断边沿:
//! - 突发连续边沿 (模拟抖动的一次按压) 演示去抖
//! - 超过队列容量的突发演示溢出丢弃
//! - 未注册源演示消费者的告警路径
//! - 消费者使用限时出队，空队列时打印提示
//!
//! # 运行
//! ```bash
//! cargo run --example simulated_sources --features dev --target xtensa-esp32s3-none-elf
//! ```

#![no_std]
#![no_main]

esp_bootloader_esp_idf::esp_app_desc!();

use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Timer};
use esp_hal::timer::timg::TimerGroup;

use edgeflow::config;
use edgeflow::event::{EdgeSender, EventDispatcher, EventQueue, Outcome, SourceId};
use edgeflow::sync::primitives::with_critical_section;
use edgeflow::tasks::monitor::monitor_task;

// ===== 条件编译日志 =====
#[cfg(feature = "dev")]
use esp_println::println;

#[cfg(not(feature = "dev"))]
macro_rules! println {
    ($($arg:tt)*) => {};
}

// ===== Panic Handler =====
#[cfg(feature = "dev")]
use esp_backtrace as _;

#[cfg(not(feature = "dev"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop { core::hint::spin_loop(); }
}

// ===== 静态分配 =====
static EVENT_QUEUE: EventQueue<{ config::EVENT_QUEUE_DEPTH }> = EventQueue::new();

/// 仿真抖动生产者
///
/// 在临界区内连续触发 `burst` 次边沿再休眠。临界区内消费者
/// 无法抢占，时序与真实 ISR 的突发一致: 去抖应只放行第一条，
/// 超过队列容量的部分直接丢弃。
#[embassy_executor::task(pool_size = 2)]
async fn bouncy_producer_task(
    sender: EdgeSender<{ config::EVENT_QUEUE_DEPTH }>,
    period_ms: u64,
    burst: usize,
) {
    println!("Producer started (GPIO {}, burst {})", sender.source().0, burst);

    loop {
        with_critical_section(|_| {
            for _ in 0..burst {
                sender.on_edge();
            }
        });
        Timer::after(Duration::from_millis(period_ms)).await;
    }
}

/// 未注册源生产者
#[embassy_executor::task]
async fn rogue_producer_task(sender: EdgeSender<{ config::EVENT_QUEUE_DEPTH }>) {
    loop {
        Timer::after(Duration::from_secs(5)).await;
        sender.on_edge();
    }
}

/// 限时出队消费者
///
/// 与固件消费者不同，这里用 500ms 截止时间演示超时分支
#[embassy_executor::task]
async fn timed_consumer_task(mut dispatcher: EventDispatcher<{ config::MAX_SOURCES }>) {
    println!("Timed consumer started");

    loop {
        match EVENT_QUEUE.recv_deadline(Duration::from_millis(500)).await {
            Ok(event) => {
                let now = Instant::now().as_ticks();
                match dispatcher.process(event, now) {
                    Outcome::Accepted { label } => {
                        println!("[Consumer] {} (GPIO {})", label, event.source.0);
                    }
                    Outcome::Debounced => {
                        println!("[Consumer] bounce ignored on GPIO {}", event.source.0);
                    }
                    Outcome::Unknown => {
                        println!("[Consumer] unexpected GPIO {}", event.source.0);
                    }
                }
            }
            Err(_) => {
                println!("[Consumer] queue empty, nothing to receive");
            }
        }
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default());

    println!("Simulated Sources Example");
    println!("=========================");

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let debounce_ticks = Duration::from_millis(config::DEBOUNCE_MS).as_ticks();
    let mut dispatcher: EventDispatcher<{ config::MAX_SOURCES }> =
        EventDispatcher::new(debounce_ticks);
    dispatcher.register(SourceId(config::BOOT_BUTTON_GPIO), "BUTTON 1 (BOOT)");
    dispatcher.register(SourceId(config::AUX_BUTTON_GPIO), "BUTTON 2 (AUX)");

    // GPIO0: 每 200ms 一次 3 连抖按压 (去抖应只放行第一条)
    spawner.must_spawn(bouncy_producer_task(
        EdgeSender::bind(&EVENT_QUEUE, SourceId(config::BOOT_BUTTON_GPIO)),
        200,
        3,
    ));

    // GPIO4: 每秒一次超过队列容量的突发 (演示溢出丢弃)
    spawner.must_spawn(bouncy_producer_task(
        EdgeSender::bind(&EVENT_QUEUE, SourceId(config::AUX_BUTTON_GPIO)),
        1000,
        15,
    ));

    // GPIO99: 未注册源，消费者只告警
    spawner.must_spawn(rogue_producer_task(EdgeSender::bind(
        &EVENT_QUEUE,
        SourceId(99),
    )));

    spawner.must_spawn(timed_consumer_task(dispatcher));
    spawner.must_spawn(monitor_task(&EVENT_QUEUE));

    loop {
        Timer::after(Duration::from_secs(10)).await;
    }
}

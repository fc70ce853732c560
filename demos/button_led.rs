//! 按键 LED 示例 - 事件管道驱动 LED
//!
//! 演示完整的 边沿 → 队列 → 消费者 → 下游 流水线:
//! - 双按键 (GPIO0/GPIO4) 共享一条事件队列
//! - 消费者去抖后通过 ACCEPTED 信号广播
//! - LED 任务空闲时慢闪，收到接受事件立即翻转
//!
//! # 运行
//! ```bash
//! cargo run --example button_led --features dev --target xtensa-esp32s3-none-elf
//! ```

#![no_std]
#![no_main]

esp_bootloader_esp_idf::esp_app_desc!();

use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};
use esp_hal::{
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    timer::timg::TimerGroup,
};

use edgeflow::config;
use edgeflow::event::{EdgeSender, EventDispatcher, EventQueue, SourceId};
use edgeflow::tasks::consumer::{consumer_task, wait_accepted};
use edgeflow::tasks::monitor::monitor_task;
use edgeflow::tasks::sources::edge_source_task;

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

/// LED 任务
///
/// 空闲时慢闪表示系统存活; 每个被接受的按键事件立即翻转 LED
#[embassy_executor::task]
async fn led_task(mut led: Output<'static>) {
    println!("LED task started");

    let mut led_on = false;

    loop {
        match select(Timer::after(Duration::from_millis(500)), wait_accepted()).await {
            Either::First(_) => {
                // 空闲慢闪
                led_on = !led_on;
            }
            Either::Second(event) => {
                led_on = !led_on;
                println!("LED toggled by GPIO {}", event.source.0);
            }
        }

        if led_on {
            led.set_high();
        } else {
            led.set_low();
        }
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default());

    println!("Button LED Example");
    println!("==================");

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // 按键输入 (低有效，内部上拉)
    let pull_up = InputConfig::default().with_pull(Pull::Up);
    let boot_button = Input::new(peripherals.GPIO0, pull_up);
    let aux_button = Input::new(peripherals.GPIO4, pull_up);

    // 板载 LED
    let led = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());

    // 分发器: 30ms 去抖窗口
    let debounce_ticks = Duration::from_millis(config::DEBOUNCE_MS).as_ticks();
    let mut dispatcher: EventDispatcher<{ config::MAX_SOURCES }> =
        EventDispatcher::new(debounce_ticks);
    dispatcher.register(SourceId(config::BOOT_BUTTON_GPIO), "BUTTON 1 (BOOT)");
    dispatcher.register(SourceId(config::AUX_BUTTON_GPIO), "BUTTON 2 (AUX)");

    // 启动流水线
    spawner.must_spawn(edge_source_task(
        boot_button,
        EdgeSender::bind(&EVENT_QUEUE, SourceId(config::BOOT_BUTTON_GPIO)),
    ));
    spawner.must_spawn(edge_source_task(
        aux_button,
        EdgeSender::bind(&EVENT_QUEUE, SourceId(config::AUX_BUTTON_GPIO)),
    ));
    spawner.must_spawn(consumer_task(&EVENT_QUEUE, dispatcher));
    spawner.must_spawn(monitor_task(&EVENT_QUEUE));
    spawner.must_spawn(led_task(led));

    println!("Press BOOT (GPIO0) or AUX (GPIO4) to toggle the LED");

    loop {
        Timer::after(Duration::from_secs(10)).await;
    }
}

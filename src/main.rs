#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rtic::app;

mod board;

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use crate::board::{
        EchoInput, EchoPort, EchoTimer, LogSink, SevenSegment, Sink, TickHw, Trigger,
    };
    use embedded_hal::spi::MODE_0;
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::{ExtU32, RateExtU32},
        sio::Sio,
        spi::Spi,
        timer::{Alarm, Alarm0, Timer},
        watchdog::Watchdog,
    };
    use ultrasonic_clock::{
        config::{reload_period_us, DisplayMode, DISPLAY_MODE, TICK_RELOAD, TICK_TIMER_PRESCALER},
        Distance, EchoCapture, NullSink, Row, TickScheduler, TriggerPulse,
    };

    // Shared between the echo and tick interrupts, accessed through `lock`
    #[shared]
    struct Shared {
        distance: Distance,
        echo_timer: EchoTimer,
    }

    #[local]
    struct Local {
        echo: EchoCapture,
        echo_input: EchoInput,
        scheduler: TickScheduler,
        trigger: Trigger,
        alarm: Alarm0,
        sink: Sink,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = timer.alarm_0().unwrap();
        let period = reload_period_us(TICK_RELOAD, TICK_TIMER_PRESCALER);
        alarm.schedule(period.micros()).unwrap();
        alarm.enable_interrupt();

        // Cycle-exact busy wait for the trigger pulse
        let delay = cortex_m::delay::Delay::new(ctx.core.SYST, clocks.system_clock.freq().to_Hz());
        let trigger = TriggerPulse::new(pins.gpio14.into_push_pull_output(), delay).unwrap();
        let echo_input = EchoInput::new(pins.gpio15.into_pull_down_input());

        let sink = match DISPLAY_MODE {
            DisplayMode::SevenSegment => {
                let mosi = pins.gpio19.into_function::<rp_pico::hal::gpio::FunctionSpi>();
                let sck = pins.gpio18.into_function::<rp_pico::hal::gpio::FunctionSpi>();
                let miso = pins.gpio16.into_function::<rp_pico::hal::gpio::FunctionSpi>();
                let cs = pins.gpio17.into_push_pull_output();

                let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, miso, sck));
                let spi = spi.init(
                    &mut pac.RESETS,
                    clocks.peripheral_clock.freq(),
                    2_000_000u32.Hz(),
                    &MODE_0,
                );
                Sink::SevenSegment(SevenSegment::new(spi, cs).unwrap())
            }
            DisplayMode::Log => Sink::Log(LogSink),
            DisplayMode::Off => Sink::Off(NullSink),
        };

        defmt::info!(
            "ultrasonic clock: tick reload {=u16:#x} ({=u32} us), display {}",
            TICK_RELOAD,
            period,
            DISPLAY_MODE
        );

        (
            Shared {
                distance: Distance::NO_ECHO,
                echo_timer: EchoTimer::new(timer),
            },
            Local {
                echo: EchoCapture::new(),
                echo_input,
                scheduler: TickScheduler::new(),
                trigger,
                alarm,
                sink,
            },
            init::Monotonics(),
        )
    }

    // All work happens in the two interrupts
    #[idle]
    fn idle(_: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }

    // Hardware Task: echo edge, highest priority
    #[task(binds = IO_IRQ_BANK0, priority = 2, shared = [distance, echo_timer], local = [echo, echo_input])]
    fn echo_edge(ctx: echo_edge::Context) {
        let echo = ctx.local.echo;
        let input = ctx.local.echo_input;

        (ctx.shared.echo_timer, ctx.shared.distance).lock(|timer, distance| {
            let mut port = EchoPort::new(input, timer);
            echo.on_capture_edge(&mut port, |d| *distance = d);
        });
    }

    // Hardware Task: 100 ms tick, preempted by echo_edge
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [distance, echo_timer], local = [scheduler, trigger, alarm, sink])]
    fn tick(ctx: tick::Context) {
        let scheduler = ctx.local.scheduler;
        let mut ports = TickHw {
            alarm: ctx.local.alarm,
            distance: ctx.shared.distance,
            echo_timer: ctx.shared.echo_timer,
        };

        match scheduler.on_tick(&mut ports, ctx.local.sink, ctx.local.trigger) {
            Ok(report) => {
                if report.second_elapsed {
                    defmt::debug!("{}", scheduler.line(Row::Clock));
                }
                if report.sink_failed {
                    defmt::warn!("display write failed");
                }
            }
            Err(_) => defmt::warn!("trigger pin error"),
        }
    }
}

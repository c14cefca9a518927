#![no_std]
#![no_main]

use ds1315::{DS1315, InOutPin};
use embedded_hal::digital::PinState;
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    delay::Delay,
    gpio::{Flex, Level, Output, OutputConfig, Pull},
    main,
    time::{Duration, Instant},
};
use log::info;

/// Adapts an esp-hal `Flex` pin to the driver's bidirectional data pin.
struct FlexDataPin<'d> {
    pin: Flex<'d>,
}

impl InOutPin for FlexDataPin<'_> {
    type Error = core::convert::Infallible;

    fn set_input(&mut self) -> Result<(), Self::Error> {
        self.pin.set_input_enable(true);
        self.pin.set_output_enable(false);
        Ok(())
    }

    fn set_output(&mut self) -> Result<(), Self::Error> {
        self.pin.set_output_enable(true);
        Ok(())
    }

    fn write(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.pin.set_level(Level::from(state == PinState::High));
        Ok(())
    }

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.is_high())
    }
}

#[main]
fn main() -> ! {
    // Initialize logger
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("DS1315 Read Example Starting...");

    // Control lines idle high (deasserted)
    let out_config = OutputConfig::default();
    let ce = Output::new(peripherals.GPIO4, Level::High, out_config);
    let oe = Output::new(peripherals.GPIO5, Level::High, out_config);
    let we = Output::new(peripherals.GPIO6, Level::High, out_config);

    let mut data = Flex::new(peripherals.GPIO7);
    data.apply_input_config(&esp_hal::gpio::InputConfig::default().with_pull(Pull::Up));
    let io = FlexDataPin { pin: data };

    let mut rtc = DS1315::new(ce, oe, we, io, Delay::new());

    info!("Current time will be displayed every second");

    loop {
        let loop_start = Instant::now();
        match rtc.datetime() {
            Ok(now) => {
                info!("{}", now);
            }
            Err(e) => {
                info!("Failed to read clock: {:?}", e);
            }
        }

        // Wait for the remainder of 1 second
        while loop_start.elapsed() < Duration::from_secs(1) {
            // Busy wait
        }
    }
}

//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the shared two-wire bus and every driver, exposing them through
//! [`InputPort`] and [`ActuatorPort`].  This is the only module in the
//! system that touches actual hardware.  Card reader, accelerometer and
//! light sensor come from the board layer as implementations of their
//! own contracts.

use anyhow::Context;
use embedded_hal::i2c::I2c;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{ActuatorPort, CardReader, InputPort, Keypad, RequestMode};
use crate::drivers::fan::Fan;
use crate::drivers::rgb_led::RgbLed;
use crate::drivers::segment_display::SegmentDisplay;
use crate::error::Result;
use crate::fsm::binding::CardUid;
use crate::fsm::mode::Key;
use crate::fsm::render::Rgb;
use crate::sensors::{Acceleration, LightSensor, MotionSensor, PresenceSensor};

/// Input peripherals that do not sit on the shared bus.
pub struct Inputs<K, C, P, M, L> {
    pub keypad: K,
    pub reader: C,
    pub presence: P,
    pub motion: M,
    pub light: L,
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<B, F, K, C, P, M, L> {
    bus: B,
    display: SegmentDisplay,
    indicator: RgbLed,
    fan: Fan<F>,
    inputs: Inputs<K, C, P, M, L>,
}

impl<B, F, K, C, P, M, L> HardwareAdapter<B, F, K, C, P, M, L>
where
    B: I2c,
    F: SetDutyCycle,
{
    /// Bring up the display, indicator and fan at their default
    /// addresses and leave every output off.
    pub fn new(bus: B, fan_pwm: F, inputs: Inputs<K, C, P, M, L>) -> anyhow::Result<Self> {
        Self::with_devices(
            bus,
            SegmentDisplay::default(),
            RgbLed::default(),
            fan_pwm,
            inputs,
        )
    }

    pub fn with_devices(
        mut bus: B,
        display: SegmentDisplay,
        indicator: RgbLed,
        fan_pwm: F,
        inputs: Inputs<K, C, P, M, L>,
    ) -> anyhow::Result<Self> {
        display
            .init(&mut bus)
            .with_context(|| format!("segment display at 0x{:02X}", display.address()))?;
        indicator.init(&mut bus).context("indicator PWM controller")?;
        indicator.set(&mut bus, Rgb::OFF).context("indicator PWM controller")?;
        let mut fan = Fan::new(fan_pwm);
        fan.stop().context("fan PWM")?;
        Ok(Self {
            bus,
            display,
            indicator,
            fan,
            inputs,
        })
    }

    /// Hand the peripherals back.
    pub fn release(self) -> (B, F, Inputs<K, C, P, M, L>) {
        let Self { bus, fan, inputs, .. } = self;
        (bus, fan.into_inner(), inputs)
    }
}

// ── Input contracts ───────────────────────────────────────────

impl<B, F, K, C, P: PresenceSensor, M, L> PresenceSensor for HardwareAdapter<B, F, K, C, P, M, L> {
    fn is_present(&mut self) -> Result<bool> {
        self.inputs.presence.is_present()
    }
}

impl<B, F, K, C, P, M: MotionSensor, L> MotionSensor for HardwareAdapter<B, F, K, C, P, M, L> {
    fn read_acceleration(&mut self) -> Result<Acceleration> {
        self.inputs.motion.read_acceleration()
    }
}

impl<B, F, K, C, P, M, L: LightSensor> LightSensor for HardwareAdapter<B, F, K, C, P, M, L> {
    fn read_lux(&mut self) -> Result<u16> {
        self.inputs.light.read_lux()
    }
}

impl<B, F, K, C, P, M, L> InputPort for HardwareAdapter<B, F, K, C, P, M, L>
where
    K: Keypad,
    C: CardReader,
    P: PresenceSensor,
    M: MotionSensor,
    L: LightSensor,
{
    fn read_key(&mut self) -> Option<Key> {
        self.inputs.keypad.read_key()
    }

    fn request_card(&mut self, mode: RequestMode) -> Result<()> {
        self.inputs.reader.request(mode)
    }

    fn read_card_uid(&mut self) -> Result<CardUid> {
        self.inputs.reader.read_uid()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<B: I2c, F: SetDutyCycle, K, C, P, M, L> ActuatorPort for HardwareAdapter<B, F, K, C, P, M, L> {
    fn set_indicator(&mut self, colour: Rgb) {
        if let Err(e) = self.indicator.set(&mut self.bus, colour) {
            warn!("Indicator write failed: {}", e);
        }
    }

    fn set_text(&mut self, text: &str) {
        if let Err(e) = self.display.show(&mut self.bus, text) {
            warn!("Display write failed ({:?}): {}", text, e);
        }
    }

    fn set_fan_speed(&mut self, percent: u8) {
        if let Err(e) = self.fan.set_speed(percent) {
            warn!("Fan write failed: {}", e);
        }
    }
}

//! Digital proximity (IR / PIR) presence sensor.
//!
//! The module drives its output pin to `active_level` while someone is in
//! range.  Modules differ in polarity, so it is a constructor argument.

use embedded_hal::digital::InputPin;

use crate::error::{Result, SensorError};

use super::PresenceSensor;

pub struct PirSensor<P> {
    pin: P,
    active_high: bool,
}

impl<P: InputPin> PirSensor<P> {
    pub fn new(pin: P, active_high: bool) -> Self {
        Self { pin, active_high }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> PresenceSensor for PirSensor<P> {
    fn is_present(&mut self) -> Result<bool> {
        let high = self
            .pin
            .is_high()
            .map_err(|_| SensorError::ReadFailed)?;
        Ok(high == self.active_high)
    }
}

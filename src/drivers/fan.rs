//! PWM cooling fan.
//!
//! Duty is given in percent; 0 stops the fan.  Any embedded-hal PWM
//! channel works.

use embedded_hal::pwm::SetDutyCycle;

use crate::error::{ActuatorError, Result};

pub struct Fan<P> {
    pwm: P,
    duty: u8,
}

impl<P: SetDutyCycle> Fan<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, duty: 0 }
    }

    /// Set the duty in percent, clamped to 100.
    pub fn set_speed(&mut self, percent: u8) -> Result<()> {
        let percent = percent.min(100);
        self.pwm
            .set_duty_cycle_percent(percent)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.duty = percent;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        self.set_speed(0)
    }

    /// Last duty successfully written.
    pub fn speed(&self) -> u8 {
        self.duty
    }

    pub fn is_running(&self) -> bool {
        self.duty > 0
    }

    pub fn into_inner(self) -> P {
        self.pwm
    }
}

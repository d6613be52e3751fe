//! Sensor contracts consumed by the control loop.
//!
//! Each sensor is a minimal read trait.  Raw sampling of the motion and
//! light chips lives in the board layer; the presence sensor is a plain
//! GPIO and ships with a driver in [`presence`].
//!
//! Failures are returned, never panicked on.  The service maps them onto
//! safe readings: absent, no tap, light check skipped.

pub mod presence;

use crate::error::Result;

/// Three-axis acceleration in g.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean magnitude (g).
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Proximity sensor reporting whether someone sits at the desk.
pub trait PresenceSensor {
    fn is_present(&mut self) -> Result<bool>;
}

/// Accelerometer used for tap detection.
pub trait MotionSensor {
    fn read_acceleration(&mut self) -> Result<Acceleration>;
}

/// Ambient light sensor.  Read only when focus is about to start.
pub trait LightSensor {
    /// Illuminance in lux.
    fn read_lux(&mut self) -> Result<u16>;
}

//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                        |
//! |----------------|--------------------|------------------------------------|
//! | `hardware`     | InputPort          | keypad, card reader, sensors       |
//! |                | ActuatorPort       | HT16K33, PCA9685 (I2C), fan PWM    |
//! | `log_sink`     | EventSink          | `log` backend (serial console)     |

pub mod hardware;
pub mod log_sink;

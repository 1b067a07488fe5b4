//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                    |
//! |------------|--------------|--------------------------------|
//! | `hardware` | ButtonPort   | ESP32 GPIO (buttons)           |
//! |            | ActuatorPort | GPIO LEDs, LEDC buzzer, LCD    |
//! |            | SerialPort   | UART1 from perception host     |
//! | `log_sink` | EventSink    | Serial log output              |
//! | `time`     | TimePort     | ESP32 system timer             |

pub mod hardware;
pub mod log_sink;
pub mod time;

//! One-shot hardware peripheral initialization and raw pin access.
//!
//! Configures button inputs, indicator outputs, the LEDC buzzer channel
//! and the UART link to the perception host using raw ESP-IDF sys calls.
//! Called once from `main()` before the control loop starts.
//!
//! On non-espidf targets every function is a no-op stub so the adapters
//! compile and run on the host.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::InitError;
#[cfg(target_os = "espidf")]
use crate::pins;

pub const BUTTON_GPIOS: [i32; 3] = [
    crate::pins::BUTTON_RED_GPIO,
    crate::pins::BUTTON_YELLOW_GPIO,
    crate::pins::BUTTON_GREEN_GPIO,
];

pub const LED_GPIOS: [i32; 3] = [
    crate::pins::LED_RED_GPIO,
    crate::pins::LED_YELLOW_GPIO,
    crate::pins::LED_GREEN_GPIO,
];

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), InitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_buzzer()?;
        init_uart()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), InitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), InitError> {
    for &pin in &BUTTON_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(InitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: button inputs configured (pull-up, polled)");
    Ok(())
}

/// `true` when the line reads high.
#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host stub: buttons read released (pulled high).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), InitError> {
    for &pin in &LED_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(InitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: indicator outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC buzzer ───────────────────────────────────────────────

/// Initial tone; retuned with `ledc_set_freq` on every start.
#[cfg(target_os = "espidf")]
const BUZZER_INITIAL_HZ: u32 = 2000;

#[cfg(target_os = "espidf")]
unsafe fn init_buzzer() -> Result<(), InitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pins::BUZZER_RESOLUTION_BITS,
        freq_hz: BUZZER_INITIAL_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(InitError::LedcConfigFailed(ret));
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::BUZZER_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(InitError::LedcConfigFailed(ret));
    }

    info!("hw_init: LEDC buzzer configured (timer0/ch0)");
    Ok(())
}

/// Start the buzzer at `hz`, or silence it.
#[cfg(target_os = "espidf")]
pub fn buzzer_set(tone_hz: Option<u16>) {
    // SAFETY: LEDC timer/channel were configured in init_buzzer(); only the
    // main loop calls this function.
    unsafe {
        let duty = match tone_hz {
            Some(hz) => {
                ledc_set_freq(
                    ledc_mode_t_LEDC_LOW_SPEED_MODE,
                    ledc_timer_t_LEDC_TIMER_0,
                    u32::from(hz),
                );
                pins::BUZZER_DUTY_ON
            }
            None => 0,
        };
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_channel_t_LEDC_CHANNEL_0, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_channel_t_LEDC_CHANNEL_0);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn buzzer_set(_tone_hz: Option<u16>) {}

// ── UART (perception host link) ───────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_uart() -> Result<(), InitError> {
    let cfg = uart_config_t {
        baud_rate: pins::UART_BAUD,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };

    let ret = unsafe {
        uart_driver_install(
            pins::UART_PORT,
            pins::UART_RX_BUF,
            0,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(InitError::UartInstallFailed(ret));
    }

    let ret = unsafe { uart_param_config(pins::UART_PORT, &cfg) };
    if ret != ESP_OK as i32 {
        return Err(InitError::UartInstallFailed(ret));
    }

    let ret = unsafe {
        uart_set_pin(
            pins::UART_PORT,
            pins::UART_TX_GPIO,
            pins::UART_RX_GPIO,
            UART_PIN_NO_CHANGE,
            UART_PIN_NO_CHANGE,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(InitError::UartInstallFailed(ret));
    }

    info!("hw_init: UART{} at {} baud", pins::UART_PORT, pins::UART_BAUD);
    Ok(())
}

/// Non-blocking single-byte read from the host UART.
#[cfg(target_os = "espidf")]
pub fn uart_read_byte() -> Option<u8> {
    let mut byte = 0u8;
    // SAFETY: driver installed in init_uart(); zero-tick timeout never blocks.
    let n = unsafe {
        uart_read_bytes(
            pins::UART_PORT,
            (&raw mut byte).cast(),
            1,
            0,
        )
    };
    (n == 1).then_some(byte)
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_read_byte() -> Option<u8> {
    None
}

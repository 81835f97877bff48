//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit (water + light channels), the
//! co-processor UART, the LEDC timer/channel for the mood LED and the
//! buzzer GPIO using raw ESP-IDF sys calls.  Called once from `main()`
//! before any task is spawned.  The register-level helpers below are the
//! only code the device adapters use to touch the peripherals.

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;

use crate::error::Error;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    UartInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::UartInitFailed(rc)   => write!(f, "link UART init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Error::Init(match e {
            HwInitError::AdcInitFailed(_) => "adc",
            HwInitError::UartInitFailed(_) => "uart",
            HwInitError::GpioConfigFailed(_) => "gpio",
            HwInitError::LedcInitFailed(_) => "ledc",
        })
    }
}

#[cfg(feature = "espidf")]
use log::info;

#[cfg(feature = "espidf")]
use crate::pins;

#[cfg(feature = "espidf")]
pub fn init_peripherals(baud_rate: u32) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any task exists.
    unsafe {
        init_adc()?;
        init_uart(baud_rate)?;
        init_ledc()?;
        init_buzzer()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn init_peripherals(baud_rate: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped (baud={})", baud_rate);
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(feature = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: `ADC1_HANDLE` is written once in `init_adc()` before any task
/// starts.  Reads after that are serialized by the sampler's `SharedAdc`.
#[cfg(feature = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(feature = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::WATER_ADC_CHANNEL, pins::LIGHT_ADC_CHANNEL] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=water, CH{}=light)",
        pins::WATER_ADC_CHANNEL,
        pins::LIGHT_ADC_CHANNEL
    );
    Ok(())
}

/// Blocking oneshot conversion.  `None` if the driver rejects the read.
#[cfg(feature = "espidf")]
pub fn adc1_read(channel: u32) -> Option<u16> {
    let mut raw: i32 = 0;
    // SAFETY: see adc1_handle().
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return None;
    }
    Some(raw.max(0) as u16)
}

#[cfg(not(feature = "espidf"))]
pub fn adc1_read(_channel: u32) -> Option<u16> {
    None
}

// ── UART (co-processor link) ──────────────────────────────────

#[cfg(feature = "espidf")]
unsafe fn init_uart(baud_rate: u32) -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: baud_rate as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    let ret = unsafe {
        uart_driver_install(
            pins::LINK_UART_PORT,
            pins::LINK_UART_RX_BUF,
            0,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    let ret = unsafe { uart_param_config(pins::LINK_UART_PORT, &cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    let ret = unsafe {
        uart_set_pin(
            pins::LINK_UART_PORT,
            pins::LINK_UART_TX_GPIO,
            pins::LINK_UART_RX_GPIO,
            UART_PIN_NO_CHANGE,
            UART_PIN_NO_CHANGE,
        )
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    info!("hw_init: UART{} at {} baud", pins::LINK_UART_PORT, baud_rate);
    Ok(())
}

/// Queue `data` for transmission.  Returns bytes accepted, or the
/// driver's negative return code.
#[cfg(feature = "espidf")]
pub fn uart_write(data: &[u8]) -> Result<usize, i32> {
    // SAFETY: UART driver installed in init_uart(); the slice outlives the call.
    let n = unsafe { uart_write_bytes(pins::LINK_UART_PORT, data.as_ptr().cast(), data.len()) };
    if n < 0 { Err(n) } else { Ok(n as usize) }
}

/// Wait up to `timeout_ms` for the TX FIFO to drain.
#[cfg(feature = "espidf")]
pub fn uart_flush(timeout_ms: u32) -> Result<(), i32> {
    let ticks = timeout_ms * configTICK_RATE_HZ / 1000;
    // SAFETY: UART driver installed in init_uart().
    let ret = unsafe { uart_wait_tx_done(pins::LINK_UART_PORT, ticks) };
    if ret != ESP_OK as i32 { Err(ret) } else { Ok(()) }
}

/// Read whatever has arrived, blocking at most `timeout_ms`.
#[cfg(feature = "espidf")]
pub fn uart_read(buf: &mut [u8], timeout_ms: u32) -> usize {
    let ticks = timeout_ms * configTICK_RATE_HZ / 1000;
    // SAFETY: UART driver installed in init_uart(); buf is exclusively borrowed.
    let n = unsafe {
        uart_read_bytes(pins::LINK_UART_PORT, buf.as_mut_ptr().cast(), buf.len() as u32, ticks)
    };
    n.max(0) as usize
}

// ── LEDC PWM (mood LED) ───────────────────────────────────────

/// 8-bit duty resolution on the LED timer.
pub const LED_DUTY_MAX: u16 = 255;

#[cfg(feature = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::LED_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: pins::MOOD_LED_LEDC_CHANNEL,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::MOOD_LED_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (mood LED=CH{})", pins::MOOD_LED_LEDC_CHANNEL);
    Ok(())
}

#[cfg(feature = "espidf")]
pub fn ledc_set(channel: u32, duty: u16) -> Result<(), i32> {
    // SAFETY: channel configured in init_ledc(); only the actuation task
    // writes the mood LED duty.
    unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        if ret != ESP_OK as i32 { return Err(ret); }
        let ret = ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
        if ret != ESP_OK as i32 { return Err(ret); }
    }
    Ok(())
}

// ── Buzzer GPIO ───────────────────────────────────────────────

#[cfg(feature = "espidf")]
unsafe fn init_buzzer() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BUZZER_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    unsafe { gpio_set_level(pins::BUZZER_GPIO, 0) };

    info!("hw_init: buzzer GPIO{} configured", pins::BUZZER_GPIO);
    Ok(())
}

#[cfg(feature = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    // SAFETY: pin configured as output in init_buzzer().
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 { Err(ret) } else { Ok(()) }
}

//! PlantCare Firmware: Main Entry Point
//!
//! Hexagonal pipeline of four cooperating tasks around one shared store.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  UartTx / rx pump    EspAdc        HardwareActuators           │
//! │  (Transport)         (AdcPort)     (ActuatorPort)              │
//! │  LogEventSink (EventSink)                                      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │   link-rx ─▶ LINK_LINES ─▶ link-proto ──┐                      │
//! │                                         ▼                      │
//! │   sampler ───────────────────────▶ SensorStore ─▶ actuation    │
//! │      └──── telemetry ──▶ SerialLink ◀── link-proto             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use futures_lite::future::block_on;
use log::info;

use esp_idf_hal::delay::Delay;
use plantcare::adapters::esp::{self, BuzzerPin, EspAdc, LedcPwm, UartTx};
use plantcare::adapters::hardware::HardwareActuators;
use plantcare::adapters::log_sink::LogEventSink;
use plantcare::config::SystemConfig;
use plantcare::control::actuation::ActuationLoop;
use plantcare::drivers::buzzer::Buzzer;
use plantcare::drivers::hw_init;
use plantcare::drivers::status_led::StatusLed;
use plantcare::drivers::task_pin::{self, ACTUATION_TASK, PROTOCOL_TASK, RX_PUMP_TASK, SAMPLER_TASK};
use plantcare::link::channels::LINK_LINES;
use plantcare::link::framer::RxFramer;
use plantcare::link::protocol::{ProtocolClient, SerialLink};
use plantcare::link::telemetry::TelemetryPublisher;
use plantcare::sensors::LocalSampler;
use plantcare::sensors::adc::{SharedAdc, WATER_ADC_DONE};
use plantcare::store::SensorStore;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PlantCare v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    info!(
        "Config: poll remote={}ms sensors={}ms actuation={}ms, telemetry={}, audio={}",
        config.timing.remote_poll_interval_ms,
        config.timing.sensor_poll_interval_ms,
        config.timing.actuation_interval_ms,
        config.telemetry_enabled,
        config.audio_enabled,
    );

    // ── 3. Peripherals ────────────────────────────────────────
    // Peripheral init failure is fatal; nothing below can run without it.
    hw_init::init_peripherals(config.baud_rate)?;

    // ── 4. Shared resources (live for the whole program) ──────
    let lock_wait = config.timing.lock_wait();
    let store: &'static SensorStore = Box::leak(Box::new(SensorStore::new(lock_wait)));
    let link: &'static SerialLink<UartTx> = Box::leak(Box::new(SerialLink::new(UartTx, lock_wait)));
    let adc: &'static SharedAdc<EspAdc> = Box::leak(Box::new(SharedAdc::new(EspAdc::new(), lock_wait)));

    // ── 5. Tasks ──────────────────────────────────────────────
    let rx = task_pin::spawn_task(RX_PUMP_TASK, || {
        let mut framer = RxFramer::new(&LINK_LINES);
        esp::run_rx_pump(&mut framer);
    })?;

    let proto_cfg = config.clone();
    let proto = task_pin::spawn_task(PROTOCOL_TASK, move || {
        let mut client = ProtocolClient::new(
            link,
            &LINK_LINES,
            store,
            LogEventSink::new(),
            proto_cfg.timing.request_timeout(),
        );
        block_on(client.run(proto_cfg.timing.remote_poll_interval()));
    })?;

    let sampler_cfg = config.clone();
    let sampler = task_pin::spawn_task(SAMPLER_TASK, move || {
        let mut sampler = LocalSampler::new(
            adc,
            &WATER_ADC_DONE,
            store,
            LogEventSink::new(),
            sampler_cfg.calibration,
            sampler_cfg.timing.adc_conversion_timeout(),
        );
        let publisher = TelemetryPublisher::new(link, sampler_cfg.timing.telemetry_wait());
        let telemetry = sampler_cfg.telemetry_enabled.then_some(&publisher);
        block_on(sampler.run(sampler_cfg.timing.sensor_poll_interval(), telemetry));
    })?;

    let act_cfg = config;
    let actuation = task_pin::spawn_task(ACTUATION_TASK, move || {
        let outputs = HardwareActuators::new(
            StatusLed::new(LedcPwm),
            Buzzer::new(BuzzerPin, Delay::new_default()),
        );
        let period = act_cfg.timing.actuation_interval();
        let mut actuation = ActuationLoop::new(store, outputs, LogEventSink::new(), act_cfg);
        block_on(actuation.run(period));
    })?;

    info!("All tasks running");

    // The task bodies never return; a join only completes on panic.
    for handle in [rx, proto, sampler, actuation] {
        let name = handle.thread().name().unwrap_or("?").to_owned();
        if handle.join().is_err() {
            log::error!("task '{}' panicked", name);
        }
    }
    Ok(())
}

//! Cross-thread tests: the store and the ADC reservation under real
//! contention, one `block_on` executor per OS thread as on the device.

use std::sync::atomic::{AtomicU32, Ordering};

use embassy_time::Duration;
use futures_lite::future::block_on;

use plantcare::app::ports::AdcChannel;
use plantcare::error::{Error, Resource};
use plantcare::sensors::adc::{AdcCompletion, SharedAdc};
use plantcare::store::SensorStore;

use crate::mock_hw::MockAdc;

const WRITERS: u32 = 4;
const READERS: u32 = 4;
const UPDATES: u32 = 500;

#[test]
fn snapshots_never_mix_remote_updates() {
    let store = SensorStore::new(Duration::from_millis(500));
    let torn = AtomicU32::new(0);
    let skipped = AtomicU32::new(0);

    std::thread::scope(|s| {
        for w in 0..WRITERS {
            let store = &store;
            let skipped = &skipped;
            s.spawn(move || {
                for i in 0..UPDATES {
                    // Humidity is always twice the temperature within one update.
                    let t = (w * UPDATES + i) as f32;
                    if block_on(store.update_remote_readings(t, t * 2.0)).is_err() {
                        skipped.fetch_add(1, Ordering::Relaxed);
                    }
                    block_on(store.update_water_level((i % 101) as u8)).ok();
                }
            });
        }
        for _ in 0..READERS {
            let store = &store;
            let torn = &torn;
            s.spawn(move || {
                for _ in 0..UPDATES {
                    if let Ok(snap) = block_on(store.snapshot()) {
                        if snap.humidity_pct != snap.temperature_c * 2.0 {
                            torn.fetch_add(1, Ordering::Relaxed);
                        }
                        assert!(snap.water_level_pct <= 100);
                    }
                }
            });
        }
    });

    assert_eq!(torn.load(Ordering::Relaxed), 0);
    assert!(skipped.load(Ordering::Relaxed) < WRITERS * UPDATES);
}

#[test]
fn adc_results_never_cross_channels() {
    const WATER: u16 = 1111;
    const LIGHT: u16 = 2222;

    let done = AdcCompletion::new();
    let adc = SharedAdc::new(MockAdc::new(&done, WATER, LIGHT), Duration::from_millis(500));
    let timeout = Duration::from_millis(50);

    std::thread::scope(|s| {
        let adc = &adc;
        let done = &done;
        s.spawn(move || {
            for _ in 0..200 {
                match block_on(adc.convert_interrupt(AdcChannel::Water, done, timeout)) {
                    Ok(raw) => assert_eq!(raw, WATER),
                    Err(e) => assert_eq!(e, Error::Contention(Resource::AdcUnit)),
                }
            }
        });
        s.spawn(move || {
            for _ in 0..200 {
                match block_on(adc.convert_polled(AdcChannel::Light, timeout)) {
                    Ok(raw) => assert_eq!(raw, LIGHT),
                    Err(e) => assert_eq!(e, Error::Contention(Resource::AdcUnit)),
                }
            }
        });
    });

    assert_eq!(adc.into_inner().overlaps, 0);
}

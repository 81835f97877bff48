//! End-to-end pipeline tests: co-processor link → store ← sampler,
//! store → actuation, all against mock adapters on one thread.

use embassy_sync::channel::Channel;
use embassy_time::Duration;
use futures_lite::future::block_on;

use plantcare::app::events::{PipelineEvent, Stage};
use plantcare::config::SystemConfig;
use plantcare::control::actuation::ActuationLoop;
use plantcare::control::mapping::led_intensity;
use plantcare::control::motif::AudioMotif;
use plantcare::error::{Error, Field, ParseError, TransportError};
use plantcare::link::channels::LineChannel;
use plantcare::link::framer::RxFramer;
use plantcare::link::protocol::{ExchangeState, ProtocolClient, SerialLink};
use plantcare::link::telemetry::TelemetryPublisher;
use plantcare::sensors::LocalSampler;
use plantcare::sensors::adc::{AdcCompletion, SharedAdc};
use plantcare::store::SensorStore;

use crate::mock_hw::{MockActuators, MockAdc, Recorder, ScriptedCoprocessor};

const WET: u16 = 4095;
const SHADE: u16 = 1500;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Run one sampler cycle against fixed raw readings.
fn sample_once(store: &SensorStore, water_raw: u16, light_raw: u16) {
    let done = AdcCompletion::new();
    let adc = SharedAdc::new(MockAdc::new(&done, water_raw, light_raw), ms(20));
    let cfg = SystemConfig::default();
    let mut sampler = LocalSampler::new(&adc, &done, store, Recorder::default(), cfg.calibration, ms(10));
    let reading = block_on(sampler.sample());
    assert!(!reading.water_stale && !reading.light_stale);
}

#[test]
fn hot_humid_air_makes_plant_sad() {
    let lines: LineChannel = Channel::new();
    let uart = ScriptedCoprocessor::new(
        RxFramer::new(&lines),
        &[Some("{\"temp\":45,\"humidity\":70}\n")],
    );
    let link = SerialLink::new(uart, ms(20));
    let store = SensorStore::new(ms(20));

    let mut client = ProtocolClient::new(&link, &lines, &store, Recorder::default(), ms(50));
    let reading = block_on(client.exchange()).unwrap();
    assert_eq!(reading.temperature_c, 45.0);

    sample_once(&store, WET, SHADE);

    let mut act = ActuationLoop::new(&store, MockActuators::new(), Recorder::default(), SystemConfig::default());
    let cmd = block_on(act.cycle()).unwrap();
    assert_eq!(cmd.audio_motif, AudioMotif::Sad);
    assert!(act.outputs().played(AudioMotif::Sad));
    assert_eq!(
        act.outputs().led_levels(),
        vec![led_intensity(SHADE, &SystemConfig::default().calibration)]
    );
}

#[test]
fn comfortable_plant_is_happy() {
    let lines: LineChannel = Channel::new();
    let uart = ScriptedCoprocessor::new(
        RxFramer::new(&lines),
        &[Some("{\"temperature\": 22.5, \"hum\": 55.0}\r\n")],
    );
    let link = SerialLink::new(uart, ms(20));
    let store = SensorStore::new(ms(20));

    let mut client = ProtocolClient::new(&link, &lines, &store, Recorder::default(), ms(50));
    block_on(client.exchange()).unwrap();
    sample_once(&store, WET, SHADE);

    let snap = block_on(store.snapshot()).unwrap();
    assert_eq!(snap.water_level_pct, 100);
    assert_eq!(snap.light_raw, SHADE);
    assert_eq!(snap.temperature_c, 22.5);
    assert_eq!(snap.humidity_pct, 55.0);

    let mut act = ActuationLoop::new(&store, MockActuators::new(), Recorder::default(), SystemConfig::default());
    assert_eq!(block_on(act.cycle()).unwrap().audio_motif, AudioMotif::Happy);
    assert!(act.outputs().played(AudioMotif::Happy));
}

#[test]
fn silent_coprocessor_times_out_then_recovers() {
    let lines: LineChannel = Channel::new();
    let uart = ScriptedCoprocessor::new(
        RxFramer::new(&lines),
        &[None, Some("{\"temp\":19.0,\"humidity\":40.0}\n")],
    );
    let written = uart.written.clone();
    let link = SerialLink::new(uart, ms(20));
    let store = SensorStore::new(ms(20));
    let events = Recorder::default();
    let mut client = ProtocolClient::new(&link, &lines, &store, events.clone(), ms(30));

    let before = block_on(store.snapshot()).unwrap();
    assert_eq!(
        block_on(client.exchange()),
        Err(Error::Transport(TransportError::ResponseTimeout))
    );
    assert_eq!(client.last_outcome(), ExchangeState::TimedOut);
    assert_eq!(block_on(store.snapshot()).unwrap(), before);

    let reading = block_on(client.exchange()).unwrap();
    assert_eq!(reading.humidity_pct, 40.0);
    assert_eq!(block_on(store.snapshot()).unwrap().temperature_c, 19.0);

    let stats = client.stats();
    assert_eq!((stats.attempts, stats.successes, stats.timeouts), (2, 1, 1));
    assert_eq!(
        ScriptedCoprocessor::sent_lines(&written),
        vec!["GET_DHT".to_owned(), "GET_DHT".to_owned()]
    );
    assert!(matches!(
        events.events().as_slice(),
        [PipelineEvent::ExchangeFailed(_), PipelineEvent::RemoteUpdated(_)]
    ));
}

#[test]
fn rejected_response_leaves_store_unchanged() {
    let lines: LineChannel = Channel::new();
    let uart = ScriptedCoprocessor::new(
        RxFramer::new(&lines),
        &[
            Some("{\"temp\":25.5}\n"),
            Some("{\"temp\":25.5,\"humidity\":160}\n"),
        ],
    );
    let link = SerialLink::new(uart, ms(20));
    let store = SensorStore::new(ms(20));
    let mut client = ProtocolClient::new(&link, &lines, &store, Recorder::default(), ms(50));

    let before = block_on(store.snapshot()).unwrap();
    assert_eq!(
        block_on(client.exchange()),
        Err(Error::Parse(ParseError::MissingKey(Field::Humidity)))
    );
    assert_eq!(
        block_on(client.exchange()),
        Err(Error::Parse(ParseError::OutOfRange(Field::Humidity)))
    );
    assert_eq!(block_on(store.snapshot()).unwrap(), before);
    assert_eq!(client.stats().parse_failures, 2);
}

#[test]
fn sampler_reports_telemetry_over_the_link() {
    let lines: LineChannel = Channel::new();
    let uart = ScriptedCoprocessor::new(RxFramer::new(&lines), &[]);
    let written = uart.written.clone();
    let link = SerialLink::new(uart, ms(20));
    let store = SensorStore::new(ms(20));

    let done = AdcCompletion::new();
    let adc = SharedAdc::new(MockAdc::new(&done, WET, SHADE), ms(20));
    let events = Recorder::default();
    let mut sampler = LocalSampler::new(
        &adc,
        &done,
        &store,
        events.clone(),
        SystemConfig::default().calibration,
        ms(10),
    );
    let reading = block_on(sampler.sample());
    block_on(TelemetryPublisher::new(&link, ms(20)).publish(&reading)).unwrap();

    assert_eq!(
        ScriptedCoprocessor::sent_lines(&written),
        vec!["{\"photo\":1500,\"water\":100}".to_owned()]
    );
    assert!(
        !events
            .events()
            .iter()
            .any(|e| matches!(e, PipelineEvent::Skipped { stage: Stage::Sampler, .. }))
    );
}

#[test]
fn stale_remote_data_still_drives_outputs() {
    let store = SensorStore::new(ms(20));
    sample_once(&store, WET, SHADE);

    // No remote reading ever arrived: 0 °C / 0 % passes both checks.
    let mut act = ActuationLoop::new(&store, MockActuators::new(), Recorder::default(), SystemConfig::default());
    let cmd = block_on(act.cycle()).unwrap();
    assert_eq!(cmd.audio_motif, AudioMotif::Happy);
    assert_eq!(act.outputs().led_levels().len(), 1);
}

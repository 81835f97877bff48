//! Actuation decision loop.
//!
//! Each period: snapshot the store, map it to an [`ActuatorCommand`], set
//! the LED, then play the motif synchronously.  A snapshot lost to lock
//! contention skips the cycle; the outputs keep their last state until
//! the next one re-asserts them.

use embassy_time::{Duration, Timer};
use log::debug;

use super::ActuatorCommand;
use super::mapping::{ContentChecks, decide};
use super::motif;
use crate::app::events::{PipelineEvent, Stage};
use crate::app::ports::{ActuatorPort, EventSink};
use crate::config::SystemConfig;
use crate::error::Result;
use crate::store::SensorStore;

pub struct ActuationLoop<'a, P: ActuatorPort, E: EventSink> {
    store: &'a SensorStore,
    outputs: P,
    sink: E,
    config: SystemConfig,
    last: Option<ActuatorCommand>,
}

impl<'a, P: ActuatorPort, E: EventSink> ActuationLoop<'a, P, E> {
    pub fn new(store: &'a SensorStore, outputs: P, sink: E, config: SystemConfig) -> Self {
        Self {
            store,
            outputs,
            sink,
            config,
            last: None,
        }
    }

    /// One decision cycle.
    pub async fn cycle(&mut self) -> Result<ActuatorCommand> {
        let snapshot = self.store.snapshot().await?;
        let cmd = decide(
            &snapshot,
            &self.config.calibration,
            &self.config.thresholds,
            self.config.audio_enabled,
        );
        debug!(
            "actuation: {:?} -> {:?}",
            ContentChecks::evaluate(&snapshot, &self.config.thresholds),
            cmd
        );

        self.outputs.set_led(cmd.led_intensity)?;
        motif::play(cmd.audio_motif, &mut self.outputs)?;

        self.last = Some(cmd);
        self.sink.emit(&PipelineEvent::Actuated(cmd));
        Ok(cmd)
    }

    /// Decide forever, pausing `period` after each cycle.
    pub async fn run(&mut self, period: Duration) -> ! {
        loop {
            if let Err(cause) = self.cycle().await {
                self.sink.emit(&PipelineEvent::Skipped {
                    stage: Stage::Actuation,
                    cause,
                });
            }
            Timer::after(period).await;
        }
    }

    /// Last command that reached the outputs.
    pub fn last_command(&self) -> Option<ActuatorCommand> {
        self.last
    }

    pub fn outputs(&self) -> &P {
        &self.outputs
    }
}

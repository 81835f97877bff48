//! Core-pinned task spawning for the ESP32-S3.
//!
//! Every pipeline stage runs on its own FreeRTOS task (an ESP-IDF
//! pthread) driving a single future with `block_on`.  `esp_pthread_set_cfg()`
//! applies to the *next* `pthread_create()` from the calling thread, so
//! the config→spawn pair must not interleave with other thread creation
//! on the same thread.  `main` spawns all tasks sequentially.
//!
//! Priorities follow the data flow: the UART receive pump outranks the
//! protocol client, which outranks the sampler, which outranks actuation.

use crate::error::{Error, Result};

/// CPU core identifiers for the ESP32-S3 Xtensa LX7 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU), shared with the IDF system tasks.
    Pro = 0,
    /// Core 1 (APP_CPU), pipeline tasks.
    App = 1,
}

/// Placement and sizing for one pipeline task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// Null-terminated; ESP-IDF copies it into the TCB.
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    pub fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

pub const RX_PUMP_TASK: TaskSpec = TaskSpec {
    name: "link-rx\0",
    core: Core::Pro,
    priority: 4,
    stack_kb: 3,
};

pub const PROTOCOL_TASK: TaskSpec = TaskSpec {
    name: "link-proto\0",
    core: Core::App,
    priority: 3,
    stack_kb: 6,
};

pub const SAMPLER_TASK: TaskSpec = TaskSpec {
    name: "sampler\0",
    core: Core::App,
    priority: 2,
    stack_kb: 6,
};

pub const ACTUATION_TASK: TaskSpec = TaskSpec {
    name: "actuation\0",
    core: Core::App,
    priority: 1,
    stack_kb: 4,
};

/// Spawn a thread pinned per `spec`.
///
/// On ESP-IDF, configures core affinity, priority and stack size with
/// `esp_pthread_set_cfg()` before `std::thread::spawn`.
#[cfg(feature = "espidf")]
pub fn spawn_task(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>> {
    // SAFETY: the default config is plain data; `spec.name` is 'static and
    // null-terminated.
    unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = spec.core as i32;
        cfg.prio = i32::from(spec.priority);
        cfg.stack_size = (spec.stack_kb * 1024) as i32;
        cfg.thread_name = spec.name.as_ptr().cast();
        let ret = esp_idf_sys::esp_pthread_set_cfg(&cfg);
        if ret != esp_idf_sys::ESP_OK as i32 {
            log::error!("esp_pthread_set_cfg({}) failed: {}", spec.display_name(), ret);
            return Err(Error::Init("pthread cfg"));
        }
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        spec.display_name(),
        spec.core,
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .spawn(f)
        .map_err(|_| Error::Init("thread spawn"))
}

/// Host fallback: ignores core affinity and priority.
#[cfg(not(feature = "espidf"))]
pub fn spawn_task(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>> {
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        spec.display_name(),
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .stack_size(spec.stack_kb * 1024)
        .spawn(f)
        .map_err(|_| Error::Init("thread spawn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_follow_data_flow() {
        assert!(RX_PUMP_TASK.priority > PROTOCOL_TASK.priority);
        assert!(PROTOCOL_TASK.priority > SAMPLER_TASK.priority);
        assert!(SAMPLER_TASK.priority > ACTUATION_TASK.priority);
    }

    #[test]
    fn names_are_null_terminated() {
        for spec in [RX_PUMP_TASK, PROTOCOL_TASK, SAMPLER_TASK, ACTUATION_TASK] {
            assert!(spec.name.ends_with('\0'));
            assert!(!spec.display_name().contains('\0'));
        }
    }

    #[test]
    fn host_spawn_runs_closure() {
        let handle = spawn_task(SAMPLER_TASK, || {}).unwrap();
        assert_eq!(handle.thread().name(), Some("sampler"));
        handle.join().unwrap();
    }
}

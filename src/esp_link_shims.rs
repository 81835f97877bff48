//! ESP-IDF runtime symbol providers for `critical-section` and `embassy-time`.
//!
//! Both crates resolve their platform hooks by symbol name at link time.
//! On the host the `std` features of those crates provide them; on the
//! device these definitions do.
//!
//! Timer wakeups are served by one `time-wake` thread that sleeps until
//! the earliest registered deadline, so every `Timer`, `Ticker` and
//! `with_timeout` in the pipeline shares a single FreeRTOS task.


use core::cell::{Cell, RefCell};
use core::task::Waker;
use core::time::Duration;
use std::sync::{Condvar, Mutex, MutexGuard, OnceLock, PoisonError};

// ── critical-section ──────────────────────────────────────────

static CRITICAL_SECTION_MUTEX: Mutex<()> = Mutex::new(());

thread_local! {
    static CRITICAL_SECTION_DEPTH: Cell<u8> = const { Cell::new(0) };
    static CRITICAL_SECTION_GUARD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

/// Re-entrant per thread: only the outermost acquire takes the lock.
#[unsafe(no_mangle)]
fn _critical_section_1_0_acquire() {
    CRITICAL_SECTION_DEPTH.with(|depth| {
        if depth.get() == 0 {
            let lock = CRITICAL_SECTION_MUTEX
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            CRITICAL_SECTION_GUARD.with(|guard| *guard.borrow_mut() = Some(lock));
        }
        depth.set(depth.get().saturating_add(1));
    });
}

#[unsafe(no_mangle)]
fn _critical_section_1_0_release(_restore: ()) {
    CRITICAL_SECTION_DEPTH.with(|depth| match depth.get() {
        0 => {}
        1 => {
            depth.set(0);
            CRITICAL_SECTION_GUARD.with(|guard| *guard.borrow_mut() = None);
        }
        d => depth.set(d - 1),
    });
}

// ── embassy-time driver ───────────────────────────────────────

/// Ticks are microseconds since boot (embassy's default 1 MHz tick).
#[unsafe(no_mangle)]
fn _embassy_time_now() -> u64 {
    // SAFETY: reads the monotonic RTC-backed counter; callable from any task.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
}

#[unsafe(no_mangle)]
fn _embassy_time_schedule_wake(at: u64, waker: &Waker) {
    let queue = wake_queue();
    let mut pending = queue.pending.lock().unwrap_or_else(PoisonError::into_inner);
    match pending.iter_mut().find(|(_, w)| w.will_wake(waker)) {
        Some(entry) => entry.0 = entry.0.min(at),
        None => pending.push((at, waker.clone())),
    }
    queue.changed.notify_one();
}

struct WakeQueue {
    pending: Mutex<Vec<(u64, Waker)>>,
    changed: Condvar,
}

fn wake_queue() -> &'static WakeQueue {
    static QUEUE: OnceLock<WakeQueue> = OnceLock::new();
    let mut fresh = false;
    let queue = QUEUE.get_or_init(|| {
        fresh = true;
        WakeQueue {
            pending: Mutex::new(Vec::new()),
            changed: Condvar::new(),
        }
    });
    if fresh {
        if let Err(e) = std::thread::Builder::new()
            .name("time-wake".into())
            .stack_size(3 * 1024)
            .spawn(move || {
                run_wake_thread(queue);
            })
        {
            log::error!("time driver: wake thread spawn failed: {}", e);
        }
    }
    queue
}

fn run_wake_thread(queue: &'static WakeQueue) -> ! {
    let mut due: Vec<Waker> = Vec::new();
    loop {
        {
            let mut pending = queue.pending.lock().unwrap_or_else(PoisonError::into_inner);
            loop {
                let now = _embassy_time_now();
                let mut next = u64::MAX;
                pending.retain(|(at, w)| {
                    if *at <= now {
                        due.push(w.clone());
                        false
                    } else {
                        next = next.min(*at);
                        true
                    }
                });
                if !due.is_empty() {
                    break;
                }
                pending = if next == u64::MAX {
                    queue.changed.wait(pending).unwrap_or_else(PoisonError::into_inner)
                } else {
                    queue
                        .changed
                        .wait_timeout(pending, Duration::from_micros(next - now))
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                };
            }
        }
        // Wake outside the lock; a woken task may re-register immediately.
        for w in due.drain(..) {
            w.wake();
        }
    }
}

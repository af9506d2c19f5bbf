//! A manual-reset wake signal, the Rust translation of the reference
//! source's `threading.Event` (`intr_event`). Level-triggered, not
//! edge-triggered: `wait` returns immediately if the event is already set.

use std::sync::{Condvar, Mutex};

pub(crate) struct IntrEvent {
    flag: Mutex<bool>,
    condvar: Condvar,
}

impl IntrEvent {
    pub fn new() -> Self {
        IntrEvent {
            flag: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    pub fn set(&self) {
        let mut flag = self.flag.lock().unwrap();
        *flag = true;
        self.condvar.notify_all();
    }

    pub fn clear(&self) {
        let mut flag = self.flag.lock().unwrap();
        *flag = false;
    }

    /// Blocks until the event is set.
    pub fn wait(&self) {
        let mut flag = self.flag.lock().unwrap();
        while !*flag {
            flag = self.condvar.wait(flag).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn wait_returns_once_set_from_another_thread() {
        let event = Arc::new(IntrEvent::new());
        let waiter = Arc::clone(&event);
        let handle = std::thread::spawn(move || waiter.wait());
        std::thread::sleep(Duration::from_millis(20));
        event.set();
        handle.join().unwrap();
    }

    #[test]
    fn wait_returns_immediately_if_already_set() {
        let event = IntrEvent::new();
        event.set();
        event.wait();
    }
}

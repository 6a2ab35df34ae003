use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum_server::Handle;

use crate::*;

state!(SHUTDOWN: Shutdown = { Shutdown::default() });

/// Interface for graceful shutdowns
#[derive(Default)]
pub struct Shutdown {
    initiated: AtomicBool,
    server_handles: std::sync::RwLock<Vec<Handle>>,
    running_scheduled_tasks: AtomicUsize,
    hooks: std::sync::RwLock<Vec<Box<dyn Fn() + Send + Sync>>>,
}

impl Shutdown {
    pub fn initiate(&self) {
        if self.in_progress() {
            return;
        } else {
            warn!("Initiating shutdown process");
            self.initiated.store(true, Ordering::SeqCst);
        }
        // stopping the servers
        for handle in self.server_handles.read().unwrap().iter() {
            handle.graceful_shutdown(Some(std::time::Duration::from_secs(1)))
        }
        // awaiting currently running scheduled tasks
        while self.running_scheduled_tasks.load(Ordering::SeqCst) > 0 {
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
        // flushing stores and other registered cleanups
        for hook in self.hooks.read().unwrap().iter() {
            hook();
        }
    }

    pub fn in_progress(&self) -> bool {
        self.initiated.load(Ordering::SeqCst)
    }

    pub fn new_server_handle(&self) -> Handle {
        let handle = Handle::new();
        self.server_handles.write().unwrap().push(handle.clone());
        handle
    }

    /// Registers a cleanup to run after the servers stopped and scheduled tasks finished
    pub fn on_shutdown(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.hooks.write().unwrap().push(Box::new(hook));
    }

    pub(crate) fn scheduled_task_started(&self) {
        self.running_scheduled_tasks.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn scheduled_task_finished(&self) {
        self.running_scheduled_tasks.fetch_sub(1, Ordering::SeqCst);
    }
}

//! Thread-safe handle for hosts that call a sampler from several threads.
//!
//! A plain [`Sampler`] assumes one thread of control per node. When input
//! and output callbacks of the same node run on different threads, share a
//! `SharedSampler` instead: counter updates and the window check then happen
//! under one lock, so the close-and-emit step still runs exactly once.

use crate::config::JobConfig;
use crate::error::{MonitorError, Result};
use crate::monitor::sampler::{Sampler, SamplerState};
use crate::monitor::summary::ObservationSummary;
use crate::pipeline::{TupleShape, WindowState};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable, lock-protected sampler.
#[derive(Clone)]
pub struct SharedSampler {
    inner: Arc<Mutex<Sampler>>,
}

impl SharedSampler {
    pub fn new(sampler: Sampler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sampler)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Sampler>> {
        self.inner.lock().map_err(|_| MonitorError::Poisoned)
    }

    pub fn report_input<T: TupleShape + ?Sized>(
        &self,
        value: &T,
        config: &JobConfig,
    ) -> Result<()> {
        self.lock()?.report_input(value, config)
    }

    pub fn report_output<T: TupleShape + ?Sized>(&self, value: &T) -> Result<()> {
        self.lock()?.report_output(value)
    }

    pub fn report_join_selectivity(&self, left: u64, right: u64, matched: u64) -> Result<()> {
        self.lock()?.report_join_selectivity(left, right, matched);
        Ok(())
    }

    pub fn report_window_length<S: WindowState + ?Sized>(&self, state: &S) -> Result<()> {
        self.lock()?.report_window_length(state)
    }

    pub fn set_disabled(&self, disabled: bool) -> Result<()> {
        self.lock()?.set_disabled(disabled);
        Ok(())
    }

    pub fn state(&self) -> Result<SamplerState> {
        Ok(self.lock()?.state())
    }

    /// Copy of the current summary.
    pub fn summary(&self) -> Result<ObservationSummary> {
        Ok(self.lock()?.summary().clone())
    }

    /// Run `f` with the sampler locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Sampler) -> R) -> Result<R> {
        Ok(f(&mut *self.lock()?))
    }
}

impl From<Sampler> for SharedSampler {
    fn from(sampler: Sampler) -> Self {
        Self::new(sampler)
    }
}

impl std::fmt::Debug for SharedSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Ok(sampler) => f.debug_tuple("SharedSampler").field(&*sampler).finish(),
            Err(_) => f.write_str("SharedSampler(<locked>)"),
        }
    }
}

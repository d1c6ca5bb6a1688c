use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use scout_core::{AdapterDescriptor, AdapterKey, BackendAdapter, ScoutError};

/// One registered adapter with its static descriptor.
pub(crate) struct RegisteredAdapter {
    pub(crate) descriptor: AdapterDescriptor,
    pub(crate) adapter: Arc<dyn BackendAdapter>,
    initialized: AtomicBool,
}

impl RegisteredAdapter {
    pub(crate) const fn key(&self) -> AdapterKey {
        self.descriptor.id
    }

    pub(crate) fn supports_detail(&self) -> bool {
        self.adapter.as_detail_provider().is_some()
    }

    /// Initialize the adapter once. A failure is reported as `Initialization`
    /// and retried on the next call.
    pub(crate) async fn ensure_initialized(&self) -> Result<(), ScoutError> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }
        match self.adapter.initialize().await {
            Ok(()) => {
                self.initialized.store(true, Ordering::Release);
                Ok(())
            }
            Err(e @ ScoutError::Initialization { .. }) => Err(e),
            Err(other) => Err(ScoutError::initialization(
                self.key().as_str(),
                other.to_string(),
            )),
        }
    }

    pub(crate) fn mark_uninitialized(&self) {
        self.initialized.store(false, Ordering::Release);
    }
}

/// Adapters in failover order: ascending priority, ties by registration order.
pub(crate) struct Registry {
    entries: Vec<RegisteredAdapter>,
}

impl Registry {
    pub(crate) fn new(registrations: Vec<(AdapterDescriptor, Arc<dyn BackendAdapter>)>) -> Self {
        let mut entries: Vec<RegisteredAdapter> = registrations
            .into_iter()
            .map(|(descriptor, adapter)| RegisteredAdapter {
                descriptor,
                adapter,
                initialized: AtomicBool::new(false),
            })
            .collect();
        // Stable sort keeps registration order among equal priorities.
        entries.sort_by_key(|e| e.descriptor.priority);
        Self { entries }
    }

    pub(crate) fn entries(&self) -> &[RegisteredAdapter] {
        &self.entries
    }

    pub(crate) fn get(&self, slot: usize) -> Option<&RegisteredAdapter> {
        self.entries.get(slot)
    }

    pub(crate) fn descriptors(&self) -> impl Iterator<Item = &AdapterDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

//! In-memory persistence adapter.

use super::{BoxFuture, FormPatch, FormPayload, PersistError, PersistResult, PersistenceAdapter};
use crate::schema::FormSchema;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// In-memory adapter for testing and ephemeral use.
///
/// Counts create and update calls, and can be told to fail with a given
/// backend message.
#[derive(Default)]
pub struct MemoryAdapter {
    forms: RwLock<HashMap<String, FormSchema>>,
    failure: RwLock<Option<String>>,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `message`, or succeed again
    /// with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = message.map(str::to_string);
        }
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Stored copy of a form, if present.
    pub fn get(&self, id: &str) -> Option<FormSchema> {
        self.forms.read().ok()?.get(id).cloned()
    }

    fn check_failure(&self) -> PersistResult<()> {
        let failure = self.failure.read().map_err(lock_error)?;
        match failure.as_ref() {
            Some(message) => Err(PersistError::Server(message.clone())),
            None => Ok(()),
        }
    }
}

fn lock_error(e: impl std::fmt::Display) -> PersistError {
    PersistError::Io(format!("Lock error: {}", e))
}

impl PersistenceAdapter for MemoryAdapter {
    fn create(&self, payload: &FormPayload) -> BoxFuture<'_, PersistResult<String>> {
        let schema = payload.clone().into_schema();
        Box::pin(async move {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.check_failure()?;
            let id = Uuid::new_v4().to_string();
            let mut forms = self.forms.write().map_err(lock_error)?;
            forms.insert(id.clone(), schema);
            Ok(id)
        })
    }

    fn update(&self, id: &str, patch: &FormPatch) -> BoxFuture<'_, PersistResult<()>> {
        let id = id.to_string();
        let patch = patch.clone();
        Box::pin(async move {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.check_failure()?;
            let mut forms = self.forms.write().map_err(lock_error)?;
            let form = forms.get_mut(&id).ok_or(PersistError::NotFound(id))?;
            patch.apply_to(form);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, PersistResult<FormSchema>> {
        let id = id.to_string();
        Box::pin(async move {
            self.check_failure()?;
            let forms = self.forms.read().map_err(lock_error)?;
            forms.get(&id).cloned().ok_or(PersistError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, PersistResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut forms = self.forms.write().map_err(lock_error)?;
            forms.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, PersistResult<Vec<String>>> {
        Box::pin(async move {
            let forms = self.forms.read().map_err(lock_error)?;
            Ok(forms.keys().cloned().collect())
        })
    }
}

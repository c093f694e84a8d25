//! Open handle registry
//!
//! A fixed-capacity table mapping live handle ids to the resource they name.
//! Removal swaps the last record into the freed slot, so the order of the
//! remaining records is not stable across a revoke.

use crate::error::{Result, ShellError};
use log::debug;
use std::fs::File;

/// Identifier users type to refer to an open handle
pub type HandleId = i32;

/// One open resource and the name it was opened under
#[derive(Debug)]
pub struct HandleRecord<R = File> {
    id: HandleId,
    display_name: String,
    resource: R,
}

impl<R> HandleRecord<R> {
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Path string the resource was opened with
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Take the resource back, releasing the retained name
    pub fn into_resource(self) -> R {
        self.resource
    }
}

/// Bounded table of open handles
#[derive(Debug)]
pub struct HandleRegistry<R = File> {
    records: Vec<HandleRecord<R>>,
    capacity: usize,
}

impl<R> HandleRegistry<R> {
    /// Create an empty registry holding at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a newly opened resource under `id`.
    ///
    /// When the registry is full the resource is dropped (which closes a
    /// `File`) and `CapacityExceeded` is returned; the count is unchanged.
    pub fn register(
        &mut self,
        id: HandleId,
        resource: R,
        display_name: impl Into<String>,
    ) -> Result<HandleId> {
        if self.is_full() {
            return Err(ShellError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        debug_assert!(self.find(id).is_none(), "handle {} registered twice", id);

        let display_name = display_name.into();
        debug!("register handle {} ({})", id, display_name);
        self.records.push(HandleRecord {
            id,
            display_name,
            resource,
        });
        Ok(id)
    }

    /// Look up a live record by id
    pub fn find(&self, id: HandleId) -> Option<&HandleRecord<R>> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Remove the record for `id` and hand it back to the caller.
    ///
    /// The last record moves into the freed slot.
    pub fn revoke(&mut self, id: HandleId) -> Result<HandleRecord<R>> {
        let index = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or(ShellError::HandleNotFound(id))?;

        let record = self.records.swap_remove(index);
        debug!("revoke handle {} ({})", id, record.display_name);
        Ok(record)
    }

    /// Iterate over every live record in current table order
    pub fn enumerate(&self) -> std::slice::Iter<'_, HandleRecord<R>> {
        self.records.iter()
    }

    /// Remove every record, for exit-time cleanup
    pub fn drain(&mut self) -> std::vec::Drain<'_, HandleRecord<R>> {
        self.records.drain(..)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

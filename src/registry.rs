//! Dialog registry
//!
//! An explicit registry object built once at process start and passed by
//! handle to the dispatcher. There is no global dialog table.

use crate::dialog::DialogDescriptor;
use crate::error::RegistryError;
use std::collections::HashMap;

/// Immutable set of dialog descriptors, validated at build time.
#[derive(Debug, Clone, Default)]
pub struct DialogRegistry {
    dialogs: HashMap<String, DialogDescriptor>,
}

impl DialogRegistry {
    pub fn builder() -> DialogRegistryBuilder {
        DialogRegistryBuilder::default()
    }

    pub fn get(&self, id: &str) -> Option<&DialogDescriptor> {
        self.dialogs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dialogs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}

/// Collects descriptors and validates them as a set.
#[derive(Debug, Default)]
pub struct DialogRegistryBuilder {
    dialogs: Vec<DialogDescriptor>,
}

impl DialogRegistryBuilder {
    pub fn register(mut self, descriptor: DialogDescriptor) -> Self {
        self.dialogs.push(descriptor);
        self
    }

    /// Validate the set and freeze it. Configuration faults here are fatal:
    /// duplicate ids, empty waterfalls, or `Begin` steps pointing at
    /// dialogs that were never registered.
    pub fn build(self) -> Result<DialogRegistry, RegistryError> {
        let mut dialogs: HashMap<String, DialogDescriptor> =
            HashMap::with_capacity(self.dialogs.len());

        for descriptor in self.dialogs {
            if descriptor.steps.is_empty() {
                return Err(RegistryError::EmptyDialog(descriptor.id));
            }
            if dialogs.contains_key(&descriptor.id) {
                return Err(RegistryError::DuplicateDialog(descriptor.id));
            }
            dialogs.insert(descriptor.id.clone(), descriptor);
        }

        for descriptor in dialogs.values() {
            for child in descriptor.children() {
                if !dialogs.contains_key(child) {
                    return Err(RegistryError::UnknownChild {
                        dialog: descriptor.id.clone(),
                        child: child.to_string(),
                    });
                }
            }
        }

        Ok(DialogRegistry { dialogs })
    }
}

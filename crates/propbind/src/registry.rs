// crates/propbind/src/registry.rs
// ============================================================================
// Module: Descriptor Registry
// Description: Process-wide, lazily populated descriptor cache.
// Purpose: Build each configuration type's descriptors exactly once.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! [`describe`] returns the [`DescriptorSet`] for a configuration type,
//! building it on first use and caching it (or its [`RegistrationError`]) for
//! the lifetime of the process. Concurrent first use is serialized per type by
//! a `OnceLock`, so `Configuration::describe` runs exactly once. The type map
//! itself is only write-locked the first time a type is seen.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::OnceLock;
use std::sync::PoisonError;
use std::sync::RwLock;

use tracing::debug;

use crate::descriptor::Configuration;
use crate::descriptor::DescriptorSet;
use crate::descriptor::DescriptorSetBuilder;
use crate::descriptor::RegistrationError;

// ============================================================================
// SECTION: Registry State
// ============================================================================

/// Cached build outcome for one configuration type.
type Slot<T> = OnceLock<Result<DescriptorSet<T>, RegistrationError>>;
/// Type-erased slot reference stored in the registry map.
type ErasedSlot = &'static (dyn Any + Send + Sync);

/// Configuration type to leaked, per-type slot.
static REGISTRY: OnceLock<RwLock<HashMap<TypeId, ErasedSlot>>> = OnceLock::new();

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Returns the descriptor set for `T`, building it on first use.
///
/// # Errors
///
/// Returns [`RegistrationError`] when `T` is misdeclared. The error is cached;
/// every later call reports the same error.
pub fn describe<T: Configuration>() -> Result<&'static DescriptorSet<T>, RegistrationError> {
    let slot = slot_for::<T>()?;
    slot.get_or_init(build::<T>).as_ref().map_err(Clone::clone)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Finds or creates the slot for `T`.
fn slot_for<T: Configuration>() -> Result<&'static Slot<T>, RegistrationError> {
    let registry = REGISTRY.get_or_init(|| RwLock::new(HashMap::new()));
    let type_id = TypeId::of::<T>();
    let existing = registry.read().unwrap_or_else(PoisonError::into_inner).get(&type_id).copied();
    let erased = match existing {
        Some(erased) => erased,
        None => {
            let mut map = registry.write().unwrap_or_else(PoisonError::into_inner);
            *map.entry(type_id).or_insert_with(|| {
                let slot: ErasedSlot = Box::leak(Box::new(Slot::<T>::new()));
                slot
            })
        }
    };
    erased.downcast_ref::<Slot<T>>().ok_or(RegistrationError::RegistryCorrupted {
        config: T::NAME,
    })
}

/// Runs the type's declarations and validates them.
fn build<T: Configuration>() -> Result<DescriptorSet<T>, RegistrationError> {
    let mut builder = DescriptorSetBuilder::new();
    T::describe(&mut builder);
    let result = builder.build();
    match &result {
        Ok(set) => debug!(
            config = T::NAME,
            fields = set.fields().len(),
            constraints = set.constraints().len(),
            "registered configuration descriptors"
        ),
        Err(error) => debug!(config = T::NAME, %error, "configuration registration failed"),
    }
    result
}

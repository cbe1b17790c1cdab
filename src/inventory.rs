// 🧮 Inventory - checked operations over the storage registry
//
// Untrusted text comes in here, numbers go out to the unchecked core.
// Every rejection is an `InputError`; callers treat all of them as
// "ignore the request" and never surface them as failures.

use crate::registry::{RegistryEntry, StorageId, StorageRegistry};
use crate::storage::Storage;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("not a number: {0:?}")]
    InvalidNumber(String),

    #[error("name is empty")]
    EmptyName,

    #[error("capacity must be greater than zero")]
    NonPositiveCapacity,

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("nothing to move after clamping")]
    NothingToMove,

    #[error("storage {0} not found")]
    NotFound(StorageId),

    #[error("unknown action: {0:?}")]
    UnknownAction(String),
}

pub type InputResult<T> = std::result::Result<T, InputError>;

// ============================================================================
// POLICY
// ============================================================================

/// What to do with an amount that does not fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Cut deposits to the free space and withdrawals to the balance
    #[default]
    Clamp,

    /// Apply the raw amount; balance may exceed capacity or go negative
    PassThrough,
}

impl OverflowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverflowPolicy::Clamp => "clamp",
            OverflowPolicy::PassThrough => "pass-through",
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamp" | "clamped" => Ok(OverflowPolicy::Clamp),
            "pass-through" | "passthrough" | "unclamped" => Ok(OverflowPolicy::PassThrough),
            other => Err(format!("unknown overflow policy: {}", other)),
        }
    }
}

// ============================================================================
// EDIT REQUESTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Update,
    Add,
    Remove,
}

impl FromStr for EditAction {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update" => Ok(EditAction::Update),
            "add" => Ok(EditAction::Add),
            "remove" => Ok(EditAction::Remove),
            other => Err(InputError::UnknownAction(other.to_string())),
        }
    }
}

/// Raw fields of an edit submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
}

/// What an accepted edit did
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Renamed(String),
    Deposited(f64),
    Withdrew(f64),
}

/// Parse a numeric field. A missing field counts as zero; an empty one
/// is not a number.
pub fn parse_amount(text: Option<&str>) -> InputResult<f64> {
    let Some(text) = text else {
        return Ok(0.0);
    };

    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::InvalidNumber(trimmed.to_string())),
    }
}

fn clean_name(text: Option<&str>) -> InputResult<String> {
    let name = text.unwrap_or_default().trim();
    if name.is_empty() {
        Err(InputError::EmptyName)
    } else {
        Ok(name.to_string())
    }
}

// ============================================================================
// INVENTORY
// ============================================================================

/// Totals across every storage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    pub storages: usize,
    pub total_capacity: f64,
    pub total_balance: f64,
    pub total_available: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    registry: StorageRegistry,
    policy: OverflowPolicy,
}

impl Inventory {
    pub fn new(policy: OverflowPolicy) -> Self {
        Inventory {
            registry: StorageRegistry::new(),
            policy,
        }
    }

    pub fn with_registry(registry: StorageRegistry, policy: OverflowPolicy) -> Self {
        Inventory { registry, policy }
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn registry(&self) -> &StorageRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StorageRegistry {
        &mut self.registry
    }

    pub fn get(&self, id: StorageId) -> Option<&RegistryEntry> {
        self.registry.get(id)
    }

    /// Create a storage from form text.
    ///
    /// Capacity must be positive; the initial balance is pulled into
    /// `[0, capacity]`.
    pub fn create(
        &mut self,
        name: Option<&str>,
        capacity: Option<&str>,
        initial_balance: Option<&str>,
    ) -> InputResult<StorageId> {
        let name = clean_name(name)?;
        let capacity = parse_amount(capacity)?;
        let initial_balance = parse_amount(initial_balance)?;

        if capacity <= 0.0 {
            return Err(InputError::NonPositiveCapacity);
        }

        let initial_balance = initial_balance.min(capacity).max(0.0);
        let id = self.registry.add(name.clone(), Storage::new(capacity, initial_balance));

        info!(id, name = %name, capacity, initial_balance, "storage created");
        Ok(id)
    }

    pub fn rename(&mut self, id: StorageId, name: Option<&str>) -> InputResult<String> {
        let entry = self.registry.get_mut(id).ok_or(InputError::NotFound(id))?;
        let name = clean_name(name)?;

        entry.rename(name.clone());
        info!(id, name = %name, "storage renamed");
        Ok(name)
    }

    /// Add to a storage; returns the amount actually put in
    pub fn deposit(&mut self, id: StorageId, amount: Option<&str>) -> InputResult<f64> {
        let policy = self.policy;
        let entry = self.registry.get_mut(id).ok_or(InputError::NotFound(id))?;
        let amount = positive(parse_amount(amount)?)?;

        let amount = match policy {
            OverflowPolicy::Clamp => positive(amount.min(entry.storage.available_space()))
                .map_err(|_| InputError::NothingToMove)?,
            OverflowPolicy::PassThrough => amount,
        };

        entry.storage.deposit(amount);
        info!(id, amount, balance = entry.storage.balance(), "deposit");
        Ok(amount)
    }

    /// Take from a storage; returns the amount actually taken out
    pub fn withdraw(&mut self, id: StorageId, amount: Option<&str>) -> InputResult<f64> {
        let policy = self.policy;
        let entry = self.registry.get_mut(id).ok_or(InputError::NotFound(id))?;
        let amount = positive(parse_amount(amount)?)?;

        let amount = match policy {
            OverflowPolicy::Clamp => positive(amount.min(entry.storage.balance()))
                .map_err(|_| InputError::NothingToMove)?,
            OverflowPolicy::PassThrough => amount,
        };

        let taken = entry.storage.withdraw(amount);
        info!(id, amount = taken, balance = entry.storage.balance(), "withdrawal");
        Ok(taken)
    }

    /// Remove a storage; unknown ids are ignored
    pub fn delete(&mut self, id: StorageId) {
        if self.registry.get(id).is_some() {
            info!(id, "storage deleted");
        }
        self.registry.delete(id);
    }

    /// Dispatch an edit form submission
    pub fn apply(&mut self, id: StorageId, request: &EditRequest) -> InputResult<EditOutcome> {
        if self.registry.get(id).is_none() {
            return Err(InputError::NotFound(id));
        }

        let action: EditAction = request.action.as_deref().unwrap_or_default().parse()?;

        match action {
            EditAction::Update => self
                .rename(id, request.name.as_deref())
                .map(EditOutcome::Renamed),
            EditAction::Add => self
                .deposit(id, request.amount.as_deref())
                .map(EditOutcome::Deposited),
            EditAction::Remove => self
                .withdraw(id, request.amount.as_deref())
                .map(EditOutcome::Withdrew),
        }
    }

    pub fn summary(&self) -> InventorySummary {
        let entries = self.registry.list_all();

        InventorySummary {
            storages: entries.len(),
            total_capacity: entries.values().map(|e| e.storage.capacity()).sum(),
            total_balance: entries.values().map(|e| e.storage.balance()).sum(),
            total_available: entries.values().map(|e| e.storage.available_space()).sum(),
        }
    }
}

fn positive(amount: f64) -> InputResult<f64> {
    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(InputError::NonPositiveAmount)
    }
}

// ============================================================================
// TESTS
// ============================================================================

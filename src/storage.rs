// 📦 Storage Entity - a bounded quantity
//
// Capacity is fixed at creation, balance moves with deposits and withdrawals.
//
// The entity trusts its caller: nothing here checks that the balance stays
// inside [0, capacity]. Range policy lives in `inventory`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    capacity: f64,
    balance: f64,
}

impl Storage {
    /// Create a storage with the given capacity and starting balance.
    ///
    /// Both values are stored verbatim.
    pub fn new(capacity: f64, initial_balance: f64) -> Self {
        Storage {
            capacity,
            balance: initial_balance,
        }
    }

    /// Create an empty storage
    pub fn with_capacity(capacity: f64) -> Self {
        Self::new(capacity, 0.0)
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// How much more fits (derived, never stored)
    pub fn available_space(&self) -> f64 {
        self.capacity - self.balance
    }

    pub fn deposit(&mut self, amount: f64) {
        self.balance += amount;
    }

    /// Take `amount` out and hand it back, whether or not it was there.
    pub fn withdraw(&mut self, amount: f64) -> f64 {
        self.balance -= amount;
        amount
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "balance = {}, space left {}",
            self.balance,
            self.available_space()
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

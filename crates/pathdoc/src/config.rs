use serde::{Deserialize, Serialize};

/// Per-store behavior policy.
///
/// Sub-stores obtained through [`Store::get_store`](crate::Store::get_store)
/// inherit the policy of the store they were taken from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// When `true`, a failed typed conversion in
    /// [`Store::read`](crate::Store::read) panics instead of returning
    /// [`DocError::Conversion`](crate::DocError::Conversion). Meant for
    /// debugging sessions where the first bad read should stop the process.
    pub strict: bool,
}

impl StoreConfig {
    /// The strict policy: conversion failures abort.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

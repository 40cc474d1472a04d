//! Static record description consumed by the mapper.
//!
//! # Responsibility
//! - Describe record types as ordered, typed attributes.
//! - Expose get/set-by-name access to record instances without reflection.
//!
//! # Invariants
//! - Attribute order is declaration order and drives column order.
//! - Exactly one attribute per mapped record is flagged as primary key.

pub mod record;
pub mod shape;

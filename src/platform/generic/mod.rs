// glbridge/src/platform/generic/mod.rs
//
//! Backends that aren't tied to a particular operating system.

#[cfg(any(test, mock_driver))]
pub mod mock;

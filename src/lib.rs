// Copyright 2026 bizscout Contributors
// SPDX-License-Identifier: Apache-2.0

//! bizscout library — business-directory harvest pipeline.
//!
//! This library crate exposes the core modules for integration testing.

#![allow(dead_code, clippy::new_without_default)]

pub mod cli;
pub mod config;
pub mod events;
pub mod export;
pub mod extract;
pub mod harvest;
pub mod renderer;
pub mod session;
pub mod stealth;

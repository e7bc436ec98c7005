// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Course extraction API endpoint
//!
//! Provides the `/extract` HTTP endpoint.

pub mod handler;
pub mod request;

pub use handler::extract_handler;
pub use request::ExtractApiRequest;

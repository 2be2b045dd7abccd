// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the client data layer and its collaborators.

pub mod transport;

pub use transport::{SharedTransport, Transport};

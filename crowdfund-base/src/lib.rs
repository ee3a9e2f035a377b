// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Basic types shared by the crowdfund crates: token amounts in ether and wei, millisecond
//! timestamps, clocks, and the display helpers built on them.

#![deny(missing_docs)]

pub mod data_types;
pub mod time;
pub mod tracing;

/// The fixed set of campaign categories offered to campaign creators.
pub const CATEGORIES: [&str; 5] = [
    "Education",
    "Health",
    "Environment",
    "Arts & Culture",
    "Technology",
];

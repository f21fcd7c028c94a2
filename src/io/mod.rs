// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for image folders, annotation files and dialogs.

pub mod dialogs;
pub mod media;
pub mod serialization;

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Lookups by id return `Ok(None)` when the row does not exist.

pub mod accounts;
pub mod audit;
pub mod employees;
pub mod reviews;
pub mod tokens;

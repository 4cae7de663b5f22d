// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.

pub mod accounts;
pub mod audit;
pub mod employees;
pub mod reviews;
pub mod tokens;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rd-storage: Durable artifact store for research output.
//!
//! Layout under the outputs root, one directory per company:
//!
//! ```text
//! <root>/<company>/
//!   <company>_<i>.txt / .md         topic content (i = 1..=5)
//!   <company>_<i>.meta.json         first-run content and edit history
//!   .running .heartbeat             live-run markers (mtime is the signal)
//!   .done | .aborted                terminal marker of the last run
//!   <company>_proposal.txt / .md    cached proposal
//!   <company>_proposal_progress.json
//! ```

mod fs;
mod markers;
mod proposal;
mod store;
mod topics;

pub use markers::MarkerSnapshot;
pub use store::{ArtifactStore, StoreError};
pub use topics::EditRecord;

//! Optional observability helpers for authentication stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `accountsync.stage` with the `stage`
//!   (remote call) and `step` (call site) fields.
//! - Enable `metrics` to increment the `accountsync_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Authentication stages observed per attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
	/// Whole login attempt, token exchange through profile confirmation.
	Login,
	/// Credential verification against the token endpoint.
	TokenExchange,
	/// Profile fetch through the web-service gateway.
	ProfileLookup,
	/// Post-authentication profile refresh.
	ProfileSync,
}
impl StageKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageKind::Login => "login",
			StageKind::TokenExchange => "token_exchange",
			StageKind::ProfileLookup => "profile_lookup",
			StageKind::ProfileSync => "profile_sync",
		}
	}
}
impl Display for StageKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to an orchestrator operation.
	Attempt,
	/// Granted or matched outcome.
	Success,
	/// Denied or degraded outcome.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

//! Audit events emitted at every orchestration decision point.
//!
//! Events are the only record of why a login was denied or a sync was skipped: end users only
//! ever see an invalid-credentials message, the detail lives in this trail. Emission is
//! fire-and-forget through an injected [`AuditSink`] capability, so hosts bridge events into
//! their own event system and test doubles capture them directly. The core never reads events
//! back, and the password value never appears in any message.

// self
use crate::_prelude::*;

/// Coarse severity attached to each audit category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
	/// Expected decision-point record.
	Info,
	/// Denied attempt or negative outcome.
	Warning,
	/// Remote or structural failure requiring operator attention.
	Error,
}

/// Audit categories emitted by the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
	/// A login attempt was denied.
	LoginFailed,
	/// The remote issued a token for the attempt.
	RemoteTokenReturned,
	/// A web-service call returned an error or unexpected shape.
	WebServiceError,
	/// Profile fields could not be refreshed from the remote.
	ProfileSyncError,
}
impl AuditKind {
	/// Returns a stable label suitable for log or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuditKind::LoginFailed => "login_failed",
			AuditKind::RemoteTokenReturned => "remote_token_returned",
			AuditKind::WebServiceError => "web_service_error",
			AuditKind::ProfileSyncError => "profile_sync_error",
		}
	}

	/// Returns the coarse severity for the category.
	pub const fn severity(self) -> Severity {
		match self {
			AuditKind::LoginFailed => Severity::Warning,
			AuditKind::RemoteTokenReturned => Severity::Info,
			AuditKind::WebServiceError | AuditKind::ProfileSyncError => Severity::Error,
		}
	}
}
impl Display for AuditKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One audit event: category, human-readable message, and emission timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
	/// Audit category.
	pub kind: AuditKind,
	/// Human-readable detail recorded for the trail.
	pub message: String,
	/// Moment the event was emitted.
	pub at: OffsetDateTime,
}
impl AuditEvent {
	/// Creates an event stamped with the current time.
	pub fn new(kind: AuditKind, message: impl Into<String>) -> Self {
		Self { kind, message: message.into(), at: OffsetDateTime::now_utc() }
	}

	/// Returns the coarse severity of the event.
	pub const fn severity(&self) -> Severity {
		self.kind.severity()
	}
}

/// Capability for receiving audit events, injected into the orchestrator.
///
/// Implementations must tolerate being called from concurrent attempts and must not block on
/// the caller's behalf; the orchestrator treats emission as fire-and-forget.
pub trait AuditSink
where
	Self: 'static + Send + Sync,
{
	/// Records one event.
	fn emit(&self, event: AuditEvent);
}

/// Sink that records events in memory; the test double for the audit trail.
#[derive(Debug, Default)]
pub struct CaptureSink(Mutex<Vec<AuditEvent>>);
impl CaptureSink {
	/// Returns a snapshot of the captured events.
	pub fn events(&self) -> Vec<AuditEvent> {
		self.0.lock().clone()
	}

	/// Drains and returns the captured events.
	pub fn take(&self) -> Vec<AuditEvent> {
		std::mem::take(&mut *self.0.lock())
	}

	/// Returns the messages captured for one category, in emission order.
	pub fn messages_of(&self, kind: AuditKind) -> Vec<String> {
		self.0
			.lock()
			.iter()
			.filter(|event| event.kind == kind)
			.map(|event| event.message.clone())
			.collect()
	}
}
impl AuditSink for CaptureSink {
	fn emit(&self, event: AuditEvent) {
		self.0.lock().push(event);
	}
}

/// Sink that discards every event, for hosts without an audit trail.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;
impl AuditSink for NullSink {
	fn emit(&self, _event: AuditEvent) {}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn severity_mapping_is_coarse() {
		assert_eq!(AuditKind::LoginFailed.severity(), Severity::Warning);
		assert_eq!(AuditKind::RemoteTokenReturned.severity(), Severity::Info);
		assert_eq!(AuditKind::WebServiceError.severity(), Severity::Error);
		assert_eq!(AuditKind::ProfileSyncError.severity(), Severity::Error);
	}

	#[test]
	fn capture_sink_records_in_emission_order() {
		let sink = CaptureSink::default();

		sink.emit(AuditEvent::new(AuditKind::WebServiceError, "first"));
		sink.emit(AuditEvent::new(AuditKind::LoginFailed, "second"));
		sink.emit(AuditEvent::new(AuditKind::WebServiceError, "third"));

		assert_eq!(sink.messages_of(AuditKind::WebServiceError), ["first", "third"]);
		assert_eq!(sink.events().len(), 3);
		assert_eq!(sink.take().len(), 3);
		assert!(sink.events().is_empty());
	}
}

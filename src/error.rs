//! Errors raised while generating a unique label.

/// Error returned by an existence check.
pub type OracleError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
	/// The existence check itself failed; the candidate was not verified.
	#[error("existence check failed for label {label:?}")]
	Oracle {
		label: String,
		#[source]
		source: OracleError,
	},
	/// Every candidate tried within the attempt budget was already taken.
	#[error("no free label after {attempts} attempts (last candidate {candidate:?})")]
	Exhausted { candidate: String, attempts: usize },
}

//! Unique label generation.
//!
//! A candidate label is checked against an existence oracle. On a
//! collision a trailing ` N` suffix is incremented (or ` 1` appended) and
//! the new candidate is checked again, until a free label is found or the
//! attempt budget runs out.

use crate::error::{GenerateError, OracleError};

/// Resolve `candidate` into a label for which `exists` reports no collision.
///
/// `exists` is called exactly once per candidate, in order. The returned
/// label is always the last value `exists` answered `false` for.
pub fn generate_unique<F>(
	candidate: &str,
	max_attempts: usize,
	mut exists: F,
) -> Result<String, GenerateError>
where
	F: FnMut(&str) -> Result<bool, OracleError>,
{
	let mut label = candidate.to_string();

	for attempt in 1..=max_attempts {
		log::trace!("checking label {:?} (attempt {})", label, attempt);

		let taken = exists(&label).map_err(|source| GenerateError::Oracle {
			label: label.clone(),
			source,
		})?;
		if !taken {
			return Ok(label);
		}

		let next = next_candidate(&label);
		log::debug!("label {:?} already exists, trying {:?}", label, next);
		label = next;
	}

	Err(GenerateError::Exhausted {
		candidate: label,
		attempts: max_attempts,
	})
}

/// Compute the candidate that follows a colliding label.
///
/// `Team` becomes `Team 1`, `Team 3` becomes `Team 4`. The digit run keeps
/// its width unless it carries over (`Team 09` -> `Team 10`,
/// `Team 99` -> `Team 100`).
pub fn next_candidate(label: &str) -> String {
	match numeric_suffix_start(label) {
		Some(start) => {
			let mut next = label[..start].to_string();
			next.push_str(&increment_digits(&label[start..]));
			next
		}
		None => format!("{} 1", label),
	}
}

/// Byte offset of a trailing digit run that is preceded by a space.
fn numeric_suffix_start(label: &str) -> Option<usize> {
	let digits = label
		.bytes()
		.rev()
		.take_while(|b| b.is_ascii_digit())
		.count();
	if digits == 0 {
		return None;
	}

	let start = label.len() - digits;
	if label[..start].ends_with(' ') {
		Some(start)
	} else {
		None
	}
}

/// Add one to a string of ASCII digits, with carry.
fn increment_digits(digits: &str) -> String {
	let mut bytes = digits.as_bytes().to_vec();
	let mut carry = true;

	for b in bytes.iter_mut().rev() {
		if *b == b'9' {
			*b = b'0';
		} else {
			*b += 1;
			carry = false;
			break;
		}
	}

	if carry {
		bytes.insert(0, b'1');
	}
	bytes.into_iter().map(char::from).collect()
}

//! Tag extraction from predict responses.

use crate::error::{ClarifaiError, Result};
use crate::types::Response;

/// Names of the first `n` concepts of the first output.
///
/// Concepts are returned in the order the service ranked them; nothing is
/// re-sorted locally. Fails instead of returning a short list.
///
/// # Errors
///
/// - [`ClarifaiError::NoOutputs`] if the response has no outputs
/// - [`ClarifaiError::InsufficientConcepts`] if the first output has
///   fewer than `n` concepts
pub fn top_tags(response: &Response, n: usize) -> Result<Vec<String>> {
    let output = response.outputs.first().ok_or(ClarifaiError::NoOutputs)?;
    let concepts = output.concepts();

    if concepts.len() < n {
        return Err(ClarifaiError::InsufficientConcepts {
            wanted: n,
            found: concepts.len(),
        });
    }

    Ok(concepts[..n].iter().map(|c| c.name.clone()).collect())
}

/// The five highest-ranked concept names. See [`top_tags`].
pub fn top_five(response: &Response) -> Result<Vec<String>> {
    top_tags(response, 5)
}

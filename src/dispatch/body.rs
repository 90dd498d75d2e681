//! Response body parsing and non-2xx classification.

// crates.io
use ::http::{HeaderMap, StatusCode, header::CONTENT_LENGTH};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::Failure, http::HttpResponse};

/// Parsed success value of a dispatched request.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
	/// JSON payload.
	Json(Value),
	/// The response carried no body (`204`, `Content-Length: 0`, or blank text).
	NoContent,
}
impl Body {
	/// Returns `true` for [`Body::NoContent`].
	pub fn is_no_content(&self) -> bool {
		matches!(self, Body::NoContent)
	}

	/// Borrows the JSON payload, if any.
	pub fn as_json(&self) -> Option<&Value> {
		match self {
			Body::Json(value) => Some(value),
			Body::NoContent => None,
		}
	}

	/// Takes the JSON payload, if any.
	pub fn into_json(self) -> Option<Value> {
		match self {
			Body::Json(value) => Some(value),
			Body::NoContent => None,
		}
	}

	/// Deserializes the payload into `T`; [`Body::NoContent`] decodes from `null`.
	///
	/// Shape mismatches are reported as transport-level failures whose message names the
	/// offending path.
	pub fn decode<T>(self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let value = self.into_json().unwrap_or(Value::Null);

		serde_path_to_error::deserialize(value).map_err(|e| {
			Error::network(format!(
				"Response body does not match the expected shape at `{}`: {}.",
				e.path(),
				e.inner()
			))
		})
	}
}

/// Turns a response into a [`Body`] or the structured error describing it.
pub(crate) fn read(response: HttpResponse, after_refresh: bool) -> Result<Body, Failure> {
	let status = response.status();

	if !status.is_success() {
		return Err(classify(&response, after_refresh).into());
	}
	if status == StatusCode::NO_CONTENT || declares_empty(response.headers()) {
		return Ok(Body::NoContent);
	}

	let bytes = response.into_body();
	let text = std::str::from_utf8(&bytes).map_err(Failure::error)?;

	if text.trim().is_empty() {
		return Ok(Body::NoContent);
	}

	Ok(Body::Json(serde_json::from_str(text)?))
}

/// Builds the structured error for a non-2xx response.
pub(crate) fn classify(response: &HttpResponse, after_refresh: bool) -> Error {
	let status = response.status();
	let status_text = status.canonical_reason().unwrap_or_default();
	let data = capture_data(response.body());
	let message = data
		.as_ref()
		.and_then(remote_message)
		.unwrap_or_else(|| fallback_message(status, status_text));
	let err = Error::http(status.as_u16(), status_text, message).with_after_refresh(after_refresh);

	match data {
		Some(data) => err.with_data(data),
		None => err,
	}
}

fn declares_empty(headers: &HeaderMap) -> bool {
	headers
		.get(CONTENT_LENGTH)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.trim().parse::<u64>().ok())
		== Some(0)
}

// JSON first, then raw text, then nothing.
fn capture_data(bytes: &[u8]) -> Option<Value> {
	if bytes.is_empty() {
		return None;
	}
	if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
		return Some(value);
	}

	std::str::from_utf8(bytes).ok().map(|text| Value::String(text.to_owned()))
}

fn remote_message(data: &Value) -> Option<String> {
	["message", "detail", "error"]
		.iter()
		.find_map(|key| {
			data.get(key).and_then(Value::as_str).filter(|message| !message.trim().is_empty())
		})
		.map(str::to_owned)
}

fn fallback_message(status: StatusCode, status_text: &str) -> String {
	if status_text.is_empty() {
		format!("Request failed with status {}.", status.as_u16())
	} else {
		format!("Request failed with status {} {status_text}.", status.as_u16())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() =
			StatusCode::from_u16(status).expect("Test status code should be valid.");

		response
	}

	#[test]
	fn empty_bodies_resolve_to_no_content() {
		assert_eq!(read(response(204, ""), false).ok(), Some(Body::NoContent));
		assert_eq!(read(response(200, "  \n"), false).ok(), Some(Body::NoContent));

		let mut declared = response(200, "");

		declared.headers_mut().insert(CONTENT_LENGTH, "0".parse().expect("Valid header."));

		assert_eq!(read(declared, false).ok(), Some(Body::NoContent));
	}

	#[test]
	fn malformed_json_becomes_network_error() {
		let failure = read(response(200, "{not json"), false).expect_err("Parse should fail.");
		let err = Error::normalize(failure);

		assert!(err.is_network());
	}

	#[test]
	fn classify_prefers_remote_message_and_keeps_data() {
		let err = classify(&response(422, r#"{"detail":"Name is required"}"#), false);

		assert_eq!(err.status, 422);
		assert_eq!(err.status_text, "Unprocessable Entity");
		assert_eq!(err.message, "Name is required");
		assert_eq!(err.data, Some(serde_json::json!({ "detail": "Name is required" })));
	}

	#[test]
	fn classify_skips_blank_message_fields() {
		let err = classify(&response(422, r#"{"message":"","detail":"Name is required"}"#), false);

		assert_eq!(err.message, "Name is required");

		let err = classify(&response(400, r#"{"message":"  ","detail":7,"error":"Bad turn"}"#), false);

		assert_eq!(err.message, "Bad turn");

		let err = classify(&response(404, r#"{"message":""}"#), false);

		assert_eq!(err.message, "Request failed with status 404 Not Found.");
	}

	#[test]
	fn classify_falls_back_to_text_and_status_line() {
		let err = classify(&response(502, "upstream exploded"), true);

		assert_eq!(err.message, "Request failed with status 502 Bad Gateway.");
		assert_eq!(err.data, Some(Value::String("upstream exploded".into())));
		assert!(err.after_refresh);

		let err = classify(&response(500, ""), false);

		assert_eq!(err.data, None);
	}

	#[test]
	fn decode_reports_failing_path() {
		#[derive(Debug, Deserialize)]
		struct Turn {
			#[allow(dead_code)]
			narrative: String,
		}

		let err = Body::Json(serde_json::json!({ "narrative": 7 }))
			.decode::<Turn>()
			.expect_err("Decoding should fail.");

		assert!(err.message.contains("`narrative`"), "{}", err.message);
		assert!(err.is_network());

		let unit: Option<Turn> = Body::NoContent.decode().expect("Null should decode to None.");

		assert!(unit.is_none());
	}
}

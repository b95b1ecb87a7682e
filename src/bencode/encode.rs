use serde_json::{Value, json};
use hex;
use super::BValue;

/// Encode a `BValue` into its canonical bencoded form.
///
/// Dict keys are written in ascending byte-wise order no matter how the map
/// was filled, so equal values always encode to identical bytes.
pub fn encode_bvalue(value: &BValue) -> Vec<u8> {
	let mut out: Vec<u8> = Vec::new();
	encode_bvalue_into(value, &mut out);
	out
}

/// Append the encoding of `value` to `out`.
pub fn encode_bvalue_into(value: &BValue, out: &mut Vec<u8>) {
	match value {
		BValue::Integer(i) => {
			out.push(b'i');
			out.extend_from_slice(i.to_string().as_bytes());
			out.push(b'e');
		}
		BValue::ByteString(bytes) => encode_bytes(bytes, out),
		BValue::List(items) => {
			out.push(b'l');
			for item in items {
				encode_bvalue_into(item, out);
			}
			out.push(b'e');
		}
		BValue::Dict(dict) => {
			out.push(b'd');
			let mut entries: Vec<(&Vec<u8>, &BValue)> = dict.iter().collect();
			entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
			for (key, val) in entries {
				encode_bytes(key, out);
				encode_bvalue_into(val, out);
			}
			out.push(b'e');
		}
	}
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
	out.extend_from_slice(bytes.len().to_string().as_bytes());
	out.push(b':');
	out.extend_from_slice(bytes);
}

/// Convert a `BValue` into JSON (using Serde JSON `Value`).
///
/// - `Integer(i)` => JSON number
/// - `ByteString(bytes)` => Attempt UTF-8; if invalid, store hex in `"_bytes_hex"`.
/// - `List(...)` => JSON array
/// - `Dict(...)` => JSON object, keys in sorted order
pub fn bvalue_to_json(bv: &BValue) -> Value {
	match bv {
		BValue::Integer(i) => json!(i),
		BValue::ByteString(bytes) => bytes_to_json(bytes),
		BValue::List(list_items) => {
			Value::Array(list_items.iter().map(bvalue_to_json).collect())
		}
		BValue::Dict(map) => {
			let mut keys: Vec<&Vec<u8>> = map.keys().collect();
			keys.sort();
			let mut json_map = serde_json::Map::new();
			for k in keys {
				// non UTF-8 keys are shown lossily, they only matter for display
				json_map.insert(String::from_utf8_lossy(k).into_owned(), bvalue_to_json(&map[k]));
			}
			Value::Object(json_map)
		}
	}
}

fn bytes_to_json(bytes: &[u8]) -> Value {
	match std::str::from_utf8(bytes) {
		Ok(utf8_str) => Value::String(utf8_str.to_string()),
		Err(_) => json!({ "_bytes_hex": hex::encode(bytes) }),
	}
}

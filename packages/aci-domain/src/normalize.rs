/// Lowercases, collapses whitespace runs to one space, drops everything that is not an ASCII
/// letter, digit, or space, and trims.
///
/// Whitespace is collapsed around dropped characters too, so `"a - b"` becomes `"a b"`.
pub fn normalize(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut pending_space = false;

	for ch in text.chars().flat_map(char::to_lowercase) {
		if ch.is_whitespace() {
			pending_space = true;

			continue;
		}
		if !ch.is_ascii_alphanumeric() {
			continue;
		}
		if pending_space && !out.is_empty() {
			out.push(' ');
		}

		pending_space = false;

		out.push(ch);
	}

	out
}

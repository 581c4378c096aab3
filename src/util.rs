//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Milliseconds since the unix epoch. Clock-before-epoch collapses to 0.
pub fn now_millis() -> u64 {
  use std::time::{SystemTime, UNIX_EPOCH};
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as u64)
    .unwrap_or(0)
}

/// Log-safe truncation for large strings.
/// Counts in chars, not bytes: payloads here are mostly Bengali and Japanese
/// and a byte slice could land inside a code point.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_all_occurrences() {
    let out = fill_template("{w} and {w} is {x}", &[("w", "水"), ("x", "জল")]);
    assert_eq!(out, "水 and 水 is জল");
  }

  #[test]
  fn fill_template_leaves_unknown_keys() {
    let out = fill_template("keep {unknown}", &[("w", "x")]);
    assert_eq!(out, "keep {unknown}");
  }

  #[test]
  fn trunc_for_log_is_char_boundary_safe() {
    let s = "আমি জাপানি শিখছি";
    let out = trunc_for_log(s, 5);
    assert!(out.starts_with("আমি জ"));
    assert!(out.contains("bytes total"));
  }

  #[test]
  fn trunc_for_log_passes_short_strings_through() {
    assert_eq!(trunc_for_log("水を飲む", 16), "水を飲む");
  }
}

pub mod candidate;
pub mod status;
pub mod vote;

use chrono::Utc;
use rand::Rng;

/// Generate an opaque record id: prefix, then millisecond timestamp, then
/// a random suffix. The suffix keeps ids unique within one millisecond.
pub(crate) fn generate_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u16 = rand::thread_rng().gen();
    format!("{prefix}{millis}{suffix:04x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix() {
        let id = generate_id("v");
        assert!(id.starts_with('v'));
        assert!(id.len() > 1);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let ids: Vec<String> = (0..64).map(|_| generate_id("csv")).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

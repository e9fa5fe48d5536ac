/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-process sequence from a random start (4096 ids per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicI64, Ordering};

    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    static SEQ: OnceLock<AtomicI64> = OnceLock::new();

    let seq = SEQ.get_or_init(|| AtomicI64::new(rand::thread_rng().gen_range(0..0x1000)));
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let seq_bits = seq.fetch_add(1, Ordering::Relaxed) & 0xFFF; // 12 bits
    (ts << 12) | seq_bits
}

/// Canonical form of an email address (trimmed, lowercase)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

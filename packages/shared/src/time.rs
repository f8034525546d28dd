use chrono::{DateTime, FixedOffset, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Format used for chat message timestamps on the wire.
pub const MESSAGE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap() // JST is UTC+9
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&jst());
    now_jst.timestamp_millis()
}

/// Convert a Unix timestamp in milliseconds to an RFC 3339 string in JST.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(millis: i64) -> String {
    to_jst(millis).to_rfc3339()
}

/// Current time in JST formatted as `yyyy-MM-dd HH:mm:ss`.
pub fn message_timestamp_now() -> String {
    Utc::now()
        .with_timezone(&jst())
        .format(MESSAGE_TIMESTAMP_FORMAT)
        .to_string()
}

fn to_jst(millis: i64) -> DateTime<FixedOffset> {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&jst())
}

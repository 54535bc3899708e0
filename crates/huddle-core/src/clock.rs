//! Wall-clock helpers.
//!
//! Log lines carry local `HH:MM:SS`; registry timestamps are RFC 3339 UTC.

/// Local wall-clock time at second precision, as written into log lines.
pub fn now_hms() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Local timestamp used to name archived logs: `YYYYmmdd-HHMMSS`.
pub fn archive_stamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// Current UTC time as RFC 3339.
pub fn now_rfc3339() -> crate::Result<String> {
    Ok(time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339)?)
}

/// Seconds since the Unix epoch.
pub fn epoch_secs() -> u64 {
    time::OffsetDateTime::now_utc().unix_timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms_has_fixed_shape() {
        let ts = now_hms();
        assert_eq!(ts.len(), 8);
        assert_eq!(&ts[2..3], ":");
        assert_eq!(&ts[5..6], ":");
    }

    #[test]
    fn archive_stamp_is_sortable() {
        let stamp = archive_stamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "-");
        assert!(stamp.chars().filter(|c| *c != '-').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn rfc3339_parses_back() {
        let ts = now_rfc3339().unwrap();
        let parsed =
            time::OffsetDateTime::parse(&ts, &time::format_description::well_known::Rfc3339);
        assert!(parsed.is_ok(), "bad timestamp {ts}");
    }
}

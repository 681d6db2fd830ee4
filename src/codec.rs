//! Line codec for the catalog files.
//!
//! Every field is base64-encoded before being joined with `|`, so free text
//! containing the separators survives a round trip. Multi-valued fields join
//! their already-encoded elements with `;;` and the joined string is then
//! encoded once more as a single field. Decoding tolerates plain-text tokens
//! left over from the older unencoded format.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::NaiveDateTime;

use crate::models::{ServiceRequest, User, TS_FORMAT};

pub const FIELD_SEP: char = '|';
pub const LIST_SEP: &str = ";;";

const USER_FIELDS: usize = 7;
const REQUEST_FIELDS: usize = 16;

fn enc(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

fn dec(token: &str) -> String {
    match STANDARD.decode(token) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => token.to_string(),
        },
        // Legacy plain-text field.
        Err(_) => token.to_string(),
    }
}

fn enc_list(items: &[String]) -> String {
    let joined = items.iter().map(|i| enc(i)).collect::<Vec<_>>().join(LIST_SEP);
    enc(&joined)
}

fn dec_list(field: &str) -> Vec<String> {
    let joined = dec(field);
    if joined.trim().is_empty() {
        return Vec::new();
    }
    joined.split(LIST_SEP).map(dec).collect()
}

pub fn format_ts(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format(TS_FORMAT).to_string()).unwrap_or_default()
}

/// Empty or unparseable input decodes to absent rather than an error.
pub fn parse_ts(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(value, TS_FORMAT).ok()
}

pub fn encode_user(user: &User) -> String {
    [
        enc(&user.user_id),
        enc(&user.name),
        enc(&user.department),
        enc(&user.role),
        enc(&user.email),
        enc(&user.phone),
        enc_list(&user.request_history),
    ]
    .join("|")
}

/// Returns `None` for partial lines so one corrupt record never aborts a load.
pub fn decode_user(line: &str) -> Option<User> {
    let parts: Vec<&str> = line.split(FIELD_SEP).collect();
    if parts.len() < USER_FIELDS {
        return None;
    }
    Some(User {
        user_id: dec(parts[0]),
        name: dec(parts[1]),
        department: dec(parts[2]),
        role: dec(parts[3]),
        email: dec(parts[4]),
        phone: dec(parts[5]),
        request_history: dec_list(parts[6]),
    })
}

pub fn encode_request(req: &ServiceRequest) -> String {
    [
        enc(&req.ticket_id),
        enc(&req.user_name),
        enc(&req.user_dept),
        enc(&req.user_email),
        enc(&req.user_phone),
        enc(&req.category),
        enc(&req.priority),
        enc(&req.subject),
        enc(&req.description),
        enc(&req.status),
        enc(req.assigned_agent.as_deref().unwrap_or("")),
        enc(&format_ts(Some(req.created_date))),
        enc(&format_ts(Some(req.last_updated))),
        enc(&format_ts(req.resolved_date)),
        enc(req.resolution_notes.as_deref().unwrap_or("")),
        enc_list(&req.comments),
    ]
    .join("|")
}

pub fn decode_request(line: &str) -> Option<ServiceRequest> {
    let parts: Vec<&str> = line.split(FIELD_SEP).collect();
    if parts.len() < REQUEST_FIELDS {
        return None;
    }
    // created/last-updated are mandatory; a line without them is corrupt.
    let created_date = parse_ts(&dec(parts[11]))?;
    let last_updated = parse_ts(&dec(parts[12]))?;
    Some(ServiceRequest {
        ticket_id: dec(parts[0]),
        user_name: dec(parts[1]),
        user_dept: dec(parts[2]),
        user_email: dec(parts[3]),
        user_phone: dec(parts[4]),
        category: dec(parts[5]),
        priority: dec(parts[6]),
        subject: dec(parts[7]),
        description: dec(parts[8]),
        status: dec(parts[9]),
        assigned_agent: non_empty(dec(parts[10])),
        created_date,
        last_updated,
        resolved_date: parse_ts(&dec(parts[13])),
        resolution_notes: non_empty(dec(parts[14])),
        comments: dec_list(parts[15]),
    })
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn sample_user() -> User {
        User {
            user_id: "AB12CD34".into(),
            name: "Sarah Connor".into(),
            department: "Marketing".into(),
            role: "USER".into(),
            email: "sarah.connor@example.com".into(),
            phone: "100-201".into(),
            request_history: vec!["REQ-001".into(), "REQ-003".into()],
        }
    }

    fn sample_request() -> ServiceRequest {
        ServiceRequest {
            ticket_id: "REQ-001".into(),
            user_name: "Sarah Connor".into(),
            user_dept: "Marketing".into(),
            user_email: "sarah.connor@example.com".into(),
            user_phone: "100-201".into(),
            category: "IT Support - Software".into(),
            priority: "HIGH".into(),
            subject: "Laptop crashed".into(),
            description: "Blue screen on startup".into(),
            status: "OPEN".into(),
            assigned_agent: None,
            created_date: ts(9, 30, 0),
            last_updated: ts(9, 30, 0),
            resolved_date: None,
            resolution_notes: None,
            comments: vec![],
        }
    }

    #[test]
    fn test_user_round_trip() {
        let user = sample_user();
        let decoded = decode_user(&encode_user(&user)).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn test_user_round_trip_empty_history() {
        let mut user = sample_user();
        user.request_history.clear();
        let decoded = decode_user(&encode_user(&user)).unwrap();
        assert!(decoded.request_history.is_empty());
    }

    #[test]
    fn test_request_round_trip() {
        let req = sample_request();
        let decoded = decode_request(&encode_request(&req)).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn test_embedded_separators_survive() {
        let mut req = sample_request();
        req.subject = "pipe | in subject".into();
        req.description = "line one\nline two | with pipe\nand ;; a sub-sep".into();
        req.comments = vec![
            "[2024-06-01 10:00:00] note with | pipe".into(),
            "[2024-06-01 10:05:00] note with ;; sub-sep".into(),
        ];
        let decoded = decode_request(&encode_request(&req)).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn test_optional_fields_round_trip() {
        let mut req = sample_request();
        req.assigned_agent = Some("Tom Wilson".into());
        req.resolved_date = Some(ts(11, 0, 0));
        req.resolution_notes = Some("Replaced the disk".into());
        let decoded = decode_request(&encode_request(&req)).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn test_short_line_is_rejected() {
        assert!(decode_user("only|three|fields").is_none());
        assert!(decode_request("a|b|c|d").is_none());
    }

    #[test]
    fn test_plain_text_fallback() {
        // A line from the older unencoded format still loads.
        let line = "U-1001|Old Name|Ops Team|Desk Agent|old@example.com|555-0000|";
        let user = decode_user(line).unwrap();
        assert_eq!(user.user_id, "U-1001");
        assert_eq!(user.email, "old@example.com");
        assert!(user.request_history.is_empty());
    }

    #[test]
    fn test_absent_timestamp_is_empty_field() {
        assert_eq!(format_ts(None), "");
        assert_eq!(parse_ts(""), None);
        assert_eq!(parse_ts("not a date"), None);
        let stamp = ts(9, 30, 0);
        assert_eq!(parse_ts(&format_ts(Some(stamp))), Some(stamp));
    }

    #[test]
    fn test_request_without_created_date_is_rejected() {
        let line = encode_request(&sample_request());
        // Blank out the created field (index 11).
        let mut parts: Vec<String> = line.split('|').map(String::from).collect();
        parts[11] = String::new();
        assert!(decode_request(&parts.join("|")).is_none());
        // Sanity: the untouched line still decodes.
        assert!(decode_request(&line).is_some());
    }

    proptest! {
        #[test]
        fn prop_request_text_fields_round_trip(
            subject in "\\PC{0,60}",
            description in "(\\PC|\n){0,120}",
            comment in "\\PC{1,60}",
        ) {
            let mut req = sample_request();
            req.subject = subject;
            req.description = description;
            req.comments = vec![comment];
            let decoded = decode_request(&encode_request(&req)).unwrap();
            prop_assert_eq!(decoded, req);
        }

        #[test]
        fn prop_user_history_round_trips(
            history in proptest::collection::vec("REQ-[0-9]{3}", 0..8)
        ) {
            let mut user = sample_user();
            user.request_history = history;
            let decoded = decode_user(&encode_user(&user)).unwrap();
            prop_assert_eq!(decoded.request_history, user.request_history);
        }
    }
}

//! Reply post-processor: recovers structured fragments from model output.
//!
//! The system instruction asks the model to append JSON payloads wrapped in
//! sentinel markers:
//!
//! ```text
//! ---BOOKING_DATA---  { ... }  ---END_BOOKING_DATA---
//! ---MAP_DATA---      { ... }  ---END_MAP_DATA---
//! ---PLACES_DATA---   [ ... ]  ---END_PLACES_DATA---
//! ```
//!
//! Extraction runs three independent passes in that order, each over the text
//! left by the previous one. A pass whose payload parses removes every block
//! of its kind and trims the text. A pass whose payload does not parse
//! changes nothing: the block stays visible and the fragment is reported as
//! [`Extraction::Malformed`]. Nothing here can fail the request.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use concierge_types::chat::Fragment;

static BOOKING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)---BOOKING_DATA---\s*(\{.*?\})\s*---END_BOOKING_DATA---")
        .expect("booking pattern is valid")
});
static MAP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)---MAP_DATA---\s*(\{.*?\})\s*---END_MAP_DATA---")
        .expect("map pattern is valid")
});
static PLACES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)---PLACES_DATA---\s*(\[.*?\])\s*---END_PLACES_DATA---")
        .expect("places pattern is valid")
});

/// The three kinds of embedded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Booking,
    Map,
    Places,
}

impl FragmentKind {
    /// Extraction order.
    pub const ALL: [FragmentKind; 3] = [
        FragmentKind::Booking,
        FragmentKind::Map,
        FragmentKind::Places,
    ];

    pub fn start_marker(self) -> &'static str {
        match self {
            FragmentKind::Booking => "---BOOKING_DATA---",
            FragmentKind::Map => "---MAP_DATA---",
            FragmentKind::Places => "---PLACES_DATA---",
        }
    }

    pub fn end_marker(self) -> &'static str {
        match self {
            FragmentKind::Booking => "---END_BOOKING_DATA---",
            FragmentKind::Map => "---END_MAP_DATA---",
            FragmentKind::Places => "---END_PLACES_DATA---",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            FragmentKind::Booking => &*BOOKING_PATTERN,
            FragmentKind::Map => &*MAP_PATTERN,
            FragmentKind::Places => &*PLACES_PATTERN,
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Booking => write!(f, "booking"),
            FragmentKind::Map => write!(f, "map"),
            FragmentKind::Places => write!(f, "places"),
        }
    }
}

/// Outcome of one extraction pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    /// No block of this kind in the text.
    Absent,
    /// Block found and its payload parsed; the block was stripped.
    Parsed(T),
    /// Block found but the payload was not valid JSON of the expected shape.
    Malformed(String),
}

impl<T> Extraction<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Extraction::Parsed(value) => Some(value),
            Extraction::Absent | Extraction::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Extraction::Malformed(_))
    }
}

/// A model reply split into narrative text and recovered fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedReply {
    pub text: String,
    pub booking: Extraction<Fragment>,
    pub map: Extraction<Fragment>,
    pub places: Extraction<Vec<Value>>,
}

impl ProcessedReply {
    pub fn booking(&self) -> Option<&Fragment> {
        match &self.booking {
            Extraction::Parsed(fragment) => Some(fragment),
            _ => None,
        }
    }

    pub fn map(&self) -> Option<&Fragment> {
        match &self.map {
            Extraction::Parsed(fragment) => Some(fragment),
            _ => None,
        }
    }

    /// Place cards, empty when absent or malformed.
    pub fn places(&self) -> &[Value] {
        match &self.places {
            Extraction::Parsed(places) => places,
            _ => &[],
        }
    }
}

/// Run the booking, map and places passes over `raw`.
pub fn process_reply(raw: &str) -> ProcessedReply {
    let text = raw.to_string();
    let (text, booking) = extract::<Fragment>(text, FragmentKind::Booking);
    let (text, map) = extract::<Fragment>(text, FragmentKind::Map);
    let (text, places) = extract::<Vec<Value>>(text, FragmentKind::Places);

    ProcessedReply {
        text,
        booking,
        map,
        places,
    }
}

fn extract<T: DeserializeOwned>(text: String, kind: FragmentKind) -> (String, Extraction<T>) {
    let pattern = kind.pattern();

    let parsed: Option<Result<T, serde_json::Error>> = pattern
        .captures(&text)
        .and_then(|captures| captures.get(1))
        .map(|payload| serde_json::from_str(payload.as_str()));

    match parsed {
        None => (text, Extraction::Absent),
        Some(Ok(value)) => {
            let cleaned = pattern.replace_all(&text, "").trim().to_string();
            (cleaned, Extraction::Parsed(value))
        }
        Some(Err(err)) => {
            tracing::warn!(fragment = %kind, error = %err, "leaving malformed fragment in reply");
            (text, Extraction::Malformed(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Fragment {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn plain_text_is_returned_unchanged() {
        let raw = "  Bonjour ! Je peux vous aider à réserver un taxi.\n";
        let reply = process_reply(raw);
        assert_eq!(reply.text, raw);
        assert_eq!(reply.booking, Extraction::Absent);
        assert_eq!(reply.map, Extraction::Absent);
        assert_eq!(reply.places, Extraction::Absent);
        assert!(reply.places().is_empty());
    }

    #[test]
    fn booking_block_is_stripped_and_parsed() {
        let raw = "Your cab is confirmed!\n\n---BOOKING_DATA---\n{\"booking_id\": \"482913\", \"service\": \"Airport Cab\", \"price\": \"₹1200\", \"date\": \"2025-03-01 09:00\", \"name\": \"Asha\"}\n---END_BOOKING_DATA---\n";
        let reply = process_reply(raw);

        assert_eq!(reply.text, "Your cab is confirmed!");
        assert_eq!(
            reply.booking(),
            Some(&object(json!({
                "booking_id": "482913",
                "service": "Airport Cab",
                "price": "₹1200",
                "date": "2025-03-01 09:00",
                "name": "Asha",
            })))
        );
        assert!(reply.map().is_none());
    }

    #[test]
    fn booking_block_in_the_middle_is_removed() {
        let raw = "Before.\n---BOOKING_DATA---{\"booking_id\":\"1\"}---END_BOOKING_DATA---\nAfter.";
        let reply = process_reply(raw);
        assert_eq!(reply.text, "Before.\n\nAfter.");
        assert_eq!(reply.booking().unwrap()["booking_id"], "1");
    }

    #[test]
    fn malformed_booking_stays_in_text() {
        let raw = "Confirmed.\n---BOOKING_DATA---\n{\"booking_id\": \"12\", \"service\": }\n---END_BOOKING_DATA---";
        let reply = process_reply(raw);
        assert_eq!(reply.text, raw);
        assert!(reply.booking.is_malformed());
        assert!(reply.booking().is_none());
    }

    #[test]
    fn unbalanced_braces_never_match() {
        let raw = "Oops\n---BOOKING_DATA---\n{\"booking_id\": \"12\"\n---END_BOOKING_DATA---";
        let reply = process_reply(raw);
        assert_eq!(reply.text, raw);
        assert!(reply.booking().is_none());
    }

    #[test]
    fn map_block_is_extracted() {
        let raw = "Head north on MG Road.\n---MAP_DATA---\n{\"origin\": \"Charminar\", \"origin_lat\": \"17.3616\", \"origin_lon\": \"78.4747\", \"destination\": \"Golconda Fort\", \"dest_lat\": \"17.3833\", \"dest_lon\": \"78.4011\", \"travelMode\": \"DRIVING\"}\n---END_MAP_DATA---";
        let reply = process_reply(raw);
        assert_eq!(reply.text, "Head north on MG Road.");
        let map = reply.map().unwrap();
        assert_eq!(map["travelMode"], "DRIVING");
        assert_eq!(map["dest_lat"], "17.3833");
    }

    #[test]
    fn places_block_is_extracted_as_array() {
        let raw = "Try these:\n---PLACES_DATA---\n[\n  {\"name\": \"Paradise\", \"description\": \"Biryani\", \"rating\": \"4.5\", \"address\": \"Secunderabad\", \"type\": \"Restaurant\"},\n  {\"name\": \"Chowmahalla Palace\", \"description\": \"Nizam palace\", \"rating\": \"4.6\", \"address\": \"Khilwat\", \"type\": \"Tourist Spot\"}\n]\n---END_PLACES_DATA---";
        let reply = process_reply(raw);
        assert_eq!(reply.text, "Try these:");
        assert_eq!(reply.places().len(), 2);
        assert_eq!(reply.places()[1]["name"], "Chowmahalla Palace");
    }

    #[test]
    fn places_payload_must_be_an_array() {
        let raw = "Here.\n---PLACES_DATA---\n{\"name\": \"Paradise\"}\n---END_PLACES_DATA---";
        let reply = process_reply(raw);
        assert_eq!(reply.text, raw);
        assert_eq!(reply.places, Extraction::Absent);
    }

    #[test]
    fn all_three_fragments_extracted_together() {
        let raw = "\
Booked, and here is how to get there. You might also like these spots.
---BOOKING_DATA---
{\"booking_id\": \"100200\", \"service\": \"City Tour\", \"price\": \"₹2500\", \"date\": \"Tomorrow 10 AM\", \"name\": \"Ravi\"}
---END_BOOKING_DATA---
---MAP_DATA---
{\"origin\": \"Hotel\", \"origin_lat\": \"17.3850\", \"origin_lon\": \"78.4867\", \"destination\": \"Tour Desk\", \"dest_lat\": \"17.4156\", \"dest_lon\": \"78.4750\", \"travelMode\": \"WALKING\"}
---END_MAP_DATA---
---PLACES_DATA---
[{\"name\": \"Hussain Sagar\", \"description\": \"Lake\", \"rating\": \"4.4\", \"address\": \"Tank Bund\", \"type\": \"Tourist Spot\"}]
---END_PLACES_DATA---
";
        let reply = process_reply(raw);
        assert_eq!(
            reply.text,
            "Booked, and here is how to get there. You might also like these spots."
        );
        assert_eq!(reply.booking().unwrap()["booking_id"], "100200");
        assert_eq!(reply.map().unwrap()["travelMode"], "WALKING");
        assert_eq!(reply.places().len(), 1);
    }

    #[test]
    fn large_numbers_keep_their_digits() {
        let raw = "Booked.\n---BOOKING_DATA---\n{\"booking_id\": 123456789012345678901234567890, \"price\": 1.10000000000000000001}\n---END_BOOKING_DATA---";
        let reply = process_reply(raw);
        let booking = reply.booking().unwrap();
        assert_eq!(
            serde_json::to_string(&booking["booking_id"]).unwrap(),
            "123456789012345678901234567890"
        );
        assert_eq!(
            serde_json::to_string(&booking["price"]).unwrap(),
            "1.10000000000000000001"
        );
        assert_eq!(reply.text, "Booked.");
    }

    #[test]
    fn passes_are_independent() {
        let raw = "Text\n---BOOKING_DATA---\n{not json}\n---END_BOOKING_DATA---\n---MAP_DATA---\n{\"origin\": \"A\"}\n---END_MAP_DATA---";
        let reply = process_reply(raw);
        assert!(reply.booking.is_malformed());
        assert_eq!(reply.map().unwrap()["origin"], "A");
        assert_eq!(
            reply.text,
            "Text\n---BOOKING_DATA---\n{not json}\n---END_BOOKING_DATA---"
        );
    }

    #[test]
    fn shortest_match_keeps_trailing_text() {
        let raw = "A\n---MAP_DATA---{\"origin\":\"x\"}---END_MAP_DATA---\nB ---END_MAP_DATA--- C";
        let reply = process_reply(raw);
        assert_eq!(reply.text, "A\n\nB ---END_MAP_DATA--- C");
    }

    #[test]
    fn markers_match_patterns() {
        for kind in FragmentKind::ALL {
            let payload = if kind == FragmentKind::Places { "[]" } else { "{}" };
            let raw = format!("x {}{}{}", kind.start_marker(), payload, kind.end_marker());
            assert!(kind.pattern().is_match(&raw), "{kind} markers should match");
        }
    }
}

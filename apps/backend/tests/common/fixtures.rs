//! Test fixtures and factory functions for creating test data.

use serde_json::json;

/// Generate CSV content with a header and `num_cards` rows.
pub fn sample_csv(num_cards: usize) -> String {
    let mut csv = String::from("front,back\n");
    for i in 1..=num_cards {
        csv.push_str(&format!("Word {},単語 {}\n", i, i));
    }
    csv
}

/// Create a card request body.
pub fn new_card_request(front: &str, back: &str) -> serde_json::Value {
    json!({ "front": front, "back": back })
}

/// Create a bulk delete request body.
pub fn bulk_delete_request(ids: &[String]) -> serde_json::Value {
    json!({ "ids": ids })
}

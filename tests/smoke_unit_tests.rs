//! Smoke Screen Unit tests for escrow deal system components
//!
//! These test are unit tests that span the codebase, testing behavior in
//! isolation from integration scenarios. These are intended as smoke-screen
//! and generally test the happy-path.
//!
#![allow(unused_imports)]

use escrow_deal::{
    deal::{Deal, DealStatus, TimeStamp},
    event::{DealEvent, EventSink, MemorySink, NullSink},
    utils::{new_bech32_id, new_deal_id, new_party_addr},
};

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Test that new_bech32_id generates valid bech32-encoded strings
    /// with the correct human-readable prefix
    #[test]
    fn generates_valid_bech32_with_hrp() {
        let result = new_bech32_id("deal_");
        assert!(result.is_ok());

        let encoded = result.unwrap();
        assert!(encoded.starts_with("deal_1"));
        assert!(encoded.len() > 10); // UUID should produce substantial output
    }

    /// Test that the function handles empty strings appropriately
    #[test]
    fn handles_empty_hrp() {
        // Empty string should fail
        let result = new_bech32_id("");
        assert!(result.is_err());
    }

    /// Test that multiple calls generate unique identifiers
    #[test]
    fn generates_unique_ids() {
        let id1 = new_deal_id().unwrap();
        let id2 = new_deal_id().unwrap();
        let id3 = new_deal_id().unwrap();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    /// Test that the two domain prefixes produce distinguishable ids
    #[test]
    fn deal_and_party_prefixes_differ() {
        let deal_id = new_deal_id().unwrap();
        let party_addr = new_party_addr().unwrap();

        assert!(deal_id.starts_with("deal_"));
        assert!(party_addr.starts_with("user_"));
        assert_ne!(deal_id, party_addr);
    }
}

// DEAL MODULE TESTS
#[cfg(test)]
mod deal_tests {
    use super::*;
    use chrono::{Datelike, Timelike, Utc};

    fn open_deal() -> Deal {
        Deal::open(
            "deal_1smoke".to_string(),
            "user_buyer".to_string(),
            "user_seller".to_string(),
            1_000,
            None,
            b"memo".to_vec(),
            Some("user_arb".to_string()),
        )
        .unwrap()
    }

    /// Test that TimeStamp::new() creates a timestamp close to current time
    #[test]
    fn timestamp_new_creates_current_time() {
        let ts = TimeStamp::new();
        let now = Utc::now();

        let diff = (now - ts.to_datetime_utc()).num_seconds().abs();
        assert!(diff < 1); // Should be within 1 second
    }

    /// Test that TimeStamp can be created with specific date/time values
    #[test]
    fn timestamp_new_with_creates_specific_time() {
        let ts = TimeStamp::new_with(2024, 6, 15, 10, 30, 0);
        let dt = ts.to_datetime_utc();

        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    /// Test that a fresh deal exposes every creation field unchanged
    #[test]
    fn open_deal_exposes_all_fields() {
        let deal = open_deal();

        assert_eq!(deal.id(), "deal_1smoke");
        assert_eq!(deal.buyer(), "user_buyer");
        assert_eq!(deal.seller(), "user_seller");
        assert_eq!(deal.amount(), 1_000);
        assert_eq!(deal.status(), DealStatus::Pending);
        assert!(deal.deadline().is_none());
        assert_eq!(deal.memo(), b"memo");
        assert_eq!(deal.arbitrator(), Some("user_arb"));
        assert!(deal.is_pending());
        assert!(deal.payee().is_none());
    }

    /// Test the payee fact for both terminal states
    #[test]
    fn payee_follows_the_settlement() {
        let mut released = open_deal();
        released.release("user_seller", &TimeStamp::new()).unwrap();
        assert_eq!(released.payee(), Some(("user_seller", 1_000)));

        let mut refunded = open_deal();
        refunded.refund("user_buyer").unwrap();
        assert_eq!(refunded.payee(), Some(("user_buyer", 1_000)));
    }

    /// Test that the stored deadline participates in expiry checks
    #[test]
    fn deadline_is_kept_and_checked() {
        let deadline = TimeStamp::new_with(2025, 3, 1, 0, 0, 0);
        let deal = Deal::open(
            "deal_1smoke".to_string(),
            "user_buyer".to_string(),
            "user_seller".to_string(),
            1,
            Some(deadline.clone()),
            vec![],
            None,
        )
        .unwrap();

        assert_eq!(deal.deadline(), Some(&deadline));
        assert!(!deal.is_expired(&TimeStamp::new_with(2025, 2, 28, 23, 59, 59)));
        assert!(deal.is_expired(&TimeStamp::new_with(2025, 3, 1, 0, 0, 0)));
        assert!(deal.is_expired(&TimeStamp::new_with(2025, 3, 1, 0, 0, 1)));
    }

    /// Test that the deal record round-trips through its storage encoding
    #[test]
    fn deal_cbor_roundtrip() {
        let original = open_deal();

        let encoded = minicbor::to_vec(&original).unwrap();
        let decoded: Deal = minicbor::decode(&encoded).unwrap();

        assert_eq!(original, decoded);
    }
}

// EVENT MODULE TESTS
#[cfg(test)]
mod event_tests {
    use super::*;

    /// Test that a new MemorySink starts empty
    #[test]
    fn memory_sink_starts_empty() {
        let sink = MemorySink::new();
        assert!(sink.events().is_empty());
    }

    /// Test that published events are observable in order
    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();

        sink.publish(DealEvent::Refunded {
            deal_id: "deal_1a".to_string(),
            buyer: "user_b".to_string(),
        });
        sink.publish(DealEvent::Released {
            deal_id: "deal_1b".to_string(),
            seller: "user_s".to_string(),
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], DealEvent::Refunded { .. }));
        assert!(matches!(events[1], DealEvent::Released { .. }));
    }

    /// Test that the null sink accepts events without effect
    #[test]
    fn null_sink_discards() {
        let sink = NullSink;
        sink.publish(DealEvent::Created {
            deal_id: "deal_1a".to_string(),
            buyer: "user_b".to_string(),
            seller: "user_s".to_string(),
            amount: 1,
        });
    }
}

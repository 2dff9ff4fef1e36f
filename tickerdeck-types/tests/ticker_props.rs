use proptest::prelude::*;
use tickerdeck_types::Ticker;

proptest! {
    #[test]
    fn parse_is_idempotent(raw in "[a-zA-Z0-9]{1,5}([.-][a-zA-Z0-9]{1,4})?") {
        if let Ok(t) = Ticker::parse(&raw) {
            let again = Ticker::parse(t.as_str()).unwrap();
            prop_assert_eq!(again, t);
        }
    }

    #[test]
    fn valid_tickers_are_uppercase_and_bounded(raw in "\\PC{0,14}") {
        if let Ok(t) = Ticker::parse(&raw) {
            let s = t.as_str();
            prop_assert!((2..=10).contains(&s.len()));
            prop_assert_eq!(s.to_ascii_uppercase(), s);
            prop_assert!(s.chars().filter(|c| *c == '.' || *c == '-').count() <= 1);
        }
    }

    #[test]
    fn serde_round_trip(raw in "[A-Z]{2,4}(\\.[A-Z]{1,2})?") {
        let t = Ticker::parse(&raw).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        let back: Ticker = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, t);
    }
}

#[test]
fn deserializing_invalid_ticker_fails() {
    assert!(serde_json::from_str::<Ticker>("\"A\"").is_err());
}

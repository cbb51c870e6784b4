/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use proptest::prelude::*;
use freedan::errors::AdsError;
use freedan::keyword::{Keyword, KeywordFinalUrl, MAX_CHARS_KEYWORD, MAX_WORDS_KEYWORD};
use freedan::money::{euro_to_micro, is_good_micro_bid, micro_to_euro};
use freedan::selector::ReportRequest;
use freedan::temp_id::TempIdAllocator;

fn final_url() -> KeywordFinalUrl {
    KeywordFinalUrl::new("https://shop.example.com").unwrap()
}

// Property: money conversion keeps two decimals
proptest! {
    #[test]
    fn euro_micro_round_trip(cents in 0i64..10_000_000) {
        let euro = cents as f64 / 100.0;
        let back = micro_to_euro(euro_to_micro(euro));
        prop_assert!((back - euro).abs() < 0.005);
    }

    #[test]
    fn micro_amounts_are_whole_cents(euro in 0.0f64..100_000.0) {
        prop_assert_eq!(euro_to_micro(euro) % 10_000, 0);
    }

    #[test]
    fn good_bids_stay_in_range(micro in any::<i64>()) {
        prop_assert_eq!(is_good_micro_bid(micro), (10_000..100_000_000).contains(&micro));
    }
}

// Property: keyword text limits
proptest! {
    #[test]
    fn keywords_over_char_limit_fail(text in "[a-z]{81,120}") {
        let result = Keyword::new(&text, "EXACT", 1.0, final_url());
        prop_assert!(matches!(result, Err(AdsError::Validation(_))));
    }

    #[test]
    fn keywords_over_word_limit_fail(words in proptest::collection::vec("[a-z]{1,3}", 11..20)) {
        let text = words.join(" ");
        prop_assume!(text.chars().count() <= MAX_CHARS_KEYWORD);
        prop_assert!(Keyword::new(&text, "BROAD", 1.0, final_url()).is_err());
    }

    #[test]
    fn keywords_within_limits_pass(words in proptest::collection::vec("[a-z]{1,6}", 1..=10)) {
        let text = words.join(" ");
        prop_assume!(words.len() <= MAX_WORDS_KEYWORD);
        let keyword = Keyword::new(&text, "phrase", 1.0, final_url()).unwrap();
        prop_assert_eq!(keyword.text, text);
    }
}

// Property: broad modifier helpers
proptest! {
    #[test]
    fn broad_modified_is_idempotent(text in "[a-zA-Z+ ]{0,40}") {
        let once = Keyword::to_broad_modified(&text);
        prop_assert_eq!(Keyword::to_broad_modified(&once), once.clone());
        prop_assert!(!Keyword::is_real_broad(&once));
    }

    #[test]
    fn real_broad_iff_unmodified_word(words in proptest::collection::vec("\\+?[a-z]{1,5}", 1..6)) {
        let text = words.join(" ");
        let expected = words.iter().any(|w| !w.starts_with('+'));
        prop_assert_eq!(Keyword::is_real_broad(&text), expected);
    }
}

// Property: temp ids
proptest! {
    #[test]
    fn temp_ids_strictly_decrease(existing in proptest::collection::vec(proptest::option::of(1i64..1_000_000), 0..30)) {
        let mut allocator = TempIdAllocator::new();
        let mut expected_next = -1;

        for id in existing {
            let filled = allocator.fill(id);
            match id {
                Some(id) => prop_assert_eq!(filled, id),
                None => {
                    prop_assert_eq!(filled, expected_next);
                    expected_next -= 1;
                }
            }
        }
    }
}

// Property: last_days never combines with explicit dates
proptest! {
    #[test]
    fn last_days_with_dates_fails(days in 1u32..400, offset in 0i64..400) {
        let today = chrono::NaiveDate::from_ymd_opt(2020, 6, 15).unwrap();
        let min = today - chrono::Duration::days(offset + 1);
        let request = ReportRequest::new("ACCOUNT_PERFORMANCE_REPORT", ["Clicks"])
            .between(min, today)
            .last_days(days);

        prop_assert!(matches!(request.date_range_at(today), Err(AdsError::InvalidDateRange(_))));
    }
}

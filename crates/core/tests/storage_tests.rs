// ═══════════════════════════════════════════════════════════════════
// Storage Tests — flat text codec, StorageManager
// ═══════════════════════════════════════════════════════════════════

use portfolio_tracker_core::errors::CoreError;
use portfolio_tracker_core::models::holding::{Holding, HoldingKind};
use portfolio_tracker_core::models::portfolio::Portfolio;
use portfolio_tracker_core::storage::format;
use portfolio_tracker_core::storage::manager::StorageManager;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn sample_holdings() -> Vec<Holding> {
    vec![
        Holding::restore(
            HoldingKind::Stock,
            "IBM",
            "International Business Machines",
            10,
            100.0,
            1009.99,
        )
        .unwrap(),
        Holding::restore(HoldingKind::MutualFund, "VFV", "Vanguard S&P 500", 20, 50.0, 1000.0)
            .unwrap(),
    ]
}

// ═══════════════════════════════════════════════════════════════════
// encode
// ═══════════════════════════════════════════════════════════════════

mod encode {
    use super::*;

    #[test]
    fn single_record_layout() {
        let text = format::encode(&sample_holdings()[..1]);
        assert_eq!(
            text,
            "type = \"stock\"\n\
             symbol = \"IBM\"\n\
             name = \"International Business Machines\"\n\
             quantity = \"10\"\n\
             price = \"100.00\"\n\
             bookvalue = \"1009.99\"\n"
        );
    }

    #[test]
    fn records_are_separated_by_one_blank_line() {
        let text = format::encode(&sample_holdings());
        assert!(text.contains("bookvalue = \"1009.99\"\n\ntype = \"mutualfund\"\n"));
    }

    #[test]
    fn numbers_use_two_decimals() {
        let holding =
            Holding::restore(HoldingKind::Stock, "X", "X Co", 3, 1.5, 4.505).unwrap();
        let text = format::encode(&[holding]);
        assert!(text.contains("price = \"1.50\""));
        assert!(text.contains("bookvalue = \"4.50\"") || text.contains("bookvalue = \"4.51\""));
    }

    #[test]
    fn empty_store_encodes_to_empty_text() {
        assert_eq!(format::encode(&[]), "");
    }

    #[test]
    fn records_preserve_store_order() {
        let text = format::encode(&sample_holdings());
        let ibm = text.find("\"IBM\"").unwrap();
        let vfv = text.find("\"VFV\"").unwrap();
        assert!(ibm < vfv);
    }
}

// ═══════════════════════════════════════════════════════════════════
// decode
// ═══════════════════════════════════════════════════════════════════

mod decode {
    use super::*;

    const VALID: &str = "type = \"stock\"\n\
                         symbol = \"IBM\"\n\
                         name = \"International Business Machines\"\n\
                         quantity = \"10\"\n\
                         price = \"100.00\"\n\
                         bookvalue = \"1009.99\"\n\
                         \n\
                         type = \"mutualfund\"\n\
                         symbol = \"VFV\"\n\
                         name = \"Vanguard S&P 500\"\n\
                         quantity = \"20\"\n\
                         price = \"50.00\"\n\
                         bookvalue = \"1000.00\"\n";

    #[test]
    fn parses_every_record() {
        let holdings = format::decode(VALID).unwrap();
        assert_eq!(holdings.len(), 2);

        let ibm = &holdings[0];
        assert_eq!(ibm.kind(), HoldingKind::Stock);
        assert_eq!(ibm.symbol(), "IBM");
        assert_eq!(ibm.name(), "International Business Machines");
        assert_eq!(ibm.quantity(), 10);
        assert!(approx(ibm.price(), 100.0));
        assert!(approx(ibm.book_value(), 1009.99));

        assert_eq!(holdings[1].kind(), HoldingKind::MutualFund);
    }

    #[test]
    fn book_value_is_taken_verbatim_no_fee_recompute() {
        // 950.00 is below price*quantity; a recomputed stock book value
        // would have been 1009.99.
        let text = "type = \"stock\"\n\
                    symbol = \"IBM\"\n\
                    name = \"IBM Corp\"\n\
                    quantity = \"10\"\n\
                    price = \"100.00\"\n\
                    bookvalue = \"950.00\"\n";
        let holdings = format::decode(text).unwrap();
        assert!(approx(holdings[0].book_value(), 950.0));
    }

    #[test]
    fn empty_text_is_an_empty_store() {
        assert!(format::decode("").unwrap().is_empty());
        assert!(format::decode("\n\n").unwrap().is_empty());
    }

    #[test]
    fn tolerates_missing_trailing_newline() {
        let text = VALID.trim_end();
        assert_eq!(format::decode(text).unwrap().len(), 2);
    }

    #[test]
    fn unknown_type_tag_is_malformed() {
        let text = VALID.replace("mutualfund", "bond");
        let err = format::decode(&text).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn wrong_key_order_is_malformed() {
        let text = "symbol = \"IBM\"\n\
                    type = \"stock\"\n\
                    name = \"IBM Corp\"\n\
                    quantity = \"10\"\n\
                    price = \"100.00\"\n\
                    bookvalue = \"1009.99\"\n";
        let err = format::decode(text).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn missing_quotes_is_malformed() {
        let text = VALID.replace("\"10\"", "10");
        let err = format::decode(&text).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn non_numeric_quantity_is_malformed() {
        let text = VALID.replace("\"10\"", "\"ten\"");
        let err = format::decode(&text).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { line: 4, .. }));
    }

    #[test]
    fn truncated_record_is_malformed() {
        let text = "type = \"stock\"\n\
                    symbol = \"IBM\"\n\
                    name = \"IBM Corp\"\n";
        let err = format::decode(text).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn zero_quantity_record_is_malformed() {
        let text = VALID.replace("quantity = \"10\"", "quantity = \"0\"");
        let err = format::decode(&text).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn reports_the_offending_line_number() {
        // Second record's price line is the 12th line of the file.
        let text = VALID.replace("price = \"50.00\"", "price = \"fifty\"");
        match format::decode(&text).unwrap_err() {
            CoreError::MalformedRecord { line, .. } => assert_eq!(line, 12),
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let text = VALID.replace(
            "name = \"Vanguard S&P 500\"",
            "name = \"Vanguard = S&P 500\"",
        );
        let holdings = format::decode(&text).unwrap();
        assert_eq!(holdings[1].name(), "Vanguard = S&P 500");
    }
}

// ═══════════════════════════════════════════════════════════════════
// round trip
// ═══════════════════════════════════════════════════════════════════

mod round_trip {
    use super::*;

    #[test]
    fn encode_then_decode_is_identity_at_two_decimals() {
        let original = sample_holdings();
        let decoded = format::decode(&format::encode(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn values_round_to_two_decimals_across_the_trip() {
        let holding =
            Holding::restore(HoldingKind::Stock, "X", "X Co", 3, 10.333, 31.009).unwrap();
        let decoded = format::decode(&format::encode(&[holding])).unwrap();
        assert!(approx(decoded[0].price(), 10.33));
        assert!(approx(decoded[0].book_value(), 31.01));
    }

    #[test]
    fn portfolio_round_trip_rebuilds_the_index() {
        let portfolio = Portfolio::from_holdings(sample_holdings());
        let text = StorageManager::save_to_string(&portfolio);
        let loaded = StorageManager::load_from_string(&text).unwrap();
        assert_eq!(loaded, portfolio);
        assert_eq!(loaded.index.positions("vanguard"), &[1]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager file I/O
// ═══════════════════════════════════════════════════════════════════

mod file_io {
    use super::*;

    #[test]
    fn save_and_load_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.txt");

        let portfolio = Portfolio::from_holdings(sample_holdings());
        StorageManager::save_to_file(&portfolio, &path).unwrap();
        let loaded = StorageManager::load_from_file(&path).unwrap();
        assert_eq!(loaded, portfolio);
    }

    #[test]
    fn save_completely_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.txt");
        std::fs::write(&path, "stale contents that must disappear").unwrap();

        let portfolio = Portfolio::from_holdings(sample_holdings()[..1].to_vec());
        StorageManager::save_to_file(&portfolio, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert_eq!(StorageManager::load_from_file(&path).unwrap(), portfolio);
    }

    #[test]
    fn save_empty_portfolio_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.txt");
        StorageManager::save_to_file(&Portfolio::new(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn missing_file_is_a_file_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StorageManager::load_from_file(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }

    #[test]
    fn corrupt_file_is_a_malformed_record_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.txt");
        std::fs::write(&path, "this is not a holdings file\n").unwrap();
        let err = StorageManager::load_from_file(&path).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRecord { .. }));
    }

    #[test]
    fn unwritable_destination_is_reported_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-subdir").join("holdings.txt");
        let err = StorageManager::save_to_file(&Portfolio::new(), &path).unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }
}

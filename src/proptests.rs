use super::*;

use proptest::prelude::*;
use unicode_normalization::UnicodeNormalization;

use crate::ce_ty::{Ce, Ce32};
use crate::data_builder::ces_for_ce32;
use crate::test_data::root;
use crate::text::Utf8Text;

const PIECES: &[&str] = &[
    "a", "b", "c", "h", "x", "z", "A", "B", "ch", "ax", " ", "-", "+", "$", "0", "1", "9",
    "\u{300}", "\u{301}", "\u{30a}", "\u{323}", "\u{327}", "\u{e1}", "\u{e6}", "\u{fb03}",
    "\u{3b1}", "\u{3c9}", "\u{436}", "\u{1100}", "\u{1161}", "\u{11a8}", "\u{ac01}", "\u{d7a3}",
    "\u{4e00}", "\u{9fa5}", "\u{50000}", "\u{0}", "\u{fffe}", "\u{ffff}",
];

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(PIECES), 0..=12).prop_map(|pieces| pieces.concat())
}

fn options_strategy() -> impl Strategy<Value = CollatorOptions> {
    (
        prop::sample::select(vec![
            Strength::Primary,
            Strength::Secondary,
            Strength::Tertiary,
            Strength::Quaternary,
        ]),
        prop::sample::select(vec![Alternate::NonIgnorable, Alternate::Shifted]),
        prop::sample::select(vec![CaseFirst::Off, CaseFirst::LowerFirst, CaseFirst::UpperFirst]),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::sample::select(vec![vec![], vec![settings::reorder_code::GREEK], vec![settings::reorder_code::HANGUL]]),
        prop::sample::select(vec![MaxVariable::Space, MaxVariable::Punct, MaxVariable::Symbol, MaxVariable::Currency]),
    )
        .prop_map(
            |(strength, alternate, case_first, case_level, backward_secondary, numeric, reorder_codes, max_variable)| {
                CollatorOptions {
                    strength,
                    alternate,
                    max_variable,
                    case_first,
                    case_level,
                    backward_secondary,
                    numeric,
                    normalization: true,
                    reorder_codes,
                    ..Default::default()
                }
            },
        )
}

fn forward(s: &str, numeric: bool) -> Vec<Ce> {
    CollationIterator::new(root(), Utf8Text::with_fcd_check(s), numeric).collect()
}

fn backward(s: &str, numeric: bool) -> Vec<Ce> {
    let text = Utf8Text::with_fcd_check(s);
    let end = text.as_str().len();
    let mut iter = CollationIterator::new(root(), text, numeric);
    iter.reset_to_offset(end);
    let mut ces = Vec::new();
    loop {
        let ce = iter.previous_ce();
        if ce == Ce::NO_CE {
            break;
        }
        ces.push(ce);
    }
    ces.reverse();
    ces
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_backward_matches_forward(s in text_strategy(), numeric in any::<bool>()) {
        prop_assert_eq!(forward(&s, numeric), backward(&s, numeric));
    }

    #[test]
    fn prop_sort_key_order_matches_compare(a in text_strategy(), b in text_strategy(), options in options_strategy()) {
        let collator = Collator::new(test_data::root_shared(), options).unwrap();
        let by_key = collator.sort_key(&a).cmp(&collator.sort_key(&b));
        prop_assert_eq!(collator.compare(&a, &b), by_key);
    }

    #[test]
    fn prop_identical_strength_is_total(a in text_strategy(), b in text_strategy()) {
        let collator = Collator::new(test_data::root_shared(), CollatorOptions {
            strength: Strength::Identical,
            normalization: true,
            ..Default::default()
        }).unwrap();
        let order = collator.compare(&a, &b);
        prop_assert_eq!(order, collator.sort_key(&a).cmp(&collator.sort_key(&b)));
        let nfd_equal = a.nfd().eq(b.nfd());
        prop_assert_eq!(order == std::cmp::Ordering::Equal, nfd_equal);
    }

    #[test]
    fn prop_drain_is_idempotent(s in text_strategy(), numeric in any::<bool>()) {
        let mut iter = CollationIterator::new(root(), Utf8Text::with_fcd_check(&s), numeric);
        let count = iter.fetch_ces();
        prop_assert_eq!(Some(&Ce::NO_CE), iter.ces().last());
        prop_assert_eq!(count, iter.ces().len());
        prop_assert_eq!(Ce::NO_CE, iter.next_ce());
        prop_assert_eq!(Ce::NO_CE, iter.next_ce());
        prop_assert_eq!(&forward(&s, numeric)[..], &iter.ces()[..count - 1]);
    }

    #[test]
    fn prop_simple_ce32_round_trip(p in any::<u16>(), s in any::<u8>(), t in 0u8..0xc0) {
        let ce = Ce::new((p as u32) << 16, (s as u32) << 8, (t as u32) << 8, 0);
        let ce32 = ce.to_simple_ce32();
        prop_assert!(ce32.is_some());
        let ce32 = ce32.unwrap();
        prop_assert!(!ce32.is_special());
        prop_assert_eq!(ce, ce32.to_ce());
    }

    #[test]
    fn prop_long_ce32_round_trip(p in 1u32..0xff_ffff, s in any::<u16>(), t in 0u8..0xc0) {
        let primary = p << 8;
        let ce = Ce::from_primary(primary);
        prop_assert_eq!(ce, Ce32::long_primary(primary).to_ce());
        let lower32 = ((s as u32) << 16) | ((t as u32) << 8);
        prop_assert_eq!(Ce(lower32 as u64), Ce32::long_secondary(lower32).to_ce());
    }

    #[test]
    fn prop_builder_encodes_any_expansion(
        ces in prop::collection::vec(
            (any::<u32>(), any::<u16>(), 0u16..0xc000).prop_map(|(p, s, t)| Ce::new(p, s as u32, (t & 0x3fff) as u32, 0)),
            1..=31,
        )
    ) {
        let mut builder = CollationDataBuilder::new();
        builder.add("", "q", &ces).unwrap();
        builder.add("", "r", &ces).unwrap();
        let data = builder.build().unwrap();
        let ce32 = data.get_ce32('q' as u32);
        prop_assert_eq!(ce32, data.get_ce32('r' as u32));
        prop_assert_eq!(ces, ces_for_ce32(&data, 'q' as u32, ce32).unwrap());
    }
}

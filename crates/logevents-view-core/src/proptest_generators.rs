//! Property-based test generators for the filter codec.
//!
//! Generated filters only hold non-empty strings: an empty value is how a blank form
//! control says "no selection", so it never survives a round trip by design.

use proptest::prelude::*;

use crate::models::{Filter, FilterMode, MdcFilter};

// ─── Configuration ───────────────────────────────────────────────────────────

#[must_use]
pub fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 500,
        max_shrink_iters: 2000,
        ..ProptestConfig::default()
    }
}

// ─── Leaf strategies ─────────────────────────────────────────────────────────

/// Any non-empty printable text, including spaces and URL metacharacters.
pub fn arb_value() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[^\\p{C}]{1,12}").expect("valid regex")
}

pub fn arb_values() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(arb_value(), 0..4)
}

pub fn arb_mode() -> impl Strategy<Value = Option<FilterMode>> {
    proptest::option::of(prop_oneof![Just(FilterMode::Include), Just(FilterMode::Exclude)])
}

pub fn arb_mdc() -> impl Strategy<Value = MdcFilter> {
    proptest::collection::vec((arb_value(), arb_value()), 0..4).prop_map(MdcFilter::from_iter)
}

/// Keys the codec does not interpret. The `x` prefix keeps them clear of known keys.
pub fn arb_extra() -> impl Strategy<Value = Vec<(String, String)>> {
    let key = proptest::string::string_regex("x[a-z]{1,8}").expect("valid regex");
    proptest::collection::vec((key, arb_value()), 0..3)
}

// ─── Composite strategies ────────────────────────────────────────────────────

pub fn arb_filter() -> impl Strategy<Value = Filter> {
    let window = (
        proptest::option::of(arb_value()),
        proptest::option::of(arb_value()),
        proptest::option::of(arb_value()),
        proptest::option::of(arb_value()),
        proptest::option::of(arb_value()),
        proptest::option::of(any::<i32>()),
    );
    let attributes = (
        arb_values(),
        arb_values(),
        proptest::option::of(arb_value()),
        arb_values(),
        arb_values(),
        arb_mdc(),
        arb_mode(),
        arb_mode(),
        arb_extra(),
    );
    (window, attributes).prop_map(
        |(
            (time, date, instant, interval, level, timezone_offset),
            (loggers, markers, thread, nodes, applications, mdc, include_loggers, include_markers, extra),
        )| Filter {
            time,
            date,
            instant,
            interval,
            level,
            timezone_offset,
            loggers,
            markers,
            thread,
            nodes,
            applications,
            mdc,
            include_loggers,
            include_markers,
            extra,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{filter_href, parse, parse_location, serialize};

    proptest! {
        #![proptest_config(proptest_config())]

        #[test]
        fn proptest_filter_round_trips(filter in arb_filter()) {
            let encoded = serialize(&filter);
            prop_assert_eq!(parse(&encoded), filter);
        }

        #[test]
        fn proptest_prefixed_forms_parse_alike(filter in arb_filter()) {
            let encoded = serialize(&filter);
            let from_hash = parse(&format!("#{encoded}"));
            prop_assert_eq!(&from_hash, &parse(&filter_href(&filter)));
            prop_assert_eq!(parse_location("", &format!("#{encoded}")), from_hash);
        }

        #[test]
        fn proptest_serialize_is_stable(filter in arb_filter()) {
            let once = serialize(&filter);
            prop_assert_eq!(serialize(&parse(&once)), once);
        }
    }
}

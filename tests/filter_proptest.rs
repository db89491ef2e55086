use std::path::Path;

use ffbatch::engine::probe::SubtitleStream;
use ffbatch::engine::subtitles::{language_matches, plan_extraction};
use proptest::prelude::*;

fn language_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("eng".to_string())),
        Just(Some("fin".to_string())),
        Just(Some("fre".to_string())),
        Just(Some("ger".to_string())),
    ]
}

fn streams_from(languages: &[Option<String>]) -> Vec<SubtitleStream> {
    languages
        .iter()
        .enumerate()
        .map(|(index, language)| SubtitleStream {
            index,
            codec: "subrip".to_string(),
            language: language.clone(),
            title: None,
        })
        .collect()
}

proptest! {
    /// A stream is planned iff its language passes the filter, and planning
    /// preserves original stream order.
    #[test]
    fn plan_is_exactly_the_filtered_subsequence(
        languages in prop::collection::vec(language_strategy(), 0..8),
        allow in prop::collection::vec(prop::sample::select(vec!["eng", "fin", "fre"]), 0..3),
    ) {
        let allow: Vec<String> = allow.into_iter().map(str::to_string).collect();
        let streams = streams_from(&languages);
        let planned = plan_extraction(&streams, &allow, Path::new("/tmp/subs"), "clip");

        let expected: Vec<usize> = streams
            .iter()
            .filter(|s| language_matches(s.language.as_deref(), &allow))
            .map(|s| s.index)
            .collect();
        let got: Vec<usize> = planned.iter().map(|p| p.stream.index).collect();
        prop_assert_eq!(got, expected);
    }

    /// Planned positions are contiguous from 0: whatever gets extracted in
    /// this order receives hole-free output indexes.
    #[test]
    fn planned_source_order_is_strictly_increasing(
        languages in prop::collection::vec(language_strategy(), 0..8),
        allow in prop::collection::vec(prop::sample::select(vec!["eng", "fin"]), 0..2),
    ) {
        let allow: Vec<String> = allow.into_iter().map(str::to_string).collect();
        let streams = streams_from(&languages);
        let planned = plan_extraction(&streams, &allow, Path::new("/tmp/subs"), "clip");

        for pair in planned.windows(2) {
            prop_assert!(pair[0].stream.index < pair[1].stream.index);
        }
    }

    /// An empty allow-list never drops anything.
    #[test]
    fn empty_filter_keeps_every_stream(
        languages in prop::collection::vec(language_strategy(), 0..8),
    ) {
        let streams = streams_from(&languages);
        let planned = plan_extraction(&streams, &[], Path::new("/tmp/subs"), "clip");
        prop_assert_eq!(planned.len(), streams.len());
    }
}

use proptest::prelude::*;
use webchat::annotate::{extract_blocks, plain_text, render, scan_run};
use webchat::Segment;

fn words() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:/?=-]{0,24}"
}

proptest! {
    #[test]
    fn marker_free_text_round_trips(text in "[a-zA-Z0-9 .,:/\n-]{0,80}") {
        prop_assert_eq!(plain_text(&scan_run(&text)), text);
    }

    #[test]
    fn marker_free_single_paragraph_is_one_segment(text in "[a-zA-Z0-9 .,:-]{1,80}") {
        prop_assert_eq!(scan_run(&text), vec![Segment::PlainText(text.clone())]);
    }

    #[test]
    fn bold_delimiters_are_the_only_loss(before in words(), inner in words(), after in words()) {
        let text = format!("{before}**{inner}**{after}");
        let segments = scan_run(&text);
        prop_assert_eq!(plain_text(&segments), format!("{before}{inner}{after}"));
        prop_assert!(segments.iter().any(|s| matches!(s, Segment::Bold(_))));
    }

    #[test]
    fn rendering_never_panics(text in "(\\*|`|<|>|/|\n| |x|m|l|h|t|p|s|:|book|new|title)*") {
        let segments = render(&text);
        prop_assert!(plain_text(&segments).len() <= text.len());
    }

    #[test]
    fn text_without_fences_has_no_blocks(text in "[^`]{0,120}") {
        prop_assert!(extract_blocks(&text).is_empty());
    }
}

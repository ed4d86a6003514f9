use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TEXT_ELEMENT: Regex = Regex::new(r"<text.*?>(.*?)</text>").unwrap();
    // Captions may wrap onto a second line inside one element.
    static ref FRAGMENT_ELEMENT: Regex = Regex::new(r"(?s)<text[^>]*>(.*?)</text>").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strip a timed-text document down to plain prose.
///
/// Each `<text>` element becomes its inner content plus a space, every other
/// tag is dropped, the `&#39;`, `&quot;` and `&amp;` entities are decoded and
/// whitespace is collapsed. No other entities are touched, so double-encoded
/// input (`&amp;#39;`) only loses one level of escaping.
pub fn clean_timed_text(xml: &str) -> String {
    let text = TEXT_ELEMENT.replace_all(xml, "$1 ");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Caption lines in document order, each cleaned on its own
pub fn timed_text_fragments(xml: &str) -> Vec<String> {
    FRAGMENT_ELEMENT
        .captures_iter(xml)
        .map(|caps| clean_timed_text(&caps[1]))
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

// `&amp;` goes last so an ampersand produced here is never decoded twice.
fn decode_entities(text: &str) -> String {
    text.replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.12" dur="2.4">It&#39;s a &quot;test&quot;</text>
<text start="2.52" dur="1.9">fish &amp; chips</text><text start="4.4" dur="1.0"><font color="#E5E5E5">and   more</font></text></transcript>"##;

    #[test]
    fn test_clean_sample_document() {
        assert_eq!(
            clean_timed_text(SAMPLE),
            r#"It's a "test" fish & chips and more"#
        );
    }

    #[test]
    fn test_adjacent_entities() {
        assert_eq!(
            clean_timed_text(r#"a &amp; b&#39;s &quot;c&quot;"#),
            r#"a & b's "c""#
        );
    }

    #[test]
    fn test_text_elements_are_space_separated() {
        assert_eq!(
            clean_timed_text("<text>Hello</text><text>world</text>"),
            "Hello world"
        );
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let inputs = [
            SAMPLE,
            "<text>Hello</text><text>world</text>",
            "  plain   text\n\twith spacing  ",
            r#"a &amp; b&#39;s &quot;c&quot;"#,
            "",
        ];

        for input in inputs {
            let once = clean_timed_text(input);
            assert_eq!(clean_timed_text(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_double_encoded_entities_lose_one_level() {
        assert_eq!(clean_timed_text("<text>I&amp;#39;m</text>"), "I&#39;m");
    }

    #[test]
    fn test_fragments_in_order() {
        assert_eq!(
            timed_text_fragments(SAMPLE),
            vec![
                "It's a \"test\"".to_string(),
                "fish & chips".to_string(),
                "and more".to_string(),
            ]
        );
    }

    #[test]
    fn test_fragments_skip_empty_lines() {
        let xml = r#"<transcript><text start="0"></text><text start="1">   </text><text start="2">kept</text></transcript>"#;
        assert_eq!(timed_text_fragments(xml), vec!["kept".to_string()]);
    }

    #[test]
    fn test_fragments_keep_multi_line_captions() {
        let xml = "<transcript><text start=\"0\" dur=\"2\">first line\nsecond line</text><text start=\"2\" dur=\"1\">next</text></transcript>";
        assert_eq!(
            timed_text_fragments(xml),
            vec!["first line second line".to_string(), "next".to_string()]
        );
    }
}

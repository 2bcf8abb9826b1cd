//! WebVTT to plain text
//!
//! Drops everything that is not spoken text (header, metadata, cue
//! numbers, timing lines, inline tags) and joins what remains with single
//! spaces, in cue order. Repeated cue text is kept as-is.

fn strip_tags(line: &str) -> std::borrow::Cow<'_, str> {
    regex!(r"<[^>]*>").replace_all(line, "")
}

fn is_header(line: &str) -> bool {
    line == "WEBVTT" || line.starts_with("WEBVTT ") || line.starts_with("WEBVTT\t")
}

fn is_metadata(line: &str) -> bool {
    regex!(r"^(Kind|Language):").is_match(line)
}

fn is_cue_index(line: &str) -> bool {
    line.bytes().all(|b| b.is_ascii_digit())
}

fn is_timing(line: &str) -> bool {
    regex!(r"(?:\d{2,}:)?\d{2}:\d{2}\.\d{3}\s*-->\s*(?:\d{2,}:)?\d{2}:\d{2}\.\d{3}").is_match(line)
}

/// Convert a raw WebVTT document into transcript text.
///
/// Never fails; empty input gives an empty string. Each line is handled on
/// its own, so a `<` in one cue and a `>` in a later cue are both kept.
/// `WEBVTT` and `Kind:`/`Language:` lines are only dropped in the header
/// block, which ends at the first blank line or timing line.
pub fn clean(raw: &str) -> String {
    let mut in_header = true;
    let mut kept = Vec::new();

    for line in raw.lines() {
        let line = line.trim_start_matches('\u{feff}').trim();
        let text = strip_tags(line);
        let text = text.trim();

        if line.is_empty() || is_timing(text) {
            in_header = false;
            continue;
        }
        if in_header && (is_header(text) || is_metadata(text)) {
            continue;
        }
        if text.is_empty() || is_cue_index(text) {
            continue;
        }
        kept.push(text.to_string());
    }

    kept.join(" ")
}

/// Transcript length as reported to clients, in characters.
pub fn transcript_length(transcript: &str) -> usize {
    transcript.chars().count()
}

use std::borrow::Cow;

/// Replace `:shortcode:` sequences (e.g. `:sparkles:`) with the emoji they
/// name
///
/// Unknown shortcodes and stray colons are kept as written. Text without any
/// replacement is returned borrowed.
pub fn replace_shortcodes(text: &str) -> Cow<'_, str> {
    if !text.contains(':') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut replaced = false;
    let mut rest = text;

    while let Some(open) = rest.find(':') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let emoji = after.find(':').and_then(|close| {
            let name = &after[..close];
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'));
            valid
                .then(|| emojis::get_by_shortcode(name))
                .flatten()
                .map(|emoji| (emoji, close))
        });

        match emoji {
            Some((emoji, close)) => {
                out.push_str(emoji.as_str());
                rest = &after[close + 1..];
                replaced = true;
            }
            None => {
                // The closing colon may open the next shortcode
                out.push(':');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    if replaced {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}

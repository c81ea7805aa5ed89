// Combined single-letter arguments are split before any argument gets to look at the tokens, so a
// letter nobody declared surfaces later as an unexpected token rather than here.

/// Collects `tokens`, rewriting every combined single-letter token (`-abc`) into one token per
/// letter (`-a -b -c`)
pub(crate) fn split_combined_short_forms<I, T>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut result = Vec::new();

    for token in tokens.into_iter().map(Into::into) {
        if is_combined(&token) {
            result.extend(token.chars().skip(1).map(|c| format!("-{c}")));
        } else {
            result.push(token);
        }
    }

    result
}

fn is_combined(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && !matches!(chars.next(), None | Some('-')) && chars.next().is_some()
}

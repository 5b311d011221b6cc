/// Candidate zone names for `domain`, most specific first.
///
/// `a.b.example.com` yields `a.b.example.com`, `b.example.com`,
/// `example.com` and `com`. A trailing dot is ignored.
pub fn base_domain_guesses(domain: &str) -> Vec<&str> {
    let domain = domain.trim_end_matches('.');
    if domain.is_empty() {
        return Vec::new();
    }
    let mut guesses = vec![domain];
    let mut rest = domain;
    while let Some((_, parent)) = rest.split_once('.') {
        if parent.is_empty() {
            break;
        }
        guesses.push(parent);
        rest = parent;
    }
    guesses
}

/// Pick the zone for `domain` out of `zones`.
///
/// A zone only matches when its name equals one of the base domain guesses.
/// Guesses are checked most specific first, so the longest matching suffix
/// wins regardless of the order `zones` came in.
pub fn select_zone<'a, I>(domain: &str, zones: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let zones: Vec<&'a str> = zones.into_iter().collect();
    base_domain_guesses(domain)
        .into_iter()
        .find_map(|guess| zones.iter().copied().find(|zone| *zone == guess))
}

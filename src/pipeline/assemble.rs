use std::collections::HashSet;

use crate::types::ResolvedPair;

/// Flattens pairs into `[original, sampled?]` per track, in pair order.
pub fn flatten(pairs: &[ResolvedPair]) -> Vec<String> {
    pairs
        .iter()
        .flat_map(|pair| std::iter::once(pair.original_uri.clone()).chain(pair.sampled_uri.clone()))
        .collect()
}

/// Keeps the first occurrence of every non-empty URI, in input order.
pub fn dedupe_uris<I>(uris: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    uris.into_iter()
        .filter(|uri| !uri.trim().is_empty())
        .filter(|uri| seen.insert(uri.clone()))
        .collect()
}

/// Final playlist URI list for a set of resolved pairs.
pub fn playlist_uris(pairs: &[ResolvedPair]) -> Vec<String> {
    dedupe_uris(flatten(pairs))
}

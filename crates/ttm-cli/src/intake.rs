//! Ticket and transcript intake commands.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use serde_json::json;
use ttm_core::Candidate;
use ttm_resolve::{extract_from_speech, scan_ticket, PlainTextRecognizer};

use crate::{print_json, App};

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Parse a ticket and print the outcome; with `--add`, append it to the
/// route and print the stop that was stored.
///
/// An ambiguous street with `--add` needs `--pick`; the picked candidate is
/// learned before the stop is added.
pub(crate) fn run_parse(
    app: &mut App,
    path: Option<&Path>,
    add: bool,
    pick: Option<usize>,
) -> anyhow::Result<()> {
    let input = read_input(path)?;
    let outcome = scan_ticket(&PlainTextRecognizer, &input, &app.resolver)?;

    if !add {
        if pick.is_some() {
            tracing::warn!("--pick has no effect without --add");
        }
        return print_json(&outcome);
    }

    let mut draft = outcome.draft.clone();
    if let Some(candidate) = pick_candidate(
        &outcome.completion.candidates,
        outcome.needs_disambiguation(),
        pick,
    )? {
        draft.city = Some(app.resolver.confirm_candidate(candidate)?);
    }

    let stop = app.resolver.submit_stop(draft)?;
    let mut route = app.routes.load_route()?;
    route.add(stop.clone());
    app.routes.save_route(&route)?;
    tracing::info!(id = %stop.id, city = %stop.city, "added parsed stop");
    print_json(&json!({ "outcome": outcome, "stop": stop }))
}

/// The candidate chosen with a 1-based `--pick`, required when the street is
/// ambiguous and ignored (with a warning) otherwise.
fn pick_candidate(
    candidates: &[Candidate],
    ambiguous: bool,
    pick: Option<usize>,
) -> anyhow::Result<Option<&Candidate>> {
    if !ambiguous {
        if let Some(index) = pick {
            tracing::warn!(pick = index, "street is not ambiguous, ignoring --pick");
        }
        return Ok(None);
    }
    let Some(index) = pick else {
        bail!(
            "street is ambiguous between {} candidates; rerun with --pick 1..={}",
            candidates.len(),
            candidates.len()
        );
    };
    index
        .checked_sub(1)
        .and_then(|i| candidates.get(i))
        .map(Some)
        .with_context(|| format!("--pick must be between 1 and {}", candidates.len()))
}

pub(crate) fn run_speech(app: &App, transcript: &str) -> anyhow::Result<()> {
    let extraction = extract_from_speech(
        transcript,
        app.resolver.gazetteer().villages(),
        &app.resolver.street_index(),
    );
    let completion = app
        .resolver
        .auto_complete_address(extraction.partial_address());
    print_json(&json!({
        "extraction": extraction,
        "completion": completion,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        ["Pleudihen", "Villers-Marmery"]
            .into_iter()
            .map(|city| Candidate {
                city: city.to_string(),
                street: "Rue Haute".to_string(),
                score: 1.0,
            })
            .collect()
    }

    #[test]
    fn ambiguous_street_requires_pick() {
        assert!(pick_candidate(&candidates(), true, None).is_err());
        assert!(pick_candidate(&candidates(), true, Some(0)).is_err());
        assert!(pick_candidate(&candidates(), true, Some(3)).is_err());
        let cands = candidates();
        let picked = pick_candidate(&cands, true, Some(2)).unwrap();
        assert_eq!(picked.map(|c| c.city.as_str()), Some("Villers-Marmery"));
    }

    #[test]
    fn pick_is_ignored_when_street_is_not_ambiguous() {
        let only = &candidates()[..1];
        assert!(pick_candidate(only, false, Some(1)).unwrap().is_none());
        assert!(pick_candidate(only, false, None).unwrap().is_none());
    }
}

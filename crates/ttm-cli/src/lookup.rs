//! Read-mostly gazetteer and resolver commands.

use serde_json::json;
use ttm_core::PartialAddress;

use crate::{print_json, App};

pub(crate) fn run_resolve(app: &App, street: &str) -> anyhow::Result<()> {
    let (_, street_only) = ttm_core::split_house_number(street);
    let candidates = app.resolver.resolve_city_from_street(&street_only);
    print_json(&candidates)
}

pub(crate) fn run_complete(
    app: &App,
    address: Option<&str>,
    city: Option<&str>,
) -> anyhow::Result<()> {
    let completion = app
        .resolver
        .auto_complete_address(PartialAddress::new(address, city));
    print_json(&completion)
}

pub(crate) fn run_learn(app: &mut App, city: &str, street: &str) -> anyhow::Result<()> {
    let added = app.resolver.add_user_street(city, street)?;
    print_json(&json!({
        "city": city.trim(),
        "street": street.trim(),
        "added": added,
    }))
}

/// Village list, or a single membership check with `--check`.
pub(crate) fn run_villages(app: &App, check: Option<&str>) -> anyhow::Result<()> {
    match check {
        Some(name) => print_json(&json!({
            "name": name,
            "known": app.resolver.is_known_village(name),
            "canonical": app.resolver.gazetteer().canonical_village(name),
        })),
        None => print_json(app.resolver.gazetteer().villages()),
    }
}

pub(crate) fn run_suggest(
    app: &App,
    query: &str,
    city: Option<&str>,
    limit: usize,
) -> anyhow::Result<()> {
    print_json(&app.resolver.suggest_streets(city, query, limit))
}

pub(crate) fn run_similarity(left: &str, right: &str) -> anyhow::Result<()> {
    print_json(&json!({
        "left": ttm_resolve::normalize(left),
        "right": ttm_resolve::normalize(right),
        "score": ttm_resolve::similarity(left, right),
    }))
}

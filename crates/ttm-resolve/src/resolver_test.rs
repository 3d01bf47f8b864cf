use std::collections::BTreeMap;

use ttm_core::{baseline_gazetteer, GazetteerData, MemoryStore, PartialAddress};

use super::*;

fn bundled() -> Resolver<MemoryStore> {
    let data = baseline_gazetteer().expect("bundled gazetteer parses");
    Resolver::new(Gazetteer::new(data, MemoryStore::new()), "Verzenay")
}

fn small() -> Resolver<MemoryStore> {
    let mut streets = BTreeMap::new();
    streets.insert("Pleudihen".to_string(), vec!["Rue du Parc".to_string()]);
    streets.insert(
        "Verzenay".to_string(),
        vec!["Rue de la Crayère".to_string(), "Rue Chanzy".to_string()],
    );
    let data = GazetteerData {
        villages: vec!["Verzenay".to_string(), "Pleudihen".to_string()],
        streets,
    };
    Resolver::new(Gazetteer::new(data, MemoryStore::new()), "Verzenay")
}

fn partial(address: &str, city: &str) -> PartialAddress {
    PartialAddress::new(Some(address), Some(city))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn candidates_are_bounded_filtered_and_sorted() {
    let resolver = bundled();
    for query in ["Rue du Parc", "rue du moulin", "Rue", "Rue des", "Place", "xyz", ""] {
        let candidates = resolver.resolve_city_from_street(query);
        assert!(candidates.len() <= MAX_CANDIDATES, "{query}: too many");
        assert!(
            candidates.iter().all(|c| c.score >= MIN_CANDIDATE_SCORE),
            "{query}: low score kept"
        );
        assert!(
            candidates.windows(2).all(|w| w[0].score >= w[1].score),
            "{query}: not sorted"
        );
    }
}

#[test]
fn candidate_scores_tolerate_typos() {
    let resolver = bundled();
    let candidates = resolver.resolve_city_from_street("Rue Gambeta");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].city, "Verzenay");
    assert_eq!(candidates[0].street, "Rue Gambetta");
    assert!(candidates[0].score > AUTO_ACCEPT_SCORE);
}

#[test]
fn single_strong_candidate_infers_city() {
    let completion = small().auto_complete_address(partial("16 Rue du Parc", ""));
    assert_eq!(completion.city, "Pleudihen");
    assert!(completion.inferred);
    assert!(!completion.needs_disambiguation);
    assert_eq!(completion.address, "16 Rue du Parc");
    assert!(approx(completion.score, 1.0));
}

#[test]
fn empty_input_falls_back_to_default_city() {
    let completion = bundled().auto_complete_address(PartialAddress::default());
    assert_eq!(completion.city, "Verzenay");
    assert!(!completion.inferred);
    assert!(!completion.needs_disambiguation);
    assert!(completion.candidates.is_empty());
    assert!(approx(completion.score, 0.5));
}

#[test]
fn shared_street_needs_disambiguation() {
    let completion = bundled().auto_complete_address(partial("16 Rue du Parc", ""));
    assert!(completion.needs_disambiguation);
    assert!(!completion.inferred);
    assert_eq!(completion.city, "Verzenay");
    let cities: Vec<&str> = completion.candidates.iter().map(|c| c.city.as_str()).collect();
    assert!(cities.contains(&"Pleudihen"));
    assert!(cities.contains(&"Sillery"));
    // known default city + house number + strong top - ambiguity
    assert!(approx(completion.score, 0.8));
}

#[test]
fn known_city_skips_inference() {
    let completion = bundled().auto_complete_address(partial("21 rue haute", " pleudihen "));
    assert_eq!(completion.city, "Pleudihen");
    assert!(completion.candidates.is_empty());
    assert!(!completion.inferred);
    assert!(approx(completion.score, 0.7));
}

#[test]
fn strong_match_overrides_unknown_typed_city() {
    let completion = bundled().auto_complete_address(partial("4 Rue du Bois", "Verzi"));
    assert_eq!(completion.city, "Verzy");
    assert!(completion.inferred);
}

#[test]
fn unmatched_street_keeps_unknown_city() {
    let completion = bundled().auto_complete_address(partial("5 Rue Inconnue Totale", "Reims"));
    assert_eq!(completion.city, "Reims");
    assert!(completion.candidates.is_empty());
    assert!(approx(completion.score, 0.2));
}

#[test]
fn learned_street_resolves_exactly() {
    let mut resolver = bundled();
    assert!(resolver.resolve_city_from_street("Chemin Neuf").is_empty());
    resolver.add_user_street("Ludes", "Chemin Neuf").unwrap();
    let candidates = resolver.resolve_city_from_street("Chemin Neuf");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].city, "Ludes");
    assert!(approx(candidates[0].score, 1.0));
}

#[test]
fn confirm_candidate_learns_the_pick() {
    let mut resolver = bundled();
    let completion = resolver.auto_complete_address(partial("Rue Haute", ""));
    assert!(completion.needs_disambiguation);
    let pick = completion
        .candidates
        .iter()
        .find(|c| c.city == "Villers-Marmery")
        .unwrap()
        .clone();
    assert_eq!(resolver.confirm_candidate(&pick).unwrap(), "Villers-Marmery");
    assert_eq!(
        resolver.gazetteer().user_streets()["Villers-Marmery"],
        vec!["Rue Haute"]
    );
}

#[test]
fn submit_stop_completes_city_and_learns_street() {
    let mut resolver = bundled();
    let stop = resolver
        .submit_stop(StopDraft {
            address: " 3 Chemin Neuf ".to_string(),
            city: Some("ludes".to_string()),
            phone: Some("+33 6 12 34 56 78".to_string()),
            time: Some(" ".to_string()),
            notes: None,
        })
        .unwrap();
    assert_eq!(stop.address, "3 Chemin Neuf");
    assert_eq!(stop.city, "Ludes");
    assert_eq!(stop.phone.as_deref(), Some("+33 6 12 34 56 78"));
    assert!(stop.time.is_none());

    let candidates = resolver.resolve_city_from_street("Chemin Neuf");
    assert_eq!(candidates[0].city, "Ludes");
}

#[test]
fn submit_stop_without_city_uses_inference() {
    let mut resolver = bundled();
    let stop = resolver
        .submit_stop(StopDraft {
            address: "8 Rue de la Crayere".to_string(),
            ..StopDraft::default()
        })
        .unwrap();
    assert_eq!(stop.city, "Verzenay");
    assert_eq!(
        resolver.gazetteer().user_streets()["Verzenay"],
        vec!["Rue de la Crayere"]
    );
}

#[test]
fn resubmitting_a_known_street_in_other_case_keeps_it_unambiguous() {
    let mut resolver = small();
    resolver
        .submit_stop(StopDraft {
            address: "16 rue du parc".to_string(),
            city: Some("Pleudihen".to_string()),
            ..StopDraft::default()
        })
        .unwrap();

    let completion = resolver.auto_complete_address(partial("16 Rue du Parc", ""));
    assert_eq!(completion.city, "Pleudihen");
    assert!(completion.inferred);
    assert!(!completion.needs_disambiguation);
    assert_eq!(completion.candidates.len(), 1);
}

#[test]
fn score_address_clamps() {
    let strong = Candidate {
        city: "Ludes".to_string(),
        street: "Rue Pasteur".to_string(),
        score: 1.0,
    };
    assert!(approx(score_address("12 Rue Pasteur", true, &[strong.clone()]), 1.0));
    assert!(approx(
        score_address("Rue Pasteur", false, &[strong.clone(), strong.clone()]),
        0.1
    ));
    let weak = Candidate { score: 0.8, ..strong };
    assert!(approx(score_address("Rue", false, &[weak.clone(), weak]), 0.0));
}

#[test]
fn house_number_bonus_ignores_long_numbers() {
    assert!(approx(score_address("2024 Route Nationale", false, &[]), 0.0));
    assert!(approx(score_address("Route Nationale 12", false, &[]), 0.2));
}

#[test]
fn suggest_streets_reads_merged_index() {
    let mut resolver = small();
    resolver.add_user_street("Pleudihen", "Rue des Lilas").unwrap();
    let out = resolver.suggest_streets(Some("Pleudihen"), "rue des lil", 8);
    assert_eq!(out.first().map(String::as_str), Some("Rue des Lilas"));
}

#[test]
fn completion_serializes_camel_case() {
    let completion = small().auto_complete_address(partial("Rue Chanzy", ""));
    let json = serde_json::to_value(&completion).unwrap();
    assert_eq!(json["city"], "Verzenay");
    assert_eq!(json["needsDisambiguation"], false);
    assert_eq!(json["inferred"], true);
}

use ttm_core::MemoryStore;

use super::*;

fn stop_at(address: &str, time: Option<&str>) -> Stop {
    Stop::new(address, "Verzenay").with_time(time.map(String::from))
}

fn addresses(stops: &[Stop]) -> Vec<&str> {
    stops.iter().map(|s| s.address.as_str()).collect()
}

// -----------------------------------------------------------------------
// Route edits
// -----------------------------------------------------------------------

#[test]
fn update_patches_matching_stop() {
    let stop = stop_at("1 Rue Thiers", None);
    let id = stop.id;
    let mut route = Route::new(vec![stop]);
    let patch = StopPatch {
        phone: Some("+33 6 12 34 56 78".to_string()),
        ..StopPatch::default()
    };
    assert!(route.update(id, patch));
    assert_eq!(route.stops()[0].phone.as_deref(), Some("+33 6 12 34 56 78"));
}

#[test]
fn update_unknown_id_returns_false() {
    let mut route = Route::new(vec![stop_at("1 Rue Thiers", None)]);
    assert!(!route.update(Uuid::new_v4(), StopPatch::default()));
}

#[test]
fn remove_returns_removed_stop() {
    let a = stop_at("1 Rue Thiers", None);
    let b = stop_at("2 Rue Chanzy", None);
    let id = a.id;
    let mut route = Route::new(vec![a, b]);
    let removed = route.remove(id).expect("stop should be removed");
    assert_eq!(removed.address, "1 Rue Thiers");
    assert_eq!(addresses(route.stops()), vec!["2 Rue Chanzy"]);
    assert!(route.remove(id).is_none());
}

#[test]
fn reorder_moves_stop_and_clamps_index() {
    let a = stop_at("A", None);
    let b = stop_at("B", None);
    let c = stop_at("C", None);
    let a_id = a.id;
    let c_id = c.id;
    let mut route = Route::new(vec![a, b, c]);

    assert!(route.reorder(c_id, 0));
    assert_eq!(addresses(route.stops()), vec!["C", "A", "B"]);

    assert!(route.reorder(a_id, 99));
    assert_eq!(addresses(route.stops()), vec!["C", "B", "A"]);

    assert!(!route.reorder(Uuid::new_v4(), 0));
}

#[test]
fn clear_empties_route() {
    let mut route = Route::new(vec![stop_at("A", None)]);
    route.clear();
    assert!(route.is_empty());
}

// -----------------------------------------------------------------------
// order_stops
// -----------------------------------------------------------------------

#[test]
fn manual_order_is_unchanged() {
    let stops = vec![stop_at("B", Some("20:00")), stop_at("A", Some("19:00"))];
    assert_eq!(addresses(&order_stops(&stops, OrderMode::Manual)), vec!["B", "A"]);
}

#[test]
fn time_order_sorts_and_puts_untimed_last() {
    let stops = vec![
        stop_at("untimed-1", None),
        stop_at("late", Some("20:45")),
        stop_at("early", Some("9:05")),
        stop_at("untimed-2", Some("whenever")),
        stop_at("mid", Some("19:30")),
    ];
    assert_eq!(
        addresses(&order_stops(&stops, OrderMode::Time)),
        vec!["early", "mid", "late", "untimed-1", "untimed-2"]
    );
}

// -----------------------------------------------------------------------
// RouteRepository
// -----------------------------------------------------------------------

#[test]
fn stops_round_trip_preserves_order_and_fields() {
    let mut repo = RouteRepository::new(MemoryStore::new(), "Rue de la Crayère, Verzenay");
    let stops = vec![
        Stop::new("21 Rue Haute", "Pleudihen")
            .with_phone(Some("+33 7 88 86 71 02".to_string()))
            .with_time(Some("20:20".to_string()))
            .with_notes(Some("coupé; couteau; fourchette".to_string())),
        Stop::new("16 Rue du Parc", "Sillery"),
    ];
    repo.save_stops(&stops).unwrap();
    assert_eq!(repo.load_stops().unwrap(), stops);
}

#[test]
fn load_stops_empty_when_absent() {
    let repo = RouteRepository::new(MemoryStore::new(), "origin");
    assert!(repo.load_stops().unwrap().is_empty());
}

#[test]
fn load_stops_empty_when_malformed() {
    let mut store = MemoryStore::new();
    store.set(STOPS_KEY, r#"{"id": "not-a-list"}"#).unwrap();
    let repo = RouteRepository::new(store, "origin");
    assert!(repo.load_stops().unwrap().is_empty());
}

#[test]
fn clear_stops_removes_key() {
    let mut repo = RouteRepository::new(MemoryStore::new(), "origin");
    repo.save_stops(&[Stop::new("A", "Ludes")]).unwrap();
    repo.clear_stops().unwrap();
    assert!(repo.load_stops().unwrap().is_empty());
}

#[test]
fn mode_defaults_to_manual_and_round_trips() {
    let mut repo = RouteRepository::new(MemoryStore::new(), "origin");
    assert_eq!(repo.load_mode().unwrap(), OrderMode::Manual);
    repo.save_mode(OrderMode::Time).unwrap();
    assert_eq!(repo.load_mode().unwrap(), OrderMode::Time);
}

#[test]
fn origin_falls_back_to_default() {
    let mut repo = RouteRepository::new(MemoryStore::new(), "Rue de la Crayère, Verzenay");
    assert_eq!(repo.load_origin().unwrap(), "Rue de la Crayère, Verzenay");
    repo.save_origin("  ").unwrap();
    assert_eq!(repo.load_origin().unwrap(), "Rue de la Crayère, Verzenay");
    repo.save_origin("Place de la Mairie, Verzy").unwrap();
    assert_eq!(repo.load_origin().unwrap(), "Place de la Mairie, Verzy");
}

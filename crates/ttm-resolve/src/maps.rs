use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use ttm_core::{Stop, DEFAULT_ORIGIN};

pub const MAPS_HOME_URL: &str = "https://www.google.com/maps";
const DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";
const APP_SCHEME_URL: &str = "comgooglemaps://";

/// Web directions link: origin, the last stop as destination and every
/// earlier stop as a waypoint, driving, French locale.
///
/// An empty route links to the maps home page. A blank origin uses
/// [`DEFAULT_ORIGIN`]; a stop without a city uses `default_city`.
#[must_use]
pub fn build_maps_url(stops: &[Stop], origin: Option<&str>, default_city: &str) -> String {
    let Some((last, earlier)) = stops.split_last() else {
        return MAPS_HOME_URL.to_string();
    };

    let mut url = format!(
        "{DIRECTIONS_URL}?api=1&origin={}&destination={}&travelmode=driving&hl=fr&region=FR",
        encode(origin_or_default(origin)),
        encode(&place(last, default_city)),
    );
    if !earlier.is_empty() {
        let waypoints = earlier
            .iter()
            .map(|stop| place(stop, default_city))
            .collect::<Vec<_>>()
            .join("|");
        url.push_str("&waypoints=");
        url.push_str(&encode(&waypoints));
    }
    url
}

/// Native app link to the final stop. `None` for an empty route.
#[must_use]
pub fn build_app_url(stops: &[Stop], origin: Option<&str>, default_city: &str) -> Option<String> {
    let last = stops.last()?;
    Some(format!(
        "{APP_SCHEME_URL}?saddr={}&daddr={}&directionsmode=driving",
        encode(origin_or_default(origin)),
        encode(&place(last, default_city)),
    ))
}

fn origin_or_default(origin: Option<&str>) -> &str {
    origin
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .unwrap_or(DEFAULT_ORIGIN)
}

/// `"<address>, <city>"`, whitespace collapsed.
fn place(stop: &Stop, default_city: &str) -> String {
    let city = match stop.city.trim() {
        "" => default_city.trim(),
        city => city,
    };
    [stop.address.as_str(), city]
        .iter()
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

//! Answers to the questions asked about a feed, ready to be serialized
//!
//! These functions only read tables that were already parsed: fetching and
//! caching is the business of [crate::Feed].

use crate::departures::{matching_stop_times, DepartureEvent};
use crate::geo::distance_meters;
use crate::objects::{Route, Stop, StopTime, Trip};
use crate::table::{parse_table_filtered, ParsedTable};
use crate::time::serialize_clock_time;
use crate::Error;
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Serialize, PartialEq)]
pub struct RouteList {
    pub count: usize,
    pub filter: Option<String>,
    pub routes: Vec<Route>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StopList {
    pub count: usize,
    pub filter: Option<String>,
    pub stops: Vec<Stop>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Search of stops by name and/or around a location
#[derive(Derivative, Debug, Clone, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct StopSearch {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[derivative(Default(value = "500.0"))]
    #[serde(alias = "radius")]
    pub radius_meters: f64,
    #[derivative(Default(value = "10"))]
    pub limit: usize,
}

impl StopSearch {
    /// The location to search around, only when both coordinates are given
    pub fn location(&self) -> Option<Location> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Location { lat, lon }),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let Some(lat) = self.lat {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(Error::InvalidInput(format!(
                    "lat must be between -90 and 90, got {}",
                    lat
                )));
            }
        }
        if let Some(lon) = self.lon {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(Error::InvalidInput(format!(
                    "lon must be between -180 and 180, got {}",
                    lon
                )));
            }
        }
        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "radius must be a positive number of meters, got {}",
                self.radius_meters
            )));
        }
        check_limit(self.limit, 100)
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StopSearchCriteria {
    pub name: Option<String>,
    pub location: Option<Location>,
    pub radius_meters: Option<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StopMatch {
    pub stop_id: String,
    pub name: String,
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StopSearchResult {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub search_criteria: StopSearchCriteria,
    pub stops: Vec<StopMatch>,
}

/// Search of routes by number and/or name
#[derive(Derivative, Debug, Clone, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct RouteSearch {
    pub number: Option<String>,
    pub name: Option<String>,
    pub include_stops: bool,
    #[derivative(Default(value = "10"))]
    pub limit: usize,
}

impl RouteSearch {
    pub fn validate(&self) -> Result<(), Error> {
        check_limit(self.limit, 100)
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RouteSearchCriteria {
    pub number: Option<String>,
    pub name: Option<String>,
    pub include_stops: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RouteStop {
    pub stop_sequence: u32,
    pub stop_id: String,
    pub stop_name: String,
    pub arrival_time: String,
    pub departure_time: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RouteMatch {
    #[serde(flatten)]
    pub route: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stops: Option<Vec<RouteStop>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_stops: Option<usize>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RouteSearchResult {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub search_criteria: RouteSearchCriteria,
    pub routes: Vec<RouteMatch>,
}

/// Upcoming departures of a route at a stop
///
/// Both identifiers are mandatory, they are optional here only so that a
/// missing one is reported as an [Error::InvalidInput].
#[derive(Derivative, Debug, Clone, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct DepartureQuery {
    pub route_id: Option<String>,
    pub stop_id: Option<String>,
    #[derivative(Default(value = "5"))]
    pub limit: usize,
}

impl DepartureQuery {
    pub fn new(route_id: &str, stop_id: &str) -> Self {
        Self {
            route_id: Some(route_id.to_owned()),
            stop_id: Some(stop_id.to_owned()),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// `(route_id, stop_id)` once the query is known to be complete
    pub fn validate(&self) -> Result<(&str, &str), Error> {
        let route_id = required(&self.route_id, "route_id")?;
        let stop_id = required(&self.stop_id, "stop_id")?;
        check_limit(self.limit, 50)?;
        Ok((route_id, stop_id))
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, Error> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::InvalidInput(format!("{} is required", name))),
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Departure {
    #[serde(rename = "departure_time", serialize_with = "serialize_clock_time")]
    pub departure: chrono::NaiveDateTime,
    pub trip_id: String,
    pub stop_sequence: String,
}

impl From<DepartureEvent> for Departure {
    fn from(event: DepartureEvent) -> Self {
        Self {
            departure: event.departure,
            trip_id: event.stop_time.trip_id,
            stop_sequence: event.stop_time.stop_sequence,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DepartureList {
    pub route_id: String,
    pub stop_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub departures: Vec<Departure>,
}

fn check_limit(limit: usize, max: usize) -> Result<(), Error> {
    if limit == 0 || limit > max {
        Err(Error::InvalidInput(format!(
            "limit must be between 1 and {}, got {}",
            max, limit
        )))
    } else {
        Ok(())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn non_empty(q: Option<&str>) -> Option<&str> {
    q.map(str::trim).filter(|q| !q.is_empty())
}

fn sorted_routes(routes: impl Iterator<Item = Route>) -> Vec<Route> {
    routes.sorted_by(Route::display_order).collect()
}

/// All routes, or those whose id or names contain `q`
pub fn list_routes(routes: &ParsedTable, q: Option<&str>) -> RouteList {
    let q = non_empty(q);
    let needle = q.map(str::to_lowercase);
    let routes = sorted_routes(routes.rows().map(Route::from).filter(|r| match &needle {
        Some(n) => {
            contains_ignore_case(&r.id, n)
                || contains_ignore_case(&r.short_name, n)
                || contains_ignore_case(&r.long_name, n)
        }
        None => true,
    }));
    RouteList {
        count: routes.len(),
        filter: q.map(str::to_owned),
        routes,
    }
}

/// All stops, or those whose name contains `q`
pub fn list_stops(stops: &ParsedTable, q: Option<&str>) -> StopList {
    let q = non_empty(q);
    let needle = q.map(str::to_lowercase);
    let stops: Vec<Stop> = stops
        .rows()
        .map(Stop::from)
        .filter(|s| match &needle {
            Some(n) => contains_ignore_case(&s.name, n),
            None => true,
        })
        .collect();
    StopList {
        count: stops.len(),
        filter: q.map(str::to_owned),
        stops,
    }
}

/// Stops matching a name and/or within a radius of a location
///
/// Around a location, the closest come first; otherwise stops are sorted by name.
/// `search` is expected to have gone through [StopSearch::validate].
pub fn find_stops(stops: &ParsedTable, search: &StopSearch) -> StopSearchResult {
    let name = non_empty(search.name.as_deref());
    let needle = name.map(str::to_lowercase);
    let location = search.location();

    let candidates = stops.rows().map(Stop::from).filter(|s| match &needle {
        Some(n) => contains_ignore_case(&s.name, n),
        None => true,
    });

    let matches: Vec<StopMatch> = match location {
        Some(origin) => candidates
            .filter_map(|s| {
                let (lat, lon) = s.coordinates()?;
                let distance = distance_meters(origin.lat, origin.lon, lat, lon);
                let distance = (distance * 10.0).round() / 10.0;
                Some((s, Location { lat, lon }, distance))
            })
            .filter(|(_, _, distance)| *distance <= search.radius_meters)
            .sorted_by(|a, b| a.2.total_cmp(&b.2))
            .take(search.limit)
            .map(|(s, location, distance)| StopMatch {
                stop_id: s.id,
                name: s.name,
                location: Some(location),
                distance_meters: Some(distance),
            })
            .collect(),
        None => candidates
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .take(search.limit)
            .map(|s| StopMatch {
                location: s.coordinates().map(|(lat, lon)| Location { lat, lon }),
                stop_id: s.id,
                name: s.name,
                distance_meters: None,
            })
            .collect(),
    };

    let message = if matches.is_empty() {
        let mut search_info = Vec::new();
        if let Some(name) = name {
            search_info.push(format!("name containing '{}'", name));
        }
        if let Some(origin) = location {
            search_info.push(format!(
                "within {}m of ({}, {})",
                search.radius_meters, origin.lat, origin.lon
            ));
        }
        Some(format!("No stops found {}", search_info.join(" and "))
            .trim_end()
            .to_owned())
    } else {
        None
    };

    StopSearchResult {
        count: matches.len(),
        message,
        search_criteria: StopSearchCriteria {
            name: search.name.clone(),
            location,
            radius_meters: location.map(|_| search.radius_meters),
        },
        stops: matches,
    }
}

/// The stops served by the first trip of each of `route_ids`, in the order they are served
///
/// stop_times.txt is read once whatever the number of routes. Routes without
/// any trip are absent from the result.
pub fn routes_stops(
    route_ids: &[&str],
    trips: &ParsedTable,
    stop_times: &[u8],
    stops: &HashMap<&str, Stop>,
) -> Result<HashMap<String, Vec<RouteStop>>, Error> {
    let wanted: HashSet<&str> = route_ids.iter().copied().collect();
    let mut seen = HashSet::new();
    // trip_id -> route_id
    let mut first_trips: HashMap<String, String> = HashMap::new();
    for trip in trips.rows().map(Trip::from) {
        if wanted.contains(trip.route_id.as_str()) && seen.insert(trip.route_id.clone()) {
            first_trips.insert(trip.id, trip.route_id);
        }
    }
    if first_trips.is_empty() {
        return Ok(HashMap::new());
    }

    let trip_stop_times = parse_table_filtered("stop_times.txt", stop_times, |st| {
        first_trips.contains_key(st.get("trip_id"))
    })?;

    let mut served: HashMap<String, Vec<RouteStop>> = HashMap::new();
    for st in trip_stop_times
        .rows()
        .map(StopTime::from)
        .sorted_by_key(StopTime::sequence)
    {
        let route_id = first_trips.get(&st.trip_id);
        let stop = stops.get(st.stop_id.as_str());
        let (route_id, stop) = match (route_id, stop) {
            (Some(route_id), Some(stop)) => (route_id, stop),
            _ => continue,
        };
        served.entry(route_id.clone()).or_default().push(RouteStop {
            stop_sequence: st.sequence(),
            stop_name: stop.name.clone(),
            stop_id: st.stop_id,
            arrival_time: st.arrival_time,
            departure_time: st.departure_time,
        });
    }
    Ok(served)
}

/// Routes matching a number and/or a name
///
/// `stop_times` is only read when the stops of the routes are requested.
/// `search` is expected to have gone through [RouteSearch::validate].
pub fn find_routes(
    routes: &ParsedTable,
    search: &RouteSearch,
    with_stops: Option<(&ParsedTable, &[u8], &ParsedTable)>,
) -> Result<RouteSearchResult, Error> {
    let number = non_empty(search.number.as_deref()).map(str::to_lowercase);
    let name = non_empty(search.name.as_deref()).map(str::to_lowercase);

    let found = sorted_routes(routes.rows().map(Route::from).filter(|r| {
        number.as_ref().map_or(true, |n| {
            contains_ignore_case(&r.id, n) || contains_ignore_case(&r.short_name, n)
        }) && name
            .as_ref()
            .map_or(true, |n| contains_ignore_case(&r.long_name, n))
    }));

    let search_criteria = RouteSearchCriteria {
        number: search.number.clone(),
        name: search.name.clone(),
        include_stops: search.include_stops,
    };
    if found.is_empty() {
        return Ok(RouteSearchResult {
            count: 0,
            message: Some("No routes found matching the search criteria".to_owned()),
            search_criteria,
            routes: Vec::new(),
        });
    }

    let stops_by_id: Option<HashMap<&str, Stop>> = match with_stops {
        Some((_, _, stops)) if search.include_stops => Some(
            stops
                .rows()
                .map(|s| (s.get("stop_id"), Stop::from(s)))
                .collect(),
        ),
        _ => None,
    };

    let selected: Vec<Route> = found.into_iter().take(search.limit).collect();
    let mut served = match (&stops_by_id, with_stops) {
        (Some(stops_by_id), Some((trips, stop_times, _))) => {
            let route_ids: Vec<&str> = selected.iter().map(|r| r.id.as_str()).collect();
            Some(routes_stops(&route_ids, trips, stop_times, stops_by_id)?)
        }
        _ => None,
    };

    let matches: Vec<RouteMatch> = selected
        .into_iter()
        .map(|route| {
            let stops = served
                .as_mut()
                .map(|served| served.remove(&route.id).unwrap_or_default());
            RouteMatch {
                total_stops: stops.as_ref().map(Vec::len),
                route,
                stops,
            }
        })
        .collect();

    Ok(RouteSearchResult {
        count: matches.len(),
        message: None,
        search_criteria,
        routes: matches,
    })
}

/// The first `limit` departures of `events`, already sorted
pub fn departure_list(
    route_id: &str,
    stop_id: &str,
    events: Vec<DepartureEvent>,
    limit: usize,
) -> DepartureList {
    let departures: Vec<Departure> = events
        .into_iter()
        .take(limit)
        .map(Departure::from)
        .collect();
    let message = if departures.is_empty() {
        Some(format!(
            "No upcoming departures found for route {} at stop {}",
            route_id, stop_id
        ))
    } else {
        None
    };
    DepartureList {
        route_id: route_id.to_owned(),
        stop_id: stop_id.to_owned(),
        message,
        departures,
    }
}

/// Stop times of a route at a stop, to be resolved against the current time
pub fn departure_stop_times(
    route_id: &str,
    stop_id: &str,
    trips: &ParsedTable,
    stop_times: &[u8],
) -> Result<Vec<StopTime>, Error> {
    let trip_ids = crate::departures::trip_ids_for_route(trips, route_id);
    matching_stop_times(stop_times, &trip_ids, stop_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_table;

    fn stops() -> ParsedTable {
        parse_table(
            "stops.txt",
            b"stop_id,stop_name,stop_lat,stop_lon
origin,Null Island,0,0
far,Far Away,1,1
plaza,Plaza Ayuntamiento,0.001,0
broken,Plaza Rota,,
",
        )
        .unwrap()
    }

    fn routes() -> ParsedTable {
        parse_table(
            "routes.txt",
            b"route_id,route_short_name,route_long_name,route_type
R25,25,Centro - Playa,3
RN1,N1,Nocturno Centro,3
R4,4,Puerto,3
",
        )
        .unwrap()
    }

    #[test]
    fn stops_within_radius() {
        let search = StopSearch {
            lat: Some(0.0),
            lon: Some(0.0),
            radius_meters: 1.0,
            ..Default::default()
        };
        let result = find_stops(&stops(), &search);
        assert_eq!(1, result.count);
        assert_eq!("origin", result.stops[0].stop_id);
        assert_eq!(Some(0.0), result.stops[0].distance_meters);
        assert_eq!(Some(1.0), result.search_criteria.radius_meters);
    }

    #[test]
    fn closest_stops_first() {
        let search = StopSearch {
            lat: Some(0.0),
            lon: Some(0.0),
            radius_meters: 200_000.0,
            ..Default::default()
        };
        let result = find_stops(&stops(), &search);
        let ids: Vec<&str> = result.stops.iter().map(|s| s.stop_id.as_str()).collect();
        assert_eq!(vec!["origin", "plaza", "far"], ids);
        assert_eq!(Some(111.2), result.stops[1].distance_meters);
    }

    #[test]
    fn stops_by_name() {
        let search = StopSearch {
            name: Some("PLAZA".to_owned()),
            limit: 1,
            ..Default::default()
        };
        let result = find_stops(&stops(), &search);
        assert_eq!(1, result.count);
        assert_eq!("Plaza Ayuntamiento", result.stops[0].name);
        assert_eq!(None, result.search_criteria.location);
        assert_eq!(None, result.search_criteria.radius_meters);

        let search = StopSearch {
            name: Some("rota".to_owned()),
            ..Default::default()
        };
        let result = find_stops(&stops(), &search);
        assert_eq!(None, result.stops[0].location);
    }

    #[test]
    fn no_stop_found() {
        let search = StopSearch {
            name: Some("atlantis".to_owned()),
            ..Default::default()
        };
        let result = find_stops(&stops(), &search);
        assert_eq!(0, result.count);
        assert_eq!(
            Some("No stops found name containing 'atlantis'".to_owned()),
            result.message
        );
    }

    #[test]
    fn invalid_stop_search() {
        let search = StopSearch {
            lat: Some(91.0),
            lon: Some(0.0),
            ..Default::default()
        };
        assert!(search.validate().unwrap_err().is_caller_error());
        let search = StopSearch {
            radius_meters: f64::NAN,
            ..Default::default()
        };
        assert!(search.validate().unwrap_err().is_caller_error());
        let search = StopSearch {
            limit: 0,
            ..Default::default()
        };
        assert!(search.validate().unwrap_err().is_caller_error());
        assert!(StopSearch::default().validate().is_ok());
    }

    #[test]
    fn routes_sorted_and_filtered() {
        let all = list_routes(&routes(), None);
        let names: Vec<&str> = all.routes.iter().map(|r| r.short_name.as_str()).collect();
        assert_eq!(vec!["4", "25", "N1"], names);
        assert_eq!(None, all.filter);

        let centro = list_routes(&routes(), Some("centro"));
        assert_eq!(2, centro.count);
        assert_eq!(Some("centro".to_owned()), centro.filter);

        assert_eq!(1, list_routes(&routes(), Some("rn1")).count);
        assert_eq!(3, list_routes(&routes(), Some("")).count);
    }

    #[test]
    fn stops_filtered_by_name() {
        let list = list_stops(&stops(), Some("plaza"));
        assert_eq!(2, list.count);
        assert_eq!("0.001", list.stops[0].latitude);
    }

    #[test]
    fn routes_with_their_stops() {
        let trips = parse_table(
            "trips.txt",
            b"route_id,service_id,trip_id\nR4,S,T9\nR25,S,T1\nR25,S,T2\n",
        )
        .unwrap();
        let stop_times = b"trip_id,arrival_time,departure_time,stop_id,stop_sequence
T1,08:10:00,08:10:00,far,10
T2,09:00:00,09:00:00,plaza,1
T1,08:00:00,08:00:00,origin,2
T1,08:05:00,08:05:00,ghost,3
";
        let search = RouteSearch {
            number: Some("25".to_owned()),
            include_stops: true,
            ..Default::default()
        };
        let stops = stops();
        let result = find_routes(
            &routes(),
            &search,
            Some((&trips, &stop_times[..], &stops)),
        )
        .unwrap();
        assert_eq!(1, result.count);
        let route = &result.routes[0];
        assert_eq!("R25", route.route.id);
        assert_eq!(Some(2), route.total_stops);
        let served: Vec<(u32, &str)> = route
            .stops
            .as_ref()
            .unwrap()
            .iter()
            .map(|s| (s.stop_sequence, s.stop_name.as_str()))
            .collect();
        assert_eq!(vec![(2, "Null Island"), (10, "Far Away")], served);
    }

    #[test]
    fn first_trip_of_every_route_in_one_pass() {
        let trips = parse_table(
            "trips.txt",
            b"route_id,service_id,trip_id\nR4,S,T9\nR25,S,T1\nR25,S,T2\nR99,S,T7\n",
        )
        .unwrap();
        let stop_times = b"trip_id,arrival_time,departure_time,stop_id,stop_sequence
T9,07:00:00,07:00:00,plaza,1
T1,08:00:00,08:00:00,origin,1
T2,09:00:00,09:00:00,far,1
T9,07:05:00,07:05:00,origin,2
T7,10:00:00,10:00:00,far,1
";
        let stops = stops();
        let stops_by_id: HashMap<&str, Stop> = stops
            .rows()
            .map(|s| (s.get("stop_id"), Stop::from(s)))
            .collect();
        let served =
            routes_stops(&["R4", "R25", "R0"], &trips, &stop_times[..], &stops_by_id).unwrap();
        assert_eq!(2, served.len());
        let ids = |route: &str| -> Vec<String> {
            served[route].iter().map(|s| s.stop_id.clone()).collect()
        };
        assert_eq!(vec!["plaza", "origin"], ids("R4"));
        assert_eq!(vec!["origin"], ids("R25"));
        assert!(!served.contains_key("R99"));
        assert!(!served.contains_key("R0"));
    }

    #[test]
    fn route_search_without_stops() {
        let search = RouteSearch {
            name: Some("puerto".to_owned()),
            ..Default::default()
        };
        let result = find_routes(&routes(), &search, None).unwrap();
        assert_eq!(1, result.count);
        assert_eq!(None, result.routes[0].stops);

        let search = RouteSearch {
            number: Some("99".to_owned()),
            ..Default::default()
        };
        let result = find_routes(&routes(), &search, None).unwrap();
        assert_eq!(0, result.count);
        assert!(result.message.is_some());
    }

    #[test]
    fn departure_query_requires_ids() {
        let missing_route = DepartureQuery {
            stop_id: Some("A".to_owned()),
            ..Default::default()
        };
        let err = missing_route.validate().unwrap_err();
        assert!(err.is_caller_error());
        assert_eq!("invalid query: route_id is required", err.to_string());

        let blank_stop = DepartureQuery {
            route_id: Some("R1".to_owned()),
            stop_id: Some("  ".to_owned()),
            ..Default::default()
        };
        assert!(blank_stop.validate().unwrap_err().is_caller_error());

        assert!(DepartureQuery::new("R1", "A")
            .with_limit(51)
            .validate()
            .is_err());
        assert_eq!(
            ("R1", "A"),
            DepartureQuery::new("R1", "A").validate().unwrap()
        );
    }

    #[test]
    fn departures_render_wall_clock_time() {
        let event = DepartureEvent {
            departure: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(1, 30, 0)
                .unwrap(),
            stop_time: StopTime {
                trip_id: "T1".to_owned(),
                stop_sequence: "2".to_owned(),
                ..Default::default()
            },
        };
        let list = departure_list("R1", "B", vec![event], 5);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!("01:30:00", json["departures"][0]["departure_time"]);
        assert_eq!("T1", json["departures"][0]["trip_id"]);
        assert!(json.get("message").is_none());

        let empty = departure_list("R1", "B", Vec::new(), 5);
        assert_eq!(
            Some("No upcoming departures found for route R1 at stop B".to_owned()),
            empty.message
        );
    }
}

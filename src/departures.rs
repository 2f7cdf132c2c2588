use crate::cache::FeedSnapshot;
use crate::objects::StopTime;
use crate::table::{parse_table_filtered, ParsedTable};
use crate::time::resolve_time;
use crate::Error;
use chrono::{Duration, NaiveDateTime};
use std::collections::HashSet;

/// A stop time resolved to the instant the bus actually leaves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartureEvent {
    pub departure: NaiveDateTime,
    pub stop_time: StopTime,
}

/// Identifiers of the trips of a route
pub fn trip_ids_for_route<'a>(trips: &'a ParsedTable, route_id: &str) -> HashSet<&'a str> {
    trips
        .rows()
        .filter(|t| t.get("route_id") == route_id)
        .map(|t| t.get("trip_id"))
        .collect()
}

/// The stop times of `trip_ids` at `stop_id`, read from the raw stop_times.txt
///
/// Only the matching rows are ever kept in memory.
pub fn matching_stop_times(
    stop_times: &[u8],
    trip_ids: &HashSet<&str>,
    stop_id: &str,
) -> Result<Vec<StopTime>, Error> {
    if trip_ids.is_empty() {
        return Ok(Vec::new());
    }
    let table = parse_table_filtered("stop_times.txt", stop_times, |st| {
        st.get("stop_id") == stop_id && trip_ids.contains(st.get("trip_id"))
    })?;
    Ok(table.rows().map(StopTime::from).collect())
}

fn next_occurrence(stop_time: &StopTime, reference: NaiveDateTime) -> Result<NaiveDateTime, Error> {
    let departure = resolve_time(&stop_time.departure_time, reference.date())?;
    if departure >= reference {
        return Ok(departure);
    }
    departure
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| Error::InvalidTime(stop_time.departure_time.clone()))
}

/// Next occurrence of each stop time at or after `reference`, earliest first
///
/// A departure whose time today is already past is taken tomorrow. Stop times
/// with an unreadable departure time are skipped.
pub fn schedule(stop_times: Vec<StopTime>, reference: NaiveDateTime) -> Vec<DepartureEvent> {
    let mut events: Vec<DepartureEvent> = stop_times
        .into_iter()
        .filter_map(|stop_time| match next_occurrence(&stop_time, reference) {
            Ok(departure) => Some(DepartureEvent {
                departure,
                stop_time,
            }),
            Err(e) => {
                debug!(
                    "skipping stop time of trip {} at stop {}: {}",
                    stop_time.trip_id, stop_time.stop_id, e
                );
                None
            }
        })
        .collect();
    events.sort_by_key(|e| e.departure);
    events
}

/// All upcoming departures of `route_id` at `stop_id`, earliest first
///
/// An unknown route or stop gives no departures rather than an error. The
/// caller decides how many of them to keep.
pub fn next_departures(
    route_id: &str,
    stop_id: &str,
    reference: NaiveDateTime,
    snapshot: &FeedSnapshot,
) -> Result<Vec<DepartureEvent>, Error> {
    let trips = snapshot.table("trips.txt")?;
    let trip_ids = trip_ids_for_route(&trips, route_id);
    if trip_ids.is_empty() {
        return Ok(Vec::new());
    }
    let stop_times = matching_stop_times(snapshot.entry("stop_times.txt")?, &trip_ids, stop_id)?;
    Ok(schedule(stop_times, reference))
}

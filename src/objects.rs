use crate::table::Row;
use std::cmp::Ordering;
use std::fmt;

/// Objects that have an identifier implement this trait
pub trait Id {
    fn id(&self) -> &str;
}

/// A line of routes.txt
///
/// All fields are kept as the feed wrote them, absent ones are empty.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Route {
    #[serde(rename = "route_id")]
    pub id: String,
    #[serde(rename = "route_short_name")]
    pub short_name: String,
    #[serde(rename = "route_long_name")]
    pub long_name: String,
    pub route_type: String,
    pub route_color: String,
    pub route_text_color: String,
}

impl Id for Route {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.long_name.is_empty() {
            write!(f, "{}", self.long_name)
        } else {
            write!(f, "{}", self.short_name)
        }
    }
}

impl From<Row<'_>> for Route {
    fn from(row: Row) -> Self {
        Self {
            id: row.get("route_id").to_owned(),
            short_name: row.get("route_short_name").to_owned(),
            long_name: row.get("route_long_name").to_owned(),
            route_type: row.get("route_type").to_owned(),
            route_color: row.get("route_color").to_owned(),
            route_text_color: row.get("route_text_color").to_owned(),
        }
    }
}

impl Route {
    /// Routes with a numeric short name come first, by value, then the others alphabetically
    pub fn display_order(&self, other: &Route) -> Ordering {
        match (
            self.short_name.parse::<i64>(),
            other.short_name.parse::<i64>(),
        ) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.short_name.cmp(&other.short_name),
        }
    }
}

/// A line of trips.txt, only what is needed to join routes and stop times
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Trip {
    #[serde(rename = "trip_id")]
    pub id: String,
    pub route_id: String,
}

impl Id for Trip {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "trip id: {}, route id: {}", self.id, self.route_id)
    }
}

impl From<Row<'_>> for Trip {
    fn from(row: Row) -> Self {
        Self {
            id: row.get("trip_id").to_owned(),
            route_id: row.get("route_id").to_owned(),
        }
    }
}

/// A line of stop_times.txt
///
/// Times are still in the `HH:MM:SS` form of the feed, see [crate::time::resolve_time]
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct StopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: String,
    pub arrival_time: String,
    pub departure_time: String,
}

impl StopTime {
    /// Position of the stop in its trip, 0 if the feed value is not a number
    pub fn sequence(&self) -> u32 {
        self.stop_sequence.parse().unwrap_or(0)
    }
}

impl From<Row<'_>> for StopTime {
    fn from(row: Row) -> Self {
        Self {
            trip_id: row.get("trip_id").to_owned(),
            stop_id: row.get("stop_id").to_owned(),
            stop_sequence: row.get("stop_sequence").to_owned(),
            arrival_time: row.get("arrival_time").to_owned(),
            departure_time: row.get("departure_time").to_owned(),
        }
    }
}

/// A line of stops.txt
///
/// The coordinates stay strings until a location is actually needed
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Stop {
    #[serde(rename = "stop_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: String,
    #[serde(rename = "lon")]
    pub longitude: String,
}

impl Id for Stop {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<Row<'_>> for Stop {
    fn from(row: Row) -> Self {
        Self {
            id: row.get("stop_id").to_owned(),
            name: row.get("stop_name").to_owned(),
            latitude: row.get("stop_lat").to_owned(),
            longitude: row.get("stop_lon").to_owned(),
        }
    }
}

impl Stop {
    /// `(latitude, longitude)`, None if either is missing or not a finite number
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat: f64 = self.latitude.trim().parse().ok()?;
        let lon: f64 = self.longitude.trim().parse().ok()?;
        if lat.is_finite() && lon.is_finite() {
            Some((lat, lon))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_table;

    #[test]
    fn route_defaults_to_empty_fields() {
        let table = parse_table("routes.txt", b"route_id,route_short_name\nR1,25\n").unwrap();
        let route = Route::from(table.get(0).unwrap());
        assert_eq!("R1", route.id);
        assert_eq!("25", route.short_name);
        assert_eq!("", route.long_name);
        assert_eq!("", route.route_color);
        assert_eq!("25", route.to_string());
    }

    #[test]
    fn numeric_routes_first() {
        let route = |s: &str| Route {
            short_name: s.to_owned(),
            ..Default::default()
        };
        let mut routes = vec![route("N1"), route("25"), route("C2"), route("4"), route("")];
        routes.sort_by(Route::display_order);
        let names: Vec<&str> = routes.iter().map(|r| r.short_name.as_str()).collect();
        assert_eq!(vec!["4", "25", "", "C2", "N1"], names);
    }

    #[test]
    fn stop_coordinates() {
        let table = parse_table(
            "stops.txt",
            b"stop_id,stop_name,stop_lat,stop_lon\nA,Plaza,39.4699,-0.3763\nB,Nowhere,,\n",
        )
        .unwrap();
        let a = Stop::from(table.get(0).unwrap());
        assert_eq!(Some((39.4699, -0.3763)), a.coordinates());
        let b = Stop::from(table.get(1).unwrap());
        assert_eq!(None, b.coordinates());
    }

    #[test]
    fn unparseable_sequence_is_zero() {
        let st = StopTime {
            stop_sequence: "x".to_owned(),
            ..Default::default()
        };
        assert_eq!(0, st.sequence());
    }
}

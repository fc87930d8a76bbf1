//! Route map builder: person/route documents become grouped location
//! markers and per-person polyline segments for the tile-map widget.
//!
//! Every render pass starts from scratch, so switching the person filter
//! simply rebuilds the full primitive set.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::RouteEntry;

const MARKER_COLOR: &str = "#497f7f";
const MARKER_BASE_RADIUS: f64 = 3.0;
const MARKER_RADIUS_PER_PERSON: f64 = 1.5;
const LINE_COLOR: &str = "#4f4849";

/// All persons seen at one location, aggregated across route entries.
#[derive(Debug, Clone)]
pub struct LocationGroup {
    pub location_id: String,
    pub lat: f64,
    pub lng: f64,
    pub location: String,
    persons: Vec<(String, Option<String>)>,
}

impl LocationGroup {
    /// Record a person at this location. Set semantics keyed by name: a
    /// repeat visit updates the stored id but keeps the original position
    /// and does not raise the count.
    fn add_person(&mut self, name: &str, id: Option<&str>) {
        let id = id.filter(|i| !i.is_empty()).map(str::to_string);
        if let Some(slot) = self.persons.iter_mut().find(|(n, _)| n == name) {
            slot.1 = id;
        } else {
            self.persons.push((name.to_string(), id));
        }
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn persons(&self) -> &[(String, Option<String>)] {
        &self.persons
    }
}

/// A circle marker in the widget's option shape.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub weight: u32,
    pub popup: String,
}

/// One dashed polyline segment between two consecutive route stops.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
    pub dash_array: String,
    pub popup: String,
}

/// Bounding box over all plotted coordinates, for the widget's fit-to-bounds.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub south_west: [f64; 2],
    pub north_east: [f64; 2],
    pub padding: [u32; 2],
}

/// The complete primitive set for one render pass.
#[derive(Debug, Clone, Serialize)]
pub struct MapRender {
    pub markers: Vec<Marker>,
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

/// The loaded routes document plus the derived person filter options.
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    entries: Vec<RouteEntry>,
}

impl RouteMap {
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Distinct person names in first-seen order, for the filter dropdown.
    pub fn person_options(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.person.as_str()) {
                seen.push(&entry.person);
            }
        }
        seen
    }

    /// Render markers, polylines, and bounds. A non-empty `person` filter
    /// restricts the entry list by exact name match first.
    pub fn render(&self, person: &str) -> MapRender {
        let filtered: Vec<&RouteEntry> = self
            .entries
            .iter()
            .filter(|e| person.is_empty() || e.person == person)
            .collect();

        let groups = group_locations(&filtered);

        let mut coords: Vec<[f64; 2]> = Vec::new();
        let mut markers = Vec::with_capacity(groups.len());
        for group in &groups {
            coords.push([group.lat, group.lng]);
            markers.push(marker_for(group));
        }

        let mut segments = Vec::new();
        for entry in &filtered {
            for (i, pair) in entry.route.windows(2).enumerate() {
                segments.push(Segment {
                    from: [pair[0].lat, pair[0].lng],
                    to: [pair[1].lat, pair[1].lng],
                    color: LINE_COLOR.to_string(),
                    weight: 2,
                    opacity: 0.5,
                    dash_array: "4,6".to_string(),
                    popup: format!("<b>{}</b><br>Reiseabschnitt {}", entry.person, i + 1),
                });
            }
        }

        MapRender {
            markers,
            segments,
            bounds: bounds_for(&coords),
        }
    }
}

/// Group route points by location id across all filtered entries, in
/// first-seen order. Coordinates and name come from the first point seen.
fn group_locations(entries: &[&RouteEntry]) -> Vec<LocationGroup> {
    let mut groups: Vec<LocationGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        for point in &entry.route {
            let slot = match index.get(&point.location_id) {
                Some(&i) => i,
                None => {
                    index.insert(point.location_id.clone(), groups.len());
                    groups.push(LocationGroup {
                        location_id: point.location_id.clone(),
                        lat: point.lat,
                        lng: point.lng,
                        location: point.location.clone(),
                        persons: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            groups[slot].add_person(&entry.person, entry.person_id.as_deref());
        }
    }
    groups
}

fn marker_for(group: &LocationGroup) -> Marker {
    let count = group.person_count();

    let mut person_list = String::new();
    for (name, id) in group.persons() {
        match id {
            Some(id) => person_list.push_str(&format!(
                r#"👤 <a href="{}" target="_blank">{}</a><br>"#,
                id, name
            )),
            None => person_list.push_str(&format!("👤 {}<br>", name)),
        }
    }

    Marker {
        lat: group.lat,
        lng: group.lng,
        radius: MARKER_BASE_RADIUS + MARKER_RADIUS_PER_PERSON * count as f64,
        color: MARKER_COLOR.to_string(),
        fill_color: MARKER_COLOR.to_string(),
        fill_opacity: 0.8,
        weight: 1,
        popup: format!(
            "<b><a href=\"{}\" target=\"_blank\">{}</a></b><br>👥 Personen: {}<br>{}",
            group.location_id, group.location, count, person_list
        ),
    }
}

/// Min/max box over the finite plotted coordinates; NaN entries are skipped
/// so a record with missing coordinates cannot poison the fit.
fn bounds_for(coords: &[[f64; 2]]) -> Option<Bounds> {
    let mut bounds: Option<([f64; 2], [f64; 2])> = None;
    for &[lat, lng] in coords {
        if lat.is_nan() || lng.is_nan() {
            continue;
        }
        bounds = Some(match bounds {
            None => ([lat, lng], [lat, lng]),
            Some((sw, ne)) => (
                [sw[0].min(lat), sw[1].min(lng)],
                [ne[0].max(lat), ne[1].max(lng)],
            ),
        });
    }
    bounds.map(|(south_west, north_east)| Bounds {
        south_west,
        north_east,
        padding: [30, 30],
    })
}

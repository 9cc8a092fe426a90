//! Typed view over a carrier "tisys" tour document.
//!
//! Only the structural shape is checked here. Leaf values are carried as text
//! exactly as parsed, without trimming, coercion or date reformatting.

use std::fmt;

use roxmltree::{Document, Node};

use crate::error::{MapError, StructureError};

const ROOT: &str = "tisys";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationKind {
    Loading,
    Unloading,
}

impl StationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationKind::Loading => "loading",
            StationKind::Unloading => "unloading",
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One loading or unloading point. Absent leaves are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Station {
    /// Raw `type` attribute; anything other than loading/unloading is kept but never matched.
    pub station_type: Option<String>,
    pub company_name: String,
    pub from_date: String,
    pub until_date: String,
    pub from_time: String,
    pub until_time: String,
    pub address: String,
    pub zip: String,
    pub city: String,
    pub country_id: String,
}

impl Station {
    pub fn is(&self, kind: StationKind) -> bool {
        self.station_type.as_deref() == Some(kind.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceShipment {
    pub tour_id: String,
    pub weight: String,
    /// Stations in document order.
    pub stations: Vec<Station>,
}

impl SourceShipment {
    /// Linear scan, first match wins. Duplicates of the same type are not
    /// rejected: later ones are silently ignored.
    pub fn station(&self, kind: StationKind) -> Result<&Station, StructureError> {
        self.stations
            .iter()
            .find(|s| s.is(kind))
            .ok_or(StructureError::MissingStation(kind))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTour {
    /// Raw text; resolved against the customer table by the mapper.
    pub company_id: Option<String>,
    pub shipment: SourceShipment,
}

/// Parses `tisys > tour > shipments > shipment > station*`, taking the first
/// element wherever the source allows repetition.
pub fn parse_tour(xml: &str) -> Result<SourceTour, MapError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != ROOT {
        return Err(StructureError::UnexpectedRoot {
            expected: ROOT,
            found: root.tag_name().name().to_string(),
        }
        .into());
    }

    let tour = child(root, ROOT, "tour")?;
    let shipments = child(tour, "tour", "shipments")?;
    let shipment = child(shipments, "shipments", "shipment")?;

    let stations = shipment
        .children()
        .filter(|n| is_element(n, "station"))
        .map(|n| Station {
            station_type: n.attribute("type").map(str::to_string),
            company_name: leaf(n, "company_name"),
            from_date: leaf(n, "from_date"),
            until_date: leaf(n, "until_date"),
            from_time: leaf(n, "from_time"),
            until_time: leaf(n, "until_time"),
            address: leaf(n, "address"),
            zip: leaf(n, "zip"),
            city: leaf(n, "city"),
            country_id: leaf(n, "country_id"),
        })
        .collect();

    Ok(SourceTour {
        company_id: find_child(tour, "company_id").map(text_of),
        shipment: SourceShipment {
            tour_id: leaf(shipment, "tour_id"),
            weight: leaf(shipment, "weight"),
            stations,
        },
    })
}

fn is_element(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| is_element(c, name))
}

fn child<'a, 'input>(
    node: Node<'a, 'input>,
    parent: &'static str,
    element: &'static str,
) -> Result<Node<'a, 'input>, StructureError> {
    find_child(node, element).ok_or(StructureError::MissingElement { parent, element })
}

/// All text segments of the element joined, so comments or processing
/// instructions inside a leaf do not cut the value short.
fn text_of(node: Node) -> String {
    node.children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect()
}

fn leaf(node: Node, name: &str) -> String {
    find_child(node, name).map(text_of).unwrap_or_default()
}

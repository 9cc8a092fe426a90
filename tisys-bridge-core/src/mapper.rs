//! # Document mapper: tisys tour → transportbooking import
//!
//! Turns one carrier tour document into one import document for the planning
//! system. This is the only part of the pipeline that knows either schema.
//!
//! ## Mapping
//! - A fresh UUID v4 is generated per document and written to the booking's
//!   `edireference`, the booking's `reference` and the shipment's `edireference`.
//! - `customer_id` comes from the [`CustomerTable`], keyed by the tour's
//!   `company_id`; unknown ids map to `UNKNOWN`.
//! - `pickupaddress` is built from the first `loading` station and
//!   `deliveryaddress` from the first `unloading` station. Both `address_id`
//!   and `name` carry the station's `company_name`.
//! - Dates, times and weights pass through as text.
//!
//! Every `matchmode` attribute is a fixed per-field code and never depends on input.

use tracing::debug;
use uuid::Uuid;

use crate::error::{MapError, StructureError};
use crate::lookup::CustomerTable;
use crate::source::{parse_tour, SourceTour, Station, StationKind};
use crate::target::{render, Element};

/// Fixed control values of every import.
pub const EDIPROVIDER_ID: u32 = 20;
pub const IMPORT_COMPANY_ID: u32 = 1;
pub const PLANGROUP_ID: u32 = 1;

// matchmode codes per field
const MATCH_CONTROL: u8 = 0;
const MATCH_CUSTOMER: u8 = 1;
const MATCH_PLACE: u8 = 4;
const MATCH_ADDRESS: u8 = 5;

#[derive(Debug, Clone, Default)]
pub struct DocumentMapper {
    customers: CustomerTable,
}

impl DocumentMapper {
    pub fn new(customers: CustomerTable) -> Self {
        Self { customers }
    }

    /// Parses `xml`, maps it with a freshly generated reference and renders the result.
    pub fn map_str(&self, xml: &str) -> Result<String, MapError> {
        let tour = parse_tour(xml)?;
        self.map_tour(&tour)
    }

    pub fn map_tour(&self, tour: &SourceTour) -> Result<String, MapError> {
        let reference = new_reference();
        let document = self.build(tour, &reference)?;
        debug!(reference = %reference, tour_id = %tour.shipment.tour_id, "Mapped tour to transportbooking");
        render(&document)
    }

    /// Builds the import tree for `tour` using `reference` for all three reference fields.
    pub fn build(&self, tour: &SourceTour, reference: &str) -> Result<Element, StructureError> {
        let shipment = &tour.shipment;
        let loading = shipment.station(StationKind::Loading)?;
        let unloading = shipment.station(StationKind::Unloading)?;
        let customer = self.customers.resolve(tour.company_id.as_deref());

        let booking_shipment = Element::group(
            "shipment",
            vec![
                Element::text("edireference", reference),
                Element::text("reference", shipment.tour_id.as_str()),
                Element::matched("plangroup_id", MATCH_CONTROL, PLANGROUP_ID.to_string()),
                address("pickupaddress", loading),
                address("deliveryaddress", unloading),
                Element::group(
                    "cargo",
                    vec![Element::text("weight", shipment.weight.as_str())],
                ),
            ],
        );

        let booking = Element::group(
            "transportbooking",
            vec![
                Element::text("edireference", reference),
                Element::text("reference", reference),
                Element::matched("customer_id", MATCH_CUSTOMER, customer),
                Element::group("shipments", vec![booking_shipment]),
            ],
        );

        Ok(Element::group(
            "import",
            vec![
                Element::matched("ediprovider_id", MATCH_CONTROL, EDIPROVIDER_ID.to_string()),
                Element::matched("company_id", MATCH_CONTROL, IMPORT_COMPANY_ID.to_string()),
                Element::group("transportbookings", vec![booking]),
            ],
        ))
    }
}

/// Generates the per-document reference shared by the booking and its shipment.
pub fn new_reference() -> String {
    Uuid::new_v4().to_string()
}

fn address(name: &'static str, station: &Station) -> Element {
    Element::group(
        name,
        vec![
            Element::matched("address_id", MATCH_ADDRESS, station.company_name.as_str()),
            Element::text("name", station.company_name.as_str()),
            Element::text("date", station.from_date.as_str()),
            Element::text("datetill", station.until_date.as_str()),
            Element::text("time", station.from_time.as_str()),
            Element::text("timetill", station.until_time.as_str()),
            Element::text("address1", station.address.as_str()),
            Element::text("zipcode", station.zip.as_str()),
            Element::matched("city_id", MATCH_PLACE, station.city.as_str()),
            Element::matched("country_id", MATCH_PLACE, station.country_id.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceShipment;

    fn station(kind: &str, company: &str) -> Station {
        Station {
            station_type: Some(kind.to_string()),
            company_name: company.to_string(),
            ..Station::default()
        }
    }

    #[test]
    fn build_uses_given_reference_everywhere() {
        let tour = SourceTour {
            company_id: Some("222387".into()),
            shipment: SourceShipment {
                tour_id: "T9".into(),
                weight: "10".into(),
                stations: vec![station("loading", "A"), station("unloading", "B")],
            },
        };
        let doc = DocumentMapper::default().build(&tour, "ref-1").unwrap();
        let booking = ["transportbookings", "transportbooking"];
        let get = |path: &[&str]| {
            let full: Vec<&str> = booking.iter().chain(path).copied().collect();
            doc.find(&full).and_then(Element::value).map(str::to_string)
        };
        assert_eq!(get(&["edireference"]).as_deref(), Some("ref-1"));
        assert_eq!(get(&["reference"]).as_deref(), Some("ref-1"));
        assert_eq!(
            get(&["shipments", "shipment", "edireference"]).as_deref(),
            Some("ref-1")
        );
        assert_eq!(get(&["customer_id"]).as_deref(), Some("KR"));
    }

    #[test]
    fn unknown_station_types_are_ignored() {
        let tour = SourceTour {
            company_id: None,
            shipment: SourceShipment {
                stations: vec![station("Loading", "A"), station("unloading", "B")],
                ..SourceShipment::default()
            },
        };
        let err = DocumentMapper::default().build(&tour, "r").unwrap_err();
        assert_eq!(err, StructureError::MissingStation(StationKind::Loading));
    }

    #[test]
    fn references_are_uuid_v4() {
        let reference = new_reference();
        let parsed = Uuid::parse_str(&reference).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }
}

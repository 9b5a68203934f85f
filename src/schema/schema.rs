use std::fmt;
use serde::{Deserialize, Serialize};
use crate::core::error::{Error, Result};
use crate::core::types::ScalarKind;

/// Number of columns in the collision table
pub const FIELD_COUNT: usize = 29;

/// Closed set of collision fields, in CSV column order.
/// The discriminant is the column position in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[repr(usize)]
pub enum FieldId {
    CrashDate,
    CrashTime,
    Borough,
    ZipCode,
    Latitude,
    Longitude,
    Location,
    OnStreetName,
    CrossStreetName,
    OffStreetName,
    NumberOfPersonsInjured,
    NumberOfPersonsKilled,
    NumberOfPedestriansInjured,
    NumberOfPedestriansKilled,
    NumberOfCyclistInjured,
    NumberOfCyclistKilled,
    NumberOfMotoristInjured,
    NumberOfMotoristKilled,
    ContributingFactorVehicle1,
    ContributingFactorVehicle2,
    ContributingFactorVehicle3,
    ContributingFactorVehicle4,
    ContributingFactorVehicle5,
    CollisionId,
    VehicleTypeCode1,
    VehicleTypeCode2,
    VehicleTypeCode3,
    VehicleTypeCode4,
    VehicleTypeCode5,
}

/// Field definition: external name and declared kind
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    pub id: FieldId,
    pub name: &'static str,
    pub kind: ScalarKind,
}

const fn def(id: FieldId, name: &'static str, kind: ScalarKind) -> FieldDefinition {
    FieldDefinition { id, name, kind }
}

/// Schema table, indexed by `FieldId as usize`
static SCHEMA: [FieldDefinition; FIELD_COUNT] = [
    def(FieldId::CrashDate, "crash_date", ScalarKind::Date),
    def(FieldId::CrashTime, "crash_time", ScalarKind::Time),
    def(FieldId::Borough, "borough", ScalarKind::Text),
    def(FieldId::ZipCode, "zip_code", ScalarKind::Unsigned),
    def(FieldId::Latitude, "latitude", ScalarKind::Numeric),
    def(FieldId::Longitude, "longitude", ScalarKind::Numeric),
    def(FieldId::Location, "location", ScalarKind::Text),
    def(FieldId::OnStreetName, "on_street_name", ScalarKind::Text),
    def(FieldId::CrossStreetName, "cross_street_name", ScalarKind::Text),
    def(FieldId::OffStreetName, "off_street_name", ScalarKind::Text),
    def(FieldId::NumberOfPersonsInjured, "number_of_persons_injured", ScalarKind::Unsigned),
    def(FieldId::NumberOfPersonsKilled, "number_of_persons_killed", ScalarKind::Unsigned),
    def(FieldId::NumberOfPedestriansInjured, "number_of_pedestrians_injured", ScalarKind::Unsigned),
    def(FieldId::NumberOfPedestriansKilled, "number_of_pedestrians_killed", ScalarKind::Unsigned),
    def(FieldId::NumberOfCyclistInjured, "number_of_cyclist_injured", ScalarKind::Unsigned),
    def(FieldId::NumberOfCyclistKilled, "number_of_cyclist_killed", ScalarKind::Unsigned),
    def(FieldId::NumberOfMotoristInjured, "number_of_motorist_injured", ScalarKind::Unsigned),
    def(FieldId::NumberOfMotoristKilled, "number_of_motorist_killed", ScalarKind::Unsigned),
    def(FieldId::ContributingFactorVehicle1, "contributing_factor_vehicle_1", ScalarKind::Text),
    def(FieldId::ContributingFactorVehicle2, "contributing_factor_vehicle_2", ScalarKind::Text),
    def(FieldId::ContributingFactorVehicle3, "contributing_factor_vehicle_3", ScalarKind::Text),
    def(FieldId::ContributingFactorVehicle4, "contributing_factor_vehicle_4", ScalarKind::Text),
    def(FieldId::ContributingFactorVehicle5, "contributing_factor_vehicle_5", ScalarKind::Text),
    def(FieldId::CollisionId, "collision_id", ScalarKind::Unsigned),
    def(FieldId::VehicleTypeCode1, "vehicle_type_code_1", ScalarKind::Text),
    def(FieldId::VehicleTypeCode2, "vehicle_type_code_2", ScalarKind::Text),
    def(FieldId::VehicleTypeCode3, "vehicle_type_code_3", ScalarKind::Text),
    def(FieldId::VehicleTypeCode4, "vehicle_type_code_4", ScalarKind::Text),
    def(FieldId::VehicleTypeCode5, "vehicle_type_code_5", ScalarKind::Text),
];

impl FieldId {
    pub const ALL: [FieldId; FIELD_COUNT] = [
        FieldId::CrashDate,
        FieldId::CrashTime,
        FieldId::Borough,
        FieldId::ZipCode,
        FieldId::Latitude,
        FieldId::Longitude,
        FieldId::Location,
        FieldId::OnStreetName,
        FieldId::CrossStreetName,
        FieldId::OffStreetName,
        FieldId::NumberOfPersonsInjured,
        FieldId::NumberOfPersonsKilled,
        FieldId::NumberOfPedestriansInjured,
        FieldId::NumberOfPedestriansKilled,
        FieldId::NumberOfCyclistInjured,
        FieldId::NumberOfCyclistKilled,
        FieldId::NumberOfMotoristInjured,
        FieldId::NumberOfMotoristKilled,
        FieldId::ContributingFactorVehicle1,
        FieldId::ContributingFactorVehicle2,
        FieldId::ContributingFactorVehicle3,
        FieldId::ContributingFactorVehicle4,
        FieldId::ContributingFactorVehicle5,
        FieldId::CollisionId,
        FieldId::VehicleTypeCode1,
        FieldId::VehicleTypeCode2,
        FieldId::VehicleTypeCode3,
        FieldId::VehicleTypeCode4,
        FieldId::VehicleTypeCode5,
    ];

    /// Resolve an external field name
    pub fn from_name(name: &str) -> Result<FieldId> {
        SCHEMA
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.id)
            .ok_or_else(|| Error::unknown_field(name))
    }

    /// Column position
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn definition(self) -> &'static FieldDefinition {
        &SCHEMA[self.position()]
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn kind(self) -> ScalarKind {
        self.definition().kind
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<FieldId> for String {
    fn from(field: FieldId) -> Self {
        field.name().to_string()
    }
}

impl TryFrom<String> for FieldId {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        FieldId::from_name(&name)
    }
}

/// All field definitions in column order
pub fn fields() -> &'static [FieldDefinition] {
    &SCHEMA
}

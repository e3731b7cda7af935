//! EFEKTA eON29wz mini weather station.
//!
//! Temperature, humidity and pressure sensor with an e-ink display. Besides the
//! standard measurement attributes it carries vendor attributes on the
//! measurement clusters for its built-in thermostat and hygrostat outputs, and
//! on genPowerCfg for the display.

use super::family::{DeviceFamilyDefinition, DeviceIdentity};
use crate::codec::RawValue;
use crate::codec::dictionary::{AttributeEntry, Transform};
use crate::commissioning::{CommissioningPlan, ReportingRule};
use crate::schema::{CapabilitySchema, FieldInfo};
use crate::zcl::{Cluster, DataType};

const POWER: Cluster = Cluster::PowerConfiguration;
const TEMPERATURE: Cluster = Cluster::TemperatureMeasurement;
const HUMIDITY: Cluster = Cluster::RelativeHumidity;
const PRESSURE: Cluster = Cluster::PressureMeasurement;

/// Battery alarm state bits 0-3, 10-13 and 20-23: the minimum-threshold and
/// the three voltage alarms of battery sources 1, 2 and 3.
const BATTERY_LOW_BITS: u32 = 0xF | 0xF << 10 | 0xF << 20;

/// uint8 battery attributes report 0xFF until measured.
const BATTERY_MAX: RawValue = 0xFE;

const ATTRIBUTES: &[AttributeEntry] = &[
    // Standard measurements
    AttributeEntry::new(TEMPERATURE, 0x0000, "temperature", DataType::Int16, Transform::Divide(100)),
    AttributeEntry::new(HUMIDITY, 0x0000, "humidity", DataType::Uint16, Transform::Divide(100))
        .with_valid(0, 10_000),
    AttributeEntry::new(PRESSURE, 0x0000, "pressure", DataType::Int16, Transform::Identity),
    AttributeEntry::new(POWER, 0x0020, "voltage", DataType::Uint8, Transform::Multiply(100))
        .with_valid(0, BATTERY_MAX),
    AttributeEntry::new(POWER, 0x0021, "battery", DataType::Uint8, Transform::Divide(2))
        .with_valid(0, BATTERY_MAX),
    AttributeEntry::new(
        POWER,
        0x003E,
        "battery_low",
        DataType::Bitmap32,
        Transform::AnyBit(BATTERY_LOW_BITS),
    ),
    // Display
    AttributeEntry::new(POWER, 0xF004, "display_time", DataType::Uint8, Transform::Identity),
    AttributeEntry::new(POWER, 0xF005, "view_disp", DataType::Uint8, Transform::Identity),
    // Thermostat
    AttributeEntry::new(TEMPERATURE, 0x0220, "enable_temp", DataType::Boolean, Transform::OnOff),
    AttributeEntry::new(TEMPERATURE, 0x0221, "high_temp", DataType::Int16, Transform::Identity),
    AttributeEntry::new(TEMPERATURE, 0x0222, "low_temp", DataType::Int16, Transform::Identity),
    AttributeEntry::new(TEMPERATURE, 0x0225, "invert_logic_temp", DataType::Boolean, Transform::OnOff),
    // Hygrostat
    AttributeEntry::new(HUMIDITY, 0x0220, "enable_hum", DataType::Boolean, Transform::OnOff),
    AttributeEntry::new(HUMIDITY, 0x0221, "high_hum", DataType::Uint16, Transform::Identity),
    AttributeEntry::new(HUMIDITY, 0x0222, "low_hum", DataType::Uint16, Transform::Identity),
    AttributeEntry::new(HUMIDITY, 0x0225, "invert_logic_hum", DataType::Boolean, Transform::OnOff),
];

const FIELDS: &[FieldInfo] = &[
    FieldInfo::reading("temperature", "°C", "Measured temperature value"),
    FieldInfo::reading("humidity", "%", "Measured relative humidity"),
    FieldInfo::reading("pressure", "hPa", "The measured atmospheric pressure"),
    FieldInfo::reading("battery", "%", "Remaining battery in %"),
    FieldInfo::reading("voltage", "mV", "Voltage of the battery in millivolts"),
    FieldInfo::flag("battery_low", "Indicates if the battery of this device is almost empty"),
    FieldInfo::choice("display_time", &[0, 1], "Display Time On/oFF(save battery)"),
    FieldInfo::choice("view_disp", &[0, 1], "Display View"),
    FieldInfo::switch("enable_temp", "Enable Temperature Control"),
    FieldInfo::switch("invert_logic_temp", "Enable invert logic Temperature Control"),
    FieldInfo::setpoint("high_temp", "C", 0.0, 60.0, "Setting High Temperature Border"),
    FieldInfo::setpoint("low_temp", "C", 0.0, 60.0, "Setting Low Temperature Border"),
    FieldInfo::switch("enable_hum", "Enable Humidity Control"),
    FieldInfo::switch("invert_logic_hum", "Enable invert logic Humidity Control"),
    FieldInfo::setpoint("high_hum", "%", 0.0, 99.0, "Setting High Humidity Border"),
    FieldInfo::setpoint("low_hum", "%", 0.0, 99.0, "Setting Low Humidity Border"),
];

const BINDS: &[Cluster] = &[Cluster::Time, POWER, TEMPERATURE, HUMIDITY, PRESSURE];

// Interval-only rules; the device expects them in exactly this order.
const REPORTING: &[ReportingRule] = &[
    ReportingRule::new(TEMPERATURE, 0x0000, DataType::Int16, 0, 1800, 0),
    ReportingRule::new(HUMIDITY, 0x0000, DataType::Uint16, 0, 1800, 0),
    ReportingRule::new(PRESSURE, 0x0000, DataType::Int16, 0, 1800, 0),
    ReportingRule::new(POWER, 0x0020, DataType::Uint8, 0, 7200, 0),
    ReportingRule::new(POWER, 0x0021, DataType::Uint8, 0, 7200, 0),
    ReportingRule::new(POWER, 0x003E, DataType::Bitmap32, 0, 7200, 0),
];

pub const EON29WZ: DeviceFamilyDefinition = DeviceFamilyDefinition {
    identity: DeviceIdentity {
        zigbee_models: &["EFEKTA_eON29wz"],
        model: "EFEKTA_eON29wz",
        vendor: "Custom devices (DiY)",
        description: "Mini weather station, barometer, forecast, charts, temperature, humidity, light",
    },
    attributes: ATTRIBUTES,
    schema: CapabilitySchema::new(FIELDS),
    plan: CommissioningPlan::new(BINDS, REPORTING),
};

//! Typed view of the dash packet

use serde::Serialize;

use super::{AdapterValidation, RecordAdapter};
use crate::types::{PacketSchema, TelemetryRecord};

// Declares the struct and both adapter phases from one field list so the
// plan order and the struct order cannot drift apart.
macro_rules! dash_packet {
    ($($field:ident: $ty:ty => $name:literal),* $(,)?) => {
        /// Every dash field, with snake_case names.
        ///
        /// One-byte and two-byte unsigned fields use `u8`/`u16`; `TimestampMs`
        /// stays `u64`. Missing values read as the type's default.
        #[derive(Debug, Clone, Default, PartialEq, Serialize)]
        pub struct DashPacket {
            $(
                #[doc = concat!("`", $name, "`")]
                pub $field: $ty,
            )*
        }

        impl RecordAdapter for DashPacket {
            fn validate_schema(schema: &PacketSchema) -> crate::Result<AdapterValidation> {
                let builder = AdapterValidation::builder(schema);
                $(let builder = builder.required::<$ty>($name)?;)*
                Ok(builder.build())
            }

            fn adapt(record: &TelemetryRecord, validation: &AdapterValidation) -> Self {
                let mut slots = 0usize..;
                Self {
                    $(
                        $field: validation
                            .fetch_at::<$ty>(record, slots.next().unwrap_or_default())
                            .unwrap_or_default(),
                    )*
                }
            }
        }

        impl DashPacket {
            /// Canonical field names in struct order.
            pub const FIELD_NAMES: &'static [&'static str] = &[$($name),*];
        }
    };
}

dash_packet! {
    is_race_on: bool => "IsRaceOn",
    timestamp_ms: u64 => "TimestampMs",
    engine_max_rpm: f32 => "EngineMaxRpm",
    engine_idle_rpm: f32 => "EngineIdleRpm",
    current_engine_rpm: f32 => "CurrentEngineRpm",
    acceleration_x: f32 => "AccelerationX",
    acceleration_y: f32 => "AccelerationY",
    acceleration_z: f32 => "AccelerationZ",
    velocity_x: f32 => "VelocityX",
    velocity_y: f32 => "VelocityY",
    velocity_z: f32 => "VelocityZ",
    angular_velocity_x: f32 => "AngularVelocityX",
    angular_velocity_y: f32 => "AngularVelocityY",
    angular_velocity_z: f32 => "AngularVelocityZ",
    yaw: f32 => "Yaw",
    pitch: f32 => "Pitch",
    roll: f32 => "Roll",
    norm_suspension_travel_fl: f32 => "NormSuspensionTravelFl",
    norm_suspension_travel_fr: f32 => "NormSuspensionTravelFr",
    norm_suspension_travel_rl: f32 => "NormSuspensionTravelRl",
    norm_suspension_travel_rr: f32 => "NormSuspensionTravelRr",
    tire_slip_ratio_fl: f32 => "TireSlipRatioFl",
    tire_slip_ratio_fr: f32 => "TireSlipRatioFr",
    tire_slip_ratio_rl: f32 => "TireSlipRatioRl",
    tire_slip_ratio_rr: f32 => "TireSlipRatioRr",
    wheel_rotation_speed_fl: f32 => "WheelRotationSpeedFl",
    wheel_rotation_speed_fr: f32 => "WheelRotationSpeedFr",
    wheel_rotation_speed_rl: f32 => "WheelRotationSpeedRl",
    wheel_rotation_speed_rr: f32 => "WheelRotationSpeedRr",
    wheel_on_rumble_strip_fl: f32 => "WheelOnRumbleStripFl",
    wheel_on_rumble_strip_fr: f32 => "WheelOnRumbleStripFr",
    wheel_on_rumble_strip_rl: f32 => "WheelOnRumbleStripRl",
    wheel_on_rumble_strip_rr: f32 => "WheelOnRumbleStripRr",
    wheel_in_puddle_fl: f32 => "WheelInPuddleFl",
    wheel_in_puddle_fr: f32 => "WheelInPuddleFr",
    wheel_in_puddle_rl: f32 => "WheelInPuddleRl",
    wheel_in_puddle_rr: f32 => "WheelInPuddleRr",
    surface_rumble_fl: f32 => "SurfaceRumbleFl",
    surface_rumble_fr: f32 => "SurfaceRumbleFr",
    surface_rumble_rl: f32 => "SurfaceRumbleRl",
    surface_rumble_rr: f32 => "SurfaceRumbleRr",
    tire_slip_angle_fl: f32 => "TireSlipAngleFl",
    tire_slip_angle_fr: f32 => "TireSlipAngleFr",
    tire_slip_angle_rl: f32 => "TireSlipAngleRl",
    tire_slip_angle_rr: f32 => "TireSlipAngleRr",
    tire_combined_slip_fl: f32 => "TireCombinedSlipFl",
    tire_combined_slip_fr: f32 => "TireCombinedSlipFr",
    tire_combined_slip_rl: f32 => "TireCombinedSlipRl",
    tire_combined_slip_rr: f32 => "TireCombinedSlipRr",
    suspension_travel_meters_fl: f32 => "SuspensionTravelMetersFl",
    suspension_travel_meters_fr: f32 => "SuspensionTravelMetersFr",
    suspension_travel_meters_rl: f32 => "SuspensionTravelMetersRl",
    suspension_travel_meters_rr: f32 => "SuspensionTravelMetersRr",
    car_ordinal: u8 => "CarOrdinal",
    car_class: u8 => "CarClass",
    car_performance_index: u8 => "CarPerformanceIndex",
    drive_train: u8 => "DriveTrain",
    num_cylinders: u8 => "NumCylinders",
    position_x: f32 => "PositionX",
    position_y: f32 => "PositionY",
    position_z: f32 => "PositionZ",
    speed: f32 => "Speed",
    power: f32 => "Power",
    torque: f32 => "Torque",
    tire_temp_fl: f32 => "TireTempFl",
    tire_temp_fr: f32 => "TireTempFr",
    tire_temp_rl: f32 => "TireTempRl",
    tire_temp_rr: f32 => "TireTempRr",
    boost: f32 => "Boost",
    fuel: f32 => "Fuel",
    distance: f32 => "Distance",
    best_lap_time: f32 => "BestLapTime",
    last_lap_time: f32 => "LastLapTime",
    current_lap_time: f32 => "CurrentLapTime",
    current_race_time: f32 => "CurrentRaceTime",
    lap: u16 => "Lap",
    race_position: u8 => "RacePosition",
    accelerator: u8 => "Accelerator",
    brake: u8 => "Brake",
    clutch: u8 => "Clutch",
    handbrake: u8 => "Handbrake",
    gear: u8 => "Gear",
    steer: i32 => "Steer",
    normal_driving_line: u8 => "NormalDrivingLine",
    normal_ai_brake_difference: u8 => "NormalAiBrakeDifference",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DASH_FIELDS, dash_schema, parse_schema};
    use crate::test_utils::sample_dash_record;
    use crate::types::Value;
    use crate::{TelemetryError, decode, encode};
    use std::sync::Arc;

    #[test]
    fn field_names_follow_dash_table() {
        let table: Vec<_> = DASH_FIELDS.iter().map(|field| field.name()).collect();
        assert_eq!(DashPacket::FIELD_NAMES, table.as_slice());
    }

    #[test]
    fn validates_against_dash_schema() {
        let validation = DashPacket::validate_schema(&dash_schema()).unwrap();
        assert_eq!(validation.field_count(), DASH_FIELDS.len());
        assert!(validation.has_required_fields());
        assert_eq!(validation.index_of("CurrentEngineRpm"), Some(4));
    }

    #[test]
    fn adapts_decoded_packet() {
        let schema = dash_schema();
        let bytes = encode(&sample_dash_record()).unwrap();
        let record = decode(&bytes, &schema).unwrap();

        let validation = DashPacket::validate_schema(&schema).unwrap();
        let packet = DashPacket::adapt(&record, &validation);

        assert!(packet.is_race_on);
        assert_eq!(packet.timestamp_ms, 123_456);
        assert_eq!(packet.current_engine_rpm, 4_500.5);
        assert_eq!(packet.lap, 7);
        assert_eq!(packet.gear, 3);
        assert_eq!(packet.steer, 200);
        assert_eq!(packet.car_class, 4);
    }

    #[test]
    fn zeroed_record_adapts_to_default() {
        let schema = dash_schema();
        let validation = DashPacket::validate_schema(&schema).unwrap();
        let packet = DashPacket::adapt(&TelemetryRecord::zeroed(schema), &validation);
        assert_eq!(packet, DashPacket::default());
    }

    #[test]
    fn rejects_schema_missing_fields() {
        let schema = parse_schema(
            "packet_size: 4\nfields:\n  - { name: CurrentEngineRpm, offset: 0, type: float32 }\n",
        )
        .unwrap();

        let result = DashPacket::validate_schema(&schema);
        assert!(matches!(result, Err(TelemetryError::FieldNotFound { field }) if field == "IsRaceOn"));
    }

    // Dash schema with one field redeclared as `length` bytes of `target`.
    fn redeclared_dash_schema(name: &str, length: usize, target: &str) -> PacketSchema {
        let yaml = DASH_FIELDS
            .iter()
            .map(|field| {
                let (length, target) = if field.name() == name {
                    (length, target)
                } else {
                    (field.length, field.target_type.as_str())
                };
                format!(
                    "  - {{ name: {}, offset: {}, length: {}, type: {} }}\n",
                    field.name(),
                    field.offset,
                    length,
                    target
                )
            })
            .collect::<String>();
        parse_schema(&format!("packet_size: 324\nfields:\n{yaml}")).unwrap()
    }

    #[test]
    fn rejects_retyped_field() {
        let schema = redeclared_dash_schema("CurrentEngineRpm", 4, "uint");

        let result = DashPacket::validate_schema(&schema);
        assert!(matches!(result, Err(TelemetryError::TypeConversion { .. })));
    }

    #[test]
    fn rejects_widened_narrow_field() {
        // Gear read from a 4-byte float could be 300, which a u8 cannot hold.
        let schema = redeclared_dash_schema("Gear", 4, "uint");

        let result = DashPacket::validate_schema(&schema);
        assert!(
            matches!(&result, Err(TelemetryError::TypeConversion { details }) if details.contains("'Gear'")),
            "{result:?}"
        );

        let schema = Arc::new(schema);
        let offset = schema.get_field("Gear").unwrap().offset;
        let mut bytes = vec![0u8; 324];
        bytes[offset..offset + 4].copy_from_slice(&300.0f32.to_le_bytes());
        assert_eq!(decode(&bytes, &schema).unwrap().uint("Gear"), Some(300));
    }

    #[test]
    fn accepts_narrower_declaration() {
        let schema = redeclared_dash_schema("Lap", 1, "uint");
        assert!(DashPacket::validate_schema(&schema).is_ok());
    }

    #[test]
    fn serializes_with_snake_case_names() {
        let mut record = TelemetryRecord::zeroed(dash_schema());
        record.set("CurrentEngineRpm", Value::Float32(900.0)).unwrap();
        let validation = DashPacket::validate_schema(record.schema()).unwrap();
        let packet = DashPacket::adapt(&record, &validation);

        let yaml = serde_yaml_ng::to_string(&packet).unwrap();
        assert!(yaml.contains("current_engine_rpm: 900.0"));
        assert!(yaml.contains("is_race_on: false"));
    }
}

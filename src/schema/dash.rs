//! Forza Horizon "dash" packet layout
//!
//! Offsets are bit-exact with the game's data-out format and must not change.
//! Bytes 232-243 and 323 are unused padding.

use crate::types::{FieldDescriptor, TargetType};

use TargetType::{Bool, Float32, Int, UInt};

/// Size of a dash packet on the wire.
pub const DASH_PACKET_SIZE: usize = 324;

/// Receive buffer size used for dash datagrams.
pub const MAX_DATAGRAM_SIZE: usize = 1500;

const fn field(name: &'static str, offset: usize, length: usize, target: TargetType) -> FieldDescriptor {
    FieldDescriptor::new(name, offset, length, target)
}

/// Canonical dash layout in wire order.
pub const DASH_FIELDS: &[FieldDescriptor] = &[
    field("IsRaceOn", 0, 4, Bool),
    field("TimestampMs", 4, 4, UInt),
    field("EngineMaxRpm", 8, 4, Float32),
    field("EngineIdleRpm", 12, 4, Float32),
    field("CurrentEngineRpm", 16, 4, Float32),
    // Car-local space, X right, Y up, Z forward
    field("AccelerationX", 20, 4, Float32),
    field("AccelerationY", 24, 4, Float32),
    field("AccelerationZ", 28, 4, Float32),
    field("VelocityX", 32, 4, Float32),
    field("VelocityY", 36, 4, Float32),
    field("VelocityZ", 40, 4, Float32),
    field("AngularVelocityX", 44, 4, Float32),
    field("AngularVelocityY", 48, 4, Float32),
    field("AngularVelocityZ", 52, 4, Float32),
    field("Yaw", 56, 4, Float32),
    field("Pitch", 60, 4, Float32),
    field("Roll", 64, 4, Float32),
    // 0.0 = max stretch, 1.0 = max compression
    field("NormSuspensionTravelFl", 68, 4, Float32),
    field("NormSuspensionTravelFr", 72, 4, Float32),
    field("NormSuspensionTravelRl", 76, 4, Float32),
    field("NormSuspensionTravelRr", 80, 4, Float32),
    field("TireSlipRatioFl", 84, 4, Float32),
    field("TireSlipRatioFr", 88, 4, Float32),
    field("TireSlipRatioRl", 92, 4, Float32),
    field("TireSlipRatioRr", 96, 4, Float32),
    field("WheelRotationSpeedFl", 100, 4, Float32),
    field("WheelRotationSpeedFr", 104, 4, Float32),
    field("WheelRotationSpeedRl", 108, 4, Float32),
    field("WheelRotationSpeedRr", 112, 4, Float32),
    field("WheelOnRumbleStripFl", 116, 4, Float32),
    field("WheelOnRumbleStripFr", 120, 4, Float32),
    field("WheelOnRumbleStripRl", 124, 4, Float32),
    field("WheelOnRumbleStripRr", 128, 4, Float32),
    field("WheelInPuddleFl", 132, 4, Float32),
    field("WheelInPuddleFr", 136, 4, Float32),
    field("WheelInPuddleRl", 140, 4, Float32),
    field("WheelInPuddleRr", 144, 4, Float32),
    field("SurfaceRumbleFl", 148, 4, Float32),
    field("SurfaceRumbleFr", 152, 4, Float32),
    field("SurfaceRumbleRl", 156, 4, Float32),
    field("SurfaceRumbleRr", 160, 4, Float32),
    field("TireSlipAngleFl", 164, 4, Float32),
    field("TireSlipAngleFr", 168, 4, Float32),
    field("TireSlipAngleRl", 172, 4, Float32),
    field("TireSlipAngleRr", 176, 4, Float32),
    field("TireCombinedSlipFl", 180, 4, Float32),
    field("TireCombinedSlipFr", 184, 4, Float32),
    field("TireCombinedSlipRl", 188, 4, Float32),
    field("TireCombinedSlipRr", 192, 4, Float32),
    field("SuspensionTravelMetersFl", 196, 4, Float32),
    field("SuspensionTravelMetersFr", 200, 4, Float32),
    field("SuspensionTravelMetersRl", 204, 4, Float32),
    field("SuspensionTravelMetersRr", 208, 4, Float32),
    // Only the low byte of each of these words is read.
    field("CarOrdinal", 212, 1, UInt),
    field("CarClass", 216, 1, UInt),
    field("CarPerformanceIndex", 220, 1, UInt),
    field("DriveTrain", 224, 1, UInt),
    field("NumCylinders", 228, 1, UInt),
    field("PositionX", 244, 4, Float32),
    field("PositionY", 248, 4, Float32),
    field("PositionZ", 252, 4, Float32),
    field("Speed", 256, 4, Float32),
    field("Power", 260, 4, Float32),
    field("Torque", 264, 4, Float32),
    field("TireTempFl", 268, 4, Float32),
    field("TireTempFr", 272, 4, Float32),
    field("TireTempRl", 276, 4, Float32),
    field("TireTempRr", 280, 4, Float32),
    field("Boost", 284, 4, Float32),
    field("Fuel", 288, 4, Float32),
    field("Distance", 292, 4, Float32),
    field("BestLapTime", 296, 4, Float32),
    field("LastLapTime", 300, 4, Float32),
    field("CurrentLapTime", 304, 4, Float32),
    field("CurrentRaceTime", 308, 4, Float32),
    field("Lap", 312, 2, UInt),
    field("RacePosition", 314, 1, UInt),
    field("Accelerator", 315, 1, UInt),
    field("Brake", 316, 1, UInt),
    field("Clutch", 317, 1, UInt),
    field("Handbrake", 318, 1, UInt),
    field("Gear", 319, 1, UInt),
    // TODO: confirm whether the game sends steer as a signed byte; it is read as 0-255 for now.
    field("Steer", 320, 1, Int),
    field("NormalDrivingLine", 321, 1, UInt),
    field("NormalAiBrakeDifference", 322, 1, UInt),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn dash_table_has_expected_shape() {
        assert_eq!(DASH_FIELDS.len(), 85);
        assert_eq!(DASH_FIELDS.first().map(|f| f.offset), Some(0));
        assert_eq!(DASH_FIELDS.iter().map(FieldDescriptor::end).max(), Some(323));
        assert!(DASH_FIELDS.iter().all(|f| f.end() <= DASH_PACKET_SIZE));
    }

    #[test]
    fn dash_table_is_in_wire_order_without_overlap() {
        for pair in DASH_FIELDS.windows(2) {
            assert!(pair[0].end() <= pair[1].offset, "{} overlaps {}", pair[0].name(), pair[1].name());
        }
    }

    #[test]
    fn dash_table_names_are_unique() {
        let names: HashSet<_> = DASH_FIELDS.iter().map(FieldDescriptor::name).collect();
        assert_eq!(names.len(), DASH_FIELDS.len());
    }

    #[test]
    fn narrow_fields_match_wire_format() {
        let narrow: Vec<_> = DASH_FIELDS
            .iter()
            .filter(|f| f.length != 4)
            .map(|f| (f.name(), f.offset, f.length, f.target_type))
            .collect();

        assert!(narrow.contains(&("CarClass", 216, 1, TargetType::UInt)));
        assert!(narrow.contains(&("Lap", 312, 2, TargetType::UInt)));
        assert!(narrow.contains(&("Gear", 319, 1, TargetType::UInt)));
        assert!(narrow.contains(&("Steer", 320, 1, TargetType::Int)));
        assert_eq!(narrow.len(), 15);
    }
}

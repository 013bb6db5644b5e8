/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Camera: 20 floats]
/// [Bodies: max_body_instances × 24 floats]
/// [Trails: max_trail_vertices × 4 floats]
/// [Events: max_events × 4 floats]
/// [Lights: max_lights × 8 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.
/// Static point/guide vertices and texture pixels are read once through
/// their own accessors and are not part of this buffer.

use crate::api::config::EngineConfig;
use crate::api::types::HostEvent;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::{BodyInstance, TrailVertex};
use crate::systems::lighting::PointLight;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_BODIES: usize = 2;
pub const HEADER_BODY_COUNT: usize = 3;
pub const HEADER_ADDITIVE_SPLIT: usize = 4;
pub const HEADER_MAX_TRAIL_VERTICES: usize = 5;
pub const HEADER_TRAIL_VERTEX_COUNT: usize = 6;
pub const HEADER_MAX_EVENTS: usize = 7;
pub const HEADER_EVENT_COUNT: usize = 8;
pub const HEADER_MAX_LIGHTS: usize = 9;
pub const HEADER_LIGHT_COUNT: usize = 10;
pub const HEADER_PROTOCOL_VERSION: usize = 11;
pub const HEADER_LOOP_STATE: usize = 12;
pub const HEADER_POPUP_OPEN: usize = 13;
pub const HEADER_AMBIENT_INTENSITY: usize = 14;
pub const HEADER_RELEASED_COUNT: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per camera uniform: view-projection matrix + eye (fixed wire format).
pub const CAMERA_FLOATS: usize = CameraUniform::FLOATS;

/// Floats per body instance (fixed wire format).
pub const BODY_INSTANCE_FLOATS: usize = BodyInstance::FLOATS;

/// Floats per trail vertex: x, y, z, alpha.
pub const TRAIL_VERTEX_FLOATS: usize = TrailVertex::FLOATS;

/// Floats per host event: kind, a, b, c.
pub const EVENT_FLOATS: usize = HostEvent::FLOATS;

/// Floats per point light: x, y, z, r, g, b, intensity, range.
pub const LIGHT_FLOATS: usize = PointLight::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_body_instances: usize,
    pub max_trail_vertices: usize,
    pub max_events: usize,
    pub max_lights: usize,

    /// Size of each section in floats.
    pub body_data_floats: usize,
    pub trail_data_floats: usize,
    pub event_data_floats: usize,
    pub light_data_floats: usize,

    /// Offset (in floats) where each section begins.
    pub camera_offset: usize,
    pub body_data_offset: usize,
    pub trail_data_offset: usize,
    pub event_data_offset: usize,
    pub light_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(
        max_body_instances: usize,
        max_trail_vertices: usize,
        max_events: usize,
        max_lights: usize,
    ) -> Self {
        let body_data_floats = max_body_instances * BODY_INSTANCE_FLOATS;
        let trail_data_floats = max_trail_vertices * TRAIL_VERTEX_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;
        let light_data_floats = max_lights * LIGHT_FLOATS;

        let camera_offset = HEADER_FLOATS;
        let body_data_offset = camera_offset + CAMERA_FLOATS;
        let trail_data_offset = body_data_offset + body_data_floats;
        let event_data_offset = trail_data_offset + trail_data_floats;
        let light_data_offset = event_data_offset + event_data_floats;

        let buffer_total_floats = light_data_offset + light_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_body_instances,
            max_trail_vertices,
            max_events,
            max_lights,
            body_data_floats,
            trail_data_floats,
            event_data_floats,
            light_data_floats,
            camera_offset,
            body_data_offset,
            trail_data_offset,
            event_data_offset,
            light_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from an EngineConfig.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.max_body_instances,
            config.max_trail_vertices,
            config.max_events,
            config.max_lights,
        )
    }

    /// A zeroed header with the capacities and protocol version filled in.
    pub fn initial_header(&self) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_MAX_BODIES] = self.max_body_instances as f32;
        header[HEADER_MAX_TRAIL_VERTICES] = self.max_trail_vertices as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_MAX_LIGHTS] = self.max_lights as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_MAX_BODIES: usize = 256;
    const DEFAULT_MAX_TRAILS: usize = 64;
    const DEFAULT_MAX_EVENTS: usize = 64;
    const DEFAULT_MAX_LIGHTS: usize = 4;

    #[test]
    fn wire_sizes_match_structs() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), CAMERA_FLOATS * 4);
        assert_eq!(std::mem::size_of::<BodyInstance>(), BODY_INSTANCE_FLOATS * 4);
        assert_eq!(std::mem::size_of::<TrailVertex>(), TRAIL_VERTEX_FLOATS * 4);
        assert_eq!(std::mem::size_of::<HostEvent>(), EVENT_FLOATS * 4);
        assert_eq!(std::mem::size_of::<PointLight>(), LIGHT_FLOATS * 4);
    }

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&EngineConfig::default());

        assert_eq!(layout.max_body_instances, DEFAULT_MAX_BODIES);
        assert_eq!(layout.max_trail_vertices, DEFAULT_MAX_TRAILS);
        assert_eq!(layout.max_events, DEFAULT_MAX_EVENTS);
        assert_eq!(layout.max_lights, DEFAULT_MAX_LIGHTS);

        assert_eq!(layout.body_data_floats, DEFAULT_MAX_BODIES * 24);
        assert_eq!(layout.trail_data_floats, DEFAULT_MAX_TRAILS * 4);
        assert_eq!(layout.event_data_floats, DEFAULT_MAX_EVENTS * 4);
        assert_eq!(layout.light_data_floats, DEFAULT_MAX_LIGHTS * 8);

        let expected_total = HEADER_FLOATS
            + 20
            + DEFAULT_MAX_BODIES * 24
            + DEFAULT_MAX_TRAILS * 4
            + DEFAULT_MAX_EVENTS * 4
            + DEFAULT_MAX_LIGHTS * 8;
        assert_eq!(layout.buffer_total_floats, expected_total);
        assert_eq!(layout.buffer_total_bytes, expected_total * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 200, 10, 2);

        assert_eq!(layout.camera_offset, HEADER_FLOATS);
        assert_eq!(layout.body_data_offset, layout.camera_offset + CAMERA_FLOATS);
        assert_eq!(layout.trail_data_offset, layout.body_data_offset + layout.body_data_floats);
        assert_eq!(layout.event_data_offset, layout.trail_data_offset + layout.trail_data_floats);
        assert_eq!(layout.light_data_offset, layout.event_data_offset + layout.event_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.light_data_offset + layout.light_data_floats);
    }

    #[test]
    fn initial_header_carries_capacities() {
        let layout = ProtocolLayout::new(8, 16, 4, 2);
        let header = layout.initial_header();
        assert_eq!(header[HEADER_MAX_BODIES], 8.0);
        assert_eq!(header[HEADER_MAX_TRAIL_VERTICES], 16.0);
        assert_eq!(header[HEADER_MAX_EVENTS], 4.0);
        assert_eq!(header[HEADER_MAX_LIGHTS], 2.0);
        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(header[HEADER_BODY_COUNT], 0.0);
    }
}

//! Pointer handling: click-to-pick, drag-to-orbit, wheel-to-dolly, resize.

use glam::Vec2;

use crate::core::math::SurfaceRect;
use crate::core::scene::Scene;
use crate::input::queue::InputEvent;
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::controls::OrbitControls;
use crate::systems::picking::{pick, PickHit};

/// What an input event asks the rest of the engine to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionResult {
    None,
    /// A body was clicked at `client` coordinates.
    Picked { hit: PickHit, client: Vec2 },
    CameraRotated,
    Dollied,
    Resized,
    CloseRequested,
}

pub struct InteractionSystem {
    surface: SurfaceRect,
    dragging: bool,
    last_pointer: Vec2,
}

impl InteractionSystem {
    pub fn new(surface: SurfaceRect) -> Self {
        Self {
            surface,
            dragging: false,
            last_pointer: Vec2::ZERO,
        }
    }

    pub fn surface(&self) -> SurfaceRect {
        self.surface
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        camera: &mut PerspectiveCamera,
        controls: &mut OrbitControls,
        scene: &Scene,
    ) -> InteractionResult {
        match *event {
            InputEvent::PointerDown { x, y } => {
                let client = Vec2::new(x, y);
                self.dragging = true;
                self.last_pointer = client;
                let ndc = self.surface.to_ndc(client);
                let ray = camera.ray_from_ndc(ndc);
                match pick(&ray, scene.iter()) {
                    Some(hit) => InteractionResult::Picked { hit, client },
                    None => InteractionResult::None,
                }
            }
            InputEvent::PointerMove { x, y } => {
                let pos = Vec2::new(x, y);
                if !self.dragging {
                    return InteractionResult::None;
                }
                let delta = pos - self.last_pointer;
                self.last_pointer = pos;
                controls.rotate(delta, self.surface.height);
                InteractionResult::CameraRotated
            }
            InputEvent::PointerUp { .. } => {
                self.dragging = false;
                InteractionResult::None
            }
            InputEvent::Wheel { delta } => {
                controls.dolly(delta);
                InteractionResult::Dollied
            }
            InputEvent::Resize { left, top, width, height } => {
                self.surface = SurfaceRect::new(left, top, width, height);
                camera.set_aspect(self.surface.aspect());
                InteractionResult::Resized
            }
            InputEvent::KeyDown { key_code } if key_code == InputEvent::KEY_ESCAPE => {
                InteractionResult::CloseRequested
            }
            InputEvent::KeyDown { .. } => InteractionResult::None,
            InputEvent::ClosePopup => InteractionResult::CloseRequested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::{CameraConfig, ControlsConfig};
    use crate::api::types::{BodyId, ResourceHandle};
    use crate::components::body::{BodyRole, CelestialBody};
    use crate::components::mesh::{BodyVisual, Material, SphereMesh};

    fn setup() -> (InteractionSystem, PerspectiveCamera, OrbitControls, Scene) {
        let surface = SurfaceRect::new(0.0, 0.0, 800.0, 600.0);
        let mut camera = PerspectiveCamera::from_config(&CameraConfig::default(), surface.aspect());
        let mut controls = OrbitControls::new(ControlsConfig::default(), &camera);
        controls.update(&mut camera);
        let mut scene = Scene::new();
        let id = scene.next_body_id();
        scene.spawn(CelestialBody::new(
            id,
            "sun",
            BodyVisual::Primitive(SphereMesh::new(32.0, Material::default())),
            BodyRole::PrimaryStar,
            ResourceHandle(1),
        ));
        (InteractionSystem::new(surface), camera, controls, scene)
    }

    #[test]
    fn click_on_center_picks_sun() {
        let (mut sys, mut cam, mut ctl, scene) = setup();
        let result = sys.handle(&InputEvent::PointerDown { x: 400.0, y: 300.0 }, &mut cam, &mut ctl, &scene);
        match result {
            InteractionResult::Picked { hit, client } => {
                assert_eq!(hit.body, BodyId(1));
                assert_eq!(client, Vec2::new(400.0, 300.0));
            }
            other => panic!("expected a pick, got {other:?}"),
        }
    }

    #[test]
    fn click_on_empty_space_is_a_miss() {
        let (mut sys, mut cam, mut ctl, scene) = setup();
        let result = sys.handle(&InputEvent::PointerDown { x: 5.0, y: 5.0 }, &mut cam, &mut ctl, &scene);
        assert_eq!(result, InteractionResult::None);
        assert!(sys.is_dragging());
    }

    #[test]
    fn drag_rotates_only_while_pressed() {
        let (mut sys, mut cam, mut ctl, scene) = setup();
        let idle = sys.handle(&InputEvent::PointerMove { x: 50.0, y: 0.0 }, &mut cam, &mut ctl, &scene);
        assert_eq!(idle, InteractionResult::None);
        sys.handle(&InputEvent::PointerDown { x: 5.0, y: 5.0 }, &mut cam, &mut ctl, &scene);
        let moved = sys.handle(&InputEvent::PointerMove { x: 80.0, y: 5.0 }, &mut cam, &mut ctl, &scene);
        assert_eq!(moved, InteractionResult::CameraRotated);
        assert!(ctl.is_moving());
        sys.handle(&InputEvent::PointerUp { x: 80.0, y: 5.0 }, &mut cam, &mut ctl, &scene);
        assert!(!sys.is_dragging());
    }

    #[test]
    fn resize_updates_surface_and_aspect() {
        let (mut sys, mut cam, mut ctl, scene) = setup();
        let event = InputEvent::Resize { left: 10.0, top: 20.0, width: 1000.0, height: 500.0 };
        assert_eq!(sys.handle(&event, &mut cam, &mut ctl, &scene), InteractionResult::Resized);
        assert_eq!(cam.aspect, 2.0);
        assert_eq!(sys.surface().left, 10.0);
    }

    #[test]
    fn escape_and_close_button_request_close() {
        let (mut sys, mut cam, mut ctl, scene) = setup();
        let esc = InputEvent::KeyDown { key_code: InputEvent::KEY_ESCAPE };
        assert_eq!(sys.handle(&esc, &mut cam, &mut ctl, &scene), InteractionResult::CloseRequested);
        assert_eq!(
            sys.handle(&InputEvent::ClosePopup, &mut cam, &mut ctl, &scene),
            InteractionResult::CloseRequested
        );
        let other = InputEvent::KeyDown { key_code: 65 };
        assert_eq!(sys.handle(&other, &mut cam, &mut ctl, &scene), InteractionResult::None);
    }
}

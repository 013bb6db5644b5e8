use glam::Vec2;
use serde::Serialize;

use crate::api::types::BodyId;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Closed,
    Open,
    /// Close requested; still visible for `remaining` seconds.
    Closing { remaining: f32 },
}

/// Informational popup for the selected body.
///
/// `active_body` is set exactly while the popup is open, including the
/// closing transition. Orbital motion is paused for as long as it is open.
#[derive(Debug, Clone)]
pub struct PopupState {
    phase: Phase,
    active_body: Option<String>,
    body_id: Option<BodyId>,
    anchor: Vec2,
    close_delay: f32,
}

/// Host-facing JSON view.
#[derive(Debug, Serialize)]
struct PopupView<'a> {
    open: bool,
    active_body: Option<&'a str>,
    x: f32,
    y: f32,
}

impl PopupState {
    pub fn new(close_delay: f32) -> Self {
        Self {
            phase: Phase::Closed,
            active_body: None,
            body_id: None,
            anchor: Vec2::ZERO,
            close_delay: close_delay.max(0.0),
        }
    }

    /// Show the popup for `name`, anchored at `anchor`. Cancels a pending close.
    pub fn open(&mut self, id: BodyId, name: &str, anchor: Vec2) {
        self.phase = Phase::Open;
        self.active_body = Some(name.to_string());
        self.body_id = Some(id);
        self.anchor = anchor;
    }

    /// Begin closing. Returns true if the popup closed immediately (zero delay).
    pub fn request_close(&mut self) -> bool {
        match self.phase {
            Phase::Closed | Phase::Closing { .. } => false,
            Phase::Open if self.close_delay <= 0.0 => {
                self.finish_close();
                true
            }
            Phase::Open => {
                self.phase = Phase::Closing { remaining: self.close_delay };
                false
            }
        }
    }

    /// Advance the closing transition. Returns true on the step the popup closes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if let Phase::Closing { remaining } = self.phase {
            let left = remaining - dt;
            if left <= 0.0 {
                self.finish_close();
                return true;
            }
            self.phase = Phase::Closing { remaining: left };
        }
        false
    }

    fn finish_close(&mut self) {
        self.phase = Phase::Closed;
        self.active_body = None;
        self.body_id = None;
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.phase, Phase::Closing { .. })
    }

    /// Orbital motion is held while the popup is open.
    pub fn is_paused(&self) -> bool {
        self.is_open()
    }

    pub fn active_body(&self) -> Option<&str> {
        self.active_body.as_deref()
    }

    pub fn body_id(&self) -> Option<BodyId> {
        self.body_id
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn to_json(&self) -> String {
        let view = PopupView {
            open: self.is_open(),
            active_body: self.active_body(),
            x: self.anchor.x,
            y: self.anchor.y,
        };
        serde_json::to_string(&view).unwrap_or_else(|_| String::from("{\"open\":false}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invariant(p: &PopupState) {
        assert_eq!(p.active_body().is_some(), p.is_open());
    }

    #[test]
    fn open_then_delayed_close() {
        let mut p = PopupState::new(0.2);
        invariant(&p);
        p.open(BodyId(3), "earth", Vec2::new(120.0, 60.0));
        invariant(&p);
        assert!(p.is_paused());
        assert!(!p.request_close());
        invariant(&p);
        assert!(p.is_closing());
        assert!(!p.tick(0.1));
        assert!(p.is_open());
        assert!(p.tick(0.11));
        invariant(&p);
        assert!(!p.is_open());
        assert!(!p.is_paused());
    }

    #[test]
    fn zero_delay_closes_immediately() {
        let mut p = PopupState::new(0.0);
        p.open(BodyId(1), "mars", Vec2::ZERO);
        assert!(p.request_close());
        assert!(!p.is_open());
        invariant(&p);
    }

    #[test]
    fn reopening_cancels_close() {
        let mut p = PopupState::new(0.2);
        p.open(BodyId(1), "mars", Vec2::ZERO);
        p.request_close();
        p.open(BodyId(2), "venus", Vec2::new(5.0, 5.0));
        assert!(!p.tick(1.0));
        assert_eq!(p.active_body(), Some("venus"));
        invariant(&p);
    }

    #[test]
    fn close_when_closed_is_noop() {
        let mut p = PopupState::new(0.0);
        assert!(!p.request_close());
        assert!(!p.tick(1.0));
    }

    #[test]
    fn json_view() {
        let mut p = PopupState::new(0.2);
        p.open(BodyId(1), "saturn", Vec2::new(20.0, -40.0));
        let v: serde_json::Value = serde_json::from_str(&p.to_json()).unwrap();
        assert_eq!(v["open"], true);
        assert_eq!(v["active_body"], "saturn");
        assert_eq!(v["x"], 20.0);
        assert_eq!(v["y"], -40.0);
    }
}

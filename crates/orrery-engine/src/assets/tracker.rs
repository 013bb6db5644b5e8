//! Bookkeeping for asynchronous asset requests.
//!
//! Requests are registered here, handed to the host-side fetcher once, and
//! settled exactly once: by a result, or by a timeout after a bounded wait of
//! accumulated frame time. Results that arrive after a request settled are
//! dropped.

use std::collections::BTreeMap;

use crate::api::types::TextureId;
use crate::assets::error::AssetError;
use crate::assets::model::ModelDescriptor;
use crate::assets::texture::DecodedTexture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u32);

impl AssetId {
    /// Texture requests hand their id to the decoded texture.
    pub fn texture_id(self) -> TextureId {
        TextureId(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Texture,
    Model,
}

/// Which completion a request counts towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadGroup {
    /// The texture batch for primitive bodies.
    Batch,
    /// A model descriptor for a distinguished body.
    Model,
    /// Optional extras (ring, background, fallback maps). Never gates the loop.
    Decoration,
}

impl LoadGroup {
    pub fn gates_loop(self) -> bool {
        !matches!(self, LoadGroup::Decoration)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    pub id: AssetId,
    pub kind: AssetKind,
    pub group: LoadGroup,
    pub url: String,
    /// Free-form tag the simulation uses to route the result (e.g. `"texture:earth"`).
    pub purpose: String,
}

/// What a fetcher produces for a request.
#[derive(Debug)]
pub enum AssetPayload {
    Texture(DecodedTexture),
    Model(ModelDescriptor),
}

/// A settled request as the simulation sees it. Texture pixels are already in
/// the texture store by then; only the id is passed along.
#[derive(Debug)]
pub enum AssetOutcome {
    Texture(TextureId),
    Model(ModelDescriptor),
}

#[derive(Debug)]
pub struct SettledAsset {
    pub request: AssetRequest,
    pub outcome: Result<AssetOutcome, AssetError>,
}

struct Pending {
    request: AssetRequest,
    waited: f32,
}

pub struct AssetTracker {
    next: u32,
    timeout_secs: Option<f32>,
    pending: BTreeMap<AssetId, Pending>,
    undispatched: Vec<AssetId>,
    settled: Vec<(AssetRequest, Result<AssetPayload, AssetError>)>,
}

impl AssetTracker {
    pub fn new(timeout_secs: Option<f32>) -> Self {
        Self {
            next: 1,
            timeout_secs,
            pending: BTreeMap::new(),
            undispatched: Vec::new(),
            settled: Vec::new(),
        }
    }

    /// Register a request. It is handed to the fetcher on the next `take_dispatch`.
    pub fn request(&mut self, kind: AssetKind, group: LoadGroup, url: &str, purpose: &str) -> AssetId {
        let id = AssetId(self.next);
        self.next += 1;
        log::debug!("asset request {} ({:?}, {:?}): {}", id.0, kind, group, url);
        let request = AssetRequest {
            id,
            kind,
            group,
            url: url.to_string(),
            purpose: purpose.to_string(),
        };
        self.pending.insert(id, Pending { request, waited: 0.0 });
        self.undispatched.push(id);
        id
    }

    /// Requests registered since the last call, in registration order.
    pub fn take_dispatch(&mut self) -> Vec<AssetRequest> {
        let ids = std::mem::take(&mut self.undispatched);
        ids.into_iter()
            .filter_map(|id| self.pending.get(&id).map(|p| p.request.clone()))
            .collect()
    }

    /// Record a result. Returns false (and drops it) if the request already settled.
    pub fn settle(&mut self, id: AssetId, result: Result<AssetPayload, AssetError>) -> bool {
        match self.pending.remove(&id) {
            Some(pending) => {
                self.settled.push((pending.request, result));
                true
            }
            None => {
                log::debug!("ignoring late result for asset {}", id.0);
                false
            }
        }
    }

    /// Advance every pending request's wait; expired ones settle as `Timeout`.
    pub fn tick(&mut self, dt: f32) {
        let Some(limit) = self.timeout_secs else {
            return;
        };
        let mut expired = Vec::new();
        for (id, pending) in self.pending.iter_mut() {
            pending.waited += dt;
            if pending.waited >= limit {
                expired.push(*id);
            }
        }
        for id in expired {
            if let Some(pending) = self.pending.remove(&id) {
                let err = AssetError::Timeout {
                    url: pending.request.url.clone(),
                    secs: limit,
                };
                self.settled.push((pending.request, Err(err)));
            }
        }
    }

    /// Settled results not yet handed to the simulation.
    pub fn drain(&mut self) -> Vec<(AssetRequest, Result<AssetPayload, AssetError>)> {
        std::mem::take(&mut self.settled)
    }

    pub fn is_pending(&self, id: AssetId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// No request of `group` is still waiting.
    pub fn group_settled(&self, group: LoadGroup) -> bool {
        self.pending.values().all(|p| p.request.group != group)
    }

    /// Every loop-gating request has settled and been drained.
    pub fn gating_settled(&self) -> bool {
        self.pending.values().all(|p| !p.request.group.gates_loop())
            && self.settled.iter().all(|(r, _)| !r.group.gates_loop())
    }

    /// Forget everything. Results for forgotten requests are dropped as late.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.undispatched.clear();
        self.settled.clear();
    }
}

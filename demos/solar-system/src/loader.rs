/// What an asset request is for. Round-trips through the request's
/// `purpose` string so results can be routed when they settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Purpose {
    /// Surface texture of a primitive body.
    BodyTexture(String),
    Glow,
    Ring,
    Background,
    /// Model descriptor of a body.
    Model(String),
    /// Fallback texture for a model body.
    Fallback(String),
}

impl Purpose {
    pub fn tag(&self) -> String {
        match self {
            Purpose::BodyTexture(name) => format!("texture:{name}"),
            Purpose::Glow => "glow".into(),
            Purpose::Ring => "ring".into(),
            Purpose::Background => "background".into(),
            Purpose::Model(name) => format!("model:{name}"),
            Purpose::Fallback(name) => format!("fallback:{name}"),
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        if let Some((kind, name)) = tag.split_once(':') {
            let name = name.to_string();
            return match kind {
                "texture" => Some(Purpose::BodyTexture(name)),
                "model" => Some(Purpose::Model(name)),
                "fallback" => Some(Purpose::Fallback(name)),
                _ => None,
            };
        }
        match tag {
            "glow" => Some(Purpose::Glow),
            "ring" => Some(Purpose::Ring),
            "background" => Some(Purpose::Background),
            _ => None,
        }
    }
}

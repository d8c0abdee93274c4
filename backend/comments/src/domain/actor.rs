pub const DEFAULT_ACTOR_NAME: &str = "Admin";

/// Who a mutation is performed as. There is no identity model yet, so every
/// request runs as [`Actor::admin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
}

impl Actor {
    pub fn admin() -> Self {
        Self {
            name: DEFAULT_ACTOR_NAME.to_string(),
        }
    }

    /// The author recorded on a new comment: an explicit, non-blank name wins
    /// over the actor's own.
    pub fn author_for(&self, requested: Option<String>) -> String {
        requested
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.name.clone())
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::admin()
    }
}

//! Agent registry for looking up agent backends.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::backends::{ClaudeBackend, CodexBackend};
use super::errors::AgentError;
use super::traits::AgentBackend;
use super::types::AgentType;

/// Global registry of all supported agent backends.
static REGISTRY: LazyLock<AgentRegistry> = LazyLock::new(AgentRegistry::new);

struct AgentRegistry {
    backends: HashMap<AgentType, Box<dyn AgentBackend>>,
}

impl AgentRegistry {
    fn new() -> Self {
        let mut backends: HashMap<AgentType, Box<dyn AgentBackend>> = HashMap::new();
        backends.insert(AgentType::Claude, Box::new(ClaudeBackend));
        backends.insert(AgentType::Codex, Box::new(CodexBackend));
        Self { backends }
    }

    fn get_by_type(&self, agent_type: AgentType) -> Option<&dyn AgentBackend> {
        self.backends.get(&agent_type).map(|b| b.as_ref())
    }

    fn default_agent(&self) -> AgentType {
        AgentType::Claude
    }
}

/// Get a reference to an agent backend by name (case-insensitive).
pub fn get_agent(name: &str) -> Option<&'static dyn AgentBackend> {
    AgentType::parse(name).and_then(get_agent_by_type)
}

/// Get a reference to an agent backend by type.
pub fn get_agent_by_type(agent_type: AgentType) -> Option<&'static dyn AgentBackend> {
    REGISTRY.get_by_type(agent_type)
}

/// Resolve an agent name, failing with [`AgentError::UnknownAgent`].
pub fn require_agent(name: &str) -> Result<&'static dyn AgentBackend, AgentError> {
    get_agent(name).ok_or_else(|| AgentError::UnknownAgent {
        name: name.to_string(),
    })
}

/// Check if an agent name is valid/supported (case-insensitive).
pub fn is_valid_agent(name: &str) -> bool {
    AgentType::parse(name).is_some()
}

/// Get all valid agent names (lowercase, sorted).
pub fn valid_agent_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = AgentType::all().iter().map(|t| t.as_str()).collect();
    names.sort();
    names
}

/// Get the default agent name.
pub fn default_agent_name() -> &'static str {
    REGISTRY.default_agent().as_str()
}

/// Get the default agent backend.
pub fn default_agent() -> &'static dyn AgentBackend {
    // Every AgentType is registered in AgentRegistry::new
    match REGISTRY.get_by_type(REGISTRY.default_agent()) {
        Some(backend) => backend,
        None => &ClaudeBackend,
    }
}

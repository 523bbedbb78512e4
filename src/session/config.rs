use std::collections::HashMap;
use std::sync::Arc;

use crate::mapping::CommandDescriptor;
use crate::reflection::{DefaultObjectFactory, ObjectFactory};

/// Shared binding configuration: the command registry plus the settings
/// consumed at dispatcher-build time.
///
/// Assembled once (builder style), then shared immutably behind an `Arc`.
/// How command definitions get here (XML, annotations, code) is the
/// registration mechanism's business, not this layer's.
#[derive(Clone)]
pub struct Configuration {
    commands: HashMap<String, CommandDescriptor>,
    use_actual_param_name: bool,
    object_factory: Arc<dyn ObjectFactory>,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            use_actual_param_name: true,
            object_factory: Arc::new(DefaultObjectFactory),
        }
    }

    /// Register a command definition (builder form).
    pub fn command(mut self, descriptor: CommandDescriptor) -> Self {
        self.add_command(descriptor);
        self
    }

    pub fn add_command(&mut self, descriptor: CommandDescriptor) {
        self.commands.insert(descriptor.id.clone(), descriptor);
    }

    /// Whether source-declared parameter names participate in naming.
    pub fn use_actual_param_name(mut self, enabled: bool) -> Self {
        self.use_actual_param_name = enabled;
        self
    }

    pub fn object_factory(mut self, factory: Arc<dyn ObjectFactory>) -> Self {
        self.object_factory = factory;
        self
    }

    pub fn has_command(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    pub fn get_command(&self, id: &str) -> Option<&CommandDescriptor> {
        self.commands.get(id)
    }

    pub fn uses_actual_param_name(&self) -> bool {
        self.use_actual_param_name
    }

    pub fn factory(&self) -> &Arc<dyn ObjectFactory> {
        &self.object_factory
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

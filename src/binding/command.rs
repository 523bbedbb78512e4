use log::debug;

use crate::core::{BindingError, Result};
use crate::mapping::{CommandDescriptor, CommandType};
use crate::metadata::{MapperInterface, MethodDecl};
use crate::session::Configuration;

/// The command a mapper method resolved to.
///
/// `Flush` is synthesized for flush-marked methods with no registered
/// command and carries no name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlCommand {
    Mapped {
        name: String,
        command_type: CommandType,
    },
    Flush,
}

impl SqlCommand {
    /// Resolve the command for `method` as invoked through `mapper`.
    ///
    /// The candidate id is `interface-qualified-name.method-name`. When the
    /// invoking interface has no matching registration, ancestor interfaces
    /// are searched depth-first in declaration order, restricted to parents
    /// assignable from the declaring interface. This lets a descendant
    /// inherit a command registered against an ancestor's method.
    pub fn resolve(
        config: &Configuration,
        mapper: &MapperInterface,
        method: &MethodDecl,
        declaring: &MapperInterface,
    ) -> Result<Self> {
        match Self::resolve_descriptor(config, mapper, &method.name, declaring) {
            Some(descriptor) => {
                if descriptor.command_type == CommandType::Unknown {
                    return Err(BindingError::UnknownCommandType(descriptor.id.clone()));
                }
                Ok(Self::Mapped {
                    name: descriptor.id.clone(),
                    command_type: descriptor.command_type,
                })
            }
            None if method.flush => Ok(Self::Flush),
            None => Err(BindingError::CommandNotFound(format!(
                "{}.{}",
                mapper.name(),
                method.name
            ))),
        }
    }

    fn resolve_descriptor<'a>(
        config: &'a Configuration,
        interface: &MapperInterface,
        method_name: &str,
        declaring: &MapperInterface,
    ) -> Option<&'a CommandDescriptor> {
        let id = format!("{}.{}", interface.name(), method_name);
        if config.has_command(&id) {
            return config.get_command(&id);
        }
        if interface.name() == declaring.name() {
            return None;
        }
        for parent in interface.parents() {
            if declaring.is_assignable_from(&parent.interface) {
                if let Some(descriptor) =
                    Self::resolve_descriptor(config, &parent.interface, method_name, declaring)
                {
                    debug!(
                        "command for {}.{} inherited from {}",
                        interface.name(),
                        method_name,
                        descriptor.id
                    );
                    return Some(descriptor);
                }
            }
        }
        None
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Mapped { name, .. } => Some(name),
            Self::Flush => None,
        }
    }

    pub fn command_type(&self) -> CommandType {
        match self {
            Self::Mapped { command_type, .. } => *command_type,
            Self::Flush => CommandType::Flush,
        }
    }
}

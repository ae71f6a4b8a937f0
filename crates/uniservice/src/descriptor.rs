use std::fmt;

use uniservice_config::Config;

/// Identity of a managed service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    name: String,
    display_name: Option<String>,
    description: String,
}

impl ServiceDescriptor {
    /// Describes the service identified by `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: String::new(),
        }
    }

    /// Sets the human-readable label.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the description written into generated files.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Identifier used in paths and control commands.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label shown to operators, falling back to the name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|display| !display.is_empty())
            .unwrap_or(&self.name)
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.display_name())
    }
}

impl From<&Config> for ServiceDescriptor {
    fn from(config: &Config) -> Self {
        Self {
            name: config.name.clone(),
            display_name: config.display_name.clone(),
            description: config.description.clone(),
        }
    }
}

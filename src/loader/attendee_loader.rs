// YAML attendee loading - Load attendees.yaml with login records

use crate::core::errors::AuthError;
use crate::core::models::AttendeeRecord;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Container for attendees.yaml root structure
#[derive(Debug, Deserialize)]
struct AttendeesYaml {
    attendees: Vec<AttendeeRecord>,
}

/// Attendee loader - reads the records a YAML-backed store serves
#[derive(Debug, Clone)]
pub struct AttendeeLoader {
    attendees: Vec<AttendeeRecord>,
}

impl AttendeeLoader {
    /// Load attendees from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(AuthError::Configuration(format!(
                "Attendees file not found at {:?}",
                path_ref
            )));
        }

        let yaml_content = fs::read_to_string(path_ref)
            .map_err(|e| AuthError::Configuration(format!("Failed to read attendees file: {}", e)))?;

        Self::from_yaml_str(&yaml_content)
    }

    /// Parse attendees from an in-memory YAML document
    pub fn from_yaml_str(yaml_content: &str) -> Result<Self, AuthError> {
        let parsed: AttendeesYaml = serde_yaml::from_str(yaml_content)
            .map_err(|e| AuthError::Configuration(format!("Failed to parse attendees YAML: {}", e)))?;

        let loader = Self {
            attendees: parsed.attendees,
        };
        loader.validate()?;
        Ok(loader)
    }

    pub fn attendees(&self) -> &[AttendeeRecord] {
        &self.attendees
    }

    pub fn into_attendees(self) -> Vec<AttendeeRecord> {
        self.attendees
    }

    /// Usernames must be unique, otherwise a (username, password) lookup could match two records
    fn validate(&self) -> Result<(), AuthError> {
        let mut seen = HashSet::new();
        for attendee in &self.attendees {
            if !seen.insert(attendee.username.as_str()) {
                return Err(AuthError::Configuration(format!(
                    "Duplicate attendee username '{}'",
                    attendee.username
                )));
            }
        }
        Ok(())
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("entity id must not be empty")]
    EmptyId,
    #[error("entity id must not contain '/' (got {0:?})")]
    PathSeparator(String),
    #[error("entity id must not be a dot segment (got {0:?})")]
    DotSegment(String),
}

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn parse(raw: impl Into<String>) -> Result<Self, TargetError> {
                let raw = raw.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(TargetError::EmptyId);
                }
                if trimmed.contains('/') {
                    return Err(TargetError::PathSeparator(raw));
                }
                if matches!(trimmed, "." | "..") {
                    return Err(TargetError::DotSegment(raw));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = TargetError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(PatientId);
id_newtype!(DietChartId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Patient,
    DietChart,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Patient => "patient",
            TargetKind::DietChart => "diet_chart",
        }
    }
}

/// The entity a destructive action is about to remove.
///
/// A target is fixed for as long as its confirmation dialog is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeleteTarget {
    Patient { id: PatientId, name: String },
    DietChart { id: DietChartId },
}

impl DeleteTarget {
    pub fn patient(id: &str, name: impl Into<String>) -> Result<Self, TargetError> {
        Ok(Self::Patient {
            id: PatientId::parse(id)?,
            name: name.into(),
        })
    }

    pub fn diet_chart(id: &str) -> Result<Self, TargetError> {
        Ok(Self::DietChart {
            id: DietChartId::parse(id)?,
        })
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            DeleteTarget::Patient { .. } => TargetKind::Patient,
            DeleteTarget::DietChart { .. } => TargetKind::DietChart,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            DeleteTarget::Patient { id, .. } => id.as_str(),
            DeleteTarget::DietChart { id } => id.as_str(),
        }
    }

    /// Human-readable label interpolated into the dialog description.
    pub fn subject_label(&self) -> &str {
        match self {
            DeleteTarget::Patient { name, .. } => name,
            DeleteTarget::DietChart { id } => id.as_str(),
        }
    }

    /// Collection segment of the REST resource, e.g. `diet-charts`.
    pub fn collection(&self) -> &'static str {
        match self {
            DeleteTarget::Patient { .. } => "patients",
            DeleteTarget::DietChart { .. } => "diet-charts",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            DeleteTarget::Patient { .. } => "Patient successfully deleted!",
            DeleteTarget::DietChart { .. } => "Diet Chart successfully deleted!",
        }
    }

    pub fn generic_failure_message(&self) -> &'static str {
        match self {
            DeleteTarget::Patient { .. } => "Failed to delete patient",
            DeleteTarget::DietChart { .. } => "Failed to delete diet chart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

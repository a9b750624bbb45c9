//! Core result types for the diagnostic engine:
//! - `Failure` - one problem description, with optional sensitive values
//! - `Finding` - all problems detected for one resource instance
//! - `Report` - the aggregated outcome of an engine run

use serde::{Deserialize, Serialize};

/// A value that must not be sent verbatim to an external text service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensitive {
    /// The value as it appears in the failure text.
    pub unmasked: String,
    /// The substitute used when the text leaves the process.
    pub masked: String,
}

impl Sensitive {
    /// Mask a value with a same-length run of asterisks.
    pub fn new(unmasked: impl Into<String>) -> Self {
        let unmasked = unmasked.into();
        let masked = "*".repeat(unmasked.chars().count());
        Self { unmasked, masked }
    }
}

/// One specific problem detected on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Human-readable problem description.
    pub text: String,
    /// Values inside `text` that must be masked before external forwarding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensitive: Vec<Sensitive>,
}

impl Failure {
    /// A failure with no sensitive content.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sensitive: Vec::new(),
        }
    }

    /// A failure whose text contains values that must be masked before
    /// being forwarded to the AI backend.
    pub fn with_sensitive(text: impl Into<String>, sensitive: Vec<Sensitive>) -> Self {
        Self {
            text: text.into(),
            sensitive,
        }
    }

    /// The failure text with every sensitive value substituted. This is the
    /// only form that may be handed to the explanation client.
    pub fn masked_text(&self) -> String {
        let mut text = self.text.clone();
        for entry in &self.sensitive {
            text = text.replace(&entry.unmasked, &entry.masked);
        }
        text
    }
}

impl From<String> for Failure {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Failure {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// All problems detected for one resource instance.
///
/// An analyzer emits at most one `Finding` per resource; a resource with
/// several simultaneous problems gets one `Finding` carrying several
/// [`Failure`]s. Resources with no problems produce nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Resource kind, e.g. `Pod` or `Ingress`.
    pub kind: String,
    /// Resource name.
    pub name: String,
    /// Resource namespace (empty for cluster-scoped resources).
    pub namespace: String,
    /// The problems detected, in the order the analyzer produced them.
    pub failures: Vec<Failure>,
    /// Plain-language remediation text, filled in by the remediation
    /// service when `--explain` is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Finding {
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
        failures: Vec<Failure>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.into(),
            failures,
            explanation: None,
        }
    }

    /// `namespace/name`, or just the name for cluster-scoped resources.
    pub fn object_identifier(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.namespace, self.name)
        }
    }

    /// The masked failure texts, in stable order, ready to be handed to the
    /// remediation service as prompt fragments.
    pub fn prompt_fragments(&self) -> Vec<String> {
        self.failures.iter().map(Failure::masked_text).collect()
    }
}

/// An analyzer that failed outright, recorded without aborting its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerError {
    /// The analyzer's registered name.
    pub analyzer: String,
    /// The forwarded error message.
    pub message: String,
}

/// Aggregated outcome of one engine run. Created fresh per run and
/// immutable once returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Findings in analyzer-registration order, then per-analyzer emit order.
    pub findings: Vec<Finding>,
    /// One entry per analyzer that failed outright.
    pub errors: Vec<AnalyzerError>,
}

impl Report {
    /// True when the run found no problems and no analyzer failed.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.errors.is_empty()
    }
}

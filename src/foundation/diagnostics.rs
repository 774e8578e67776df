//! Non-fatal findings collected while a project is loaded.
//!
//! Library code never installs or reaches for a global logger. Everything that is worth
//! reporting but not worth failing on is pushed into a [`Diagnostics`] list that the
//! caller owns, and mirrored as a `tracing` event so an installed subscriber sees it too.

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// What the finding is about, e.g. a track id.
    pub subject: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        let subject = subject.into();
        let message = message.into();
        tracing::info!(subject = %subject, "{message}");
        self.entries.push(Diagnostic {
            severity: Severity::Info,
            subject,
            message,
        });
    }

    pub fn warn(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        let subject = subject.into();
        let message = message.into();
        tracing::warn!(subject = %subject, "{message}");
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            subject,
            message,
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

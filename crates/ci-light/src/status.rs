//! Status classification
//!
//! Raw status strings from the API are mapped onto two closed enumerations,
//! one per pipeline mode. Classification is total: unrecognized, empty or
//! absent values become `Unknown`.

use ci_light_config::{LedColor, PaletteConfig};
use std::fmt;

/// Anything the ribbon can show in a slot
pub trait DisplayStatus {
    /// Color of this status in the given palette
    fn color(&self, palette: &PaletteConfig) -> LedColor;
}

/// State of a workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStatus {
    Queued,
    InProgress,
    Completed,
    Unknown,
}

impl WorkflowStatus {
    /// Case-insensitive mapping of a raw run status
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "queued" => WorkflowStatus::Queued,
            "in_progress" => WorkflowStatus::InProgress,
            "completed" => WorkflowStatus::Completed,
            _ => WorkflowStatus::Unknown,
        }
    }

    /// Like [`WorkflowStatus::classify`], treating an absent value as empty
    pub fn classify_opt(raw: Option<&str>) -> Self {
        Self::classify(raw.unwrap_or_default())
    }
}

impl DisplayStatus for WorkflowStatus {
    fn color(&self, palette: &PaletteConfig) -> LedColor {
        match self {
            WorkflowStatus::Queued => palette.queued,
            WorkflowStatus::InProgress => palette.in_progress,
            WorkflowStatus::Completed => palette.completed,
            WorkflowStatus::Unknown => palette.unknown,
        }
    }
}

/// State of a pull request check run
///
/// Has no `Queued` variant: a queued check classifies as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckStatus {
    Completed,
    InProgress,
    Unknown,
}

impl CheckStatus {
    /// Case-insensitive mapping of a raw check run status
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "completed" => CheckStatus::Completed,
            "in_progress" => CheckStatus::InProgress,
            _ => CheckStatus::Unknown,
        }
    }

    /// Like [`CheckStatus::classify`], treating an absent value as empty
    pub fn classify_opt(raw: Option<&str>) -> Self {
        Self::classify(raw.unwrap_or_default())
    }

    /// Collapse the statuses of all checks of one commit into one
    ///
    /// Any check in progress makes the whole commit in progress. Otherwise
    /// the commit is completed only if every check is. No checks at all is
    /// unknown.
    pub fn reduce(statuses: &[CheckStatus]) -> Self {
        if statuses.is_empty() {
            return CheckStatus::Unknown;
        }
        if statuses.contains(&CheckStatus::InProgress) {
            return CheckStatus::InProgress;
        }
        if statuses.iter().all(|s| *s == CheckStatus::Completed) {
            return CheckStatus::Completed;
        }
        CheckStatus::Unknown
    }
}

impl DisplayStatus for CheckStatus {
    fn color(&self, palette: &PaletteConfig) -> LedColor {
        match self {
            CheckStatus::Completed => palette.completed,
            CheckStatus::InProgress => palette.in_progress,
            CheckStatus::Unknown => palette.unknown,
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowStatus::Queued => "queued",
            WorkflowStatus::InProgress => "in_progress",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckStatus::Completed => "completed",
            CheckStatus::InProgress => "in_progress",
            CheckStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_classify_known_values_any_case() {
        for raw in ["queued", "QUEUED", "Queued"] {
            assert_eq!(WorkflowStatus::classify(raw), WorkflowStatus::Queued);
        }
        for raw in ["in_progress", "IN_PROGRESS", "In_Progress"] {
            assert_eq!(WorkflowStatus::classify(raw), WorkflowStatus::InProgress);
        }
        for raw in ["completed", "COMPLETED", "Completed"] {
            assert_eq!(WorkflowStatus::classify(raw), WorkflowStatus::Completed);
        }
    }

    #[test]
    fn test_check_classify_known_values_any_case() {
        assert_eq!(CheckStatus::classify("completed"), CheckStatus::Completed);
        assert_eq!(CheckStatus::classify("COMPLETED"), CheckStatus::Completed);
        assert_eq!(CheckStatus::classify("in_progress"), CheckStatus::InProgress);
        assert_eq!(CheckStatus::classify("In_Progress"), CheckStatus::InProgress);
    }

    #[test]
    fn test_unrecognized_values_are_unknown() {
        for raw in ["", " ", "waiting", "pending", "in progress", "completed!", "success", "null"] {
            assert_eq!(WorkflowStatus::classify(raw), WorkflowStatus::Unknown, "{raw:?}");
            assert_eq!(CheckStatus::classify(raw), CheckStatus::Unknown, "{raw:?}");
        }
        assert_eq!(WorkflowStatus::classify_opt(None), WorkflowStatus::Unknown);
        assert_eq!(CheckStatus::classify_opt(None), CheckStatus::Unknown);
    }

    #[test]
    fn test_queued_is_not_a_check_status() {
        assert_eq!(CheckStatus::classify("queued"), CheckStatus::Unknown);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for raw in ["queued", "in_progress", "completed", "bogus"] {
            let status = WorkflowStatus::classify(raw);
            assert_eq!(WorkflowStatus::classify(&status.to_string()), status);
            let status = CheckStatus::classify(raw);
            assert_eq!(CheckStatus::classify(&status.to_string()), status);
        }
    }

    #[test]
    fn test_reduce() {
        use CheckStatus::*;
        assert_eq!(CheckStatus::reduce(&[]), Unknown);
        assert_eq!(CheckStatus::reduce(&[Completed, Completed]), Completed);
        assert_eq!(CheckStatus::reduce(&[Completed, InProgress]), InProgress);
        assert_eq!(CheckStatus::reduce(&[Unknown, InProgress]), InProgress);
        assert_eq!(CheckStatus::reduce(&[Completed, Unknown]), Unknown);
    }

    #[test]
    fn test_default_palette_colors() {
        let palette = PaletteConfig::default();
        assert_eq!(CheckStatus::Completed.color(&palette), LedColor::Green);
        assert_eq!(CheckStatus::InProgress.color(&palette), LedColor::Yellow);
        assert_eq!(CheckStatus::Unknown.color(&palette), LedColor::Red);
        assert_eq!(WorkflowStatus::Queued.color(&palette), LedColor::Orange);
        assert_eq!(WorkflowStatus::Completed.color(&palette), LedColor::Green);
    }
}

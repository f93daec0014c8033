//! Plain-text rendering of gateway results.
//!
//! Everything returns a `String` so output can be checked without a terminal.

use expert_core::{
    CapabilityState, ClassifiedError, CredentialSummary, ErrorCategory, ExpertAnswer, Persona,
    StatusReport,
};

use std::fmt::Write;

/// One remediation line per category. `key_name` is the credential the
/// gateway looks up.
pub fn remediation_hint(category: ErrorCategory, key_name: &str) -> String {
    let hint = match category {
        ErrorCategory::MissingCredential => {
            return format!(
                "Set {key_name} in your environment, a .env file, or the secret store."
            );
        }
        ErrorCategory::EmptyQuery => "Type a question after the persona id.",
        ErrorCategory::UnknownPersona => "Run `consult --list` to see the available personas.",
        ErrorCategory::CapabilityUnavailable => {
            "Run `consult --status` to see which capability is unavailable."
        }
        ErrorCategory::CredentialError => {
            "Check that your API key is correct and still active."
        }
        ErrorCategory::DependencyError => {
            "The model client could not be set up. Check your installation."
        }
        ErrorCategory::NetworkError => "Check your network connection and try again.",
        ErrorCategory::UnknownError => {
            "Try again later. Run with --verbose and check consult.log for details."
        }
    };

    hint.to_string()
}

pub fn persona_list<'a>(personas: impl IntoIterator<Item = &'a Persona>) -> String {
    let mut out = String::new();

    for persona in personas {
        let _ = writeln!(
            out,
            "{} {:<24} {}",
            persona.icon,
            persona.id.as_str(),
            persona.display_name
        );
        let _ = writeln!(out, "    {}", persona.description);
        let _ = writeln!(out, "    e.g. \"{}\"", persona.guidance_hint);
    }

    out
}

pub fn status(report: &StatusReport) -> String {
    let mut out = String::from("Capabilities\n");

    for capability in report.capabilities.iter() {
        let marker = match capability.state {
            CapabilityState::Available => "ok",
            CapabilityState::Missing => "!!",
            CapabilityState::Faulted => "xx",
        };
        let _ = write!(out, "  [{marker}] {:<18} {}", capability.name, capability.state);
        if let Some(detail) = &capability.detail {
            let _ = write!(out, " ({detail})");
        }
        out.push('\n');
    }

    out.push_str("Credential\n");
    match &report.credential {
        CredentialSummary::Configured {
            source,
            masked,
            length,
            warning,
        } => {
            let _ = writeln!(out, "  source: {source}");
            let _ = writeln!(out, "  key:    {masked}");
            let _ = writeln!(out, "  length: {length}");
            if let Some(warning) = warning {
                let _ = writeln!(out, "  warning: {warning}");
            }
        }
        CredentialSummary::Absent { key_name } => {
            let _ = writeln!(out, "  {key_name} is not set");
            let _ = writeln!(
                out,
                "  hint: {}",
                remediation_hint(ErrorCategory::MissingCredential, key_name)
            );
        }
        CredentialSummary::LookupFailed { detail } => {
            let _ = writeln!(out, "  lookup failed: {detail}");
        }
    }

    out
}

pub fn answer(persona: &Persona, answer: &ExpertAnswer) -> String {
    format!(
        "{} {} ({})\n\n{}\n",
        persona.icon, persona.display_name, answer.model, answer.answer_text
    )
}

pub fn failure(error: &ClassifiedError, key_name: &str) -> String {
    format!(
        "Error [{}]: {}\nhint: {}\n",
        error.category,
        error.detail,
        remediation_hint(error.category, key_name)
    )
}

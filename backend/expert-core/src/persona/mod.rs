//! The fixed set of advisory personas.
//!
//! Each persona pairs a behavioral instruction for the model with the
//! metadata the presentation layer needs to offer it. The table is built
//! once per process and never changes afterwards.

use crate::error::PersonaError;

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;

static REGISTRY: Lazy<PersonaRegistry> = Lazy::new(PersonaRegistry::build);

/// Stable persona identifiers, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonaId {
    PsychologicalCounselor,
    FinancialAdvisor,
    CareerCoach,
    ItConsultant,
    MedicalAdvisor,
}

impl PersonaId {
    pub const ALL: [PersonaId; 5] = [
        PersonaId::PsychologicalCounselor,
        PersonaId::FinancialAdvisor,
        PersonaId::CareerCoach,
        PersonaId::ItConsultant,
        PersonaId::MedicalAdvisor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaId::PsychologicalCounselor => "psychological-counselor",
            PersonaId::FinancialAdvisor => "financial-advisor",
            PersonaId::CareerCoach => "career-coach",
            PersonaId::ItConsultant => "it-consultant",
            PersonaId::MedicalAdvisor => "medical-advisor",
        }
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonaId {
    type Err = PersonaError;

    /// Exact match on the kebab-case key. No fallback persona.
    #[track_caller]
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PersonaId::ALL
            .into_iter()
            .find(|id| id.as_str() == value)
            .ok_or_else(|| PersonaError::unknown(value))
    }
}

/// An advisory role and everything needed to present and dispatch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Persona {
    pub id: PersonaId,
    /// Localized label shown in the persona picker.
    pub display_name: &'static str,
    /// Prepended to every request as the model's behavioral directive.
    pub system_instruction: &'static str,
    pub description: &'static str,
    /// Example question shown to the user.
    pub guidance_hint: &'static str,
    pub icon: &'static str,
}

/// Read-only persona table.
#[derive(Debug)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl PersonaRegistry {
    /// The process-wide registry.
    pub fn global() -> &'static PersonaRegistry {
        &REGISTRY
    }

    fn build() -> Self {
        let personas = PersonaId::ALL.into_iter().map(define).collect();
        Self { personas }
    }

    /// Look up a persona by its string key.
    ///
    /// # Errors
    /// Returns [`PersonaError::UnknownPersona`] for any key outside the fixed set.
    #[track_caller]
    pub fn get(&self, persona_id: &str) -> Result<&Persona, PersonaError> {
        let id = PersonaId::from_str(persona_id)?;
        Ok(self.by_id(id))
    }

    pub fn by_id(&self, id: PersonaId) -> &Persona {
        // Built from PersonaId::ALL in the same order.
        &self.personas[id as usize]
    }

    pub fn list_ids(&self) -> &'static [PersonaId] {
        &PersonaId::ALL
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }
}

fn define(id: PersonaId) -> Persona {
    match id {
        PersonaId::PsychologicalCounselor => Persona {
            id,
            display_name: "心理カウンセラー",
            system_instruction: "You are a gentle psychological counselor. Listen with empathy, \
                never judge, and answer in a way that lightens the person's heart. \
                Suggest small, realistic steps, and recommend professional in-person support \
                when the situation sounds serious.",
            description: "Emotional support for stress, anxiety and relationships.",
            guidance_hint: "I feel exhausted every morning before work. How can I cope?",
            icon: "💭",
        },
        PersonaId::FinancialAdvisor => Persona {
            id,
            display_name: "金融アドバイザー",
            system_instruction: "You are a financial advisor with professional knowledge. \
                Answer accurately and concisely, state the assumptions behind any figures, \
                and point out risks. Do not recommend specific securities.",
            description: "Budgeting, saving, investing basics and financial planning.",
            guidance_hint: "How should I split my savings between an emergency fund and index funds?",
            icon: "💰",
        },
        PersonaId::CareerCoach => Persona {
            id,
            display_name: "キャリアコーチ",
            system_instruction: "You are a caring and practical career coach. Give positive, \
                concrete advice the person can act on this week, and ask about their goals \
                when the question leaves them unclear.",
            description: "Job changes, skill growth and workplace challenges.",
            guidance_hint: "I want to move from sales into product management. Where do I start?",
            icon: "🚀",
        },
        PersonaId::ItConsultant => Persona {
            id,
            display_name: "ITコンサルタント",
            system_instruction: "You are an experienced IT consultant. Explain technical \
                options clearly, compare their trade-offs in cost, effort and risk, and \
                recommend a pragmatic path suited to the person's scale.",
            description: "Technology selection, system design and digital transformation.",
            guidance_hint: "Should our ten-person company move its file server to the cloud?",
            icon: "💻",
        },
        PersonaId::MedicalAdvisor => Persona {
            id,
            display_name: "医療アドバイザー",
            system_instruction: "You are a careful medical advisor. Provide general health \
                information in plain language, never give a diagnosis, and always advise \
                seeing a doctor for persistent, severe or urgent symptoms.",
            description: "General health information and guidance on when to see a doctor.",
            guidance_hint: "What are good habits for improving sleep quality?",
            icon: "🩺",
        },
    }
}

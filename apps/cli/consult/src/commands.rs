//! One function per CLI action.

use crate::args::Action;
use crate::render;

use expert_core::{ConsultationGateway, ModelClient, PersonaRegistry};

use log::{info, warn};

/// Text for stdout plus whether the action succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub success: bool,
}

pub async fn execute<C: ModelClient>(gateway: &ConsultationGateway<C>, action: Action) -> Outcome {
    match action {
        Action::List => list(gateway),
        Action::Status => status(gateway),
        Action::Ask { persona, question } => ask(gateway, &persona, &question).await,
    }
}

fn list<C: ModelClient>(gateway: &ConsultationGateway<C>) -> Outcome {
    Outcome {
        output: render::persona_list(gateway.personas()),
        success: true,
    }
}

fn status<C: ModelClient>(gateway: &ConsultationGateway<C>) -> Outcome {
    let report = gateway.status_report();

    Outcome {
        output: render::status(&report),
        success: true,
    }
}

async fn ask<C: ModelClient>(
    gateway: &ConsultationGateway<C>,
    persona_id: &str,
    question: &str,
) -> Outcome {
    info!("Consulting {persona_id}");

    match gateway.submit(persona_id, question).await {
        Ok(answer) => Outcome {
            output: render::answer(PersonaRegistry::global().by_id(answer.persona), &answer),
            success: true,
        },
        Err(error) => {
            warn!("Consultation failed: {error}");
            Outcome {
                output: render::failure(&error, gateway.credential_key_name()),
                success: false,
            }
        }
    }
}

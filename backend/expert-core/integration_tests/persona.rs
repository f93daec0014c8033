use expert_core::error::PersonaError;
use expert_core::{PersonaId, PersonaRegistry};

use std::collections::HashSet;

/// **VALUE**: Verifies every known persona resolves with a usable instruction.
///
/// **WHY THIS MATTERS**: An empty system instruction would send the user's question to
/// the model with no persona frame at all.
///
/// **BUG THIS CATCHES**: Would catch a persona added to `PersonaId::ALL` without a
/// definition, or a definition with blank text.
#[test]
fn given_known_persona_ids_when_looked_up_then_each_has_instruction_and_metadata() {
    // GIVEN: The global registry
    let registry = PersonaRegistry::global();

    for id in registry.list_ids() {
        // WHEN: Looking up by string key
        let persona = registry.get(id.as_str()).unwrap();

        // THEN: Identity round-trips and content is present
        assert_eq!(persona.id, *id);
        assert!(!persona.system_instruction.trim().is_empty(), "{id} has no instruction");
        assert!(!persona.display_name.is_empty());
        assert!(!persona.description.is_empty());
        assert!(!persona.guidance_hint.is_empty());
        assert!(!persona.icon.is_empty());
    }
}

/// **VALUE**: Verifies unknown ids fail explicitly instead of falling back to a default.
///
/// **WHY THIS MATTERS**: A silent default instruction would answer as nobody in
/// particular while the UI claims a persona.
///
/// **BUG THIS CATCHES**: Would catch case-insensitive or prefix matching creeping in.
#[test]
fn given_unknown_persona_ids_when_looked_up_then_returns_unknown_persona() {
    let registry = PersonaRegistry::global();

    for bad in ["lawyer", "", "Career-Coach", "career-coach ", "career"] {
        let result = registry.get(bad);

        match result {
            Err(PersonaError::UnknownPersona { persona_id, .. }) => assert_eq!(persona_id, bad),
            other => panic!("Expected UnknownPersona for {bad:?}, got {other:?}"),
        }
    }
}

/// **VALUE**: Verifies declaration order is stable and ids are unique.
///
/// **WHY THIS MATTERS**: The UI enumerates personas in this order; reordering between
/// calls would shuffle the picker.
///
/// **BUG THIS CATCHES**: Would catch the registry being rebuilt from a HashMap.
#[test]
fn given_registry_when_listed_twice_then_order_is_declaration_order() {
    let registry = PersonaRegistry::global();

    let first: Vec<&str> = registry.list_ids().iter().map(PersonaId::as_str).collect();
    let second: Vec<&str> = registry.iter().map(|p| p.id.as_str()).collect();

    assert_eq!(
        first,
        vec![
            "psychological-counselor",
            "financial-advisor",
            "career-coach",
            "it-consultant",
            "medical-advisor",
        ]
    );
    assert_eq!(first, second);
    assert_eq!(first.iter().collect::<HashSet<_>>().len(), first.len());
}

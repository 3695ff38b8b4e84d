use medivox::domain::{DiagnosisPrompt, QueryText};

#[test]
fn given_query_when_building_prompt_then_embeds_query() {
    let query = QueryText::parse("fever and cough for 3 days").unwrap();

    let prompt = DiagnosisPrompt::new(&query, false);

    assert!(prompt.as_str().contains("Patient query: fever and cough for 3 days"));
    assert!(prompt.as_str().starts_with("You are acting as a professional doctor"));
    assert!(!prompt.as_str().contains("image"));
}

#[test]
fn given_image_when_building_prompt_then_mentions_image() {
    let query = QueryText::parse("red rash").unwrap();

    let prompt = DiagnosisPrompt::new(&query, true);

    assert!(prompt.as_str().contains("An image of the affected area is attached"));
    assert!(prompt.as_str().ends_with("into account."));
}

#[test]
fn given_same_query_when_building_twice_then_prompts_are_identical() {
    let query = QueryText::parse("headache").unwrap();

    assert_eq!(
        DiagnosisPrompt::new(&query, true),
        DiagnosisPrompt::new(&query, true)
    );
}

#[test]
fn given_query_with_braces_when_building_prompt_then_text_is_kept_verbatim() {
    let query = QueryText::parse("pain {left side}").unwrap();

    let prompt = DiagnosisPrompt::new(&query, false);

    assert!(prompt.as_str().ends_with("Patient query: pain {left side}"));
}

#[test]
fn given_query_with_template_markers_when_building_prompt_then_query_is_not_rewritten() {
    let query = QueryText::parse("itchy {image_note} patch near {query}").unwrap();

    let prompt = DiagnosisPrompt::new(&query, true);

    assert!(
        prompt
            .as_str()
            .contains("Patient query: itchy {image_note} patch near {query}\n")
    );
    assert_eq!(
        prompt
            .as_str()
            .matches("An image of the affected area is attached")
            .count(),
        1
    );
}

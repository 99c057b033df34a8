//! Generation prompt

use prd_schema::SectionName;

const PREAMBLE: &str = "You are a specialized Product Requirements Document (PRD) generator with deep \
expertise in product management and technical documentation. Turn the product idea below into a \
comprehensive, professional-grade PRD that a development team could implement from.";

const GUIDANCE: &[(SectionName, &str)] = &[
    (SectionName::ExecutiveSummary, "value proposition, target market and unique selling points"),
    (SectionName::ProblemStatement, "specific pain points with quantified impact where possible"),
    (SectionName::TargetUsers, "primary and secondary personas with their needs and goals"),
    (SectionName::ProductGoals, "primary and secondary goals with SMART success criteria"),
    (SectionName::RequirementsAndFeatures, "prioritized must-have and nice-to-have features with acceptance criteria"),
    (SectionName::UserStories, "user journeys in \"As a... I want... So that...\" form"),
    (SectionName::TechnicalRequirements, "technologies, standards, compatibility and performance criteria"),
    (SectionName::Architecture, "components, interactions, data flows and integration points"),
    (SectionName::ImplementationPlan, "phases with milestones, dependencies and resources"),
    (SectionName::SuccessMetrics, "KPIs with baseline and target values"),
    (SectionName::RisksAndMitigation, "prioritized risks with probability, impact and mitigation"),
    (SectionName::References, "industry standards, competitive analysis and relevant research"),
];

const EXTRAS: &str = r#"Also include these top-level keys:
- "diagrams": an array of objects with "title", "type" and "mermaid_code" fields for system architecture, user flows and similar
- "image_suggestions": 3-5 descriptive prompts for images that would help a reader
- "search_terms": 5-7 specific technical search terms for finding implementation references"#;

const STYLE: &str = "Be concrete: give measurable criteria instead of generic statements, keep \
sections consistent with each other, and avoid unrealistic requirements.";

/// Full prompt for a product description
#[must_use]
pub fn build_prompt(description: &str) -> String {
    let mut prompt = String::with_capacity(2048 + description.len());
    prompt.push_str(PREAMBLE);
    prompt.push_str(
        "\n\nRespond with a single JSON object whose keys are the section names below and whose \
         values are a string or a list of strings.\n\nSections:\n",
    );
    for (i, (section, guidance)) in GUIDANCE.iter().enumerate() {
        prompt.push_str(&format!("{}. {}: {guidance}\n", i + 1, section.display_name()));
    }
    prompt.push('\n');
    prompt.push_str(EXTRAS);
    prompt.push_str("\n\n");
    prompt.push_str(STYLE);
    prompt.push_str("\n\nHere is the product idea to expand into a PRD:\n\n");
    prompt.push_str(description.trim());
    prompt
}

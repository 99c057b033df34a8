//! Raw model responses

/// Only the Executive Summary is present
pub const EXECUTIVE_SUMMARY_ONLY: &str = r#"{"Executive Summary": "Track carbon footprint."}"#;

/// Architecture with one flowchart
pub const ARCHITECTURE_WITH_DIAGRAM: &str = r#"{"Architecture": {"content": ["API layer"], "diagrams": [{"title": "T", "type": "flowchart", "mermaid_code": "graph TD\nA-->B"}]}}"#;

/// Valid object surrounded by prose
pub const PROSE_WRAPPED: &str = r#"Here is your PRD: {"Executive Summary": "X"} Thanks!"#;

/// Object inside a fenced code block after a reasoning preamble
pub const THINKING_AND_FENCE: &str = "<think>The user wants {a PRD}. Let me plan.</think>\n```json\n{\"Executive Summary\": \"Fenced\", \"Product Goals\": [\"One\", \"Two\"]}\n```";

/// No JSON anywhere
pub const NO_JSON: &str = "I'm sorry, I cannot help with that request.";

/// A complete response exercising every enrichment
pub const FULL_RESPONSE: &str = r#"{
  "Executive Summary": "CarbonTrack helps households measure and cut their carbon footprint.",
  "Problem Statement": "People cannot see which daily choices drive their emissions.",
  "Target Users": ["Eco-conscious households", "Sustainability coaches"],
  "Product Goals": ["Reduce user emissions by 15% in a year", "Reach 50k monthly users"],
  "Requirements & Features": {
    "Tracking": "Log travel, energy and food",
    "Insights": ["Weekly report", "Peer comparison"]
  },
  "User Stories": ["As a user, I want to log a car trip so that I see its footprint"],
  "Technical Requirements": ["REST API", "PostgreSQL", "Mobile clients"],
  "Architecture": {
    "content": ["Mobile app talks to an API gateway", "Workers compute emission factors"],
    "diagrams": [
      {"title": "System Overview", "type": "flowchart", "mermaid_code": "graph TD\nApp-->API\nAPI-->DB"},
      {"title": "Logging Flow", "type": "sequence", "mermaid_code": "sequenceDiagram\nUser->>App: log trip\nApp->>API: POST /trips"}
    ]
  },
  "Implementation Plan": ["Phase 1: MVP", "Phase 2: Insights", "Phase 3: Social"],
  "Success Metrics": ["Monthly active users", "Average reduction per user"],
  "Risks & Mitigation": "Inaccurate emission factors; mitigate with audited datasets.",
  "References": {
    "content": ["GHG Protocol - https://ghgprotocol.org/"],
    "search_terms": ["household carbon footprint", "emission factors database"]
  },
  "image_suggestions": [
    "Dashboard mockup for the Executive Summary",
    {"description": "Eco-conscious family at home", "section": "Target Users"},
    "Abstract green energy illustration"
  ]
}"#;

/// Search hits scripted for [`FULL_RESPONSE`]'s terms
pub const FULL_RESPONSE_HITS: &[(&str, &[(&str, &str)])] = &[
    (
        "household carbon footprint",
        &[
            ("EPA Carbon Calculator", "https://www3.epa.gov/carbon-footprint-calculator/"),
            ("GHG Protocol", "https://ghgprotocol.org"),
        ],
    ),
    (
        "emission factors database",
        &[("IPCC EFDB", "https://www.ipcc-nggip.iges.or.jp/EFDB/")],
    ),
];

use crate::analysis::types::ControlAnalysisInput;

/// System preamble for control analysis
pub const SYSTEM_PROMPT: &str = "You are a helpful ISO 27001:2022 consultant.";

/// System preamble for the connectivity check
pub const CONNECTION_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub const CONNECTION_TEST_PROMPT: &str =
    r#"Say "Hello! LLM connection is working." and nothing else."#;

/// Numbered tasks of the full analysis prompt, in order
pub const ANALYSIS_TASKS: [&str; 6] = [
    "Gap Analysis",
    "Action Plan",
    "Required Evidence",
    "Recommended Documents",
    "Risk Rating",
    "Maturity (0-5)",
];

/// Which prompt template to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    /// Full structured analysis with the numbered task list
    ControlAnalysis,
    /// Echo the control back and ask for a summary
    ConnectivityTest,
}

/// Render `input` into a single prompt block.
///
/// Free text is inserted as-is; absent optional fields render empty.
pub fn build_control_prompt(input: &ControlAnalysisInput, variant: PromptVariant) -> String {
    let evidence = input.evidence_description.as_deref().unwrap_or_default();
    let context = input.user_context.as_deref().unwrap_or_default();

    match variant {
        PromptVariant::ControlAnalysis => {
            let tasks = ANALYSIS_TASKS
                .iter()
                .enumerate()
                .map(|(i, task)| format!("{}) {}", i + 1, task))
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                "
You are an ISO 27001:2022 consultant and auditor.

Control: {code} - {title}
Description: {description}
Guidance: {guidance}

Reference context:
{reference}

User status: {status}
Current practice: {practice}
Evidence summary: {evidence}
Company context: {context}

Task:
{tasks}
",
                code = input.control_code,
                title = input.title,
                description = input.description,
                guidance = input.guidance,
                reference = input.retrieved_context.as_deref().unwrap_or_default(),
                status = input.status,
                practice = input.current_practice,
                evidence = evidence,
                context = context,
                tasks = tasks,
            )
            .trim()
            .to_string()
        }

        PromptVariant::ConnectivityTest => format!(
            "
Control code: {code}
Title: {title}
Description: {description}
Guidance: {guidance}
Status: {status}
Current practice: {practice}
Evidence summary: {evidence}
Company context: {context}

Please tell what this context is about.
",
            code = input.control_code,
            title = input.title,
            description = input.description,
            guidance = input.guidance,
            status = input.status,
            practice = input.current_practice,
            evidence = evidence,
            context = context,
        )
        .trim()
        .to_string(),
    }
}

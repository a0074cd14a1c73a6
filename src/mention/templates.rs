/// Template id inserted for the Biology subject.
pub const BIOLOGY_PROMPT_ID: &str = "biology-prompt";

/// Template id inserted for the History subject.
pub const HISTORY_PROMPT_ID: &str = "history-prompt";

pub const BIOLOGY_PROMPT: &str = "You are marking a biology assignment. \
Check each answer for correct use of scientific terminology, accurate description of \
biological processes and structures, and evidence-based reasoning drawn from experiments \
or observations. Reward clear diagrams and labelled explanations where the learning \
outcomes ask for them. Point out misconceptions explicitly and explain the correct \
concept in one or two sentences. Keep feedback constructive and tied to the marking criteria.";

pub const HISTORY_PROMPT: &str = "You are marking a history assignment. \
Check each answer for accurate dates, people and events, for the use of primary and \
secondary sources as evidence, and for an argument that weighs causes and consequences \
rather than only narrating them. Reward answers that acknowledge differing \
interpretations. Point out factual errors explicitly and suggest which source or period \
the student should revisit. Keep feedback constructive and tied to the marking criteria.";

const TEMPLATES: &[(&str, &str)] = &[
    (BIOLOGY_PROMPT_ID, BIOLOGY_PROMPT),
    (HISTORY_PROMPT_ID, HISTORY_PROMPT),
];

/// Expanded text for a template id, if the id is known.
pub fn lookup(id: &str) -> Option<&'static str> {
    TEMPLATES
        .iter()
        .find(|(template_id, _)| *template_id == id)
        .map(|(_, text)| *text)
}

/// Ids offered as mention suggestions, in display order.
pub fn ids() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|(id, _)| *id)
}

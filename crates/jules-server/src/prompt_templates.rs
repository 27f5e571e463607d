//! Built-in task-description templates offered to clients composing new
//! issues for the agent.

#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub template: &'static str,
}

pub const PROMPT_TEMPLATES: [PromptTemplate; 3] = [
    PromptTemplate {
        key: "general",
        name: "General Task",
        template: "### Objective\n\n(Please provide a clear and concise description of what needs to be done.)\n\n### Acceptance Criteria\n\n- [ ] (Define the conditions that must be met for the task to be considered complete.)\n- [ ] (Add more criteria as needed.)\n\n### Additional Context\n\n(Provide any extra information, links, or screenshots that might be helpful.)",
    },
    PromptTemplate {
        key: "bug",
        name: "Bug Fix",
        template: "### Bug Description\n\n(A clear and concise description of what the bug is.)\n\n### Steps to Reproduce\n\n1. Go to '...'\n2. Click on '....'\n3. See error\n\n### Expected Behavior\n\n(A clear and concise description of what you expected to happen.)\n\n### Actual Behavior\n\n(A clear and concise description of what actually happened.)\n\n### Screenshots\n\n(If applicable, add screenshots to help explain your problem.)",
    },
    PromptTemplate {
        key: "feature",
        name: "New Feature Request",
        template: "### User Story\n\nAs a [type of user], I want [an action] so that [a benefit].\n\n### Feature Description\n\n(A clear and concise description of the new feature.)\n\n### Acceptance Criteria\n\n- [ ] Given [context], when [I do something], then [I expect something to happen].\n- [ ] (Add more criteria as needed.)\n\n### Design / Mockups\n\n(Please provide links to any relevant design files, mockups, or screenshots.)",
    },
];

/// Templates as the JSON object served by the config endpoint.
pub fn templates_json() -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for template in PROMPT_TEMPLATES {
        object.insert(
            template.key.to_string(),
            serde_json::json!({
                "name": template.name,
                "template": template.template,
            }),
        );
    }
    serde_json::Value::Object(object)
}

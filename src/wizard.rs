use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::template::TemplateData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    #[default]
    Idea,
    ProjectRules,
    FrameworkDocs,
    StarterTemplate,
    RequestPrompt,
    SpecPrompt,
    PlannerPrompt,
    CodeGenPrompt,
    ReviewPrompt,
}

impl WizardStep {
    pub const ALL: [WizardStep; 9] = [
        WizardStep::Idea,
        WizardStep::ProjectRules,
        WizardStep::FrameworkDocs,
        WizardStep::StarterTemplate,
        WizardStep::RequestPrompt,
        WizardStep::SpecPrompt,
        WizardStep::PlannerPrompt,
        WizardStep::CodeGenPrompt,
        WizardStep::ReviewPrompt,
    ];

    pub fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL.get(self.position() + 1).copied().unwrap_or(self)
    }

    pub fn previous(self) -> Self {
        match self.position() {
            0 => self,
            i => Self::ALL[i - 1],
        }
    }

    pub fn is_first(self) -> bool {
        self.position() == 0
    }

    pub fn is_last(self) -> bool {
        self.position() == Self::ALL.len() - 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WizardStep::Idea => "idea",
            WizardStep::ProjectRules => "projectRules",
            WizardStep::FrameworkDocs => "frameworkDocs",
            WizardStep::StarterTemplate => "starterTemplate",
            WizardStep::RequestPrompt => "requestPrompt",
            WizardStep::SpecPrompt => "specPrompt",
            WizardStep::PlannerPrompt => "plannerPrompt",
            WizardStep::CodeGenPrompt => "codeGenPrompt",
            WizardStep::ReviewPrompt => "reviewPrompt",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Idea => "Idea",
            WizardStep::ProjectRules => "Project Rules",
            WizardStep::FrameworkDocs => "Framework Docs",
            WizardStep::StarterTemplate => "Starter Template",
            WizardStep::RequestPrompt => "Request Prompt",
            WizardStep::SpecPrompt => "Spec Prompt",
            WizardStep::PlannerPrompt => "Planner Prompt",
            WizardStep::CodeGenPrompt => "Code Generation Prompt",
            WizardStep::ReviewPrompt => "Review Prompt",
        }
    }

    /// Template rendered on this step; input-only steps have none.
    pub fn template_file(self, codegen: CodeGenPromptType) -> Option<&'static str> {
        match self {
            WizardStep::RequestPrompt => Some("prompt1.md"),
            WizardStep::SpecPrompt => Some("prompt2.md"),
            WizardStep::PlannerPrompt => Some("prompt3.md"),
            WizardStep::CodeGenPrompt => Some(match codegen {
                CodeGenPromptType::Standard => "prompt4a.md",
                CodeGenPromptType::Advanced => "prompt4b.md",
            }),
            WizardStep::ReviewPrompt => Some("prompt5.md"),
            _ => None,
        }
    }

    /// Field the user fills in on this step: typed input, or the AI's reply
    /// to the step's prompt.
    pub fn answer_field(self) -> Option<AnswerField> {
        match self {
            WizardStep::Idea => Some(AnswerField::Idea),
            WizardStep::ProjectRules => Some(AnswerField::ProjectRules),
            WizardStep::FrameworkDocs => Some(AnswerField::FrameworkDocs),
            WizardStep::StarterTemplate => Some(AnswerField::StarterTemplate),
            WizardStep::RequestPrompt => Some(AnswerField::RequestPromptOutput),
            WizardStep::SpecPrompt => Some(AnswerField::SpecPromptOutput),
            WizardStep::PlannerPrompt => Some(AnswerField::PlannerPromptOutput),
            WizardStep::CodeGenPrompt => Some(AnswerField::CodeGenPromptOutput),
            WizardStep::ReviewPrompt => None,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased with `-` and `_` removed, so `plannerPrompt`, `planner-prompt`
/// and `PLANNER_PROMPT` all compare equal.
fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for WizardStep {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize_name(s);
        match Self::ALL.iter().find(|step| normalize_name(step.as_str()) == wanted) {
            Some(step) => Ok(*step),
            None => bail!("invalid step '{}'", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeGenPromptType {
    #[default]
    Standard,
    Advanced,
}

impl FromStr for CodeGenPromptType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(CodeGenPromptType::Standard),
            "advanced" => Ok(CodeGenPromptType::Advanced),
            other => bail!("invalid code generation prompt type '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerField {
    Idea,
    ProjectRules,
    FrameworkDocs,
    StarterTemplate,
    RequestPromptOutput,
    SpecPromptOutput,
    PlannerPromptOutput,
    CodeGenPromptOutput,
    ExistingCode,
}

impl AnswerField {
    pub const ALL: [AnswerField; 9] = [
        AnswerField::Idea,
        AnswerField::ProjectRules,
        AnswerField::FrameworkDocs,
        AnswerField::StarterTemplate,
        AnswerField::RequestPromptOutput,
        AnswerField::SpecPromptOutput,
        AnswerField::PlannerPromptOutput,
        AnswerField::CodeGenPromptOutput,
        AnswerField::ExistingCode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnswerField::Idea => "idea",
            AnswerField::ProjectRules => "projectRules",
            AnswerField::FrameworkDocs => "frameworkDocs",
            AnswerField::StarterTemplate => "starterTemplate",
            AnswerField::RequestPromptOutput => "requestPromptOutput",
            AnswerField::SpecPromptOutput => "specPromptOutput",
            AnswerField::PlannerPromptOutput => "plannerPromptOutput",
            AnswerField::CodeGenPromptOutput => "codeGenPromptOutput",
            AnswerField::ExistingCode => "existingCode",
        }
    }

    /// Placeholder this field is exposed as in templates.
    pub fn placeholder(self) -> &'static str {
        match self {
            AnswerField::Idea => "IDEA",
            AnswerField::ProjectRules => "PROJECT_RULES",
            AnswerField::FrameworkDocs => "FRAMEWORK_DOCUMENTATION",
            AnswerField::StarterTemplate => "STARTER_TEMPLATE",
            AnswerField::RequestPromptOutput => "PROJECT_REQUEST",
            AnswerField::SpecPromptOutput => "TECHNICAL_SPECIFICATION",
            AnswerField::PlannerPromptOutput => "IMPLEMENTATION_PLAN",
            AnswerField::CodeGenPromptOutput => "YOUR_CODE",
            AnswerField::ExistingCode => "EXISTING_CODE",
        }
    }
}

impl fmt::Display for AnswerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize_name(s);
        match Self::ALL.iter().find(|f| normalize_name(f.as_str()) == wanted) {
            Some(field) => Ok(*field),
            None => bail!("invalid field '{}'", s),
        }
    }
}

/// Everything the user has entered so far. Persisted as one JSON blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardState {
    pub current_step: WizardStep,
    pub idea: String,
    pub project_rules: String,
    pub framework_docs: String,
    pub starter_template: String,
    pub request_prompt_output: String,
    pub spec_prompt_output: String,
    pub planner_prompt_output: String,
    pub code_gen_prompt_output: String,
    pub code_gen_prompt_type: CodeGenPromptType,
    pub existing_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl WizardState {
    pub fn get(&self, field: AnswerField) -> &str {
        match field {
            AnswerField::Idea => &self.idea,
            AnswerField::ProjectRules => &self.project_rules,
            AnswerField::FrameworkDocs => &self.framework_docs,
            AnswerField::StarterTemplate => &self.starter_template,
            AnswerField::RequestPromptOutput => &self.request_prompt_output,
            AnswerField::SpecPromptOutput => &self.spec_prompt_output,
            AnswerField::PlannerPromptOutput => &self.planner_prompt_output,
            AnswerField::CodeGenPromptOutput => &self.code_gen_prompt_output,
            AnswerField::ExistingCode => &self.existing_code,
        }
    }

    pub fn set(&mut self, field: AnswerField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AnswerField::Idea => self.idea = value,
            AnswerField::ProjectRules => self.project_rules = value,
            AnswerField::FrameworkDocs => self.framework_docs = value,
            AnswerField::StarterTemplate => self.starter_template = value,
            AnswerField::RequestPromptOutput => self.request_prompt_output = value,
            AnswerField::SpecPromptOutput => self.spec_prompt_output = value,
            AnswerField::PlannerPromptOutput => self.planner_prompt_output = value,
            AnswerField::CodeGenPromptOutput => self.code_gen_prompt_output = value,
            AnswerField::ExistingCode => self.existing_code = value,
        }
    }

    /// Current answers keyed by placeholder name.
    pub fn template_data(&self) -> Result<TemplateData> {
        let mut data = TemplateData::new();
        for field in AnswerField::ALL {
            data.insert(field.placeholder(), self.get(field))?;
        }
        Ok(data)
    }

    pub fn go_to(&mut self, step: WizardStep) {
        // The code generation step starts from the starter template.
        if step == WizardStep::CodeGenPrompt && self.existing_code.is_empty() && !self.starter_template.is_empty() {
            self.existing_code = self.starter_template.clone();
        }
        self.current_step = step;
    }

    pub fn next_step(&mut self) -> WizardStep {
        self.go_to(self.current_step.next());
        self.current_step
    }

    pub fn previous_step(&mut self) -> WizardStep {
        self.go_to(self.current_step.previous());
        self.current_step
    }

    pub fn template_file_for(&self, step: WizardStep) -> Option<&'static str> {
        step.template_file(self.code_gen_prompt_type)
    }
}

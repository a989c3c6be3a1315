//! Prompt template for the financial assistant.

/// The fixed instruction template. Placeholders are substituted verbatim;
/// the surrounding phrasing is load-bearing for the fine-tuned model and
/// must not drift from the training data.
pub const FINANCE_ASSISTANT_TEMPLATE: &str = "\
你是一个专业的金融助手，负责为用户提供金融建议、风险评估和投资建议。请根据用户的具体情况，提供专业、准确、有针对性的回答。

用户问题：
{user_question}

用户账户情况：
{account_info}

请为用户提供详细、专业、有针对性的回答，避免使用过于专业的术语，确保用户能够理解。";

/// A prompt template with `{user_question}` and `{account_info}`
/// placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self { template: FINANCE_ASSISTANT_TEMPLATE.to_string() }
    }
}

impl PromptTemplate {
    /// Creates a template from custom text.
    #[must_use]
    pub fn new(template: String) -> Self {
        Self { template }
    }

    /// Renders the template with the given question and account context.
    #[must_use]
    pub fn render(&self, user_question: &str, account_info: &str) -> String {
        self.template
            .replace("{user_question}", user_question)
            .replace("{account_info}", account_info)
    }
}
